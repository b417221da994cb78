//! Clipboard history settings.

use std::collections::HashSet;
use std::path::PathBuf;

use pastebar_core::item_options::{NoteIconDefaults, NoteIconType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auto_clear::{AutoClearError, AutoClearSchedule, DurationType, ensure_valid_duration};
use crate::language::MAX_ENABLED_LANGUAGES;
use crate::text::trim_and_remove_extra_newlines;

/// Error raised while editing or validating [`Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No setting has this key.
    #[error("unknown setting: {0}")]
    UnknownKey(String),
    /// The raw value does not parse for the setting.
    #[error("invalid value for {key}: {value:?} (expected {expected})")]
    InvalidValue {
        /// Setting key.
        key: &'static str,
        /// Rejected raw value.
        value: String,
        /// Description of the accepted values.
        expected: &'static str,
    },
    /// The auto-clear schedule is invalid.
    #[error(transparent)]
    AutoClear(#[from] AutoClearError),
    /// More languages enabled than the detector accepts.
    #[error("at most {MAX_ENABLED_LANGUAGES} detection languages can be enabled, got {0}")]
    TooManyLanguages(usize),
    /// The same language appears twice in the enabled list.
    #[error("detection language enabled twice: {0}")]
    DuplicateLanguage(String),
}

/// Settings of the clipboard history panel, keyed by their camelCase names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Settings {
    /// Capture clipboard changes into history.
    pub is_history_enabled: bool,
    /// Refresh the history panel on every capture.
    #[serde(rename = "isHistoryAutoUpdateOnCaputureEnabled")]
    pub is_history_auto_update_on_capture_enabled: bool,
    /// Star an entry that is copied twice in a row.
    pub is_auto_favorite_on_double_copy_enabled: bool,
    /// Build link cards for captured URLs.
    pub is_auto_generate_link_cards_enabled: bool,
    /// Show link card previews in the history list.
    pub is_auto_preview_link_cards_enabled: bool,
    /// Apply [`Settings::history_exclusion_list`].
    pub is_exclusion_list_enabled: bool,
    /// Newline separated words; text containing any of them is not captured.
    pub history_exclusion_list: String,
    /// Apply [`Settings::history_exclusion_app_list`].
    pub is_exclusion_app_list_enabled: bool,
    /// Newline separated application names that are never captured.
    pub history_exclusion_app_list: String,
    /// Apply [`Settings::auto_mask_words_list`].
    pub is_auto_mask_words_list_enabled: bool,
    /// Newline separated words masked in captured text.
    pub auto_mask_words_list: String,
    /// Detect the programming language of captured text.
    pub is_history_detect_language_enabled: bool,
    /// Lines a capture needs before detection runs.
    pub history_detect_language_min_lines: u32,
    /// Languages the detector may report.
    pub history_detect_languages_enabled_list: Vec<String>,
    /// Detection priority, highest first.
    pub history_detect_languages_prioritized_list: Vec<String>,
    /// Periodically delete old history.
    pub is_auto_clear_settings_enabled: bool,
    /// Retention in units of the duration type.
    pub auto_clear_settings_duration: u32,
    /// Unit of the retention period.
    pub auto_clear_settings_duration_type: DurationType,
    /// Custom data folder; `None` uses the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_db_path: Option<PathBuf>,
    /// Show note icons on clips with a description.
    pub is_note_icons_enabled: bool,
    /// Icon used when a clip does not pick one.
    pub default_note_icon_type: NoteIconType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            is_history_enabled: true,
            is_history_auto_update_on_capture_enabled: true,
            is_auto_favorite_on_double_copy_enabled: true,
            is_auto_generate_link_cards_enabled: true,
            is_auto_preview_link_cards_enabled: true,
            is_exclusion_list_enabled: false,
            history_exclusion_list: String::new(),
            is_exclusion_app_list_enabled: false,
            history_exclusion_app_list: String::new(),
            is_auto_mask_words_list_enabled: false,
            auto_mask_words_list: String::new(),
            is_history_detect_language_enabled: true,
            history_detect_language_min_lines: 3,
            history_detect_languages_enabled_list: Vec::new(),
            history_detect_languages_prioritized_list: Vec::new(),
            is_auto_clear_settings_enabled: false,
            auto_clear_settings_duration: 1,
            auto_clear_settings_duration_type: DurationType::Weeks,
            custom_db_path: None,
            is_note_icons_enabled: true,
            default_note_icon_type: NoteIconType::default(),
        }
    }
}

impl Settings {
    /// Every key accepted by [`Settings::set_field`].
    pub const KEYS: &'static [&'static str] = &[
        "isHistoryEnabled",
        "isHistoryAutoUpdateOnCaputureEnabled",
        "isAutoFavoriteOnDoubleCopyEnabled",
        "isAutoGenerateLinkCardsEnabled",
        "isAutoPreviewLinkCardsEnabled",
        "isExclusionListEnabled",
        "historyExclusionList",
        "isExclusionAppListEnabled",
        "historyExclusionAppList",
        "isAutoMaskWordsListEnabled",
        "autoMaskWordsList",
        "isHistoryDetectLanguageEnabled",
        "historyDetectLanguageMinLines",
        "historyDetectLanguagesEnabledList",
        "historyDetectLanguagesPrioritizedList",
        "isAutoClearSettingsEnabled",
        "autoClearSettingsDuration",
        "autoClearSettingsDurationType",
        "customDbPath",
        "isNoteIconsEnabled",
        "defaultNoteIconType",
    ];

    /// Set the field named `key` from its textual form.
    ///
    /// Booleans accept `true`/`false`, lists of languages are comma separated
    /// and word lists are newline separated. An empty `customDbPath` clears it.
    ///
    /// # Errors
    /// Returns [`SettingsError::UnknownKey`] for an unknown key and
    /// [`SettingsError::InvalidValue`] when `raw` does not fit the field.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), SettingsError> {
        match key {
            "isHistoryEnabled" => self.is_history_enabled = parse_bool("isHistoryEnabled", raw)?,
            "isHistoryAutoUpdateOnCaputureEnabled" => {
                self.is_history_auto_update_on_capture_enabled =
                    parse_bool("isHistoryAutoUpdateOnCaputureEnabled", raw)?;
            }
            "isAutoFavoriteOnDoubleCopyEnabled" => {
                self.is_auto_favorite_on_double_copy_enabled =
                    parse_bool("isAutoFavoriteOnDoubleCopyEnabled", raw)?;
            }
            "isAutoGenerateLinkCardsEnabled" => {
                self.is_auto_generate_link_cards_enabled = parse_bool("isAutoGenerateLinkCardsEnabled", raw)?;
            }
            "isAutoPreviewLinkCardsEnabled" => {
                self.is_auto_preview_link_cards_enabled = parse_bool("isAutoPreviewLinkCardsEnabled", raw)?;
            }
            "isExclusionListEnabled" => {
                self.is_exclusion_list_enabled = parse_bool("isExclusionListEnabled", raw)?;
            }
            "historyExclusionList" => self.history_exclusion_list = trim_and_remove_extra_newlines(raw),
            "isExclusionAppListEnabled" => {
                self.is_exclusion_app_list_enabled = parse_bool("isExclusionAppListEnabled", raw)?;
            }
            "historyExclusionAppList" => self.history_exclusion_app_list = trim_and_remove_extra_newlines(raw),
            "isAutoMaskWordsListEnabled" => {
                self.is_auto_mask_words_list_enabled = parse_bool("isAutoMaskWordsListEnabled", raw)?;
            }
            "autoMaskWordsList" => self.auto_mask_words_list = trim_and_remove_extra_newlines(raw),
            "isHistoryDetectLanguageEnabled" => {
                self.is_history_detect_language_enabled = parse_bool("isHistoryDetectLanguageEnabled", raw)?;
            }
            "historyDetectLanguageMinLines" => {
                self.history_detect_language_min_lines = parse_number("historyDetectLanguageMinLines", raw)?;
            }
            "historyDetectLanguagesEnabledList" => self.history_detect_languages_enabled_list = parse_list(raw),
            "historyDetectLanguagesPrioritizedList" => {
                self.history_detect_languages_prioritized_list = parse_list(raw);
            }
            "isAutoClearSettingsEnabled" => {
                self.is_auto_clear_settings_enabled = parse_bool("isAutoClearSettingsEnabled", raw)?;
            }
            "autoClearSettingsDuration" => {
                let duration = parse_number("autoClearSettingsDuration", raw)?;
                ensure_valid_duration(self.auto_clear_settings_duration_type, duration)?;
                self.auto_clear_settings_duration = duration;
            }
            "autoClearSettingsDurationType" => {
                self.auto_clear_settings_duration_type = raw.parse()?;
                self.auto_clear_settings_duration = 1;
            }
            "customDbPath" => {
                let trimmed = raw.trim();
                self.custom_db_path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
            }
            "isNoteIconsEnabled" => self.is_note_icons_enabled = parse_bool("isNoteIconsEnabled", raw)?,
            "defaultNoteIconType" => {
                self.default_note_icon_type = NoteIconType::ALL
                    .into_iter()
                    .find(|icon| format!("{icon:?}").eq_ignore_ascii_case(raw.trim()))
                    .ok_or_else(|| SettingsError::InvalidValue {
                        key: "defaultNoteIconType",
                        value: raw.to_owned(),
                        expected: "MessageSquareText, FileText, BookOpenText, Contact or NotebookPen",
                    })?;
            }
            other => return Err(SettingsError::UnknownKey(other.to_owned())),
        }
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns an error for an auto-clear duration outside its options, more
    /// than [`MAX_ENABLED_LANGUAGES`] enabled languages, or a language enabled twice.
    pub fn validate(&self) -> Result<(), SettingsError> {
        ensure_valid_duration(self.auto_clear_settings_duration_type, self.auto_clear_settings_duration)?;

        let enabled = &self.history_detect_languages_enabled_list;
        if enabled.len() > MAX_ENABLED_LANGUAGES {
            return Err(SettingsError::TooManyLanguages(enabled.len()));
        }
        let mut seen = HashSet::new();
        for language in enabled {
            if !seen.insert(language.as_str()) {
                return Err(SettingsError::DuplicateLanguage(language.clone()));
            }
        }
        Ok(())
    }

    /// Retention schedule described by the auto-clear fields.
    ///
    /// # Errors
    /// Returns an error when the stored duration is not offered for its type.
    pub fn auto_clear_schedule(&self) -> Result<AutoClearSchedule, AutoClearError> {
        AutoClearSchedule::new(
            self.auto_clear_settings_duration_type,
            self.auto_clear_settings_duration,
        )
    }

    /// Global note icon defaults applied to every clip.
    #[must_use]
    pub const fn note_icon_defaults(&self) -> NoteIconDefaults {
        NoteIconDefaults {
            is_note_icons_enabled: Some(self.is_note_icons_enabled),
            default_note_icon_type: Some(self.default_note_icon_type),
        }
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, SettingsError> {
    raw.trim().parse().map_err(|_| SettingsError::InvalidValue {
        key,
        value: raw.to_owned(),
        expected: "true or false",
    })
}

fn parse_number(key: &'static str, raw: &str) -> Result<u32, SettingsError> {
    raw.trim().parse().map_err(|_| SettingsError::InvalidValue {
        key,
        value: raw.to_owned(),
        expected: "a non-negative integer",
    })
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_capture_fallbacks() {
        let settings = Settings::default();
        assert!(settings.is_history_enabled);
        assert!(settings.is_auto_favorite_on_double_copy_enabled);
        assert!(settings.is_history_detect_language_enabled);
        assert_eq!(settings.history_detect_language_min_lines, 3);
        assert!(!settings.is_auto_clear_settings_enabled);
        assert_eq!(settings.auto_clear_schedule().map(|s| s.label()), Ok("1 Week".to_owned()));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn set_field_coerces_values() -> Result<(), SettingsError> {
        let mut settings = Settings::default();
        settings.set_field("isHistoryEnabled", "false")?;
        settings.set_field("historyDetectLanguageMinLines", " 5 ")?;
        settings.set_field("historyDetectLanguagesEnabledList", "rust, go,,python")?;
        settings.set_field("historyExclusionList", "\npassword\n\n\ntoken\n")?;
        settings.set_field("defaultNoteIconType", "notebookpen")?;
        settings.set_field("customDbPath", "/tmp/pastebar-data")?;

        assert!(!settings.is_history_enabled);
        assert_eq!(settings.history_detect_language_min_lines, 5);
        assert_eq!(settings.history_detect_languages_enabled_list, vec!["rust", "go", "python"]);
        assert_eq!(settings.history_exclusion_list, "password\ntoken");
        assert_eq!(settings.default_note_icon_type, NoteIconType::NotebookPen);
        assert_eq!(settings.custom_db_path, Some(PathBuf::from("/tmp/pastebar-data")));

        settings.set_field("customDbPath", "  ")?;
        assert_eq!(settings.custom_db_path, None);
        Ok(())
    }

    #[test]
    fn set_field_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_field("isHistoryEnabled", "maybe"),
            Err(SettingsError::InvalidValue { key: "isHistoryEnabled", .. })
        ));
        assert!(matches!(
            settings.set_field("nope", "1"),
            Err(SettingsError::UnknownKey(_))
        ));
        assert!(matches!(
            settings.set_field("autoClearSettingsDuration", "4"),
            Err(SettingsError::AutoClear(_))
        ));
        assert!(settings.set_field("historyDetectLanguageMinLines", "-1").is_err());
    }

    #[test]
    fn changing_duration_type_resets_duration() -> Result<(), SettingsError> {
        let mut settings = Settings::default();
        settings.set_field("autoClearSettingsDuration", "3")?;
        settings.set_field("autoClearSettingsDurationType", "months")?;
        assert_eq!(settings.auto_clear_settings_duration, 1);
        assert_eq!(settings.auto_clear_settings_duration_type, DurationType::Months);
        settings.set_field("autoClearSettingsDuration", "8")?;
        Ok(())
    }

    #[test]
    fn every_listed_key_is_settable() {
        for key in Settings::KEYS {
            let mut settings = Settings::default();
            let Err(err) = settings.set_field(key, "definitely not valid for booleans") else {
                continue;
            };
            assert!(!matches!(err, SettingsError::UnknownKey(_)), "{key} should be known");
        }
    }

    #[test]
    fn validation_limits_languages() {
        let mut settings = Settings::default();
        settings.history_detect_languages_enabled_list =
            ["a", "b", "c", "d", "e", "f", "g", "h"].map(String::from).to_vec();
        assert!(matches!(settings.validate(), Err(SettingsError::TooManyLanguages(8))));

        settings.history_detect_languages_enabled_list = ["rust", "rust"].map(String::from).to_vec();
        assert!(matches!(settings.validate(), Err(SettingsError::DuplicateLanguage(_))));

        settings.history_detect_languages_enabled_list.clear();
        settings.auto_clear_settings_duration = 9;
        assert!(matches!(settings.validate(), Err(SettingsError::AutoClear(_))));
    }
}
