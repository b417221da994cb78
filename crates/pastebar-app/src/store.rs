//! Shared settings state with change notification.

use std::path::PathBuf;

use tokio::sync::watch;
use tracing::debug;

use crate::language::{self, LanguageToggle};
use crate::settings::{Settings, SettingsError};
use crate::text::trim_and_remove_extra_newlines;

/// Owner of the current [`Settings`].
///
/// Subscribers are only woken when an update actually changes a value.
#[derive(Debug)]
pub struct SettingsStore {
    sender: watch::Sender<Settings>,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl SettingsStore {
    /// Create a store holding `settings`.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let (sender, _receiver) = watch::channel(settings);
        Self { sender }
    }

    /// Copy of the current settings.
    #[must_use]
    pub fn snapshot(&self) -> Settings {
        self.sender.borrow().clone()
    }

    /// Receiver notified after every effective change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.sender.subscribe()
    }

    /// Apply `f` to the settings. Returns whether anything changed.
    pub fn update(&self, f: impl FnOnce(&mut Settings)) -> bool {
        self.sender.send_if_modified(|settings| {
            let before = settings.clone();
            f(settings);
            let changed = *settings != before;
            if changed {
                debug!("settings changed");
            }
            changed
        })
    }

    /// Set a single field by its camelCase key. Returns whether it changed.
    ///
    /// # Errors
    /// Propagates [`Settings::set_field`] errors; the store is left untouched.
    pub fn set_field(&self, key: &str, raw: &str) -> Result<bool, SettingsError> {
        let mut result = Ok(false);
        self.sender.send_if_modified(|settings| {
            let mut next = settings.clone();
            result = next.set_field(key, raw).map(|()| next != *settings);
            if matches!(result, Ok(true)) {
                debug!(key, "settings changed");
                *settings = next;
                return true;
            }
            false
        });
        result
    }

    /// Replace the content exclusion list, normalizing blank lines away.
    pub fn set_history_exclusion_list(&self, text: &str) -> bool {
        let text = trim_and_remove_extra_newlines(text);
        self.update(|settings| settings.history_exclusion_list = text)
    }

    /// Replace the application exclusion list, normalizing blank lines away.
    pub fn set_history_exclusion_app_list(&self, text: &str) -> bool {
        let text = trim_and_remove_extra_newlines(text);
        self.update(|settings| settings.history_exclusion_app_list = text)
    }

    /// Replace the auto-mask word list, normalizing blank lines away.
    pub fn set_auto_mask_words_list(&self, text: &str) -> bool {
        let text = trim_and_remove_extra_newlines(text);
        self.update(|settings| settings.auto_mask_words_list = text)
    }

    /// Point the data folder at `path`, or back to the default with `None`.
    pub fn set_custom_db_path(&self, path: Option<PathBuf>) -> bool {
        self.update(|settings| settings.custom_db_path = path)
    }

    /// Toggle a detection language, keeping the priority list in sync.
    pub fn toggle_detect_language(&self, language: &str) -> LanguageToggle {
        let mut outcome = LanguageToggle::LimitReached;
        self.update(|settings| {
            let mut prioritized = language::effective_prioritized(
                &settings.history_detect_languages_enabled_list,
                &settings.history_detect_languages_prioritized_list,
            );
            outcome = language::toggle_language(
                &mut settings.history_detect_languages_enabled_list,
                &mut prioritized,
                language,
            );
            if outcome != LanguageToggle::LimitReached {
                settings.history_detect_languages_prioritized_list = prioritized;
            }
        });
        outcome
    }

    /// Move `active` to the priority slot of `over`. Returns whether the order changed.
    pub fn move_language_priority(&self, active: &str, over: &str) -> bool {
        let mut moved = false;
        self.update(|settings| {
            let mut prioritized = language::effective_prioritized(
                &settings.history_detect_languages_enabled_list,
                &settings.history_detect_languages_prioritized_list,
            );
            moved = language::move_priority(&mut prioritized, active, over);
            if moved {
                settings.history_detect_languages_prioritized_list = prioritized;
            }
        });
        moved
    }
}
