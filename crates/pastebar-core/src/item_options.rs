//! Per-item display options stored as JSON next to each clip.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default color classes of the note icon.
pub const DEFAULT_NOTE_ICON_COLOR: &str = "text-yellow-600 dark:text-yellow-500";

/// Icon shown next to clips that carry a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoteIconType {
    /// Speech bubble with lines.
    #[default]
    MessageSquareText,
    /// Page with text.
    FileText,
    /// Open book.
    BookOpenText,
    /// Contact card.
    Contact,
    /// Notebook with pen.
    NotebookPen,
}

impl NoteIconType {
    /// Every icon type in menu order.
    pub const ALL: [Self; 5] = [
        Self::MessageSquareText,
        Self::FileText,
        Self::BookOpenText,
        Self::Contact,
        Self::NotebookPen,
    ];

    /// Name of the icon in the lucide icon set.
    #[must_use]
    pub const fn icon_name(self) -> &'static str {
        match self {
            Self::MessageSquareText => "message-square-text",
            Self::FileText => "file-text",
            Self::BookOpenText => "book-open-text",
            Self::Contact => "contact",
            Self::NotebookPen => "notebook-pen",
        }
    }
}

/// When the note icon is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconVisibility {
    /// Always visible.
    #[default]
    Always,
    /// Visible while hovering the clip.
    Hover,
    /// Never visible.
    None,
}

/// Note icon overrides for a single item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteOptions {
    /// Whether the icon is shown at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_icon: Option<bool>,
    /// Icon to render.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<NoteIconType>,
    /// Visibility mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_visibility: Option<IconVisibility>,
    /// Color classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
}

/// Options blob attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOptions {
    /// Note icon overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_options: Option<NoteOptions>,
}

/// Global note icon settings used as defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteIconDefaults {
    /// Global toggle for note icons.
    pub is_note_icons_enabled: Option<bool>,
    /// Globally preferred icon.
    pub default_note_icon_type: Option<NoteIconType>,
}

/// Fully resolved note icon settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNoteOptions {
    /// Whether the icon is shown at all.
    pub show_icon: bool,
    /// Icon to render.
    pub icon_type: NoteIconType,
    /// Visibility mode.
    pub icon_visibility: IconVisibility,
    /// Color classes.
    pub icon_color: String,
}

/// Parse the raw options stored with an item.
///
/// Blank input, JSON that is not an object, and objects that do not match the
/// schema all yield empty options; this never fails.
#[must_use]
pub fn parse_item_options(raw: Option<&str>) -> ItemOptions {
    let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
        return ItemOptions::default();
    };

    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            if cfg!(debug_assertions) {
                warn!("failed to parse item options JSON: {err}");
            }
            return ItemOptions::default();
        }
    };

    if !value.is_object() {
        return ItemOptions::default();
    }
    serde_json::from_value(value).unwrap_or_default()
}

/// Resolve the note icon settings of an item against the global defaults.
#[must_use]
pub fn note_options(raw: Option<&str>, defaults: Option<&NoteIconDefaults>) -> ResolvedNoteOptions {
    let overrides = parse_item_options(raw).note_options.unwrap_or_default();
    let defaults = defaults.copied().unwrap_or_default();
    ResolvedNoteOptions {
        show_icon: overrides
            .show_icon
            .or(defaults.is_note_icons_enabled)
            .unwrap_or(true),
        icon_type: overrides
            .icon_type
            .or(defaults.default_note_icon_type)
            .unwrap_or_default(),
        icon_visibility: overrides.icon_visibility.unwrap_or_default(),
        icon_color: overrides
            .icon_color
            .unwrap_or_else(|| DEFAULT_NOTE_ICON_COLOR.to_owned()),
    }
}

/// Whether a note icon is rendered for an item with `description`.
#[must_use]
pub fn should_show_note_icon(
    description: Option<&str>,
    raw: Option<&str>,
    defaults: Option<&NoteIconDefaults>,
) -> bool {
    if description.is_none_or(|text| text.trim().is_empty()) {
        return false;
    }
    note_options(raw, defaults).show_icon
}
