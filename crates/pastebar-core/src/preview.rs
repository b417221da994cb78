//! Bounded previews of clip payloads for cards and history rows.

use std::borrow::Cow;

use serde::Serialize;

use crate::bbcode::close_tags;

/// Number of lines shown before a multi-line value is cut.
pub const PREVIEW_MAX_LINES: usize = 5;
/// Number of characters shown before a single-line value is cut.
pub const PREVIEW_MAX_CHARS: usize = 60;
/// Character budget used when estimating hidden lines and chars.
pub const PREVIEW_MORE_THRESHOLD: usize = 160;
/// Characters of image data shown in the large view.
pub const LARGE_VIEW_IMAGE_CHARS: usize = 200;
/// Marker appended to truncated previews.
pub const ELLIPSIS: &str = "...";
/// Placeholder callers render for a payload without content.
pub const NO_CONTENT_PLACEHOLDER: &str = "No content";

/// Bounded rendering of a payload plus how much of it was left out.
///
/// At most one of `extra_lines` and `extra_chars` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    /// Text to render.
    pub text: String,
    /// Lines hidden beyond the preview.
    pub extra_lines: Option<usize>,
    /// Characters hidden beyond the preview.
    pub extra_chars: Option<usize>,
}

impl PreviewResult {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra_lines: None,
            extra_chars: None,
        }
    }
}

/// Replace every `\r\n` with `\n`.
#[must_use]
pub fn normalize_line_endings(value: &str) -> Cow<'_, str> {
    if value.contains("\r\n") {
        Cow::Owned(value.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Compute the preview shown for `value` on a clip card or history row.
#[must_use]
pub fn compute_preview(value: &str, is_image_data: bool, is_large_view: bool) -> PreviewResult {
    if value.is_empty() {
        return PreviewResult::plain(value);
    }
    if is_large_view {
        return if is_image_data {
            PreviewResult::plain(truncate_with_ellipsis(value, LARGE_VIEW_IMAGE_CHARS))
        } else {
            PreviewResult::plain(value)
        };
    }

    let normalized = normalize_line_endings(value);
    let char_count = normalized.chars().count();
    let line_count = normalized.split('\n').count();

    if line_count >= PREVIEW_MAX_LINES && !is_image_data {
        let head = normalized
            .split('\n')
            .take(PREVIEW_MAX_LINES)
            .collect::<Vec<_>>()
            .join("\n");
        let extra_lines = positive(line_count - PREVIEW_MAX_LINES);
        let extra_chars = if extra_lines.is_none() {
            char_count.checked_sub(PREVIEW_MORE_THRESHOLD).and_then(positive)
        } else {
            None
        };
        return PreviewResult {
            text: close_tags(&head).into_owned(),
            extra_lines,
            extra_chars,
        };
    }

    if char_count > PREVIEW_MAX_CHARS && !is_image_data {
        let head = take_chars(&normalized, PREVIEW_MAX_CHARS);
        return PreviewResult {
            text: format!("{}{ELLIPSIS}", close_tags(head)),
            extra_lines: None,
            extra_chars: positive(char_count - PREVIEW_MAX_CHARS),
        };
    }

    if is_image_data {
        return PreviewResult::plain(truncate_with_ellipsis(&normalized, PREVIEW_MAX_CHARS));
    }
    PreviewResult::plain(normalized)
}

/// Estimate how many lines lie beyond the first
/// [`PREVIEW_MORE_THRESHOLD`] characters of `value`.
///
/// Returns `None` for short values and when no newline falls past the cut.
#[must_use]
pub fn count_extra_lines(value: &str) -> Option<usize> {
    if value.is_empty() {
        return None;
    }
    let normalized = normalize_line_endings(value);
    if normalized.chars().count() <= PREVIEW_MORE_THRESHOLD {
        return None;
    }
    let total = normalized.split('\n').count();
    let shown = take_chars(&normalized, PREVIEW_MORE_THRESHOLD).split('\n').count();
    total.checked_sub(shown).and_then(positive)
}

fn positive(n: usize) -> Option<usize> {
    (n > 0).then_some(n)
}

fn take_chars(value: &str, max: usize) -> &str {
    value
        .char_indices()
        .nth(max)
        .map_or(value, |(idx, _)| &value[..idx])
}

fn truncate_with_ellipsis(value: &str, max: usize) -> String {
    format!("{}{ELLIPSIS}", take_chars(value, max))
}
