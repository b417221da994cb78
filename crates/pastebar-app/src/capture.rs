//! Decides whether a clipboard change is recorded in history.

use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};

use pastebar_core::text_matcher::TextMatcher;
use serde::Serialize;
use tracing::{debug, info};

use crate::settings::Settings;
use crate::text::list_entries;

/// Inserts between two runs of the pending maintenance jobs.
pub const MAINTENANCE_INTERVAL: usize = 200;

/// Language detection parameters passed along with captured text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageDetectOptions {
    /// Run language detection on the entry.
    pub should_detect_language: bool,
    /// Lines the entry needs before detection runs.
    pub min_lines_required: usize,
    /// Languages the detector may report.
    pub enabled_languages: Vec<String>,
    /// Detection priority, highest first.
    pub prioritized_languages: Vec<String>,
    /// Empty unless auto masking is enabled.
    pub auto_mask_words_list: Vec<String>,
}

impl LanguageDetectOptions {
    /// Derive detection options from `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let auto_mask_words_list = if settings.is_auto_mask_words_list_enabled {
            list_entries(&settings.auto_mask_words_list).map(str::to_owned).collect()
        } else {
            Vec::new()
        };
        Self {
            should_detect_language: settings.is_history_detect_language_enabled,
            min_lines_required: usize::try_from(settings.history_detect_language_min_lines).unwrap_or(usize::MAX),
            enabled_languages: settings.history_detect_languages_enabled_list.clone(),
            prioritized_languages: settings.history_detect_languages_prioritized_list.clone(),
            auto_mask_words_list,
        }
    }
}

/// Clipboard content offered for capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardPayload<'a> {
    /// Text content.
    Text(&'a str),
    /// Image content; the bytes do not affect the decision.
    Image,
}

/// Why a clipboard change was not captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// History capture is turned off.
    HistoryDisabled,
    /// Text is empty after trimming.
    Empty,
    /// Text contains an entry of the exclusion list.
    ExcludedContent,
    /// The source application is on the exclusion list.
    ExcludedApp,
}

/// Outcome of evaluating a clipboard change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CaptureDecision {
    /// Nothing is recorded.
    Skip {
        /// Why the change was skipped.
        reason: SkipReason,
    },
    /// Record trimmed text.
    Text {
        /// Trimmed text to store.
        text: String,
        /// Detection parameters for the stored entry.
        detect_options: LanguageDetectOptions,
        /// Star the entry when it repeats the previous one.
        auto_star_on_double_copy: bool,
        /// Application the text was copied from.
        source_app: Option<String>,
    },
    /// Record an image.
    Image {
        /// Star the entry when it repeats the previous one.
        auto_star_on_double_copy: bool,
        /// Application the image was copied from.
        source_app: Option<String>,
    },
}

impl CaptureDecision {
    const fn skip(reason: SkipReason) -> Self {
        Self::Skip { reason }
    }

    /// Whether the change is recorded.
    #[must_use]
    pub const fn is_capture(&self) -> bool {
        !matches!(self, Self::Skip { .. })
    }
}

/// Capture rules compiled from [`Settings`].
#[derive(Debug, Clone)]
pub struct CapturePolicy {
    history_enabled: bool,
    auto_star_on_double_copy: bool,
    excluded_words: Option<Vec<TextMatcher>>,
    excluded_apps: Option<Vec<TextMatcher>>,
    detect_options: LanguageDetectOptions,
}

impl CapturePolicy {
    /// Compile the rules of `settings`.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let compile = |enabled: bool, list: &str| {
            enabled.then(|| list_entries(list).filter_map(TextMatcher::new).collect::<Vec<_>>())
        };
        Self {
            history_enabled: settings.is_history_enabled,
            auto_star_on_double_copy: settings.is_auto_favorite_on_double_copy_enabled,
            excluded_words: compile(settings.is_exclusion_list_enabled, &settings.history_exclusion_list),
            excluded_apps: compile(
                settings.is_exclusion_app_list_enabled,
                &settings.history_exclusion_app_list,
            ),
            detect_options: LanguageDetectOptions::from_settings(settings),
        }
    }

    /// Whether history capture is turned on.
    #[must_use]
    pub const fn is_history_enabled(&self) -> bool {
        self.history_enabled
    }

    /// Evaluate copied text.
    #[must_use]
    pub fn evaluate_text(&self, text: &str, source_app: Option<&str>) -> CaptureDecision {
        if !self.history_enabled {
            return CaptureDecision::skip(SkipReason::HistoryDisabled);
        }
        let text = text.trim();
        if text.is_empty() {
            return CaptureDecision::skip(SkipReason::Empty);
        }
        if let Some(words) = &self.excluded_words
            && text.lines().any(|line| words.iter().any(|word| word.matches(line)))
        {
            return CaptureDecision::skip(SkipReason::ExcludedContent);
        }
        if self.is_app_excluded(source_app) {
            return CaptureDecision::skip(SkipReason::ExcludedApp);
        }
        CaptureDecision::Text {
            text: text.to_owned(),
            detect_options: self.detect_options.clone(),
            auto_star_on_double_copy: self.auto_star_on_double_copy,
            source_app: source_app.map(str::to_owned),
        }
    }

    /// Evaluate a copied image. Only the application list applies.
    #[must_use]
    pub fn evaluate_image(&self, source_app: Option<&str>) -> CaptureDecision {
        if !self.history_enabled {
            return CaptureDecision::skip(SkipReason::HistoryDisabled);
        }
        if self.is_app_excluded(source_app) {
            return CaptureDecision::skip(SkipReason::ExcludedApp);
        }
        CaptureDecision::Image {
            auto_star_on_double_copy: self.auto_star_on_double_copy,
            source_app: source_app.map(str::to_owned),
        }
    }

    fn is_app_excluded(&self, source_app: Option<&str>) -> bool {
        match (&self.excluded_apps, source_app) {
            (Some(apps), Some(app)) => apps.iter().any(|entry| entry.matches_exactly(app)),
            _ => false,
        }
    }
}

/// Counts history inserts and reports when maintenance jobs are due.
#[derive(Debug, Default)]
pub struct HistoryInsertCounter {
    count: AtomicUsize,
}

impl HistoryInsertCounter {
    /// Counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: AtomicUsize::new(0),
        }
    }

    /// Record one insert. Every [`MAINTENANCE_INTERVAL`]th call resets the
    /// counter and returns `true`.
    pub fn record_insert(&self) -> bool {
        let due = self
            .count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                Some(if count + 1 >= MAINTENANCE_INTERVAL { 0 } else { count + 1 })
            })
            .is_ok_and(|previous| previous + 1 >= MAINTENANCE_INTERVAL);
        if due {
            info!(inserts = MAINTENANCE_INTERVAL, "running pending maintenance jobs");
        }
        due
    }

    /// Inserts recorded since the last reset.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }
}

/// Result of feeding one clipboard change to a [`ClipboardMonitor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorEvent {
    /// What happens to the change.
    pub decision: CaptureDecision,
    /// Whether the pending maintenance jobs should run now.
    pub maintenance_due: bool,
}

/// Applies a [`CapturePolicy`] to clipboard changes and counts inserts.
#[derive(Debug)]
pub struct ClipboardMonitor {
    policy: CapturePolicy,
    counter: HistoryInsertCounter,
}

impl ClipboardMonitor {
    /// Monitor enforcing `policy`.
    #[must_use]
    pub const fn new(policy: CapturePolicy) -> Self {
        Self {
            policy,
            counter: HistoryInsertCounter::new(),
        }
    }

    /// Replace the rules, e.g. after the settings changed.
    pub fn set_policy(&mut self, policy: CapturePolicy) {
        self.policy = policy;
    }

    /// Handle a clipboard change. Every change seen while history is enabled
    /// counts toward maintenance, captured or not.
    pub fn on_change(&self, payload: ClipboardPayload<'_>, source_app: Option<&str>) -> MonitorEvent {
        let maintenance_due = self.policy.is_history_enabled() && self.counter.record_insert();
        let decision = match payload {
            ClipboardPayload::Text(text) => self.policy.evaluate_text(text, source_app),
            ClipboardPayload::Image => self.policy.evaluate_image(source_app),
        };
        debug!(?decision, "clipboard change evaluated");
        MonitorEvent {
            decision,
            maintenance_due,
        }
    }
}

/// Replace every case-insensitive occurrence of `words` in `text` with `*`,
/// one per masked character. Longer words win over their prefixes.
#[must_use]
pub fn mask_words<'a, S: AsRef<str>>(text: &'a str, words: &[S]) -> Cow<'a, str> {
    let mut words: Vec<&str> = words
        .iter()
        .map(|word| word.as_ref().trim())
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        return Cow::Borrowed(text);
    }
    words.sort_by_key(|word| std::cmp::Reverse(word.chars().count()));

    let mut masked = String::with_capacity(text.len());
    let mut changed = false;
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if let Some((len, chars)) = words.iter().find_map(|word| match_prefix(rest, word)) {
            masked.extend(std::iter::repeat_n('*', chars));
            rest = &rest[len..];
            changed = true;
        } else {
            masked.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }

    if changed {
        Cow::Owned(masked)
    } else {
        Cow::Borrowed(text)
    }
}

/// Byte and char length of `word` at the start of `haystack`, ignoring case.
fn match_prefix(haystack: &str, word: &str) -> Option<(usize, usize)> {
    let mut hay = haystack.char_indices();
    let mut chars = 0;
    for expected in word.chars() {
        let (_, actual) = hay.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        chars += 1;
    }
    let len = hay.next().map_or(haystack.len(), |(idx, _)| idx);
    Some((len, chars))
}
