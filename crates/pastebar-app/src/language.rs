//! Programming language detection preferences.

use crate::text::is_string_array_empty;

/// Most languages that can be enabled at once; more hurts detection precision.
pub const MAX_ENABLED_LANGUAGES: usize = 7;

/// Languages the detector can recognize.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "bash",
    "c",
    "cpp",
    "csharp",
    "css",
    "dart",
    "go",
    "html",
    "java",
    "javascript",
    "json",
    "jsx",
    "kotlin",
    "markdown",
    "php",
    "python",
    "ruby",
    "rust",
    "shell",
    "sql",
    "swift",
    "tsx",
    "typescript",
    "yaml",
];

/// Whether `language` is known to the detector.
#[must_use]
pub fn is_supported(language: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language)
}

/// Result of toggling a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageToggle {
    /// The language was added to the enabled list.
    Enabled,
    /// The language was removed from the enabled list.
    Disabled,
    /// Nothing changed: the enabled list is already full.
    LimitReached,
}

/// Priority order actually used for detection.
///
/// An empty priority list falls back to the enabled languages.
#[must_use]
pub fn effective_prioritized(enabled: &[String], prioritized: &[String]) -> Vec<String> {
    if !is_string_array_empty(prioritized) {
        prioritized.to_vec()
    } else if !is_string_array_empty(enabled) {
        enabled.to_vec()
    } else {
        Vec::new()
    }
}

/// Toggle `language` in the enabled list and mirror the change into the
/// priority list.
///
/// Enabling is refused once [`MAX_ENABLED_LANGUAGES`] are enabled. The
/// priority list is expected to be the effective one and loses blank entries.
pub fn toggle_language(
    enabled: &mut Vec<String>,
    prioritized: &mut Vec<String>,
    language: &str,
) -> LanguageToggle {
    let is_enabled = enabled.iter().any(|lang| lang == language);
    if !is_enabled && enabled.len() >= MAX_ENABLED_LANGUAGES {
        return LanguageToggle::LimitReached;
    }

    if is_enabled {
        enabled.retain(|lang| lang != language);
    } else {
        enabled.push(language.to_owned());
    }

    if prioritized.iter().any(|lang| lang == language) {
        prioritized.retain(|lang| lang != language);
    } else {
        prioritized.push(language.to_owned());
    }
    prioritized.retain(|lang| !lang.is_empty());

    if is_enabled {
        LanguageToggle::Disabled
    } else {
        LanguageToggle::Enabled
    }
}

/// Move `active` to the position of `over`, shifting the entries between.
///
/// Returns whether the order changed. Unknown entries leave the list untouched.
pub fn move_priority(list: &mut Vec<String>, active: &str, over: &str) -> bool {
    if active == over {
        return false;
    }
    let (Some(from), Some(to)) = (
        list.iter().position(|lang| lang == active),
        list.iter().position(|lang| lang == over),
    ) else {
        return false;
    };
    let item = list.remove(from);
    list.insert(to, item);
    true
}

/// Interpret user input for the minimum line count.
///
/// Empty input means zero. Otherwise the leading digits are read; input that
/// yields no positive number keeps `current`.
#[must_use]
pub fn parse_min_lines(input: &str, current: u32) -> u32 {
    if input.is_empty() {
        return 0;
    }
    let trimmed = input.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => current,
        Ok(number) => number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn langs(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn priority_falls_back_to_enabled() {
        let enabled = langs(&["rust", "go"]);
        assert_eq!(effective_prioritized(&enabled, &[]), enabled);
        assert_eq!(effective_prioritized(&enabled, &langs(&[""])), enabled);
        assert_eq!(effective_prioritized(&enabled, &langs(&["go"])), langs(&["go"]));
        assert!(effective_prioritized(&[], &[]).is_empty());
    }

    #[test]
    fn toggling_mirrors_priority() {
        let mut enabled = langs(&["rust"]);
        let mut prioritized = langs(&["rust", ""]);
        assert_eq!(
            toggle_language(&mut enabled, &mut prioritized, "python"),
            LanguageToggle::Enabled
        );
        assert_eq!(enabled, langs(&["rust", "python"]));
        assert_eq!(prioritized, langs(&["rust", "python"]));

        assert_eq!(
            toggle_language(&mut enabled, &mut prioritized, "rust"),
            LanguageToggle::Disabled
        );
        assert_eq!(enabled, langs(&["python"]));
        assert_eq!(prioritized, langs(&["python"]));
    }

    #[test]
    fn eighth_language_is_refused() {
        let mut enabled = langs(&["a", "b", "c", "d", "e", "f", "g"]);
        let mut prioritized = enabled.clone();
        assert_eq!(
            toggle_language(&mut enabled, &mut prioritized, "rust"),
            LanguageToggle::LimitReached
        );
        assert_eq!(enabled.len(), MAX_ENABLED_LANGUAGES);
        assert_eq!(
            toggle_language(&mut enabled, &mut prioritized, "a"),
            LanguageToggle::Disabled
        );
    }

    #[test]
    fn move_priority_behaves_like_array_move() {
        let mut list = langs(&["rust", "go", "python", "sql"]);
        assert!(move_priority(&mut list, "sql", "go"));
        assert_eq!(list, langs(&["rust", "sql", "go", "python"]));
        assert!(move_priority(&mut list, "rust", "python"));
        assert_eq!(list, langs(&["sql", "go", "python", "rust"]));
        assert!(!move_priority(&mut list, "go", "go"));
        assert!(!move_priority(&mut list, "java", "go"));
    }

    #[test]
    fn min_lines_input() {
        assert_eq!(parse_min_lines("", 3), 0);
        assert_eq!(parse_min_lines("5", 3), 5);
        assert_eq!(parse_min_lines("12abc", 3), 12);
        assert_eq!(parse_min_lines("0", 3), 3);
        assert_eq!(parse_min_lines("abc", 3), 3);
        assert_eq!(parse_min_lines("-2", 3), 3);
    }

    #[test]
    fn supported_languages_are_sorted_and_known() {
        assert!(SUPPORTED_LANGUAGES.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(is_supported("rust"));
        assert!(!is_supported("cobol"));
    }
}
