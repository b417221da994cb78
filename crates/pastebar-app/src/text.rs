//! Small text helpers shared by the settings screens and the capture rules.

/// Character used by [`mask_value`].
pub const MASK_CHAR: char = '•';

/// Trim `text` and drop blank lines, keeping one entry per line.
#[must_use]
pub fn trim_and_remove_extra_newlines(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

/// Non-blank lines of a newline separated list.
pub fn list_entries(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

/// True when `items` holds no non-blank entry.
#[must_use]
pub fn is_string_array_empty<S: AsRef<str>>(items: &[S]) -> bool {
    items.iter().all(|item| item.as_ref().trim().is_empty())
}

/// Replace every non-whitespace character with [`MASK_CHAR`].
#[must_use]
pub fn mask_value(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_whitespace() { c } else { MASK_CHAR })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_newlines_are_removed() {
        assert_eq!(
            trim_and_remove_extra_newlines("\n\n  password  \n\n\ntoken\r\n   \nsecret\n"),
            "password\ntoken\nsecret"
        );
        assert_eq!(trim_and_remove_extra_newlines("   \n\n"), "");
    }

    #[test]
    fn blank_arrays_are_empty() {
        assert!(is_string_array_empty::<&str>(&[]));
        assert!(is_string_array_empty(&["", "  "]));
        assert!(!is_string_array_empty(&["", "rust"]));
    }

    #[test]
    fn masking_keeps_whitespace() {
        assert_eq!(mask_value("ab c\nd"), "•• •\n•");
        assert_eq!(list_entries("a\n\n b\n").collect::<Vec<_>>(), vec!["a", " b"]);
    }
}
