//! Closing of BBCode-style formatting tags left open by truncation.

use std::borrow::Cow;

/// Tags that never take a closing counterpart.
const VOID_TAGS: &[&str] = &["br", "hr"];

/// Formatting tags that open a span. Other bracketed words are plain text.
const FORMATTING_TAGS: &[&str] = &[
    "b", "i", "u", "s", "sub", "sup", "color", "size", "font", "url", "email", "img", "code", "pre", "quote",
    "spoiler", "list", "left", "center", "right", "justify", "table", "tr", "td", "th", "h1", "h2", "h3", "h4",
    "h5", "h6",
];

/// Close every formatting tag left open in `text`.
///
/// Only known formatting tags take part: `[INFO]` or `[1]` are plain text.
/// `[tag]` and `[tag=arg]` open a tag, `[/tag]` closes the innermost open tag
/// with the same name (case-insensitive) together with anything opened after
/// it. Closing tags that match nothing are kept verbatim. A dangling tag
/// fragment at the very end (a `[` without `]`) is dropped. Remaining open
/// tags are closed innermost first.
#[must_use]
pub fn close_tags(text: &str) -> Cow<'_, str> {
    let mut open: Vec<&str> = Vec::new();
    let mut kept = text.len();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find('[') {
        let start = cursor + offset;
        let Some(len) = text[start + 1..].find(']') else {
            if is_tag_fragment(&text[start + 1..]) {
                kept = start;
            }
            break;
        };
        let inner = &text[start + 1..start + 1 + len];
        cursor = start + 1 + len + 1;

        if let Some(name) = inner.strip_prefix('/') {
            if !is_formatting(name) {
                continue;
            }
            if let Some(pos) = open.iter().rposition(|tag| tag.eq_ignore_ascii_case(name)) {
                open.truncate(pos);
            }
        } else {
            let name = inner.split('=').next().unwrap_or_default();
            if is_formatting(name) {
                open.push(name);
            }
        }
    }

    if open.is_empty() && kept == text.len() {
        return Cow::Borrowed(text);
    }

    let mut closed = String::with_capacity(kept + open.iter().map(|tag| tag.len() + 3).sum::<usize>());
    closed.push_str(&text[..kept]);
    for tag in open.iter().rev() {
        closed.push_str("[/");
        closed.push_str(tag);
        closed.push(']');
    }
    Cow::Owned(closed)
}

fn is_formatting(name: &str) -> bool {
    FORMATTING_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Whether `rest` could still grow into a known tag.
fn is_tag_fragment(rest: &str) -> bool {
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    if rest.is_empty() {
        return true;
    }
    match rest.split_once('=') {
        Some((name, _)) => is_formatting(name),
        None => FORMATTING_TAGS.iter().chain(VOID_TAGS).any(|tag| {
            tag.len() >= rest.len() && tag.get(..rest.len()).is_some_and(|head| head.eq_ignore_ascii_case(rest))
        }),
    }
}
