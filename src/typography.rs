//! Text beautification for titles and other short plain-text fields.
//!
//! Runs the text through a markdown inline parse with smart punctuation
//! enabled and collects the text events back out. The parse resolves HTML
//! entity references (`&amp;` becomes `&`) and replaces straight quotes,
//! hyphen runs, and `...` with their typographic equivalents, without
//! wrapping the result in any HTML.

use pulldown_cmark::{Event, Options, Parser};

/// Beautifies a plain-text string: unescapes HTML entities and applies smart
/// punctuation. Markdown block structure is flattened; soft and hard breaks
/// collapse to single spaces.
pub fn beautify(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let mut out = String::with_capacity(text.len());
    for event in Parser::new_ext(text, options) {
        match event {
            Event::Text(t) | Event::Code(t) => out.push_str(&t),
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            _ => {}
        }
    }
    out
}

/// Title-cases a file stem: hyphens become spaces and each word gets an
/// upper-case first letter with the remainder lowered, so `my-POST` becomes
/// `My Post`.
pub fn title_case(stem: &str) -> String {
    stem.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beautify_smart_quotes() {
        assert_eq!(beautify(r#""hello" it's"#), "\u{201c}hello\u{201d} it\u{2019}s");
    }

    #[test]
    fn test_beautify_unescapes_entities() {
        assert_eq!(beautify("Fish &amp; Chips"), "Fish & Chips");
    }

    #[test]
    fn test_beautify_dashes_and_ellipsis() {
        assert_eq!(beautify("wait... 1--2"), "wait\u{2026} 1\u{2013}2");
    }

    #[test]
    fn test_beautify_plain_text_unchanged() {
        assert_eq!(beautify("My Post"), "My Post");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("my-post"), "My Post");
        assert_eq!(title_case("my-POST"), "My Post");
        assert_eq!(title_case("a"), "A");
        assert_eq!(title_case(""), "");
    }
}
