//! Markup scanner
//!
//! Recognizes color tags in a single left-to-right pass:
//!
//! ```text
//! [[f:#RRGGBB]]            foreground
//! [[b:#RRGGBB]]            background
//! [[f:#RRGGBB|b:#RRGGBB]]  both
//! ```
//!
//! Hex colors may use 3 or 6 digits. Anything that does not form a
//! complete tag is kept verbatim in the cleaned text.

use super::spans::{ColorSpan, ColorSpans};
use crate::core::Color;

const TAG_OPEN: &str = "[[";
const TAG_CLOSE: &[u8] = b"]]";

/// Result of parsing a marked-up string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    /// Input with every recognized tag removed
    pub text: String,
    /// Colors set by the removed tags, indexed by char position in `text`
    pub spans: ColorSpans,
}

/// A recognized tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Tag {
    /// Length of the tag in bytes
    len: usize,
    fg: Option<Color>,
    bg: Option<Color>,
}

/// Parse color tags out of `input`
pub fn parse(input: &str) -> Markup {
    let mut markup = Markup {
        text: String::with_capacity(input.len()),
        spans: ColorSpans::new(),
    };
    let mut pos = 0;

    for_each_token(input, |token| match token {
        Token::Tag(tag) => markup.spans.push(ColorSpan {
            start: pos,
            fg: tag.fg,
            bg: tag.bg,
        }),
        Token::Char(ch) => {
            markup.text.push(ch);
            pos += 1;
        }
    });

    markup
}

/// Number of tags recognized in `input`
pub fn count_tags(input: &str) -> usize {
    let mut count = 0;
    for_each_token(input, |token| {
        if let Token::Tag(_) = token {
            count += 1;
        }
    });
    count
}

enum Token {
    Tag(Tag),
    Char(char),
}

fn for_each_token(input: &str, mut f: impl FnMut(Token)) {
    let mut i = 0;
    while let Some(rest) = input.get(i..) {
        if rest.starts_with(TAG_OPEN) {
            if let Some(tag) = match_tag(rest.as_bytes()) {
                f(Token::Tag(tag));
                i += tag.len;
                continue;
            }
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        f(Token::Char(ch));
        i += ch.len_utf8();
    }
}

/// Match a complete tag at the start of `bytes`, which begins with `[[`
fn match_tag(bytes: &[u8]) -> Option<Tag> {
    let mut tag = Tag {
        len: TAG_OPEN.len(),
        fg: None,
        bg: None,
    };

    tag.len += match_entry(&bytes[tag.len..], &mut tag)?;
    if bytes.get(tag.len) == Some(&b'|') {
        tag.len += 1;
        tag.len += match_entry(&bytes[tag.len..], &mut tag)?;
    }

    if !bytes[tag.len..].starts_with(TAG_CLOSE) {
        return None;
    }
    tag.len += TAG_CLOSE.len();
    Some(tag)
}

/// Match `f:#hex` or `b:#hex`, storing the color and returning its length
fn match_entry(bytes: &[u8], tag: &mut Tag) -> Option<usize> {
    let channel = match bytes.first()? {
        b'f' => &mut tag.fg,
        b'b' => &mut tag.bg,
        _ => return None,
    };
    if bytes.get(1..3)? != b":#" {
        return None;
    }

    let digits = bytes[3..]
        .iter()
        .take_while(|b| b.is_ascii_hexdigit())
        .count();
    if digits != 3 && digits != 6 {
        return None;
    }

    let len = 3 + digits;
    let hex = std::str::from_utf8(&bytes[2..len]).ok()?;
    *channel = Some(Color::from_hex(hex).ok()?);
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ActiveColors;

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);

    #[test]
    fn test_plain_text_unchanged() {
        let markup = parse("Hello, World!");
        assert_eq!(markup.text, "Hello, World!");
        assert!(markup.spans.is_empty());
    }

    #[test]
    fn test_foreground_tag() {
        let markup = parse("[[f:#ff0000]]Hi");
        assert_eq!(markup.text, "Hi");
        assert_eq!(markup.spans.len(), 1);
        assert_eq!(markup.spans.active_at(0), ActiveColors { fg: Some(RED), bg: None });
    }

    #[test]
    fn test_combined_tag() {
        let markup = parse("[[f:#ff0000|b:#00ff00]]X");
        assert_eq!(markup.text, "X");
        assert_eq!(
            markup.spans.active_at(0),
            ActiveColors { fg: Some(RED), bg: Some(GREEN) }
        );
    }

    #[test]
    fn test_combined_tag_reversed_order() {
        let markup = parse("[[b:#00ff00|f:#f00]]X");
        assert_eq!(markup.text, "X");
        assert_eq!(
            markup.spans.active_at(0),
            ActiveColors { fg: Some(RED), bg: Some(GREEN) }
        );
    }

    #[test]
    fn test_span_positions_follow_cleaned_text() {
        let markup = parse("ab[[f:#f00]]cd[[b:#0f0]]e");
        assert_eq!(markup.text, "abcde");
        let starts: Vec<_> = markup.spans.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![2, 4]);
        assert_eq!(markup.spans.active_at(1).fg, None);
        assert_eq!(markup.spans.active_at(4), ActiveColors { fg: Some(RED), bg: Some(GREEN) });
    }

    #[test]
    fn test_positions_count_chars_not_bytes() {
        let markup = parse("äö[[f:#f00]]ü");
        assert_eq!(markup.text, "äöü");
        assert_eq!(markup.spans.iter().next().map(|s| s.start), Some(2));
    }

    #[test]
    fn test_malformed_tags_kept_verbatim() {
        for input in [
            "[[f:#ff00]]x",
            "[[x:#ff0000]]x",
            "[[f:ff0000]]x",
            "[[f:#ff0000]x",
            "[[f:#ff0000|]]x",
            "[[f:#ff0000|b:#12]]x",
            "[[f:#fff0000]]x",
            "[[",
            "[[f",
            "[[f:#",
        ] {
            let markup = parse(input);
            assert_eq!(markup.text, input, "input {:?}", input);
            assert!(markup.spans.is_empty(), "input {:?}", input);
        }
    }

    #[test]
    fn test_tag_after_stray_bracket() {
        let markup = parse("[[[f:#f00]]x");
        assert_eq!(markup.text, "[x");
        assert_eq!(markup.spans.active_at(1).fg, Some(RED));
    }

    #[test]
    fn test_trailing_tag() {
        let markup = parse("x[[f:#f00]]");
        assert_eq!(markup.text, "x");
        assert_eq!(markup.spans.iter().next().map(|s| s.start), Some(1));
    }

    #[test]
    fn test_count_tags() {
        assert_eq!(count_tags("no tags"), 0);
        assert_eq!(count_tags("[[f:#fff]]a[[f:#000|b:#111]]b[[b:#1]]"), 2);
    }
}
