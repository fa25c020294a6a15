//! Inline color markup
//!
//! Turns text containing `[[f:#hex]]`, `[[b:#hex]]` and `[[f:#hex|b:#hex]]`
//! tags into the plain text to render plus the colors each tag sets.

mod scanner;
mod spans;

pub use scanner::{count_tags, parse, Markup};
pub use spans::{ActiveColors, ColorSpan, ColorSpans, SpanCursor};
