//! Tokenization of guide markup.
//!
//! One line of source is scanned into an ordered sequence of [`Token`]s by
//! cursor-based ordered alternation: link, then attribute, then literal
//! escape, then word, then space run. Rendering (the on-screen projection of
//! a token) lives alongside the token type and is used only for width
//! accounting, never to build output.

pub mod classify;
pub mod cursor;
pub mod token;
pub mod tokenizer;

pub use classify::is_literal_line;
pub use token::{Token, link_markup, rendered_width};
pub use tokenizer::{readable_line, render_line, tokenize_line};

/// Failure to match any token rule. The grammar is exhaustive over valid
/// markup, so this indicates broken input and is fatal for the line.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no markup rule matches at: {0}")]
    MalformedMarkup(String),
}
