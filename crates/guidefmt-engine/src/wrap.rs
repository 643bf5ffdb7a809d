//! Width-aware line folding.
//!
//! The builder accumulates tokens into a pending word, closing words on
//! space runs and flushing lines when the *rendered* projection of the line
//! would pass the width limit. Markup never counts against the limit; a link
//! with a long target wraps exactly like its display text would.

use crate::parsing::{Token, rendered_width};

/// Default maximum rendered width of an output line.
pub const MAX_LINE_WIDTH: usize = 80;

/// Incrementally folds a token stream for one paragraph into wrapped lines.
///
/// The current line and the pending word are each tracked in two parallel
/// forms: the markup text that will be emitted, and the rendered text used
/// for width accounting.
#[derive(Debug)]
pub struct LineBuilder {
    width: usize,
    line_markup: String,
    line_render: String,
    pre_space: String,
    word_markup: String,
    word_render: String,
}

impl LineBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            line_markup: String::new(),
            line_render: String::new(),
            pre_space: String::new(),
            word_markup: String::new(),
            word_render: String::new(),
        }
    }

    /// Accumulates a non-space token onto the pending word.
    pub fn append(&mut self, token: &Token) {
        self.word_markup.push_str(&token.markup());
        self.word_render.push_str(&token.render());
    }

    /// Closes the pending word, using `next_space` as the separator before
    /// the word that follows it.
    ///
    /// Returns a completed output line if appending the pending space and
    /// word would push the rendered line past the width limit. A pending
    /// word that renders to nothing (attributes only) stays pending.
    pub fn complete_word(&mut self, next_space: &str) -> Option<String> {
        if self.line_render.is_empty() && self.word_render.is_empty() {
            return None;
        }

        let candidate = rendered_width(&self.line_render)
            + rendered_width(&self.pre_space)
            + rendered_width(&self.word_render);

        let flushed = if candidate > self.width {
            // Over length: emit the line as-is and start a new one with just
            // the pending word. The pending space is dropped, not carried.
            self.take_line()
        } else {
            self.line_markup.push_str(&self.pre_space);
            self.line_render.push_str(&self.pre_space);
            None
        };

        self.line_markup.push_str(&self.word_markup);
        self.line_render.push_str(&self.word_render);
        self.word_markup.clear();
        self.word_render.clear();

        self.pre_space.clear();
        self.pre_space.push_str(next_space);

        flushed
    }

    /// Force-emits whatever is in the line buffer, clearing state.
    /// Used at paragraph end.
    pub fn flush(&mut self) -> Option<String> {
        self.take_line()
    }

    fn take_line(&mut self) -> Option<String> {
        if self.line_markup.is_empty() {
            return None;
        }
        self.line_render.clear();
        self.pre_space.clear();
        Some(std::mem::take(&mut self.line_markup))
    }
}
