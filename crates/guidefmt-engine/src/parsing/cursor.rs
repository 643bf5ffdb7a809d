/// A cursor for byte-by-byte scanning of a single source line.
///
/// All markup delimiters are ASCII, so byte positions are always valid
/// slice boundaries even when the surrounding text is multi-byte UTF-8.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The line being scanned.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s`.
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Returns true if at end of line.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Consumes the current byte only if it equals `b`.
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    /// Consumes a run of bytes matching `pred`, returning its length.
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let start = self.i;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.i += 1;
        }
        self.i - start
    }

    /// Returns the slice consumed between `start` and the current position.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.s[start..self.i]
    }

    /// Returns the unconsumed remainder of the line.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'h'));
        assert!(cur.eat(b'h'));
        assert_eq!(cur.i, 1);
    }

    #[test]
    fn empty_input() {
        let mut cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert!(!cur.eat(b'x'));
    }

    #[test]
    fn eat_matches_only_expected_byte() {
        let mut cur = Cursor::new("@x");
        assert!(cur.eat(b'@'));
        assert!(!cur.eat(b'@'));
        assert!(cur.eat(b'x'));
        assert!(cur.eof());
    }

    #[test]
    fn eat_while_counts_run() {
        let mut cur = Cursor::new("   word");
        assert_eq!(cur.eat_while(|b| b == b' '), 3);
        assert_eq!(cur.peek(), Some(b'w'));
        assert_eq!(cur.eat_while(|b| b == b' '), 0);
    }

    #[test]
    fn slice_from_returns_consumed_text() {
        let mut cur = Cursor::new("word rest");
        let start = cur.i;
        cur.eat_while(|b| b != b' ');
        assert_eq!(cur.slice_from(start), "word");
        assert_eq!(cur.rest(), " rest");
    }

    #[test]
    fn multibyte_text_between_ascii_delimiters() {
        let mut cur = Cursor::new("naïve ");
        let start = cur.i;
        cur.eat_while(|b| b != b' ');
        assert_eq!(cur.slice_from(start), "naïve");
        assert!(cur.eat(b' '));
        assert!(cur.eof());
    }
}
