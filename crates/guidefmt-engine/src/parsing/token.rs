/// A single markup token from one line of guide source.
///
/// Tokens are immutable once produced. Each token can regenerate its markup
/// form (in canonical spelling) and its rendered form — the text the viewer
/// would put on screen, used only for width accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An inline link: `@{"TEXT" LINK TARGET}`.
    Link { text: String, target: String },
    /// A formatting attribute: `@{b}`, `@{h1}`, ... Zero display width.
    Attribute(String),
    /// An escaped literal character: `@@`, `@(`, ...
    /// Holds the character as written after the `@`.
    Literal(char),
    /// A run of characters containing neither `@` nor spaces.
    Word(String),
    /// A run of one or more spaces.
    Spaces(usize),
}

/// The glyph that the `@(` escape renders to.
pub const COPYRIGHT_SIGN: char = '\u{a9}';

impl Token {
    /// The canonical markup spelling of this token.
    pub fn markup(&self) -> String {
        match self {
            Token::Link { text, target } => link_markup(text, target),
            Token::Attribute(code) => format!("@{{{code}}}"),
            Token::Literal(c) => format!("@{c}"),
            Token::Word(w) => w.clone(),
            Token::Spaces(n) => " ".repeat(*n),
        }
    }

    /// The text this token occupies on screen.
    pub fn render(&self) -> String {
        match self {
            Token::Link { text, .. } => text.clone(),
            Token::Attribute(_) => String::new(),
            Token::Literal('(') => COPYRIGHT_SIGN.to_string(),
            Token::Literal(c) => c.to_string(),
            Token::Word(w) => w.clone(),
            Token::Spaces(n) => " ".repeat(*n),
        }
    }
}

/// Builds the markup for a link with the given display text and target.
pub fn link_markup(text: &str, target: &str) -> String {
    format!("@{{\"{text}\" LINK {target}}}")
}

/// Display width of already-rendered text, in characters.
pub fn rendered_width(s: &str) -> usize {
    s.chars().count()
}
