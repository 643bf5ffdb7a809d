use super::ParseError;
use super::cursor::Cursor;
use super::token::Token;

/// Splits one line of guide source into tokens.
///
/// Alternatives are tried in precedence order: link, attribute, literal
/// escape, word, space run. The grammar is exhaustive over well-formed
/// markup; the only way to fail is an `@{` sequence that closes as neither
/// a link nor an attribute, which is a [`ParseError::MalformedMarkup`].
pub fn tokenize_line(line: &str) -> Result<Vec<Token>, ParseError> {
    let mut cur = Cursor::new(line);
    let mut tokens = Vec::new();

    while !cur.eof() {
        if let Some(t) = try_parse_link(&mut cur) {
            tokens.push(t);
            continue;
        }
        if let Some(t) = try_parse_attribute(&mut cur) {
            tokens.push(t);
            continue;
        }
        if let Some(t) = try_parse_escape(&mut cur) {
            tokens.push(t);
            continue;
        }
        if let Some(t) = try_parse_word(&mut cur) {
            tokens.push(t);
            continue;
        }
        if let Some(t) = try_parse_spaces(&mut cur) {
            tokens.push(t);
            continue;
        }
        return Err(ParseError::MalformedMarkup(cur.rest().to_string()));
    }

    Ok(tokens)
}

/// Renders a whole line to the text it would occupy on screen.
pub fn render_line(line: &str) -> Result<String, ParseError> {
    let tokens = tokenize_line(line)?;
    Ok(tokens.iter().map(Token::render).collect())
}

/// Renders a line to plain text with link display text wrapped in `>...<`,
/// standing in for the viewer's link highlighting.
pub fn readable_line(line: &str) -> Result<String, ParseError> {
    let mut out = String::new();
    for token in tokenize_line(line)? {
        match token {
            Token::Link { text, .. } => {
                out.push('>');
                out.push_str(&text);
                out.push('<');
            }
            other => out.push_str(&other.render()),
        }
    }
    Ok(out)
}

/// Attempts to parse `@{ "TEXT" LINK TARGET }` at the current position.
///
/// Spaces are allowed after `{` and before `}`; exactly one space surrounds
/// the `LINK` keyword. On failure the cursor is restored.
fn try_parse_link(cur: &mut Cursor<'_>) -> Option<Token> {
    let saved = cur.clone();

    if !(cur.eat(b'@') && cur.eat(b'{')) {
        *cur = saved;
        return None;
    }
    cur.eat_while(|b| b == b' ');

    if !cur.eat(b'"') {
        *cur = saved;
        return None;
    }
    let text_start = cur.i;
    cur.eat_while(|b| b != b'"');
    let text = cur.slice_from(text_start).to_string();
    if text.is_empty() || !cur.eat(b'"') {
        *cur = saved;
        return None;
    }

    if !cur.rest().starts_with(" LINK ") {
        *cur = saved;
        return None;
    }
    cur.i += " LINK ".len();

    let target_start = cur.i;
    cur.eat_while(|b| b != b' ' && b != b'}');
    let target = cur.slice_from(target_start).to_string();
    if target.is_empty() {
        *cur = saved;
        return None;
    }

    cur.eat_while(|b| b == b' ');
    if !cur.eat(b'}') {
        *cur = saved;
        return None;
    }

    Some(Token::Link { text, target })
}

/// Attempts to parse an attribute `@{code}` (word characters only).
fn try_parse_attribute(cur: &mut Cursor<'_>) -> Option<Token> {
    let saved = cur.clone();

    if !(cur.eat(b'@') && cur.eat(b'{')) {
        *cur = saved;
        return None;
    }
    let code_start = cur.i;
    cur.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
    let code = cur.slice_from(code_start).to_string();
    if code.is_empty() || !cur.eat(b'}') {
        *cur = saved;
        return None;
    }

    Some(Token::Attribute(code))
}

/// Attempts to parse an escaped literal character: `@` followed by any
/// character other than `{`.
fn try_parse_escape(cur: &mut Cursor<'_>) -> Option<Token> {
    let saved = cur.clone();

    if !cur.eat(b'@') {
        return None;
    }
    match cur.rest().chars().next() {
        Some(c) if c != '{' => {
            cur.i += c.len_utf8();
            Some(Token::Literal(c))
        }
        _ => {
            *cur = saved;
            None
        }
    }
}

/// Attempts to parse a run of non-space, non-`@` characters.
fn try_parse_word(cur: &mut Cursor<'_>) -> Option<Token> {
    let start = cur.i;
    cur.eat_while(|b| b != b'@' && b != b' ');
    if cur.i == start {
        return None;
    }
    Some(Token::Word(cur.slice_from(start).to_string()))
}

/// Attempts to parse a run of one or more spaces.
fn try_parse_spaces(cur: &mut Cursor<'_>) -> Option<Token> {
    let n = cur.eat_while(|b| b == b' ');
    if n == 0 {
        return None;
    }
    Some(Token::Spaces(n))
}
