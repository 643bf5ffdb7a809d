use regex::Regex;
use std::sync::OnceLock;

/// Matches lines which must pass through to the output verbatim, without
/// being reflowed:
///
/// - lines with leading whitespace
/// - lines containing a run of 3+ whitespace characters
/// - lines carrying a header attribute (`@{h1}`..`@{h9}`) anywhere
/// - lines opening with centred (`@{c}`) or right-justified (`@{r}`) text
/// - lines consisting solely of a single link token
fn literal_line_regex() -> &'static Regex {
    static LITERAL_LINE: OnceLock<Regex> = OnceLock::new();
    LITERAL_LINE.get_or_init(|| {
        Regex::new(
            r#"^(?:\s+|.+\s{3,}|.*@\{h\d\}|@\{[cr]\}|@\{ *"[^"]+" LINK [^ }]+ *\}$)"#,
        )
        .expect("invalid literal-line regex")
    })
}

/// Returns true if `line` is excluded from word-wrap reflow.
///
/// The empty line is not matched here; callers treat it as its own case,
/// emitted verbatim like a literal line.
pub fn is_literal_line(line: &str) -> bool {
    literal_line_regex().is_match(line)
}
