use std::sync::OnceLock;

use log::warn;
use regex::{Captures, Regex};

use crate::models::links::{LinkKind, LinkState, NavLinks, NodeMap};
use crate::models::index::Index;
use crate::parsing::{ParseError, Token, is_literal_line, link_markup, tokenize_line};
use crate::wrap::LineBuilder;

/// A node (one page) of a guide document.
///
/// Created when a `@node` line is parsed, mutated while the document is
/// read and again by the resolution passes, then rendered to output lines.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    lines: Vec<String>,
    links: NavLinks,
    warnings: Vec<String>,
}

impl Node {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            lines: Vec::new(),
            links: NavLinks::default(),
            warnings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a raw body line.
    pub fn push_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Drops trailing blank body lines. Called when the node is closed, so
    /// the blank line the writer emits before each node separator does not
    /// accumulate across repeated formatting runs.
    pub fn trim_trailing_blanks(&mut self) {
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn link(&self, kind: LinkKind) -> &LinkState {
        self.links.get(kind)
    }

    /// Sets a navigational link from an explicit command line.
    pub fn set_link(&mut self, kind: LinkKind, state: LinkState) {
        self.links.set(kind, state);
    }

    /// Fills a navigational link from the default-completion pass; explicit
    /// links and sentinels are never overwritten.
    pub fn set_default_link(&mut self, kind: LinkKind, state: &LinkState) {
        self.links.set_default(kind, state);
    }

    pub fn add_warning(&mut self, warning: String) {
        warn!("node @{}: {warning}", self.name);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Parses this node's body as index entries. Warnings raised while
    /// parsing attach to this node.
    pub fn parse_index(&mut self) -> Index {
        let mut index = Index::new();
        let mut prev_term: Option<String> = None;
        for line in &self.lines {
            prev_term = index.parse_line(line, prev_term.as_deref());
        }
        self.warnings.extend(index.take_warnings());
        index
    }

    /// Replaces the body with regenerated lines (index consolidation).
    pub fn replace_body(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// Renders the node to output lines: the `@node` header, one command
    /// line per navigational link that points at a target, then the
    /// formatted body.
    pub fn format(
        &mut self,
        doc_name: &str,
        node_docs: &NodeMap,
        width: usize,
    ) -> Result<Vec<String>, ParseError> {
        let mut out = self.format_headers();
        out.extend(self.format_body(doc_name, node_docs, width)?);
        Ok(out)
    }

    fn format_headers(&self) -> Vec<String> {
        let mut out = vec![format!("@node {}", self.name)];
        for kind in LinkKind::ALL {
            if let LinkState::Target(target) = self.links.get(kind) {
                out.push(format!("@{kind} {target}"));
            }
        }
        out
    }

    /// Formats the body alone: link targets rewritten, literal lines passed
    /// through verbatim, everything else reflowed to `width` columns.
    pub fn format_body(
        &mut self,
        doc_name: &str,
        node_docs: &NodeMap,
        width: usize,
    ) -> Result<Vec<String>, ParseError> {
        let mut out = Vec::new();
        let mut builder = LineBuilder::new(width);

        for raw in &self.lines {
            let line = rewrite_links(raw, doc_name, node_docs, &mut self.warnings);

            if line.is_empty() || is_literal_line(&line) {
                if let Some(done) = builder.flush() {
                    out.push(done);
                }
                out.push(line);
                continue;
            }

            for token in tokenize_line(&line)? {
                match token {
                    Token::Spaces(n) => {
                        if let Some(done) = builder.complete_word(&" ".repeat(n)) {
                            out.push(done);
                        }
                    }
                    t => builder.append(&t),
                }
            }
            // End of a source line joins onto the next with a single space,
            // which is how paragraphs reflow across input line boundaries.
            if let Some(done) = builder.complete_word(" ") {
                out.push(done);
            }
        }

        if let Some(done) = builder.flush() {
            out.push(done);
        }
        Ok(out)
    }
}

fn link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| {
        Regex::new(r#"@\{ *"([^"]+)" LINK ([^ }]+) *\}"#).expect("invalid link regex")
    })
}

/// Rewrites every link token on a line: targets in other documents gain
/// their `Document/` prefix, unknown targets are left alone with a warning.
/// Link markup comes back in canonical spelling either way.
fn rewrite_links(
    line: &str,
    doc_name: &str,
    node_docs: &NodeMap,
    warnings: &mut Vec<String>,
) -> String {
    link_regex()
        .replace_all(line, |caps: &Captures<'_>| {
            let text = &caps[1];
            let target = &caps[2];
            match node_docs.qualify(doc_name, target) {
                Some(fixed) => link_markup(text, &fixed),
                None => {
                    let warning = format!("link target: @{target} does not exist");
                    warn!("node: {warning}");
                    warnings.push(warning);
                    link_markup(text, target)
                }
            }
        })
        .into_owned()
}
