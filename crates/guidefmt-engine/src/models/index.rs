use std::sync::OnceLock;

use log::warn;
use regex::Regex;

use crate::parsing::{link_markup, render_line, rendered_width};

/// Warn when a consolidated index carries more reference links than the
/// viewer can follow from one node.
pub const MAX_INDEX_REFS: usize = 255;

/// Tunables for index consolidation.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Leading prefixes stripped from a term for sorting and grouping only,
    /// never from the displayed term.
    pub ignore_prefixes: Vec<String>,
    /// Extra node names (besides each document's declared index node) whose
    /// bodies contribute index entries.
    pub subindexes: Vec<String>,
    /// Column where the references start.
    pub refs_indent: usize,
    /// Minimum gap between a term and its references; a term too wide to
    /// leave this gap pushes its references onto the following line.
    pub refs_gap: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            ignore_prefixes: Vec::new(),
            subindexes: Vec::new(),
            refs_indent: 20,
            refs_gap: 3,
        }
    }
}

/// One index term: the displayed text, an optional primary definition
/// target, and the reference links collected for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub term: String,
    pub target: Option<String>,
    /// `(display text, target)` pairs, in discovery order, duplicates kept.
    pub refs: Vec<(String, String)>,
}

/// Index entries parsed from one or more index nodes.
///
/// Entries keep first-seen order until [`Index::format`] sorts them.
#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: Vec<IndexEntry>,
    warnings: Vec<String>,
}

fn index_link_regex() -> &'static Regex {
    static LINK: OnceLock<Regex> = OnceLock::new();
    LINK.get_or_init(|| {
        Regex::new(r#"^@\{ *"([^"]+)" LINK ([^ }]+) *\}"#).expect("invalid link regex")
    })
}

fn static_term_regex() -> &'static Regex {
    // A term may contain single or double internal spaces; a run of three
    // or more ends it (that run starts the references column).
    static TERM: OnceLock<Regex> = OnceLock::new();
    TERM.get_or_init(|| Regex::new(r"^\S+(?:\s{1,2}\S+)*").expect("invalid term regex"))
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Total number of reference links across all entries.
    pub fn total_refs(&self) -> usize {
        self.entries.iter().map(|e| e.refs.len()).sum()
    }

    /// Removes and returns the warnings collected so far.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Parses one line of an index node.
    ///
    /// A line with 0-2 leading spaces starts a new term; one with 5 or more
    /// continues the references of `prev_term`. Returns the term this line
    /// contributed to, for use as the next line's `prev_term`.
    pub fn parse_line(&mut self, line: &str, prev_term: Option<&str>) -> Option<String> {
        if line.trim().is_empty() {
            return None;
        }

        let indent = line.len() - line.trim_start_matches(' ').len();
        let rest = &line[indent..];

        if indent >= 5 {
            // Continuation: the line holds only more references.
            let Some(term) = prev_term else {
                self.warn(format!("no term or previous term on index line: {line}"));
                return None;
            };
            let refs = self.parse_refs(rest, line);
            if refs.is_empty() {
                return None;
            }
            self.add_term(term, None, refs);
            return Some(term.to_string());
        }

        if indent > 2 {
            self.warn(format!("cannot parse index entry from line: {line}"));
            return None;
        }

        // New term: a single link token or static text.
        let (term_markup, term_target, after_term) =
            if let Some(caps) = index_link_regex().captures(rest) {
                let whole = caps.get(0).expect("capture 0 always present");
                (
                    caps[1].to_string(),
                    Some(caps[2].to_string()),
                    &rest[whole.end()..],
                )
            } else {
                let m = static_term_regex()
                    .find(rest)
                    .expect("non-blank line starts with non-space");
                (m.as_str().to_string(), None, &rest[m.end()..])
            };

        let term = match render_line(term_markup.trim()) {
            Ok(rendered) => rendered,
            Err(_) => {
                self.warn(format!("cannot parse index entry from line: {line}"));
                return None;
            }
        };

        let gap = after_term.len() - after_term.trim_start_matches(' ').len();
        let refs = if gap >= 3 {
            self.parse_refs(&after_term[gap..], line)
        } else {
            Vec::new()
        };

        // Neither a definition target nor references: plain text, not an
        // index entry.
        if term_target.is_none() && refs.is_empty() {
            return None;
        }

        self.add_term(&term, term_target, refs);
        Some(term)
    }

    /// Parses a comma-separated run of link tokens. Unparseable tails warn
    /// but keep whatever was parsed before them.
    fn parse_refs(&mut self, refs: &str, line: &str) -> Vec<(String, String)> {
        let mut out = Vec::new();
        let mut rest = refs;

        loop {
            let Some(caps) = index_link_regex().captures(rest) else {
                if !rest.trim().is_empty() {
                    self.warn(format!("cannot parse index references from line: {line}"));
                }
                break;
            };
            let whole = caps.get(0).expect("capture 0 always present");
            out.push((caps[1].trim().to_string(), caps[2].to_string()));

            rest = rest[whole.end()..].trim_start_matches(' ');
            match rest.strip_prefix(',') {
                Some(tail) => rest = tail.trim_start_matches(' '),
                None => {
                    if !rest.is_empty() {
                        self.warn(format!("cannot parse index references from line: {line}"));
                    }
                    break;
                }
            }
        }

        out
    }

    /// Adds references (and possibly a definition target) for a term,
    /// creating the entry if needed. References concatenate without
    /// deduplication; the first definition target wins.
    fn add_term(&mut self, term: &str, target: Option<String>, refs: Vec<(String, String)>) {
        let idx = match self.entries.iter().position(|e| e.term == term) {
            Some(idx) => idx,
            None => {
                self.entries.push(IndexEntry {
                    term: term.to_string(),
                    target: None,
                    refs: Vec::new(),
                });
                self.entries.len() - 1
            }
        };

        if let Some(target) = target {
            match &self.entries[idx].target {
                None => self.entries[idx].target = Some(target),
                Some(existing) if *existing != target => {
                    self.warn(format!(
                        "term: '{term}' with target: {target} already exists with \
                         different target: {existing}"
                    ));
                }
                Some(_) => {}
            }
        }

        self.entries[idx].refs.extend(refs);
    }

    /// Folds another index's entries into this one.
    pub fn merge(&mut self, other: Index) {
        for entry in other.entries {
            self.add_term(&entry.term, entry.target, entry.refs);
        }
        self.warnings.extend(other.warnings);
    }

    /// Renders the index as node body lines: terms sorted
    /// symbols-before-alphanumerics, references wrapped to `width` in a
    /// column at `refs_indent`, blank lines between letter groups.
    pub fn format(&self, width: usize, opts: &IndexOptions) -> Vec<String> {
        let mut sorted: Vec<&IndexEntry> = self.entries.iter().collect();
        sorted.sort_by_cached_key(|e| sort_key(&e.term, &opts.ignore_prefixes));

        let mut lines = Vec::new();
        let mut prev_group: Option<(bool, Option<char>)> = None;

        for entry in sorted {
            let stripped = strip_prefixes(&entry.term, &opts.ignore_prefixes);
            let group = group_of(stripped);
            if let Some(prev) = prev_group {
                if prev.0 != group.0 || (group.0 && prev.1 != group.1) {
                    lines.push(String::new());
                }
            }
            prev_group = Some(group);

            self.format_entry(entry, width, opts, &mut lines);
        }

        lines
    }

    fn format_entry(
        &self,
        entry: &IndexEntry,
        width: usize,
        opts: &IndexOptions,
        lines: &mut Vec<String>,
    ) {
        let term_markup = match &entry.target {
            Some(target) => link_markup(&entry.term, target),
            None => entry.term.clone(),
        };

        if entry.refs.is_empty() {
            lines.push(term_markup);
            return;
        }

        let term_width = rendered_width(&entry.term);
        let indent = " ".repeat(opts.refs_indent);

        let (mut line_markup, mut line_render) = if term_width + opts.refs_gap > opts.refs_indent {
            // Term too wide to leave the gap: references start on their own
            // line below it.
            lines.push(term_markup);
            (indent.clone(), indent.clone())
        } else {
            let tab = " ".repeat(opts.refs_indent - term_width);
            (
                format!("{term_markup}{tab}"),
                format!("{}{tab}", entry.term),
            )
        };

        let mut line_has_ref = false;
        for (i, (text, target)) in entry.refs.iter().enumerate() {
            let ref_text = format!(" {text} ");
            let ref_post = if i + 1 < entry.refs.len() { "," } else { "" };
            let mut ref_pre = if line_has_ref { " " } else { "" };

            let candidate = rendered_width(&line_render)
                + ref_pre.len()
                + rendered_width(&ref_text)
                + ref_post.len();
            if candidate > width {
                lines.push(std::mem::take(&mut line_markup));
                line_markup = indent.clone();
                line_render = indent.clone();
                ref_pre = "";
                line_has_ref = false;
            }

            line_markup.push_str(ref_pre);
            line_markup.push_str(&link_markup(&ref_text, target));
            line_markup.push_str(ref_post);
            line_render.push_str(ref_pre);
            line_render.push_str(&ref_text);
            line_render.push_str(ref_post);
            line_has_ref = true;
        }

        lines.push(line_markup);
    }

    fn warn(&mut self, warning: String) {
        warn!("index: {warning}");
        self.warnings.push(warning);
    }
}

/// Strips any configured ignorable prefixes from the front of a term.
/// Used for sorting and grouping only.
fn strip_prefixes<'a>(term: &'a str, prefixes: &[String]) -> &'a str {
    let mut stripped = term;
    'outer: loop {
        for prefix in prefixes {
            if !prefix.is_empty()
                && let Some(rest) = stripped.strip_prefix(prefix.as_str())
            {
                stripped = rest;
                continue 'outer;
            }
        }
        return stripped;
    }
}

/// Sort key: symbol-leading terms before alphanumeric-leading ones, then a
/// case-insensitive comparison of the stripped text, ties broken by the
/// literal term.
fn sort_key(term: &str, prefixes: &[String]) -> (bool, String, String) {
    let stripped = strip_prefixes(term, prefixes);
    let alnum = stripped
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric());
    (alnum, stripped.to_lowercase(), term.to_string())
}

/// Grouping identity for blank-line separation: alphanumeric-ness plus the
/// lowercased leading character of the stripped term.
fn group_of(stripped: &str) -> (bool, Option<char>) {
    let first = stripped.chars().next();
    let alnum = first.is_some_and(|c| c.is_ascii_alphanumeric());
    (alnum, first.map(|c| c.to_ascii_lowercase()))
}
