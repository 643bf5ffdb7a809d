use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use log::{debug, warn};
use regex::Regex;

use crate::models::links::{LinkKind, LinkState, NodeMap};
use crate::models::node::Node;
use crate::parsing::ParseError;

/// Document-level commands, in the order they are written to output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DocCommand {
    Title,
    Author,
    Copyright,
    Version,
    Date,
    Build,
    Index,
}

impl DocCommand {
    pub const ALL: [DocCommand; 7] = [
        DocCommand::Title,
        DocCommand::Author,
        DocCommand::Copyright,
        DocCommand::Version,
        DocCommand::Date,
        DocCommand::Build,
        DocCommand::Index,
    ];
}

impl fmt::Display for DocCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocCommand::Title => "title",
            DocCommand::Author => "author",
            DocCommand::Copyright => "copyright",
            DocCommand::Version => "version",
            DocCommand::Date => "date",
            DocCommand::Build => "build",
            DocCommand::Index => "index",
        };
        f.write_str(name)
    }
}

/// Structural failure while reading a document. Unlike the recoverable
/// problems recorded as warnings, these abort processing of the input.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("navigational link outside any node: {0}")]
    LinkOutsideNode(String),
}

/// One guide source file: document commands, nodes in source order, and the
/// warnings collected while building it.
#[derive(Debug, Clone)]
pub struct Document {
    name: String,
    commands: BTreeMap<DocCommand, String>,
    nodes: Vec<Node>,
    warnings: Vec<String>,
}

fn node_line_regex() -> &'static Regex {
    static NODE: OnceLock<Regex> = OnceLock::new();
    NODE.get_or_init(|| Regex::new(r"^@node (\S+)").expect("invalid node regex"))
}

fn nav_line_regex() -> &'static Regex {
    static NAV: OnceLock<Regex> = OnceLock::new();
    NAV.get_or_init(|| Regex::new(r"^@(prev|next|toc|index) (\S+)").expect("invalid nav regex"))
}

fn doc_cmd_regex() -> &'static Regex {
    static CMD: OnceLock<Regex> = OnceLock::new();
    CMD.get_or_init(|| {
        Regex::new(r"^@(title|author|copyright|version|date|build|index)(?: (.+))?$")
            .expect("invalid command regex")
    })
}

/// Separator lines (`@----`) and remarks (`@rem ...`) carry no content.
fn is_ignored_line(line: &str) -> bool {
    static IGNORE: OnceLock<Regex> = OnceLock::new();
    IGNORE
        .get_or_init(|| Regex::new(r"^@(?:-+|rem\s)").expect("invalid ignore regex"))
        .is_match(line)
}

impl Document {
    /// Parses raw source lines into a document.
    ///
    /// The name is the source file name with a `.gde` suffix stripped; it
    /// becomes the document part of qualified links from other guides.
    pub fn parse<I, S>(name: &str, lines: I) -> Result<Self, DocumentError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = Self {
            name: normalize_name(name),
            commands: BTreeMap::new(),
            nodes: Vec::new(),
            warnings: Vec::new(),
        };
        debug!("parsing document: {}", doc.name);

        let mut current: Option<Node> = None;

        for raw in lines {
            let line = raw.as_ref().trim_end();

            if is_ignored_line(line) {
                continue;
            }

            if let Some(caps) = node_line_regex().captures(line) {
                if let Some(mut node) = current.take() {
                    node.trim_trailing_blanks();
                    doc.nodes.push(node);
                }
                current = Some(Node::new(&caps[1]));
                continue;
            }

            match current.as_mut() {
                Some(node) => {
                    // Position disambiguates `@index`: inside a node it is
                    // the navigational link, not the document command.
                    if let Some(caps) = nav_line_regex().captures(line) {
                        let kind = LinkKind::parse(&caps[1]).expect("regex matches only kinds");
                        node.set_link(kind, LinkState::from_source(&caps[2]));
                    } else if doc_cmd_regex().is_match(line) {
                        node.add_warning(format!("document token: '{line}' in node - ignored"));
                    } else {
                        node.push_line(line);
                    }
                }
                None => {
                    if let Some(caps) = doc_cmd_regex().captures(line) {
                        let cmd = parse_doc_command(&caps[1]);
                        let value = caps.get(2).map_or("", |m| m.as_str());
                        doc.commands.insert(cmd, value.to_string());
                    } else if nav_line_regex().is_match(line) {
                        return Err(DocumentError::LinkOutsideNode(line.to_string()));
                    } else if !line.is_empty() {
                        doc.add_warning(format!("text before first node - ignored: {line}"));
                    }
                }
            }
        }

        if let Some(mut node) = current.take() {
            node.trim_trailing_blanks();
            doc.nodes.push(node);
        }

        Ok(doc)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn command(&self, cmd: DocCommand) -> Option<&str> {
        self.commands.get(&cmd).map(String::as_str)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(Node::name)
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name() == name)
    }

    /// The node declared as this document's index, if any.
    pub fn index_node_name(&self) -> Option<&str> {
        self.command(DocCommand::Index).filter(|v| !v.is_empty())
    }

    /// Names of the nodes contributing index entries: the declared index
    /// node plus any configured subindex names present in this document.
    pub fn index_node_names(&self, subindexes: &[String]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        if let Some(index) = self.index_node_name()
            && self.nodes.iter().any(|n| n.name() == index)
        {
            names.push(index.to_string());
        }
        for sub in subindexes {
            if self.nodes.iter().any(|n| n.name() == sub) && !names.contains(sub) {
                names.push(sub.clone());
            }
        }
        names
    }

    pub fn add_warning(&mut self, warning: String) {
        warn!("document {}: {warning}", self.name);
        self.warnings.push(warning);
    }

    /// This document's warnings followed by its nodes' warnings, each
    /// prefixed with the node it belongs to.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self.warnings.clone();
        for node in &self.nodes {
            warnings.extend(
                node.warnings()
                    .iter()
                    .map(|w| format!("node: @{} {w}", node.name())),
            );
        }
        warnings
    }

    /// Fills in missing navigational links from document order:
    ///
    /// - `prev` defaults to the preceding node
    /// - `next` defaults to the following node
    /// - `toc` propagates forward from the nearest node that set one
    ///
    /// Explicit links and sentinels are left untouched; a sentinel `toc`
    /// also propagates, keeping the suppression in force for the nodes
    /// after it.
    pub fn set_default_links(&mut self) {
        debug!("completing default links: {}", self.name);

        let mut prev: Option<String> = None;
        let mut toc = LinkState::Unset;
        for node in &mut self.nodes {
            if let Some(p) = &prev {
                node.set_default_link(LinkKind::Prev, &LinkState::Target(p.clone()));
            }
            node.set_default_link(LinkKind::Toc, &toc);
            prev = Some(node.name().to_string());
            toc = node.link(LinkKind::Toc).clone();
        }

        let mut next: Option<String> = None;
        for node in self.nodes.iter_mut().rev() {
            if let Some(n) = &next {
                node.set_default_link(LinkKind::Next, &LinkState::Target(n.clone()));
            }
            next = Some(node.name().to_string());
        }
    }

    /// Verifies that every navigational link and the document's own index
    /// command point at nodes that exist — locally, or anywhere in the set
    /// when a set-wide map is supplied. Broken targets warn; qualified
    /// `Document/Node` targets are trusted.
    pub fn check_links(&mut self, set_map: Option<&NodeMap>) {
        let names: Vec<&str> = self.nodes.iter().map(Node::name).collect();
        let exists =
            |target: &str| names.contains(&target) || set_map.is_some_and(|m| m.contains(target));

        let mut broken = Vec::new();

        if let Some(index) = self.index_node_name()
            && !exists(index)
        {
            broken.push(format!("index link to non-existent node: @{index}"));
        }

        for node in &self.nodes {
            for kind in LinkKind::ALL {
                if let Some(target) = node.link(kind).target()
                    && !target.contains('/')
                    && !exists(target)
                {
                    broken.push(format!(
                        "node: @{} link: {kind} to non-existent node: @{target}",
                        node.name()
                    ));
                }
            }
        }

        for warning in broken {
            self.add_warning(warning);
        }
    }

    /// Renders the whole document: command lines in vocabulary order, then
    /// each node behind a blank line and a dashed separator.
    pub fn format(
        &mut self,
        node_docs: &NodeMap,
        width: usize,
    ) -> Result<Vec<String>, ParseError> {
        let mut out = Vec::new();

        for cmd in DocCommand::ALL {
            if let Some(value) = self.commands.get(&cmd) {
                if value.is_empty() {
                    out.push(format!("@{cmd}"));
                } else {
                    out.push(format!("@{cmd} {value}"));
                }
            }
        }

        let name = self.name.clone();
        for node in &mut self.nodes {
            out.push(String::new());
            out.push(separator_line(width));
            out.extend(node.format(&name, node_docs, width)?);
        }

        Ok(out)
    }
}

/// The `@----` rule emitted between nodes.
pub fn separator_line(width: usize) -> String {
    format!("@{}", "-".repeat(width.saturating_sub(1)))
}

fn normalize_name(name: &str) -> String {
    name.strip_suffix(".gde").unwrap_or(name).to_string()
}

fn parse_doc_command(word: &str) -> DocCommand {
    match word {
        "title" => DocCommand::Title,
        "author" => DocCommand::Author,
        "copyright" => DocCommand::Copyright,
        "version" => DocCommand::Version,
        "date" => DocCommand::Date,
        "build" => DocCommand::Build,
        "index" => DocCommand::Index,
        _ => unreachable!("regex matches only known commands"),
    }
}
