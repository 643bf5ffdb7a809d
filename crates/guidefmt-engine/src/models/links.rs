use std::collections::BTreeMap;
use std::fmt;

/// The four navigational link kinds a node can carry. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Prev,
    Next,
    Toc,
    Index,
}

impl LinkKind {
    /// All kinds, in the order their command lines are emitted.
    pub const ALL: [LinkKind; 4] = [
        LinkKind::Prev,
        LinkKind::Next,
        LinkKind::Toc,
        LinkKind::Index,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "prev" => Some(LinkKind::Prev),
            "next" => Some(LinkKind::Next),
            "toc" => Some(LinkKind::Toc),
            "index" => Some(LinkKind::Index),
            _ => None,
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkKind::Prev => "prev",
            LinkKind::Next => "next",
            LinkKind::Toc => "toc",
            LinkKind::Index => "index",
        };
        f.write_str(name)
    }
}

/// State of one navigational link.
///
/// `Sentinel` records an explicit `-` in the source: the author opted out,
/// so no default may be filled in and no link line is emitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Unset,
    Sentinel,
    Target(String),
}

/// The sentinel spelling in guide source.
pub const LINK_SENTINEL: &str = "-";

impl LinkState {
    /// Interprets a target name from a link command line.
    pub fn from_source(name: &str) -> Self {
        if name == LINK_SENTINEL {
            LinkState::Sentinel
        } else {
            LinkState::Target(name.to_string())
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, LinkState::Unset)
    }

    /// The target name, if this link points at one.
    pub fn target(&self) -> Option<&str> {
        match self {
            LinkState::Target(name) => Some(name),
            _ => None,
        }
    }
}

/// A node's navigational links as a fixed record, one field per kind.
#[derive(Debug, Clone, Default)]
pub struct NavLinks {
    prev: LinkState,
    next: LinkState,
    toc: LinkState,
    index: LinkState,
}

impl NavLinks {
    pub fn get(&self, kind: LinkKind) -> &LinkState {
        match kind {
            LinkKind::Prev => &self.prev,
            LinkKind::Next => &self.next,
            LinkKind::Toc => &self.toc,
            LinkKind::Index => &self.index,
        }
    }

    /// Sets a link unconditionally. Used for explicit link commands, which
    /// always win over defaults.
    pub fn set(&mut self, kind: LinkKind, state: LinkState) {
        *self.slot(kind) = state;
    }

    /// Fills a link only if it is still unset. A `Sentinel` already present
    /// blocks the default; an `Unset` incoming state fills nothing.
    pub fn set_default(&mut self, kind: LinkKind, state: &LinkState) {
        let slot = self.slot(kind);
        if slot.is_unset() && !state.is_unset() {
            *slot = state.clone();
        }
    }

    fn slot(&mut self, kind: LinkKind) -> &mut LinkState {
        match kind {
            LinkKind::Prev => &mut self.prev,
            LinkKind::Next => &mut self.next,
            LinkKind::Toc => &mut self.toc,
            LinkKind::Index => &mut self.index,
        }
    }
}

/// Maps every node name in a document set to the document that owns it.
/// Built once after all documents are read; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    nodes: BTreeMap<String, String>,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.nodes.contains_key(node)
    }

    /// The name of the document owning `node`, if any.
    pub fn document_of(&self, node: &str) -> Option<&str> {
        self.nodes.get(node).map(String::as_str)
    }

    /// Records `node` as owned by `doc`. Returns false if the name was
    /// already taken (the first definition wins).
    pub fn insert(&mut self, node: &str, doc: &str) -> bool {
        if self.nodes.contains_key(node) {
            return false;
        }
        self.nodes.insert(node.to_string(), doc.to_string());
        true
    }

    /// Qualifies a link target found in `doc_name`.
    ///
    /// A target already carrying a `Document/` qualifier is trusted and left
    /// alone. A local target stays unqualified; a target owned by another
    /// document gains its `Document/` prefix. Returns `None` when the target
    /// names no known node.
    pub fn qualify(&self, doc_name: &str, target: &str) -> Option<String> {
        if target.contains('/') {
            return Some(target.to_string());
        }
        let owner = self.nodes.get(target)?;
        if owner == doc_name {
            Some(target.to_string())
        } else {
            Some(format!("{owner}/{target}"))
        }
    }

    /// All `(node name, document name)` pairs, sorted by node name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().map(|(n, d)| (n.as_str(), d.as_str()))
    }
}
