use log::{debug, warn};

use crate::models::document::Document;
use crate::models::index::{Index, IndexOptions, MAX_INDEX_REFS};
use crate::models::links::NodeMap;
use crate::parsing::{ParseError, readable_line};

/// A group of documents processed together: cross-document links resolve
/// against the whole set, and index nodes can be consolidated across it.
///
/// Processing is two-phase. All documents are added first, building the
/// set-wide node map; only then does [`DocumentSet::resolve`] complete
/// default links and check targets, since neither is well-defined until
/// every node name in the set is known.
#[derive(Debug, Default)]
pub struct DocumentSet {
    docs: Vec<Document>,
    node_docs: NodeMap,
    warnings: Vec<String>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document and registers its node names in the set-wide map.
    ///
    /// A name already claimed by an earlier document keeps its first owner;
    /// the collision warns unless the node is this document's own index
    /// node, since every guide in a set routinely carries one of those
    /// under the same name.
    pub fn add_document(&mut self, doc: Document) {
        debug!("adding document to set: {}", doc.name());

        for name in doc.node_names() {
            match self.node_docs.document_of(name).map(str::to_string) {
                Some(owner) => {
                    if doc.index_node_name() != Some(name) {
                        self.add_warning(format!(
                            "document: {} node: @{name} same name already exists in \
                             document: {owner} - ignoring",
                            doc.name()
                        ));
                    }
                }
                None => {
                    self.node_docs.insert(name, doc.name());
                }
            }
        }

        self.docs.push(doc);
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn node_map(&self) -> &NodeMap {
        &self.node_docs
    }

    /// Completes default navigational links and checks every link target
    /// against the set-wide node map.
    pub fn resolve(&mut self) {
        let Self {
            docs, node_docs, ..
        } = self;
        for doc in docs.iter_mut() {
            doc.set_default_links();
            doc.check_links(Some(node_docs));
        }
    }

    /// Merges the index nodes of every document into one set-wide index and
    /// writes the result back over each document's declared index node.
    ///
    /// Subindex nodes named in the options contribute their entries but
    /// keep their own bodies. Reference targets stay as parsed; they pick
    /// up any `Document/` qualification during formatting, in the context
    /// of whichever document the merged index lands in.
    pub fn consolidate_indices(&mut self, width: usize, options: &IndexOptions) {
        debug!("consolidating indices across {} documents", self.docs.len());

        let mut merged = Index::new();
        for doc in &mut self.docs {
            for name in doc.index_node_names(&options.subindexes) {
                if let Some(node) = doc.node_mut(&name) {
                    merged.merge(node.parse_index());
                }
            }
        }

        for warning in merged.take_warnings() {
            self.add_warning(warning);
        }
        let total = merged.total_refs();
        if total > MAX_INDEX_REFS {
            self.add_warning(format!(
                "consolidated index has {total} references - the viewer supports \
                 at most {MAX_INDEX_REFS}"
            ));
        }

        let body = merged.format(width, options);
        for doc in &mut self.docs {
            if let Some(declared) = doc.index_node_name().map(str::to_string)
                && let Some(node) = doc.node_mut(&declared)
            {
                node.replace_body(body.clone());
            }
        }
    }

    /// Formats every document, returning `(document name, output lines)`
    /// pairs in the order the documents were added.
    pub fn format(&mut self, width: usize) -> Result<Vec<(String, Vec<String>)>, ParseError> {
        let Self {
            docs, node_docs, ..
        } = self;
        let mut out = Vec::new();
        for doc in docs.iter_mut() {
            let lines = doc.format(node_docs, width)?;
            out.push((doc.name().to_string(), lines));
        }
        Ok(out)
    }

    /// Renders the whole set as plain text: markup stripped, links shown as
    /// `>text<`, index nodes and the node/link command lines dropped, one
    /// blank line between nodes.
    pub fn readable(&mut self, width: usize) -> Result<Vec<String>, ParseError> {
        let Self {
            docs, node_docs, ..
        } = self;
        let mut out = Vec::new();
        for doc in docs.iter_mut() {
            let index_node = doc.index_node_name().map(str::to_string);
            let name = doc.name().to_string();
            for node in doc.nodes_mut() {
                if index_node.as_deref() == Some(node.name()) {
                    continue;
                }
                if !out.is_empty() {
                    out.push(String::new());
                }
                for line in node.format_body(&name, node_docs, width)? {
                    out.push(readable_line(&line)?);
                }
            }
        }
        Ok(out)
    }

    /// `(node name, owning document)` pairs sorted by node name.
    pub fn node_listing(&self) -> Vec<(String, String)> {
        self.node_docs
            .entries()
            .map(|(node, doc)| (node.to_string(), doc.to_string()))
            .collect()
    }

    pub fn add_warning(&mut self, warning: String) {
        warn!("set: {warning}");
        self.warnings.push(warning);
    }

    /// Set-level warnings followed by each document's, prefixed with the
    /// document they belong to.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self.warnings.clone();
        for doc in &self.docs {
            warnings.extend(
                doc.warnings()
                    .iter()
                    .map(|w| format!("document: {} {w}", doc.name())),
            );
        }
        warnings
    }
}
