//! Guide structure: navigational links, nodes, documents, document sets,
//! and the consolidated index.

pub mod document;
pub mod index;
pub mod links;
pub mod node;
pub mod set;

pub use document::{DocCommand, Document, DocumentError};
pub use index::{Index, IndexEntry, IndexOptions, MAX_INDEX_REFS};
pub use links::{LINK_SENTINEL, LinkKind, LinkState, NavLinks, NodeMap};
pub use node::Node;
pub use set::DocumentSet;
