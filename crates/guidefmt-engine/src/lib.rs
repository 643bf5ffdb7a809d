pub mod io;
pub mod models;
pub mod parsing;
pub mod wrap;

// Re-export key types for easier usage
pub use io::*;
pub use models::{
    DocCommand, Document, DocumentError, DocumentSet, Index, IndexEntry, IndexOptions, LinkKind,
    LinkState, MAX_INDEX_REFS, NavLinks, Node, NodeMap,
};
pub use parsing::{ParseError, Token};
pub use wrap::{LineBuilder, MAX_LINE_WIDTH};
