//! LSX (XML) format module
//!
//! An untyped element tree mirroring the `.lsx` envelope, plus a strict
//! reader and an indenting writer.

mod document;
mod reader;
mod writer;

pub use document::{LsxAttribute, LsxDocument, LsxNode, LsxRegion, LsxVersion};
pub use reader::{parse_lsx, read_lsx};
pub use writer::{PROLOGUE, serialize_lsx, serialize_node_compact, write_lsx, write_lsx_text};
