//! File format handlers
//!
//! Only the XML document format (`.lsx`) is handled here; the typed layer on
//! top of it lives in [`crate::schema`].

pub mod lsx;

pub use lsx::{LsxAttribute, LsxDocument, LsxNode, LsxRegion, LsxVersion};
