//! # ModSmith
//!
//! Typed authoring of Baldur's Gate 3 `.lsx` game data for mods.
//!
//! ## Overview
//!
//! - **Schema** - node types with typed attributes and permitted children,
//!   document types mapping node types to regions and output paths
//! - **Registry** - routes a flat list of nodes into their target files and
//!   picks the document type when loading by region id
//! - **Catalog** - declarations for the commonly modded game documents
//! - **Archive lookup** - resolves `archive/relative/path` game files from an
//!   unpacked game data directory, with a modification-time keyed cache
//!
//! ## Quick Start
//!
//! ```no_run
//! use modsmith::prelude::*;
//!
//! let catalog = catalog::standard()?;
//! let tag = Node::new(&catalog.tags.tag)
//!     .attr("Name", "MYMOD_TAG")?
//!     .attr("UUID", ids::new_guid())?;
//!
//! let vars = PathVars::from([("folder".to_string(), "MyMod".to_string())]);
//! catalog.registry().save([tag], "build/", None, &vars)?;
//! # Ok::<(), modsmith::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `modsmith` command-line binary

pub mod archive;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod formats;
pub mod ids;
pub mod schema;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::formats::lsx::{LsxDocument, LsxNode, LsxVersion};
    pub use crate::schema::attribute::*;
    pub use crate::schema::{
        ChildCollection, Document, DocumentType, Node, NodeType, PathVars, Registry,
    };

    pub use crate::archive::{ArchiveSource, UnpackedArchives};
    pub use crate::cache::DocumentCache;
    pub use crate::config::ProjectManifest;
    pub use crate::{catalog, ids};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
