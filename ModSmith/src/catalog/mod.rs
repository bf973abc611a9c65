//! Standard game data schemas
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Declarations for the `.lsx` documents mods most often add to or merge
//! into, registered into a [`Registry`] in a fixed order.
//!
//! ```no_run
//! use modsmith::catalog;
//!
//! let catalog = catalog::standard()?;
//! let doc = catalog.registry().load("Shared/Public/Shared/Lists/SpellLists.lsx")?;
//! println!("{} spell lists", doc.children().len());
//! # Ok::<(), modsmith::Error>(())
//! ```

mod classes;
mod feats;
mod lists;
mod meta;
mod races;
mod tags;

use std::sync::OnceLock;

pub use classes::Classes;
pub use feats::Feats;
pub use lists::Lists;
pub use meta::{Meta, ModuleMeta, int64_to_version, version_to_int64};
pub use races::Races;
pub use tags::Tags;

use crate::error::Result;
use crate::formats::lsx::LsxVersion;
use crate::schema::Registry;

/// `<version>` written by the current game release.
pub const LSX_VERSION: LsxVersion = LsxVersion::new(4, 0, 9, 331);

static STANDARD: OnceLock<Catalog> = OnceLock::new();

/// All standard node and document types plus a registry holding them.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub tags: Tags,
    pub lists: Lists,
    pub races: Races,
    pub classes: Classes,
    pub feats: Feats,
    pub meta: Meta,
    registry: Registry,
}

impl Catalog {
    /// Declare every standard schema and register its document types.
    ///
    /// # Errors
    /// Returns a schema definition error if the declarations conflict.
    pub fn build() -> Result<Self> {
        let tags = tags::build()?;
        let lists = lists::build()?;
        let races = races::build()?;
        let classes = classes::build()?;
        let feats = feats::build()?;
        let meta = meta::build()?;

        let mut registry = Registry::new();
        for doc_type in [
            &tags.document,
            &lists.spell_lists,
            &lists.passive_lists,
            &races.document,
            &classes.class_descriptions,
            &classes.progressions,
            &feats.feats,
            &feats.feat_descriptions,
            &meta.document,
        ] {
            registry.register(doc_type)?;
        }

        Ok(Self {
            tags,
            lists,
            races,
            classes,
            feats,
            meta,
            registry,
        })
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// The shared standard catalog, built on first use.
///
/// # Errors
/// See [`Catalog::build`].
pub fn standard() -> Result<&'static Catalog> {
    if let Some(catalog) = STANDARD.get() {
        return Ok(catalog);
    }
    let catalog = Catalog::build()?;
    Ok(STANDARD.get_or_init(|| catalog))
}
