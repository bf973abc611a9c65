//! Document registry
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Maps region ids to document types for loading, and node type names to
//! their owning document type for routing a flat pile of nodes into files.
//! A registry is filled once at startup and only read afterwards; the
//! process-wide instance lives behind [`install`] and [`global`].

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use super::document::{Document, DocumentLayout, DocumentType};
use super::node::Node;
use super::template::PathVars;
use crate::archive::ArchiveSource;
use crate::error::{Error, Result};
use crate::formats::lsx::{LsxDocument, LsxVersion, parse_lsx, read_lsx};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Region and ownership lookup tables.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    documents: Vec<Arc<DocumentType>>,
    by_region: HashMap<String, Arc<DocumentType>>,
    owners: HashMap<String, Arc<DocumentType>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a document type's region and top-level node types.
    ///
    /// Nothing is recorded unless every claim succeeds. Registering the same
    /// document type again is a no-op.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateRegion`] or [`Error::ConflictingOwner`].
    pub fn register(&mut self, doc_type: &Arc<DocumentType>) -> Result<()> {
        if self.documents.iter().any(|d| Arc::ptr_eq(d, doc_type)) {
            return Ok(());
        }

        if let Some(existing) = self.by_region.get(doc_type.region()) {
            return Err(Error::DuplicateRegion {
                region: doc_type.region().to_string(),
                existing: existing.name().to_string(),
                attempted: doc_type.name().to_string(),
            });
        }
        for node_type in doc_type.child_types() {
            if let Some(existing) = self.owners.get(node_type.name()) {
                return Err(Error::ConflictingOwner {
                    node_type: node_type.name().to_string(),
                    existing: existing.name().to_string(),
                    attempted: doc_type.name().to_string(),
                });
            }
        }

        self.by_region
            .insert(doc_type.region().to_string(), Arc::clone(doc_type));
        for node_type in doc_type.child_types() {
            self.owners
                .insert(node_type.name().to_string(), Arc::clone(doc_type));
        }
        self.documents.push(Arc::clone(doc_type));

        tracing::debug!(
            "Registered {} (region {}, {} node types)",
            doc_type.name(),
            doc_type.region(),
            doc_type.child_types().len()
        );
        Ok(())
    }

    /// Registered document types in registration order.
    #[must_use]
    pub fn document_types(&self) -> &[Arc<DocumentType>] {
        &self.documents
    }

    #[must_use]
    pub fn document_for_region(&self, region: &str) -> Option<&Arc<DocumentType>> {
        self.by_region.get(region)
    }

    /// The document type that owns the named node type.
    #[must_use]
    pub fn owner_of(&self, node_type: &str) -> Option<&Arc<DocumentType>> {
        self.owners.get(node_type)
    }

    /// Read a file, choosing its document type by region id.
    ///
    /// # Errors
    /// Fails on I/O or XML errors, an unregistered region, or any document
    /// validation error.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Document> {
        self.parse(&read_lsx(path)?)
    }

    /// Like [`load`](Self::load) for in-memory XML.
    ///
    /// # Errors
    /// See [`load`](Self::load).
    pub fn load_str(&self, content: &str) -> Result<Document> {
        self.parse(&parse_lsx(content)?)
    }

    /// Build a typed document from a parsed tree.
    ///
    /// # Errors
    /// Returns [`Error::RegionCount`], [`Error::UnknownRegion`] or a document
    /// validation error.
    pub fn parse(&self, lsx: &LsxDocument) -> Result<Document> {
        let region = match lsx.regions.as_slice() {
            [region] => region,
            regions => return Err(Error::RegionCount(regions.len())),
        };
        let doc_type = self
            .by_region
            .get(&region.id)
            .ok_or_else(|| Error::UnknownRegion(region.id.clone()))?;
        Document::from_lsx(doc_type, lsx)
    }

    /// Load a game file addressed as `archive-name/relative/path`.
    ///
    /// # Errors
    /// Fails if the archive source cannot resolve the path, or see
    /// [`load`](Self::load).
    pub fn load_virtual(&self, source: &dyn ArchiveSource, virtual_path: &str) -> Result<Document> {
        let path = source.get_path(virtual_path)?;
        tracing::debug!("Resolved {virtual_path} to {}", path.display());
        self.load(path)
    }

    /// Sort nodes into documents by owning document type.
    ///
    /// Documents come back in first-appearance order of their type. A
    /// single-node document type yields one document per node.
    ///
    /// # Errors
    /// Returns [`Error::UnregisteredNodeType`] for a node no document owns.
    pub fn group(&self, nodes: impl IntoIterator<Item = Node>) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        let mut slots: IndexMap<String, usize> = IndexMap::new();

        for node in nodes {
            let doc_type = self
                .owners
                .get(node.type_name())
                .ok_or_else(|| Error::UnregisteredNodeType(node.type_name().to_string()))?;

            match doc_type.layout() {
                DocumentLayout::SingleNode => {
                    documents.push(Document::with_children(doc_type, [node])?);
                }
                DocumentLayout::Children => {
                    let slot = *slots.entry(doc_type.name().to_string()).or_insert_with(|| {
                        documents.push(Document::new(doc_type));
                        documents.len() - 1
                    });
                    documents[slot].children_mut().push(node)?;
                }
            }
        }

        tracing::debug!("Grouped nodes into {} documents", documents.len());
        Ok(documents)
    }

    /// Group nodes and save every resulting document under `base`.
    ///
    /// Every path is resolved and every document rendered before the first
    /// file is written, so a routing or formatting error leaves `base`
    /// untouched.
    ///
    /// # Errors
    /// See [`group`](Self::group) and [`Document::save`]. Returns
    /// [`Error::DuplicateOutputPath`] when two documents resolve to the same
    /// file.
    pub fn save(
        &self,
        nodes: impl IntoIterator<Item = Node>,
        base: impl AsRef<Path>,
        version: Option<LsxVersion>,
        vars: &PathVars,
    ) -> Result<Vec<PathBuf>> {
        let base = base.as_ref();
        let documents = self.group(nodes)?;

        let mut rendered = Vec::with_capacity(documents.len());
        let mut seen = HashSet::new();
        for doc in &documents {
            let (path, text) = doc.render(base, version, vars)?;
            if !seen.insert(path.clone()) {
                return Err(Error::DuplicateOutputPath {
                    document: doc.doc_type().name().to_string(),
                    path,
                });
            }
            rendered.push((doc, path, text));
        }

        let mut paths = Vec::with_capacity(rendered.len());
        for (doc, path, text) in rendered {
            doc.commit(&path, &text)?;
            paths.push(path);
        }
        Ok(paths)
    }
}

/// Install the process-wide registry. Only the first call succeeds.
///
/// # Errors
/// Returns [`Error::RegistryAlreadyInstalled`] on every later call.
pub fn install(registry: Registry) -> Result<&'static Registry> {
    let mut installed = false;
    let current = GLOBAL.get_or_init(|| {
        installed = true;
        registry
    });
    if installed {
        tracing::info!(
            "Installed registry with {} document types",
            current.documents.len()
        );
        Ok(current)
    } else {
        Err(Error::RegistryAlreadyInstalled)
    }
}

/// The process-wide registry, if one has been installed.
#[must_use]
pub fn global() -> Option<&'static Registry> {
    GLOBAL.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::attribute::{FIXED_STRING, GUID, LS_STRING};
    use crate::schema::node::NodeType;
    use pretty_assertions::assert_eq;

    struct Schemas {
        spell_list: Arc<NodeType>,
        passive_list: Arc<NodeType>,
        tag: Arc<NodeType>,
        spell_lists: Arc<DocumentType>,
        passive_lists: Arc<DocumentType>,
        tags: Arc<DocumentType>,
    }

    fn schemas() -> Schemas {
        let spell_list = NodeType::builder("SpellList")
            .attribute("Comment", LS_STRING)
            .attribute("UUID", GUID)
            .build()
            .unwrap();
        let passive_list = NodeType::builder("PassiveList")
            .attribute("Comment", LS_STRING)
            .attribute("UUID", GUID)
            .build()
            .unwrap();
        let tag = NodeType::builder("Tags")
            .attribute("Name", FIXED_STRING)
            .attribute("UUID", GUID)
            .build()
            .unwrap();
        Schemas {
            spell_lists: DocumentType::builder("SpellLists")
                .path("Public/{folder}/Lists/SpellLists.lsx")
                .child(&spell_list)
                .build()
                .unwrap(),
            passive_lists: DocumentType::builder("PassiveLists")
                .path("Public/{folder}/Lists/PassiveLists.lsx")
                .child(&passive_list)
                .build()
                .unwrap(),
            tags: DocumentType::builder("Tags")
                .path("Public/{folder}/Tags/{UUID}.lsx")
                .child(&tag)
                .single_node()
                .build()
                .unwrap(),
            spell_list,
            passive_list,
            tag,
        }
    }

    fn registry(s: &Schemas) -> Registry {
        let mut registry = Registry::new();
        registry.register(&s.spell_lists).unwrap();
        registry.register(&s.passive_lists).unwrap();
        registry.register(&s.tags).unwrap();
        registry
    }

    fn list(node_type: &Arc<NodeType>, uuid: &str) -> Node {
        Node::new(node_type).attr("UUID", uuid).unwrap()
    }

    #[test]
    fn test_conflicting_owner() {
        let s = schemas();
        let mut registry = registry(&s);
        let rival = DocumentType::builder("MoreSpells")
            .child(&s.spell_list)
            .build()
            .unwrap();

        let err = registry.register(&rival).unwrap_err();
        assert!(matches!(
            err,
            Error::ConflictingOwner { ref node_type, ref existing, .. }
                if node_type == "SpellList" && existing == "SpellLists"
        ));
        // Nothing from the failed registration is recorded
        assert!(registry.document_for_region("MoreSpells").is_none());
        assert_eq!(registry.document_types().len(), 3);
    }

    #[test]
    fn test_duplicate_region() {
        let s = schemas();
        let mut registry = registry(&s);
        let other = NodeType::builder("Other").build().unwrap();
        let clash = DocumentType::builder("Clash")
            .region("SpellLists")
            .child(&other)
            .build()
            .unwrap();
        assert!(matches!(
            registry.register(&clash),
            Err(Error::DuplicateRegion { .. })
        ));
        assert!(registry.owner_of("Other").is_none());
    }

    #[test]
    fn test_register_twice_is_noop() {
        let s = schemas();
        let mut registry = registry(&s);
        registry.register(&s.spell_lists).unwrap();
        assert_eq!(registry.document_types().len(), 3);
        assert_eq!(registry.owner_of("SpellList").unwrap().name(), "SpellLists");
    }

    #[test]
    fn test_group_routes_by_owner() {
        let s = schemas();
        let registry = registry(&s);
        let nodes = vec![
            list(&s.passive_list, "1"),
            list(&s.spell_list, "2"),
            list(&s.tag, "3"),
            list(&s.passive_list, "4"),
            list(&s.tag, "5"),
        ];

        let docs = registry.group(nodes).unwrap();
        let summary: Vec<(&str, usize)> = docs
            .iter()
            .map(|d| (d.doc_type().name(), d.children().len()))
            .collect();
        assert_eq!(
            summary,
            vec![("PassiveLists", 2), ("SpellLists", 1), ("Tags", 1), ("Tags", 1)]
        );
    }

    #[test]
    fn test_group_unregistered() {
        let s = schemas();
        let mut registry = Registry::new();
        registry.register(&s.spell_lists).unwrap();
        let err = registry.group([list(&s.passive_list, "1")]).unwrap_err();
        assert!(matches!(err, Error::UnregisteredNodeType(ref name) if name == "PassiveList"));
    }

    #[test]
    fn test_save_and_load_by_region() {
        let dir = tempfile::tempdir().unwrap();
        let s = schemas();
        let registry = registry(&s);
        let vars = PathVars::from([("folder".to_string(), "MyMod".to_string())]);

        let paths = registry
            .save(
                [list(&s.spell_list, "a"), list(&s.tag, "b"), list(&s.spell_list, "c")],
                dir.path(),
                Some(LsxVersion::new(4, 0, 9, 331)),
                &vars,
            )
            .unwrap();
        assert_eq!(
            paths,
            vec![
                dir.path().join("Public/MyMod/Lists/SpellLists.lsx"),
                dir.path().join("Public/MyMod/Tags/b.lsx"),
            ]
        );

        let spells = registry.load(&paths[0]).unwrap();
        assert_eq!(spells.doc_type().name(), "SpellLists");
        assert_eq!(spells.children().len(), 2);
        assert_eq!(spells.children()[1].get_str("UUID"), Some("c"));

        let tag = registry.load(&paths[1]).unwrap();
        assert_eq!(tag.doc_type().name(), "Tags");
        assert_eq!(tag.children()[0].get_str("UUID"), Some("b"));
    }

    #[test]
    fn test_unknown_region() {
        let s = schemas();
        let registry = registry(&s);
        let err = registry
            .load_str(r#"<save><region id="Nope"><node id="root"/></region></save>"#)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRegion(ref r) if r == "Nope"));
    }

    #[test]
    fn test_failed_save_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let s = schemas();
        let registry = registry(&s);
        let vars = PathVars::from([("folder".to_string(), "M".to_string())]);
        let tag_without_uuid = Node::new(&s.tag).attr("Name", "FOO").unwrap();

        let err = registry
            .save(
                [list(&s.spell_list, "a"), tag_without_uuid],
                dir.path(),
                None,
                &vars,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingPathVariable { ref variable, .. } if variable == "UUID"
        ));
        assert!(!dir.path().join("Public/M/Lists/SpellLists.lsx").exists());
        assert!(!dir.path().join("Public").exists());
    }

    #[test]
    fn test_duplicate_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let s = schemas();
        let registry = registry(&s);
        let vars = PathVars::from([("folder".to_string(), "M".to_string())]);

        let err = registry
            .save(
                [list(&s.passive_list, "p"), list(&s.tag, "same"), list(&s.tag, "same")],
                dir.path(),
                None,
                &vars,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateOutputPath { ref document, ref path }
                if document == "Tags" && path.ends_with("Public/M/Tags/same.lsx")
        ));
        assert!(!dir.path().join("Public").exists());
    }
}
