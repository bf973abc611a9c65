//! Document schemas and document instances
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! A [`DocumentType`] maps one `.lsx` file kind to its region id, root node
//! id, output path template and top-level node types. Most documents wrap
//! their content in `<node id="root"><children>`; a few (tags) consist of a
//! single node that sits directly in the region, which is modelled as
//! [`DocumentLayout::SingleNode`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::attribute::Value;
use super::children::ChildCollection;
use super::node::{Node, NodeType};
use super::template::{PathVars, format_path, format_path_with};
use crate::error::{Error, Result};
use crate::formats::lsx::{
    LsxDocument, LsxNode, LsxRegion, LsxVersion, read_lsx, serialize_lsx, write_lsx,
    write_lsx_text,
};

/// How a document's content sits inside its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentLayout {
    /// `<node id=root><children>...</children></node>`
    Children,
    /// The region holds exactly one content node and no wrapper.
    SingleNode,
}

/// Schema for one kind of `.lsx` file.
#[derive(Debug)]
pub struct DocumentType {
    name: String,
    region: String,
    root: String,
    path: String,
    children: Vec<Arc<NodeType>>,
    layout: DocumentLayout,
    default_version: Option<LsxVersion>,
}

/// Builder for [`DocumentType`].
#[derive(Debug)]
pub struct DocumentTypeBuilder {
    name: String,
    region: Option<String>,
    root: Option<String>,
    path: Option<String>,
    children: Vec<Arc<NodeType>>,
    layout: DocumentLayout,
    default_version: Option<LsxVersion>,
}

impl DocumentType {
    /// Start declaring a document type. The region id defaults to `name`,
    /// the root node id to `"root"` and the path to `{name}.lsx`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> DocumentTypeBuilder {
        DocumentTypeBuilder {
            name: name.into(),
            region: None,
            root: None,
            path: None,
            children: Vec::new(),
            layout: DocumentLayout::Children,
            default_version: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Id of the node directly under the region.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Output path template, relative to the save base directory.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn child_types(&self) -> &[Arc<NodeType>] {
        &self.children
    }

    /// The top-level node type with the given XML id.
    #[must_use]
    pub fn child_type(&self, id: &str) -> Option<&Arc<NodeType>> {
        self.children.iter().find(|t| t.id() == id)
    }

    #[must_use]
    pub fn layout(&self) -> DocumentLayout {
        self.layout
    }

    /// Version written by [`Document::save`] when none is given.
    #[must_use]
    pub fn default_version(&self) -> Option<LsxVersion> {
        self.default_version
    }
}

impl DocumentTypeBuilder {
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn path(mut self, template: impl Into<String>) -> Self {
        self.path = Some(template.into());
        self
    }

    /// Accept a top-level node type.
    #[must_use]
    pub fn child(mut self, node_type: &Arc<NodeType>) -> Self {
        self.children.push(Arc::clone(node_type));
        self
    }

    /// Place the single content node directly in the region.
    #[must_use]
    pub fn single_node(mut self) -> Self {
        self.layout = DocumentLayout::SingleNode;
        self
    }

    #[must_use]
    pub fn default_version(mut self, version: LsxVersion) -> Self {
        self.default_version = Some(version);
        self
    }

    /// Finish the declaration.
    ///
    /// # Errors
    /// Returns [`Error::EmptyDocumentType`] without child types,
    /// [`Error::SingleNodeChildTypes`] when a single-node document declares
    /// more than one, and [`Error::AmbiguousChildId`] when two child types
    /// share an XML id.
    pub fn build(self) -> Result<Arc<DocumentType>> {
        if self.children.is_empty() {
            return Err(Error::EmptyDocumentType { document: self.name });
        }
        for (i, child) in self.children.iter().enumerate() {
            if self.children[..i].iter().any(|c| c.id() == child.id()) {
                return Err(Error::AmbiguousChildId {
                    schema: self.name,
                    id: child.id().to_string(),
                });
            }
        }

        let root = match self.layout {
            DocumentLayout::Children => self.root.unwrap_or_else(|| "root".to_string()),
            DocumentLayout::SingleNode => {
                if self.children.len() != 1 {
                    return Err(Error::SingleNodeChildTypes {
                        document: self.name,
                        count: self.children.len(),
                    });
                }
                self.children[0].id().to_string()
            }
        };

        Ok(Arc::new(DocumentType {
            region: self.region.unwrap_or_else(|| self.name.clone()),
            path: self.path.unwrap_or_else(|| format!("{}.lsx", self.name)),
            name: self.name,
            root,
            children: self.children,
            layout: self.layout,
            default_version: self.default_version,
        }))
    }
}

/// One `.lsx` file's worth of nodes.
#[derive(Debug, Clone)]
pub struct Document {
    doc_type: Arc<DocumentType>,
    children: ChildCollection,
}

impl Document {
    /// An empty document.
    #[must_use]
    pub fn new(doc_type: &Arc<DocumentType>) -> Self {
        Document {
            doc_type: Arc::clone(doc_type),
            children: ChildCollection::new(doc_type.children.clone()),
        }
    }

    /// A document holding `nodes`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChildType`] if any node is not a top-level type.
    pub fn with_children(
        doc_type: &Arc<DocumentType>,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Self> {
        let mut doc = Document::new(doc_type);
        doc.children.extend(nodes)?;
        Ok(doc)
    }

    #[must_use]
    pub fn doc_type(&self) -> &Arc<DocumentType> {
        &self.doc_type
    }

    #[must_use]
    pub fn children(&self) -> &ChildCollection {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut ChildCollection {
        &mut self.children
    }

    #[must_use]
    pub fn into_children(self) -> ChildCollection {
        self.children
    }

    fn single(&self) -> Result<&Node> {
        match self.children.as_slice() {
            [node] => Ok(node),
            nodes => Err(Error::SingleNodeCount {
                document: self.doc_type.name.clone(),
                count: nodes.len(),
            }),
        }
    }

    /// Build the `<save>` tree. `<version>` is only present when given.
    ///
    /// # Errors
    /// Returns [`Error::SingleNodeCount`] for a single-node document that does
    /// not hold exactly one node.
    pub fn xml(&self, version: Option<LsxVersion>) -> Result<LsxDocument> {
        let root = match self.doc_type.layout {
            DocumentLayout::Children => LsxNode {
                id: self.doc_type.root.clone(),
                attributes: Vec::new(),
                children: Some(self.children.iter().map(Node::to_xml).collect()),
            },
            DocumentLayout::SingleNode => self.single()?.to_xml(),
        };

        Ok(LsxDocument {
            version,
            regions: vec![LsxRegion {
                id: self.doc_type.region.clone(),
                nodes: vec![root],
            }],
        })
    }

    /// Render the complete file contents, prologue included.
    ///
    /// # Errors
    /// See [`xml`](Self::xml).
    pub fn to_lsx_string(&self, version: Option<LsxVersion>) -> Result<String> {
        serialize_lsx(&self.xml(version)?)
    }

    /// Resolve the output path template.
    ///
    /// Single-node documents fall back to the node's scalar attribute values
    /// for placeholders missing from `vars`. Such a value must be a single
    /// path segment.
    ///
    /// # Errors
    /// Returns [`Error::MissingPathVariable`], [`Error::InvalidPathTemplate`]
    /// or [`Error::UnsafePathValue`].
    pub fn resolve_path(&self, vars: &PathVars) -> Result<PathBuf> {
        let path = match self.doc_type.layout {
            DocumentLayout::Children => format_path(&self.doc_type.path, vars)?,
            DocumentLayout::SingleNode => {
                let node = self.single()?;
                let mut rejected = None;
                let path = format_path_with(&self.doc_type.path, |name| {
                    if let Some(value) = vars.get(name) {
                        return Some(value.clone());
                    }
                    let value = match node.get(name)? {
                        Value::List(_) | Value::Translation(_) => return None,
                        scalar => scalar.to_string(),
                    };
                    if rejected.is_none() && !is_path_segment(&value) {
                        rejected = Some((name.to_string(), value.clone()));
                    }
                    Some(value)
                })?;
                if let Some((variable, value)) = rejected {
                    return Err(Error::UnsafePathValue {
                        template: self.doc_type.path.clone(),
                        variable,
                        value,
                    });
                }
                path
            }
        };
        Ok(PathBuf::from(path))
    }

    /// Resolve the destination under `base` and render the file contents
    /// without touching the disk.
    pub(crate) fn render(
        &self,
        base: &Path,
        version: Option<LsxVersion>,
        vars: &PathVars,
    ) -> Result<(PathBuf, String)> {
        let path = base.join(self.resolve_path(vars)?);
        let text = self.to_lsx_string(version.or(self.doc_type.default_version))?;
        Ok((path, text))
    }

    /// Write output produced by [`render`](Self::render).
    pub(crate) fn commit(&self, path: &Path, text: &str) -> Result<()> {
        write_lsx_text(text, path)?;
        tracing::info!(
            "Saved {} ({} nodes) to {}",
            self.doc_type.name,
            self.children.len(),
            path.display()
        );
        Ok(())
    }

    /// Write to `base` joined with the resolved path template.
    ///
    /// Falls back to the document type's default version.
    ///
    /// # Errors
    /// Fails on path formatting, serialization or file system errors.
    pub fn save(
        &self,
        base: impl AsRef<Path>,
        version: Option<LsxVersion>,
        vars: &PathVars,
    ) -> Result<PathBuf> {
        let (path, text) = self.render(base.as_ref(), version, vars)?;
        self.commit(&path, &text)?;
        Ok(path)
    }

    /// Write to an explicit destination, creating parent directories.
    ///
    /// # Errors
    /// Fails on serialization or file system errors.
    pub fn write_to(&self, path: impl AsRef<Path>, version: Option<LsxVersion>) -> Result<()> {
        write_lsx(&self.xml(version)?, path)
    }

    /// Read and validate a file of the given document type.
    ///
    /// # Errors
    /// Fails on I/O and XML errors, or any envelope or node mismatch.
    pub fn load(doc_type: &Arc<DocumentType>, path: impl AsRef<Path>) -> Result<Self> {
        Document::from_lsx(doc_type, &read_lsx(path)?)
    }

    /// Populate a document from a parsed tree.
    ///
    /// # Errors
    /// Returns [`Error::RegionCount`], [`Error::RootCount`],
    /// [`Error::IdMismatch`] for the region or root, [`Error::UnknownNodeId`]
    /// for a top-level node no child type declares, or any node load error.
    pub fn from_lsx(doc_type: &Arc<DocumentType>, lsx: &LsxDocument) -> Result<Self> {
        let region = match lsx.regions.as_slice() {
            [region] => region,
            regions => return Err(Error::RegionCount(regions.len())),
        };
        if region.id != doc_type.region {
            return Err(Error::IdMismatch {
                kind: "region",
                expected: doc_type.region.clone(),
                found: region.id.clone(),
            });
        }
        let root = match region.nodes.as_slice() {
            [root] => root,
            nodes => {
                return Err(Error::RootCount {
                    region: region.id.clone(),
                    count: nodes.len(),
                });
            }
        };
        if root.id != doc_type.root {
            return Err(Error::IdMismatch {
                kind: "root",
                expected: doc_type.root.clone(),
                found: root.id.clone(),
            });
        }

        let mut doc = Document::new(doc_type);
        match doc_type.layout {
            DocumentLayout::Children => {
                if let Some(attr) = root.attributes.first() {
                    return Err(Error::UnknownAttribute {
                        schema: doc_type.root.clone(),
                        attribute: attr.id.clone(),
                    });
                }
                for element in root.child_nodes() {
                    let node_type =
                        doc_type
                            .child_type(&element.id)
                            .ok_or_else(|| Error::UnknownNodeId {
                                parent: doc_type.name.clone(),
                                id: element.id.clone(),
                            })?;
                    doc.children.push(Node::load(node_type, element)?)?;
                }
            }
            DocumentLayout::SingleNode => {
                doc.children.push(Node::load(&doc_type.children[0], root)?)?;
            }
        }

        tracing::debug!(
            "Loaded {} document with {} nodes",
            doc_type.name,
            doc.children.len()
        );
        Ok(doc)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.doc_type.name == other.doc_type.name && self.children == other.children
    }
}

/// A value usable as one file or directory name.
fn is_path_segment(value: &str) -> bool {
    !matches!(value, "." | "..") && !value.contains(['/', '\\'])
}
