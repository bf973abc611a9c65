//! Node schemas and node instances
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! A [`NodeType`] is declared once through [`NodeTypeBuilder`]: its XML id,
//! its ordered attribute schema and the node types it accepts as children.
//! A [`Node`] is an instance holding a sparse set of attribute values and a
//! [`ChildCollection`] constrained to the schema's child types.
//!
//! Node type names are the identity used for child checks and document
//! routing, so they must be unique within one schema catalog. The XML id
//! defaults to the name but several node types may share an id (for example
//! the `Tags` child of both races and classes).

use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::attribute::{AttributeType, Value};
use super::children::ChildCollection;
use crate::error::{Error, Result};
use crate::formats::lsx::{LsxNode, serialize_node_compact};

/// Schema for one kind of node.
#[derive(Debug)]
pub struct NodeType {
    name: String,
    id: String,
    attributes: IndexMap<String, AttributeType>,
    children: Vec<Arc<NodeType>>,
}

/// Builder for [`NodeType`].
#[derive(Debug)]
pub struct NodeTypeBuilder {
    name: String,
    id: Option<String>,
    attributes: Vec<(String, AttributeType)>,
    children: Vec<Arc<NodeType>>,
}

impl NodeType {
    /// Start declaring a node type. The XML id defaults to `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> NodeTypeBuilder {
        NodeTypeBuilder {
            name: name.into(),
            id: None,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The XML `<node id=...>` value.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Attribute names and types in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, AttributeType)> {
        self.attributes.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    #[must_use]
    pub fn attribute_type(&self, name: &str) -> Option<AttributeType> {
        self.attributes.get(name).copied()
    }

    #[must_use]
    pub fn child_types(&self) -> &[Arc<NodeType>] {
        &self.children
    }

    /// Whether this node type carries a `<children>` element.
    #[must_use]
    pub fn declares_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// The permitted child type with the given XML id.
    #[must_use]
    pub fn child_type(&self, id: &str) -> Option<&Arc<NodeType>> {
        self.children.iter().find(|t| t.id == id)
    }
}

impl NodeTypeBuilder {
    /// Override the XML id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Declare the next attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, attribute_type: AttributeType) -> Self {
        self.attributes.push((name.into(), attribute_type));
        self
    }

    /// Permit a child node type.
    #[must_use]
    pub fn child(mut self, node_type: &Arc<NodeType>) -> Self {
        self.children.push(Arc::clone(node_type));
        self
    }

    /// Finish the declaration.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateAttribute`] or [`Error::AmbiguousChildId`].
    pub fn build(self) -> Result<Arc<NodeType>> {
        let mut attributes = IndexMap::with_capacity(self.attributes.len());
        for (name, attribute_type) in self.attributes {
            if attributes.contains_key(&name) {
                return Err(Error::DuplicateAttribute {
                    schema: self.name,
                    attribute: name,
                });
            }
            attributes.insert(name, attribute_type);
        }

        for (i, child) in self.children.iter().enumerate() {
            if self.children[..i].iter().any(|c| c.id == child.id) {
                return Err(Error::AmbiguousChildId {
                    schema: self.name,
                    id: child.id.clone(),
                });
            }
        }

        Ok(Arc::new(NodeType {
            id: self.id.unwrap_or_else(|| self.name.clone()),
            name: self.name,
            attributes,
            children: self.children,
        }))
    }
}

/// A node instance.
#[derive(Debug, Clone)]
pub struct Node {
    schema: Arc<NodeType>,
    values: IndexMap<String, Value>,
    children: ChildCollection,
}

impl Node {
    /// An empty node of the given type.
    #[must_use]
    pub fn new(schema: &Arc<NodeType>) -> Self {
        Node {
            schema: Arc::clone(schema),
            values: IndexMap::new(),
            children: ChildCollection::new(schema.children.clone()),
        }
    }

    /// A node with the given attribute values.
    ///
    /// # Errors
    /// Fails on the first unknown attribute name or mismatched value.
    pub fn with_attributes<I, K, V>(schema: &Arc<NodeType>, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut node = Node::new(schema);
        for (name, value) in attributes {
            node.set(name.as_ref(), value)?;
        }
        Ok(node)
    }

    /// Builder-style [`set`](Self::set).
    ///
    /// # Errors
    /// See [`set`](Self::set).
    pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Builder-style [`add_child`](Self::add_child).
    ///
    /// # Errors
    /// See [`add_child`](Self::add_child).
    pub fn child(mut self, child: Node) -> Result<Self> {
        self.add_child(child)?;
        Ok(self)
    }

    #[must_use]
    pub fn schema(&self) -> &Arc<NodeType> {
        &self.schema
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.schema.name
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.schema.id
    }

    fn declared(&self, name: &str) -> Result<AttributeType> {
        self.schema
            .attribute_type(name)
            .ok_or_else(|| Error::UnknownAttribute {
                schema: self.schema.name.clone(),
                attribute: name.to_string(),
            })
    }

    /// Set an attribute value.
    ///
    /// # Errors
    /// Returns [`Error::UnknownAttribute`] if the schema does not declare
    /// `name`, or a value error if the value does not fit its type.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let attribute_type = self.declared(name)?;
        let value = attribute_type.coerce(&self.schema.name, name, value.into())?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Set or, with `None`, remove an attribute.
    ///
    /// # Errors
    /// See [`set`](Self::set).
    pub fn set_attribute(&mut self, name: &str, value: Option<Value>) -> Result<()> {
        match value {
            Some(value) => self.set(name, value),
            None => self.remove(name).map(|_| ()),
        }
    }

    /// Remove an attribute so it is omitted from output.
    ///
    /// # Errors
    /// Returns [`Error::UnknownAttribute`] if the schema does not declare `name`.
    pub fn remove(&mut self, name: &str) -> Result<Option<Value>> {
        self.declared(name)?;
        Ok(self.values.shift_remove(name))
    }

    /// The value of an attribute, `None` when unset or undeclared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The value of an attribute, `None` when unset.
    ///
    /// # Errors
    /// Returns [`Error::UnknownAttribute`] if the schema does not declare `name`.
    pub fn get_attribute(&self, name: &str) -> Result<Option<&Value>> {
        self.declared(name)?;
        Ok(self.values.get(name))
    }

    /// A string-valued attribute (plain, fixed string or guid).
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Set attributes in schema declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .attributes
            .keys()
            .filter_map(|name| self.values.get(name).map(|v| (name.as_str(), v)))
    }

    #[must_use]
    pub fn children(&self) -> &ChildCollection {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut ChildCollection {
        &mut self.children
    }

    /// Replace all children.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChildType`]; the old children are kept on error.
    pub fn set_children(&mut self, children: impl IntoIterator<Item = Node>) -> Result<()> {
        self.children.replace_all(children)
    }

    /// Append one child.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChildType`] if the schema does not permit it.
    pub fn add_child(&mut self, child: Node) -> Result<()> {
        self.children.push(child)
    }

    /// Render as an untyped `<node>` element.
    #[must_use]
    pub fn to_xml(&self) -> LsxNode {
        let attributes = self
            .schema
            .attributes
            .iter()
            .filter_map(|(name, ty)| self.values.get(name).map(|v| ty.encode(name, v)))
            .collect();

        let children = self
            .schema
            .declares_children()
            .then(|| self.children.iter().map(Node::to_xml).collect());

        LsxNode {
            id: self.schema.id.clone(),
            attributes,
            children,
        }
    }

    /// Render as compact XML text (no indentation).
    ///
    /// # Errors
    /// Returns an error if XML serialization fails.
    pub fn to_xml_string(&self) -> Result<String> {
        serialize_node_compact(&self.to_xml())
    }

    /// Build a node of type `schema` from a `<node>` element.
    ///
    /// # Errors
    /// Fails on an id mismatch, an undeclared or repeated attribute, a wire
    /// type that differs from the schema, an undecodable value, or a child
    /// whose id no permitted child type declares.
    pub fn load(schema: &Arc<NodeType>, element: &LsxNode) -> Result<Node> {
        if element.id != schema.id {
            return Err(Error::IdMismatch {
                kind: "node",
                expected: schema.id.clone(),
                found: element.id.clone(),
            });
        }

        let mut node = Node::new(schema);

        for attr in &element.attributes {
            let attribute_type = node.declared(&attr.id)?;
            if attr.type_name != attribute_type.type_name() {
                return Err(Error::AttributeTypeMismatch {
                    schema: schema.name.clone(),
                    attribute: attr.id.clone(),
                    expected: attribute_type.type_name().to_string(),
                    found: attr.type_name.clone(),
                });
            }
            if node.values.contains_key(&attr.id) {
                return Err(Error::RepeatedAttribute {
                    schema: schema.name.clone(),
                    attribute: attr.id.clone(),
                });
            }
            let value = attribute_type.decode(attr)?;
            node.values.insert(attr.id.clone(), value);
        }

        for child in element.child_nodes() {
            let child_type = schema.child_type(&child.id).ok_or_else(|| Error::UnknownNodeId {
                parent: schema.name.clone(),
                id: child.id.clone(),
            })?;
            node.children.push(Node::load(child_type, child)?)?;
        }

        tracing::trace!(
            "Loaded {} node with {} attributes and {} children",
            schema.name,
            node.values.len(),
            node.children.len()
        );
        Ok(node)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.schema.name == other.schema.name
            && self.values == other.values
            && self.children == other.children
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let attributes: IndexMap<&str, &Value> = self.attributes().collect();
        let fields = if self.schema.declares_children() { 3 } else { 2 };

        let mut state = serializer.serialize_struct("Node", fields)?;
        state.serialize_field("id", &self.schema.id)?;
        state.serialize_field("attributes", &attributes)?;
        if self.schema.declares_children() {
            state.serialize_field("children", self.children.as_slice())?;
        }
        state.end()
    }
}
