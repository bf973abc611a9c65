//! Type-constrained, ordered child node collections
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Every mutating operation type-checks its input before touching the
//! collection, so an invalid node is never stored, even transiently.
//!
//! The key-addressed operations ([`update`](ChildCollection::update),
//! [`unique`](ChildCollection::unique),
//! [`replace_matching`](ChildCollection::replace_matching)) are how a mod
//! merges its entries into the game's shipped node lists: same key means
//! same entry, and the last write wins. They use insertion-ordered maps, so
//! results are deterministic: surviving entries keep the position of their
//! key's first occurrence and new keys are appended.

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Index;
use std::sync::Arc;

use indexmap::IndexMap;

use super::node::{Node, NodeType};
use crate::error::{Error, Result};

/// An ordered sequence of nodes restricted to a set of node types.
#[derive(Debug, Clone)]
pub struct ChildCollection {
    allowed: Vec<Arc<NodeType>>,
    nodes: Vec<Node>,
}

impl ChildCollection {
    /// Create an empty collection accepting the given node types.
    #[must_use]
    pub fn new(allowed: Vec<Arc<NodeType>>) -> Self {
        Self {
            allowed,
            nodes: Vec::new(),
        }
    }

    /// Create a collection and fill it.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChildType`] if any node is not permitted.
    pub fn with_nodes(
        allowed: Vec<Arc<NodeType>>,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Self> {
        let mut collection = Self::new(allowed);
        collection.extend(nodes)?;
        Ok(collection)
    }

    #[must_use]
    pub fn allowed_types(&self) -> &[Arc<NodeType>] {
        &self.allowed
    }

    /// Whether nodes of this type may be stored here.
    #[must_use]
    pub fn permits(&self, node_type: &NodeType) -> bool {
        self.allowed.iter().any(|t| t.name() == node_type.name())
    }

    fn check<'a>(&self, nodes: impl IntoIterator<Item = &'a Node>) -> Result<()> {
        let mut found: Vec<String> = Vec::new();
        for node in nodes {
            if !self.permits(node.schema()) && !found.iter().any(|n| n == node.type_name()) {
                found.push(node.type_name().to_string());
            }
        }
        if found.is_empty() {
            return Ok(());
        }
        Err(Error::InvalidChildType {
            allowed: self.allowed.iter().map(|t| t.name().to_string()).collect(),
            found,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Node> {
        self.nodes
    }

    /// Append one node.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChildType`] if the node type is not permitted.
    pub fn push(&mut self, node: Node) -> Result<()> {
        self.check([&node])?;
        self.nodes.push(node);
        Ok(())
    }

    /// Append several nodes; nothing is appended if any of them is invalid.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChildType`] listing every rejected type.
    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node>) -> Result<()> {
        let nodes: Vec<Node> = nodes.into_iter().collect();
        self.check(&nodes)?;
        self.nodes.extend(nodes);
        Ok(())
    }

    /// Replace the whole contents.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChildType`]; the old contents are kept on error.
    pub fn replace_all(&mut self, nodes: impl IntoIterator<Item = Node>) -> Result<()> {
        let nodes: Vec<Node> = nodes.into_iter().collect();
        self.check(&nodes)?;
        self.nodes = nodes;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Replace the node at `index`, returning the old one.
    ///
    /// # Errors
    /// Returns an error for an invalid type or an index out of range.
    pub fn set(&mut self, index: usize, node: Node) -> Result<Node> {
        self.check([&node])?;
        let len = self.nodes.len();
        let slot = self
            .nodes
            .get_mut(index)
            .ok_or(Error::ChildIndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, node))
    }

    /// Remove and return the node at `index`.
    ///
    /// # Errors
    /// Returns [`Error::ChildIndexOutOfRange`].
    pub fn remove(&mut self, index: usize) -> Result<Node> {
        if index >= self.nodes.len() {
            return Err(Error::ChildIndexOutOfRange {
                index,
                len: self.nodes.len(),
            });
        }
        Ok(self.nodes.remove(index))
    }

    /// Apply a fallible edit to the node at `index`.
    ///
    /// The edit runs on a copy, which replaces the original only if the edit
    /// succeeds and the result is still a permitted type.
    ///
    /// # Errors
    /// Returns the edit's error, an invalid-type error, or an index error.
    pub fn modify<F>(&mut self, index: usize, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Node) -> Result<()>,
    {
        let len = self.nodes.len();
        let mut copy = self
            .nodes
            .get(index)
            .ok_or(Error::ChildIndexOutOfRange { index, len })?
            .clone();
        edit(&mut copy)?;
        self.set(index, copy)?;
        Ok(())
    }

    /// Apply a fallible edit to every node matching `predicate`.
    ///
    /// All-or-nothing: if any edit fails, no node is changed.
    ///
    /// # Errors
    /// Returns the first edit error or an invalid-type error.
    pub fn modify_where<P, F>(&mut self, predicate: P, mut edit: F) -> Result<usize>
    where
        P: Fn(&Node) -> bool,
        F: FnMut(&mut Node) -> Result<()>,
    {
        let mut edited = Vec::new();
        for (index, node) in self.nodes.iter().enumerate() {
            if predicate(node) {
                let mut copy = node.clone();
                edit(&mut copy)?;
                edited.push((index, copy));
            }
        }
        self.check(edited.iter().map(|(_, node)| node))?;

        let count = edited.len();
        for (index, node) in edited {
            self.nodes[index] = node;
        }
        Ok(count)
    }

    /// Stable sort by a key function.
    pub fn sort_by_key<K: Ord>(&mut self, key: impl FnMut(&Node) -> K) {
        self.nodes.sort_by_key(key);
    }

    /// Stable sort by a comparator.
    pub fn sort_by(&mut self, compare: impl FnMut(&Node, &Node) -> std::cmp::Ordering) {
        self.nodes.sort_by(compare);
    }

    /// Merge `incoming` into this collection by key; incoming wins on collision.
    ///
    /// Existing entries without a colliding key are preserved. Duplicate keys
    /// already present collapse to their last occurrence.
    ///
    /// # Errors
    /// Returns [`Error::InvalidChildType`]; the collection is unchanged on error.
    pub fn update<K, F>(&mut self, incoming: impl IntoIterator<Item = Node>, key: F) -> Result<()>
    where
        K: Hash + Eq,
        F: Fn(&Node) -> K,
    {
        let incoming: Vec<Node> = incoming.into_iter().collect();
        self.check(&incoming)?;

        let mut merged: IndexMap<K, Node> =
            IndexMap::with_capacity(self.nodes.len() + incoming.len());
        for node in self.nodes.drain(..).chain(incoming) {
            merged.insert(key(&node), node);
        }
        self.nodes = merged.into_values().collect();
        Ok(())
    }

    /// Deduplicate by key, keeping the last occurrence of each key.
    pub fn unique<K, F>(&mut self, key: F)
    where
        K: Hash + Eq,
        F: Fn(&Node) -> K,
    {
        let mut seen: IndexMap<K, Node> = IndexMap::with_capacity(self.nodes.len());
        for node in self.nodes.drain(..) {
            seen.insert(key(&node), node);
        }
        self.nodes = seen.into_values().collect();
    }

    /// Replace existing entries by key, requiring every incoming node to match.
    ///
    /// This is for patching shipped content: an incoming key that matches
    /// nothing means the targeted entry no longer exists in the game data.
    ///
    /// # Errors
    /// Returns [`Error::UnmatchedContent`] naming every unmatched key, or
    /// [`Error::InvalidChildType`]. The collection is unchanged on error.
    pub fn replace_matching<K, F>(
        &mut self,
        incoming: impl IntoIterator<Item = Node>,
        key: F,
    ) -> Result<()>
    where
        K: Hash + Eq + Debug,
        F: Fn(&Node) -> K,
    {
        let incoming: Vec<Node> = incoming.into_iter().collect();
        self.check(&incoming)?;

        let positions: IndexMap<K, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (key(node), index))
            .collect();

        let mut replacements = Vec::with_capacity(incoming.len());
        let mut unmatched = Vec::new();
        for node in incoming {
            let k = key(&node);
            match positions.get(&k) {
                Some(&index) => replacements.push((index, node)),
                None => unmatched.push(format!("{k:?}")),
            }
        }
        if !unmatched.is_empty() {
            return Err(Error::UnmatchedContent { keys: unmatched });
        }

        for (index, node) in replacements {
            self.nodes[index] = node;
        }
        Ok(())
    }

    /// A copy holding only the nodes matching `predicate`.
    #[must_use]
    pub fn filtered(&self, predicate: impl Fn(&Node) -> bool) -> ChildCollection {
        ChildCollection {
            allowed: self.allowed.clone(),
            nodes: self.nodes.iter().filter(|n| predicate(*n)).cloned().collect(),
        }
    }

    pub fn find(&self, predicate: impl Fn(&Node) -> bool) -> Option<&Node> {
        self.nodes.iter().find(|n| predicate(*n))
    }

    pub fn find_all(&self, predicate: impl Fn(&Node) -> bool) -> Vec<&Node> {
        self.nodes.iter().filter(|n| predicate(*n)).collect()
    }

    pub fn position(&self, predicate: impl Fn(&Node) -> bool) -> Option<usize> {
        self.nodes.iter().position(predicate)
    }

    /// Remove every node matching `predicate`, returning them in order.
    pub fn remove_where(&mut self, predicate: impl Fn(&Node) -> bool) -> Vec<Node> {
        let (removed, kept): (Vec<Node>, Vec<Node>) =
            self.nodes.drain(..).partition(|n| predicate(n));
        self.nodes = kept;
        removed
    }

    /// Keep only the nodes matching `predicate`.
    pub fn retain(&mut self, predicate: impl Fn(&Node) -> bool) {
        self.nodes.retain(|n| predicate(n));
    }
}

impl PartialEq for ChildCollection {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl Index<usize> for ChildCollection {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a ChildCollection {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl IntoIterator for ChildCollection {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
