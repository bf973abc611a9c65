//! Typed schema layer over `.lsx` documents
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Node types and document types are declared once with builders and
//! shared through [`std::sync::Arc`]. Node and document instances are built
//! per mod build, checked against their schema on every mutation, and
//! rendered to (or loaded from) the untyped tree in [`crate::formats::lsx`].

pub mod attribute;
pub mod children;
pub mod document;
pub mod node;
pub mod registry;
pub mod template;

pub use attribute::{AttributeType, Separator, Translation, Value, ValueKind};
pub use children::ChildCollection;
pub use document::{Document, DocumentLayout, DocumentType, DocumentTypeBuilder};
pub use node::{Node, NodeType, NodeTypeBuilder};
pub use registry::Registry;
pub use template::{PathVars, format_path};
