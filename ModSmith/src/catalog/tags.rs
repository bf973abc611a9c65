//! Tag definitions (`Public/<folder>/Tags/<uuid>.lsx`)
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::error::Result;
use crate::schema::attribute::{FIXED_STRING, GUID, LS_STRING, TRANSLATED_STRING};
use crate::schema::{DocumentType, NodeType};

/// Each tag is its own file with the tag node directly in the region.
#[derive(Debug, Clone)]
pub struct Tags {
    pub tag: Arc<NodeType>,
    pub categories: Arc<NodeType>,
    pub category: Arc<NodeType>,
    pub document: Arc<DocumentType>,
}

pub(super) fn build() -> Result<Tags> {
    let category = NodeType::builder("Category")
        .attribute("Name", LS_STRING)
        .build()?;
    let categories = NodeType::builder("Categories").child(&category).build()?;

    let tag = NodeType::builder("Tag")
        .id("Tags")
        .attribute("Description", LS_STRING)
        .attribute("DisplayDescription", TRANSLATED_STRING)
        .attribute("DisplayName", TRANSLATED_STRING)
        .attribute("Icon", FIXED_STRING)
        .attribute("Name", FIXED_STRING)
        .attribute("UUID", GUID)
        .child(&categories)
        .build()?;

    let document = DocumentType::builder("Tags")
        .path("Public/{folder}/Tags/{UUID}.lsx")
        .child(&tag)
        .single_node()
        .default_version(super::LSX_VERSION)
        .build()?;

    Ok(Tags {
        tag,
        categories,
        category,
        document,
    })
}
