//! Feats and their descriptions
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::error::Result;
use crate::schema::attribute::{
    BOOL, FIXED_STRING, GUID, LS_STRING, LS_STRING_LIST, TRANSLATED_STRING,
};
use crate::schema::{DocumentType, NodeType};

#[derive(Debug, Clone)]
pub struct Feats {
    pub feat: Arc<NodeType>,
    pub feat_description: Arc<NodeType>,
    pub feats: Arc<DocumentType>,
    pub feat_descriptions: Arc<DocumentType>,
}

pub(super) fn build() -> Result<Feats> {
    let feat = NodeType::builder("Feat")
        .attribute("CanBeTakenMultipleTimes", BOOL)
        .attribute("Name", FIXED_STRING)
        .attribute("PassivesAdded", LS_STRING_LIST)
        .attribute("PassivesRemoved", LS_STRING_LIST)
        .attribute("Requirements", LS_STRING)
        .attribute("Selectors", LS_STRING_LIST)
        .attribute("UUID", GUID)
        .build()?;
    let feat_description = NodeType::builder("FeatDescription")
        .attribute("Description", TRANSLATED_STRING)
        .attribute("DisplayName", TRANSLATED_STRING)
        .attribute("ExactMatch", FIXED_STRING)
        .attribute("FeatId", GUID)
        .attribute("UUID", GUID)
        .build()?;

    let feats = DocumentType::builder("Feats")
        .path("Public/{folder}/Feats/Feats.lsx")
        .child(&feat)
        .default_version(super::LSX_VERSION)
        .build()?;
    let feat_descriptions = DocumentType::builder("FeatDescriptions")
        .path("Public/{folder}/Feats/FeatDescriptions.lsx")
        .child(&feat_description)
        .default_version(super::LSX_VERSION)
        .build()?;

    Ok(Feats {
        feat,
        feat_description,
        feats,
        feat_descriptions,
    })
}
