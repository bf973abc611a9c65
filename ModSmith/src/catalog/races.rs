//! Playable and NPC races
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::error::Result;
use crate::schema::attribute::{FIXED_STRING, GUID, TRANSLATED_STRING};
use crate::schema::{DocumentType, NodeType};

#[derive(Debug, Clone)]
pub struct Races {
    pub race: Arc<NodeType>,
    pub tag: Arc<NodeType>,
    pub eye_color: Arc<NodeType>,
    pub hair_color: Arc<NodeType>,
    pub skin_color: Arc<NodeType>,
    pub document: Arc<DocumentType>,
}

/// A child node holding a single `Object` reference, e.g. `<node id="Tags">`.
fn reference(name: &str, id: &str) -> Result<Arc<NodeType>> {
    NodeType::builder(name).id(id).attribute("Object", GUID).build()
}

pub(super) fn build() -> Result<Races> {
    let tag = reference("RaceTag", "Tags")?;
    let eye_color = reference("RaceEyeColor", "EyeColors")?;
    let hair_color = reference("RaceHairColor", "HairColors")?;
    let skin_color = reference("RaceSkinColor", "SkinColors")?;

    let race = NodeType::builder("Race")
        .attribute("Description", TRANSLATED_STRING)
        .attribute("DisplayName", TRANSLATED_STRING)
        .attribute("DisplayTypeUUID", GUID)
        .attribute("Name", FIXED_STRING)
        .attribute("ParentGuid", GUID)
        .attribute("ProgressionTableUUID", GUID)
        .attribute("RaceSoundSwitch", FIXED_STRING)
        .attribute("UUID", GUID)
        .child(&eye_color)
        .child(&hair_color)
        .child(&skin_color)
        .child(&tag)
        .build()?;

    let document = DocumentType::builder("Races")
        .path("Public/{folder}/Races/Races.lsx")
        .child(&race)
        .default_version(super::LSX_VERSION)
        .build()?;

    Ok(Races {
        race,
        tag,
        eye_color,
        hair_color,
        skin_color,
        document,
    })
}
