//! Class descriptions and level progressions
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::error::Result;
use crate::schema::attribute::{
    BOOL, FIXED_STRING, GUID, INT32, LS_STRING, LS_STRING_LIST, TRANSLATED_STRING, UINT8,
};
use crate::schema::{DocumentType, NodeType};

#[derive(Debug, Clone)]
pub struct Classes {
    pub class_description: Arc<NodeType>,
    pub class_tag: Arc<NodeType>,
    pub progression: Arc<NodeType>,
    pub sub_classes: Arc<NodeType>,
    pub sub_class: Arc<NodeType>,
    pub class_descriptions: Arc<DocumentType>,
    pub progressions: Arc<DocumentType>,
}

pub(super) fn build() -> Result<Classes> {
    let class_tag = NodeType::builder("ClassTag")
        .id("Tags")
        .attribute("Object", GUID)
        .build()?;

    let class_description = NodeType::builder("ClassDescription")
        .attribute("BaseHp", INT32)
        .attribute("CanLearnSpells", BOOL)
        .attribute("CharacterCreationPose", GUID)
        .attribute("ClassEquipment", FIXED_STRING)
        .attribute("Description", TRANSLATED_STRING)
        .attribute("DisplayName", TRANSLATED_STRING)
        .attribute("HpPerLevel", INT32)
        .attribute("LearningStrategy", UINT8)
        .attribute("MustPrepareSpells", BOOL)
        .attribute("Name", FIXED_STRING)
        .attribute("ParentGuid", GUID)
        .attribute("PrimaryAbility", UINT8)
        .attribute("ProgressionTableUUID", GUID)
        .attribute("SpellCastingAbility", UINT8)
        .attribute("SpellList", GUID)
        .attribute("SubclassTitle", TRANSLATED_STRING)
        .attribute("UUID", GUID)
        .child(&class_tag)
        .build()?;

    let sub_class = NodeType::builder("SubClass")
        .attribute("Object", GUID)
        .build()?;
    let sub_classes = NodeType::builder("SubClasses").child(&sub_class).build()?;

    let progression = NodeType::builder("Progression")
        .attribute("AllowImprovement", BOOL)
        .attribute("Boosts", LS_STRING_LIST)
        .attribute("Level", UINT8)
        .attribute("Name", LS_STRING)
        .attribute("PassivesAdded", LS_STRING_LIST)
        .attribute("PassivesRemoved", LS_STRING_LIST)
        .attribute("ProgressionType", UINT8)
        .attribute("Selectors", LS_STRING_LIST)
        .attribute("TableUUID", GUID)
        .attribute("UUID", GUID)
        .child(&sub_classes)
        .build()?;

    let class_descriptions = DocumentType::builder("ClassDescriptions")
        .path("Public/{folder}/ClassDescriptions/ClassDescriptions.lsx")
        .child(&class_description)
        .default_version(super::LSX_VERSION)
        .build()?;
    let progressions = DocumentType::builder("Progressions")
        .path("Public/{folder}/Progressions/Progressions.lsx")
        .child(&progression)
        .default_version(super::LSX_VERSION)
        .build()?;

    Ok(Classes {
        class_description,
        class_tag,
        progression,
        sub_classes,
        sub_class,
        class_descriptions,
        progressions,
    })
}
