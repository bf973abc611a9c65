//! Spell and passive lists
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::error::Result;
use crate::schema::attribute::{GUID, LS_STRING, LS_STRING_LIST};
use crate::schema::{DocumentType, NodeType};

#[derive(Debug, Clone)]
pub struct Lists {
    pub spell_list: Arc<NodeType>,
    pub passive_list: Arc<NodeType>,
    pub spell_lists: Arc<DocumentType>,
    pub passive_lists: Arc<DocumentType>,
}

pub(super) fn build() -> Result<Lists> {
    let spell_list = NodeType::builder("SpellList")
        .attribute("Comment", LS_STRING)
        .attribute("Spells", LS_STRING_LIST)
        .attribute("UUID", GUID)
        .build()?;
    let passive_list = NodeType::builder("PassiveList")
        .attribute("Comment", LS_STRING)
        .attribute("Passives", LS_STRING_LIST)
        .attribute("UUID", GUID)
        .build()?;

    let spell_lists = DocumentType::builder("SpellLists")
        .path("Public/{folder}/Lists/SpellLists.lsx")
        .child(&spell_list)
        .default_version(super::LSX_VERSION)
        .build()?;
    let passive_lists = DocumentType::builder("PassiveLists")
        .path("Public/{folder}/Lists/PassiveLists.lsx")
        .child(&passive_list)
        .default_version(super::LSX_VERSION)
        .build()?;

    Ok(Lists {
        spell_list,
        passive_list,
        spell_lists,
        passive_lists,
    })
}
