//! Module metadata (`Mods/<folder>/meta.lsx`)
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::error::Result;
use crate::schema::attribute::{FIXED_STRING, GUID, INT64, LS_STRING, UINT8, UINT64};
use crate::schema::{Document, DocumentType, Node, NodeType};

/// Convert version components to BG3's int64 format
///
/// BG3 version format: major << 55 | minor << 47 | patch << 31 | build
#[must_use]
pub fn version_to_int64(major: u32, minor: u32, patch: u32, build: u32) -> i64 {
    (i64::from(major) << 55)
        | (i64::from(minor) << 47)
        | (i64::from(patch) << 31)
        | i64::from(build)
}

/// Split a `Version64` value back into (major, minor, patch, build)
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn int64_to_version(version64: i64) -> (u32, u32, u32, u32) {
    let major = ((version64 >> 55) & 0x7F) as u32;
    let minor = ((version64 >> 47) & 0xFF) as u32;
    let patch = ((version64 >> 31) & 0xFFFF) as u32;
    let build = (version64 & 0x7FFF_FFFF) as u32;
    (major, minor, patch, build)
}

#[derive(Debug, Clone)]
pub struct Meta {
    pub dependencies: Arc<NodeType>,
    pub module_short_desc: Arc<NodeType>,
    pub module_info: Arc<NodeType>,
    pub publish_version: Arc<NodeType>,
    pub target_modes: Arc<NodeType>,
    pub target: Arc<NodeType>,
    pub document: Arc<DocumentType>,
}

pub(super) fn build() -> Result<Meta> {
    let module_short_desc = NodeType::builder("ModuleShortDesc")
        .attribute("Folder", LS_STRING)
        .attribute("MD5", LS_STRING)
        .attribute("Name", LS_STRING)
        .attribute("PublishHandle", UINT64)
        .attribute("UUID", GUID)
        .attribute("Version64", INT64)
        .build()?;
    let dependencies = NodeType::builder("Dependencies")
        .child(&module_short_desc)
        .build()?;

    let publish_version = NodeType::builder("PublishVersion")
        .attribute("Version64", INT64)
        .build()?;
    let target = NodeType::builder("Target")
        .attribute("Object", FIXED_STRING)
        .build()?;
    let target_modes = NodeType::builder("TargetModes").child(&target).build()?;

    let module_info = NodeType::builder("ModuleInfo")
        .attribute("Author", LS_STRING)
        .attribute("CharacterCreationLevelName", FIXED_STRING)
        .attribute("Description", LS_STRING)
        .attribute("Folder", LS_STRING)
        .attribute("LobbyLevelName", FIXED_STRING)
        .attribute("MD5", LS_STRING)
        .attribute("MainMenuBackgroundVideo", FIXED_STRING)
        .attribute("MenuLevelName", FIXED_STRING)
        .attribute("Name", LS_STRING)
        .attribute("NumPlayers", UINT8)
        .attribute("PhotoBooth", FIXED_STRING)
        .attribute("StartupLevelName", FIXED_STRING)
        .attribute("Tags", LS_STRING)
        .attribute("Type", FIXED_STRING)
        .attribute("UUID", FIXED_STRING)
        .attribute("Version64", INT64)
        .child(&publish_version)
        .child(&target_modes)
        .build()?;

    let document = DocumentType::builder("Meta")
        .region("Config")
        .path("Mods/{folder}/meta.lsx")
        .child(&dependencies)
        .child(&module_info)
        .default_version(super::LSX_VERSION)
        .build()?;

    Ok(Meta {
        dependencies,
        module_short_desc,
        module_info,
        publish_version,
        target_modes,
        target,
        document,
    })
}

/// The identifying fields of a mod, rendered as a complete `meta.lsx`.
#[derive(Debug, Clone)]
pub struct ModuleMeta {
    pub name: String,
    pub folder: String,
    pub author: String,
    pub description: String,
    pub uuid: String,
    /// (major, minor, patch, build)
    pub version: (u32, u32, u32, u32),
}

impl ModuleMeta {
    /// Build the meta document for an add-on targeting story mode.
    ///
    /// # Errors
    /// Returns an error only if `meta` was not built by this module.
    pub fn to_document(&self, meta: &Meta) -> Result<Document> {
        let (major, minor, patch, build) = self.version;
        let version64 = version_to_int64(major, minor, patch, build);

        let mut info = Node::with_attributes(
            &meta.module_info,
            [
                ("Author", self.author.as_str()),
                ("CharacterCreationLevelName", ""),
                ("Description", self.description.as_str()),
                ("Folder", self.folder.as_str()),
                ("LobbyLevelName", ""),
                ("MD5", ""),
                ("MainMenuBackgroundVideo", ""),
                ("MenuLevelName", ""),
                ("Name", self.name.as_str()),
                ("PhotoBooth", ""),
                ("StartupLevelName", ""),
                ("Tags", ""),
                ("Type", "Add-on"),
                ("UUID", self.uuid.as_str()),
            ],
        )?;
        info.set("NumPlayers", 4)?;
        info.set("Version64", version64)?;
        info.add_child(Node::new(&meta.publish_version).attr("Version64", version64)?)?;
        info.add_child(
            Node::new(&meta.target_modes)
                .child(Node::new(&meta.target).attr("Object", "Story")?)?,
        )?;

        Document::with_children(&meta.document, [Node::new(&meta.dependencies), info])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DocumentLayout, Value};

    #[test]
    fn test_version64_round_trip() {
        assert_eq!(version_to_int64(1, 0, 0, 0), 36_028_797_018_963_968);
        let v = version_to_int64(1, 2, 3, 4);
        assert_eq!(int64_to_version(v), (1, 2, 3, 4));
    }

    #[test]
    fn test_module_meta_document() {
        let meta = build().unwrap();
        assert_eq!(meta.document.region(), "Config");
        assert_eq!(meta.document.layout(), DocumentLayout::Children);

        let doc = ModuleMeta {
            name: "My Mod".to_string(),
            folder: "MyMod".to_string(),
            author: "Me".to_string(),
            description: "Adds <things> & stuff".to_string(),
            uuid: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            version: (1, 0, 0, 0),
        }
        .to_document(&meta)
        .unwrap();

        let info = &doc.children()[1];
        assert_eq!(info.get_str("Folder"), Some("MyMod"));
        assert_eq!(info.get("NumPlayers"), Some(&Value::Integer(4)));
        assert_eq!(
            info.children()[0].get("Version64"),
            Some(&Value::Integer(36_028_797_018_963_968))
        );

        let text = doc.to_lsx_string(meta.document.default_version()).unwrap();
        assert!(text.contains(r#"<region id="Config">"#));
        assert!(text.contains(r#"value="Adds &lt;things&gt; &amp; stuff""#));
        assert!(text.contains(r#"<attribute id="Object" type="FixedString" value="Story"/>"#));
    }
}
