//! End-to-end tests: build nodes, route them to files, load them back

use std::fs;
use std::sync::Arc;

use modsmith::catalog::{self, Catalog, LSX_VERSION, ModuleMeta};
use modsmith::formats::lsx::PROLOGUE;
use modsmith::prelude::*;
use modsmith::schema::registry;
use pretty_assertions::assert_eq;

fn vars(folder: &str) -> PathVars {
    PathVars::from([("folder".to_string(), folder.to_string())])
}

fn entry_schemas() -> (Arc<NodeType>, Arc<DocumentType>) {
    let entry = NodeType::builder("Entry")
        .attribute("Key", INT32)
        .attribute("Value", LS_STRING)
        .build()
        .unwrap();
    let doc = DocumentType::builder("X")
        .path("Public/{folder}/X.lsx")
        .child(&entry)
        .build()
        .unwrap();
    (entry, doc)
}

fn entry(node_type: &Arc<NodeType>, key: i64, value: &str) -> Node {
    Node::new(node_type)
        .attr("Key", key)
        .unwrap()
        .attr("Value", value)
        .unwrap()
}

#[test]
fn test_tag_to_xml() {
    let tag_type = NodeType::builder("Tag")
        .attribute("Name", FIXED_STRING)
        .attribute("UUID", GUID)
        .build()
        .unwrap();
    let tag = Node::with_attributes(
        &tag_type,
        [("Name", "FOO"), ("UUID", "11111111-0000-0000-0000-000000000000")],
    )
    .unwrap();

    assert_eq!(
        tag.to_xml_string().unwrap(),
        r#"<node id="Tag"><attribute id="Name" type="FixedString" value="FOO"/><attribute id="UUID" type="guid" value="11111111-0000-0000-0000-000000000000"/></node>"#
    );
}

#[test]
fn test_save_resolves_path_template() {
    let dir = tempfile::tempdir().unwrap();
    let (entry_type, doc_type) = entry_schemas();
    let doc = Document::with_children(&doc_type, [entry(&entry_type, 1, "a")]).unwrap();

    let path = doc.save(dir.path(), None, &vars("MyMod")).unwrap();
    assert_eq!(path, dir.path().join("Public/MyMod/X.lsx"));
    assert!(path.is_file());

    let err = doc.save(dir.path(), None, &PathVars::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingPathVariable { ref variable, .. } if variable == "folder"
    ));
}

#[test]
fn test_merge_into_loaded_document() {
    let dir = tempfile::tempdir().unwrap();
    let (entry_type, doc_type) = entry_schemas();
    let shipped = Document::with_children(
        &doc_type,
        [entry(&entry_type, 1, "a"), entry(&entry_type, 2, "b")],
    )
    .unwrap();
    let path = dir.path().join("X.lsx");
    shipped.write_to(&path, Some(LSX_VERSION)).unwrap();

    let mut loaded = Document::load(&doc_type, &path).unwrap();
    let key = |n: &Node| n.get("Key").and_then(Value::as_i64);
    loaded
        .children_mut()
        .update([entry(&entry_type, 2, "c"), entry(&entry_type, 3, "d")], key)
        .unwrap();
    loaded.children_mut().sort_by_key(key);

    let merged: Vec<(Option<i64>, Option<&str>)> = loaded
        .children()
        .iter()
        .map(|n| (key(n), n.get_str("Value")))
        .collect();
    assert_eq!(
        merged,
        vec![(Some(1), Some("a")), (Some(2), Some("c")), (Some(3), Some("d"))]
    );

    let err = loaded
        .children_mut()
        .replace_matching([entry(&entry_type, 9, "z")], key)
        .unwrap_err();
    assert!(matches!(err, Error::UnmatchedContent { ref keys } if keys.len() == 1));
}

#[test]
fn test_round_trip_is_byte_identical() {
    let catalog = Catalog::build().unwrap();
    let lists = &catalog.lists;
    let spell_list = Node::new(&lists.spell_list)
        .attr("Comment", "Wizard \"cantrips\" & <friends>")
        .unwrap()
        .attr("Spells", ["Projectile_FireBolt", "Target_ShockingGrasp"])
        .unwrap()
        .attr("UUID", ids::stable_guid("MyMod", "WizardCantrips"))
        .unwrap();
    let doc = Document::with_children(&lists.spell_lists, [spell_list]).unwrap();

    let first = doc.to_lsx_string(Some(LSX_VERSION)).unwrap();
    assert!(first.starts_with(PROLOGUE));
    let reloaded = catalog.registry().load_str(&first).unwrap();
    assert_eq!(reloaded, doc);
    assert_eq!(reloaded.to_lsx_string(Some(LSX_VERSION)).unwrap(), first);
}

#[test]
fn test_registry_fans_out_to_files() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog::standard().unwrap();
    let tag_uuid = ids::stable_guid("MyMod", "Tag.Gnoll");

    let tag = Node::new(&catalog.tags.tag)
        .attr("Name", "GNOLL")
        .unwrap()
        .attr("UUID", tag_uuid.as_str())
        .unwrap()
        .attr("DisplayName", ids::stable_handle("MyMod", "Tag.Gnoll"))
        .unwrap();
    let race = Node::new(&catalog.races.race)
        .attr("Name", "Gnoll")
        .unwrap()
        .attr("UUID", ids::stable_guid("MyMod", "Race.Gnoll"))
        .unwrap()
        .child(Node::new(&catalog.races.tag).attr("Object", tag_uuid.as_str()).unwrap())
        .unwrap();
    let passives = Node::new(&catalog.lists.passive_list)
        .attr("Passives", ["Darkvision", "PackTactics"])
        .unwrap()
        .attr("UUID", ids::stable_guid("MyMod", "Passives.Gnoll"))
        .unwrap();

    let paths = catalog
        .registry()
        .save([tag.clone(), race, passives], dir.path(), None, &vars("MyMod"))
        .unwrap();
    assert_eq!(
        paths,
        vec![
            dir.path().join(format!("Public/MyMod/Tags/{tag_uuid}.lsx")),
            dir.path().join("Public/MyMod/Races/Races.lsx"),
            dir.path().join("Public/MyMod/Lists/PassiveLists.lsx"),
        ]
    );

    // Default version comes from the document type
    let text = fs::read_to_string(&paths[0]).unwrap();
    assert!(text.contains(r#"<version major="4" minor="0" revision="9" build="331"/>"#));
    assert!(text.contains(r#"<region id="Tags">"#));

    let loaded_tag = catalog.registry().load(&paths[0]).unwrap();
    assert_eq!(loaded_tag.children().as_slice(), &[tag]);

    let loaded_race = catalog.registry().load(&paths[1]).unwrap();
    let race = &loaded_race.children()[0];
    assert_eq!(race.children()[0].type_name(), "RaceTag");
    assert_eq!(race.children()[0].get_str("Object"), Some(tag_uuid.as_str()));
}

#[test]
fn test_load_through_unpacked_archives() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = Catalog::build().unwrap();
    let shipped = Document::with_children(
        &catalog.lists.spell_lists,
        [Node::new(&catalog.lists.spell_list).attr("UUID", "s1").unwrap()],
    )
    .unwrap();
    shipped
        .write_to(dir.path().join("Shared/Public/Shared/Lists/SpellLists.lsx"), None)
        .unwrap();

    let archives = UnpackedArchives::new(dir.path());
    let doc = catalog
        .registry()
        .load_virtual(&archives, "Shared/Public/Shared/Lists/SpellLists.lsx")
        .unwrap();
    assert_eq!(doc, shipped);

    let mut cache = DocumentCache::default();
    let cached = cache
        .load_virtual(catalog.registry(), &archives, "Shared/Public/Shared/Lists/SpellLists.lsx")
        .unwrap();
    assert_eq!(cached, shipped);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_manifest_drives_save() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("modsmith.toml");
    fs::write(
        &manifest_path,
        "[project]\nname = \"Gnolls\"\nfolder = \"Gnolls\"\n[lsx]\nversion = \"4.0.9.328\"\n",
    )
    .unwrap();
    let manifest = ProjectManifest::load(&manifest_path).unwrap();

    let catalog = Catalog::build().unwrap();
    let meta = ModuleMeta {
        name: manifest.project.name.clone(),
        folder: manifest.project.folder.clone(),
        author: "Me".to_string(),
        description: String::new(),
        uuid: ids::stable_guid("Gnolls", "meta"),
        version: (1, 0, 0, 0),
    }
    .to_document(&catalog.meta)
    .unwrap();

    let path = meta
        .save(
            manifest.output_dir().unwrap(),
            Some(manifest.lsx_version().unwrap()),
            &manifest.path_vars(),
        )
        .unwrap();
    assert_eq!(path, dir.path().join("build/Mods/Gnolls/meta.lsx"));
    assert!(fs::read_to_string(&path).unwrap().contains(r#"build="328""#));
    assert_eq!(catalog.registry().load(&path).unwrap(), meta);
}

#[test]
fn test_global_registry_installs_once() {
    let registry = catalog::standard().unwrap().registry().clone();
    let installed = registry::install(registry.clone()).unwrap();
    assert!(std::ptr::eq(installed, registry::global().unwrap()));
    assert_eq!(installed.document_types().len(), registry.document_types().len());

    assert!(matches!(
        registry::install(registry),
        Err(Error::RegistryAlreadyInstalled)
    ));
}
