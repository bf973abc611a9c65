//! CLI command for summarizing the nodes in an `.lsx` file

use std::path::Path;

use indexmap::IndexMap;

use crate::catalog;
use crate::schema::Node;

/// Attributes tried, in order, to label a node in the summary
const LABEL_ATTRIBUTES: [&str; 4] = ["Name", "Comment", "UUID", "Object"];

fn label(node: &Node) -> String {
    LABEL_ATTRIBUTES
        .iter()
        .find_map(|name| node.get(name).map(ToString::to_string))
        .unwrap_or_default()
}

pub fn execute(source: &Path, json: bool) -> anyhow::Result<()> {
    let doc = catalog::standard()?.registry().load(source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(doc.children().as_slice())?);
        return Ok(());
    }

    let doc_type = doc.doc_type();
    println!("Document: {}", doc_type.name());
    println!("Region:   {}", doc_type.region());
    println!("Nodes:    {}", doc.children().len());

    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for node in doc.children() {
        *counts.entry(node.type_name()).or_default() += 1;
    }
    for (type_name, count) in &counts {
        println!("  {type_name}: {count}");
    }

    println!();
    for node in doc.children() {
        println!(
            "  {:<20} {:<40} {} attributes, {} children",
            node.type_name(),
            label(node),
            node.attributes().count(),
            node.children().len()
        );
    }
    Ok(())
}
