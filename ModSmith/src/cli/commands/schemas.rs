//! CLI command for listing the standard schemas

use crate::catalog;
use crate::schema::{DocumentLayout, NodeType};

fn print_node_type(node_type: &NodeType, depth: usize) {
    let indent = "  ".repeat(depth);
    if node_type.id() == node_type.name() {
        println!("{indent}{}", node_type.name());
    } else {
        println!("{indent}{} (id \"{}\")", node_type.name(), node_type.id());
    }
    for (name, attribute_type) in node_type.attributes() {
        println!("{indent}    {name}: {}", attribute_type.type_name());
    }
    for child in node_type.child_types() {
        print_node_type(child, depth + 1);
    }
}

pub fn execute() -> anyhow::Result<()> {
    let registry = catalog::standard()?.registry();

    for doc_type in registry.document_types() {
        let layout = match doc_type.layout() {
            DocumentLayout::Children => "children",
            DocumentLayout::SingleNode => "single node",
        };
        println!("{}", doc_type.name());
        println!("  region: {}  root: {}  layout: {layout}", doc_type.region(), doc_type.root());
        println!("  path:   {}", doc_type.path());
        for node_type in doc_type.child_types() {
            print_node_type(node_type, 1);
        }
        println!();
    }
    Ok(())
}
