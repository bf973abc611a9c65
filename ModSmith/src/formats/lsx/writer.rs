//! LSX file writing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::document::{LsxAttribute, LsxDocument, LsxNode};
use crate::error::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Fixed header written before every generated document body.
///
/// Supplies the XML declaration, so the body itself never carries one.
pub const PROLOGUE: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
    "<!-- Generated by modsmith ",
    env!("CARGO_PKG_VERSION"),
    ". Edits made by hand will be overwritten on the next build. -->\n",
);

/// Write an LSX document to disk, creating parent directories as needed
///
/// # Errors
/// Returns an error if serialization or file writing fails.
pub fn write_lsx<P: AsRef<Path>>(doc: &LsxDocument, path: P) -> Result<()> {
    write_lsx_text(&serialize_lsx(doc)?, path)
}

/// Write already serialized document text, creating parent directories
///
/// # Errors
/// Returns an error if a directory or the file cannot be written.
pub fn write_lsx_text<P: AsRef<Path>>(xml: &str, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    // The handle is dropped (and closed) on every path out of this block
    let mut file = fs::File::create(path)?;
    file.write_all(xml.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Serialize LSX document to XML string, prologue included
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_lsx(doc: &LsxDocument) -> Result<String> {
    let mut output = Vec::new();
    output.extend_from_slice(PROLOGUE.as_bytes());

    let mut writer = Writer::new_with_indent(&mut output, b' ', 4);

    // <save>
    writer.write_event(Event::Start(BytesStart::new("save")))?;

    // <version>
    if let Some(version) = doc.version {
        let mut tag = BytesStart::new("version");
        tag.push_attribute(("major", version.major.to_string().as_str()));
        tag.push_attribute(("minor", version.minor.to_string().as_str()));
        tag.push_attribute(("revision", version.revision.to_string().as_str()));
        tag.push_attribute(("build", version.build.to_string().as_str()));
        writer.write_event(Event::Empty(tag))?;
    }

    // <region>s
    for region in &doc.regions {
        let mut region_tag = BytesStart::new("region");
        region_tag.push_attribute(("id", region.id.as_str()));
        writer.write_event(Event::Start(region_tag.borrow()))?;

        for node in &region.nodes {
            write_node(&mut writer, node)?;
        }

        writer.write_event(Event::End(BytesEnd::new("region")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("save")))?;

    output.push(b'\n');
    Ok(String::from_utf8(output)?)
}

/// Serialize a single node without any indentation or prologue
///
/// # Errors
/// Returns an error if XML serialization fails.
pub fn serialize_node_compact(node: &LsxNode) -> Result<String> {
    let mut output = Vec::new();
    let mut writer = Writer::new(&mut output);
    write_node(&mut writer, node)?;
    Ok(String::from_utf8(output)?)
}

fn write_node<W: std::io::Write>(writer: &mut Writer<W>, node: &LsxNode) -> Result<()> {
    let mut node_start = BytesStart::new("node");
    node_start.push_attribute(("id", node.id.as_str()));

    if node.attributes.is_empty() && node.children.is_none() {
        writer.write_event(Event::Empty(node_start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(node_start.borrow()))?;

    for attr in &node.attributes {
        writer.write_event(Event::Empty(attribute_tag(attr)))?;
    }

    match node.children.as_deref() {
        Some([]) => {
            writer.write_event(Event::Empty(BytesStart::new("children")))?;
        }
        Some(children) => {
            writer.write_event(Event::Start(BytesStart::new("children")))?;
            for child in children {
                write_node(writer, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new("children")))?;
        }
        None => {}
    }

    writer.write_event(Event::End(BytesEnd::new("node")))?;
    Ok(())
}

fn attribute_tag(attr: &LsxAttribute) -> BytesStart<'_> {
    let mut tag = BytesStart::new("attribute");
    tag.push_attribute(("id", attr.id.as_str()));
    tag.push_attribute(("type", attr.type_name.as_str()));

    if let Some(ref handle) = attr.handle {
        // TranslatedString
        tag.push_attribute(("handle", handle.as_str()));
        if let Some(version) = attr.version {
            tag.push_attribute(("version", version.to_string().as_str()));
        }
    } else if let Some(ref value) = attr.value {
        tag.push_attribute(("value", value.as_str()));
    }
    tag
}
