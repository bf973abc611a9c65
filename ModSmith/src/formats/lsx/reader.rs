//! LSX file reading
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`, 2015 Norbyte (`LSLib`, MIT)
//!
//! SPDX-License-Identifier: MIT
//!
//! The reader is strict: an element that is not part of the `.lsx` envelope,
//! or that appears under the wrong parent, aborts the parse. Generated mod
//! content has to be exact, so nothing is skipped on a best-effort basis.

use super::document::{LsxAttribute, LsxDocument, LsxNode, LsxRegion, LsxVersion};
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::path::Path;

/// An element that has been opened but not yet closed.
enum Frame {
    Save,
    Version(LsxVersion),
    Region(LsxRegion),
    Node(LsxNode),
    Children(Vec<LsxNode>),
    Attribute(LsxAttribute),
}

impl Frame {
    fn tag(&self) -> &'static str {
        match self {
            Frame::Save => "save",
            Frame::Version(_) => "version",
            Frame::Region(_) => "region",
            Frame::Node(_) => "node",
            Frame::Children(_) => "children",
            Frame::Attribute(_) => "attribute",
        }
    }
}

/// Read an LSX file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or has invalid XML.
pub fn read_lsx<P: AsRef<Path>>(path: P) -> Result<LsxDocument> {
    let path = path.as_ref();
    tracing::debug!("Reading LSX: {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_lsx(&content)
}

/// Parse LSX from XML string
///
/// # Errors
/// Returns an error if the XML is malformed or has an invalid structure.
pub fn parse_lsx(content: &str) -> Result<LsxDocument> {
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut doc = LsxDocument::default();
    let mut stack: Vec<Frame> = Vec::new();
    let mut seen_save = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let frame = open_element(&stack, &e, &mut seen_save)?;
                stack.push(frame);
            }
            Event::Empty(e) => {
                let frame = open_element(&stack, &e, &mut seen_save)?;
                close_element(&mut doc, &mut stack, frame)?;
            }
            Event::End(_) => {
                // quick-xml already verified that the end tag matches
                let frame = stack.pop().ok_or(Error::UnexpectedEof)?;
                close_element(&mut doc, &mut stack, frame)?;
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if !text.trim().is_empty() {
                    return Err(Error::UnexpectedText {
                        parent: parent_tag(&stack).to_string(),
                        text: text.into_owned(),
                    });
                }
            }
            Event::CData(c) => {
                return Err(Error::UnexpectedText {
                    parent: parent_tag(&stack).to_string(),
                    text: String::from_utf8_lossy(&c).into_owned(),
                });
            }
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype
            _ => {}
        }
    }

    if !stack.is_empty() || !seen_save {
        return Err(Error::UnexpectedEof);
    }

    Ok(doc)
}

fn parent_tag(stack: &[Frame]) -> &'static str {
    stack.last().map_or("document", Frame::tag)
}

fn open_element(stack: &[Frame], e: &BytesStart<'_>, seen_save: &mut bool) -> Result<Frame> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let unexpected = || Error::UnexpectedTag {
        parent: parent_tag(stack).to_string(),
        found: name.clone(),
    };

    match (name.as_str(), stack.last()) {
        ("save", None) if !*seen_save => {
            *seen_save = true;
            Ok(Frame::Save)
        }
        ("version", Some(Frame::Save)) => Ok(Frame::Version(parse_version(e)?)),
        ("region", Some(Frame::Save)) => Ok(Frame::Region(LsxRegion {
            id: required_attr(e, "region", "id")?,
            nodes: Vec::new(),
        })),
        ("node", Some(Frame::Region(_) | Frame::Children(_))) => {
            Ok(Frame::Node(LsxNode::new(required_attr(e, "node", "id")?)))
        }
        ("children", Some(Frame::Node(_))) => Ok(Frame::Children(Vec::new())),
        ("attribute", Some(Frame::Node(_))) => Ok(Frame::Attribute(parse_attribute(e)?)),
        _ => Err(unexpected()),
    }
}

fn close_element(doc: &mut LsxDocument, stack: &mut [Frame], frame: Frame) -> Result<()> {
    let parent = stack.last_mut();
    match (frame, parent) {
        (Frame::Save, None) => {}
        (Frame::Version(version), _) => doc.version = Some(version),
        (Frame::Region(region), _) => doc.regions.push(region),
        (Frame::Node(node), Some(Frame::Region(region))) => region.nodes.push(node),
        (Frame::Node(node), Some(Frame::Children(children))) => children.push(node),
        (Frame::Children(children), Some(Frame::Node(node))) => {
            if node.children.is_some() {
                return Err(Error::UnexpectedTag {
                    parent: node.id.clone(),
                    found: "children".to_string(),
                });
            }
            node.children = Some(children);
        }
        (Frame::Attribute(attribute), Some(Frame::Node(node))) => node.attributes.push(attribute),
        (frame, parent) => {
            return Err(Error::UnexpectedTag {
                parent: parent.map_or("document", |p| p.tag()).to_string(),
                found: frame.tag().to_string(),
            });
        }
    }
    Ok(())
}

/// Collect an element's XML attributes as unescaped (key, value) pairs
fn xml_attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    e.attributes()
        .map(|attr| {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            Ok((key, value))
        })
        .collect()
}

fn required_attr(
    e: &BytesStart<'_>,
    element: &'static str,
    attribute: &'static str,
) -> Result<String> {
    xml_attributes(e)?
        .into_iter()
        .find_map(|(key, value)| (key == attribute).then_some(value))
        .ok_or(Error::MissingXmlAttribute { element, attribute })
}

fn parse_version(e: &BytesStart<'_>) -> Result<LsxVersion> {
    let mut version = LsxVersion::default();
    for (key, value) in xml_attributes(e)? {
        let slot = match key.as_str() {
            "major" => &mut version.major,
            "minor" => &mut version.minor,
            "revision" => &mut version.revision,
            "build" => &mut version.build,
            // lslib_meta and friends
            _ => continue,
        };
        *slot = value.parse().map_err(|_| Error::InvalidVersion {
            component: key.clone(),
            value: value.clone(),
        })?;
    }
    Ok(version)
}

fn parse_attribute(e: &BytesStart<'_>) -> Result<LsxAttribute> {
    let mut id = None;
    let mut type_name = None;
    let mut value = None;
    let mut handle = None;
    let mut version = None;

    for (key, raw) in xml_attributes(e)? {
        match key.as_str() {
            "id" => id = Some(raw),
            "type" => type_name = Some(raw),
            "value" => value = Some(raw),
            "handle" => handle = Some(raw),
            "version" => version = Some(raw),
            other => tracing::warn!("Ignoring unknown XML attribute '{other}' on <attribute>"),
        }
    }

    let id = id.ok_or(Error::MissingXmlAttribute {
        element: "attribute",
        attribute: "id",
    })?;
    let type_name = type_name.ok_or(Error::MissingXmlAttribute {
        element: "attribute",
        attribute: "type",
    })?;
    let version = match version {
        Some(raw) => Some(raw.parse::<u16>().map_err(|_| Error::InvalidAttributeValue {
            attribute: id.clone(),
            type_name: type_name.clone(),
            value: raw.clone(),
        })?),
        None => None,
    };

    Ok(LsxAttribute {
        id,
        type_name,
        value,
        handle,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPELL_LISTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<save>
    <version major="4" minor="0" revision="9" build="331" lslib_meta="v1,bswap_guids"/>
    <region id="SpellLists">
        <node id="root">
            <children>
                <node id="SpellList">
                    <attribute id="Comment" type="LSString" value="Wizard &amp; friends"/>
                    <attribute id="Spells" type="LSString" value="Projectile_FireBolt;Target_Shocking_Grasp"/>
                    <attribute id="UUID" type="guid" value="11111111-0000-0000-0000-000000000000"/>
                </node>
            </children>
        </node>
    </region>
</save>"#;

    #[test]
    fn test_parse_envelope() {
        let doc = parse_lsx(SPELL_LISTS).unwrap();
        assert_eq!(doc.version, Some(LsxVersion::new(4, 0, 9, 331)));
        assert_eq!(doc.regions.len(), 1);

        let region = &doc.regions[0];
        assert_eq!(region.id, "SpellLists");
        assert_eq!(region.nodes.len(), 1);

        let root = &region.nodes[0];
        assert_eq!(root.id, "root");
        let lists = root.child_nodes();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].attributes.len(), 3);
        assert_eq!(lists[0].attributes[0].value.as_deref(), Some("Wizard & friends"));
        assert!(lists[0].children.is_none());
    }

    #[test]
    fn test_parse_translated_attribute() {
        let doc = parse_lsx(
            r#"<save><region id="R"><node id="root"><children><node id="X">
                <attribute id="DisplayName" type="TranslatedString" handle="h123" version="3"/>
            </node></children></node></region></save>"#,
        )
        .unwrap();
        let attr = &doc.regions[0].nodes[0].child_nodes()[0].attributes[0];
        assert_eq!(attr.handle.as_deref(), Some("h123"));
        assert_eq!(attr.version, Some(3));
        assert_eq!(attr.value, None);
    }

    #[test]
    fn test_empty_children_element_is_kept() {
        let doc =
            parse_lsx(r#"<save><region id="R"><node id="root"><children/></node></region></save>"#)
                .unwrap();
        assert_eq!(doc.regions[0].nodes[0].children, Some(Vec::new()));
        assert_eq!(doc.version, None);
    }

    #[test]
    fn test_unexpected_tag_is_fatal() {
        let err =
            parse_lsx(r#"<save><region id="R"><node id="root"><bogus/></node></region></save>"#)
                .unwrap_err();
        assert!(matches!(err, Error::UnexpectedTag { ref found, .. } if found == "bogus"));
    }

    #[test]
    fn test_misplaced_node_is_fatal() {
        let err = parse_lsx(r#"<save><node id="root"/></save>"#).unwrap_err();
        assert!(matches!(err, Error::UnexpectedTag { ref parent, .. } if parent == "save"));
    }

    #[test]
    fn test_text_is_fatal() {
        let err = parse_lsx(r#"<save><region id="R">stray</region></save>"#).unwrap_err();
        assert!(matches!(err, Error::UnexpectedText { .. }));
    }

    #[test]
    fn test_missing_attribute_type() {
        let err = parse_lsx(
            r#"<save><region id="R"><node id="root"><attribute id="A" value="1"/></node></region></save>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingXmlAttribute { attribute: "type", .. }
        ));
    }

    #[test]
    fn test_truncated_document() {
        assert!(parse_lsx("<save><region id=\"R\">").is_err());
        assert!(matches!(parse_lsx("").unwrap_err(), Error::UnexpectedEof));
    }

    #[test]
    fn test_bad_version_component() {
        let err = parse_lsx(r#"<save><version major="four"/></save>"#).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { .. }));
    }
}
