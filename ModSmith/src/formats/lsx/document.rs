//! LSX document structures
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An LSX (Larian Save XML) document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxDocument {
    /// Optional `<version>` header.
    pub version: Option<LsxVersion>,
    /// Document regions containing the data.
    pub regions: Vec<LsxRegion>,
}

/// The `<version major minor revision build>` header element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LsxVersion {
    /// Major version number.
    pub major: u32,
    /// Minor version number.
    pub minor: u32,
    /// Revision number.
    pub revision: u32,
    /// Build number.
    pub build: u32,
}

/// A region in an LSX document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxRegion {
    /// Region identifier.
    pub id: String,
    /// Root nodes in this region.
    pub nodes: Vec<LsxNode>,
}

/// A node in an LSX document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxNode {
    /// Node identifier/type.
    pub id: String,
    /// Attributes on this node, in document order.
    pub attributes: Vec<LsxAttribute>,
    /// Child nodes. `None` when the node has no `<children>` element at all.
    pub children: Option<Vec<LsxNode>>,
}

/// An attribute on an LSX node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LsxAttribute {
    /// Attribute identifier/name.
    pub id: String,
    /// Type name (e.g., "`FixedString`", "`int32`").
    pub type_name: String,
    /// Literal value, for every type except translated strings.
    pub value: Option<String>,
    /// Localization handle for translated strings.
    pub handle: Option<String>,
    /// Version number for translated strings.
    pub version: Option<u16>,
}

impl LsxVersion {
    /// Creates a version header.
    #[must_use]
    pub const fn new(major: u32, minor: u32, revision: u32, build: u32) -> Self {
        Self {
            major,
            minor,
            revision,
            build,
        }
    }
}

impl fmt::Display for LsxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.revision, self.build
        )
    }
}

impl FromStr for LsxVersion {
    type Err = String;

    /// Parses "4.0.9.331"; missing trailing components default to 0.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            return Err(format!("invalid version '{s}'"));
        }
        let mut numbers = [0u32; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("invalid version component '{part}' in '{s}'"))?;
        }
        Ok(Self::new(numbers[0], numbers[1], numbers[2], numbers[3]))
    }
}

impl LsxDocument {
    /// Creates an empty document with an optional version header.
    #[must_use]
    pub fn new(version: Option<LsxVersion>) -> Self {
        LsxDocument {
            version,
            regions: Vec::new(),
        }
    }
}

impl LsxNode {
    /// Creates a new LSX node with the given ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        LsxNode {
            id: id.into(),
            attributes: Vec::new(),
            children: None,
        }
    }

    /// Child nodes, empty when there is no `<children>` element.
    #[must_use]
    pub fn child_nodes(&self) -> &[LsxNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

impl LsxAttribute {
    /// Creates a literal-valued attribute.
    #[must_use]
    pub fn with_value(
        id: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        LsxAttribute {
            id: id.into(),
            type_name: type_name.into(),
            value: Some(value.into()),
            handle: None,
            version: None,
        }
    }

    /// Creates a translated-string attribute.
    #[must_use]
    pub fn with_handle(
        id: impl Into<String>,
        type_name: impl Into<String>,
        handle: impl Into<String>,
        version: u16,
    ) -> Self {
        LsxAttribute {
            id: id.into(),
            type_name: type_name.into(),
            value: None,
            handle: Some(handle.into()),
            version: Some(version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        assert_eq!("4.0.9.331".parse::<LsxVersion>(), Ok(LsxVersion::new(4, 0, 9, 331)));
        assert_eq!("4.7".parse::<LsxVersion>(), Ok(LsxVersion::new(4, 7, 0, 0)));
        assert!("4.x".parse::<LsxVersion>().is_err());
        assert!("1.2.3.4.5".parse::<LsxVersion>().is_err());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(LsxVersion::new(4, 0, 9, 331).to_string(), "4.0.9.331");
    }
}
