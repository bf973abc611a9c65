//! Attribute types and values
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! An [`AttributeType`] pairs the wire type name written into the XML `type`
//! attribute with the shape of value it holds. It owns both directions of the
//! mapping between a typed [`Value`] and a single `<attribute>` element.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::formats::lsx::LsxAttribute;

/// Separator used to join list values into one attribute string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `;` (spell, boost and selector lists)
    Semicolon,
    /// `,`
    Comma,
}

impl Separator {
    /// The separator character as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Separator::Semicolon => ";",
            Separator::Comma => ",",
        }
    }
}

/// The shape of value an attribute type holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    /// Whole number within the inclusive range of the wire type.
    Integer { min: i128, max: i128 },
    Float,
    String,
    List(Separator),
    Translation,
}

impl ValueKind {
    /// Human-readable name used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            ValueKind::Bool => "boolean",
            ValueKind::Integer { .. } => "integer",
            ValueKind::Float => "number",
            ValueKind::String => "string",
            ValueKind::List(_) => "list",
            ValueKind::Translation => "translation",
        }
    }
}

/// Immutable descriptor for one wire attribute type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeType {
    type_name: &'static str,
    kind: ValueKind,
}

pub const BOOL: AttributeType = AttributeType::new("bool", ValueKind::Bool);
pub const INT8: AttributeType = AttributeType::integer("int8", -0x80, 0x7F);
pub const INT16: AttributeType = AttributeType::integer("int16", -0x8000, 0x7FFF);
pub const INT32: AttributeType = AttributeType::integer("int32", -0x8000_0000, 0x7FFF_FFFF);
pub const INT64: AttributeType = AttributeType::integer(
    "int64",
    -0x8000_0000_0000_0000,
    0x7FFF_FFFF_FFFF_FFFF,
);
pub const UINT8: AttributeType = AttributeType::integer("uint8", 0, 0xFF);
pub const UINT16: AttributeType = AttributeType::integer("uint16", 0, 0xFFFF);
pub const UINT32: AttributeType = AttributeType::integer("uint32", 0, 0xFFFF_FFFF);
pub const UINT64: AttributeType = AttributeType::integer("uint64", 0, 0xFFFF_FFFF_FFFF_FFFF);
pub const FLOAT: AttributeType = AttributeType::new("float", ValueKind::Float);
pub const DOUBLE: AttributeType = AttributeType::new("double", ValueKind::Float);
pub const STRING: AttributeType = AttributeType::new("string", ValueKind::String);
pub const FIXED_STRING: AttributeType = AttributeType::new("FixedString", ValueKind::String);
pub const LS_STRING: AttributeType = AttributeType::new("LSString", ValueKind::String);
pub const GUID: AttributeType = AttributeType::new("guid", ValueKind::String);
pub const TRANSLATED_STRING: AttributeType =
    AttributeType::new("TranslatedString", ValueKind::Translation);
pub const LS_STRING_LIST: AttributeType =
    AttributeType::new("LSString", ValueKind::List(Separator::Semicolon));
pub const LS_STRING_COMMA_LIST: AttributeType =
    AttributeType::new("LSString", ValueKind::List(Separator::Comma));
pub const FIXED_STRING_LIST: AttributeType =
    AttributeType::new("FixedString", ValueKind::List(Separator::Semicolon));

impl AttributeType {
    /// Declares an attribute type. Several types may share a wire name
    /// (`LSString` is used both for plain strings and for lists).
    #[must_use]
    pub const fn new(type_name: &'static str, kind: ValueKind) -> Self {
        Self { type_name, kind }
    }

    /// Declares an integer type accepting `min..=max`.
    #[must_use]
    pub const fn integer(type_name: &'static str, min: i128, max: i128) -> Self {
        Self::new(type_name, ValueKind::Integer { min, max })
    }

    /// The XML `type` attribute value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Check a value against this type, promoting where the shapes allow it.
    ///
    /// Integers widen to floats and bare strings become version-1
    /// translations; every other mismatch fails.
    ///
    /// # Errors
    /// Returns [`Error::ValueKindMismatch`] for an incompatible shape,
    /// [`Error::ValueOutOfRange`] for an integer the wire type cannot hold and
    /// [`Error::InvalidTranslation`] for an empty translation handle.
    pub fn coerce(&self, schema: &str, attribute: &str, value: Value) -> Result<Value> {
        match (self.kind, value) {
            (ValueKind::Integer { min, max }, Value::Integer(i)) if !(min..=max).contains(&i) => {
                Err(Error::ValueOutOfRange {
                    schema: schema.to_string(),
                    attribute: attribute.to_string(),
                    type_name: self.type_name.to_string(),
                    value: i,
                })
            }
            (ValueKind::Bool, v @ Value::Bool(_))
            | (ValueKind::Integer { .. }, v @ Value::Integer(_))
            | (ValueKind::Float, v @ Value::Float(_))
            | (ValueKind::String, v @ Value::String(_))
            | (ValueKind::List(_), v @ Value::List(_))
            | (ValueKind::Translation, v @ Value::Translation(_)) => Ok(v),
            #[allow(clippy::cast_precision_loss)]
            (ValueKind::Float, Value::Integer(i)) => Ok(Value::Float(i as f64)),
            (ValueKind::Translation, Value::String(handle)) => {
                Ok(Value::Translation(Translation::new(handle, 1)?))
            }
            (kind, other) => Err(Error::ValueKindMismatch {
                schema: schema.to_string(),
                attribute: attribute.to_string(),
                type_name: self.type_name.to_string(),
                expected: kind.describe(),
                found: other.kind_name(),
            }),
        }
    }

    /// Encode a value as one `<attribute>` element.
    ///
    /// Values reaching this point have already been through [`coerce`](Self::coerce),
    /// so the value's own shape decides the representation.
    #[must_use]
    pub fn encode(&self, id: &str, value: &Value) -> LsxAttribute {
        match value {
            Value::Translation(t) => {
                LsxAttribute::with_handle(id, self.type_name, t.handle.clone(), t.version)
            }
            Value::List(items) => {
                let separator = match self.kind {
                    ValueKind::List(sep) => sep,
                    _ => Separator::Semicolon,
                };
                LsxAttribute::with_value(id, self.type_name, items.join(separator.as_str()))
            }
            scalar => LsxAttribute::with_value(id, self.type_name, scalar.to_string()),
        }
    }

    /// Decode one `<attribute>` element into a typed value.
    ///
    /// # Errors
    /// Returns an error when the element lacks the value or handle the type
    /// needs, or when the literal cannot be parsed as this type.
    pub fn decode(&self, attr: &LsxAttribute) -> Result<Value> {
        if self.kind == ValueKind::Translation {
            let handle = attr.handle.clone().unwrap_or_default();
            let version = attr.version.unwrap_or(0);
            return Ok(Value::Translation(Translation::new(handle, version)?));
        }

        let raw = attr.value.as_deref().ok_or_else(|| Error::MissingAttributeValue {
            attribute: attr.id.clone(),
            type_name: self.type_name.to_string(),
        })?;
        let invalid = || Error::InvalidAttributeValue {
            attribute: attr.id.clone(),
            type_name: self.type_name.to_string(),
            value: raw.to_string(),
        };

        match self.kind {
            ValueKind::Bool => {
                if raw.eq_ignore_ascii_case("true") {
                    Ok(Value::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Ok(Value::Bool(false))
                } else {
                    Err(invalid())
                }
            }
            ValueKind::Integer { min, max } => match raw.trim().parse::<i128>() {
                Ok(i) if (min..=max).contains(&i) => Ok(Value::Integer(i)),
                _ => Err(invalid()),
            },
            ValueKind::Float => raw.trim().parse().map(Value::Float).map_err(|_| invalid()),
            ValueKind::String => Ok(Value::String(raw.to_string())),
            ValueKind::List(separator) => Ok(Value::List(
                raw.split(separator.as_str())
                    .filter(|item| !item.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            ValueKind::Translation => Err(invalid()),
        }
    }
}

/// A localization reference: handle plus version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Translation {
    handle: String,
    version: u16,
}

impl Translation {
    /// Create a translation reference.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTranslation`] if the handle is empty or the
    /// version is zero.
    pub fn new(handle: impl Into<String>, version: u16) -> Result<Self> {
        let handle = handle.into();
        if handle.is_empty() || version == 0 {
            return Err(Error::InvalidTranslation { handle, version });
        }
        Ok(Self { handle, version })
    }

    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    #[must_use]
    pub fn version(&self) -> u16 {
        self.version
    }
}

/// A typed attribute value.
///
/// Integers are held wide enough for every wire integer type, `uint64`
/// included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i128),
    Float(f64),
    String(String),
    List(Vec<String>),
    Translation(Translation),
}

impl Value {
    /// Name of this value's shape, for error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Translation(_) => "translation",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer, if it fits an `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => i64::try_from(*i).ok(),
            _ => None,
        }
    }

    /// The integer, if it fits a `u64`.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Integer(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            #[allow(clippy::cast_precision_loss)]
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_translation(&self) -> Option<&Translation> {
        match self {
            Value::Translation(t) => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Textual form as written to a `value=` attribute.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::List(items) => f.write_str(&items.join(Separator::Semicolon.as_str())),
            Value::Translation(t) => write!(f, "{};{}", t.handle, t.version),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! impl_from_integer {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Value {
                fn from(i: $int) -> Self {
                    Value::Integer(i128::from(i))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(items: [&str; N]) -> Self {
        Value::List(items.iter().map(|s| (*s).to_string()).collect())
    }
}

impl From<Translation> for Value {
    fn from(t: Translation) -> Self {
        Value::Translation(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(type_name: &str, value: &str) -> LsxAttribute {
        LsxAttribute::with_value("A", type_name, value)
    }

    #[test]
    fn test_bool_parse_is_case_insensitive() {
        assert_eq!(BOOL.decode(&attr("bool", "True")).unwrap(), Value::Bool(true));
        assert_eq!(BOOL.decode(&attr("bool", "FALSE")).unwrap(), Value::Bool(false));
        assert!(BOOL.decode(&attr("bool", "1")).is_err());
        assert_eq!(BOOL.encode("A", &Value::Bool(true)).value.as_deref(), Some("true"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(INT32.decode(&attr("int32", "-12")).unwrap(), Value::Integer(-12));
        assert!(INT32.decode(&attr("int32", "1.5")).is_err());
        assert_eq!(FLOAT.decode(&attr("float", "1.25")).unwrap(), Value::Float(1.25));
        assert_eq!(FLOAT.encode("A", &Value::Float(0.1)).value.as_deref(), Some("0.1"));
        assert_eq!(
            FLOAT.coerce("S", "A", Value::Integer(3)).unwrap(),
            Value::Float(3.0)
        );
    }

    #[test]
    fn test_uint64_full_range() {
        let decoded = UINT64
            .decode(&attr("uint64", "18446744073709551615"))
            .unwrap();
        assert_eq!(decoded, Value::from(u64::MAX));
        assert_eq!(decoded.as_u64(), Some(u64::MAX));
        assert_eq!(decoded.as_i64(), None);
        assert_eq!(
            UINT64.encode("A", &decoded).value.as_deref(),
            Some("18446744073709551615")
        );
        assert!(UINT64.decode(&attr("uint64", "18446744073709551616")).is_err());
        assert!(UINT64.decode(&attr("uint64", "-1")).is_err());
    }

    #[test]
    fn test_integer_range_is_checked() {
        let err = UINT8
            .coerce("ModuleInfo", "NumPlayers", Value::from(300))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ValueOutOfRange { value: 300, ref type_name, .. } if type_name == "uint8"
        ));
        assert!(UINT32.coerce("S", "A", Value::from(-1)).is_err());
        assert!(INT8.coerce("S", "A", Value::from(-128)).is_ok());
        assert!(INT8.coerce("S", "A", Value::from(-129)).is_err());
        assert!(INT64.coerce("S", "A", Value::from(u64::MAX)).is_err());

        assert!(UINT8.decode(&attr("uint8", "255")).is_ok());
        assert!(matches!(
            UINT8.decode(&attr("uint8", "256")),
            Err(Error::InvalidAttributeValue { .. })
        ));
    }

    #[test]
    fn test_list_split_and_join() {
        let decoded = LS_STRING_LIST
            .decode(&attr("LSString", "Projectile_FireBolt;;Target_Bless;"))
            .unwrap();
        assert_eq!(
            decoded,
            Value::from(["Projectile_FireBolt", "Target_Bless"])
        );
        assert_eq!(
            LS_STRING_COMMA_LIST
                .encode("A", &Value::from(["A", "B"]))
                .value
                .as_deref(),
            Some("A,B")
        );
        assert_eq!(
            LS_STRING_COMMA_LIST.decode(&attr("LSString", "A,B")).unwrap(),
            Value::from(["A", "B"])
        );
    }

    #[test]
    fn test_translation_promotion() {
        let value = TRANSLATED_STRING
            .coerce("S", "DisplayName", Value::from("h0001"))
            .unwrap();
        let t = value.as_translation().unwrap();
        assert_eq!(t.handle(), "h0001");
        assert_eq!(t.version(), 1);

        let encoded = TRANSLATED_STRING.encode("DisplayName", &value);
        assert_eq!(encoded.handle.as_deref(), Some("h0001"));
        assert_eq!(encoded.version, Some(1));
        assert_eq!(encoded.value, None);
    }

    #[test]
    fn test_translation_rejects_unset_parts() {
        assert!(matches!(
            Translation::new("h0001", 0),
            Err(Error::InvalidTranslation { version: 0, .. })
        ));
        assert!(Translation::new("", 2).is_err());
        assert!(TRANSLATED_STRING.coerce("S", "A", Value::from("")).is_err());

        let missing_version = LsxAttribute {
            version: None,
            ..LsxAttribute::with_handle("A", "TranslatedString", "h1", 1)
        };
        assert!(TRANSLATED_STRING.decode(&missing_version).is_err());
    }

    #[test]
    fn test_shape_mismatch_fails_fast() {
        let err = FIXED_STRING
            .coerce("Tag", "Name", Value::from(["a", "b"]))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ValueKindMismatch { expected: "string", found: "list", .. }
        ));
        assert!(BOOL.coerce("Tag", "Flag", Value::from("true")).is_err());
        assert!(INT32.coerce("Tag", "Level", Value::Float(1.0)).is_err());
    }

    #[test]
    fn test_missing_value() {
        let bare = LsxAttribute {
            value: None,
            ..attr("FixedString", "")
        };
        assert!(matches!(
            FIXED_STRING.decode(&bare),
            Err(Error::MissingAttributeValue { .. })
        ));
        // An explicitly empty string is a value
        assert_eq!(
            FIXED_STRING.decode(&attr("FixedString", "")).unwrap(),
            Value::String(String::new())
        );
    }
}
