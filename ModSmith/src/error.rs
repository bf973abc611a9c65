//! Error types for `ModSmith`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `ModSmith` operations.
///
/// Every failure is a build failure: schema definition mistakes, bad
/// construction calls, malformed input and unroutable nodes all surface here
/// with the offending id or type named.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== XML Errors ====================
    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// XML attribute error.
    #[error("XML attribute error: {0}")]
    XmlAttrError(String),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== Schema Definition Errors ====================
    /// A node type declares the same attribute name twice.
    #[error("node type '{schema}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute {
        /// The node type name.
        schema: String,
        /// The repeated attribute name.
        attribute: String,
    },

    /// Two permitted child types of one node type share an XML id.
    #[error("node type '{schema}' permits several child types with id '{id}'")]
    AmbiguousChildId {
        /// The parent node type name.
        schema: String,
        /// The shared XML id.
        id: String,
    },

    /// A document type declares no child node types.
    #[error("document type '{document}' declares no child node types")]
    EmptyDocumentType {
        /// The document type name.
        document: String,
    },

    /// A single-node document type must declare exactly one child type.
    #[error("single-node document type '{document}' declares {count} child types (expected 1)")]
    SingleNodeChildTypes {
        /// The document type name.
        document: String,
        /// Number of declared child types.
        count: usize,
    },

    /// A node type is already owned by another document type.
    #[error("node type '{node_type}' is owned by '{existing}', cannot add it to '{attempted}'")]
    ConflictingOwner {
        /// The contested node type name.
        node_type: String,
        /// The document type that already owns it.
        existing: String,
        /// The document type that tried to claim it.
        attempted: String,
    },

    /// Two document types share a region id.
    #[error("region '{region}' belongs to '{existing}', cannot register it for '{attempted}'")]
    DuplicateRegion {
        /// The shared region id.
        region: String,
        /// The document type that already registered it.
        existing: String,
        /// The document type that tried to register it.
        attempted: String,
    },

    /// The process-wide registry was installed twice.
    #[error("the global registry has already been installed")]
    RegistryAlreadyInstalled,

    // ==================== Construction Errors ====================
    /// An attribute name that the node type does not declare.
    #[error("node type '{schema}' has no attribute '{attribute}'")]
    UnknownAttribute {
        /// The node type name.
        schema: String,
        /// The offending attribute name.
        attribute: String,
    },

    /// A value whose shape does not fit the declared attribute type.
    #[error("attribute '{schema}.{attribute}' is {type_name} ({expected}), got a {found} value")]
    ValueKindMismatch {
        /// The node type name.
        schema: String,
        /// The attribute name.
        attribute: String,
        /// The wire type name of the attribute.
        type_name: String,
        /// The value shape the attribute accepts.
        expected: &'static str,
        /// The value shape that was supplied.
        found: &'static str,
    },

    /// An integer outside the range of the declared wire type.
    #[error("attribute '{schema}.{attribute}' is {type_name}, {value} is out of range")]
    ValueOutOfRange {
        /// The node type name.
        schema: String,
        /// The attribute name.
        attribute: String,
        /// The wire type name of the attribute.
        type_name: String,
        /// The rejected value.
        value: i128,
    },

    /// A translation with a missing handle or a zero version.
    #[error("invalid translated string: handle '{handle}', version {version}")]
    InvalidTranslation {
        /// The supplied handle.
        handle: String,
        /// The supplied version.
        version: u16,
    },

    /// A node whose type is not permitted in a child collection.
    #[error("invalid child node type(s) {found:?}, allowed: {allowed:?}")]
    InvalidChildType {
        /// Names of the permitted node types.
        allowed: Vec<String>,
        /// Names of the rejected node types.
        found: Vec<String>,
    },

    /// A child collection index out of range.
    #[error("child index {index} out of range (len {len})")]
    ChildIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The collection length.
        len: usize,
    },

    // ==================== Parse Errors ====================
    /// An XML element that is not allowed at this position.
    #[error("unexpected <{found}> element inside <{parent}>")]
    UnexpectedTag {
        /// The enclosing element name.
        parent: String,
        /// The offending element name.
        found: String,
    },

    /// Character data where only elements are allowed.
    #[error("unexpected text inside <{parent}>: {text:?}")]
    UnexpectedText {
        /// The enclosing element name.
        parent: String,
        /// The offending text.
        text: String,
    },

    /// A required XML attribute is missing from an element.
    #[error("<{element}> is missing its '{attribute}' attribute")]
    MissingXmlAttribute {
        /// The element name.
        element: &'static str,
        /// The missing XML attribute.
        attribute: &'static str,
    },

    /// The document ended before every element was closed.
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// A region, root or node id that does not match the schema.
    #[error("{kind} id mismatch: expected '{expected}', found '{found}'")]
    IdMismatch {
        /// What was being matched ("region", "root node", "node").
        kind: &'static str,
        /// The id the schema expects.
        expected: String,
        /// The id found in the input.
        found: String,
    },

    /// A child node id that none of the parent's permitted types declares.
    #[error("'{parent}' has no child type with id '{id}'")]
    UnknownNodeId {
        /// The parent node or document type name.
        parent: String,
        /// The offending node id.
        id: String,
    },

    /// A region id that no registered document type claims.
    #[error("no document type registered for region '{0}'")]
    UnknownRegion(String),

    /// A file that does not hold exactly one region.
    #[error("expected exactly one region, found {0}")]
    RegionCount(usize),

    /// A region that does not hold exactly one root node.
    #[error("region '{region}' holds {count} root nodes (expected 1)")]
    RootCount {
        /// The region id.
        region: String,
        /// Number of root nodes found.
        count: usize,
    },

    /// The wire type of an attribute differs from the schema.
    #[error("attribute '{schema}.{attribute}' should be {expected}, found {found}")]
    AttributeTypeMismatch {
        /// The node type name.
        schema: String,
        /// The attribute name.
        attribute: String,
        /// The declared wire type name.
        expected: String,
        /// The wire type name found in the input.
        found: String,
    },

    /// An attribute element repeated in one node.
    #[error("attribute '{schema}.{attribute}' appears more than once")]
    RepeatedAttribute {
        /// The node type name.
        schema: String,
        /// The repeated attribute name.
        attribute: String,
    },

    /// An attribute value that cannot be decoded as its declared type.
    #[error("attribute '{attribute}' has invalid {type_name} value {value:?}")]
    InvalidAttributeValue {
        /// The attribute name.
        attribute: String,
        /// The declared wire type name.
        type_name: String,
        /// The raw value.
        value: String,
    },

    /// An attribute element lacking the value its type requires.
    #[error("attribute '{attribute}' ({type_name}) has no value")]
    MissingAttributeValue {
        /// The attribute name.
        attribute: String,
        /// The declared wire type name.
        type_name: String,
    },

    /// A `<version>` element with a non-numeric component.
    #[error("invalid version component {component}={value:?}")]
    InvalidVersion {
        /// The component name.
        component: String,
        /// The raw value.
        value: String,
    },

    // ==================== Routing Errors ====================
    /// A node type that no document type owns.
    #[error("node type '{0}' is not registered to any document type")]
    UnregisteredNodeType(String),

    /// Incoming content whose keys matched nothing in the existing collection.
    #[error("{} incoming node(s) matched no existing content: {keys:?}", keys.len())]
    UnmatchedContent {
        /// Debug renderings of the unmatched keys.
        keys: Vec<String>,
    },

    /// A single-node document that does not hold exactly one node.
    #[error("single-node document '{document}' holds {count} nodes (expected 1)")]
    SingleNodeCount {
        /// The document type name.
        document: String,
        /// Number of nodes held.
        count: usize,
    },

    /// A path template placeholder with no supplied value.
    #[error("path template '{template}' needs a value for '{variable}'")]
    MissingPathVariable {
        /// The template.
        template: String,
        /// The missing placeholder name.
        variable: String,
    },

    /// A node attribute substituted into a path that is not a single path
    /// segment.
    #[error("path template '{template}' cannot use {variable} = {value:?} as a file name")]
    UnsafePathValue {
        /// The template.
        template: String,
        /// The placeholder name.
        variable: String,
        /// The rejected attribute value.
        value: String,
    },

    /// Two documents in one save that resolve to the same file.
    #[error("more than one {document} document resolves to {}", .path.display())]
    DuplicateOutputPath {
        /// The document type of the later document.
        document: String,
        /// The shared destination.
        path: PathBuf,
    },

    /// A path template with unbalanced braces.
    #[error("malformed path template '{0}'")]
    InvalidPathTemplate(String),

    // ==================== Archive Errors ====================
    /// A virtual path that is not of the form `archive/relative/path`.
    #[error("invalid virtual path: {0}")]
    InvalidVirtualPath(String),

    /// The archive cache does not hold the requested file.
    #[error("file not found in unpacked archives: {virtual_path} (looked at {})", .path.display())]
    ArchiveFileNotFound {
        /// The requested virtual path.
        virtual_path: String,
        /// The filesystem location that was checked.
        path: PathBuf,
    },

    // ==================== Config Errors ====================
    /// Manifest TOML parse error.
    #[error("manifest parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Manifest value that cannot be used.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

// Add conversion from quick_xml::events::attributes::AttrError
impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttrError(err.to_string())
    }
}

// Add conversion from walkdir::Error
impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `ModSmith` operations.
pub type Result<T> = std::result::Result<T, Error>;
