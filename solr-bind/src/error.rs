//! Error types for response binding.

use std::fmt;

use solr_node::ReadError;

/// Why a text value could not be converted to a target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoercionErrorKind {
    /// The text is not a valid representation of the target type.
    Malformed,
    /// The text does not follow `yyyy-MM-ddTHH:mm:ss.SSSZ`.
    DateFormat,
    /// An untyped collection element carries a tag outside the leaf vocabulary.
    UnknownKind(String),
}

/// A single wire value could not be converted to its target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionError {
    kind: CoercionErrorKind,
    type_name: &'static str,
    text: String,
}

impl CoercionError {
    pub fn malformed(type_name: &'static str, text: &str) -> Self {
        Self {
            kind: CoercionErrorKind::Malformed,
            type_name,
            text: text.to_owned(),
        }
    }

    pub fn date_format(type_name: &'static str, text: &str) -> Self {
        Self {
            kind: CoercionErrorKind::DateFormat,
            type_name,
            text: text.to_owned(),
        }
    }

    pub fn unknown_kind(tag: &str, text: &str) -> Self {
        Self {
            kind: CoercionErrorKind::UnknownKind(tag.to_owned()),
            type_name: "Value",
            text: text.to_owned(),
        }
    }

    pub fn kind(&self) -> &CoercionErrorKind {
        &self.kind
    }

    /// Name of the type the text was being converted to.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The offending text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CoercionErrorKind::Malformed => {
                write!(f, "cannot convert {:?} to `{}`", self.text, self.type_name)
            }
            CoercionErrorKind::DateFormat => write!(
                f,
                "{:?} is not a date of the form yyyy-MM-ddTHH:mm:ss.SSSZ",
                self.text
            ),
            CoercionErrorKind::UnknownKind(tag) => {
                write!(f, "unknown element kind <{tag}> for value {:?}", self.text)
            }
        }
    }
}

impl std::error::Error for CoercionError {}

/// A collection field could not be rebuilt from an `arr` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    /// The declared type is not one of the reconstructible collection shapes.
    Unsupported { declared: &'static str },
    /// An element of the collection failed to convert. Nothing was assigned.
    Element {
        declared: &'static str,
        index: usize,
        source: CoercionError,
    },
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Unsupported { declared } => {
                write!(f, "collection type `{declared}` is not supported")
            }
            CollectionError::Element {
                declared, index, ..
            } => write!(f, "cannot rebuild `{declared}`: element {index} is invalid"),
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Unsupported { .. } => None,
            CollectionError::Element { source, .. } => Some(source),
        }
    }
}

/// Underlying cause of a [`BindError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindCause {
    Coercion(CoercionError),
    Collection(CollectionError),
}

impl From<CoercionError> for BindCause {
    fn from(e: CoercionError) -> Self {
        BindCause::Coercion(e)
    }
}

impl From<CollectionError> for BindCause {
    fn from(e: CollectionError) -> Self {
        BindCause::Collection(e)
    }
}

/// A document field could not be populated from its wire node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    pub field: &'static str,
    pub wire_name: String,
    pub cause: BindCause,
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot bind wire field `{}` to field `{}`",
            self.wire_name, self.field
        )
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            BindCause::Coercion(e) => Some(e),
            BindCause::Collection(e) => Some(e),
        }
    }
}

/// A response document could not be turned into a result set.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// The input text is not a readable XML document.
    Xml(ReadError),
    /// A required node is absent.
    MissingNode { path: String },
    /// A required attribute is absent from a node.
    MissingAttribute { node: String, attribute: &'static str },
    /// A structural value (count, score, header entry) failed to convert.
    InvalidValue { path: String, source: CoercionError },
    /// A document field failed to bind.
    Bind(BindError),
    /// A wire field has no binding and unknown fields are denied.
    UnknownField { wire_name: String },
    /// Highlighting is present but the mapping designates no unique key.
    MissingUniqueKey,
    /// Highlighting refers to a document key absent from the result set.
    DanglingHighlight { key: String },
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseError::Xml(e) => write!(f, "{e}"),
            ResponseError::MissingNode { path } => write!(f, "missing node `{path}`"),
            ResponseError::MissingAttribute { node, attribute } => {
                write!(f, "node `{node}` has no `{attribute}` attribute")
            }
            ResponseError::InvalidValue { path, .. } => write!(f, "invalid value at `{path}`"),
            ResponseError::Bind(e) => write!(f, "{e}"),
            ResponseError::UnknownField { wire_name } => {
                write!(f, "wire field `{wire_name}` has no binding")
            }
            ResponseError::MissingUniqueKey => {
                write!(f, "highlighting requires a unique key binding")
            }
            ResponseError::DanglingHighlight { key } => {
                write!(f, "highlighting refers to unknown document key {key:?}")
            }
        }
    }
}

impl std::error::Error for ResponseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResponseError::Xml(e) => Some(e),
            ResponseError::InvalidValue { source, .. } => Some(source),
            ResponseError::Bind(e) => e.source(),
            _ => None,
        }
    }
}

impl From<ReadError> for ResponseError {
    fn from(e: ReadError) -> Self {
        ResponseError::Xml(e)
    }
}

impl From<BindError> for ResponseError {
    fn from(e: BindError) -> Self {
        ResponseError::Bind(e)
    }
}
