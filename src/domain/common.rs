//! Building blocks shared by resources, references and life cycle entries.

use serde::{Deserialize, Serialize};

use crate::xml::{Attribute, RawNode};

/// Free-form XML content kept verbatim.
///
/// Used wherever the document format allows content of any kind, such as
/// `stc:Content` or the body of an annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    /// Attributes not covered by the enclosing element's known attributes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<RawNode>,
}

impl Extension {
    /// Creates an extension holding a single text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            attributes: Vec::new(),
            nodes: vec![RawNode::Text(text.into())],
        }
    }

    /// Returns `true` if there are no extra attributes and no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.nodes.is_empty()
    }
}

/// A summary of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// MIME type of the summary.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// URI of the summary.
    pub source: Option<String>,
    /// Base the source URI is resolved against.
    pub source_base: Option<String>,
    /// Inline summary content.
    pub content: Option<Extension>,
    /// Signatures over the summary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Signature>,
    /// Classifications of the summary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
    /// Annotations of the summary.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// Meta data describing a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    /// The kind of meta data.
    pub kind: String,
    /// MIME type of the meta data.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// URI of the meta data.
    pub source: Option<String>,
    /// Base the source URI is resolved against.
    pub source_base: Option<String>,
    /// Inline meta data content.
    pub content: Option<Extension>,
    /// Signatures over the meta data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Signature>,
    /// Classifications of the meta data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
    /// Annotations of the meta data.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// A digital signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// The role of the signature in the overall process.
    pub role: String,
    /// MIME type of the signature.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// URI of the signature.
    pub source: Option<String>,
    /// Base the source URI is resolved against.
    pub source_base: Option<String>,
    /// Inline signature content.
    pub content: Option<Extension>,
    /// Classifications of the signature.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
    /// Annotations of the signature.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

/// A set of keyword/value classification entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// The name of the classification scheme, e.g. `vocabulary`.
    #[serde(rename = "type")]
    pub classification_type: Option<String>,
    /// The entries of this classification.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<ClassificationEntry>,
}

impl Classification {
    /// Creates an empty classification of the given type.
    pub fn new(classification_type: impl Into<String>) -> Self {
        Self {
            classification_type: Some(classification_type.into()),
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    #[must_use]
    pub fn with_entry(mut self, entry: ClassificationEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

/// One keyword of a [`Classification`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    /// The keyword being classified.
    pub keyword: String,
    /// Optional link for the keyword.
    pub href: Option<String>,
    /// Remaining attributes and the entry's value content.
    #[serde(default, skip_serializing_if = "Extension::is_empty")]
    pub any: Extension,
}

impl ClassificationEntry {
    /// Creates an entry with a keyword and nothing else.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            href: None,
            any: Extension::default(),
        }
    }

    /// Sets the entry's link.
    #[must_use]
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// A typed annotation with free-form content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The unique name of the annotation type.
    #[serde(rename = "type")]
    pub annotation_type: String,
    /// Remaining attributes and the annotation's content.
    #[serde(default, skip_serializing_if = "Extension::is_empty")]
    pub any: Extension,
}

impl Annotation {
    /// Creates an annotation of the given type.
    pub fn new(annotation_type: impl Into<String>) -> Self {
        Self {
            annotation_type: annotation_type.into(),
            any: Extension::default(),
        }
    }
}
