use serde::{Deserialize, Serialize};

use super::common::{Annotation, Classification, Extension, MetaData, Signature, Summary};

/// Types carrying an optional document-wide unique id.
pub trait Identified {
    /// The element's id, if it has one.
    fn id(&self) -> Option<&str>;
}

/// Information about a resource related to a step and particle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// The kind of resource, e.g. `model` or `parameter`.
    pub kind: String,
    /// MIME type of the resource.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Document-wide unique id.
    pub id: Option<String>,
    /// Human readable description.
    pub description: Option<String>,
    /// The original, canonical master source of the resource.
    pub master: Option<String>,
    /// The scope or level the resource is specific to.
    pub scope: Option<String>,
    /// URI of the resource.
    pub source: Option<String>,
    /// Inline resource content.
    pub content: Option<Extension>,
    /// Summary of the resource.
    pub summary: Option<Summary>,
    /// Meta data describing the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta_data: Vec<MetaData>,
    /// Signatures over the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Signature>,
    /// Classifications of the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
    /// Annotations of the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Resource {
    /// Creates a resource with the mandatory attributes only.
    pub fn new(kind: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            mime_type: mime_type.into(),
            id: None,
            description: None,
            master: None,
            scope: None,
            source: None,
            content: None,
            summary: None,
            meta_data: Vec::new(),
            signatures: Vec::new(),
            classifications: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Sets the resource id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the resource source URI.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Identified for Resource {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// A pointer to a resource defined elsewhere in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceReference {
    /// The referenced location; `#<id>` for a resource in this document.
    pub href: String,
    /// Document-wide unique id.
    pub id: Option<String>,
    /// Human readable description.
    pub description: Option<String>,
    /// Classifications of the reference.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
    /// Annotations of the reference.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl ResourceReference {
    /// Creates a reference to an arbitrary href.
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            id: None,
            description: None,
            classifications: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Creates a reference to the resource with id `resource_id`.
    #[must_use]
    pub fn to_resource(resource_id: &str) -> Self {
        Self::new(format!("#{resource_id}"))
    }

    /// Sets the reference id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The id of the referenced resource, if the href points into this
    /// document.
    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        self.href.strip_prefix('#')
    }
}

impl Identified for ResourceReference {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
