use serde::{Deserialize, Serialize};

/// The attributes of the document root element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelInformation {
    /// Version of the document format.
    pub version: String,
    /// Name of the simulation task.
    pub name: String,
    /// Globally unique id of the document.
    #[serde(rename = "GUID")]
    pub guid: String,
    /// Document-wide unique id of the root element.
    pub id: Option<String>,
    /// Human readable description.
    pub description: Option<String>,
    /// Author of the document.
    pub author: Option<String>,
    /// Version of the file.
    pub fileversion: Option<String>,
    /// Copyright notice.
    pub copyright: Option<String>,
    /// License of the document.
    pub license: Option<String>,
    /// Tool that generated the document.
    pub generation_tool: Option<String>,
    /// When the document was generated.
    pub generation_date_and_time: Option<String>,
}

impl TopLevelInformation {
    /// Creates top-level information with the mandatory attributes only.
    pub fn new(
        version: impl Into<String>,
        name: impl Into<String>,
        guid: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            name: name.into(),
            guid: guid.into(),
            id: None,
            description: None,
            author: None,
            fileversion: None,
            copyright: None,
            license: None,
            generation_tool: None,
            generation_date_and_time: None,
        }
    }
}

/// Document-wide information that is not tied to a phase.
///
/// Links under general information are stored with all other links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralInformation {
    /// The documents this one was derived from.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivation_chain: Vec<DerivationChainEntry>,
}

/// One document in a derivation chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivationChainEntry {
    /// Globally unique id of the source document.
    #[serde(rename = "GUID")]
    pub guid: String,
    /// Author of the source document.
    pub author: Option<String>,
    /// Version of the source document.
    pub fileversion: Option<String>,
    /// Copyright notice of the source document.
    pub copyright: Option<String>,
    /// License of the source document.
    pub license: Option<String>,
    /// Tool that generated the source document.
    pub generation_tool: Option<String>,
    /// When the source document was generated.
    pub generation_date_and_time: Option<String>,
}

impl DerivationChainEntry {
    /// Creates an entry for the document with the given GUID.
    pub fn new(guid: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            author: None,
            fileversion: None,
            copyright: None,
            license: None,
            generation_tool: None,
            generation_date_and_time: None,
        }
    }
}
