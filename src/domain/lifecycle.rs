use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    common::{Annotation, Classification, Signature},
    resource::{Resource, ResourceReference},
};

/// The state of a phase or step in its life cycle.
///
/// Statuses are ordered; a later status follows an earlier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LifeCycleStatus {
    /// The element has been drafted.
    Drafted,
    /// The element has been fully defined.
    Defined,
    /// The element has been validated.
    Validated,
    /// The element has been approved.
    Approved,
    /// The element has been archived.
    Archived,
    /// The element has been retracted.
    Retracted,
}

impl LifeCycleStatus {
    /// Every status, in life cycle order.
    pub const ALL: [Self; 6] = [
        Self::Drafted,
        Self::Defined,
        Self::Validated,
        Self::Approved,
        Self::Archived,
        Self::Retracted,
    ];

    /// The qualified name of the element holding an entry of this status.
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::Drafted => "stc:Drafted",
            Self::Defined => "stc:Defined",
            Self::Validated => "stc:Validated",
            Self::Approved => "stc:Approved",
            Self::Archived => "stc:Archived",
            Self::Retracted => "stc:Retracted",
        }
    }

    /// Looks up the status whose element is called `name`.
    #[must_use]
    pub fn from_element_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.element_name() == name)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Drafted => "Drafted",
            Self::Defined => "Defined",
            Self::Validated => "Validated",
            Self::Approved => "Approved",
            Self::Archived => "Archived",
            Self::Retracted => "Retracted",
        }
    }
}

impl fmt::Display for LifeCycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string did not name a life cycle status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown life cycle status: '{0}'")]
pub struct UnknownStatusError(String);

impl FromStr for LifeCycleStatus {
    type Err = UnknownStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s || status.element_name() == s)
            .ok_or_else(|| UnknownStatusError(s.to_string()))
    }
}

/// The person or organization responsible for a life cycle entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Responsible {
    /// The responsible organization.
    pub organization: Option<String>,
    /// The role of the responsible person.
    pub role: Option<String>,
    /// The name of the responsible person.
    pub name: Option<String>,
}

/// A life cycle record of a phase or step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeCycleEntry {
    /// Which status this entry records.
    pub status: LifeCycleStatus,
    /// When the status was reached (`xs:dateTime`).
    pub date: String,
    /// Checksum over the recorded state.
    pub checksum: Option<String>,
    /// The algorithm used to compute [`Self::checksum`].
    pub checksum_type: Option<String>,
    /// Who is responsible for the entry.
    pub responsible: Responsible,
    /// Signatures over the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<Signature>,
    /// Resources attached to the entry.
    ///
    /// Resources held by a stored entry are indexed separately; see
    /// [`crate::StmdDocument::resources`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    /// References attached to the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resource_references: Vec<ResourceReference>,
    /// Classifications of the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classifications: Vec<Classification>,
    /// Annotations of the entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl LifeCycleEntry {
    /// Creates an entry with the given status and date and nothing else.
    pub fn new(status: LifeCycleStatus, date: impl Into<String>) -> Self {
        Self {
            status,
            date: date.into(),
            checksum: None,
            checksum_type: None,
            responsible: Responsible::default(),
            signatures: Vec::new(),
            resources: Vec::new(),
            resource_references: Vec::new(),
            classifications: Vec::new(),
            annotations: Vec::new(),
        }
    }
}
