//! Domain model of STMD documents.
//!
//! This module contains the converted document types (resources, references,
//! links, life cycle entries, ...), the static schema that fixes where each of
//! them may live, the location-tagged index that stores them, and the
//! projection of links onto JSON-LD graphs.

mod common;
pub use common::{
    Annotation, Classification, ClassificationEntry, Extension, MetaData, Signature, Summary,
};

mod config;
pub use config::Config;

/// Projection of links onto JSON-LD named graphs.
pub mod graph;
pub use graph::{ContextEntry, GraphNode, InvalidTermError, MalformedLinkError, NamedGraph};

mod header;
pub use header::{DerivationChainEntry, GeneralInformation, TopLevelInformation};

pub mod index;
pub use index::{
    Available, AvailableAnnotation, AvailableClassification, AvailableLifeCycleEntry,
    AvailableLink, AvailableResource, AvailableResourceReference, Collection, DuplicateIdError,
    LocationIndex,
};

mod lifecycle;
pub use lifecycle::{LifeCycleEntry, LifeCycleStatus, Responsible, UnknownStatusError};

mod link;
pub use link::{Arc, Link, Locator};

mod location;
pub use location::Location;

mod resource;
pub use resource::{Identified, Resource, ResourceReference};

pub mod schema;
pub use schema::{SchemaPathError, STMD_TREE};

mod uid;
pub use uid::Uid;
