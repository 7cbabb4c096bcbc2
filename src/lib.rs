//! Simulation Task Meta Data
//!
//! Loads STMD documents into a location-tagged index, edits their resources,
//! references, links and life cycle entries, and writes them back in
//! canonical order.

pub mod domain;
pub use domain::{
    Config, ContextEntry, LifeCycleEntry, LifeCycleStatus, Link, Location, NamedGraph, Resource,
    ResourceReference, Uid,
};

/// Conversion between XML element trees and [`StmdDocument`]s.
pub mod storage;
pub use storage::{LoadError, MutationError, NotFoundError, StmdDocument};

/// Generic XML element trees.
pub mod xml;
pub use xml::XmlError;
