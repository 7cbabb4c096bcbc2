//! Reading and writing STMD documents.
//!
//! [`extract`] and [`assemble`] convert between raw XML elements and the
//! domain model; [`StmdDocument`] ties them to the location index.

pub mod assemble;
mod document;
pub mod extract;

pub use document::{DuplicateStatusError, LoadError, MutationError, NotFoundError, StmdDocument};
