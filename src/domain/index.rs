//! Location-tagged storage of document entries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    Location, Uid,
    common::{Annotation, Classification},
    lifecycle::LifeCycleEntry,
    link::Link,
    resource::{Identified, Resource, ResourceReference},
    schema::{self, SchemaNode, SchemaPathError},
};

/// An entry stored in the document together with its uid and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Available<T> {
    /// Stable handle for update and delete.
    pub uid: Uid,
    /// Where the entry lives in the document.
    pub location: Location,
    /// The entry itself.
    pub item: T,
}

/// A stored [`Resource`].
pub type AvailableResource = Available<Resource>;
/// A stored [`ResourceReference`].
pub type AvailableResourceReference = Available<ResourceReference>;
/// A stored [`Link`].
pub type AvailableLink = Available<Link>;
/// A stored document-level [`Classification`].
pub type AvailableClassification = Available<Classification>;
/// A stored document-level [`Annotation`].
pub type AvailableAnnotation = Available<Annotation>;
/// A stored [`LifeCycleEntry`].
pub type AvailableLifeCycleEntry = Available<LifeCycleEntry>;

/// An id is already used by another entry.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("id '{id}' is already in use")]
pub struct DuplicateIdError {
    /// The conflicting id.
    pub id: String,
}

/// An ordered collection of location-tagged entries of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection<T> {
    entries: Vec<Available<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Collection<T> {
    /// Stores `item` at `location` under a fresh uid.
    pub fn insert(&mut self, item: T, location: Location) -> Uid {
        let uid = Uid::new();
        self.entries.push(Available {
            uid,
            location,
            item,
        });
        uid
    }

    /// The entry with the given uid.
    #[must_use]
    pub fn get(&self, uid: Uid) -> Option<&Available<T>> {
        self.entries.iter().find(|entry| entry.uid == uid)
    }

    /// Returns `true` if an entry with the given uid exists.
    #[must_use]
    pub fn contains(&self, uid: Uid) -> bool {
        self.position(uid).is_some()
    }

    /// Replaces the location and content of the entry with the given uid.
    ///
    /// Returns `false` if no such entry exists.
    pub fn replace(&mut self, uid: Uid, item: T, location: Location) -> bool {
        let Some(index) = self.position(uid) else {
            return false;
        };
        self.entries[index] = Available {
            uid,
            location,
            item,
        };
        true
    }

    /// Removes and returns the entry with the given uid.
    pub fn remove(&mut self, uid: Uid) -> Option<Available<T>> {
        let index = self.position(uid)?;
        Some(self.entries.remove(index))
    }

    /// Every entry stored exactly at `location`, in insertion order.
    pub fn at<'a>(
        &'a self,
        location: &'a Location,
    ) -> impl Iterator<Item = &'a Available<T>> + 'a {
        self.entries
            .iter()
            .filter(move |entry| &entry.location == location)
    }

    /// Clones every entry stored exactly at `location`.
    #[must_use]
    pub fn collect_at(&self, location: &Location) -> Vec<Available<T>>
    where
        T: Clone,
    {
        self.at(location).cloned().collect()
    }

    /// Clones every entry stored at `location` or at any location the schema
    /// defines below it.
    ///
    /// The walk follows the schema, depth first, so entries are grouped by
    /// location in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaPathError`] if `location` is not defined by the schema.
    pub fn collect_recursively(
        &self,
        location: &Location,
    ) -> Result<Vec<Available<T>>, SchemaPathError>
    where
        T: Clone,
    {
        let subtree = schema::subtree_at(location)?;
        let mut collector = Vec::new();
        self.collect_subtree(subtree, location, &mut collector);
        Ok(collector)
    }

    fn collect_subtree(
        &self,
        node: &SchemaNode,
        location: &Location,
        collector: &mut Vec<Available<T>>,
    )
    where
        T: Clone,
    {
        collector.extend(self.at(location).cloned());
        for child in node.locations() {
            self.collect_subtree(child, &location.child(child.name), collector);
        }
    }

    /// Moves every entry stored at `from` to `to`.
    pub fn relocate(&mut self, from: &Location, to: &Location) {
        for entry in self.entries.iter_mut().filter(|entry| &entry.location == from) {
            entry.location = to.clone();
        }
    }

    /// All entries, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Available<T>> {
        self.entries.iter()
    }

    /// The number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, uid: Uid) -> Option<usize> {
        self.entries.iter().position(|entry| entry.uid == uid)
    }
}

impl<T: Identified> Collection<T> {
    /// The first entry whose item has the given id.
    #[must_use]
    pub fn find_id(&self, id: &str) -> Option<&Available<T>> {
        self.entries.iter().find(|entry| entry.item.id() == Some(id))
    }

    /// Checks that `id` is free for the entry `owner`.
    ///
    /// An absent id never conflicts. When `owner` is `None` every stored
    /// entry counts; otherwise the owner's own id is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdError`] if another entry already uses the id.
    pub fn check_id_available(
        &self,
        id: Option<&str>,
        owner: Option<Uid>,
    ) -> Result<(), DuplicateIdError> {
        let Some(id) = id else {
            return Ok(());
        };
        let taken = self
            .entries
            .iter()
            .any(|entry| Some(entry.uid) != owner && entry.item.id() == Some(id));
        if taken {
            return Err(DuplicateIdError { id: id.to_string() });
        }
        Ok(())
    }
}

/// The six collections backing a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationIndex {
    /// Every resource, including those attached to life cycle entries.
    pub resources: Collection<Resource>,
    /// Every resource reference, including those attached to life cycle
    /// entries.
    pub resource_references: Collection<ResourceReference>,
    /// Every link.
    pub links: Collection<Link>,
    /// Classifications of the root, phases, steps and particles.
    pub classifications: Collection<Classification>,
    /// Annotations of the root, phases, steps and particles.
    pub annotations: Collection<Annotation>,
    /// Life cycle entries, located at their phase or step.
    pub life_cycle_entries: Collection<LifeCycleEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::ROOT;

    fn input() -> Location {
        Location::from([ROOT, "stmd:RequirementsPhase", "stmd:VerifyRequirements", "stc:Input"])
    }

    fn output() -> Location {
        Location::from([ROOT, "stmd:DesignPhase", "stmd:VerifyDesignSpecification", "stc:Output"])
    }

    #[test]
    fn insert_and_get() {
        let mut collection = Collection::default();
        let uid = collection.insert(Resource::new("model", "application/x-fmu"), input());

        let entry = collection.get(uid).expect("entry should exist");
        assert_eq!(entry.location, input());
        assert_eq!(entry.item.kind, "model");
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn replace_keeps_uid_and_position() {
        let mut collection = Collection::default();
        let first = collection.insert(Resource::new("model", "a"), input());
        let second = collection.insert(Resource::new("model", "b"), input());

        assert!(collection.replace(first, Resource::new("parameter", "c"), output()));

        let uids: Vec<_> = collection.iter().map(|entry| entry.uid).collect();
        assert_eq!(uids, [first, second]);
        assert_eq!(collection.get(first).unwrap().location, output());
        assert!(!collection.replace(Uid::new(), Resource::new("x", "y"), input()));
    }

    #[test]
    fn remove_unknown_uid_is_none() {
        let mut collection: Collection<Resource> = Collection::default();
        assert!(collection.remove(Uid::new()).is_none());
    }

    #[test]
    fn collect_at_matches_exact_location_only() {
        let mut collection = Collection::default();
        collection.insert(Resource::new("model", "a"), input());
        collection.insert(Resource::new("model", "b"), output());
        collection.insert(
            Resource::new("model", "c"),
            Location::from([ROOT, "stmd:RequirementsPhase", "stmd:VerifyRequirements"]),
        );

        let found = collection.collect_at(&input());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].item.mime_type, "a");
    }

    #[test]
    fn collect_recursively_includes_descendants() {
        let mut collection = Collection::default();
        collection.insert(Resource::new("model", "a"), input());
        collection.insert(Resource::new("model", "b"), output());
        let phase = Location::from([ROOT, "stmd:RequirementsPhase"]);

        let below_phase = collection.collect_recursively(&phase).unwrap();
        let below_root = collection.collect_recursively(&Location::root()).unwrap();

        assert_eq!(below_phase.len(), 1);
        assert_eq!(below_root.len(), 2);
        assert!(collection.collect_at(&phase).is_empty());
    }

    #[test]
    fn collect_recursively_rejects_unknown_location() {
        let collection: Collection<Resource> = Collection::default();
        let error = collection
            .collect_recursively(&Location::from([ROOT, "stmd:NoSuchPhase"]))
            .unwrap_err();
        assert_eq!(error.segment, "stmd:NoSuchPhase");
    }

    #[test]
    fn id_check_ignores_owner() {
        let mut collection = Collection::default();
        let r1 = collection.insert(Resource::new("model", "a").with_id("R1"), input());
        let r2 = collection.insert(Resource::new("model", "b").with_id("R2"), input());

        assert!(collection.check_id_available(Some("R1"), Some(r1)).is_ok());
        assert_eq!(
            collection.check_id_available(Some("R1"), Some(r2)),
            Err(DuplicateIdError { id: "R1".to_string() })
        );
        assert!(collection.check_id_available(Some("R1"), None).is_err());
        assert!(collection.check_id_available(None, None).is_ok());
        assert_eq!(collection.find_id("R2").map(|entry| entry.uid), Some(r2));
    }
}
