//! An in-memory STMD document.
//!
//! The [`StmdDocument`] holds the root attributes, the general information and
//! a [`LocationIndex`] of every resource, reference, link, classification,
//! annotation and life cycle entry. Entries are addressed for update and
//! delete by their [`Uid`]; queries select them by [`Location`].

use std::collections::{BTreeMap, HashSet};

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tracing::instrument;

use crate::{
    domain::{
        Annotation, AvailableAnnotation, AvailableClassification, AvailableLifeCycleEntry,
        AvailableLink, AvailableResource, AvailableResourceReference, Classification, Collection,
        Config, ContextEntry, DuplicateIdError, GeneralInformation, Identified, LifeCycleEntry,
        LifeCycleStatus, Link, Location, LocationIndex, MalformedLinkError, NamedGraph, Resource,
        ResourceReference, STMD_TREE, SchemaPathError, TopLevelInformation, Uid, graph,
        schema::{self, NodeKind, ROOT, SchemaNode, Section, element},
    },
    storage::{
        assemble::{self, ToRaw},
        extract::{self, ExtractError, FromRaw},
    },
    xml::{self, RawElement, RawNode, XmlError},
};

/// Namespace declarations written to the root element on export.
const NAMESPACES: [(&str, &str); 6] = [
    (
        "xmlns:stmd",
        "http://apps.pmsf.net/STMD/SimulationTaskMetaData",
    ),
    (
        "xmlns:stc",
        "http://apps.pmsf.net/SSPTraceability/SSPTraceabilityCommon",
    ),
    (
        "xmlns:ssc",
        "http://ssp-standard.org/SSP1/SystemStructureCommon",
    ),
    ("xmlns:xlink", "http://www.w3.org/1999/xlink"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    (
        "xsi:schemaLocation",
        "http://apps.pmsf.net/STMD/SimulationTaskMetaData https://raw.githubusercontent.com/PMSFIT/SSPTraceability/v1.0-beta2/STMD.xsd",
    ),
];

/// Classification type whose entries define JSON-LD terms.
const VOCABULARY: &str = "vocabulary";

/// Errors raised while loading a document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The text is not well-formed XML.
    #[error("failed to parse document: {0}")]
    Xml(#[from] XmlError),

    /// The XML does not describe a valid document.
    #[error("failed to read document content: {0}")]
    Extract(#[from] ExtractError),

    /// The root element is not `stmd:SimulationTaskMetaData`.
    #[error("unexpected root element '{0}'")]
    UnexpectedRoot(String),
}

/// A phase or step already has a life cycle entry of the given status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{location} already has a '{status}' life cycle entry")]
pub struct DuplicateStatusError {
    /// The conflicting status.
    pub status: LifeCycleStatus,
    /// The phase or step that holds it.
    pub location: Location,
}

/// A mutation was rejected; the document is unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    /// No entry has the given uid.
    #[error("no entry with uid {0}")]
    UnknownUid(Uid),

    /// The new content uses an id that belongs to another entry.
    #[error(transparent)]
    DuplicateId(#[from] DuplicateIdError),

    /// The new life cycle entry collides with an existing one.
    #[error(transparent)]
    DuplicateStatus(#[from] DuplicateStatusError),
}

/// A reference could not be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotFoundError {
    /// No resource has the referenced id.
    #[error("resource with id '{0}' does not exist")]
    ResourceId(String),

    /// The reference does not point into this document.
    #[error("'{0}' is not an internal reference (expected '#<id>')")]
    ExternalHref(String),
}

/// An STMD document held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StmdDocument {
    config: Config,
    top_level: Option<TopLevelInformation>,
    general_information: Option<GeneralInformation>,
    index: LocationIndex,
}

impl StmdDocument {
    /// Creates an empty document with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty document with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Parses a document from XML text.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the text is not well-formed XML, has the wrong
    /// root element, or lacks mandatory content.
    pub fn load(text: &str) -> Result<Self, LoadError> {
        Self::load_with_config(text, Config::default())
    }

    /// Parses a document from XML text using the given configuration.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_config(text: &str, config: Config) -> Result<Self, LoadError> {
        let root = xml::parse(text)?;
        Self::from_tree(&root, config)
    }

    /// Builds a document from an already parsed root element.
    ///
    /// Every phase, step and particle the schema defines is visited; elements
    /// the schema does not know are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the root element is wrong or mandatory content
    /// is missing.
    #[instrument(skip_all)]
    pub fn from_tree(root: &RawElement, config: Config) -> Result<Self, LoadError> {
        if root.name != ROOT {
            return Err(LoadError::UnexpectedRoot(root.name.clone()));
        }

        let mut document = Self::with_config(config);
        document.top_level = Some(TopLevelInformation::from_raw(root)?);
        document.load_node(&STMD_TREE, root, &Location::root())?;

        tracing::debug!(
            resources = document.index.resources.len(),
            resource_references = document.index.resource_references.len(),
            links = document.index.links.len(),
            classifications = document.index.classifications.len(),
            annotations = document.index.annotations.len(),
            life_cycle_entries = document.index.life_cycle_entries.len(),
            "loaded document"
        );
        Ok(document)
    }

    /// The configuration used on export.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable access to the configuration used on export.
    pub const fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// The attributes of the root element, if set.
    #[must_use]
    pub const fn top_level_information(&self) -> Option<&TopLevelInformation> {
        self.top_level.as_ref()
    }

    /// Replaces the attributes of the root element.
    pub fn set_top_level_information(&mut self, information: TopLevelInformation) {
        self.top_level = Some(information);
    }

    /// The general information, if the document has any.
    #[must_use]
    pub const fn general_information(&self) -> Option<&GeneralInformation> {
        self.general_information.as_ref()
    }

    /// Replaces the general information.
    pub fn set_general_information(&mut self, information: GeneralInformation) {
        self.general_information = Some(information);
    }

    /// The underlying location index.
    #[must_use]
    pub const fn index(&self) -> &LocationIndex {
        &self.index
    }

    // ---- resources ----

    /// Resources stored exactly at `location`.
    #[must_use]
    pub fn resources(&self, location: &Location) -> Vec<AvailableResource> {
        self.index.resources.collect_at(location)
    }

    /// Resources stored at `location` or anywhere below it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaPathError`] if `location` is not defined by the schema.
    pub fn resources_recursive(
        &self,
        location: &Location,
    ) -> Result<Vec<AvailableResource>, SchemaPathError> {
        self.index.resources.collect_recursively(location)
    }

    /// Adds a resource at `location` and returns its uid.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdError`] if another resource already has the same
    /// id.
    #[instrument(skip(self, resource))]
    pub fn add_resource(
        &mut self,
        resource: Resource,
        location: Location,
    ) -> Result<Uid, DuplicateIdError> {
        self.index
            .resources
            .check_id_available(resource.id(), None)?;
        warn_unless_exported(&location, "resource", holds_resources);
        let uid = self.index.resources.insert(resource, location);
        tracing::debug!("Added resource: {uid}");
        Ok(uid)
    }

    /// Replaces the content and location of the resource with the given uid.
    ///
    /// # Errors
    ///
    /// Fails if the uid is unknown, or if the new id belongs to a different
    /// resource.
    #[instrument(skip(self, resource))]
    pub fn update_resource(
        &mut self,
        resource: Resource,
        location: Location,
        uid: Uid,
    ) -> Result<(), MutationError> {
        if !self.index.resources.contains(uid) {
            return Err(MutationError::UnknownUid(uid));
        }
        self.index
            .resources
            .check_id_available(resource.id(), Some(uid))?;
        warn_unless_exported(&location, "resource", holds_resources);
        self.index.resources.replace(uid, resource, location);
        Ok(())
    }

    /// Deletes the resource with the given uid.
    ///
    /// If the resource has an id, every reference pointing at it is deleted as
    /// well. Returns `false` if the uid is unknown.
    #[instrument(skip(self))]
    pub fn delete_resource(&mut self, uid: Uid) -> bool {
        let Some(removed) = self.index.resources.remove(uid) else {
            return false;
        };

        if let Some(id) = removed.item.id {
            let href = format!("#{id}");
            let dangling: Vec<Uid> = self
                .index
                .resource_references
                .iter()
                .filter(|entry| entry.item.href == href)
                .map(|entry| entry.uid)
                .collect();
            for reference in dangling {
                self.delete_resource_reference(reference);
            }
        }

        tracing::debug!("Deleted resource: {uid}");
        true
    }

    /// Resolves an internal reference to the resource it points at.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the href is not of the form `#<id>` or no
    /// resource has that id.
    pub fn resource_from_reference(
        &self,
        reference: &ResourceReference,
    ) -> Result<&AvailableResource, NotFoundError> {
        let id = reference
            .target_id()
            .ok_or_else(|| NotFoundError::ExternalHref(reference.href.clone()))?;
        self.resource_from_id(id)
            .ok_or_else(|| NotFoundError::ResourceId(id.to_string()))
    }

    /// The resource with the given id, if any.
    #[must_use]
    pub fn resource_from_id(&self, id: &str) -> Option<&AvailableResource> {
        self.index.resources.find_id(id)
    }

    // ---- resource references ----

    /// References stored exactly at `location`.
    #[must_use]
    pub fn resource_references(&self, location: &Location) -> Vec<AvailableResourceReference> {
        self.index.resource_references.collect_at(location)
    }

    /// References stored at `location` or anywhere below it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaPathError`] if `location` is not defined by the schema.
    pub fn resource_references_recursive(
        &self,
        location: &Location,
    ) -> Result<Vec<AvailableResourceReference>, SchemaPathError> {
        self.index.resource_references.collect_recursively(location)
    }

    /// Adds a reference at `location` and returns its uid.
    ///
    /// The referenced resource does not need to exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdError`] if another reference already has the same
    /// id.
    #[instrument(skip(self, reference))]
    pub fn add_resource_reference(
        &mut self,
        reference: ResourceReference,
        location: Location,
    ) -> Result<Uid, DuplicateIdError> {
        self.index
            .resource_references
            .check_id_available(reference.id(), None)?;
        warn_unless_exported(&location, "resource reference", holds_resources);
        let uid = self.index.resource_references.insert(reference, location);
        tracing::debug!("Added resource reference: {uid}");
        Ok(uid)
    }

    /// Replaces the content and location of the reference with the given uid.
    ///
    /// # Errors
    ///
    /// Fails if the uid is unknown, or if the new id belongs to a different
    /// reference.
    #[instrument(skip(self, reference))]
    pub fn update_resource_reference(
        &mut self,
        reference: ResourceReference,
        location: Location,
        uid: Uid,
    ) -> Result<(), MutationError> {
        if !self.index.resource_references.contains(uid) {
            return Err(MutationError::UnknownUid(uid));
        }
        self.index
            .resource_references
            .check_id_available(reference.id(), Some(uid))?;
        warn_unless_exported(&location, "resource reference", holds_resources);
        self.index
            .resource_references
            .replace(uid, reference, location);
        Ok(())
    }

    /// Deletes the reference with the given uid.
    ///
    /// Returns `false` if the uid is unknown.
    pub fn delete_resource_reference(&mut self, uid: Uid) -> bool {
        let deleted = self.index.resource_references.remove(uid).is_some();
        if deleted {
            tracing::debug!("Deleted resource reference: {uid}");
        }
        deleted
    }

    // ---- links ----

    /// Links stored exactly at `location`.
    #[must_use]
    pub fn links(&self, location: &Location) -> Vec<AvailableLink> {
        self.index.links.collect_at(location)
    }

    /// Links stored at `location` or anywhere below it.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaPathError`] if `location` is not defined by the schema.
    pub fn links_recursive(
        &self,
        location: &Location,
    ) -> Result<Vec<AvailableLink>, SchemaPathError> {
        self.index.links.collect_recursively(location)
    }

    /// Adds a link at `location` and returns its uid.
    #[instrument(skip(self, link))]
    pub fn add_link(&mut self, link: Link, location: Location) -> Uid {
        warn_malformed(&link);
        warn_unless_exported(&location, "link", |node| node.has_section(Section::Links));
        let uid = self.index.links.insert(link, location);
        tracing::debug!("Added link: {uid}");
        uid
    }

    /// Replaces the content and location of the link with the given uid.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::UnknownUid`] if the uid is unknown.
    #[instrument(skip(self, link))]
    pub fn update_link(
        &mut self,
        link: Link,
        location: Location,
        uid: Uid,
    ) -> Result<(), MutationError> {
        warn_malformed(&link);
        warn_unless_exported(&location, "link", |node| node.has_section(Section::Links));
        if self.index.links.replace(uid, link, location) {
            Ok(())
        } else {
            Err(MutationError::UnknownUid(uid))
        }
    }

    /// Deletes the link with the given uid.
    ///
    /// Returns `false` if the uid is unknown.
    pub fn delete_link(&mut self, uid: Uid) -> bool {
        self.index.links.remove(uid).is_some()
    }

    /// Projects a link onto a JSON-LD named graph.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedLinkError`] if an arc names a label that no locator
    /// of the link carries.
    pub fn create_graph_from_link(
        link: &Link,
        context: &[ContextEntry],
    ) -> Result<NamedGraph, MalformedLinkError> {
        graph::project(link, context)
    }

    /// The JSON-LD terms defined for `location`.
    ///
    /// Terms come from the entries of `vocabulary` classifications on
    /// `location` and every location above it. A term defined closer to
    /// `location` overrides the same term defined further up. Entries without
    /// an href, or whose keyword is not a valid term, are skipped.
    #[must_use]
    pub fn vocabulary(&self, location: &Location) -> Vec<ContextEntry> {
        let mut terms = BTreeMap::new();
        for scope in location.ancestors_and_self() {
            let entries = self
                .index
                .classifications
                .at(&scope)
                .filter(|entry| entry.item.classification_type.as_deref() == Some(VOCABULARY))
                .flat_map(|entry| &entry.item.entries);
            for entry in entries {
                let Some(href) = &entry.href else {
                    continue;
                };
                match ContextEntry::new(entry.keyword.as_str(), href.as_str()) {
                    Ok(term) => {
                        terms.insert(entry.keyword.clone(), term);
                    }
                    Err(e) => tracing::warn!("Skipping vocabulary entry at {scope}: {e}"),
                }
            }
        }
        terms.into_values().collect()
    }

    // ---- classifications and annotations ----

    /// Classifications stored exactly at `location`.
    #[must_use]
    pub fn classifications(&self, location: &Location) -> Vec<AvailableClassification> {
        self.index.classifications.collect_at(location)
    }

    /// Adds a classification at `location` and returns its uid.
    pub fn add_classification(
        &mut self,
        classification: Classification,
        location: Location,
    ) -> Uid {
        warn_unless_exported(&location, "classification", |node| {
            node.has_section(Section::Classifications)
        });
        self.index.classifications.insert(classification, location)
    }

    /// Replaces the content and location of the classification with the
    /// given uid.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::UnknownUid`] if the uid is unknown.
    pub fn update_classification(
        &mut self,
        classification: Classification,
        location: Location,
        uid: Uid,
    ) -> Result<(), MutationError> {
        if self
            .index
            .classifications
            .replace(uid, classification, location)
        {
            Ok(())
        } else {
            Err(MutationError::UnknownUid(uid))
        }
    }

    /// Deletes the classification with the given uid.
    ///
    /// Returns `false` if the uid is unknown.
    pub fn delete_classification(&mut self, uid: Uid) -> bool {
        self.index.classifications.remove(uid).is_some()
    }

    /// Annotations stored exactly at `location`.
    #[must_use]
    pub fn annotations(&self, location: &Location) -> Vec<AvailableAnnotation> {
        self.index.annotations.collect_at(location)
    }

    /// Adds an annotation at `location` and returns its uid.
    pub fn add_annotation(&mut self, annotation: Annotation, location: Location) -> Uid {
        warn_unless_exported(&location, "annotation", |node| {
            node.has_section(Section::Annotations)
        });
        self.index.annotations.insert(annotation, location)
    }

    /// Replaces the content and location of the annotation with the given
    /// uid.
    ///
    /// # Errors
    ///
    /// Returns [`MutationError::UnknownUid`] if the uid is unknown.
    pub fn update_annotation(
        &mut self,
        annotation: Annotation,
        location: Location,
        uid: Uid,
    ) -> Result<(), MutationError> {
        if self.index.annotations.replace(uid, annotation, location) {
            Ok(())
        } else {
            Err(MutationError::UnknownUid(uid))
        }
    }

    /// Deletes the annotation with the given uid.
    ///
    /// Returns `false` if the uid is unknown.
    pub fn delete_annotation(&mut self, uid: Uid) -> bool {
        self.index.annotations.remove(uid).is_some()
    }

    // ---- life cycle ----

    /// Life cycle entries of the phase or step at `location`.
    #[must_use]
    pub fn life_cycle_entries(&self, location: &Location) -> Vec<AvailableLifeCycleEntry> {
        self.index.life_cycle_entries.collect_at(location)
    }

    /// Adds a life cycle entry to the phase or step at `location`.
    ///
    /// Resources and references attached to the entry are moved into the
    /// index, at `[location.., stc:LifeCycleInformation, stc:<Status>]`.
    ///
    /// # Errors
    ///
    /// Fails if the phase or step already has an entry of the same status, or
    /// if an attached resource or reference reuses an existing id.
    #[instrument(skip(self, entry))]
    pub fn add_life_cycle_entry(
        &mut self,
        entry: LifeCycleEntry,
        location: Location,
    ) -> Result<Uid, MutationError> {
        self.check_status_available(entry.status, &location, None)?;
        self.check_attached_ids(&entry)?;
        warn_unless_exported(&location, "life cycle entry", |node| {
            node.location(element::LIFE_CYCLE_INFORMATION).is_some()
        });

        let entry = self.index_attachments(entry, &location);
        let uid = self.index.life_cycle_entries.insert(entry, location);
        tracing::debug!("Added life cycle entry: {uid}");
        Ok(uid)
    }

    /// Replaces the life cycle entry with the given uid.
    ///
    /// Resources and references already indexed for the entry follow it if
    /// its status or location changes.
    ///
    /// # Errors
    ///
    /// Fails if the uid is unknown, if the target already has an entry of the
    /// same status, or if an attached resource or reference reuses an
    /// existing id.
    #[instrument(skip(self, entry))]
    pub fn update_life_cycle_entry(
        &mut self,
        entry: LifeCycleEntry,
        location: Location,
        uid: Uid,
    ) -> Result<(), MutationError> {
        let Some(current) = self.index.life_cycle_entries.get(uid) else {
            return Err(MutationError::UnknownUid(uid));
        };
        let previous_slot = status_slot(&current.location, current.item.status);

        self.check_status_available(entry.status, &location, Some(uid))?;
        self.check_attached_ids(&entry)?;

        let slot = status_slot(&location, entry.status);
        self.index.resources.relocate(&previous_slot, &slot);
        self.index.resource_references.relocate(&previous_slot, &slot);

        let entry = self.index_attachments(entry, &location);
        self.index.life_cycle_entries.replace(uid, entry, location);
        Ok(())
    }

    /// Deletes the life cycle entry with the given uid, together with the
    /// resources and references attached to it.
    ///
    /// Returns `false` if the uid is unknown.
    #[instrument(skip(self))]
    pub fn delete_life_cycle_entry(&mut self, uid: Uid) -> bool {
        let Some(removed) = self.index.life_cycle_entries.remove(uid) else {
            return false;
        };
        let slot = status_slot(&removed.location, removed.item.status);

        let resources: Vec<Uid> = self.index.resources.at(&slot).map(|e| e.uid).collect();
        for resource in resources {
            self.delete_resource(resource);
        }
        let references: Vec<Uid> = self
            .index
            .resource_references
            .at(&slot)
            .map(|e| e.uid)
            .collect();
        for reference in references {
            self.delete_resource_reference(reference);
        }
        true
    }

    fn check_status_available(
        &self,
        status: LifeCycleStatus,
        location: &Location,
        owner: Option<Uid>,
    ) -> Result<(), DuplicateStatusError> {
        let taken = self
            .index
            .life_cycle_entries
            .at(location)
            .any(|entry| Some(entry.uid) != owner && entry.item.status == status);
        if taken {
            return Err(DuplicateStatusError {
                status,
                location: location.clone(),
            });
        }
        Ok(())
    }

    fn check_attached_ids(&self, entry: &LifeCycleEntry) -> Result<(), DuplicateIdError> {
        check_new_ids(&self.index.resources, &entry.resources)?;
        check_new_ids(&self.index.resource_references, &entry.resource_references)
    }

    /// Moves the entry's resources and references into the index.
    fn index_attachments(
        &mut self,
        mut entry: LifeCycleEntry,
        location: &Location,
    ) -> LifeCycleEntry {
        let slot = status_slot(location, entry.status);
        for resource in std::mem::take(&mut entry.resources) {
            self.index.resources.insert(resource, slot.clone());
        }
        for reference in std::mem::take(&mut entry.resource_references) {
            self.index.resource_references.insert(reference, slot.clone());
        }
        entry
    }

    // ---- load ----

    fn load_node(
        &mut self,
        node: &SchemaNode,
        raw: &RawElement,
        location: &Location,
    ) -> Result<(), ExtractError> {
        for child in node.children {
            match child.kind {
                NodeKind::Section(section) => self.load_section(section, raw, location)?,
                NodeKind::LifeCycleInformation => {
                    if let Some(information) = raw.child(child.name) {
                        self.load_life_cycle(child, information, location)?;
                    }
                }
                NodeKind::GeneralInformation => {
                    if let Some(general) = raw.child(child.name) {
                        self.general_information = Some(GeneralInformation::from_raw(general)?);
                        self.load_node(child, general, &location.child(child.name))?;
                    }
                }
                NodeKind::Root
                | NodeKind::Phase
                | NodeKind::Step
                | NodeKind::Particle
                | NodeKind::LifeCycleStatus(_) => {
                    if let Some(element) = raw.child(child.name) {
                        self.load_node(child, element, &location.child(child.name))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn load_section(
        &mut self,
        section: Section,
        raw: &RawElement,
        location: &Location,
    ) -> Result<(), ExtractError> {
        match section {
            // Read together with the rest of the general information.
            Section::DerivationChain => {}
            Section::Links => {
                for link in extract::links(raw)? {
                    self.index.links.insert(link, location.clone());
                }
            }
            Section::Resources => {
                for resource in extract::all::<Resource>(raw)? {
                    self.load_resource(resource, location.clone());
                }
            }
            Section::ResourceReferences => {
                for reference in extract::all::<ResourceReference>(raw)? {
                    self.load_resource_reference(reference, location.clone());
                }
            }
            Section::Classifications => {
                for classification in extract::all::<Classification>(raw)? {
                    self.index
                        .classifications
                        .insert(classification, location.clone());
                }
            }
            Section::Annotations => {
                for annotation in extract::annotations(raw)? {
                    self.index.annotations.insert(annotation, location.clone());
                }
            }
        }
        Ok(())
    }

    fn load_life_cycle(
        &mut self,
        node: &SchemaNode,
        information: &RawElement,
        owner: &Location,
    ) -> Result<(), ExtractError> {
        for status in node.locations() {
            let Some(raw_entry) = information.child(status.name) else {
                continue;
            };
            let mut entry = extract::life_cycle_entry(raw_entry)?;
            let slot = status_slot(owner, entry.status);
            for resource in std::mem::take(&mut entry.resources) {
                self.load_resource(resource, slot.clone());
            }
            for reference in std::mem::take(&mut entry.resource_references) {
                self.load_resource_reference(reference, slot.clone());
            }
            self.index.life_cycle_entries.insert(entry, owner.clone());
        }
        Ok(())
    }

    /// Stores a resource read from a document, keeping it even if its id is
    /// already taken.
    fn load_resource(&mut self, resource: Resource, location: Location) {
        if let Err(e) = self.index.resources.check_id_available(resource.id(), None) {
            tracing::warn!("Loaded resource at {location} reuses an id: {e}");
        }
        self.index.resources.insert(resource, location);
    }

    fn load_resource_reference(&mut self, reference: ResourceReference, location: Location) {
        if let Err(e) = self
            .index
            .resource_references
            .check_id_available(reference.id(), None)
        {
            tracing::warn!("Loaded resource reference at {location} reuses an id: {e}");
        }
        self.index.resource_references.insert(reference, location);
    }

    // ---- export ----

    /// Serializes the document as XML text in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if writing fails.
    #[instrument(skip(self))]
    pub fn export(&self) -> Result<String, XmlError> {
        xml::write(&self.to_tree(), self.config.indent())
    }

    /// Builds the raw element tree that [`Self::export`] serializes.
    ///
    /// Elements are emitted in canonical schema order, not in the order they
    /// were loaded or added. The namespace declarations are always set, and
    /// the generation tool and time are refreshed from the configuration.
    #[must_use]
    pub fn to_tree(&self) -> RawElement {
        let mut root = RawElement::new(ROOT);
        for (name, value) in NAMESPACES {
            root.set_attribute(name, value);
        }
        if let Some(top_level) = &self.top_level {
            for attribute in top_level.to_raw().attributes {
                root.set_attribute(attribute.name, attribute.value);
            }
        }
        root.set_attribute("generationTool", self.config.generation_tool());
        if self.config.stamp_generation_time {
            root.set_attribute(
                "generationDateAndTime",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            );
        }

        self.export_children(&STMD_TREE, &Location::root(), &mut root);
        root
    }

    fn export_node(&self, node: &SchemaNode, location: &Location) -> Option<RawElement> {
        let general = match node.kind {
            NodeKind::GeneralInformation => self.general_information.as_ref(),
            _ => None,
        };
        let mut raw = general.map_or_else(|| RawElement::new(node.name), ToRaw::to_raw);
        self.export_children(node, location, &mut raw);
        (general.is_some() || !raw.children.is_empty()).then_some(raw)
    }

    fn export_children(&self, node: &SchemaNode, location: &Location, raw: &mut RawElement) {
        for child in node.children {
            let element = match child.kind {
                NodeKind::Section(section) => {
                    self.export_section(section, location, raw);
                    None
                }
                NodeKind::LifeCycleInformation => self.export_life_cycle(child, location),
                _ => self.export_node(child, &location.child(child.name)),
            };
            if let Some(element) = element {
                raw.children.push(RawNode::Element(element));
            }
        }
    }

    fn export_section(&self, section: Section, location: &Location, raw: &mut RawElement) {
        let elements: Vec<RawElement> = match section {
            Section::DerivationChain => Vec::new(),
            Section::Links => assemble::links(self.index.links.at(location).map(|e| &e.item))
                .into_iter()
                .collect(),
            Section::Resources => to_raw_all(&self.index.resources, location),
            Section::ResourceReferences => to_raw_all(&self.index.resource_references, location),
            Section::Classifications => to_raw_all(&self.index.classifications, location),
            Section::Annotations => {
                let annotations: Vec<Annotation> = self
                    .index
                    .annotations
                    .at(location)
                    .map(|e| e.item.clone())
                    .collect();
                assemble::annotations(&annotations).into_iter().collect()
            }
        };
        raw.children
            .extend(elements.into_iter().map(RawNode::Element));
    }

    fn export_life_cycle(&self, node: &SchemaNode, owner: &Location) -> Option<RawElement> {
        let mut information = RawElement::new(node.name);
        for status_node in node.locations() {
            let NodeKind::LifeCycleStatus(status) = status_node.kind else {
                continue;
            };
            let slot = status_slot(owner, status);
            let entry = self
                .index
                .life_cycle_entries
                .at(owner)
                .find(|entry| entry.item.status == status);

            let Some(entry) = entry else {
                let orphans = self.index.resources.at(&slot).count()
                    + self.index.resource_references.at(&slot).count();
                if orphans > 0 {
                    tracing::warn!(
                        "Skipping {orphans} resources and references at {slot}: \
                         no '{status}' life cycle entry"
                    );
                }
                continue;
            };

            let mut entry = entry.item.clone();
            entry
                .resources
                .extend(self.index.resources.at(&slot).map(|e| e.item.clone()));
            entry.resource_references.extend(
                self.index
                    .resource_references
                    .at(&slot)
                    .map(|e| e.item.clone()),
            );
            information.children.push(RawNode::Element(entry.to_raw()));
        }
        (!information.children.is_empty()).then_some(information)
    }
}

/// The location of resources attached to the `status` entry of `owner`.
fn status_slot(owner: &Location, status: LifeCycleStatus) -> Location {
    owner
        .child(element::LIFE_CYCLE_INFORMATION)
        .child(status.element_name())
}

fn to_raw_all<T: ToRaw>(collection: &Collection<T>, location: &Location) -> Vec<RawElement> {
    collection.at(location).map(|e| e.item.to_raw()).collect()
}

/// Checks that none of `items` reuses a stored id or an id of another item.
fn check_new_ids<T: Identified>(
    collection: &Collection<T>,
    items: &[T],
) -> Result<(), DuplicateIdError> {
    let mut seen = HashSet::new();
    for id in items.iter().filter_map(Identified::id) {
        collection.check_id_available(Some(id), None)?;
        if !seen.insert(id) {
            return Err(DuplicateIdError { id: id.to_string() });
        }
    }
    Ok(())
}

fn holds_resources(node: &SchemaNode) -> bool {
    node.has_section(Section::Resources) || matches!(node.kind, NodeKind::LifeCycleStatus(_))
}

/// Logs a warning if export will not write an entry stored at `location`.
fn warn_unless_exported(location: &Location, what: &str, accepts: impl Fn(&SchemaNode) -> bool) {
    match schema::subtree_at(location) {
        Ok(node) if accepts(node) => {}
        Ok(_) => tracing::warn!("{location} cannot hold a {what}; it will not be exported"),
        Err(e) => tracing::warn!("{e}; the {what} will not be exported"),
    }
}

fn warn_malformed(link: &Link) {
    for arc in graph::unresolved_arcs(link) {
        tracing::warn!(
            "Link {:?} has an arc from {:?} to {:?} that matches no locator",
            link.title,
            arc.from,
            arc.to
        );
    }
}
