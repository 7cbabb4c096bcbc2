//! Conversion from raw XML elements to the document model.
//!
//! Optional attributes and children that are missing become `None` or empty
//! lists. Content the model does not name (the body of `stc:Content`,
//! annotations and classification entries) is kept verbatim as an
//! [`Extension`].

use thiserror::Error;

use crate::{
    domain::{
        Annotation, Arc, Classification, ClassificationEntry, DerivationChainEntry, Extension,
        GeneralInformation, LifeCycleEntry, LifeCycleStatus, Link, Locator, MetaData, Resource,
        ResourceReference, Responsible, Signature, Summary, TopLevelInformation,
        schema::{ROOT, element},
    },
    xml::RawElement,
};

/// A raw element lacks something the document format requires.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// A mandatory attribute is missing.
    #[error("element '{element}' is missing mandatory attribute '{attribute}'")]
    MissingAttribute {
        /// The element being extracted.
        element: String,
        /// The missing attribute.
        attribute: &'static str,
    },

    /// A mandatory child element is missing.
    #[error("element '{element}' is missing mandatory child '{child}'")]
    MissingChild {
        /// The element being extracted.
        element: String,
        /// The missing child.
        child: &'static str,
    },

    /// The element is not of the expected type.
    #[error("expected element '{expected}', found '{found}'")]
    UnexpectedElement {
        /// The element name that was expected.
        expected: &'static str,
        /// The element name that was found.
        found: String,
    },
}

/// Types that can be read from a raw element.
pub trait FromRaw: Sized {
    /// The qualified name of the element this type is read from.
    const ELEMENT: &'static str;

    /// Reads the value from `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if a mandatory attribute or child is missing.
    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError>;
}

/// Reads every `T` child of `parent`, in document order.
///
/// # Errors
///
/// Returns the first [`ExtractError`] raised by a child.
pub fn all<T: FromRaw>(parent: &RawElement) -> Result<Vec<T>, ExtractError> {
    parent.children_named(T::ELEMENT).map(T::from_raw).collect()
}

/// Reads the single `T` child of `parent`, if present.
fn single<T: FromRaw>(parent: &RawElement) -> Result<Option<T>, ExtractError> {
    parent
        .elements()
        .find(|child| child.name == T::ELEMENT)
        .map(T::from_raw)
        .transpose()
}

/// Reads the annotations inside the `stc:Annotations` child of `parent`.
///
/// # Errors
///
/// Returns [`ExtractError`] if an annotation lacks its type.
pub fn annotations(parent: &RawElement) -> Result<Vec<Annotation>, ExtractError> {
    parent
        .child(element::ANNOTATIONS)
        .map_or_else(|| Ok(Vec::new()), all::<Annotation>)
}

/// Reads the links inside the `stc:Links` child of `parent`.
///
/// # Errors
///
/// Returns [`ExtractError`] if a link or one of its locators is malformed.
pub fn links(parent: &RawElement) -> Result<Vec<Link>, ExtractError> {
    parent
        .child(element::LINKS)
        .map_or_else(|| Ok(Vec::new()), all::<Link>)
}

fn required(raw: &RawElement, attribute: &'static str) -> Result<String, ExtractError> {
    raw.attribute(attribute)
        .map(str::to_string)
        .ok_or_else(|| ExtractError::MissingAttribute {
            element: raw.name.clone(),
            attribute,
        })
}

fn optional(raw: &RawElement, attribute: &str) -> Option<String> {
    raw.attribute(attribute).map(str::to_string)
}

/// Everything in `raw` except the attributes named in `known`.
fn extension(raw: &RawElement, known: &[&str]) -> Extension {
    Extension {
        attributes: raw
            .attributes
            .iter()
            .filter(|a| !known.contains(&a.name.as_str()))
            .cloned()
            .collect(),
        nodes: raw.children.clone(),
    }
}

fn content(parent: &RawElement) -> Option<Extension> {
    parent
        .child(element::CONTENT)
        .map(|content| extension(content, &[]))
}

impl FromRaw for TopLevelInformation {
    const ELEMENT: &'static str = ROOT;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        if raw.name != ROOT {
            return Err(ExtractError::UnexpectedElement {
                expected: ROOT,
                found: raw.name.clone(),
            });
        }
        Ok(Self {
            version: required(raw, "version")?,
            name: required(raw, "name")?,
            guid: required(raw, "GUID")?,
            id: optional(raw, "id"),
            description: optional(raw, "description"),
            author: optional(raw, "author"),
            fileversion: optional(raw, "fileversion"),
            copyright: optional(raw, "copyright"),
            license: optional(raw, "license"),
            generation_tool: optional(raw, "generationTool"),
            generation_date_and_time: optional(raw, "generationDateAndTime"),
        })
    }
}

impl FromRaw for GeneralInformation {
    const ELEMENT: &'static str = element::GENERAL_INFORMATION;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        let derivation_chain = match raw.child(element::DERIVATION_CHAIN) {
            Some(chain) => all(chain)?,
            None => Vec::new(),
        };
        Ok(Self { derivation_chain })
    }
}

impl FromRaw for DerivationChainEntry {
    const ELEMENT: &'static str = element::DERIVATION_CHAIN_ENTRY;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            guid: required(raw, "GUID")?,
            author: optional(raw, "author"),
            fileversion: optional(raw, "fileversion"),
            copyright: optional(raw, "copyright"),
            license: optional(raw, "license"),
            generation_tool: optional(raw, "generationTool"),
            generation_date_and_time: optional(raw, "generationDateAndTime"),
        })
    }
}

impl FromRaw for Resource {
    const ELEMENT: &'static str = element::RESOURCE;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            kind: required(raw, "kind")?,
            mime_type: required(raw, "type")?,
            id: optional(raw, "id"),
            description: optional(raw, "description"),
            master: optional(raw, "master"),
            scope: optional(raw, "scope"),
            source: optional(raw, "source"),
            content: content(raw),
            summary: single(raw)?,
            meta_data: all(raw)?,
            signatures: all(raw)?,
            classifications: all(raw)?,
            annotations: annotations(raw)?,
        })
    }
}

impl FromRaw for ResourceReference {
    const ELEMENT: &'static str = element::RESOURCE_REFERENCE;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            href: required(raw, "xlink:href")?,
            id: optional(raw, "id"),
            description: optional(raw, "description"),
            classifications: all(raw)?,
            annotations: annotations(raw)?,
        })
    }
}

impl FromRaw for Summary {
    const ELEMENT: &'static str = element::SUMMARY;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            mime_type: required(raw, "type")?,
            source: optional(raw, "source"),
            source_base: optional(raw, "sourceBase"),
            content: content(raw),
            signatures: all(raw)?,
            classifications: all(raw)?,
            annotations: annotations(raw)?,
        })
    }
}

impl FromRaw for MetaData {
    const ELEMENT: &'static str = element::META_DATA;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            kind: required(raw, "kind")?,
            mime_type: required(raw, "type")?,
            source: optional(raw, "source"),
            source_base: optional(raw, "sourceBase"),
            content: content(raw),
            signatures: all(raw)?,
            classifications: all(raw)?,
            annotations: annotations(raw)?,
        })
    }
}

impl FromRaw for Signature {
    const ELEMENT: &'static str = element::SIGNATURE;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            role: required(raw, "role")?,
            mime_type: required(raw, "type")?,
            source: optional(raw, "source"),
            source_base: optional(raw, "sourceBase"),
            content: content(raw),
            classifications: all(raw)?,
            annotations: annotations(raw)?,
        })
    }
}

impl FromRaw for Classification {
    const ELEMENT: &'static str = element::CLASSIFICATION;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            classification_type: optional(raw, "type"),
            entries: all(raw)?,
        })
    }
}

impl FromRaw for ClassificationEntry {
    const ELEMENT: &'static str = element::CLASSIFICATION_ENTRY;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            keyword: required(raw, "keyword")?,
            href: optional(raw, "xlink:href"),
            any: extension(raw, &["keyword", "xlink:type", "xlink:href"]),
        })
    }
}

impl FromRaw for Annotation {
    const ELEMENT: &'static str = element::ANNOTATION;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            annotation_type: required(raw, "type")?,
            any: extension(raw, &["type"]),
        })
    }
}

impl FromRaw for Link {
    const ELEMENT: &'static str = element::LINK;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        let locators: Vec<Locator> = all(raw)?;
        if locators.is_empty() {
            return Err(ExtractError::MissingChild {
                element: raw.name.clone(),
                child: element::LOCATOR,
            });
        }
        Ok(Self {
            title: optional(raw, "xlink:title"),
            role: optional(raw, "xlink:role"),
            locators,
            arcs: all(raw)?,
        })
    }
}

impl FromRaw for Locator {
    const ELEMENT: &'static str = element::LOCATOR;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            href: required(raw, "xlink:href")?,
            label: optional(raw, "xlink:label"),
            title: optional(raw, "xlink:title"),
            role: optional(raw, "xlink:role"),
        })
    }
}

impl FromRaw for Arc {
    const ELEMENT: &'static str = element::ARC;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            from: optional(raw, "xlink:from"),
            to: optional(raw, "xlink:to"),
            title: optional(raw, "xlink:title"),
            arcrole: optional(raw, "xlink:arcrole"),
        })
    }
}

impl FromRaw for Responsible {
    const ELEMENT: &'static str = element::RESPONSIBLE;

    fn from_raw(raw: &RawElement) -> Result<Self, ExtractError> {
        Ok(Self {
            organization: optional(raw, "organization"),
            role: optional(raw, "role"),
            name: optional(raw, "name"),
        })
    }
}

/// Reads a life cycle entry from its status element (`stc:Drafted`, ...).
///
/// # Errors
///
/// Returns [`ExtractError`] if `raw` is not a status element, or if the date
/// or the responsible person is missing.
pub fn life_cycle_entry(raw: &RawElement) -> Result<LifeCycleEntry, ExtractError> {
    let status = LifeCycleStatus::from_element_name(&raw.name).ok_or_else(|| {
        ExtractError::UnexpectedElement {
            expected: element::LIFE_CYCLE_INFORMATION,
            found: raw.name.clone(),
        }
    })?;
    let responsible = single(raw)?.ok_or_else(|| ExtractError::MissingChild {
        element: raw.name.clone(),
        child: element::RESPONSIBLE,
    })?;
    Ok(LifeCycleEntry {
        status,
        date: required(raw, "date")?,
        checksum: optional(raw, "checksum"),
        checksum_type: optional(raw, "checksumType"),
        responsible,
        signatures: all(raw)?,
        resources: all(raw)?,
        resource_references: all(raw)?,
        classifications: all(raw)?,
        annotations: annotations(raw)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{self, RawNode};

    fn parse(text: &str) -> RawElement {
        xml::parse(text).expect("test XML should be well-formed")
    }

    #[test]
    fn resource_with_nested_elements() {
        let raw = parse(
            r#"<stc:Resource kind="model" type="application/x-fmu-sharedlibrary" id="R1" source="model.fmu">
                <stc:Content><note>hello</note></stc:Content>
                <stc:Summary type="text/plain" source="summary.txt"/>
                <stc:MetaData kind="general" type="text/plain"/>
                <stc:MetaData kind="details" type="text/plain"/>
                <stc:Signature role="approval" type="application/pkcs7-signature"/>
                <stc:Classification type="vocabulary">
                    <stc:ClassificationEntry keyword="fmu" xlink:type="simple" xlink:href="https://fmi-standard.org"/>
                </stc:Classification>
                <stc:Annotations>
                    <ssc:Annotation type="com.example.note" level="info">free text</ssc:Annotation>
                </stc:Annotations>
            </stc:Resource>"#,
        );

        let resource = Resource::from_raw(&raw).unwrap();

        assert_eq!(resource.kind, "model");
        assert_eq!(resource.id.as_deref(), Some("R1"));
        assert_eq!(resource.description, None);
        assert_eq!(resource.meta_data.len(), 2);
        assert_eq!(resource.signatures[0].role, "approval");
        assert_eq!(resource.summary.unwrap().source.as_deref(), Some("summary.txt"));

        let content = resource.content.unwrap();
        assert!(content.attributes.is_empty());
        assert!(matches!(&content.nodes[0], RawNode::Element(e) if e.name == "note"));

        let entry = &resource.classifications[0].entries[0];
        assert_eq!(entry.keyword, "fmu");
        assert_eq!(entry.href.as_deref(), Some("https://fmi-standard.org"));
        assert!(entry.any.is_empty());

        let annotation = &resource.annotations[0];
        assert_eq!(annotation.annotation_type, "com.example.note");
        assert_eq!(annotation.any.attributes.len(), 1);
        assert_eq!(annotation.any.attributes[0].name, "level");
        assert_eq!(annotation.any.nodes, vec![RawNode::Text("free text".to_string())]);
    }

    #[test]
    fn missing_mandatory_attribute() {
        let raw = parse(r#"<stc:Resource kind="model"/>"#);

        assert_eq!(
            Resource::from_raw(&raw),
            Err(ExtractError::MissingAttribute {
                element: "stc:Resource".to_string(),
                attribute: "type",
            })
        );
    }

    #[test]
    fn link_without_locators_is_rejected() {
        let raw = parse(r#"<stc:Link xlink:type="extended"/>"#);

        assert!(matches!(
            Link::from_raw(&raw),
            Err(ExtractError::MissingChild { child: "stc:Locator", .. })
        ));
    }

    #[test]
    fn link_with_locators_and_arcs() {
        let raw = parse(
            r##"<stc:Link xlink:type="extended" xlink:title="trace">
                <stc:Locator xlink:type="locator" xlink:href="#R1" xlink:label="req"/>
                <stc:Locator xlink:type="locator" xlink:href="#R2" xlink:label="model" xlink:role="Model"/>
                <stc:Arc xlink:type="arc" xlink:from="model" xlink:to="req" xlink:arcrole="satisfies"/>
            </stc:Link>"##,
        );

        let link = Link::from_raw(&raw).unwrap();

        assert_eq!(link.title.as_deref(), Some("trace"));
        assert_eq!(link.locators.len(), 2);
        assert_eq!(link.locators[1].role.as_deref(), Some("Model"));
        assert_eq!(link.arcs[0].arcrole.as_deref(), Some("satisfies"));
    }

    #[test]
    fn life_cycle_entry_requires_responsible() {
        let raw = parse(r#"<stc:Drafted date="2024-01-01T00:00:00Z"/>"#);

        assert!(matches!(
            life_cycle_entry(&raw),
            Err(ExtractError::MissingChild { child: "stc:Responsible", .. })
        ));
    }

    #[test]
    fn life_cycle_entry_with_resources() {
        let raw = parse(
            r#"<stc:Approved date="2024-01-01T00:00:00Z" checksum="abc">
                <stc:Responsible name="Jo" role="reviewer"/>
                <stc:Resource kind="report" type="application/pdf" id="REP"/>
            </stc:Approved>"#,
        );

        let entry = life_cycle_entry(&raw).unwrap();

        assert_eq!(entry.status, LifeCycleStatus::Approved);
        assert_eq!(entry.checksum.as_deref(), Some("abc"));
        assert_eq!(entry.responsible.name.as_deref(), Some("Jo"));
        assert_eq!(entry.resources[0].id.as_deref(), Some("REP"));
    }

    #[test]
    fn general_information_with_derivation_chain() {
        let raw = parse(
            r#"<stmd:GeneralInformation>
                <stc:DerivationChain>
                    <stc:DerivationChainEntry GUID="a"/>
                    <stc:DerivationChainEntry GUID="b" author="Sam"/>
                </stc:DerivationChain>
            </stmd:GeneralInformation>"#,
        );

        let info = GeneralInformation::from_raw(&raw).unwrap();

        assert_eq!(info.derivation_chain.len(), 2);
        assert_eq!(info.derivation_chain[1].author.as_deref(), Some("Sam"));
    }

    #[test]
    fn top_level_rejects_other_roots() {
        let raw = parse(r#"<ssd:SystemStructureDescription version="1.0" name="x"/>"#);

        assert!(matches!(
            TopLevelInformation::from_raw(&raw),
            Err(ExtractError::UnexpectedElement { .. })
        ));
    }
}
