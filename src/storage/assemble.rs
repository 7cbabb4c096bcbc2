//! Conversion from the document model back to raw XML elements.
//!
//! Absent values are omitted rather than written as empty elements, and the
//! fixed `xlink:type` attributes are restored.

use crate::{
    domain::{
        Annotation, Arc, Classification, ClassificationEntry, DerivationChainEntry, Extension,
        GeneralInformation, LifeCycleEntry, Link, Locator, MetaData, Resource, ResourceReference,
        Responsible, Signature, Summary, TopLevelInformation,
        schema::{ROOT, element},
    },
    xml::RawElement,
};

/// Types that can be written as a raw element.
pub trait ToRaw {
    /// Builds the raw element for this value.
    fn to_raw(&self) -> RawElement;
}

/// Builds the `stc:Annotations` container, or `None` if there is nothing to
/// hold.
#[must_use]
pub fn annotations(annotations: &[Annotation]) -> Option<RawElement> {
    if annotations.is_empty() {
        return None;
    }
    Some(RawElement::new(element::ANNOTATIONS).with_children(annotations.iter().map(ToRaw::to_raw)))
}

/// Builds the `stc:Links` container, or `None` if there are no links.
#[must_use]
pub fn links<'a>(links: impl IntoIterator<Item = &'a Link>) -> Option<RawElement> {
    let container =
        RawElement::new(element::LINKS).with_children(links.into_iter().map(ToRaw::to_raw));
    (!container.children.is_empty()).then_some(container)
}

fn all<T: ToRaw>(items: &[T]) -> impl Iterator<Item = RawElement> + '_ {
    items.iter().map(ToRaw::to_raw)
}

/// Appends the extension's attributes and content to `raw`.
fn with_extension(mut raw: RawElement, extension: &Extension) -> RawElement {
    for attribute in &extension.attributes {
        raw.set_attribute(attribute.name.clone(), attribute.value.clone());
    }
    raw.children.extend(extension.nodes.iter().cloned());
    raw
}

fn content(content: Option<&Extension>) -> Option<RawElement> {
    content.map(|content| with_extension(RawElement::new(element::CONTENT), content))
}

impl ToRaw for TopLevelInformation {
    fn to_raw(&self) -> RawElement {
        RawElement::new(ROOT)
            .with_attribute("version", &self.version)
            .with_attribute("name", &self.name)
            .with_attribute("GUID", &self.guid)
            .with_optional_attribute("id", self.id.as_deref())
            .with_optional_attribute("description", self.description.as_deref())
            .with_optional_attribute("author", self.author.as_deref())
            .with_optional_attribute("fileversion", self.fileversion.as_deref())
            .with_optional_attribute("copyright", self.copyright.as_deref())
            .with_optional_attribute("license", self.license.as_deref())
            .with_optional_attribute("generationTool", self.generation_tool.as_deref())
            .with_optional_attribute(
                "generationDateAndTime",
                self.generation_date_and_time.as_deref(),
            )
    }
}

impl ToRaw for GeneralInformation {
    /// Builds the general information element without its links.
    fn to_raw(&self) -> RawElement {
        let chain = (!self.derivation_chain.is_empty()).then(|| {
            RawElement::new(element::DERIVATION_CHAIN).with_children(all(&self.derivation_chain))
        });
        RawElement::new(element::GENERAL_INFORMATION).with_optional_child(chain)
    }
}

impl ToRaw for DerivationChainEntry {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::DERIVATION_CHAIN_ENTRY)
            .with_attribute("GUID", &self.guid)
            .with_optional_attribute("author", self.author.as_deref())
            .with_optional_attribute("fileversion", self.fileversion.as_deref())
            .with_optional_attribute("copyright", self.copyright.as_deref())
            .with_optional_attribute("license", self.license.as_deref())
            .with_optional_attribute("generationTool", self.generation_tool.as_deref())
            .with_optional_attribute(
                "generationDateAndTime",
                self.generation_date_and_time.as_deref(),
            )
    }
}

impl ToRaw for Resource {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::RESOURCE)
            .with_attribute("kind", &self.kind)
            .with_attribute("type", &self.mime_type)
            .with_optional_attribute("id", self.id.as_deref())
            .with_optional_attribute("description", self.description.as_deref())
            .with_optional_attribute("master", self.master.as_deref())
            .with_optional_attribute("scope", self.scope.as_deref())
            .with_optional_attribute("source", self.source.as_deref())
            .with_optional_child(content(self.content.as_ref()))
            .with_optional_child(self.summary.as_ref().map(ToRaw::to_raw))
            .with_children(all(&self.meta_data))
            .with_children(all(&self.signatures))
            .with_children(all(&self.classifications))
            .with_optional_child(annotations(&self.annotations))
    }
}

impl ToRaw for ResourceReference {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::RESOURCE_REFERENCE)
            .with_attribute("xlink:type", "simple")
            .with_attribute("xlink:href", &self.href)
            .with_optional_attribute("id", self.id.as_deref())
            .with_optional_attribute("description", self.description.as_deref())
            .with_children(all(&self.classifications))
            .with_optional_child(annotations(&self.annotations))
    }
}

impl ToRaw for Summary {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::SUMMARY)
            .with_attribute("type", &self.mime_type)
            .with_optional_attribute("source", self.source.as_deref())
            .with_optional_attribute("sourceBase", self.source_base.as_deref())
            .with_optional_child(content(self.content.as_ref()))
            .with_children(all(&self.signatures))
            .with_children(all(&self.classifications))
            .with_optional_child(annotations(&self.annotations))
    }
}

impl ToRaw for MetaData {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::META_DATA)
            .with_attribute("kind", &self.kind)
            .with_attribute("type", &self.mime_type)
            .with_optional_attribute("source", self.source.as_deref())
            .with_optional_attribute("sourceBase", self.source_base.as_deref())
            .with_optional_child(content(self.content.as_ref()))
            .with_children(all(&self.signatures))
            .with_children(all(&self.classifications))
            .with_optional_child(annotations(&self.annotations))
    }
}

impl ToRaw for Signature {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::SIGNATURE)
            .with_attribute("role", &self.role)
            .with_attribute("type", &self.mime_type)
            .with_optional_attribute("source", self.source.as_deref())
            .with_optional_attribute("sourceBase", self.source_base.as_deref())
            .with_optional_child(content(self.content.as_ref()))
            .with_children(all(&self.classifications))
            .with_optional_child(annotations(&self.annotations))
    }
}

impl ToRaw for Classification {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::CLASSIFICATION)
            .with_optional_attribute("type", self.classification_type.as_deref())
            .with_children(all(&self.entries))
    }
}

impl ToRaw for ClassificationEntry {
    fn to_raw(&self) -> RawElement {
        let mut raw = RawElement::new(element::CLASSIFICATION_ENTRY)
            .with_attribute("keyword", &self.keyword);
        if let Some(href) = &self.href {
            raw = raw
                .with_attribute("xlink:type", "simple")
                .with_attribute("xlink:href", href);
        }
        with_extension(raw, &self.any)
    }
}

impl ToRaw for Annotation {
    fn to_raw(&self) -> RawElement {
        let raw =
            RawElement::new(element::ANNOTATION).with_attribute("type", &self.annotation_type);
        with_extension(raw, &self.any)
    }
}

impl ToRaw for Link {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::LINK)
            .with_attribute("xlink:type", "extended")
            .with_optional_attribute("xlink:title", self.title.as_deref())
            .with_optional_attribute("xlink:role", self.role.as_deref())
            .with_children(all(&self.locators))
            .with_children(all(&self.arcs))
    }
}

impl ToRaw for Locator {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::LOCATOR)
            .with_attribute("xlink:type", "locator")
            .with_attribute("xlink:href", &self.href)
            .with_optional_attribute("xlink:label", self.label.as_deref())
            .with_optional_attribute("xlink:title", self.title.as_deref())
            .with_optional_attribute("xlink:role", self.role.as_deref())
    }
}

impl ToRaw for Arc {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::ARC)
            .with_attribute("xlink:type", "arc")
            .with_optional_attribute("xlink:from", self.from.as_deref())
            .with_optional_attribute("xlink:to", self.to.as_deref())
            .with_optional_attribute("xlink:title", self.title.as_deref())
            .with_optional_attribute("xlink:arcrole", self.arcrole.as_deref())
    }
}

impl ToRaw for Responsible {
    fn to_raw(&self) -> RawElement {
        RawElement::new(element::RESPONSIBLE)
            .with_optional_attribute("organization", self.organization.as_deref())
            .with_optional_attribute("role", self.role.as_deref())
            .with_optional_attribute("name", self.name.as_deref())
    }
}

impl ToRaw for LifeCycleEntry {
    /// Builds the status element (`stc:Drafted`, ...) for this entry.
    fn to_raw(&self) -> RawElement {
        RawElement::new(self.status.element_name())
            .with_attribute("date", &self.date)
            .with_optional_attribute("checksum", self.checksum.as_deref())
            .with_optional_attribute("checksumType", self.checksum_type.as_deref())
            .with_child(self.responsible.to_raw())
            .with_children(all(&self.signatures))
            .with_children(all(&self.resources))
            .with_children(all(&self.resource_references))
            .with_children(all(&self.classifications))
            .with_optional_child(annotations(&self.annotations))
    }
}
