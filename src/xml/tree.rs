use serde::{Deserialize, Serialize};

/// A single `name="value"` pair on an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// The qualified attribute name, including any namespace prefix.
    pub name: String,
    /// The unescaped attribute value.
    pub value: String,
}

impl Attribute {
    /// Creates a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A child node of a [`RawElement`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawNode {
    /// A nested element.
    Element(RawElement),
    /// Character data (text or CDATA), unescaped.
    Text(String),
}

/// An XML element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawElement {
    /// The qualified element name, including any namespace prefix.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<Attribute>,
    /// Child nodes in document order.
    pub children: Vec<RawNode>,
}

impl RawElement {
    /// Creates an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute, replacing any existing attribute of the same name.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Adds an attribute if `value` is present.
    #[must_use]
    pub fn with_optional_attribute(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.with_attribute(name, value),
            None => self,
        }
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(RawNode::Element(child));
        self
    }

    /// Appends a child element if present.
    #[must_use]
    pub fn with_optional_child(self, child: Option<Self>) -> Self {
        match child {
            Some(child) => self.with_child(child),
            None => self,
        }
    }

    /// Appends every element yielded by `children`.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children
            .extend(children.into_iter().map(RawNode::Element));
        self
    }

    /// Sets an attribute, replacing any existing attribute of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            existing.value = value;
        } else {
            self.attributes.push(Attribute { name, value });
        }
    }

    /// Returns the value of the attribute called `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the first child element called `name`.
    ///
    /// Intended for elements that occur at most once under their parent.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        debug_assert!(
            !super::is_repeated(name),
            "'{name}' is repeatable, use `children_named`"
        );
        self.elements().find(|e| e.name == name)
    }

    /// Returns every child element called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.elements().filter(move |e| e.name == name)
    }

    /// Returns every child element, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|node| match node {
            RawNode::Element(element) => Some(element),
            RawNode::Text(_) => None,
        })
    }

    /// Returns `true` if the element has neither attributes nor children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attribute_replaces_existing_value() {
        let element = RawElement::new("stc:Resource")
            .with_attribute("kind", "model")
            .with_attribute("kind", "parameter");

        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attribute("kind"), Some("parameter"));
    }

    #[test]
    fn optional_builders_skip_absent_values() {
        let element = RawElement::new("stc:Resource")
            .with_optional_attribute("id", None)
            .with_optional_child(None);

        assert!(element.is_empty());
    }

    #[test]
    fn children_named_preserves_order_and_skips_text() {
        let mut element = RawElement::new("stc:Input")
            .with_child(RawElement::new("stc:Resource").with_attribute("id", "a"))
            .with_child(RawElement::new("stc:Link"));
        element.children.push(RawNode::Text("stray".to_string()));
        element = element.with_child(RawElement::new("stc:Resource").with_attribute("id", "b"));

        let ids: Vec<_> = element
            .children_named("stc:Resource")
            .filter_map(|e| e.attribute("id"))
            .collect();

        assert_eq!(ids, ["a", "b"]);
        assert_eq!(element.elements().count(), 3);
    }
}
