//! Raw XML tree and the parse/write adapter around `quick-xml`.
//!
//! The raw tree is the boundary between text and the typed document model:
//! elements keep their attributes apart from their children, and a fixed set
//! of element names is always treated as repeatable.

mod reader;
mod tree;
mod writer;

use std::{io, str::Utf8Error, string::FromUtf8Error};

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

pub use reader::parse;
pub use tree::{Attribute, RawElement, RawNode};
pub use writer::write;

/// Elements that may occur more than once under the same parent.
///
/// These are always read back as a list, even when a document contains a
/// single occurrence.
pub const REPEATED_ELEMENTS: &[&str] = &[
    "stc:Resource",
    "stc:ResourceReference",
    "stc:Signature",
    "stc:MetaData",
    "stc:Classification",
    "ssc:Annotation",
    "stc:ClassificationEntry",
    "stc:Link",
    "stc:Arc",
    "stc:DerivationChainEntry",
];

/// Elements that are rendered as a self-closing tag when they have no children.
pub const UNPAIRED_ELEMENTS: &[&str] = &[
    "stc:Resource",
    "stc:ResourceReference",
    "stc:DerivationChainEntry",
    "stc:Classification",
    "stc:ClassificationEntry",
    "ssc:Annotation",
    "stc:Locator",
    "stc:Arc",
    "stc:Responsible",
    "stc:Signature",
    "stc:MetaData",
    "stc:Summary",
];

/// Returns `true` if `name` may be repeated under one parent.
#[must_use]
pub fn is_repeated(name: &str) -> bool {
    REPEATED_ELEMENTS.contains(&name)
}

/// Returns `true` if an empty `name` element is written as a self-closing tag.
#[must_use]
pub fn is_unpaired(name: &str) -> bool {
    UNPAIRED_ELEMENTS.contains(&name)
}

/// Errors raised while reading or writing XML text.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The underlying XML reader or writer rejected the input.
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// An attribute could not be parsed.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    /// A name or text node was not valid UTF-8.
    #[error("invalid UTF-8 in XML name: {0}")]
    Utf8(#[from] Utf8Error),

    /// The serialized output was not valid UTF-8.
    #[error("invalid UTF-8 in XML output: {0}")]
    Output(#[from] FromUtf8Error),

    /// Writing to the output buffer failed.
    #[error("failed to write XML: {0}")]
    Io(#[from] io::Error),

    /// The document has no root element.
    #[error("document has no root element")]
    MissingRoot,

    /// The document has more than one root element.
    #[error("document has more than one root element (found '{0}')")]
    MultipleRoots(String),

    /// A closing tag did not match the element it closes.
    #[error("closing tag '{found}' does not match open element '{expected}'")]
    MismatchedTag {
        /// The name of the element that was open.
        expected: String,
        /// The name found in the closing tag.
        found: String,
    },

    /// The document ended while an element was still open.
    #[error("element '{0}' is never closed")]
    UnclosedElement(String),
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("stc:Resource", true, true; "resource")]
    #[test_case("stc:Link", true, false; "link is repeated but paired")]
    #[test_case("stc:Locator", false, true; "locator is unpaired but single")]
    #[test_case("stc:Content", false, false; "content")]
    fn element_rules(name: &str, repeated: bool, unpaired: bool) {
        assert_eq!(is_repeated(name), repeated);
        assert_eq!(is_unpaired(name), unpaired);
    }
}
