use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use super::{RawElement, RawNode, XmlError, is_unpaired};

/// Serializes `root` as an XML document with a UTF-8 declaration.
///
/// Each nesting level is indented by `indent` spaces; `0` writes the document
/// on a single line.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write(root: &RawElement, indent: usize) -> Result<String, XmlError> {
    let mut writer = if indent == 0 {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', indent)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, root)?;

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &RawElement) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for attribute in &element.attributes {
        start.push_attribute((attribute.name.as_str(), attribute.value.as_str()));
    }

    if element.children.is_empty() && is_unpaired(&element.name) {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        match child {
            RawNode::Element(child) => write_element(writer, child)?,
            RawNode::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    #[test]
    fn unpaired_leaf_is_self_closing() {
        let root = RawElement::new("stc:Input")
            .with_child(RawElement::new("stc:Resource").with_attribute("kind", "model"));

        let text = write(&root, 0).unwrap();

        assert_eq!(
            text,
            r#"<?xml version="1.0" encoding="UTF-8"?><stc:Input><stc:Resource kind="model"/></stc:Input>"#
        );
    }

    #[test]
    fn paired_leaf_keeps_end_tag() {
        let root = RawElement::new("stc:Links");

        let text = write(&root, 0).unwrap();

        assert!(text.ends_with("<stc:Links></stc:Links>"));
    }

    #[test]
    fn escaped_content_survives_round_trip() {
        let mut content =
            RawElement::new("stc:Content").with_attribute("note", "a \"quoted\" & <tag>");
        content
            .children
            .push(RawNode::Text("1 < 2 && 3 > 2".to_string()));
        let root = RawElement::new("stc:Resource").with_child(content);

        let text = write(&root, 2).unwrap();

        assert_eq!(parse(&text).unwrap(), root);
    }
}
