use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use super::{Attribute, RawElement, RawNode, XmlError};

/// Parses XML text into its root element.
///
/// The declaration, comments, processing instructions and whitespace-only
/// text are dropped. Text and CDATA sections become [`RawNode::Text`] with
/// their surrounding whitespace intact.
///
/// # Errors
///
/// Returns an error if the text is not well-formed XML or does not contain
/// exactly one root element.
pub fn parse(text: &str) -> Result<RawElement, XmlError> {
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<RawElement> = Vec::new();
    let mut root: Option<RawElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open(&start)?),
            Event::Empty(start) => {
                let element = open(&start)?;
                close(element, &mut stack, &mut root)?;
            }
            Event::End(end) => {
                let found = std::str::from_utf8(end.name().as_ref())?.to_string();
                let element = stack.pop().ok_or_else(|| XmlError::MismatchedTag {
                    expected: String::new(),
                    found: found.clone(),
                })?;
                if element.name != found {
                    return Err(XmlError::MismatchedTag {
                        expected: element.name,
                        found,
                    });
                }
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let data = data.into_inner();
                push_text(&mut stack, std::str::from_utf8(&data)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnclosedElement(open.name));
    }
    root.ok_or(XmlError::MissingRoot)
}

fn open(start: &BytesStart<'_>) -> Result<RawElement, XmlError> {
    let mut element = RawElement::new(std::str::from_utf8(start.name().as_ref())?);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let name = std::str::from_utf8(attribute.key.as_ref())?;
        let value = attribute.unescape_value()?;
        element.attributes.push(Attribute::new(name, value));
    }
    Ok(element)
}

fn close(
    element: RawElement,
    stack: &mut [RawElement],
    root: &mut Option<RawElement>,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(RawNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(XmlError::MultipleRoots(element.name));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [RawElement], text: &str) {
    if text.trim().is_empty() {
        return;
    }
    // Text outside the root element is not part of the tree.
    if let Some(parent) = stack.last_mut() {
        parent.children.push(RawNode::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_attributes() {
        let root = parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <!-- comment -->
            <stmd:SimulationTaskMetaData version="1.0" name="demo">
                <stc:Resource kind="model" id="r&amp;1"/>
                <stc:Content>plain &lt;text&gt;</stc:Content>
            </stmd:SimulationTaskMetaData>"#,
        )
        .unwrap();

        assert_eq!(root.name, "stmd:SimulationTaskMetaData");
        assert_eq!(root.attribute("name"), Some("demo"));

        let resource = root.children_named("stc:Resource").next().unwrap();
        assert_eq!(resource.attribute("id"), Some("r&1"));

        let content = root.child("stc:Content").unwrap();
        assert_eq!(
            content.children,
            vec![RawNode::Text("plain <text>".to_string())]
        );
    }

    #[test]
    fn mixed_content_keeps_whitespace() {
        let root = parse("<c>hello <b>x</b> world</c>").unwrap();
        let mut bold = RawElement::new("b");
        bold.children.push(RawNode::Text("x".to_string()));
        assert_eq!(
            root.children,
            vec![
                RawNode::Text("hello ".to_string()),
                RawNode::Element(bold),
                RawNode::Text(" world".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_between_elements_is_dropped() {
        let root = parse("<a>\n  <b/>\n</a>").unwrap();
        assert_eq!(root.children, vec![RawNode::Element(RawElement::new("b"))]);
    }

    #[test]
    fn cdata_becomes_text() {
        let root = parse("<a><![CDATA[x < y]]></a>").unwrap();
        assert_eq!(root.children, vec![RawNode::Text("x < y".to_string())]);
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(parse(""), Err(XmlError::MissingRoot)));
    }

    #[test]
    fn second_root_is_rejected() {
        match parse("<a/><b/>") {
            Err(XmlError::MultipleRoots(name)) => assert_eq!(name, "b"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn unclosed_element_is_rejected() {
        assert!(parse("<a><b></b>").is_err());
    }

    #[test]
    fn mismatched_tag_is_rejected() {
        assert!(parse("<a><b></a></b>").is_err());
    }
}
