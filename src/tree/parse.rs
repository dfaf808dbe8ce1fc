//! XML text to [`Element`] conversion

use super::node::{Document, Element};
use crate::error::ParseError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse a single-rooted XML text into a detached element.
///
/// Declarations, comments and processing instructions are skipped. Whitespace-only
/// text is dropped.
pub fn parse_element(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(open_element(&start, position)?),
            Ok(Event::Empty(start)) => {
                let element = open_element(&start, position)?;
                close_element(&mut stack, &mut root, element, position)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| malformed(position, "unmatched end tag"))?;
                close_element(&mut stack, &mut root, element, position)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(top) = stack.last_mut() {
                    let value = text
                        .unescape()
                        .map_err(|e| malformed(position, e.to_string()))?;
                    append_text(top, &value);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(top) = stack.last_mut() {
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    append_text(top, &value);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(position, e.to_string())),
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(
            reader.buffer_position() as u64,
            format!("unclosed element <{}>", open.name),
        ));
    }
    root.ok_or(ParseError::Empty)
}

/// Parse XML text into a document arena.
pub fn parse_document(xml: &str) -> Result<Document, ParseError> {
    parse_element(xml).map(Document::from_element)
}

fn open_element(start: &BytesStart<'_>, position: u64) -> Result<Element, ParseError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(position, e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(position, e.to_string()))?
            .into_owned();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

fn close_element(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
    position: u64,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(malformed(position, "multiple root elements")),
    }
}

fn append_text(element: &mut Element, value: &str) {
    match element.text.as_mut() {
        Some(existing) => existing.push_str(value),
        None => element.text = Some(value.to_string()),
    }
}

fn malformed(position: u64, message: impl Into<String>) -> ParseError {
    ParseError::Malformed {
        position,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_attributes_and_text() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <CAEXFile FileName="Lib.aml" SchemaVersion="3.0">
              <Description>Role &amp; interface library</Description>
              <RoleClassLib Name="AutomationMLBaseRoleClassLib">
                <RoleClass Name="AutomationMLBaseRole"/>
              </RoleClassLib>
            </CAEXFile>"#;
        let root = parse_element(xml).unwrap();
        assert_eq!(root.name, "CAEXFile");
        assert_eq!(root.attribute("FileName"), Some("Lib.aml"));
        let keys: Vec<_> = root.attributes.keys().cloned().collect();
        assert_eq!(keys, vec!["FileName", "SchemaVersion"]);

        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].text.as_deref(), Some("Role & interface library"));
        let lib = &root.children[1];
        assert_eq!(lib.object_name(), Some("AutomationMLBaseRoleClassLib"));
        assert_eq!(lib.children[0].name, "RoleClass");
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_element(""), Err(ParseError::Empty));
        assert_eq!(parse_element("   "), Err(ParseError::Empty));
    }

    #[test]
    fn unbalanced_input_is_malformed() {
        assert!(matches!(
            parse_element("<a><b></a>"),
            Err(ParseError::Malformed { .. })
        ));
        assert!(matches!(
            parse_element("<a><b>"),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn second_root_is_malformed() {
        assert!(matches!(
            parse_element("<a/><b/>"),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn cdata_becomes_text() {
        let root = parse_element("<Value><![CDATA[a < b]]></Value>").unwrap();
        assert_eq!(root.text.as_deref(), Some("a < b"));
    }
}
