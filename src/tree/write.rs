//! Render elements and documents back to XML text

use super::node::{Document, Element};
use crate::types::NodeId;
use quick_xml::escape::escape;

/// Render an element as indented XML.
pub fn element_to_xml(element: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, element, 0);
    out
}

/// Render the subtree of `id` as indented XML; empty when `id` is unknown.
pub fn node_to_xml(doc: &Document, id: NodeId) -> String {
    doc.to_element(id)
        .map(|element| element_to_xml(&element))
        .unwrap_or_default()
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }

    let text = element.text.as_deref().filter(|t| !t.is_empty());
    match (text, element.children.is_empty()) {
        (None, true) => out.push_str("/>\n"),
        (Some(text), true) => {
            out.push('>');
            out.push_str(&escape(text));
            out.push_str(&format!("</{}>\n", element.name));
        }
        (text, false) => {
            out.push_str(">\n");
            if let Some(text) = text {
                out.push_str(&indent);
                out.push_str("  ");
                out.push_str(&escape(text));
                out.push('\n');
            }
            for child in &element.children {
                write_element(out, child, depth + 1);
            }
            out.push_str(&indent);
            out.push_str(&format!("</{}>\n", element.name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse_element;

    #[test]
    fn renders_escaped_attributes_and_text() {
        let element = Element::new("Attribute")
            .with_attribute("Name", "a<b")
            .with_child(Element::new("Value").with_text("x & y"));
        let xml = element_to_xml(&element);
        assert_eq!(
            xml,
            "<Attribute Name=\"a&lt;b\">\n  <Value>x &amp; y</Value>\n</Attribute>\n"
        );
        assert_eq!(parse_element(&xml).unwrap(), element);
    }
}
