//! Catalog Models
//!
//! Facts about the databases and documents of a remote store, parsed from the
//! BaseX REST catalog listings.

use crate::error::ParseError;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use serde::{Deserialize, Serialize};

/// Namespace of the REST catalog listings
pub const REST_NAMESPACE: &str = "http://basex.org/rest";

/// The only resource type recognized as a loadable document
pub const XML_RESOURCE_TYPE: &str = "xml";

/// One database of the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDescriptor {
    pub name: String,
    pub resource_count: i32,
    pub total_size_bytes: i64,
}

/// One remote document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub store_name: String,
    pub resource_name: String,
    pub size_bytes: i64,
}

impl ResourceDescriptor {
    /// Descriptor for a resource addressed by name only; size unknown.
    pub fn named(store_name: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            resource_name: resource_name.into(),
            size_bytes: 0,
        }
    }

    pub fn matches(&self, store_name: &str, resource_name: &str) -> bool {
        self.store_name == store_name && self.resource_name == resource_name
    }
}

/// Parse the store-root listing into its `database` entries.
///
/// Unparseable `size` or `resources` attributes fall back to zero.
pub fn parse_store_list(xml: &str) -> Result<Vec<StoreDescriptor>, ParseError> {
    let entries = rest_entries(xml, "database")?;
    Ok(entries
        .into_iter()
        .map(|entry| StoreDescriptor {
            resource_count: entry.attr("resources").and_then(|v| v.parse().ok()).unwrap_or(0),
            total_size_bytes: entry.attr("size").and_then(|v| v.parse().ok()).unwrap_or(0),
            name: entry.text,
        })
        .collect())
}

/// Parse a per-store listing, keeping only XML resources.
pub fn parse_resource_list(store_name: &str, xml: &str) -> Result<Vec<ResourceDescriptor>, ParseError> {
    let entries = rest_entries(xml, "resource")?;
    Ok(entries
        .into_iter()
        .filter(|entry| entry.attr("type") == Some(XML_RESOURCE_TYPE))
        .map(|entry| ResourceDescriptor {
            store_name: store_name.to_string(),
            size_bytes: entry.attr("size").and_then(|v| v.parse().ok()).unwrap_or(0),
            resource_name: entry.text,
        })
        .collect())
}

struct RestEntry {
    attributes: Vec<(String, String)>,
    text: String,
}

impl RestEntry {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Collect every element named `local_name` in the REST namespace, at any depth.
fn rest_entries(xml: &str, local_name: &str) -> Result<Vec<RestEntry>, ParseError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut seen_root = false;
    let mut depth = 0usize;
    loop {
        let position = reader.buffer_position() as u64;
        let (resolved, event) = reader
            .read_resolved_event()
            .map_err(|e| malformed(position, e.to_string()))?;
        match event {
            Event::Start(start) => {
                seen_root = true;
                if is_rest_element(&resolved, &start, local_name) {
                    let attributes = read_attributes(&start, position)?;
                    let raw = reader
                        .read_text(start.name())
                        .map_err(|e| malformed(position, e.to_string()))?;
                    let text = unescape(&raw)
                        .map_err(|e| malformed(position, e.to_string()))?
                        .trim()
                        .to_string();
                    entries.push(RestEntry { attributes, text });
                } else {
                    depth += 1;
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(start) => {
                seen_root = true;
                if is_rest_element(&resolved, &start, local_name) {
                    let attributes = read_attributes(&start, position)?;
                    entries.push(RestEntry {
                        attributes,
                        text: String::new(),
                    });
                }
            }
            Event::Eof => {
                if depth > 0 {
                    return Err(malformed(position, "unclosed element".to_string()));
                }
                break;
            }
            _ => {}
        }
    }

    if !seen_root {
        return Err(ParseError::Empty);
    }
    Ok(entries)
}

fn is_rest_element(resolved: &ResolveResult<'_>, start: &BytesStart<'_>, local_name: &str) -> bool {
    matches!(resolved, ResolveResult::Bound(Namespace(ns)) if *ns == REST_NAMESPACE.as_bytes())
        && start.local_name().as_ref() == local_name.as_bytes()
}

fn read_attributes(start: &BytesStart<'_>, position: u64) -> Result<Vec<(String, String)>, ParseError> {
    start
        .attributes()
        .map(|attr| {
            let attr = attr.map_err(|e| malformed(position, e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| malformed(position, e.to_string()))?
                .into_owned();
            Ok((key, value))
        })
        .collect()
}

fn malformed(position: u64, message: String) -> ParseError {
    ParseError::Malformed { position, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATABASES: &str = r#"<rest:databases xmlns:rest="http://basex.org/rest">
  <rest:database resources="3" size="412345">AutomationML</rest:database>
  <rest:database resources="1" size="not-a-number">Scratch</rest:database>
</rest:databases>"#;

    const RESOURCES: &str = r#"<rest:database xmlns:rest="http://basex.org/rest" name="AutomationML" resources="3">
  <rest:resource type="xml" content-type="application/xml" size="1024">Lib.aml</rest:resource>
  <rest:resource type="binary" content-type="image/png" size="99">logo.png</rest:resource>
  <rest:resource type="xml" content-type="application/xml" size="2048">Plant.aml</rest:resource>
</rest:database>"#;

    #[test]
    fn parses_databases_from_rest_namespace() {
        let stores = parse_store_list(DATABASES).unwrap();
        assert_eq!(
            stores,
            vec![
                StoreDescriptor {
                    name: "AutomationML".to_string(),
                    resource_count: 3,
                    total_size_bytes: 412345,
                },
                StoreDescriptor {
                    name: "Scratch".to_string(),
                    resource_count: 1,
                    total_size_bytes: 0,
                },
            ]
        );
    }

    #[test]
    fn ignores_elements_outside_rest_namespace() {
        let xml = r#"<databases><database resources="1" size="1">Other</database></databases>"#;
        assert!(parse_store_list(xml).unwrap().is_empty());
    }

    #[test]
    fn keeps_only_xml_resources() {
        let resources = parse_resource_list("AutomationML", RESOURCES).unwrap();
        let names: Vec<_> = resources.iter().map(|r| r.resource_name.as_str()).collect();
        assert_eq!(names, vec!["Lib.aml", "Plant.aml"]);
        assert_eq!(resources[0].store_name, "AutomationML");
        assert_eq!(resources[1].size_bytes, 2048);
    }

    #[test]
    fn truncated_listing_is_an_error() {
        let truncated = r#"<rest:databases xmlns:rest="http://basex.org/rest">
  <rest:database resources="3" size="412345">AutomationML</rest:database>"#;
        assert!(matches!(
            parse_store_list(truncated),
            Err(ParseError::Malformed { .. })
        ));
    }

    #[test]
    fn empty_listing_is_an_error() {
        assert_eq!(parse_store_list(""), Err(ParseError::Empty));
    }
}
