//! CAEX domain objects
//!
//! Fetched elements are promoted to a [`CaexObject`] before they are merged.
//! The kind is resolved from the tag name once, through a static table.

use crate::tree::Element;
use std::fmt;

/// Document-wide object identifier attribute
pub const ID_ATTRIBUTE: &str = "ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaexKind {
    CaexFile,
    ExternalReference,
    InstanceHierarchy,
    InternalElement,
    SystemUnitClassLib,
    SystemUnitClass,
    RoleClassLib,
    RoleClass,
    InterfaceClassLib,
    InterfaceClass,
    AttributeTypeLib,
    AttributeType,
    Attribute,
    ExternalInterface,
    SupportedRoleClass,
    RoleRequirements,
    InternalLink,
    MappingObject,
}

/// Tag name -> kind, and the attribute that identifies an object among its siblings.
///
/// Kinds keyed on `ID` may repeat a `Name` among siblings.
const KINDS: &[(&str, CaexKind, Option<&str>)] = &[
    ("CAEXFile", CaexKind::CaexFile, Some("FileName")),
    ("ExternalReference", CaexKind::ExternalReference, Some("Alias")),
    ("InstanceHierarchy", CaexKind::InstanceHierarchy, Some("Name")),
    ("InternalElement", CaexKind::InternalElement, Some(ID_ATTRIBUTE)),
    ("SystemUnitClassLib", CaexKind::SystemUnitClassLib, Some("Name")),
    ("SystemUnitClass", CaexKind::SystemUnitClass, Some("Name")),
    ("RoleClassLib", CaexKind::RoleClassLib, Some("Name")),
    ("RoleClass", CaexKind::RoleClass, Some("Name")),
    ("InterfaceClassLib", CaexKind::InterfaceClassLib, Some("Name")),
    ("InterfaceClass", CaexKind::InterfaceClass, Some("Name")),
    ("AttributeTypeLib", CaexKind::AttributeTypeLib, Some("Name")),
    ("AttributeType", CaexKind::AttributeType, Some("Name")),
    ("Attribute", CaexKind::Attribute, Some("Name")),
    ("ExternalInterface", CaexKind::ExternalInterface, Some(ID_ATTRIBUTE)),
    ("SupportedRoleClass", CaexKind::SupportedRoleClass, Some("RefRoleClassPath")),
    ("RoleRequirements", CaexKind::RoleRequirements, Some("RefBaseRoleClassPath")),
    ("InternalLink", CaexKind::InternalLink, Some(ID_ATTRIBUTE)),
    ("MappingObject", CaexKind::MappingObject, None),
];

impl CaexKind {
    pub fn from_tag(tag: &str) -> Option<CaexKind> {
        KINDS
            .iter()
            .find(|(name, _, _)| *name == tag)
            .map(|(_, kind, _)| *kind)
    }

    pub fn tag(self) -> &'static str {
        KINDS
            .iter()
            .find(|(_, kind, _)| *kind == self)
            .map(|(name, _, _)| *name)
            .unwrap_or_default()
    }

    /// Attribute that must be unique among same-kind siblings, if any.
    pub fn identity_attribute(self) -> Option<&'static str> {
        KINDS
            .iter()
            .find(|(_, kind, _)| *kind == self)
            .and_then(|(_, _, key)| *key)
    }
}

impl fmt::Display for CaexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A fetched element promoted to its CAEX kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaexObject {
    pub kind: CaexKind,
    pub element: Element,
}

impl CaexObject {
    /// Promote `element`; `None` for tags that are not CAEX objects.
    pub fn wrap(element: Element) -> Option<CaexObject> {
        let kind = CaexKind::from_tag(&element.name)?;
        Some(CaexObject { kind, element })
    }

    /// Value of the identity attribute, when the kind has one and it is set.
    pub fn identity(&self) -> Option<&str> {
        self.kind
            .identity_attribute()
            .and_then(|key| self.element.attribute(key))
    }

    pub fn into_element(self) -> Element {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_row_round_trips() {
        for (tag, kind, _) in KINDS {
            assert_eq!(CaexKind::from_tag(tag), Some(*kind));
            assert_eq!(kind.tag(), *tag);
        }
    }

    #[test]
    fn header_elements_are_not_objects() {
        assert!(CaexObject::wrap(Element::new("Description")).is_none());
        assert!(CaexObject::wrap(Element::new("Version")).is_none());
    }

    #[test]
    fn identity_uses_kind_specific_attribute() {
        let lib = CaexObject::wrap(Element::new("RoleClassLib").with_attribute("Name", "Base")).unwrap();
        assert_eq!(lib.kind, CaexKind::RoleClassLib);
        assert_eq!(lib.identity(), Some("Base"));

        let src = CaexObject::wrap(
            Element::new("SupportedRoleClass").with_attribute("RefRoleClassPath", "Lib/Role"),
        )
        .unwrap();
        assert_eq!(src.identity(), Some("Lib/Role"));

        let mapping = CaexObject::wrap(Element::new("MappingObject")).unwrap();
        assert_eq!(mapping.identity(), None);
    }

    #[test]
    fn internal_elements_are_identified_by_id() {
        let robot = CaexObject::wrap(
            Element::new("InternalElement")
                .with_attribute("Name", "Robot")
                .with_attribute("ID", "r1"),
        )
        .unwrap();
        assert_eq!(robot.identity(), Some("r1"));

        let unnamed = CaexObject::wrap(Element::new("InternalElement").with_attribute("Name", "Robot")).unwrap();
        assert_eq!(unnamed.identity(), None);
    }
}
