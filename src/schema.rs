//! Schema policy
//!
//! Decides which child tags are structurally legal under a parent tag, and in
//! which order children of different tags appear. The projection engine never
//! fetches a child tag the schema does not allow.

/// Structural rules for parent/child tag combinations.
pub trait SchemaPolicy: Send + Sync {
    /// Whether `child_tag` may appear directly under `parent_tag`.
    fn allows_child(&self, parent_tag: &str, child_tag: &str) -> bool;

    /// Rank of `child_tag` among the children of `parent_tag`. Children are kept
    /// sorted by rank; `None` when the combination is not allowed.
    fn child_rank(&self, parent_tag: &str, child_tag: &str) -> Option<usize>;
}

/// Header children shared by every CAEX object
const HEADER: &[&str] = &[
    "Description",
    "Version",
    "Revision",
    "Copyright",
    "SourceObjectInformation",
    "AdditionalInformation",
];

/// Content model of each CAEX parent tag after its header, in document order
const CONTENT_MODEL: &[(&str, &[&str])] = &[
    (
        "CAEXFile",
        &[
            "SuperiorStandardVersion",
            "SourceDocumentInformation",
            "ExternalReference",
            "InstanceHierarchy",
            "InterfaceClassLib",
            "RoleClassLib",
            "SystemUnitClassLib",
            "AttributeTypeLib",
        ],
    ),
    ("InstanceHierarchy", &["InternalElement"]),
    (
        "InternalElement",
        &[
            "Attribute",
            "ExternalInterface",
            "InternalElement",
            "SupportedRoleClass",
            "InternalLink",
            "RoleRequirements",
            "MappingObject",
        ],
    ),
    ("SystemUnitClassLib", &["SystemUnitClass"]),
    (
        "SystemUnitClass",
        &[
            "Attribute",
            "ExternalInterface",
            "InternalElement",
            "SupportedRoleClass",
            "InternalLink",
            "SystemUnitClass",
        ],
    ),
    ("RoleClassLib", &["RoleClass"]),
    ("RoleClass", &["Attribute", "ExternalInterface", "RoleClass"]),
    ("InterfaceClassLib", &["InterfaceClass"]),
    ("InterfaceClass", &["Attribute", "ExternalInterface", "InterfaceClass"]),
    ("AttributeTypeLib", &["AttributeType"]),
    (
        "AttributeType",
        &[
            "DefaultValue",
            "Value",
            "RefSemantic",
            "Constraint",
            "Attribute",
            "AttributeType",
        ],
    ),
    (
        "Attribute",
        &["DefaultValue", "Value", "RefSemantic", "Constraint", "Attribute"],
    ),
    ("ExternalInterface", &["Attribute", "ExternalInterface"]),
    ("RoleRequirements", &["Attribute", "ExternalInterface"]),
];

/// CAEX 3.0 content model
#[derive(Debug, Clone, Copy, Default)]
pub struct CaexSchema;

impl CaexSchema {
    pub fn new() -> Self {
        CaexSchema
    }

    fn content(parent_tag: &str) -> Option<&'static [&'static str]> {
        CONTENT_MODEL
            .iter()
            .find(|(tag, _)| *tag == parent_tag)
            .map(|(_, children)| *children)
    }
}

impl SchemaPolicy for CaexSchema {
    fn allows_child(&self, parent_tag: &str, child_tag: &str) -> bool {
        self.child_rank(parent_tag, child_tag).is_some()
    }

    fn child_rank(&self, parent_tag: &str, child_tag: &str) -> Option<usize> {
        let content = Self::content(parent_tag)?;
        HEADER
            .iter()
            .chain(content)
            .position(|tag| *tag == child_tag)
    }
}
