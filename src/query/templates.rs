//! XQuery templates for bounded header projections
//!
//! A header projection copies a node's attributes, the common header children,
//! and a fixed per-kind set of child categories. Nested objects of the same kind
//! are never part of a projection, so a query stays bounded no matter how deep
//! the remote hierarchy is.

/// Version of [`CATEGORY_TABLE`]. Bump whenever a row changes.
pub const CATEGORY_TABLE_VERSION: u32 = 1;

/// Root element of every AutomationML document
pub const ROOT_TAG: &str = "CAEXFile";

/// Element wrapping the results of an iterative projection
pub const CONTAINER_TAG: &str = "XElements";

/// Children projected for every tag kind
pub const HEADER_CATEGORIES: &[&str] = &[
    "Description",
    "Version",
    "Revision",
    "Copyright",
    "SourceObjectInformation",
    "AdditionalInformation",
];

/// Children projected for the document root in addition to its attributes
pub const ROOT_HEADER_CATEGORIES: &[&str] = &[
    "Description",
    "Version",
    "Revision",
    "Copyright",
    "SourceObjectInformation",
    "AdditionalInformation",
    "SuperiorStandardVersion",
    "SourceDocumentInformation",
    "ExternalReference",
];

/// Tag kind -> extra child categories. Unlisted kinds project the header only.
pub const CATEGORY_TABLE: &[(&str, &[&str])] = &[
    (
        "InternalElement",
        &[
            "Attribute",
            "ExternalInterface",
            "SupportedRoleClass",
            "InternalLink",
            "RoleRequirements",
        ],
    ),
    (
        "SystemUnitClass",
        &[
            "Attribute",
            "ExternalInterface",
            "SupportedRoleClass",
            "InternalLink",
        ],
    ),
    ("InterfaceClass", &["Attribute", "ExternalInterface"]),
    ("RoleClass", &["Attribute", "ExternalInterface"]),
    ("AttributeType", &["Attribute"]),
];

/// Top-level containers that always sit directly under the document root
pub const TOP_LEVEL_CONTAINERS: &[&str] = &[
    "InstanceHierarchy",
    "InterfaceClassLib",
    "RoleClassLib",
    "SystemUnitClassLib",
    "AttributeTypeLib",
    "ExternalReference",
];

/// Per-kind categories for `tag`; empty for unlisted kinds.
pub fn categories_for(tag: &str) -> &'static [&'static str] {
    CATEGORY_TABLE
        .iter()
        .find(|(kind, _)| *kind == tag)
        .map(|(_, categories)| *categories)
        .unwrap_or(&[])
}

/// Fixed path used instead of a computed one when `tag` is a top-level container.
pub fn canonical_path(tag: &str) -> Option<String> {
    TOP_LEVEL_CONTAINERS
        .contains(&tag)
        .then(|| format!("/{}", ROOT_TAG))
}

/// Projection of one `$objectNode` as an element named `tag`.
pub fn build_header_projection(tag: &str) -> String {
    let mut query = format!(" return <{tag}> {{$objectNode/@*}}");
    for category in HEADER_CATEGORIES.iter().chain(categories_for(tag)) {
        query.push_str(&format!(" {{$objectNode/{category}}}"));
    }
    query.push_str(&format!(" </{tag}>"));
    query
}

/// Every immediate `tag` child under `path`, each as a header projection, wrapped
/// in one [`CONTAINER_TAG`] element that is present even when nothing matches.
pub fn build_iterative_projection(
    store_name: &str,
    resource_name: &str,
    path: &str,
    tag: &str,
) -> String {
    format!(
        "let $root:=doc({doc}){path} return <{container}> {{ for $objectNode in $root/{tag}{header} }} </{container}>",
        doc = document_literal(store_name, resource_name),
        container = CONTAINER_TAG,
        header = build_header_projection(tag),
    )
}

/// Header projection of the document root.
pub fn build_root_header_projection(store_name: &str, resource_name: &str) -> String {
    let mut query = format!(
        "let $objectNode:=doc({})/{root} return <{root}> {{$objectNode/@*}}",
        document_literal(store_name, resource_name),
        root = ROOT_TAG,
    );
    for category in ROOT_HEADER_CATEGORIES {
        query.push_str(&format!(" {{$objectNode/{category}}}"));
    }
    query.push_str(&format!(" </{ROOT_TAG}>"));
    query
}

/// The whole document, unprojected.
pub fn build_document_query(store_name: &str, resource_name: &str) -> String {
    format!("doc({})", document_literal(store_name, resource_name))
}

/// `'store/resource'` as an XQuery string literal.
fn document_literal(store_name: &str, resource_name: &str) -> String {
    format!(
        "'{}/{}'",
        store_name.replace('\'', "''"),
        resource_name.replace('\'', "''")
    )
}

/// Child categories referenced by a generated query, in order of appearance.
pub fn referenced_categories(query: &str) -> Vec<&str> {
    query
        .split("{$objectNode/")
        .skip(1)
        .filter_map(|rest| rest.split('}').next())
        .filter(|category| *category != "@*")
        .collect()
}
