//! Query Template Builder
//!
//! Pure string builders for the queries and request bodies sent to the store.

pub mod request;
pub mod templates;

pub use request::{normalize_query_text, query_request_body, script_request_body, QUERY_CONTENT_TYPE};
pub use templates::{
    build_document_query, build_header_projection, build_iterative_projection,
    build_root_header_projection, canonical_path, categories_for, CATEGORY_TABLE_VERSION,
    CONTAINER_TAG, ROOT_TAG,
};
