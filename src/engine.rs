//! Tree Projection Engine
//!
//! Fetches missing children of a local node from the remote store, one bounded
//! projection per `(parent, tag)` pair, and optionally merges them into the tree.
//!
//! Steps of [`ProjectionEngine::fetch_children`]:
//! cache check, origin lookup, schema check, path computation, query build,
//! execution, parse, merge. Only the merge step takes the tree's write lock.

use crate::error::{ApiError, LastError, ParseError};
use crate::executor::QueryExecutor;
use crate::origin::OriginRegistry;
use crate::query::{build_iterative_projection, canonical_path, CONTAINER_TAG};
use crate::reconcile::{reconcile, StructuralInsert};
use crate::schema::SchemaPolicy;
use crate::tree::{parse_element, Document, Element, LocalTree, StructuralPath};
use crate::types::NodeId;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Children returned by [`ProjectionEngine::fetch_children`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched {
    /// Children that live in the tree, in tree order.
    Attached(Vec<NodeId>),
    /// Projected elements that were not merged into the tree.
    Detached(Vec<Element>),
}

impl Fetched {
    pub fn empty() -> Self {
        Fetched::Detached(Vec::new())
    }

    pub fn len(&self) -> usize {
        match self {
            Fetched::Attached(ids) => ids.len(),
            Fetched::Detached(elements) => elements.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_attached(&self) -> bool {
        matches!(self, Fetched::Attached(_))
    }

    /// Uniform element view; attached children are copied out of `doc`.
    pub fn to_elements(&self, doc: &Document) -> Vec<Element> {
        match self {
            Fetched::Attached(ids) => ids.iter().filter_map(|id| doc.to_element(*id)).collect(),
            Fetched::Detached(elements) => elements.clone(),
        }
    }
}

/// Lazy-materialization engine
///
/// Holds no session state of its own; everything it knows comes from the origin
/// registry and the tree passed to each call.
pub struct ProjectionEngine {
    executor: Arc<dyn QueryExecutor>,
    origins: Arc<OriginRegistry>,
    schema: Arc<dyn SchemaPolicy>,
    inserter: Arc<dyn StructuralInsert>,
    last_error: Arc<LastError>,
}

impl ProjectionEngine {
    pub fn new(
        executor: Arc<dyn QueryExecutor>,
        origins: Arc<OriginRegistry>,
        schema: Arc<dyn SchemaPolicy>,
        inserter: Arc<dyn StructuralInsert>,
        last_error: Arc<LastError>,
    ) -> Self {
        Self {
            executor,
            origins,
            schema,
            inserter,
            last_error,
        }
    }

    pub fn last_error(&self) -> String {
        self.last_error.message()
    }

    /// Children named `tag` under `parent`, fetched from the store when none are held locally.
    ///
    /// Once any `tag` child exists under `parent`, the local set is treated as complete
    /// and the store is not consulted again for that pair, even if more exist remotely.
    ///
    /// Store failures yield an empty result and are recorded as the last error. Only an
    /// empty `tag` or a `parent` outside the tree return `Err`.
    pub async fn fetch_children(
        &self,
        tree: &LocalTree,
        parent: NodeId,
        tag: &str,
        merge: bool,
    ) -> Result<Fetched, ApiError> {
        if tag.trim().is_empty() {
            return Err(ApiError::InvalidArgument("tag must not be empty".to_string()));
        }

        let (resource, path) = {
            let doc = tree.read();
            let parent_tag = doc
                .tag(parent)
                .ok_or(ApiError::NodeNotFound(parent))?
                .to_string();

            let existing = doc.children_named(parent, tag);
            if !existing.is_empty() {
                debug!(tree = %tree.id(), parent, tag, count = existing.len(), "Children already held locally");
                return Ok(Fetched::Attached(existing));
            }

            let Some(resource) = self.origins.lookup(tree.id()) else {
                debug!(tree = %tree.id(), tag, "Tree has no origin; nothing to fetch");
                return Ok(Fetched::empty());
            };

            if !self.schema.allows_child(&parent_tag, tag) {
                debug!(parent_tag = %parent_tag, tag, "Schema does not allow child tag");
                return Ok(Fetched::empty());
            }

            let path = match canonical_path(tag) {
                Some(path) => path,
                None => StructuralPath::to_node(&doc, parent)
                    .ok_or(ApiError::NodeNotFound(parent))?
                    .to_string(),
            };
            (resource, path)
        };

        let query = build_iterative_projection(&resource.store_name, &resource.resource_name, &path, tag);
        info!(
            store = %resource.store_name,
            resource = %resource.resource_name,
            path = %path,
            tag,
            "Fetching children"
        );

        let response = match self.executor.query(&resource.store_name, &query).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, tag, "Child projection failed");
                self.last_error.record(e.to_string());
                return Ok(Fetched::empty());
            }
        };

        let elements = match parse_container(&response) {
            Ok(elements) => elements,
            Err(e) => {
                warn!(error = %e, tag, "Child projection response unusable");
                self.last_error.record(e.to_string());
                return Ok(Fetched::empty());
            }
        };

        if !merge || elements.is_empty() {
            return Ok(Fetched::Detached(elements));
        }

        let mut doc = tree.write();
        // A concurrent fetch may have merged this pair while we were waiting.
        let existing = doc.children_named(parent, tag);
        if !existing.is_empty() {
            return Ok(Fetched::Attached(existing));
        }

        let outcome = reconcile(self.inserter.as_ref(), &mut doc, parent, &elements);
        debug!(tag, inserted = outcome.inserted, rejected = outcome.rejected, "Merged projection");
        if outcome.succeeded() {
            Ok(Fetched::Attached(doc.children_named(parent, tag)))
        } else {
            Ok(Fetched::Detached(elements))
        }
    }
}

/// Children of the projection container element.
fn parse_container(response: &str) -> Result<Vec<Element>, ParseError> {
    let container = parse_element(response)?;
    if container.name != CONTAINER_TAG {
        return Err(ParseError::UnexpectedRoot {
            expected: CONTAINER_TAG.to_string(),
            found: container.name,
        });
    }
    Ok(container.children)
}
