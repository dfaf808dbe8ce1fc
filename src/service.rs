//! Database Service
//!
//! Catalog operations against the remote store and the lifecycle of locally held
//! trees. All collaborators are injected; nothing here is process-global.

use crate::catalog::{parse_resource_list, parse_store_list, ResourceDescriptor, StoreDescriptor};
use crate::config::ServerConfig;
use crate::engine::{Fetched, ProjectionEngine};
use crate::error::{ApiError, LastError, ParseError};
use crate::executor::{QueryExecutor, RestExecutor};
use crate::origin::OriginRegistry;
use crate::query::{build_document_query, build_root_header_projection, ROOT_TAG};
use crate::reconcile::{CaexInserter, StructuralInsert};
use crate::schema::{CaexSchema, SchemaPolicy};
use crate::tree::{parse_document, Document, LocalTree};
use crate::types::NodeId;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point for catalog listing, document loading and lazy child fetches
pub struct DatabaseService {
    executor: Arc<dyn QueryExecutor>,
    origins: Arc<OriginRegistry>,
    last_error: Arc<LastError>,
    engine: ProjectionEngine,
}

impl DatabaseService {
    /// Service with the CAEX schema and inserter and a fresh origin registry.
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        let schema: Arc<dyn SchemaPolicy> = Arc::new(CaexSchema::new());
        let inserter: Arc<dyn StructuralInsert> = Arc::new(CaexInserter::new(schema.clone()));
        Self::with_components(executor, Arc::new(OriginRegistry::new()), schema, inserter)
    }

    pub fn with_components(
        executor: Arc<dyn QueryExecutor>,
        origins: Arc<OriginRegistry>,
        schema: Arc<dyn SchemaPolicy>,
        inserter: Arc<dyn StructuralInsert>,
    ) -> Self {
        let last_error = Arc::new(LastError::new());
        let engine = ProjectionEngine::new(
            executor.clone(),
            origins.clone(),
            schema,
            inserter,
            last_error.clone(),
        );
        Self {
            executor,
            origins,
            last_error,
            engine,
        }
    }

    /// Build a REST-backed service and probe the server by listing its stores.
    ///
    /// An unreachable server is not an `Err`: the store list is empty and the
    /// reason is available from [`DatabaseService::error_message`].
    pub async fn connect(config: &ServerConfig) -> Result<(Self, Vec<StoreDescriptor>), ApiError> {
        let executor = RestExecutor::new(config)?;
        info!(address = executor.base_url(), "Connecting to store");
        let service = Self::new(Arc::new(executor));
        let stores = service.list_stores().await;
        Ok((service, stores))
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn origins(&self) -> &OriginRegistry {
        &self.origins
    }

    /// Outstanding error message; empty when none.
    pub fn error_message(&self) -> String {
        self.last_error.message()
    }

    pub fn has_error(&self) -> bool {
        self.last_error.is_set()
    }

    pub async fn list_stores(&self) -> Vec<StoreDescriptor> {
        let listing = match self.executor.list(None).await {
            Ok(listing) => listing,
            Err(e) => {
                self.record(e.to_string());
                return Vec::new();
            }
        };
        match parse_store_list(&listing) {
            Ok(stores) => {
                debug!(count = stores.len(), "Listed stores");
                stores
            }
            Err(e) => {
                self.record(e.to_string());
                Vec::new()
            }
        }
    }

    /// XML resources of one store.
    pub async fn list_resources(&self, store_name: &str) -> Result<Vec<ResourceDescriptor>, ApiError> {
        require("store name", store_name)?;
        let listing = match self.executor.list(Some(store_name)).await {
            Ok(listing) => listing,
            Err(e) => {
                self.record(e.to_string());
                return Ok(Vec::new());
            }
        };
        Ok(match parse_resource_list(store_name, &listing) {
            Ok(resources) => {
                debug!(store = store_name, count = resources.len(), "Listed resources");
                resources
            }
            Err(e) => {
                self.record(e.to_string());
                Vec::new()
            }
        })
    }

    /// Load the root header of a document as a shell tree whose children are fetched lazily.
    pub async fn load_document_header(
        &self,
        store_name: &str,
        resource_name: &str,
    ) -> Result<Option<LocalTree>, ApiError> {
        require("store name", store_name)?;
        require("resource name", resource_name)?;
        let query = build_root_header_projection(store_name, resource_name);
        self.load(store_name, resource_name, &query).await
    }

    /// Load a whole document. The response size is unbounded.
    pub async fn load_document_full(
        &self,
        store_name: &str,
        resource_name: &str,
    ) -> Result<Option<LocalTree>, ApiError> {
        require("store name", store_name)?;
        require("resource name", resource_name)?;
        let query = build_document_query(store_name, resource_name);
        self.load(store_name, resource_name, &query).await
    }

    /// See [`ProjectionEngine::fetch_children`].
    pub async fn fetch_children(
        &self,
        tree: &LocalTree,
        parent: NodeId,
        tag: &str,
        merge: bool,
    ) -> Result<Fetched, ApiError> {
        self.engine.fetch_children(tree, parent, tag, merge).await
    }

    /// Run arbitrary query text; empty string on failure.
    pub async fn run_query(&self, store_name: &str, query: &str) -> Result<String, ApiError> {
        require("store name", store_name)?;
        Ok(match self.executor.query(store_name, query).await {
            Ok(result) => result,
            Err(e) => {
                self.record(e.to_string());
                String::new()
            }
        })
    }

    /// Whether a tree loaded from this resource is still tracked.
    pub fn is_loaded(&self, store_name: &str, resource_name: &str) -> bool {
        self.origins.is_resource_tracked(store_name, resource_name)
    }

    /// Forget the origin of `tree`; later fetches on it return empty.
    pub fn release(&self, tree: &LocalTree) {
        debug!(tree = %tree.id(), "Releasing tree");
        self.origins.untrack(tree.id());
    }

    pub fn shutdown(&self) {
        info!(trees = self.origins.len(), "Shutting down database service");
        self.origins.clear();
    }

    async fn load(
        &self,
        store_name: &str,
        resource_name: &str,
        query: &str,
    ) -> Result<Option<LocalTree>, ApiError> {
        let response = match self.executor.query(store_name, query).await {
            Ok(response) => response,
            Err(e) => {
                self.record(e.to_string());
                return Ok(None);
            }
        };

        let document = match parse_document(&response).and_then(check_root) {
            Ok(document) => document,
            Err(e) => {
                self.record(format!("Cannot load document from resource {}: {}", resource_name, e));
                return Ok(None);
            }
        };

        let tree = LocalTree::new(document);
        self.origins
            .track(tree.id(), ResourceDescriptor::named(store_name, resource_name));
        info!(
            tree = %tree.id(),
            store = store_name,
            resource = resource_name,
            nodes = tree.read().len(),
            "Loaded document"
        );
        Ok(Some(tree))
    }

    fn record(&self, message: String) {
        warn!(error = %message, "Store operation failed");
        self.last_error.record(message);
    }
}

fn require(what: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn check_root(document: Document) -> Result<Document, ParseError> {
    let found = document.tag(document.root()).unwrap_or_default().to_string();
    if found == ROOT_TAG {
        Ok(document)
    } else {
        Err(ParseError::UnexpectedRoot {
            expected: ROOT_TAG.to_string(),
            found,
        })
    }
}
