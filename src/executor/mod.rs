//! Query Executor boundary
//!
//! The projection engine and catalog operations reach the remote store only
//! through [`QueryExecutor`]. Every call is one request/response round trip.

pub mod rest;

pub use rest::RestExecutor;

use crate::error::ExecutorError;
use async_trait::async_trait;

/// Transport to a query-capable store.
///
/// Implementations own timeouts and retries; callers treat every `Err` the same way.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Fetch the catalog listing of the store root (`None`) or of one store.
    async fn list(&self, store_name: Option<&str>) -> Result<String, ExecutorError>;

    /// Run inline query text scoped to `store_name` and return the raw result text.
    async fn query(&self, store_name: &str, query: &str) -> Result<String, ExecutorError>;
}
