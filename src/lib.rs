//! AmlStore: Lazy AutomationML Documents over a BaseX Store
//!
//! Holds partially loaded AutomationML trees whose full content lives in a remote
//! query-capable store, and fetches missing subtrees on demand as bounded header
//! projections.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod executor;
pub mod logging;
pub mod origin;
pub mod query;
pub mod reconcile;
pub mod schema;
pub mod service;
pub mod tooling;
pub mod tree;
pub mod types;

pub use engine::{Fetched, ProjectionEngine};
pub use error::{ApiError, ExecutorError};
pub use service::DatabaseService;
