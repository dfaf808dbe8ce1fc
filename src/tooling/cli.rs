//! CLI Tooling
//!
//! Command-line front end over [`DatabaseService`]: catalog listings, header
//! loads and single lazy child fetches.

use crate::catalog::{ResourceDescriptor, StoreDescriptor};
use crate::config::{AmlStoreConfig, ConfigLoader};
use crate::engine::Fetched;
use crate::error::ApiError;
use crate::executor::RestExecutor;
use crate::service::DatabaseService;
use crate::tree::write::{element_to_xml, node_to_xml};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// AmlStore CLI - lazy access to AutomationML documents in a BaseX store
#[derive(Parser)]
#[command(name = "amlstore")]
#[command(about = "Browse AutomationML documents held in a BaseX REST store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// REST root address (overrides configuration)
    #[arg(long)]
    pub address: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the stores (databases) on the server
    Stores {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List the XML resources of one store
    Resources {
        store: String,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Load the header-only shell of a document and print it
    Header { store: String, resource: String },
    /// Load the header of a document and fetch one child tag under its root
    Children {
        store: String,
        resource: String,
        tag: String,
        /// Merge the fetched children into the loaded tree
        #[arg(long)]
        merge: bool,
    },
    /// Run raw query text against a store and print the result
    Query { store: String, text: String },
}

impl Cli {
    /// Resolve configuration, then apply command-line overrides.
    pub fn load_config(&self) -> Result<AmlStoreConfig, ApiError> {
        let mut config = ConfigLoader::load(self.config.as_deref())?;
        if let Some(address) = &self.address {
            config.server.address = address.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        Ok(config)
    }
}

/// Connected service plus the commands that run against it
pub struct CliContext {
    service: DatabaseService,
}

impl CliContext {
    pub fn connect(config: &AmlStoreConfig) -> Result<Self, ApiError> {
        let executor = RestExecutor::new(&config.server)?;
        info!(address = executor.base_url(), "Using store");
        Ok(Self {
            service: DatabaseService::new(Arc::new(executor)),
        })
    }

    pub fn from_service(service: DatabaseService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &DatabaseService {
        &self.service
    }

    /// Execute a CLI command. Store failures end up in [`DatabaseService::error_message`].
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Stores { format } => {
                let stores = self.service.list_stores().await;
                format_stores(&stores, format)
            }
            Commands::Resources { store, format } => {
                let resources = self.service.list_resources(store).await?;
                format_resources(&resources, format)
            }
            Commands::Header { store, resource } => {
                match self.service.load_document_header(store, resource).await? {
                    Some(tree) => {
                        let doc = tree.read();
                        Ok(node_to_xml(&doc, doc.root()))
                    }
                    None => Ok(String::new()),
                }
            }
            Commands::Children {
                store,
                resource,
                tag,
                merge,
            } => {
                let Some(tree) = self.service.load_document_header(store, resource).await? else {
                    return Ok(String::new());
                };
                let root = tree.read().root();
                let fetched = self.service.fetch_children(&tree, root, tag, *merge).await?;
                let doc = tree.read();
                let mut out = String::new();
                match &fetched {
                    Fetched::Attached(ids) => {
                        for id in ids {
                            out.push_str(&node_to_xml(&doc, *id));
                        }
                    }
                    Fetched::Detached(elements) => {
                        for element in elements {
                            out.push_str(&element_to_xml(element));
                        }
                    }
                }
                Ok(out)
            }
            Commands::Query { store, text } => self.service.run_query(store, text).await,
        }
    }
}

fn format_stores(stores: &[StoreDescriptor], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(stores);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Store", "Resources", "Size (bytes)"]);
    for store in stores {
        table.add_row(vec![
            store.name.clone(),
            store.resource_count.to_string(),
            store.total_size_bytes.to_string(),
        ]);
    }
    Ok(table.to_string())
}

fn format_resources(resources: &[ResourceDescriptor], format: &str) -> Result<String, ApiError> {
    if format == "json" {
        return to_json(resources);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Resource", "Size (bytes)"]);
    for resource in resources {
        table.add_row(vec![resource.resource_name.clone(), resource.size_bytes.to_string()]);
    }
    Ok(table.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::InvalidArgument(format!("Cannot render JSON: {}", e)))
}
