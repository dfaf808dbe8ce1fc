//! Catalog listings, document loads and service lifecycle against a scripted store.

mod support;

use amlstore::config::ServerConfig;
use amlstore::error::{ApiError, ExecutorError};
use amlstore::tree::write::node_to_xml;
use amlstore::DatabaseService;
use reqwest::StatusCode;
use support::{as_executor, ScriptedExecutor, RESOURCE, STORE};

const DATABASES: &str = r#"<rest:databases xmlns:rest="http://basex.org/rest">
  <rest:database resources="2" size="8192">AutomationML</rest:database>
  <rest:database resources="0" size="0">Empty</rest:database>
</rest:databases>"#;

const RESOURCES: &str = r#"<rest:database xmlns:rest="http://basex.org/rest" name="AutomationML" resources="3">
  <rest:resource type="xml" content-type="application/xml" size="4096">Lib.aml</rest:resource>
  <rest:resource type="raw" content-type="application/zip" size="512">Lib.amlx</rest:resource>
  <rest:resource type="xml" content-type="application/xml" size="3584">Plant.aml</rest:resource>
</rest:database>"#;

const FULL_DOCUMENT: &str = r#"<CAEXFile FileName="Lib.aml" SchemaVersion="3.0">
  <RoleClassLib Name="AutomationMLBaseRoleClassLib">
    <RoleClass Name="AutomationMLBaseRole"/>
  </RoleClassLib>
</CAEXFile>"#;

#[tokio::test]
async fn stores_are_listed_with_sizes() {
    let executor = ScriptedExecutor::new();
    executor.listing(None, Ok(DATABASES.to_string()));
    let service = DatabaseService::new(as_executor(&executor));

    let stores = service.list_stores().await;
    assert_eq!(stores.len(), 2);
    assert_eq!(stores[0].name, "AutomationML");
    assert_eq!(stores[0].resource_count, 2);
    assert_eq!(stores[0].total_size_bytes, 8192);
    assert!(!service.has_error());
}

#[tokio::test]
async fn failed_store_listing_is_empty_and_recorded() {
    let executor = ScriptedExecutor::new();
    executor.listing(None, Err(ExecutorError::Status(StatusCode::UNAUTHORIZED)));
    let service = DatabaseService::new(as_executor(&executor));

    assert!(service.list_stores().await.is_empty());
    assert_eq!(service.error_message(), "401");
}

#[tokio::test]
async fn only_xml_resources_are_listed() {
    let executor = ScriptedExecutor::new();
    executor.listing(Some(STORE), Ok(RESOURCES.to_string()));
    let service = DatabaseService::new(as_executor(&executor));

    let resources = service.list_resources(STORE).await.unwrap();
    let names: Vec<_> = resources.iter().map(|r| r.resource_name.as_str()).collect();
    assert_eq!(names, vec!["Lib.aml", "Plant.aml"]);
    assert!(resources.iter().all(|r| r.store_name == STORE));
    assert_eq!(resources[0].size_bytes, 4096);
}

#[tokio::test]
async fn resource_listing_failures() {
    let executor = ScriptedExecutor::new();
    executor.listing(
        Some("Broken"),
        Ok(r#"<rest:database xmlns:rest="http://basex.org/rest"><rest:resource type="xml">A</rest:database>"#
            .to_string()),
    );
    let service = DatabaseService::new(as_executor(&executor));

    assert!(matches!(
        service.list_resources("").await,
        Err(ApiError::InvalidArgument(_))
    ));
    assert_eq!(executor.list_calls(), 0);

    assert!(service.list_resources("Missing").await.unwrap().is_empty());
    assert_eq!(service.error_message(), "404");

    assert!(service.list_resources("Broken").await.unwrap().is_empty());
    assert_ne!(service.error_message(), "404");
}

#[tokio::test]
async fn header_load_registers_a_childless_shell() {
    let executor = ScriptedExecutor::with_library();
    let service = DatabaseService::new(as_executor(&executor));
    assert!(!service.is_loaded(STORE, RESOURCE));

    let tree = service
        .load_document_header(STORE, RESOURCE)
        .await
        .unwrap()
        .expect("header loads");
    let doc = tree.read();
    let root = doc.root();
    assert_eq!(doc.tag(root), Some("CAEXFile"));
    assert_eq!(doc.node(root).unwrap().attribute("FileName"), Some("Lib.aml"));
    assert!(doc.children(root).is_empty());
    assert!(service.is_loaded(STORE, RESOURCE));
    assert_eq!(service.origins().lookup(tree.id()).unwrap().resource_name, RESOURCE);

    let queries = executor.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].0, STORE);
    assert!(queries[0].1.contains("{$objectNode/ExternalReference}"));
}

#[tokio::test]
async fn full_load_brings_the_whole_document() {
    let executor = ScriptedExecutor::new();
    executor.respond("doc('AutomationML/Lib.aml')", Ok(FULL_DOCUMENT.to_string()));
    let service = DatabaseService::new(as_executor(&executor));

    let tree = service
        .load_document_full(STORE, RESOURCE)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(executor.queries()[0].1, "doc('AutomationML/Lib.aml')");

    let root = tree.read().root();
    let fetched = service
        .fetch_children(&tree, root, "RoleClassLib", true)
        .await
        .unwrap();
    assert!(fetched.is_attached());
    assert_eq!(executor.query_count(), 1);

    let xml = node_to_xml(&tree.read(), root);
    assert!(xml.contains("<RoleClass Name=\"AutomationMLBaseRole\"/>"));
}

#[tokio::test]
async fn failed_loads_return_none() {
    let executor = ScriptedExecutor::new();
    executor.respond("doc('AutomationML/Other.aml')", Ok("<NotCaex/>".to_string()));
    executor.respond("doc('AutomationML/Empty.aml')", Err(ExecutorError::NoContent));
    let service = DatabaseService::new(as_executor(&executor));

    assert!(service.load_document_full(STORE, "Missing.aml").await.unwrap().is_none());
    assert_eq!(service.error_message(), "404");

    assert!(service.load_document_full(STORE, "Empty.aml").await.unwrap().is_none());
    assert_eq!(service.error_message(), "no content");

    assert!(service.load_document_full(STORE, "Other.aml").await.unwrap().is_none());
    assert!(service.error_message().contains("NotCaex"));

    assert!(service.origins().is_empty());
    assert!(matches!(
        service.load_document_header(STORE, " ").await,
        Err(ApiError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn raw_queries_pass_through() {
    let executor = ScriptedExecutor::new();
    executor.respond("count(", Ok("42".to_string()));
    let service = DatabaseService::new(as_executor(&executor));

    assert_eq!(service.run_query(STORE, "count(//RoleClass)").await.unwrap(), "42");
    assert_eq!(service.run_query(STORE, "//Nothing").await.unwrap(), "");
    assert!(service.has_error());
}

#[tokio::test]
async fn errors_persist_across_successes() {
    let executor = ScriptedExecutor::with_library();
    executor.listing(None, Ok(DATABASES.to_string()));
    let service = DatabaseService::new(as_executor(&executor));

    assert!(service.list_resources(STORE).await.unwrap().is_empty());
    assert!(service.has_error());
    assert_eq!(service.list_stores().await.len(), 2);
    assert_eq!(service.error_message(), "404");
}

#[tokio::test]
async fn shutdown_forgets_every_tree() {
    let executor = ScriptedExecutor::with_library();
    let service = DatabaseService::new(as_executor(&executor));
    let first = service.load_document_header(STORE, RESOURCE).await.unwrap().unwrap();
    let second = service.load_document_header(STORE, RESOURCE).await.unwrap().unwrap();
    assert_ne!(first.id(), second.id());
    assert_eq!(service.origins().len(), 2);

    service.release(&first);
    assert!(service.is_loaded(STORE, RESOURCE));

    service.shutdown();
    assert!(!service.is_loaded(STORE, RESOURCE));
    let root = second.read().root();
    let queries = executor.query_count();
    assert!(service
        .fetch_children(&second, root, "RoleClassLib", true)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(executor.query_count(), queries);
}

#[tokio::test]
async fn unreachable_server_connects_with_empty_listing() {
    let config = ServerConfig {
        address: "http://127.0.0.1:9/rest/".to_string(),
        timeout_secs: Some(2),
        ..ServerConfig::default()
    };
    let (service, stores) = DatabaseService::connect(&config).await.unwrap();
    assert!(stores.is_empty());
    assert!(service.has_error());
}

#[tokio::test]
async fn malformed_address_is_rejected() {
    let config = ServerConfig {
        address: "not a url".to_string(),
        ..ServerConfig::default()
    };
    assert!(matches!(
        DatabaseService::connect(&config).await,
        Err(ApiError::ConfigError(_))
    ));
}
