use certchain::secrets::{NodeAttributes, SecretBroker, VaultBroker, VaultConfig};
use certchain::{ChainConfig, ChainResolver};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::support::CHAIN_PEM;

fn kv2_response(data: Value) -> Value {
    json!({
        "request_id": "5a8c1c5e-0000-0000-0000-000000000000",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": {
            "data": data,
            "metadata": {
                "created_time": "2024-01-01T00:00:00.000000Z",
                "custom_metadata": null,
                "deletion_time": "",
                "destroyed": false,
                "version": 1
            }
        },
        "wrap_info": null,
        "warnings": null,
        "auth": null
    })
}

/// Mock server kept alive on its own runtime; the broker drives its own.
fn start_server(runtime: &Runtime) -> MockServer {
    runtime.block_on(MockServer::start())
}

fn broker_for(server: &MockServer) -> VaultBroker {
    VaultBroker::new(VaultConfig {
        address: server.uri(),
        token: Some("test-token".into()),
        namespace: None,
        mount_path: "secret".to_string(),
    })
    .unwrap()
}

#[test]
fn test_reads_field_from_kv2_secret() {
    let runtime = Runtime::new().unwrap();
    let server = start_server(&runtime);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/ssl/web"))
            .and(header("X-Vault-Token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(kv2_response(json!({
                "chain": CHAIN_PEM,
                "other": "x"
            }))))
            .expect(1)
            .mount(&server),
    );

    let broker = broker_for(&server);
    let bytes = broker.fetch("ssl", "web", "chain").unwrap();
    assert_eq!(bytes.as_deref(), Some(CHAIN_PEM.as_bytes()));

    runtime.block_on(server.verify());
}

#[test]
fn test_missing_secret_is_absent() {
    let runtime = Runtime::new().unwrap();
    let server = start_server(&runtime);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/ssl/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "errors": [] })))
            .mount(&server),
    );

    let broker = broker_for(&server);
    assert_eq!(broker.fetch("ssl", "missing", "chain").unwrap(), None);
}

#[test]
fn test_missing_field_is_absent() {
    let runtime = Runtime::new().unwrap();
    let server = start_server(&runtime);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/ssl/web"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(kv2_response(json!({ "key": "k" }))),
            )
            .mount(&server),
    );

    let broker = broker_for(&server);
    assert_eq!(broker.fetch("ssl", "web", "chain").unwrap(), None);
}

#[test]
fn test_server_error_surfaces_as_content_error() {
    let runtime = Runtime::new().unwrap();
    let server = start_server(&runtime);
    runtime.block_on(
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "errors": ["permission denied"] })),
            )
            .mount(&server),
    );

    let resolver = ChainResolver::new(NodeAttributes::empty()).with_secret_broker(broker_for(&server));
    let config = ChainConfig::new("ubuntu")
        .with_source("chef_vault")
        .with_bag("ssl")
        .with_item("web")
        .with_item_key("chain");

    let err = resolver.resolve(&config).unwrap_err();
    assert!(err.is_content());
    assert!(err.to_string().contains("chef-vault: ssl.web->chain"));
}

#[test]
fn test_resolver_through_vault() {
    let runtime = Runtime::new().unwrap();
    let server = start_server(&runtime);
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/v1/secret/data/ssl/web"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(kv2_response(json!({ "chain": CHAIN_PEM }))),
            )
            .expect(1)
            .mount(&server),
    );

    let resolver = ChainResolver::new(NodeAttributes::empty()).with_secret_broker(broker_for(&server));
    let config = ChainConfig::new("ubuntu")
        .with_source("chef-vault")
        .with_bag("ssl")
        .with_item("web")
        .with_item_key("chain");

    assert_eq!(resolver.resolve(&config).unwrap(), Some(CHAIN_PEM));
    assert_eq!(resolver.resolve(&config).unwrap(), Some(CHAIN_PEM));

    runtime.block_on(server.verify());
}
