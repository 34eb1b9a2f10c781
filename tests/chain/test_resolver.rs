use std::path::PathBuf;
use std::sync::Arc;

use certchain::errors::Error;
use certchain::secrets::NodeAttributes;
use certchain::{ChainConfig, ChainResolver};
use serde_json::json;

use super::support::{MockBroker, MockItemStore, MockReader, Reply, CHAIN_PEM};

fn resolver(
    store: &Arc<MockItemStore>,
    broker: &Arc<MockBroker>,
    reader: &Arc<MockReader>,
    attributes: NodeAttributes,
) -> ChainResolver {
    ChainResolver::new(attributes)
        .with_item_store(store.clone())
        .with_secret_broker(broker.clone())
        .with_path_reader(reader.clone())
}

fn doubles(reply: Reply) -> (Arc<MockItemStore>, Arc<MockBroker>, Arc<MockReader>) {
    (
        Arc::new(MockItemStore::new(reply.clone())),
        Arc::new(MockBroker::new(reply.clone())),
        Arc::new(MockReader::new(reply)),
    )
}

fn item_config(source: &str) -> ChainConfig {
    ChainConfig::new("ubuntu")
        .with_name("chain.pem")
        .with_source(source)
        .with_bag("ssl")
        .with_item("web")
        .with_item_key("chain")
}

#[test]
fn test_each_source_calls_only_its_backend_once() {
    for (source, expected) in
        [("data_bag", (1, 0, 0)), ("chef_vault", (0, 1, 0)), ("file", (0, 0, 1))]
    {
        let (store, broker, reader) = doubles(Reply::Text(CHAIN_PEM));
        let resolver = resolver(&store, &broker, &reader, NodeAttributes::empty());
        let config = item_config(source);

        for _ in 0..3 {
            assert_eq!(resolver.resolve(&config).unwrap(), Some(CHAIN_PEM), "{}", source);
        }
        assert_eq!((store.calls.get(), broker.calls.get(), reader.calls()), expected, "{}", source);
    }
}

#[test]
fn test_attribute_source_reads_content_key() {
    let (store, broker, reader) = doubles(Reply::Text("unused"));
    let attributes = NodeAttributes::new(json!({ "ssl_chain": { "content": CHAIN_PEM } }));
    let resolver = resolver(&store, &broker, &reader, attributes);
    let config = ChainConfig::new("ubuntu").with_source("attribute");

    assert_eq!(resolver.resolve(&config).unwrap(), Some(CHAIN_PEM));
    assert_eq!(store.calls.get() + broker.calls.get() + reader.calls(), 0);
}

#[test]
fn test_attribute_source_missing_content() {
    let resolver = ChainResolver::new(NodeAttributes::empty());
    let config = ChainConfig::new("ubuntu").with_source("attribute");

    let err = resolver.resolve(&config).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot read SSL intermediary chain from content key value: ssl_chain.content"
    );
}

#[test]
fn test_dashed_tags_are_normalized() {
    let (store, broker, reader) = doubles(Reply::Text(CHAIN_PEM));
    let resolver = resolver(&store, &broker, &reader, NodeAttributes::empty());

    assert_eq!(resolver.resolve(&item_config("Data-Bag")).unwrap(), Some(CHAIN_PEM));
    assert_eq!(resolver.resolve(&item_config("chef-vault")).unwrap(), Some(CHAIN_PEM));
    assert_eq!(store.calls.get(), 1);
    assert_eq!(broker.calls.get(), 1);
}

#[test]
fn test_unknown_source_is_not_an_error() {
    let (store, broker, reader) = doubles(Reply::Text(CHAIN_PEM));
    let resolver = resolver(&store, &broker, &reader, NodeAttributes::empty());
    let config = item_config("s3");

    assert_eq!(resolver.resolve(&config).unwrap(), None);
    assert_eq!(resolver.resolve(&config).unwrap(), None);
    assert_eq!(store.calls.get() + broker.calls.get() + reader.calls(), 0);
}

#[test]
fn test_absent_content_names_the_locator() {
    let (store, broker, reader) = doubles(Reply::Absent);
    let resolver = resolver(&store, &broker, &reader, NodeAttributes::empty());

    let err = resolver.resolve(&item_config("data_bag")).unwrap_err();
    assert_eq!(err.to_string(), "Cannot read SSL intermediary chain from data bag: ssl.web->chain");

    let err = resolver.resolve(&item_config("chef_vault")).unwrap_err();
    assert_eq!(err.to_string(), "Cannot read SSL intermediary chain from chef-vault: ssl.web->chain");

    let err = resolver.resolve(&item_config("file")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cannot read SSL intermediary chain from path: /etc/ssl/certs/chain.pem"
    );
}

#[test]
fn test_empty_content_is_rejected_for_every_source() {
    let (store, broker, reader) = doubles(Reply::Text(""));
    let attributes = NodeAttributes::new(json!({ "ssl_chain": { "content": "" } }));
    let resolver = resolver(&store, &broker, &reader, attributes);

    for (source, expected) in [
        ("attribute", "content key value: ssl_chain.content"),
        ("data_bag", "data bag: ssl.web->chain"),
        ("chef_vault", "chef-vault: ssl.web->chain"),
        ("file", "path: /etc/ssl/certs/chain.pem"),
    ] {
        let config = item_config(source);
        let err = resolver.resolve(&config).unwrap_err();
        assert!(err.is_content(), "{}", source);
        assert_eq!(
            err.to_string(),
            format!("Cannot read SSL intermediary chain from {} (content is empty)", expected),
        );
        assert!(!config.is_resolved(), "{}", source);
    }
    assert_eq!((store.calls.get(), broker.calls.get(), reader.calls()), (1, 1, 1));
}

#[test]
fn test_non_text_content_is_rejected() {
    let (store, broker, reader) = doubles(Reply::Bytes(vec![0x30, 0x82, 0xff, 0xfe]));
    let resolver = resolver(&store, &broker, &reader, NodeAttributes::empty());

    let err = resolver.resolve(&item_config("chef_vault")).unwrap_err();
    assert!(err.to_string().contains("chef-vault: ssl.web->chain (content is not text)"));
}

#[test]
fn test_backend_failure_keeps_cause_and_retries() {
    let (store, broker, reader) = doubles(Reply::Fail("bad hmac"));
    let resolver = resolver(&store, &broker, &reader, NodeAttributes::empty());
    let config = item_config("data_bag");

    let err = resolver.resolve(&config).unwrap_err();
    match &err {
        Error::Content { cause, .. } => assert!(cause.is_some()),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().contains("bad hmac"));

    assert!(resolver.resolve(&config).is_err());
    assert_eq!(store.calls.get(), 2);
}

#[test]
fn test_item_store_receives_encryption_settings() {
    let (store, broker, reader) = doubles(Reply::Text(CHAIN_PEM));
    let resolver = resolver(&store, &broker, &reader, NodeAttributes::empty());
    let config = item_config("data_bag")
        .with_encrypted(true)
        .with_secret_file("/etc/chef/encrypted_data_bag_secret");

    resolver.resolve(&config).unwrap();
    let call = store.last_call.borrow().clone().unwrap();
    assert_eq!(
        call,
        (
            "ssl".to_string(),
            "web".to_string(),
            "chain".to_string(),
            true,
            Some(PathBuf::from("/etc/chef/encrypted_data_bag_secret"))
        )
    );
}

#[test]
fn test_file_source_uses_derived_path() {
    let (store, broker, reader) = doubles(Reply::Text(CHAIN_PEM));
    let resolver = resolver(&store, &broker, &reader, NodeAttributes::empty());
    let config = ChainConfig::new("centos").with_name("chain.pem").with_source("file");

    resolver.resolve(&config).unwrap();
    assert_eq!(*reader.paths.borrow(), vec![PathBuf::from("/etc/pki/tls/certs/chain.pem")]);
}

#[test]
fn test_declarations_from_attributes() {
    let (store, broker, reader) = doubles(Reply::Text(CHAIN_PEM));
    let attributes = NodeAttributes::new(json!({
        "bag": "ssl",
        "item": "web",
        "ssl_chain": { "name": "chain.pem", "source": "data-bag", "item_key": "chain" }
    }));
    let config = ChainConfig::from_attributes("debian", &attributes);
    let resolver = resolver(&store, &broker, &reader, attributes);

    assert_eq!(resolver.content_or_default(&config).unwrap(), CHAIN_PEM);
    let call = store.last_call.borrow().clone().unwrap();
    assert_eq!((call.0.as_str(), call.1.as_str(), call.2.as_str()), ("ssl", "web", "chain"));
}
