use std::collections::HashMap;
use std::time::Duration;

use bookstack_operator::config::{StorageMode, DEFAULT_FIELD_MANAGER};
use bookstack_operator::credentials::{CredentialSource, StaticCredentials};
use bookstack_operator::{BookStack, BookStackSpec, Error, OperatorConfig};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_without_environment() {
    let config = OperatorConfig::from_lookup(lookup(&[])).unwrap();

    assert_eq!(config.field_manager, DEFAULT_FIELD_MANAGER);
    assert_eq!(config.requeue_after, Duration::from_secs(300));
    assert_eq!(config.error_requeue, Duration::from_secs(60));
    assert_eq!(config.app_host, "127.0.0.1");
    assert_eq!(config.watch_namespace, None);
    assert_eq!(config.storage, StorageMode::default());
    assert_eq!(config.storage_size, "2Gi");
}

#[test]
fn reads_overrides() {
    let config = OperatorConfig::from_lookup(lookup(&[
        ("BOOKSTACK_REQUEUE_SECS", "30"),
        ("BOOKSTACK_APP_HOST", "books.example.com"),
        ("BOOKSTACK_WATCH_NAMESPACE", "wiki"),
        ("BOOKSTACK_STORAGE", "dynamic"),
        ("BOOKSTACK_STORAGE_CLASS", "fast"),
        ("BOOKSTACK_STORAGE_SIZE", "10Gi"),
    ]))
    .unwrap();

    assert_eq!(config.requeue_after, Duration::from_secs(30));
    assert_eq!(config.app_host, "books.example.com");
    assert_eq!(config.watch_namespace.as_deref(), Some("wiki"));
    assert_eq!(
        config.storage,
        StorageMode::Dynamic {
            storage_class: Some("fast".to_string())
        }
    );
    assert_eq!(config.storage_size, "10Gi");
}

#[test]
fn empty_watch_namespace_means_all() {
    let config =
        OperatorConfig::from_lookup(lookup(&[("BOOKSTACK_WATCH_NAMESPACE", "")])).unwrap();
    assert_eq!(config.watch_namespace, None);
}

#[test]
fn rejects_bad_values() {
    let err = OperatorConfig::from_lookup(lookup(&[("BOOKSTACK_REQUEUE_SECS", "soon")]))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("BOOKSTACK_REQUEUE_SECS")));

    let err =
        OperatorConfig::from_lookup(lookup(&[("BOOKSTACK_STORAGE", "nfs")])).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
}

#[test]
fn configured_passwords_reach_the_credentials() {
    let config = OperatorConfig::from_lookup(lookup(&[
        ("BOOKSTACK_DB_PASSWORD", "s3cret"),
        ("BOOKSTACK_DB_ADMIN_PASSWORD", "r00t"),
    ]))
    .unwrap();
    let parent = BookStack::new("demo", BookStackSpec::default());

    let creds = StaticCredentials::from_config(&config).database(&parent);
    assert_eq!(creds.password, "s3cret");
    assert_eq!(creds.admin_password, "r00t");

    let creds = StaticCredentials::from_config(&OperatorConfig::default()).database(&parent);
    assert_eq!(creds, StaticCredentials::placeholder().database(&parent));
}

#[test]
fn storage_size_must_be_canonical() {
    let config =
        OperatorConfig::from_lookup(lookup(&[("BOOKSTACK_STORAGE_SIZE", "1536Mi")])).unwrap();
    assert_eq!(config.storage_size, "1536Mi");

    let err = OperatorConfig::from_lookup(lookup(&[("BOOKSTACK_STORAGE_SIZE", "2048Mi")]))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("2Gi")));

    let err = OperatorConfig::from_lookup(lookup(&[("BOOKSTACK_STORAGE_SIZE", "2000M")]))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(msg) if msg.contains("2G")));

    for bad in ["1.5Gi", "Gi", "2GB", "-2Gi", ""] {
        let result = OperatorConfig::from_lookup(lookup(&[("BOOKSTACK_STORAGE_SIZE", bad)]));
        assert!(
            matches!(result, Err(Error::InvalidConfig(_))),
            "accepted {bad:?}"
        );
    }
}
