mod common;

use bookstack_operator::config::StorageMode;
use bookstack_operator::credentials::DatabaseCredentials;
use bookstack_operator::desired;
use bookstack_operator::labels::{APP_LABEL, INSTANCE_LABEL};
use bookstack_operator::prelude::*;
use bookstack_operator::provision::storage_from_config;
use bookstack_operator::OperatorConfig;
use common::bookstack;
use std::collections::BTreeMap;

fn credentials() -> DatabaseCredentials {
    StaticCredentials::placeholder().database(&bookstack("demo", "ns1"))
}

fn assert_labelled<K: kube::Resource>(object: &K, parent: &str) {
    let labels = object.meta().labels.clone().unwrap_or_default();
    assert_eq!(labels.get(APP_LABEL).map(String::as_str), Some("bookstack"));
    assert_eq!(labels.get(INSTANCE_LABEL).map(String::as_str), Some(parent));
}

#[test]
fn child_names_follow_the_parent() {
    let names: Vec<String> = Child::ALL.iter().map(|c| c.name_for("demo")).collect();
    assert_eq!(
        names,
        [
            "demo-sa",
            "demo-svc",
            "demo-cm",
            "demo-db-cm",
            "demo-secret",
            "demo-db-secret",
            "demo-pv",
            "demo-db-pv",
            "demo-pvc",
            "demo-db-pvc",
        ]
    );
}

#[test]
fn parent_without_namespace_uses_default() {
    let parent = BookStack::new("demo", BookStackSpec::default());
    assert_eq!(parent.namespace_or_default(), "default");
    assert_eq!(
        desired::service_account(&parent).metadata.namespace.as_deref(),
        Some("default")
    );
}

#[test]
fn service_account_is_named_and_labelled() {
    let sa = desired::service_account(&bookstack("demo", "ns1"));
    assert_eq!(sa.metadata.name.as_deref(), Some("demo-sa"));
    assert_eq!(sa.metadata.namespace.as_deref(), Some("ns1"));
    assert_labelled(&sa, "demo");
}

#[test]
fn service_exposes_http_on_a_node_port() {
    let svc = desired::service(&bookstack("demo", "ns1"));
    let spec = svc.spec.clone().unwrap();

    assert_eq!(svc.metadata.name.as_deref(), Some("demo-svc"));
    assert_eq!(spec.type_.as_deref(), Some("NodePort"));

    let ports = spec.ports.unwrap();
    assert_eq!(ports.len(), 1);
    assert_eq!(ports[0].port, desired::HTTP_PORT);
    assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
    assert_eq!(ports[0].node_port, None);

    let selector = spec.selector.unwrap();
    assert_eq!(selector.get(INSTANCE_LABEL).map(String::as_str), Some("demo"));
    assert_labelled(&svc, "demo");
}

#[test]
fn node_port_requires_an_assigned_port() {
    let mut svc = desired::service(&bookstack("demo", "ns1"));
    assert!(matches!(
        desired::node_port(&svc),
        Err(Error::MissingNodePort(name)) if name == "demo-svc"
    ));

    svc.spec.as_mut().unwrap().ports.as_mut().unwrap()[0].node_port = Some(30080);
    assert_eq!(desired::node_port(&svc).unwrap(), 30080);
}

#[test]
fn app_config_map_points_at_the_node_port() {
    let cm = desired::app_config_map(&bookstack("demo", "ns1"), "127.0.0.1", 30080);
    let data = cm.data.clone().unwrap();

    assert_eq!(cm.metadata.name.as_deref(), Some("demo-cm"));
    assert_eq!(data["APP_URL"], "http://127.0.0.1:30080/");
    assert_eq!(data["DB_HOST"], "localhost");
    assert_eq!(data["DB_DATABASE"], "bookstackapp");
    assert_eq!(data["DB_USER"], "bookstack");
    assert_eq!(data["TZ"], "America/Chicago");
    assert_labelled(&cm, "demo");
}

#[test]
fn db_config_map_is_fixed() {
    let cm = desired::db_config_map(&bookstack("demo", "ns1"));
    let data = cm.data.unwrap();

    assert_eq!(cm.metadata.name.as_deref(), Some("demo-db-cm"));
    assert_eq!(data["MYSQL_DATABASE"], "bookstackapp");
    assert_eq!(data["MYSQL_USER"], "bookstack");
    assert_eq!(data["PUID"], "1000");
    assert_eq!(data["PGID"], "1000");
}

fn secret_data(secret: &k8s_openapi::api::core::v1::Secret) -> BTreeMap<String, String> {
    secret
        .data
        .clone()
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, String::from_utf8(v.0).unwrap()))
        .collect()
}

#[test]
fn secrets_carry_the_credentials() {
    let parent = bookstack("demo", "ns1");
    let app = desired::app_secret(&parent, &credentials());
    let db = desired::db_secret(&parent, &credentials());

    assert_eq!(app.metadata.name.as_deref(), Some("demo-secret"));
    assert_eq!(app.type_.as_deref(), Some("Opaque"));
    assert_eq!(secret_data(&app)["DB_PASS"], "hunter2");

    let db_data = secret_data(&db);
    assert_eq!(db.metadata.name.as_deref(), Some("demo-db-secret"));
    assert_eq!(db_data["MYSQL_PASSWORD"], "hunter2");
    assert_eq!(db_data["MYSQL_ADMIN_PASS"], "superhunter2");
}

#[test]
fn credentials_debug_is_redacted() {
    let rendered = format!("{:?}", credentials());
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn host_path_storage_builds_volume_and_claim() {
    let parent = bookstack("demo", "ns1");
    let storage = HostPathStorage::default();

    let pv = storage.volume(&parent, Volume::Db).unwrap();
    let spec = pv.spec.clone().unwrap();
    assert_eq!(pv.metadata.name.as_deref(), Some("demo-db-pv"));
    assert_eq!(pv.metadata.namespace, None);
    assert_eq!(spec.storage_class_name.as_deref(), Some("manual"));
    assert_eq!(spec.persistent_volume_reclaim_policy.as_deref(), Some("Delete"));
    assert_eq!(spec.host_path.unwrap().path, "/mnt/db-config");
    assert_eq!(spec.capacity.unwrap()["storage"].0, "2Gi");
    assert_labelled(&pv, "demo");

    let pvc = storage.claim(&parent, Volume::App);
    let spec = pvc.spec.clone().unwrap();
    assert_eq!(pvc.metadata.name.as_deref(), Some("demo-pvc"));
    assert_eq!(pvc.metadata.namespace.as_deref(), Some("ns1"));
    assert_eq!(spec.storage_class_name.as_deref(), Some("manual"));
    assert_eq!(
        spec.access_modes.unwrap(),
        vec!["ReadWriteOnce".to_string()]
    );
    assert_eq!(
        spec.resources.unwrap().requests.unwrap()["storage"].0,
        "2Gi"
    );
}

#[test]
fn dynamic_storage_only_claims() {
    let parent = bookstack("demo", "ns1");
    let storage = DynamicStorage {
        storage_class: None,
        size: "5Gi".to_string(),
    };

    assert!(storage.volume(&parent, Volume::App).is_none());
    let spec = storage.claim(&parent, Volume::Db).spec.unwrap();
    assert_eq!(spec.storage_class_name, None);
    assert_eq!(spec.resources.unwrap().requests.unwrap()["storage"].0, "5Gi");
}

#[test]
fn storage_policy_follows_config() {
    let parent = bookstack("demo", "ns1");
    let config = OperatorConfig {
        storage: StorageMode::Dynamic {
            storage_class: Some("fast".to_string()),
        },
        ..OperatorConfig::default()
    };

    let storage = storage_from_config(&config);
    assert!(storage.volume(&parent, Volume::App).is_none());
    assert_eq!(
        storage
            .claim(&parent, Volume::App)
            .spec
            .unwrap()
            .storage_class_name
            .as_deref(),
        Some("fast")
    );

    let storage = storage_from_config(&OperatorConfig::default());
    assert!(storage.volume(&parent, Volume::App).is_some());
}
