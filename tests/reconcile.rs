mod common;

use bookstack_operator::prelude::*;
use bookstack_operator::reconcilers::reconcile;
use bookstack_operator::store::{Fault, Operation};
use bookstack_operator::{owner, MemoryStore};
use common::{child_key, parent_key, seed, settings, settings_with};
use k8s_openapi::api::core::v1::{
    ConfigMap, PersistentVolume, PersistentVolumeClaim, Secret, Service, ServiceAccount,
};

async fn run<R: ChildReconciler>(
    reconciler: R,
    store: &MemoryStore,
    settings: &Arc<Settings>,
) -> Signal {
    reconcile(&reconciler, store, settings, &parent_key("demo", "ns1")).await
}

async fn run_all(store: &MemoryStore, settings: &Arc<Settings>) -> Vec<Signal> {
    vec![
        run(ServiceAccountReconciler, store, settings).await,
        run(ServiceReconciler, store, settings).await,
        run(ConfigMapReconciler, store, settings).await,
        run(SecretReconciler, store, settings).await,
        run(AppStorageReconciler, store, settings).await,
        run(DbStorageReconciler, store, settings).await,
    ]
}

#[tokio::test]
async fn service_then_config_map_bakes_in_node_port() {
    let store = MemoryStore::with_node_port_base(30080);
    seed(&store, "demo", "ns1");
    let settings = settings();

    assert!(matches!(run(ServiceReconciler, &store, &settings).await, Signal::Stop));
    assert!(matches!(run(ConfigMapReconciler, &store, &settings).await, Signal::Stop));

    let svc: Service = store.peek(&child_key("demo", "ns1", Child::Service)).unwrap();
    assert_eq!(svc.spec.unwrap().ports.unwrap()[0].node_port, Some(30080));

    let cm: ConfigMap = store.peek(&child_key("demo", "ns1", Child::AppConfigMap)).unwrap();
    assert_eq!(cm.data.unwrap()["APP_URL"], "http://127.0.0.1:30080/");
    assert!(store
        .peek::<ConfigMap>(&child_key("demo", "ns1", Child::DbConfigMap))
        .is_some());
}

#[tokio::test]
async fn config_map_waits_for_service() {
    let store = MemoryStore::new();
    seed(&store, "demo", "ns1");

    let signal = run(ConfigMapReconciler, &store, &settings()).await;

    assert!(matches!(signal, Signal::Requeue));
    assert!(store.writes().is_empty());
    assert!(store
        .peek::<ConfigMap>(&child_key("demo", "ns1", Child::DbConfigMap))
        .is_none());
}

#[tokio::test]
async fn config_map_errors_on_service_without_node_port() {
    let store = MemoryStore::new();
    let parent = seed(&store, "demo", "ns1");
    let mut svc = bookstack_operator::desired::service(&parent);
    svc.spec.as_mut().unwrap().type_ = Some("ClusterIP".to_string());
    store.insert(&svc).unwrap();

    let signal = run(ConfigMapReconciler, &store, &settings()).await;

    assert!(matches!(signal, Signal::RequeueWithError(Error::MissingNodePort(_))));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn missing_parent_stops_every_reconciler() {
    let store = MemoryStore::new();

    for signal in run_all(&store, &settings()).await {
        assert!(matches!(signal, Signal::Stop));
    }
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn parent_fetch_failure_requeues_with_error() {
    let store = MemoryStore::new();
    seed(&store, "demo", "ns1");
    store.fail_next(Operation::Get, "BookStack", Fault::Unavailable);

    let signal = run(SecretReconciler, &store, &settings()).await;

    assert!(matches!(signal, Signal::RequeueWithError(Error::Unavailable(_))));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn full_pass_creates_every_child_owned_by_the_parent() {
    let store = MemoryStore::new();
    let parent = seed(&store, "demo", "ns1");
    let settings = settings();

    for signal in run_all(&store, &settings).await {
        assert!(matches!(signal, Signal::Stop), "unexpected {signal:?}");
    }

    let ns = |child| child_key("demo", "ns1", child);
    let sa: ServiceAccount = store.peek(&ns(Child::ServiceAccount)).unwrap();
    let svc: Service = store.peek(&ns(Child::Service)).unwrap();
    let app_cm: ConfigMap = store.peek(&ns(Child::AppConfigMap)).unwrap();
    let db_cm: ConfigMap = store.peek(&ns(Child::DbConfigMap)).unwrap();
    let app_secret: Secret = store.peek(&ns(Child::AppSecret)).unwrap();
    let db_secret: Secret = store.peek(&ns(Child::DbSecret)).unwrap();
    let app_pvc: PersistentVolumeClaim = store.peek(&ns(Child::AppClaim)).unwrap();
    let db_pvc: PersistentVolumeClaim = store.peek(&ns(Child::DbClaim)).unwrap();
    let app_pv: PersistentVolume = store
        .peek(&ObjectKey::cluster(Child::AppVolume.name_for("demo")))
        .unwrap();
    let db_pv: PersistentVolume = store
        .peek(&ObjectKey::cluster(Child::DbVolume.name_for("demo")))
        .unwrap();

    assert!(owner::is_controlled_by(&sa, &parent));
    assert!(owner::is_controlled_by(&svc, &parent));
    assert!(owner::is_controlled_by(&app_cm, &parent));
    assert!(owner::is_controlled_by(&db_cm, &parent));
    assert!(owner::is_controlled_by(&app_secret, &parent));
    assert!(owner::is_controlled_by(&db_secret, &parent));
    assert!(owner::is_controlled_by(&app_pvc, &parent));
    assert!(owner::is_controlled_by(&db_pvc, &parent));
    assert!(owner::is_controlled_by(&app_pv, &parent));
    assert!(owner::is_controlled_by(&db_pv, &parent));

    // the parent plus ten children
    assert_eq!(store.len(), 11);
}

#[tokio::test]
async fn repeated_pass_is_a_no_op() {
    let store = MemoryStore::new();
    seed(&store, "demo", "ns1");
    let settings = settings();
    run_all(&store, &settings).await;
    store.clear_calls();

    for signal in run_all(&store, &settings).await {
        assert!(matches!(signal, Signal::Stop));
    }

    assert!(store.writes().is_empty());
    assert!(!store.calls_of(Operation::Get).is_empty());
}

#[tokio::test]
async fn dynamic_storage_writes_claims_only() {
    let store = MemoryStore::new();
    seed(&store, "demo", "ns1");
    let settings = settings_with(DynamicStorage {
        storage_class: Some("standard".to_string()),
        size: "2Gi".to_string(),
    });

    assert!(matches!(run(AppStorageReconciler, &store, &settings).await, Signal::Stop));
    assert!(matches!(run(DbStorageReconciler, &store, &settings).await, Signal::Stop));

    assert!(store.writes().iter().all(|call| call.kind == "PersistentVolumeClaim"));
    assert_eq!(store.calls_of(Operation::Create).len(), 2);
    assert!(store
        .peek::<PersistentVolume>(&ObjectKey::cluster("demo-pv"))
        .is_none());
}

#[tokio::test]
async fn volume_is_written_before_its_claim() {
    let store = MemoryStore::new();
    seed(&store, "demo", "ns1");

    run(DbStorageReconciler, &store, &settings()).await;

    let kinds: Vec<String> = store
        .calls_of(Operation::Create)
        .into_iter()
        .map(|call| call.kind)
        .collect();
    assert_eq!(kinds, ["PersistentVolume", "PersistentVolumeClaim"]);
}

#[tokio::test]
async fn failed_first_secret_skips_the_second() {
    let store = MemoryStore::new();
    seed(&store, "demo", "ns1");
    store.fail_next(Operation::Create, "Secret", Fault::Unavailable);

    let signal = run(SecretReconciler, &store, &settings()).await;

    assert!(signal.is_retry());
    assert!(store
        .peek::<Secret>(&child_key("demo", "ns1", Child::DbSecret))
        .is_none());

    let signal = run(SecretReconciler, &store, &settings()).await;
    assert!(matches!(signal, Signal::Stop));
    assert!(store
        .peek::<Secret>(&child_key("demo", "ns1", Child::DbSecret))
        .is_some());
}

#[tokio::test]
async fn deleted_parent_stops_after_children_exist() {
    let store = MemoryStore::new();
    seed(&store, "demo", "ns1");
    let settings = settings();
    run(ServiceAccountReconciler, &store, &settings).await;

    assert!(store.remove::<BookStack>(&parent_key("demo", "ns1")));
    store.clear_calls();

    assert!(matches!(run(ServiceAccountReconciler, &store, &settings).await, Signal::Stop));
    assert!(store.writes().is_empty());
}
