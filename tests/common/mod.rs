#![allow(dead_code)]

use bookstack_operator::prelude::*;
use bookstack_operator::{MemoryStore, OperatorConfig};

pub fn bookstack(name: &str, namespace: &str) -> BookStack {
    let mut parent = BookStack::new(name, BookStackSpec::default());
    parent.metadata.namespace = Some(namespace.to_string());
    parent
}

/// Stores a parent the way the API server would, with a uid.
pub fn seed(store: &MemoryStore, name: &str, namespace: &str) -> BookStack {
    store.insert(&bookstack(name, namespace)).unwrap()
}

pub fn settings() -> Arc<Settings> {
    settings_with(HostPathStorage::default())
}

pub fn settings_with(storage: impl StoragePolicy + 'static) -> Arc<Settings> {
    Arc::new(Settings::new(
        OperatorConfig::default(),
        Arc::new(StaticCredentials::placeholder()),
        Arc::new(storage),
    ))
}

pub fn parent_key(name: &str, namespace: &str) -> ObjectKey {
    ObjectKey::new(namespace, name)
}

pub fn child_key(parent: &str, namespace: &str, child: Child) -> ObjectKey {
    ObjectKey::new(namespace, child.name_for(parent))
}

pub async fn context(store: &MemoryStore, name: &str, namespace: &str) -> Context<MemoryStore> {
    Context::load(store.clone(), settings(), &parent_key(name, namespace))
        .await
        .unwrap()
        .unwrap()
}
