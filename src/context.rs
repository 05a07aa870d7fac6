use crate::config::OperatorConfig;
use crate::converge::{converge, Convergence};
use crate::credentials::CredentialSource;
use crate::crd::{BookStack, Child};
use crate::error::Result;
use crate::provision::StoragePolicy;
use crate::signal::Signal;
use crate::store::{ObjectKey, ObjectStore, StoredObject};
use kube::ResourceExt;
use std::sync::Arc;

/// Everything a reconciler needs besides the store and the parent.
pub struct Settings {
    pub config: OperatorConfig,
    pub credentials: Arc<dyn CredentialSource>,
    pub storage: Arc<dyn StoragePolicy>,
}

impl Settings {
    pub fn new(
        config: OperatorConfig,
        credentials: Arc<dyn CredentialSource>,
        storage: Arc<dyn StoragePolicy>,
    ) -> Self {
        Self {
            config,
            credentials,
            storage,
        }
    }
}

/// One reconciliation attempt for one parent.
pub struct Context<S: ObjectStore> {
    resource: Arc<BookStack>,
    store: S,
    settings: Arc<Settings>,
    namespace: String,
    name: String,
}

impl<S: ObjectStore> Context<S> {
    pub fn new(resource: Arc<BookStack>, store: S, settings: Arc<Settings>) -> Self {
        let namespace = resource.namespace_or_default();
        let name = resource.name_any();
        Self {
            resource,
            store,
            settings,
            namespace,
            name,
        }
    }

    /// Fetches the parent fresh from the store. `Ok(None)` when it is gone.
    pub async fn load(store: S, settings: Arc<Settings>, key: &ObjectKey) -> Result<Option<Self>> {
        let parent = store.get::<BookStack>(key).await?;
        Ok(parent.map(|p| Self::new(Arc::new(p), store, settings)))
    }

    pub fn resource(&self) -> &BookStack {
        &self.resource
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn child_key(&self, child: Child) -> ObjectKey {
        ObjectKey::new(&self.namespace, child.name_for(&self.name))
    }

    pub async fn get<T: StoredObject>(&self, key: &ObjectKey) -> Result<Option<T>> {
        self.store.get(key).await
    }

    pub async fn converge<T: StoredObject>(&self, desired: T) -> Result<Convergence<T>> {
        converge(&self.store, self.resource.as_ref(), desired).await
    }

    /// Converges `desired` as one reconciliation step.
    pub async fn ensure<T: StoredObject>(&self, desired: T) -> Signal {
        self.converge(desired).await.into()
    }
}
