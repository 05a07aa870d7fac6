use super::{ObjectKey, ObjectStore, StoredObject};
use crate::config::OperatorConfig;
use crate::error::{Error, Result};
use kube::api::{Patch, PatchParams, PostParams};
use kube::Client;

/// Store backed by the Kubernetes API. Wrap it in [`super::Bounded`] to cap
/// request latency.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
    field_manager: String,
}

impl KubeStore {
    pub fn new(client: Client, config: &OperatorConfig) -> Self {
        Self {
            client,
            field_manager: config.field_manager.clone(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl ObjectStore for KubeStore {
    async fn get<K: StoredObject>(&self, key: &ObjectKey) -> Result<Option<K>> {
        let api = K::api(self.client.clone(), key.namespace.as_deref());
        match api.get(&key.name).await {
            Ok(object) => Ok(Some(object)),
            Err(kube::Error::Api(e)) if e.code == 404 => Ok(None),
            Err(e) => Err(Error::Kube(e)),
        }
    }

    async fn create<K: StoredObject>(&self, object: &K) -> Result<K> {
        let key = ObjectKey::from_object(object)?;
        let api = K::api(self.client.clone(), key.namespace.as_deref());
        let params = PostParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };
        api.create(&params, object)
            .await
            .map_err(|e| Error::from_api(e, &key.to_string()))
    }

    async fn patch<K: StoredObject>(&self, key: &ObjectKey, patch: &serde_json::Value) -> Result<K> {
        let api = K::api(self.client.clone(), key.namespace.as_deref());
        let params = PatchParams {
            field_manager: Some(self.field_manager.clone()),
            ..Default::default()
        };
        api.patch(&key.name, &params, &Patch::Merge(patch))
            .await
            .map_err(|e| Error::from_api(e, &key.to_string()))
    }
}
