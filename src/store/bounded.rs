use super::{ObjectKey, ObjectStore, StoredObject};
use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Wraps a store so that no call waits longer than `timeout`. An elapsed
/// call fails with [`Error::Timeout`].
#[derive(Clone)]
pub struct Bounded<S> {
    inner: S,
    timeout: Duration,
}

impl<S: ObjectStore> Bounded<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T, F>(&self, request: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| Error::Timeout(self.timeout))?
    }
}

impl<S: ObjectStore> ObjectStore for Bounded<S> {
    async fn get<K: StoredObject>(&self, key: &ObjectKey) -> Result<Option<K>> {
        self.bounded(self.inner.get(key)).await
    }

    async fn create<K: StoredObject>(&self, object: &K) -> Result<K> {
        self.bounded(self.inner.create(object)).await
    }

    async fn patch<K: StoredObject>(&self, key: &ObjectKey, patch: &serde_json::Value) -> Result<K> {
        self.bounded(self.inner.patch(key, patch)).await
    }
}
