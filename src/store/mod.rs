//! Typed access to live objects, by identity.

mod bounded;
mod cluster;
pub mod memory;

pub use bounded::Bounded;
pub use cluster::KubeStore;
pub use memory::{Fault, MemoryStore, Operation};

use crate::crd::BookStack;
use crate::error::{Error, Result};
use k8s_openapi::api::core::v1::{
    ConfigMap, PersistentVolume, PersistentVolumeClaim, Secret, Service, ServiceAccount,
};
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::future::Future;

/// Namespace and name of an object. Cluster-scoped objects have no namespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectKey {
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn from_object<K: Resource>(object: &K) -> Result<Self> {
        let name = object
            .meta()
            .name
            .clone()
            .ok_or(Error::MissingField("metadata.name"))?;
        Ok(Self {
            namespace: object.namespace(),
            name,
        })
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}", ns, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A kind the operator reads or writes.
pub trait StoredObject:
    Resource<DynamicType = ()>
    + Clone
    + fmt::Debug
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    fn api(client: Client, namespace: Option<&str>) -> Api<Self>;
}

macro_rules! namespaced_objects {
    ($($kind:ty),* $(,)?) => {
        $(
            impl StoredObject for $kind {
                fn api(client: Client, namespace: Option<&str>) -> Api<Self> {
                    match namespace {
                        Some(ns) => Api::namespaced(client, ns),
                        None => Api::default_namespaced(client),
                    }
                }
            }
        )*
    };
}

namespaced_objects!(
    BookStack,
    ConfigMap,
    Secret,
    Service,
    ServiceAccount,
    PersistentVolumeClaim,
);

impl StoredObject for PersistentVolume {
    fn api(client: Client, _namespace: Option<&str>) -> Api<Self> {
        Api::all(client)
    }
}

/// Get/create/patch by identity. Implementations must report a duplicate
/// create as [`Error::AlreadyExists`] and a failed resourceVersion
/// precondition as [`Error::Conflict`].
pub trait ObjectStore: Clone + Send + Sync + 'static {
    /// `Ok(None)` when the object does not exist.
    fn get<K: StoredObject>(&self, key: &ObjectKey) -> impl Future<Output = Result<Option<K>>> + Send;

    fn create<K: StoredObject>(&self, object: &K) -> impl Future<Output = Result<K>> + Send;

    /// Applies a JSON merge patch.
    fn patch<K: StoredObject>(
        &self,
        key: &ObjectKey,
        patch: &serde_json::Value,
    ) -> impl Future<Output = Result<K>> + Send;
}
