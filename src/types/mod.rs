pub mod core;
pub mod metadata;
pub mod storage;

pub use self::core::*;
pub use metadata::*;
pub use storage::*;

/// In-memory builder for one child object.
pub trait ChildResource: Send + Sync {
    type K8sType: kube::Resource<DynamicType = ()>
        + Clone
        + std::fmt::Debug
        + serde::Serialize
        + for<'de> serde::Deserialize<'de>;

    fn into_k8s(self, namespace: &str) -> Self::K8sType;
}
