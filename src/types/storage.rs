use super::Labels;
use crate::types::ChildResource;
use k8s_openapi::api::core::v1 as k8s;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

fn storage_quantity(size: String) -> BTreeMap<String, Quantity> {
    [("storage".to_string(), Quantity(size))].into_iter().collect()
}

/// Cluster-scoped volume. The namespace passed to `into_k8s` is ignored.
#[derive(Clone, Debug)]
pub struct PersistentVolume {
    pub name: String,
    pub labels: Labels,
    pub capacity: String,
    pub access_modes: Vec<String>,
    pub storage_class: Option<String>,
    pub reclaim_policy: Option<String>,
    pub host_path: Option<String>,
}

impl PersistentVolume {
    pub fn new(name: impl Into<String>, capacity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Labels::new(),
            capacity: capacity.into(),
            access_modes: vec!["ReadWriteOnce".to_string()],
            storage_class: None,
            reclaim_policy: None,
            host_path: None,
        }
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn storage_class(mut self, class: impl Into<String>) -> Self {
        self.storage_class = Some(class.into());
        self
    }

    pub fn reclaim_delete(mut self) -> Self {
        self.reclaim_policy = Some("Delete".to_string());
        self
    }

    pub fn host_path(mut self, path: impl Into<String>) -> Self {
        self.host_path = Some(path.into());
        self
    }
}

impl ChildResource for PersistentVolume {
    type K8sType = k8s::PersistentVolume;

    fn into_k8s(self, _namespace: &str) -> Self::K8sType {
        k8s::PersistentVolume {
            metadata: ObjectMeta {
                name: Some(self.name),
                labels: self.labels.into_option(),
                ..Default::default()
            },
            spec: Some(k8s::PersistentVolumeSpec {
                capacity: Some(storage_quantity(self.capacity)),
                access_modes: Some(self.access_modes),
                storage_class_name: self.storage_class,
                persistent_volume_reclaim_policy: self.reclaim_policy,
                host_path: self.host_path.map(|path| k8s::HostPathVolumeSource {
                    path,
                    type_: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct PersistentVolumeClaim {
    pub name: String,
    pub labels: Labels,
    pub storage_class: Option<String>,
    pub access_modes: Vec<String>,
    pub storage: String,
}

impl PersistentVolumeClaim {
    pub fn new(name: impl Into<String>, storage: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Labels::new(),
            storage_class: None,
            access_modes: vec!["ReadWriteOnce".to_string()],
            storage: storage.into(),
        }
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn storage_class(mut self, class: impl Into<String>) -> Self {
        self.storage_class = Some(class.into());
        self
    }
}

impl ChildResource for PersistentVolumeClaim {
    type K8sType = k8s::PersistentVolumeClaim;

    fn into_k8s(self, namespace: &str) -> Self::K8sType {
        k8s::PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(self.name),
                namespace: Some(namespace.to_string()),
                labels: self.labels.into_option(),
                ..Default::default()
            },
            spec: Some(k8s::PersistentVolumeClaimSpec {
                access_modes: Some(self.access_modes),
                storage_class_name: self.storage_class,
                resources: Some(k8s::VolumeResourceRequirements {
                    requests: Some(storage_quantity(self.storage)),
                    limits: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}
