//! Storage provisioning strategies for the app and db volumes.

use crate::config::{OperatorConfig, StorageMode};
use crate::crd::{BookStack, Child};
use crate::labels::labels_for;
use crate::types::{self, ChildResource};
use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeClaim};
use kube::ResourceExt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Volume {
    App,
    Db,
}

impl Volume {
    pub fn volume_child(self) -> Child {
        match self {
            Volume::App => Child::AppVolume,
            Volume::Db => Child::DbVolume,
        }
    }

    pub fn claim_child(self) -> Child {
        match self {
            Volume::App => Child::AppClaim,
            Volume::Db => Child::DbClaim,
        }
    }

    fn host_dir(self) -> &'static str {
        match self {
            Volume::App => "app-config",
            Volume::Db => "db-config",
        }
    }
}

pub trait StoragePolicy: Send + Sync {
    /// The volume backing the claim, or `None` when the cluster provisions it.
    fn volume(&self, parent: &BookStack, volume: Volume) -> Option<PersistentVolume>;

    fn claim(&self, parent: &BookStack, volume: Volume) -> PersistentVolumeClaim;
}

/// Hand-built volumes on a node-local directory, matched to their claims
/// through a shared storage class.
#[derive(Clone, Debug)]
pub struct HostPathStorage {
    pub root: String,
    pub storage_class: String,
    pub size: String,
}

impl Default for HostPathStorage {
    fn default() -> Self {
        Self {
            root: "/mnt".to_string(),
            storage_class: "manual".to_string(),
            size: "2Gi".to_string(),
        }
    }
}

impl StoragePolicy for HostPathStorage {
    fn volume(&self, parent: &BookStack, volume: Volume) -> Option<PersistentVolume> {
        let path = format!("{}/{}", self.root.trim_end_matches('/'), volume.host_dir());
        let pv = types::PersistentVolume::new(parent.child_name(volume.volume_child()), &self.size)
            .labels(labels_for(&parent.name_any()))
            .storage_class(&self.storage_class)
            .reclaim_delete()
            .host_path(path);
        Some(pv.into_k8s(&parent.namespace_or_default()))
    }

    fn claim(&self, parent: &BookStack, volume: Volume) -> PersistentVolumeClaim {
        types::PersistentVolumeClaim::new(parent.child_name(volume.claim_child()), &self.size)
            .labels(labels_for(&parent.name_any()))
            .storage_class(&self.storage_class)
            .into_k8s(&parent.namespace_or_default())
    }
}

/// Claims only; an unset class selects the cluster default.
#[derive(Clone, Debug)]
pub struct DynamicStorage {
    pub storage_class: Option<String>,
    pub size: String,
}

impl StoragePolicy for DynamicStorage {
    fn volume(&self, _parent: &BookStack, _volume: Volume) -> Option<PersistentVolume> {
        None
    }

    fn claim(&self, parent: &BookStack, volume: Volume) -> PersistentVolumeClaim {
        let mut claim =
            types::PersistentVolumeClaim::new(parent.child_name(volume.claim_child()), &self.size)
                .labels(labels_for(&parent.name_any()));
        if let Some(class) = &self.storage_class {
            claim = claim.storage_class(class);
        }
        claim.into_k8s(&parent.namespace_or_default())
    }
}

pub fn storage_from_config(config: &OperatorConfig) -> Box<dyn StoragePolicy> {
    match &config.storage {
        StorageMode::HostPath {
            root,
            storage_class,
        } => Box::new(HostPathStorage {
            root: root.clone(),
            storage_class: storage_class.clone(),
            size: config.storage_size.clone(),
        }),
        StorageMode::Dynamic { storage_class } => Box::new(DynamicStorage {
            storage_class: storage_class.clone(),
            size: config.storage_size.clone(),
        }),
    }
}
