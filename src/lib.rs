pub mod config;
pub mod context;
pub mod converge;
pub mod crd;
pub mod credentials;
pub mod desired;
pub mod error;
pub mod labels;
pub mod merge;
pub mod operator;
pub mod owner;
pub mod provision;
pub mod reconcilers;
pub mod signal;
pub mod store;
pub mod types;

pub use config::OperatorConfig;
pub use context::{Context, Settings};
pub use converge::{converge, Convergence};
pub use crd::{BookStack, BookStackSpec, BookStackStatus, Child};
pub use error::{Error, Result};
pub use operator::Operator;
pub use signal::Signal;
pub use store::{Bounded, KubeStore, MemoryStore, ObjectKey, ObjectStore, StoredObject};

pub mod prelude {
    pub use crate::context::{Context, Settings};
    pub use crate::crd::{BookStack, BookStackSpec, Child};
    pub use crate::credentials::{CredentialSource, DatabaseCredentials, StaticCredentials};
    pub use crate::error::{Error, Result};
    pub use crate::operator::Operator;
    pub use crate::provision::{DynamicStorage, HostPathStorage, StoragePolicy, Volume};
    pub use crate::reconcilers::{
        AppStorageReconciler, ChildReconciler, ConfigMapReconciler, DbStorageReconciler,
        SecretReconciler, ServiceAccountReconciler, ServiceReconciler,
    };
    pub use crate::signal::Signal;
    pub use crate::store::{ObjectKey, ObjectStore};

    pub use kube::runtime::controller::Action;
    pub use std::sync::Arc;
}
