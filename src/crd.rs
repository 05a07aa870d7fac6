//! The `BookStack` parent resource and the naming contract of its children.

use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// User intent for one BookStack installation.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "tools.opdev.io",
    version = "v1alpha1",
    kind = "BookStack",
    plural = "bookstacks",
    namespaced,
    status = "BookStackStatus"
)]
pub struct BookStackSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foo: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema)]
pub struct BookStackStatus {}

/// Every object a `BookStack` owns. Names are `<parent><suffix>` and must stay
/// stable for existing installations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Child {
    ServiceAccount,
    Service,
    AppConfigMap,
    DbConfigMap,
    AppSecret,
    DbSecret,
    AppVolume,
    DbVolume,
    AppClaim,
    DbClaim,
}

impl Child {
    pub const ALL: [Child; 10] = [
        Child::ServiceAccount,
        Child::Service,
        Child::AppConfigMap,
        Child::DbConfigMap,
        Child::AppSecret,
        Child::DbSecret,
        Child::AppVolume,
        Child::DbVolume,
        Child::AppClaim,
        Child::DbClaim,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Child::ServiceAccount => "-sa",
            Child::Service => "-svc",
            Child::AppConfigMap => "-cm",
            Child::DbConfigMap => "-db-cm",
            Child::AppSecret => "-secret",
            Child::DbSecret => "-db-secret",
            Child::AppVolume => "-pv",
            Child::DbVolume => "-db-pv",
            Child::AppClaim => "-pvc",
            Child::DbClaim => "-db-pvc",
        }
    }

    pub fn name_for(self, parent: &str) -> String {
        format!("{}{}", parent, self.suffix())
    }
}

impl BookStack {
    pub fn child_name(&self, child: Child) -> String {
        child.name_for(&self.name_any())
    }

    /// Namespace of the parent, which every namespaced child shares.
    pub fn namespace_or_default(&self) -> String {
        self.namespace().unwrap_or_else(|| "default".to_string())
    }
}
