//! Desired state of every child, computed from the parent alone.
//!
//! Nothing here touches the cluster. The app ConfigMap depends on the node
//! port the platform assigned to the Service, which the caller reads and
//! passes in.

use crate::credentials::DatabaseCredentials;
use crate::crd::{BookStack, Child};
use crate::error::{Error, Result};
use crate::labels::{labels_for, selector_for};
use crate::types::{self, ChildResource, ServicePort};
use k8s_openapi::api::core::v1::{ConfigMap, Secret, Service, ServiceAccount};
use kube::ResourceExt;

pub const HTTP_PORT: i32 = 80;

const DATABASE: &str = "bookstackapp";
const DB_USER: &str = "bookstack";
const PGID: &str = "1000";
const PUID: &str = "1000";
const TZ: &str = "America/Chicago";

pub fn service_account(parent: &BookStack) -> ServiceAccount {
    types::ServiceAccount::new(parent.child_name(Child::ServiceAccount))
        .labels(labels_for(&parent.name_any()))
        .into_k8s(&parent.namespace_or_default())
}

pub fn service(parent: &BookStack) -> Service {
    let name = parent.name_any();
    types::Service::new(parent.child_name(Child::Service))
        .labels(labels_for(&name))
        .selector(selector_for(&name))
        .port(ServicePort::tcp("http", HTTP_PORT, HTTP_PORT))
        .node_port()
        .into_k8s(&parent.namespace_or_default())
}

/// First node port assigned to the Service.
pub fn node_port(service: &Service) -> Result<i32> {
    service
        .spec
        .as_ref()
        .and_then(|spec| spec.ports.as_ref())
        .and_then(|ports| ports.first())
        .and_then(|port| port.node_port)
        .filter(|port| *port > 0)
        .ok_or_else(|| Error::MissingNodePort(service.name_any()))
}

pub fn app_url(host: &str, node_port: i32) -> String {
    format!("http://{host}:{node_port}/")
}

pub fn app_config_map(parent: &BookStack, app_host: &str, node_port: i32) -> ConfigMap {
    types::ConfigMap::new(parent.child_name(Child::AppConfigMap))
        .labels(labels_for(&parent.name_any()))
        .data("APP_URL", app_url(app_host, node_port))
        .data("DB_DATABASE", DATABASE)
        .data("DB_HOST", "localhost")
        .data("DB_USER", DB_USER)
        .data("PGID", PGID)
        .data("PUID", PUID)
        .data("TZ", TZ)
        .into_k8s(&parent.namespace_or_default())
}

pub fn db_config_map(parent: &BookStack) -> ConfigMap {
    types::ConfigMap::new(parent.child_name(Child::DbConfigMap))
        .labels(labels_for(&parent.name_any()))
        .data("APP_URL", "http://127.0.0.1:6875/")
        .data("MYSQL_DATABASE", DATABASE)
        .data("MYSQL_USER", DB_USER)
        .data("PGID", PGID)
        .data("PUID", PUID)
        .data("TZ", TZ)
        .into_k8s(&parent.namespace_or_default())
}

pub fn app_secret(parent: &BookStack, credentials: &DatabaseCredentials) -> Secret {
    types::Secret::opaque(parent.child_name(Child::AppSecret))
        .labels(labels_for(&parent.name_any()))
        .data("DB_PASS", credentials.password.as_bytes())
        .into_k8s(&parent.namespace_or_default())
}

pub fn db_secret(parent: &BookStack, credentials: &DatabaseCredentials) -> Secret {
    types::Secret::opaque(parent.child_name(Child::DbSecret))
        .labels(labels_for(&parent.name_any()))
        .data("MYSQL_ADMIN_PASS", credentials.admin_password.as_bytes())
        .data("MYSQL_PASSWORD", credentials.password.as_bytes())
        .into_k8s(&parent.namespace_or_default())
}
