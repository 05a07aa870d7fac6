use super::{Labels, Selector};
use crate::types::ChildResource;
use k8s_openapi::api::core::v1 as k8s;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use k8s_openapi::ByteString;
use std::collections::BTreeMap;

fn namespaced_meta(name: String, namespace: &str, labels: Labels) -> ObjectMeta {
    ObjectMeta {
        name: Some(name),
        namespace: Some(namespace.to_string()),
        labels: labels.into_option(),
        ..Default::default()
    }
}

#[derive(Clone, Debug)]
pub struct ConfigMap {
    pub name: String,
    pub labels: Labels,
    pub data: BTreeMap<String, String>,
}

impl ConfigMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Labels::new(),
            data: BTreeMap::new(),
        }
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

impl ChildResource for ConfigMap {
    type K8sType = k8s::ConfigMap;

    fn into_k8s(self, namespace: &str) -> Self::K8sType {
        k8s::ConfigMap {
            metadata: namespaced_meta(self.name, namespace, self.labels),
            data: if self.data.is_empty() {
                None
            } else {
                Some(self.data)
            },
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct Secret {
    pub name: String,
    pub labels: Labels,
    pub type_: Option<String>,
    pub data: BTreeMap<String, Vec<u8>>,
}

impl Secret {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Labels::new(),
            type_: None,
            data: BTreeMap::new(),
        }
    }

    pub fn opaque(name: impl Into<String>) -> Self {
        Self::new(name).type_("Opaque")
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn type_(mut self, t: impl Into<String>) -> Self {
        self.type_ = Some(t.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

impl ChildResource for Secret {
    type K8sType = k8s::Secret;

    fn into_k8s(self, namespace: &str) -> Self::K8sType {
        k8s::Secret {
            metadata: namespaced_meta(self.name, namespace, self.labels),
            type_: self.type_,
            data: if self.data.is_empty() {
                None
            } else {
                Some(
                    self.data
                        .into_iter()
                        .map(|(k, v)| (k, ByteString(v)))
                        .collect(),
                )
            },
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct Service {
    pub name: String,
    pub labels: Labels,
    pub selector: Selector,
    pub ports: Vec<ServicePort>,
    pub type_: Option<String>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Labels::new(),
            selector: Selector::new(),
            ports: Vec::new(),
            type_: None,
        }
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    pub fn selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    pub fn port(mut self, port: ServicePort) -> Self {
        self.ports.push(port);
        self
    }

    /// Exposes every port on a cluster-assigned node port.
    pub fn node_port(mut self) -> Self {
        self.type_ = Some("NodePort".to_string());
        self
    }
}

impl ChildResource for Service {
    type K8sType = k8s::Service;

    fn into_k8s(self, namespace: &str) -> Self::K8sType {
        let selector = self.selector.into_inner();
        k8s::Service {
            metadata: namespaced_meta(self.name, namespace, self.labels),
            spec: Some(k8s::ServiceSpec {
                selector: if selector.is_empty() {
                    None
                } else {
                    Some(selector)
                },
                ports: if self.ports.is_empty() {
                    None
                } else {
                    Some(self.ports.into_iter().map(|p| p.into_k8s()).collect())
                },
                type_: self.type_,
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServicePort {
    pub name: Option<String>,
    pub port: i32,
    pub target_port: Option<i32>,
    pub protocol: Option<String>,
}

impl ServicePort {
    pub fn tcp(name: impl Into<String>, port: i32, target_port: i32) -> Self {
        Self {
            name: Some(name.into()),
            port,
            target_port: Some(target_port),
            protocol: Some("TCP".to_string()),
        }
    }

    pub fn into_k8s(self) -> k8s::ServicePort {
        k8s::ServicePort {
            name: self.name,
            port: self.port,
            target_port: self.target_port.map(IntOrString::Int),
            protocol: self.protocol,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServiceAccount {
    pub name: String,
    pub labels: Labels,
}

impl ServiceAccount {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: Labels::new(),
        }
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }
}

impl ChildResource for ServiceAccount {
    type K8sType = k8s::ServiceAccount;

    fn into_k8s(self, namespace: &str) -> Self::K8sType {
        k8s::ServiceAccount {
            metadata: namespaced_meta(self.name, namespace, self.labels),
            ..Default::default()
        }
    }
}
