use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Owner reference error: {0}")]
    Ownership(String),

    #[error("Service {0} has no assigned node port")]
    MissingNodePort(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Resource version conflict on {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

impl Error {
    /// Maps an API status response onto the store taxonomy. Anything that is
    /// not a 404/409 stays a transport error.
    pub fn from_api(err: kube::Error, object: &str) -> Self {
        match &err {
            kube::Error::Api(resp) if resp.code == 404 => Error::NotFound(object.to_string()),
            kube::Error::Api(resp) if resp.code == 409 && resp.reason == "AlreadyExists" => {
                Error::AlreadyExists(object.to_string())
            }
            kube::Error::Api(resp) if resp.code == 409 => Error::Conflict(object.to_string()),
            _ => Error::Kube(err),
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
