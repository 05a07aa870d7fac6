use crate::error::{Error, Result};
use std::time::Duration;

pub const DEFAULT_FIELD_MANAGER: &str = "bookstack-operator";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageMode {
    /// Hand-built PersistentVolumes backed by a host path, bound by class name.
    HostPath { root: String, storage_class: String },
    /// Claims only; volumes are provisioned by the cluster.
    Dynamic { storage_class: Option<String> },
}

impl Default for StorageMode {
    fn default() -> Self {
        StorageMode::HostPath {
            root: "/mnt".to_string(),
            storage_class: "manual".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct OperatorConfig {
    pub field_manager: String,
    pub requeue_after: Duration,
    pub error_requeue: Duration,
    pub request_timeout: Duration,
    /// Host part of the `APP_URL` handed to the application.
    pub app_host: String,
    pub watch_namespace: Option<String>,
    pub storage: StorageMode,
    pub storage_size: String,
    pub db_password: Option<String>,
    pub db_admin_password: Option<String>,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            field_manager: DEFAULT_FIELD_MANAGER.to_string(),
            requeue_after: Duration::from_secs(300),
            error_requeue: Duration::from_secs(60),
            request_timeout: Duration::from_secs(10),
            app_host: "127.0.0.1".to_string(),
            watch_namespace: None,
            storage: StorageMode::default(),
            storage_size: "2Gi".to_string(),
            db_password: None,
            db_admin_password: None,
        }
    }
}

impl OperatorConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source, so callers can feed
    /// values from somewhere other than the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("BOOKSTACK_FIELD_MANAGER") {
            config.field_manager = val;
        }

        if let Some(val) = lookup("BOOKSTACK_REQUEUE_SECS") {
            config.requeue_after = parse_secs("BOOKSTACK_REQUEUE_SECS", &val)?;
        }

        if let Some(val) = lookup("BOOKSTACK_ERROR_REQUEUE_SECS") {
            config.error_requeue = parse_secs("BOOKSTACK_ERROR_REQUEUE_SECS", &val)?;
        }

        if let Some(val) = lookup("BOOKSTACK_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = parse_secs("BOOKSTACK_REQUEST_TIMEOUT_SECS", &val)?;
        }

        if let Some(val) = lookup("BOOKSTACK_APP_HOST") {
            config.app_host = val;
        }

        if let Some(val) = lookup("BOOKSTACK_WATCH_NAMESPACE") {
            config.watch_namespace = Some(val).filter(|ns| !ns.is_empty());
        }

        let storage_class = lookup("BOOKSTACK_STORAGE_CLASS").filter(|c| !c.is_empty());
        match lookup("BOOKSTACK_STORAGE").as_deref() {
            None | Some("host-path") => {
                let mut root = "/mnt".to_string();
                if let Some(val) = lookup("BOOKSTACK_STORAGE_ROOT") {
                    root = val;
                }
                config.storage = StorageMode::HostPath {
                    root,
                    storage_class: storage_class.unwrap_or_else(|| "manual".to_string()),
                };
            }
            Some("dynamic") => {
                config.storage = StorageMode::Dynamic { storage_class };
            }
            Some(other) => {
                return Err(Error::InvalidConfig(format!(
                    "BOOKSTACK_STORAGE must be host-path or dynamic, got {other}"
                )));
            }
        }

        if let Some(val) = lookup("BOOKSTACK_STORAGE_SIZE") {
            config.storage_size = parse_size("BOOKSTACK_STORAGE_SIZE", &val)?;
        }

        config.db_password = lookup("BOOKSTACK_DB_PASSWORD");
        config.db_admin_password = lookup("BOOKSTACK_DB_ADMIN_PASSWORD");

        Ok(config)
    }
}

fn parse_secs(key: &str, val: &str) -> Result<Duration> {
    val.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::InvalidConfig(format!("Invalid {key}: {val}")))
}

const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
const DECIMAL_SUFFIXES: [&str; 7] = ["", "k", "M", "G", "T", "P", "E"];

/// Accepts a whole-number quantity only in the form the API server echoes
/// back, so a stored PV or PVC compares equal to the desired one.
fn parse_size(key: &str, val: &str) -> Result<String> {
    let invalid = || Error::InvalidConfig(format!("Invalid {key}: {val}"));

    let split = val.find(|c: char| !c.is_ascii_digit()).unwrap_or(val.len());
    let (digits, suffix) = val.split_at(split);
    if digits.is_empty() {
        return Err(invalid());
    }
    let mut amount: u128 = digits.parse().map_err(|_| invalid())?;

    let (suffixes, base) = if suffix.ends_with('i') {
        (BINARY_SUFFIXES, 1024)
    } else {
        (DECIMAL_SUFFIXES, 1000)
    };
    let mut index = suffixes
        .iter()
        .position(|s| *s == suffix)
        .ok_or_else(invalid)?;

    while amount != 0 && amount % base == 0 && index + 1 < suffixes.len() {
        amount /= base;
        index += 1;
    }
    let canonical = if amount == 0 {
        "0".to_string()
    } else {
        format!("{amount}{}", suffixes[index])
    };

    if canonical != val {
        return Err(Error::InvalidConfig(format!(
            "{key} must be written as {canonical}, got {val}"
        )));
    }
    Ok(canonical)
}
