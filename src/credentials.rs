//! Where database credentials for the generated Secrets come from.

use crate::config::OperatorConfig;
use crate::crd::BookStack;
use tracing::warn;

/// Password values handed to the app and db Secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub password: String,
    pub admin_password: String,
}

impl std::fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("password", &"<redacted>")
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

pub trait CredentialSource: Send + Sync {
    /// Must return the same values for the same parent on every call, or each
    /// reconciliation rewrites the Secrets.
    fn database(&self, parent: &BookStack) -> DatabaseCredentials;
}

/// Fixed credentials shared by every parent.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    credentials: DatabaseCredentials,
}

impl StaticCredentials {
    pub fn new(password: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            credentials: DatabaseCredentials {
                password: password.into(),
                admin_password: admin_password.into(),
            },
        }
    }

    /// Well-known values. Not for production use.
    pub fn placeholder() -> Self {
        Self::new("hunter2", "superhunter2")
    }

    /// Uses the configured passwords, falling back to the placeholder values
    /// for whichever one is unset.
    pub fn from_config(config: &OperatorConfig) -> Self {
        let placeholder = Self::placeholder().credentials;
        if config.db_password.is_none() || config.db_admin_password.is_none() {
            warn!("database passwords not configured, using placeholder credentials");
        }
        Self::new(
            config.db_password.clone().unwrap_or(placeholder.password),
            config
                .db_admin_password
                .clone()
                .unwrap_or(placeholder.admin_password),
        )
    }
}

impl CredentialSource for StaticCredentials {
    fn database(&self, _parent: &BookStack) -> DatabaseCredentials {
        self.credentials.clone()
    }
}
