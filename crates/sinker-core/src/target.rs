//! Mirror destinations and registry credentials

use crate::registry_path::RegistryPath;
use serde::{Deserialize, Serialize};

/// Username and password to log into a registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auth {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl Auth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }
}

/// Registry host and repository prefix that images are mirrored to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default, skip_serializing_if = "RegistryPath::is_empty")]
    pub path: RegistryPath,
    #[serde(default, skip_serializing_if = "Auth::is_empty")]
    pub auth: Auth,
}

impl Target {
    /// Create a target from a host and a repository prefix, which may be empty
    pub fn new(host: &str, repository: &str) -> Self {
        Self {
            path: RegistryPath::from_parts(host, repository),
            auth: Auth::default(),
        }
    }

    /// Attach credentials for the target registry
    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn host(&self) -> &str {
        self.path.host()
    }

    pub fn repository(&self) -> &str {
        self.path.repository()
    }

    /// True for the zero value, which sources treat as "inherit the default"
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.auth.is_empty()
    }
}
