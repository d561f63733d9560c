//! Registry path parsing
//!
//! A registry path is the `host/repository` part of an image reference,
//! without the tag or digest. When parsing text, the host is everything
//! before the first `/`; text without any `/` has no host and is a
//! repository on its own. This cannot tell a bare host from a one-segment
//! repository, so `registry.com` always parses as a repository.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Parsed `host/repository` location
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RegistryPath {
    host: String,
    repository: String,
}

impl RegistryPath {
    /// Parse a registry path. Every string is accepted.
    pub fn new(raw: &str) -> Self {
        match raw.split_once('/') {
            Some((host, repository)) if !host.is_empty() => Self {
                host: host.to_string(),
                repository: repository.to_string(),
            },
            _ => Self {
                host: String::new(),
                repository: raw.to_string(),
            },
        }
    }

    /// Build a path from an already separated host and repository.
    ///
    /// Unlike [`RegistryPath::new`] this keeps a host without a repository,
    /// but such a path renders as the bare host and parses back as a
    /// repository.
    pub fn from_parts(host: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            repository: repository.into(),
        }
    }

    /// Registry host, or `""` when there is none
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Repository below the host
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_empty() && self.repository.is_empty()
    }
}

impl fmt::Display for RegistryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.host.is_empty(), self.repository.is_empty()) {
            (true, _) => f.write_str(&self.repository),
            (false, true) => f.write_str(&self.host),
            (false, false) => write!(f, "{}/{}", self.host, self.repository),
        }
    }
}

impl FromStr for RegistryPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for RegistryPath {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for RegistryPath {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<RegistryPath> for String {
    fn from(path: RegistryPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_without_separator_has_no_host() {
        for raw in ["", "repo", "registry.com", "localhost:5000"] {
            let path = RegistryPath::new(raw);
            assert_eq!(path.host(), "", "host of {:?}", raw);
            assert_eq!(path.repository(), raw, "repository of {:?}", raw);
        }
    }

    #[test]
    fn test_host_and_repository() {
        let cases = [
            ("source.com/repo", "source.com", "repo"),
            ("source.com/repo/foo", "source.com", "repo/foo"),
            ("localhost:5000/app", "localhost:5000", "app"),
            ("a/a/a", "a", "a/a"),
            ("host/", "host", ""),
        ];

        for (raw, host, repository) in cases {
            let path = RegistryPath::new(raw);
            assert_eq!(path.host(), host, "host of {}", raw);
            assert_eq!(path.repository(), repository, "repository of {}", raw);
        }
    }

    #[test]
    fn test_leading_separator_is_not_a_host() {
        let path = RegistryPath::new("/repo");
        assert_eq!(path.host(), "");
        assert_eq!(path.repository(), "/repo");
        assert_eq!(path.to_string(), "/repo");
    }

    #[test]
    fn test_consecutive_separators() {
        let path = RegistryPath::new("host//repo");
        assert_eq!(path.host(), "host");
        assert_eq!(path.repository(), "/repo");
        assert_eq!(path.to_string(), "host//repo");
    }

    #[test]
    fn test_from_parts_keeps_bare_host() {
        let path = RegistryPath::from_parts("target.com", "");
        assert_eq!(path.host(), "target.com");
        assert_eq!(path.repository(), "");
        assert_eq!(path.to_string(), "target.com");

        // Rendered and parsed again, the bare host becomes a repository
        let reparsed = RegistryPath::new(&path.to_string());
        assert_eq!(reparsed.host(), "");
        assert_eq!(reparsed.repository(), "target.com");

        assert!(RegistryPath::from_parts("", "").is_empty());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let path: RegistryPath = serde_yaml_ng::from_str("source.com/repo").unwrap();
        assert_eq!(path, RegistryPath::from_parts("source.com", "repo"));

        let yaml = serde_yaml_ng::to_string(&path).unwrap();
        assert_eq!(yaml.trim(), "source.com/repo");
    }
}
