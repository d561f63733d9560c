//! Error types for sinker-core

use thiserror::Error;

/// Result type alias using sinker-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Sinker
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest bytes are not well-formed YAML for the manifest shape
    #[error("Failed to decode manifest: {0}")]
    Decode(#[source] serde_yaml_ng::Error),

    /// Manifest could not be serialized
    #[error("Failed to encode manifest: {0}")]
    Encode(#[source] serde_yaml_ng::Error),

    /// Well-formed manifest that violates a model invariant
    #[error("Invalid manifest: {message}")]
    InvalidManifest { message: String },

    /// Manifest file not found
    #[error("Manifest file not found: {path}")]
    ManifestNotFound { path: String },

    /// Tag is not a semantic version
    #[error("Invalid version format: {version}")]
    VersionParse { version: String },

    /// The registry could not list the tags of an image's repository
    #[error("Failed to list tags for {image}: {source}")]
    RegistryList {
        image: String,
        #[source]
        source: anyhow::Error,
    },

    /// Image autodetection failed
    #[error("Failed to scan {path} for images: {source}")]
    Scan {
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid manifest error
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    /// Create a manifest not found error
    pub fn manifest_not_found(path: impl Into<String>) -> Self {
        Self::ManifestNotFound { path: path.into() }
    }

    /// Create a version parse error
    pub fn version_parse(version: impl Into<String>) -> Self {
        Self::VersionParse {
            version: version.into(),
        }
    }

    /// Create a registry list error for an image
    pub fn registry_list(image: impl Into<String>, source: anyhow::Error) -> Self {
        Self::RegistryList {
            image: image.into(),
            source,
        }
    }

    /// Create a scan error for a root path
    pub fn scan(path: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }
}
