//! # sinker-core
//!
//! Core library for the Sinker CLI providing:
//! - Registry path parsing (`host/repository`)
//! - Source and target image references
//! - The image manifest (`.images.yaml`) with default target inheritance
//! - Version parsing, release tag filtering and upstream update checks
//! - Image autodetection from Kubernetes manifests

pub mod check;
pub mod error;
pub mod manifest;
pub mod registry_path;
pub mod scan;
pub mod source;
pub mod target;
pub mod version;

pub use check::{check_source, check_sources, CheckReport, CheckStatus, TagLister};
pub use error::{Error, Result};
pub use manifest::{Manifest, MANIFEST_FILE_NAME};
pub use registry_path::RegistryPath;
pub use scan::{ImageScanner, KubernetesScanner};
pub use source::Source;
pub use target::{Auth, Target};
pub use version::ImageVersion;
