//! The image manifest: the images to mirror and where they go
//!
//! Persisted as YAML:
//!
//! ```yaml
//! target:
//!   path: mirror.example.com/team
//! sources:
//! - path: quay.io/coreos/etcd
//!   version: v3.5.0
//! - path: docker.io/library/nginx
//!   digest: sha256:abc123
//!   target:
//!     path: other.example.com
//! ```

use crate::error::{Error, Result};
use crate::registry_path::RegistryPath;
use crate::scan::ImageScanner;
use crate::source::Source;
use crate::target::{Auth, Target};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;
use tracing::debug;

/// Default manifest file name
pub const MANIFEST_FILE_NAME: &str = ".images.yaml";

/// A default target and the ordered list of images to mirror to it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub target: Target,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

impl Manifest {
    /// Create an empty manifest with a default target
    pub fn new(target_host: &str, target_repository: &str) -> Self {
        Self {
            target: Target::new(target_host, target_repository),
            sources: Vec::new(),
        }
    }

    /// Create a manifest from the images a scanner finds under `root`.
    ///
    /// The sources inherit the default target without copying it, so they
    /// are written without a target override.
    pub fn new_with_autodetect(
        target_host: &str,
        target_repository: &str,
        root: &Utf8Path,
        scanner: &dyn ImageScanner,
    ) -> Result<Self> {
        let mut manifest = Self::new(target_host, target_repository);

        let images = scanner
            .scan(root)
            .map_err(|e| Error::scan(root.as_str(), e))?;
        debug!("Found {} images under {}", images.len(), root);

        manifest.sources = images.iter().map(|image| Source::parse(image)).collect();

        Ok(manifest)
    }

    /// Decode a manifest and materialize every source's target. Fields a
    /// source's target leaves empty are copied from the default target.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut manifest: Manifest = serde_yaml_ng::from_str(content).map_err(Error::Decode)?;

        for (index, source) in manifest.sources.iter_mut().enumerate() {
            normalize_pins(source);

            if source.path.is_empty() {
                return Err(Error::invalid_manifest(format!("source {} has no path", index)));
            }

            if source.tag.is_some() && source.digest.is_some() {
                return Err(Error::invalid_manifest(format!(
                    "source {} ({}) has both a version and a digest",
                    index,
                    source.path
                )));
            }

            let target = source.target.get_or_insert_with(Target::default);
            if target.path.is_empty() {
                target.path = manifest.target.path.clone();
            }
            if target.auth.is_empty() {
                target.auth = manifest.target.auth.clone();
            }
        }

        Ok(manifest)
    }

    /// Encode the manifest. Target fields equal to the default target's are
    /// left out of source overrides, and an override with nothing left is
    /// dropped. Double quotes are stripped from the output.
    pub fn to_yaml(&self) -> Result<String> {
        let mut persisted = self.clone();
        for source in &mut persisted.sources {
            source.target = source
                .target
                .take()
                .and_then(|target| self.target_override(target));
        }

        let content = serde_yaml_ng::to_string(&persisted).map_err(Error::Encode)?;
        Ok(content.replace('"', ""))
    }

    /// Load a manifest file
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::manifest_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        Self::from_yaml(&content)
    }

    /// Write the manifest file, replacing any existing one
    pub fn write(&self, path: &Utf8Path) -> Result<()> {
        let content = self.to_yaml()?;
        fs::write(path, content)?;
        debug!("Wrote manifest with {} sources to {}", self.sources.len(), path);
        Ok(())
    }
}

impl Manifest {
    /// The part of `target` that differs from the default target
    fn target_override(&self, mut target: Target) -> Option<Target> {
        if target.path == self.target.path {
            target.path = RegistryPath::default();
        }
        if target.auth == self.target.auth {
            target.auth = Auth::default();
        }
        (!target.is_empty()).then_some(target)
    }
}

/// Treat empty `version`/`digest` values as absent
fn normalize_pins(source: &mut Source) {
    if source.tag.as_deref() == Some("") {
        source.tag = None;
    }
    if source.digest.as_deref() == Some("") {
        source.digest = None;
    }
}
