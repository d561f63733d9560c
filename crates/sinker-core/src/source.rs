//! Source images and their mirrored target locations

use crate::registry_path::RegistryPath;
use crate::target::{Auth, Target};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag used on the target when the source is not pinned to a version
pub const DEFAULT_TARGET_TAG: &str = "latest";

/// One image to mirror, pinned by tag or by digest (or not at all)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Registry host and repository of the source image
    #[serde(default)]
    pub path: RegistryPath,
    /// Tag (e.g. "v1.0.0") - mutually exclusive with digest
    #[serde(rename = "version", default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Digest (e.g. "sha256:abc123...") - mutually exclusive with tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Target override, `None` inherits the manifest's target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default, skip_serializing_if = "Auth::is_empty")]
    pub auth: Auth,
}

impl Source {
    /// Create an unpinned source
    pub fn new(host: &str, repository: &str) -> Self {
        Self {
            path: RegistryPath::from_parts(host, repository),
            ..Default::default()
        }
    }

    /// Pin the source to a tag, dropping any digest
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self.digest = None;
        self
    }

    /// Pin the source to a digest, dropping any tag
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self.tag = None;
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    /// Parse a raw image reference like `registry.com/org/app:v1.0.0`.
    ///
    /// A digest (`@sha256:...`) wins over a tag. A `:` only starts a tag
    /// when it comes after the last `/`, so `localhost:5000/app` has no tag.
    pub fn parse(image: &str) -> Self {
        let image = image.trim();

        if let Some((name, digest)) = image.rsplit_once('@') {
            let (name, _) = split_tag(name);
            return Self::from_path(name).with_digest(digest);
        }

        match split_tag(image) {
            (name, Some(tag)) => Self::from_path(name).with_tag(tag),
            (name, None) => Self::from_path(name),
        }
    }

    fn from_path(path: &str) -> Self {
        Self {
            path: RegistryPath::new(path),
            ..Default::default()
        }
    }

    pub fn host(&self) -> &str {
        self.path.host()
    }

    pub fn repository(&self) -> &str {
        self.path.repository()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The source image reference, e.g. `source.com/repo:v1.0.0` or
    /// `source.com/repo@sha256:123`
    pub fn image(&self) -> String {
        let path = self.path.to_string();
        match (&self.digest, &self.tag) {
            (Some(digest), _) => format!("{}@{}", path, digest),
            (None, Some(tag)) => format!("{}:{}", path, tag),
            (None, None) => path,
        }
    }

    /// The image reference this source is mirrored to.
    ///
    /// The source repository is nested under the target's host and
    /// repository prefix. The target is always tag-addressed: a digest pin
    /// becomes a tag made of the digest's hash, and an unpinned source is
    /// pushed as `latest`.
    pub fn target_image(&self) -> String {
        let version = match (&self.tag, &self.digest) {
            (Some(tag), _) => tag.as_str(),
            (None, Some(digest)) => digest_hash(digest),
            (None, None) => DEFAULT_TARGET_TAG,
        };

        let (target_host, target_repository) = match &self.target {
            Some(target) => (target.host(), target.repository()),
            None => ("", ""),
        };

        let location = [target_host, target_repository, self.repository()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("/");

        format!("{}:{}", location.trim_start_matches('/'), version)
    }

    /// Target override if one is set, otherwise the empty target
    pub fn effective_target(&self) -> Target {
        self.target.clone().unwrap_or_default()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.image())
    }
}

/// Split `name:tag` where the `:` comes after the last `/`
fn split_tag(image: &str) -> (&str, Option<&str>) {
    let slash = image.rfind('/');
    match image.rfind(':') {
        Some(colon) if slash.map_or(true, |slash| colon > slash) => {
            let tag = &image[colon + 1..];
            (&image[..colon], (!tag.is_empty()).then_some(tag))
        }
        _ => (image, None),
    }
}

/// Hash portion of `algorithm:hash`. A digest without an algorithm label
/// is used whole.
fn digest_hash(digest: &str) -> &str {
    digest.split_once(':').map_or(digest, |(_, hash)| hash)
}
