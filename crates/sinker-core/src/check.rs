//! Upstream update checks for tag-pinned sources

use crate::error::{Error, Result};
use crate::source::Source;
use crate::version::{filter_tags, newer_versions, ImageVersion};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, info, warn};

/// Trait for listing the tags of a repository in a container registry.
///
/// This abstracts the registry interaction so that sinker-core does not
/// depend on the concrete sinker-registry crate. Implementors live in
/// sinker-registry (or tests can provide a mock).
pub trait TagLister: Send + Sync {
    /// List all tags of `repository` on `host`, in the order the registry
    /// reports them. An empty `host` means the registry's default.
    fn list_tags<'a>(
        &'a self,
        host: &'a str,
        repository: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<Vec<String>>> + Send + 'a>>;
}

/// Result of checking one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CheckStatus {
    /// Pinned by digest or not pinned; nothing to compare
    Unversioned,
    /// The current tag is not a version
    Unparsable,
    UpToDate,
    /// Newer release tags, at most five, in registry order
    Outdated { newer: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub image: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

impl CheckReport {
    fn new(source: &Source, status: CheckStatus) -> Self {
        Self {
            image: source.image(),
            status,
        }
    }
}

/// Check each source for newer release tags, one at a time and in order.
///
/// A tag that is not a version is reported and skipped. Failing to list a
/// registry's tags aborts the whole check.
pub async fn check_sources(lister: &dyn TagLister, sources: &[Source]) -> Result<Vec<CheckReport>> {
    let mut reports = Vec::with_capacity(sources.len());

    for source in sources {
        let status = check_source(lister, source).await?;
        reports.push(CheckReport::new(source, status));
    }

    Ok(reports)
}

/// Check a single source for newer release tags
pub async fn check_source(lister: &dyn TagLister, source: &Source) -> Result<CheckStatus> {
    let Some(tag) = source.tag() else {
        debug!("[CHECK] Image {} is not pinned to a tag. Skipping ...", source);
        return Ok(CheckStatus::Unversioned);
    };

    let current = match ImageVersion::parse(tag) {
        Ok(version) => version,
        Err(_) => {
            warn!("[CHECK] Image {} version did not parse correctly. Skipping ...", source);
            return Ok(CheckStatus::Unparsable);
        }
    };

    let tags = lister
        .list_tags(source.host(), source.repository())
        .await
        .map_err(|e| Error::registry_list(source.image(), e))?;
    debug!("[CHECK] {} tags listed for {}", tags.len(), source);

    let newer = newer_versions(&current, &filter_tags(&tags));
    if newer.is_empty() {
        info!("[CHECK] Image {} is up to date!", source);
        return Ok(CheckStatus::UpToDate);
    }

    info!("[CHECK] New versions for {} found: {}", source, newer.join(", "));
    Ok(CheckStatus::Outdated { newer })
}
