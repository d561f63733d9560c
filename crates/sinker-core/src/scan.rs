//! Image autodetection from Kubernetes manifests

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;
use serde_yaml_ng::Value;
use std::collections::BTreeSet;
use std::fs;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Keys whose values are lists of container specs
const CONTAINER_LIST_KEYS: &[&str] = &["containers", "initContainers", "ephemeralContainers"];

/// Finds raw image references (`host/repo:tag`) under a directory.
///
/// This abstracts the source tree scan so that manifest creation can be
/// tested without files on disk.
pub trait ImageScanner {
    fn scan(&self, root: &Utf8Path) -> Result<Vec<String>>;
}

/// Scans `*.yaml` / `*.yml` files for container images.
///
/// Every YAML document in every file is searched for `containers`,
/// `initContainers` and `ephemeralContainers` lists at any depth, so bare
/// Pods, workload templates and CronJobs are all covered. Files that are
/// not YAML (Helm templates, for instance) are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct KubernetesScanner;

impl ImageScanner for KubernetesScanner {
    fn scan(&self, root: &Utf8Path) -> Result<Vec<String>> {
        let mut images = BTreeSet::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", root))?;
            if !entry.file_type().is_file() || !is_yaml_file(entry.path()) {
                continue;
            }

            let content = fs::read_to_string(entry.path())
                .with_context(|| format!("Failed to read {}", entry.path().display()))?;

            match images_in_yaml(&content) {
                Ok(found) => {
                    trace!("{} images in {}", found.len(), entry.path().display());
                    images.extend(found);
                }
                Err(e) => debug!("Skipping {}: {}", entry.path().display(), e),
            }
        }

        Ok(images.into_iter().collect())
    }
}

fn is_yaml_file(path: &std::path::Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// All container images in a (possibly multi-document) YAML string
pub fn images_in_yaml(content: &str) -> Result<Vec<String>> {
    let mut images = Vec::new();

    for document in serde_yaml_ng::Deserializer::from_str(content) {
        let value = Value::deserialize(document)?;
        collect_images(&value, &mut images);
    }

    Ok(images)
}

fn collect_images(value: &Value, images: &mut Vec<String>) {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                let is_container_list = key
                    .as_str()
                    .is_some_and(|key| CONTAINER_LIST_KEYS.contains(&key));

                if let (true, Some(containers)) = (is_container_list, child.as_sequence()) {
                    images.extend(
                        containers
                            .iter()
                            .filter_map(|container| container.get("image"))
                            .filter_map(Value::as_str)
                            .filter(|image| !image.is_empty())
                            .map(str::to_string),
                    );
                }

                collect_images(child, images);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                collect_images(item, images);
            }
        }
        Value::Tagged(tagged) => collect_images(&tagged.value, images),
        _ => {}
    }
}
