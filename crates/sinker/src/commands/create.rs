//! Create command

use anyhow::{anyhow, Context, Result};
use sinker_core::{KubernetesScanner, Manifest, RegistryPath};

use crate::cli::CreateArgs;
use crate::output;
use crate::settings::Settings;

pub fn run(args: CreateArgs, settings: &Settings) -> Result<()> {
    let manifest_path = &settings.manifest_path;
    if manifest_path.exists() {
        return Err(anyhow!("Manifest file {} already exists", manifest_path));
    }

    let target = RegistryPath::new(&args.target);

    let manifest = match &args.path {
        Some(path) => Manifest::new_with_autodetect(
            target.host(),
            target.repository(),
            path,
            &KubernetesScanner,
        )
        .context("Failed to create manifest with autodetect")?,
        None => Manifest::new(target.host(), target.repository()),
    };

    manifest
        .write(manifest_path)
        .with_context(|| format!("Failed to write manifest {}", manifest_path))?;

    output::success(&format!("Created {}", manifest_path));
    if !manifest.sources.is_empty() {
        output::info(&format!("Found {} images", manifest.sources.len()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::{Utf8Path, Utf8PathBuf};
    use std::fs;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> Settings {
        let root = Utf8Path::from_path(dir.path()).unwrap();
        Settings {
            manifest_path: root.join(".images.yaml"),
        }
    }

    fn create_args(path: Option<Utf8PathBuf>, target: &str) -> CreateArgs {
        CreateArgs {
            path,
            target: target.to_string(),
        }
    }

    #[test]
    fn test_create_empty_manifest() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);

        run(create_args(None, "mirror.com/team"), &settings).unwrap();

        let content = fs::read_to_string(&settings.manifest_path).unwrap();
        assert_eq!(content, "target:\n  path: mirror.com/team\n");
    }

    #[test]
    fn test_create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        fs::write(&settings.manifest_path, "target:\n  path: keep.com\n").unwrap();

        let err = run(create_args(None, "mirror.com"), &settings).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let content = fs::read_to_string(&settings.manifest_path).unwrap();
        assert_eq!(content, "target:\n  path: keep.com\n");
    }

    #[test]
    fn test_create_with_autodetect() {
        let dir = TempDir::new().unwrap();
        let settings = settings(&dir);
        let deploy = Utf8Path::from_path(dir.path()).unwrap().join("deploy");
        fs::create_dir_all(&deploy).unwrap();
        fs::write(
            deploy.join("pod.yaml"),
            "kind: Pod\nspec:\n  containers:\n  - image: quay.io/coreos/etcd:v3.5.0\n",
        )
        .unwrap();

        run(create_args(Some(deploy), "mirror.com/team"), &settings).unwrap();

        let manifest = Manifest::load(&settings.manifest_path).unwrap();
        assert_eq!(manifest.sources.len(), 1);
        assert_eq!(
            manifest.sources[0].target_image(),
            "mirror.com/team/coreos/etcd:v3.5.0"
        );
    }
}
