//! List command

use anyhow::{Context, Result};
use sinker_core::Manifest;
use std::fs::File;
use std::io::Write;

use crate::cli::{ListArgs, Location};
use crate::settings::Settings;

pub fn run(args: ListArgs, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    let manifest = Manifest::load(&settings.manifest_path)
        .with_context(|| format!("Failed to load manifest {}", settings.manifest_path))?;

    let images = list_images(&manifest, args.location);

    match &args.output {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("Failed to create {}", path))?;
            write_images(&mut file, &images)
                .with_context(|| format!("Failed to write images to {}", path))?;
        }
        None => write_images(out, &images)?,
    }

    Ok(())
}

/// Source or target references of every image in the manifest
pub fn list_images(manifest: &Manifest, location: Location) -> Vec<String> {
    manifest
        .sources
        .iter()
        .map(|source| match location {
            Location::Source => source.image(),
            Location::Target => source.target_image(),
        })
        .collect()
}

fn write_images(out: &mut dyn Write, images: &[String]) -> std::io::Result<()> {
    for image in images {
        writeln!(out, "{}", image)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = "\
target:
  path: mirror.com/team
sources:
- path: quay.io/coreos/etcd
  version: v3.5.0
- path: docker.io/library/nginx
  digest: sha256:abc123
  target:
    path: other.com
";

    fn setup() -> (TempDir, Settings) {
        let dir = TempDir::new().unwrap();
        let manifest_path = Utf8Path::from_path(dir.path()).unwrap().join(".images.yaml");
        fs::write(&manifest_path, MANIFEST).unwrap();
        (dir, Settings { manifest_path })
    }

    #[test]
    fn test_list_sources() {
        let (_dir, settings) = setup();
        let mut out = Vec::new();

        let args = ListArgs {
            location: Location::Source,
            output: None,
        };
        run(args, &settings, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "quay.io/coreos/etcd:v3.5.0\ndocker.io/library/nginx@sha256:abc123\n"
        );
    }

    #[test]
    fn test_list_targets_to_file() {
        let (dir, settings) = setup();
        let output = Utf8Path::from_path(dir.path()).unwrap().join("targets.txt");
        let mut out = Vec::new();

        let args = ListArgs {
            location: Location::Target,
            output: Some(output.clone()),
        };
        run(args, &settings, &mut out).unwrap();

        assert!(out.is_empty());
        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "mirror.com/team/coreos/etcd:v3.5.0\nother.com/library/nginx:abc123\n"
        );
    }

    #[test]
    fn test_list_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            manifest_path: Utf8Path::from_path(dir.path()).unwrap().join("missing.yaml"),
        };

        let args = ListArgs {
            location: Location::Source,
            output: None,
        };
        let err = run(args, &settings, &mut Vec::new()).unwrap_err();
        assert!(format!("{:#}", err).contains("not found"));
    }
}
