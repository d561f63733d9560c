//! Check command

use anyhow::{Context, Result};
use sinker_core::{check_sources, CheckStatus, Manifest, Source, TagLister};
use sinker_registry::RegistryClient;
use std::io::Write;
use tracing::debug;

use crate::cli::CheckArgs;
use crate::settings::Settings;

pub async fn run(args: CheckArgs, settings: &Settings, out: &mut dyn Write) -> Result<()> {
    let (sources, client) = if args.images.is_empty() {
        let manifest = Manifest::load(&settings.manifest_path)
            .with_context(|| format!("Failed to load manifest {}", settings.manifest_path))?;
        let client = registry_client(&manifest.sources)?;
        (manifest.sources, client)
    } else {
        debug!("Checking {} images given on the command line", args.images.len());
        let sources: Vec<Source> = args.images.iter().map(|image| Source::parse(image)).collect();
        (sources, RegistryClient::new()?)
    };

    check(&client, &sources, args.json, out).await
}

/// Registry client carrying the credentials of every source
fn registry_client(sources: &[Source]) -> Result<RegistryClient> {
    let client = sources
        .iter()
        .fold(RegistryClient::new()?, |client, source| {
            client.with_credentials(source.host(), source.auth.clone())
        });
    Ok(client)
}

async fn check(
    lister: &dyn TagLister,
    sources: &[Source],
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let reports = check_sources(lister, sources)
        .await
        .context("Failed to check for newer images")?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &reports)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut outdated = 0;
    for report in &reports {
        if let CheckStatus::Outdated { newer } = &report.status {
            writeln!(out, "{}: {}", report.image, newer.join(", "))?;
            outdated += 1;
        }
    }
    writeln!(
        out,
        "{} of {} images have newer versions",
        outdated,
        reports.len()
    )?;

    Ok(())
}
