//! Resolved settings handed to every command

use camino::Utf8PathBuf;

use crate::cli::Cli;

/// Everything a command needs from the command line besides its own args
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the image manifest
    pub manifest_path: Utf8PathBuf,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            manifest_path: cli.manifest.clone(),
        }
    }
}
