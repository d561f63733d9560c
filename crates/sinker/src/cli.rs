//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sinker_core::MANIFEST_FILE_NAME;

/// Sinker - Mirror container images between registries
#[derive(Parser, Debug)]
#[command(name = "sinker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the image manifest
    #[arg(short, long, global = true, env = "SINKER_MANIFEST", default_value = MANIFEST_FILE_NAME)]
    pub manifest: Utf8PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new image manifest
    Create(CreateArgs),

    /// List the images found in the image manifest
    List(ListArgs),

    /// Check for newer images in the source registry
    Check(CheckArgs),
}

// Create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Directory of Kubernetes manifests to find images in
    pub path: Option<Utf8PathBuf>,

    /// The target repository to sync images to (e.g. organization.com/repo)
    #[arg(short, long)]
    pub target: String,
}

// List command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Which side of the mirror to list
    #[arg(value_enum, default_value_t = Location::Source)]
    pub location: Location,

    /// Output the images in the manifest to a file
    #[arg(short, long)]
    pub output: Option<Utf8PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Source,
    Target,
}

// Check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// The fully qualified images to check if newer versions exist (e.g. myhost.com/myrepo:v1.0.0)
    #[arg(short, long, value_delimiter = ',')]
    pub images: Vec<String>,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}
