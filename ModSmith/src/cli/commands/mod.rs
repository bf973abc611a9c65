use clap::Subcommand;
use std::path::PathBuf;

use crate::config::MANIFEST_FILE;

pub mod inspect;
pub mod normalize;
pub mod resolve;
pub mod schemas;
pub mod validate;

#[derive(Subcommand)]
pub enum Commands {
    /// Check that .lsx files load against the standard schemas
    Validate {
        /// Files or directories (searched recursively for .lsx files)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Load an .lsx file and write it back in canonical form
    Normalize {
        /// Source .lsx file
        #[arg(short, long)]
        source: PathBuf,

        /// Destination file
        #[arg(short, long)]
        destination: PathBuf,

        /// Document version to write, e.g. 4.0.9.331 (defaults to the document type's)
        #[arg(long)]
        version: Option<String>,
    },

    /// Summarize the nodes in an .lsx file
    Inspect {
        /// Source .lsx file
        #[arg(short, long)]
        source: PathBuf,

        /// Dump the typed nodes as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the standard document and node types
    Schemas,

    /// Find a game file in the unpacked archives configured by a manifest
    Resolve {
        /// Project manifest
        #[arg(short, long, default_value = MANIFEST_FILE)]
        manifest: PathBuf,

        /// Virtual path, e.g. Shared/Public/Shared/Lists/SpellLists.lsx
        #[arg(short, long)]
        path: String,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Validate { paths } => validate::execute(paths),
            Commands::Normalize {
                source,
                destination,
                version,
            } => normalize::execute(source, destination, version.as_deref()),
            Commands::Inspect { source, json } => inspect::execute(source, *json),
            Commands::Schemas => schemas::execute(),
            Commands::Resolve { manifest, path } => resolve::execute(manifest, path),
        }
    }
}
