//! CLI command for locating a game file in the unpacked archives

use std::path::Path;

use crate::archive::{ArchiveSource, UnpackedArchives};
use crate::config::ProjectManifest;

pub fn execute(manifest: &Path, virtual_path: &str) -> anyhow::Result<()> {
    let manifest = ProjectManifest::load(manifest)?;
    let Some(root) = manifest.unpacked_dir()? else {
        anyhow::bail!("Manifest has no [paths] unpacked directory");
    };

    let path = UnpackedArchives::new(root).get_path(virtual_path)?;
    println!("{}", path.display());
    Ok(())
}
