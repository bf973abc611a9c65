//! CLI command for rewriting an `.lsx` file in canonical form

use std::path::Path;

use crate::catalog;
use crate::formats::lsx::LsxVersion;

pub fn execute(source: &Path, destination: &Path, version: Option<&str>) -> anyhow::Result<()> {
    let version = version
        .map(|v| {
            v.parse::<LsxVersion>()
                .map_err(|e| anyhow::anyhow!("Invalid version '{v}': {e}"))
        })
        .transpose()?;

    let doc = catalog::standard()?.registry().load(source)?;
    let version = version.or(doc.doc_type().default_version());
    doc.write_to(destination, version)?;

    println!(
        "Normalized {} ({} nodes) -> {}",
        doc.doc_type().name(),
        doc.children().len(),
        destination.display()
    );
    Ok(())
}
