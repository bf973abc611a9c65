//! CLI command for validating `.lsx` files against the standard schemas

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog;

/// Expand directories into the `.lsx` files below them, sorted by path.
/// Plain file arguments are kept whatever their extension.
pub fn collect_lsx_files(paths: &[PathBuf]) -> crate::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("lsx"))
            {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

pub fn execute(paths: &[PathBuf]) -> anyhow::Result<()> {
    let registry = catalog::standard()?.registry();
    let files = collect_lsx_files(paths)?;
    if files.is_empty() {
        anyhow::bail!("No .lsx files found");
    }

    let mut failures = 0usize;
    for file in &files {
        match registry.load(file) {
            Ok(doc) => println!(
                "OK    {} ({}, {} nodes)",
                display(file),
                doc.doc_type().name(),
                doc.children().len()
            ),
            Err(e) => {
                failures += 1;
                println!("FAIL  {}: {e}", display(file));
            }
        }
    }

    println!("\n{} files checked, {failures} failed", files.len());
    if failures > 0 {
        anyhow::bail!("{failures} of {} files failed validation", files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collects_lsx_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("Public/MyMod/Tags");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("b.lsx"), "").unwrap();
        fs::write(nested.join("a.LSX"), "").unwrap();
        fs::write(nested.join("notes.txt"), "").unwrap();
        let loose = dir.path().join("loose.xml");
        fs::write(&loose, "").unwrap();

        let files = collect_lsx_files(&[dir.path().join("Public"), loose.clone()]).unwrap();
        assert_eq!(files, vec![nested.join("a.LSX"), nested.join("b.lsx"), loose]);
    }
}
