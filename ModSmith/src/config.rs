//! Project manifest types for modsmith.toml
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::formats::lsx::LsxVersion;
use crate::schema::PathVars;

/// File name looked up by the CLI when no manifest is given.
pub const MANIFEST_FILE: &str = "modsmith.toml";

fn default_output_dir() -> String {
    "build".to_string()
}

fn default_lsx_version() -> String {
    "4.0.9.331".to_string()
}

/// The full project manifest (modsmith.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    pub project: ProjectMeta,
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub lsx: LsxSettings,
    /// Extra path template values
    #[serde(default)]
    pub variables: HashMap<String, String>,
    /// Directory holding the manifest; relative paths resolve against it
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Mod project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    /// Mod folder name, used as the `{folder}` path variable
    pub folder: String,
}

/// Filesystem locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory of unpacked game archives
    #[serde(default)]
    pub unpacked: Option<String>,
    #[serde(default = "default_output_dir")]
    pub output: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            unpacked: None,
            output: default_output_dir(),
        }
    }
}

/// Document output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LsxSettings {
    /// Dotted `<version>` written into generated documents
    #[serde(default = "default_lsx_version")]
    pub version: String,
}

impl Default for LsxSettings {
    fn default() -> Self {
        Self {
            version: default_lsx_version(),
        }
    }
}

impl ProjectManifest {
    /// Read a manifest from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Reading manifest: {}", path.display());
        let mut manifest = Self::parse(&fs::read_to_string(path)?)?;
        manifest.base_dir = path.parent().map(Path::to_path_buf);
        Ok(manifest)
    }

    /// Parse manifest TOML.
    ///
    /// # Errors
    /// Returns [`Error::TomlError`] for malformed TOML or missing fields, and
    /// [`Error::InvalidManifest`] for an empty project folder.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        if manifest.project.folder.trim().is_empty() {
            return Err(Error::InvalidManifest("project.folder is empty".to_string()));
        }
        Ok(manifest)
    }

    /// Placeholder values for path templates: `[variables]` plus `folder`.
    #[must_use]
    pub fn path_vars(&self) -> PathVars {
        let mut vars = self.variables.clone();
        vars.insert("folder".to_string(), self.project.folder.clone());
        vars
    }

    /// The `[lsx] version` as a document version.
    ///
    /// # Errors
    /// Returns [`Error::InvalidManifest`] if it is not a dotted version.
    pub fn lsx_version(&self) -> Result<LsxVersion> {
        self.lsx
            .version
            .parse()
            .map_err(|e| Error::InvalidManifest(format!("lsx.version: {e}")))
    }

    /// The unpacked archive directory, with `~` and environment variables
    /// expanded.
    ///
    /// # Errors
    /// Returns [`Error::InvalidManifest`] if expansion references an unset
    /// variable.
    pub fn unpacked_dir(&self) -> Result<Option<PathBuf>> {
        self.paths
            .unpacked
            .as_deref()
            .map(|raw| self.expand("paths.unpacked", raw))
            .transpose()
    }

    /// The output directory, expanded like [`unpacked_dir`](Self::unpacked_dir).
    ///
    /// # Errors
    /// See [`unpacked_dir`](Self::unpacked_dir).
    pub fn output_dir(&self) -> Result<PathBuf> {
        self.expand("paths.output", &self.paths.output)
    }

    fn expand(&self, key: &str, raw: &str) -> Result<PathBuf> {
        let expanded = shellexpand::full(raw)
            .map_err(|e| Error::InvalidManifest(format!("{key}: {e}")))?;
        let path = PathBuf::from(expanded.as_ref());
        Ok(match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[project]
name = "My Cool Race"
folder = "MyCoolRace"

[paths]
unpacked = "/games/bg3/unpacked"

[lsx]
version = "4.0.9"

[variables]
race = "Gnoll"
"#;

    #[test]
    fn test_parse_with_defaults() {
        let manifest = ProjectManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.project.name, "My Cool Race");
        assert_eq!(manifest.paths.output, "build");
        assert_eq!(
            manifest.unpacked_dir().unwrap(),
            Some(PathBuf::from("/games/bg3/unpacked"))
        );
        assert_eq!(manifest.lsx_version().unwrap(), LsxVersion::new(4, 0, 9, 0));
    }

    #[test]
    fn test_path_vars() {
        let vars = ProjectManifest::parse(MANIFEST).unwrap().path_vars();
        assert_eq!(vars.get("folder").map(String::as_str), Some("MyCoolRace"));
        assert_eq!(vars.get("race").map(String::as_str), Some("Gnoll"));
    }

    #[test]
    fn test_minimal_manifest() {
        let manifest =
            ProjectManifest::parse("[project]\nname = \"X\"\nfolder = \"X\"\n").unwrap();
        assert_eq!(manifest.lsx_version().unwrap(), LsxVersion::new(4, 0, 9, 331));
        assert_eq!(manifest.unpacked_dir().unwrap(), None);
        assert!(manifest.variables.is_empty());
    }

    #[test]
    fn test_invalid_manifests() {
        assert!(matches!(
            ProjectManifest::parse("[project]\nname = \"X\"\n"),
            Err(Error::TomlError(_))
        ));
        assert!(matches!(
            ProjectManifest::parse("[project]\nname = \"X\"\nfolder = \"\"\n"),
            Err(Error::InvalidManifest(_))
        ));

        let bad_version = ProjectManifest::parse(
            "[project]\nname = \"X\"\nfolder = \"X\"\n[lsx]\nversion = \"four\"\n",
        )
        .unwrap();
        assert!(matches!(bad_version.lsx_version(), Err(Error::InvalidManifest(_))));
    }

    #[test]
    fn test_relative_paths_follow_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        fs::write(&path, "[project]\nname = \"X\"\nfolder = \"X\"\n[paths]\nunpacked = \"data\"\n")
            .unwrap();

        let manifest = ProjectManifest::load(&path).unwrap();
        assert_eq!(manifest.unpacked_dir().unwrap(), Some(dir.path().join("data")));
        assert_eq!(manifest.output_dir().unwrap(), dir.path().join("build"));
    }
}
