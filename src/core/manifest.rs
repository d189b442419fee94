//! Chain.toml manifest parsing.
//!
//! The manifest is how the `phasechain` binary receives declarations. The
//! ordering engine itself only sees [`Phase`] and [`ComponentDeclaration`]
//! values, so library users are free to build those from any source.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ComponentDeclaration, ComponentId, Phase};

/// File name searched for by [`find_manifest`].
pub const MANIFEST_NAME: &str = "Chain.toml";

/// Error locating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find Chain.toml in {} or any parent directory", dir.display())]
    NotFound { dir: PathBuf },
}

/// A `[[phase]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseTable {
    pub name: String,
    #[serde(default)]
    pub before: Vec<String>,
    #[serde(default)]
    pub after: Vec<String>,
}

/// A `[[component]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentTable {
    pub id: String,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub before: Vec<String>,
    #[serde(default)]
    pub after: Vec<String>,
}

/// The parsed Chain.toml manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainManifest {
    #[serde(default, rename = "phase")]
    pub phases: Vec<PhaseTable>,

    #[serde(default, rename = "component")]
    pub components: Vec<ComponentTable>,
}

impl ChainManifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("invalid manifest: {}", path.display()))
    }

    /// Parse manifest content.
    ///
    /// Only structural problems are reported here. Ordering problems such as
    /// an empty `provides` list are left to the chain builder so that the
    /// CLI and the library report them identically.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: ChainManifest =
            toml::from_str(content).context("failed to parse Chain.toml")?;

        let mut seen = HashSet::new();
        for component in &manifest.components {
            if component.id.trim().is_empty() {
                bail!("component with an empty `id`");
            }
            if !seen.insert(component.id.as_str()) {
                bail!("component `{}` is declared more than once", component.id);
            }
        }

        for phase in &manifest.phases {
            if phase.name.trim().is_empty() {
                bail!("phase with an empty `name`");
            }
        }

        tracing::debug!(
            "parsed manifest with {} phases and {} components",
            manifest.phases.len(),
            manifest.components.len()
        );

        Ok(manifest)
    }

    /// Phase declarations in manifest order.
    pub fn phases(&self) -> Vec<Phase> {
        self.phases
            .iter()
            .map(|table| {
                Phase::new(table.name.as_str())
                    .runs_before(&table.before)
                    .runs_after(&table.after)
            })
            .collect()
    }

    /// Component declarations in manifest order, each carrying its own id.
    pub fn components(&self) -> Vec<ComponentDeclaration<ComponentId>> {
        self.components
            .iter()
            .map(|table| {
                ComponentDeclaration::named(table.id.as_str())
                    .provides(&table.provides)
                    .runs_before(&table.before)
                    .runs_after(&table.after)
            })
            .collect()
    }
}

/// Find `Chain.toml` in `start` or the nearest parent directory.
pub fn find_manifest(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}
