//! Command implementations

pub mod completions;
pub mod graph;
pub mod order;

use std::path::{Path, PathBuf};

use anyhow::Result;

use phasechain::chain::errors::unbound_name_diagnostic;
use phasechain::core::manifest::find_manifest;
use phasechain::util::diagnostic::{emit, suggestions};
use phasechain::util::Diagnostic;
use phasechain::{ChainBuilder, ChainError, ChainManifest};

/// Load the manifest named on the command line, or the nearest one.
pub fn load_manifest(path: Option<PathBuf>, color: bool) -> Result<(PathBuf, ChainManifest)> {
    let path = match path {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir()?;
            match find_manifest(&cwd) {
                Ok(path) => path,
                Err(e) => {
                    emit(
                        &Diagnostic::error(e.to_string()).with_suggestion(suggestions::NO_MANIFEST),
                        color,
                    );
                    anyhow::bail!("no manifest to read");
                }
            }
        }
    };

    tracing::debug!("using manifest {}", path.display());
    let manifest = ChainManifest::load(&path)?;
    Ok((path, manifest))
}

/// Warn about every name the manifest mentions but never binds.
pub fn warn_unbound<C>(builder: &ChainBuilder<C>, manifest: &Path, color: bool) {
    for name in builder.unbound_names() {
        emit(&unbound_name_diagnostic(&name).with_location(manifest), color);
    }
}

/// Print an ordering error and turn it into a command failure.
pub fn report(err: &ChainError, manifest: &Path, color: bool) -> anyhow::Error {
    emit(&err.to_diagnostic().with_location(manifest), color);
    anyhow::anyhow!("{}", err)
}
