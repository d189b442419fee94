//! `phasechain graph` command

use anyhow::Result;

use phasechain::ops::canonical_builder;

use super::{load_manifest, report, warn_unbound};
use crate::cli::GraphArgs;

pub fn execute(args: GraphArgs, color: bool) -> Result<()> {
    let (path, manifest) = load_manifest(args.manifest_path, color)?;

    let builder = canonical_builder(manifest.phases(), manifest.components())
        .map_err(|err| report(&err, &path, color))?;
    warn_unbound(&builder, &path, color);
    print!("{}", builder.to_dot());

    Ok(())
}
