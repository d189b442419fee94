//! `phasechain order` command

use anyhow::{Context, Result};

use phasechain::ops::canonical_builder;
use phasechain::ChainError;

use super::{load_manifest, report, warn_unbound};
use crate::cli::OrderArgs;

pub fn execute(args: OrderArgs, color: bool) -> Result<()> {
    let (path, manifest) = load_manifest(args.manifest_path, color)?;

    let builder = canonical_builder(manifest.phases(), manifest.components())
        .map_err(|err| report(&err, &path, color))?;
    warn_unbound(&builder, &path, color);

    tracing::info!("ordering {} components", builder.component_count());
    let chain = match builder.order_nodes() {
        Ok(chain) => chain,
        Err(err) => {
            if let (ChainError::Cycle(cycle), Some(dot_path)) = (&err, &args.dot_on_cycle) {
                std::fs::write(dot_path, cycle.to_dot()).with_context(|| {
                    format!("failed to write cycle graph: {}", dot_path.display())
                })?;
                tracing::info!("wrote unresolved graph to {}", dot_path.display());
            }
            return Err(report(&err, &path, color));
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chain)?);
    } else {
        for id in &chain {
            println!("{}", id);
        }
    }

    Ok(())
}
