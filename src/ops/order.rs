//! Submission-order independent chain ordering.
//!
//! [`ChainBuilder`] breaks ties by registration order, so two callers that
//! register the same declarations in different orders can get different
//! (equally valid) chains. These entry points register in a canonical order
//! first: phases merged by name and sorted, components sorted by identity.

use std::collections::BTreeMap;

use crate::chain::{ChainBuilder, ChainError};
use crate::core::{ComponentDeclaration, Phase};
use crate::util::InternedString;

/// Build a registry from declarations in canonical order.
pub fn canonical_builder<C, P, D>(phases: P, components: D) -> Result<ChainBuilder<C>, ChainError>
where
    P: IntoIterator<Item = Phase>,
    D: IntoIterator<Item = ComponentDeclaration<C>>,
{
    let mut merged: BTreeMap<InternedString, Phase> = BTreeMap::new();
    for phase in phases {
        match merged.get_mut(&phase.name) {
            Some(existing) => existing.merge(phase),
            None => {
                merged.insert(phase.name.clone(), phase);
            }
        }
    }

    let mut components: Vec<_> = components.into_iter().collect();
    components.sort_by(|a, b| a.id.cmp(&b.id));

    let mut builder = ChainBuilder::new();
    for phase in merged.values() {
        builder.add_phase(phase)?;
    }
    for decl in components {
        builder.add_component(decl)?;
    }
    Ok(builder)
}

/// Order components so that the result depends only on the declarations.
pub fn order_chain<C, P, D>(phases: P, components: D) -> Result<Vec<C>, ChainError>
where
    P: IntoIterator<Item = Phase>,
    D: IntoIterator<Item = ComponentDeclaration<C>>,
{
    let builder = canonical_builder(phases, components)?;
    tracing::info!("ordering {} components", builder.component_count());
    builder.order_nodes()
}

/// DOT rendering of the full declared graph, without ordering it.
pub fn render_graph<C, P, D>(phases: P, components: D) -> Result<String, ChainError>
where
    P: IntoIterator<Item = Phase>,
    D: IntoIterator<Item = ComponentDeclaration<C>>,
{
    Ok(canonical_builder(phases, components)?.to_dot())
}
