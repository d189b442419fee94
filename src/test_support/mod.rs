//! Test helpers for phasechain unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{component, ids};
//!
//! let mut builder = ChainBuilder::new();
//! builder.add_component(component("lexer", &["tokens"], &[], &[]))?;
//! assert_eq!(ids(&builder.order_nodes()?), vec!["lexer"]);
//! ```

pub mod fixtures;

use crate::core::{ComponentDeclaration, ComponentId};

pub use fixtures::*;

/// Declaration whose payload is its own id.
pub fn component(
    id: &str,
    provides: &[&str],
    before: &[&str],
    after: &[&str],
) -> ComponentDeclaration<ComponentId> {
    ComponentDeclaration::named(id)
        .provides(provides.iter().copied())
        .runs_before(before.iter().copied())
        .runs_after(after.iter().copied())
}

/// Chain as plain strings, for assertions.
pub fn ids(chain: &[ComponentId]) -> Vec<&str> {
    chain.iter().map(|id| id.as_str()).collect()
}

/// Index of `id` in `chain`.
///
/// # Panics
///
/// Panics if `id` is not in the chain.
pub fn position(chain: &[ComponentId], id: &str) -> usize {
    chain
        .iter()
        .position(|c| c.as_str() == id)
        .unwrap_or_else(|| panic!("`{}` missing from chain {:?}", id, ids(chain)))
}

/// Assert that every pair `(a, b)` appears with `a` before `b`.
pub fn assert_order(chain: &[ComponentId], pairs: &[(&str, &str)]) {
    for &(a, b) in pairs {
        assert!(
            position(chain, a) < position(chain, b),
            "expected `{}` before `{}` in {:?}",
            a,
            b,
            ids(chain)
        );
    }
}
