//! Phasechain - deterministic ordering of components around named phases
//!
//! Components declare the capabilities they provide and the names they must
//! run before or after. Phases are named barriers with no work of their own.
//! [`ChainBuilder`] turns those declarations into a single chain, or reports
//! the cycle that prevents one.

pub mod chain;
pub mod core;
pub mod ops;
pub mod util;

/// Declaration fixtures for unit tests.
#[cfg(test)]
pub mod test_support;

pub use chain::{ChainBuilder, ChainError, CycleError};
pub use core::{ChainManifest, ComponentDeclaration, ComponentId, Phase};
pub use ops::order_chain;
