//! Chain ordering.
//!
//! Turns phase and component declarations into one deterministic order.
//! Constraints are expressed through shared names rather than direct
//! component-to-component edges; each name is represented by a single
//! barrier node in the graph (see [`node`]).

pub mod builder;
pub mod dot;
pub mod errors;
pub mod node;
pub mod queue;

pub use builder::ChainBuilder;
pub use errors::{ChainError, CycleError};
pub use node::{NameKind, NodeGraph, NodeId, CATCH_ALL};
