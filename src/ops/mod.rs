//! High-level operations.

pub mod order;

pub use order::{canonical_builder, order_chain, render_graph};
