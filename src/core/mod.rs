//! Declarations consumed by the ordering engine.

pub mod component;
pub mod manifest;
pub mod phase;

pub use component::{ComponentDeclaration, ComponentId};
pub use manifest::{ChainManifest, ManifestError};
pub use phase::Phase;
