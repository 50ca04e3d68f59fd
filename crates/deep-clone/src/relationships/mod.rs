//! Relationships Module - Descriptors, registry and resolver seam

pub mod metadata;
pub mod registry;
pub mod resolver;

pub use metadata::*;
pub use registry::*;
pub use resolver::*;
