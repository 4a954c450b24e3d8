//! # RedLilium Passes
//!
//! Standard pass catalog and bundled graphs for `redlilium-graph`.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`catalog`] - Port and option reflection for the standard pass types
//! - [`ColorReStirOptions`] - Typed options of the `ColorReSTIR` pass
//! - [`standard_registry`] - A registry resolving every catalog pass type
//! - [`Preset`] - The bundled ColorReSTIR graph variants
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use redlilium_passes::{standard_registry, Preset};
//!
//! let registry = Arc::new(standard_registry());
//! let graph = Preset::ColorReStirNrd.build(registry).unwrap();
//! assert_eq!(graph.name(), "ColorReSTIRNRD");
//! ```

pub mod catalog;
pub mod color_restir;
mod presets;
mod registry;

pub use color_restir::{ColorReStirOptions, OptionError, OutputMode, TemporalColorEstimate};
pub use presets::Preset;
pub use registry::standard_registry;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_catalog() {
        let registry = standard_registry();
        assert_eq!(registry.len(), catalog::PASS_TYPES.len());
    }
}
