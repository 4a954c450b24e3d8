//! # RedLilium Graph
//!
//! Render graph assembly and port resolution.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`RenderGraphBuilder`] - Creates pass instances, wires named ports and
//!   produces a validated [`RenderGraph`]
//! - [`PassRegistry`] - The contract through which pass types are resolved,
//!   with [`OpenRegistry`] and [`DescriptorRegistry`] implementations
//! - [`OutputBinder`] - Hands finished graphs to an optional [`GraphHost`]
//! - [`GraphScript`] - Textual graph descriptions in the host script format
//!   (and RON with the `serialize-ron` feature)
//!
//! Ports are addressed as `"instance.port"`. Everything before the first `.`
//! names the pass instance; the rest is the port name.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use redlilium_graph::{OpenRegistry, OutputBinder, PassConfig, RenderGraphBuilder};
//!
//! let mut builder = RenderGraphBuilder::new("ColorReSTIR", Arc::new(OpenRegistry::new()));
//! builder.create_pass("GBufferRT", "GBufferRT", PassConfig::new()).unwrap();
//! builder
//!     .create_pass("ColorReSTIR", "ColorReSTIR", PassConfig::new().with("gMaxConfidence", 20))
//!     .unwrap();
//! builder.add_edge("GBufferRT.vbuffer", "ColorReSTIR.vbuffer").unwrap();
//! builder.mark_output("ColorReSTIR.color").unwrap();
//!
//! let graph = builder.build().unwrap();
//! let names: Vec<_> = graph.execution_order().map(|p| p.name()).collect();
//! assert_eq!(names, ["GBufferRT", "ColorReSTIR"]);
//!
//! // Outside a host, registration is a no-op.
//! OutputBinder::detached().register_graph(graph);
//! ```

mod binder;
mod builder;
mod config;
mod error;
mod graph;
mod pass;
mod port;
mod reflection;
mod registry;
pub mod script;
mod sort;
mod value;

// Re-export main types for convenience
pub use binder::{GraphHost, OutputBinder};
pub use builder::RenderGraphBuilder;
pub use config::BuilderConfig;
pub use error::{GraphError, GraphResult};
pub use graph::RenderGraph;
pub use pass::{PassHandle, PassInstance};
pub use port::{Edge, PortRef};
pub use reflection::{PassReflection, PortDesc, PortDirection};
pub use registry::{ConfigValidator, DescriptorRegistry, OpenRegistry, PassRegistry};
pub use script::{GraphOp, GraphScript, ScriptError};
pub use value::{ConfigValue, PassConfig};

/// Graph library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
