//! Textual graph descriptions.
//!
//! A [`GraphScript`] is a graph written down as the ordered list of builder
//! calls that produces it. Scripts can be:
//!
//! - parsed from, and exported to, the host's graph script format
//!   ([`GraphScript::parse`], [`GraphScript::to_source`]);
//! - encoded as RON (`serialize-ron` feature);
//! - replayed on a [`RenderGraphBuilder`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use redlilium_graph::{BuilderConfig, GraphScript, OpenRegistry};
//!
//! let source = "
//! g = RenderGraph('Minimal')
//! g.create_pass('tm', 'ToneMapper', {'operator': 'Aces', 'clamp': True})
//! g.mark_output('tm.dst')
//! ";
//! let script = GraphScript::parse_single(source).unwrap();
//! let graph = script
//!     .build(Arc::new(OpenRegistry::new()), BuilderConfig::default())
//!     .unwrap();
//! assert_eq!(graph.pass_count(), 1);
//! ```

mod export;
#[cfg(feature = "serialize-ron")]
mod format;
mod parse;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::RenderGraphBuilder;
use crate::config::BuilderConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::RenderGraph;
use crate::registry::PassRegistry;
use crate::value::PassConfig;

/// One builder call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphOp {
    CreatePass {
        name: String,
        pass_type: String,
        config: PassConfig,
    },
    AddEdge {
        src: String,
        dst: String,
    },
    MarkOutput {
        port: String,
    },
}

/// A named graph as an ordered list of operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphScript {
    pub name: String,
    pub ops: Vec<GraphOp>,
}

/// Errors from reading or replaying a graph script.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unsupported graph operation '{method}'")]
    UnsupportedOperation { line: usize, method: String },

    #[error("script does not define a render graph")]
    NoGraph,

    #[error("script defines {count} render graphs, expected one")]
    MultipleGraphs { count: usize },

    #[error("option '{option}' of pass '{pass}' is not a finite number")]
    NonFiniteValue { pass: String, option: String },

    #[error("format error: {0}")]
    Format(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl GraphScript {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: Vec::new(),
        }
    }

    pub fn create_pass(
        mut self,
        name: impl Into<String>,
        pass_type: impl Into<String>,
        config: PassConfig,
    ) -> Self {
        self.ops.push(GraphOp::CreatePass {
            name: name.into(),
            pass_type: pass_type.into(),
            config,
        });
        self
    }

    pub fn add_edge(mut self, src: impl Into<String>, dst: impl Into<String>) -> Self {
        self.ops.push(GraphOp::AddEdge {
            src: src.into(),
            dst: dst.into(),
        });
        self
    }

    pub fn mark_output(mut self, port: impl Into<String>) -> Self {
        self.ops.push(GraphOp::MarkOutput { port: port.into() });
        self
    }

    /// Parse every graph defined in a host graph script, in definition order.
    pub fn parse(source: &str) -> Result<Vec<GraphScript>, ScriptError> {
        parse::parse_scripts(source)
    }

    /// Parse a host graph script that defines exactly one graph.
    pub fn parse_single(source: &str) -> Result<GraphScript, ScriptError> {
        let mut scripts = Self::parse(source)?;
        match scripts.len() {
            0 => Err(ScriptError::NoGraph),
            1 => Ok(scripts.remove(0)),
            count => Err(ScriptError::MultipleGraphs { count }),
        }
    }

    /// Replay the operations on `builder`, stopping at the first error.
    pub fn apply(&self, builder: &mut RenderGraphBuilder) -> GraphResult<()> {
        for op in &self.ops {
            match op {
                GraphOp::CreatePass {
                    name,
                    pass_type,
                    config,
                } => {
                    builder.create_pass(name.as_str(), pass_type.as_str(), config.clone())?;
                }
                GraphOp::AddEdge { src, dst } => builder.add_edge(src, dst)?,
                GraphOp::MarkOutput { port } => builder.mark_output(port)?,
            }
        }
        Ok(())
    }

    /// Build the graph against `registry`.
    pub fn build(
        &self,
        registry: Arc<dyn PassRegistry>,
        config: BuilderConfig,
    ) -> GraphResult<RenderGraph> {
        let mut builder = RenderGraphBuilder::with_config(self.name.as_str(), registry, config);
        self.apply(&mut builder)?;
        builder.build()
    }

    /// Operations that rebuild `graph`: passes, then edges, then outputs.
    pub fn from_graph(graph: &RenderGraph) -> Self {
        let mut ops = Vec::with_capacity(
            graph.pass_count() + graph.edge_count() + graph.outputs().len(),
        );
        ops.extend(graph.passes().iter().map(|pass| GraphOp::CreatePass {
            name: pass.name().to_string(),
            pass_type: pass.pass_type().to_string(),
            config: pass.config().clone(),
        }));
        ops.extend(graph.edges().iter().map(|edge| GraphOp::AddEdge {
            src: edge.src.to_string(),
            dst: edge.dst.to_string(),
        }));
        ops.extend(graph.outputs().iter().map(|port| GraphOp::MarkOutput {
            port: port.to_string(),
        }));
        Self {
            name: graph.name().to_string(),
            ops,
        }
    }

    /// Render as a host graph script.
    ///
    /// Fails with [`ScriptError::NonFiniteValue`] when a float option is NaN
    /// or infinite, since the script format has no literal for it.
    pub fn to_source(&self) -> Result<String, ScriptError> {
        export::write_script(self)
    }

    pub fn pass_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, GraphOp::CreatePass { .. }))
            .count()
    }
}
