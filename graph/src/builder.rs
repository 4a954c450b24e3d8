//! Render graph builder.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::BuilderConfig;
use crate::error::{GraphError, GraphResult};
use crate::graph::RenderGraph;
use crate::pass::PassInstance;
use crate::port::{Edge, PortRef};
use crate::reflection::PortDirection;
use crate::registry::PassRegistry;
use crate::sort::topological_order;
use crate::value::PassConfig;

/// Accumulates passes, edges and outputs and produces a validated
/// [`RenderGraph`].
///
/// The builder is open until [`build`](Self::build) is called and closed
/// afterwards, whether or not the build succeeded. Every mutating call on a
/// closed builder fails with [`GraphError::BuilderClosed`].
///
/// Failed calls leave previously accepted passes and edges untouched.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use redlilium_graph::{OpenRegistry, PassConfig, RenderGraphBuilder};
///
/// let mut builder = RenderGraphBuilder::new("Minimal", Arc::new(OpenRegistry::new()));
/// builder.create_pass("gbuf", "GBufferRT", PassConfig::new()).unwrap();
/// builder.create_pass("tm", "ToneMapper", PassConfig::new()).unwrap();
/// builder.add_edge("gbuf.color", "tm.src").unwrap();
/// builder.mark_output("tm.dst").unwrap();
///
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.pass_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub struct RenderGraphBuilder {
    name: String,
    registry: Arc<dyn PassRegistry>,
    config: BuilderConfig,
    passes: Vec<PassInstance>,
    /// Instance name -> index in `passes`.
    pass_indices: HashMap<String, usize>,
    edges: Vec<Edge>,
    /// Bound input -> index in `edges` of the edge feeding it.
    bound_inputs: HashMap<PortRef, usize>,
    outputs: Vec<PortRef>,
    closed: bool,
}

impl RenderGraphBuilder {
    /// Create an open builder with the default configuration.
    pub fn new(name: impl Into<String>, registry: Arc<dyn PassRegistry>) -> Self {
        Self::with_config(name, registry, BuilderConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        registry: Arc<dyn PassRegistry>,
        config: BuilderConfig,
    ) -> Self {
        Self {
            name: name.into(),
            registry,
            config,
            passes: Vec::new(),
            pass_indices: HashMap::new(),
            edges: Vec::new(),
            bound_inputs: HashMap::new(),
            outputs: Vec::new(),
            closed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> BuilderConfig {
        self.config
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_pass(&self, name: &str) -> bool {
        self.pass_indices.contains_key(name)
    }

    /// Create a pass instance named `name` of type `pass_type`.
    pub fn create_pass(
        &mut self,
        name: impl Into<String>,
        pass_type: impl Into<String>,
        config: PassConfig,
    ) -> GraphResult<&PassInstance> {
        self.ensure_open()?;
        let name = name.into();
        let pass_type = pass_type.into();

        if name.is_empty() {
            return Err(GraphError::InvalidPassName {
                name,
                reason: "name is empty",
            });
        }
        if name.contains('.') {
            return Err(GraphError::InvalidPassName {
                name,
                reason: "name contains '.'",
            });
        }
        if self.pass_indices.contains_key(&name) {
            return Err(GraphError::DuplicateName { name });
        }

        let handle = self.registry.resolve(&pass_type, &config)?;
        log::debug!(
            "Graph '{}': created pass '{name}' ({pass_type})",
            self.name
        );

        let index = self.passes.len();
        self.pass_indices.insert(name.clone(), index);
        self.passes
            .push(PassInstance::new(name, pass_type, config, handle));
        Ok(&self.passes[index])
    }

    /// Connect output `src` to input `dst`, both written `instance.port`.
    pub fn add_edge(&mut self, src: &str, dst: &str) -> GraphResult<()> {
        self.ensure_open()?;
        let src = self.resolve_port(src, PortDirection::Output)?;
        let dst = self.resolve_port(dst, PortDirection::Input)?;

        if let Some(&existing) = self.bound_inputs.get(&dst) {
            return Err(GraphError::PortAlreadyBound {
                port: dst.to_string(),
                bound_to: self.edges[existing].src.to_string(),
            });
        }

        log::debug!("Graph '{}': edge {src} -> {dst}", self.name);
        self.bound_inputs.insert(dst.clone(), self.edges.len());
        self.edges.push(Edge::new(src, dst));
        Ok(())
    }

    /// Designate `port` as a graph output. Outputs keep their marking order.
    pub fn mark_output(&mut self, port: &str) -> GraphResult<()> {
        self.ensure_open()?;
        let port = self.resolve_port(port, PortDirection::Output)?;

        if self.outputs.contains(&port) {
            log::debug!(
                "Graph '{}': output {port} is already marked",
                self.name
            );
            return Ok(());
        }

        log::debug!("Graph '{}': marked output {port}", self.name);
        self.outputs.push(port);
        Ok(())
    }

    /// Validate the accumulated description and produce the graph.
    ///
    /// Closes the builder.
    pub fn build(&mut self) -> GraphResult<RenderGraph> {
        self.ensure_open()?;
        self.closed = true;

        let arcs: Vec<(usize, usize)> = self
            .edges
            .iter()
            .map(|edge| {
                (
                    self.pass_indices[edge.src.instance()],
                    self.pass_indices[edge.dst.instance()],
                )
            })
            .collect();

        let execution_order = topological_order(self.passes.len(), arcs).map_err(|cycle| {
            GraphError::CycleDetected {
                involved: cycle
                    .into_iter()
                    .map(|idx| self.passes[idx].name().to_string())
                    .collect(),
            }
        })?;

        let graph = RenderGraph::new(
            std::mem::take(&mut self.name),
            std::mem::take(&mut self.passes),
            std::mem::take(&mut self.edges),
            std::mem::take(&mut self.outputs),
            execution_order,
        );
        self.pass_indices.clear();
        self.bound_inputs.clear();

        if self.config.warn_unbound_inputs {
            for port in graph.unbound_inputs(self.registry.as_ref()) {
                log::warn!("Graph '{}': required input {port} is not bound", graph.name());
            }
        }

        log::debug!(
            "Graph '{}' built: {} passes, {} edges, {} outputs",
            graph.name(),
            graph.pass_count(),
            graph.edge_count(),
            graph.outputs().len()
        );
        Ok(graph)
    }

    fn ensure_open(&self) -> GraphResult<()> {
        if self.closed {
            Err(GraphError::BuilderClosed)
        } else {
            Ok(())
        }
    }

    /// Parse `reference` and check that it names a member instance and, when
    /// port validation is on, a declared port of the given direction.
    fn resolve_port(&self, reference: &str, direction: PortDirection) -> GraphResult<PortRef> {
        let port = PortRef::parse(reference)?;
        let Some(&index) = self.pass_indices.get(port.instance()) else {
            return Err(GraphError::UnknownPortReference {
                reference: reference.to_string(),
                instance: port.instance().to_string(),
            });
        };

        if self.config.validate_ports {
            let pass = &self.passes[index];
            if let Some(reflection) = self.registry.reflect(pass.pass_type()) {
                if reflection.port(port.port(), direction).is_none() {
                    return Err(GraphError::UnknownPort {
                        instance: pass.name().to_string(),
                        pass_type: pass.pass_type().to_string(),
                        port: port.port().to_string(),
                        direction,
                    });
                }
            }
        }

        Ok(port)
    }
}

impl std::fmt::Debug for RenderGraphBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderGraphBuilder")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("passes", &self.passes)
            .field("edges", &self.edges)
            .field("outputs", &self.outputs)
            .field("closed", &self.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::PassReflection;
    use crate::registry::{DescriptorRegistry, OpenRegistry};

    fn builder() -> RenderGraphBuilder {
        RenderGraphBuilder::new("test", Arc::new(OpenRegistry::new()))
    }

    fn strict_builder() -> RenderGraphBuilder {
        let mut registry = DescriptorRegistry::new();
        registry.register(
            PassReflection::new("GBufferRT")
                .with_output("vbuffer", "")
                .with_output("mvec", ""),
        );
        registry.register(
            PassReflection::new("ToneMapper")
                .with_input("src", "")
                .with_output("dst", ""),
        );
        RenderGraphBuilder::with_config(
            "strict",
            Arc::new(registry),
            BuilderConfig::new().with_port_validation(true),
        )
    }

    #[test]
    fn test_create_pass() {
        let mut builder = builder();
        let pass = builder
            .create_pass("gbuf", "GBufferRT", PassConfig::new().with("useDOF", true))
            .unwrap();
        assert_eq!(pass.name(), "gbuf");
        assert_eq!(pass.pass_type(), "GBufferRT");
        assert_eq!(pass.config().len(), 1);
        assert!(builder.contains_pass("gbuf"));
        assert_eq!(builder.pass_count(), 1);
    }

    #[test]
    fn test_duplicate_name() {
        let mut builder = builder();
        builder.create_pass("a", "X", PassConfig::new()).unwrap();
        assert_eq!(
            builder.create_pass("a", "Y", PassConfig::new()).unwrap_err(),
            GraphError::DuplicateName {
                name: "a".to_string()
            }
        );
        assert_eq!(builder.pass_count(), 1);
    }

    #[test]
    fn test_invalid_names() {
        let mut builder = builder();
        assert!(matches!(
            builder.create_pass("", "X", PassConfig::new()),
            Err(GraphError::InvalidPassName { .. })
        ));
        assert!(matches!(
            builder.create_pass("a.b", "X", PassConfig::new()),
            Err(GraphError::InvalidPassName { .. })
        ));
    }

    #[test]
    fn test_unknown_pass_type_not_registered() {
        let mut builder = strict_builder();
        assert!(matches!(
            builder.create_pass("nrd", "NRD", PassConfig::new()),
            Err(GraphError::UnknownPassType { .. })
        ));
        assert!(!builder.contains_pass("nrd"));
    }

    #[test]
    fn test_edge_to_missing_source() {
        let mut builder = builder();
        builder.create_pass("tm", "ToneMapper", PassConfig::new()).unwrap();
        assert_eq!(
            builder.add_edge("missing.out", "tm.src").unwrap_err(),
            GraphError::UnknownPortReference {
                reference: "missing.out".to_string(),
                instance: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_edge_to_missing_destination() {
        let mut builder = builder();
        builder.create_pass("gbuf", "GBufferRT", PassConfig::new()).unwrap();
        assert!(matches!(
            builder.add_edge("gbuf.vbuffer", "nope.src"),
            Err(GraphError::UnknownPortReference { instance, .. }) if instance == "nope"
        ));
        assert_eq!(builder.edge_count(), 0);
    }

    #[test]
    fn test_port_already_bound() {
        let mut builder = builder();
        builder.create_pass("a", "X", PassConfig::new()).unwrap();
        builder.create_pass("b", "X", PassConfig::new()).unwrap();
        builder.create_pass("tm", "ToneMapper", PassConfig::new()).unwrap();

        builder.add_edge("a.out", "tm.src").unwrap();
        assert_eq!(
            builder.add_edge("b.out", "tm.src").unwrap_err(),
            GraphError::PortAlreadyBound {
                port: "tm.src".to_string(),
                bound_to: "a.out".to_string(),
            }
        );

        let graph = builder.build().unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges()[0].src, PortRef::new("a", "out"));
    }

    #[test]
    fn test_fan_out() {
        let mut builder = builder();
        builder.create_pass("gbuf", "GBufferRT", PassConfig::new()).unwrap();
        builder.create_pass("a", "X", PassConfig::new()).unwrap();
        builder.create_pass("b", "X", PassConfig::new()).unwrap();
        builder.add_edge("gbuf.linearZ", "a.linearZ").unwrap();
        builder.add_edge("gbuf.linearZ", "b.viewZ").unwrap();
        assert_eq!(builder.edge_count(), 2);
    }

    #[test]
    fn test_mark_output_duplicates_ignored() {
        let mut builder = builder();
        builder.create_pass("tm", "ToneMapper", PassConfig::new()).unwrap();
        builder.create_pass("acc", "AccumulatePass", PassConfig::new()).unwrap();
        builder.mark_output("tm.dst").unwrap();
        builder.mark_output("acc.output").unwrap();
        builder.mark_output("tm.dst").unwrap();

        let graph = builder.build().unwrap();
        assert_eq!(
            graph.outputs(),
            &[PortRef::new("tm", "dst"), PortRef::new("acc", "output")]
        );
    }

    #[test]
    fn test_mark_output_unknown_instance() {
        let mut builder = builder();
        assert!(matches!(
            builder.mark_output("tm.dst"),
            Err(GraphError::UnknownPortReference { .. })
        ));
        assert!(matches!(
            builder.mark_output("tm"),
            Err(GraphError::MalformedPortReference { .. })
        ));
    }

    #[test]
    fn test_closed_after_build() {
        let mut builder = builder();
        builder.create_pass("a", "X", PassConfig::new()).unwrap();
        builder.build().unwrap();

        assert!(builder.is_closed());
        assert_eq!(
            builder.create_pass("b", "X", PassConfig::new()).unwrap_err(),
            GraphError::BuilderClosed
        );
        assert_eq!(
            builder.add_edge("a.x", "a.y").unwrap_err(),
            GraphError::BuilderClosed
        );
        assert_eq!(builder.mark_output("a.x").unwrap_err(), GraphError::BuilderClosed);
        assert_eq!(builder.build().unwrap_err(), GraphError::BuilderClosed);
    }

    #[test]
    fn test_closed_after_failed_build() {
        let mut builder = builder();
        builder.create_pass("a", "X", PassConfig::new()).unwrap();
        builder.add_edge("a.out", "a.in").unwrap();

        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::CycleDetected {
                involved: vec!["a".to_string()]
            }
        );
        assert!(builder.is_closed());
    }

    #[test]
    fn test_cycle_reports_participants_only() {
        let mut builder = builder();
        for name in ["gbuf", "a", "b", "tm"] {
            builder.create_pass(name, "X", PassConfig::new()).unwrap();
        }
        builder.add_edge("gbuf.out", "a.in").unwrap();
        builder.add_edge("a.out", "b.in").unwrap();
        builder.add_edge("b.out", "a.feedback").unwrap();
        builder.add_edge("b.out", "tm.src").unwrap();

        assert_eq!(
            builder.build().unwrap_err(),
            GraphError::CycleDetected {
                involved: vec!["a".to_string(), "b".to_string()]
            }
        );
    }

    #[test]
    fn test_strict_port_validation() {
        let mut builder = strict_builder();
        builder.create_pass("gbuf", "GBufferRT", PassConfig::new()).unwrap();
        builder.create_pass("tm", "ToneMapper", PassConfig::new()).unwrap();

        assert_eq!(
            builder.add_edge("gbuf.color", "tm.src").unwrap_err(),
            GraphError::UnknownPort {
                instance: "gbuf".to_string(),
                pass_type: "GBufferRT".to_string(),
                port: "color".to_string(),
                direction: PortDirection::Output,
            }
        );
        assert!(matches!(
            builder.add_edge("gbuf.vbuffer", "tm.dst"),
            Err(GraphError::UnknownPort {
                direction: PortDirection::Input,
                ..
            })
        ));
        assert!(matches!(
            builder.mark_output("tm.src"),
            Err(GraphError::UnknownPort { .. })
        ));

        builder.add_edge("gbuf.vbuffer", "tm.src").unwrap();
        builder.mark_output("tm.dst").unwrap();
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_lenient_ports_without_validation() {
        let mut builder = strict_builder();
        builder.config = BuilderConfig::new().with_port_validation(false);
        builder.create_pass("gbuf", "GBufferRT", PassConfig::new()).unwrap();
        builder.create_pass("tm", "ToneMapper", PassConfig::new()).unwrap();
        assert!(builder.add_edge("gbuf.color", "tm.src").is_ok());
    }
}
