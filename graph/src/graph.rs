//! The validated, immutable render graph.

use crate::pass::PassInstance;
use crate::port::{Edge, PortRef};
use crate::registry::PassRegistry;
use crate::script::GraphScript;

/// A validated render graph.
///
/// Produced by [`RenderGraphBuilder::build`](crate::RenderGraphBuilder::build).
/// The structure is fixed: passes keep their creation order, edges their
/// insertion order and outputs their marking order. The pass/edge structure
/// is guaranteed to be acyclic, and [`execution_order`](Self::execution_order)
/// yields passes so that every pass comes after the passes feeding it.
///
/// The graph has no interior mutability and can be shared across threads
/// behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderGraph {
    name: String,
    passes: Vec<PassInstance>,
    edges: Vec<Edge>,
    outputs: Vec<PortRef>,
    /// Topological order as indices into `passes`.
    execution_order: Vec<usize>,
}

impl RenderGraph {
    pub(crate) fn new(
        name: String,
        passes: Vec<PassInstance>,
        edges: Vec<Edge>,
        outputs: Vec<PortRef>,
        execution_order: Vec<usize>,
    ) -> Self {
        Self {
            name,
            passes,
            edges,
            outputs,
            execution_order,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All passes in creation order.
    pub fn passes(&self) -> &[PassInstance] {
        &self.passes
    }

    pub fn pass(&self, name: &str) -> Option<&PassInstance> {
        self.passes.iter().find(|p| p.name() == name)
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    pub fn pass_names(&self) -> impl Iterator<Item = &str> {
        self.passes.iter().map(PassInstance::name)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Designated outputs in binding order.
    pub fn outputs(&self) -> &[PortRef] {
        &self.outputs
    }

    pub fn is_output(&self, port: &PortRef) -> bool {
        self.outputs.contains(port)
    }

    /// Passes in dependency order.
    pub fn execution_order(&self) -> impl Iterator<Item = &PassInstance> {
        self.execution_order.iter().map(|&idx| &self.passes[idx])
    }

    /// Edges whose destination belongs to pass `name`.
    pub fn edges_into<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Edge> + 'n
    where
        'a: 'n,
    {
        self.edges.iter().filter(move |e| e.dst.instance() == name)
    }

    /// Edges whose source belongs to pass `name`.
    pub fn edges_from<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Edge> + 'n
    where
        'a: 'n,
    {
        self.edges.iter().filter(move |e| e.src.instance() == name)
    }

    /// Distinct passes feeding pass `name`, in edge order.
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        let mut deps: Vec<&str> = Vec::new();
        for edge in self.edges.iter().filter(|e| e.dst.instance() == name) {
            if !deps.contains(&edge.src.instance()) {
                deps.push(edge.src.instance());
            }
        }
        deps
    }

    /// The edge feeding input `port`, if any.
    pub fn source_of(&self, port: &PortRef) -> Option<&PortRef> {
        self.edges.iter().find(|e| &e.dst == port).map(|e| &e.src)
    }

    /// Required inputs, as published by `registry`, that have no incoming
    /// edge. Passes without reflection are skipped.
    pub fn unbound_inputs(&self, registry: &dyn PassRegistry) -> Vec<PortRef> {
        let mut unbound = Vec::new();
        for pass in &self.passes {
            let Some(reflection) = registry.reflect(pass.pass_type()) else {
                continue;
            };
            for input in reflection.required_inputs() {
                let port = PortRef::new(pass.name(), input.name.as_str());
                if self.source_of(&port).is_none() {
                    unbound.push(port);
                }
            }
        }
        unbound
    }

    /// Export the graph as an ordered operation list.
    pub fn to_script(&self) -> GraphScript {
        GraphScript::from_graph(self)
    }
}
