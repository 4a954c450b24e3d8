//! Hand-off of finished graphs to the host.

use std::sync::Arc;

use crate::graph::RenderGraph;

/// Host-side registration hook.
///
/// Implemented for any `FnMut(&str, Arc<RenderGraph>)`, so a closure can be
/// passed directly.
pub trait GraphHost {
    fn register_graph(&mut self, name: &str, graph: Arc<RenderGraph>);
}

impl<F> GraphHost for F
where
    F: FnMut(&str, Arc<RenderGraph>),
{
    fn register_graph(&mut self, name: &str, graph: Arc<RenderGraph>) {
        self(name, graph)
    }
}

/// Forwards finished graphs to an optional host hook.
///
/// Without a host (for example when graphs are assembled by a test or an
/// offline tool) registration silently does nothing. Registering the same
/// name twice forwards both graphs; the host decides what a repeated name
/// means.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use redlilium_graph::{OpenRegistry, OutputBinder, PassConfig, RenderGraph, RenderGraphBuilder};
///
/// let mut received = Vec::new();
/// let mut builder = RenderGraphBuilder::new("Minimal", Arc::new(OpenRegistry::new()));
/// builder.create_pass("tm", "ToneMapper", PassConfig::new()).unwrap();
/// builder.mark_output("tm.dst").unwrap();
///
/// let mut binder = OutputBinder::with_host(|name: &str, _graph: Arc<RenderGraph>| {
///     received.push(name.to_string())
/// });
/// binder.register_graph(builder.build().unwrap());
/// drop(binder);
/// assert_eq!(received, vec!["Minimal"]);
/// ```
pub struct OutputBinder<'h> {
    host: Option<Box<dyn GraphHost + 'h>>,
    registered: Vec<String>,
}

impl<'h> OutputBinder<'h> {
    pub fn new(host: Option<Box<dyn GraphHost + 'h>>) -> Self {
        Self {
            host,
            registered: Vec::new(),
        }
    }

    /// Binder without a host; registration is a no-op.
    pub fn detached() -> Self {
        Self::new(None)
    }

    pub fn with_host(host: impl GraphHost + 'h) -> Self {
        Self::new(Some(Box::new(host)))
    }

    pub fn has_host(&self) -> bool {
        self.host.is_some()
    }

    /// Register `graph` under its own name.
    pub fn register_graph(&mut self, graph: RenderGraph) -> Arc<RenderGraph> {
        let name = graph.name().to_string();
        self.register_named(&name, graph)
    }

    /// Register `graph` under `name`.
    ///
    /// Returns the shared graph so the caller can keep using it.
    pub fn register_named(&mut self, name: &str, graph: RenderGraph) -> Arc<RenderGraph> {
        let graph = Arc::new(graph);

        let Some(host) = self.host.as_mut() else {
            log::debug!("No host attached, graph '{name}' not registered");
            return graph;
        };

        if self.registered.iter().any(|n| n == name) {
            log::warn!("Graph '{name}' registered more than once");
        }
        host.register_graph(name, Arc::clone(&graph));
        self.registered.push(name.to_string());
        log::info!("Registered render graph '{name}'");
        graph
    }

    /// Names forwarded to the host, in registration order.
    pub fn registered_names(&self) -> &[String] {
        &self.registered
    }
}

impl Default for OutputBinder<'_> {
    fn default() -> Self {
        Self::detached()
    }
}
