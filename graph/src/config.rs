//! Builder configuration.

/// Options controlling how strictly a [`RenderGraphBuilder`](crate::RenderGraphBuilder)
/// checks the graph it assembles.
///
/// Structural checks (duplicate names, dangling instances, double-bound
/// inputs, cycles) are always performed. The options here only enable the
/// checks that rely on [`PassReflection`](crate::PassReflection) published by
/// the registry.
///
/// # Example
///
/// ```
/// use redlilium_graph::BuilderConfig;
///
/// let config = BuilderConfig::new()
///     .with_port_validation(true)
///     .with_unbound_input_warnings(false);
/// assert!(config.validate_ports);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    /// Reject edges and outputs naming ports the pass type does not declare.
    pub validate_ports: bool,
    /// Log a warning on build for every required input left unbound.
    pub warn_unbound_inputs: bool,
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port_validation(mut self, enabled: bool) -> Self {
        self.validate_ports = enabled;
        self
    }

    pub fn with_unbound_input_warnings(mut self, enabled: bool) -> Self {
        self.warn_unbound_inputs = enabled;
        self
    }

    /// Configuration with every reflection-based check enabled.
    pub fn strict() -> Self {
        Self {
            validate_ports: true,
            warn_unbound_inputs: true,
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            validate_ports: false,
            warn_unbound_inputs: true,
        }
    }
}
