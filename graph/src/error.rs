//! Render graph construction errors.

use thiserror::Error;

use crate::reflection::PortDirection;

/// Errors that can occur while assembling a render graph.
///
/// Every variant describes a malformed graph description. None of them are
/// retryable: the builder reports the first problem it finds and leaves its
/// previously accepted state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A pass with this instance name already exists in the graph.
    #[error("pass '{name}' already exists in the graph")]
    DuplicateName { name: String },

    /// The pass registry does not know this pass type.
    #[error("unknown pass type '{pass_type}'")]
    UnknownPassType { pass_type: String },

    /// The registry knows the pass type but rejected its configuration.
    #[error("invalid configuration for pass type '{pass_type}': {message}")]
    InvalidPassConfig { pass_type: String, message: String },

    /// The instance name cannot be used to address ports.
    #[error("invalid pass name '{name}': {reason}")]
    InvalidPassName { name: String, reason: &'static str },

    /// A port reference is not of the form `instance.port`.
    #[error("malformed port reference '{reference}', expected 'instance.port'")]
    MalformedPortReference { reference: String },

    /// A port reference names an instance that is not in the graph.
    #[error("port reference '{reference}' names unknown pass '{instance}'")]
    UnknownPortReference { reference: String, instance: String },

    /// The pass type does not declare the referenced port.
    #[error("pass '{instance}' ({pass_type}) has no {direction} port '{port}'")]
    UnknownPort {
        instance: String,
        pass_type: String,
        port: String,
        direction: PortDirection,
    },

    /// The destination input already has an incoming edge.
    #[error("input '{port}' is already bound to '{bound_to}'")]
    PortAlreadyBound { port: String, bound_to: String },

    /// Pass dependencies form a directed cycle.
    #[error("dependency cycle detected among: {}", involved.join(", "))]
    CycleDetected { involved: Vec<String> },

    /// The builder has already produced its graph.
    #[error("render graph builder is closed")]
    BuilderClosed,
}

/// Result alias for graph construction.
pub type GraphResult<T> = Result<T, GraphError>;
