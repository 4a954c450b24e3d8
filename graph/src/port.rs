//! Textual port addressing and edges.

use std::fmt;

use crate::error::{GraphError, GraphResult};

/// Reference to a port of a pass instance, written `instance.port`.
///
/// The instance name ends at the first `.`; everything after it is the port
/// name, which may itself contain spaces or dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortRef {
    instance: String,
    port: String,
}

impl PortRef {
    pub fn new(instance: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            port: port.into(),
        }
    }

    /// Parse an `instance.port` reference.
    pub fn parse(reference: &str) -> GraphResult<Self> {
        match reference.split_once('.') {
            Some((instance, port)) if !instance.is_empty() && !port.is_empty() => {
                Ok(Self::new(instance, port))
            }
            _ => Err(GraphError::MalformedPortReference {
                reference: reference.to_string(),
            }),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn port(&self) -> &str {
        &self.port
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.port)
    }
}

/// Data dependency from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub src: PortRef,
    pub dst: PortRef,
}

impl Edge {
    pub fn new(src: PortRef, dst: PortRef) -> Self {
        Self { src, dst }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let port = PortRef::parse("GBufferRT.vbuffer").unwrap();
        assert_eq!(port.instance(), "GBufferRT");
        assert_eq!(port.port(), "vbuffer");
        assert_eq!(port.to_string(), "GBufferRT.vbuffer");
    }

    #[test]
    fn test_parse_port_with_space() {
        let port = PortRef::parse("SVGFPass.Filtered image").unwrap();
        assert_eq!(port.instance(), "SVGFPass");
        assert_eq!(port.port(), "Filtered image");
    }

    #[test]
    fn test_parse_malformed() {
        for reference in ["nodot", ".port", "pass.", ""] {
            assert_eq!(
                PortRef::parse(reference),
                Err(GraphError::MalformedPortReference {
                    reference: reference.to_string()
                })
            );
        }
    }

    #[test]
    fn test_edge_display() {
        let edge = Edge::new(
            PortRef::new("AccumulatePass", "output"),
            PortRef::new("ToneMapper", "src"),
        );
        assert_eq!(edge.to_string(), "AccumulatePass.output -> ToneMapper.src");
    }
}
