//! Port and property reflection for pass types.
//!
//! A pass type may describe which ports it exposes and which options it
//! understands. The builder only consults this when port validation is
//! enabled; without reflection every port name is accepted.

use std::fmt;

/// Whether a port consumes or produces a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Declared port of a pass type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDesc {
    pub name: String,
    pub direction: PortDirection,
    /// Optional inputs may be left unbound.
    pub optional: bool,
    pub description: String,
}

/// Ports and options declared by a pass type.
///
/// # Example
///
/// ```
/// use redlilium_graph::PassReflection;
///
/// let reflection = PassReflection::new("ToneMapper")
///     .with_input("src", "Source texture")
///     .with_output("dst", "Tone-mapped output texture")
///     .with_properties(["operator", "autoExposure"]);
///
/// assert!(reflection.input("src").is_some());
/// assert!(reflection.output("src").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReflection {
    pass_type: String,
    ports: Vec<PortDesc>,
    properties: Vec<String>,
}

impl PassReflection {
    pub fn new(pass_type: impl Into<String>) -> Self {
        Self {
            pass_type: pass_type.into(),
            ports: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_input(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.with_port(name, PortDirection::Input, false, description)
    }

    pub fn with_optional_input(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.with_port(name, PortDirection::Input, true, description)
    }

    pub fn with_output(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.with_port(name, PortDirection::Output, false, description)
    }

    pub fn with_port(
        mut self,
        name: impl Into<String>,
        direction: PortDirection,
        optional: bool,
        description: impl Into<String>,
    ) -> Self {
        self.ports.push(PortDesc {
            name: name.into(),
            direction,
            optional,
            description: description.into(),
        });
        self
    }

    pub fn with_properties<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn pass_type(&self) -> &str {
        &self.pass_type
    }

    pub fn ports(&self) -> &[PortDesc] {
        &self.ports
    }

    pub fn port(&self, name: &str, direction: PortDirection) -> Option<&PortDesc> {
        self.ports
            .iter()
            .find(|p| p.direction == direction && p.name == name)
    }

    pub fn input(&self, name: &str) -> Option<&PortDesc> {
        self.port(name, PortDirection::Input)
    }

    pub fn output(&self, name: &str) -> Option<&PortDesc> {
        self.port(name, PortDirection::Output)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &PortDesc> {
        self.ports
            .iter()
            .filter(|p| p.direction == PortDirection::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &PortDesc> {
        self.ports
            .iter()
            .filter(|p| p.direction == PortDirection::Output)
    }

    /// Inputs that must be bound for the pass to produce meaningful output.
    pub fn required_inputs(&self) -> impl Iterator<Item = &PortDesc> {
        self.inputs().filter(|p| !p.optional)
    }

    /// Known option names. Empty means the pass does not publish them.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    pub fn knows_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restir() -> PassReflection {
        PassReflection::new("ColorReSTIR")
            .with_input("vbuffer", "Visibility buffer in packed format")
            .with_optional_input("viewW", "World-space view direction")
            .with_output("color", "Output color")
    }

    #[test]
    fn test_required_inputs() {
        let reflection = restir();
        let required: Vec<_> = reflection.required_inputs().map(|p| &p.name).collect();
        assert_eq!(required, vec!["vbuffer"]);
        assert_eq!(reflection.inputs().count(), 2);
        assert_eq!(reflection.outputs().count(), 1);
    }

    #[test]
    fn test_bidirectional_port() {
        let reflection = PassReflection::new("FileIO")
            .with_input("src", "")
            .with_output("src", "");
        assert!(reflection.input("src").is_some());
        assert!(reflection.output("src").is_some());
    }

    #[test]
    fn test_properties() {
        let reflection = restir().with_properties(["gMaxConfidence"]);
        assert!(reflection.knows_property("gMaxConfidence"));
        assert!(!reflection.knows_property("maxBounces"));
    }
}
