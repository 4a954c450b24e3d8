//! Registry over the standard catalog.

use redlilium_graph::DescriptorRegistry;

use crate::catalog;
use crate::color_restir::ColorReStirOptions;

/// A [`DescriptorRegistry`] with every catalog pass type registered.
///
/// `ColorReSTIR` configurations are type-checked on resolve; the other pass
/// types only have their option names checked.
///
/// # Example
///
/// ```
/// use redlilium_passes::standard_registry;
///
/// let registry = standard_registry();
/// assert!(registry.contains("ColorReSTIR"));
/// assert_eq!(registry.len(), 9);
/// ```
pub fn standard_registry() -> DescriptorRegistry {
    let mut registry = DescriptorRegistry::new();
    for reflection in catalog::standard_passes() {
        if reflection.pass_type() == crate::color_restir::PASS_TYPE {
            registry.register_with_validator(reflection, |config| {
                ColorReStirOptions::validate(config).map_err(|e| e.to_string())
            });
        } else {
            registry.register(reflection);
        }
    }
    log::debug!("Standard registry: {} pass types", registry.len());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use redlilium_graph::{GraphError, PassConfig, PassRegistry};

    #[test]
    fn test_all_catalog_types_resolve() {
        let registry = standard_registry();
        for pass_type in catalog::PASS_TYPES {
            assert!(registry.resolve(pass_type, &PassConfig::new()).is_ok(), "{pass_type}");
            assert!(registry.reflect(pass_type).is_some(), "{pass_type}");
        }
        assert!(matches!(
            registry.resolve("PathTracer", &PassConfig::new()),
            Err(GraphError::UnknownPassType { .. })
        ));
    }

    #[test]
    fn test_color_restir_config_checked() {
        let registry = standard_registry();
        let bad = PassConfig::new().with("gOutputMode", "Radiance");
        match registry.resolve("ColorReSTIR", &bad) {
            Err(GraphError::InvalidPassConfig { pass_type, message }) => {
                assert_eq!(pass_type, "ColorReSTIR");
                assert!(message.contains("Radiance"));
            }
            other => panic!("expected InvalidPassConfig, got {other:?}"),
        }

        // Unknown keys are tolerated.
        let legacy = PassConfig::new().with("maxBounces", 3).with("gMaxConfidence", 20);
        assert!(registry.resolve("ColorReSTIR", &legacy).is_ok());
    }
}
