//! Pass type resolution.
//!
//! The registry is the boundary to the host: it turns a pass type name and
//! its options into something the host can execute. The graph layer only
//! needs the resulting [`PassHandle`] and, optionally, the type's
//! [`PassReflection`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{GraphError, GraphResult};
use crate::pass::PassHandle;
use crate::reflection::PassReflection;
use crate::value::PassConfig;

/// Resolves pass type names to executable passes.
pub trait PassRegistry: Send + Sync {
    /// Resolve `pass_type` configured with `config`.
    ///
    /// Returns [`GraphError::UnknownPassType`] for unrecognized types.
    fn resolve(&self, pass_type: &str, config: &PassConfig) -> GraphResult<PassHandle>;

    /// Port and option reflection for `pass_type`, if published.
    fn reflect(&self, _pass_type: &str) -> Option<&PassReflection> {
        None
    }
}

/// Registry that accepts every pass type.
///
/// Used when graphs are assembled outside a host, where there is nothing to
/// resolve against.
#[derive(Debug, Default)]
pub struct OpenRegistry {
    next_handle: AtomicU32,
}

impl OpenRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PassRegistry for OpenRegistry {
    fn resolve(&self, pass_type: &str, _config: &PassConfig) -> GraphResult<PassHandle> {
        if pass_type.is_empty() {
            return Err(GraphError::UnknownPassType {
                pass_type: String::new(),
            });
        }
        Ok(PassHandle::new(
            self.next_handle.fetch_add(1, Ordering::Relaxed),
        ))
    }
}

/// Validates a pass configuration, returning a message on rejection.
pub type ConfigValidator = Box<dyn Fn(&PassConfig) -> Result<(), String> + Send + Sync>;

struct Descriptor {
    reflection: PassReflection,
    validator: Option<ConfigValidator>,
}

/// Registry of explicitly described pass types.
///
/// Only registered types resolve. Options missing from a type's published
/// property list are reported with a warning and otherwise ignored, the same
/// way the host passes treat them.
#[derive(Default)]
pub struct DescriptorRegistry {
    descriptors: HashMap<String, Descriptor>,
    next_handle: AtomicU32,
}

impl DescriptorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pass type. A previous registration of the same type is
    /// replaced.
    pub fn register(&mut self, reflection: PassReflection) {
        self.insert(reflection, None);
    }

    /// Register a pass type whose configuration is checked on resolve.
    pub fn register_with_validator<F>(&mut self, reflection: PassReflection, validator: F)
    where
        F: Fn(&PassConfig) -> Result<(), String> + Send + Sync + 'static,
    {
        self.insert(reflection, Some(Box::new(validator)));
    }

    fn insert(&mut self, reflection: PassReflection, validator: Option<ConfigValidator>) {
        let pass_type = reflection.pass_type().to_string();
        if self.descriptors.contains_key(&pass_type) {
            log::debug!("Replacing pass type '{pass_type}' in registry");
        }
        self.descriptors.insert(
            pass_type,
            Descriptor {
                reflection,
                validator,
            },
        );
    }

    pub fn contains(&self, pass_type: &str) -> bool {
        self.descriptors.contains_key(pass_type)
    }

    /// Registered pass type names, sorted.
    pub fn pass_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl PassRegistry for DescriptorRegistry {
    fn resolve(&self, pass_type: &str, config: &PassConfig) -> GraphResult<PassHandle> {
        let descriptor =
            self.descriptors
                .get(pass_type)
                .ok_or_else(|| GraphError::UnknownPassType {
                    pass_type: pass_type.to_string(),
                })?;

        let reflection = &descriptor.reflection;
        if !reflection.properties().is_empty() {
            for key in config.keys() {
                if !reflection.knows_property(key) {
                    log::warn!("Unknown property '{key}' in {pass_type} properties.");
                }
            }
        }

        if let Some(validator) = &descriptor.validator {
            validator(config).map_err(|message| GraphError::InvalidPassConfig {
                pass_type: pass_type.to_string(),
                message,
            })?;
        }

        Ok(PassHandle::new(
            self.next_handle.fetch_add(1, Ordering::Relaxed),
        ))
    }

    fn reflect(&self, pass_type: &str) -> Option<&PassReflection> {
        self.descriptors.get(pass_type).map(|d| &d.reflection)
    }
}

impl std::fmt::Debug for DescriptorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorRegistry")
            .field("pass_types", &self.pass_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ConfigValue;

    #[test]
    fn test_open_registry_accepts_any_type() {
        let registry = OpenRegistry::new();
        let a = registry.resolve("GBufferRT", &PassConfig::new()).unwrap();
        let b = registry.resolve("Whatever", &PassConfig::new()).unwrap();
        assert_ne!(a, b);
        assert!(registry.reflect("GBufferRT").is_none());
    }

    #[test]
    fn test_open_registry_rejects_empty_type() {
        let registry = OpenRegistry::new();
        assert!(matches!(
            registry.resolve("", &PassConfig::new()),
            Err(GraphError::UnknownPassType { .. })
        ));
    }

    #[test]
    fn test_descriptor_registry_unknown_type() {
        let mut registry = DescriptorRegistry::new();
        registry.register(PassReflection::new("ToneMapper"));

        assert!(registry.resolve("ToneMapper", &PassConfig::new()).is_ok());
        assert_eq!(
            registry.resolve("NRD", &PassConfig::new()),
            Err(GraphError::UnknownPassType {
                pass_type: "NRD".to_string()
            })
        );
    }

    #[test]
    fn test_descriptor_registry_validator() {
        let mut registry = DescriptorRegistry::new();
        registry.register_with_validator(PassReflection::new("AccumulatePass"), |config| {
            match config.get("maxFrameCount") {
                Some(ConfigValue::Int(n)) if *n < 0 => Err("maxFrameCount is negative".into()),
                _ => Ok(()),
            }
        });

        let ok = PassConfig::new().with("maxFrameCount", 0);
        assert!(registry.resolve("AccumulatePass", &ok).is_ok());

        let bad = PassConfig::new().with("maxFrameCount", -1);
        assert_eq!(
            registry.resolve("AccumulatePass", &bad),
            Err(GraphError::InvalidPassConfig {
                pass_type: "AccumulatePass".to_string(),
                message: "maxFrameCount is negative".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_property_is_not_an_error() {
        let mut registry = DescriptorRegistry::new();
        registry.register(PassReflection::new("ToneMapper").with_properties(["operator"]));

        let config = PassConfig::new().with("operator", "Aces").with("bogus", 1);
        assert!(registry.resolve("ToneMapper", &config).is_ok());
    }

    #[test]
    fn test_pass_types_sorted() {
        let mut registry = DescriptorRegistry::new();
        registry.register(PassReflection::new("ToneMapper"));
        registry.register(PassReflection::new("AccumulatePass"));
        registry.register(PassReflection::new("ToneMapper"));
        assert_eq!(registry.pass_types(), vec!["AccumulatePass", "ToneMapper"]);
        assert_eq!(registry.len(), 2);
    }
}
