//! Pass configuration values.
//!
//! Pass options are loosely typed on the host side: every option is one of a
//! handful of primitive kinds. [`ConfigValue`] is the tagged form of a single
//! option and [`PassConfig`] keeps them in declaration order.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// A single pass option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Enum options are carried by their variant name.
    Enum(String),
}

impl ConfigValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers widen to floats, the host does the same.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Short kind name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Enum(_) => "enum",
        }
    }
}

/// Renders the value as a script literal.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => {
                // Debug keeps the shortest round-trip form and always marks
                // the value as a float ("1.0", "1e-5").
                write!(f, "{v:?}")
            }
            Self::Enum(v) => {
                f.write_str("'")?;
                for c in v.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '\'' => f.write_str("\\'")?,
                        '\n' => f.write_str("\\n")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for ConfigValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for ConfigValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for ConfigValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f32> for ConfigValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        Self::Enum(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        Self::Enum(v)
    }
}

/// Ordered option name → value mapping for one pass instance.
///
/// Insertion order is preserved so exported scripts list options the way
/// they were declared. Keys are unique; deserializing a repeated key fails.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PassConfig {
    entries: Vec<(String, ConfigValue)>,
}

impl PassConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaining form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set an option, replacing an existing one in place.
    ///
    /// Returns the previous value if the key was already present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for PassConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<(String, ConfigValue)>::deserialize(deserializer)?;
        let mut config = PassConfig::new();
        for (key, value) in entries {
            if config.insert(key.as_str(), value).is_some() {
                return Err(D::Error::custom(format!("duplicate option '{key}'")));
            }
        }
        Ok(config)
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for PassConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = PassConfig::new();
        for (k, v) in iter {
            config.insert(k, v);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut config = PassConfig::new()
            .with("outputSize", "Default")
            .with("sampleCount", 16)
            .with("useAlphaTest", true);

        let old = config.insert("sampleCount", 8);
        assert_eq!(old, Some(ConfigValue::Int(16)));
        assert_eq!(
            config.keys().collect::<Vec<_>>(),
            vec!["outputSize", "sampleCount", "useAlphaTest"]
        );
        assert_eq!(config.get("sampleCount"), Some(&ConfigValue::Int(8)));
    }

    #[test]
    fn test_remove() {
        let mut config: PassConfig = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(config.remove("a"), Some(ConfigValue::Int(1)));
        assert_eq!(config.remove("a"), None);
        assert_eq!(config.len(), 1);
        assert!(!config.contains_key("a"));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ConfigValue::Int(3).as_float(), Some(3.0));
        assert_eq!(ConfigValue::Float(0.5).as_int(), None);
        assert_eq!(ConfigValue::from("Aces").as_str(), Some("Aces"));
        assert_eq!(ConfigValue::from(false).as_bool(), Some(false));
        assert_eq!(ConfigValue::from(2.0f32).type_name(), "float");
    }

    #[test]
    fn test_script_literals() {
        assert_eq!(ConfigValue::Bool(true).to_string(), "True");
        assert_eq!(ConfigValue::Int(-4).to_string(), "-4");
        assert_eq!(ConfigValue::Float(100.0).to_string(), "100.0");
        assert_eq!(
            ConfigValue::Float(11.199999809265137).to_string(),
            "11.199999809265137"
        );
        assert_eq!(ConfigValue::from("Back").to_string(), "'Back'");
        assert_eq!(ConfigValue::from("it's").to_string(), "'it\\'s'");
    }
}
