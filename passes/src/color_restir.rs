//! Typed options of the `ColorReSTIR` pass.

use std::fmt;
use std::str::FromStr;

use redlilium_graph::{ConfigValue, PassConfig};
use thiserror::Error;

/// Pass type name.
pub const PASS_TYPE: &str = "ColorReSTIR";

pub const OUTPUT_MODE: &str = "gOutputMode";
pub const TEMPORAL_COLOR_ESTIMATE: &str = "gTemporalColorEstimate";
pub const NORMALIZE_COLOR_ESTIMATE: &str = "gNormalizeColorEstimate";
pub const REUSE_DEMODULATED: &str = "gReuseDemodulated";
pub const ANALYTICAL_SAMPLES: &str = "gAnalyticalSamples";
pub const ENVIRONMENT_SAMPLES: &str = "gEnvironmentSamples";
pub const EMISSIVE_SAMPLES: &str = "gEmissiveSamples";
pub const DELTA_SAMPLES: &str = "gDeltaSamples";
pub const CANDIDATES_VISIBILITY: &str = "gCandidatesVisibility";
pub const MAX_CONFIDENCE: &str = "gMaxConfidence";
pub const TEMPORAL_REUSE: &str = "gTemporalReuse";
pub const SPATIAL_REUSE: &str = "SPATIAL_REUSE";
pub const MAX_SPATIAL_SEARCH: &str = "gMaxSpatialSearch";
pub const SPATIAL_RADIUS: &str = "gSpatialRadius";

/// Option names in export order.
pub const PROPERTIES: [&str; 14] = [
    OUTPUT_MODE,
    TEMPORAL_COLOR_ESTIMATE,
    NORMALIZE_COLOR_ESTIMATE,
    REUSE_DEMODULATED,
    ANALYTICAL_SAMPLES,
    ENVIRONMENT_SAMPLES,
    EMISSIVE_SAMPLES,
    DELTA_SAMPLES,
    CANDIDATES_VISIBILITY,
    MAX_CONFIDENCE,
    TEMPORAL_REUSE,
    SPATIAL_REUSE,
    MAX_SPATIAL_SEARCH,
    SPATIAL_RADIUS,
];

/// Errors from reading typed options out of a [`PassConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("option '{key}' expects {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("option '{key}' has unknown value '{value}' (expected one of: {})", .expected.join(", "))]
    UnknownVariant {
        key: String,
        value: String,
        expected: &'static [&'static str],
    },

    #[error("option '{key}' is out of range: {value}")]
    OutOfRange { key: String, value: i64 },
}

macro_rules! option_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            const NAMES: &'static [&'static str] = &[$(stringify!($variant)),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err(()),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

option_enum! {
    /// What the pass writes to its `color` output.
    OutputMode { Default, Luminance, ColorDistribution, Combined }
}

option_enum! {
    /// How the temporal color estimate is formed.
    TemporalColorEstimate { None, Full, Gradient }
}

/// Options of the `ColorReSTIR` pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorReStirOptions {
    pub output_mode: OutputMode,
    pub temporal_color_estimate: TemporalColorEstimate,
    pub normalize_color_estimate: bool,
    pub reuse_demodulated: bool,
    pub analytical_samples: u32,
    pub environment_samples: u32,
    pub emissive_samples: u32,
    pub delta_samples: u32,
    pub candidates_visibility: bool,
    pub max_confidence: u32,
    pub temporal_reuse: bool,
    pub spatial_reuse: u32,
    pub max_spatial_search: u32,
    pub spatial_radius: u32,
}

impl Default for ColorReStirOptions {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::Combined,
            temporal_color_estimate: TemporalColorEstimate::Gradient,
            normalize_color_estimate: false,
            reuse_demodulated: false,
            analytical_samples: 4,
            environment_samples: 4,
            emissive_samples: 4,
            delta_samples: 1,
            candidates_visibility: false,
            max_confidence: 20,
            temporal_reuse: true,
            spatial_reuse: 1,
            max_spatial_search: 10,
            spatial_radius: 20,
        }
    }
}

impl ColorReStirOptions {
    /// Read options from `config`, starting from the defaults.
    ///
    /// Unknown keys are logged and skipped.
    pub fn from_config(config: &PassConfig) -> Result<Self, OptionError> {
        Self::read(config, true)
    }

    /// Type-check the known keys of `config` without logging unknown ones.
    pub fn validate(config: &PassConfig) -> Result<(), OptionError> {
        Self::read(config, false).map(drop)
    }

    fn read(config: &PassConfig, warn_unknown: bool) -> Result<Self, OptionError> {
        let mut options = Self::default();
        for (key, value) in config.iter() {
            match key {
                OUTPUT_MODE => options.output_mode = read_enum(key, value, OutputMode::NAMES)?,
                TEMPORAL_COLOR_ESTIMATE => {
                    options.temporal_color_estimate =
                        read_enum(key, value, TemporalColorEstimate::NAMES)?
                }
                NORMALIZE_COLOR_ESTIMATE => options.normalize_color_estimate = read_bool(key, value)?,
                REUSE_DEMODULATED => options.reuse_demodulated = read_bool(key, value)?,
                ANALYTICAL_SAMPLES => options.analytical_samples = read_count(key, value)?,
                ENVIRONMENT_SAMPLES => options.environment_samples = read_count(key, value)?,
                EMISSIVE_SAMPLES => options.emissive_samples = read_count(key, value)?,
                DELTA_SAMPLES => options.delta_samples = read_count(key, value)?,
                CANDIDATES_VISIBILITY => options.candidates_visibility = read_bool(key, value)?,
                MAX_CONFIDENCE => options.max_confidence = read_count(key, value)?,
                TEMPORAL_REUSE => options.temporal_reuse = read_bool(key, value)?,
                SPATIAL_REUSE => options.spatial_reuse = read_count(key, value)?,
                MAX_SPATIAL_SEARCH => options.max_spatial_search = read_count(key, value)?,
                SPATIAL_RADIUS => options.spatial_radius = read_count(key, value)?,
                _ if warn_unknown => {
                    log::warn!("Unknown property '{key}' in {PASS_TYPE} properties.")
                }
                _ => {}
            }
        }
        Ok(options)
    }

    /// Write every option, in export order.
    pub fn to_config(&self) -> PassConfig {
        PassConfig::new()
            .with(OUTPUT_MODE, self.output_mode.as_str())
            .with(TEMPORAL_COLOR_ESTIMATE, self.temporal_color_estimate.as_str())
            .with(NORMALIZE_COLOR_ESTIMATE, self.normalize_color_estimate)
            .with(REUSE_DEMODULATED, self.reuse_demodulated)
            .with(ANALYTICAL_SAMPLES, self.analytical_samples)
            .with(ENVIRONMENT_SAMPLES, self.environment_samples)
            .with(EMISSIVE_SAMPLES, self.emissive_samples)
            .with(DELTA_SAMPLES, self.delta_samples)
            .with(CANDIDATES_VISIBILITY, self.candidates_visibility)
            .with(MAX_CONFIDENCE, self.max_confidence)
            .with(TEMPORAL_REUSE, self.temporal_reuse)
            .with(SPATIAL_REUSE, self.spatial_reuse)
            .with(MAX_SPATIAL_SEARCH, self.max_spatial_search)
            .with(SPATIAL_RADIUS, self.spatial_radius)
    }
}

fn read_bool(key: &str, value: &ConfigValue) -> Result<bool, OptionError> {
    value.as_bool().ok_or_else(|| OptionError::WrongType {
        key: key.to_string(),
        expected: "bool",
        found: value.type_name(),
    })
}

fn read_count(key: &str, value: &ConfigValue) -> Result<u32, OptionError> {
    let v = value.as_int().ok_or_else(|| OptionError::WrongType {
        key: key.to_string(),
        expected: "int",
        found: value.type_name(),
    })?;
    u32::try_from(v).map_err(|_| OptionError::OutOfRange {
        key: key.to_string(),
        value: v,
    })
}

fn read_enum<T: FromStr>(
    key: &str,
    value: &ConfigValue,
    names: &'static [&'static str],
) -> Result<T, OptionError> {
    let s = value.as_str().ok_or_else(|| OptionError::WrongType {
        key: key.to_string(),
        expected: "enum",
        found: value.type_name(),
    })?;
    s.parse().map_err(|_| OptionError::UnknownVariant {
        key: key.to_string(),
        value: s.to_string(),
        expected: names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ColorReStirOptions::from_config(&PassConfig::new()).unwrap();
        assert_eq!(options, ColorReStirOptions::default());
        assert_eq!(options.output_mode, OutputMode::Combined);
        assert_eq!(options.temporal_color_estimate, TemporalColorEstimate::Gradient);
        assert_eq!(options.analytical_samples, 4);
        assert_eq!(options.delta_samples, 1);
        assert_eq!(options.max_confidence, 20);
        assert!(options.temporal_reuse);
        assert_eq!(options.spatial_radius, 20);
    }

    #[test]
    fn test_from_config() {
        let config = PassConfig::new()
            .with(OUTPUT_MODE, "Luminance")
            .with(TEMPORAL_COLOR_ESTIMATE, "Full")
            .with(ANALYTICAL_SAMPLES, 1)
            .with(CANDIDATES_VISIBILITY, true)
            .with("gDemodulateOutput", false);
        let options = ColorReStirOptions::from_config(&config).unwrap();
        assert_eq!(options.output_mode, OutputMode::Luminance);
        assert_eq!(options.temporal_color_estimate, TemporalColorEstimate::Full);
        assert_eq!(options.analytical_samples, 1);
        assert!(options.candidates_visibility);
        assert_eq!(options.environment_samples, 4);
    }

    #[test]
    fn test_to_config_order() {
        let config = ColorReStirOptions::default().to_config();
        assert_eq!(config.keys().collect::<Vec<_>>(), PROPERTIES);
        assert_eq!(config.get(OUTPUT_MODE), Some(&ConfigValue::from("Combined")));
        assert_eq!(config.get(SPATIAL_REUSE), Some(&ConfigValue::Int(1)));
        assert_eq!(
            ColorReStirOptions::from_config(&config).unwrap(),
            ColorReStirOptions::default()
        );
    }

    #[test]
    fn test_wrong_type() {
        let config = PassConfig::new().with(TEMPORAL_REUSE, 1);
        assert_eq!(
            ColorReStirOptions::validate(&config),
            Err(OptionError::WrongType {
                key: TEMPORAL_REUSE.into(),
                expected: "bool",
                found: "int"
            })
        );
    }

    #[test]
    fn test_unknown_variant() {
        let config = PassConfig::new().with(OUTPUT_MODE, "Radiance");
        let err = ColorReStirOptions::from_config(&config).unwrap_err();
        assert!(matches!(err, OptionError::UnknownVariant { ref value, .. } if value == "Radiance"));
        assert!(err.to_string().contains("Default, Luminance, ColorDistribution, Combined"));
    }

    #[test]
    fn test_negative_count() {
        let config = PassConfig::new().with(MAX_SPATIAL_SEARCH, -1);
        assert_eq!(
            ColorReStirOptions::from_config(&config),
            Err(OptionError::OutOfRange {
                key: MAX_SPATIAL_SEARCH.into(),
                value: -1
            })
        );
    }

    #[test]
    fn test_enum_names() {
        for mode in OutputMode::ALL {
            assert_eq!(mode.as_str().parse::<OutputMode>(), Ok(*mode));
        }
        assert_eq!(TemporalColorEstimate::None.to_string(), "None");
        assert!("none".parse::<TemporalColorEstimate>().is_err());
    }
}
