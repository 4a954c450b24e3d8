//! Bundled render graphs.

use std::fmt;
use std::sync::Arc;

use redlilium_graph::{
    BuilderConfig, GraphScript, OutputBinder, PassRegistry, RenderGraph, ScriptError,
};

/// The bundled ColorReSTIR graph variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// ColorReSTIR accumulated and tone mapped.
    ColorReStir,
    /// ColorReSTIR demodulated through ModulateIllumination and captured by
    /// FileIO before accumulation.
    ColorReStirModulated,
    /// ColorReSTIR denoised with SVGF.
    ColorReStirSvgf,
    /// ColorReSTIR denoised with NRD and remodulated.
    ColorReStirNrd,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::ColorReStir,
        Preset::ColorReStirModulated,
        Preset::ColorReStirSvgf,
        Preset::ColorReStirNrd,
    ];

    /// Name of the graph the preset defines.
    pub fn name(self) -> &'static str {
        match self {
            Preset::ColorReStir => "ColorReSTIR",
            Preset::ColorReStirModulated => "ColorReSTIRModulated",
            Preset::ColorReStirSvgf => "ColorReSTIRSVGF",
            Preset::ColorReStirNrd => "ColorReSTIRNRD",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    /// The preset's graph script.
    pub fn source(self) -> &'static str {
        match self {
            Preset::ColorReStir => include_str!("../graphs/color_restir.py"),
            Preset::ColorReStirModulated => include_str!("../graphs/color_restir_modulated.py"),
            Preset::ColorReStirSvgf => include_str!("../graphs/color_restir_svgf.py"),
            Preset::ColorReStirNrd => include_str!("../graphs/color_restir_nrd.py"),
        }
    }

    pub fn script(self) -> Result<GraphScript, ScriptError> {
        GraphScript::parse_single(self.source())
    }

    /// Build the preset against `registry` with port validation enabled.
    pub fn build(self, registry: Arc<dyn PassRegistry>) -> Result<RenderGraph, ScriptError> {
        let graph = self.script()?.build(registry, BuilderConfig::strict())?;
        Ok(graph)
    }

    /// Build every preset and hand it to `binder`.
    pub fn register_all(
        registry: Arc<dyn PassRegistry>,
        binder: &mut OutputBinder<'_>,
    ) -> Result<Vec<Arc<RenderGraph>>, ScriptError> {
        Self::ALL
            .into_iter()
            .map(|preset| {
                let graph = preset.build(Arc::clone(&registry))?;
                Ok(binder.register_graph(graph))
            })
            .collect()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_unique() {
        for (i, a) in Preset::ALL.iter().enumerate() {
            for b in &Preset::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_from_name() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(Preset::from_name("PathTracer"), None);
    }

    #[test]
    fn test_script_name_matches() {
        for preset in Preset::ALL {
            assert_eq!(preset.script().unwrap().name, preset.name());
        }
    }
}
