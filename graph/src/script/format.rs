//! RON encoding of graph scripts (feature-gated).

use super::{GraphScript, ScriptError};

impl GraphScript {
    /// Encode as pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, ScriptError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ScriptError::Format(e.to_string()))
    }

    /// Decode from RON produced by [`to_ron`](Self::to_ron).
    pub fn from_ron(text: &str) -> Result<Self, ScriptError> {
        ron::from_str(text).map_err(|e| ScriptError::Format(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PassConfig;

    #[test]
    fn test_ron_roundtrip() {
        let script = GraphScript::new("ColorReSTIR")
            .create_pass(
                "ColorReSTIR",
                "ColorReSTIR",
                PassConfig::new()
                    .with("gOutputMode", "Combined")
                    .with("gMaxConfidence", 20)
                    .with("gTemporalReuse", true)
                    .with("gAlpha", 0.05000000074505806),
            )
            .create_pass("AccumulatePass", "AccumulatePass", PassConfig::new())
            .add_edge("ColorReSTIR.color", "AccumulatePass.input")
            .mark_output("AccumulatePass.output");

        let text = script.to_ron().unwrap();
        assert!(text.contains("CreatePass"));
        assert_eq!(GraphScript::from_ron(&text).unwrap(), script);
    }

    #[test]
    fn test_from_ron_repeated_option() {
        let text = r#"(
            name: "Repeated",
            ops: [
                CreatePass(
                    name: "ToneMapper",
                    pass_type: "ToneMapper",
                    config: [("exposureCompensation", Int(1)), ("exposureCompensation", Int(2))],
                ),
            ],
        )"#;
        match GraphScript::from_ron(text) {
            Err(ScriptError::Format(message)) => {
                assert!(message.contains("duplicate option 'exposureCompensation'"), "{message}");
            }
            other => panic!("expected Format error, got {other:?}"),
        }

        let single = text.replace(r#", ("exposureCompensation", Int(2))"#, "");
        let script = GraphScript::from_ron(&single).unwrap();
        assert_eq!(script.pass_count(), 1);
    }

    #[test]
    fn test_from_ron_error() {
        assert!(matches!(
            GraphScript::from_ron("(name: 3)"),
            Err(ScriptError::Format(_))
        ));
    }
}
