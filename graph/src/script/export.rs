//! Writer for the host's graph script format.

use std::fmt::{self, Write};

use super::{GraphOp, GraphScript, ScriptError};
use crate::value::ConfigValue;

/// Variable the graph is bound to inside the generated function.
const GRAPH_VAR: &str = "g";

/// Turn a graph name into an identifier usable as a function/module name.
fn identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

fn quote(s: &str) -> String {
    ConfigValue::Enum(s.to_string()).to_string()
}

/// Render `script` in the host layout.
///
/// Fails on float options that have no script literal (NaN, infinities).
pub(super) fn write_script(script: &GraphScript) -> Result<String, ScriptError> {
    check_literals(script)?;
    let mut out = String::new();
    write_body(&mut out, script).map_err(|e| ScriptError::Format(e.to_string()))?;
    Ok(out)
}

fn check_literals(script: &GraphScript) -> Result<(), ScriptError> {
    for op in &script.ops {
        let GraphOp::CreatePass { name, config, .. } = op else {
            continue;
        };
        for (key, value) in config.iter() {
            if let ConfigValue::Float(v) = value {
                if !v.is_finite() {
                    return Err(ScriptError::NonFiniteValue {
                        pass: name.clone(),
                        option: key.to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn write_body(out: &mut impl Write, script: &GraphScript) -> fmt::Result {
    let ident = identifier(&script.name);

    writeln!(out, "from pathlib import WindowsPath, PosixPath")?;
    writeln!(out, "from falcor import *")?;
    writeln!(out)?;
    writeln!(out, "def render_graph_{ident}():")?;
    writeln!(out, "    {GRAPH_VAR} = RenderGraph({})", quote(&script.name))?;

    for op in &script.ops {
        match op {
            GraphOp::CreatePass {
                name,
                pass_type,
                config,
            } => {
                let entries: Vec<String> = config
                    .iter()
                    .map(|(key, value)| format!("{}: {value}", quote(key)))
                    .collect();
                writeln!(
                    out,
                    "    {GRAPH_VAR}.create_pass({}, {}, {{{}}})",
                    quote(name),
                    quote(pass_type),
                    entries.join(", ")
                )?;
            }
            GraphOp::AddEdge { src, dst } => {
                writeln!(out, "    {GRAPH_VAR}.add_edge({}, {})", quote(src), quote(dst))?;
            }
            GraphOp::MarkOutput { port } => {
                writeln!(out, "    {GRAPH_VAR}.mark_output({})", quote(port))?;
            }
        }
    }

    writeln!(out, "    return {GRAPH_VAR}")?;
    writeln!(out)?;
    writeln!(out, "{ident} = render_graph_{ident}()")?;
    writeln!(out, "try: m.addGraph({ident})")?;
    writeln!(out, "except NameError: None")
}
