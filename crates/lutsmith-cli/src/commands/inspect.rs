//! Preset inspection command

use anyhow::Result;
use lutsmith_core::ColorSettings;
use serde_json::Value;

use crate::InspectArgs;

pub fn run(args: InspectArgs) -> Result<()> {
    let preset = super::load_preset(&args.preset)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preset.settings)?);
        return Ok(());
    }

    println!("File:   {}", args.preset.display());
    if let Some(name) = &preset.name {
        println!("Name:   {name}");
    }

    let changed = changed_fields(&preset.settings)?;
    if changed.is_empty() {
        println!("Settings: all neutral (identity transform)");
        return Ok(());
    }
    println!("Settings ({} changed):", changed.len());
    for (field, value) in changed {
        println!("  {field:<32} {value}");
    }
    Ok(())
}

/// Dotted paths and values of every field that differs from the default.
pub fn changed_fields(settings: &ColorSettings) -> Result<Vec<(String, String)>> {
    let actual = serde_json::to_value(settings)?;
    let neutral = serde_json::to_value(ColorSettings::default())?;
    let mut out = Vec::new();
    collect_changes("", &actual, &neutral, &mut out);
    Ok(out)
}

fn collect_changes(prefix: &str, actual: &Value, neutral: &Value, out: &mut Vec<(String, String)>) {
    match (actual, neutral) {
        (Value::Object(a), Value::Object(n)) => {
            for (key, value) in a {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_changes(&path, value, n.get(key).unwrap_or(&Value::Null), out);
            }
        }
        _ if actual != neutral => out.push((prefix.to_string(), actual.to_string())),
        _ => {}
    }
}
