//! Variable bindings from the command line and vars files

use anyhow::{Context as _, Result, anyhow, bail};
use feke_core::Value;
use std::fs;
use std::path::Path;

/// Split a `--var NAME=VALUE` argument
pub fn parse_var(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| anyhow!("Invalid --var '{}': expected NAME=VALUE", arg))
}

/// Top-level bindings from a JSON or TOML file
///
/// The format follows the extension: `.toml` is TOML, anything else JSON.
/// The document must be an object/table; its keys are variable names.
pub fn load_vars_file(path: &Path) -> Result<Vec<(String, Value)>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read vars file {}", path.display()))?;

    let is_toml = path.extension().and_then(|ext| ext.to_str()) == Some("toml");
    if is_toml {
        let table: toml::Table = toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?;
        return Ok(table
            .into_iter()
            .map(|(name, value)| (name, Value::from_toml(value)))
            .collect());
    }

    let json: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    match json {
        serde_json::Value::Object(map) => Ok(map
            .into_iter()
            .map(|(name, value)| (name, Value::from_json(value)))
            .collect()),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}
