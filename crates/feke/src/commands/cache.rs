//! Cache command - inspect and clear rendered entries

use crate::cli::GlobalArgs;
use crate::context::Context;
use crate::output::{print_json, print_text};
use anyhow::Result;
use colored::Colorize;
use feke_core::cache::{CacheError, Freshness};
use serde_json::json;

/// Show the cache entry for a template
///
/// Checks source and include modification times only; bindings are not
/// known here, so a fresh entry may still be re-rendered by `render`.
pub fn status(template: &str, json: bool, globals: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(globals)?;
    let store = ctx.renderer.cache_store();
    let entry_path = store.entry_path(template);
    let source = ctx.renderer.template_path(template)?;

    let inspected = match store.inspect(template, &source) {
        Ok(found) => Ok(found),
        Err(CacheError::Corrupt { reason, .. }) => Err(reason),
        Err(e) => return Err(e.into()),
    };

    if json {
        let entry = match &inspected {
            Ok(Some((entry, freshness))) => {
                let stale_reason = match freshness {
                    Freshness::Fresh => None,
                    Freshness::Stale(reason) => Some(reason.to_string()),
                };
                json!({
                    "header": entry.header,
                    "fresh": stale_reason.is_none(),
                    "stale_reason": stale_reason,
                })
            }
            Ok(None) => serde_json::Value::Null,
            Err(reason) => json!({ "corrupt": reason }),
        };
        let output = json!({
            "schema_version": "1.0",
            "template": template,
            "source": source.display().to_string(),
            "source_exists": source.is_file(),
            "cache_enabled": ctx.renderer.cache_enabled(),
            "path": entry_path.display().to_string(),
            "entry": entry,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        print_json(&serde_json::to_string_pretty(&output)?)?;
        return Ok(());
    }

    match inspected {
        Ok(Some((entry, freshness))) => {
            let header = &entry.header;
            match freshness {
                Freshness::Fresh => print_text(&format!(
                    "{} {} is cached at {}",
                    "✓".green().bold(),
                    template,
                    entry_path.display()
                ))?,
                Freshness::Stale(reason) => print_text(&format!(
                    "{} {} is stale at {}: {}",
                    "!".yellow(),
                    template,
                    entry_path.display(),
                    reason
                ))?,
            }
            print_text(&format!("  - rendered at {}", header.rendered_at.to_rfc3339()))?;
            print_text(&format!("  - {} bytes of output", header.output_len))?;
            print_text(&format!("  - bindings {}", header.bindings))?;
            for include in &header.sources {
                print_text(&format!("  - includes {}", include.display()))?;
            }
        }
        Ok(None) => print_text(&format!(
            "{} No cache entry for {} ({})",
            "→".cyan(),
            template,
            entry_path.display()
        ))?,
        Err(reason) => print_text(&format!(
            "{} Corrupt cache entry {}: {}",
            "!".yellow(),
            entry_path.display(),
            reason
        ))?,
    }

    if ctx.verbose && !ctx.renderer.cache_enabled() {
        print_text("  (caching is disabled in the current configuration)")?;
    }

    Ok(())
}

/// Remove every cache entry in the configured directory
pub fn clear(globals: &GlobalArgs) -> Result<()> {
    let ctx = Context::new(globals)?;
    let store = ctx.renderer.cache_store();
    let removed = store.clear()?;

    let noun = if removed == 1 { "entry" } else { "entries" };
    print_text(&format!(
        "{} Removed {} cache {} from {}",
        "✓".green().bold(),
        removed,
        noun,
        store.dir().display()
    ))?;

    Ok(())
}
