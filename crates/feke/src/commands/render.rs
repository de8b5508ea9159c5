//! Render command - render a template with variables

use crate::cli::{GlobalArgs, RenderArgs};
use crate::context::Context;
use crate::output::print_status;
use crate::vars::{load_vars_file, parse_var};
use anyhow::{Context as _, Result, anyhow};
use colored::Colorize;
use std::fs;
use std::io;

/// Render a template
///
/// Bindings from `--vars-file` are assigned first, then each `--var` in
/// order, so command-line values can override or extend the file.
/// Status lines go to stderr; stdout carries only the rendered output.
pub fn run(args: RenderArgs, globals: &GlobalArgs) -> Result<()> {
    let mut ctx = Context::new(globals)?;

    if ctx.verbose {
        if let Some(path) = &ctx.config_path {
            print_status(&format!("{} Using {}", "→".cyan(), path.display()))?;
        }
    }

    if args.no_cache {
        ctx.renderer.enable_cache(false);
    }
    if let Some(flag) = &args.cache {
        if let Err(e) = ctx.renderer.set_cache_flag(flag) {
            print_status(&format!("{} {}; rendering without cache", "!".yellow(), e))?;
        }
    }

    if let Some(path) = &args.vars_file {
        for (name, value) in load_vars_file(path)? {
            ctx.renderer
                .assign(&name, value)
                .map_err(|e| anyhow!("{} (in {})", e, path.display()))?;
        }
    }
    for arg in &args.vars {
        let (name, value) = parse_var(arg)?;
        ctx.renderer.assign(name, value)?;
    }

    match &args.output {
        Some(path) => {
            let outcome = ctx.renderer.render_with_status(&args.template)?;
            fs::write(path, &outcome.output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if ctx.verbose {
                print_status(&format!("{} Cache: {}", "→".cyan(), outcome.cache))?;
            }
            print_status(&format!(
                "{} Rendered {} to {}",
                "✓".green().bold(),
                args.template,
                path.display()
            ))?;
        }
        None if ctx.verbose => {
            let outcome = ctx.renderer.render_with_status(&args.template)?;
            print!("{}", outcome.output);
            let source = if outcome.cache.is_replay() {
                "cache"
            } else {
                "pipeline"
            };
            print_status(&format!(
                "\n{} Cache: {} (output from {})",
                "→".cyan(),
                outcome.cache,
                source
            ))?;
        }
        None => {
            ctx.renderer.display(&args.template, &mut io::stdout().lock())?;
        }
    }

    Ok(())
}
