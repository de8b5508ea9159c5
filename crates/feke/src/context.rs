//! Global context for CLI commands

use crate::cli::GlobalArgs;
use anyhow::{Context as _, Result};
use feke_core::config::{CONFIG_FILE, FekeConfig};
use feke_core::TemplateRenderer;
use std::env;
use std::path::{Path, PathBuf};

/// Renderer configured from feke.toml and command-line overrides
pub struct Context {
    pub renderer: TemplateRenderer,
    /// Config file in use, if any
    pub config_path: Option<PathBuf>,
    pub verbose: bool,
}

impl Context {
    /// Load configuration and build the renderer
    ///
    /// An explicit `--config` (or `FEKE_CONFIG`) must exist. Without one,
    /// `./feke.toml` is used when present, otherwise the current directory
    /// is the template directory and caching is off.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - A configured or overridden directory does not exist
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let current_dir = env::current_dir()?;

        let config_path = match &globals.config {
            Some(path) => Some(path.clone()),
            None => Some(current_dir.join(CONFIG_FILE)).filter(|path| path.is_file()),
        };

        let (config, base_dir) = match &config_path {
            Some(path) => {
                let config = FekeConfig::from_file(path)?;
                let base_dir = path
                    .parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| current_dir.clone());
                (config, base_dir)
            }
            None => {
                log::debug!("no {} found, using defaults", CONFIG_FILE);
                (FekeConfig::new("."), current_dir.clone())
            }
        };

        let mut renderer = TemplateRenderer::from_config(&config, &base_dir)?;

        if let Some(dir) = &globals.template_dir {
            renderer.configure_template_directory(dir)?;
            if config.templates.include_root.is_none() {
                renderer.configure_include_root(dir)?;
            }
        }

        if let Some(dir) = &globals.cache_dir {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create cache directory {}", dir.display()))?;
            renderer.configure_cache_directory(dir)?;
        }

        Ok(Self {
            renderer,
            config_path,
            verbose: globals.verbose,
        })
    }
}
