//! Renderer: configuration, bindings and the cached render path

use super::binding::{Bindings, Value};
use super::engine::{resolve_relative, TemplateEngine};
use super::error::TemplateError;
use crate::cache::{
    CacheEntry, CacheError, CacheStatus, CacheStore, Freshness, StaleReason,
    DEFAULT_CACHE_EXTENSION,
};
use crate::config::FekeConfig;
use crate::error::{FekeError, Result};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Rendered output plus how the cache took part
#[derive(Debug)]
pub struct RenderOutcome {
    pub output: String,
    pub cache: CacheStatus,
}

/// Renders named templates from a template directory
///
/// Holds its own configuration and bindings; nothing is global. Directory
/// setters fail closed: on error the previous value stays in effect.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    template_dir: PathBuf,
    include_root: PathBuf,
    cache_dir: PathBuf,
    cache_extension: String,
    cache_enabled: bool,
    bindings: Bindings,
}

impl TemplateRenderer {
    /// Renderer rooted at the current directory with caching off
    pub fn new() -> Self {
        Self {
            template_dir: PathBuf::from("."),
            include_root: PathBuf::from("."),
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("feke"),
            cache_extension: DEFAULT_CACHE_EXTENSION.to_string(),
            cache_enabled: false,
            bindings: Bindings::new(),
        }
    }

    /// Build a renderer from `feke.toml`, resolving relative paths against
    /// `base_dir`
    ///
    /// A missing cache directory is created when caching is enabled.
    pub fn from_config(config: &FekeConfig, base_dir: &Path) -> Result<Self> {
        config.validate()?;

        let mut renderer = Self::new();
        renderer.configure_template_directory(config.template_dir(base_dir))?;
        renderer.configure_include_root(config.include_root(base_dir))?;

        let cache_dir = config.cache_dir(base_dir)?;
        if config.cache.enabled && !cache_dir.exists() {
            fs::create_dir_all(&cache_dir).map_err(|e| {
                FekeError::Cache(CacheError::io(e, &cache_dir, "create cache directory"))
            })?;
        }
        if cache_dir.is_dir() {
            renderer.configure_cache_directory(&cache_dir)?;
        } else {
            renderer.cache_dir = cache_dir;
        }

        renderer.cache_extension = config.cache.extension.clone();
        renderer.enable_cache(config.cache.enabled);
        Ok(renderer)
    }

    pub fn configure_template_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.template_dir = existing_dir("template", path.as_ref())?;
        Ok(())
    }

    pub fn configure_cache_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.cache_dir = existing_dir("cache", path.as_ref())?;
        Ok(())
    }

    /// Base path for first-pass `{include}` resolution
    pub fn configure_include_root(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.include_root = existing_dir("include root", path.as_ref())?;
        Ok(())
    }

    pub fn enable_cache(&mut self, enabled: bool) {
        self.cache_enabled = enabled;
    }

    /// Switch caching from a boolean-like string
    ///
    /// Accepts `true/false/1/0/yes/no/on/off` in any case. Anything else is
    /// an error and leaves caching disabled.
    pub fn set_cache_flag(&mut self, flag: &str) -> Result<()> {
        match parse_flag(flag) {
            Some(enabled) => {
                self.cache_enabled = enabled;
                Ok(())
            }
            None => {
                self.cache_enabled = false;
                Err(FekeError::ConfigInvalidValue {
                    field: "cache".to_string(),
                    reason: format!("'{}' is not a boolean flag", flag),
                })
            }
        }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    pub fn template_directory(&self) -> &Path {
        &self.template_dir
    }

    pub fn include_root(&self) -> &Path {
        &self.include_root
    }

    /// Bind `value` to `name` (see [`Bindings::assign`])
    pub fn assign(&mut self, name: &str, value: impl Into<Value>) -> std::result::Result<(), TemplateError> {
        self.bindings.assign(name, value)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    /// Where the source of `template` is read from
    ///
    /// Names that are absolute or climb out of the template directory are
    /// rejected.
    pub fn template_path(&self, template: &str) -> std::result::Result<PathBuf, TemplateError> {
        resolve_relative(&self.template_dir, template).ok_or_else(|| {
            TemplateError::TemplatePathEscape {
                template: template.to_string(),
            }
        })
    }

    /// Cache store for the configured directory and extension
    pub fn cache_store(&self) -> CacheStore {
        CacheStore::new(&self.cache_dir, &self.cache_extension)
    }

    /// Render `template` and return the output
    pub fn render(&self, template: &str) -> std::result::Result<String, TemplateError> {
        self.render_with_status(template).map(|outcome| outcome.output)
    }

    /// Render `template`, replaying or refreshing the cache when enabled
    ///
    /// Cache problems never fail the render; they are reported through
    /// [`RenderOutcome::cache`].
    pub fn render_with_status(
        &self,
        template: &str,
    ) -> std::result::Result<RenderOutcome, TemplateError> {
        let source_path = self.template_path(template)?;
        let source = match fs::read_to_string(&source_path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(TemplateError::Io {
                    path: source_path,
                    message: e.to_string(),
                })
            }
        };
        let not_found = || TemplateError::SourceNotFound {
            template: template.to_string(),
            path: source_path.clone(),
        };

        if !self.cache_enabled {
            let text = source.ok_or_else(not_found)?;
            return Ok(RenderOutcome {
                output: self.engine().render(&text, &self.bindings)?.output,
                cache: CacheStatus::Disabled,
            });
        }

        let store = self.cache_store();

        let Some(text) = source else {
            return match store.load(template) {
                Ok(Some(entry)) if entry.header.template == template => {
                    log::warn!(
                        "{} is missing; serving cached output from {}",
                        source_path.display(),
                        entry.header.rendered_at
                    );
                    Ok(RenderOutcome {
                        output: entry.output,
                        cache: CacheStatus::FallbackToCache,
                    })
                }
                Ok(_) => Err(not_found()),
                Err(e) => {
                    log::warn!("{}", e);
                    Err(not_found())
                }
            };
        };

        let fingerprint = self.bindings.fingerprint();
        let verdict = match store.load(template) {
            Ok(None) => CacheStatus::Miss,
            Ok(Some(entry)) => {
                match store.validate(&entry, template, &source_path, Some(&fingerprint)) {
                    Ok(Freshness::Fresh) => {
                        log::debug!("cache hit for {}", template);
                        return Ok(RenderOutcome {
                            output: entry.output,
                            cache: CacheStatus::Hit,
                        });
                    }
                    Ok(Freshness::Stale(reason)) => CacheStatus::Stale(reason),
                    Err(e) => CacheStatus::Unavailable(e),
                }
            }
            Err(e @ CacheError::Corrupt { .. }) => {
                log::warn!("{}; rebuilding", e);
                CacheStatus::Stale(StaleReason::Corrupt)
            }
            Err(e) => CacheStatus::Unavailable(e),
        };

        let expansion = self.engine().render(&text, &self.bindings)?;

        if let CacheStatus::Unavailable(e) = &verdict {
            log::warn!("cache unavailable, rendered without it: {}", e);
            return Ok(RenderOutcome {
                output: expansion.output,
                cache: verdict,
            });
        }

        log::debug!("cache {} for {}", verdict, template);
        let entry = CacheEntry::new(template, fingerprint, expansion.sources, expansion.output);
        let cache = match store.save(&entry) {
            Ok(path) => {
                log::debug!("wrote {}", path.display());
                verdict
            }
            Err(e) => {
                log::warn!("failed to write cache entry: {}", e);
                CacheStatus::Unavailable(e)
            }
        };

        Ok(RenderOutcome {
            output: entry.output,
            cache,
        })
    }

    /// Render `template` and write the output to `out`
    pub fn display(&self, template: &str, out: &mut impl Write) -> Result<()> {
        let output = self.render(template)?;
        out.write_all(output.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    fn engine(&self) -> TemplateEngine {
        TemplateEngine::new(&self.include_root, &self.template_dir)
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn existing_dir(role: &'static str, path: &Path) -> Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) if resolved.is_dir() => Ok(resolved),
        _ => Err(FekeError::DirectoryInvalid {
            role,
            path: path.to_path_buf(),
        }),
    }
}

fn parse_flag(flag: &str) -> Option<bool> {
    match flag.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
