use crate::cache::DEFAULT_CACHE_EXTENSION;
use crate::error::{FekeError, Result};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "feke.toml";

/// feke.toml schema
///
/// Relative paths are resolved against a base directory, normally the one
/// holding the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FekeConfig {
    pub templates: TemplatesConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Where template sources live
    pub dir: PathBuf,
    /// Base for first-pass includes; defaults to `dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_root: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Defaults to the platform cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: None,
            extension: default_extension(),
        }
    }
}

fn default_extension() -> String {
    DEFAULT_CACHE_EXTENSION.to_string()
}

impl FekeConfig {
    /// Config with only a template directory set
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates: TemplatesConfig {
                dir: template_dir.into(),
                include_root: None,
            },
            cache: CacheConfig::default(),
        }
    }

    /// Read feke.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FekeError::ConfigNotFound(path.to_path_buf()),
            _ => FekeError::ConfigParseError(format!("{}: {}", path.display(), e)),
        })?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| FekeError::ConfigParseError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write feke.toml
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| FekeError::ConfigParseError(e.to_string()))?;

        std::fs::write(path.as_ref(), content).map_err(FekeError::IoError)?;

        Ok(())
    }

    /// Reject values no renderer could use
    pub fn validate(&self) -> Result<()> {
        let ext = &self.cache.extension;
        if ext.is_empty() || ext.contains(['.', '/', '\\']) {
            return Err(FekeError::ConfigInvalidValue {
                field: "cache.extension".to_string(),
                reason: format!("'{}' must be a bare, non-empty file extension", ext),
            });
        }
        Ok(())
    }

    pub fn template_dir(&self, base: &Path) -> PathBuf {
        base.join(&self.templates.dir)
    }

    pub fn include_root(&self, base: &Path) -> PathBuf {
        match &self.templates.include_root {
            Some(root) => base.join(root),
            None => self.template_dir(base),
        }
    }

    /// Configured cache directory, or `<platform cache dir>/feke`
    pub fn cache_dir(&self, base: &Path) -> Result<PathBuf> {
        match &self.cache.dir {
            Some(dir) => Ok(base.join(dir)),
            None => dirs::cache_dir()
                .map(|dir| dir.join("feke"))
                .ok_or_else(|| FekeError::ConfigInvalidValue {
                    field: "cache.dir".to_string(),
                    reason: "no platform cache directory; set it explicitly".to_string(),
                }),
        }
    }
}
