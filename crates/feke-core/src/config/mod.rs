//! `feke.toml` configuration

mod model;

pub use model::{CacheConfig, FekeConfig, TemplatesConfig, CONFIG_FILE};
