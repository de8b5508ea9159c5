// Core modules
pub mod cache;
pub mod config;
pub mod error;
pub mod template;

// Re-export commonly used types
pub use cache::{CacheError, CacheStatus, CacheStore};
pub use config::FekeConfig;
pub use error::{FekeError, Result};
pub use template::{Bindings, RenderOutcome, TemplateError, TemplateRenderer, Value};
