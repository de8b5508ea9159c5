//! Template module - include expansion and variable substitution
//!
//! ## Syntax
//!
//! - Placeholders: `{$name}` or `{$nested.key}`; unassigned ones are removed
//! - Includes: `{include file='partials/header.tpl'}` (single or double quotes)
//! - Comments: `{* ... *}` (stripped)
//! - Assignment: `{set var='name' value='literal'}`
//! - Capture: `{capture name='name'} ... {/capture}` binds the rendered body
//!
//! Text that is not a well-formed directive is left as-is.

pub mod binding;
pub mod engine;
pub mod error;
pub mod renderer;

pub use binding::{AssignMode, Bindings, Value};
pub use engine::{render, Expansion, TemplateEngine};
pub use error::TemplateError;
pub use renderer::{RenderOutcome, TemplateRenderer};
