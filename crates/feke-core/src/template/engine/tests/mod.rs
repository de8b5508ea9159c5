//! Tests for template engine
//!
//! Organized into focused submodules, one per concern.

use super::*;

// Test helper functions
mod helpers;

mod tokenstream_performance;

// Rendering tests
mod render_basic;
mod render_includes;

// Error and edge case tests
mod errors;
