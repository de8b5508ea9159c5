//! Shared test helpers for template engine tests

use crate::template::binding::{Bindings, Value};
use std::path::Path;

/// Scalars plus one nested mapping
pub(super) fn simple_bindings() -> Bindings {
    let mut vars = Bindings::new();
    vars.assign("title", "My Title").unwrap();
    vars.assign("value1", "A").unwrap();
    vars.assign("value10", "B").unwrap();
    vars.assign("user", [("name", "Alice"), ("age", "30")]).unwrap();
    vars
}

/// Deeper nesting built from JSON
pub(super) fn nested_bindings() -> Bindings {
    let mut vars = Bindings::new();
    let site = serde_json::json!({
        "name": "Feke",
        "meta": { "lang": "en", "charset": "utf-8" },
        "menu": ["Home", "About"]
    });
    vars.assign("site", Value::from_json(site)).unwrap();
    vars
}

/// Write `contents` to `root/relative`, creating parent directories
pub(super) fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
