//! Template tree fixtures and modification-time helpers

use crate::temp_dir_in_workspace;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// A throwaway site: `templates/`, `cache/` and an optional `feke.toml`
///
/// Everything is removed when the fixture is dropped.
pub struct TemplateFixture {
    temp: TempDir,
}

impl TemplateFixture {
    pub fn new() -> Self {
        let temp = temp_dir_in_workspace();
        fs::create_dir_all(temp.path().join("templates")).unwrap();
        fs::create_dir_all(temp.path().join("cache")).unwrap();
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn templates(&self) -> PathBuf {
        self.root().join("templates")
    }

    pub fn cache(&self) -> PathBuf {
        self.root().join("cache")
    }

    /// Write a file relative to the fixture root, creating parents
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write a template source under `templates/`
    pub fn template(&self, name: &str, contents: &str) -> PathBuf {
        self.write(&format!("templates/{}", name), contents)
    }

    /// Write a `feke.toml` pointing at this fixture's directories
    pub fn config(&self, cache_enabled: bool) -> PathBuf {
        self.write(
            "feke.toml",
            &format!(
                "[templates]\ndir = \"templates\"\n\n[cache]\nenabled = {}\ndir = \"cache\"\n",
                cache_enabled
            ),
        )
    }
}

impl Default for TemplateFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn set_mtime(path: &Path, time: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(time).unwrap();
}

/// Move a file's modification time a few seconds into the future
///
/// Makes the file count as newer than anything written during the test.
pub fn touch_newer(path: &Path) {
    set_mtime(path, SystemTime::now() + Duration::from_secs(5));
}

/// Move a file's modification time `secs` seconds into the past
pub fn backdate(path: &Path, secs: u64) {
    set_mtime(path, SystemTime::now() - Duration::from_secs(secs));
}
