//! Cache directory access: load, validate, atomic save, maintenance

use super::entry::CacheEntry;
use super::lock::CacheLock;
use super::CacheError;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Default file extension for cache entries
pub const DEFAULT_CACHE_EXTENSION: &str = "cache";

const WRITE_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a cache entry cannot be replayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// Template or an included file is newer than the entry (or gone)
    SourceModified(PathBuf),
    /// Bindings differ from the ones the entry was rendered with
    BindingsChanged,
    /// Entry belongs to another template with the same base name
    OtherTemplate(String),
    /// Entry could not be parsed
    Corrupt,
}

impl std::fmt::Display for StaleReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleReason::SourceModified(path) => write!(f, "{} changed", path.display()),
            StaleReason::BindingsChanged => write!(f, "bindings changed"),
            StaleReason::OtherTemplate(other) => write!(f, "entry belongs to {}", other),
            StaleReason::Corrupt => write!(f, "corrupt entry"),
        }
    }
}

/// Verdict of [`CacheStore::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale(StaleReason),
}

/// Flat directory of `<base name>.<extension>` cache entries
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    extension: String,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the entry for `template`
    ///
    /// Named after the template's base name: `pages/index.tpl` →
    /// `index.<extension>`.
    pub fn entry_path(&self, template: &str) -> PathBuf {
        let stem = Path::new(template)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| template.to_string());
        self.dir.join(format!("{}.{}", stem, self.extension))
    }

    /// Read the entry for `template`, `Ok(None)` if there is none
    ///
    /// Contents and modification time come from the same open handle, so a
    /// concurrent replace cannot pair old bytes with a newer timestamp.
    pub fn load(&self, template: &str) -> Result<Option<CacheEntry>, CacheError> {
        let path = self.entry_path(template);
        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::io(e, path, "open cache entry")),
        };

        let stored_at = file
            .metadata()
            .and_then(|meta| meta.modified())
            .map_err(|e| CacheError::io(e, &path, "read modification time"))?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|e| CacheError::io(e, &path, "read cache entry"))?;

        let mut entry = CacheEntry::decode(&bytes, &path)?;
        entry.stored_at = Some(stored_at);
        Ok(Some(entry))
    }

    /// Check an entry against the template source and, if given, the
    /// current bindings fingerprint
    ///
    /// Sources are compared by modification time: anything strictly newer
    /// than the entry makes it stale. A recorded include that no longer
    /// exists is stale too. The entry is dated by the time captured in
    /// [`load`](Self::load); an entry built in memory falls back to its
    /// file on disk.
    pub fn validate(
        &self,
        entry: &CacheEntry,
        template: &str,
        source: &Path,
        fingerprint: Option<&str>,
    ) -> Result<Freshness, CacheError> {
        if entry.header.template != template {
            return Ok(Freshness::Stale(StaleReason::OtherTemplate(
                entry.header.template.clone(),
            )));
        }

        let cached_at = match entry.stored_at {
            Some(time) => time,
            None => modified(&self.entry_path(template))?,
        };

        let sources = std::iter::once(source).chain(entry.header.sources.iter().map(PathBuf::as_path));
        for path in sources {
            let newer = match modified(path) {
                Ok(time) => time > cached_at,
                Err(_) => true,
            };
            if newer {
                return Ok(Freshness::Stale(StaleReason::SourceModified(
                    path.to_path_buf(),
                )));
            }
        }

        match fingerprint {
            Some(current) if current != entry.header.bindings => {
                Ok(Freshness::Stale(StaleReason::BindingsChanged))
            }
            _ => Ok(Freshness::Fresh),
        }
    }

    /// Entry for `template` with its source-freshness verdict, ignoring
    /// bindings
    pub fn inspect(
        &self,
        template: &str,
        source: &Path,
    ) -> Result<Option<(CacheEntry, Freshness)>, CacheError> {
        match self.load(template) {
            Ok(Some(entry)) => {
                let freshness = self.validate(&entry, template, source, None)?;
                Ok(Some((entry, freshness)))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write an entry atomically
    ///
    /// 1. Acquire the writer lock in the cache directory
    /// 2. Write to a temporary file next to the target
    /// 3. Fsync and rename over the target
    ///
    /// Readers see either the old or the new entry, never a missing or
    /// partial file. Concurrent writers are last-writer-wins.
    pub fn save(&self, entry: &CacheEntry) -> Result<PathBuf, CacheError> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| CacheError::io(e, &self.dir, "create cache directory"))?;

        let path = self.entry_path(&entry.header.template);
        let bytes = entry.encode().map_err(|e| CacheError::Corrupt {
            path: path.clone(),
            reason: format!("failed to serialize header: {}", e),
        })?;

        let lock = CacheLock::acquire(&self.dir, WRITE_LOCK_TIMEOUT)?;
        log::debug!("holding {}", lock.path().display());

        let mut temp_file = NamedTempFile::new_in(&self.dir)
            .map_err(|e| CacheError::io(e, &self.dir, "create temp file"))?;
        temp_file
            .write_all(&bytes)
            .map_err(|e| CacheError::io(e, temp_file.path().to_path_buf(), "write temp file"))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| CacheError::io(e, temp_file.path().to_path_buf(), "sync temp file"))?;
        temp_file
            .persist(&path)
            .map_err(|e| CacheError::io(e.error, &path, "persist cache entry"))?;

        #[cfg(unix)]
        {
            let dir = File::open(&self.dir)
                .map_err(|e| CacheError::io(e, &self.dir, "open cache directory"))?;
            dir.sync_all()
                .map_err(|e| CacheError::io(e, &self.dir, "sync cache directory"))?;
        }

        Ok(path)
    }

    /// Every entry file in the cache directory
    pub fn entries(&self) -> Result<Vec<PathBuf>, CacheError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("WalkDir error: {}", e);
                    continue;
                }
            };
            let path = entry.path();
            let matches = entry.file_type().is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(self.extension.as_str());
            if matches {
                entries.push(path.to_path_buf());
            }
        }
        entries.sort();
        Ok(entries)
    }

    /// Remove every entry, returning how many were removed
    pub fn clear(&self) -> Result<usize, CacheError> {
        let entries = self.entries()?;
        if entries.is_empty() {
            return Ok(0);
        }

        let _lock = CacheLock::acquire(&self.dir, WRITE_LOCK_TIMEOUT)?;
        let mut removed = 0;
        for path in entries {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::io(e, path, "remove cache entry")),
            }
        }
        Ok(removed)
    }
}

fn modified(path: &Path) -> Result<SystemTime, CacheError> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| CacheError::io(e, path, "read modification time"))
}
