//! Advisory lock serializing cache writers across processes

use super::CacheError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// Lock file name inside the cache directory
pub(crate) const LOCK_FILE: &str = ".feke-cache.lock";

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(10);
const MAX_RETRY_DELAY: Duration = Duration::from_millis(500);
const PROGRESS_MESSAGE_THRESHOLD: Duration = Duration::from_secs(2);

/// RAII guard; the lock is released when the file handle closes
#[derive(Debug)]
pub(crate) struct CacheLock {
    _file: File,
    path: PathBuf,
}

impl CacheLock {
    /// Take the exclusive writer lock for `cache_dir`, retrying with
    /// exponential backoff until `timeout`
    pub(crate) fn acquire(cache_dir: &Path, timeout: Duration) -> Result<Self, CacheError> {
        let path = cache_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| CacheError::io(e, &path, "open lock file"))?;

        let start = Instant::now();
        let mut retry_delay = INITIAL_RETRY_DELAY;
        let mut progress_shown = false;

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Self { _file: file, path }),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    let elapsed = start.elapsed();
                    if elapsed >= timeout {
                        return Err(CacheError::LockTimeout { path });
                    }

                    if !progress_shown && elapsed >= PROGRESS_MESSAGE_THRESHOLD {
                        log::info!("waiting for cache lock on {}", path.display());
                        progress_shown = true;
                    }

                    thread::sleep(retry_delay);
                    retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
                }
                Err(e) => return Err(CacheError::io(e, &path, "acquire lock")),
            }
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}
