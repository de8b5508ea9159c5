//! On-disk cache entry format
//!
//! ```text
//! {"format":1,"template":"index.tpl","bindings":"<sha256>",...,"output_len":42}\n
//! <exactly output_len bytes of rendered output>
//! ```
//!
//! The header is a single JSON line; the output that follows is
//! length-prefixed by `output_len`, so no byte sequence in either part can
//! be mistaken for a delimiter.

use super::CacheError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Current header format version
pub const CACHE_FORMAT: u32 = 1;

/// Metadata stored in front of the cached output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheHeader {
    pub format: u32,
    /// Template name the entry was rendered from
    pub template: String,
    /// Fingerprint of the bindings used
    pub bindings: String,
    /// Files pulled in through `{include}`
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    pub output_len: usize,
    pub rendered_at: DateTime<Utc>,
}

/// A cached render: header plus output
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub header: CacheHeader,
    pub output: String,
    /// Modification time of the entry file, taken from the handle it was
    /// read through. `None` for entries that were never loaded from disk.
    pub stored_at: Option<SystemTime>,
}

impl CacheEntry {
    /// Build an entry for freshly rendered output
    pub fn new(
        template: impl Into<String>,
        bindings: impl Into<String>,
        sources: Vec<PathBuf>,
        output: String,
    ) -> Self {
        Self {
            header: CacheHeader {
                format: CACHE_FORMAT,
                template: template.into(),
                bindings: bindings.into(),
                sources,
                output_len: output.len(),
                rendered_at: Utc::now(),
            },
            output,
            stored_at: None,
        }
    }

    /// Serialize header line plus output
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut bytes = serde_json::to_vec(&self.header)?;
        bytes.push(b'\n');
        bytes.extend_from_slice(self.output.as_bytes());
        Ok(bytes)
    }

    /// Parse an entry read from `path`
    pub fn decode(bytes: &[u8], path: &Path) -> Result<Self, CacheError> {
        let corrupt = |reason: String| CacheError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let newline = bytes
            .iter()
            .position(|&b| b == b'\n')
            .ok_or_else(|| corrupt("missing header line".to_string()))?;

        let header: CacheHeader = serde_json::from_slice(&bytes[..newline])
            .map_err(|e| corrupt(format!("invalid header: {}", e)))?;

        if header.format != CACHE_FORMAT {
            return Err(corrupt(format!("unknown format version {}", header.format)));
        }

        let body = &bytes[newline + 1..];
        if body.len() != header.output_len {
            return Err(corrupt(format!(
                "expected {} output bytes, found {}",
                header.output_len,
                body.len()
            )));
        }

        let output = String::from_utf8(body.to_vec())
            .map_err(|e| corrupt(format!("output is not UTF-8: {}", e)))?;

        Ok(Self {
            header,
            output,
            stored_at: None,
        })
    }
}
