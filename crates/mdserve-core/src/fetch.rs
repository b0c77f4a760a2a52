use std::fmt;
use std::io;
use std::path::PathBuf;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// The converter's single seam to the outside world: given a path relative
/// to the content root, return the file's bytes encoded as base64.
pub trait ByteFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

#[derive(Debug)]
pub struct FetchError {
    pub path: String,
    pub source: io::Error,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to read {}: {}", self.path, self.source)
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Reads files beneath a content root directory.
pub struct FsByteFetcher {
    root: PathBuf,
}

impl FsByteFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ByteFetcher for FsByteFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let relative = path.trim_start_matches(['/', '\\']);
        let full = self.root.join(relative);
        let bytes = std::fs::read(&full).map_err(|source| FetchError {
            path: full.display().to_string(),
            source,
        })?;
        Ok(STANDARD.encode(bytes))
    }
}
