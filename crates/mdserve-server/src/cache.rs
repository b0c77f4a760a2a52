use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use lru::LruCache;

/// In-memory memo of compiled documents, keyed by source path.
///
/// The lock is held across compilation so two concurrent requests for the
/// same uncompiled document cannot both recompile and race on the on-disk
/// copy; the converter itself offers no such coordination.
pub struct CompiledCache {
    inner: Mutex<LruCache<PathBuf, String>>,
}

impl CompiledCache {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LruCache::new(64.try_into().unwrap())),
        }
    }

    pub fn get_or_compile(
        &self,
        path: &Path,
        compile: impl FnOnce() -> io::Result<String>,
    ) -> io::Result<String> {
        let mut cache = self.inner.lock().unwrap();
        if let Some(html) = cache.get(&path.to_path_buf()) {
            return Ok(html.clone());
        }
        let html = compile()?;
        cache.put(path.to_path_buf(), html.clone());
        Ok(html)
    }
}
