use std::cell::RefCell;
use std::io;

use mdserve_core::{ByteFetcher, DocumentConfig, FetchError, convert};

/// Fetcher that always returns the same base64 payload.
pub struct StaticFetcher(pub &'static str);

impl ByteFetcher for StaticFetcher {
    fn fetch(&self, _path: &str) -> Result<String, FetchError> {
        Ok(self.0.to_string())
    }
}

/// Fetcher that always fails, for degraded-image paths.
pub struct FailingFetcher;

impl ByteFetcher for FailingFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        Err(FetchError {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        })
    }
}

/// Fetcher that records every requested path.
pub struct RecordingFetcher {
    pub requests: RefCell<Vec<String>>,
}

impl RecordingFetcher {
    pub fn new() -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl ByteFetcher for RecordingFetcher {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(path.to_string());
        Ok("QUJD".to_string())
    }
}

/// Converts with an empty default config and a failing fetcher.
pub fn render(source: &str) -> String {
    convert(source, &DocumentConfig::default(), &FailingFetcher)
}

/// The `#content` body section of a rendered document, TOC excluded.
pub fn body_of(html: &str) -> &str {
    let start = html
        .find("<div id=\"content\">")
        .expect("content wrapper missing");
    let end = html.find("<div id=\"toc\">").expect("toc missing");
    &html[start..end]
}

pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
