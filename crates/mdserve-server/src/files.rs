use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use mdserve_core::FsByteFetcher;

use crate::assets;
use crate::cache::CompiledCache;
use crate::http::Response;

const DEFAULT_FILE: &str = "README.md";

const IMAGE_EXTENSIONS: [&str; 5] = ["ico", "png", "jpeg", "jpg", "gif"];

/// Maps request paths to files beneath the content root, compiling markdown
/// on the way out.
pub struct FileService {
    root: PathBuf,
    force_compile: bool,
    cache: CompiledCache,
}

impl FileService {
    pub fn new(root: PathBuf, force_compile: bool) -> Self {
        Self {
            root,
            force_compile,
            cache: CompiledCache::new(),
        }
    }

    pub fn respond(&self, request_path: &str) -> Response {
        let prepared = prepare_path(request_path);
        let Some(full) = self.resolve(&prepared) else {
            return Response::not_found();
        };
        match extension(&prepared) {
            "md" | "html" => match self.serve_page(&full) {
                Ok(html) => Response::ok("text/html", html.into_bytes()),
                Err(err) => {
                    eprintln!("cannot serve {}: {}", full.display(), err);
                    Response::not_found()
                }
            },
            other => match fs::read(&full) {
                Ok(bytes) => Response::ok(&content_type_for(other), bytes),
                Err(err) => {
                    eprintln!("cannot serve {}: {}", full.display(), err);
                    Response::not_found()
                }
            },
        }
    }

    /// Markdown is served from its compiled `.html` sibling when one exists
    /// on disk; anything else compiles it. With `force_compile` every request
    /// recompiles and the memo is bypassed.
    fn serve_page(&self, full: &Path) -> io::Result<String> {
        if extension_of(full) == "html" {
            return fs::read_to_string(full);
        }
        if self.force_compile {
            return self.compile_document(full);
        }
        let compiled = full.with_extension("html");
        if compiled.exists() {
            return fs::read_to_string(&compiled);
        }
        self.cache
            .get_or_compile(full, || self.compile_document(full))
    }

    fn compile_document(&self, full: &Path) -> io::Result<String> {
        println!("Compiling: {}", full.display());
        let source = fs::read_to_string(full)?;
        let title = full
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let config = assets::document_config(title);
        let fetcher = FsByteFetcher::new(&self.root);
        let html = mdserve_core::convert(&source, &config, &fetcher);
        // Keep the compiled copy beside the source for the next request.
        // Failing to write it only costs a recompile later.
        if let Err(err) = fs::write(full.with_extension("html"), &html) {
            eprintln!(
                "cannot write compiled copy of {}: {}",
                full.display(),
                err
            );
        }
        Ok(html)
    }

    /// Joins the prepared request path under the root, refusing any path
    /// that tries to climb out of it.
    fn resolve(&self, prepared: &str) -> Option<PathBuf> {
        let relative = Path::new(prepared.trim_start_matches('/'));
        for component in relative.components() {
            if matches!(component, Component::ParentDir) {
                return None;
            }
        }
        Some(self.root.join(relative))
    }
}

/// Normalizes a raw request target: backslashes become slashes, directory
/// requests get the default file appended, and extensionless names are
/// treated as markdown.
fn prepare_path(request_path: &str) -> String {
    let mut path = request_path.replace('\\', "/");
    if path.is_empty() || path.ends_with('/') {
        path.push_str(DEFAULT_FILE);
    } else if extension(&path).is_empty() {
        path.push_str(".md");
    }
    path
}

fn extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext,
        _ => "",
    }
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(|ext| ext.to_str()).unwrap_or("")
}

fn content_type_for(extension: &str) -> String {
    if IMAGE_EXTENSIONS.contains(&extension) {
        format!("image/{}", extension)
    } else {
        format!("text/{}", extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_requests_get_the_default_file() {
        assert_eq!(prepare_path(""), "README.md");
        assert_eq!(prepare_path("/"), "/README.md");
        assert_eq!(prepare_path("/notes/"), "/notes/README.md");
    }

    #[test]
    fn extensionless_requests_are_markdown() {
        assert_eq!(prepare_path("/notes/plan"), "/notes/plan.md");
    }

    #[test]
    fn explicit_extensions_pass_through() {
        assert_eq!(prepare_path("/img/logo.png"), "/img/logo.png");
        assert_eq!(prepare_path("/doc.html"), "/doc.html");
    }

    #[test]
    fn backslashes_are_normalized() {
        assert_eq!(prepare_path("\\notes\\plan.md"), "/notes/plan.md");
    }

    #[test]
    fn a_leading_dot_is_not_an_extension_separator() {
        assert_eq!(prepare_path("/.client/style.css"), "/.client/style.css");
        assert_eq!(prepare_path("/.gitignore"), "/.gitignore.md");
    }

    #[test]
    fn content_types_split_images_from_text() {
        assert_eq!(content_type_for("png"), "image/png");
        assert_eq!(content_type_for("ico"), "image/ico");
        assert_eq!(content_type_for("css"), "text/css");
        assert_eq!(content_type_for("js"), "text/js");
    }

    #[test]
    fn resolve_refuses_parent_traversal() {
        let service = FileService::new(PathBuf::from("/srv/content"), false);
        assert!(service.resolve("/../etc/passwd").is_none());
        assert!(service.resolve("/notes/../../etc/passwd").is_none());
        assert_eq!(
            service.resolve("/notes/plan.md"),
            Some(PathBuf::from("/srv/content/notes/plan.md"))
        );
    }
}
