use mdserve_core::DocumentConfig;
use once_cell::sync::Lazy;

/// Client-side assets referenced from every compiled page, relative to the
/// content root.
struct ClientAssets {
    styles: Vec<String>,
    scripts: Vec<String>,
    inline_scripts: Vec<String>,
}

static CLIENT_ASSETS: Lazy<ClientAssets> = Lazy::new(|| ClientAssets {
    styles: vec![
        "../.client/style.css".to_string(),
        "../.client/syntax/styles/tomorrow.css".to_string(),
    ],
    scripts: vec![
        "../.client/syntax/highlight.pack.js".to_string(),
        "../.client/math/mathjaxconfig.js".to_string(),
        "https://polyfill.io/v3/polyfill.min.js?features=es6".to_string(),
    ],
    inline_scripts: vec!["hljs.initHighlightingOnLoad();".to_string()],
});

/// Conversion config for one page: the shared asset references plus the
/// page's own title.
pub fn document_config(title: String) -> DocumentConfig {
    DocumentConfig {
        title,
        styles: CLIENT_ASSETS.styles.clone(),
        scripts: CLIENT_ASSETS.scripts.clone(),
        inline_scripts: CLIENT_ASSETS.inline_scripts.clone(),
        ..DocumentConfig::default()
    }
}
