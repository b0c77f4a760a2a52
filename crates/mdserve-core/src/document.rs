/// Source URL of the external math-rendering script included in every head.
pub const MATH_SCRIPT_SRC: &str = "https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js";

/// Everything the assembler needs to build the head block, plus the fence
/// info-string lookup. The reference implementation kept these as
/// process-wide constants; here they are immutable values owned by the
/// caller of one conversion.
#[derive(Clone, Debug)]
pub struct DocumentConfig {
    pub title: String,
    /// Stylesheet references, emitted in order.
    pub styles: Vec<String>,
    /// External script references, emitted in order.
    pub scripts: Vec<String>,
    /// Inline script snippets, emitted in order after the math script tag.
    pub inline_scripts: Vec<String>,
    pub math_script_src: String,
    /// Fence info-string keyword to CSS language class, first match wins.
    pub code_languages: Vec<(String, String)>,
    /// Language class used when no keyword matches.
    pub fallback_language: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            styles: Vec::new(),
            scripts: Vec::new(),
            inline_scripts: Vec::new(),
            math_script_src: MATH_SCRIPT_SRC.to_string(),
            code_languages: vec![("Python".to_string(), "py".to_string())],
            fallback_language: "cpp".to_string(),
        }
    }
}

impl DocumentConfig {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub(crate) fn language_class(&self, info: &str) -> &str {
        for (keyword, class) in &self.code_languages {
            if info.contains(keyword.as_str()) {
                return class;
            }
        }
        &self.fallback_language
    }
}

/// One heading encountered during conversion, kept in document order for
/// the table of contents.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Heading {
    pub level: usize,
    /// Display text with embedded markup stripped.
    pub text: String,
}

impl Heading {
    /// Anchor id: the display text with spaces replaced by hyphens.
    /// Duplicate slugs are not de-duplicated.
    pub fn slug(&self) -> String {
        self.text.replace(' ', "-")
    }
}

pub(crate) fn write_head(config: &DocumentConfig) -> String {
    let mut head = String::from("<head>\n");
    head.push_str(&format!("<title>{}</title>\n", config.title));
    head.push_str("<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\"/>\n");
    for reference in &config.styles {
        head.push_str(&format!(
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\">\n",
            reference
        ));
    }
    for reference in &config.scripts {
        head.push_str(&format!("<script src=\"{}\"></script>\n", reference));
    }
    head.push_str(&format!(
        "<script id=\"MathJax-script\" async src=\"{}\"></script>\n",
        config.math_script_src
    ));
    for snippet in &config.inline_scripts {
        head.push_str(&format!("<script>{}</script>\n", snippet));
    }
    head.push_str("</head>\n");
    head
}

pub(crate) fn write_toc(headings: &[Heading]) -> String {
    let mut toc = String::from("<div id=\"toc\">");
    for heading in headings {
        toc.push_str(&format!(
            "<a href=\"#{}\">{}</a>",
            heading.slug(),
            heading.text
        ));
    }
    toc.push_str("</div>");
    toc
}

/// Concatenates the final document once conversion has consumed all input.
pub(crate) fn assemble(config: &DocumentConfig, body: &str, headings: &[Heading]) -> String {
    let mut out = String::from("<html>\n");
    out.push_str(&write_head(config));
    out.push_str("<body><div id=\"content\">\n");
    out.push_str(body);
    out.push_str("</div>\n");
    out.push_str(&write_toc(headings));
    out.push_str("</body></html>");
    out
}
