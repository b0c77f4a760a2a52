use crate::document::{self, DocumentConfig, Heading};
use crate::fetch::ByteFetcher;
use crate::inline::format_line;

const MATH_PLACEHOLDER: &str = "[math]";

/// Converts one markdown document into a self-contained HTML page.
///
/// The conversion is a single synchronous pass over the input lines; it
/// never fails on malformed markdown, and a failed image fetch only
/// degrades the affected element. Output is deterministic for a
/// deterministic fetcher.
pub fn convert(source: &str, config: &DocumentConfig, fetcher: &dyn ByteFetcher) -> String {
    let mut converter = Converter::new(source, config, fetcher);
    converter.run();
    document::assemble(config, &converter.body, &converter.headings)
}

/// Which block construct is currently open. A paragraph and a list are
/// mutually exclusive; an open code block suppresses every other
/// classifier until its closing fence.
#[derive(Clone, Debug, Eq, PartialEq)]
enum BlockState {
    Idle,
    Paragraph,
    /// Indentation levels of the open lists, outermost first.
    List(Vec<usize>),
    CodeBlock,
}

struct Converter<'a> {
    lines: Vec<&'a str>,
    cursor: usize,
    state: BlockState,
    body: String,
    headings: Vec<Heading>,
    config: &'a DocumentConfig,
    fetcher: &'a dyn ByteFetcher,
}

impl<'a> Converter<'a> {
    fn new(source: &'a str, config: &'a DocumentConfig, fetcher: &'a dyn ByteFetcher) -> Self {
        Self {
            lines: source.split('\n').collect(),
            cursor: 0,
            state: BlockState::Idle,
            body: String::new(),
            headings: Vec::new(),
            config,
            fetcher,
        }
    }

    fn run(&mut self) {
        while self.cursor < self.lines.len() {
            let line = self.lines[self.cursor];
            // The current line is consumed up front; a classifier with
            // lookahead advances the cursor further itself.
            self.cursor += 1;
            self.convert_line(line);
        }
        if self.state == BlockState::CodeBlock {
            self.close_fence();
        } else {
            self.close_open();
        }
    }

    fn convert_line(&mut self, line: &str) {
        let trimmed = line.trim();

        if self.state == BlockState::CodeBlock {
            if is_fence(trimmed) {
                self.close_fence();
            } else {
                self.body.push_str(&escape_angles(line));
                self.body.push('\n');
            }
            return;
        }

        if trimmed.is_empty() {
            self.close_open();
            return;
        }

        // Ordered classifiers, first match wins, paragraph as fallback.
        if let Some(level) = check_heading(trimmed) {
            self.convert_heading(trimmed, level);
            return;
        }
        if let Some(indent) = check_list_item(line) {
            self.convert_list_item(trimmed, indent);
            return;
        }
        if check_quote(trimmed) {
            self.convert_quote(trimmed);
            return;
        }
        if self.convert_separator(trimmed) {
            return;
        }
        if self.convert_table(trimmed) {
            return;
        }
        self.convert_paragraph(trimmed);
    }

    fn convert_heading(&mut self, trimmed: &str, level: usize) {
        self.close_open();
        let content = format_line(trimmed[level..].trim(), self.fetcher);
        let heading = Heading {
            level,
            text: strip_tags(&content),
        };
        self.body.push_str(&format!(
            "<div id=\"{}\"><h{}>{}</h{}></div>\n",
            heading.slug(),
            level,
            content,
            level
        ));
        self.headings.push(heading);
    }

    fn convert_list_item(&mut self, trimmed: &str, indent: usize) {
        let Some(text) = trimmed.get(2..) else {
            // A marker with nothing after it is dropped, not an error.
            return;
        };
        if self.state == BlockState::Paragraph {
            self.close_open();
        }
        let mut stack = match std::mem::replace(&mut self.state, BlockState::Idle) {
            BlockState::List(stack) => stack,
            _ => Vec::new(),
        };
        while let Some(&top) = stack.last() {
            if top <= indent {
                break;
            }
            self.body.push_str("</ul>\n");
            stack.pop();
        }
        if stack.last().is_none_or(|&top| top < indent) {
            self.body.push_str("<ul>\n");
            stack.push(indent);
        }
        self.body
            .push_str(&format!("<li>{}</li>\n", format_line(text, self.fetcher)));
        self.state = BlockState::List(stack);
    }

    fn convert_quote(&mut self, trimmed: &str) {
        self.close_open();
        self.body.push_str(&format!(
            "<blockquote>{}</blockquote>\n",
            &trimmed[1..]
        ));
    }

    /// Thematic breaks and fence toggling share one dispatch slot.
    fn convert_separator(&mut self, trimmed: &str) -> bool {
        if is_thematic_break(trimmed) {
            self.close_open();
            self.body.push_str("<hr>\n");
            return true;
        }
        if is_fence(trimmed) {
            self.close_open();
            self.open_fence(trimmed);
            return true;
        }
        false
    }

    fn open_fence(&mut self, trimmed: &str) {
        let info = trimmed.trim_start_matches('`');
        self.body.push_str(&format!(
            "<pre class=\"language-{}\">\n<code>",
            self.config.language_class(info)
        ));
        self.state = BlockState::CodeBlock;
    }

    fn close_fence(&mut self) {
        // Drop the newline artifact left by the last appended code line.
        if self.body.ends_with('\n') {
            self.body.pop();
        }
        self.body.push_str("</code>\n</pre>\n");
        self.state = BlockState::Idle;
    }

    /// Commits only after both the pipe-row and the delimiter-row shapes
    /// match; then consumes the delimiter and every following data row,
    /// leaving the first non-row line for normal classification.
    fn convert_table(&mut self, trimmed: &str) -> bool {
        if !is_table_row(trimmed) {
            return false;
        }
        let Some(&delimiter) = self.lines.get(self.cursor) else {
            return false;
        };
        if !is_table_delimiter(delimiter.trim()) {
            return false;
        }
        self.close_open();
        self.cursor += 1;

        let mut table = String::from("<table>");
        table.push_str(&self.convert_table_row(trimmed, true));
        while let Some(&line) = self.lines.get(self.cursor) {
            let row = line.trim();
            if !is_table_row(row) {
                break;
            }
            table.push_str(&self.convert_table_row(row, false));
            self.cursor += 1;
        }
        table.push_str("</table>\n");
        self.body.push_str(&table);
        true
    }

    fn convert_table_row(&self, row: &str, header: bool) -> String {
        let tag = if header { "th" } else { "td" };
        let (masked, math_spans) = mask_math_spans(row);
        let mut spans = math_spans.iter();
        let mut out = String::from("<tr>");
        for cell in table_cells(&masked) {
            let mut cell = format_line(cell, self.fetcher);
            // Masked math spans go back in left-to-right, verbatim.
            while cell.contains(MATH_PLACEHOLDER) {
                let restored = spans.next().map(String::as_str).unwrap_or("");
                cell = cell.replacen(MATH_PLACEHOLDER, restored, 1);
            }
            out.push_str(&format!("<{}>{}</{}>", tag, cell, tag));
        }
        out.push_str("</tr>");
        out
    }

    fn convert_paragraph(&mut self, trimmed: &str) {
        match &self.state {
            BlockState::Paragraph => {
                self.body.push_str(&format_line(trimmed, self.fetcher));
                self.body.push('\n');
            }
            BlockState::List(_) => {
                // An unindented text line breaks out of the list, then
                // starts a paragraph of its own.
                self.close_open();
                self.convert_paragraph(trimmed);
            }
            _ => {
                self.body.push_str(&format!(
                    "<p>\n{}\n",
                    format_line(trimmed, self.fetcher)
                ));
                self.state = BlockState::Paragraph;
            }
        }
    }

    /// Blank-line / implicit close: one `</p>`, or one `</ul>` per open
    /// list level. An open code block is never closed here.
    fn close_open(&mut self) {
        match std::mem::replace(&mut self.state, BlockState::Idle) {
            BlockState::Paragraph => self.body.push_str("</p>\n"),
            BlockState::List(stack) => {
                for _ in 0..stack.len() {
                    self.body.push_str("</ul>\n");
                }
            }
            BlockState::CodeBlock => self.state = BlockState::CodeBlock,
            BlockState::Idle => {}
        }
    }
}

/// Level 1-6 when the first whitespace-delimited token is a run of `#`
/// and nothing else.
fn check_heading(trimmed: &str) -> Option<usize> {
    let token = trimmed.split_whitespace().next()?;
    if !token.chars().all(|ch| ch == '#') {
        return None;
    }
    (1..=6).contains(&token.len()).then_some(token.len())
}

/// Leading-whitespace count when the line is a bullet item. The marker
/// must be followed by a space; a bullet at the very end of the line is
/// not an item, it only looks like one.
fn check_list_item(line: &str) -> Option<usize> {
    let mut indent = 0;
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch.is_whitespace() {
            indent += 1;
        } else if ch == '-' || ch == '*' {
            return (chars.next() == Some(' ')).then_some(indent);
        } else {
            return None;
        }
    }
    None
}

fn check_quote(trimmed: &str) -> bool {
    trimmed.split_whitespace().next() == Some(">")
}

fn is_thematic_break(trimmed: &str) -> bool {
    trimmed
        .strip_prefix("---")
        .is_some_and(|rest| rest.trim().is_empty())
}

fn is_fence(trimmed: &str) -> bool {
    trimmed.starts_with("```")
}

/// Pipe-row shape: starts and ends with `|` with at least one delimited
/// segment between.
fn is_table_row(trimmed: &str) -> bool {
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// Delimiter-row shape: pipes separating runs of hyphens only.
fn is_table_delimiter(trimmed: &str) -> bool {
    if !is_table_row(trimmed) {
        return false;
    }
    let inner = &trimmed[1..trimmed.len() - 1];
    let mut segments = 0;
    for segment in inner.split('|') {
        let segment = segment.trim();
        if segment.is_empty() || !segment.chars().all(|ch| ch == '-') {
            return false;
        }
        segments += 1;
    }
    segments > 0
}

/// Replaces `$...$` spans with a placeholder so a `|` inside math is not
/// taken as a column separator; returns the masked row and the spans in
/// order of occurrence.
fn mask_math_spans(row: &str) -> (String, Vec<String>) {
    let mut masked = String::new();
    let mut spans = Vec::new();
    let mut rest = row;
    while let Some(start) = rest.find('$') {
        let Some(offset) = rest[start + 1..].find('$') else {
            break;
        };
        let end = start + 1 + offset;
        masked.push_str(&rest[..start]);
        masked.push_str(MATH_PLACEHOLDER);
        spans.push(rest[start..=end].to_string());
        rest = &rest[end + 1..];
    }
    masked.push_str(rest);
    (masked, spans)
}

/// Splits a masked row on `|`, dropping the leading empty cell and any
/// trailing empty cells.
fn table_cells(masked: &str) -> Vec<&str> {
    let mut cells: Vec<&str> = masked.split('|').collect();
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    if !cells.is_empty() {
        cells.remove(0);
    }
    cells
}

/// Removes `<...>` tag spans from inline-formatted text, leaving the
/// visible characters for the anchor id and the TOC entry.
fn strip_tags(text: &str) -> String {
    let mut out = String::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let Some(offset) = rest[start + 1..].find('>') else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &rest[start + 1 + offset + 1..];
    }
    out.push_str(rest);
    out
}

fn escape_angles(line: &str) -> String {
    line.replace('<', "&lt;").replace('>', "&gt;")
}
