use crate::fetch::ByteFetcher;

/// Inline enclosure styles, applied in a fixed order: code first so its
/// escaping hides emphasis markers from the later passes, then bold before
/// italic so a double asterisk is never consumed as two single ones.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Emphasis {
    Code,
    Bold,
    Italic,
}

impl Emphasis {
    fn token(self) -> &'static str {
        match self {
            Emphasis::Code => "`",
            Emphasis::Bold => "**",
            Emphasis::Italic => "*",
        }
    }

    fn enclose(self, text: &str) -> String {
        match self {
            Emphasis::Code => format!("<code>{}</code>", escape_code(text)),
            Emphasis::Bold => format!("<strong>{}</strong>", text),
            Emphasis::Italic => format!("<em>{}</em>", text),
        }
    }
}

/// Entity-encodes characters that would otherwise be reinterpreted inside a
/// code span, either by the browser or by the emphasis passes that follow.
fn escape_code(text: &str) -> String {
    text.replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('*', "&#42;")
}

/// Applies the full inline pipeline to one line or cell of body text.
pub(crate) fn format_line(line: &str, fetcher: &dyn ByteFetcher) -> String {
    // Escaped markers become entities up front so no pass can pair on them.
    let line = line.trim().replace("\\*", "&#42;");
    let line = emphasise(&line, Emphasis::Code);
    let line = emphasise(&line, Emphasis::Bold);
    let line = emphasise(&line, Emphasis::Italic);
    complete_links(&line, fetcher)
}

/// One non-recursive pass: repeatedly pairs the leftmost delimiter with the
/// next occurrence of the same token. Unmatched delimiters stay literal.
fn emphasise(line: &str, style: Emphasis) -> String {
    let token = style.token();
    let mut rest = line;
    let mut out = String::new();
    loop {
        let Some(start) = rest.find(token) else { break };
        let after = start + token.len();
        let Some(offset) = rest[after..].find(token) else {
            break;
        };
        let end = after + offset;
        out.push_str(&rest[..start]);
        out.push_str(&style.enclose(&rest[after..end]));
        rest = &rest[end + token.len()..];
    }
    out.push_str(rest);
    out
}

/// A `[text](target)` occurrence. The target always runs to the next `)`
/// of the original line, so brackets elsewhere on the line do not disturb
/// recovery.
struct LinkShape {
    start: usize,
    end: usize,
    text_start: usize,
    text_end: usize,
    target_start: usize,
}

impl LinkShape {
    fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.text_start..self.text_end]
    }

    fn target<'a>(&self, line: &'a str) -> &'a str {
        &line[self.target_start..self.end - 1]
    }

    fn is_image(&self, line: &str) -> bool {
        self.start > 0 && line.as_bytes()[self.start - 1] == b'!'
    }
}

/// Finds the first link shape at or after `from`. The bracketed text may
/// not contain `[` and the target may not contain `(`.
fn find_link(line: &str, from: usize) -> Option<LinkShape> {
    let bytes = line.as_bytes();
    let mut search = from;
    while let Some(offset) = line[search..].find('[') {
        let open = search + offset;
        search = open + 1;
        let Some(offset) = line[open + 1..].find(['[', ']']) else {
            return None;
        };
        let close = open + 1 + offset;
        if bytes[close] != b']' || bytes.get(close + 1) != Some(&b'(') {
            continue;
        }
        let Some(offset) = line[close + 2..].find(['(', ')']) else {
            return None;
        };
        let paren = close + 2 + offset;
        if bytes[paren] != b')' {
            continue;
        }
        return Some(LinkShape {
            start: open,
            end: paren + 1,
            text_start: open + 1,
            text_end: close,
            target_start: close + 2,
        });
    }
    None
}

/// Rebuilds a line around its link shapes. One image form anywhere marks
/// the whole line, and every link on it is then embedded as an image.
fn complete_links(line: &str, fetcher: &dyn ByteFetcher) -> String {
    let Some(first) = find_link(line, 0) else {
        return line.to_string();
    };

    let mut is_image = first.is_image(line);
    let mut at = first.end;
    while !is_image {
        match find_link(line, at) {
            Some(shape) => {
                is_image = shape.is_image(line);
                at = shape.end;
            }
            None => break,
        }
    }

    let mut out = String::new();
    let mut at = 0;
    let mut next = Some(first);
    while let Some(shape) = next {
        let before = &line[at..shape.start];
        if is_image {
            // The image marker sits in the preceding text; the reference
            // blanked it rather than removing it.
            out.push_str(&before.replace('!', " "));
        } else {
            out.push_str(before);
        }
        if is_image {
            out.push_str(&image_tag(shape.text(line), shape.target(line), fetcher));
        } else {
            out.push_str(&format!(
                "<a href=\"{}\">{}</a> ",
                shape.target(line),
                shape.text(line)
            ));
        }
        at = shape.end;
        next = find_link(line, at);
    }
    out.push_str(&line[at..]);
    out
}

/// Embeds an image as a `data:` URI through the byte-fetch seam. A failed
/// fetch is logged and leaves the payload empty; conversion carries on.
fn image_tag(text: &str, target: &str, fetcher: &dyn ByteFetcher) -> String {
    let src = if is_data_uri(target) {
        target.to_string()
    } else {
        let subtype = target.rsplit('.').next().unwrap_or("");
        let path = rewrite_relative(target);
        let mut src = format!("data:image/{};base64,", subtype);
        match fetcher.fetch(&path) {
            Ok(encoded) => src.push_str(&encoded),
            Err(err) => eprintln!("image embed degraded to empty source: {}", err),
        }
        src
    };
    format!("<img src=\"{}\" alt=\"{}\">", src, text)
}

/// `../`-style prefixes address the server's content root.
fn rewrite_relative(target: &str) -> String {
    if let Some(rest) = target.strip_prefix("../") {
        format!("/{}", rest)
    } else if let Some(rest) = target.strip_prefix("..\\") {
        format!("/{}", rest)
    } else {
        target.to_string()
    }
}

fn is_data_uri(target: &str) -> bool {
    target
        .strip_prefix("data:image/")
        .is_some_and(|rest| rest.contains(";base64,"))
}
