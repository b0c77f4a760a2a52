mod common;

use common::{FailingFetcher, render};
use mdserve_core::{DocumentConfig, Heading, MATH_SCRIPT_SRC, convert};

fn full_config() -> DocumentConfig {
    DocumentConfig {
        title: "Notes".to_string(),
        styles: vec!["a.css".to_string(), "b.css".to_string()],
        scripts: vec!["one.js".to_string(), "two.js".to_string()],
        inline_scripts: vec!["init();".to_string()],
        ..DocumentConfig::default()
    }
}

fn position(html: &str, needle: &str) -> usize {
    html.find(needle)
        .unwrap_or_else(|| panic!("missing {:?} in {}", needle, html))
}

#[test]
fn head_sections_keep_configured_order() {
    let html = convert("", &full_config(), &FailingFetcher);

    let title = position(&html, "<title>Notes</title>");
    let charset = position(&html, "charset=utf-8");
    let style_a = position(&html, "href=\"a.css\"");
    let style_b = position(&html, "href=\"b.css\"");
    let script_one = position(&html, "src=\"one.js\"");
    let script_two = position(&html, "src=\"two.js\"");
    let math = position(&html, MATH_SCRIPT_SRC);
    let inline = position(&html, "<script>init();</script>");
    let body = position(&html, "<body>");

    assert!(title < charset);
    assert!(charset < style_a);
    assert!(style_a < style_b);
    assert!(style_b < script_one);
    assert!(script_one < script_two);
    assert!(script_two < math);
    assert!(math < inline);
    assert!(inline < body);
}

#[test]
fn document_shape_is_head_body_toc() {
    let html = convert("# A\ntext\n", &full_config(), &FailingFetcher);
    assert!(html.starts_with("<html>\n<head>\n"));
    let head_close = position(&html, "</head>");
    let content = position(&html, "<div id=\"content\">");
    let toc = position(&html, "<div id=\"toc\">");
    assert!(head_close < content);
    assert!(content < toc);
    assert!(html.ends_with("</body></html>"));
}

#[test]
fn toc_lists_headings_in_encounter_order() {
    let html = render("# First\n\n## Second one\n\n# Third\n");
    let toc_start = position(&html, "<div id=\"toc\">");
    let toc = &html[toc_start..];
    let first = position(toc, "<a href=\"#First\">First</a>");
    let second = position(toc, "<a href=\"#Second-one\">Second one</a>");
    let third = position(toc, "<a href=\"#Third\">Third</a>");
    assert!(first < second);
    assert!(second < third);
}

#[test]
fn duplicate_slugs_are_not_deduplicated() {
    let html = render("# Same\n\n# Same\n");
    let toc_start = position(&html, "<div id=\"toc\">");
    let toc = &html[toc_start..];
    assert_eq!(toc.matches("<a href=\"#Same\">Same</a>").count(), 2);
}

#[test]
fn conversion_is_deterministic_across_calls() {
    let source = "# T\n\n- a\n  - b\n\n| A |\n| - |\n| $x|y$ |\n\n`code` **b**\n";
    let config = full_config();
    let first = convert(source, &config, &FailingFetcher);
    let second = convert(source, &config, &FailingFetcher);
    assert_eq!(first, second);
}

#[test]
fn slug_replaces_spaces_with_hyphens() {
    let heading = Heading {
        level: 2,
        text: "a b  c".to_string(),
    };
    assert_eq!(heading.slug(), "a-b--c");
}

#[test]
fn empty_input_still_produces_a_complete_document() {
    let html = render("");
    assert!(html.contains("<div id=\"content\">"));
    assert!(html.contains("<div id=\"toc\"></div>"));
    assert!(html.ends_with("</body></html>"));
}
