mod common;

use common::{body_of, count, render};

#[test]
fn header_delimiter_data_renders_one_table() {
    let html = render("| A | B |\n| - | - |\n| 1 | 2 |\n");
    let body = body_of(&html);
    assert_eq!(count(body, "<table>"), 1);
    assert!(body.contains("<tr><th>A</th><th>B</th></tr>"));
    assert!(body.contains("<tr><td>1</td><td>2</td></tr>"));
}

#[test]
fn table_consumes_exactly_its_own_lines() {
    // The first non-row line after the data rows must be classified
    // normally, not swallowed by the lookahead.
    let html = render("| A | B |\n| - | - |\n| 1 | 2 |\ntail text\n");
    let body = body_of(&html);
    assert!(body.contains("</table>\n<p>\ntail text\n"));
}

#[test]
fn data_rows_stop_at_first_non_row_shape() {
    let html = render("| A |\n| - |\n| 1 |\n| 2 |\nnot a row\n| 3 |\n");
    let body = body_of(&html);
    assert_eq!(count(body, "<table>"), 1);
    assert!(body.contains("<td>1</td>"));
    assert!(body.contains("<td>2</td>"));
    // "| 3 |" follows a paragraph line and has no delimiter row of its
    // own, so it stays literal text.
    assert!(!body.contains("<td>3</td>"));
}

#[test]
fn pipe_row_without_delimiter_is_a_paragraph() {
    let html = render("| A | B |\nplain\n");
    let body = body_of(&html);
    assert!(!body.contains("<table>"));
    assert!(body.contains("| A | B |"));
}

#[test]
fn pipe_row_on_last_line_is_a_paragraph() {
    let html = render("| A | B |");
    let body = body_of(&html);
    assert!(!body.contains("<table>"));
}

#[test]
fn header_and_delimiter_alone_make_an_empty_table() {
    let html = render("| A | B |\n| - | - |\n");
    let body = body_of(&html);
    assert!(body.contains("<tr><th>A</th><th>B</th></tr></table>"));
}

#[test]
fn delimiter_segments_must_be_hyphen_runs() {
    let html = render("| A |\n| = |\n| 1 |\n");
    assert!(!body_of(&html).contains("<table>"));
}

#[test]
fn math_span_pipes_do_not_split_cells() {
    let html = render("| H | K |\n| - | - |\n| $a|b$ | x |\n");
    let body = body_of(&html);
    assert!(body.contains("<td>$a|b$</td>"), "body: {}", body);
    assert!(body.contains("<td>x</td>"));
}

#[test]
fn math_spans_restore_left_to_right() {
    let html = render("| H |\n| - |\n| $x|y$ then $u|v$ |\n");
    let body = body_of(&html);
    assert!(body.contains("<td>$x|y$ then $u|v$</td>"), "body: {}", body);
}

#[test]
fn cells_are_inline_formatted() {
    let html = render("| **A** | `c` |\n| - | - |\n");
    let body = body_of(&html);
    assert!(body.contains("<th><strong>A</strong></th>"));
    assert!(body.contains("<th><code>c</code></th>"));
}

#[test]
fn table_closes_an_open_paragraph() {
    let html = render("intro\n| A |\n| - |\n");
    let body = body_of(&html);
    assert!(body.contains("</p>\n<table>"));
}
