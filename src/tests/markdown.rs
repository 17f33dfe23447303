use super::{block, delimit, fence_for};
use crate::convert::{Engine, Options};
use crate::html::parse_html;
use crate::snapshot::snapshot;

fn convert_with(html: &str, id: &str, engine: &Engine) -> String {
    let doc = parse_html(html);
    let node = doc.find_by_id(id).unwrap();
    engine.convert(snapshot(&doc, node))
}

fn convert(html: &str, id: &str) -> String {
    convert_with(html, id, &Engine::default())
}

#[test]
fn test_headings() {
    let md = convert(r#"<div id="d"><h1>One</h1><h3> Three  deep </h3></div>"#, "d");
    assert_eq!(md, "# One\n\n### Three deep");
}

#[test]
fn test_inline_formatting() {
    let md = convert(
        r#"<p id="p"><strong>bold</strong>, <em>soft</em> and <del>gone</del></p>"#,
        "p",
    );
    assert_eq!(md, "**bold**, _soft_ and ~~gone~~");
}

#[test]
fn test_edge_whitespace_stays_outside_delimiters() {
    let md = convert(
        r#"<p id="p"><em>soft </em>text and <strong> bold</strong>x</p>"#,
        "p",
    );
    assert_eq!(md, "_soft_ text and **bold**x");

    assert_eq!(delimit(" a b ", "**"), " **a b** ");
    assert_eq!(delimit("  ", "_"), "  ", "blank content is not wrapped");
}

#[test]
fn test_line_break_and_rule() {
    let md = convert(r#"<div id="d">a<br>b<hr>c</div>"#, "d");
    assert_eq!(md, "a  \nb\n\n---\n\nc");
}

#[test]
fn test_unordered_list_uses_configured_marker() {
    let html = "<ul id=\"u\">\n  <li>one</li>\n  <li>two</li>\n</ul>";
    assert_eq!(convert(html, "u"), "- one\n- two");

    let engine = Engine::new(Options {
        bullet_marker: "*".to_string(),
        ..Options::default()
    });
    assert_eq!(convert_with(html, "u", &engine), "* one\n* two");
}

#[test]
fn test_ordered_list_honours_start() {
    let md = convert(r#"<ol id="o" start="3"><li>c</li><li>d</li></ol>"#, "o");
    assert_eq!(md, "3. c\n4. d");
}

#[test]
fn test_nested_list_is_indented() {
    let md = convert(
        r#"<ul id="u"><li>outer<ul><li>inner</li></ul></li><li>next</li></ul>"#,
        "u",
    );
    assert_eq!(md, "- outer\n    - inner\n- next");
}

#[test]
fn test_blockquote() {
    let md = convert(
        r#"<blockquote id="q"><p>first</p><p>second</p></blockquote>"#,
        "q",
    );
    assert_eq!(md, "> first\n>\n> second");
}

#[test]
fn test_code_block_keeps_whitespace_and_language() {
    let md = convert(
        "<pre id=\"c\"><code class=\"language-rust\">fn main() {\n    run();\n}\n</code></pre>",
        "c",
    );
    assert_eq!(md, "```rust\nfn main() {\n    run();\n}\n```");
}

#[test]
fn test_code_block_fence_outgrows_content() {
    assert_eq!(fence_for("plain", "```"), "```");
    assert_eq!(fence_for("````\nx", "```"), "`````");
    assert_eq!(fence_for("x", "~~~~"), "~~~~");
}

#[test]
fn test_inline_code() {
    let md = convert(r#"<p id="p">Run <code>cargo   doc</code> now</p>"#, "p");
    assert_eq!(md, "Run `cargo doc` now");

    let md = convert(r#"<p id="p"><code>a`b</code></p>"#, "p");
    assert_eq!(md, "``a`b``");
}

#[test]
fn test_image() {
    let md = convert(
        r#"<p id="p"><img src="cat.png" alt="A cat" title="Tom"></p>"#,
        "p",
    );
    assert_eq!(md, r#"![A cat](cat.png "Tom")"#);
}

#[test]
fn test_table() {
    let md = convert(
        r#"<table id="t"><thead><tr><th>Name</th><th>Age</th></tr></thead>
        <tbody><tr><td>Ada</td><td>36</td></tr><tr><td>a|b</td><td></td></tr></tbody></table>"#,
        "t",
    );
    assert_eq!(
        md,
        "| Name | Age |\n| --- | --- |\n| Ada | 36 |\n| a\\|b |  |"
    );
}

#[test]
fn test_unknown_block_elements_fall_back_to_blocks() {
    let md = convert(
        r#"<article id="a"><header>Top</header><span>inline</span> text</article>"#,
        "a",
    );
    assert_eq!(md, "Top\n\ninline text");
}

#[test]
fn test_block_helper_drops_blank_content() {
    assert_eq!(block("\n \n"), "");
    assert_eq!(block("\nx\n"), "\n\nx\n\n");
}
