use super::{field_value, is_checked, selected_label};
use crate::convert::Engine;
use crate::document::{Document, NodeRef};
use crate::html::{apply_overlay, parse_html, parse_overlay};
use crate::snapshot::snapshot;

fn capture(html: &str, state: &str, id: &str) -> String {
    let mut doc = parse_html(html);
    let overlay = parse_overlay(state).unwrap();
    apply_overlay(&mut doc, &overlay);
    let node = doc.find_by_id(id).unwrap();
    Engine::default().convert(snapshot(&doc, node))
}

#[test]
fn test_unchecked_live_checkbox_overrides_markup() {
    let md = capture(
        r#"<label id="l"><input id="c" type="checkbox" checked> Subscribe</label>"#,
        r#"{"c": {"checked": false}}"#,
        "l",
    );
    assert_eq!(md, "[ ] Subscribe");
}

#[test]
fn test_checked_live_radio() {
    let md = capture(
        r#"<div id="d"><input id="r" type="radio"> Yes</div>"#,
        r#"{"r": {"checked": true}}"#,
        "d",
    );
    assert_eq!(md, "[x] Yes");
}

#[test]
fn test_select_uses_live_index() {
    let md = capture(
        r#"<select id="s"><option>A</option><option selected>B</option></select>"#,
        r#"{"s": {"selected_index": 0}}"#,
        "s",
    );
    assert_eq!(md, "A");
}

#[test]
fn test_select_with_nothing_selected_is_empty() {
    let md = capture(
        r#"<p id="p">Size: <select id="s"><option>S</option></select></p>"#,
        r#"{"s": {"selected_index": 5}}"#,
        "p",
    );
    assert_eq!(md, "Size:");
}

#[test]
fn test_select_label_falls_back_to_attributes() {
    let mut doc = Document::new();
    let select = doc.append_element(Document::ROOT, "select", &[]);
    doc.append_element(select, "option", &[("label", "Labelled"), ("selected", "")]);
    assert_eq!(
        selected_label(NodeRef::new(&doc, select)).as_deref(),
        Some("Labelled")
    );

    let mut doc = Document::new();
    let select = doc.append_element(Document::ROOT, "select", &[]);
    doc.append_element(select, "option", &[("value", "v1")]);
    doc.live_mut(select).unwrap().selected_index = Some(0);
    assert_eq!(
        selected_label(NodeRef::new(&doc, select)).as_deref(),
        Some("v1")
    );
}

#[test]
fn test_multi_line_textarea_is_fenced() {
    let md = capture(
        r#"<textarea id="t"></textarea>"#,
        r#"{"t": {"value": "line1\nline2"}}"#,
        "t",
    );
    assert_eq!(md, "```\nline1\nline2\n```");
}

#[test]
fn test_single_line_textarea_is_inline() {
    let md = capture(
        r#"<p id="p">Note: <textarea id="t">  short  </textarea></p>"#,
        "{}",
        "p",
    );
    assert_eq!(md, "Note: short");
}

#[test]
fn test_text_input_uses_live_value() {
    let md = capture(
        r#"<p id="p">Name: <input id="n" value="static"></p>"#,
        r#"{"n": {"value": "  Ada  "}}"#,
        "p",
    );
    assert_eq!(md, "Name: Ada");
}

#[test]
fn test_buttons_are_removed() {
    let md = capture(
        r#"<form id="f"><p>Go</p><button>Send</button><input type="submit" value="OK"></form>"#,
        "{}",
        "f",
    );
    assert_eq!(md, "Go");
}

#[test]
fn test_hidden_reset_and_image_inputs_are_dropped() {
    let md = capture(
        r#"<p id="p"><input type="hidden" value="secret"><input type="reset"><input type="image"><button><b>Send</b></button>x</p>"#,
        "{}",
        "p",
    );
    assert_eq!(md, "x");
}

#[test]
fn test_link_with_title() {
    let md = capture(
        r#"<p id="p">See <a href="https://example.com" title="The &quot;best&quot;">  the   site </a></p>"#,
        "{}",
        "p",
    );
    assert_eq!(md, r#"See [the site](https://example.com "The \"best\"")"#);
}

#[test]
fn test_link_without_href_is_plain_text() {
    let md = capture(r#"<p id="p"><a name="top">Top</a></p>"#, "{}", "p");
    assert_eq!(md, "Top");
}

#[test]
fn test_readers_prefer_live_state() {
    let mut doc = Document::new();
    let check = doc.append_element(Document::ROOT, "input", &[("type", "checkbox"), ("checked", "")]);
    let text = doc.append_element(Document::ROOT, "input", &[("value", " static ")]);

    assert!(is_checked(NodeRef::new(&doc, check)));
    assert_eq!(field_value(NodeRef::new(&doc, text)), "static");

    doc.live_mut(check).unwrap().checked = Some(false);
    doc.live_mut(text).unwrap().value = Some("live".to_string());
    assert!(!is_checked(NodeRef::new(&doc, check)));
    assert_eq!(field_value(NodeRef::new(&doc, text)), "live");
}
