use super::snapshot;
use crate::document::{Document, NodeId};

fn form() -> (Document, NodeId) {
    let mut doc = Document::new();
    let form = doc.append_element(Document::ROOT, "form", &[("id", "f")]);
    let name = doc.append_element(form, "input", &[("id", "name"), ("value", "static")]);
    let news = doc.append_element(form, "input", &[("id", "news"), ("type", "checkbox"), ("checked", "")]);
    let terms = doc.append_element(form, "input", &[("id", "terms"), ("type", "checkbox")]);
    let select = doc.append_element(form, "select", &[("id", "s")]);
    let a = doc.append_element(select, "option", &[]);
    doc.append_text(a, "A");
    let b = doc.append_element(select, "option", &[("selected", "")]);
    doc.append_text(b, "B");
    let bio = doc.append_element(form, "textarea", &[("id", "bio")]);
    doc.append_text(bio, "old");

    doc.live_mut(name).unwrap().value = Some("typed".to_string());
    doc.live_mut(news).unwrap().checked = Some(false);
    doc.live_mut(terms).unwrap().checked = Some(true);
    doc.live_mut(select).unwrap().selected_index = Some(0);
    doc.live_mut(bio).unwrap().value = Some("line1\nline2".to_string());
    (doc, form)
}

#[test]
fn test_live_state_flattened_into_markup() {
    let (live, root) = form();
    let dup = snapshot(&live, root);
    let doc = dup.document();
    let by_id = |id: &str| doc.find_by_id(id).unwrap();

    assert_eq!(doc.attr(by_id("name"), "value"), Some("typed"));
    assert!(!doc.has_attr(by_id("news"), "checked"));
    assert!(doc.has_attr(by_id("terms"), "checked"));

    let options = doc.options(by_id("s"));
    assert!(doc.has_attr(options[0], "selected"));
    assert!(!doc.has_attr(options[1], "selected"), "stale marker removed");

    assert_eq!(doc.text_content(by_id("bio")), "line1\nline2");
}

#[test]
fn test_original_is_never_modified() {
    let (live, root) = form();
    let before = live.clone();
    let _ = snapshot(&live, root);
    assert_eq!(live, before);
}

#[test]
fn test_duplicate_has_no_live_state_and_matching_shape() {
    let (live, root) = form();
    let dup = snapshot(&live, root);
    let doc = dup.document();

    assert_eq!(dup.correspondence().len(), live.descendants(root).len());
    for &(original, copy) in dup.correspondence() {
        assert!(doc.live(copy).is_none(), "copy {copy} carries live state");
        assert_eq!(doc.tag(copy), live.tag(original));
    }
    assert_eq!(dup.correspondence()[0], (root, dup.root()));
    assert_eq!(doc.parent(dup.root()), Some(Document::ROOT));
}

#[test]
fn test_empty_live_value_keeps_static_value() {
    let (mut live, root) = form();
    let name = live.find_by_id("name").unwrap();
    live.live_mut(name).unwrap().value = Some(String::new());
    let dup = snapshot(&live, root);
    let copy = dup.document().find_by_id("name").unwrap();
    assert_eq!(dup.document().attr(copy, "value"), Some("static"));
}

#[test]
fn test_out_of_range_index_selects_nothing() {
    let (mut live, root) = form();
    let select = live.find_by_id("s").unwrap();
    live.live_mut(select).unwrap().selected_index = Some(-1);
    let dup = snapshot(&live, root);
    let doc = dup.document();
    let copy = doc.find_by_id("s").unwrap();
    assert!(doc.options(copy).iter().all(|&o| !doc.has_attr(o, "selected")));
}

#[test]
fn test_unknown_root_gives_empty_duplicate() {
    let (live, _) = form();
    let dup = snapshot(&live, 999);
    assert_eq!(dup.root(), Document::ROOT);
    assert!(dup.document().is_empty());
    assert!(dup.correspondence().is_empty());
}

#[test]
fn test_snapshot_of_single_control() {
    let (live, _) = form();
    let terms = live.find_by_id("terms").unwrap();
    let dup = snapshot(&live, terms);
    assert_eq!(dup.correspondence().len(), 1);
    assert!(dup.document().has_attr(dup.root(), "checked"));
}
