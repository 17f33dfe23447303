use super::{
    navigate, select_first_child, select_next_sibling, select_parent, select_previous_sibling,
    Command, Highlighter, MarkedNode, Navigation, Selector,
};
use crate::convert::Engine;
use crate::document::{Document, NodeId};

/// html > body > [div#a > [p#a1, p#a2], div#b > [p#b1], div#c]
fn tree() -> Document {
    let mut doc = Document::new();
    let html = doc.append_element(Document::ROOT, "html", &[]);
    let body = doc.append_element(html, "body", &[]);
    let a = doc.append_element(body, "div", &[("id", "a")]);
    doc.append_text(a, "\n");
    let a1 = doc.append_element(a, "p", &[("id", "a1")]);
    doc.append_text(a1, "first");
    doc.append_text(a, "\n");
    doc.append_element(a, "p", &[("id", "a2")]);
    let b = doc.append_element(body, "div", &[("id", "b")]);
    doc.append_element(b, "p", &[("id", "b1")]);
    doc.append_element(body, "div", &[("id", "c")]);
    doc
}

fn id(doc: &Document, element_id: &str) -> NodeId {
    doc.find_by_id(element_id).unwrap()
}

#[test]
fn test_parent_and_first_child() {
    let doc = tree();
    assert_eq!(select_parent(&doc, id(&doc, "a1")), id(&doc, "a"));
    assert_eq!(select_first_child(&doc, id(&doc, "a")), id(&doc, "a1"));
    assert_eq!(
        select_first_child(&doc, id(&doc, "a1")),
        id(&doc, "a1"),
        "text children are not a destination"
    );
}

#[test]
fn test_parent_never_lands_on_roots() {
    let doc = tree();
    assert_eq!(select_parent(&doc, id(&doc, "b")), id(&doc, "a"));
    assert_eq!(select_parent(&doc, id(&doc, "a")), id(&doc, "a"));
    let html = doc.document_element().unwrap();
    assert_eq!(select_parent(&doc, html), html, "no element parent: stay");
}

#[test]
fn test_siblings_skip_text() {
    let doc = tree();
    assert_eq!(select_next_sibling(&doc, id(&doc, "a1")), id(&doc, "a2"));
    assert_eq!(select_previous_sibling(&doc, id(&doc, "a2")), id(&doc, "a1"));
    assert_eq!(select_next_sibling(&doc, id(&doc, "a")), id(&doc, "b"));
}

#[test]
fn test_next_sibling_crosses_into_following_subtree() {
    let doc = tree();
    assert_eq!(select_next_sibling(&doc, id(&doc, "a2")), id(&doc, "b1"));
    assert_eq!(
        select_next_sibling(&doc, id(&doc, "b1")),
        id(&doc, "c"),
        "a childless sibling is itself the destination"
    );
}

#[test]
fn test_previous_sibling_crosses_into_preceding_subtree() {
    let doc = tree();
    assert_eq!(select_previous_sibling(&doc, id(&doc, "b1")), id(&doc, "a2"));
}

#[test]
fn test_no_move_at_document_edges() {
    let doc = tree();
    let first = id(&doc, "a1");
    let last = id(&doc, "c");
    assert_eq!(select_previous_sibling(&doc, first), first);
    assert_eq!(select_next_sibling(&doc, last), last);
    assert_eq!(select_first_child(&doc, last), last);
}

#[test]
fn test_navigation_is_total() {
    let doc = tree();
    let navs = [
        Navigation::Parent,
        Navigation::FirstChild,
        Navigation::PreviousSibling,
        Navigation::NextSibling,
    ];
    for node in doc.descendants(Document::ROOT) {
        if !doc.is_element(node) {
            continue;
        }
        for nav in navs {
            let next = navigate(&doc, node, nav);
            assert!(doc.is_element(next), "{nav:?} from {node} left the elements");
            if nav != Navigation::FirstChild && next != node {
                assert!(
                    !matches!(doc.tag(next), Some("html" | "body")),
                    "{nav:?} from {node} landed on a root"
                );
            }
        }
    }
    for nav in navs {
        assert_eq!(navigate(&doc, 999, nav), 999, "unknown nodes stay put");
    }
}

#[test]
fn test_commands_from_input() {
    assert_eq!(
        Command::from_key("ArrowUp"),
        Some(Command::Navigate(Navigation::Parent))
    );
    assert_eq!(
        Command::from_key("l"),
        Some(Command::Navigate(Navigation::NextSibling))
    );
    assert_eq!(Command::from_key("Escape"), Some(Command::Cancel));
    assert_eq!(Command::from_key("Enter"), Some(Command::Commit));
    assert_eq!(Command::from_key("x"), None);
    assert_eq!(
        Command::from_wheel(-3.0),
        Some(Command::Navigate(Navigation::Parent))
    );
    assert_eq!(
        Command::from_wheel(1.0),
        Some(Command::Navigate(Navigation::FirstChild))
    );
    assert_eq!(Command::from_wheel(0.0), None);
}

#[test]
fn test_session_highlights_every_move() {
    let doc = tree();
    let mut selector = Selector::new(MarkedNode::default());
    let mut session = selector.begin(&doc, id(&doc, "a1"));
    assert_eq!(session.highlighter().node, Some(id(&doc, "a1")));

    let moved = session.navigate(Navigation::Parent);
    assert_eq!(moved, id(&doc, "a"));
    assert_eq!(session.current(), id(&doc, "a"));
    assert_eq!(session.highlighter().node, Some(id(&doc, "a")));

    session.cancel();
    assert_eq!(selector.highlighter().node, None, "cancel clears the mark");
}

#[test]
fn test_session_starts_on_element_ancestor_of_text() {
    let doc = tree();
    let text = doc.first_child(id(&doc, "a1")).unwrap();
    let mut selector = Selector::new(MarkedNode::default());
    let session = selector.begin(&doc, text);
    assert_eq!(session.current(), id(&doc, "a1"));
}

#[test]
fn test_commit_converts_current_node() {
    let doc = tree();
    let engine = Engine::default();
    let mut selector = Selector::new(MarkedNode::default());
    let session = selector.begin(&doc, id(&doc, "a1"));
    assert_eq!(session.preview(&engine), "first");

    let capture = session.commit(&engine);
    assert_eq!(capture.node, id(&doc, "a1"));
    assert_eq!(capture.markdown, "first");
    assert_eq!(selector.highlighter().node, None, "commit clears the mark");
}

#[derive(Default)]
struct Recorder {
    events: Vec<Option<NodeId>>,
}

impl Highlighter for Recorder {
    fn highlight(&mut self, _doc: &Document, node: NodeId) {
        self.events.push(Some(node));
    }

    fn clear(&mut self) {
        self.events.push(None);
    }
}

#[test]
fn test_dropped_session_clears_highlight() {
    let doc = tree();
    let mut selector = Selector::new(Recorder::default());
    {
        let mut session = selector.begin(&doc, id(&doc, "b1"));
        session.navigate(Navigation::Parent);
    }
    let b1 = id(&doc, "b1");
    let b = id(&doc, "b");
    assert_eq!(
        selector.highlighter().events,
        vec![None, Some(b1), None, Some(b), None]
    );
}
