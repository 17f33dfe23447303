//! Index-arena representation of a live HTML document.
//!
//! Nodes live in a flat vector and refer to each other by index, the same way a hierarchical
//! section list tracks its parent and children. Elements may carry live state (typed text,
//! checked flags, selected option) which exists alongside, and can disagree with, the markup
//! attributes they were parsed from.

/// Position of a node in its [`Document`] arena.
pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
/// What a node is, independent of where it sits in the tree.
pub enum NodeKind {
    /// The document container; never an element.
    Document,
    /// A tagged element with its attributes in source order.
    Element(Element),
    /// Character data.
    Text(String),
    /// A markup comment, kept so conversion can skip it explicitly.
    Comment(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Tag name and ordered attribute pairs of an element.
pub struct Element {
    /// Lower-case tag name.
    pub tag: String,
    /// Attribute (name, value) pairs in source order.
    pub attrs: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// State held by form controls that does not appear in markup.
pub struct LiveState {
    /// Current text of a text-entry or multi-line control.
    pub value: Option<String>,
    /// Current checked flag of a checkbox or radio control.
    pub checked: Option<bool>,
    /// Current option index of a choice control; out-of-range values mean "nothing selected".
    pub selected_index: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A single arena slot.
pub struct Node {
    /// Kind and payload of the node.
    pub kind: NodeKind,
    /// Live control state, if any has been recorded for this node.
    pub live: Option<LiveState>,
    /// Containing node, `None` for the document node and detached nodes.
    pub parent: Option<NodeId>,
    /// Ordered child indices.
    pub children: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Form control families that the snapshotter and conversion rules care about.
pub enum ControlKind {
    /// `input` whose type accepts free text (text, email, number, date, ...).
    TextEntry,
    /// `input type=checkbox` or `input type=radio`.
    Toggle,
    /// `input type=hidden`.
    Hidden,
    /// `button`, or `input` of type button, submit, reset or image.
    Button,
    /// `select`.
    Choice,
    /// `textarea`.
    MultiLine,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// An ordered tree of nodes rooted at a document node.
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Index of the document node in every arena.
    pub const ROOT: NodeId = 0;

    #[must_use]
    /// Creates a document containing only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                live: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    /// Number of arena slots, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    /// True when the document node has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[Self::ROOT].children.is_empty()
    }

    #[must_use]
    /// Looks up a node by index.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    /// Kind of the node at `id`.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Appends a new node as the last child of `parent`.
    ///
    /// A `parent` outside the arena yields a detached node rather than a panic.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        let attached = parent < self.nodes.len();
        self.nodes.push(Node {
            kind,
            live: None,
            parent: attached.then_some(parent),
            children: Vec::new(),
        });
        if attached {
            self.nodes[parent].children.push(id);
        }
        id
    }

    /// Appends an element with the given tag and attributes.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        self.append(
            parent,
            NodeKind::Element(Element {
                tag: tag.to_ascii_lowercase(),
                attrs,
            }),
        )
    }

    /// Appends a text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.append(parent, NodeKind::Text(text.to_string()))
    }

    // --- Tree queries ---

    #[must_use]
    /// Containing node, which may be the document node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    #[must_use]
    /// Containing node only if it is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    #[must_use]
    /// Ordered children of a node; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element children only, in order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    #[must_use]
    /// First child of any kind.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    #[must_use]
    /// Last child of any kind.
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    #[must_use]
    /// First child that is an element.
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    #[must_use]
    /// Last child that is an element.
    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).last()
    }

    #[must_use]
    /// Closest preceding sibling that is an element.
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings[..pos]
            .iter()
            .rev()
            .copied()
            .find(|&s| self.is_element(s))
    }

    #[must_use]
    /// Closest following sibling that is an element.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|&s| self.is_element(s))
    }

    #[must_use]
    /// Pre-order list of `id` and everything beneath it.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    #[must_use]
    /// The outermost element (normally `html`).
    pub fn document_element(&self) -> Option<NodeId> {
        self.first_element_child(Self::ROOT)
    }

    #[must_use]
    /// The `body` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.element_children(html)
            .find(|&c| self.tag(c) == Some("body"))
    }

    #[must_use]
    /// First element carrying the given `id` attribute.
    pub fn find_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|&n| self.attr(n, "id") == Some(element_id))
    }

    #[must_use]
    /// Text of the first `title` element, trimmed.
    pub fn title(&self) -> Option<String> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|&n| self.tag(n) == Some("title"))
            .map(|n| self.text_content(n).trim().to_string())
            .filter(|t| !t.is_empty())
    }

    // --- Element accessors ---

    #[must_use]
    /// True for element nodes.
    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element(_)))
    }

    #[must_use]
    /// Element payload, if `id` is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    #[must_use]
    /// Lower-case tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    #[must_use]
    /// Attribute value by name (ASCII case-insensitive).
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    /// Whether the attribute is present at all, whatever its value.
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    #[must_use]
    /// Concatenated character data of `id` and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| match self.kind(n) {
                Some(NodeKind::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    /// Text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(t)) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    /// Lower-case `type` of an `input`, defaulting to `text`.
    pub fn input_type(&self, id: NodeId) -> Option<String> {
        if self.tag(id) != Some("input") {
            return None;
        }
        Some(
            self.attr(id, "type")
                .map_or_else(|| "text".to_string(), |t| t.trim().to_ascii_lowercase()),
        )
    }

    #[must_use]
    /// Classifies form controls; `None` for everything else.
    pub fn control_kind(&self, id: NodeId) -> Option<ControlKind> {
        match self.tag(id)? {
            "input" => {
                let kind = self.input_type(id)?;
                Some(match kind.as_str() {
                    "checkbox" | "radio" => ControlKind::Toggle,
                    "hidden" => ControlKind::Hidden,
                    "button" | "submit" | "reset" | "image" => ControlKind::Button,
                    _ => ControlKind::TextEntry,
                })
            }
            "button" => Some(ControlKind::Button),
            "select" => Some(ControlKind::Choice),
            "textarea" => Some(ControlKind::MultiLine),
            _ => None,
        }
    }

    #[must_use]
    /// `option` elements beneath a choice control, in document order.
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .skip(1)
            .filter(|&n| self.tag(n) == Some("option"))
            .collect()
    }

    // --- Live state ---

    #[must_use]
    /// Live state recorded for a node.
    pub fn live(&self, id: NodeId) -> Option<&LiveState> {
        self.node(id).and_then(|n| n.live.as_ref())
    }

    /// Mutable live state, created empty on first access. `None` for unknown ids.
    pub fn live_mut(&mut self, id: NodeId) -> Option<&mut LiveState> {
        self.nodes
            .get_mut(id)
            .map(|n| n.live.get_or_insert_with(LiveState::default))
    }

    // --- Structural mutation ---

    /// Sets or overwrites an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(Node {
            kind: NodeKind::Element(el),
            ..
        }) = self.nodes.get_mut(id)
        {
            if let Some(slot) = el
                .attrs
                .iter_mut()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
            {
                slot.1 = value.to_string();
            } else {
                el.attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    /// Removes every occurrence of an attribute from an element.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(Node {
            kind: NodeKind::Element(el),
            ..
        }) = self.nodes.get_mut(id)
        {
            el.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        }
    }

    /// Replaces the text of a text node.
    pub fn set_text(&mut self, id: NodeId, text: String) {
        if let Some(Node {
            kind: NodeKind::Text(slot),
            ..
        }) = self.nodes.get_mut(id)
        {
            *slot = text;
        }
    }

    /// Detaches all children of `id` and gives it a single text child.
    pub fn replace_children_with_text(&mut self, id: NodeId, text: &str) {
        if id >= self.nodes.len() {
            return;
        }
        let old = std::mem::take(&mut self.nodes[id].children);
        for child in old {
            self.nodes[child].parent = None;
        }
        self.append_text(id, text);
    }

    // --- Display ---

    #[must_use]
    /// Short selector-like label such as `div#main.note`.
    pub fn describe(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => {
                let mut label = el.tag.clone();
                if let Some(element_id) = self.attr(id, "id").filter(|v| !v.is_empty()) {
                    label.push('#');
                    label.push_str(element_id);
                }
                if let Some(classes) = self.attr(id, "class") {
                    for class in classes.split_whitespace() {
                        label.push('.');
                        label.push_str(class);
                    }
                }
                label
            }
            Some(NodeKind::Text(_)) => "#text".to_string(),
            Some(NodeKind::Comment(_)) => "#comment".to_string(),
            Some(NodeKind::Document) => "#document".to_string(),
            None => "#detached".to_string(),
        }
    }

    #[must_use]
    /// Ancestor chain from the outermost element down to `id`, e.g. `html > body > p`.
    pub fn breadcrumb(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if self.is_element(node) || node == id {
                parts.push(self.describe(node));
            }
            cursor = self.parent(node);
        }
        parts.reverse();
        parts.join(" > ")
    }
}

#[derive(Clone, Copy, Debug)]
/// Borrowed handle on one node, handed to conversion rules.
pub struct NodeRef<'a> {
    /// Tree the node belongs to.
    pub doc: &'a Document,
    /// Index of the node within `doc`.
    pub id: NodeId,
}

impl<'a> NodeRef<'a> {
    #[must_use]
    /// Wraps a node index.
    pub fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    #[must_use]
    /// Lower-case tag name, if an element.
    pub fn tag(&self) -> Option<&'a str> {
        self.doc.tag(self.id)
    }

    #[must_use]
    /// True if the element's tag is one of `tags`.
    pub fn is(&self, tags: &[&str]) -> bool {
        self.tag().is_some_and(|t| tags.contains(&t))
    }

    #[must_use]
    /// Attribute by name.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.doc.attr(self.id, name)
    }

    #[must_use]
    /// Attribute presence.
    pub fn has_attr(&self, name: &str) -> bool {
        self.doc.has_attr(self.id, name)
    }

    #[must_use]
    /// Live state of the node.
    pub fn live(&self) -> Option<&'a LiveState> {
        self.doc.live(self.id)
    }

    #[must_use]
    /// Form control family.
    pub fn control_kind(&self) -> Option<ControlKind> {
        self.doc.control_kind(self.id)
    }

    #[must_use]
    /// Parent as a handle, if it is an element.
    pub fn parent_element(&self) -> Option<NodeRef<'a>> {
        self.doc
            .parent_element(self.id)
            .map(|p| NodeRef::new(self.doc, p))
    }

    #[must_use]
    /// Concatenated descendant text.
    pub fn text_content(&self) -> String {
        self.doc.text_content(self.id)
    }
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
