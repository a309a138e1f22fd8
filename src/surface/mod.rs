//! Editable surface tree and selection model
//!
//! The surface is the live, user-mutable tree a person edits. It is modeled
//! host-independently as a plain value tree (`SurfaceNode` / `SurfaceElement`)
//! so the command engine and parser are unit-testable without a rendering
//! environment: the host maps its own node handles onto paths into this tree.
//!
//! A `Selection` is an explicit value type — anchor path + offset, focus path
//! + offset — rather than a handle into any host API. A path addresses a node
//! by child indices from the surface root; the offset is a character position
//! when the addressed node is a text run, and a child index when it is an
//! element.

pub mod markup;
pub mod parser;

// ─────────────────────────────────────────────────────────────────────────────
// Tree Nodes
// ─────────────────────────────────────────────────────────────────────────────

/// A node in the editable surface: an element or a bare text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceNode {
    Element(SurfaceElement),
    Text(String),
}

impl SurfaceNode {
    /// Bare text run.
    pub fn text(value: impl Into<String>) -> Self {
        SurfaceNode::Text(value.into())
    }

    /// Element wrapper.
    pub fn element(el: SurfaceElement) -> Self {
        SurfaceNode::Element(el)
    }

    pub fn as_element(&self) -> Option<&SurfaceElement> {
        match self {
            SurfaceNode::Element(el) => Some(el),
            SurfaceNode::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut SurfaceElement> {
        match self {
            SurfaceNode::Element(el) => Some(el),
            SurfaceNode::Text(_) => None,
        }
    }

    /// The rendered text content of this node (tags stripped, line breaks as
    /// newlines).
    pub fn text_content(&self) -> String {
        match self {
            SurfaceNode::Text(t) => t.clone(),
            SurfaceNode::Element(el) => el.text_content(),
        }
    }
}

/// An element in the editable surface: tag, attributes, ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SurfaceNode>,
}

impl SurfaceElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(tag: impl Into<String>, children: Vec<SurfaceNode>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children,
        }
    }

    /// The root element every document surface hangs off.
    pub fn root() -> Self {
        Self::new("editor")
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.attrs.iter_mut().find(|(k, _)| *k == name) {
            entry.1 = value;
        } else {
            self.attrs.push((name, value));
        }
    }

    pub fn append(&mut self, node: SurfaceNode) {
        self.children.push(node);
    }

    /// Rendered text content: concatenated text runs with `br` elements
    /// counted as newlines.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Path Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// The node addressed by `path` (child indices from this element).
    /// An empty path addresses this element itself, so it yields `None` here;
    /// use the element directly in that case.
    pub fn node_at(&self, path: &[usize]) -> Option<&SurfaceNode> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.children.get(first)?;
        for &idx in rest {
            node = node.as_element()?.children.get(idx)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut SurfaceNode> {
        let (&first, rest) = path.split_first()?;
        let mut node = self.children.get_mut(first)?;
        for &idx in rest {
            node = node.as_element_mut()?.children.get_mut(idx)?;
        }
        Some(node)
    }

    /// The child list of the element addressed by `path`; an empty path
    /// yields this element's own children.
    pub fn children_at_mut(&mut self, path: &[usize]) -> Option<&mut Vec<SurfaceNode>> {
        if path.is_empty() {
            return Some(&mut self.children);
        }
        match self.node_at_mut(path)? {
            SurfaceNode::Element(el) => Some(&mut el.children),
            SurfaceNode::Text(_) => None,
        }
    }
}

fn collect_text(children: &[SurfaceNode], out: &mut String) {
    for child in children {
        match child {
            SurfaceNode::Text(t) => out.push_str(t),
            SurfaceNode::Element(el) => {
                if el.tag == "br" {
                    out.push('\n');
                } else {
                    collect_text(&el.children, out);
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// One end of a selection: a path into the surface tree plus an offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPoint {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl SelectionPoint {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// A selection within the surface: anchor and focus points. A zero-length
/// range (anchor == focus) is a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor: SelectionPoint,
    pub focus: SelectionPoint,
}

impl Selection {
    /// A caret (collapsed selection) at a single point.
    pub fn caret(path: Vec<usize>, offset: usize) -> Self {
        let point = SelectionPoint::new(path, offset);
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    /// A span between two points.
    pub fn span(anchor: SelectionPoint, focus: SelectionPoint) -> Self {
        Self { anchor, focus }
    }

    /// True when the range has zero length (a caret rather than a span).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_root() -> SurfaceElement {
        let mut root = SurfaceElement::root();
        root.append(SurfaceNode::element(SurfaceElement::with_children(
            "p",
            vec![
                SurfaceNode::text("hello "),
                SurfaceNode::element(SurfaceElement::with_children(
                    "b",
                    vec![SurfaceNode::text("world")],
                )),
            ],
        )));
        root.append(SurfaceNode::text("stray"));
        root
    }

    #[test]
    fn test_node_at_paths() {
        let root = sample_root();
        assert_eq!(
            root.node_at(&[0, 1, 0]),
            Some(&SurfaceNode::text("world"))
        );
        assert_eq!(root.node_at(&[1]), Some(&SurfaceNode::text("stray")));
        assert_eq!(root.node_at(&[2]), None);
        assert_eq!(root.node_at(&[0, 5]), None);
        // Paths cannot descend through a text run
        assert_eq!(root.node_at(&[1, 0]), None);
    }

    #[test]
    fn test_children_at_mut_root() {
        let mut root = sample_root();
        let children = root.children_at_mut(&[]).unwrap();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_text_content_with_br() {
        let el = SurfaceElement::with_children(
            "pre",
            vec![
                SurfaceNode::text("line1"),
                SurfaceNode::element(SurfaceElement::new("br")),
                SurfaceNode::text("line2"),
            ],
        );
        assert_eq!(el.text_content(), "line1\nline2");
    }

    #[test]
    fn test_text_content_strips_nesting() {
        let root = sample_root();
        let block = root.node_at(&[0]).unwrap();
        assert_eq!(block.text_content(), "hello world");
    }

    #[test]
    fn test_set_attr_replaces_existing() {
        let mut el = SurfaceElement::new("img");
        el.set_attr("src", "a.png");
        el.set_attr("src", "b.png");
        assert_eq!(el.attr("src"), Some("b.png"));
        assert_eq!(el.attrs.len(), 1);
    }

    #[test]
    fn test_selection_collapsed() {
        assert!(Selection::caret(vec![0, 0], 3).is_collapsed());
        let span = Selection::span(
            SelectionPoint::new(vec![0, 0], 1),
            SelectionPoint::new(vec![0, 0], 4),
        );
        assert!(!span.is_collapsed());
    }
}
