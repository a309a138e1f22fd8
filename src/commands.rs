//! Selection-scoped structural commands
//!
//! The command engine mutates the live surface directly; it never touches the
//! document model. After any command the controller re-derives the model with
//! the surface parser, in that order, within the same handler invocation.
//!
//! # Outcomes
//! Commands that cannot apply report an explicit [`CommandOutcome`] instead
//! of failing silently: a selection-requiring command without a selection, a
//! block-scoped command without a current block, or a span the engine does
//! not support (anchor and focus under different parents) all leave the
//! surface untouched and say so.

use log::{debug, warn};

use crate::string_utils::{ceil_char_boundary, floor_char_boundary};
use crate::surface::{Selection, SurfaceElement, SurfaceNode};

// ─────────────────────────────────────────────────────────────────────────────
// Command Names
// ─────────────────────────────────────────────────────────────────────────────

/// The commands the application dispatches by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Bold,
    Italic,
    Underline,
    Heading1,
    Heading2,
    Paragraph,
    Quote,
    BulletList,
    OrderedList,
    HorizontalRule,
    CodeBlock,
}

impl Command {
    /// The dispatch name used by toolbars and shortcut tables.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Bold => "bold",
            Command::Italic => "italic",
            Command::Underline => "underline",
            Command::Heading1 => "h1",
            Command::Heading2 => "h2",
            Command::Paragraph => "p",
            Command::Quote => "quote",
            Command::BulletList => "ul",
            Command::OrderedList => "ol",
            Command::HorizontalRule => "hr",
            Command::CodeBlock => "code",
        }
    }

    /// Resolve a dispatch name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" => Some(Command::Bold),
            "italic" => Some(Command::Italic),
            "underline" => Some(Command::Underline),
            "h1" => Some(Command::Heading1),
            "h2" => Some(Command::Heading2),
            "p" => Some(Command::Paragraph),
            "quote" => Some(Command::Quote),
            "ul" => Some(Command::BulletList),
            "ol" => Some(Command::OrderedList),
            "hr" => Some(Command::HorizontalRule),
            "code" => Some(Command::CodeBlock),
            _ => None,
        }
    }
}

/// Result of a command invocation. The surface is only mutated on `Applied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    /// A selection-requiring command ran without a selection.
    NoSelection,
    /// A block-scoped command ran with no current block.
    NoCurrentBlock,
    /// The selection spans parents the engine does not wrap across.
    UnsupportedSelection,
}

impl CommandOutcome {
    pub fn applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}

/// An inline mark toggled by `toggle_mark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
}

impl MarkKind {
    fn tag(&self) -> &'static str {
        match self {
            MarkKind::Bold => "b",
            MarkKind::Italic => "i",
            MarkKind::Underline => "u",
        }
    }
}

/// A block type targeted by `set_block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTarget {
    Paragraph,
    Heading(u8),
    Quote,
    Code,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch
// ─────────────────────────────────────────────────────────────────────────────

/// Execute a command against the surface and the current selection. The
/// selection is updated in place when the command moves the caret.
pub fn execute(
    root: &mut SurfaceElement,
    selection: &mut Option<Selection>,
    command: Command,
) -> CommandOutcome {
    debug!("executing command '{}'", command.name());
    match command {
        Command::Bold => toggle_mark(root, selection, MarkKind::Bold),
        Command::Italic => toggle_mark(root, selection, MarkKind::Italic),
        Command::Underline => toggle_mark(root, selection, MarkKind::Underline),
        Command::Heading1 => set_block(root, selection.as_ref(), BlockTarget::Heading(1)),
        Command::Heading2 => set_block(root, selection.as_ref(), BlockTarget::Heading(2)),
        Command::Paragraph => set_block(root, selection.as_ref(), BlockTarget::Paragraph),
        Command::Quote => set_block(root, selection.as_ref(), BlockTarget::Quote),
        Command::CodeBlock => set_block(root, selection.as_ref(), BlockTarget::Code),
        Command::BulletList => set_list(root, selection.as_ref(), false),
        Command::OrderedList => set_list(root, selection.as_ref(), true),
        Command::HorizontalRule => insert_hr(root, selection.as_ref()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Current Block
// ─────────────────────────────────────────────────────────────────────────────

/// The current block for block-level commands: the surface-root child the
/// selection anchor sits under. `None` when there is no selection, the anchor
/// is the root itself, or the anchor points outside the surface.
pub fn current_block_index(root: &SurfaceElement, selection: Option<&Selection>) -> Option<usize> {
    let sel = selection?;
    let &index = sel.anchor.path.first()?;
    if index < root.children.len() {
        Some(index)
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// toggle_mark
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap the selected inline range in a new mark element, then collapse the
/// selection to immediately after the wrapper.
///
/// A collapsed caret inserts an empty wrapper at the caret. A span is
/// supported within a single text run or across siblings of one parent;
/// spans crossing parent boundaries leave the surface untouched.
pub fn toggle_mark(
    root: &mut SurfaceElement,
    selection: &mut Option<Selection>,
    mark: MarkKind,
) -> CommandOutcome {
    let Some(sel) = selection.clone() else {
        return CommandOutcome::NoSelection;
    };

    let result = if sel.is_collapsed() {
        insert_collapsed_mark(root, &sel, mark)
    } else if sel.anchor.path == sel.focus.path {
        wrap_within_node(root, &sel, mark)
    } else if parent_path(&sel.anchor.path) == parent_path(&sel.focus.path)
        && !sel.anchor.path.is_empty()
    {
        wrap_sibling_span(root, &sel, mark)
    } else {
        warn!("toggle_mark: selection spans unrelated parents, leaving surface untouched");
        return CommandOutcome::UnsupportedSelection;
    };

    match result {
        Some(caret) => {
            *selection = Some(caret);
            CommandOutcome::Applied
        }
        None => CommandOutcome::UnsupportedSelection,
    }
}

fn parent_path(path: &[usize]) -> &[usize] {
    &path[..path.len().saturating_sub(1)]
}

/// Caret case: insert an empty mark wrapper at the caret position.
fn insert_collapsed_mark(
    root: &mut SurfaceElement,
    sel: &Selection,
    mark: MarkKind,
) -> Option<Selection> {
    let point = &sel.anchor;
    let wrapper = SurfaceNode::Element(SurfaceElement::new(mark.tag()));

    // Caret inside an element: the offset is a child index
    let target_is_element = point.path.is_empty()
        || matches!(root.node_at(&point.path), Some(SurfaceNode::Element(_)));
    if target_is_element {
        let children = root.children_at_mut(&point.path)?;
        let index = point.offset.min(children.len());
        children.insert(index, wrapper);
        return Some(Selection::caret(point.path.clone(), index + 1));
    }

    // Caret inside a text run: split it at the offset when needed
    root.node_at(&point.path)?;
    let (parent, node_index) = point.path.split_at(point.path.len() - 1);
    let node_index = node_index[0];
    let parent = parent.to_vec();
    let siblings = root.children_at_mut(&parent)?;
    let SurfaceNode::Text(text) = siblings.get_mut(node_index)? else {
        return None;
    };

    let offset = floor_char_boundary(text, point.offset);
    let wrapper_index = if offset == 0 {
        node_index
    } else if offset >= text.len() {
        node_index + 1
    } else {
        let tail = text.split_off(offset);
        siblings.insert(node_index + 1, SurfaceNode::Text(tail));
        node_index + 1
    };
    siblings.insert(wrapper_index, wrapper);
    Some(Selection::caret(parent, wrapper_index + 1))
}

/// Span within a single node: for a text run, split around the covered
/// characters and wrap them; for an element, wrap the covered child range.
fn wrap_within_node(
    root: &mut SurfaceElement,
    sel: &Selection,
    mark: MarkKind,
) -> Option<Selection> {
    let path = &sel.anchor.path;
    let (start, end) = ordered_offsets(sel.anchor.offset, sel.focus.offset);

    if path.is_empty() || matches!(root.node_at(path), Some(SurfaceNode::Element(_))) {
        // Element: offsets are child indices
        let children = root.children_at_mut(path)?;
        let start = start.min(children.len());
        let end = end.min(children.len());
        let covered: Vec<SurfaceNode> = children.drain(start..end).collect();
        let wrapper = SurfaceElement::with_children(mark.tag(), covered);
        children.insert(start, SurfaceNode::Element(wrapper));
        return Some(Selection::caret(path.clone(), start + 1));
    }

    // Text run: replace with up to pre + wrapper + post
    root.node_at(path)?;
    let (parent, node_index) = path.split_at(path.len() - 1);
    let node_index = node_index[0];
    let parent = parent.to_vec();
    let siblings = root.children_at_mut(&parent)?;
    let SurfaceNode::Text(text) = siblings.get(node_index)? else {
        return None;
    };

    // Floor the start and ceil the end so a partially-selected multibyte
    // character is covered whole
    let start = floor_char_boundary(text, start);
    let end = ceil_char_boundary(text, end.max(start));
    let pre = text[..start].to_string();
    let mid = text[start..end].to_string();
    let post = text[end..].to_string();

    let mut replacement = Vec::with_capacity(3);
    if !pre.is_empty() {
        replacement.push(SurfaceNode::Text(pre));
    }
    let wrapper_index = node_index + replacement.len();
    replacement.push(SurfaceNode::Element(SurfaceElement::with_children(
        mark.tag(),
        vec![SurfaceNode::Text(mid)],
    )));
    if !post.is_empty() {
        replacement.push(SurfaceNode::Text(post));
    }
    siblings.splice(node_index..=node_index, replacement);
    Some(Selection::caret(parent, wrapper_index + 1))
}

/// Span across siblings of one parent: extract the covered sibling range
/// (splitting boundary text runs at the selection offsets) into the wrapper.
/// An element endpoint is covered wholly.
fn wrap_sibling_span(
    root: &mut SurfaceElement,
    sel: &Selection,
    mark: MarkKind,
) -> Option<Selection> {
    let parent = parent_path(&sel.anchor.path).to_vec();
    let (mut first, mut last) = (
        (*sel.anchor.path.last()?, sel.anchor.offset),
        (*sel.focus.path.last()?, sel.focus.offset),
    );
    if first.0 > last.0 {
        std::mem::swap(&mut first, &mut last);
    }
    let (first_index, first_offset) = first;
    let (last_index, last_offset) = last;

    let siblings = root.children_at_mut(&parent)?;
    if last_index >= siblings.len() {
        return None;
    }

    // Split the end boundary first so earlier indices stay valid
    let mut end_exclusive = last_index + 1;
    if let SurfaceNode::Text(text) = &mut siblings[last_index] {
        let offset = ceil_char_boundary(text, last_offset);
        if offset == 0 {
            end_exclusive = last_index;
        } else if offset < text.len() {
            let tail = text.split_off(offset);
            siblings.insert(last_index + 1, SurfaceNode::Text(tail));
        }
    }

    let mut start = first_index;
    if let SurfaceNode::Text(text) = &mut siblings[first_index] {
        let offset = floor_char_boundary(text, first_offset);
        if offset >= text.len() {
            start = first_index + 1;
        } else if offset > 0 {
            let tail = text.split_off(offset);
            siblings.insert(first_index + 1, SurfaceNode::Text(tail));
            start = first_index + 1;
            end_exclusive += 1;
        }
    }

    if start > end_exclusive {
        return None;
    }
    let covered: Vec<SurfaceNode> = siblings.drain(start..end_exclusive).collect();
    let wrapper = SurfaceElement::with_children(mark.tag(), covered);
    siblings.insert(start, SurfaceNode::Element(wrapper));
    Some(Selection::caret(parent, start + 1))
}

fn ordered_offsets(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// set_block
// ─────────────────────────────────────────────────────────────────────────────

/// Replace the current block with one of the target type, carrying its
/// content over. The code target takes the block's text content into a
/// nested code run, never its raw markup.
pub fn set_block(
    root: &mut SurfaceElement,
    selection: Option<&Selection>,
    target: BlockTarget,
) -> CommandOutcome {
    let Some(index) = current_block_index(root, selection) else {
        return CommandOutcome::NoCurrentBlock;
    };

    let old = &mut root.children[index];
    let replacement = match target {
        BlockTarget::Code => {
            let text = old.text_content();
            let mut code = SurfaceElement::new("code");
            if !text.is_empty() {
                code.append(SurfaceNode::text(text));
            }
            SurfaceElement::with_children("pre", vec![SurfaceNode::Element(code)])
        }
        _ => {
            let tag = match target {
                BlockTarget::Paragraph => "p".to_string(),
                BlockTarget::Heading(level) => format!("h{}", level.clamp(1, 6)),
                BlockTarget::Quote => "blockquote".to_string(),
                BlockTarget::Code => unreachable!("handled above"),
            };
            SurfaceElement::with_children(tag, take_content(old))
        }
    };
    root.children[index] = SurfaceNode::Element(replacement);
    CommandOutcome::Applied
}

/// Move a block's content out: an element yields its children, a bare text
/// run yields itself as a single text node.
fn take_content(node: &mut SurfaceNode) -> Vec<SurfaceNode> {
    match node {
        SurfaceNode::Element(el) => std::mem::take(&mut el.children),
        SurfaceNode::Text(text) => vec![SurfaceNode::Text(std::mem::take(text))],
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// set_list
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap the current block's content into a single item inside a fresh list
/// container. Each invocation creates a new list; repeated invocations never
/// merge into a growing list.
pub fn set_list(
    root: &mut SurfaceElement,
    selection: Option<&Selection>,
    ordered: bool,
) -> CommandOutcome {
    let Some(index) = current_block_index(root, selection) else {
        return CommandOutcome::NoCurrentBlock;
    };

    let content = take_content(&mut root.children[index]);
    let item = SurfaceElement::with_children("li", content);
    let list = SurfaceElement::with_children(
        if ordered { "ol" } else { "ul" },
        vec![SurfaceNode::Element(item)],
    );
    root.children[index] = SurfaceNode::Element(list);
    CommandOutcome::Applied
}

// ─────────────────────────────────────────────────────────────────────────────
// insert_hr
// ─────────────────────────────────────────────────────────────────────────────

/// Insert a horizontal rule immediately after the current block, leaving the
/// block itself untouched.
pub fn insert_hr(root: &mut SurfaceElement, selection: Option<&Selection>) -> CommandOutcome {
    let Some(index) = current_block_index(root, selection) else {
        return CommandOutcome::NoCurrentBlock;
    };
    root.children
        .insert(index + 1, SurfaceNode::Element(SurfaceElement::new("hr")));
    CommandOutcome::Applied
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
