//! Document schema: node types, invariants, and factory constructors
//!
//! This module defines the canonical document model as closed tagged enums
//! (`Block`, `Inline`) so that rendering and parsing dispatch exhaustively —
//! adding a node type is a compile-time-checked change, not a silently-ignored
//! default branch.
//!
//! # Wire Format
//! The serde derives produce the persistence/export JSON shape directly:
//! `{"type":"doc","version":1,"children":[...]}` at the root, internally
//! tagged nodes below it (`{"type":"paragraph","attrs":{...},"children":[...]}`),
//! text leaves as `{"type":"text","text":"...","marks":{...}}`.
//!
//! # Factories
//! Every constructor is total: it returns a valid node for any input,
//! normalizing where the invariants require it (an inline container never has
//! zero leaves, a code block always carries exactly one text leaf). Optional
//! presentation attributes are passed through without validation; callers are
//! trusted, and `schema::validate` provides the separate checked pass.

pub mod validate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The single supported schema version, reserved for future evolution.
pub const DOC_VERSION: u32 = 1;

fn is_false(v: &bool) -> bool {
    !*v
}

fn default_heading_level() -> u8 {
    1
}

// ─────────────────────────────────────────────────────────────────────────────
// Attributes
// ─────────────────────────────────────────────────────────────────────────────

/// Optional presentation attributes shared by all block types.
///
/// Unknown keys are preserved in `extra` rather than rejected; the renderer
/// only consumes the four typed fields, in the fixed order align, padding,
/// margin, border.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attrs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    /// Untyped passthrough for anything else callers attach.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Attrs {
    /// True when no presentation attribute is set (the `extra` passthrough is
    /// ignored; it never reaches the rendered style declaration).
    pub fn is_plain(&self) -> bool {
        self.align.is_none()
            && self.padding.is_none()
            && self.margin.is_none()
            && self.border.is_none()
    }

    pub fn with_align(mut self, align: impl Into<String>) -> Self {
        self.align = Some(align.into());
        self
    }

    pub fn with_padding(mut self, padding: impl Into<String>) -> Self {
        self.padding = Some(padding.into());
        self
    }

    pub fn with_margin(mut self, margin: impl Into<String>) -> Self {
        self.margin = Some(margin.into());
        self
    }

    pub fn with_border(mut self, border: impl Into<String>) -> Self {
        self.border = Some(border.into());
        self
    }
}

/// Heading attributes: the semantic level (1-6) plus the shared set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingAttrs {
    #[serde(default = "default_heading_level")]
    pub level: u8,
    #[serde(flatten)]
    pub base: Attrs,
}

impl Default for HeadingAttrs {
    fn default() -> Self {
        Self {
            level: 1,
            base: Attrs::default(),
        }
    }
}

/// List attributes: ordered flag plus the shared set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAttrs {
    #[serde(default)]
    pub ordered: bool,
    #[serde(flatten)]
    pub base: Attrs,
}

/// Attributes for leaf blocks that reference external content (`image`,
/// `embed`): a required `src` plus the shared set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SrcAttrs {
    #[serde(default)]
    pub src: String,
    #[serde(flatten)]
    pub base: Attrs,
}

// ─────────────────────────────────────────────────────────────────────────────
// Marks
// ─────────────────────────────────────────────────────────────────────────────

/// Boolean style flags attached to a text leaf. Absence means false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marks {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
}

impl Marks {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// True when no mark is set.
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.underline
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Leaves
// ─────────────────────────────────────────────────────────────────────────────

/// An inline leaf within a block's content: a marked text run or an explicit
/// line break. Inline leaves never have children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inline {
    Text {
        #[serde(default)]
        text: String,
        #[serde(default)]
        marks: Marks,
    },
    Br,
}

impl Inline {
    /// Text leaf factory. Defaults: empty text, no marks.
    pub fn text(value: impl Into<String>, marks: Marks) -> Self {
        Inline::Text {
            text: value.into(),
            marks,
        }
    }

    /// Plain (unmarked) text leaf.
    pub fn plain(value: impl Into<String>) -> Self {
        Inline::text(value, Marks::none())
    }

    /// Explicit inline line break.
    pub fn br() -> Self {
        Inline::Br
    }

    /// The leaf's text content (empty for a line break).
    pub fn as_text(&self) -> &str {
        match self {
            Inline::Text { text, .. } => text,
            Inline::Br => "",
        }
    }
}

/// A table cell: a plain inline-content array.
pub type TableCell = Vec<Inline>;
/// A table row: an ordered sequence of cells.
pub type TableRow = Vec<TableCell>;

// ─────────────────────────────────────────────────────────────────────────────
// Block Nodes
// ─────────────────────────────────────────────────────────────────────────────

/// A structural unit of the document.
///
/// `Unsupported` carries content the surface parser could not map to a known
/// block type, so foreign surface elements survive re-derivation instead of
/// being silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Paragraph {
        #[serde(default)]
        attrs: Attrs,
        #[serde(default)]
        children: Vec<Inline>,
    },
    Heading {
        #[serde(default)]
        attrs: HeadingAttrs,
        #[serde(default)]
        children: Vec<Inline>,
    },
    Quote {
        #[serde(default)]
        attrs: Attrs,
        #[serde(default)]
        children: Vec<Inline>,
    },
    /// Raw text content; invariant: exactly one unmarked text leaf.
    Code {
        #[serde(default)]
        attrs: Attrs,
        #[serde(default)]
        children: Vec<Inline>,
    },
    /// Items are inline-content blocks (paragraph-shaped), rendered as `li`.
    List {
        #[serde(default)]
        attrs: ListAttrs,
        #[serde(default)]
        children: Vec<Block>,
    },
    Table {
        #[serde(default)]
        attrs: Attrs,
        #[serde(default)]
        children: Vec<TableRow>,
    },
    Hr {
        #[serde(default)]
        attrs: Attrs,
    },
    Image {
        #[serde(default)]
        attrs: SrcAttrs,
    },
    Embed {
        #[serde(default)]
        attrs: SrcAttrs,
    },
    /// Content preserved from an unrecognized surface element.
    Unsupported {
        tag: String,
        #[serde(default)]
        text: String,
    },
}

/// Inline containers normalize to at least one (possibly empty) text leaf.
fn inline_content(children: Vec<Inline>) -> Vec<Inline> {
    if children.is_empty() {
        vec![Inline::plain("")]
    } else {
        children
    }
}

impl Block {
    /// Paragraph factory. Default content: a single empty text leaf.
    pub fn paragraph(children: Vec<Inline>) -> Self {
        Block::Paragraph {
            attrs: Attrs::default(),
            children: inline_content(children),
        }
    }

    /// Heading factory. The level is stored as given (the renderer clamps to
    /// 1-6 for tag safety; `validate` flags out-of-range levels).
    pub fn heading(level: u8, children: Vec<Inline>) -> Self {
        Block::Heading {
            attrs: HeadingAttrs {
                level,
                base: Attrs::default(),
            },
            children: inline_content(children),
        }
    }

    /// Quote factory. Default content: a single empty text leaf.
    pub fn quote(children: Vec<Inline>) -> Self {
        Block::Quote {
            attrs: Attrs::default(),
            children: inline_content(children),
        }
    }

    /// Code factory: wraps the raw text in the single unmarked leaf the
    /// invariant requires. Escaping happens at render time, never here.
    pub fn code(text: impl Into<String>) -> Self {
        Block::Code {
            attrs: Attrs::default(),
            children: vec![Inline::plain(text)],
        }
    }

    /// List factory. Default: unordered, no items.
    pub fn list(ordered: bool, items: Vec<Block>) -> Self {
        Block::List {
            attrs: ListAttrs {
                ordered,
                base: Attrs::default(),
            },
            children: items,
        }
    }

    /// Table factory. Default: no rows.
    pub fn table(rows: Vec<TableRow>) -> Self {
        Block::Table {
            attrs: Attrs::default(),
            children: rows,
        }
    }

    /// Horizontal rule leaf.
    pub fn hr() -> Self {
        Block::Hr {
            attrs: Attrs::default(),
        }
    }

    /// Image leaf referencing `src`.
    pub fn image(src: impl Into<String>) -> Self {
        Block::Image {
            attrs: SrcAttrs {
                src: src.into(),
                base: Attrs::default(),
            },
        }
    }

    /// Embedded frame leaf referencing `src`.
    pub fn embed(src: impl Into<String>) -> Self {
        Block::Embed {
            attrs: SrcAttrs {
                src: src.into(),
                base: Attrs::default(),
            },
        }
    }

    /// Preserved foreign content.
    pub fn unsupported(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Block::Unsupported {
            tag: tag.into(),
            text: text.into(),
        }
    }

    /// Replace the block's shared presentation attributes, keeping the
    /// type-specific ones (heading level, ordered flag, src) intact.
    pub fn with_attrs(mut self, attrs: Attrs) -> Self {
        match &mut self {
            Block::Paragraph { attrs: a, .. }
            | Block::Quote { attrs: a, .. }
            | Block::Code { attrs: a, .. }
            | Block::Table { attrs: a, .. }
            | Block::Hr { attrs: a } => *a = attrs,
            Block::Heading { attrs: a, .. } => a.base = attrs,
            Block::List { attrs: a, .. } => a.base = attrs,
            Block::Image { attrs: a } | Block::Embed { attrs: a } => a.base = attrs,
            Block::Unsupported { .. } => {}
        }
        self
    }

    /// The shared presentation attributes for any block type.
    pub fn attrs(&self) -> Option<&Attrs> {
        match self {
            Block::Paragraph { attrs, .. }
            | Block::Quote { attrs, .. }
            | Block::Code { attrs, .. }
            | Block::Table { attrs, .. }
            | Block::Hr { attrs } => Some(attrs),
            Block::Heading { attrs, .. } => Some(&attrs.base),
            Block::List { attrs, .. } => Some(&attrs.base),
            Block::Image { attrs } | Block::Embed { attrs } => Some(&attrs.base),
            Block::Unsupported { .. } => None,
        }
    }

    /// The block's direct inline content, when it has any (paragraph,
    /// heading, quote, code).
    pub fn inline_children(&self) -> Option<&[Inline]> {
        match self {
            Block::Paragraph { children, .. }
            | Block::Heading { children, .. }
            | Block::Quote { children, .. }
            | Block::Code { children, .. } => Some(children),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Root
// ─────────────────────────────────────────────────────────────────────────────

/// The canonical, versioned document root.
///
/// Invariant: `children` is never empty; an empty document is a single empty
/// paragraph. The constructors uphold this, and deserialized input is
/// normalized through [`Document::new`] by checked loaders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "doc")]
pub struct Document {
    pub version: u32,
    pub children: Vec<Block>,
}

impl Document {
    /// An empty document: one empty paragraph.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Build a document from blocks, normalizing the non-empty invariant.
    pub fn new(children: Vec<Block>) -> Self {
        let children = if children.is_empty() {
            vec![Block::paragraph(Vec::new())]
        } else {
            children
        };
        Document {
            version: DOC_VERSION,
            children,
        }
    }

    /// Serialize to the compact JSON wire format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON (persistence collaborators that favor
    /// human-readable storage).
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from the JSON wire format. Shape errors surface as
    /// [`Error::Json`]; no schema validation is performed here.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Deserialize and validate; rejects documents that violate the schema
    /// invariants with [`Error::InvalidDocument`].
    pub fn from_json_strict(json: &str) -> Result<Self> {
        let doc = Self::from_json(json)?;
        let issues = validate::validate(&doc);
        if issues.is_empty() {
            Ok(doc)
        } else {
            Err(Error::InvalidDocument { issues })
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Factory Defaults
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_document_is_single_empty_paragraph() {
        let doc = Document::empty();
        assert_eq!(doc.version, DOC_VERSION);
        assert_eq!(doc.children.len(), 1);
        assert_eq!(doc.children[0], Block::paragraph(Vec::new()));
    }

    #[test]
    fn test_paragraph_normalizes_empty_children() {
        let p = Block::paragraph(Vec::new());
        assert_eq!(p.inline_children().unwrap(), &[Inline::plain("")]);
    }

    #[test]
    fn test_code_factory_wraps_single_text_leaf() {
        let code = Block::code("let x = 1;");
        let children = code.inline_children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0], Inline::plain("let x = 1;"));
    }

    #[test]
    fn test_heading_default_level_survives_serde() {
        let json = r#"{"type":"heading","attrs":{},"children":[{"type":"text","text":"t","marks":{}}]}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        match block {
            Block::Heading { attrs, .. } => assert_eq!(attrs.level, 1),
            other => panic!("expected heading, got {:?}", other),
        }
    }

    #[test]
    fn test_with_attrs_keeps_type_specific_fields() {
        let h = Block::heading(2, vec![Inline::plain("t")])
            .with_attrs(Attrs::default().with_align("center"));
        match h {
            Block::Heading { attrs, .. } => {
                assert_eq!(attrs.level, 2);
                assert_eq!(attrs.base.align.as_deref(), Some("center"));
            }
            other => panic!("expected heading, got {:?}", other),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wire Format
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_document_wire_shape() {
        let doc = Document::new(vec![Block::paragraph(vec![Inline::text(
            "Hi",
            Marks::none().with_bold(),
        )])]);
        let json = doc.to_json().unwrap();
        assert!(json.contains(r#""type":"doc""#));
        assert!(json.contains(r#""version":1"#));
        assert!(json.contains(r#""type":"paragraph""#));
        assert!(json.contains(r#""type":"text""#));
        assert!(json.contains(r#""bold":true"#));
        // Unset marks are omitted from the wire
        assert!(!json.contains("italic"));
    }

    #[test]
    fn test_json_round_trip() {
        let doc = Document::new(vec![
            Block::heading(2, vec![Inline::plain("Title")]),
            Block::list(
                true,
                vec![
                    Block::paragraph(vec![Inline::plain("one")]),
                    Block::paragraph(vec![Inline::plain("two")]),
                ],
            ),
            Block::table(vec![vec![
                vec![Inline::plain("a")],
                vec![Inline::plain("b")],
            ]]),
            Block::hr(),
            Block::image("pic.png"),
        ]);
        let json = doc.to_json().unwrap();
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_extra_attrs_pass_through() {
        let json = r#"{"type":"paragraph","attrs":{"data-x":"y"},"children":[]}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        match &block {
            Block::Paragraph { attrs, .. } => {
                assert_eq!(attrs.extra.get("data-x").and_then(|v| v.as_str()), Some("y"));
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
        let out = serde_json::to_string(&block).unwrap();
        assert!(out.contains("data-x"));
    }

    #[test]
    fn test_from_json_strict_rejects_bad_heading_level() {
        let json = r#"{"type":"doc","version":1,"children":[
            {"type":"heading","attrs":{"level":9},"children":[{"type":"text","text":"t","marks":{}}]}
        ]}"#;
        assert!(Document::from_json(json).is_ok());
        assert!(matches!(
            Document::from_json_strict(json),
            Err(crate::error::Error::InvalidDocument { .. })
        ));
    }
}
