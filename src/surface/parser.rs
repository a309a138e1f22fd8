//! Surface tree → document model derivation
//!
//! The approximate inverse of the renderer. Parsing is always a full
//! re-derivation: the result's children replace the document's children
//! wholesale, never an incremental diff. The surface can contain anything a
//! user managed to produce — foreign elements, arbitrary nesting, stray text —
//! so every dispatch rule here is total and tolerant.
//!
//! # Known information-loss boundary
//! Inline parsing inspects only the immediate wrapper tag of an element when
//! populating marks: `<i><b>x</b></i>` yields an italic leaf, the inner bold
//! is not decomposed. This matches the live-surface semantics deliberately;
//! do not "fix" it here without changing the documented model contract.

use log::warn;

use super::{SurfaceElement, SurfaceNode};
use crate::schema::{Block, Document, Inline, Marks};

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for surface parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Preserve unrecognized block elements as `Block::Unsupported` instead
    /// of dropping them from the derived model.
    pub preserve_unknown_blocks: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            preserve_unknown_blocks: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry Points
// ─────────────────────────────────────────────────────────────────────────────

/// Derive a document from the surface root with default options.
pub fn parse(root: &SurfaceElement) -> Document {
    parse_with_options(root, &ParseOptions::default())
}

/// Derive a document from the surface root.
pub fn parse_with_options(root: &SurfaceElement, options: &ParseOptions) -> Document {
    let children = root
        .children
        .iter()
        .filter_map(|node| parse_block(node, options))
        .collect();
    Document::new(children)
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Dispatch
// ─────────────────────────────────────────────────────────────────────────────

fn parse_block(node: &SurfaceNode, options: &ParseOptions) -> Option<Block> {
    let el = match node {
        // A bare text run at block level becomes a paragraph
        SurfaceNode::Text(text) => {
            return Some(Block::paragraph(vec![Inline::plain(text.clone())]));
        }
        SurfaceNode::Element(el) => el,
    };

    match el.tag.as_str() {
        "p" => Some(Block::paragraph(parse_inline(el))),
        "blockquote" => Some(Block::quote(parse_inline(el))),
        "pre" => Some(Block::code(el.text_content())),
        "hr" => Some(Block::hr()),
        "ul" => Some(parse_list(el, false)),
        "ol" => Some(parse_list(el, true)),
        tag => {
            if let Some(level) = heading_level(tag) {
                return Some(Block::heading(level, parse_inline(el)));
            }
            // Leaf blocks whose content lives in the `src` attribute; without
            // it there is nothing to rebuild and they fall through below.
            if tag == "img" || tag == "iframe" {
                if let Some(src) = el.attr("src") {
                    return Some(if tag == "img" {
                        Block::image(src)
                    } else {
                        Block::embed(src)
                    });
                }
            }
            // Round-trip of the renderer's unsupported-node placeholder
            if tag == "div" {
                if let Some(source_tag) = el.attr("data-unsupported") {
                    return Some(Block::unsupported(source_tag, el.text_content()));
                }
            }
            if options.preserve_unknown_blocks {
                warn!("preserving unrecognized surface element '{}' as unsupported", tag);
                Some(Block::unsupported(tag, el.text_content()))
            } else {
                warn!("dropping unrecognized surface element '{}'", tag);
                None
            }
        }
    }
}

/// `h1`-`h6` → heading level from the tag digit.
fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h', digit @ b'1'..=b'6'] => Some(digit - b'0'),
        _ => None,
    }
}

/// List items come from element children only; stray text runs between items
/// are skipped (tolerant policy). Each item's content is parsed as the inline
/// content of a synthetic paragraph item.
fn parse_list(el: &SurfaceElement, ordered: bool) -> Block {
    let items = el
        .children
        .iter()
        .filter_map(|child| match child {
            SurfaceNode::Element(item) => Some(Block::paragraph(parse_inline(item))),
            SurfaceNode::Text(_) => None,
        })
        .collect();
    Block::list(ordered, items)
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse an element's direct children as inline content.
///
/// Any element other than a line break reduces to a single text leaf carrying
/// its rendered text content, with marks taken from the immediate wrapper tag
/// only (`b`/`i`/`u`).
fn parse_inline(el: &SurfaceElement) -> Vec<Inline> {
    el.children
        .iter()
        .map(|node| match node {
            SurfaceNode::Text(text) => Inline::plain(text.clone()),
            SurfaceNode::Element(child) => match child.tag.as_str() {
                "br" => Inline::br(),
                tag => {
                    let mut marks = Marks::none();
                    match tag {
                        "b" => marks.bold = true,
                        "i" => marks.italic = true,
                        "u" => marks.underline = true,
                        _ => {}
                    }
                    Inline::text(child.text_content(), marks)
                }
            },
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::markup::read_into_root;

    fn parse_markup(input: &str) -> Document {
        parse(&read_into_root(input))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_empty_surface_is_empty_document() {
        let doc = parse_markup("");
        assert_eq!(doc, Document::empty());
    }

    #[test]
    fn test_parse_bare_text_becomes_paragraph() {
        let doc = parse_markup("loose text");
        assert_eq!(
            doc.children,
            vec![Block::paragraph(vec![Inline::plain("loose text")])]
        );
    }

    #[test]
    fn test_parse_block_tags() {
        let doc = parse_markup("<p>a</p><h1>b</h1><h2>c</h2><blockquote>d</blockquote><hr />");
        assert_eq!(
            doc.children,
            vec![
                Block::paragraph(vec![Inline::plain("a")]),
                Block::heading(1, vec![Inline::plain("b")]),
                Block::heading(2, vec![Inline::plain("c")]),
                Block::quote(vec![Inline::plain("d")]),
                Block::hr(),
            ]
        );
    }

    #[test]
    fn test_parse_deep_heading_levels() {
        let doc = parse_markup("<h4>four</h4>");
        assert_eq!(doc.children, vec![Block::heading(4, vec![Inline::plain("four")])]);
    }

    #[test]
    fn test_parse_pre_takes_text_content() {
        let doc = parse_markup("<pre><code>let x = 1;<br />let y = 2;</code></pre>");
        assert_eq!(doc.children, vec![Block::code("let x = 1;\nlet y = 2;")]);
    }

    #[test]
    fn test_parse_list_with_two_items() {
        let doc = parse_markup("<ul><li>one</li><li>two</li></ul>");
        assert_eq!(
            doc.children,
            vec![Block::list(
                false,
                vec![
                    Block::paragraph(vec![Inline::plain("one")]),
                    Block::paragraph(vec![Inline::plain("two")]),
                ]
            )]
        );
    }

    #[test]
    fn test_parse_ordered_list_from_tag() {
        let doc = parse_markup("<ol><li>x</li></ol>");
        match &doc.children[0] {
            Block::List { attrs, children } => {
                assert!(attrs.ordered);
                assert_eq!(children.len(), 1);
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_skips_stray_text_between_items() {
        let doc = parse_markup("<ul>stray<li>kept</li>more</ul>");
        match &doc.children[0] {
            Block::List { children, .. } => assert_eq!(children.len(), 1),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_image_and_embed_from_src_attribute() {
        let doc = parse_markup(
            r#"<img src="pic.png" /><iframe src="https://example.com/v"></iframe>"#,
        );
        assert_eq!(
            doc.children,
            vec![Block::image("pic.png"), Block::embed("https://example.com/v")]
        );
    }

    #[test]
    fn test_parse_srcless_img_falls_back_to_unsupported() {
        let doc = parse_markup("<img />");
        assert_eq!(doc.children, vec![Block::unsupported("img", "")]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Unknown Elements
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_unknown_element_preserved_by_default() {
        let doc = parse_markup("<aside>side note</aside>");
        assert_eq!(doc.children, vec![Block::unsupported("aside", "side note")]);
    }

    #[test]
    fn test_unknown_element_dropped_in_faithful_mode() {
        let root = read_into_root("<aside>gone</aside><p>kept</p>");
        let doc = parse_with_options(
            &root,
            &ParseOptions {
                preserve_unknown_blocks: false,
            },
        );
        assert_eq!(doc.children, vec![Block::paragraph(vec![Inline::plain("kept")])]);
    }

    #[test]
    fn test_unsupported_placeholder_round_trips() {
        let doc = parse_markup("<div data-unsupported=\"aside\">kept text</div>");
        assert_eq!(doc.children, vec![Block::unsupported("aside", "kept text")]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline Parsing
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_parse_inline_marks() {
        let doc = parse_markup("<p>plain <b>bold</b><i>it</i><u>under</u><br /></p>");
        assert_eq!(
            doc.children,
            vec![Block::paragraph(vec![
                Inline::plain("plain "),
                Inline::text("bold", Marks::none().with_bold()),
                Inline::text("it", Marks::none().with_italic()),
                Inline::text("under", Marks::none().with_underline()),
                Inline::br(),
            ])]
        );
    }

    #[test]
    fn test_nested_marks_keep_outer_wrapper_only() {
        let doc = parse_markup("<p><i><b>x</b></i></p>");
        assert_eq!(
            doc.children,
            vec![Block::paragraph(vec![Inline::text(
                "x",
                Marks::none().with_italic()
            )])]
        );
    }

    #[test]
    fn test_unknown_inline_element_reduces_to_plain_text() {
        let doc = parse_markup("<p><span>styled</span></p>");
        assert_eq!(
            doc.children,
            vec![Block::paragraph(vec![Inline::plain("styled")])]
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Round-Trip Stability
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_clean_subset_round_trip() {
        use crate::render::render;

        let original = Document::new(vec![
            Block::heading(1, vec![Inline::plain("Title")]),
            Block::paragraph(vec![
                Inline::plain("intro "),
                Inline::text("bold", Marks::none().with_bold()),
            ]),
            Block::quote(vec![Inline::plain("quoted")]),
            Block::list(
                true,
                vec![
                    Block::paragraph(vec![Inline::plain("one")]),
                    Block::paragraph(vec![Inline::plain("two")]),
                ],
            ),
            Block::hr(),
            Block::image("pic.png"),
            Block::embed("https://example.com/v"),
        ]);
        let derived = parse(&read_into_root(&render(&original)));
        assert_eq!(derived, original);
    }

    #[test]
    fn test_escaped_text_round_trip() {
        use crate::render::render;

        let original = Document::new(vec![Block::paragraph(vec![Inline::plain("a & b")])]);
        let markup = render(&original);
        assert!(markup.contains("a &amp; b"));
        let derived = parse(&read_into_root(&markup));
        assert_eq!(derived, original);
    }
}
