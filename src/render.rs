//! Document model → markup rendering
//!
//! A pure function of the model: the same document always produces
//! byte-identical markup. Dispatch is an exhaustive match over the closed
//! `Block`/`Inline` enums, so a new node type is a compile error here rather
//! than a silently dropped default branch.
//!
//! # Rules
//! - One wrapping tag per block type (`p`, `h{level}`, `blockquote`,
//!   `ol`/`ul` + `li`, `pre > code`, `table`/`tr`/`td`, self-closing `hr` and
//!   `img`, `iframe` for embeds).
//! - Presentation attributes serialize as a single `style="k:v;..."`
//!   declaration in the fixed order align, padding, margin, border, emitted
//!   only when at least one is set.
//! - Inline text is escaped for `&`, `<`, `>` and wrapped outermost to
//!   innermost in the fixed mark order bold, italic, underline. Code block
//!   text bypasses inline handling entirely: one escaped run, no marks, no
//!   line-break elements.
//! - Preserved foreign content renders as a `data-unsupported` passthrough
//!   placeholder and logs a warning, so nothing is lost on re-derivation.

use std::fmt::Write;

use log::warn;

use crate::schema::{Attrs, Block, Document, Inline, Marks};

// ─────────────────────────────────────────────────────────────────────────────
// Entry Point
// ─────────────────────────────────────────────────────────────────────────────

/// Render a document to its markup form.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    for block in &doc.children {
        render_block(block, &mut out);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn render_block(block: &Block, out: &mut String) {
    match block {
        Block::Paragraph { attrs, children } => {
            let _ = write!(out, "<p{}>", style_attr(attrs));
            render_inline(children, out);
            out.push_str("</p>");
        }

        Block::Heading { attrs, children } => {
            // Clamp for tag safety; validate() reports out-of-range levels.
            let level = attrs.level.clamp(1, 6);
            let _ = write!(out, "<h{}{}>", level, style_attr(&attrs.base));
            render_inline(children, out);
            let _ = write!(out, "</h{}>", level);
        }

        Block::Quote { attrs, children } => {
            let _ = write!(out, "<blockquote{}>", style_attr(attrs));
            render_inline(children, out);
            out.push_str("</blockquote>");
        }

        Block::Code { attrs, children } => {
            // Single escaped run; inline marks and breaks do not apply here.
            let text = children.first().map(Inline::as_text).unwrap_or("");
            let _ = write!(out, "<pre{}><code>", style_attr(attrs));
            out.push_str(&escape_text(text));
            out.push_str("</code></pre>");
        }

        Block::List { attrs, children } => {
            let tag = if attrs.ordered { "ol" } else { "ul" };
            let _ = write!(out, "<{}{}>", tag, style_attr(&attrs.base));
            for item in children {
                match item.inline_children() {
                    Some(inline) => {
                        out.push_str("<li>");
                        render_inline(inline, out);
                        out.push_str("</li>");
                    }
                    None => {
                        // Tolerant policy: stray non-item children are skipped.
                        warn!("skipping non-item child in list render");
                    }
                }
            }
            let _ = write!(out, "</{}>", tag);
        }

        Block::Table { attrs, children } => {
            let _ = write!(out, "<table{}>", style_attr(attrs));
            for row in children {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str("<td>");
                    render_inline(cell, out);
                    out.push_str("</td>");
                }
                out.push_str("</tr>");
            }
            out.push_str("</table>");
        }

        Block::Hr { attrs } => {
            let _ = write!(out, "<hr{} />", style_attr(attrs));
        }

        Block::Image { attrs } => {
            let _ = write!(
                out,
                "<img src=\"{}\"{} />",
                attrs.src,
                style_attr(&attrs.base)
            );
        }

        Block::Embed { attrs } => {
            let _ = write!(
                out,
                "<iframe src=\"{}\"{}></iframe>",
                attrs.src,
                style_attr(&attrs.base)
            );
        }

        Block::Unsupported { tag, text } => {
            warn!("rendering unsupported node '{}' as passthrough placeholder", tag);
            let _ = write!(out, "<div data-unsupported=\"{}\">", escape_attr(tag));
            out.push_str(&escape_text(text));
            out.push_str("</div>");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn render_inline(children: &[Inline], out: &mut String) {
    for leaf in children {
        match leaf {
            Inline::Text { text, marks } => render_marked_text(text, marks, out),
            Inline::Br => out.push_str("<br />"),
        }
    }
}

/// Wrap escaped text in mark tags, outermost to innermost: bold, italic,
/// underline. A leaf with all three renders as `<b><i><u>text</u></i></b>`.
fn render_marked_text(text: &str, marks: &Marks, out: &mut String) {
    if marks.bold {
        out.push_str("<b>");
    }
    if marks.italic {
        out.push_str("<i>");
    }
    if marks.underline {
        out.push_str("<u>");
    }
    out.push_str(&escape_text(text));
    if marks.underline {
        out.push_str("</u>");
    }
    if marks.italic {
        out.push_str("</i>");
    }
    if marks.bold {
        out.push_str("</b>");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Style and Escaping Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize presentation attributes as ` style="k:v;..."`, in the fixed
/// order align, padding, margin, border. Empty when none is set.
fn style_attr(attrs: &Attrs) -> String {
    if attrs.is_plain() {
        return String::new();
    }
    let mut parts = Vec::new();
    if let Some(align) = &attrs.align {
        parts.push(format!("text-align:{}", align));
    }
    if let Some(padding) = &attrs.padding {
        parts.push(format!("padding:{}", padding));
    }
    if let Some(margin) = &attrs.margin {
        parts.push(format!("margin:{}", margin));
    }
    if let Some(border) = &attrs.border {
        parts.push(format!("border:{}", border));
    }
    format!(" style=\"{}\"", parts.join(";"))
}

/// Escape a value embedded in a double-quoted attribute. A mangled surface
/// tag can put a quote into an `Unsupported` tag name; it must not be able to
/// break out of the placeholder attribute.
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape the three reserved markup characters. `src` attribute values pass
/// through unescaped; that matches the wire grammar as specified.
pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attrs, Block, Document, Inline, Marks};

    fn doc(blocks: Vec<Block>) -> Document {
        Document::new(blocks)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Block Rendering
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_bold_paragraph() {
        let d = doc(vec![Block::paragraph(vec![Inline::text(
            "Hi",
            Marks::none().with_bold(),
        )])]);
        assert_eq!(render(&d), "<p><b>Hi</b></p>");
    }

    #[test]
    fn test_render_heading_levels_match() {
        let d = doc(vec![Block::heading(2, vec![Inline::plain("Title")])]);
        assert_eq!(render(&d), "<h2>Title</h2>");
    }

    #[test]
    fn test_render_heading_level_clamped() {
        let d = doc(vec![Block::heading(9, vec![Inline::plain("deep")])]);
        assert_eq!(render(&d), "<h6>deep</h6>");
    }

    #[test]
    fn test_render_quote() {
        let d = doc(vec![Block::quote(vec![Inline::plain("said")])]);
        assert_eq!(render(&d), "<blockquote>said</blockquote>");
    }

    #[test]
    fn test_render_code_escapes_without_inline_handling() {
        let d = doc(vec![Block::code("if a < b && b > c {}")]);
        assert_eq!(
            render(&d),
            "<pre><code>if a &lt; b &amp;&amp; b &gt; c {}</code></pre>"
        );
    }

    #[test]
    fn test_render_lists() {
        let items = vec![
            Block::paragraph(vec![Inline::plain("one")]),
            Block::paragraph(vec![Inline::plain("two")]),
        ];
        let d = doc(vec![Block::list(false, items.clone()), Block::list(true, items)]);
        assert_eq!(
            render(&d),
            "<ul><li>one</li><li>two</li></ul><ol><li>one</li><li>two</li></ol>"
        );
    }

    #[test]
    fn test_render_list_skips_stray_item() {
        let d = doc(vec![Block::list(
            false,
            vec![Block::paragraph(vec![Inline::plain("ok")]), Block::hr()],
        )]);
        assert_eq!(render(&d), "<ul><li>ok</li></ul>");
    }

    #[test]
    fn test_render_table() {
        let d = doc(vec![Block::table(vec![vec![
            vec![Inline::plain("a")],
            vec![Inline::plain("b")],
        ]])]);
        assert_eq!(
            render(&d),
            "<table><tr><td>a</td><td>b</td></tr></table>"
        );
    }

    #[test]
    fn test_render_leaf_blocks() {
        let d = doc(vec![
            Block::hr(),
            Block::image("pic.png"),
            Block::embed("https://example.com/v"),
        ]);
        assert_eq!(
            render(&d),
            "<hr /><img src=\"pic.png\" /><iframe src=\"https://example.com/v\"></iframe>"
        );
    }

    #[test]
    fn test_render_unsupported_preserves_content() {
        let d = doc(vec![Block::unsupported("aside", "kept text")]);
        assert_eq!(render(&d), "<div data-unsupported=\"aside\">kept text</div>");
    }

    #[test]
    fn test_render_unsupported_escapes_quote_in_tag() {
        let d = doc(vec![Block::unsupported("a\"b", "x")]);
        assert_eq!(render(&d), "<div data-unsupported=\"a&quot;b\">x</div>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inline Rendering
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_mark_nesting_order() {
        let marks = Marks {
            bold: true,
            italic: true,
            underline: true,
        };
        let d = doc(vec![Block::paragraph(vec![Inline::text("x", marks)])]);
        assert_eq!(render(&d), "<p><b><i><u>x</u></i></b></p>");
    }

    #[test]
    fn test_render_br() {
        let d = doc(vec![Block::paragraph(vec![
            Inline::plain("a"),
            Inline::br(),
            Inline::plain("b"),
        ])]);
        assert_eq!(render(&d), "<p>a<br />b</p>");
    }

    #[test]
    fn test_render_escapes_reserved_characters() {
        let d = doc(vec![Block::paragraph(vec![Inline::plain("a & b <c>")])]);
        assert_eq!(render(&d), "<p>a &amp; b &lt;c&gt;</p>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Style Declarations
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_style_attr_fixed_order() {
        let attrs = Attrs::default()
            .with_border("1px")
            .with_align("center")
            .with_margin("0")
            .with_padding("4px");
        assert_eq!(
            style_attr(&attrs),
            " style=\"text-align:center;padding:4px;margin:0;border:1px\""
        );
    }

    #[test]
    fn test_style_attr_absent_when_plain() {
        assert_eq!(style_attr(&Attrs::default()), "");
    }

    #[test]
    fn test_styled_paragraph() {
        let d = doc(vec![
            Block::paragraph(vec![Inline::plain("x")]).with_attrs(Attrs::default().with_align("right")),
        ]);
        assert_eq!(render(&d), "<p style=\"text-align:right\">x</p>");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Determinism
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_is_deterministic() {
        let d = doc(vec![
            Block::heading(1, vec![Inline::plain("T")]),
            Block::paragraph(vec![
                Inline::text("b", Marks::none().with_bold()),
                Inline::br(),
                Inline::text("iu", Marks::none().with_italic().with_underline()),
            ]),
            Block::hr(),
        ]);
        assert_eq!(render(&d), render(&d));
    }
}
