//! Markup → surface tree loading
//!
//! A minimal, tolerant reader for the renderer's markup grammar. It exists so
//! the `setValue` path (model → markup → surface replacement) and round-trip
//! tests work without any host rendering environment.
//!
//! The reader never fails: malformed input degrades best-effort instead of
//! aborting the session. Unclosed elements close at end of input, stray
//! closing tags are ignored, and a `<` that does not open a tag is literal
//! text. Foreign tags are loaded as ordinary elements; classifying them is
//! the parser's job, not the reader's.

use super::{SurfaceElement, SurfaceNode};

/// Tags that never carry children, closed or not.
const VOID_TAGS: &[&str] = &["br", "hr", "img"];

// ─────────────────────────────────────────────────────────────────────────────
// Entry Point
// ─────────────────────────────────────────────────────────────────────────────

/// Load markup into surface nodes.
pub fn read_markup(input: &str) -> Vec<SurfaceNode> {
    Reader::new(input).read_all()
}

/// Load markup as the children of a fresh surface root.
pub fn read_into_root(input: &str) -> SurfaceElement {
    let mut root = SurfaceElement::root();
    root.children = read_markup(input);
    root
}

// ─────────────────────────────────────────────────────────────────────────────
// Reader
// ─────────────────────────────────────────────────────────────────────────────

struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn read_all(mut self) -> Vec<SurfaceNode> {
        let mut output = Vec::new();
        // Open elements awaiting their closing tag
        let mut stack: Vec<SurfaceElement> = Vec::new();

        while let Some(ch) = self.peek() {
            if ch == '<' {
                if let Some(event) = self.read_tag() {
                    match event {
                        TagEvent::Open(el) => stack.push(el),
                        TagEvent::Leaf(el) => {
                            push_node(&mut stack, &mut output, SurfaceNode::Element(el));
                        }
                        TagEvent::Close(name) => close_tag(&mut stack, &mut output, &name),
                    }
                    continue;
                }
                // Not a tag after all: consume the '<' as literal text
                self.pos += 1;
                push_text(&mut stack, &mut output, "<");
                continue;
            }
            let text = self.read_text();
            push_text(&mut stack, &mut output, &text);
        }

        // Unclosed elements close at end of input
        while let Some(el) = stack.pop() {
            push_node(&mut stack, &mut output, SurfaceNode::Element(el));
        }
        output
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Plain text up to the next `<`, with entities decoded.
    fn read_text(&mut self) -> String {
        let start = self.pos;
        let rest = &self.input[start..];
        let end = rest.find('<').map(|i| start + i).unwrap_or(self.input.len());
        self.pos = end;
        unescape_text(&self.input[start..end])
    }

    /// Attempt to read a tag at the current `<`. Returns `None` (position
    /// unchanged) when the input is not tag-shaped.
    fn read_tag(&mut self) -> Option<TagEvent> {
        let rest = &self.input[self.pos..];
        let mut chars = rest.char_indices().skip(1);
        let (_, first) = chars.next()?;

        if first == '/' {
            // Closing tag: </name>
            let name_start = self.pos + 2;
            let close = rest.find('>')?;
            let name = self.input[name_start..self.pos + close].trim().to_ascii_lowercase();
            if name.is_empty() {
                return None;
            }
            self.pos += close + 1;
            return Some(TagEvent::Close(name));
        }

        if !first.is_ascii_alphabetic() {
            return None;
        }

        // Opening tag: name, attributes, then '>' or '/>'
        let tag_end = find_tag_end(rest)?;
        let inner = &rest[1..tag_end];
        let (inner, explicit_self_close) = match inner.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (inner, false),
        };

        let mut parts = inner.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("").to_ascii_lowercase();
        let mut el = SurfaceElement::new(name.clone());
        if let Some(attr_src) = parts.next() {
            read_attrs(attr_src, &mut el);
        }
        self.pos += tag_end + 1;

        if explicit_self_close || VOID_TAGS.contains(&name.as_str()) {
            Some(TagEvent::Leaf(el))
        } else {
            Some(TagEvent::Open(el))
        }
    }
}

enum TagEvent {
    Open(SurfaceElement),
    Leaf(SurfaceElement),
    Close(String),
}

/// Locate the `>` that ends an opening tag, skipping any `>` inside a quoted
/// attribute value. An unterminated quote leaves the tag unterminated too.
fn find_tag_end(rest: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, ch) in rest.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '>' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Assembly
// ─────────────────────────────────────────────────────────────────────────────

fn push_node(stack: &mut [SurfaceElement], output: &mut Vec<SurfaceNode>, node: SurfaceNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => output.push(node),
    }
}

fn push_text(stack: &mut [SurfaceElement], output: &mut Vec<SurfaceNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    // Merge with a preceding text run so entity boundaries do not split nodes
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => output,
    };
    if let Some(SurfaceNode::Text(prev)) = siblings.last_mut() {
        prev.push_str(text);
    } else {
        siblings.push(SurfaceNode::text(text));
    }
}

/// Close the innermost open element named `name`; elements left open inside
/// it close implicitly. A closing tag with no matching open element is a
/// stray and is ignored.
fn close_tag(stack: &mut Vec<SurfaceElement>, output: &mut Vec<SurfaceNode>, name: &str) {
    let Some(matching) = stack.iter().rposition(|el| el.tag == name) else {
        return;
    };
    while stack.len() > matching {
        if let Some(el) = stack.pop() {
            push_node(stack, output, SurfaceNode::Element(el));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Attributes and Entities
// ─────────────────────────────────────────────────────────────────────────────

/// Parse `name="value"` pairs; a bare name becomes an empty-valued attribute.
fn read_attrs(src: &str, el: &mut SurfaceElement) {
    let mut rest = src.trim_start();
    while !rest.is_empty() {
        let name_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            if let Some(quoted) = after_eq.strip_prefix('"') {
                let value_end = quoted.find('"').unwrap_or(quoted.len());
                if !name.is_empty() {
                    el.set_attr(name, &quoted[..value_end]);
                }
                rest = quoted[value_end..].strip_prefix('"').unwrap_or("").trim_start();
            } else {
                // Unquoted value: up to whitespace
                let value_end = after_eq
                    .find(char::is_whitespace)
                    .unwrap_or(after_eq.len());
                if !name.is_empty() {
                    el.set_attr(name, &after_eq[..value_end]);
                }
                rest = after_eq[value_end..].trim_start();
            }
        } else {
            if !name.is_empty() {
                el.set_attr(name, "");
            }
            if name.is_empty() {
                // Avoid spinning on malformed input
                rest = &rest[rest.len().min(1)..];
            }
        }
    }
}

/// Decode the entities the renderer emits; anything else stays literal.
fn unescape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let mut matched = false;
        for (entity, ch) in [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>'), ("&quot;", '"')] {
            if let Some(after) = rest.strip_prefix(entity) {
                out.push(ch);
                rest = after;
                matched = true;
                break;
            }
        }
        if !matched {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
