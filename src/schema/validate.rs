//! Schema validation pass
//!
//! Factories stay total and permissive; this module is the separate, checked
//! pass used by tests and persistence boundaries. It walks a document and
//! reports every invariant violation as a structured issue instead of
//! trusting callers or failing fast.

use super::{Block, Document, Inline, DOC_VERSION};

// ─────────────────────────────────────────────────────────────────────────────
// Issue Type
// ─────────────────────────────────────────────────────────────────────────────

/// A single invariant violation, with a JSON-pointer-like path into the
/// document for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation Walk
// ─────────────────────────────────────────────────────────────────────────────

/// Validate a document against the schema invariants.
///
/// Returns every violation found; an empty vector means the document is valid.
pub fn validate(doc: &Document) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if doc.version != DOC_VERSION {
        issues.push(ValidationIssue::new(
            "doc.version",
            format!("unsupported version {} (expected {})", doc.version, DOC_VERSION),
        ));
    }

    if doc.children.is_empty() {
        issues.push(ValidationIssue::new(
            "doc.children",
            "document has no blocks (an empty document is one empty paragraph)",
        ));
    }

    for (i, block) in doc.children.iter().enumerate() {
        validate_block(block, &format!("doc.children[{}]", i), &mut issues);
    }

    issues
}

/// Convenience wrapper for assertions.
pub fn is_valid(doc: &Document) -> bool {
    validate(doc).is_empty()
}

fn validate_block(block: &Block, path: &str, issues: &mut Vec<ValidationIssue>) {
    match block {
        Block::Paragraph { .. } | Block::Quote { .. } | Block::Hr { .. } => {}

        Block::Heading { attrs, .. } => {
            if !(1..=6).contains(&attrs.level) {
                issues.push(ValidationIssue::new(
                    format!("{}.attrs.level", path),
                    format!("heading level {} out of range 1-6", attrs.level),
                ));
            }
        }

        Block::Code { children, .. } => {
            let ok = matches!(
                children.as_slice(),
                [Inline::Text { marks, .. }] if marks.is_plain()
            );
            if !ok {
                issues.push(ValidationIssue::new(
                    format!("{}.children", path),
                    "code block must hold exactly one unmarked text leaf",
                ));
            }
        }

        Block::List { children, .. } => {
            for (i, item) in children.iter().enumerate() {
                if !matches!(item, Block::Paragraph { .. }) {
                    issues.push(ValidationIssue::new(
                        format!("{}.children[{}]", path, i),
                        "list item must be an inline-content (paragraph) block",
                    ));
                }
            }
        }

        Block::Table { .. } => {
            // Rows and cells are structurally constrained by the types.
        }

        Block::Image { attrs } | Block::Embed { attrs } => {
            if attrs.src.is_empty() {
                issues.push(ValidationIssue::new(
                    format!("{}.attrs.src", path),
                    "src attribute is required",
                ));
            }
        }

        Block::Unsupported { tag, .. } => {
            if tag.is_empty() {
                issues.push(ValidationIssue::new(
                    format!("{}.tag", path),
                    "unsupported block must record its source tag",
                ));
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
