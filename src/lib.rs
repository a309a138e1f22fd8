//! richtext-core - Structured rich-text editing core
//!
//! Transforms rich-text content between three representations: a canonical
//! document model (a typed node tree), a markup rendering of that model, and
//! a live, user-editable surface tree mutated by direct edits and formatting
//! commands. The model is re-derived from the surface deterministically after
//! every mutation, so arbitrary user edits never corrupt surrounding content.
//!
//! # Components
//! - [`schema`] — node types, invariants, total factory constructors, and a
//!   separate validation pass
//! - [`render`] — model → markup, deterministic and idempotent
//! - [`surface`] — host-independent surface tree, selection value type,
//!   markup loading, and the surface → model parser
//! - [`commands`] — selection-scoped structural mutations with explicit
//!   outcomes
//! - [`controller`] — the application-facing orchestration layer
//!
//! # Example
//! ```
//! use richtext_core::controller::DocumentController;
//! use richtext_core::commands::Command;
//! use richtext_core::schema::{Block, Document, Inline};
//! use richtext_core::surface::Selection;
//!
//! let mut editor = DocumentController::new();
//! editor.set_value(Document::new(vec![Block::paragraph(vec![
//!     Inline::plain("hello"),
//! ])]));
//! editor.select(Some(Selection::caret(vec![0, 0], 0)));
//! editor.exec(Command::Heading1);
//! assert_eq!(editor.to_markup(), "<h1>hello</h1>");
//! ```

pub mod commands;
pub mod controller;
pub mod error;
pub mod render;
pub mod schema;
mod string_utils;
pub mod surface;

pub use commands::{Command, CommandOutcome};
pub use controller::DocumentController;
pub use error::{Error, Result};
pub use schema::{Block, Document, Inline, Marks};
