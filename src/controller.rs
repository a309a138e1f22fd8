//! Document controller: the application-facing orchestration layer
//!
//! Owns the current model, the live surface, and the selection, and wires the
//! two data paths together:
//!
//! - Command path: a command mutates the surface, then the model is re-derived
//!   from it by the surface parser — always in that order, within the same
//!   invocation.
//! - `set_value` path: an external model replaces the current one, the
//!   renderer produces markup, and the surface is rebuilt from that markup.
//!
//! Between derivations the surface is authoritative and the model is a cache;
//! the parser is the only path that updates the model.

use crate::commands::{self, Command, CommandOutcome};
use crate::render::render;
use crate::schema::Document;
use crate::surface::markup::read_into_root;
use crate::surface::parser::{parse_with_options, ParseOptions};
use crate::surface::{Selection, SurfaceElement};

// ─────────────────────────────────────────────────────────────────────────────
// Controller
// ─────────────────────────────────────────────────────────────────────────────

/// The public surface exposed to the rest of the application.
#[derive(Debug)]
pub struct DocumentController {
    doc: Document,
    surface: SurfaceElement,
    selection: Option<Selection>,
    parse_options: ParseOptions,
}

impl DocumentController {
    /// Start with an empty document (one empty paragraph) rendered onto a
    /// fresh surface.
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(parse_options: ParseOptions) -> Self {
        let doc = Document::empty();
        let surface = read_into_root(&render(&doc));
        Self {
            doc,
            surface,
            selection: None,
            parse_options,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Value Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// The current model, as an independent copy: mutating the returned
    /// document never affects controller state.
    pub fn get_value(&self) -> Document {
        self.doc.clone()
    }

    /// Install a document as the current model and rebuild the surface from
    /// its rendered markup. Takes ownership, so the caller cannot mutate the
    /// installed value afterwards. Clears the selection: the old one pointed
    /// into a surface that no longer exists.
    pub fn set_value(&mut self, doc: Document) {
        self.doc = Document::new(doc.children);
        self.surface = read_into_root(&render(&self.doc));
        self.selection = None;
    }

    /// Render the current model to markup.
    pub fn to_markup(&self) -> String {
        render(&self.doc)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Install the host's notion of the current selection.
    pub fn select(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Surface Access
    // ─────────────────────────────────────────────────────────────────────────

    /// The live surface, for hosts that map their own tree onto it.
    pub fn surface(&self) -> &SurfaceElement {
        &self.surface
    }

    /// Mutable surface access for direct content edits (typing, deletion).
    /// Call [`DocumentController::refresh`] afterwards to re-derive the model.
    pub fn surface_mut(&mut self) -> &mut SurfaceElement {
        &mut self.surface
    }

    /// Re-derive the model from the surface, replacing it wholesale.
    pub fn refresh(&mut self) {
        self.doc = parse_with_options(&self.surface, &self.parse_options);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Command Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a command against the current selection, then refresh the
    /// model. The surface mutation always completes before the re-derivation.
    pub fn exec(&mut self, command: Command) -> CommandOutcome {
        let outcome = commands::execute(&mut self.surface, &mut self.selection, command);
        self.refresh();
        outcome
    }

    /// Execute a command by its dispatch name (`bold`, `h2`, `ul`, ...).
    /// Returns `None` for an unrecognized name, leaving all state untouched.
    pub fn exec_named(&mut self, name: &str) -> Option<CommandOutcome> {
        Command::from_name(name).map(|command| self.exec(command))
    }
}

impl Default for DocumentController {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
