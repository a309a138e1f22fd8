//! UTF-8 Safe String Utilities
//!
//! Selection offsets arrive from the host surface as arbitrary byte
//! positions, but Rust strings are UTF-8 encoded and slicing off a character
//! boundary panics. These helpers adjust offsets to valid boundaries before
//! the command engine splits a text run around a selection.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
/// If `index` is already on a character boundary, returns `index`.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    // Walk backwards to find the start of the character
    let bytes = s.as_bytes();
    let mut i = index;
    while i > 0 && !is_utf8_char_start(bytes[i]) {
        i -= 1;
    }
    i
}

/// Returns the smallest index that is greater than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than or equal to the string length, returns the
/// string length. If `index` is already on a character boundary, returns
/// `index`.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    if index == 0 {
        return 0;
    }

    // Walk forwards to find the start of the next character
    let bytes = s.as_bytes();
    let mut i = index;
    while i < bytes.len() && !is_utf8_char_start(bytes[i]) {
        i += 1;
    }
    i
}

/// Check if a byte is the start of a UTF-8 character.
///
/// In UTF-8:
/// - Single-byte chars (ASCII): 0xxxxxxx (0x00-0x7F)
/// - Multi-byte char start: 11xxxxxx (0xC0-0xFF)
/// - Continuation bytes: 10xxxxxx (0x80-0xBF)
///
/// This returns true for single-byte chars and multi-byte start bytes.
#[inline]
fn is_utf8_char_start(byte: u8) -> bool {
    // A byte is a char start if it's NOT a continuation byte (10xxxxxx)
    (byte & 0b11000000) != 0b10000000
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
