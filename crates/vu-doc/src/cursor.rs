// SPDX-License-Identifier: MIT
//
// Cursor — position in raw-space with clamped single-step movement.
//
// The cursor lives in raw coordinates: `x` indexes bytes of the current
// row (and may equal the row length, the position past the last byte),
// `y` ranges over `0..=doc.len()` — one past the last row is legal and
// shows as an empty virtual line.
//
// Movement is clamp-at-the-edges, no wrapping: Left stops at column 0,
// Right at the row length, Up at the first row, Down at the virtual row
// past the last. Every vertical move ends with the same normalization
// pass snapping `x` to the destination row's length — there is no
// remembered column, the cursor always clamps down. Keeping the clamp
// as one shared pass (rather than per-direction special cases) leaves
// room to bolt on wrap-around or multi-row motions later.

use crate::document::Document;
use crate::row::Row;

/// A cursor position in raw-space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Raw column: byte index into the current row, `0..=row.len()`.
    pub x: usize,
    /// Row index, `0..=doc.len()`.
    pub y: usize,
}

impl Cursor {
    /// A cursor at the origin.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Render column of the cursor (tabs expanded up to `x`).
    ///
    /// Zero when the cursor sits past the last row.
    #[must_use]
    pub fn render_col(&self, doc: &Document) -> usize {
        doc.row(self.y).map_or(0, |row| row.render_col(self.x))
    }

    // ── Horizontal movement ─────────────────────────────────────

    /// Move one column left. Stops at column 0 — no wrap to the
    /// previous row.
    pub const fn move_left(&mut self) {
        self.x = self.x.saturating_sub(1);
    }

    /// Move one column right. Stops at the current row's length.
    pub fn move_right(&mut self, doc: &Document) {
        if self.x < row_len(doc, self.y) {
            self.x += 1;
        }
    }

    /// Jump to column 0.
    pub const fn home(&mut self) {
        self.x = 0;
    }

    /// Jump past the last byte of the current row.
    pub fn end(&mut self, doc: &Document) {
        self.x = row_len(doc, self.y);
    }

    // ── Vertical movement ───────────────────────────────────────

    /// Move one row up. Stops at the first row; clamps `x` to the
    /// destination row.
    pub fn move_up(&mut self, doc: &Document) {
        if self.y > 0 {
            self.y -= 1;
        }
        self.clamp_x(doc);
    }

    /// Move one row down. Stops one past the last row; clamps `x` to
    /// the destination row.
    pub fn move_down(&mut self, doc: &Document) {
        if self.y < doc.len() {
            self.y += 1;
        }
        self.clamp_x(doc);
    }

    // ── Normalization ───────────────────────────────────────────

    /// Snap `x` back inside the current row after any vertical move.
    pub fn clamp_x(&mut self, doc: &Document) {
        let len = row_len(doc, self.y);
        if self.x > len {
            self.x = len;
        }
    }
}

/// Raw length of row `y`, or 0 for the virtual row past the end.
fn row_len(doc: &Document, y: usize) -> usize {
    doc.row(y).map_or(0, Row::len)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc() -> Document {
        Document::from_bytes(b"hello\nhi\n")
    }

    // ── Horizontal clamps ───────────────────────────────────────

    #[test]
    fn left_stops_at_column_zero() {
        let mut cur = Cursor::new();
        cur.move_left();
        assert_eq!(cur, Cursor { x: 0, y: 0 });
    }

    #[test]
    fn right_stops_at_row_length() {
        let d = doc();
        let mut cur = Cursor { x: 5, y: 0 };
        cur.move_right(&d);
        assert_eq!(cur.x, 5);
    }

    #[test]
    fn right_advances_inside_row() {
        let d = doc();
        let mut cur = Cursor::new();
        cur.move_right(&d);
        assert_eq!(cur.x, 1);
    }

    #[test]
    fn right_is_noop_on_virtual_row() {
        let d = doc();
        let mut cur = Cursor { x: 0, y: 2 };
        cur.move_right(&d);
        assert_eq!(cur.x, 0);
    }

    // ── Vertical clamps ─────────────────────────────────────────

    #[test]
    fn up_stops_at_first_row() {
        let d = doc();
        let mut cur = Cursor::new();
        cur.move_up(&d);
        assert_eq!(cur.y, 0);
    }

    #[test]
    fn down_stops_past_last_row() {
        let d = doc();
        let mut cur = Cursor { x: 0, y: 2 };
        cur.move_down(&d);
        assert_eq!(cur.y, 2);
    }

    #[test]
    fn down_allows_one_past_last_row() {
        let d = doc();
        let mut cur = Cursor { x: 0, y: 1 };
        cur.move_down(&d);
        assert_eq!(cur.y, 2);
    }

    #[test]
    fn vertical_move_clamps_column_to_destination() {
        // "hello" (5) down to "hi" (2): x snaps to 2.
        let d = doc();
        let mut cur = Cursor { x: 5, y: 0 };
        cur.move_down(&d);
        assert_eq!(cur, Cursor { x: 2, y: 1 });
    }

    #[test]
    fn moving_onto_virtual_row_clamps_to_zero() {
        let d = doc();
        let mut cur = Cursor { x: 2, y: 1 };
        cur.move_down(&d);
        assert_eq!(cur, Cursor { x: 0, y: 2 });
    }

    #[test]
    fn up_from_short_to_long_row_keeps_column() {
        let d = doc();
        let mut cur = Cursor { x: 2, y: 1 };
        cur.move_up(&d);
        // No sticky column: x stays where it was (already in range).
        assert_eq!(cur, Cursor { x: 2, y: 0 });
    }

    // ── Home / End ──────────────────────────────────────────────

    #[test]
    fn home_and_end() {
        let d = doc();
        let mut cur = Cursor { x: 3, y: 0 };
        cur.home();
        assert_eq!(cur.x, 0);
        cur.end(&d);
        assert_eq!(cur.x, 5);
    }

    #[test]
    fn end_on_virtual_row_is_zero() {
        let d = doc();
        let mut cur = Cursor { x: 0, y: 2 };
        cur.end(&d);
        assert_eq!(cur.x, 0);
    }

    // ── Render column ───────────────────────────────────────────

    #[test]
    fn render_col_expands_tabs() {
        let d = Document::from_bytes(b"a\tb");
        let cur = Cursor { x: 2, y: 0 };
        assert_eq!(cur.render_col(&d), 8);
    }

    #[test]
    fn render_col_past_last_row_is_zero() {
        let d = doc();
        let cur = Cursor { x: 0, y: 2 };
        assert_eq!(cur.render_col(&d), 0);
    }

    // ── End-to-end scenario ─────────────────────────────────────

    #[test]
    fn down_end_right_scenario() {
        let d = Document::from_bytes(b"hello\nhi");
        let mut cur = Cursor::new();

        cur.move_down(&d);
        cur.end(&d);
        assert_eq!(cur, Cursor { x: 2, y: 1 });

        cur.move_right(&d);
        assert_eq!(cur, Cursor { x: 2, y: 1 });
    }
}
