// SPDX-License-Identifier: MIT
//
// Viewport — the visible window over the document, in render-space.
//
// `row_off`/`col_off` name the document position of the top-left
// visible cell; `rows`/`cols` are the text area dimensions (terminal
// size minus the rows reserved for the status and message bars).
//
// Scrolling is minimal-adjustment: when the cursor leaves the window,
// the offsets snap to the nearest edge that brings it back — never
// further. A cursor sitting exactly on a boundary never causes a
// scroll, so there is no thrash when holding an arrow key at the edge.

/// The visible window over a document, in render-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible document row.
    pub row_off: usize,
    /// First visible render column.
    pub col_off: usize,
    /// Visible text rows.
    pub rows: usize,
    /// Visible text columns.
    pub cols: usize,
}

impl Viewport {
    /// Create a viewport at the origin with the given dimensions.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self {
            row_off: 0,
            col_off: 0,
            rows,
            cols,
        }
    }

    /// Whether `(y, rx)` is inside the visible window.
    #[must_use]
    pub const fn contains(&self, y: usize, rx: usize) -> bool {
        y >= self.row_off
            && y < self.row_off + self.rows
            && rx >= self.col_off
            && rx < self.col_off + self.cols
    }

    /// Adjust the offsets so `(y, rx)` is visible. Minimal adjustment:
    /// each offset moves only when the cursor is outside its range, and
    /// only to the nearest edge.
    ///
    /// A zero-size axis (a terminal too small to show any text) only
    /// shrinks its offset toward the cursor, so the offset never ends
    /// up past it.
    pub const fn scroll_to(&mut self, y: usize, rx: usize) {
        if y < self.row_off {
            self.row_off = y;
        }
        if self.rows > 0 && y >= self.row_off + self.rows {
            self.row_off = y + 1 - self.rows;
        }
        if rx < self.col_off {
            self.col_off = rx;
        }
        if self.cols > 0 && rx >= self.col_off + self.cols {
            self.col_off = rx + 1 - self.cols;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
