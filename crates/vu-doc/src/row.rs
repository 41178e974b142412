// SPDX-License-Identifier: MIT
//
// Row — one logical line, in raw and render form.
//
// The raw bytes are exactly what the file contained (minus the line
// terminator). The render bytes are what the terminal should show:
// identical except that each tab expands to spaces up to the next
// tab stop. Both forms live in the same struct, but callers never
// synchronize them by hand — `render` is derived by one pure function
// invoked from the constructor and the single mutation path, so it
// cannot go stale.
//
// Two coordinate systems meet here: raw columns (byte indices into
// `raw`) and render columns (what the terminal displays). The mapping
// is `raw_to_render_col`, which must agree exactly with `expand_tabs` —
// cursor placement and horizontal scrolling both ride on it.

/// Fixed tab stop: a tab advances the render column to the next
/// multiple of this interval.
pub const TAB_STOP: usize = 8;

/// Expand tabs in a raw line to spaces aligned on [`TAB_STOP`].
///
/// Each tab becomes one to eight spaces (always at least one); every
/// other byte is copied verbatim. Pure and idempotent on the same
/// input.
#[must_use]
pub fn expand_tabs(raw: &[u8]) -> Vec<u8> {
    let mut render = Vec::with_capacity(raw.len());
    for &byte in raw {
        if byte == b'\t' {
            render.push(b' ');
            while render.len() % TAB_STOP != 0 {
                render.push(b' ');
            }
        } else {
            render.push(byte);
        }
    }
    render
}

/// Map a raw column to its render column.
///
/// Walks `raw[0..cx)`, advancing one render column per byte except for
/// tabs, which advance to the next multiple of [`TAB_STOP`] (minimum
/// advance of one). Agrees exactly with [`expand_tabs`]: the result is
/// the render index of the byte that `raw[cx]` maps to.
#[must_use]
pub fn raw_to_render_col(raw: &[u8], cx: usize) -> usize {
    let mut rx = 0;
    for &byte in raw.iter().take(cx) {
        if byte == b'\t' {
            rx += TAB_STOP - (rx % TAB_STOP);
        } else {
            rx += 1;
        }
    }
    rx
}

/// One logical line of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Bytes as read from the file, without the line terminator.
    raw: Vec<u8>,
    /// Derived display form: `raw` with tabs expanded.
    render: Vec<u8>,
}

impl Row {
    /// Create a row from raw bytes, deriving the render form.
    #[must_use]
    pub fn new(raw: Vec<u8>) -> Self {
        let render = expand_tabs(&raw);
        Self { raw, render }
    }

    /// The raw bytes.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The render bytes (tabs expanded).
    #[inline]
    #[must_use]
    pub fn render(&self) -> &[u8] {
        &self.render
    }

    /// Length of the raw line in bytes. The cursor may sit at any
    /// column in `0..=len()` — `len()` is the position past the last
    /// byte.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the raw line is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Render column for a raw column on this row.
    #[inline]
    #[must_use]
    pub fn render_col(&self, cx: usize) -> usize {
        raw_to_render_col(&self.raw, cx)
    }

    /// Replace the raw bytes, re-deriving the render form.
    ///
    /// The only mutation path — render can never be observed stale.
    pub fn set_raw(&mut self, raw: Vec<u8>) {
        self.raw = raw;
        self.render = expand_tabs(&self.raw);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── expand_tabs ─────────────────────────────────────────────

    #[test]
    fn no_tabs_copies_verbatim() {
        assert_eq!(expand_tabs(b"hello"), b"hello");
    }

    #[test]
    fn empty_line_renders_empty() {
        assert_eq!(expand_tabs(b""), b"");
    }

    #[test]
    fn leading_tab_expands_to_full_stop() {
        assert_eq!(expand_tabs(b"\tx"), b"        x");
    }

    #[test]
    fn mid_line_tab_pads_to_next_stop() {
        // "a" occupies column 0, so the tab pads columns 1..8.
        assert_eq!(expand_tabs(b"a\tb"), b"a       b");
    }

    #[test]
    fn tab_at_stop_boundary_advances_a_full_stop() {
        // 8 bytes of text land exactly on the stop; the tab still
        // advances (minimum one space, here a full stop).
        assert_eq!(expand_tabs(b"12345678\tx"), b"12345678        x");
    }

    #[test]
    fn tab_one_before_boundary_expands_to_one_space() {
        assert_eq!(expand_tabs(b"1234567\tx"), b"1234567 x");
    }

    #[test]
    fn consecutive_tabs_each_reach_a_stop() {
        assert_eq!(expand_tabs(b"\t\t").len(), 16);
    }

    #[test]
    fn render_length_is_raw_plus_padding() {
        let raw = b"a\tbb\tc";
        let render = expand_tabs(raw);
        // Tab after "a": 7 spaces (1 byte → 7). Tab after "bb" at
        // column 10: 6 spaces (1 byte → 6). Net padding: +11.
        assert_eq!(render.len(), raw.len() + 11);
    }

    #[test]
    fn expansion_is_idempotent() {
        let raw = b"a\tb\tc";
        let once = expand_tabs(raw);
        let twice = expand_tabs(raw);
        assert_eq!(once, twice);
    }

    #[test]
    fn non_ascii_bytes_copy_verbatim() {
        let raw = [0xC3, 0xA9, b'\t', 0xFF];
        let render = expand_tabs(&raw);
        assert_eq!(&render[..2], &raw[..2]);
        assert_eq!(*render.last().unwrap(), 0xFF);
    }

    // ── raw_to_render_col ───────────────────────────────────────

    #[test]
    fn render_col_without_tabs_is_identity() {
        assert_eq!(raw_to_render_col(b"hello", 3), 3);
    }

    #[test]
    fn render_col_zero_is_zero() {
        assert_eq!(raw_to_render_col(b"\tabc", 0), 0);
    }

    #[test]
    fn render_col_past_tab_lands_on_stop() {
        // Column just past the tab in "a\tb": render column 8.
        assert_eq!(raw_to_render_col(b"a\tb", 2), 8);
    }

    #[test]
    fn render_col_past_any_tab_is_a_stop_multiple() {
        let raw = b"ab\tc\t\tdef\tx";
        for (i, &byte) in raw.iter().enumerate() {
            if byte == b'\t' {
                assert_eq!(
                    raw_to_render_col(raw, i + 1) % TAB_STOP,
                    0,
                    "tab at raw index {i} must land on a tab stop"
                );
            }
        }
    }

    #[test]
    fn render_col_agrees_with_expansion() {
        let raw = b"a\tbb\tccc\t";
        let render = expand_tabs(raw);
        // Walking the whole line must land exactly at the render end.
        assert_eq!(raw_to_render_col(raw, raw.len()), render.len());
    }

    // ── Row ─────────────────────────────────────────────────────

    #[test]
    fn row_derives_render_on_construction() {
        let row = Row::new(b"a\tb".to_vec());
        assert_eq!(row.raw(), b"a\tb");
        assert_eq!(row.render(), b"a       b");
        assert_eq!(row.len(), 3);
    }

    #[test]
    fn row_len_counts_raw_bytes() {
        let row = Row::new(b"\t".to_vec());
        assert_eq!(row.len(), 1);
        assert_eq!(row.render().len(), 8);
    }

    #[test]
    fn empty_row() {
        let row = Row::new(Vec::new());
        assert!(row.is_empty());
        assert_eq!(row.render(), b"");
    }

    #[test]
    fn set_raw_rederives_render() {
        let mut row = Row::new(b"plain".to_vec());
        row.set_raw(b"\tnow tabbed".to_vec());
        assert_eq!(&row.render()[..8], b"        ");
    }

    #[test]
    fn row_render_col_delegates() {
        let row = Row::new(b"a\tb".to_vec());
        assert_eq!(row.render_col(2), 8);
        assert_eq!(row.render_col(3), 9);
    }
}
