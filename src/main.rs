// SPDX-License-Identifier: MIT
//
// vu — a terminal file viewer.
//
// This is the main binary that wires together the crates:
//
//   vu-term → raw mode, ANSI emission, key decoding, frame buffering
//   vu-doc  → rows with tab expansion, document load, cursor, viewport
//
// The Viewer struct is the session: it owns the document, the cursor,
// the viewport, and a transient status message. The main loop strictly
// alternates — render one frame, read one key:
//
//   stdin → KeyReader → handle_key → cursor mutation
//   render_frame → scroll pass → OutputBuffer → one write to stdout
//
// Layout:
//
//   ┌──────────────────────────────┐
//   │ text area                    │  ← rows - 2 (content, ~ past end)
//   ├──────────────────────────────┤
//   │ status bar (reverse video)   │  ← 1 row
//   ├──────────────────────────────┤
//   │ message bar                  │  ← 1 row (expires after 5 s)
//   └──────────────────────────────┘

use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use vu_doc::cursor::Cursor;
use vu_doc::document::Document;
use vu_doc::viewport::Viewport;

use vu_term::ansi;
use vu_term::input::Key;
use vu_term::output::OutputBuffer;
use vu_term::reader::KeyReader;
use vu_term::terminal::{self, RawMode, Size};

// ─── Constants ──────────────────────────────────────────────────────────────

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows reserved below the text area: status bar + message bar.
const RESERVED_ROWS: usize = 2;

/// A status message disappears after this long.
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// The control form of an ASCII letter (Ctrl strips bits 5 and 6).
const fn ctrl(c: u8) -> u8 {
    c & 0x1f
}

/// Ctrl-Q quits.
const QUIT_KEY: u8 = ctrl(b'q');

// ─── Session ────────────────────────────────────────────────────────────────

/// What the main loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Keep running.
    Continue,
    /// Clear the screen and exit cleanly.
    Quit,
}

/// A transient status message with its creation time.
struct StatusMessage {
    text: String,
    time: Instant,
}

/// The viewer session: one document, one cursor, one viewport.
///
/// The dispatcher ([`handle_key`](Self::handle_key)) mutates the cursor
/// and message; the renderer ([`render_frame`](Self::render_frame))
/// reads everything and mutates only the viewport offsets in its
/// pre-draw scroll pass. Nothing here touches the terminal directly —
/// frames go into an [`OutputBuffer`] the caller flushes.
struct Viewer {
    doc: Document,
    cursor: Cursor,
    view: Viewport,
    message: Option<StatusMessage>,
}

impl Viewer {
    /// Create a session over a document for a terminal of `size`.
    fn new(doc: Document, size: Size) -> Self {
        let rows = usize::from(size.rows).saturating_sub(RESERVED_ROWS);
        Self {
            doc,
            cursor: Cursor::new(),
            view: Viewport::new(rows, usize::from(size.cols)),
            message: None,
        }
    }

    /// Replace the status message; the expiry clock starts now.
    fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            time: Instant::now(),
        });
    }

    // ── Dispatcher ──────────────────────────────────────────────

    /// Interpret one decoded key against the current state.
    ///
    /// Unmapped keys — including unresolved escapes — are no-ops: this
    /// program views files, it does not edit them.
    fn handle_key(&mut self, key: Key) -> Step {
        match key {
            Key::Byte(QUIT_KEY) => return Step::Quit,
            Key::Up => self.cursor.move_up(&self.doc),
            Key::Down => self.cursor.move_down(&self.doc),
            Key::Left => self.cursor.move_left(),
            Key::Right => self.cursor.move_right(&self.doc),
            Key::Home => self.cursor.home(),
            Key::End => self.cursor.end(&self.doc),
            Key::PageUp | Key::PageDown => {
                // A page is repeated single steps, so every step reuses
                // the same edge clamps. max(1) keeps a one-row viewport
                // paging instead of standing still.
                let steps = self.view.rows.saturating_sub(1).max(1);
                for _ in 0..steps {
                    if key == Key::PageUp {
                        self.cursor.move_up(&self.doc);
                    } else {
                        self.cursor.move_down(&self.doc);
                    }
                }
            }
            Key::Delete | Key::Escape | Key::Byte(_) => {}
        }
        Step::Continue
    }

    // ── Renderer ────────────────────────────────────────────────

    /// Compose one complete frame into `out`.
    ///
    /// The whole frame — cursor hide, every row, both bars, cursor
    /// placement, cursor show — lands in the buffer; the caller flushes
    /// it with a single write so the terminal never shows a torn frame.
    fn render_frame(&mut self, out: &mut OutputBuffer) -> io::Result<()> {
        let rx = self.cursor.render_col(&self.doc);
        self.view.scroll_to(self.cursor.y, rx);

        ansi::cursor_hide(out)?;
        ansi::cursor_home(out)?;

        self.draw_rows(out)?;
        self.draw_status_bar(out)?;
        self.draw_message_bar(out)?;

        // In range after the scroll pass: both deltas fit the window.
        #[allow(clippy::cast_possible_truncation)]
        {
            let sx = (rx - self.view.col_off) as u16;
            let sy = (self.cursor.y - self.view.row_off) as u16;
            ansi::cursor_to(out, sx, sy)?;
        }
        ansi::cursor_show(out)
    }

    /// Draw the text area: visible row slices, the welcome banner on an
    /// empty document, `~` markers past the end.
    fn draw_rows(&self, out: &mut OutputBuffer) -> io::Result<()> {
        for screen_row in 0..self.view.rows {
            let file_row = self.view.row_off + screen_row;

            if let Some(row) = self.doc.row(file_row) {
                let render = row.render();
                let start = self.view.col_off.min(render.len());
                let end = (self.view.col_off + self.view.cols).min(render.len());
                out.write_all(&render[start..end])?;
            } else if self.doc.is_empty() && screen_row == self.view.rows / 2 {
                self.draw_welcome(out)?;
            } else {
                out.write_all(b"~")?;
            }

            ansi::erase_line(out)?;
            out.write_all(b"\r\n")?;
        }
        Ok(())
    }

    /// Center the welcome banner, keeping the `~` gutter in front.
    fn draw_welcome(&self, out: &mut OutputBuffer) -> io::Result<()> {
        let banner = format!("vu {VERSION} -- a file viewer");
        let banner = truncate_to_width(&banner, self.view.cols);

        let mut padding = self.view.cols.saturating_sub(banner.width()) / 2;
        if padding > 0 {
            out.write_all(b"~")?;
            padding -= 1;
        }
        for _ in 0..padding {
            out.write_all(b" ")?;
        }
        out.write_all(banner.as_bytes())
    }

    /// Draw the reverse-video status bar: name and line count on the
    /// left, `line:col` (1-based) on the right, padded to full width.
    fn draw_status_bar(&self, out: &mut OutputBuffer) -> io::Result<()> {
        let cols = self.view.cols;

        let name = self.doc.name().unwrap_or("[No Name]");
        let left_full = format!("{} - {} lines", truncate_to_width(name, 20), self.doc.len());
        let left = truncate_to_width(&left_full, cols);
        let right = format!("{}:{}", self.cursor.y + 1, self.cursor.x + 1);

        let mut bar = String::with_capacity(cols + 8);
        bar.push_str(left);
        let mut width = left.width();
        if width + right.width() <= cols {
            while width + right.width() < cols {
                bar.push(' ');
                width += 1;
            }
            bar.push_str(&right);
        } else {
            // No room for the position indicator; pad the left side out.
            while width < cols {
                bar.push(' ');
                width += 1;
            }
        }

        ansi::reverse_video(out)?;
        out.write_all(bar.as_bytes())?;
        ansi::normal_video(out)?;
        out.write_all(b"\r\n")
    }

    /// Draw the message bar: the status message while it is younger
    /// than [`MESSAGE_TIMEOUT`], a blank line otherwise.
    fn draw_message_bar(&self, out: &mut OutputBuffer) -> io::Result<()> {
        ansi::erase_line(out)?;
        if let Some(msg) = &self.message {
            if msg.time.elapsed() < MESSAGE_TIMEOUT {
                let text = truncate_to_width(&msg.text, self.view.cols);
                out.write_all(text.as_bytes())?;
            }
        }
        Ok(())
    }
}

/// Longest prefix of `s` that fits in `max` display columns.
fn truncate_to_width(s: &str, max: usize) -> &str {
    let mut width = 0;
    for (i, ch) in s.char_indices() {
        let cw = ch.width().unwrap_or(0);
        if width + cw > max {
            return &s[..i];
        }
        width += cw;
    }
    s
}

// ─── Entry ──────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Raw mode was already restored by the guard unwinding out
            // of run(); leave the screen sane before the diagnostic.
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(b"\x1b[2J\x1b[H");
            let _ = stdout.flush();
            eprintln!("vu: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Load the document, enter raw mode, and run the render/read loop
/// until Ctrl-Q.
fn run() -> anyhow::Result<()> {
    let doc = match env::args().nth(1) {
        Some(path) => Document::load(Path::new(&path))?,
        None => Document::empty(),
    };

    if !terminal::is_tty() {
        anyhow::bail!("stdin is not a terminal");
    }

    // Raw mode before the size query: the fallback cursor probe needs
    // the VTIME read policy to collect its report.
    let _raw = RawMode::enter()?;
    let size = terminal::window_size()?;

    let mut viewer = Viewer::new(doc, size);
    viewer.set_message("HELP: Ctrl-Q = quit");

    let mut reader = KeyReader::new();
    let mut out = OutputBuffer::new();

    loop {
        viewer.render_frame(&mut out)?;
        out.flush_stdout()?;

        match viewer.handle_key(reader.read_key()?) {
            Step::Continue => {}
            Step::Quit => break,
        }
    }

    // Hand the screen back clean.
    let mut stdout = io::stdout().lock();
    ansi::clear_screen(&mut stdout)?;
    ansi::cursor_home(&mut stdout)?;
    stdout.flush()?;
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────
