// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode, size discovery, and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), isatty, and raw fd writes. These are
// the standard POSIX interfaces for terminal control — there is no safe
// alternative. Each unsafe block is minimal and documented.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. Entering raw mode returns a
// guard; dropping the guard restores the saved attributes on every exit
// path, including `?`-propagated errors. A panic hook covers the one path
// Drop cannot: it restores termios from a global backup and writes a
// pre-built cleanup sequence directly to fd 1 before the panic message
// prints, so the error lands on a working terminal.
//
// The read policy is VMIN=0, VTIME=1: a read() returns after at most one
// decisecond even with zero bytes available. That single timeout bounds
// both the escape-sequence ambiguity window and how long the main loop
// can sit blocked.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::error::TermError;
use crate::reader;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails; callers
/// fall back to [`window_size`]'s cursor probe.
#[cfg(unix)]
#[must_use]
pub fn ioctl_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn ioctl_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    // No isatty here; assume an interactive session.
    true
}

/// Determine the terminal size, falling back to the cursor probe.
///
/// Tries `ioctl(TIOCGWINSZ)` first. If that fails (some terminals and
/// remote sessions don't support it), moves the cursor to the far
/// bottom-right corner and asks the terminal where it landed via a
/// cursor position report.
///
/// # Errors
///
/// Returns [`TermError::WindowSize`] when both strategies fail, and
/// [`TermError::Write`]/[`TermError::Read`] if the probe itself cannot
/// talk to the terminal. All are fatal to the caller.
pub fn window_size() -> Result<Size, TermError> {
    if let Some(size) = ioctl_size() {
        return Ok(size);
    }
    probe_size()
}

/// Longest cursor position report the probe will collect. A real reply
/// is at most `ESC [ {rows} ; {cols} R` with 5-digit fields; anything
/// longer is garbage and fails the parse.
const PROBE_REPLY_MAX: usize = 32;

/// Window-size fallback: park the cursor in the far corner, then parse
/// the cursor position report.
///
/// `ESC[999C ESC[999B` clamps at the screen edge by definition, so the
/// reported position *is* the screen size.
fn probe_size() -> Result<Size, TermError> {
    {
        let mut stdout = io::stdout().lock();
        ansi::cursor_right(&mut stdout, 999).map_err(TermError::Write)?;
        ansi::cursor_down(&mut stdout, 999).map_err(TermError::Write)?;
        ansi::request_cursor_position(&mut stdout).map_err(TermError::Write)?;
        stdout.flush().map_err(TermError::Write)?;
    }

    // Reply: ESC [ {rows} ; {cols} R. Collect up to the final 'R'; a
    // read timeout ends the reply early (parse decides if it's usable).
    let mut reply = Vec::with_capacity(PROBE_REPLY_MAX);
    while reply.len() < PROBE_REPLY_MAX {
        match reader::read_byte()? {
            Some(b'R') | None => break,
            Some(byte) => reply.push(byte),
        }
    }

    parse_cursor_report(&reply)
        .map(|(rows, cols)| Size { cols, rows })
        .ok_or_else(|| {
            TermError::WindowSize(io::Error::new(
                io::ErrorKind::InvalidData,
                "malformed cursor position report",
            ))
        })
}

/// Parse a cursor position report: `ESC [ {rows} ; {cols}` with an
/// optional trailing `R`.
///
/// Returns `(rows, cols)`, both of which must be non-zero.
#[must_use]
pub fn parse_cursor_report(reply: &[u8]) -> Option<(u16, u16)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let body = body.strip_suffix(b"R").unwrap_or(body);

    let sep = body.iter().position(|&b| b == b';')?;
    let rows = parse_u16(&body[..sep])?;
    let cols = parse_u16(&body[sep + 1..])?;

    (rows > 0 && cols > 0).then_some((rows, cols))
}

/// Parse an ASCII decimal number. Rejects empty input and non-digits.
fn parse_u16(digits: &[u8]) -> Option<u16> {
    if digits.is_empty() {
        return None;
    }
    let mut value: u16 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value
            .checked_mul(10)?
            .checked_add(u16::from(b - b'0'))?;
    }
    Some(value)
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`RawMode`] guard owns its own copy, but the panic hook can't
/// access it. This global backup — behind a [`Mutex`], not `static mut` —
/// lets the hook restore raw mode without the guard.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
            }
        }
    }
}

/// Screen cleanup sequence for emergency use: clear screen, cursor home,
/// show cursor. Leaves the terminal visually sane even when the panic
/// message is about to print over it.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message. The hook
/// writes [`EMERGENCY_RESTORE`] directly to fd 1 (bypassing Rust's stdout
/// lock to avoid deadlock if the panic happened mid-frame), restores
/// termios, then delegates to the original panic handler.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the cleanup sequence directly to stdout's file descriptor.
#[cfg(unix)]
fn emergency_restore() {
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }
}

#[cfg(not(unix))]
fn emergency_restore() {
    let _ = io::stdout().write_all(EMERGENCY_RESTORE);
    let _ = io::stdout().flush();
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode guard with RAII cleanup.
///
/// [`enter`](Self::enter) saves the current terminal attributes and applies
/// the raw configuration: no canonical mode, no echo, no signal keys, no
/// flow control, no output post-processing, and the VMIN=0/VTIME=1 read
/// policy. The saved attributes are restored exactly once when the guard
/// drops — on clean quit, on error propagation, and (via the panic hook)
/// on panic.
///
/// # Example
///
/// ```no_run
/// use vu_term::terminal::RawMode;
///
/// let _raw = RawMode::enter()?;
/// // ... render frames, read keys ...
/// // Terminal attributes are restored when `_raw` drops.
/// # Ok::<(), vu_term::TermError>(())
/// ```
pub struct RawMode {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original: libc::termios,
}

impl RawMode {
    /// Enter raw mode on stdin.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::GetAttr`] or [`TermError::SetAttr`] if the
    /// terminal attributes cannot be read or applied — for instance when
    /// stdin is not a terminal. Both are fatal to the caller.
    #[cfg(unix)]
    pub fn enter() -> Result<Self, TermError> {
        install_panic_hook();

        let fd = libc::STDIN_FILENO;
        let original = unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(TermError::GetAttr(io::Error::last_os_error()));
            }
            termios
        };

        // Save to the global backup before any fallible step, so the
        // panic hook can restore even if we panic below.
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = Some(original);
        }

        let mut termios = original;
        // No break/CR translation, no parity check, no bit stripping,
        // no XON/XOFF flow control.
        termios.c_iflag &=
            !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
        // No output post-processing ("\n" stays "\n").
        termios.c_oflag &= !libc::OPOST;
        termios.c_cflag |= libc::CS8;
        // No echo, no canonical line buffering, no Ctrl-V, no signal keys.
        termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
        // VMIN=0, VTIME=1: read() returns after at most one decisecond,
        // possibly with zero bytes.
        termios.c_cc[libc::VMIN] = 0;
        termios.c_cc[libc::VTIME] = 1;

        unsafe {
            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(TermError::SetAttr(io::Error::last_os_error()));
            }
        }

        Ok(Self { original })
    }

    #[cfg(not(unix))]
    pub fn enter() -> Result<Self, TermError> {
        install_panic_hook();
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for RawMode {
    fn drop(&mut self) {
        // Best-effort: nothing useful to do if restore fails here.
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw const self.original);
        }
        // Restored — the panic hook no longer needs the backup.
        if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
            *guard = None;
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
