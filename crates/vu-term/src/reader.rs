// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Key reading — the synchronous read loop over raw stdin.
//
// With VMIN=0/VTIME=1 in effect (see `terminal`), a read() on stdin
// returns after at most one decisecond, with either one byte or none.
// That timeout is the whole concurrency story: the main loop sits in
// read_key(), the empty reads bound its latency, and no background
// thread is needed.
//
// The timeout also resolves the escape ambiguity. A lone ESC press and
// the first byte of an arrow-key sequence look identical; if the reads
// after an ESC come back empty, the decoder turns the pending state
// into a standalone Escape.

use std::io;

use crate::error::TermError;
use crate::input::{Decoder, Key};

/// Read one byte from stdin under the VTIME policy.
///
/// Returns `Ok(None)` on the benign "no data yet" timeout (zero-byte
/// read, `EAGAIN`, or `EINTR`); any other failure is a broken terminal
/// channel and comes back as [`TermError::Read`].
#[cfg(unix)]
pub(crate) fn read_byte() -> Result<Option<u8>, TermError> {
    let mut byte: u8 = 0;
    let n = unsafe {
        libc::read(
            libc::STDIN_FILENO,
            (&raw mut byte).cast::<libc::c_void>(),
            1,
        )
    };

    match n {
        1 => Ok(Some(byte)),
        0 => Ok(None), // VTIME expired with no input.
        _ => {
            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                _ => Err(TermError::Read(err)),
            }
        }
    }
}

/// Non-unix fallback: blocking single-byte read with no timeout.
///
/// Escape-timeout resolution degrades gracefully — a lone ESC resolves
/// on the next keypress instead of after a decisecond.
#[cfg(not(unix))]
pub(crate) fn read_byte() -> Result<Option<u8>, TermError> {
    use std::io::Read;

    let mut byte = [0u8; 1];
    match io::stdin().lock().read(&mut byte) {
        Ok(1) => Ok(Some(byte[0])),
        Ok(_) => Ok(None),
        Err(err) => match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
            _ => Err(TermError::Read(err)),
        },
    }
}

/// Blocking key reader over raw stdin.
///
/// Owns the escape-sequence [`Decoder`] and drives it with single-byte
/// reads. [`read_key`](Self::read_key) does not return until a whole
/// logical key is available — empty reads retry transparently unless a
/// partial escape sequence is pending, in which case the timeout
/// resolves it.
pub struct KeyReader {
    decoder: Decoder,
}

impl KeyReader {
    /// Create a key reader with a fresh decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            decoder: Decoder::new(),
        }
    }

    /// Block until one logical key has been read and decoded.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::Read`] if the terminal channel fails with
    /// anything other than the benign timeout. Fatal to the caller.
    pub fn read_key(&mut self) -> Result<Key, TermError> {
        loop {
            match read_byte()? {
                Some(byte) => {
                    if let Some(key) = self.decoder.feed(byte) {
                        return Ok(key);
                    }
                }
                None => {
                    // Timeout: a pending partial sequence becomes a lone
                    // Escape; otherwise just wait for the next byte.
                    if let Some(key) = self.decoder.timeout() {
                        return Ok(key);
                    }
                }
            }
        }
    }
}

impl Default for KeyReader {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // read_key() needs a live terminal; the decode logic it drives is
    // covered exhaustively in `input`. Here we pin the construction
    // surface and the decoder handoff.

    #[test]
    fn new_reader_has_no_pending_sequence() {
        let reader = KeyReader::new();
        assert!(!reader.decoder.is_pending());
    }

    #[test]
    fn default_matches_new() {
        let reader = KeyReader::default();
        assert!(!reader.decoder.is_pending());
    }

    #[test]
    fn decoder_handoff_completes_keys() {
        // Simulate the read loop body without a terminal: feed the
        // decoder the same bytes read_key() would.
        let mut reader = KeyReader::new();
        assert_eq!(reader.decoder.feed(0x1B), None);
        assert_eq!(reader.decoder.feed(b'['), None);
        assert_eq!(reader.decoder.feed(b'A'), Some(Key::Up));
    }

    #[test]
    fn decoder_handoff_times_out_to_escape() {
        let mut reader = KeyReader::new();
        reader.decoder.feed(0x1B);
        assert_eq!(reader.decoder.timeout(), Some(Key::Escape));
    }
}
