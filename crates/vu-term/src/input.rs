// SPDX-License-Identifier: MIT
//
// Key decoding — raw bytes in, logical keys out.
//
// The decoder is an explicit state machine driven one byte at a time.
// Escape sequences arrive as separate bytes under the raw-mode read
// policy, and a lone ESC is indistinguishable from the start of a
// sequence until either more bytes arrive or the read times out. The
// caller resolves that ambiguity: feed bytes with [`Decoder::feed`],
// and call [`Decoder::timeout`] when a read comes back empty to turn
// a pending partial sequence into a standalone Escape.
//
// The decoder does not classify bytes: control and printable characters
// both come out as [`Key::Byte`] verbatim. Deciding what a byte *means*
// is the dispatcher's job.
//
// Recognized sequences (CSI and SS3 style):
//
//   ESC [ A/B/C/D        → Up / Down / Right / Left
//   ESC [ H, 1~, 7~      → Home
//   ESC [ F, 4~, 8~      → End
//   ESC [ 3~             → Delete
//   ESC [ 5~ / 6~        → PageUp / PageDown
//   ESC O H / ESC O F    → Home / End
//
// Anything else after ESC resolves as an unrecognized escape — reported
// as [`Key::Escape`], which the dispatcher treats as a no-op.

// ─── Key ────────────────────────────────────────────────────────────────────

/// A decoded logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A literal byte, control or printable — the decoder does not
    /// distinguish.
    Byte(u8),
    // ── Navigation ──────────────────────────────────────────────
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    // ── Editing keys ────────────────────────────────────────────
    Delete,
    /// A lone Escape press, or an escape sequence the decoder does
    /// not recognize.
    Escape,
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Decoder state between bytes.
///
/// Each state names how far into an escape sequence we are. Every
/// transition is explicit about which bytes lead to which key — there
/// are no nested reads and no hidden lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Not inside an escape sequence.
    Start,
    /// Saw ESC; waiting for `[`, `O`, or anything else (unresolved).
    SawEscape,
    /// Saw ESC `[`; waiting for a final letter or a parameter digit.
    SawBracket,
    /// Saw ESC `[` and one digit; waiting for the `~` terminator.
    SawBracketDigit(u8),
    /// Saw ESC `O`; waiting for the SS3 final byte.
    SawO,
}

/// Escape-sequence state machine.
///
/// Feed one byte at a time with [`feed`](Self::feed); each call returns
/// `Some(key)` when a key completes or `None` while a sequence is still
/// pending. A read timeout while pending must be reported via
/// [`timeout`](Self::timeout), which yields the standalone Escape.
#[derive(Debug)]
pub struct Decoder {
    state: State,
}

impl Decoder {
    /// Create a decoder in the start state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Start,
        }
    }

    /// Whether the decoder is mid-sequence (a timeout now would resolve
    /// to a standalone Escape).
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state != State::Start
    }

    /// Advance the state machine by one byte.
    ///
    /// Returns the completed key, or `None` if the byte extended a
    /// still-incomplete sequence.
    pub fn feed(&mut self, byte: u8) -> Option<Key> {
        match self.state {
            State::Start => {
                if byte == 0x1B {
                    self.state = State::SawEscape;
                    None
                } else {
                    Some(Key::Byte(byte))
                }
            }
            State::SawEscape => match byte {
                b'[' => {
                    self.state = State::SawBracket;
                    None
                }
                b'O' => {
                    self.state = State::SawO;
                    None
                }
                _ => self.resolve(Key::Escape),
            },
            State::SawBracket => match byte {
                b'A' => self.resolve(Key::Up),
                b'B' => self.resolve(Key::Down),
                b'C' => self.resolve(Key::Right),
                b'D' => self.resolve(Key::Left),
                b'H' => self.resolve(Key::Home),
                b'F' => self.resolve(Key::End),
                d @ b'0'..=b'9' => {
                    self.state = State::SawBracketDigit(d);
                    None
                }
                _ => self.resolve(Key::Escape),
            },
            State::SawBracketDigit(digit) => {
                if byte == b'~' {
                    let key = match digit {
                        b'1' | b'7' => Key::Home,
                        b'4' | b'8' => Key::End,
                        b'3' => Key::Delete,
                        b'5' => Key::PageUp,
                        b'6' => Key::PageDown,
                        _ => Key::Escape,
                    };
                    self.resolve(key)
                } else {
                    self.resolve(Key::Escape)
                }
            }
            State::SawO => match byte {
                b'H' => self.resolve(Key::Home),
                b'F' => self.resolve(Key::End),
                _ => self.resolve(Key::Escape),
            },
        }
    }

    /// Resolve a pending sequence after a read timeout.
    ///
    /// A lone ESC (or a sequence truncated mid-way) becomes a standalone
    /// [`Key::Escape`]. Returns `None` when nothing was pending.
    pub fn timeout(&mut self) -> Option<Key> {
        if self.is_pending() {
            self.state = State::Start;
            Some(Key::Escape)
        } else {
            None
        }
    }

    /// Complete a sequence: reset to start and emit the key.
    fn resolve(&mut self, key: Key) -> Option<Key> {
        self.state = State::Start;
        Some(key)
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Feed a byte sequence and collect every completed key.
    fn decode(bytes: &[u8]) -> Vec<Key> {
        let mut decoder = Decoder::new();
        bytes.iter().filter_map(|&b| decoder.feed(b)).collect()
    }

    // ── Literal bytes ───────────────────────────────────────────

    #[test]
    fn printable_byte_passes_through() {
        assert_eq!(decode(b"q"), vec![Key::Byte(b'q')]);
    }

    #[test]
    fn control_byte_passes_through() {
        // Ctrl-Q is 0x11; the decoder does not classify it.
        assert_eq!(decode(&[0x11]), vec![Key::Byte(0x11)]);
    }

    #[test]
    fn high_bytes_pass_through() {
        assert_eq!(decode(&[0xFF]), vec![Key::Byte(0xFF)]);
    }

    #[test]
    fn byte_stream_yields_one_key_per_byte() {
        assert_eq!(
            decode(b"ab"),
            vec![Key::Byte(b'a'), Key::Byte(b'b')]
        );
    }

    // ── Arrow keys ──────────────────────────────────────────────

    #[test]
    fn csi_arrows() {
        assert_eq!(decode(b"\x1b[A"), vec![Key::Up]);
        assert_eq!(decode(b"\x1b[B"), vec![Key::Down]);
        assert_eq!(decode(b"\x1b[C"), vec![Key::Right]);
        assert_eq!(decode(b"\x1b[D"), vec![Key::Left]);
    }

    #[test]
    fn arrows_yield_nothing_until_final_byte() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x1B), None);
        assert_eq!(decoder.feed(b'['), None);
        assert_eq!(decoder.feed(b'A'), Some(Key::Up));
        assert!(!decoder.is_pending());
    }

    // ── Home / End ──────────────────────────────────────────────

    #[test]
    fn home_in_all_encodings() {
        assert_eq!(decode(b"\x1b[H"), vec![Key::Home]);
        assert_eq!(decode(b"\x1b[1~"), vec![Key::Home]);
        assert_eq!(decode(b"\x1b[7~"), vec![Key::Home]);
        assert_eq!(decode(b"\x1bOH"), vec![Key::Home]);
    }

    #[test]
    fn end_in_all_encodings() {
        assert_eq!(decode(b"\x1b[F"), vec![Key::End]);
        assert_eq!(decode(b"\x1b[4~"), vec![Key::End]);
        assert_eq!(decode(b"\x1b[8~"), vec![Key::End]);
        assert_eq!(decode(b"\x1bOF"), vec![Key::End]);
    }

    // ── Editing / paging keys ───────────────────────────────────

    #[test]
    fn delete_key() {
        assert_eq!(decode(b"\x1b[3~"), vec![Key::Delete]);
    }

    #[test]
    fn page_keys() {
        assert_eq!(decode(b"\x1b[5~"), vec![Key::PageUp]);
        assert_eq!(decode(b"\x1b[6~"), vec![Key::PageDown]);
    }

    // ── Unrecognized sequences ──────────────────────────────────

    #[test]
    fn unknown_byte_after_escape_is_unresolved() {
        assert_eq!(decode(b"\x1bx"), vec![Key::Escape]);
    }

    #[test]
    fn unknown_csi_final_is_unresolved() {
        assert_eq!(decode(b"\x1b[Z"), vec![Key::Escape]);
    }

    #[test]
    fn unknown_tilde_parameter_is_unresolved() {
        // ESC [ 2 ~ is Insert on a VT220; this viewer does not map it.
        assert_eq!(decode(b"\x1b[2~"), vec![Key::Escape]);
    }

    #[test]
    fn digit_followed_by_non_tilde_is_unresolved() {
        assert_eq!(decode(b"\x1b[5x"), vec![Key::Escape]);
    }

    #[test]
    fn unknown_ss3_final_is_unresolved() {
        assert_eq!(decode(b"\x1bOP"), vec![Key::Escape]);
    }

    #[test]
    fn decoder_recovers_after_unresolved_sequence() {
        // The byte after a bad sequence decodes normally.
        assert_eq!(
            decode(b"\x1b[Zq"),
            vec![Key::Escape, Key::Byte(b'q')]
        );
    }

    // ── Timeout resolution ──────────────────────────────────────

    #[test]
    fn lone_escape_resolves_on_timeout() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.feed(0x1B), None);
        assert!(decoder.is_pending());
        assert_eq!(decoder.timeout(), Some(Key::Escape));
        assert!(!decoder.is_pending());
    }

    #[test]
    fn truncated_csi_resolves_on_timeout() {
        let mut decoder = Decoder::new();
        decoder.feed(0x1B);
        decoder.feed(b'[');
        assert_eq!(decoder.timeout(), Some(Key::Escape));
    }

    #[test]
    fn truncated_tilde_sequence_resolves_on_timeout() {
        let mut decoder = Decoder::new();
        decoder.feed(0x1B);
        decoder.feed(b'[');
        decoder.feed(b'5');
        assert_eq!(decoder.timeout(), Some(Key::Escape));
    }

    #[test]
    fn timeout_with_nothing_pending_is_none() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.timeout(), None);
    }

    #[test]
    fn keys_decode_normally_after_timeout() {
        let mut decoder = Decoder::new();
        decoder.feed(0x1B);
        decoder.timeout();
        assert_eq!(decoder.feed(b'h'), Some(Key::Byte(b'h')));
    }

    // ── Back-to-back sequences ──────────────────────────────────

    #[test]
    fn consecutive_sequences_decode_independently() {
        assert_eq!(
            decode(b"\x1b[A\x1b[B\x1b[5~"),
            vec![Key::Up, Key::Down, Key::PageUp]
        );
    }
}
