// SPDX-License-Identifier: MIT
//
// vu-term — Terminal protocol layer for vu.
//
// Raw mode via termios, ANSI escape emission, byte-level key decoding,
// and single-write frame buffering. The viewer talks VT100 directly:
// no crossterm, no curses — every byte sent to the terminal is
// accounted for, and every byte read from it goes through one explicit
// state machine.
//
// The crate splits along the terminal's two directions:
//
//   outbound — `ansi` (sequence encoding) + `output` (frame buffering)
//   inbound  — `input` (key decoding) + `reader` (the VTIME read loop)
//   both     — `terminal` (raw mode guard, size discovery, panic safety)

pub mod ansi;
pub mod error;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::TermError;
