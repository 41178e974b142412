// SPDX-License-Identifier: MIT
//
// Error type for the terminal layer.
//
// Every fatal condition in this crate names the terminal operation that
// failed and carries the underlying OS error as its source. There is no
// retry policy: a broken terminal channel cannot be recovered from inside
// the program, so callers report the diagnostic and exit.

use std::io;

use thiserror::Error;

/// A failed terminal operation.
#[derive(Debug, Error)]
pub enum TermError {
    /// `tcgetattr` failed — the original terminal attributes could not
    /// be read, so raw mode was never entered.
    #[error("tcgetattr failed")]
    GetAttr(#[source] io::Error),

    /// `tcsetattr` failed — raw mode could not be applied or restored.
    #[error("tcsetattr failed")]
    SetAttr(#[source] io::Error),

    /// Neither `ioctl(TIOCGWINSZ)` nor the cursor-position probe
    /// produced a usable terminal size.
    #[error("window size query failed")]
    WindowSize(#[source] io::Error),

    /// A read from the terminal failed with something other than the
    /// benign "no data yet" timeout.
    #[error("read from terminal failed")]
    Read(#[source] io::Error),

    /// A write to the terminal failed.
    #[error("write to terminal failed")]
    Write(#[source] io::Error),
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn os_err() -> io::Error {
        io::Error::new(io::ErrorKind::Unsupported, "inappropriate ioctl for device")
    }

    #[test]
    fn display_names_the_operation() {
        assert_eq!(TermError::GetAttr(os_err()).to_string(), "tcgetattr failed");
        assert_eq!(
            TermError::WindowSize(os_err()).to_string(),
            "window size query failed"
        );
    }

    #[test]
    fn source_carries_the_os_error() {
        let err = TermError::SetAttr(os_err());
        let source = err.source().expect("must carry the OS error");
        assert!(source.to_string().contains("inappropriate ioctl"));
    }

    #[test]
    fn read_error_chain_is_reportable() {
        // The binary prints the chain as "operation: os error".
        let err = TermError::Read(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        let chain = format!("{err}: {}", err.source().unwrap());
        assert_eq!(chain, "read from terminal failed: gone");
    }
}
