// SPDX-License-Identifier: MIT
//
// Document — an ordered sequence of rows read from one file.
//
// Loading is a single read at startup: the whole file comes in, gets
// split into lines on `\n` (with an optional trailing `\r` stripped,
// so both Unix and DOS line endings work), and each line becomes a
// Row in file order. Arbitrary bytes are accepted — no encoding
// validation, no length limit. There is no save path; the document is
// immutable after load.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::row::Row;

/// A failed document load. Fatal at startup — there is no
/// partial-document fallback.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An ordered sequence of [`Row`]s plus an optional display name.
#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
    /// File name for the status bar. Display only — the document holds
    /// no open handle after load.
    name: Option<String>,
}

impl Document {
    /// Create an empty document (started without a file argument).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Read a file into a document, one row per line, order preserved.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if the file cannot be opened or read.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let bytes = fs::read(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut doc = Self::from_bytes(&bytes);
        doc.name = Some(path.to_string_lossy().into_owned());
        Ok(doc)
    }

    /// Build a document from in-memory file contents.
    ///
    /// Lines are split on `\n`; a `\r` immediately before the `\n` is
    /// stripped (CR+LF). A trailing newline does not produce an empty
    /// final row, matching line-oriented readers.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut rows = Vec::new();
        let mut start = 0;

        for (i, &byte) in bytes.iter().enumerate() {
            if byte == b'\n' {
                let mut end = i;
                if end > start && bytes[end - 1] == b'\r' {
                    end -= 1;
                }
                rows.push(Row::new(bytes[start..end].to_vec()));
                start = i + 1;
            }
        }
        // Final line without a terminator.
        if start < bytes.len() {
            rows.push(Row::new(bytes[start..].to_vec()));
        }

        Self { rows, name: None }
    }

    /// All rows, in file order.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The row at index `y`, or `None` past the end of the document.
    #[inline]
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&Row> {
        self.rows.get(y)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display name, if the document came from a file.
    #[inline]
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
