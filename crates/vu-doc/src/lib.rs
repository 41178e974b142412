//! # vu-doc — Document model for vu
//!
//! The viewer's in-memory picture of one text file:
//!
//! - **[`row`]** — `Row` with raw bytes and the derived tab-expanded
//!   render form, plus the raw-to-render column mapping
//! - **[`document`]** — `Document`, an ordered `Vec<Row>` loaded once
//!   from a file (split on `\n`, optional `\r` stripped)
//! - **[`cursor`]** — `Cursor` in raw-space with clamped single-step
//!   movement and the post-move normalization pass
//! - **[`viewport`]** — the visible window in render-space with
//!   minimal-adjustment scrolling
//!
//! Everything here is terminal-free and side-effect-free after load —
//! the rendering and key dispatch live in the binary, on top of these
//! types.

pub mod cursor;
pub mod document;
pub mod row;
pub mod viewport;

pub use cursor::Cursor;
pub use document::{Document, LoadError};
pub use row::{Row, TAB_STOP};
pub use viewport::Viewport;
