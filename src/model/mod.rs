//! Document model over the WordprocessingML element tree.
//!
//! [`Document`] owns the parsed parts. Everything else is a borrowed view
//! (`Table<'a>`, `Cell<'a>`, `Run<'a>`, ...) wrapping a mutable reference into
//! the tree, so edits made through a view land directly in the document and
//! are written out on the next save.

mod document;
mod paragraph;
mod styles;
mod table;

pub use document::Document;
pub use paragraph::{Paragraph, Run};
pub use styles::{StyleKind, StyleRegistry};
pub use table::{Cell, Row, Table, MAX_GRID_COLUMNS};

pub(crate) use paragraph::{build_run, is_text_child, run_text};
