use crate::units::Mm;
use thiserror::Error;

/// All errors that can abort a render. Recoverable faults (such as an image
/// that fails to decode) never surface here; they degrade to placeholders.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    /// An I/O error occurred while writing the finished document
    Io(#[from] std::io::Error),

    #[error("table has {columns} columns but {what} has {found} entries")]
    /// Header labels or a row's cells don't line up with the table's columns
    ColumnMismatch {
        columns: usize,
        what: String,
        found: usize,
    },

    #[error("column widths sum to {actual} but the table is declared {declared} wide")]
    /// The column widths don't add up to the declared table width
    WidthMismatch { declared: Mm, actual: Mm },

    #[error("row {row} needs {height} but a fresh page only has {available}")]
    /// A single table row is taller than an entire page
    RowTooTall { row: usize, height: Mm, available: Mm },

    #[error("content block needs {height} but a fresh page only has {available}")]
    /// A block other than a table row, such as a table header band or the
    /// letterhead, is taller than an entire page
    ContentTooTall { height: Mm, available: Mm },

    #[error("page frame must have a positive size, got {width} x {height}")]
    /// The page frame has no drawable area
    InvalidFrame { width: Mm, height: Mm },

    #[error("page is missing from the document")]
    /// A page referenced by the page order no longer exists
    PageMissing,
}
