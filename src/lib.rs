mod colour;
pub use colour::*;

mod document;
pub use document::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

mod info;
pub use info::*;

/// Measuring text, the drawing canvas, and paginated tables
pub mod layout;

/// Business documents built on the layout engine, and the values they are built from
pub mod documents;

mod options;
pub use options::*;

mod page;
pub use page::*;

/// Common page sizes, in millimetres
pub mod pagesize;

mod rect;
pub use rect::*;

mod content;
pub(crate) mod refs;

mod units;
pub use units::*;

mod error;
pub use error::*;

/// Re-export PDF-writer functionality, mostly for custom [pdf_writer::Content] generation
pub use pdf_writer;
