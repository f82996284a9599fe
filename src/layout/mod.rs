//! Page layout: measuring and wrapping text, the page frame and cursor, the
//! [Canvas] drawing surface, and paginated tables.
//!
//! All layout happens in millimetres with the origin at the top-left of the
//! page. A canvas starts on a bordered first page; content is drawn at the
//! cursor and pages are added as content overflows the frame.
//!
//! # Example
//!
//! ```
//! use docket::layout::{Canvas, Column, PageFrame, TableSpec};
//! use docket::{pagesize, Mm, RenderOptions};
//!
//! let frame = PageFrame::new((Mm(10.0), Mm(10.0)), Mm(190.0), Mm(277.0), Mm(5.0), Mm(5.0))?;
//! let mut canvas = Canvas::new(pagesize::A4, frame, &RenderOptions::default())?;
//!
//! let mut table = TableSpec::new(
//!     Mm(180.0),
//!     vec![Column::left(60.0), Column::left(80.0), Column::right(40.0)],
//!     ["SKU", "Description", "Total"],
//! );
//! table.push_row(["A-100", "Widget", "$12.00"]);
//! let height = canvas.draw_table(&table)?;
//! assert!(height > Mm(0.0));
//!
//! let rendered = canvas.finish()?;
//! assert_eq!(rendered.page_count, 1);
//! # Ok::<(), docket::RenderError>(())
//! ```

mod canvas;
mod frame;
mod margins;
mod table;
mod text;

pub use canvas::*;
pub use frame::*;
pub use margins::*;
pub use table::*;
pub use text::*;
