//! Pre-defined page sizes for common paper formats, in millimetres.
//!
//! All sizes are provided in portrait orientation (width, height).

use crate::units::*;

/// Page dimensions as (width, height) in millimetres.
pub type PageSize = (Mm, Mm);

pub const A4: PageSize = (Mm(210.0), Mm(297.0));
pub const A5: PageSize = (Mm(148.0), Mm(210.0));

// north american sizes
pub const LETTER: PageSize = (Mm(215.9), Mm(279.4));
pub const LEGAL: PageSize = (Mm(215.9), Mm(355.6));
