use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Mm;

/// Distance from each edge of the page to the frame border drawn on it
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Mm,
    pub right: Mm,
    pub bottom: Mm,
    pub left: Mm,
}

impl Margins {
    /// Clockwise from the top, as in CSS
    pub fn trbl(top: Mm, right: Mm, bottom: Mm, left: Mm) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all<D: Into<Mm>>(value: D) -> Margins {
        let value: Mm = value.into();
        Margins::trbl(value, value, value, value)
    }

    pub fn symmetric(vertical: Mm, horizontal: Mm) -> Margins {
        Margins::trbl(vertical, horizontal, vertical, horizontal)
    }

    /// The border rectangle these margins leave on `page`. Empty when the
    /// margins meet or cross.
    pub fn border_on(&self, page: PageSize) -> Rect {
        let width = (page.0 - self.left - self.right).max(Mm::ZERO);
        let height = (page.1 - self.top - self.bottom).max(Mm::ZERO);
        Rect::new(self.left, self.top, width, height)
    }
}
