use super::margins::Margins;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Mm;
use crate::RenderError;

/// The drawable region of a page: a bordered rectangle plus the insets that
/// keep content off the border. Every page of a document shares one frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PageFrame {
    /// Top-left corner of the border
    pub origin: (Mm, Mm),
    pub width: Mm,
    pub height: Mm,
    /// Inset from the left (and right) edge of the border to content
    pub margin_left: Mm,
    /// Inset from the top edge of the border to content
    pub margin_top: Mm,
}

impl PageFrame {
    pub fn new(
        origin: (Mm, Mm),
        width: Mm,
        height: Mm,
        margin_left: Mm,
        margin_top: Mm,
    ) -> Result<PageFrame, RenderError> {
        let frame = PageFrame {
            origin,
            width,
            height,
            margin_left,
            margin_top,
        };
        if width.0 <= 0.0 || height.0 <= 0.0 || frame.content_width().0 <= 0.0 || frame.fresh_height().0 <= 0.0 {
            return Err(RenderError::InvalidFrame { width, height });
        }
        Ok(frame)
    }

    /// A frame whose border sits `margins` in from the edges of `page`, with
    /// content inset by `inset` from the border
    pub fn within(page: PageSize, margins: &Margins, inset: Mm) -> Result<PageFrame, RenderError> {
        let border = margins.border_on(page);
        PageFrame::new((border.x1, border.y1), border.width(), border.height(), inset, inset)
    }

    /// Left edge of the content area
    pub fn left(&self) -> Mm {
        self.origin.0 + self.margin_left
    }

    /// Top edge of the content area
    pub fn top(&self) -> Mm {
        self.origin.1 + self.margin_top
    }

    /// Right edge of the content area
    pub fn right(&self) -> Mm {
        self.origin.0 + self.width - self.margin_left
    }

    /// Bottom edge of the frame; nothing may be drawn below it
    pub fn bottom(&self) -> Mm {
        self.origin.1 + self.height
    }

    pub fn content_width(&self) -> Mm {
        self.right() - self.left()
    }

    /// Vertical space available on a fresh page
    pub fn fresh_height(&self) -> Mm {
        self.bottom() - self.top()
    }

    pub fn border(&self) -> Rect {
        Rect::new(self.origin.0, self.origin.1, self.width, self.height)
    }

    /// The overflow rule: a block of `height` starting at `y` overflows when it
    /// would end below the bottom edge. Ending exactly on the edge fits.
    pub fn overflows(&self, y: Mm, height: Mm) -> bool {
        y + height > self.bottom()
    }
}

/// The current drawing position. Drawing primitives never move it; callers
/// advance it explicitly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cursor {
    pub x: Mm,
    pub y: Mm,
}

impl Cursor {
    /// A cursor at the top-left of the frame's content area
    pub fn at_origin(frame: &PageFrame) -> Cursor {
        Cursor {
            x: frame.left(),
            y: frame.top(),
        }
    }

    pub fn move_to(&mut self, x: Mm, y: Mm) {
        self.x = x;
        self.y = y;
    }

    pub fn inc_x(&mut self, dx: Mm) {
        self.x += dx;
    }

    pub fn inc_y(&mut self, dy: Mm) {
        self.y += dy;
    }

    pub fn reset_x(&mut self, frame: &PageFrame) {
        self.x = frame.left();
    }

    pub fn reset_y(&mut self, frame: &PageFrame) {
        self.y = frame.top();
    }

    pub fn is_within(&self, frame: &PageFrame) -> bool {
        let border = frame.border();
        self.x >= border.x1 && self.x <= border.x2 && self.y >= border.y1 && self.y <= border.y2
    }
}
