use crate::units::*;

/// A rectangle in layout space, specified by two opposite corners. Layout
/// space has its origin at the top-left of the page, so `y1` is the top edge.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rect {
    /// The x-coordinate of the left edge
    pub x1: Mm,
    /// The y-coordinate of the top edge
    pub y1: Mm,
    /// The x-coordinate of the right edge
    pub x2: Mm,
    /// The y-coordinate of the bottom edge
    pub y2: Mm,
}

impl Rect {
    /// Create a rectangle from its top-left corner and its size
    pub fn new(x: Mm, y: Mm, width: Mm, height: Mm) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> Mm {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Mm {
        self.y2 - self.y1
    }

    /// Zero-area rectangles are used as placeholders for images that could not be loaded
    pub fn is_empty(&self) -> bool {
        self.width().0 <= 0.0 || self.height().0 <= 0.0
    }

    /// Convert to a PDF rectangle (points, bottom-left origin) on a page of the given height
    pub fn to_pdf(&self, page_height: Mm) -> pdf_writer::Rect {
        let x1: Pt = self.x1.into();
        let x2: Pt = self.x2.into();
        let y1: Pt = (page_height - self.y2).into();
        let y2: Pt = (page_height - self.y1).into();
        pdf_writer::Rect {
            x1: x1.0,
            y1: y1.0,
            x2: x2.0,
            y2: y2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_into_pdf_space() {
        let rect = Rect::new(Mm(0.0), Mm(0.0), Mm(25.4), Mm(25.4));
        let pdf = rect.to_pdf(Mm(254.0));
        assert!((pdf.x2 - 72.0).abs() < 0.001);
        assert!((pdf.y1 - 648.0).abs() < 0.001);
        assert!((pdf.y2 - 720.0).abs() < 0.001);
    }

    #[test]
    fn zero_sized_rect_is_empty() {
        assert!(Rect::new(Mm(5.0), Mm(5.0), Mm(0.0), Mm(0.0)).is_empty());
        assert!(!Rect::new(Mm(5.0), Mm(5.0), Mm(1.0), Mm(1.0)).is_empty());
    }
}
