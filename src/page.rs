use crate::colour::Colour;
use crate::font::FontSpec;
use crate::image::Image;
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Mm;
use id_arena::Id;

/// A run of text on a single line. `coords` is the start of the baseline in
/// layout space (top-left origin).
#[derive(Clone, PartialEq, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: FontSpec,
    pub colour: Colour,
    pub coords: (Mm, Mm),
}

/// How a rectangle is painted
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum RectStyle {
    Fill(Colour),
    Stroke { colour: Colour, width: Mm },
    FillStroke {
        fill: Colour,
        stroke: Colour,
        width: Mm,
    },
}

#[derive(Clone, PartialEq, Debug)]
pub struct RectLayout {
    pub rect: Rect,
    pub style: RectStyle,
}

#[derive(Clone, PartialEq, Debug)]
pub struct LineLayout {
    pub from: (Mm, Mm),
    pub to: (Mm, Mm),
    pub width: Mm,
    pub colour: Colour,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ImageLayout {
    pub image_id: Id<Image>,
    pub position: Rect,
}

#[derive(Clone, PartialEq, Debug)]
pub enum PageContents {
    Text(SpanLayout),
    Rect(RectLayout),
    Line(LineLayout),
    Image(ImageLayout),
}

/// One page of a document: its number, the border drawn around its frame,
/// and everything painted on it, in painting order
pub struct Page {
    /// 1-based page number
    pub number: usize,
    /// The size of the page
    pub size: PageSize,
    /// The border drawn around the page frame, if any
    pub border: Option<Rect>,
    pub contents: Vec<PageContents>,
}

impl Page {
    pub fn new(number: usize, size: PageSize) -> Page {
        Page {
            number,
            size,
            border: None,
            contents: Vec::default(),
        }
    }

    pub fn width(&self) -> Mm {
        self.size.0
    }

    pub fn height(&self) -> Mm {
        self.size.1
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        self.contents.push(PageContents::Text(span));
    }

    pub fn add_rect(&mut self, rect: RectLayout) {
        self.contents.push(PageContents::Rect(rect));
    }

    pub fn add_line(&mut self, line: LineLayout) {
        self.contents.push(PageContents::Line(line));
    }

    pub fn add_image(&mut self, image: ImageLayout) {
        self.contents.push(PageContents::Image(image));
    }

    /// All text spans on the page, in painting order
    pub fn spans(&self) -> impl Iterator<Item = &SpanLayout> {
        self.contents.iter().filter_map(|c| match c {
            PageContents::Text(span) => Some(span),
            _ => None,
        })
    }

    /// All rectangles on the page, in painting order
    pub fn rects(&self) -> impl Iterator<Item = &RectLayout> {
        self.contents.iter().filter_map(|c| match c {
            PageContents::Rect(rect) => Some(rect),
            _ => None,
        })
    }

    /// All lines on the page, in painting order
    pub fn lines(&self) -> impl Iterator<Item = &LineLayout> {
        self.contents.iter().filter_map(|c| match c {
            PageContents::Line(line) => Some(line),
            _ => None,
        })
    }

    /// Whether any span on the page contains `needle`
    pub fn contains_text(&self, needle: &str) -> bool {
        self.spans().any(|span| span.text.contains(needle))
    }
}
