use super::frame::{Cursor, PageFrame};
use super::text::{StandardMetrics, TextMeasurer};
use crate::colour::{colours, Colour};
use crate::document::Document;
use crate::font::FontSpec;
use crate::image::{Image, ImageResolver, ImageSource};
use crate::info::Info;
use crate::options::RenderOptions;
use crate::page::{ImageLayout, LineLayout, Page, RectLayout, RectStyle, SpanLayout};
use crate::pagesize::PageSize;
use crate::rect::Rect;
use crate::units::Mm;
use crate::RenderError;
use id_arena::Id;
use log::{debug, warn};

/// Stroke width of the border drawn around every page frame
pub const PAGE_BORDER_WIDTH: Mm = Mm(0.3);

/// Horizontal placement of text (or an image) within a box
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Where something `inner` wide starts when placed in a box `width` wide at `x`
    pub fn offset(&self, x: Mm, width: Mm, inner: Mm) -> Mm {
        match self {
            Alignment::Left => x,
            Alignment::Center => x + (width - inner) / 2.0,
            Alignment::Right => x + width - inner,
        }
    }
}

/// Font and colour for a piece of text
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextStyle {
    pub font: FontSpec,
    pub colour: Colour,
}

impl TextStyle {
    pub fn new(font: FontSpec, colour: Colour) -> TextStyle {
        TextStyle { font, colour }
    }
}

impl From<FontSpec> for TextStyle {
    fn from(font: FontSpec) -> Self {
        TextStyle::new(font, colours::BLACK)
    }
}

/// How [Canvas::draw_bordered_heading] paints its box
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeadingStyle {
    pub text: TextStyle,
    pub fill: Option<Colour>,
    pub border: Colour,
    pub border_width: Mm,
    /// Space between the border and the text, on every side
    pub padding: Mm,
    pub alignment: Alignment,
}

impl Default for HeadingStyle {
    fn default() -> Self {
        HeadingStyle {
            text: TextStyle::new(FontSpec::bold(12.0), colours::BLACK),
            fill: Some(colours::LIGHT_GREY),
            border: colours::BLACK,
            border_width: Mm(0.3),
            padding: Mm(2.0),
            alignment: Alignment::Left,
        }
    }
}

/// A titled block of lines, one of the columns drawn by [Canvas::draw_detail_columns]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DetailBlock {
    pub title: String,
    pub lines: Vec<String>,
}

impl DetailBlock {
    pub fn new<S: ToString>(title: S, lines: Vec<String>) -> DetailBlock {
        DetailBlock {
            title: title.to_string(),
            lines,
        }
    }
}

/// The finished output of a render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// The drawing surface for one render. A canvas owns the document being built,
/// the page frame shared by all of its pages, and the cursor. Primitive draws
/// paint at absolute coordinates and never move the cursor; composite draws
/// start at the cursor and advance it by the height they consume.
pub struct Canvas<'a, M: TextMeasurer = StandardMetrics> {
    document: Document,
    page_size: PageSize,
    frame: PageFrame,
    cursor: Cursor,
    current: Id<Page>,
    measurer: M,
    resolver: &'a dyn ImageResolver,
    info: Info,
    page_numbers: bool,
}

impl<'a> Canvas<'a, StandardMetrics> {
    /// A canvas measuring text with the standard font metrics. The first page
    /// is started (and bordered) immediately.
    pub fn new(
        page_size: PageSize,
        frame: PageFrame,
        options: &RenderOptions<'a>,
    ) -> Result<Self, RenderError> {
        Canvas::with_measurer(page_size, frame, StandardMetrics, options)
    }
}

impl<'a, M: TextMeasurer> Canvas<'a, M> {
    pub fn with_measurer(
        page_size: PageSize,
        frame: PageFrame,
        measurer: M,
        options: &RenderOptions<'a>,
    ) -> Result<Self, RenderError> {
        // the frame's fields are public, so check it again here
        let frame = PageFrame::new(
            frame.origin,
            frame.width,
            frame.height,
            frame.margin_left,
            frame.margin_top,
        )?;
        let border = frame.border();
        if border.x1 < Mm::ZERO
            || border.y1 < Mm::ZERO
            || border.x2 > page_size.0
            || border.y2 > page_size.1
        {
            return Err(RenderError::InvalidFrame {
                width: frame.width,
                height: frame.height,
            });
        }

        let mut document = Document {
            compress: options.compress,
            ..Default::default()
        };
        let current = document.add_page(bordered_page(1, page_size, &frame));

        Ok(Canvas {
            document,
            page_size,
            frame,
            cursor: Cursor::at_origin(&frame),
            current,
            measurer,
            resolver: options.image_resolver,
            info: Info::from_options(options),
            page_numbers: options.page_numbers,
        })
    }

    pub fn frame(&self) -> &PageFrame {
        &self.frame
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    /// Document metadata written when the canvas is finished
    pub fn info_mut(&mut self) -> &mut Info {
        &mut self.info
    }

    pub fn page_count(&self) -> usize {
        self.document.page_count()
    }

    /// The 1-based number of the page being drawn on
    pub fn current_page_number(&self) -> usize {
        self.document.pages[self.current].number
    }

    /// Every page drawn so far, in order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.document.ordered_pages()
    }

    fn page_mut(&mut self) -> &mut Page {
        &mut self.document.pages[self.current]
    }

    pub fn move_to(&mut self, x: Mm, y: Mm) {
        self.cursor.move_to(x, y);
    }

    pub fn inc_x(&mut self, dx: Mm) {
        self.cursor.inc_x(dx);
    }

    pub fn inc_y(&mut self, dy: Mm) {
        self.cursor.inc_y(dy);
    }

    pub fn reset_x(&mut self) {
        self.cursor.reset_x(&self.frame);
    }

    pub fn reset_y(&mut self) {
        self.cursor.reset_y(&self.frame);
    }

    /// Space left between the cursor and the bottom of the frame
    pub fn remaining_height(&self) -> Mm {
        self.frame.bottom() - self.cursor.y
    }

    pub fn rectangle(&mut self, x: Mm, y: Mm, width: Mm, height: Mm, style: RectStyle) {
        self.page_mut().add_rect(RectLayout {
            rect: Rect::new(x, y, width, height),
            style,
        });
    }

    pub fn line(&mut self, x1: Mm, y1: Mm, x2: Mm, y2: Mm, width: Mm, colour: Colour) {
        self.page_mut().add_line(LineLayout {
            from: (x1, y1),
            to: (x2, y2),
            width,
            colour,
        });
    }

    /// Paints a single line of text whose line box has its top-left corner at
    /// `(x, y)`. The text is not wrapped.
    pub fn text_run(&mut self, x: Mm, y: Mm, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let baseline = y + self.measurer.baseline_offset(&style.font);
        self.page_mut().add_span(SpanLayout {
            text: text.to_string(),
            font: style.font,
            colour: style.colour,
            coords: (x, baseline),
        });
    }

    /// Paints an image stretched over the given box, returning the size
    /// actually painted. An image that can't be resolved or decoded is
    /// replaced by a zero-size placeholder.
    pub fn image(&mut self, x: Mm, y: Mm, width: Mm, height: Mm, source: &ImageSource) -> (Mm, Mm) {
        match self.load_image(source) {
            Some(id) => {
                self.place_image(id, Rect::new(x, y, width, height));
                (width, height)
            }
            None => (Mm::ZERO, Mm::ZERO),
        }
    }

    fn load_image(&mut self, source: &ImageSource) -> Option<Id<Image>> {
        match Image::load(source, self.resolver) {
            Ok(image) if image.width > 0.0 && image.height > 0.0 => {
                Some(self.document.add_image(image))
            }
            Ok(_) => {
                warn!("image {} has no size, using a placeholder", source.describe());
                None
            }
            Err(e) => {
                warn!("image {} unusable, using a placeholder: {e}", source.describe());
                None
            }
        }
    }

    fn place_image(&mut self, image_id: Id<Image>, position: Rect) {
        self.page_mut().add_image(ImageLayout { image_id, position });
    }

    /// Wraps `text` to `width` and paints it at the cursor, one aligned line
    /// after another. Returns the height consumed.
    pub fn draw_multiline_block(
        &mut self,
        text: &str,
        width: Mm,
        style: &TextStyle,
        alignment: Alignment,
    ) -> Mm {
        let lines = self.measurer.wrap(text, &style.font, width);
        let line_height = self.measurer.line_height(&style.font);
        let Cursor { x, y } = self.cursor;

        let mut line_y = y;
        for line in lines.iter() {
            let line_width = self.measurer.text_width(line, &style.font);
            self.text_run(alignment.offset(x, width, line_width), line_y, line, style);
            line_y += line_height;
        }

        let height = line_height * lines.len() as f32;
        self.cursor.inc_y(height);
        height
    }

    /// Paints `label` followed by `value` on the same line, the value wrapping
    /// in whatever is left of `width`. The cursor returns to its starting x.
    pub fn draw_label_with_value(
        &mut self,
        label: &str,
        value: &str,
        width: Mm,
        label_style: &TextStyle,
        value_style: &TextStyle,
    ) -> Mm {
        let Cursor { x, y } = self.cursor;
        let label_width = if label.is_empty() {
            Mm::ZERO
        } else {
            self.measurer.text_width(label, &label_style.font)
                + self.measurer.text_width(" ", &label_style.font)
        };
        self.text_run(x, y, label, label_style);
        let label_height = self.measurer.measure(label, &label_style.font);

        self.cursor.move_to(x + label_width, y);
        let value_width = (width - label_width).max(Mm::ZERO);
        let value_height = self.draw_multiline_block(value, value_width, value_style, Alignment::Left);

        let height = label_height.max(value_height);
        self.cursor.move_to(x, y + height);
        height
    }

    /// Paints `text` inside a box `width` wide, optionally filled, sized to
    /// the wrapped text plus padding
    pub fn draw_bordered_heading(&mut self, text: &str, width: Mm, style: &HeadingStyle) -> Mm {
        let Cursor { x, y } = self.cursor;
        let inner = (width - style.padding * 2.0).max(Mm::ZERO);
        let lines = self.measurer.wrap(text, &style.text.font, inner).len().max(1);
        let height = self.measurer.line_height(&style.text.font) * lines as f32 + style.padding * 2.0;

        let rect_style = match style.fill {
            Some(fill) => RectStyle::FillStroke {
                fill,
                stroke: style.border,
                width: style.border_width,
            },
            None => RectStyle::Stroke {
                colour: style.border,
                width: style.border_width,
            },
        };
        self.rectangle(x, y, width, height, rect_style);

        self.cursor.move_to(x + style.padding, y + style.padding);
        self.draw_multiline_block(text, inner, &style.text, style.alignment);

        self.cursor.move_to(x, y + height);
        height
    }

    /// Paints titled blocks side by side, block `i` in a column `widths[i]`
    /// wide starting at the cursor. Extra blocks or widths are ignored.
    /// Returns the height of the tallest block.
    pub fn draw_detail_columns(
        &mut self,
        blocks: &[DetailBlock],
        widths: &[Mm],
        title_style: &TextStyle,
        body_style: &TextStyle,
    ) -> Mm {
        let Cursor { x, y } = self.cursor;
        let mut column_x = x;
        let mut tallest = Mm::ZERO;

        for (block, width) in blocks.iter().zip(widths.iter()) {
            self.cursor.move_to(column_x, y);
            let mut height = self.draw_multiline_block(&block.title, *width, title_style, Alignment::Left);
            for line in block.lines.iter() {
                height += self.draw_multiline_block(line, *width, body_style, Alignment::Left);
            }
            tallest = tallest.max(height);
            column_x += *width;
        }

        self.cursor.move_to(x, y + tallest);
        tallest
    }

    /// Paints an image at the cursor, scaled to fit within `max_width` by
    /// `max_height` while keeping its aspect ratio. Returns the painted size,
    /// which is zero for a placeholder.
    pub fn draw_image_fit(
        &mut self,
        source: &ImageSource,
        max_width: Mm,
        max_height: Mm,
        alignment: Alignment,
    ) -> (Mm, Mm) {
        let Some(id) = self.load_image(source) else {
            return (Mm::ZERO, Mm::ZERO);
        };
        let image = &self.document.images[id];
        let aspect = image.width / image.height;

        let (mut width, mut height) = (max_width, max_width / aspect);
        if height > max_height {
            height = max_height;
            width = max_height * aspect;
        }

        let Cursor { x, y } = self.cursor;
        self.place_image(id, Rect::new(alignment.offset(x, max_width, width), y, width, height));
        self.cursor.inc_y(height);
        (width, height)
    }

    /// Strokes a horizontal rule `width` long at the cursor without moving it
    pub fn draw_rule(&mut self, width: Mm, thickness: Mm, colour: Colour) {
        let Cursor { x, y } = self.cursor;
        self.line(x, y, x + width, y, thickness, colour);
    }

    /// Starts a new page if a block `height` tall doesn't fit below the
    /// cursor. Returns whether a page was started.
    pub fn ensure_space(&mut self, height: Mm) -> Result<bool, RenderError> {
        let available = self.frame.fresh_height();
        if height > available {
            return Err(RenderError::ContentTooTall { height, available });
        }
        if self.frame.overflows(self.cursor.y, height) {
            self.new_page();
            return Ok(true);
        }
        Ok(false)
    }

    /// Starts a new bordered page and moves the cursor to the top-left of its
    /// content area. Returns the new page's number.
    pub fn new_page(&mut self) -> usize {
        let number = self.document.page_count() + 1;
        self.current = self
            .document
            .add_page(bordered_page(number, self.page_size, &self.frame));
        self.cursor = Cursor::at_origin(&self.frame);
        debug!("started page {number}");
        number
    }

    fn stamp_page_numbers(&mut self) {
        let style = TextStyle::new(FontSpec::regular(8.0), colours::MID_GREY);
        let line_height = self.measurer.line_height(&style.font);
        let baseline = self.measurer.baseline_offset(&style.font);
        let right = self.frame.origin.0 + self.frame.width;

        // below the border when there is room, otherwise just inside it
        let below = self.frame.bottom() + Mm(1.0);
        let top = if below + line_height <= self.page_size.1 {
            below
        } else {
            self.frame.bottom() - line_height - Mm(1.0)
        };

        let total = self.document.page_count();
        for (i, id) in self.document.page_order.iter().enumerate() {
            let label = format!("Page {} of {}", i + 1, total);
            let width = self.measurer.text_width(&label, &style.font);
            self.document.pages[*id].add_span(SpanLayout {
                text: label,
                font: style.font,
                colour: style.colour,
                coords: (right - width, top + baseline),
            });
        }
    }

    /// Finishes the render, returning the encoded document
    pub fn finish(mut self) -> Result<RenderedDocument, RenderError> {
        if self.page_numbers {
            self.stamp_page_numbers();
        }

        let Canvas {
            mut document, info, ..
        } = self;
        let page_count = document.page_count();
        document.set_info(info);

        let mut bytes = Vec::new();
        document.write(&mut bytes)?;
        debug!("rendered {page_count} page(s) into {} bytes", bytes.len());

        Ok(RenderedDocument { bytes, page_count })
    }
}

fn bordered_page(number: usize, size: PageSize, frame: &PageFrame) -> Page {
    let border = frame.border();
    let mut page = Page::new(number, size);
    page.border = Some(border);
    page.add_rect(RectLayout {
        rect: border,
        style: RectStyle::Stroke {
            colour: colours::BLACK,
            width: PAGE_BORDER_WIDTH,
        },
    });
    page
}
