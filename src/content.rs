//! Content stream rendering: turns a page's laid-out contents into PDF
//! operators, flipping from layout space (millimetres, top-left origin) into
//! PDF space (points, bottom-left origin) on the way.

use crate::colour::Colour;
use crate::font::{encode_win_ansi, FontSpec};
use crate::image::Image;
use crate::page::{ImageLayout, LineLayout, Page, PageContents, RectLayout, RectStyle, SpanLayout};
use crate::units::*;
use id_arena::Arena;
use pdf_writer::{Content, Name, Str};

/// Converts layout coordinates into PDF coordinates for one page
struct Flip {
    page_height: Mm,
}

impl Flip {
    fn x(&self, x: Mm) -> f32 {
        Pt::from(x).0
    }

    fn y(&self, y: Mm) -> f32 {
        Pt::from(self.page_height - y).0
    }

    fn len(&self, len: Mm) -> f32 {
        Pt::from(len).0
    }
}

/// Renders page contents to a PDF content stream.
pub(crate) fn render_contents(page: &Page, images: &Arena<Image>) -> Vec<u8> {
    let flip = Flip {
        page_height: page.height(),
    };
    let mut content = Content::new();

    let mut i = 0;
    while i < page.contents.len() {
        match &page.contents[i] {
            PageContents::Text(_) => {
                // batch consecutive spans so font and colour changes are only
                // written when they actually change
                let run: Vec<&SpanLayout> = page.contents[i..]
                    .iter()
                    .map_while(|c| match c {
                        PageContents::Text(span) => Some(span),
                        _ => None,
                    })
                    .collect();
                i += run.len();
                render_text_spans(&mut content, &run, &flip);
                continue;
            }
            PageContents::Rect(rect) => render_rect(&mut content, rect, &flip),
            PageContents::Line(line) => render_line(&mut content, line, &flip),
            PageContents::Image(image) => render_image(&mut content, image, images, &flip),
        }
        i += 1;
    }

    content.finish()
}

fn render_text_spans(content: &mut Content, spans: &[&SpanLayout], flip: &Flip) {
    let Some(first) = spans.first() else {
        return;
    };

    content.save_state();

    let mut current_font: FontSpec = first.font;
    let mut current_colour: Colour = first.colour;
    set_font(content, &current_font);
    set_fill(content, current_colour);

    for span in spans.iter() {
        if span.font != current_font {
            current_font = span.font;
            set_font(content, &current_font);
        }
        if span.colour != current_colour {
            current_colour = span.colour;
            set_fill(content, current_colour);
        }

        content.begin_text();
        content.next_line(flip.x(span.coords.0), flip.y(span.coords.1));
        content.show(Str(&encode_win_ansi(&span.text)));
        content.end_text();
    }

    content.restore_state();
}

fn render_rect(content: &mut Content, layout: &RectLayout, flip: &Flip) {
    let rect = &layout.rect;
    content.save_state();
    match layout.style {
        RectStyle::Fill(fill) => set_fill(content, fill),
        RectStyle::Stroke { colour, width } => {
            set_stroke(content, colour);
            content.set_line_width(flip.len(width));
        }
        RectStyle::FillStroke {
            fill,
            stroke,
            width,
        } => {
            set_fill(content, fill);
            set_stroke(content, stroke);
            content.set_line_width(flip.len(width));
        }
    }
    content.rect(
        flip.x(rect.x1),
        flip.y(rect.y2),
        flip.len(rect.width()),
        flip.len(rect.height()),
    );
    match layout.style {
        RectStyle::Fill(_) => content.fill_nonzero(),
        RectStyle::Stroke { .. } => content.stroke(),
        RectStyle::FillStroke { .. } => content.fill_nonzero_and_stroke(),
    };
    content.restore_state();
}

fn render_line(content: &mut Content, line: &LineLayout, flip: &Flip) {
    content.save_state();
    set_stroke(content, line.colour);
    content.set_line_width(flip.len(line.width));
    content.move_to(flip.x(line.from.0), flip.y(line.from.1));
    content.line_to(flip.x(line.to.0), flip.y(line.to.1));
    content.stroke();
    content.restore_state();
}

fn render_image(content: &mut Content, layout: &ImageLayout, images: &Arena<Image>, flip: &Flip) {
    if layout.position.is_empty() || images.get(layout.image_id).is_none() {
        return;
    }
    let position = &layout.position;
    let name = format!("I{}", layout.image_id.index());

    content.save_state();
    // images (and converted svgs) occupy the unit square
    content.transform([
        flip.len(position.width()),
        0.0,
        0.0,
        flip.len(position.height()),
        flip.x(position.x1),
        flip.y(position.y2),
    ]);
    content.x_object(Name(name.as_bytes()));
    content.restore_state();
}

fn set_font(content: &mut Content, font: &FontSpec) {
    let name = format!("F{}", font.standard_font().index());
    content.set_font(Name(name.as_bytes()), font.size.0);
}

fn set_fill(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_fill_gray(g),
    };
}

fn set_stroke(content: &mut Content, colour: Colour) {
    match colour {
        Colour::RGB { r, g, b } => content.set_stroke_rgb(r, g, b),
        Colour::CMYK { c, m, y, k } => content.set_stroke_cmyk(c, m, y, k),
        Colour::Grey { g } => content.set_stroke_gray(g),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colours;
    use crate::pagesize::A4;
    use crate::rect::Rect;

    fn render(page: &Page) -> String {
        String::from_utf8_lossy(&render_contents(page, &Arena::new())).into_owned()
    }

    #[test]
    fn empty_page_renders_nothing() {
        assert!(render(&Page::new(1, A4)).is_empty());
    }

    #[test]
    fn text_is_flipped_into_pdf_space() {
        let mut page = Page::new(1, A4);
        page.add_span(SpanLayout {
            text: "Total".into(),
            font: FontSpec::bold(12.0),
            colour: colours::BLACK,
            coords: (Mm(25.4), Mm(297.0 - 25.4)),
        });
        let out = render(&page);
        assert!(out.contains("/F1 12 Tf"), "{out}");
        let td = out.lines().find(|l| l.ends_with(" Td")).expect("text is positioned");
        let coords: Vec<f32> = td
            .split_whitespace()
            .take(2)
            .map(|v| v.parse().expect("numeric operand"))
            .collect();
        assert!((coords[0] - 72.0).abs() < 0.01 && (coords[1] - 72.0).abs() < 0.01, "{td}");
        assert!(out.contains("(Total) Tj"), "{out}");
    }

    #[test]
    fn font_changes_are_only_written_once() {
        let mut page = Page::new(1, A4);
        for text in ["a", "b", "c"] {
            page.add_span(SpanLayout {
                text: text.into(),
                font: FontSpec::regular(10.0),
                colour: colours::BLACK,
                coords: (Mm(10.0), Mm(10.0)),
            });
        }
        assert_eq!(render(&page).matches("Tf").count(), 1);
    }

    #[test]
    fn rects_and_lines_are_painted() {
        let mut page = Page::new(1, A4);
        page.add_rect(RectLayout {
            rect: Rect::new(Mm(10.0), Mm(10.0), Mm(20.0), Mm(5.0)),
            style: RectStyle::Stroke {
                colour: colours::BLACK,
                width: Mm(0.3),
            },
        });
        page.add_line(LineLayout {
            from: (Mm(0.0), Mm(0.0)),
            to: (Mm(10.0), Mm(0.0)),
            width: Mm(0.2),
            colour: colours::MID_GREY,
        });
        let out = render(&page);
        assert!(out.contains(" re\n"), "{out}");
        assert_eq!(out.matches("\nS\n").count(), 2, "{out}");
        assert!(out.contains(" l\n"), "{out}");
    }
}
