//! Pieces shared by the business documents: the letterhead, party blocks,
//! totals, paragraphs, the pinned footer and appended photo pages.

use super::branding::Branding;
use super::format;
use super::model::{Money, Order};
use crate::colour::{colours, Colour};
use crate::font::FontSpec;
use crate::image::ImageSource;
use crate::layout::{Alignment, Canvas, Cursor, DetailBlock, TableStyle, TextMeasurer, TextStyle};
use crate::units::Mm;
use crate::RenderError;

/// Vertical space left between the sections of a document
pub(crate) const SECTION_GAP: Mm = Mm(4.0);

/// Space between a section heading and its content
const HEADING_GAP: Mm = Mm(1.5);

/// Width of the right-aligned totals block
const TOTALS_WIDTH: Mm = Mm(75.0);

pub(crate) fn body() -> TextStyle {
    TextStyle::new(FontSpec::regular(9.0), colours::BLACK)
}

pub(crate) fn strong() -> TextStyle {
    TextStyle::new(FontSpec::bold(9.0), colours::BLACK)
}

pub(crate) fn small() -> TextStyle {
    TextStyle::new(FontSpec::regular(8.0), colours::DARK_GREY)
}

fn accented(size: f32, accent: Colour) -> TextStyle {
    TextStyle::new(FontSpec::bold(size), accent)
}

pub(crate) fn table_style(branding: &Branding) -> TableStyle {
    TableStyle {
        header_fill: branding.accent,
        stripe: Some(Colour::new_grey(0.96)),
        ..Default::default()
    }
}

/// Company name and postal address, for "from" party blocks
pub(crate) fn company_lines(branding: &Branding) -> Vec<String> {
    let mut lines = vec![branding.company_name.clone()];
    lines.extend(branding.address_lines.iter().cloned());
    lines
}

/// Tallest a logo is drawn in the letterhead
const LOGO_BOX: (Mm, Mm) = (Mm(45.0), Mm(18.0));
const LOGO_GAP: Mm = Mm(2.0);
const TITLE_GAP: Mm = Mm(1.5);

fn detail_lines(branding: &Branding) -> Vec<String> {
    branding
        .address_lines
        .iter()
        .cloned()
        .chain(branding.contact_lines())
        .collect()
}

fn stacked_height<M: TextMeasurer>(measurer: &M, lines: &[(String, TextStyle)], width: Mm) -> Mm {
    lines
        .iter()
        .map(|(text, style)| measurer.wrapped_height(text, &style.font, width, measurer.line_height(&style.font)))
        .sum()
}

/// The letterhead: logo and company details on the left, the document title
/// and its reference values on the right. Returns the height consumed, or
/// [RenderError::ContentTooTall] before drawing anything when the letterhead
/// cannot fit on a page.
pub(crate) fn draw_header<M: TextMeasurer>(
    canvas: &mut Canvas<'_, M>,
    branding: &Branding,
    title: &str,
    meta: &[(&str, String)],
) -> Result<Mm, RenderError> {
    let width = canvas.frame().content_width();
    let left_width = width * 0.55;
    let right_width = width - left_width;

    let company = accented(12.0, colours::BLACK);
    let title_style = accented(18.0, branding.accent);
    let details = detail_lines(branding);
    let meta_lines: Vec<String> = meta.iter().map(|(label, value)| format!("{label}: {value}")).collect();

    // the logo is measured at its largest since it may not load
    let mut left_lines = vec![(branding.company_name.clone(), company)];
    left_lines.extend(details.iter().map(|line| (line.clone(), small())));
    let logo_room = if branding.logo.is_some() { LOGO_BOX.1 + LOGO_GAP } else { Mm::ZERO };
    let left_needed = logo_room + stacked_height(canvas.measurer(), &left_lines, left_width);
    let mut right_lines = vec![(title.to_string(), title_style)];
    right_lines.extend(meta_lines.iter().map(|line| (line.clone(), body())));
    let right_needed = stacked_height(canvas.measurer(), &right_lines, right_width) + TITLE_GAP;
    canvas.ensure_space(left_needed.max(right_needed))?;

    let Cursor { x, y } = canvas.cursor();
    let mut left = Mm::ZERO;
    if let Some(logo) = &branding.logo {
        let (_, logo_height) = canvas.draw_image_fit(logo, LOGO_BOX.0, LOGO_BOX.1, Alignment::Left);
        if logo_height > Mm::ZERO {
            canvas.inc_y(LOGO_GAP);
            left += logo_height + LOGO_GAP;
        }
    }
    left += canvas.draw_multiline_block(&branding.company_name, left_width, &company, Alignment::Left);
    for line in details.iter() {
        left += canvas.draw_multiline_block(line, left_width, &small(), Alignment::Left);
    }

    canvas.move_to(x + left_width, y);
    let mut right = canvas.draw_multiline_block(title, right_width, &title_style, Alignment::Right);
    canvas.inc_y(TITLE_GAP);
    right += TITLE_GAP;
    for line in meta_lines.iter() {
        right += canvas.draw_multiline_block(line, right_width, &body(), Alignment::Right);
    }

    let height = left.max(right) + SECTION_GAP;
    canvas.move_to(x, y + height);
    Ok(height)
}

fn block_height<M: TextMeasurer>(measurer: &M, block: &DetailBlock, width: Mm) -> Mm {
    let title = strong();
    let text = body();
    let mut height = measurer.wrapped_height(&block.title, &title.font, width, measurer.line_height(&title.font));
    for line in block.lines.iter() {
        height += measurer.wrapped_height(line, &text.font, width, measurer.line_height(&text.font));
    }
    height
}

/// Party blocks ("Bill To", "Ship To", ...) side by side across the frame
pub(crate) fn draw_parties<M: TextMeasurer>(
    canvas: &mut Canvas<'_, M>,
    blocks: &[DetailBlock],
) -> Result<Mm, RenderError> {
    if blocks.is_empty() {
        return Ok(Mm::ZERO);
    }
    let column = canvas.frame().content_width() / blocks.len() as f32;
    let widths = vec![column; blocks.len()];
    let needed = blocks
        .iter()
        .map(|block| block_height(canvas.measurer(), block, column))
        .fold(Mm::ZERO, Mm::max);

    canvas.ensure_space(needed)?;
    let height = canvas.draw_detail_columns(blocks, &widths, &strong(), &body());
    canvas.inc_y(SECTION_GAP);
    Ok(height + SECTION_GAP)
}

/// A bold heading in the accent colour, kept on the same page as the first
/// `lead` of the content below it (see [Canvas::table_lead])
pub(crate) fn draw_section_heading<M: TextMeasurer>(
    canvas: &mut Canvas<'_, M>,
    branding: &Branding,
    text: &str,
    lead: Mm,
) -> Result<Mm, RenderError> {
    let style = accented(11.0, branding.accent);
    let width = canvas.frame().content_width();
    let line = canvas.measurer().line_height(&style.font);
    let heading = canvas.measurer().wrapped_height(text, &style.font, width, line) + HEADING_GAP;
    let fresh = canvas.frame().fresh_height();
    if heading > fresh {
        return Err(RenderError::ContentTooTall {
            height: heading,
            available: fresh,
        });
    }
    // content that cannot share a page with the heading starts below it anyway
    canvas.ensure_space((heading + lead).min(fresh))?;
    let height = canvas.draw_multiline_block(text, width, &style, Alignment::Left);
    canvas.inc_y(HEADING_GAP);
    Ok(height + HEADING_GAP)
}

/// Subtotal, discount, tax, shipping and total for an order
pub(crate) fn order_totals(order: &Order, branding: &Branding) -> Vec<(String, String)> {
    let totals = order.totals();
    let money = |amount| format::currency(amount, &branding.currency_symbol);

    let mut rows = vec![("Subtotal".to_string(), money(totals.subtotal))];
    if !totals.discount.is_zero() {
        rows.push(("Discount".to_string(), money(Money::ZERO - totals.discount)));
    }
    rows.push((
        format!("Tax ({})", format::percent_bps(order.tax_rate_bps)),
        money(totals.tax),
    ));
    rows.push(("Shipping".to_string(), money(totals.shipping)));
    rows.push(("Total".to_string(), money(totals.total)));
    rows
}

/// Label/value rows right-aligned against the frame, the last one ruled off
/// and set in bold
pub(crate) fn draw_totals<M: TextMeasurer>(
    canvas: &mut Canvas<'_, M>,
    rows: &[(String, String)],
) -> Result<Mm, RenderError> {
    let line = canvas.measurer().line_height(&strong().font);
    let height = line * rows.len() as f32;
    canvas.ensure_space(height)?;

    let Cursor { x, y } = canvas.cursor();
    let right = canvas.frame().right();
    let left = right - TOTALS_WIDTH;

    let mut row_y = y;
    for (i, (label, value)) in rows.iter().enumerate() {
        let last = i + 1 == rows.len();
        let style = if last { strong() } else { body() };
        if last && rows.len() > 1 {
            canvas.line(left, row_y, right, row_y, Mm(0.3), colours::BLACK);
        }
        canvas.text_run(left, row_y, label, &style);
        let value_width = canvas.measurer().text_width(value, &style.font);
        canvas.text_run(right - value_width, row_y, value, &style);
        row_y += line;
    }

    canvas.move_to(x, row_y + SECTION_GAP);
    Ok(height + SECTION_GAP)
}

/// Wrapped text across the frame, breaking pages between lines as needed,
/// under an optional heading
pub(crate) fn draw_paragraph<M: TextMeasurer>(
    canvas: &mut Canvas<'_, M>,
    heading: Option<&str>,
    text: &str,
    style: &TextStyle,
) -> Result<Mm, RenderError> {
    let width = canvas.frame().content_width();
    let line = canvas.measurer().line_height(&style.font);
    let mut height = Mm::ZERO;

    if let Some(heading) = heading {
        let heading_line = canvas.measurer().line_height(&strong().font);
        canvas.ensure_space(heading_line + line)?;
        height += canvas.draw_multiline_block(heading, width, &strong(), Alignment::Left);
    }

    let lines = canvas.measurer().wrap(text, &style.font, width);
    for text_line in lines.iter() {
        canvas.ensure_space(line)?;
        let Cursor { x, y } = canvas.cursor();
        canvas.text_run(x, y, text_line, style);
        canvas.inc_y(line);
        height += line;
    }

    canvas.inc_y(SECTION_GAP);
    Ok(height + SECTION_GAP)
}

/// The footer note and contact line, centred and pinned to the bottom of the
/// frame. Starts a new page when content already runs past where the footer
/// belongs.
pub(crate) fn draw_footer<M: TextMeasurer>(
    canvas: &mut Canvas<'_, M>,
    branding: &Branding,
) -> Result<(), RenderError> {
    let note_style = TextStyle::new(FontSpec::italic(8.0), colours::DARK_GREY);
    let mut lines: Vec<(String, TextStyle)> = branding
        .footer_note
        .iter()
        .map(|note| (note.clone(), note_style))
        .collect();
    let contact = branding.contact_line();
    if !contact.is_empty() {
        lines.push((contact, small()));
    }
    if lines.is_empty() {
        return Ok(());
    }

    let frame = *canvas.frame();
    let width = frame.content_width();
    let height = stacked_height(canvas.measurer(), &lines, width);
    let available = frame.fresh_height() - Mm(2.0);
    if height > available {
        return Err(RenderError::ContentTooTall { height, available });
    }

    let top = frame.bottom() - height - Mm(1.0);
    if canvas.cursor().y > top - Mm(1.0) {
        canvas.new_page();
    }

    canvas.move_to(frame.left(), top - Mm(1.0));
    canvas.draw_rule(width, Mm(0.2), colours::MID_GREY);
    canvas.move_to(frame.left(), top);
    for (text, style) in lines.iter() {
        canvas.draw_multiline_block(text, width, style, Alignment::Center);
    }
    Ok(())
}

/// One new bordered page per photo, each captioned and scaled to fill the
/// rest of its page
pub(crate) fn append_photo_pages<M: TextMeasurer>(
    canvas: &mut Canvas<'_, M>,
    photos: &[ImageSource],
    caption: &str,
) {
    let total = photos.len();
    for (i, photo) in photos.iter().enumerate() {
        canvas.new_page();
        let width = canvas.frame().content_width();
        canvas.draw_multiline_block(&format!("{caption} {} of {total}", i + 1), width, &strong(), Alignment::Left);
        canvas.inc_y(Mm(3.0));
        let remaining = canvas.remaining_height();
        canvas.draw_image_fit(photo, width, remaining, Alignment::Center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::fixtures;
    use crate::layout::{Column, PageFrame, StandardMetrics, TableSpec};
    use crate::page::Page;
    use crate::pagesize::A4;
    use crate::RenderOptions;

    fn canvas(height: f32) -> Canvas<'static, StandardMetrics> {
        let frame = PageFrame::new((Mm(10.0), Mm(10.0)), Mm(190.0), Mm(height), Mm(5.0), Mm(5.0)).expect("valid frame");
        let options = RenderOptions {
            page_numbers: false,
            ..Default::default()
        };
        Canvas::new(A4, frame, &options).expect("valid canvas")
    }

    fn orders_table() -> TableSpec {
        let mut table = TableSpec::new(Mm(180.0), vec![Column::left(60.0), Column::left(120.0)], ["Order", "Customer"]);
        table.push_row(["1001", "Ada Lovelace\nAnalytical Engines Ltd"]);
        table
    }

    #[test]
    fn headings_stay_with_the_start_of_their_table() {
        let mut canvas = canvas(100.0);
        let table = orders_table();
        let lead = canvas.table_lead(&table);
        let style = accented(11.0, colours::BLACK);
        let heading = canvas.measurer().line_height(&style.font) + HEADING_GAP;

        // the heading itself fits, the heading and the first row do not
        let frame = *canvas.frame();
        canvas.move_to(frame.left(), frame.bottom() - heading - lead + Mm(1.0));
        draw_section_heading(&mut canvas, &fixtures::branding(), "Orders", lead).expect("heading fits");
        canvas.draw_table(&table).expect("table fits");

        let pages: Vec<&Page> = canvas.pages().collect();
        assert_eq!(pages.len(), 2);
        assert!(!pages[0].contains_text("Orders"));
        assert!(pages[1].contains_text("Orders"));
        assert!(pages[1].contains_text("Customer"));
    }

    #[test]
    fn headings_with_room_stay_put() {
        let mut canvas = canvas(100.0);
        let table = orders_table();
        let lead = canvas.table_lead(&table);
        draw_section_heading(&mut canvas, &fixtures::branding(), "Orders", lead).expect("heading fits");
        // a lead taller than any page only asks for a page to itself
        draw_section_heading(&mut canvas, &fixtures::branding(), "Products", Mm(500.0)).expect("heading fits");
        assert_eq!(canvas.page_count(), 2);
        assert!(canvas.pages().nth(1).expect("page").contains_text("Products"));
    }

    #[test]
    fn letterhead_reports_its_height() {
        let mut canvas = canvas(100.0);
        let top = canvas.cursor().y;
        let meta = [("Invoice #", "INV-1".to_string()), ("Date", "03 Mar 2024".to_string())];
        let height = draw_header(&mut canvas, &fixtures::branding(), "INVOICE", &meta).expect("letterhead fits");
        assert!(height > SECTION_GAP);
        assert_eq!(canvas.cursor().y, top + height);
        let page = canvas.pages().next().expect("page");
        assert!(page.contains_text("INVOICE"));
        assert!(page.contains_text("Invoice #: INV-1"));
    }

    #[test]
    fn letterhead_taller_than_a_page_is_an_error() {
        let mut canvas = canvas(60.0);
        let mut branding = fixtures::branding();
        branding.address_lines = (1..=40).map(|i| format!("Unit {i}")).collect();

        let result = draw_header(&mut canvas, &branding, "INVOICE", &[]);
        assert!(matches!(result, Err(RenderError::ContentTooTall { .. })), "{result:?}");
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(canvas.pages().next().map(|p| p.contents.len()), Some(1));
    }
}
