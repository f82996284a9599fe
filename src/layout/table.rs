use super::canvas::{Alignment, Canvas, TextStyle};
use super::text::TextMeasurer;
use crate::colour::{colours, Colour};
use crate::font::FontSpec;
use crate::page::RectStyle;
use crate::units::Mm;
use crate::RenderError;
use log::{debug, trace};

/// Column widths may drift from the declared table width by this much
const WIDTH_TOLERANCE: Mm = Mm(0.01);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Column {
    pub width: Mm,
    pub alignment: Alignment,
}

impl Column {
    pub fn new(width: f32, alignment: Alignment) -> Column {
        Column {
            width: Mm(width),
            alignment,
        }
    }

    pub fn left(width: f32) -> Column {
        Column::new(width, Alignment::Left)
    }

    pub fn center(width: f32) -> Column {
        Column::new(width, Alignment::Center)
    }

    pub fn right(width: f32) -> Column {
        Column::new(width, Alignment::Right)
    }
}

/// Colours, fonts and spacing of a table
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TableStyle {
    pub header_fill: Colour,
    pub header_text: Colour,
    pub border_colour: Colour,
    pub border_width: Mm,
    pub header_font: FontSpec,
    pub body_font: FontSpec,
    pub body_text: Colour,
    /// Vertical padding added to every row (and the header band), split
    /// evenly above and below the text
    pub cell_padding: Mm,
    /// Horizontal space kept between cell text and the column edges
    pub cell_inset: Mm,
    /// Gap between the header band and the first row
    pub header_padding: Mm,
    /// Fill for every other body row
    pub stripe: Option<Colour>,
}

impl Default for TableStyle {
    fn default() -> Self {
        TableStyle {
            header_fill: colours::SLATE,
            header_text: colours::WHITE,
            border_colour: colours::BLACK,
            border_width: Mm(0.3),
            header_font: FontSpec::bold(9.0),
            body_font: FontSpec::regular(9.0),
            body_text: colours::BLACK,
            cell_padding: Mm(2.0),
            cell_inset: Mm(1.5),
            header_padding: Mm(0.0),
            stripe: None,
        }
    }
}

/// A table to lay out: its geometry, header labels, and rows of
/// pre-formatted cell text
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    /// The declared total width, which the column widths must sum to
    pub width: Mm,
    pub columns: Vec<Column>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub style: TableStyle,
}

impl TableSpec {
    pub fn new<S: Into<String>>(
        width: Mm,
        columns: Vec<Column>,
        headers: impl IntoIterator<Item = S>,
    ) -> TableSpec {
        TableSpec {
            width,
            columns,
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            style: TableStyle::default(),
        }
    }

    pub fn with_style(mut self, style: TableStyle) -> TableSpec {
        self.style = style;
        self
    }

    pub fn push_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Sum of the column widths
    pub fn column_width(&self) -> Mm {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Checks the header and every row line up with the columns, and that the
    /// columns fill the declared width
    pub fn validate(&self) -> Result<(), RenderError> {
        let columns = self.columns.len();
        if self.headers.len() != columns {
            return Err(RenderError::ColumnMismatch {
                columns,
                what: "the header".to_string(),
                found: self.headers.len(),
            });
        }
        if let Some((i, row)) = self.rows.iter().enumerate().find(|(_, row)| row.len() != columns) {
            return Err(RenderError::ColumnMismatch {
                columns,
                what: format!("row {i}"),
                found: row.len(),
            });
        }

        let actual = self.column_width();
        if (actual - self.width).0.abs() > WIDTH_TOLERANCE.0 {
            return Err(RenderError::WidthMismatch {
                declared: self.width,
                actual,
            });
        }
        Ok(())
    }
}

/// Layout state for one table: the page the open segment is on, where that
/// segment starts, how tall it is so far, and the total height consumed
struct RenderState {
    page: usize,
    segment_top: Mm,
    segment_height: Mm,
    total: Mm,
}

impl<'a, M: TextMeasurer> Canvas<'a, M> {
    /// Lays out a table starting at the cursor, breaking onto new pages as
    /// rows overflow the frame. Rows are never split; the header is drawn
    /// once, above the first row. Leaves the cursor at the table's left edge
    /// below the last row and returns the total height consumed across all
    /// pages. A header band taller than a fresh page is
    /// [RenderError::ContentTooTall].
    pub fn draw_table(&mut self, spec: &TableSpec) -> Result<Mm, RenderError> {
        spec.validate()?;
        let style = &spec.style;
        let left = self.cursor().x;

        let header_height = self.cells_height(&spec.headers, &spec.columns, style, &style.header_font);
        let band = header_height + style.header_padding;
        let fresh = self.frame().fresh_height();
        if band > fresh {
            return Err(RenderError::ContentTooTall {
                height: band,
                available: fresh,
            });
        }

        // the header band must fit, and comes along with the first row when
        // the two fit a page together
        let lead = self.table_lead(spec);
        let y = self.cursor().y;
        if y > self.frame().top()
            && (self.frame().overflows(y, band) || (lead <= fresh && self.frame().overflows(y, lead)))
        {
            debug!("table header moved to a new page");
            self.new_page();
            self.move_to(left, self.frame().top());
        }

        let top = self.cursor().y;
        self.draw_header(spec, left, top, header_height);
        self.move_to(left, top + band);

        let mut state = RenderState {
            page: self.current_page_number(),
            segment_top: top,
            segment_height: band,
            total: band,
        };

        let body = TextStyle::new(style.body_font, style.body_text);
        let body_line = self.measurer().line_height(&style.body_font);

        for (row_index, row) in spec.rows.iter().enumerate() {
            let wrapped = self.wrap_cells(row, &spec.columns, style, &style.body_font);
            let lines = wrapped.iter().map(Vec::len).max().unwrap_or(0);
            let row_height = body_line * lines as f32 + style.cell_padding;

            if row_height > fresh {
                return Err(RenderError::RowTooTall {
                    row: row_index,
                    height: row_height,
                    available: fresh,
                });
            }

            if self.frame().overflows(self.cursor().y, row_height) {
                debug!(
                    "row {row_index} overflows page {}, closing a segment {} tall",
                    state.page, state.segment_height
                );
                self.close_segment(spec, left, &state);
                self.new_page();
                self.move_to(left, self.frame().top());
                state.page = self.current_page_number();
                state.segment_top = self.cursor().y;
                state.segment_height = Mm::ZERO;
            }

            let y = self.cursor().y;
            trace!("row {row_index} at {y} on page {}, {row_height} tall", state.page);

            if let Some(stripe) = style.stripe.filter(|_| row_index % 2 == 1) {
                self.rectangle(left, y, spec.width, row_height, RectStyle::Fill(stripe));
            }

            let mut x = left;
            for (cell_lines, column) in wrapped.iter().zip(spec.columns.iter()) {
                self.draw_cell(cell_lines, column, x, y, style, &body);
                x += column.width;
            }

            self.move_to(left, y + row_height);
            state.segment_height += row_height;
            state.total += row_height;
        }

        self.close_segment(spec, left, &state);
        Ok(state.total)
    }

    /// Height of the header band plus the first row, the least a page must
    /// have left for the table to start on it
    pub fn table_lead(&self, spec: &TableSpec) -> Mm {
        let style = &spec.style;
        let header = self.cells_height(&spec.headers, &spec.columns, style, &style.header_font);
        let first_row = spec
            .rows
            .first()
            .map(|row| self.cells_height(row, &spec.columns, style, &style.body_font))
            .unwrap_or(Mm::ZERO);
        header + style.header_padding + first_row
    }

    fn wrap_cells(
        &self,
        cells: &[String],
        columns: &[Column],
        style: &TableStyle,
        font: &FontSpec,
    ) -> Vec<Vec<String>> {
        cells
            .iter()
            .zip(columns.iter())
            .map(|(cell, column)| {
                let width = (column.width - style.cell_inset * 2.0).max(Mm::ZERO);
                self.measurer().wrap(cell, font, width)
            })
            .collect()
    }

    /// Height of a band of cells: the tallest wrapped cell plus padding
    fn cells_height(&self, cells: &[String], columns: &[Column], style: &TableStyle, font: &FontSpec) -> Mm {
        let lines = self
            .wrap_cells(cells, columns, style, font)
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        self.measurer().line_height(font) * lines as f32 + style.cell_padding
    }

    fn draw_header(&mut self, spec: &TableSpec, left: Mm, top: Mm, height: Mm) {
        let style = &spec.style;
        let text = TextStyle::new(style.header_font, style.header_text);
        let wrapped = self.wrap_cells(&spec.headers, &spec.columns, style, &style.header_font);

        let mut x = left;
        for (lines, column) in wrapped.iter().zip(spec.columns.iter()) {
            self.rectangle(x, top, column.width, height, RectStyle::Fill(style.header_fill));
            self.draw_cell(lines, column, x, top, style, &text);
            x += column.width;
        }
    }

    fn draw_cell(&mut self, lines: &[String], column: &Column, x: Mm, y: Mm, style: &TableStyle, text: &TextStyle) {
        let line_height = self.measurer().line_height(&text.font);
        let inner = (column.width - style.cell_inset * 2.0).max(Mm::ZERO);
        let mut line_y = y + style.cell_padding / 2.0;
        for line in lines.iter() {
            let width = self.measurer().text_width(line, &text.font);
            let line_x = column.alignment.offset(x + style.cell_inset, inner, width);
            self.text_run(line_x, line_y, line, text);
            line_y += line_height;
        }
    }

    /// Strokes the outline of the open segment and the rules between its
    /// columns, for the height drawn on this page only
    fn close_segment(&mut self, spec: &TableSpec, left: Mm, state: &RenderState) {
        let style = &spec.style;
        let top = state.segment_top;
        let bottom = top + state.segment_height;

        self.rectangle(
            left,
            top,
            spec.width,
            state.segment_height,
            RectStyle::Stroke {
                colour: style.border_colour,
                width: style.border_width,
            },
        );

        let mut x = left;
        for column in spec.columns.iter().take(spec.columns.len().saturating_sub(1)) {
            x += column.width;
            self.line(x, top, x, bottom, style.border_width, style.border_colour);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::canvas::tests::grid_canvas;
    use crate::layout::frame::PageFrame;
    use crate::page::{Page, RectLayout};
    use proptest::prelude::*;

    fn frame(height: f32) -> PageFrame {
        PageFrame::new((Mm(0.0), Mm(0.0)), Mm(100.0), Mm(height), Mm(0.0), Mm(0.0)).expect("valid frame")
    }

    fn grid_style() -> TableStyle {
        TableStyle {
            cell_padding: Mm(2.0),
            cell_inset: Mm(0.0),
            header_padding: Mm(0.0),
            ..Default::default()
        }
    }

    fn three_columns() -> TableSpec {
        TableSpec::new(
            Mm(90.0),
            vec![Column::left(30.0), Column::center(30.0), Column::right(30.0)],
            ["H1", "H2", "H3"],
        )
        .with_style(grid_style())
    }

    /// Stroked rectangles other than the page border
    fn segments(page: &Page) -> Vec<RectLayout> {
        page.rects()
            .filter(|r| matches!(r.style, RectStyle::Stroke { .. }) && Some(r.rect) != page.border)
            .cloned()
            .collect()
    }

    #[test]
    fn single_row_table_fits_one_page() {
        let mut canvas = grid_canvas(frame(50.0));
        let mut spec = three_columns().with_style(TableStyle {
            header_padding: Mm(1.0),
            ..grid_style()
        });
        spec.push_row(["a", "b", "c"]);

        let total = canvas.draw_table(&spec).expect("table fits");
        // header 4 + 2, padding 1, row 4 + 2
        assert_eq!(total, Mm(13.0));
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(canvas.cursor().y, Mm(13.0));
        assert_eq!(canvas.cursor().x, Mm(0.0));

        let page = canvas.pages().next().expect("page");
        let outline = segments(page);
        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].rect.height(), Mm(13.0));
        assert_eq!(page.lines().count(), 2);
        assert_eq!(page.rects().filter(|r| matches!(r.style, RectStyle::Fill(_))).count(), 3);
    }

    #[test]
    fn cells_follow_column_alignment() {
        let mut canvas = grid_canvas(frame(50.0));
        let mut spec = three_columns();
        spec.push_row(["ab", "ab", "ab"]);
        canvas.draw_table(&spec).expect("table fits");

        let page = canvas.pages().next().expect("page");
        let xs: Vec<Mm> = page.spans().filter(|s| s.text == "ab").map(|s| s.coords.0).collect();
        assert_eq!(xs, vec![Mm(0.0), Mm(43.0), Mm(86.0)]);
    }

    #[test]
    fn overflowing_rows_continue_on_a_new_page() {
        let mut canvas = grid_canvas(frame(50.0));
        let mut spec = three_columns();
        for i in 0..12 {
            spec.push_row([format!("r{i}"), "x".into(), "y".into()]);
        }

        let total = canvas.draw_table(&spec).expect("table paginates");
        assert_eq!(total, Mm(6.0 + 12.0 * 6.0));
        assert_eq!(canvas.page_count(), 2);

        let pages: Vec<&Page> = canvas.pages().collect();
        // header plus seven rows fit the first page
        assert_eq!(segments(pages[0])[0].rect.height(), Mm(48.0));
        assert!(pages[0].contains_text("r6"));
        assert!(!pages[0].contains_text("r7"));

        assert!(pages[1].border.is_some());
        assert_eq!(pages[1].rects().next().map(|r| r.rect), pages[1].border);
        assert!(!pages[1].contains_text("H1"));
        assert!(pages[1].contains_text("r7"));
        let continued = segments(pages[1]);
        assert_eq!(continued.len(), 1);
        assert_eq!(continued[0].rect.y1, Mm(0.0));
        assert_eq!(continued[0].rect.height(), Mm(30.0));
        assert_eq!(canvas.cursor().y, Mm(30.0));
    }

    fn tall_row_table() -> TableSpec {
        let mut spec = TableSpec::new(Mm(10.0), vec![Column::left(10.0)], ["H"]).with_style(grid_style());
        let eleven_lines = (1..=11).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        spec.push_row([eleven_lines]);
        spec
    }

    #[test]
    fn exact_fit_does_not_break() {
        // header 6 plus a row of 11 lines (46) exactly fills 52
        let mut canvas = grid_canvas(frame(52.0));
        let total = canvas.draw_table(&tall_row_table()).expect("fits exactly");
        assert_eq!(total, Mm(52.0));
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn any_overflow_breaks_exactly_once() {
        let mut canvas = grid_canvas(frame(51.75));
        let total = canvas.draw_table(&tall_row_table()).expect("fits a fresh page");
        assert_eq!(total, Mm(52.0));
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn row_taller_than_a_page_is_an_error() {
        let mut canvas = grid_canvas(frame(40.0));
        let err = canvas.draw_table(&tall_row_table()).expect_err("row cannot fit");
        match err {
            RenderError::RowTooTall { row, height, available } => {
                assert_eq!(row, 0);
                assert_eq!(height, Mm(46.0));
                assert_eq!(available, Mm(40.0));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn header_moves_with_the_first_row() {
        let mut canvas = grid_canvas(frame(50.0));
        canvas.move_to(Mm(0.0), Mm(42.0));
        let mut spec = three_columns();
        spec.push_row(["a", "b", "c"]);
        let total = canvas.draw_table(&spec).expect("table fits");
        assert_eq!(total, Mm(12.0));
        assert_eq!(canvas.page_count(), 2);
        let pages: Vec<&Page> = canvas.pages().collect();
        assert!(!pages[0].contains_text("H1"));
        assert!(pages[1].contains_text("H1"));
    }

    #[test]
    fn header_breaks_alone_when_it_cannot_keep_its_first_row() {
        // header 6 plus a 46 row needs 52, more than the 50 a page has
        let mut canvas = grid_canvas(frame(50.0));
        canvas.move_to(Mm(0.0), Mm(48.0));
        let total = canvas.draw_table(&tall_row_table()).expect("row fits a fresh page");
        assert_eq!(total, Mm(52.0));
        assert_eq!(canvas.page_count(), 3);

        let pages: Vec<&Page> = canvas.pages().collect();
        for page in pages.iter() {
            for r in page.rects() {
                assert!(r.rect.y2 <= Mm(50.0), "ink below the frame on page {}: {:?}", page.number, r.rect);
            }
        }
        assert!(segments(pages[0]).is_empty());
        assert!(pages[1].contains_text("H"));
        assert_eq!(segments(pages[1])[0].rect.height(), Mm(6.0));
        assert!(pages[2].contains_text("11"));
    }

    #[test]
    fn header_taller_than_a_page_is_an_error() {
        let mut canvas = grid_canvas(frame(20.0));
        let ten_lines = (1..=10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut spec = TableSpec::new(Mm(10.0), vec![Column::left(10.0)], [ten_lines]).with_style(grid_style());
        spec.push_row(["a"]);

        match canvas.draw_table(&spec) {
            Err(RenderError::ContentTooTall { height, available }) => {
                assert_eq!(height, Mm(42.0));
                assert_eq!(available, Mm(20.0));
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(canvas.pages().next().map(|p| p.contents.len()), Some(1));
    }

    #[test]
    fn lead_covers_the_header_and_first_row() {
        let canvas = grid_canvas(frame(50.0));
        let mut spec = three_columns().with_style(TableStyle {
            header_padding: Mm(1.0),
            ..grid_style()
        });
        assert_eq!(canvas.table_lead(&spec), Mm(7.0));
        spec.push_row(["a\nb", "c", "d"]);
        spec.push_row(["a\nb\nc", "d", "e"]);
        assert_eq!(canvas.table_lead(&spec), Mm(17.0));
    }

    #[test]
    fn striped_rows_alternate() {
        let mut canvas = grid_canvas(frame(50.0));
        let mut spec = three_columns().with_style(TableStyle {
            stripe: Some(colours::LIGHT_GREY),
            ..grid_style()
        });
        for _ in 0..4 {
            spec.push_row(["a", "b", "c"]);
        }
        canvas.draw_table(&spec).expect("table fits");
        let page = canvas.pages().next().expect("page");
        let stripes = page
            .rects()
            .filter(|r| r.style == RectStyle::Fill(colours::LIGHT_GREY))
            .count();
        assert_eq!(stripes, 2);
    }

    #[test]
    fn mismatched_cells_are_rejected() {
        let mut canvas = grid_canvas(frame(50.0));
        let spec = TableSpec::new(Mm(60.0), vec![Column::left(30.0), Column::left(30.0)], ["only one"]);
        assert!(matches!(
            canvas.draw_table(&spec),
            Err(RenderError::ColumnMismatch { columns: 2, found: 1, .. })
        ));

        let mut spec = three_columns();
        spec.push_row(["a", "b", "c"]);
        spec.push_row(["a", "b"]);
        match canvas.draw_table(&spec) {
            Err(RenderError::ColumnMismatch { what, found, .. }) => {
                assert_eq!(what, "row 1");
                assert_eq!(found, 2);
            }
            other => panic!("unexpected result {other:?}"),
        }
        // nothing was drawn
        assert_eq!(canvas.pages().next().map(|p| p.contents.len()), Some(1));
    }

    #[test]
    fn widths_must_fill_the_table() {
        let spec = TableSpec::new(Mm(100.0), vec![Column::left(30.0), Column::left(60.0)], ["a", "b"]);
        assert!(matches!(
            spec.validate(),
            Err(RenderError::WidthMismatch { .. })
        ));
    }

    proptest! {
        #[test]
        fn declared_width_matches_column_sum(widths in prop::collection::vec(1.0f32..60.0, 1..10)) {
            let columns: Vec<Column> = widths.iter().map(|w| Column::left(*w)).collect();
            let headers: Vec<String> = (0..columns.len()).map(|i| format!("c{i}")).collect();
            let total: Mm = columns.iter().map(|c| c.width).sum();

            let spec = TableSpec::new(total, columns.clone(), headers.clone());
            prop_assert!(spec.validate().is_ok());

            let spec = TableSpec::new(total + Mm(1.0), columns, headers);
            let is_width_mismatch = matches!(spec.validate(), Err(RenderError::WidthMismatch { .. }));
            prop_assert!(is_width_mismatch);
        }
    }
}
