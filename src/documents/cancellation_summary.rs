use super::parts::{self, SECTION_GAP};
use super::{format, Branding, Cancellation, DocumentBuilder, Money, Order, ReportPeriod};
use crate::layout::{Canvas, Column, TableSpec, TextMeasurer};
use crate::units::Mm;
use crate::RenderError;

const HEADERS: [&str; 5] = ["Order #", "Date", "Customer", "Reason", "Refunded"];

fn columns() -> Vec<Column> {
    vec![
        Column::left(25.0),
        Column::left(25.0),
        Column::left(45.0),
        Column::left(55.0),
        Column::right(30.0),
    ]
}

/// The orders cancelled during a period: why, and what was refunded
pub struct CancellationSummary<'a> {
    pub orders: &'a [Order],
    pub period: ReportPeriod,
}

impl<'a> CancellationSummary<'a> {
    pub fn new(orders: &'a [Order], period: ReportPeriod) -> CancellationSummary<'a> {
        CancellationSummary { orders, period }
    }

    /// Cancelled orders with their cancellation, in the order they were
    /// cancelled
    pub fn included(&self) -> Vec<(&'a Order, &'a Cancellation)> {
        let mut cancelled: Vec<(&Order, &Cancellation)> = self
            .orders
            .iter()
            .filter_map(|order| order.cancellation.as_ref().map(|c| (order, c)))
            .filter(|(_, c)| self.period.contains(c.cancelled_on))
            .collect();
        cancelled.sort_by(|(a, ac), (b, bc)| (ac.cancelled_on, &a.number).cmp(&(bc.cancelled_on, &b.number)));
        cancelled
    }

    pub fn total_refunded(&self) -> Money {
        self.included().iter().map(|(_, c)| c.refunded).sum()
    }

    /// Revenue the cancelled orders would have brought in
    pub fn lost_revenue(&self) -> Money {
        self.included().iter().map(|(order, _)| order.totals().revenue()).sum()
    }

    pub fn table(&self, branding: &Branding) -> TableSpec {
        let mut table = TableSpec::new(Mm(180.0), columns(), HEADERS).with_style(parts::table_style(branding));
        for (order, cancellation) in self.included() {
            table.push_row([
                order.number.clone(),
                format::date(cancellation.cancelled_on),
                order.customer.name.clone(),
                cancellation.reason.clone(),
                format::currency(cancellation.refunded, &branding.currency_symbol),
            ]);
        }
        table
    }
}

impl DocumentBuilder for CancellationSummary<'_> {
    fn title(&self) -> String {
        format!(
            "Cancellation Summary {} to {}",
            format::date(self.period.from),
            format::date(self.period.to)
        )
    }

    fn subject(&self) -> &'static str {
        "Cancellation Summary"
    }

    fn compose<M: TextMeasurer>(&self, canvas: &mut Canvas<'_, M>, branding: &Branding) -> Result<(), RenderError> {
        let count = self.included().len();
        parts::draw_header(
            canvas,
            branding,
            "CANCELLATIONS",
            &[
                ("From", format::date(self.period.from)),
                ("To", format::date(self.period.to)),
            ],
        )?;

        if count == 0 {
            parts::draw_paragraph(canvas, None, "No orders were cancelled in this period.", &parts::body())?;
            return parts::draw_footer(canvas, branding);
        }

        canvas.draw_table(&self.table(branding))?;
        canvas.inc_y(SECTION_GAP);

        let money = |amount| format::currency(amount, &branding.currency_symbol);
        parts::draw_totals(
            canvas,
            &[
                ("Cancelled orders".to_string(), count.to_string()),
                ("Lost revenue".to_string(), money(self.lost_revenue())),
                ("Total refunded".to_string(), money(self.total_refunded())),
            ],
        )?;
        parts::draw_footer(canvas, branding)
    }
}
