use super::parts::{self, SECTION_GAP};
use super::{format, Branding, DocumentBuilder, Order};
use crate::layout::{Canvas, Column, DetailBlock, TableSpec, TextMeasurer};
use crate::units::Mm;
use crate::RenderError;

const HEADERS: [&str; 5] = ["SKU", "Description", "Qty", "Price", "Total"];

fn columns() -> Vec<Column> {
    vec![
        Column::left(30.0),
        Column::left(80.0),
        Column::right(20.0),
        Column::right(25.0),
        Column::right(25.0),
    ]
}

/// A purchase order: what was ordered, from whom, and where it ships
pub struct PurchaseOrder<'a> {
    pub order: &'a Order,
}

impl<'a> PurchaseOrder<'a> {
    pub fn new(order: &'a Order) -> PurchaseOrder<'a> {
        PurchaseOrder { order }
    }

    /// The product table, one row per line item
    pub fn table(&self, branding: &Branding) -> TableSpec {
        let money = |amount| format::currency(amount, &branding.currency_symbol);
        let mut table = TableSpec::new(Mm(180.0), columns(), HEADERS).with_style(parts::table_style(branding));
        for item in self.order.items.iter() {
            table.push_row([
                item.product.sku.clone(),
                item.describe(),
                format::quantity(item.quantity),
                money(item.price()),
                money(item.total()),
            ]);
        }
        table
    }
}

impl DocumentBuilder for PurchaseOrder<'_> {
    fn title(&self) -> String {
        format!("Purchase Order {}", self.order.number)
    }

    fn subject(&self) -> &'static str {
        "Purchase Order"
    }

    fn compose<M: TextMeasurer>(&self, canvas: &mut Canvas<'_, M>, branding: &Branding) -> Result<(), RenderError> {
        let order = self.order;

        parts::draw_header(
            canvas,
            branding,
            "PURCHASE ORDER",
            &[
                ("PO #", order.number.clone()),
                ("Date", format::date(order.placed_on)),
                ("Status", order.status.to_string()),
            ],
        )?;

        let customer = &order.customer;
        parts::draw_parties(
            canvas,
            &[
                DetailBlock::new("Vendor", parts::company_lines(branding)),
                DetailBlock::new("Ship To", customer.address_block(customer.shipping_address())),
            ],
        )?;

        canvas.draw_table(&self.table(branding))?;
        canvas.inc_y(SECTION_GAP);

        parts::draw_totals(canvas, &parts::order_totals(order, branding))?;
        if let Some(notes) = &order.notes {
            parts::draw_paragraph(canvas, Some("Notes"), notes, &parts::body())?;
        }
        parts::draw_footer(canvas, branding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::fixtures::{self, compose, day, text_on};

    #[test]
    fn column_widths_fill_the_frame() {
        let order = fixtures::order("PO-1", 2, day(4));
        let table = PurchaseOrder::new(&order).table(&fixtures::branding());
        assert!(table.validate().is_ok());
        assert_eq!(table.headers, HEADERS);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][4], "$24.00");
    }

    #[test]
    fn composes_a_single_page() {
        let mut order = fixtures::order("PO-7", 3, day(4));
        order.notes = Some("Deliver to the loading bay.".into());
        let canvas = compose(&PurchaseOrder::new(&order));
        assert_eq!(canvas.page_count(), 1);

        let page = canvas.pages().next().expect("page");
        let text = text_on(page);
        for expected in [
            "PURCHASE ORDER",
            "PO #: PO-7",
            "Date: 04 Mar 2024",
            "Vendor",
            "Ship To",
            "SKU-003",
            "Subtotal",
            "Total",
            "Deliver to the loading bay.",
            "Thank you for your business.",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in\n{text}");
        }
    }

    #[test]
    fn long_orders_run_onto_more_pages() {
        let order = fixtures::order("PO-8", 60, day(4));
        let canvas = compose(&PurchaseOrder::new(&order));
        assert!(canvas.page_count() > 1);
        let pages: Vec<_> = canvas.pages().collect();
        // the table header only appears on the first page
        assert!(text_on(pages[0]).contains("Description"));
        assert!(!text_on(pages[1]).contains("Description"));
        assert!(text_on(pages[pages.len() - 1]).contains("Acme Supply Co"));
    }
}
