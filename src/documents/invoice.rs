use super::parts::{self, SECTION_GAP};
use super::{format, Branding, Delivery, DocumentBuilder, Order};
use crate::layout::{Canvas, Column, DetailBlock, TableSpec, TextMeasurer};
use crate::units::Mm;
use crate::RenderError;
use chrono::NaiveDate;

const HEADERS: [&str; 5] = ["Item", "Description", "Qty", "Unit Price", "Amount"];

fn columns() -> Vec<Column> {
    vec![
        Column::left(30.0),
        Column::left(75.0),
        Column::right(15.0),
        Column::right(30.0),
        Column::right(30.0),
    ]
}

/// An invoice for an order. When a delivery is attached, one page per
/// delivery photo is appended after the invoice itself.
pub struct Invoice<'a> {
    pub order: &'a Order,
    pub number: String,
    pub issued_on: NaiveDate,
    pub delivery: Option<&'a Delivery>,
}

impl<'a> Invoice<'a> {
    /// An invoice numbered after the order and issued the day it was placed
    pub fn new(order: &'a Order) -> Invoice<'a> {
        Invoice {
            order,
            number: format!("INV-{}", order.number),
            issued_on: order.placed_on,
            delivery: None,
        }
    }

    pub fn numbered<S: ToString>(mut self, number: S) -> Self {
        self.number = number.to_string();
        self
    }

    pub fn issued_on(mut self, date: NaiveDate) -> Self {
        self.issued_on = date;
        self
    }

    pub fn with_delivery(mut self, delivery: &'a Delivery) -> Self {
        self.delivery = Some(delivery);
        self
    }

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

impl DocumentBuilder for Invoice<'_> {
    fn title(&self) -> String {
        format!("Invoice {}", self.number)
    }

    fn subject(&self) -> &'static str {
        "Invoice"
    }

    fn compose<M: TextMeasurer>(&self, canvas: &mut Canvas<'_, M>, branding: &Branding) -> Result<(), RenderError> {
        let order = self.order;

        let mut meta = vec![
            ("Invoice #", self.number.clone()),
            ("Order #", order.number.clone()),
            ("Issued", format::date(self.issued_on)),
        ];
        if let Some(due) = order.due_on {
            meta.push(("Due", format::date(due)));
        }
        meta.push(("Status", order.status.to_string()));
        parts::draw_header(canvas, branding, "INVOICE", &meta)?;

        let customer = &order.customer;
        let mut bill_to = customer.address_block(&customer.billing);
        bill_to.extend(customer.email.iter().cloned());
        parts::draw_parties(
            canvas,
            &[
                DetailBlock::new("Bill To", bill_to),
                DetailBlock::new("Ship To", customer.address_block(customer.shipping_address())),
            ],
        )?;

        canvas.draw_table(&self.table(branding))?;
        canvas.inc_y(SECTION_GAP);

        parts::draw_totals(canvas, &parts::order_totals(order, branding))?;
        if let Some(terms) = &branding.payment_terms {
            parts::draw_paragraph(canvas, Some("Payment Terms"), terms, &parts::body())?;
        }
        if let Some(notes) = &order.notes {
            parts::draw_paragraph(canvas, Some("Notes"), notes, &parts::body())?;
        }
        parts::draw_footer(canvas, branding)?;

        if let Some(delivery) = self.delivery {
            parts::append_photo_pages(canvas, &delivery.photos, "Delivery photo");
        }
        Ok(())
    }
}
