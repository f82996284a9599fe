//! Business documents. Each document type is a [DocumentBuilder]: a fixed
//! script of canvas and table calls that turns an order (or a set of orders)
//! plus [Branding] into a finished document.
//!
//! # Example
//!
//! ```
//! use docket::documents::{Branding, Customer, DocumentBuilder, Invoice, LineItem, Money, Order, OrderStatus, Product};
//! use docket::RenderOptions;
//! use chrono::NaiveDate;
//!
//! let order = Order {
//!     number: "1001".into(),
//!     placed_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
//!     due_on: None,
//!     status: OrderStatus::Confirmed,
//!     customer: Customer { name: "Ada Lovelace".into(), ..Default::default() },
//!     items: vec![LineItem::new(
//!         Product { sku: "A-1".into(), name: "Widget".into(), unit_price: Money::new(12, 50), ..Default::default() },
//!         4,
//!     )],
//!     tax_rate_bps: 825,
//!     shipping: Money::new(5, 0),
//!     discount: Money::ZERO,
//!     notes: None,
//!     cancellation: None,
//! };
//!
//! let rendered = Invoice::new(&order).render(&Branding::new("Acme Supply"), &RenderOptions::default())?;
//! assert_eq!(rendered.page_count, 1);
//! assert!(rendered.bytes.starts_with(b"%PDF-"));
//! # Ok::<(), docket::RenderError>(())
//! ```

use crate::layout::{Canvas, Margins, PageFrame, RenderedDocument, TextMeasurer};
use crate::pagesize::{PageSize, A4};
use crate::units::Mm;
use crate::{RenderError, RenderOptions};
use log::debug;

mod branding;
pub use branding::*;

pub mod format;

mod model;
pub use model::*;

mod parts;

mod cancellation_summary;
pub use cancellation_summary::*;

mod invoice;
pub use invoice::*;

mod purchase_order;
pub use purchase_order::*;

mod revenue_report;
pub use revenue_report::*;

mod shipping_manifest;
pub use shipping_manifest::*;

/// The frame used by most documents: a border 10mm in from the edges of an
/// A4 page, with content inset 5mm from the border
pub fn standard_frame() -> Result<PageFrame, RenderError> {
    PageFrame::within(A4, &Margins::all(Mm(10.0)), Mm(5.0))
}

/// The near-full-page frame used by shipping manifests
pub fn manifest_frame() -> Result<PageFrame, RenderError> {
    PageFrame::within(A4, &Margins::all(Mm(5.0)), Mm(5.0))
}

/// A document type. Implementors provide the layout script in
/// [DocumentBuilder::compose]; [DocumentBuilder::render] runs it on a fresh
/// canvas and returns the encoded document.
pub trait DocumentBuilder {
    /// Title recorded in the document's metadata
    fn title(&self) -> String;

    /// The kind of document, recorded as the metadata subject
    fn subject(&self) -> &'static str;

    fn page_size(&self) -> PageSize {
        A4
    }

    fn frame(&self) -> Result<PageFrame, RenderError> {
        standard_frame()
    }

    /// Draws the document onto `canvas`, which starts on its first page
    fn compose<M: TextMeasurer>(
        &self,
        canvas: &mut Canvas<'_, M>,
        branding: &Branding,
    ) -> Result<(), RenderError>;

    fn render(
        &self,
        branding: &Branding,
        options: &RenderOptions<'_>,
    ) -> Result<RenderedDocument, RenderError> {
        let title = self.title();
        let mut canvas = Canvas::new(self.page_size(), self.frame()?, options)?;
        canvas.info_mut().title(&title).subject(self.subject());
        if options.author.is_none() && !branding.company_name.is_empty() {
            canvas.info_mut().author(&branding.company_name);
        }

        self.compose(&mut canvas, branding)?;
        let rendered = canvas.finish()?;
        debug!("rendered {title}: {} page(s)", rendered.page_count);
        Ok(rendered)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::layout::StandardMetrics;
    use crate::page::Page;
    use chrono::NaiveDate;

    pub(crate) fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    pub(crate) fn branding() -> Branding {
        Branding {
            company_name: "Acme Supply Co".into(),
            address_lines: vec!["12 Foundry Lane".into(), "Leeds LS1 4AB".into()],
            phone: Some("0113 496 0000".into()),
            email: Some("orders@acme.test".into()),
            payment_terms: Some("Payment due within 30 days.".into()),
            footer_note: Some("Thank you for your business.".into()),
            ..Default::default()
        }
    }

    pub(crate) fn product(i: usize) -> Product {
        Product {
            sku: format!("SKU-{i:03}"),
            name: format!("Product {i}"),
            description: "Galvanised steel, boxed".into(),
            unit_price: Money::new(10 + i as i64, 0),
            unit_cost: Money::new(6, 0),
            net_weight_kg: 1.5,
            gross_weight_kg: 1.75,
            hazardous: i % 4 == 0,
            hazard_class: (i % 4 == 0).then(|| "3".to_string()),
            package_type: "Box".into(),
        }
    }

    pub(crate) fn order(number: &str, items: usize, placed_on: NaiveDate) -> Order {
        Order {
            number: number.into(),
            placed_on,
            due_on: Some(placed_on + chrono::Duration::days(30)),
            status: OrderStatus::Confirmed,
            customer: Customer {
                id: "c-1".into(),
                name: "Ada Lovelace".into(),
                company: Some("Analytical Engines Ltd".into()),
                billing: Address {
                    street: vec!["1 Difference Way".into()],
                    city: "London".into(),
                    postal_code: "N1 9GU".into(),
                    country: "United Kingdom".into(),
                    ..Default::default()
                },
                ..Default::default()
            },
            items: (1..=items).map(|i| LineItem::new(product(i), i as u32)).collect(),
            tax_rate_bps: 2000,
            shipping: Money::new(7, 50),
            discount: Money::ZERO,
            notes: None,
            cancellation: None,
        }
    }

    /// Composes `builder` onto a canvas without page numbers, returning the
    /// canvas so its pages can be inspected
    pub(crate) fn compose<B: DocumentBuilder>(builder: &B) -> Canvas<'static, StandardMetrics> {
        let options = RenderOptions {
            page_numbers: false,
            ..Default::default()
        };
        let frame = builder.frame().expect("valid frame");
        let mut canvas = Canvas::new(builder.page_size(), frame, &options).expect("valid canvas");
        builder.compose(&mut canvas, &branding()).expect("document composes");
        canvas
    }

    pub(crate) fn text_on(page: &Page) -> String {
        page.spans().map(|s| s.text.as_str()).collect::<Vec<_>>().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_match_the_page() {
        let standard = standard_frame().expect("valid frame");
        assert_eq!(standard.origin, (Mm(10.0), Mm(10.0)));
        assert_eq!((standard.width, standard.height), (Mm(190.0), Mm(277.0)));
        assert_eq!(standard.content_width(), Mm(180.0));

        let manifest = manifest_frame().expect("valid frame");
        assert_eq!(manifest.origin, (Mm(5.0), Mm(5.0)));
        assert_eq!((manifest.width, manifest.height), (Mm(200.0), Mm(287.0)));
        assert_eq!(manifest.content_width(), Mm(190.0));
    }
}
