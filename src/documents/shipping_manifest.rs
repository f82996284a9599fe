use super::parts::{self, SECTION_GAP};
use super::{format, manifest_frame, Branding, Delivery, DocumentBuilder, Order};
use crate::colour::colours;
use crate::layout::{Alignment, Canvas, Column, DetailBlock, PageFrame, TableSpec, TextMeasurer};
use crate::units::Mm;
use crate::RenderError;

const HEADERS: [&str; 9] = [
    "Units",
    "HM",
    "Type",
    "Description",
    "Class",
    "SKU",
    "Net Weight",
    "Gross NHM",
    "Gross HM",
];

const CERTIFICATION: &str = "This is to certify that the above-named materials are properly \
classified, described, packaged, marked and labeled, and are in proper condition for \
transportation according to the applicable regulations of the Department of Transportation.";

fn columns() -> Vec<Column> {
    vec![
        Column::right(14.0),
        Column::center(10.0),
        Column::left(18.0),
        Column::left(50.0),
        Column::center(14.0),
        Column::left(24.0),
        Column::right(20.0),
        Column::right(20.0),
        Column::right(20.0),
    ]
}

/// Weight totals for a shipment, split by hazardous material
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ShipmentWeights {
    pub units: u32,
    pub net_kg: f64,
    /// Gross weight of non-hazardous material
    pub gross_nhm_kg: f64,
    /// Gross weight of hazardous material
    pub gross_hm_kg: f64,
}

impl ShipmentWeights {
    pub fn gross_kg(&self) -> f64 {
        self.gross_nhm_kg + self.gross_hm_kg
    }
}

/// A shipping manifest (bill of lading) for a dispatched order, drawn in a
/// near-full-page frame, followed by one page per delivery photo
pub struct ShippingManifest<'a> {
    pub order: &'a Order,
    pub delivery: &'a Delivery,
}

impl<'a> ShippingManifest<'a> {
    pub fn new(order: &'a Order, delivery: &'a Delivery) -> ShippingManifest<'a> {
        ShippingManifest { order, delivery }
    }

    pub fn weights(&self) -> ShipmentWeights {
        self.order
            .items
            .iter()
            .fold(ShipmentWeights::default(), |mut totals, item| {
                totals.units += item.quantity;
                totals.net_kg += item.net_weight_kg();
                if item.product.hazardous {
                    totals.gross_hm_kg += item.gross_weight_kg();
                } else {
                    totals.gross_nhm_kg += item.gross_weight_kg();
                }
                totals
            })
    }

    fn has_hazardous_material(&self) -> bool {
        self.order.items.iter().any(|item| item.product.hazardous)
    }

    pub fn table(&self, branding: &Branding) -> TableSpec {
        let mut table = TableSpec::new(Mm(190.0), columns(), HEADERS).with_style(parts::table_style(branding));
        for item in self.order.items.iter() {
            let product = &item.product;
            let gross = format::weight(item.gross_weight_kg());
            let (gross_nhm, gross_hm) = if product.hazardous {
                (String::new(), gross)
            } else {
                (gross, String::new())
            };
            table.push_row([
                format::quantity(item.quantity),
                if product.hazardous { "X".to_string() } else { String::new() },
                product.package_type.clone(),
                item.describe(),
                product.hazard_class.clone().unwrap_or_default(),
                product.sku.clone(),
                format::weight(item.net_weight_kg()),
                gross_nhm,
                gross_hm,
            ]);
        }
        table
    }

    fn carrier_lines(&self) -> Vec<String> {
        let delivery = self.delivery;
        let mut lines = vec![delivery.carrier.clone()];
        if !delivery.tracking_number.is_empty() {
            lines.push(format!("Tracking: {}", delivery.tracking_number));
        }
        if let Some(delivered) = delivery.delivered_on {
            lines.push(format!("Delivered: {}", format::date(delivered)));
        }
        if let Some(received_by) = &delivery.received_by {
            lines.push(format!("Received by: {received_by}"));
        }
        lines
    }

    fn draw_signature<M: TextMeasurer>(&self, canvas: &mut Canvas<'_, M>) -> Result<(), RenderError> {
        let box_height = Mm(20.0);
        let line = canvas.measurer().line_height(&parts::strong().font);
        canvas.ensure_space(line * 2.0 + box_height + Mm(2.0))?;

        let width = canvas.frame().content_width();
        canvas.draw_multiline_block("Receiver Signature", width, &parts::strong(), Alignment::Left);
        if let Some(signature) = &self.delivery.signature {
            let (_, height) = canvas.draw_image_fit(signature, Mm(60.0), box_height, Alignment::Left);
            canvas.inc_y(box_height - height);
        } else {
            canvas.inc_y(box_height);
        }
        canvas.draw_rule(Mm(60.0), Mm(0.3), colours::BLACK);
        canvas.inc_y(Mm(1.0));
        let name = self.delivery.received_by.clone().unwrap_or_default();
        canvas.draw_multiline_block(&name, Mm(60.0), &parts::body(), Alignment::Left);
        canvas.inc_y(SECTION_GAP);
        Ok(())
    }
}

impl DocumentBuilder for ShippingManifest<'_> {
    fn title(&self) -> String {
        format!("Shipping Manifest {}", self.order.number)
    }

    fn subject(&self) -> &'static str {
        "Shipping Manifest"
    }

    fn frame(&self) -> Result<PageFrame, RenderError> {
        manifest_frame()
    }

    fn compose<M: TextMeasurer>(&self, canvas: &mut Canvas<'_, M>, branding: &Branding) -> Result<(), RenderError> {
        let order = self.order;
        let delivery = self.delivery;

        let mut meta = vec![("Order #", order.number.clone())];
        if let Some(shipped) = delivery.shipped_on {
            meta.push(("Shipped", format::date(shipped)));
        }
        meta.push(("Carrier", delivery.carrier.clone()));
        if !delivery.tracking_number.is_empty() {
            meta.push(("Tracking #", delivery.tracking_number.clone()));
        }
        parts::draw_header(canvas, branding, "SHIPPING MANIFEST", &meta)?;

        let customer = &order.customer;
        let mut consignee = customer.address_block(customer.shipping_address());
        consignee.extend(customer.phone.iter().map(|phone| format!("Tel: {phone}")));
        parts::draw_parties(
            canvas,
            &[
                DetailBlock::new("Shipper", parts::company_lines(branding)),
                DetailBlock::new("Consignee", consignee),
                DetailBlock::new("Carrier", self.carrier_lines()),
            ],
        )?;

        canvas.draw_table(&self.table(branding))?;
        canvas.inc_y(SECTION_GAP);

        let weights = self.weights();
        parts::draw_totals(
            canvas,
            &[
                ("Total units".to_string(), format::quantity(weights.units)),
                ("Net weight".to_string(), format::weight(weights.net_kg)),
                ("Gross weight (NHM)".to_string(), format::weight(weights.gross_nhm_kg)),
                ("Gross weight (HM)".to_string(), format::weight(weights.gross_hm_kg)),
                ("Total gross weight".to_string(), format::weight(weights.gross_kg())),
            ],
        )?;

        if self.has_hazardous_material() {
            parts::draw_paragraph(
                canvas,
                Some("Hazardous Materials Certification"),
                CERTIFICATION,
                &parts::small(),
            )?;
        }
        self.draw_signature(canvas)?;
        parts::draw_footer(canvas, branding)?;

        parts::append_photo_pages(canvas, &delivery.photos, "Delivery photo");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::fixtures::{self, compose, day, text_on};
    use crate::image::ImageSource;

    fn delivery() -> Delivery {
        Delivery {
            carrier: "Northern Freight".into(),
            tracking_number: "NF123456".into(),
            shipped_on: Some(day(5)),
            delivered_on: Some(day(7)),
            received_by: Some("J. Smith".into()),
            signature: Some(ImageSource::Url("https://cdn.test/sig.png".into())),
            photos: vec![ImageSource::Url("https://cdn.test/door.jpg".into())],
        }
    }

    #[test]
    fn column_widths_fill_the_wider_frame() {
        let order = fixtures::order("5001", 4, day(5));
        let delivery = delivery();
        let manifest = ShippingManifest::new(&order, &delivery);
        let table = manifest.table(&fixtures::branding());
        assert!(table.validate().is_ok());
        assert_eq!(table.width, manifest.frame().expect("valid frame").content_width());
    }

    #[test]
    fn hazardous_weights_are_split_out() {
        // product 4 is hazardous, 4 units at 1.75kg gross
        let order = fixtures::order("5001", 4, day(5));
        let delivery = delivery();
        let manifest = ShippingManifest::new(&order, &delivery);
        let weights = manifest.weights();
        assert_eq!(weights.units, 10);
        assert!((weights.net_kg - 15.0).abs() < 1e-9);
        assert!((weights.gross_hm_kg - 7.0).abs() < 1e-9);
        assert!((weights.gross_nhm_kg - 10.5).abs() < 1e-9);

        let table = manifest.table(&fixtures::branding());
        assert_eq!(table.rows[3][1], "X");
        assert_eq!(table.rows[3][4], "3");
        assert_eq!(table.rows[3][7], "");
        assert_eq!(table.rows[3][8], "7.00 kg");
        assert_eq!(table.rows[0][1], "");
    }

    #[test]
    fn composes_manifest_and_photo_page() {
        let order = fixtures::order("5001", 4, day(5));
        let delivery = delivery();
        let canvas = compose(&ShippingManifest::new(&order, &delivery));
        assert_eq!(canvas.page_count(), 2);

        let pages: Vec<_> = canvas.pages().collect();
        assert_eq!(pages[0].border, Some(manifest_frame().expect("valid frame").border()));
        let text = text_on(pages[0]);
        for expected in [
            "SHIPPING MANIFEST",
            "Consignee",
            "Tracking: NF123456",
            "Description",
            "Total gross weight",
            "17.50 kg",
            "Hazardous Materials Certification",
            "Receiver Signature",
            "J. Smith",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in\n{text}");
        }
        assert!(text_on(pages[1]).contains("Delivery photo 1 of 1"));
    }
}
