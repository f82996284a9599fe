use chrono::NaiveDate;
use docket::documents::{
    Address, Branding, Customer, Delivery, DocumentBuilder, Invoice, LineItem, Money, Order, OrderStatus, Product,
};
use docket::{Colour, ImageSource, RenderOptions};

fn main() {
    env_logger::init();

    let branding = Branding {
        company_name: "Acme Supply Co".into(),
        address_lines: vec!["12 Foundry Lane".into(), "Leeds LS1 4AB".into()],
        phone: Some("0113 496 0000".into()),
        email: Some("accounts@acme.test".into()),
        website: Some("acme.test".into()),
        accent: Colour::from_hex("#2F4A6D").expect("valid colour"),
        payment_terms: Some("Payment is due within 30 days of the invoice date.".into()),
        footer_note: Some("Thank you for your business.".into()),
        ..Default::default()
    };

    let items = (1..=40)
        .map(|i| {
            LineItem::new(
                Product {
                    sku: format!("AC-{i:04}"),
                    name: format!("Part {i}"),
                    description: lipsum::lipsum_words(6 + i % 10),
                    unit_price: Money::new(4 + (i as i64 % 7) * 3, 99),
                    ..Default::default()
                },
                1 + i as u32 % 5,
            )
        })
        .collect();

    let placed_on = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date");
    let order = Order {
        number: "10442".into(),
        placed_on,
        due_on: Some(placed_on + chrono::Duration::days(30)),
        status: OrderStatus::Delivered,
        customer: Customer {
            name: "Ada Lovelace".into(),
            company: Some("Analytical Engines Ltd".into()),
            email: Some("ada@engines.test".into()),
            billing: Address {
                street: vec!["1 Difference Way".into()],
                city: "London".into(),
                postal_code: "N1 9GU".into(),
                country: "United Kingdom".into(),
                ..Default::default()
            },
            ..Default::default()
        },
        items,
        tax_rate_bps: 2000,
        shipping: Money::new(12, 0),
        discount: Money::new(25, 0),
        notes: Some(lipsum::lipsum(60)),
        cancellation: None,
    };

    // no resolver is configured, so this photo renders as a placeholder page
    let delivery = Delivery {
        carrier: "Northern Freight".into(),
        photos: vec![ImageSource::Url("https://cdn.acme.test/deliveries/10442.jpg".into())],
        ..Default::default()
    };

    let rendered = Invoice::new(&order)
        .with_delivery(&delivery)
        .render(&branding, &RenderOptions::default())
        .expect("can render invoice");
    println!("rendered {} pages", rendered.page_count);

    std::fs::write("invoice.pdf", rendered.bytes).unwrap();
}
