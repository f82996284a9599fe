//! The business values documents are built from. These are plain data,
//! looked up and validated by the caller before a render starts.

use crate::image::ImageSource;
use chrono::NaiveDate;
use derive_more::{Add, AddAssign, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An amount of money in minor units (cents), so arithmetic is exact
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Sum,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Whole units plus cents, e.g. `Money::new(12, 50)` is 12.50
    pub fn new(units: i64, cents: i64) -> Money {
        Money(units * 100 + cents)
    }

    pub fn minor(self) -> i64 {
        self.0
    }

    pub fn times(self, quantity: u32) -> Money {
        Money(self.0 * quantity as i64)
    }

    /// `bps` basis points of this amount, rounded half away from zero
    pub fn percent_bps(self, bps: u32) -> Money {
        let scaled = self.0.unsigned_abs() as u128 * bps as u128;
        let rounded = ((scaled + 5_000) / 10_000) as i64;
        Money(if self.0 < 0 { -rounded } else { rounded })
    }

    /// This amount as a fraction of `whole`, or `None` when `whole` is zero
    pub fn ratio_of(self, whole: Money) -> Option<f64> {
        (whole.0 != 0).then(|| self.0 as f64 / whole.0 as f64)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: Vec<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// The address as printable lines, skipping anything left blank
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .street
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();

        let locality = [self.region.as_str(), self.postal_code.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        let city_line = match (self.city.is_empty(), locality.is_empty()) {
            (false, false) => format!("{}, {}", self.city, locality),
            (false, true) => self.city.clone(),
            (true, _) => locality,
        };
        if !city_line.is_empty() {
            lines.push(city_line);
        }
        if !self.country.is_empty() {
            lines.push(self.country.clone());
        }
        lines
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub billing: Address,
    pub shipping: Option<Address>,
}

impl Customer {
    /// The shipping address, falling back to billing
    pub fn shipping_address(&self) -> &Address {
        self.shipping.as_ref().unwrap_or(&self.billing)
    }

    /// Name, company, and the given address as printable lines
    pub fn address_block(&self, address: &Address) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        lines.extend(self.company.iter().cloned());
        lines.extend(address.lines());
        lines
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub unit_price: Money,
    pub unit_cost: Money,
    pub net_weight_kg: f64,
    pub gross_weight_kg: f64,
    /// Whether the product ships as hazardous material
    pub hazardous: bool,
    pub hazard_class: Option<String>,
    /// Packaging, e.g. "Box" or "Drum"
    pub package_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product: Product,
    pub quantity: u32,
    /// Overrides the product's list price for this order
    #[serde(default)]
    pub unit_price: Option<Money>,
}

impl LineItem {
    pub fn new(product: Product, quantity: u32) -> LineItem {
        LineItem {
            product,
            quantity,
            unit_price: None,
        }
    }

    pub fn price(&self) -> Money {
        self.unit_price.unwrap_or(self.product.unit_price)
    }

    pub fn total(&self) -> Money {
        self.price().times(self.quantity)
    }

    pub fn cost(&self) -> Money {
        self.product.unit_cost.times(self.quantity)
    }

    pub fn net_weight_kg(&self) -> f64 {
        self.product.net_weight_kg * self.quantity as f64
    }

    pub fn gross_weight_kg(&self) -> f64 {
        self.product.gross_weight_kg * self.quantity as f64
    }

    /// Name and description for a description cell
    pub fn describe(&self) -> String {
        if self.product.description.trim().is_empty() {
            self.product.name.clone()
        } else {
            format!("{}\n{}", self.product.name, self.product.description)
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Refunded",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cancellation {
    pub cancelled_on: NaiveDate,
    pub reason: String,
    pub refunded: Money,
}

/// An order's computed money columns
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl Totals {
    /// Subtotal less discount: what the goods actually sold for
    pub fn revenue(&self) -> Money {
        self.subtotal - self.discount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub number: String,
    pub placed_on: NaiveDate,
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
    #[serde(default)]
    pub status: OrderStatus,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    /// Tax rate in basis points (825 is 8.25%)
    #[serde(default)]
    pub tax_rate_bps: u32,
    #[serde(default)]
    pub shipping: Money,
    #[serde(default)]
    pub discount: Money,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub cancellation: Option<Cancellation>,
}

impl Order {
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::total).sum()
    }

    /// Tax is charged on the discounted subtotal; the discount never exceeds
    /// the subtotal
    pub fn totals(&self) -> Totals {
        let subtotal = self.subtotal();
        let discount = self.discount.min(subtotal).max(Money::ZERO);
        let tax = (subtotal - discount).percent_bps(self.tax_rate_bps);
        Totals {
            subtotal,
            discount,
            tax,
            shipping: self.shipping,
            total: subtotal - discount + tax + self.shipping,
        }
    }

    pub fn cost_of_goods(&self) -> Money {
        self.items.iter().map(LineItem::cost).sum()
    }

    pub fn units(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled || self.cancellation.is_some()
    }
}

/// Details of a shipment, supplied once it has been dispatched or delivered
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delivery {
    pub carrier: String,
    pub tracking_number: String,
    pub shipped_on: Option<NaiveDate>,
    pub delivered_on: Option<NaiveDate>,
    pub received_by: Option<String>,
    pub signature: Option<ImageSource>,
    pub photos: Vec<ImageSource>,
}

/// An inclusive range of days a report covers
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportPeriod {
    pub fn new(from: NaiveDate, to: NaiveDate) -> ReportPeriod {
        ReportPeriod { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(price: i64) -> Product {
        Product {
            sku: "W-1".into(),
            name: "Widget".into(),
            unit_price: Money(price),
            unit_cost: Money(price / 2),
            ..Default::default()
        }
    }

    fn order(items: Vec<LineItem>, tax_rate_bps: u32) -> Order {
        Order {
            number: "1001".into(),
            placed_on: NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date"),
            due_on: None,
            status: OrderStatus::Confirmed,
            customer: Customer::default(),
            items,
            tax_rate_bps,
            shipping: Money(500),
            discount: Money::ZERO,
            notes: None,
            cancellation: None,
        }
    }

    #[test]
    fn tax_rounds_half_up() {
        assert_eq!(Money(1000).percent_bps(825), Money(83));
        assert_eq!(Money(200).percent_bps(25), Money(1));
        assert_eq!(Money(199).percent_bps(25), Money(0));
        assert_eq!(Money(-200).percent_bps(25), Money(-1));
    }

    #[test]
    fn totals_add_up() {
        let mut order = order(vec![LineItem::new(widget(1250), 3), LineItem::new(widget(999), 1)], 1000);
        order.discount = Money(249);
        let totals = order.totals();
        assert_eq!(totals.subtotal, Money(4749));
        assert_eq!(totals.revenue(), Money(4500));
        assert_eq!(totals.tax, Money(450));
        assert_eq!(totals.total, Money(4500 + 450 + 500));
        assert_eq!(order.cost_of_goods(), Money(625 * 3 + 499));
        assert_eq!(order.units(), 4);
    }

    #[test]
    fn discount_is_capped_at_the_subtotal() {
        let mut order = order(vec![LineItem::new(widget(100), 1)], 0);
        order.discount = Money(1_000);
        let totals = order.totals();
        assert_eq!(totals.discount, Money(100));
        assert_eq!(totals.total, Money(500));
    }

    #[test]
    fn line_price_overrides_list_price() {
        let mut item = LineItem::new(widget(1000), 2);
        item.unit_price = Some(Money(800));
        assert_eq!(item.total(), Money(1600));
    }

    #[test]
    fn addresses_skip_blank_parts() {
        let address = Address {
            street: vec!["1 Main St".into(), "".into()],
            city: "Springfield".into(),
            region: "".into(),
            postal_code: "12345".into(),
            country: "".into(),
        };
        assert_eq!(address.lines(), vec!["1 Main St", "Springfield, 12345"]);
    }

    #[test]
    fn orders_deserialise_with_defaults() {
        let json = r#"{
            "number": "42",
            "placed_on": "2024-01-31",
            "customer": { "name": "Ada" },
            "items": [ { "product": { "sku": "A", "name": "Thing", "unit_price": 250 }, "quantity": 2 } ]
        }"#;
        let order: Order = serde_json::from_str(json).expect("valid order");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.totals().total, Money(500));
        assert_eq!(order.customer.shipping_address(), &order.customer.billing);
    }
}
