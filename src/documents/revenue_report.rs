use super::parts::{self, SECTION_GAP};
use super::{format, Branding, DocumentBuilder, Money, Order, ReportPeriod};
use crate::layout::{Canvas, Column, TableSpec, TextMeasurer};
use crate::units::Mm;
use crate::RenderError;
use std::collections::BTreeMap;

const ORDER_HEADERS: [&str; 6] = ["Order #", "Date", "Customer", "Revenue", "COGS", "Margin"];
const PRODUCT_HEADERS: [&str; 4] = ["SKU", "Product", "Units", "Revenue"];

fn order_columns() -> Vec<Column> {
    vec![
        Column::left(25.0),
        Column::left(25.0),
        Column::left(50.0),
        Column::right(27.0),
        Column::right(27.0),
        Column::right(26.0),
    ]
}

fn product_columns() -> Vec<Column> {
    vec![
        Column::left(30.0),
        Column::left(80.0),
        Column::right(30.0),
        Column::right(40.0),
    ]
}

/// Revenue against cost of goods over a set of orders
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RevenueSummary {
    pub orders: usize,
    pub revenue: Money,
    pub cost_of_goods: Money,
}

impl RevenueSummary {
    pub fn gross_profit(&self) -> Money {
        self.revenue - self.cost_of_goods
    }

    /// Gross profit as a fraction of revenue, if there was any revenue
    pub fn margin(&self) -> Option<f64> {
        self.gross_profit().ratio_of(self.revenue)
    }
}

/// Units sold and line revenue for one product
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProductSales {
    pub sku: String,
    pub name: String,
    pub units: u32,
    pub revenue: Money,
}

fn margin_text(margin: Option<f64>) -> String {
    margin.map(format::percent).unwrap_or_else(|| "-".to_string())
}

/// Revenue, cost of goods and margin for the orders placed in a period,
/// per order and per product. Cancelled orders are left out.
pub struct RevenueReport<'a> {
    pub orders: &'a [Order],
    pub period: ReportPeriod,
}

impl<'a> RevenueReport<'a> {
    pub fn new(orders: &'a [Order], period: ReportPeriod) -> RevenueReport<'a> {
        RevenueReport { orders, period }
    }

    /// The orders the report covers, oldest first
    pub fn included(&self) -> Vec<&'a Order> {
        let mut orders: Vec<&Order> = self
            .orders
            .iter()
            .filter(|order| !order.is_cancelled() && self.period.contains(order.placed_on))
            .collect();
        orders.sort_by(|a, b| (a.placed_on, &a.number).cmp(&(b.placed_on, &b.number)));
        orders
    }

    pub fn summary(&self) -> RevenueSummary {
        self.included()
            .iter()
            .fold(RevenueSummary::default(), |mut summary, order| {
                summary.orders += 1;
                summary.revenue += order.totals().revenue();
                summary.cost_of_goods += order.cost_of_goods();
                summary
            })
    }

    /// Sales per product, ordered by SKU. Revenue here is before order-level
    /// discounts.
    pub fn product_sales(&self) -> Vec<ProductSales> {
        let mut sales: BTreeMap<&str, ProductSales> = BTreeMap::new();
        for item in self.included().iter().flat_map(|order| order.items.iter()) {
            let entry = sales
                .entry(item.product.sku.as_str())
                .or_insert_with(|| ProductSales {
                    sku: item.product.sku.clone(),
                    name: item.product.name.clone(),
                    ..Default::default()
                });
            entry.units += item.quantity;
            entry.revenue += item.total();
        }
        sales.into_values().collect()
    }

    fn order_table(&self, branding: &Branding) -> TableSpec {
        let money = |amount| format::currency(amount, &branding.currency_symbol);
        let mut table =
            TableSpec::new(Mm(180.0), order_columns(), ORDER_HEADERS).with_style(parts::table_style(branding));
        for order in self.included() {
            let revenue = order.totals().revenue();
            let cost = order.cost_of_goods();
            table.push_row([
                order.number.clone(),
                format::date(order.placed_on),
                order.customer.name.clone(),
                money(revenue),
                money(cost),
                margin_text((revenue - cost).ratio_of(revenue)),
            ]);
        }
        table
    }

    fn product_table(&self, branding: &Branding) -> TableSpec {
        let mut table =
            TableSpec::new(Mm(180.0), product_columns(), PRODUCT_HEADERS).with_style(parts::table_style(branding));
        for sales in self.product_sales() {
            table.push_row([
                sales.sku,
                sales.name,
                format::quantity(sales.units),
                format::currency(sales.revenue, &branding.currency_symbol),
            ]);
        }
        table
    }
}

impl DocumentBuilder for RevenueReport<'_> {
    fn title(&self) -> String {
        format!(
            "Revenue Report {} to {}",
            format::date(self.period.from),
            format::date(self.period.to)
        )
    }

    fn subject(&self) -> &'static str {
        "Revenue Report"
    }

    fn compose<M: TextMeasurer>(&self, canvas: &mut Canvas<'_, M>, branding: &Branding) -> Result<(), RenderError> {
        let summary = self.summary();
        parts::draw_header(
            canvas,
            branding,
            "REVENUE REPORT",
            &[
                ("From", format::date(self.period.from)),
                ("To", format::date(self.period.to)),
                ("Orders", summary.orders.to_string()),
            ],
        )?;

        if summary.orders == 0 {
            parts::draw_paragraph(canvas, None, "No orders were placed in this period.", &parts::body())?;
            return parts::draw_footer(canvas, branding);
        }

        for (heading, table) in [("Orders", self.order_table(branding)), ("Products", self.product_table(branding))] {
            let lead = canvas.table_lead(&table);
            parts::draw_section_heading(canvas, branding, heading, lead)?;
            canvas.draw_table(&table)?;
            canvas.inc_y(SECTION_GAP);
        }

        let money = |amount| format::currency(amount, &branding.currency_symbol);
        parts::draw_totals(
            canvas,
            &[
                ("Revenue".to_string(), money(summary.revenue)),
                ("Cost of goods".to_string(), money(summary.cost_of_goods)),
                ("Gross margin".to_string(), margin_text(summary.margin())),
                ("Gross profit".to_string(), money(summary.gross_profit())),
            ],
        )?;
        parts::draw_footer(canvas, branding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::fixtures::{self, compose, day, text_on};
    use crate::documents::{Cancellation, OrderStatus};

    fn orders() -> Vec<Order> {
        let mut cancelled = fixtures::order("1003", 1, day(10));
        cancelled.status = OrderStatus::Cancelled;
        cancelled.cancellation = Some(Cancellation {
            cancelled_on: day(11),
            reason: "Customer request".into(),
            refunded: Money::new(11, 0),
        });
        vec![
            fixtures::order("1002", 2, day(12)),
            fixtures::order("1001", 1, day(2)),
            cancelled,
            // outside the period
            fixtures::order("0999", 1, fixtures::day(1) - chrono::Duration::days(1)),
        ]
    }

    fn march() -> ReportPeriod {
        ReportPeriod::new(day(1), day(31))
    }

    #[test]
    fn only_live_orders_in_the_period_count() {
        let orders = orders();
        let report = RevenueReport::new(&orders, march());
        let numbers: Vec<&str> = report.included().iter().map(|o| o.number.as_str()).collect();
        assert_eq!(numbers, vec!["1001", "1002"]);

        let summary = report.summary();
        assert_eq!(summary.orders, 2);
        // 11 + (11 + 24)
        assert_eq!(summary.revenue, Money::new(46, 0));
        // 6 per unit, 1 + 3 units
        assert_eq!(summary.cost_of_goods, Money::new(24, 0));
        assert_eq!(summary.gross_profit(), Money::new(22, 0));
        assert_eq!(margin_text(summary.margin()), "47.8%");
    }

    #[test]
    fn product_sales_are_grouped_by_sku() {
        let orders = orders();
        let sales = RevenueReport::new(&orders, march()).product_sales();
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].sku, "SKU-001");
        assert_eq!(sales[0].units, 2);
        assert_eq!(sales[0].revenue, Money::new(22, 0));
        assert_eq!(sales[1].units, 2);
    }

    #[test]
    fn tables_fill_the_frame() {
        let orders = orders();
        let report = RevenueReport::new(&orders, march());
        let branding = fixtures::branding();
        assert!(report.order_table(&branding).validate().is_ok());
        assert!(report.product_table(&branding).validate().is_ok());
    }

    #[test]
    fn composes_both_tables_and_totals() {
        let orders = orders();
        let canvas = compose(&RevenueReport::new(&orders, march()));
        let text = text_on(canvas.pages().next().expect("page"));
        for expected in ["REVENUE REPORT", "Orders", "Products", "COGS", "SKU-002", "Gross profit", "$22.00"] {
            assert!(text.contains(expected), "missing {expected:?} in\n{text}");
        }
        assert!(!text.contains("1003"));
    }

    #[test]
    fn empty_periods_say_so() {
        let orders = orders();
        let period = ReportPeriod::new(day(20), day(25));
        let canvas = compose(&RevenueReport::new(&orders, period));
        let text = text_on(canvas.pages().next().expect("page"));
        assert!(text.contains("No orders were placed in this period."));
        assert!(!text.contains("COGS"));
    }
}
