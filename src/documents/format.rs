//! Formatting of numbers and dates for display. Documents format every value
//! once, up front, and hand plain strings to the layout engine.

use super::model::Money;
use chrono::NaiveDate;

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// `-$1,234.56` style currency
pub fn currency(amount: Money, symbol: &str) -> String {
    let minor = amount.minor();
    let abs = minor.unsigned_abs();
    let sign = if minor < 0 { "-" } else { "" };
    format!("{sign}{symbol}{}.{:02}", group_thousands(abs / 100), abs % 100)
}

/// Basis points as a percentage, with trailing zeros trimmed: 825 is `8.25%`,
/// 1000 is `10%`
pub fn percent_bps(bps: u32) -> String {
    let whole = bps / 100;
    let fraction = bps % 100;
    if fraction == 0 {
        format!("{whole}%")
    } else if fraction % 10 == 0 {
        format!("{whole}.{}%", fraction / 10)
    } else {
        format!("{whole}.{fraction:02}%")
    }
}

/// A ratio as a percentage with one decimal place
pub fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

pub fn date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

pub fn weight(kg: f64) -> String {
    format!("{kg:.2} kg")
}

pub fn quantity(count: u32) -> String {
    group_thousands(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(currency(Money(0), "$"), "$0.00");
        assert_eq!(currency(Money(5), "$"), "$0.05");
        assert_eq!(currency(Money(123_456_789), "$"), "$1,234,567.89");
        assert_eq!(currency(Money(-100_050), "EUR "), "-EUR 1,000.50");
    }

    #[test]
    fn percentages() {
        assert_eq!(percent_bps(825), "8.25%");
        assert_eq!(percent_bps(1000), "10%");
        assert_eq!(percent_bps(750), "7.5%");
        assert_eq!(percent_bps(5), "0.05%");
        assert_eq!(percent(0.4567), "45.7%");
    }

    #[test]
    fn dates_and_weights() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 7).expect("valid date");
        assert_eq!(date(day), "07 Mar 2024");
        assert_eq!(weight(12.5), "12.50 kg");
        assert_eq!(quantity(12_000), "12,000");
    }
}
