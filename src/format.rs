//! Display strings shared by the pages and the token ticker.

use chrono::NaiveDate;

/// Two decimals with a `K`, `M` or `B` suffix once the value reaches a thousand.
pub fn format_number(value: f64) -> String {
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{value:.2}")
    }
}

/// Dollar amount with magnitude suffix, e.g. `$2.85M`.
pub fn format_usd(value: f64) -> String {
    format!("${}", format_number(value))
}

/// Token price with four decimals, e.g. `$0.0015`.
pub fn format_price(price: f64) -> String {
    format!("${price:.4}")
}

/// 24h change with an explicit sign, e.g. `+1.25%`.
pub fn format_change(change: f64) -> String {
    format!("{change:+.2}%")
}

/// Compact view counter: `24.5K`, `1.2M`, or the plain number below a thousand.
pub fn format_views(views: u64) -> String {
    if views >= 1_000_000 {
        format!("{:.1}M", views as f64 / 1e6)
    } else if views >= 1_000 {
        format!("{:.1}K", views as f64 / 1e3)
    } else {
        views.to_string()
    }
}

/// Integer with comma thousands separators, e.g. `12,456`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}

/// How long ago `date` was, relative to `today`.
///
/// Dates further than a year away fall back to `Mar 22, 2025`.
pub fn format_relative_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days().unsigned_abs();

    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => plural(days / 7, "week"),
        30..=364 => plural(days / 30, "month"),
        _ => date.format("%b %-d, %Y").to_string(),
    }
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_magnitudes() {
        assert_eq!(format_number(999.0), "999.00");
        assert_eq!(format_number(1500.0), "1.50K");
        assert_eq!(format_number(2_500_000.0), "2.50M");
        assert_eq!(format_number(3_000_000_000.0), "3.00B");
        assert_eq!(format_number(0.0), "0.00");
    }

    #[test]
    fn magnitude_thresholds_are_inclusive() {
        assert_eq!(format_number(1000.0), "1.00K");
        assert_eq!(format_number(1_000_000.0), "1.00M");
        assert_eq!(format_number(1e9), "1.00B");
        assert_eq!(format_number(999_999.0), "1000.00K");
    }

    #[test]
    fn money_strings() {
        assert_eq!(format_price(0.0015), "$0.0015");
        assert_eq!(format_usd(162_510.0), "$162.51K");
        assert_eq!(format_change(1.25), "+1.25%");
        assert_eq!(format_change(-40.49), "-40.49%");
    }

    #[test]
    fn view_counts() {
        assert_eq!(format_views(999), "999");
        assert_eq!(format_views(24_500), "24.5K");
        assert_eq!(format_views(1_200_000), "1.2M");
    }

    #[test]
    fn counts_get_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(12_456), "12,456");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn relative_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 24).unwrap();
        let ago = |days: i64| format_relative_date(today - chrono::Duration::days(days), today);

        assert_eq!(ago(0), "Today");
        assert_eq!(ago(1), "Yesterday");
        assert_eq!(ago(5), "5 days ago");
        assert_eq!(ago(7), "1 week ago");
        assert_eq!(ago(20), "2 weeks ago");
        assert_eq!(ago(45), "1 month ago");
        assert_eq!(ago(300), "10 months ago");
        assert_eq!(ago(400), "Feb 18, 2024");
    }
}
