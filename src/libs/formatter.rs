//! Human-readable renderings of durations, hours and money.

use chrono::{DateTime, Duration, Local, Utc};

/// `HH:MM`, clamped at zero.
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;
    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// Whole seconds as `HH:MM`.
pub fn format_seconds(seconds: i64) -> String {
    format_duration(&Duration::seconds(seconds))
}

/// Decimal hours as `7h 30m`; under an hour drops the hour part.
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours.max(0.0) * 60.0).round() as i64;
    let (h, m) = (total_minutes / 60, total_minutes % 60);
    if h == 0 {
        format!("{}m", m)
    } else {
        format!("{}h {}m", h, m)
    }
}

/// US dollars with thousands separators: `$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as i64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Local wall-clock time of an instant, `HH:MM`.
pub fn format_time(instant: &DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%H:%M").to_string()
}

/// Local date and time of an instant, `YYYY-MM-DD HH:MM`.
pub fn format_datetime(instant: &DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_zero_padded() {
        assert_eq!(format_duration(&Duration::minutes(95)), "01:35");
        assert_eq!(format_duration(&Duration::minutes(-5)), "00:00");
        assert_eq!(format_seconds(16 * 3600), "16:00");
    }

    #[test]
    fn hours_render_as_hours_and_minutes() {
        assert_eq!(format_hours(7.5), "7h 30m");
        assert_eq!(format_hours(0.25), "15m");
        assert_eq!(format_hours(16.0), "16h 0m");
        assert_eq!(format_hours(-1.0), "0m");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(950.0), "$950.00");
        assert_eq!(format_currency(1_000_000.126), "$1,000,000.13");
        assert_eq!(format_currency(-12.3), "-$12.30");
    }
}
