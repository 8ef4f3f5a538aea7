//! Display formatting for provider values
//!
//! Stripe reports money as integer minor units and time as epoch seconds.
//! The UI wants major-unit decimals, upper-case currency codes and ISO-8601
//! timestamps with millisecond precision.

use chrono::{DateTime, SecondsFormat, Utc};

/// Convert a minor-unit amount (e.g. cents) into its major-unit value
pub fn minor_to_major(amount: i64) -> f64 {
    amount as f64 / 100.0
}

/// Normalize a currency code for display
pub fn display_currency(code: &str) -> String {
    code.to_uppercase()
}

/// Format an epoch-seconds timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`
///
/// Returns `None` for timestamps chrono cannot represent.
pub fn epoch_to_iso(epoch_seconds: i64) -> Option<String> {
    let millis = epoch_seconds.checked_mul(1000)?;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minor_to_major() {
        assert_eq!(minor_to_major(1999), 19.99);
        assert_eq!(minor_to_major(0), 0.0);
        assert_eq!(minor_to_major(500), 5.0);
        assert_eq!(minor_to_major(-250), -2.5);
    }

    #[test]
    fn test_display_currency() {
        assert_eq!(display_currency("usd"), "USD");
        assert_eq!(display_currency("EUR"), "EUR");
    }

    #[test]
    fn test_epoch_to_iso_matches_millisecond_format() {
        assert_eq!(
            epoch_to_iso(1_700_000_000).as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
        assert_eq!(
            epoch_to_iso(1_690_000_000).as_deref(),
            Some("2023-07-22T04:26:40.000Z")
        );
        assert_eq!(epoch_to_iso(0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_epoch_to_iso_out_of_range() {
        assert_eq!(epoch_to_iso(i64::MAX), None);
    }
}
