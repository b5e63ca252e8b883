//! Classification engine: stock and expiry status labels.
//!
//! Pure functions of a value and the configured thresholds. Ties resolve to
//! the more severe category (`<=`, not `<`).

use crate::{ExpiryStatus, StockStatus, ThresholdSettings};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Classify a stock count against the configured thresholds
pub fn stock_status(stock: u32, settings: &ThresholdSettings) -> StockStatus {
    if stock <= settings.stock_critical {
        StockStatus::Critical
    } else if stock <= settings.stock_low {
        StockStatus::Low
    } else {
        StockStatus::Good
    }
}

/// Days from `now` until the expiry date's midnight (UTC), partial days
/// rounded up.
///
/// Calendar-time subtraction, not calendar-day subtraction: an expiry at
/// tomorrow 00:00 seen from today 23:59 is 1 day out, not 0. Past dates
/// yield a negative count.
pub fn days_until_expiry(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expiry_midnight = expiry.and_time(NaiveTime::MIN).and_utc();
    let millis = (expiry_midnight - now).num_milliseconds();
    // Integer ceiling; correct for negative spans as well
    (millis + MILLIS_PER_DAY - 1).div_euclid(MILLIS_PER_DAY)
}

/// Classify an expiry date against the configured thresholds.
///
/// An already-past date flows through the same day arithmetic (negative day
/// count, always at or below both thresholds, hence `Critical`). Whether the
/// item is actually expired is a separate question answered by
/// [`is_expired`]; consumers layer that badge on top of the classification.
pub fn expiry_status(
    expiry: NaiveDate,
    now: DateTime<Utc>,
    settings: &ThresholdSettings,
) -> ExpiryStatus {
    let days = days_until_expiry(expiry, now);
    if days <= settings.expiry_critical_days {
        ExpiryStatus::Critical
    } else if days <= settings.expiry_warning_days {
        ExpiryStatus::Warning
    } else {
        ExpiryStatus::Good
    }
}

/// True once the expiry date's midnight (UTC) lies strictly in the past
pub fn is_expired(expiry: NaiveDate, now: DateTime<Utc>) -> bool {
    expiry.and_time(NaiveTime::MIN).and_utc() < now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn settings() -> ThresholdSettings {
        ThresholdSettings::default() // critical 10, low 30, expiry 30/90
    }

    fn at_midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn stock_status_ties_resolve_severe() {
        let s = settings();
        assert_eq!(stock_status(10, &s), StockStatus::Critical);
        assert_eq!(stock_status(11, &s), StockStatus::Low);
        assert_eq!(stock_status(30, &s), StockStatus::Low);
        assert_eq!(stock_status(31, &s), StockStatus::Good);
        assert_eq!(stock_status(0, &s), StockStatus::Critical);
    }

    #[test]
    fn days_until_expiry_rounds_partial_days_up() {
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();

        // Tomorrow at 00:00 seen from 23:59 today is still 1 day out
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 23, 59, 0).unwrap();
        assert_eq!(days_until_expiry(expiry, now), 1);

        // Exactly at midnight the distance is 0
        assert_eq!(days_until_expiry(expiry, at_midnight(2024, 6, 11)), 0);

        // One minute past midnight counts as already behind
        let now = Utc.with_ymd_and_hms(2024, 6, 11, 0, 1, 0).unwrap();
        assert_eq!(days_until_expiry(expiry, now), 0);
        let now = Utc.with_ymd_and_hms(2024, 6, 12, 0, 1, 0).unwrap();
        assert_eq!(days_until_expiry(expiry, now), -1);
    }

    #[test]
    fn expiry_status_at_threshold_boundaries() {
        let s = settings();
        let now = at_midnight(2024, 1, 1);

        // Exactly expiry_critical_days ahead -> critical
        let expiry = now.date_naive() + Duration::days(30);
        assert_eq!(expiry_status(expiry, now, &s), ExpiryStatus::Critical);

        // One day further -> warning band
        let expiry = now.date_naive() + Duration::days(31);
        assert_eq!(expiry_status(expiry, now, &s), ExpiryStatus::Warning);

        // Exactly expiry_warning_days -> warning; one past -> good
        let expiry = now.date_naive() + Duration::days(90);
        assert_eq!(expiry_status(expiry, now, &s), ExpiryStatus::Warning);
        let expiry = now.date_naive() + Duration::days(91);
        assert_eq!(expiry_status(expiry, now, &s), ExpiryStatus::Good);
    }

    #[test]
    fn past_dates_are_critical_and_expired() {
        let s = settings();
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert!(days_until_expiry(expiry, now) < 0);
        assert_eq!(expiry_status(expiry, now, &s), ExpiryStatus::Critical);
        assert!(is_expired(expiry, now));
    }

    #[test]
    fn expired_badge_is_distinct_from_classification() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

        // Later today: midnight already passed, so expired, still Critical
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert!(is_expired(today, now));

        // A week out: critical (<= 30 days) but not expired
        let soon = NaiveDate::from_ymd_opt(2024, 6, 17).unwrap();
        assert!(!is_expired(soon, now));
        assert_eq!(
            expiry_status(soon, now, &ThresholdSettings::default()),
            ExpiryStatus::Critical
        );
    }
}
