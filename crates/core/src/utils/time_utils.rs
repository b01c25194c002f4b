use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Returns the closed settlement interval [yesterday 00:00, today 00:00) for
/// the given instant.
///
/// This is the single source of truth for deriving the daily window. The
/// caller supplies `now`; nothing in this crate reads the wall clock.
pub fn day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let stop = Utc
        .from_utc_datetime(&now.date_naive().and_hms_opt(0, 0, 0).expect("valid midnight"));
    let start = stop - Duration::days(1);
    (start, stop)
}

/// The calendar day a settlement window belongs to: the date of its start.
pub fn settlement_day(window_start: DateTime<Utc>) -> NaiveDate {
    window_start.date_naive()
}
