//! Week-granular cache key for signed image URLs.
//!
//! Signed download URLs are minted on every read. Pinning the signing time to
//! a weekly bucket makes every read within that week produce the same URL, so
//! browsers and CDNs can cache the image.

use chrono::{DateTime, Datelike, Duration, NaiveTime, SecondsFormat, Utc};

/// The Sunday (midnight UTC) that closes the week containing `now`.
///
/// Sunday itself maps to its own midnight; Monday through Saturday roll
/// forward to the coming Sunday.
pub fn week_bucket(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();
    let days_ahead = (7 - today.weekday().num_days_from_sunday()) % 7;
    let sunday = today + Duration::days(i64::from(days_ahead));
    sunday.and_time(NaiveTime::MIN).and_utc()
}

/// [`week_bucket`] rendered as an ISO-8601 string, e.g. `2026-10-25T00:00:00.000Z`.
pub fn cache_bucket_date(now: DateTime<Utc>) -> String {
    week_bucket(now).to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_cache_bucket(bucket: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(bucket)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
