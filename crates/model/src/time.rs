use chrono::{DateTime, Duration, Utc};

pub type DateTimeUtc = DateTime<Utc>;

pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;
pub const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY;

/// Absolute time between two instants, regardless of their order.
pub fn elapsed(a: DateTimeUtc, b: DateTimeUtc) -> Duration {
    let d = b - a;
    if d < Duration::zero() {
        -d
    } else {
        d
    }
}

/// Whole days in `d`, rounding toward zero.
pub fn whole_days(d: Duration) -> u64 {
    d.num_seconds().unsigned_abs() / SECONDS_PER_DAY as u64
}

/// Instant rendered the way notification payloads carry it.
pub fn rfc3339(dt: DateTimeUtc) -> String {
    dt.to_rfc3339()
}
