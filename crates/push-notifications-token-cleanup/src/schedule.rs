use chrono::{Duration, FixedOffset, NaiveTime, TimeZone, Utc};

use model::time::DateTimeUtc;

/// Once a day at a fixed wall-clock hour in a fixed UTC offset.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct DailySchedule {
    at: NaiveTime,
    tz: FixedOffset,
}

impl DailySchedule {
    /// `None` if the hour or the offset is out of range.
    pub fn new(hour: u32, utc_offset_seconds: i32) -> Option<Self> {
        Some(DailySchedule {
            at: NaiveTime::from_hms_opt(hour, 0, 0)?,
            tz: FixedOffset::east_opt(utc_offset_seconds)?,
        })
    }

    /// First scheduled instant strictly after `now`.
    pub fn next_run(&self, now: DateTimeUtc) -> DateTimeUtc {
        let local_date = now.with_timezone(&self.tz).date_naive();
        let local_run = local_date.and_time(self.at);
        let offset = Duration::seconds(self.tz.local_minus_utc() as i64);
        let run = Utc.from_utc_datetime(&(local_run - offset));
        if run > now {
            run
        } else {
            run + Duration::days(1)
        }
    }
}
