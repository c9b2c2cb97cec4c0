use std::collections::HashMap;

use chrono::Duration;
use model::time::{elapsed, DateTimeUtc};

use crate::{locale::LocaleStrategy, template::interpolate};

/// Elapsed time bucketed into the coarsest unit that applies.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TimeAgo {
    Now,
    Minutes(i64),
    Hours { hours: i64, minutes: i64 },
    Days(i64),
    Weeks(i64),
}

impl TimeAgo {
    /// Each bucket's lower bound is inclusive, so exactly 60 minutes is
    /// one hour and exactly 7 days is one week. Weeks are not capped.
    pub fn from_elapsed(d: Duration) -> Self {
        let minutes = d.num_minutes().abs();
        if minutes < 1 {
            return TimeAgo::Now;
        }
        if minutes < 60 {
            return TimeAgo::Minutes(minutes);
        }
        let hours = minutes / 60;
        if hours < 24 {
            return TimeAgo::Hours {
                hours,
                minutes: minutes % 60,
            };
        }
        let days = hours / 24;
        if days < 7 {
            TimeAgo::Days(days)
        } else {
            TimeAgo::Weeks(days / 7)
        }
    }

    /// Rank of the unit, growing with coarseness.
    pub fn coarseness(&self) -> u8 {
        match self {
            TimeAgo::Now => 0,
            TimeAgo::Minutes(_) => 1,
            TimeAgo::Hours { .. } => 2,
            TimeAgo::Days(_) => 3,
            TimeAgo::Weeks(_) => 4,
        }
    }

    pub fn render(&self, locale: &LocaleStrategy) -> String {
        let labels = &locale.time_ago_labels;
        let (template, subst) = match *self {
            TimeAgo::Now => return labels.now.to_string(),
            TimeAgo::Minutes(m) => (labels.minutes, vec![("m", m)]),
            TimeAgo::Hours { hours, minutes: 0 } => (labels.hours, vec![("h", hours)]),
            TimeAgo::Hours { hours, minutes } => {
                (labels.hours_minutes, vec![("h", hours), ("m", minutes)])
            }
            TimeAgo::Days(d) => (labels.days, vec![("d", d)]),
            TimeAgo::Weeks(w) => (labels.weeks, vec![("w", w)]),
        };
        let subst = subst
            .into_iter()
            .map(|(k, v)| (k, v.to_string()))
            .collect::<HashMap<_, _>>();
        interpolate(template, &subst)
    }
}

/// Humanized time between `past` and `now`. Future instants are treated
/// the same as past ones.
pub fn format_time_ago(past: DateTimeUtc, now: DateTimeUtc, locale: &LocaleStrategy) -> String {
    TimeAgo::from_elapsed(elapsed(past, now)).render(locale)
}
