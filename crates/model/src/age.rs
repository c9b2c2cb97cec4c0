//! Baby age: real age since birth and age corrected for the due date.

use chrono::Duration;

use crate::time::{elapsed, whole_days, DateTimeUtc, SECONDS_PER_WEEK};

/// Full-term pregnancy length the gestation estimate is measured against.
pub const FULL_TERM_WEEKS: i64 = 40;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AgeInput {
    pub birth_date: DateTimeUtc,
    /// May fall on either side of `birth_date` (premature or post-term birth).
    pub due_date: Option<DateTimeUtc>,
}

/// Age split into units. All three are derived from the same day count,
/// so months are 30-day blocks rather than calendar months.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct AgeResult {
    pub days: u64,
    pub weeks: u64,
    pub months: u64,
}

impl AgeResult {
    pub fn from_days(days: u64) -> Self {
        AgeResult {
            days,
            weeks: days / 7,
            months: days / 30,
        }
    }
}

pub fn compute_age(from: DateTimeUtc, now: DateTimeUtc) -> AgeResult {
    AgeResult::from_days(whole_days(elapsed(from, now)))
}

/// Weeks of gestation at birth, `None` when the due date is unknown.
/// Unusual inputs yield values outside of 0..=40 and are returned as-is.
pub fn gestation_weeks(birth: DateTimeUtc, due: Option<DateTimeUtc>) -> Option<i64> {
    let due = due?;
    let early_by = (due - birth).num_seconds().div_euclid(SECONDS_PER_WEEK);
    Some(FULL_TERM_WEEKS - early_by)
}

impl AgeInput {
    pub fn real_age(&self, now: DateTimeUtc) -> AgeResult {
        compute_age(self.birth_date, now)
    }

    /// Age counted from the due date instead of the birth date.
    /// Stays at zero until the due date has passed.
    pub fn corrected_age(&self, now: DateTimeUtc) -> Option<AgeResult> {
        let due = self.due_date?;
        if now - due < Duration::zero() {
            return Some(AgeResult::default());
        }
        Some(compute_age(due, now))
    }

    pub fn gestation_weeks(&self) -> Option<i64> {
        gestation_weeks(self.birth_date, self.due_date)
    }

    pub fn is_premature(&self) -> bool {
        matches!(self.due_date, Some(due) if due > self.birth_date)
    }
}
