//! Per-language formatting rules, looked up by language tag.

use model::age::AgeResult;

use crate::plural::{plural_form_en, plural_form_ru, PluralForm, PluralLabels, PluralRule};

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AgeUnit {
    Days,
    Weeks,
    Months,
}

/// How a language picks the unit an age is rendered in.
#[derive(Copy, Clone, Debug)]
pub enum AgeUnitPolicy {
    /// Days below `weeks_from_days`, weeks below `months_from_days`, months after.
    Thresholds {
        weeks_from_days: u64,
        months_from_days: u64,
    },
    /// The coarsest unit with a non-zero value.
    LargestNonZero,
}

impl AgeUnitPolicy {
    pub fn select(&self, age: &AgeResult) -> (AgeUnit, u64) {
        match *self {
            AgeUnitPolicy::Thresholds {
                weeks_from_days,
                months_from_days,
            } => {
                if age.days < weeks_from_days {
                    (AgeUnit::Days, age.days)
                } else if age.days < months_from_days {
                    (AgeUnit::Weeks, age.weeks)
                } else {
                    (AgeUnit::Months, age.months)
                }
            }
            AgeUnitPolicy::LargestNonZero => {
                if age.months > 0 {
                    (AgeUnit::Months, age.months)
                } else if age.weeks > 0 {
                    (AgeUnit::Weeks, age.weeks)
                } else {
                    (AgeUnit::Days, age.days)
                }
            }
        }
    }
}

/// Age templates, `[%s:count]` is the number of units.
#[derive(Copy, Clone, Debug)]
pub struct AgeLabels {
    pub days: PluralLabels,
    pub weeks: PluralLabels,
    pub months: PluralLabels,
}

impl AgeLabels {
    pub fn for_unit(&self, unit: AgeUnit) -> &PluralLabels {
        match unit {
            AgeUnit::Days => &self.days,
            AgeUnit::Weeks => &self.weeks,
            AgeUnit::Months => &self.months,
        }
    }
}

/// Elapsed time templates with `[%s:m]`, `[%s:h]`, `[%s:d]` and `[%s:w]` placeholders.
#[derive(Copy, Clone, Debug)]
pub struct TimeAgoLabels {
    pub now: &'static str,
    pub minutes: &'static str,
    pub hours: &'static str,
    pub hours_minutes: &'static str,
    pub days: &'static str,
    pub weeks: &'static str,
}

#[derive(Debug)]
pub struct LocaleStrategy {
    pub lang: &'static str,
    pub age_policy: AgeUnitPolicy,
    pub age_labels: AgeLabels,
    pub time_ago_labels: TimeAgoLabels,
    pub plural_rule: PluralRule,
}

pub static ENGLISH: LocaleStrategy = LocaleStrategy {
    lang: "en",
    age_policy: AgeUnitPolicy::Thresholds {
        weeks_from_days: 7,
        months_from_days: 60,
    },
    age_labels: AgeLabels {
        days: PluralLabels {
            one: "[%s:count] day old",
            few: "[%s:count] days old",
            many: "[%s:count] days old",
        },
        weeks: PluralLabels {
            one: "[%s:count] week old",
            few: "[%s:count] weeks old",
            many: "[%s:count] weeks old",
        },
        months: PluralLabels {
            one: "[%s:count] month old",
            few: "[%s:count] months old",
            many: "[%s:count] months old",
        },
    },
    time_ago_labels: TimeAgoLabels {
        now: "now",
        minutes: "[%s:m]m ago",
        hours: "[%s:h]h ago",
        hours_minutes: "[%s:h]h [%s:m]m ago",
        days: "[%s:d]d ago",
        weeks: "[%s:w]w ago",
    },
    plural_rule: plural_form_en,
};

pub static RUSSIAN: LocaleStrategy = LocaleStrategy {
    lang: "ru",
    age_policy: AgeUnitPolicy::LargestNonZero,
    age_labels: AgeLabels {
        days: PluralLabels {
            one: "[%s:count] день",
            few: "[%s:count] дня",
            many: "[%s:count] дней",
        },
        weeks: PluralLabels {
            one: "[%s:count] неделя",
            few: "[%s:count] недели",
            many: "[%s:count] недель",
        },
        months: PluralLabels {
            one: "[%s:count] месяц",
            few: "[%s:count] месяца",
            many: "[%s:count] месяцев",
        },
    },
    time_ago_labels: TimeAgoLabels {
        now: "сейчас",
        minutes: "[%s:m] мин назад",
        hours: "[%s:h] ч назад",
        hours_minutes: "[%s:h] ч [%s:m] мин назад",
        days: "[%s:d] дн назад",
        weeks: "[%s:w] нед назад",
    },
    plural_rule: plural_form_ru,
};

static LOCALES: [&LocaleStrategy; 2] = [&ENGLISH, &RUSSIAN];

impl LocaleStrategy {
    /// Resolves a language tag like `ru`, `ru-RU` or `ru_RU` by its primary
    /// subtag. Unknown languages get the English rules.
    pub fn for_lang(tag: &str) -> &'static LocaleStrategy {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        LOCALES
            .iter()
            .copied()
            .find(|locale| locale.lang.eq_ignore_ascii_case(primary.trim()))
            .unwrap_or(&ENGLISH)
    }

    pub fn plural(&self, count: u64) -> PluralForm {
        (self.plural_rule)(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_primary_subtag() {
        assert_eq!(LocaleStrategy::for_lang("ru").lang, "ru");
        assert_eq!(LocaleStrategy::for_lang("ru-RU").lang, "ru");
        assert_eq!(LocaleStrategy::for_lang("RU_ru").lang, "ru");
        assert_eq!(LocaleStrategy::for_lang("en-GB").lang, "en");
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        assert_eq!(LocaleStrategy::for_lang("de").lang, "en");
        assert_eq!(LocaleStrategy::for_lang("").lang, "en");
    }

    #[test]
    fn threshold_policy() {
        let policy = ENGLISH.age_policy;
        assert_eq!(policy.select(&AgeResult::from_days(6)), (AgeUnit::Days, 6));
        assert_eq!(policy.select(&AgeResult::from_days(7)), (AgeUnit::Weeks, 1));
        assert_eq!(policy.select(&AgeResult::from_days(59)), (AgeUnit::Weeks, 8));
        assert_eq!(policy.select(&AgeResult::from_days(60)), (AgeUnit::Months, 2));
    }

    #[test]
    fn largest_non_zero_policy() {
        let policy = RUSSIAN.age_policy;
        assert_eq!(policy.select(&AgeResult::from_days(6)), (AgeUnit::Days, 6));
        assert_eq!(policy.select(&AgeResult::from_days(29)), (AgeUnit::Weeks, 4));
        assert_eq!(policy.select(&AgeResult::from_days(30)), (AgeUnit::Months, 1));
    }
}
