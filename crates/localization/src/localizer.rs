use model::{
    age::{AgeInput, AgeResult},
    time::DateTimeUtc,
};

use crate::{age::format_age, locale::LocaleStrategy, time_ago::format_time_ago};

/// Formatting service bound to one language. Construct it from the user's
/// language preference and pass it to whoever renders text.
#[derive(Copy, Clone, Debug)]
pub struct Localizer {
    locale: &'static LocaleStrategy,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AgeDescription {
    pub real: String,
    /// Only for babies born before their due date.
    pub corrected: Option<String>,
    pub gestation_weeks: Option<i64>,
}

impl Localizer {
    pub fn new(lang: &str) -> Self {
        Localizer {
            locale: LocaleStrategy::for_lang(lang),
        }
    }

    pub fn lang(&self) -> &'static str {
        self.locale.lang
    }

    pub fn format_age(&self, age: &AgeResult) -> String {
        format_age(age, self.locale)
    }

    pub fn format_time_ago(&self, past: DateTimeUtc, now: DateTimeUtc) -> String {
        format_time_ago(past, now, self.locale)
    }

    pub fn describe_age(&self, input: &AgeInput, now: DateTimeUtc) -> AgeDescription {
        let corrected = if input.is_premature() {
            input.corrected_age(now).map(|age| self.format_age(&age))
        } else {
            None
        };
        AgeDescription {
            real: self.format_age(&input.real_age(now)),
            corrected,
            gestation_weeks: input.gestation_weeks(),
        }
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Localizer::new("en")
    }
}
