use std::collections::HashMap;

use model::age::AgeResult;

use crate::{locale::LocaleStrategy, template::interpolate};

/// Renders an age in the unit the locale prefers for its magnitude.
pub fn format_age(age: &AgeResult, locale: &LocaleStrategy) -> String {
    let (unit, count) = locale.age_policy.select(age);
    let template = locale
        .age_labels
        .for_unit(unit)
        .select(locale.plural(count));
    interpolate(template, &HashMap::from([("count", count.to_string())]))
}
