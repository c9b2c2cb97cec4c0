//! Locale-aware rendering of baby age and elapsed time

pub mod age;
pub mod locale;
pub mod plural;
pub mod time_ago;

mod localizer;
mod template;

pub use self::{
    locale::LocaleStrategy,
    localizer::{AgeDescription, Localizer},
};
