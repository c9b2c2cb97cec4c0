//! Grammatical number selection

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PluralForm {
    One,
    Few,
    Many,
}

impl PluralForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralForm::One => "one",
            PluralForm::Few => "few",
            PluralForm::Many => "many",
        }
    }
}

pub type PluralRule = fn(u64) -> PluralForm;

/// Singular only for exactly one.
pub fn plural_form_en(count: u64) -> PluralForm {
    if count == 1 {
        PluralForm::One
    } else {
        PluralForm::Many
    }
}

pub fn plural_form_ru(count: u64) -> PluralForm {
    let mod10 = count % 10;
    let mod100 = count % 100;
    if (11..=14).contains(&mod100) {
        PluralForm::Many
    } else if mod10 == 1 {
        PluralForm::One
    } else if (2..=4).contains(&mod10) {
        PluralForm::Few
    } else {
        PluralForm::Many
    }
}

/// Label templates for each plural form of one unit.
#[derive(Copy, Clone, Debug)]
pub struct PluralLabels {
    pub one: &'static str,
    pub few: &'static str,
    pub many: &'static str,
}

impl PluralLabels {
    pub fn select(&self, form: PluralForm) -> &'static str {
        match form {
            PluralForm::One => self.one,
            PluralForm::Few => self.few,
            PluralForm::Many => self.many,
        }
    }
}
