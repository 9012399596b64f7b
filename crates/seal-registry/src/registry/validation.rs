use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::domain::{
    Gender, RegistrationDraft, RegistrationIntent, RegistrationMethod, SealNameCategory,
};
use crate::wareki::EraDate;

static KATAKANA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ァ-ヶー\s　]+$").expect("katakana pattern compiles"));

static POSTAL_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}-[0-9]{4}$").expect("postal code pattern compiles"));

/// Field-level validation failures, keyed by the form's wire field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("バリデーションエラー")?;
        let mut separator = ": ";
        for messages in self.fields.values() {
            for message in messages {
                write!(f, "{separator}{message}")?;
                separator = ", ";
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate an intake form, reporting every failing field at once.
pub fn validate(draft: &RegistrationDraft) -> Result<RegistrationIntent, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = required(&mut errors, "name", &draft.name, "氏名は必須です");

    let name_kana = required(&mut errors, "nameKana", &draft.name_kana, "フリガナは必須です");
    if !name_kana.is_empty() && !KATAKANA.is_match(&name_kana) {
        errors.push("nameKana", "フリガナはカタカナで入力してください");
    }

    let date_of_birth = required(
        &mut errors,
        "dateOfBirth",
        &draft.date_of_birth,
        "生年月日は必須です",
    );
    if !date_of_birth.is_empty() && date_of_birth.parse::<EraDate>().is_err() {
        errors.push(
            "dateOfBirth",
            "生年月日は和暦（例: 昭和40年3月15日）で入力してください",
        );
    }

    let gender = match trimmed(&draft.gender) {
        Some(label) => Gender::from_label(label),
        None => None,
    };
    if gender.is_none() {
        errors.push("gender", "性別は「男」または「女」を選択してください");
    }

    let postal_code = trimmed(&draft.postal_code).unwrap_or_default().to_string();
    if !postal_code.is_empty() && !POSTAL_CODE.is_match(&postal_code) {
        errors.push("postalCode", "郵便番号は XXX-XXXX 形式で入力してください");
    }

    let address = required(&mut errors, "address", &draft.address, "住所は必須です");
    let address_detail = trimmed(&draft.address_detail).unwrap_or_default().to_string();
    let mailing_number = required(
        &mut errors,
        "mailingNumber",
        &draft.mailing_number,
        "宛名番号は必須です",
    );
    let household_number = required(
        &mut errors,
        "householdNumber",
        &draft.household_number,
        "世帯番号は必須です",
    );

    let seal_name = match trimmed(&draft.seal_name) {
        Some(value) => value.to_string(),
        None => family_name(&name).to_string(),
    };

    let seal_name_category = match trimmed(&draft.seal_name_category) {
        Some(label) => SealNameCategory::from_label(label),
        None => None,
    };
    if seal_name_category.is_none() {
        errors.push("sealNameCategory", "印影の氏名区分を選択してください");
    }

    let registration_method = match trimmed(&draft.registration_method) {
        None => Some(RegistrationMethod::default()),
        Some(label) => RegistrationMethod::from_label(label),
    };
    if registration_method.is_none() {
        errors.push(
            "registrationMethod",
            "登録方法は「即時」または「照会」を選択してください",
        );
    }

    match (gender, seal_name_category, registration_method) {
        (Some(gender), Some(seal_name_category), Some(registration_method))
            if errors.is_empty() =>
        {
            Ok(RegistrationIntent {
                name,
                name_kana,
                date_of_birth,
                gender,
                postal_code,
                address,
                address_detail,
                mailing_number,
                household_number,
                seal_name,
                seal_name_category,
                registration_method,
            })
        }
        _ => Err(errors),
    }
}

/// Family-name part of a full name: the text before the first whitespace character, ideographic
/// space included.
pub fn family_name(name: &str) -> &str {
    name.split(char::is_whitespace).next().unwrap_or(name)
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &Option<String>,
    message: &'static str,
) -> String {
    match trimmed(value) {
        Some(value) => value.to_string(),
        None => {
            errors.push(field, message);
            String::new()
        }
    }
}
