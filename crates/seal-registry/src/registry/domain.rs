use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::upload::SealImage;

/// Internal identifier used in URLs (`internal-001`); never reused or changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationId(pub String);

impl RegistrationId {
    /// Placeholder carried until the store assigns the real identifier.
    pub fn unassigned() -> Self {
        RegistrationId(String::new())
    }

    pub fn from_sequence(sequence: u64) -> Self {
        RegistrationId(format!("internal-{sequence:03}"))
    }

    /// Sequence number encoded in the identifier, if it follows the `internal-N` scheme.
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix("internal-")?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public registration number (登録番号) printed on certificates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationNumber(pub String);

impl RegistrationNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistrationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStatus {
    /// Awaiting the mailed inquiry reply; no registration number yet.
    #[serde(rename = "照会中")]
    PendingInquiry,
    #[serde(rename = "照会取消")]
    InquiryCancelled,
    #[serde(rename = "登録")]
    Active,
    #[serde(rename = "抹消")]
    Revoked,
}

impl RegistrationStatus {
    pub const ALL: [RegistrationStatus; 4] = [
        RegistrationStatus::PendingInquiry,
        RegistrationStatus::InquiryCancelled,
        RegistrationStatus::Active,
        RegistrationStatus::Revoked,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RegistrationStatus::PendingInquiry => "照会中",
            RegistrationStatus::InquiryCancelled => "照会取消",
            RegistrationStatus::Active => "登録",
            RegistrationStatus::Revoked => "抹消",
        }
    }

    /// Statuses that carry a registration number and date.
    pub const fn is_numbered(self) -> bool {
        matches!(
            self,
            RegistrationStatus::Active | RegistrationStatus::Revoked
        )
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == label)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "男")]
    Male,
    #[serde(rename = "女")]
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "男",
            Gender::Female => "女",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [Gender::Male, Gender::Female]
            .into_iter()
            .find(|gender| gender.label() == label)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which portion of the legal name the seal impression depicts (印影の氏名区分).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SealNameCategory {
    #[serde(rename = "氏名")]
    FullName,
    #[serde(rename = "氏のみ")]
    SurnameOnly,
    #[serde(rename = "名のみ")]
    GivenNameOnly,
    #[serde(rename = "旧氏と名")]
    FormerSurnameAndGivenName,
    #[serde(rename = "旧氏")]
    FormerSurname,
    #[serde(rename = "氏頭文字と名頭文字")]
    SurnameInitialAndGivenInitial,
    #[serde(rename = "氏頭文字と名")]
    SurnameInitialAndGivenName,
    #[serde(rename = "氏と名頭文字")]
    SurnameAndGivenInitial,
    #[serde(rename = "旧氏頭文字と名頭文字")]
    FormerSurnameInitialAndGivenInitial,
    #[serde(rename = "旧氏頭文字と名")]
    FormerSurnameInitialAndGivenName,
    #[serde(rename = "旧氏と名頭文字")]
    FormerSurnameAndGivenInitial,
    #[serde(rename = "その他")]
    Other,
}

impl SealNameCategory {
    pub const ALL: [SealNameCategory; 12] = [
        SealNameCategory::FullName,
        SealNameCategory::SurnameOnly,
        SealNameCategory::GivenNameOnly,
        SealNameCategory::FormerSurnameAndGivenName,
        SealNameCategory::FormerSurname,
        SealNameCategory::SurnameInitialAndGivenInitial,
        SealNameCategory::SurnameInitialAndGivenName,
        SealNameCategory::SurnameAndGivenInitial,
        SealNameCategory::FormerSurnameInitialAndGivenInitial,
        SealNameCategory::FormerSurnameInitialAndGivenName,
        SealNameCategory::FormerSurnameAndGivenInitial,
        SealNameCategory::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            SealNameCategory::FullName => "氏名",
            SealNameCategory::SurnameOnly => "氏のみ",
            SealNameCategory::GivenNameOnly => "名のみ",
            SealNameCategory::FormerSurnameAndGivenName => "旧氏と名",
            SealNameCategory::FormerSurname => "旧氏",
            SealNameCategory::SurnameInitialAndGivenInitial => "氏頭文字と名頭文字",
            SealNameCategory::SurnameInitialAndGivenName => "氏頭文字と名",
            SealNameCategory::SurnameAndGivenInitial => "氏と名頭文字",
            SealNameCategory::FormerSurnameInitialAndGivenInitial => "旧氏頭文字と名頭文字",
            SealNameCategory::FormerSurnameInitialAndGivenName => "旧氏頭文字と名",
            SealNameCategory::FormerSurnameAndGivenInitial => "旧氏と名頭文字",
            SealNameCategory::Other => "その他",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == label)
    }
}

/// Intake workflow chosen by the clerk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RegistrationMethod {
    /// 即時: the resident is present with identification; numbered on the spot.
    #[default]
    #[serde(rename = "即時")]
    Immediate,
    /// 照会: an inquiry letter is mailed and the record waits for the reply.
    #[serde(rename = "照会")]
    Deferred,
}

impl RegistrationMethod {
    pub const fn label(self) -> &'static str {
        match self {
            RegistrationMethod::Immediate => "即時",
            RegistrationMethod::Deferred => "照会",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        [RegistrationMethod::Immediate, RegistrationMethod::Deferred]
            .into_iter()
            .find(|method| method.label() == label)
    }
}

/// Untyped registration form as received from the intake boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationDraft {
    pub name: Option<String>,
    pub name_kana: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<String>,
    pub address_detail: Option<String>,
    pub mailing_number: Option<String>,
    pub household_number: Option<String>,
    pub seal_name: Option<String>,
    pub seal_name_category: Option<String>,
    pub registration_method: Option<String>,
}

impl RegistrationDraft {
    /// Assign a form field by its wire name; unknown names are ignored.
    pub fn set_field(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "name" => &mut self.name,
            "nameKana" => &mut self.name_kana,
            "dateOfBirth" => &mut self.date_of_birth,
            "gender" => &mut self.gender,
            "postalCode" => &mut self.postal_code,
            "address" => &mut self.address,
            "addressDetail" => &mut self.address_detail,
            "mailingNumber" => &mut self.mailing_number,
            "householdNumber" => &mut self.household_number,
            "sealName" => &mut self.seal_name,
            "sealNameCategory" => &mut self.seal_name_category,
            "registrationMethod" => &mut self.registration_method,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Validated, normalized registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationIntent {
    pub name: String,
    pub name_kana: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub postal_code: String,
    pub address: String,
    pub address_detail: String,
    pub mailing_number: String,
    pub household_number: String,
    pub seal_name: String,
    pub seal_name_category: SealNameCategory,
    pub registration_method: RegistrationMethod,
}

/// A seal registration record (印鑑登録原票).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub registration_number: Option<RegistrationNumber>,
    pub name: String,
    pub name_kana: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub postal_code: String,
    pub address: String,
    pub address_detail: String,
    pub mailing_number: String,
    pub household_number: String,
    pub registration_date: Option<NaiveDate>,
    pub status: RegistrationStatus,
    pub seal_name: String,
    pub seal_name_category: SealNameCategory,
    #[serde(
        rename = "sealImageBase64",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub seal_image: Option<SealImage>,
}

impl Registration {
    /// Address line with the detail (方書) appended when present.
    pub fn full_address(&self) -> String {
        if self.address_detail.is_empty() {
            self.address.clone()
        } else {
            format!("{} {}", self.address, self.address_detail)
        }
    }

    /// True when number, date and status agree with each other.
    pub fn is_consistent(&self) -> bool {
        let numbered = self.registration_number.is_some();
        numbered == self.registration_date.is_some() && numbered == self.status.is_numbered()
    }
}

/// Optional search filters; an absent or empty field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchFilter {
    pub id: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl SearchFilter {
    pub fn is_empty(&self) -> bool {
        [&self.id, &self.name, &self.address]
            .into_iter()
            .all(|term| active_term(term).is_none())
    }

    pub fn matches(&self, record: &Registration) -> bool {
        if let Some(term) = active_term(&self.id) {
            let number = record
                .registration_number
                .as_ref()
                .map(RegistrationNumber::as_str)
                .unwrap_or_default();
            if !record.id.as_str().contains(term) && !number.contains(term) {
                return false;
            }
        }
        if let Some(term) = active_term(&self.name) {
            if !record.name.contains(term) && !record.name_kana.contains(term) {
                return false;
            }
        }
        if let Some(term) = active_term(&self.address) {
            if !record.address.contains(term) {
                return false;
            }
        }
        true
    }
}

fn active_term(term: &Option<String>) -> Option<&str> {
    term.as_deref().filter(|value| !value.is_empty())
}
