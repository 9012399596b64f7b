use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Gender, Registration, RegistrationNumber, RegistrationStatus};
use super::upload::SealImage;
use crate::wareki::format_wareki;

pub const CERTIFICATE_TITLE: &str = "印鑑登録証明書";
pub const CERTIFICATE_STATEMENT: &str = "この証明書は印鑑の登録がされていることを証明するものです。";

/// Printable seal registration certificate (印鑑登録証明書) for an active record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub title: &'static str,
    pub name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub address: String,
    pub registration_number: RegistrationNumber,
    pub seal_name: String,
    #[serde(rename = "sealImageBase64", skip_serializing_if = "Option::is_none")]
    pub seal_image: Option<SealImage>,
    pub issued_on: NaiveDate,
    pub issued_on_wareki: String,
    pub issuer: String,
    pub statement: &'static str,
}

impl Certificate {
    /// Build the certificate; only active, numbered records qualify.
    pub fn issue(record: &Registration, issued_on: NaiveDate, issuer: &str) -> Option<Self> {
        if record.status != RegistrationStatus::Active {
            return None;
        }
        let registration_number = record.registration_number.clone()?;

        Some(Self {
            title: CERTIFICATE_TITLE,
            name: record.name.clone(),
            date_of_birth: record.date_of_birth.clone(),
            gender: record.gender,
            address: record.full_address(),
            registration_number,
            seal_name: record.seal_name.clone(),
            seal_image: record.seal_image.clone(),
            issued_on,
            issued_on_wareki: format_wareki(issued_on).unwrap_or_else(|| issued_on.to_string()),
            issuer: issuer.to_string(),
            statement: CERTIFICATE_STATEMENT,
        })
    }

    /// Plain-text print layout.
    pub fn render_text(&self) -> String {
        let seal = if self.seal_image.is_some() {
            format!("［{}］（登録画像）", self.seal_name)
        } else {
            format!("［{}］", self.seal_name)
        };
        let rows = [
            ("氏　名", self.name.as_str()),
            ("生年月日", self.date_of_birth.as_str()),
            ("性　別", self.gender.label()),
            ("住　所", self.address.as_str()),
            ("登録番号", self.registration_number.as_str()),
            ("印　影", seal.as_str()),
        ];

        let mut out = String::new();
        let _ = writeln!(out, "{}", spaced(self.title));
        let _ = writeln!(out);
        for (label, value) in rows {
            let _ = writeln!(out, "{label}｜{value}");
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "発行日: {}", self.issued_on_wareki);
        let _ = writeln!(out, "{}　印", self.issuer);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.statement);
        out
    }
}

/// `印鑑登録証明書` → `印　鑑　登　録　証　明　書`
fn spaced(title: &str) -> String {
    let chars: Vec<String> = title.chars().map(String::from).collect();
    chars.join("　")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::fixtures::sample_registrations;

    fn issued_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 24).expect("valid date")
    }

    #[test]
    fn active_records_produce_certificates() {
        let records = sample_registrations();
        let suzuki = &records[1];
        let certificate = Certificate::issue(suzuki, issued_on(), "○○市長").expect("active");

        assert_eq!(certificate.registration_number.as_str(), "20240002");
        assert_eq!(
            certificate.address,
            "東京都渋谷区渋谷二丁目21番1号 〇〇マンション101号"
        );
        assert_eq!(certificate.issued_on_wareki, "令和8年2月24日");

        let text = certificate.render_text();
        assert!(text.starts_with("印　鑑　登　録　証　明　書"));
        assert!(text.contains("氏　名｜鈴木 花子"));
        assert!(text.contains("発行日: 令和8年2月24日"));
        assert!(text.contains("○○市長　印"));
        assert!(text.ends_with(&format!("{CERTIFICATE_STATEMENT}\n")));
    }

    #[test]
    fn revoked_and_pending_records_are_refused() {
        let records = sample_registrations();
        assert!(Certificate::issue(&records[2], issued_on(), "○○市長").is_none());
        assert!(Certificate::issue(&records[3], issued_on(), "○○市長").is_none());
    }
}
