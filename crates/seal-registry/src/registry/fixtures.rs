//! Sample residents loaded at startup when seeding is enabled.

use chrono::NaiveDate;

use super::domain::{
    Gender, Registration, RegistrationId, RegistrationNumber, RegistrationStatus,
    SealNameCategory,
};

struct Sample {
    sequence: u64,
    number_and_date: Option<(&'static str, (i32, u32, u32))>,
    name: &'static str,
    name_kana: &'static str,
    date_of_birth: &'static str,
    gender: Gender,
    address: &'static str,
    address_detail: &'static str,
    postal_code: &'static str,
    status: RegistrationStatus,
}

const SAMPLES: [Sample; 4] = [
    Sample {
        sequence: 1,
        number_and_date: Some(("20240001", (2024, 1, 15))),
        name: "山田 太郎",
        name_kana: "ヤマダ タロウ",
        date_of_birth: "昭和40年3月15日",
        gender: Gender::Male,
        address: "東京都千代田区霞が関一丁目1番1号",
        address_detail: "",
        postal_code: "100-8914",
        status: RegistrationStatus::Active,
    },
    Sample {
        sequence: 2,
        number_and_date: Some(("20240002", (2024, 2, 3))),
        name: "鈴木 花子",
        name_kana: "スズキ ハナコ",
        date_of_birth: "平成5年7月22日",
        gender: Gender::Female,
        address: "東京都渋谷区渋谷二丁目21番1号",
        address_detail: "〇〇マンション101号",
        postal_code: "150-8010",
        status: RegistrationStatus::Active,
    },
    Sample {
        sequence: 3,
        number_and_date: Some(("20230005", (2023, 5, 10))),
        name: "田中 次郎",
        name_kana: "タナカ ジロウ",
        date_of_birth: "昭和55年11月30日",
        gender: Gender::Male,
        address: "東京都新宿区西新宿二丁目8番1号",
        address_detail: "",
        postal_code: "163-8001",
        status: RegistrationStatus::Revoked,
    },
    Sample {
        sequence: 4,
        number_and_date: None,
        name: "佐藤 美咲",
        name_kana: "サトウ ミサキ",
        date_of_birth: "令和元年5月1日",
        gender: Gender::Female,
        address: "東京都港区芝公園四丁目2番8号",
        address_detail: "",
        postal_code: "105-8011",
        status: RegistrationStatus::PendingInquiry,
    },
];

/// Four residents: two active, one revoked, one awaiting an inquiry reply.
pub fn sample_registrations() -> Vec<Registration> {
    SAMPLES.iter().map(Sample::to_registration).collect()
}

impl Sample {
    fn to_registration(&self) -> Registration {
        let (registration_number, registration_date) = match self.number_and_date {
            Some((number, (year, month, day))) => (
                Some(RegistrationNumber(number.to_string())),
                NaiveDate::from_ymd_opt(year, month, day),
            ),
            None => (None, None),
        };

        Registration {
            id: RegistrationId::from_sequence(self.sequence),
            registration_number,
            name: self.name.to_string(),
            name_kana: self.name_kana.to_string(),
            date_of_birth: self.date_of_birth.to_string(),
            gender: self.gender,
            postal_code: self.postal_code.to_string(),
            address: self.address.to_string(),
            address_detail: self.address_detail.to_string(),
            mailing_number: format!("100000{}", self.sequence),
            household_number: format!("200000{}", self.sequence),
            registration_date,
            status: self.status,
            seal_name: crate::registry::validation::family_name(self.name).to_string(),
            seal_name_category: SealNameCategory::FullName,
            seal_image: None,
        }
    }
}
