use super::common::*;
use crate::registry::domain::{
    Gender, RegistrationDraft, RegistrationMethod, SealNameCategory,
};
use crate::registry::validation::{family_name, validate};

#[test]
fn valid_draft_is_normalized() {
    let mut form = draft();
    form.name = Some("  高橋 一郎 ".to_string());
    form.address_detail = None;
    form.postal_code = Some("".to_string());

    let intent = validate(&form).expect("draft validates");
    assert_eq!(intent.name, "高橋 一郎");
    assert_eq!(intent.gender, Gender::Male);
    assert_eq!(intent.postal_code, "");
    assert_eq!(intent.address_detail, "");
    assert_eq!(intent.seal_name, "高橋");
    assert_eq!(intent.seal_name_category, SealNameCategory::FullName);
    assert_eq!(intent.registration_method, RegistrationMethod::Immediate);
}

#[test]
fn registration_method_defaults_to_immediate() {
    let mut form = draft();
    form.registration_method = None;
    assert_eq!(
        validate(&form).expect("validates").registration_method,
        RegistrationMethod::Immediate
    );

    form.registration_method = Some("照会".to_string());
    assert_eq!(
        validate(&form).expect("validates").registration_method,
        RegistrationMethod::Deferred
    );
}

#[test]
fn explicit_seal_name_is_kept() {
    let mut form = draft();
    form.seal_name = Some("一郎".to_string());
    form.seal_name_category = Some("名のみ".to_string());

    let intent = validate(&form).expect("validates");
    assert_eq!(intent.seal_name, "一郎");
    assert_eq!(intent.seal_name_category, SealNameCategory::GivenNameOnly);
}

#[test]
fn every_failing_field_is_reported_in_one_pass() {
    let errors = validate(&RegistrationDraft::default()).expect_err("empty form rejected");

    for field in [
        "name",
        "nameKana",
        "dateOfBirth",
        "gender",
        "address",
        "mailingNumber",
        "householdNumber",
        "sealNameCategory",
    ] {
        assert!(errors.contains(field), "{field} should be reported");
    }
    assert!(!errors.contains("postalCode"));
    assert!(!errors.contains("registrationMethod"));
    assert_eq!(errors.messages("name"), ["氏名は必須です"]);
}

#[test]
fn whitespace_only_required_fields_are_missing() {
    let mut form = draft();
    form.address = Some("　 ".to_string());
    form.mailing_number = Some("   ".to_string());

    let errors = validate(&form).expect_err("blank fields rejected");
    assert_eq!(errors.fields().collect::<Vec<_>>(), ["address", "mailingNumber"]);
}

#[test]
fn phonetic_name_must_be_katakana() {
    let mut form = draft();
    form.name_kana = Some("たかはし いちろう".to_string());
    let errors = validate(&form).expect_err("hiragana rejected");
    assert_eq!(
        errors.messages("nameKana"),
        ["フリガナはカタカナで入力してください"]
    );

    form.name_kana = Some("ヴァージニア　ルー".to_string());
    assert!(validate(&form).is_ok(), "prolonged mark and ideographic space allowed");
}

#[test]
fn date_of_birth_must_be_era_qualified() {
    let mut form = draft();
    for bad in ["1985年4月1日", "S60.4.1", "昭和六十年四月一日"] {
        form.date_of_birth = Some(bad.to_string());
        let errors = validate(&form).expect_err("gregorian rejected");
        assert!(errors.contains("dateOfBirth"), "{bad} should be rejected");
    }

    for good in ["明治45年7月29日", "大正元年8月1日", "令和5年12月31日"] {
        form.date_of_birth = Some(good.to_string());
        assert!(validate(&form).is_ok(), "{good} should validate");
    }
}

#[test]
fn postal_code_format_is_checked_when_present() {
    let mut form = draft();
    for bad in ["1000001", "100-00011", "１００-０００１"] {
        form.postal_code = Some(bad.to_string());
        let errors = validate(&form).expect_err("malformed postal code");
        assert_eq!(
            errors.messages("postalCode"),
            ["郵便番号は XXX-XXXX 形式で入力してください"]
        );
    }
    form.postal_code = None;
    assert!(validate(&form).is_ok());
}

#[test]
fn enumerations_reject_unknown_values() {
    let mut form = draft();
    form.gender = Some("male".to_string());
    form.seal_name_category = Some("通称".to_string());
    form.registration_method = Some("郵送".to_string());

    let errors = validate(&form).expect_err("unknown enumerations");
    assert_eq!(
        errors.fields().collect::<Vec<_>>(),
        ["gender", "registrationMethod", "sealNameCategory"]
    );
}

#[test]
fn validation_errors_display_all_messages() {
    let mut form = draft();
    form.name = None;
    form.gender = None;
    let errors = validate(&form).expect_err("missing fields");
    let rendered = errors.to_string();
    assert!(rendered.starts_with("バリデーションエラー: "));
    assert!(rendered.contains("氏名は必須です"));
}

#[test]
fn family_name_splits_on_either_space() {
    assert_eq!(family_name("山田 太郎"), "山田");
    assert_eq!(family_name("山田　太郎"), "山田");
    assert_eq!(family_name("山田"), "山田");
}

#[test]
fn seal_name_default_splits_on_any_whitespace() {
    assert_eq!(family_name("山田\t太郎"), "山田");
    assert_eq!(family_name("山田\u{00a0}太郎"), "山田");

    let mut form = draft();
    form.name = Some("高橋\t一郎".to_string());
    assert_eq!(validate(&form).expect("validates").seal_name, "高橋");
}
