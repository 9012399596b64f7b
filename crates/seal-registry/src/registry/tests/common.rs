use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::RegistryConfig;
use crate::registry::domain::{
    Registration, RegistrationDraft, RegistrationId, RegistrationStatus, SearchFilter,
};
use crate::registry::fixtures::sample_registrations;
use crate::registry::store::{
    InMemoryRegistrationStore, RegistrationRepository, RepositoryError, Transition,
};
use crate::registry::{registration_router, RegistrationService};

pub(super) const BOUNDARY: &str = "seal-registry-test-boundary";

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 24).expect("valid date")
}

pub(super) fn registry_config() -> RegistryConfig {
    RegistryConfig {
        seed_sample_data: false,
        registration_number_start: 20_250_001,
        max_seal_image_bytes: 64,
        certificate_issuer: "○○市長".to_string(),
    }
}

/// Complete, valid immediate-registration form.
pub(super) fn draft() -> RegistrationDraft {
    RegistrationDraft {
        name: Some("高橋 一郎".to_string()),
        name_kana: Some("タカハシ イチロウ".to_string()),
        date_of_birth: Some("昭和60年4月1日".to_string()),
        gender: Some("男".to_string()),
        postal_code: Some("100-0001".to_string()),
        address: Some("東京都千代田区千代田1番1号".to_string()),
        address_detail: Some("".to_string()),
        mailing_number: Some("1000099".to_string()),
        household_number: Some("2000099".to_string()),
        seal_name: None,
        seal_name_category: Some("氏名".to_string()),
        registration_method: Some("即時".to_string()),
    }
}

pub(super) fn deferred_draft() -> RegistrationDraft {
    RegistrationDraft {
        registration_method: Some("照会".to_string()),
        ..draft()
    }
}

pub(super) fn build_service() -> (
    RegistrationService<InMemoryRegistrationStore>,
    Arc<InMemoryRegistrationStore>,
) {
    let store = Arc::new(InMemoryRegistrationStore::default());
    let service = RegistrationService::new(store.clone(), &registry_config()).with_clock(today);
    (service, store)
}

pub(super) fn build_seeded_service() -> (
    RegistrationService<InMemoryRegistrationStore>,
    Arc<InMemoryRegistrationStore>,
) {
    let store = Arc::new(InMemoryRegistrationStore::with_records(
        sample_registrations(),
    ));
    let service = RegistrationService::new(store.clone(), &registry_config()).with_clock(today);
    (service, store)
}

pub(super) fn seeded_router() -> (axum::Router, Arc<InMemoryRegistrationStore>) {
    let (service, store) = build_seeded_service();
    (registration_router(Arc::new(service)), store)
}

pub(super) struct UnavailableRepository;

impl RegistrationRepository for UnavailableRepository {
    fn append(&self, _record: Registration) -> Result<Registration, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RegistrationId) -> Result<Option<Registration>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn search(&self, _filter: &SearchFilter) -> Result<Vec<Registration>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_status(
        &self,
        _id: &RegistrationId,
        _status: RegistrationStatus,
    ) -> Result<Option<Registration>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn transition(
        &self,
        _id: &RegistrationId,
        _allowed_from: &[RegistrationStatus],
        _to: RegistrationStatus,
    ) -> Result<Option<Transition>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<Registration>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Store wrapper where another clerk's status update lands on `target` in the middle of every
/// read and right before every guarded transition.
pub(super) struct InterleavingRepository {
    pub(super) inner: InMemoryRegistrationStore,
    target: RegistrationId,
    status: RegistrationStatus,
}

impl InterleavingRepository {
    pub(super) fn seeded(target: &str, status: RegistrationStatus) -> Self {
        Self {
            inner: InMemoryRegistrationStore::with_records(sample_registrations()),
            target: RegistrationId(target.to_string()),
            status,
        }
    }

    fn interleave(&self) -> Result<(), RepositoryError> {
        self.inner.set_status(&self.target, self.status).map(|_| ())
    }
}

impl RegistrationRepository for InterleavingRepository {
    fn append(&self, record: Registration) -> Result<Registration, RepositoryError> {
        self.inner.append(record)
    }

    fn fetch(&self, id: &RegistrationId) -> Result<Option<Registration>, RepositoryError> {
        let snapshot = self.inner.fetch(id)?;
        self.interleave()?;
        Ok(snapshot)
    }

    fn search(&self, filter: &SearchFilter) -> Result<Vec<Registration>, RepositoryError> {
        self.inner.search(filter)
    }

    fn set_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>, RepositoryError> {
        self.inner.set_status(id, status)
    }

    fn transition(
        &self,
        id: &RegistrationId,
        allowed_from: &[RegistrationStatus],
        to: RegistrationStatus,
    ) -> Result<Option<Transition>, RepositoryError> {
        self.interleave()?;
        self.inner.transition(id, allowed_from, to)
    }

    fn all(&self) -> Result<Vec<Registration>, RepositoryError> {
        self.inner.all()
    }
}

/// Text fields of `draft` in multipart form order.
pub(super) fn form_fields(draft: &RegistrationDraft) -> Vec<(&'static str, String)> {
    let fields = [
        ("name", &draft.name),
        ("nameKana", &draft.name_kana),
        ("dateOfBirth", &draft.date_of_birth),
        ("gender", &draft.gender),
        ("postalCode", &draft.postal_code),
        ("address", &draft.address),
        ("addressDetail", &draft.address_detail),
        ("mailingNumber", &draft.mailing_number),
        ("householdNumber", &draft.household_number),
        ("sealName", &draft.seal_name),
        ("sealNameCategory", &draft.seal_name_category),
        ("registrationMethod", &draft.registration_method),
    ];
    fields
        .into_iter()
        .filter_map(|(name, value)| value.clone().map(|value| (name, value)))
        .collect()
}

pub(super) struct FileUpload<'a> {
    pub(super) content_type: &'a str,
    pub(super) bytes: &'a [u8],
}

pub(super) fn multipart_body(fields: &[(&str, String)], file: Option<FileUpload<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"sealImage\"; filename=\"seal\"\r\nContent-Type: {}\r\n\r\n",
                file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn multipart_request(body: Vec<u8>) -> Request<Body> {
    Request::post("/api/registrations")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
