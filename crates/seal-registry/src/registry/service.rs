use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use super::certificate::Certificate;
use super::domain::{
    Registration, RegistrationDraft, RegistrationId, RegistrationIntent, RegistrationMethod,
    RegistrationNumber, RegistrationStatus, SearchFilter,
};
use super::seal::render_seal_svg;
use super::store::{RegistrationRepository, RepositoryError, Transition};
use super::upload::{SealImage, UploadRejected};
use super::validation::{validate, ValidationErrors};
use crate::config::RegistryConfig;

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Statuses `revoke` may start from; a revoked record is returned as is.
const REVOCABLE: [RegistrationStatus; 2] =
    [RegistrationStatus::Active, RegistrationStatus::Revoked];

/// Service composing validation, numbering and the record store.
pub struct RegistrationService<R> {
    repository: Arc<R>,
    registration_numbers: AtomicU64,
    clock: Clock,
    max_seal_image_bytes: usize,
    certificate_issuer: String,
}

impl<R> RegistrationService<R>
where
    R: RegistrationRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: &RegistryConfig) -> Self {
        Self {
            repository,
            registration_numbers: AtomicU64::new(config.registration_number_start),
            clock: Arc::new(|| Local::now().date_naive()),
            max_seal_image_bytes: config.max_seal_image_bytes,
            certificate_issuer: config.certificate_issuer.clone(),
        }
    }

    /// Replace the source of "today" used for registration and issue dates.
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    pub fn max_seal_image_bytes(&self) -> usize {
        self.max_seal_image_bytes
    }

    pub fn today(&self) -> NaiveDate {
        (self.clock)()
    }

    fn next_registration_number(&self) -> RegistrationNumber {
        let number = self.registration_numbers.fetch_add(1, Ordering::Relaxed);
        RegistrationNumber(number.to_string())
    }

    /// Validate an intake form and create the registration.
    pub fn register(
        &self,
        draft: &RegistrationDraft,
        seal_image: Option<SealImage>,
    ) -> Result<Registration, RegistrationServiceError> {
        let intent = validate(draft)?;
        self.create(intent, seal_image)
    }

    /// Create a registration: immediate intake is numbered and dated today, deferred intake
    /// waits for the inquiry reply.
    pub fn create(
        &self,
        intent: RegistrationIntent,
        seal_image: Option<SealImage>,
    ) -> Result<Registration, RegistrationServiceError> {
        let RegistrationIntent {
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
        } = intent;

        let (registration_number, registration_date, status) = match registration_method {
            RegistrationMethod::Immediate => (
                Some(self.next_registration_number()),
                Some(self.today()),
                RegistrationStatus::Active,
            ),
            RegistrationMethod::Deferred => (None, None, RegistrationStatus::PendingInquiry),
        };

        let record = Registration {
            id: RegistrationId::unassigned(),
            registration_number,
            name,
            name_kana,
            date_of_birth,
            gender,
            postal_code,
            address,
            address_detail,
            mailing_number,
            household_number,
            registration_date,
            status,
            seal_name,
            seal_name_category,
            seal_image,
        };

        let stored = self.repository.append(record)?;
        info!(
            id = %stored.id,
            registration_number = ?stored.registration_number.as_ref().map(RegistrationNumber::as_str),
            method = registration_method.label(),
            has_seal_image = stored.seal_image.is_some(),
            "seal registration created"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &RegistrationId) -> Result<Registration, RegistrationServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| RegistrationServiceError::NotFound(id.clone()))
    }

    /// Records matching every supplied filter, in registration order.
    pub fn search(
        &self,
        filter: &SearchFilter,
    ) -> Result<Vec<Registration>, RegistrationServiceError> {
        let records = if filter.is_empty() {
            self.repository.all()?
        } else {
            self.repository.search(filter)?
        };
        debug!(?filter, matches = records.len(), "registration search");
        Ok(records)
    }

    /// Revoke (抹消) an active registration. Revoking twice returns the record unchanged.
    pub fn revoke(&self, id: &RegistrationId) -> Result<Registration, RegistrationServiceError> {
        let transition = self
            .repository
            .transition(id, &REVOCABLE, RegistrationStatus::Revoked)?
            .ok_or_else(|| RegistrationServiceError::NotFound(id.clone()))?;

        match transition {
            Transition::Applied {
                record,
                from: RegistrationStatus::Revoked,
            } => Ok(record),
            Transition::Applied { record, from } => {
                info!(id = %record.id, from = from.label(), "seal registration revoked");
                Ok(record)
            }
            Transition::Refused(from) => Err(RegistrationServiceError::InvalidTransition {
                id: id.clone(),
                from,
                to: RegistrationStatus::Revoked,
            }),
        }
    }

    /// Overwrite the status without checking the transition.
    pub fn update_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Registration, RegistrationServiceError> {
        let updated = self.set_status(id, status)?;
        info!(id = %updated.id, status = status.label(), "seal registration status updated");
        Ok(updated)
    }

    fn set_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Registration, RegistrationServiceError> {
        self.repository
            .set_status(id, status)?
            .ok_or_else(|| RegistrationServiceError::NotFound(id.clone()))
    }

    /// Certificate preview dated today; only active registrations qualify.
    pub fn certificate(
        &self,
        id: &RegistrationId,
    ) -> Result<Certificate, RegistrationServiceError> {
        let record = self.get(id)?;
        if record.status == RegistrationStatus::Active && record.registration_number.is_none() {
            return Err(RegistrationServiceError::Unnumbered { id: record.id });
        }
        Certificate::issue(&record, self.today(), &self.certificate_issuer).ok_or(
            RegistrationServiceError::CertificateUnavailable {
                id: record.id,
                status: record.status,
            },
        )
    }

    pub fn seal_svg(
        &self,
        id: &RegistrationId,
        size: u32,
    ) -> Result<String, RegistrationServiceError> {
        let record = self.get(id)?;
        Ok(render_seal_svg(
            &record.seal_name,
            record.seal_image.as_ref(),
            size,
        ))
    }
}

/// Error raised by the registration service.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Upload(#[from] UploadRejected),
    #[error("登録番号 {0} の記録が見つかりません")]
    NotFound(RegistrationId),
    #[error("登録番号 {id} は{from}のため{to}にできません")]
    InvalidTransition {
        id: RegistrationId,
        from: RegistrationStatus,
        to: RegistrationStatus,
    },
    #[error("登録番号 {id} は{status}のため証明書を発行できません")]
    CertificateUnavailable {
        id: RegistrationId,
        status: RegistrationStatus,
    },
    #[error("記録 {id} は登録番号が未付与のため証明書を発行できません")]
    Unnumbered { id: RegistrationId },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
