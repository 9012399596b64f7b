//! Seal registration intake, search, revocation and certificate issuance.
//!
//! Requests flow through [`validation`] into the [`RegistrationService`], which numbers
//! immediate registrations and hands records to a [`RegistrationRepository`]. The
//! [`registration_router`] exposes the service over HTTP.

pub mod certificate;
pub mod domain;
pub mod fixtures;
pub mod router;
pub mod seal;
pub mod service;
pub mod store;
pub mod upload;
pub mod validation;

#[cfg(test)]
mod tests;

pub use certificate::Certificate;
pub use domain::{
    Gender, Registration, RegistrationDraft, RegistrationId, RegistrationIntent,
    RegistrationMethod, RegistrationNumber, RegistrationStatus, SealNameCategory, SearchFilter,
};
pub use fixtures::sample_registrations;
pub use router::registration_router;
pub use seal::render_seal_svg;
pub use service::{RegistrationService, RegistrationServiceError};
pub use store::{
    InMemoryRegistrationStore, RegistrationRepository, RepositoryError, Transition,
};
pub use upload::{ImageMediaType, SealImage, UploadRejected, DEFAULT_MAX_SEAL_IMAGE_BYTES};
pub use validation::{validate, ValidationErrors};
