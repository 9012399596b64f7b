use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartError, rejection::JsonRejection, DefaultBodyLimit, Multipart, Path,
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::domain::{RegistrationDraft, RegistrationId, RegistrationStatus, SearchFilter};
use super::service::{RegistrationService, RegistrationServiceError};
use super::store::RegistrationRepository;
use super::upload::SealImage;
use super::validation::validate;

/// Multipart field carrying the optional seal image file.
pub const SEAL_IMAGE_FIELD: &str = "sealImage";

/// Room for the text fields and multipart framing on top of the image limit.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

const DEFAULT_SEAL_SIZE: u32 = 120;

/// Router builder exposing the registration endpoints.
pub fn registration_router<R>(service: Arc<RegistrationService<R>>) -> Router
where
    R: RegistrationRepository + 'static,
{
    let body_limit = service.max_seal_image_bytes() + FORM_OVERHEAD_BYTES;

    Router::new()
        .route(
            "/api/registrations",
            get(search_handler::<R>).post(create_handler::<R>),
        )
        .route("/api/registrations/:id", get(detail_handler::<R>))
        .route(
            "/api/registrations/:id/status",
            patch(update_status_handler::<R>),
        )
        .route("/api/registrations/:id/revoke", post(revoke_handler::<R>))
        .route(
            "/api/registrations/:id/certificate",
            get(certificate_handler::<R>),
        )
        .route("/api/registrations/:id/seal.svg", get(seal_handler::<R>))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusUpdate {
    pub(crate) status: RegistrationStatus,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SealQuery {
    pub(crate) size: Option<u32>,
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    Query(filter): Query<SearchFilter>,
) -> Response
where
    R: RegistrationRepository + 'static,
{
    match service.search(&filter) {
        Ok(records) => (StatusCode::OK, Json(json!({ "data": records }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: RegistrationRepository + 'static,
{
    match service.get(&RegistrationId(id)) {
        Ok(record) => (StatusCode::OK, Json(json!({ "data": record }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    mut multipart: Multipart,
) -> Response
where
    R: RegistrationRepository + 'static,
{
    let mut draft = RegistrationDraft::default();
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return multipart_rejection(err),
        };
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == SEAL_IMAGE_FIELD {
            let content_type = field.content_type().map(str::to_string);
            match field.bytes().await {
                Ok(bytes) => upload = Some((content_type, bytes.to_vec())),
                Err(err) => return multipart_rejection(err),
            }
        } else {
            match field.text().await {
                Ok(value) => {
                    if !draft.set_field(&name, value) {
                        debug!(field = %name, "ignoring unknown registration form field");
                    }
                }
                Err(err) => return multipart_rejection(err),
            }
        }
    }

    let intent = match validate(&draft) {
        Ok(intent) => intent,
        Err(errors) => return RegistrationServiceError::from(errors).into_response(),
    };

    let seal_image = match upload {
        Some((content_type, bytes)) => {
            match SealImage::from_upload(
                content_type.as_deref(),
                bytes,
                service.max_seal_image_bytes(),
            ) {
                Ok(image) => image,
                Err(rejected) => return RegistrationServiceError::from(rejected).into_response(),
            }
        }
        None => None,
    };

    match service.create(intent, seal_image) {
        Ok(record) => (StatusCode::CREATED, Json(json!({ "data": record }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn update_status_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    Path(id): Path<String>,
    update: Result<Json<StatusUpdate>, JsonRejection>,
) -> Response
where
    R: RegistrationRepository + 'static,
{
    let Json(update) = match update {
        Ok(update) => update,
        Err(rejection) => return json_rejection(rejection),
    };
    match service.update_status(&RegistrationId(id), update.status) {
        Ok(record) => (StatusCode::OK, Json(json!({ "data": record }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn revoke_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: RegistrationRepository + 'static,
{
    match service.revoke(&RegistrationId(id)) {
        Ok(record) => (StatusCode::OK, Json(json!({ "data": record }))).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn certificate_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: RegistrationRepository + 'static,
{
    match service.certificate(&RegistrationId(id)) {
        Ok(certificate) => {
            let text = certificate.render_text();
            let payload = json!({ "data": certificate, "text": text });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn seal_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    Path(id): Path<String>,
    Query(query): Query<SealQuery>,
) -> Response
where
    R: RegistrationRepository + 'static,
{
    let size = query.size.unwrap_or(DEFAULT_SEAL_SIZE).clamp(16, 1024);
    match service.seal_svg(&RegistrationId(id), size) {
        Ok(svg) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/svg+xml; charset=utf-8")],
            svg,
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

fn multipart_rejection(err: MultipartError) -> Response {
    let payload = json!({ "error": err.body_text() });
    (err.status(), Json(payload)).into_response()
}

fn json_rejection(rejection: JsonRejection) -> Response {
    let payload = json!({ "error": rejection.body_text() });
    (rejection.status(), Json(payload)).into_response()
}

impl IntoResponse for RegistrationServiceError {
    fn into_response(self) -> Response {
        let (status, payload) = match &self {
            RegistrationServiceError::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "バリデーションエラー", "issues": issues }),
            ),
            RegistrationServiceError::Upload(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            RegistrationServiceError::NotFound(_) => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            RegistrationServiceError::InvalidTransition { .. }
            | RegistrationServiceError::CertificateUnavailable { .. }
            | RegistrationServiceError::Unnumbered { .. } => {
                (StatusCode::CONFLICT, json!({ "error": self.to_string() }))
            }
            RegistrationServiceError::Repository(err) => {
                error!(error = %err, "registration store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };
        (status, Json(payload)).into_response()
    }
}
