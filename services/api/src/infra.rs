use axum::http::{header, HeaderValue, Method};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use seal_registry::config::{RegistryConfig, ServerConfig};
use seal_registry::registry::{sample_registrations, InMemoryRegistrationStore};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store backing the service, seeded with the sample residents when enabled.
pub(crate) fn build_store(config: &RegistryConfig) -> Arc<InMemoryRegistrationStore> {
    let store = if config.seed_sample_data {
        InMemoryRegistrationStore::with_records(sample_registrations())
    } else {
        InMemoryRegistrationStore::default()
    };
    Arc::new(store)
}

pub(crate) fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "skipping unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
