mod resource;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderMap, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use tracing::error;

use catalogo_core::{PageDefaults, ServiceError, error_key, headers};

use crate::model::{Marca, Modelo};
use crate::service::CatalogoService;

const JSON: &str = "application/json";
const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// Settings shared by every resource router.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Application name used in alert header names and messages.
    pub app_name: String,
    pub page: PageDefaults,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            app_name: "catalogoApp".to_string(),
            page: PageDefaults::default(),
        }
    }
}

/// Build the `marcas` and `modelos` routers.
///
/// `mount` is the path the returned router is nested under; it is used to
/// build `Location` and `Link` URLs.
pub fn router(service: Arc<CatalogoService>, settings: Arc<ApiSettings>, mount: &str) -> Router {
    Router::new()
        .merge(resource::routes::<Marca>(
            Arc::clone(&service),
            Arc::clone(&settings),
            mount,
        ))
        .merge(resource::routes::<Modelo>(service, settings, mount))
}

/// A service error plus the application name, so the response can carry
/// the `X-{app}-error` alert headers.
#[derive(Debug)]
pub struct ApiError {
    app: String,
    err: ServiceError,
}

impl ApiError {
    pub fn new(app: &str, err: ServiceError) -> Self {
        Self {
            app: app.to_string(),
            err,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.err.status_code().is_server_error() {
            error!(code = self.err.error_code(), "request failed: {}", self.err);
        }
        let alert = match self.err.alert() {
            Some((entity, key)) => headers::failure(&self.app, entity, key),
            None => HeaderMap::new(),
        };
        (alert, self.err.into_response()).into_response()
    }
}

/// Decode a JSON request body.
///
/// The content type must be `application/json`, or also
/// `application/merge-patch+json` when `merge_patch` is set.
pub(crate) fn parse_body<T: DeserializeOwned>(
    headers: &HeaderMap,
    body: &[u8],
    merge_patch: bool,
    entity: &str,
) -> Result<T, ServiceError> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let accepted = mime == JSON || (merge_patch && mime == MERGE_PATCH_JSON);
    if !accepted {
        return Err(ServiceError::UnsupportedMediaType(format!(
            "content type '{}' is not supported",
            content_type
        )));
    }

    serde_json::from_slice(body).map_err(|e| {
        ServiceError::bad_request(entity, error_key::BAD_BODY, format!("malformed body: {}", e))
    })
}
