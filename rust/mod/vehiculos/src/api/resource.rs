//! Generic REST collection handlers.
//!
//! Routes, relative to the mount point:
//!   POST   /{resources}       create, 201 + `Location`
//!   GET    /{resources}       page, `X-Total-Count` + `Link`
//!   GET    /{resources}/{id}  read one, 404 with empty body if absent
//!   PUT    /{resources}/{id}  replace
//!   PATCH  /{resources}/{id}  merge non-null fields
//!   DELETE /{resources}/{id}  delete, 204

use std::marker::PhantomData;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::debug;

use catalogo_core::{PageRequest, ServiceError, headers};

use super::{ApiError, ApiSettings, parse_body};
use crate::model::Identified;
use crate::service::{CatalogoService, Resource};

struct ResourceState<R: Resource> {
    service: Arc<CatalogoService>,
    settings: Arc<ApiSettings>,
    /// Collection URL as seen by clients, e.g. `/api/modelos`.
    base_path: String,
    _phantom: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceState<R> {
    fn fail(&self, err: ServiceError) -> ApiError {
        ApiError::new(&self.settings.app_name, err)
    }

    fn app(&self) -> &str {
        &self.settings.app_name
    }
}

type ResourceResult = Result<Response, ApiError>;

pub(super) fn routes<R: Resource>(
    service: Arc<CatalogoService>,
    settings: Arc<ApiSettings>,
    mount: &str,
) -> Router {
    let state = Arc::new(ResourceState::<R> {
        service,
        settings,
        base_path: format!("{}/{}", mount, R::PATH),
        _phantom: PhantomData,
    });

    let list_path = format!("/{}", R::PATH);
    let item_path = format!("/{}/{{id}}", R::PATH);

    Router::new()
        .route(&list_path, get(list_handler::<R>).post(create_handler::<R>))
        .route(
            &item_path,
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .patch(patch_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(state)
}

fn id_param(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

async fn create_handler<R: Resource>(
    State(state): State<Arc<ResourceState<R>>>,
    req_headers: HeaderMap,
    body: Bytes,
) -> ResourceResult {
    let payload: R::Payload =
        parse_body(&req_headers, &body, false, R::NAME).map_err(|e| state.fail(e))?;
    debug!("REST request to save {} : {:?}", R::NAME, payload);

    let created = state.service.create::<R>(payload).map_err(|e| state.fail(e))?;
    let id = id_param(created.id());

    let mut resp_headers = headers::entity_created(state.app(), R::NAME, &id);
    let location = format!("{}/{}", state.base_path, id);
    if let Ok(value) = HeaderValue::from_str(&location) {
        resp_headers.insert(LOCATION, value);
    }
    Ok((StatusCode::CREATED, resp_headers, Json(created)).into_response())
}

async fn update_handler<R: Resource>(
    State(state): State<Arc<ResourceState<R>>>,
    Path(id): Path<i64>,
    req_headers: HeaderMap,
    body: Bytes,
) -> ResourceResult {
    let payload: R::Payload =
        parse_body(&req_headers, &body, false, R::NAME).map_err(|e| state.fail(e))?;
    debug!("REST request to update {} : {}, {:?}", R::NAME, id, payload);

    let updated = state.service.update::<R>(id, payload).map_err(|e| state.fail(e))?;
    let resp_headers = headers::entity_updated(state.app(), R::NAME, &id_param(updated.id()));
    Ok((resp_headers, Json(updated)).into_response())
}

async fn patch_handler<R: Resource>(
    State(state): State<Arc<ResourceState<R>>>,
    Path(id): Path<i64>,
    req_headers: HeaderMap,
    body: Bytes,
) -> ResourceResult {
    let payload: R::Payload =
        parse_body(&req_headers, &body, true, R::NAME).map_err(|e| state.fail(e))?;
    debug!("REST request to partially update {} : {}, {:?}", R::NAME, id, payload);

    match state.service.partial_update::<R>(id, payload).map_err(|e| state.fail(e))? {
        Some(updated) => {
            let resp_headers =
                headers::entity_updated(state.app(), R::NAME, &id_param(updated.id()));
            Ok((resp_headers, Json(updated)).into_response())
        }
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

async fn list_handler<R: Resource>(
    State(state): State<Arc<ResourceState<R>>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ResourceResult {
    debug!("REST request to get a page of {}", R::PATH);

    let request = PageRequest::from_query(&params, &state.settings.page, R::NAME)
        .map_err(|e| state.fail(e))?;
    let page = state.service.list::<R>(&request).map_err(|e| state.fail(e))?;
    let resp_headers = headers::pagination(&state.base_path, &page, &request);
    Ok((resp_headers, Json(page.items)).into_response())
}

async fn get_handler<R: Resource>(
    State(state): State<Arc<ResourceState<R>>>,
    Path(id): Path<i64>,
) -> ResourceResult {
    debug!("REST request to get {} : {}", R::NAME, id);

    match state.service.find::<R>(id).map_err(|e| state.fail(e))? {
        Some(found) => Ok(Json(found).into_response()),
        None => Ok(StatusCode::NOT_FOUND.into_response()),
    }
}

async fn delete_handler<R: Resource>(
    State(state): State<Arc<ResourceState<R>>>,
    Path(id): Path<i64>,
) -> ResourceResult {
    debug!("REST request to delete {} : {}", R::NAME, id);

    state.service.delete::<R>(id).map_err(|e| state.fail(e))?;
    let resp_headers = headers::entity_deleted(state.app(), R::NAME, &id.to_string());
    Ok((StatusCode::NO_CONTENT, resp_headers).into_response())
}
