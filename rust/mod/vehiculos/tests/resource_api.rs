//! HTTP-level tests for the `marcas` and `modelos` collections.
//!
//! Covers:
//!   - Create: 201 + Location, id rejection, field validation
//!   - Replace / partial update: id consistency checks and merge semantics
//!   - Read one / delete: 404 empty body, idempotent delete
//!   - Listing: paging, sorting, X-Total-Count and Link headers
//!   - Modelo -> Marca reference resolution

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use catalogo_core::Module;
use catalogo_sql::{SQLStore, SqliteStore};
use vehiculos::service::CatalogoService;
use vehiculos::{ApiSettings, VehiculosModule};

// =====================================================================
// Helpers
// =====================================================================

fn make_app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let sql: Arc<dyn SQLStore> =
        Arc::new(SqliteStore::open(&dir.path().join("catalogo.sqlite")).unwrap());
    let service = CatalogoService::new(sql).unwrap();
    let module = VehiculosModule::new(service, ApiSettings::default());
    let router = Router::new().nest(&module.mount_path(), module.routes());
    (router, dir)
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: Option<String>,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let req = builder.body(body.map(Body::from).unwrap_or_else(Body::empty)).unwrap();
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, json)
}

async fn api(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
    match body {
        Some(v) => send(router, method, uri, Some("application/json"), Some(v.to_string())).await,
        None => send(router, method, uri, None, None).await,
    }
}

async fn total(router: &Router, collection: &str) -> u64 {
    let (s, headers, _) = api(router, "GET", &format!("/api/{}", collection), None).await;
    assert_eq!(s, StatusCode::OK);
    headers["x-total-count"].to_str().unwrap().parse().unwrap()
}

fn scenario_modelo() -> Value {
    json!({
        "modelo": "AAAAAAAAAA",
        "color": "AAAAAAAAAA",
        "potencia": 1,
        "plazas": 1,
        "precio": 1.0,
    })
}

async fn create(router: &Router, collection: &str, body: Value) -> Value {
    let (s, _, json) = api(router, "POST", &format!("/api/{}", collection), Some(body)).await;
    assert_eq!(s, StatusCode::CREATED, "create failed: {}", json);
    json
}

// =====================================================================
// Create
// =====================================================================

#[tokio::test]
async fn create_modelo_returns_location_and_alert() {
    let (r, _dir) = make_app();
    let (s, headers, json) = api(&r, "POST", "/api/modelos", Some(scenario_modelo())).await;

    assert_eq!(s, StatusCode::CREATED);
    let id = json["id"].as_i64().expect("id should be assigned");
    assert_eq!(json["modelo"], "AAAAAAAAAA");
    assert_eq!(json["precio"], 1.0);
    assert_eq!(json["numero_serie"], Value::Null);
    assert_eq!(json["marca"], Value::Null);
    assert_eq!(headers["location"], format!("/api/modelos/{}", id).as_str());
    assert_eq!(headers["x-catalogoapp-alert"], "catalogoApp.modelo.created");
    assert_eq!(headers["x-catalogoapp-params"], id.to_string().as_str());
}

#[tokio::test]
async fn create_assigns_fresh_ids() {
    let (r, _dir) = make_app();
    let a = create(&r, "marcas", json!({"marca": "Seat"})).await;
    let b = create(&r, "marcas", json!({"marca": "Opel"})).await;
    assert_ne!(a["id"], b["id"]);

    let (s, _, _) = api(&r, "DELETE", &format!("/api/marcas/{}", b["id"]), None).await;
    assert_eq!(s, StatusCode::NO_CONTENT);
    let c = create(&r, "marcas", json!({"marca": "Audi"})).await;
    assert!(c["id"].as_i64().unwrap() > b["id"].as_i64().unwrap(), "ids are never reused");
}

#[tokio::test]
async fn create_with_id_is_rejected() {
    let (r, _dir) = make_app();
    let mut body = scenario_modelo();
    body["id"] = json!(1);
    let (s, headers, json) = api(&r, "POST", "/api/modelos", Some(body)).await;

    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "idexists");
    assert_eq!(json["entityName"], "modelo");
    assert_eq!(headers["x-catalogoapp-error"], "error.idexists");
    assert_eq!(headers["x-catalogoapp-params"], "modelo");
    assert_eq!(total(&r, "modelos").await, 0);
}

#[tokio::test]
async fn create_without_required_field_lists_field_errors() {
    let (r, _dir) = make_app();
    let (s, headers, json) = api(&r, "POST", "/api/modelos", Some(json!({"color": "Rojo"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "error.validation");
    assert_eq!(json["fieldErrors"][0]["objectName"], "modelo");
    assert_eq!(json["fieldErrors"][0]["field"], "modelo");
    assert_eq!(json["fieldErrors"][0]["message"], "NotNull");
    assert_eq!(headers["x-catalogoapp-error"], "error.validation");

    let (s, _, json) = api(&r, "POST", "/api/modelos", Some(json!({"modelo": "Ibiz"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["fieldErrors"][0]["message"], "Size");

    let (s, _, json) = api(&r, "POST", "/api/marcas", Some(json!({"marca": "X".repeat(21)}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["fieldErrors"][0]["field"], "marca");
    assert_eq!(total(&r, "modelos").await, 0);
    assert_eq!(total(&r, "marcas").await, 0);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let (r, _dir) = make_app();
    let (s, _, json) = send(
        &r,
        "POST",
        "/api/marcas",
        Some("application/json"),
        Some("{\"marca\": ".to_string()),
    )
    .await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "badbody");

    let (s, _, _) = api(&r, "POST", "/api/modelos", Some(json!({"modelo": "Ibiza", "plazas": "two"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
}

// =====================================================================
// Replace
// =====================================================================

#[tokio::test]
async fn put_checks_ids_in_order() {
    let (r, _dir) = make_app();
    let created = create(&r, "modelos", scenario_modelo()).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/modelos/{}", id);

    // Field validation comes first, even with a null id.
    let (s, _, json) = api(&r, "PUT", &uri, Some(json!({"modelo": "x"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "validation");

    let (s, _, json) = api(&r, "PUT", &uri, Some(json!({"modelo": "Leon ST"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "idnull");

    let (s, _, json) = api(&r, "PUT", &uri, Some(json!({"id": id + 1, "modelo": "Leon ST"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "idinvalid");

    let (s, headers, json) = api(&r, "PUT", "/api/modelos/999", Some(json!({"id": 999, "modelo": "Leon ST"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "idnotfound");
    assert_eq!(headers["x-catalogoapp-error"], "error.idnotfound");

    let (s, _, json) = api(&r, "PUT", "/api/modelos/999", Some(json!({"id": 999, "modelo": "x"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "validation");

    assert_eq!(total(&r, "modelos").await, 1);
    let (_, _, stored) = api(&r, "GET", &uri, None).await;
    assert_eq!(stored["modelo"], "AAAAAAAAAA");
}

#[tokio::test]
async fn put_replaces_every_field() {
    let (r, _dir) = make_app();
    let created = create(&r, "modelos", scenario_modelo()).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/modelos/{}", id);

    let (s, headers, json) = api(&r, "PUT", &uri, Some(json!({"id": id, "modelo": "BBBBBBBBBB"}))).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["modelo"], "BBBBBBBBBB");
    assert_eq!(json["color"], Value::Null);
    assert_eq!(json["potencia"], Value::Null);
    assert_eq!(headers["x-catalogoapp-alert"], "catalogoApp.modelo.updated");
}

#[tokio::test]
async fn put_on_collection_is_not_allowed() {
    let (r, _dir) = make_app();
    let (s, _, _) = api(&r, "PUT", "/api/modelos", Some(scenario_modelo())).await;
    assert_eq!(s, StatusCode::METHOD_NOT_ALLOWED);
}

// =====================================================================
// Partial update
// =====================================================================

#[tokio::test]
async fn patch_changes_only_sent_fields() {
    let (r, _dir) = make_app();
    let created = create(&r, "modelos", scenario_modelo()).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/modelos/{}", id);

    let patch = json!({"id": id, "modelo": "BBBBBBBBBB"}).to_string();
    let (s, _, json) = send(&r, "PATCH", &uri, Some("application/merge-patch+json"), Some(patch)).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["modelo"], "BBBBBBBBBB");
    assert_eq!(json["color"], "AAAAAAAAAA");
    assert_eq!(json["potencia"], 1);
    assert_eq!(json["plazas"], 1);
    assert_eq!(json["precio"], 1.0);

    let (_, _, stored) = api(&r, "GET", &uri, None).await;
    assert_eq!(stored, json);
}

#[tokio::test]
async fn patch_with_null_fields_keeps_values() {
    let (r, _dir) = make_app();
    let created = create(&r, "marcas", json!({"marca": "Seat"})).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/marcas/{}", id);

    let (s, _, json) = api(&r, "PATCH", &uri, Some(json!({"id": id, "marca": null}))).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["marca"], "Seat");

    let (s, _, json) = api(&r, "PATCH", &uri, Some(json!({"id": id, "marca": ""}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["fieldErrors"][0]["message"], "Size");
}

#[tokio::test]
async fn patch_keeps_marca_reference() {
    let (r, _dir) = make_app();
    let seat = create(&r, "marcas", json!({"marca": "Seat"})).await;
    let opel = create(&r, "marcas", json!({"marca": "Opel"})).await;
    let mut body = scenario_modelo();
    body["marca"] = json!({"id": seat["id"]});
    let created = create(&r, "modelos", body).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/modelos/{}", id);

    let patch = json!({"id": id, "color": "Rojo", "marca": {"id": opel["id"]}});
    let (s, _, json) = api(&r, "PATCH", &uri, Some(patch)).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["color"], "Rojo");
    assert_eq!(json["marca"]["id"], seat["id"]);

    let (s, _, json) = api(&r, "PATCH", &uri, Some(json!({"id": id, "marca": {"id": null}}))).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["marca"]["marca"], "Seat");

    // A full replace does move the model.
    let mut replacement = scenario_modelo();
    replacement["id"] = json!(id);
    replacement["marca"] = json!({"id": opel["id"]});
    let (s, _, json) = api(&r, "PUT", &uri, Some(replacement)).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json["marca"]["marca"], "Opel");
}

#[tokio::test]
async fn patch_checks_ids_and_content_type() {
    let (r, _dir) = make_app();
    let created = create(&r, "marcas", json!({"marca": "Seat"})).await;
    let id = created["id"].as_i64().unwrap();
    let uri = format!("/api/marcas/{}", id);

    let (s, _, json) = api(&r, "PATCH", &uri, Some(json!({"marca": "Cupra"}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "idnull");

    let (s, _, json) = api(&r, "PATCH", "/api/marcas/77", Some(json!({"id": 77}))).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "idnotfound");

    let body = json!({"id": id, "marca": "Cupra"}).to_string();
    let (s, _, _) = send(&r, "PATCH", &uri, Some("text/plain"), Some(body.clone())).await;
    assert_eq!(s, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    // merge-patch is a PATCH-only media type.
    let (s, _, _) = send(&r, "PUT", &uri, Some("application/merge-patch+json"), Some(body)).await;
    assert_eq!(s, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

// =====================================================================
// Read / delete
// =====================================================================

#[tokio::test]
async fn get_absent_is_404_with_empty_body() {
    let (r, _dir) = make_app();
    let (s, _, json) = api(&r, "GET", "/api/modelos/12345", None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
    assert_eq!(json, Value::Null);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (r, _dir) = make_app();
    let created = create(&r, "modelos", scenario_modelo()).await;
    create(&r, "modelos", json!({"modelo": "Leon ST"})).await;
    assert_eq!(total(&r, "modelos").await, 2);

    let uri = format!("/api/modelos/{}", created["id"]);
    let (s, headers, json) = api(&r, "DELETE", &uri, None).await;
    assert_eq!(s, StatusCode::NO_CONTENT);
    assert_eq!(json, Value::Null);
    assert_eq!(headers["x-catalogoapp-alert"], "catalogoApp.modelo.deleted");
    assert_eq!(total(&r, "modelos").await, 1);

    let (s, _, _) = api(&r, "DELETE", &uri, None).await;
    assert_eq!(s, StatusCode::NO_CONTENT);
    assert_eq!(total(&r, "modelos").await, 1);

    let (s, _, _) = api(&r, "GET", &uri, None).await;
    assert_eq!(s, StatusCode::NOT_FOUND);
}

// =====================================================================
// Listing
// =====================================================================

#[tokio::test]
async fn list_pages_with_headers() {
    let (r, _dir) = make_app();
    for label in ["Seat", "Opel", "Audi", "Fiat", "Kia"] {
        create(&r, "marcas", json!({"marca": label})).await;
    }

    let (s, headers, json) = api(&r, "GET", "/api/marcas?page=1&size=2&sort=marca,desc", None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(headers["x-total-count"], "5");
    let labels: Vec<&str> = json.as_array().unwrap().iter().map(|m| m["marca"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Kia", "Fiat"]);

    let link = headers["link"].to_str().unwrap();
    assert!(link.contains("</api/marcas?page=2&size=2&sort=marca,desc>; rel=\"next\""));
    assert!(link.contains("</api/marcas?page=0&size=2&sort=marca,desc>; rel=\"prev\""));
    assert!(link.contains("rel=\"last\""));
    assert!(link.contains("rel=\"first\""));
}

#[tokio::test]
async fn list_page_far_beyond_last_is_empty() {
    let (r, _dir) = make_app();
    for label in ["Seat", "Opel", "Audi"] {
        create(&r, "marcas", json!({"marca": label})).await;
    }

    let uri = format!("/api/marcas?page={}&size=2", u64::MAX);
    let (s, headers, json) = api(&r, "GET", &uri, None).await;
    assert_eq!(s, StatusCode::OK);
    assert_eq!(json, json!([]));
    assert_eq!(headers["x-total-count"], "3");
    let link = headers["link"].to_str().unwrap();
    assert!(!link.contains("rel=\"next\""));
    assert!(link.contains("</api/marcas?page=1&size=2>; rel=\"last\""));
}

#[tokio::test]
async fn list_defaults_to_id_order() {
    let (r, _dir) = make_app();
    let first = create(&r, "modelos", json!({"modelo": "Ibiza"})).await;
    let second = create(&r, "modelos", json!({"modelo": "Arona"})).await;

    let (s, _, json) = api(&r, "GET", "/api/modelos", None).await;
    assert_eq!(s, StatusCode::OK);
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], first["id"]);
    assert_eq!(items[1]["id"], second["id"]);
}

#[tokio::test]
async fn list_rejects_bad_parameters() {
    let (r, _dir) = make_app();
    let (s, headers, json) = api(&r, "GET", "/api/modelos?sort=password", None).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "badsort");
    assert_eq!(headers["x-catalogoapp-error"], "error.badsort");

    let (s, _, json) = api(&r, "GET", "/api/modelos?size=0", None).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "badpaging");

    let (s, _, json) = api(&r, "GET", "/api/modelos?page=-1", None).await;
    assert_eq!(s, StatusCode::BAD_REQUEST);
    assert_eq!(json["errorKey"], "badpaging");
}

// =====================================================================
// Modelo -> Marca
// =====================================================================

#[tokio::test]
async fn modelo_resolves_marca_reference() {
    let (r, _dir) = make_app();
    let seat = create(&r, "marcas", json!({"marca": "Seat"})).await;

    let body = json!({"modelo": "Ibiza FR", "marca": {"id": seat["id"]}});
    let created = create(&r, "modelos", body).await;
    assert_eq!(created["marca"], json!({"id": seat["id"], "marca": "Seat"}));

    let uri = format!("/api/modelos/{}", created["id"]);
    let (_, _, fetched) = api(&r, "GET", &uri, None).await;
    assert_eq!(fetched["marca"]["marca"], "Seat");

    // Renaming the brand shows up through the reference.
    let marca_uri = format!("/api/marcas/{}", seat["id"]);
    let (s, _, _) = api(&r, "PATCH", &marca_uri, Some(json!({"id": seat["id"], "marca": "Cupra"}))).await;
    assert_eq!(s, StatusCode::OK);
    let (_, _, fetched) = api(&r, "GET", &uri, None).await;
    assert_eq!(fetched["marca"]["marca"], "Cupra");
}

#[tokio::test]
async fn modelo_with_missing_marca_is_server_error() {
    let (r, _dir) = make_app();
    let body = json!({"modelo": "Ibiza FR", "marca": {"id": 404}});
    let (s, headers, json) = api(&r, "POST", "/api/modelos", Some(body)).await;
    assert_eq!(s, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "STORAGE_ERROR");
    assert!(headers.get("x-catalogoapp-error").is_none());
    assert_eq!(total(&r, "modelos").await, 0);
}
