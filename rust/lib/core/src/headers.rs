//! Response headers shared by every resource: entity alerts and
//! pagination metadata.
//!
//! Alert headers are named after the application (`X-{app}-alert`,
//! `X-{app}-params`, `X-{app}-error`) so a frontend can show localized
//! notifications without parsing the body.

use axum::http::header::LINK;
use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::types::{Page, PageRequest};

pub const TOTAL_COUNT: &str = "x-total-count";

pub fn entity_created(app: &str, entity: &str, param: &str) -> HeaderMap {
    alert(app, &format!("{}.{}.created", app, entity), param)
}

pub fn entity_updated(app: &str, entity: &str, param: &str) -> HeaderMap {
    alert(app, &format!("{}.{}.updated", app, entity), param)
}

pub fn entity_deleted(app: &str, entity: &str, param: &str) -> HeaderMap {
    alert(app, &format!("{}.{}.deleted", app, entity), param)
}

/// Headers for a rejected request: `error.{key}` plus the entity name.
pub fn failure(app: &str, entity: &str, key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, &format!("x-{}-error", app), &format!("error.{}", key));
    insert(&mut headers, &format!("x-{}-params", app), entity);
    headers
}

fn alert(app: &str, message: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert(&mut headers, &format!("x-{}-alert", app), message);
    insert(&mut headers, &format!("x-{}-params", app), param);
    headers
}

/// Names or values that are not valid header text are skipped.
fn insert(headers: &mut HeaderMap, name: &str, value: &str) {
    if let (Ok(name), Ok(value)) = (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        headers.insert(name, value);
    }
}

/// `X-Total-Count` and an RFC 5988 `Link` header with `next`, `prev`,
/// `last` and `first` relations. Links point at `base_path` and keep the
/// request's size and sort orders.
pub fn pagination<T>(
    base_path: &str,
    page: &Page<T>,
    request: &PageRequest,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT, HeaderValue::from(page.total));

    let total_pages = page.total_pages();
    let mut links = Vec::new();
    if page.page.saturating_add(1) < total_pages {
        links.push(link(base_path, request, page.page + 1, "next"));
    }
    if page.page > 0 {
        links.push(link(base_path, request, page.page - 1, "prev"));
    }
    links.push(link(base_path, request, total_pages.saturating_sub(1), "last"));
    links.push(link(base_path, request, 0, "first"));

    if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(LINK, value);
    }
    headers
}

fn link(base_path: &str, request: &PageRequest, page: u64, rel: &str) -> String {
    let mut uri = format!("{}?page={}&size={}", base_path, page, request.size);
    for order in &request.sort {
        uri.push_str(&format!("&sort={},{}", order.property, order.direction.as_str()));
    }
    format!("<{}>; rel=\"{}\"", uri, rel)
}
