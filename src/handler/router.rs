//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::{AppState, HttpConfig};
use crate::handler::products;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted; it is
/// dropped before routing.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let response = route_request(&parts, &state).await;
    let response = apply_common_headers(response, &state.config.http);
    let body_bytes = response.body().size_hint().exact().unwrap_or(0);

    let response = if parts.method == Method::HEAD {
        http::strip_body(response)
    } else {
        response
    };

    if state.access_log() {
        let entry = build_access_entry(&parts, peer_addr, response.status(), body_bytes, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on method, path and configuration
async fn route_request(req: &Parts, state: &AppState) -> Response<Full<Bytes>> {
    let config = &state.config;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(&req.method, config.http.enable_cors) {
        return resp;
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(&req.headers, config.http.max_body_size) {
        return resp;
    }

    let path = req.uri.path();

    // 3. Health check endpoints
    if config.health.enabled {
        if path == config.health.liveness_path {
            return http::build_health_response(StatusCode::OK, "ok");
        }
        if path == config.health.readiness_path {
            return if state.catalog.exists().await {
                http::build_health_response(StatusCode::OK, "ok")
            } else {
                http::build_health_response(StatusCode::SERVICE_UNAVAILABLE, "not ready")
            };
        }
    }

    // 4. Product listing
    if matches_route(path, &config.catalog.route) {
        return products::serve_products(&state.catalog).await;
    }

    http::build_404_response()
}

/// Exact match, tolerating a single trailing slash
fn matches_route(path: &str, route: &str) -> bool {
    path == route || path.strip_suffix('/') == Some(route)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Add `Server` and CORS headers to every response
fn apply_common_headers(
    mut response: Response<Full<Bytes>>,
    http_config: &HttpConfig,
) -> Response<Full<Bytes>> {
    let headers = response.headers_mut();
    if let Ok(server) = HeaderValue::from_str(&http_config.server_name) {
        headers.insert("Server", server);
    }
    if http_config.enable_cors {
        headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    }
    response
}

fn build_access_entry(
    req: &Parts,
    peer_addr: SocketAddr,
    status: StatusCode,
    body_bytes: u64,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = http_version_label(req.version).to_string();
    entry.status = status.as_u16();
    entry.body_bytes = body_bytes;
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
