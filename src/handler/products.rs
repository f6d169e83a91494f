//! Product listing handler
//!
//! Reads the catalog on every request and wraps the outcome in the response envelope.

use crate::catalog::{CatalogError, ProductCatalog, ResponseEnvelope};
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Serve the full product list
///
/// - 200 `{success: true, total, products}` when the file parses as an array
/// - 404 `{success: false, error: "File not found"}` when the file is absent
/// - 500 `{success: false, error: "Failed to load products"}` otherwise
pub async fn serve_products(catalog: &ProductCatalog) -> Response<Full<Bytes>> {
    match catalog.load().await {
        Ok(collection) => {
            logger::log_debug(&format!(
                "Loaded {} products from {}",
                collection.len(),
                catalog.path().display()
            ));
            if collection.is_empty() {
                logger::log_debug("Catalog file holds an empty product list");
            }
            http::build_json_response(StatusCode::OK, &ResponseEnvelope::listing(&collection))
        }
        Err(err) => {
            if let CatalogError::NotFound(_) = err {
                logger::log_warning(&err.to_string());
            } else {
                logger::log_error(&err.to_string());
            }
            http::build_json_response(err.status(), &ResponseEnvelope::from_error(&err))
        }
    }
}
