// Response envelope shared by every catalog response

use serde::Serialize;
use serde_json::value::RawValue;

use super::{CatalogError, ProductCollection};

/// `{success, total, products}` on success, `{success, error}` on failure
#[derive(Debug, Serialize)]
pub struct ResponseEnvelope<'a> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<&'a [Box<RawValue>]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

impl<'a> ResponseEnvelope<'a> {
    pub fn listing(collection: &'a ProductCollection) -> Self {
        Self {
            success: true,
            total: Some(collection.len()),
            products: Some(collection.records()),
            error: None,
        }
    }

    pub const fn failure(message: &'a str) -> Self {
        Self {
            success: false,
            total: None,
            products: None,
            error: Some(message),
        }
    }

    pub const fn from_error(err: &CatalogError) -> Self {
        Self::failure(err.public_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_listing_shape() {
        let collection = ProductCollection::parse(r#"[{"b":1,"a":2},[1,2]]"#).unwrap();
        let body = serde_json::to_string(&ResponseEnvelope::listing(&collection)).unwrap();
        assert_eq!(
            body,
            r#"{"success":true,"total":2,"products":[{"b":1,"a":2},[1,2]]}"#
        );
    }

    #[test]
    fn test_empty_listing() {
        let collection = ProductCollection::parse("[]").unwrap();
        let body = serde_json::to_string(&ResponseEnvelope::listing(&collection)).unwrap();
        assert_eq!(body, r#"{"success":true,"total":0,"products":[]}"#);
    }

    #[test]
    fn test_failure_shape() {
        let err = CatalogError::NotFound(PathBuf::from("missing.json"));
        let body = serde_json::to_string(&ResponseEnvelope::from_error(&err)).unwrap();
        assert_eq!(body, r#"{"success":false,"error":"File not found"}"#);
    }
}
