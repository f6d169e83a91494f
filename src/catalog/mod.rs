//! Product catalog module
//!
//! Loads the product list from its JSON file on disk. Records are kept as
//! raw JSON text so they are passed through exactly as written in the file.
//! Nothing is cached: every call to [`ProductCatalog::load`] reads the file
//! again.

mod envelope;
mod error;

#[cfg(test)]
pub mod fixture;

pub use envelope::ResponseEnvelope;
pub use error::{CatalogError, CatalogResult};

use serde_json::value::RawValue;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Read-only handle on the catalog file
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    path: PathBuf,
}

impl ProductCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether the catalog file is present
    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Read and parse the catalog file
    ///
    /// A missing file is reported as [`CatalogError::NotFound`]; any other
    /// failure (permissions, invalid UTF-8, malformed JSON, top-level value
    /// that is not an array) as `Io` or `Parse`.
    pub async fn load(&self) -> CatalogResult<ProductCollection> {
        match fs::try_exists(&self.path).await {
            Ok(true) => {}
            Ok(false) => return Err(CatalogError::NotFound(self.path.clone())),
            Err(source) => {
                return Err(CatalogError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        }

        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|source| CatalogError::Io {
                path: self.path.clone(),
                source,
            })?;

        ProductCollection::parse(&text).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// Ordered product records, in file order
#[derive(Debug)]
pub struct ProductCollection {
    records: Vec<Box<RawValue>>,
}

impl ProductCollection {
    /// Parse a top-level JSON array without interpreting its elements
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let records = serde_json::from_str::<Vec<Box<RawValue>>>(text)?;
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Box<RawValue>] {
        &self.records
    }
}
