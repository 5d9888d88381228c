use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("directory scan failed: {0}")]
    Scan(Arc<std::io::Error>),
}
