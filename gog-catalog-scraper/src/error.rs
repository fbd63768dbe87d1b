use gog_catalog_core::StoreError;

/// Errors that can occur while populating the catalog.
#[derive(Debug, thiserror::Error)]
pub enum PopulateError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Storefront returned HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTML parsing error: {0}")]
    Html(String),

    #[error("Element '{0}' not found in page")]
    MissingElement(String),

    #[error("Host store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
