use thiserror::Error;

/// Why a quote batch could not be used as live data.
///
/// Never surfaced to the panel; the batch falls back and keeps the reason.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("HTTP error from {url}: {msg}")]
    Http { url: String, msg: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("JSON parse error from {url}: {msg}")]
    Json { url: String, msg: String },

    #[error("field '{key}' missing at pointer '{pointer}'")]
    MissingField { key: String, pointer: String },

    #[error("field '{key}' is not numeric: {raw}")]
    NotNumeric { key: String, raw: String },

    #[error("field '{key}' is not finite")]
    NonFinite { key: String },

    #[error("field '{key}' is negative: {value}")]
    Negative { key: String, value: f64 },

    #[error("field '{key}' must be positive, got {value}")]
    Degenerate { key: String, value: f64 },
}

#[derive(Error, Debug)]
pub enum GaugeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("image encode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
