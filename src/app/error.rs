// src/app/error.rs

/// Failure of a remote catalog call. Every variant degrades to "no update".
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("http client: {0}")]
    Client(String),

    #[error("GET {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode snapshot: {0}")]
    Encode(serde_json::Error),

    #[error("decode snapshot: {0}")]
    Decode(serde_json::Error),
}
