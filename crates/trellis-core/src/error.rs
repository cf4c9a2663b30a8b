pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid diagram document: {message}")]
    InvalidDocument { message: String },

    #[error("Invalid diagram config: {message}")]
    InvalidConfig { message: String },

    #[error("diagram JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
