#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("container does not support {capability}")]
    Unsupported { capability: &'static str },
    #[error("drawing surface unavailable: {message}")]
    Surface { message: String },
    #[error("gpu device unavailable: {message}")]
    Device { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
