use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Core(#[from] po_i18n_core::CoreError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
