use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    InvalidLocale(&'static str),
    MalformedMo(&'static str),
    UnsupportedMoRevision(u32),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidLocale(message) => write!(f, "invalid locale: {message}"),
            CoreError::MalformedMo(message) => write!(f, "malformed mo catalog: {message}"),
            CoreError::UnsupportedMoRevision(major) => {
                write!(f, "unsupported mo major revision {major}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CoreError {}
