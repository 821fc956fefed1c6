use thiserror::Error;

pub type PackResult<T> = Result<T, PackError>;

/// Failures of [`pack`](crate::pack), [`unpack`](crate::unpack) and friends.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum PackError {
    /// The format string is malformed.
    #[error("invalid format: {0}")]
    Format(String),
    /// The packed data do not fit into the buffer.
    #[error("buffer too small: {0}")]
    Size(String),
    /// A value does not match the format or violates a hard limit.
    #[error("invalid arguments: {0}")]
    Arguments(String),
    /// The buffer does not contain what the format promises.
    #[error("invalid data: {0}")]
    Data(String),
}

impl PackError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
    pub fn size(msg: impl Into<String>) -> Self {
        Self::Size(msg.into())
    }
    pub fn arguments(msg: impl Into<String>) -> Self {
        Self::Arguments(msg.into())
    }
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }
}
