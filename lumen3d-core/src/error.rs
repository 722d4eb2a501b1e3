/// Error type shared by every fallible operation in the crate
use thiserror::Error;

/// Result type for lumen3d operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A constructor or builder was handed parameters it cannot work with
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Mesh buffers violate the layout invariants
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// STL input could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub(crate) fn invalid_mesh(message: impl Into<String>) -> Self {
        Error::InvalidMesh(message.into())
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_argument("near <= 0");
        assert_eq!(err.to_string(), "Invalid argument: near <= 0");

        let err = Error::invalid_mesh("index 7 out of range");
        assert_eq!(err.to_string(), "Invalid mesh: index 7 out of range");
    }
}
