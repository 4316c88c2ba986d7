use std::fmt;

/// Custom error type for codec and storage operations
#[derive(Debug)]
pub enum CodecError {
    /// Invalid input parameters or malformed buffers
    InvalidInput(String),
    /// Image decoding/encoding errors
    ImageError(String),
    /// JSON serialization/deserialization errors
    SerializationError(String),
    /// File I/O errors
    IoError(std::io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CodecError::InvalidInput(message) => {
                write!(formatter, "Invalid input: {}", message)
            }
            CodecError::ImageError(message) => {
                write!(formatter, "Image processing error: {}", message)
            }
            CodecError::SerializationError(message) => {
                write!(formatter, "Serialization error: {}", message)
            }
            CodecError::IoError(error) => {
                write!(formatter, "I/O error: {}", error)
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<std::io::Error> for CodecError {
    fn from(error: std::io::Error) -> Self {
        CodecError::IoError(error)
    }
}

impl From<image::ImageError> for CodecError {
    fn from(error: image::ImageError) -> Self {
        CodecError::ImageError(error.to_string())
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(error: serde_json::Error) -> Self {
        CodecError::SerializationError(error.to_string())
    }
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;
