use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Mistral API error ({status}): {message}")]
    ApiError { status: u16, message: String },
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Image error: {0}")]
    ImageError(String),
    #[error("PDF error: {0}")]
    PdfError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),
    #[error("Export error: {0}")]
    ExportError(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<reqwest::Error> for ExtractorError {
    fn from(e: reqwest::Error) -> Self {
        ExtractorError::RequestError(e.to_string())
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::SerializationError(e.to_string())
    }
}

impl From<image::ImageError> for ExtractorError {
    fn from(e: image::ImageError) -> Self {
        ExtractorError::ImageError(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExtractorError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ExtractorError::ExportError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
