pub mod config;
pub mod error;
pub mod extract;
pub mod logger;
pub mod mistral;
pub mod models;
pub mod render;
#[cfg(feature = "server")]
pub mod server;

pub use config::{Config, MistralConfig, PdfConfig, SecretStore};
pub use error::{ExtractorError, Result};
pub use extract::{TableExtractor, DEFAULT_COLUMNS};
pub use mistral::{ChatClient, MistralClient, VisionModel};
pub use models::*;
