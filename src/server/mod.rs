//! HTTP surface: the single-page UI plus the extraction and export endpoints.

pub mod handlers;
pub mod upload;

use crate::{
    config::Config,
    error::{ExtractorError, Result},
    extract::TableExtractor,
    mistral::MistralClient,
};
use actix_web::{http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError};
use std::sync::Arc;

pub const INDEX_HTML: &str = include_str!("index.html");

pub struct AppState {
    pub extractor: TableExtractor,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(extractor: TableExtractor, max_upload_bytes: usize) -> Self {
        Self {
            extractor,
            max_upload_bytes,
        }
    }

    /// Builds the Mistral-backed state. Fails when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = MistralClient::new(&config.mistral)?;
        let extractor = TableExtractor::new(
            Arc::new(client),
            config.pdf.clone(),
            config.mistral.max_workers,
        );
        Ok(Self::new(extractor, config.max_upload_bytes()))
    }
}

/// Registers every route; shared by `run` and the integration tests.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let json_limit = state.max_upload_bytes;
        cfg.app_data(state)
            .app_data(web::JsonConfig::default().limit(json_limit))
            .route("/", web::get().to(handlers::index))
            .route("/health", web::get().to(handlers::health))
            .route("/api/extract", web::post().to(handlers::extract))
            .route("/api/export/xlsx", web::post().to(handlers::export_xlsx));
    }
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let state = AppState::from_config(&config).map_err(|e| {
        log::error!("❌ {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let state = web::Data::new(state);

    log::info!("✅ Mistral client ready ({})", state.extractor.model_id());

    HttpServer::new(move || App::new().configure(configure(state.clone())))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

impl ResponseError for ExtractorError {
    fn status_code(&self) -> StatusCode {
        match self {
            ExtractorError::InvalidInput(_)
            | ExtractorError::UnsupportedFile(_)
            | ExtractorError::ImageError(_)
            | ExtractorError::PdfError(_) => StatusCode::BAD_REQUEST,
            ExtractorError::RequestError(_)
            | ExtractorError::ApiError { .. }
            | ExtractorError::ResponseError(_) => StatusCode::BAD_GATEWAY,
            ExtractorError::ConfigError(_)
            | ExtractorError::SerializationError(_)
            | ExtractorError::ExportError(_)
            | ExtractorError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
