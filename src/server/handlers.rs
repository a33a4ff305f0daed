use super::{upload::read_extract_form, AppState, INDEX_HTML};
use crate::{
    error::ExtractorError,
    models::ExtractedTable,
    render::{self, XLSX_FILE_NAME, XLSX_MIME},
};
use actix_multipart::Multipart;
use actix_web::{
    http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType},
    web, HttpResponse,
};
use serde_json::json;

pub async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}

pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "model": state.extractor.model_id(),
    }))
}

pub async fn extract(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ExtractorError> {
    let form = read_extract_form(payload, state.max_upload_bytes).await?;
    log::info!(
        "📥 Received {} file(s) for {} extraction",
        form.files.len(),
        form.source
    );

    let outcome = state
        .extractor
        .extract(form.source, form.files, &form.columns)
        .await
        .map_err(|e| {
            log::error!("❌ Extraction failed: {}", e);
            e
        })?;

    Ok(HttpResponse::Ok().json(outcome))
}

pub async fn export_xlsx(table: web::Json<ExtractedTable>) -> Result<HttpResponse, ExtractorError> {
    let mut table = table.into_inner();
    if table.columns.is_empty() {
        table = ExtractedTable::from_rows(table.rows);
    }
    let bytes = render::to_xlsx(&table)?;
    log::info!("💾 Exported {} rows to {}", table.len(), XLSX_FILE_NAME);

    Ok(HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(XLSX_FILE_NAME.to_string())],
        })
        .body(bytes))
}
