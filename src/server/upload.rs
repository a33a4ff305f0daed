use crate::{
    error::{ExtractorError, Result},
    extract::DEFAULT_COLUMNS,
    models::{SourceKind, UploadedFile},
};
use actix_multipart::Multipart;
use futures::TryStreamExt;

/// The parsed `POST /api/extract` form.
#[derive(Debug)]
pub struct ExtractForm {
    pub source: SourceKind,
    pub columns: String,
    pub files: Vec<UploadedFile>,
}

/// Reads the multipart form, rejecting bodies whose file parts exceed `max_bytes` in total.
///
/// Fields: `source` (`images` or `pdf`, default `images`), `columns` (comma separated,
/// default [`DEFAULT_COLUMNS`]) and any number of `file` parts.
pub async fn read_extract_form(mut payload: Multipart, max_bytes: usize) -> Result<ExtractForm> {
    let mut source = None;
    let mut columns = None;
    let mut files = Vec::new();
    let mut total = 0usize;

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(String::from);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            total += chunk.len();
            if total > max_bytes {
                return Err(ExtractorError::InvalidInput(format!(
                    "upload exceeds the {} MB limit",
                    max_bytes / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match (name.as_str(), filename) {
            ("file", Some(filename)) | ("files", Some(filename)) => {
                // Browsers send an empty part when nothing was picked.
                if !filename.is_empty() || !bytes.is_empty() {
                    files.push(UploadedFile::new(filename, bytes));
                }
            }
            ("source", _) => {
                let value = text_value(bytes)?;
                source = Some(SourceKind::parse(&value).ok_or_else(|| {
                    ExtractorError::InvalidInput(format!("unknown source '{}'", value))
                })?);
            }
            ("columns", _) => columns = Some(text_value(bytes)?),
            (other, _) => log::debug!("Ignoring form field '{}'", other),
        }
    }

    Ok(ExtractForm {
        source: source.unwrap_or(SourceKind::Images),
        columns: columns.unwrap_or_else(|| DEFAULT_COLUMNS.to_string()),
        files,
    })
}

fn text_value(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|_| ExtractorError::InvalidInput("form field is not valid UTF-8".into()))
}

fn multipart_error(e: actix_multipart::MultipartError) -> ExtractorError {
    ExtractorError::InvalidInput(format!("malformed upload: {}", e))
}
