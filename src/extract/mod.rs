pub mod parse;
pub mod pipeline;
pub mod prompt;
pub mod source;

use crate::{
    config::PdfConfig,
    error::{ExtractorError, Result},
    logger,
    mistral::VisionModel,
    models::{ExtractedTable, ExtractionOutcome, SourceKind, UploadedFile},
    render,
};
use image::DynamicImage;
use std::sync::Arc;

pub use parse::parse_rows;
pub use pipeline::extract_tables;
pub use prompt::{instruction_prompt, parse_columns, DEFAULT_COLUMNS};

pub const NO_DATA_MESSAGE: &str = "No data extracted from uploaded files.";

/// Runs one upload through preparation, the model and rendering.
#[derive(Clone)]
pub struct TableExtractor {
    model: Arc<dyn VisionModel>,
    pdf: PdfConfig,
    max_workers: usize,
}

impl TableExtractor {
    pub fn new(model: Arc<dyn VisionModel>, pdf: PdfConfig, max_workers: usize) -> Self {
        Self {
            model,
            pdf,
            max_workers: max_workers.max(1),
        }
    }

    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    pub async fn extract(
        &self,
        kind: SourceKind,
        files: Vec<UploadedFile>,
        columns_input: &str,
    ) -> Result<ExtractionOutcome> {
        source::classify(&files, kind)?;
        let _timer = logger::timer("table extraction");

        let columns = parse_columns(columns_input);
        let prompt = instruction_prompt(&columns);
        log::info!(
            "🔄 Extracting from {} {} file(s) with {} expected columns",
            files.len(),
            kind,
            columns.len()
        );

        let images = self.prepare_images(kind, files).await?;
        let pages = images.len();
        let rows = extract_tables(self.model.as_ref(), &images, &prompt, self.max_workers).await?;

        let table = ExtractedTable::from_rows(rows);
        let markdown = render::to_markdown(&table);
        let message = if table.is_empty() {
            log::warn!("{}", NO_DATA_MESSAGE);
            Some(NO_DATA_MESSAGE.to_string())
        } else {
            log::info!("✅ Extracted {} rows from {} pages", table.len(), pages);
            None
        };

        Ok(ExtractionOutcome {
            table,
            pages,
            markdown,
            message,
        })
    }

    async fn prepare_images(
        &self,
        kind: SourceKind,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<DynamicImage>> {
        let pdf = self.pdf.clone();
        // Decoding and rasterising are CPU bound.
        tokio::task::spawn_blocking(move || match kind {
            SourceKind::Images => files.iter().map(source::decode_image).collect(),
            SourceKind::Pdf => {
                let file = files.into_iter().next().ok_or_else(|| {
                    ExtractorError::UnsupportedFile("no PDF file uploaded".into())
                })?;
                source::pdf_to_images(&file.bytes, &pdf)
            }
        })
        .await
        .map_err(|e| ExtractorError::InternalError(format!("image preparation task: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{Rgb, RgbImage};
    use std::sync::Mutex;

    struct Canned {
        answer: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl VisionModel for Canned {
        fn model_id(&self) -> &str {
            "canned"
        }

        async fn describe_image(&self, prompt: &str, _data_url: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.answer.clone())
        }
    }

    fn extractor(answer: &str) -> (TableExtractor, Arc<Canned>) {
        let model = Arc::new(Canned {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        });
        let extractor = TableExtractor::new(model.clone(), PdfConfig::default(), 8);
        (extractor, model)
    }

    fn png(name: &str) -> UploadedFile {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([0, 0, 0])));
        UploadedFile::new(name, source::encode_png(&image).unwrap())
    }

    #[tokio::test]
    async fn test_images_to_markdown() {
        let (extractor, model) = extractor(r#"[{"Item": "Shirt", "Qty": 2}]"#);
        let outcome = extractor
            .extract(SourceKind::Images, vec![png("a.png"), png("b.png")], "Item, Qty")
            .await
            .unwrap();

        assert_eq!(outcome.pages, 2);
        assert_eq!(outcome.table.len(), 2);
        assert_eq!(outcome.table.columns, vec!["Item", "Qty"]);
        assert!(outcome.message.is_none());
        assert_eq!(
            outcome.markdown,
            "| Item | Qty |\n| --- | --- |\n| Shirt | 2 |\n| Shirt | 2 |\n"
        );

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("column names: Item, Qty."));
    }

    #[tokio::test]
    async fn test_empty_answer_warns() {
        let (extractor, _) = extractor("");
        let outcome = extractor
            .extract(SourceKind::Images, vec![png("a.png")], DEFAULT_COLUMNS)
            .await
            .unwrap();
        assert!(outcome.table.is_empty());
        assert_eq!(outcome.message.as_deref(), Some(NO_DATA_MESSAGE));
        assert_eq!(outcome.markdown, "");
    }

    #[tokio::test]
    async fn test_rejects_before_calling_model() {
        let (extractor, model) = extractor("[]");
        let err = extractor
            .extract(SourceKind::Images, vec![UploadedFile::new("a.pdf", vec![])], "")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::UnsupportedFile(_)));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_image() {
        let (extractor, _) = extractor("[]");
        let err = extractor
            .extract(
                SourceKind::Images,
                vec![UploadedFile::new("a.png", b"garbage".to_vec())],
                "",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::ImageError(_)));
    }
}
