use crate::{
    config::PdfConfig,
    error::{ExtractorError, Result},
    models::{SourceKind, UploadedFile},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Checks that the uploads match the selected source: one or more images, or exactly one PDF.
pub fn classify(files: &[UploadedFile], kind: SourceKind) -> Result<()> {
    if files.is_empty() {
        return Err(ExtractorError::UnsupportedFile(format!(
            "no {} uploaded",
            match kind {
                SourceKind::Images => "image files",
                SourceKind::Pdf => "PDF file",
            }
        )));
    }
    if kind == SourceKind::Pdf && files.len() > 1 {
        return Err(ExtractorError::UnsupportedFile(
            "only one PDF file can be processed at a time".into(),
        ));
    }

    let allowed = kind.allowed_extensions();
    for file in files {
        match file.extension() {
            Some(ext) if allowed.contains(&ext.as_str()) => {}
            _ => {
                return Err(ExtractorError::UnsupportedFile(format!(
                    "{} is not one of: {}",
                    file.name,
                    allowed.join(", ")
                )))
            }
        }
    }
    Ok(())
}

pub fn decode_image(file: &UploadedFile) -> Result<DynamicImage> {
    image::load_from_memory(&file.bytes)
        .map_err(|e| ExtractorError::ImageError(format!("{}: {}", file.name, e)))
}

/// Scales `image` down to `max_width`, keeping the aspect ratio. Narrower images are untouched.
pub fn resize_to_max_width(image: DynamicImage, max_width: u32) -> DynamicImage {
    if image.width() <= max_width {
        return image;
    }
    let ratio = max_width as f64 / image.width() as f64;
    let height = ((image.height() as f64 * ratio) as u32).max(1);
    image.resize_exact(max_width, height, FilterType::CatmullRom)
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    image.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

pub fn to_data_url(image: &DynamicImage) -> Result<String> {
    let png = encode_png(image)?;
    Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png)))
}

#[cfg(feature = "pdf")]
pub fn pdf_to_images(bytes: &[u8], config: &PdfConfig) -> Result<Vec<DynamicImage>> {
    use mupdf::{Colorspace, Document, Matrix};

    let pdf_error = |e: mupdf::Error| ExtractorError::PdfError(e.to_string());

    let document = Document::from_bytes(bytes, "application/pdf").map_err(pdf_error)?;
    let page_count = document.page_count().map_err(pdf_error)?;
    let scale = config.resolution as f32 / 72.0;
    let matrix = Matrix::new_scale(scale, scale);
    let colorspace = Colorspace::device_rgb();

    let mut images = Vec::with_capacity(page_count.max(0) as usize);
    for index in 0..page_count {
        let page = document.load_page(index).map_err(pdf_error)?;
        let pixmap = page
            .to_pixmap(&matrix, &colorspace, false, false)
            .map_err(pdf_error)?;
        let image = pixmap_to_image(&pixmap)?;
        images.push(resize_to_max_width(image, config.max_width));
    }

    log::debug!(
        "Rendered {} PDF pages at {} dpi",
        images.len(),
        config.resolution
    );
    Ok(images)
}

#[cfg(not(feature = "pdf"))]
pub fn pdf_to_images(_bytes: &[u8], _config: &PdfConfig) -> Result<Vec<DynamicImage>> {
    Err(ExtractorError::PdfError(
        "PDF support not enabled; rebuild with the `pdf` feature".into(),
    ))
}

#[cfg(feature = "pdf")]
fn pixmap_to_image(pixmap: &mupdf::Pixmap) -> Result<DynamicImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let n = pixmap.n() as usize;
    let samples = pixmap.samples();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in samples.chunks_exact(n.max(1)) {
        match pixel {
            [r, g, b, ..] => rgb.extend_from_slice(&[*r, *g, *b]),
            [gray, ..] => rgb.extend_from_slice(&[*gray, *gray, *gray]),
            [] => {}
        }
    }

    image::RgbImage::from_raw(width, height, rgb)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| ExtractorError::PdfError("pixmap size does not match its samples".into()))
}
