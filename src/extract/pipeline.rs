use crate::{
    error::Result,
    extract::{parse::parse_rows, source::to_data_url},
    mistral::VisionModel,
    models::Row,
};
use futures::{stream, StreamExt, TryStreamExt};
use image::DynamicImage;

/// Sends every page to the model with at most `max_workers` requests in flight.
///
/// Rows come back in page order, then in the order the model listed them.
/// The first failing page aborts the whole extraction.
pub async fn extract_tables(
    model: &dyn VisionModel,
    images: &[DynamicImage],
    prompt: &str,
    max_workers: usize,
) -> Result<Vec<Row>> {
    let pages: Vec<Vec<Row>> = stream::iter(images.iter().enumerate())
        .map(|(index, image)| extract_page(model, index, image, prompt))
        .buffered(max_workers.max(1))
        .try_collect()
        .await?;

    Ok(pages.into_iter().flatten().collect())
}

async fn extract_page(
    model: &dyn VisionModel,
    index: usize,
    image: &DynamicImage,
    prompt: &str,
) -> Result<Vec<Row>> {
    let data_url = to_data_url(image)?;
    log::debug!(
        "Page {}: {}x{} px, {} bytes encoded",
        index + 1,
        image.width(),
        image.height(),
        data_url.len()
    );

    let answer = model.describe_image(prompt, &data_url).await.map_err(|e| {
        log::error!("Page {} failed: {}", index + 1, e);
        e
    })?;
    let rows = parse_rows(&answer)?;
    log::info!("📄 Page {}: {} rows", index + 1, rows.len());
    Ok(rows)
}
