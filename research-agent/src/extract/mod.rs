//! Concurrent per-URL content and image extraction.
//!
//! Each ranked hit gets one worker that fetches readable text and, when
//! requested, hunts for a representative image. A failure inside one worker
//! degrades that item to an empty record; it never aborts the batch.

pub mod image;
pub mod reader;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::warn;

use crate::search::rank::RankedHit;
use reader::ContentFetcher;

/// Where the chosen image came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    Meta,
    Dom,
    None,
}

/// One extracted page: readable text plus an optional representative image.
#[derive(Clone, Debug)]
pub struct ExtractedContent {
    pub title: Option<String>,
    pub url: String,
    pub content: String,
    pub image_url: Option<String>,
    pub image_source: ImageSource,
    pub image_dims: (Option<u32>, Option<u32>),
}

/// Fetch text (and optionally an image) for every ranked hit with a bounded
/// worker pool. Completion order is arbitrary, so the collected results are
/// reordered to match the input ranking before returning.
pub async fn extract_content(
    fetcher: &ContentFetcher,
    ranked: &[RankedHit],
    include_images: bool,
    max_workers: usize,
) -> Vec<ExtractedContent> {
    let tasks = ranked
        .iter()
        .map(|r| extract_one(fetcher, r, include_images));

    let mut extracted: Vec<ExtractedContent> = stream::iter(tasks)
        .buffer_unordered(max_workers.max(1))
        .collect()
        .await;

    let index_of = |url: &str| {
        ranked
            .iter()
            .position(|r| r.hit.url == url)
            .unwrap_or(usize::MAX)
    };
    extracted.sort_by_key(|e| index_of(&e.url));
    extracted
}

async fn extract_one(
    fetcher: &ContentFetcher,
    ranked: &RankedHit,
    include_images: bool,
) -> ExtractedContent {
    let url = &ranked.hit.url;

    let content = match fetcher.fetch_readable_text(url).await {
        Ok(text) => text,
        Err(e) => {
            warn!(%url, "content fetch failed: {e}");
            String::new()
        }
    };

    let mut image_url = None;
    let mut image_source = ImageSource::None;
    let mut image_dims = (None, None);
    if include_images {
        if let Some(html) = fetcher.fetch_page_html(url).await {
            if let Some(best) = image::select_primary_image(&html, url) {
                image_url = Some(best.url);
                image_source = best.source;
                image_dims = best.dims;
            }
        }
    }

    ExtractedContent {
        title: Some(ranked.hit.title.clone()),
        url: url.clone(),
        content,
        image_url,
        image_source,
        image_dims,
    }
}
