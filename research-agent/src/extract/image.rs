//! Best-effort representative-image selection from page HTML.
//!
//! Candidates come from social/meta tags first, then the leading `<img>`
//! elements. Every candidate is scored; reference-documentation hosts,
//! chrome-like asset names and non-photo extensions are rejected outright.
//! The best score wins, first-seen order breaks ties, and nothing below a
//! score of 1 is ever returned.

use scraper::{Html, Selector};
use url::Url;

use crate::extract::ImageSource;

/// Hosts whose pages never yield a useful hero image (reference docs).
const SKIP_IMAGE_DOMAINS: [&str; 3] = ["developer.mozilla.org", "w3.org", "web.dev"];

/// URL substrings that mark page chrome rather than content imagery.
const BLOCKLIST_SUBSTRINGS: [&str; 8] = [
    "logo",
    "favicon",
    "sprite",
    "icon",
    "avatar",
    "badge",
    "masthead",
    "placeholder",
];

/// Accepted raster extensions.
const ALLOWED_EXTS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];

/// Declared dimensions below this never earn a size bonus.
const MIN_DIMENSION: u32 = 120;

/// How many `<img>` elements to consider before giving up.
const MAX_IMG_CANDIDATES: usize = 10;

/// One image candidate, before or after selection.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageCandidate {
    /// Absolute image URL.
    pub url: String,
    /// Meta tag or DOM `<img>` origin.
    pub source: ImageSource,
    /// Declared width/height attributes, when present.
    pub dims: (Option<u32>, Option<u32>),
}

/// Collect candidates from parsed HTML: meta tags in priority order (secure
/// Open Graph first, then the name-attribute variants, Twitter cards and
/// `link rel=image_src`), then up to the first [`MAX_IMG_CANDIDATES`]
/// `<img src>` elements with any declared dimensions.
pub fn collect_candidates(doc: &Html, page_url: &str) -> Vec<ImageCandidate> {
    let mut out = Vec::new();

    let meta_lookups: [(&str, &str); 6] = [
        (r#"meta[property="og:image:secure_url"]"#, "content"),
        (r#"meta[property="og:image"]"#, "content"),
        (r#"meta[name="og:image"]"#, "content"),
        (r#"meta[property="twitter:image"]"#, "content"),
        (r#"meta[name="twitter:image"]"#, "content"),
        (r#"link[rel="image_src"]"#, "href"),
    ];
    for (sel, attr) in meta_lookups {
        let selector = Selector::parse(sel).expect("static selector");
        let value = doc
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(value) = value {
            out.push(ImageCandidate {
                url: absolutize(page_url, value),
                source: ImageSource::Meta,
                dims: (None, None),
            });
        }
    }

    let img_sel = Selector::parse("img[src]").expect("static selector");
    for el in doc.select(&img_sel).take(MAX_IMG_CANDIDATES) {
        let Some(src) = el.value().attr("src") else {
            continue;
        };
        if src.trim().is_empty() {
            continue;
        }
        out.push(ImageCandidate {
            url: absolutize(page_url, src.trim()),
            source: ImageSource::Dom,
            dims: (
                parse_dim(el.value().attr("width")),
                parse_dim(el.value().attr("height")),
            ),
        });
    }

    out
}

/// Score one candidate. Blocked URLs are rejected with -10; everything else
/// earns a meta-tag bonus (3) plus a declared-size bonus (3 for >=600px,
/// 2 for >=300px, 1 for >=120px on either axis; unknown dimensions earn 0).
pub fn score_candidate(url: &str, from_meta: bool, dims: (Option<u32>, Option<u32>)) -> i32 {
    if is_blocked(url) {
        return -10;
    }
    let mut size_score = 0;
    for dim in [dims.0, dims.1].into_iter().flatten() {
        let bonus = if dim >= 600 {
            3
        } else if dim >= 300 {
            2
        } else if dim >= MIN_DIMENSION {
            1
        } else {
            0
        };
        size_score = size_score.max(bonus);
    }
    let meta_bonus = if from_meta { 3 } else { 0 };
    meta_bonus + size_score
}

/// Parse `html` and pick the best candidate for the page, if any.
pub fn select_primary_image(html: &str, page_url: &str) -> Option<ImageCandidate> {
    let doc = Html::parse_document(html);
    select_from(collect_candidates(&doc, page_url))
}

/// Pick the highest-scoring candidate; the first seen wins ties, and the
/// winner must score at least 1.
pub fn select_from(candidates: Vec<ImageCandidate>) -> Option<ImageCandidate> {
    let mut best: Option<(i32, ImageCandidate)> = None;
    for cand in candidates {
        let score = score_candidate(&cand.url, cand.source == ImageSource::Meta, cand.dims);
        match &best {
            Some((top, _)) if *top >= score => {}
            _ => best = Some((score, cand)),
        }
    }
    match best {
        Some((score, cand)) if score >= 1 => Some(cand),
        _ => None,
    }
}

fn is_blocked(url: &str) -> bool {
    let host = host_of(url);
    if SKIP_IMAGE_DOMAINS.iter().any(|d| host.ends_with(d)) {
        return true;
    }
    let lower = url.to_lowercase();
    if BLOCKLIST_SUBSTRINGS.iter().any(|s| lower.contains(s)) {
        return true;
    }
    !ALLOWED_EXTS.iter().any(|ext| lower.ends_with(ext))
}

fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}

fn parse_dim(value: Option<&str>) -> Option<u32> {
    value.and_then(|v| v.trim().parse().ok())
}

fn absolutize(base: &str, maybe_relative: &str) -> String {
    match Url::parse(base).and_then(|b| b.join(maybe_relative)) {
        Ok(u) => u.to_string(),
        Err(_) => maybe_relative.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(url: &str, dims: (Option<u32>, Option<u32>)) -> ImageCandidate {
        ImageCandidate {
            url: url.to_string(),
            source: ImageSource::Meta,
            dims,
        }
    }

    fn dom(url: &str, dims: (Option<u32>, Option<u32>)) -> ImageCandidate {
        ImageCandidate {
            url: url.to_string(),
            source: ImageSource::Dom,
            dims,
        }
    }

    #[test]
    fn blocklisted_logo_loses_to_meta_hero() {
        let picked = select_from(vec![
            dom("https://x.com/logo.png", (None, None)),
            meta("https://x.com/hero.jpg", (Some(800), Some(600))),
        ])
        .unwrap();
        assert_eq!(picked.url, "https://x.com/hero.jpg");
        assert_eq!(
            score_candidate("https://x.com/hero.jpg", true, (Some(800), Some(600))),
            6
        );
        assert_eq!(score_candidate("https://x.com/logo.png", false, (None, None)), -10);
    }

    #[test]
    fn rejects_bad_extensions_skip_domains_and_chrome_names() {
        assert_eq!(score_candidate("https://a.com/pic.svg", true, (None, None)), -10);
        assert_eq!(score_candidate("https://a.com/pic.gif", true, (None, None)), -10);
        assert_eq!(
            score_candidate("https://developer.mozilla.org/shot.png", true, (None, None)),
            -10
        );
        assert_eq!(
            score_candidate("https://a.com/user-avatar.jpg", true, (None, None)),
            -10
        );
    }

    #[test]
    fn size_bonus_tiers_use_the_larger_axis() {
        let url = "https://a.com/pic.jpg";
        assert_eq!(score_candidate(url, false, (Some(640), Some(100))), 3);
        assert_eq!(score_candidate(url, false, (Some(320), None)), 2);
        assert_eq!(score_candidate(url, false, (None, Some(120))), 1);
        assert_eq!(score_candidate(url, false, (Some(80), Some(80))), 0);
        assert_eq!(score_candidate(url, false, (None, None)), 0);
    }

    #[test]
    fn zero_score_dom_image_is_not_selected() {
        // A dimensionless <img> scores 0, below the acceptance floor.
        assert!(select_from(vec![dom("https://a.com/pic.jpg", (None, None))]).is_none());
        assert!(select_from(vec![]).is_none());
    }

    #[test]
    fn first_seen_candidate_wins_ties() {
        let picked = select_from(vec![
            meta("https://a.com/first.jpg", (None, None)),
            meta("https://a.com/second.jpg", (None, None)),
        ])
        .unwrap();
        assert_eq!(picked.url, "https://a.com/first.jpg");
    }

    #[test]
    fn collects_meta_before_imgs_and_absolutizes() {
        let html = r#"<html><head>
            <meta property="og:image" content="/img/cover.jpg">
            <meta name="twitter:image" content="https://cdn.x.com/t.png">
            </head><body>
            <img src="a.webp" width="700">
            <img src="b.png" width="oops" height="200">
            <img>
            </body></html>"#;
        let doc = Html::parse_document(html);
        let cands = collect_candidates(&doc, "https://x.com/posts/1");

        assert_eq!(cands.len(), 4);
        assert_eq!(cands[0].url, "https://x.com/img/cover.jpg");
        assert_eq!(cands[0].source, ImageSource::Meta);
        assert_eq!(cands[1].url, "https://cdn.x.com/t.png");
        assert_eq!(cands[2].url, "https://x.com/posts/a.webp");
        assert_eq!(cands[2].dims, (Some(700), None));
        assert_eq!(cands[3].dims, (None, Some(200)));
    }

    #[test]
    fn img_candidates_are_capped_at_ten() {
        let imgs: String = (0..15)
            .map(|i| format!("<img src=\"/p{i}.jpg\">"))
            .collect();
        let doc = Html::parse_document(&format!("<html><body>{imgs}</body></html>"));
        let cands = collect_candidates(&doc, "https://x.com/");
        assert_eq!(cands.len(), 10);
    }
}
