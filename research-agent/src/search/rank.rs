//! URL deduplication and static authority ranking.

use std::collections::HashSet;

use crate::search::SearchHit;

/// Host suffixes with static credibility weights; the maximum matching
/// weight becomes the hit's score, 0.0 when nothing matches.
const AUTHORITY_DOMAINS: [(&str, f32); 8] = [
    ("nngroup.com", 3.0),
    ("alistapart.com", 2.0),
    ("smashingmagazine.com", 2.0),
    ("web.dev", 3.0),
    ("developer.mozilla.org", 3.0),
    ("w3.org", 3.0),
    ("lawsofux.com", 2.0),
    ("baymard.com", 2.5),
];

/// A search hit with its authority score attached.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedHit {
    pub hit: SearchHit,
    pub score: f32,
}

fn host_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}

/// Drop duplicate URLs (exact string match, first occurrence wins, no
/// normalization) and stable-sort the survivors by descending authority
/// score; equal scores keep their search order.
pub fn dedup_and_rank(candidates: Vec<SearchHit>) -> Vec<RankedHit> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<RankedHit> = Vec::with_capacity(candidates.len());

    for hit in candidates {
        if hit.url.is_empty() || !seen.insert(hit.url.clone()) {
            continue;
        }
        let host = host_of(&hit.url);
        let score = AUTHORITY_DOMAINS
            .iter()
            .filter(|(dom, _)| host.ends_with(dom))
            .map(|&(_, w)| w)
            .fold(0.0f32, f32::max);
        ranked.push(RankedHit { hit, score });
    }

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Post-rank window size: at least `min`, at most `max`, bounded by the
/// caller's requested count.
pub fn rank_window(min: usize, max: usize, requested: usize) -> usize {
    min.max(max.min(requested))
}
