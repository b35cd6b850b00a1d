//! Synthesis prompt assembly.
//!
//! Deterministic function of its inputs: instruction header, question and
//! classification, ranked source list, grounding excerpts with a char
//! budget, the target schema, and the fixed instruction set.

use crate::extract::ExtractedContent;
use crate::query::QueryClassification;
use crate::search::rank::RankedHit;

/// Compact JSON Schema for the structured research response, embedded in the
/// prompt so the model knows the exact target shape. Kept in sync with
/// [`ResearchResponse`](crate::response::ResearchResponse) by hand; tests
/// pin the required keys.
pub const RESPONSE_SCHEMA_JSON: &str = r#"{"title":"ResearchResponse","type":"object","required":["summary","best_practices","examples","considerations","sources"],"properties":{"query_classification":{"type":["string","null"],"description":"pattern | accessibility | inspiration | feasibility"},"summary":{"type":"string"},"best_practices":{"type":"array","items":{"type":"string"}},"examples":{"type":"array","items":{"type":"object","required":["title","url"],"properties":{"title":{"type":"string"},"url":{"type":"string","format":"uri"},"description":{"type":["string","null"]},"image_url":{"type":["string","null"],"format":"uri"},"source_domain":{"type":["string","null"]}}}},"considerations":{"type":"object","properties":{"tradeoffs":{"type":"array","items":{"type":"string"}},"accessibility":{"type":"array","items":{"type":"string"}},"performance":{"type":"array","items":{"type":"string"}},"browser_support":{"type":"array","items":{"type":"string"}}}},"sources":{"type":"array","items":{"type":"object","required":["title","url"],"properties":{"title":{"type":"string"},"url":{"type":"string","format":"uri"},"publisher":{"type":["string","null"]},"publish_date":{"type":["string","null"]},"relevance_score":{"type":["number","null"]}}}}}}"#;

/// Build the synthesis prompt.
pub fn build_prompt(
    question: &str,
    classification: QueryClassification,
    ranked: &[RankedHit],
    extracted: &[ExtractedContent],
    excerpt_max_chars: usize,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("You will produce a single JSON object only. No markdown or prose.".into());
    lines.push("The JSON must follow the ResearchResponse schema shown below.".into());
    lines.push(String::new());
    lines.push(format!("Question: {question}"));
    lines.push(format!("Query classification: {classification}"));
    lines.push(String::new());

    lines.push("Ranked sources (title | url):".into());
    for r in ranked {
        lines.push(format!("- {} | {}", r.hit.title, r.hit.url));
    }
    lines.push(String::new());

    lines.push("Source content excerpts (use these for grounding; do not fabricate):".into());
    for e in extracted {
        let title = e.title.as_deref().unwrap_or("Untitled");
        lines.push(format!("- {} | {}", title, e.url));
        if !e.content.is_empty() {
            lines.push(truncate_excerpt(&e.content, excerpt_max_chars));
        }
        lines.push(String::new());
    }

    lines.push("JSON Schema:".into());
    lines.push(RESPONSE_SCHEMA_JSON.into());
    lines.push(String::new());

    lines.push("Instructions:".into());
    for instruction in [
        "- Synthesize, don't summarize.",
        "- Provide 5-10 best_practices, actionable and specific.",
        "- Include 3-6 examples with working URLs; images optional.",
        "- considerations must include tradeoffs, accessibility (cite WCAG where relevant), performance, browser_support.",
        "- When citing accessibility, include exact WCAG 2.2 criterion IDs where applicable.",
        "- If an example has a known image, set examples[].image_url to that URL; otherwise null.",
        "- Ensure every citation in text maps to a listed source URL.",
        "- Include inline bracket citations like [n] that reference the sources list (1-based index).",
        "- Add citations after claims (stats, dates, support, quotes); do not invent indices.",
        "- Output strictly valid JSON. Do not wrap in code fences.",
    ] {
        lines.push(instruction.into());
    }

    lines.join("\n")
}

/// Ellipsis-truncate an excerpt to at most `max_chars` characters.
fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ImageSource;
    use crate::search::SearchHit;

    fn ranked(title: &str, url: &str) -> RankedHit {
        RankedHit {
            hit: SearchHit {
                title: title.to_string(),
                url: url.to_string(),
                snippet: None,
            },
            score: 0.0,
        }
    }

    fn extracted(url: &str, content: &str) -> ExtractedContent {
        ExtractedContent {
            title: Some("T".to_string()),
            url: url.to_string(),
            content: content.to_string(),
            image_url: None,
            image_source: ImageSource::None,
            image_dims: (None, None),
        }
    }

    #[test]
    fn contains_every_ranked_url_verbatim_and_the_schema() {
        let ranked = vec![
            ranked("A", "https://a.com/one"),
            ranked("B", "https://b.com/two?x=1"),
        ];
        let prompt = build_prompt(
            "best practices for mobile navigation",
            QueryClassification::Pattern,
            &ranked,
            &[],
            1200,
        );

        assert!(prompt.contains("Question: best practices for mobile navigation"));
        assert!(prompt.contains("Query classification: pattern"));
        assert!(prompt.contains("- A | https://a.com/one"));
        assert!(prompt.contains("- B | https://b.com/two?x=1"));
        assert!(prompt.contains(RESPONSE_SCHEMA_JSON));
        assert!(prompt.contains("\"required\":[\"summary\",\"best_practices\",\"examples\",\"considerations\",\"sources\"]"));
        assert!(prompt.contains("Do not wrap in code fences."));
    }

    #[test]
    fn excerpts_are_ellipsis_truncated() {
        let long = "x".repeat(50);
        let prompt = build_prompt(
            "q long enough",
            QueryClassification::Pattern,
            &[],
            &[extracted("https://a.com", &long)],
            20,
        );
        let expected = format!("{}...", "x".repeat(17));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&long));
    }

    #[test]
    fn empty_content_contributes_no_excerpt_line() {
        let prompt = build_prompt(
            "q long enough",
            QueryClassification::Pattern,
            &[],
            &[extracted("https://a.com", "")],
            1200,
        );
        assert!(prompt.contains("- T | https://a.com"));
    }
}
