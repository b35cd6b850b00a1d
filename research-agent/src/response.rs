//! Structured research response: schema types, validation, image backfill.
//!
//! Validation is strict and structural: every URL-typed field must parse as
//! an absolute URL, and a missing required field fails the whole response.
//! The count contracts on `best_practices` (5-10) and `examples` (3-6) are
//! prompt-level requests, not validation rules.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::coerce::coerce_json_object;
use crate::errors::OutputError;
use crate::extract::ExtractedContent;

/// Concrete example reference with an optional image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub title: String,
    pub url: Url,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<Url>,
    #[serde(default)]
    pub source_domain: Option<String>,
}

/// Consideration buckets helping designers weigh tradeoffs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Considerations {
    #[serde(default)]
    pub tradeoffs: Vec<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
    #[serde(default)]
    pub performance: Vec<String>,
    #[serde(default)]
    pub browser_support: Vec<String>,
}

/// Citation metadata used for attribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: Url,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
}

/// Validated research answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResearchResponse {
    #[serde(default)]
    pub query_classification: Option<String>,
    pub summary: String,
    pub best_practices: Vec<String>,
    pub examples: Vec<Example>,
    pub considerations: Considerations,
    pub sources: Vec<Source>,
}

impl ResearchResponse {
    /// Coerce raw model text and validate it against this schema.
    ///
    /// # Errors
    /// [`OutputError::Parse`] when the text is not JSON,
    /// [`OutputError::Schema`] when the JSON does not match; both carry the
    /// raw text for diagnosis. No partial acceptance.
    pub fn from_raw(raw: &str) -> Result<Self, OutputError> {
        let value = coerce_json_object(raw)?;
        serde_json::from_value(value).map_err(|source| OutputError::Schema {
            source,
            raw: raw.to_string(),
        })
    }

    /// Backfill missing example images from the extraction results, matching
    /// by exact source URL. Examples without a match keep `None`; this
    /// never fails.
    pub fn backfill_example_images(&mut self, extracted: &[ExtractedContent]) {
        for example in &mut self.examples {
            if example.image_url.is_some() {
                continue;
            }
            let found = extracted
                .iter()
                .find(|e| e.image_url.is_some() && e.url == example.url.as_str())
                .and_then(|e| e.image_url.as_deref())
                .and_then(|img| Url::parse(img).ok());
            if let Some(img) = found {
                example.image_url = Some(img);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ImageSource;

    fn sample() -> ResearchResponse {
        ResearchResponse {
            query_classification: Some("pattern".to_string()),
            summary: "Keep navigation reachable. [1]".to_string(),
            best_practices: vec!["Use a visible tab bar. [1]".to_string()],
            examples: vec![Example {
                title: "Airbnb".to_string(),
                url: Url::parse("https://airbnb.com/design").unwrap(),
                description: None,
                image_url: None,
                source_domain: Some("airbnb.com".to_string()),
            }],
            considerations: Considerations {
                tradeoffs: vec!["Fewer items fit. [1]".to_string()],
                ..Considerations::default()
            },
            sources: vec![Source {
                title: "NNG".to_string(),
                url: Url::parse("https://nngroup.com/articles/nav").unwrap(),
                publisher: Some("Nielsen Norman Group".to_string()),
                publish_date: None,
                relevance_score: Some(0.9),
            }],
        }
    }

    #[test]
    fn round_trips_through_serialization_and_coercion() {
        let original = sample();
        let raw = serde_json::to_string(&original).unwrap();
        let reparsed = ResearchResponse::from_raw(&raw).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn survives_prose_wrapping() {
        let raw = format!(
            "Sure, here you go:\n{}\nHope that helps!",
            serde_json::to_string(&sample()).unwrap()
        );
        assert_eq!(ResearchResponse::from_raw(&raw).unwrap(), sample());
    }

    #[test]
    fn non_absolute_urls_fail_validation() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["examples"][0]["url"] = serde_json::json!("not-a-url");
        let raw = value.to_string();
        let err = ResearchResponse::from_raw(&raw).unwrap_err();
        assert!(matches!(err, OutputError::Schema { .. }));
    }

    #[test]
    fn missing_required_fields_fail_the_whole_response() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value.as_object_mut().unwrap().remove("summary");
        let err = ResearchResponse::from_raw(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("summary"));
    }

    #[test]
    fn backfill_matches_by_exact_url_only() {
        let mut response = sample();
        let extracted = vec![
            ExtractedContent {
                title: None,
                url: "https://airbnb.com/design".to_string(),
                content: String::new(),
                image_url: Some("https://cdn.airbnb.com/hero.jpg".to_string()),
                image_source: ImageSource::Meta,
                image_dims: (None, None),
            },
            ExtractedContent {
                title: None,
                url: "https://other.com/".to_string(),
                content: String::new(),
                image_url: Some("https://other.com/x.jpg".to_string()),
                image_source: ImageSource::Dom,
                image_dims: (None, None),
            },
        ];
        response.backfill_example_images(&extracted);
        assert_eq!(
            response.examples[0].image_url.as_ref().unwrap().as_str(),
            "https://cdn.airbnb.com/hero.jpg"
        );

        // An already-set image is left alone.
        let before = response.examples[0].image_url.clone();
        response.backfill_example_images(&[]);
        assert_eq!(response.examples[0].image_url, before);
    }
}
