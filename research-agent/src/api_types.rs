//! Public request type consumed by the orchestration entry point.

use crate::errors::{AgentError, AgentResult};

/// User request for one research run.
#[derive(Clone, Debug)]
pub struct ResearchRequest {
    /// The design-research question, trimmed.
    pub question: String,
    /// Maximum number of results to consider (1..=20).
    pub max_results: usize,
    /// Whether to extract images for examples when available.
    pub include_images: bool,
}

impl ResearchRequest {
    /// Build a request with defaults (10 results, images on).
    ///
    /// # Errors
    /// Rejects questions shorter than 5 characters.
    pub fn new(question: impl Into<String>) -> AgentResult<Self> {
        let question = question.into().trim().to_string();
        if question.len() < 5 {
            return Err(AgentError::Validation(
                "question must be at least 5 characters".into(),
            ));
        }
        Ok(Self {
            question,
            max_results: 10,
            include_images: true,
        })
    }

    /// Override the result cap; allowed range 1..=20.
    pub fn with_max_results(mut self, max_results: usize) -> AgentResult<Self> {
        if !(1..=20).contains(&max_results) {
            return Err(AgentError::Validation(
                "max_results must be within 1..=20".into(),
            ));
        }
        self.max_results = max_results;
        Ok(self)
    }

    /// Toggle image extraction for this run.
    pub fn with_include_images(mut self, include_images: bool) -> Self {
        self.include_images = include_images;
        self
    }
}
