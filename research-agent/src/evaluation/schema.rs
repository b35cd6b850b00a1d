//! Evaluation result schema and hard range validation.
//!
//! Unlike the soft count contracts on the research response, the numeric
//! bounds here were structural in the rubric's schema, so they are enforced
//! after deserialization.

use serde::{Deserialize, Serialize};

use crate::errors::OutputError;

/// Score for one evaluation category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Score from 0-10.
    pub score: f64,
    /// Explanation for this score.
    pub reasoning: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

/// The seven fixed rubric categories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationScores {
    pub relevance: CategoryScore,
    pub synthesis_quality: CategoryScore,
    pub completeness: CategoryScore,
    pub actionability: CategoryScore,
    pub citations: CategoryScore,
    pub accessibility: CategoryScore,
    pub examples_quality: CategoryScore,
}

impl EvaluationScores {
    /// Category scores with their rubric names, in rubric order.
    pub fn iter_named(&self) -> [(&'static str, &CategoryScore); 7] {
        [
            ("relevance", &self.relevance),
            ("synthesis_quality", &self.synthesis_quality),
            ("completeness", &self.completeness),
            ("actionability", &self.actionability),
            ("citations", &self.citations),
            ("accessibility", &self.accessibility),
            ("examples_quality", &self.examples_quality),
        ]
    }
}

/// Complete evaluation with scores and critique.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Overall score out of 100: the model's own weighted average, trusted
    /// as-is and only range-checked here.
    pub overall_score: f64,
    pub scores: EvaluationScores,
    pub overall_critique: String,
    #[serde(default)]
    pub key_strengths: Vec<String>,
    #[serde(default)]
    pub key_weaknesses: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub query_type_appropriateness: String,
}

impl EvaluationResult {
    /// Enforce the numeric ranges of the rubric schema.
    ///
    /// # Errors
    /// [`OutputError::OutOfRange`] naming the offending field.
    pub fn validate_ranges(&self) -> Result<(), OutputError> {
        if !(0.0..=100.0).contains(&self.overall_score) {
            return Err(OutputError::OutOfRange {
                field: "overall_score",
                detail: format!("{} not within 0..=100", self.overall_score),
            });
        }
        for (name, category) in self.scores.iter_named() {
            if !(0.0..=10.0).contains(&category.score) {
                return Err(OutputError::OutOfRange {
                    field: name,
                    detail: format!("{} not within 0..=10", category.score),
                });
            }
        }
        Ok(())
    }
}
