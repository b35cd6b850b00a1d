//! Query classification and search-variant expansion.
//!
//! Pure functions of the question text: no I/O, no error conditions.

use std::collections::HashSet;
use std::fmt;

const ACCESSIBILITY_KEYWORDS: [&str; 6] = [
    "wcag",
    "accessibility",
    "aria",
    "contrast",
    "keyboard",
    "screen reader",
];
const FEASIBILITY_KEYWORDS: [&str; 5] = [
    "feasibility",
    "browser support",
    "performance",
    "container queries",
    "supports",
];
const INSPIRATION_KEYWORDS: [&str; 5] = ["examples", "inspiration", "gallery", "show me", "visual"];

/// Maximum number of search variants per run.
const MAX_VARIANTS: usize = 6;

/// Fixed question categories. Keyword lists are checked in priority order
/// (accessibility, then feasibility, then inspiration) so overlapping
/// keywords resolve deterministically; everything else is a pattern query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryClassification {
    Pattern,
    Accessibility,
    Inspiration,
    Feasibility,
}

impl QueryClassification {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryClassification::Pattern => "pattern",
            QueryClassification::Accessibility => "accessibility",
            QueryClassification::Inspiration => "inspiration",
            QueryClassification::Feasibility => "feasibility",
        }
    }
}

impl fmt::Display for QueryClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a question by keyword membership; first matching list wins.
pub fn classify(question: &str) -> QueryClassification {
    let q = question.to_lowercase();
    let hit = |keys: &[&str]| keys.iter().any(|k| q.contains(k));

    if hit(&ACCESSIBILITY_KEYWORDS) {
        return QueryClassification::Accessibility;
    }
    if hit(&FEASIBILITY_KEYWORDS) {
        return QueryClassification::Feasibility;
    }
    if hit(&INSPIRATION_KEYWORDS) {
        return QueryClassification::Inspiration;
    }
    QueryClassification::Pattern
}

/// Expand the question into search variants: the trimmed original plus three
/// classification-specific reformulations, deduplicated in first-seen order
/// and capped at [`MAX_VARIANTS`].
pub fn variants(question: &str, classification: QueryClassification) -> Vec<String> {
    let base = question.trim();
    let prefixes: [&str; 3] = match classification {
        QueryClassification::Pattern => ["best practices", "common pitfalls", "2024 2025"],
        QueryClassification::Accessibility => ["wcag", "aria", "keyboard navigation"],
        QueryClassification::Inspiration => ["examples", "ui inspiration", "design patterns"],
        QueryClassification::Feasibility => ["browser support", "performance", "mdn"],
    };

    let mut out: Vec<String> = vec![base.to_string()];
    out.extend(prefixes.iter().map(|p| format!("{p} {base}")));

    let mut seen = HashSet::new();
    out.retain(|v| seen.insert(v.clone()));
    out.truncate(MAX_VARIANTS);
    out
}

/// Classification plus variants in one call.
pub fn enhance(question: &str) -> (QueryClassification, Vec<String>) {
    let classification = classify(question);
    let vs = variants(question, classification);
    (classification, vs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessibility_keywords_win_over_later_categories() {
        // "supports" (feasibility) and "examples" (inspiration) also match,
        // but the accessibility list is checked first.
        assert_eq!(
            classify("examples of aria patterns the browser supports"),
            QueryClassification::Accessibility
        );
        assert_eq!(classify("is aria-live usable?"), QueryClassification::Accessibility);
    }

    #[test]
    fn priority_continues_down_the_list() {
        assert_eq!(
            classify("container queries examples"),
            QueryClassification::Feasibility
        );
        assert_eq!(classify("show me hero sections"), QueryClassification::Inspiration);
        assert_eq!(
            classify("best practices for mobile navigation"),
            QueryClassification::Pattern
        );
    }

    #[test]
    fn variants_are_capped_and_unique() {
        let vs = variants("wcag", QueryClassification::Accessibility);
        // "wcag wcag" is distinct from "wcag"; all four survive dedup here.
        assert!(vs.len() <= 6);
        let unique: std::collections::HashSet<_> = vs.iter().collect();
        assert_eq!(unique.len(), vs.len());
        assert_eq!(vs[0], "wcag");
    }

    #[test]
    fn pattern_variants_match_the_template_set() {
        let (c, vs) = enhance("best practices for mobile navigation");
        assert_eq!(c, QueryClassification::Pattern);
        assert_eq!(vs[0], "best practices for mobile navigation");
        assert!(vs.contains(&"best practices best practices for mobile navigation".to_string()));
        assert!(vs.contains(&"common pitfalls best practices for mobile navigation".to_string()));
        assert!(vs.contains(&"2024 2025 best practices for mobile navigation".to_string()));
        assert_eq!(vs.len(), 4);
    }
}
