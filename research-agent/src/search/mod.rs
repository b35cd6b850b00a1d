//! Multi-source web search: provider adapters and shared result shape.

pub mod brave;
pub mod exa;
pub mod rank;

use serde::{Deserialize, Serialize};

/// Producer-agnostic search result; `url` is the natural key downstream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: Option<String>,
}
