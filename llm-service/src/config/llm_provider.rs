use std::fmt;
use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for LLM synthesis.
///
/// Adding more providers in the future (e.g., Mistral, a local runtime) is a
/// matter of extending this enum and giving it a service implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenAI chat-completions API.
    OpenAi,
    /// Anthropic messages API.
    Anthropic,
}

impl LlmProvider {
    /// Environment variable holding the API key this provider requires.
    pub fn api_key_var(self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAi => f.write_str("openai"),
            LlmProvider::Anthropic => f.write_str("anthropic"),
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    /// Parses the runtime provider flag. The model-family names are accepted
    /// as aliases for callers that pass display labels around.
    fn from_str(s: &str) -> std::result::Result<Self, ConfigError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "gpt-5" | "gpt5" => Ok(LlmProvider::OpenAi),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_aliases() {
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!("GPT-5".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!(
            " Anthropic ".parse::<LlmProvider>().unwrap(),
            LlmProvider::Anthropic
        );
        assert_eq!(
            "claude".parse::<LlmProvider>().unwrap(),
            LlmProvider::Anthropic
        );
        assert!("mistral".parse::<LlmProvider>().is_err());
    }
}
