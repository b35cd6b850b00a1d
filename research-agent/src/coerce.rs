//! Best-effort coercion of free-text model output into a JSON object.

use serde_json::Value;

use crate::errors::OutputError;

/// Coerce raw model text into a JSON value.
///
/// Two bounded stages: when the trimmed text is not already a `{...}` block,
/// slice between the first `{` and the last `}` (models like to wrap their
/// JSON in prose); strict-parse; on failure, one repair pass removing the
/// known trailing-comma-before-blank-line artifacts, then a final parse.
///
/// # Errors
/// [`OutputError::Parse`] carrying the original raw text when both parses
/// fail. The repair set is intentionally narrow: ambiguous output should be
/// diagnosable, not silently coerced.
pub fn coerce_json_object(raw: &str) -> Result<Value, OutputError> {
    let mut sliced = raw.trim();
    if !(sliced.starts_with('{') && sliced.ends_with('}')) {
        if let (Some(start), Some(end)) = (sliced.find('{'), sliced.rfind('}')) {
            if end > start {
                sliced = &sliced[start..=end];
            }
        }
    }

    match serde_json::from_str(sliced) {
        Ok(value) => Ok(value),
        Err(_) => {
            let cleaned = sliced.replace(",\n\n", "\n\n").replace(",\n \n", "\n \n");
            serde_json::from_str(&cleaned).map_err(|source| OutputError::Parse {
                source,
                raw: raw.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_wrapped_in_stray_prose() {
        let raw = "Sure, here:\n{\"summary\": \"ok\"}\nHope that helps!";
        let value = coerce_json_object(raw).unwrap();
        assert_eq!(value["summary"], "ok");
    }

    #[test]
    fn parses_clean_json_untouched() {
        let value = coerce_json_object("  {\"a\": [1, 2]}  ").unwrap();
        assert_eq!(value["a"][1], 2);
    }

    #[test]
    fn repairs_trailing_comma_before_blank_line() {
        let raw = "{\"a\": 1,\n\n}";
        let value = coerce_json_object(raw).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn unparseable_output_carries_the_raw_text() {
        let raw = "no json here at all";
        let err = coerce_json_object(raw).unwrap_err();
        assert!(err.to_string().contains("no json here at all"));
    }
}
