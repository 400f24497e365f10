//! Diagram definition input and normalization.
//!
//! Structurizr Express only parses a definition as YAML when the YAML
//! document separator sits at position 0; anything else is handed to its
//! JSON parser and fails with confusing errors. Normalization therefore runs
//! before the browser is even launched.

use crate::{RenderError, Result};

/// YAML document separator the editor keys its syntax detection on.
pub const DOCUMENT_SEPARATOR: &str = "---";

/// A diagram definition as read from the caller, plus its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramDefinition {
    raw: String,
    normalized: String,
}

impl DiagramDefinition {
    /// Normalizes `raw`, rejecting input that is empty or whitespace only.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(RenderError::Input(
                "diagram definition is empty".to_string(),
            ));
        }
        let normalized = normalize(&raw);
        Ok(Self { raw, normalized })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

/// Drops everything before the first separator, or prepends a separator line
/// when there is none.
pub fn normalize(text: &str) -> String {
    match text.find(DOCUMENT_SEPARATOR) {
        Some(offset) => text[offset..].to_string(),
        None => format!("{DOCUMENT_SEPARATOR}\n{text}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_separator_when_absent() {
        let text = "type: System Context\nscope: Widgets\n";
        assert_eq!(normalize(text), format!("---\n{text}"));
    }

    #[test]
    fn keeps_text_starting_with_separator() {
        let text = "---\ntype: System Context\n";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn discards_prefix_before_first_separator() {
        let text = "# generated by a tool\n\n---\ntype: Container\n---\nextra: doc\n";
        let offset = text.find("---").unwrap();
        let normalized = normalize(text);
        assert_eq!(normalized, &text[offset..]);
        assert!(normalized.ends_with("---\nextra: doc\n"));
    }

    #[test]
    fn separator_inside_a_line_still_counts() {
        assert_eq!(normalize("name: a---b"), "---b");
    }

    #[test]
    fn multibyte_prefix_is_sliced_on_char_boundary() {
        let text = "größe: 1\n---\nname: x";
        assert_eq!(normalize(text), "---\nname: x");
    }

    #[test]
    fn definition_keeps_raw_and_normalized() {
        let def = DiagramDefinition::new("type: System Landscape").unwrap();
        assert_eq!(def.raw(), "type: System Landscape");
        assert_eq!(def.normalized(), "---\ntype: System Landscape");
    }

    #[test]
    fn blank_definition_is_rejected() {
        let err = DiagramDefinition::new("  \n\t").unwrap_err();
        assert!(matches!(err, RenderError::Input(_)));
    }
}
