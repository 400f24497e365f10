//! Named readiness predicates bounding every wait on page state.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::script::{js_string, Script};

/// Script name shared by every predicate evaluation.
pub const READINESS_SCRIPT: &str = "readiness";

/// Page global holding the DOM-change monitor the injector installs right
/// before asking the editor to re-render.
pub const RENDER_MONITOR: &str = "__xrenderRenderMonitor";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessPredicate {
    /// `document.querySelector(selector)` matches something.
    ElementExists(String),
    /// The matched element carries a non-empty attribute.
    AttributePresent { selector: String, attribute: String },
    /// `document.readyState` is `complete`.
    DocumentComplete,
    /// Arbitrary page expression, truthy when ready.
    Expression(String),
    /// A re-render was started through [`RENDER_MONITOR`] and the document
    /// has not changed for `quiet_ms` since.
    RenderSettled { quiet_ms: u64 },
    AllOf(Vec<ReadinessPredicate>),
}

impl ReadinessPredicate {
    pub fn element(selector: impl Into<String>) -> Self {
        ReadinessPredicate::ElementExists(selector.into())
    }

    pub fn attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        ReadinessPredicate::AttributePresent {
            selector: selector.into(),
            attribute: attribute.into(),
        }
    }

    pub fn to_script(&self) -> Script {
        Script::expression(READINESS_SCRIPT, format!("Boolean({})", self.expression()))
    }

    fn expression(&self) -> String {
        match self {
            ReadinessPredicate::ElementExists(selector) => {
                format!("document.querySelector({}) !== null", js_string(selector))
            }
            ReadinessPredicate::AttributePresent {
                selector,
                attribute,
            } => format!(
                "((el, name) => !!el && (el.getAttribute(name) || '').length > 0)(document.querySelector({}), {})",
                js_string(selector),
                js_string(attribute)
            ),
            ReadinessPredicate::DocumentComplete => {
                "document.readyState === 'complete'".to_string()
            }
            ReadinessPredicate::Expression(source) => format!("({source})"),
            ReadinessPredicate::RenderSettled { quiet_ms } => format!(
                "((m) => !!m && m.started === true && (performance.now() - m.lastChange) >= {quiet_ms})(window[{}])",
                js_string(RENDER_MONITOR)
            ),
            ReadinessPredicate::AllOf(parts) if parts.is_empty() => "true".to_string(),
            ReadinessPredicate::AllOf(parts) => parts
                .iter()
                .map(|p| format!("({})", p.expression()))
                .collect::<Vec<_>>()
                .join(" && "),
        }
    }
}

impl fmt::Display for ReadinessPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessPredicate::ElementExists(selector) => {
                write!(f, "element `{selector}` to exist")
            }
            ReadinessPredicate::AttributePresent {
                selector,
                attribute,
            } => write!(f, "`{selector}` to carry a `{attribute}` attribute"),
            ReadinessPredicate::DocumentComplete => f.write_str("the document to finish loading"),
            ReadinessPredicate::Expression(source) => write!(f, "`{source}` to hold"),
            ReadinessPredicate::RenderSettled { quiet_ms } => write!(
                f,
                "the editor to re-render and stay unchanged for {quiet_ms}ms"
            ),
            ReadinessPredicate::AllOf(parts) => {
                for (idx, part) in parts.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(" and ")?;
                    }
                    write!(f, "{part}")?;
                }
                Ok(())
            }
        }
    }
}
