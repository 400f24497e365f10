//! Browser-side logic as data.
//!
//! The orchestrating process and the page share neither memory nor code, so
//! everything evaluated in the page is assembled here into plain source text:
//! a JS function template applied to JSON-encoded arguments.

use serde::Serialize;
use serde_json::Value;

use crate::{RenderError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    name: &'static str,
    source: String,
}

impl Script {
    /// A bare expression evaluated as-is.
    pub fn expression(name: &'static str, source: impl Into<String>) -> Self {
        Self {
            name,
            source: source.into(),
        }
    }

    /// `(function)(params)`, with `params` serialized as a JSON literal.
    pub fn call<P: Serialize + ?Sized>(
        name: &'static str,
        function: &str,
        params: &P,
    ) -> Result<Self> {
        let args = serde_json::to_string(params).map_err(|e| {
            RenderError::browser(format!("assembling {name} script"), e)
        })?;
        Ok(Self {
            name,
            source: format!("({})({})", function.trim(), args),
        })
    }

    /// Stable identifier used for logging and error context.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Encodes `value` as a JS string literal.
pub(crate) fn js_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}
