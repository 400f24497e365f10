use serde::Deserialize;
use serde_json::Value;

use super::PipelineOptions;
use crate::browser::{scripts, wait_until, EditorPage};
use crate::definition::DiagramDefinition;
use crate::narrator::Narrator;
use crate::{RenderError, Result};

/// What the editor made of the injected definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Clean,
    Invalid(Vec<String>),
}

/// Writes the definition into the editor, re-renders and queries its errors.
pub(crate) async fn inject_definition<P: EditorPage>(
    page: &P,
    definition: &DiagramDefinition,
    options: &PipelineOptions,
    narrator: &Narrator,
) -> Result<ValidationOutcome> {
    narrator.step("setting definition and updating diagram");
    let inject = scripts::inject_definition(definition.normalized(), &options.profile)?;
    page.evaluate(&inject).await?;

    let settled = options.profile.settled();
    wait_until(
        page,
        &settled,
        options.timeouts.settle,
        options.timeouts.poll_interval,
    )
    .await
    .map_err(|timed_out| RenderError::NavigationTimeout {
        predicate: timed_out.describe(&settled),
        timeout: options.timeouts.settle,
    })?;

    narrator.step("checking for validation errors");
    let reported = page.evaluate(&scripts::query_errors(&options.profile)?).await?;
    let errors = parse_errors(reported)?;
    if errors.is_empty() {
        Ok(ValidationOutcome::Clean)
    } else {
        log::debug!("editor reported {} validation error(s)", errors.len());
        Ok(ValidationOutcome::Invalid(errors))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReportedError {
    Text(String),
    Structured { message: String },
}

fn parse_errors(value: Value) -> Result<Vec<String>> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    let reported: Vec<ReportedError> = serde_json::from_value(value).map_err(|e| {
        RenderError::browser("reading validation errors", format!("unexpected shape: {e}"))
    })?;
    Ok(reported
        .into_iter()
        .map(|err| match err {
            ReportedError::Text(text) | ReportedError::Structured { message: text } => text,
        })
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}
