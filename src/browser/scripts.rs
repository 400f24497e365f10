//! Page scripts driving the editor.
//!
//! Each template is a single JS function taking one JSON parameter object.
//! They are shipped to the page as source text through [`Script::call`].

use serde::Serialize;

use super::predicate::RENDER_MONITOR;
use super::script::Script;
use crate::editor::{EditorProfile, ExportProfile};
use crate::Result;

pub const INJECT_DEFINITION: &str = "inject-definition";
pub const QUERY_ERRORS: &str = "query-errors";
pub const EXPORT_DIAGRAM: &str = "export-diagram";
pub const READ_ATTRIBUTE: &str = "read-attribute";

/// Resolves a dotted path from `window`, returning the value and its owner.
const RESOLVE_PATH: &str = r#"
  const resolvePath = (path) => {
    const keys = String(path || '').split('.').filter((k) => k.length > 0);
    let owner = window;
    let value = window;
    for (const key of keys) {
      owner = value;
      value = value == null ? undefined : value[key];
    }
    return { owner, value };
  };
"#;

const INJECT_DEFINITION_JS: &str = r#"
(params) => {
  __RESOLVE_PATH__
  for (const selector of params.overlaySelectors) {
    document.querySelectorAll(selector).forEach((el) => {
      el.style.display = 'none';
      el.classList.remove('in', 'show');
    });
  }
  document.body.classList.remove('modal-open');

  if (params.tabSelector) {
    const tab = document.querySelector(params.tabSelector);
    if (!tab) {
      throw new Error(`definition tab not found: ${params.tabSelector}`);
    }
    tab.click();
  }

  const input = document.querySelector(params.inputSelector);
  if (!input) {
    throw new Error(`definition input not found: ${params.inputSelector}`);
  }
  input.value = params.definition;
  input.dispatchEvent(new Event('input', { bubbles: true }));
  input.dispatchEvent(new Event('change', { bubbles: true }));

  const render = resolvePath(params.renderFunction);
  if (typeof render.value !== 'function') {
    throw new Error(`render entry point not found: ${params.renderFunction}`);
  }

  const previous = window[params.monitor];
  if (previous && previous.observer) {
    previous.observer.disconnect();
  }
  const monitor = { started: false, changes: 0, lastChange: performance.now(), observer: null };
  monitor.observer = new MutationObserver((records) => {
    monitor.changes += records.length;
    monitor.lastChange = performance.now();
  });
  monitor.observer.observe(document.body, {
    subtree: true,
    childList: true,
    attributes: true,
    characterData: true,
  });
  window[params.monitor] = monitor;

  render.value.call(render.owner, params.definition);
  monitor.lastChange = performance.now();
  monitor.started = true;
  return true;
}
"#;

const QUERY_ERRORS_JS: &str = r#"
(params) => {
  __RESOLVE_PATH__
  const messages = Array.from(document.querySelectorAll(params.errorSelector))
    .map((el) => (el.textContent || '').trim())
    .filter((text) => text.length > 0);
  const hasErrors = resolvePath(params.hasErrorsFunction);
  if (typeof hasErrors.value !== 'function') {
    return messages;
  }
  if (!hasErrors.value.call(hasErrors.owner)) {
    return [];
  }
  return messages.length > 0
    ? messages
    : ['The editor reported errors in the diagram definition.'];
}
"#;

const EXPORT_DIAGRAM_JS: &str = r#"
(params) => {
  __RESOLVE_PATH__
  const exporter = resolvePath(params.exportFunction);
  if (typeof exporter.value !== 'function') {
    throw new Error(`export function not found: ${params.exportFunction}`);
  }
  const returned = exporter.value.call(exporter.owner, { crop: false });
  if (typeof returned !== 'string' || !returned.startsWith('data:')) {
    return 'delegated';
  }
  const win = window.open('', '_blank');
  if (!win) {
    throw new Error('export window could not be opened');
  }
  const el = win.document.createElement(params.outputTag);
  el.setAttribute(params.outputAttribute, returned);
  win.document.body.appendChild(el);
  return 'opened';
}
"#;

const READ_ATTRIBUTE_JS: &str = r#"
(params) => {
  const el = document.querySelector(params.selector);
  return el ? el.getAttribute(params.attribute) : null;
}
"#;

fn template(source: &str) -> String {
    source.replace("__RESOLVE_PATH__", RESOLVE_PATH.trim())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InjectParams<'a> {
    definition: &'a str,
    overlay_selectors: &'a [String],
    tab_selector: Option<&'a str>,
    input_selector: &'a str,
    render_function: &'a str,
    monitor: &'a str,
}

/// Hides overlays, activates the definition tab, writes the definition and
/// re-renders. A [`RENDER_MONITOR`] is installed just before the render call
/// so the settle predicate tracks this render and nothing earlier.
pub fn inject_definition(definition: &str, profile: &EditorProfile) -> Result<Script> {
    Script::call(
        INJECT_DEFINITION,
        &template(INJECT_DEFINITION_JS),
        &InjectParams {
            definition,
            overlay_selectors: &profile.overlay_selectors,
            tab_selector: profile.definition_tab_selector.as_deref(),
            input_selector: &profile.definition_input_selector,
            render_function: &profile.render_function,
            monitor: RENDER_MONITOR,
        },
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorParams<'a> {
    error_selector: &'a str,
    has_errors_function: &'a str,
}

/// Evaluates to the editor's current validation messages, `[]` when clean.
pub fn query_errors(profile: &EditorProfile) -> Result<Script> {
    Script::call(
        QUERY_ERRORS,
        &template(QUERY_ERRORS_JS),
        &ErrorParams {
            error_selector: &profile.error_selector,
            has_errors_function: &profile.has_errors_function,
        },
    )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportParams<'a> {
    export_function: &'a str,
    output_tag: String,
    output_attribute: &'a str,
}

/// Calls the export function. When it hands back a data URI instead of
/// opening a page, the script opens one holding the output element.
pub fn export_diagram(export: &ExportProfile) -> Result<Script> {
    Script::call(
        EXPORT_DIAGRAM,
        &template(EXPORT_DIAGRAM_JS),
        &ExportParams {
            export_function: &export.function,
            output_tag: element_tag(&export.output_selector),
            output_attribute: &export.output_attribute,
        },
    )
}

#[derive(Serialize)]
struct AttributeParams<'a> {
    selector: &'a str,
    attribute: &'a str,
}

pub fn read_attribute(selector: &str, attribute: &str) -> Result<Script> {
    Script::call(
        READ_ATTRIBUTE,
        READ_ATTRIBUTE_JS,
        &AttributeParams {
            selector,
            attribute,
        },
    )
}

/// Leading tag name of a simple selector (`img.preview` -> `img`).
fn element_tag(selector: &str) -> String {
    let tag: String = selector
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if tag.is_empty() {
        "img".to_string()
    } else {
        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorProfile;

    #[test]
    fn inject_script_carries_definition_as_data() {
        let profile = EditorProfile::default();
        let definition = "---\ntype: System Context\nscope: \"Shop\"\n";
        let script = inject_definition(definition, &profile).unwrap();
        assert_eq!(script.name(), INJECT_DEFINITION);
        assert!(script
            .source()
            .contains(r#""definition":"---\ntype: System Context\nscope: \"Shop\"\n""#));
        assert!(script
            .source()
            .contains(r#""renderFunction":"structurizr.scripting.renderExpressDefinition""#));
        assert!(!script.source().contains("__RESOLVE_PATH__"));
        assert!(script.source().contains("const resolvePath"));
    }

    #[test]
    fn inject_script_arms_the_render_monitor_before_rendering() {
        let script = inject_definition("---\n", &EditorProfile::default()).unwrap();
        let source = script.source();
        assert!(source.contains(r#""monitor":"__xrenderRenderMonitor""#));
        let armed = source.find("window[params.monitor] = monitor").unwrap();
        let rendered = source.find("render.value.call").unwrap();
        let started = source.find("monitor.started = true").unwrap();
        assert!(armed < rendered && rendered < started);
    }

    #[test]
    fn missing_tab_selector_serializes_as_null() {
        let profile = EditorProfile {
            definition_tab_selector: None,
            ..EditorProfile::default()
        };
        let script = inject_definition("---\n", &profile).unwrap();
        assert!(script.source().contains(r#""tabSelector":null"#));
    }

    #[test]
    fn export_script_targets_output_tag() {
        let profile = EditorProfile::default();
        let script = export_diagram(&profile.pdf).unwrap();
        assert_eq!(script.name(), EXPORT_DIAGRAM);
        assert!(script.source().contains(r#""outputTag":"embed""#));
        assert!(script.source().contains("exportCurrentDiagramToPDF"));
    }

    #[test]
    fn error_query_uses_configured_selector() {
        let script = query_errors(&EditorProfile::default()).unwrap();
        assert!(script.source().contains(r##""errorSelector":"#expressErrors li""##));
    }

    #[test]
    fn element_tag_strips_qualifiers() {
        assert_eq!(element_tag("img.preview"), "img");
        assert_eq!(element_tag("embed[type=\"application/pdf\"]"), "embed");
        assert_eq!(element_tag("#output"), "img");
    }
}
