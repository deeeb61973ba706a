//! Defensive wrapper around the opaque rendering model.
//!
//! Capability calls never raise out of the adapter: a `false` return and a
//! raised failure are both reported as `false`, with the failure recorded
//! for diagnostics retrieval. Introspection probes several plausible
//! locations in the runtime's loosely-shaped description and degrades to an
//! empty list on any unexpected shape.

use mascot_api_core::{DiagnosticRecord, ModelRuntime};
use serde_json::Value as JsonValue;

/// Plausible description locations for motion groups and expressions, in
/// probe order.
const MOTION_PATHS: [&[&str]; 3] = [&["FileReferences", "Motions"], &["Motions"], &["motions"]];
const EXPRESSION_PATHS: [&[&str]; 3] = [
    &["FileReferences", "Expressions"],
    &["Expressions"],
    &["expressions"],
];

#[derive(Debug, Default)]
pub struct ModelAdapter {
    last_failure: Option<DiagnosticRecord>,
}

impl ModelAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a motion; `false` means the dispatcher should fall back.
    pub fn try_start_motion(
        &mut self,
        model: &mut dyn ModelRuntime,
        group: &str,
        index: Option<u32>,
        priority: Option<u32>,
        now: u64,
    ) -> bool {
        match model.start_motion(group, index, priority) {
            Ok(true) => true,
            Ok(false) => {
                self.record(
                    "startMotion",
                    format!("runtime declined motion group '{group}'"),
                    None,
                    now,
                );
                false
            }
            Err(error) => {
                self.record(
                    "startMotion",
                    format!("runtime raised starting motion group '{group}'"),
                    Some(error.to_string()),
                    now,
                );
                false
            }
        }
    }

    /// Apply an expression; same failure contract as `try_start_motion`.
    pub fn try_apply_expression(
        &mut self,
        model: &mut dyn ModelRuntime,
        name: &str,
        now: u64,
    ) -> bool {
        match model.apply_expression(name) {
            Ok(true) => true,
            Ok(false) => {
                self.record(
                    "applyExpression",
                    format!("runtime declined expression '{name}'"),
                    None,
                    now,
                );
                false
            }
            Err(error) => {
                self.record(
                    "applyExpression",
                    format!("runtime raised applying expression '{name}'"),
                    Some(error.to_string()),
                    now,
                );
                false
            }
        }
    }

    /// Best-effort motion group names, deduplicated and sorted.
    pub fn list_motions(&mut self, model: &dyn ModelRuntime, now: u64) -> Vec<String> {
        self.list_names(model, now, "listMotions", &MOTION_PATHS)
    }

    /// Best-effort expression names, deduplicated and sorted.
    pub fn list_expressions(&mut self, model: &dyn ModelRuntime, now: u64) -> Vec<String> {
        self.list_names(model, now, "listExpressions", &EXPRESSION_PATHS)
    }

    fn list_names(
        &mut self,
        model: &dyn ModelRuntime,
        now: u64,
        method: &str,
        paths: &[&[&str]],
    ) -> Vec<String> {
        let Some(description) = model.description() else {
            self.record(method, "model exposes no description".to_string(), None, now);
            return Vec::new();
        };

        let mut names = Vec::new();
        for path in paths {
            if let Some(node) = lookup(&description, path) {
                collect_names(node, &mut names);
            }
        }

        if names.is_empty() {
            self.record(
                method,
                "no names found in any known description location".to_string(),
                None,
                now,
            );
            return Vec::new();
        }

        names.sort();
        names.dedup();
        names
    }

    /// Most recent capability failure, for diagnostics retrieval.
    pub fn last_failure(&self) -> Option<&DiagnosticRecord> {
        self.last_failure.as_ref()
    }

    /// Take the most recent failure so the caller can forward it to a sink.
    pub fn take_failure(&mut self) -> Option<DiagnosticRecord> {
        self.last_failure.take()
    }

    fn record(&mut self, method: &str, message: String, cause: Option<String>, now: u64) {
        tracing::warn!(target: "mascot::adapter", method, cause = ?cause, "{message}");
        self.last_failure = Some(DiagnosticRecord::new(method, message, cause, now));
    }
}

fn lookup<'a>(document: &'a JsonValue, path: &[&str]) -> Option<&'a JsonValue> {
    let mut node = document;
    for segment in path {
        node = node.as_object()?.get(*segment)?;
    }
    Some(node)
}

/// Accept record-keyed groups (object keys) and arrays of named definitions
/// (`Name`/`name` objects or plain strings); ignore anything else.
fn collect_names(node: &JsonValue, out: &mut Vec<String>) {
    match node {
        JsonValue::Object(groups) => {
            out.extend(groups.keys().cloned());
        }
        JsonValue::Array(entries) => {
            for entry in entries {
                match entry {
                    JsonValue::String(name) => out.push(name.clone()),
                    JsonValue::Object(definition) => {
                        if let Some(name) = definition
                            .get("Name")
                            .or_else(|| definition.get("name"))
                            .and_then(JsonValue::as_str)
                        {
                            out.push(name.to_string());
                        }
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}
