//! Default templates and vendor attribute allow-lists per element kind.
//!
//! Lookups are pure and deterministic: the same kind always yields an equal
//! template. Kinds outside the known palette get an empty template rather
//! than an error, keeping the registry forward-compatible with new element
//! kinds.

use serde_json::Value;

use crate::element::{ElementKind, Properties};
use crate::geometry::Size;

/// Vendor attributes meaningful on every element kind, in panel order.
const COMMON_ATTRIBUTES: [&str; 5] = [
    "asyncBefore",
    "asyncAfter",
    "exclusive",
    "jobRetryTimeCycle",
    "jobPriority",
];

/// Default geometry and baseline properties for an element kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementTemplate {
    pub size: Option<Size>,
    pub properties: Properties,
}

/// Look up the default template for a kind.
pub fn template(kind: &ElementKind) -> ElementTemplate {
    match kind {
        ElementKind::UserTask | ElementKind::ServiceTask => ElementTemplate {
            size: Some(Size::new(100.0, 80.0)),
            properties: async_defaults(),
        },
        ElementKind::StartEvent | ElementKind::EndEvent => ElementTemplate {
            size: Some(Size::new(36.0, 36.0)),
            properties: Properties::default(),
        },
        ElementKind::ExclusiveGateway | ElementKind::ParallelGateway => ElementTemplate {
            size: Some(Size::new(50.0, 50.0)),
            properties: Properties::default(),
        },
        _ => ElementTemplate::default(),
    }
}

/// The ordered allow-list of vendor attribute names meaningful for a kind.
///
/// Used by the codec when deciding which attributes to emit and by
/// properties-panel collaborators when deciding which fields to show.
pub fn vendor_attributes(kind: &ElementKind) -> Vec<&'static str> {
    let mut attributes = COMMON_ATTRIBUTES.to_vec();
    match kind {
        ElementKind::UserTask => attributes.extend([
            "assignee",
            "candidateUsers",
            "candidateGroups",
            "dueDate",
            "followUpDate",
            "priority",
            "formKey",
        ]),
        ElementKind::ServiceTask => attributes.extend([
            "class",
            "delegateExpression",
            "expression",
            "resultVariable",
            "topic",
            "taskPriority",
        ]),
        ElementKind::ScriptTask => {
            attributes.extend(["scriptFormat", "script", "resultVariable", "resource"])
        }
        _ => {}
    }
    attributes
}

/// Baseline async/exclusive flags shared by task templates.
fn async_defaults() -> Properties {
    let mut properties = Properties::default();
    properties
        .extra
        .insert("asyncBefore".to_string(), Value::Bool(false));
    properties
        .extra
        .insert("asyncAfter".to_string(), Value::Bool(false));
    properties
        .extra
        .insert("exclusive".to_string(), Value::Bool(true));
    properties
}
