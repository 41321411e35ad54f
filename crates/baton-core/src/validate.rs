//! Rule-based validation over a process snapshot.
//!
//! [`validate`] is a pure function from a process to an ordered list of
//! diagnostics. Rules run in a fixed order and emit findings in element
//! insertion order within a rule, so repeated calls on an unmodified graph
//! yield identical sequences.
//!
//! ## Rules
//!
//! 1. Missing start event (error, process-level)
//! 2. Missing end event (warning, process-level)
//! 3. Non-start elements without incoming flows (error)
//! 4. Non-end elements without outgoing flows (error)
//! 5. Branching exclusive gateways without flow conditions (warning)
//! 6. Service tasks without an implementation (error)

use crate::diagnostic::Diagnostic;
use crate::element::ElementKind;
use crate::process::Process;

/// Validate a process snapshot.
///
/// Never fails and never mutates the graph; callers decide policy based on
/// the returned diagnostics' severities.
pub fn validate(process: &Process) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let has_start = process
        .elements()
        .any(|e| e.kind == ElementKind::StartEvent);
    if !has_start {
        diagnostics.push(Diagnostic::error("Process must have at least one start event"));
    }

    let has_end = process.elements().any(|e| e.kind == ElementKind::EndEvent);
    if !has_end {
        diagnostics.push(Diagnostic::warning(
            "Process should have at least one end event",
        ));
    }

    for element in process.elements() {
        if element.kind != ElementKind::StartEvent && element.incoming.is_empty() {
            diagnostics.push(
                Diagnostic::error(format!(
                    "Element {} has no incoming connections",
                    element.id
                ))
                .for_element(element.id.as_str()),
            );
        }
    }

    for element in process.elements() {
        if element.kind != ElementKind::EndEvent && element.outgoing.is_empty() {
            diagnostics.push(
                Diagnostic::error(format!(
                    "Element {} has no outgoing connections",
                    element.id
                ))
                .for_element(element.id.as_str()),
            );
        }
    }

    for element in process.elements() {
        if element.kind != ElementKind::ExclusiveGateway || element.outgoing.len() <= 1 {
            continue;
        }
        let has_conditions = element.outgoing.iter().any(|flow_id| {
            process.flow(flow_id).is_some_and(|flow| {
                flow.condition_expression
                    .as_deref()
                    .is_some_and(|expr| !expr.is_empty())
            })
        });
        if !has_conditions {
            diagnostics.push(
                Diagnostic::warning("Exclusive gateway should have conditions on outgoing flows")
                    .for_element(element.id.as_str()),
            );
        }
    }

    for element in process.elements() {
        if element.kind != ElementKind::ServiceTask {
            continue;
        }
        let implemented = [
            &element.properties.implementation,
            &element.properties.java_class,
            &element.properties.topic,
        ]
        .into_iter()
        .any(|field| field.as_deref().is_some_and(|value| !value.is_empty()));
        if !implemented {
            diagnostics.push(
                Diagnostic::error("Service task must have an implementation")
                    .for_element(element.id.as_str()),
            );
        }
    }

    diagnostics
}
