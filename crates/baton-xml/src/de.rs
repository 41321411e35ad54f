//! Interchange XML to process graph.
//!
//! Event-driven parse over the document. The first `process` element wins;
//! its direct `bpmn`-prefixed children become elements and sequence flows.
//! Vendor attributes map back onto typed properties where known and land in
//! the residual map otherwise, so an unknown `camunda:` attribute survives
//! a round trip. Diagram interchange shapes restore element geometry.
//!
//! Nested structure below an element (extension elements, sub-process
//! content) is skipped except for the documentation text node; the import
//! is flat, mirroring the export.

use log::debug;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::Value;

use baton_core::{ElementKind, ElementOverrides, FlowOverrides, Point, Process, Size};

use crate::XmlError;

pub(crate) fn deserialize(xml: &str) -> Result<Process, XmlError> {
    let mut reader = Reader::from_str(xml);
    let config = reader.config_mut();
    config.trim_text_start = true;
    config.trim_text_end = true;

    let mut process: Option<Process> = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"process" if process.is_none() => {
                    process = Some(read_process(&mut reader, &e)?);
                }
                b"BPMNShape" => match process.as_mut() {
                    Some(process) => read_shape(&mut reader, &e, process)?,
                    None => {
                        reader.read_to_end(e.name())?;
                    }
                },
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"process" && process.is_none() => {
                process = Some(process_from_attrs(&e)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let process = process
        .ok_or_else(|| XmlError::Malformed("no process element in document".to_string()))?;
    debug!(
        process_id = process.id.as_str(),
        elements = process.elements().count(),
        flows = process.flows().count();
        "Imported process",
    );
    Ok(process)
}

/// Build the process shell from the `bpmn:process` attributes and discard
/// the default start event a fresh process carries.
fn process_from_attrs(start: &BytesStart) -> Result<Process, XmlError> {
    let mut process = match attr(start, "id")? {
        Some(id) => Process::with_id(id),
        None => Process::new(),
    };
    process.name = attr(start, "name")?.unwrap_or_else(|| "Imported Process".to_string());
    process.is_executable = attr(start, "isExecutable")?.as_deref() == Some("true");
    if let Some(version_tag) = attr(start, "camunda:versionTag")? {
        process.version_tag = version_tag;
    }
    if let Some(ttl) = attr(start, "camunda:historyTimeToLive")? {
        process.history_time_to_live = ttl;
    }

    let seeded: Vec<String> = process.elements().map(|e| e.id.clone()).collect();
    for id in seeded {
        process.remove_element(&id);
    }
    Ok(process)
}

fn read_process(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<Process, XmlError> {
    let mut process = process_from_attrs(start)?;

    // Flows are collected and added after all elements so the endpoint
    // incoming/outgoing lists get wired regardless of document order.
    let mut flows: Vec<ParsedFlow> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"sequenceFlow" {
                    flows.push(read_flow(reader, &e, false)?);
                } else if is_bpmn(&e) {
                    read_element(reader, &e, false, &mut process)?;
                } else {
                    reader.read_to_end(e.name())?;
                }
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"sequenceFlow" {
                    flows.push(read_flow(reader, &e, true)?);
                } else if is_bpmn(&e) {
                    read_element(reader, &e, true, &mut process)?;
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"process" => break,
            Event::Eof => {
                return Err(XmlError::Malformed(
                    "unexpected end of document inside process".to_string(),
                ));
            }
            _ => {}
        }
    }

    for parsed in flows {
        let overrides = FlowOverrides {
            id: parsed.id,
            condition_expression: parsed.condition,
            ..FlowOverrides::default()
        };
        process.add_sequence_flow(&parsed.source_ref, &parsed.target_ref, overrides);
    }
    Ok(process)
}

fn read_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    is_empty: bool,
    process: &mut Process,
) -> Result<(), XmlError> {
    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let kind = ElementKind::from_interchange_name(&local);

    let mut overrides = ElementOverrides {
        id: attr(start, "id")?,
        name: attr(start, "name")?,
        ..ElementOverrides::default()
    };

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = attribute.key;
        let Some(prefix) = key.prefix() else { continue };
        if prefix.as_ref() != b"camunda" {
            continue;
        }
        let value = attribute.unescape_value()?.into_owned();
        let properties = &mut overrides.properties;
        match key.local_name().as_ref() {
            b"assignee" => properties.assignee = Some(value),
            b"candidateUsers" => properties.candidate_users = Some(value),
            b"candidateGroups" => properties.candidate_groups = Some(value),
            b"dueDate" => properties.due_date = Some(value),
            b"followUpDate" => properties.follow_up_date = Some(value),
            b"priority" => properties.priority = Some(value),
            b"formKey" => properties.form_key = Some(value),
            b"taskPriority" => properties.task_priority = Some(value),
            b"class" => properties.java_class = Some(value),
            b"topic" => properties.topic = Some(value),
            b"type" => {
                if value == "external" {
                    properties.implementation = Some("external".to_string());
                }
            }
            other => {
                let name = String::from_utf8_lossy(other).into_owned();
                properties.extra.insert(name, Value::String(value));
            }
        }
    }

    let element_id = process.add_element(kind, overrides).id.clone();

    if is_empty {
        return Ok(());
    }
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"documentation" {
                    let text = read_text(reader, b"documentation")?;
                    if let Some(element) = process.element_mut(&element_id) {
                        element.documentation = Some(text);
                    }
                } else {
                    reader.read_to_end(e.name())?;
                }
            }
            Event::End(e) if e.local_name().as_ref() == start.local_name().as_ref() => break,
            Event::Eof => {
                return Err(XmlError::Malformed(format!(
                    "unexpected end of document inside element {element_id}"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

struct ParsedFlow {
    id: Option<String>,
    source_ref: String,
    target_ref: String,
    condition: Option<String>,
}

fn read_flow(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    is_empty: bool,
) -> Result<ParsedFlow, XmlError> {
    let mut parsed = ParsedFlow {
        id: attr(start, "id")?,
        source_ref: attr(start, "sourceRef")?.unwrap_or_default(),
        target_ref: attr(start, "targetRef")?.unwrap_or_default(),
        condition: None,
    };
    if is_empty {
        return Ok(parsed);
    }
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if e.local_name().as_ref() == b"conditionExpression" {
                    parsed.condition = Some(read_text(reader, b"conditionExpression")?);
                } else {
                    reader.read_to_end(e.name())?;
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"sequenceFlow" => break,
            Event::Eof => {
                return Err(XmlError::Malformed(
                    "unexpected end of document inside sequence flow".to_string(),
                ));
            }
            _ => {}
        }
    }
    Ok(parsed)
}

/// Restore element geometry from a `BPMNShape` and its `dc:Bounds`.
fn read_shape(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    process: &mut Process,
) -> Result<(), XmlError> {
    let target = attr(start, "bpmnElement")?;
    loop {
        match reader.read_event()? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Bounds" => {
                let x = attr_f64(&e, "x")?;
                let y = attr_f64(&e, "y")?;
                let width = attr_f64(&e, "width")?;
                let height = attr_f64(&e, "height")?;
                if let Some(element) = target
                    .as_deref()
                    .and_then(|id| process.element_mut(id))
                {
                    if let (Some(x), Some(y)) = (x, y) {
                        element.position = Some(Point::new(x, y));
                    }
                    if let (Some(width), Some(height)) = (width, height) {
                        element.size = Some(Size::new(width, height));
                    }
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"BPMNShape" => break,
            Event::Eof => {
                return Err(XmlError::Malformed(
                    "unexpected end of document inside diagram shape".to_string(),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Collect text content until the named closing tag.
fn read_text(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(cdata) => {
                text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
            }
            Event::End(e) if e.local_name().as_ref() == end => break,
            Event::Eof => {
                return Err(XmlError::Malformed(
                    "unexpected end of document inside text node".to_string(),
                ));
            }
            _ => {}
        }
    }
    Ok(text)
}

fn is_bpmn(start: &BytesStart) -> bool {
    start
        .name()
        .prefix()
        .is_some_and(|prefix| prefix.as_ref() == b"bpmn")
}

/// Fetch an attribute by its full qualified name.
fn attr(start: &BytesStart, name: &str) -> Result<Option<String>, XmlError> {
    for attribute in start.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == name.as_bytes() {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn attr_f64(start: &BytesStart, name: &str) -> Result<Option<f64>, XmlError> {
    Ok(attr(start, name)?.and_then(|value| value.parse().ok()))
}
