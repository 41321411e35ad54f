//! Process graph to interchange XML.
//!
//! Output shape, in document order: the `bpmn:definitions` root with its
//! fixed namespace declarations and exporter metadata, one `bpmn:process`
//! carrying elements (one tag per element, named by its kind) followed by
//! sequence flows, then the diagram interchange section with one shape per
//! element. Flow edges are not emitted in the diagram section; waypoint
//! geometry is layout work and lives outside this crate.

use log::debug;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use baton_core::{Element, ListenerPayload, Parameter, Process, SequenceFlow};

use crate::XmlError;

pub(crate) fn serialize(process: &Process) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut definitions = BytesStart::new("bpmn:definitions");
    definitions.push_attribute(("xmlns:bpmn", crate::NS_BPMN));
    definitions.push_attribute(("xmlns:bpmndi", crate::NS_BPMNDI));
    definitions.push_attribute(("xmlns:dc", crate::NS_DC));
    definitions.push_attribute(("xmlns:di", crate::NS_DI));
    definitions.push_attribute(("xmlns:camunda", crate::NS_CAMUNDA));
    definitions.push_attribute(("xmlns:xsi", crate::NS_XSI));
    definitions.push_attribute(("xmlns:modeler", crate::NS_MODELER));
    definitions.push_attribute(("id", format!("Definitions_{}", process.id).as_str()));
    definitions.push_attribute(("targetNamespace", crate::TARGET_NAMESPACE));
    definitions.push_attribute(("exporter", crate::EXPORTER));
    definitions.push_attribute(("exporterVersion", crate::EXPORTER_VERSION));
    definitions.push_attribute(("modeler:executionPlatform", crate::EXECUTION_PLATFORM));
    definitions.push_attribute((
        "modeler:executionPlatformVersion",
        crate::EXECUTION_PLATFORM_VERSION,
    ));
    writer.write_event(Event::Start(definitions))?;

    write_process(&mut writer, process)?;
    write_diagram(&mut writer, process)?;

    writer.write_event(Event::End(BytesEnd::new("bpmn:definitions")))?;

    debug!(
        process_id = process.id.as_str(),
        elements = process.elements().count(),
        flows = process.flows().count();
        "Serialized process",
    );
    String::from_utf8(writer.into_inner())
        .map_err(|_| XmlError::Malformed("serializer produced non-UTF-8 output".to_string()))
}

fn write_process(writer: &mut Writer<Vec<u8>>, process: &Process) -> Result<(), XmlError> {
    let mut start = BytesStart::new("bpmn:process");
    start.push_attribute(("id", process.id.as_str()));
    start.push_attribute(("name", process.name.as_str()));
    start.push_attribute(("isExecutable", if process.is_executable { "true" } else { "false" }));
    start.push_attribute(("camunda:versionTag", process.version_tag.as_str()));
    start.push_attribute((
        "camunda:historyTimeToLive",
        process.history_time_to_live.as_str(),
    ));
    writer.write_event(Event::Start(start))?;

    for element in process.elements() {
        write_element(writer, element)?;
    }
    for flow in process.flows() {
        write_flow(writer, flow)?;
    }

    writer.write_event(Event::End(BytesEnd::new("bpmn:process")))?;
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let tag = format!("bpmn:{}", element.kind.interchange_name());
    let mut start = BytesStart::new(tag.as_str());
    start.push_attribute(("id", element.id.as_str()));
    if let Some(name) = &element.name {
        start.push_attribute(("name", name.as_str()));
    }

    let properties = &element.properties;
    if let Some(assignee) = &properties.assignee {
        start.push_attribute(("camunda:assignee", assignee.as_str()));
    }
    if let Some(users) = &properties.candidate_users {
        start.push_attribute(("camunda:candidateUsers", users.as_str()));
    }
    if let Some(groups) = &properties.candidate_groups {
        start.push_attribute(("camunda:candidateGroups", groups.as_str()));
    }
    if let Some(due_date) = &properties.due_date {
        start.push_attribute(("camunda:dueDate", due_date.as_str()));
    }
    if let Some(form_key) = &properties.form_key {
        start.push_attribute(("camunda:formKey", form_key.as_str()));
    }
    if let Some(java_class) = &properties.java_class {
        start.push_attribute(("camunda:class", java_class.as_str()));
    }
    if properties.implementation.as_deref() == Some("external") {
        start.push_attribute(("camunda:type", "external"));
        if let Some(topic) = &properties.topic {
            start.push_attribute(("camunda:topic", topic.as_str()));
        }
    }

    let has_extensions = !element.execution_listeners.is_empty()
        || !element.input_parameters.is_empty()
        || !element.output_parameters.is_empty();
    if element.documentation.is_none() && !has_extensions {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if let Some(documentation) = &element.documentation {
        writer.write_event(Event::Start(BytesStart::new("bpmn:documentation")))?;
        writer.write_event(Event::Text(BytesText::new(documentation)))?;
        writer.write_event(Event::End(BytesEnd::new("bpmn:documentation")))?;
    }

    if has_extensions {
        writer.write_event(Event::Start(BytesStart::new("bpmn:extensionElements")))?;
        for listener in &element.execution_listeners {
            let mut tag = BytesStart::new("camunda:executionListener");
            tag.push_attribute(("event", listener.event.as_str()));
            tag.push_attribute((listener.payload.attribute_name(), listener.payload.value()));
            if let ListenerPayload::Script {
                format: Some(format),
                ..
            } = &listener.payload
            {
                tag.push_attribute(("scriptFormat", format.as_str()));
            }
            writer.write_event(Event::Empty(tag))?;
        }
        if !element.input_parameters.is_empty() || !element.output_parameters.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("camunda:inputOutput")))?;
            for parameter in &element.input_parameters {
                write_parameter(writer, "camunda:inputParameter", parameter)?;
            }
            for parameter in &element.output_parameters {
                write_parameter(writer, "camunda:outputParameter", parameter)?;
            }
            writer.write_event(Event::End(BytesEnd::new("camunda:inputOutput")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("bpmn:extensionElements")))?;
    }

    writer.write_event(Event::End(BytesEnd::new(tag.as_str())))?;
    Ok(())
}

fn write_parameter(
    writer: &mut Writer<Vec<u8>>,
    tag: &str,
    parameter: &Parameter,
) -> Result<(), XmlError> {
    let mut start = BytesStart::new(tag);
    start.push_attribute(("name", parameter.name.as_str()));
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(&parameter.value)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_flow(writer: &mut Writer<Vec<u8>>, flow: &SequenceFlow) -> Result<(), XmlError> {
    let mut start = BytesStart::new("bpmn:sequenceFlow");
    start.push_attribute(("id", flow.id.as_str()));
    start.push_attribute(("sourceRef", flow.source_ref.as_str()));
    start.push_attribute(("targetRef", flow.target_ref.as_str()));

    match &flow.condition_expression {
        Some(expression) => {
            writer.write_event(Event::Start(start))?;
            let mut condition = BytesStart::new("bpmn:conditionExpression");
            condition.push_attribute(("xsi:type", "bpmn:tFormalExpression"));
            writer.write_event(Event::Start(condition))?;
            writer.write_event(Event::Text(BytesText::new(expression)))?;
            writer.write_event(Event::End(BytesEnd::new("bpmn:conditionExpression")))?;
            writer.write_event(Event::End(BytesEnd::new("bpmn:sequenceFlow")))?;
        }
        None => writer.write_event(Event::Empty(start))?,
    }
    Ok(())
}

fn write_diagram(writer: &mut Writer<Vec<u8>>, process: &Process) -> Result<(), XmlError> {
    let mut diagram = BytesStart::new("bpmndi:BPMNDiagram");
    diagram.push_attribute(("id", "BPMNDiagram_1"));
    writer.write_event(Event::Start(diagram))?;

    let mut plane = BytesStart::new("bpmndi:BPMNPlane");
    plane.push_attribute(("id", "BPMNPlane_1"));
    plane.push_attribute(("bpmnElement", process.id.as_str()));
    writer.write_event(Event::Start(plane))?;

    for element in process.elements() {
        let mut shape = BytesStart::new("bpmndi:BPMNShape");
        shape.push_attribute(("id", format!("{}_di", element.id).as_str()));
        shape.push_attribute(("bpmnElement", element.id.as_str()));
        writer.write_event(Event::Start(shape))?;

        let (x, y) = element
            .position
            .map(|position| (position.x(), position.y()))
            .unwrap_or((100.0, 100.0));
        let (width, height) = element
            .size
            .map(|size| (size.width(), size.height()))
            .unwrap_or_else(|| {
                if element.kind.is_event() {
                    (36.0, 36.0)
                } else {
                    (100.0, 80.0)
                }
            });

        let mut bounds = BytesStart::new("dc:Bounds");
        bounds.push_attribute(("x", fmt_coord(x).as_str()));
        bounds.push_attribute(("y", fmt_coord(y).as_str()));
        bounds.push_attribute(("width", fmt_coord(width).as_str()));
        bounds.push_attribute(("height", fmt_coord(height).as_str()));
        writer.write_event(Event::Empty(bounds))?;

        writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNShape")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNPlane")))?;
    writer.write_event(Event::End(BytesEnd::new("bpmndi:BPMNDiagram")))?;
    Ok(())
}

/// Format a coordinate the way diagram tooling expects: integral values
/// without a decimal point.
fn fmt_coord(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use baton_core::{
        ElementKind, ElementOverrides, ExecutionListener, FlowOverrides, ListenerPayload, Process,
    };

    use super::*;

    #[test]
    fn test_fmt_coord_trims_integral_values() {
        assert_eq!(fmt_coord(100.0), "100");
        assert_eq!(fmt_coord(36.0), "36");
        assert_eq!(fmt_coord(12.5), "12.5");
    }

    #[test]
    fn test_definitions_root_carries_namespaces() {
        let xml = serialize(&Process::with_id("Process_1")).expect("serialize");
        assert!(xml.contains("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("xmlns:bpmn=\"http://www.omg.org/spec/BPMN/20100524/MODEL\""));
        assert!(xml.contains("xmlns:camunda=\"http://camunda.org/schema/1.0/bpmn\""));
        assert!(xml.contains("xmlns:modeler=\"http://camunda.org/schema/modeler/1.0\""));
        assert!(xml.contains("id=\"Definitions_Process_1\""));
        assert!(xml.contains("targetNamespace=\"http://bpmn.io/schema/bpmn\""));
        assert!(xml.contains("modeler:executionPlatform=\"Camunda Platform\""));
    }

    #[test]
    fn test_process_attributes() {
        let xml = serialize(&Process::with_id("Process_1")).expect("serialize");
        assert!(xml.contains("<bpmn:process id=\"Process_1\" name=\"New Process\""));
        assert!(xml.contains("isExecutable=\"true\""));
        assert!(xml.contains("camunda:versionTag=\"1.0.0\""));
        assert!(xml.contains("camunda:historyTimeToLive=\"P30D\""));
    }

    #[test]
    fn test_elements_use_interchange_tags() {
        let mut process = Process::with_id("Process_1");
        process.add_element(ElementKind::UserTask, ElementOverrides::named("Review"));

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains("<bpmn:startEvent"));
        assert!(xml.contains("<bpmn:userTask"));
        assert!(xml.contains("name=\"Review\""));
    }

    #[test]
    fn test_user_task_vendor_attributes() {
        let mut process = Process::with_id("Process_1");
        process.add_element(
            ElementKind::UserTask,
            ElementOverrides::default()
                .with_assignee("${initiator}")
                .with_candidate_users("john,jane")
                .with_candidate_groups("managers")
                .with_due_date("PT48H"),
        );

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains("camunda:assignee=\"${initiator}\""));
        assert!(xml.contains("camunda:candidateUsers=\"john,jane\""));
        assert!(xml.contains("camunda:candidateGroups=\"managers\""));
        assert!(xml.contains("camunda:dueDate=\"PT48H\""));
    }

    #[test]
    fn test_service_task_implementations() {
        let mut process = Process::with_id("Process_1");
        process.add_element(
            ElementKind::ServiceTask,
            ElementOverrides::default()
                .with_implementation("class")
                .with_java_class("com.example.MyDelegate"),
        );
        process.add_element(
            ElementKind::ServiceTask,
            ElementOverrides::default()
                .with_implementation("external")
                .with_topic("payment-processing"),
        );

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains("camunda:class=\"com.example.MyDelegate\""));
        assert!(xml.contains("camunda:type=\"external\""));
        assert!(xml.contains("camunda:topic=\"payment-processing\""));
    }

    #[test]
    fn test_non_external_implementation_has_no_type_attribute() {
        let mut process = Process::with_id("Process_1");
        process.add_element(
            ElementKind::ServiceTask,
            ElementOverrides::default()
                .with_implementation("class")
                .with_topic("ignored"),
        );

        let xml = serialize(&process).expect("serialize");
        assert!(!xml.contains("camunda:type="));
        assert!(!xml.contains("camunda:topic="));
    }

    #[test]
    fn test_documentation_is_a_nested_text_node() {
        let mut process = Process::with_id("Process_1");
        process.add_element(
            ElementKind::UserTask,
            ElementOverrides::default().with_documentation("Check & archive the order"),
        );

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains("<bpmn:documentation>Check &amp; archive the order</bpmn:documentation>"));
    }

    #[test]
    fn test_execution_listeners_and_parameters() {
        let mut process = Process::with_id("Process_1");
        let task_id = process
            .add_element(ElementKind::ServiceTask, ElementOverrides::default())
            .id
            .clone();
        process.add_execution_listener(
            &task_id,
            ExecutionListener {
                event: "start".to_string(),
                payload: ListenerPayload::Class("com.example.TaskStartListener".to_string()),
            },
        );
        process.add_execution_listener(
            &task_id,
            ExecutionListener {
                event: "end".to_string(),
                payload: ListenerPayload::Expression("${bean.done(execution)}".to_string()),
            },
        );
        process.add_input_parameter(&task_id, "orderId", "${order.id}");
        process.add_output_parameter(&task_id, "result", "${executionResult}");

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains(
            "<camunda:executionListener event=\"start\" class=\"com.example.TaskStartListener\"/>"
        ));
        assert!(xml.contains(
            "<camunda:executionListener event=\"end\" expression=\"${bean.done(execution)}\"/>"
        ));
        assert!(xml.contains("<camunda:inputOutput>"));
        assert!(xml.contains("<camunda:inputParameter name=\"orderId\">${order.id}</camunda:inputParameter>"));
        assert!(xml.contains(
            "<camunda:outputParameter name=\"result\">${executionResult}</camunda:outputParameter>"
        ));
    }

    #[test]
    fn test_sequence_flows_carry_refs_and_conditions() {
        let mut process = Process::with_id("Process_1");
        let start_id = process.elements().next().expect("start").id.clone();
        let task_id = process
            .add_element(ElementKind::UserTask, ElementOverrides::default())
            .id
            .clone();
        process.add_sequence_flow(
            &start_id,
            &task_id,
            FlowOverrides::default()
                .with_id("Flow_1")
                .with_condition("${amount > 100}"),
        );

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains(&format!(
            "<bpmn:sequenceFlow id=\"Flow_1\" sourceRef=\"{start_id}\" targetRef=\"{task_id}\""
        )));
        assert!(xml.contains("${amount &gt; 100}"));
    }

    #[test]
    fn test_diagram_shape_defaults() {
        let mut process = Process::with_id("Process_1");
        let task_id = process
            .add_element(ElementKind::UserTask, ElementOverrides::default())
            .id
            .clone();

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains("<bpmndi:BPMNDiagram id=\"BPMNDiagram_1\">"));
        assert!(xml.contains("<bpmndi:BPMNPlane id=\"BPMNPlane_1\" bpmnElement=\"Process_1\">"));
        assert!(xml.contains(&format!("bpmnElement=\"{task_id}\"")));
        // Start event gets the small default box, the task its template size.
        assert!(xml.contains("<dc:Bounds x=\"100\" y=\"100\" width=\"36\" height=\"36\"/>"));
        assert!(xml.contains("<dc:Bounds x=\"100\" y=\"100\" width=\"100\" height=\"80\"/>"));
    }

    #[test]
    fn test_diagram_shape_uses_element_geometry() {
        let mut process = Process::with_id("Process_1");
        process.add_element(
            ElementKind::UserTask,
            ElementOverrides::default()
                .with_position(300.0, 200.0)
                .with_size(100.0, 80.0),
        );

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains("x=\"300\" y=\"200\" width=\"100\" height=\"80\""));
    }

    #[test]
    fn test_unknown_kind_round_trips_its_tag() {
        let mut process = Process::with_id("Process_1");
        process.add_element(
            ElementKind::Other("adHocSubProcess".to_string()),
            ElementOverrides::default().with_id("AdHoc_1"),
        );

        let xml = serialize(&process).expect("serialize");
        assert!(xml.contains("<bpmn:adHocSubProcess id=\"AdHoc_1\""));
    }
}
