//! Process element model.
//!
//! An [`Element`] is a typed node in the process graph: an event, a task, a
//! gateway, or any forward-compatible kind the graph does not know about.
//! Vendor-specific configuration is split between a strongly typed
//! [`Properties`] core and a residual open map, so known attributes stay
//! type-checked while unknown ones survive a round trip untouched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::{Point, Size};

/// The kind of a process element.
///
/// The set is open: kinds this crate does not know about are carried
/// through [`ElementKind::Other`] and accepted permissively by the template
/// registry, the validator, and the codec.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    StartEvent,
    EndEvent,
    IntermediateCatchEvent,
    IntermediateThrowEvent,
    BoundaryEvent,
    Task,
    UserTask,
    ServiceTask,
    ScriptTask,
    BusinessRuleTask,
    SendTask,
    ReceiveTask,
    ManualTask,
    ExclusiveGateway,
    ParallelGateway,
    InclusiveGateway,
    EventBasedGateway,
    SubProcess,
    CallActivity,
    /// An element kind outside the known palette, stored by its local name.
    Other(String),
}

impl ElementKind {
    /// PascalCase local name, used as the prefix of generated IDs
    /// (`UserTask_a1b2c3d4`).
    pub fn local_name(&self) -> &str {
        match self {
            ElementKind::StartEvent => "StartEvent",
            ElementKind::EndEvent => "EndEvent",
            ElementKind::IntermediateCatchEvent => "IntermediateCatchEvent",
            ElementKind::IntermediateThrowEvent => "IntermediateThrowEvent",
            ElementKind::BoundaryEvent => "BoundaryEvent",
            ElementKind::Task => "Task",
            ElementKind::UserTask => "UserTask",
            ElementKind::ServiceTask => "ServiceTask",
            ElementKind::ScriptTask => "ScriptTask",
            ElementKind::BusinessRuleTask => "BusinessRuleTask",
            ElementKind::SendTask => "SendTask",
            ElementKind::ReceiveTask => "ReceiveTask",
            ElementKind::ManualTask => "ManualTask",
            ElementKind::ExclusiveGateway => "ExclusiveGateway",
            ElementKind::ParallelGateway => "ParallelGateway",
            ElementKind::InclusiveGateway => "InclusiveGateway",
            ElementKind::EventBasedGateway => "EventBasedGateway",
            ElementKind::SubProcess => "SubProcess",
            ElementKind::CallActivity => "CallActivity",
            ElementKind::Other(name) => name,
        }
    }

    /// BPMN 2.0 interchange local name (the camelCase tag form expected by
    /// downstream process engines).
    pub fn interchange_name(&self) -> &str {
        match self {
            ElementKind::StartEvent => "startEvent",
            ElementKind::EndEvent => "endEvent",
            ElementKind::IntermediateCatchEvent => "intermediateCatchEvent",
            ElementKind::IntermediateThrowEvent => "intermediateThrowEvent",
            ElementKind::BoundaryEvent => "boundaryEvent",
            ElementKind::Task => "task",
            ElementKind::UserTask => "userTask",
            ElementKind::ServiceTask => "serviceTask",
            ElementKind::ScriptTask => "scriptTask",
            ElementKind::BusinessRuleTask => "businessRuleTask",
            ElementKind::SendTask => "sendTask",
            ElementKind::ReceiveTask => "receiveTask",
            ElementKind::ManualTask => "manualTask",
            ElementKind::ExclusiveGateway => "exclusiveGateway",
            ElementKind::ParallelGateway => "parallelGateway",
            ElementKind::InclusiveGateway => "inclusiveGateway",
            ElementKind::EventBasedGateway => "eventBasedGateway",
            ElementKind::SubProcess => "subProcess",
            ElementKind::CallActivity => "callActivity",
            ElementKind::Other(name) => name,
        }
    }

    /// Resolve an interchange local name back to a kind.
    ///
    /// Both the standard camelCase form and the PascalCase local name are
    /// accepted; anything else becomes [`ElementKind::Other`] with the raw
    /// name preserved.
    pub fn from_interchange_name(name: &str) -> Self {
        match name {
            "startEvent" | "StartEvent" => ElementKind::StartEvent,
            "endEvent" | "EndEvent" => ElementKind::EndEvent,
            "intermediateCatchEvent" | "IntermediateCatchEvent" => {
                ElementKind::IntermediateCatchEvent
            }
            "intermediateThrowEvent" | "IntermediateThrowEvent" => {
                ElementKind::IntermediateThrowEvent
            }
            "boundaryEvent" | "BoundaryEvent" => ElementKind::BoundaryEvent,
            "task" | "Task" => ElementKind::Task,
            "userTask" | "UserTask" => ElementKind::UserTask,
            "serviceTask" | "ServiceTask" => ElementKind::ServiceTask,
            "scriptTask" | "ScriptTask" => ElementKind::ScriptTask,
            "businessRuleTask" | "BusinessRuleTask" => ElementKind::BusinessRuleTask,
            "sendTask" | "SendTask" => ElementKind::SendTask,
            "receiveTask" | "ReceiveTask" => ElementKind::ReceiveTask,
            "manualTask" | "ManualTask" => ElementKind::ManualTask,
            "exclusiveGateway" | "ExclusiveGateway" => ElementKind::ExclusiveGateway,
            "parallelGateway" | "ParallelGateway" => ElementKind::ParallelGateway,
            "inclusiveGateway" | "InclusiveGateway" => ElementKind::InclusiveGateway,
            "eventBasedGateway" | "EventBasedGateway" => ElementKind::EventBasedGateway,
            "subProcess" | "SubProcess" => ElementKind::SubProcess,
            "callActivity" | "CallActivity" => ElementKind::CallActivity,
            other => ElementKind::Other(other.to_string()),
        }
    }

    /// Whether this kind is an event. Events get the small 36x36 default
    /// bounding box in the diagram interchange section.
    pub fn is_event(&self) -> bool {
        match self {
            ElementKind::StartEvent
            | ElementKind::EndEvent
            | ElementKind::IntermediateCatchEvent
            | ElementKind::IntermediateThrowEvent
            | ElementKind::BoundaryEvent => true,
            ElementKind::Other(name) => name.contains("Event") || name.contains("event"),
            _ => false,
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.local_name())
    }
}

/// Vendor-specific element configuration.
///
/// Known attributes get typed fields; everything else lands in the open
/// `extra` map so unrecognized vendor attributes are never dropped. Merge
/// semantics across the board are last-write-wins per key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub assignee: Option<String>,
    pub candidate_users: Option<String>,
    pub candidate_groups: Option<String>,
    pub due_date: Option<String>,
    pub follow_up_date: Option<String>,
    pub priority: Option<String>,
    pub form_key: Option<String>,
    /// Service task implementation kind; `"external"` switches the
    /// interchange representation to an external-task topic.
    pub implementation: Option<String>,
    pub java_class: Option<String>,
    pub topic: Option<String>,
    pub task_priority: Option<String>,
    /// Residual open map for attributes without a typed field.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

impl Properties {
    /// Merge `other` onto `self`; fields set in `other` win, key by key.
    pub fn merge(&mut self, other: Properties) {
        macro_rules! take_if_set {
            ($dst:ident, $src:ident, $($field:ident),* $(,)?) => {$(
                if $src.$field.is_some() {
                    $dst.$field = $src.$field;
                }
            )*};
        }
        take_if_set!(
            self,
            other,
            assignee,
            candidate_users,
            candidate_groups,
            due_date,
            follow_up_date,
            priority,
            form_key,
            implementation,
            java_class,
            topic,
            task_priority,
        );
        self.extra.extend(other.extra);
    }
}

/// A listener invoked by the process engine on an element lifecycle event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionListener {
    /// Lifecycle event name, e.g. `start` or `end`.
    pub event: String,
    pub payload: ListenerPayload,
}

/// How an execution listener is implemented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ListenerPayload {
    /// Fully qualified delegate class name.
    Class(String),
    /// An expression evaluated against the execution.
    Expression(String),
    /// An expression resolving to a delegate bean.
    DelegateExpression(String),
    /// An inline script.
    Script {
        script: String,
        format: Option<String>,
    },
}

impl ListenerPayload {
    /// The vendor attribute name carrying this payload in interchange XML.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            ListenerPayload::Class(_) => "class",
            ListenerPayload::Expression(_) => "expression",
            ListenerPayload::DelegateExpression(_) => "delegateExpression",
            ListenerPayload::Script { .. } => "script",
        }
    }

    /// The payload value itself.
    pub fn value(&self) -> &str {
        match self {
            ListenerPayload::Class(value)
            | ListenerPayload::Expression(value)
            | ListenerPayload::DelegateExpression(value)
            | ListenerPayload::Script { script: value, .. } => value,
        }
    }
}

/// A named input or output parameter on an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub value: String,
    /// Optional parameter type hint.
    pub kind: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: None,
        }
    }
}

/// A typed node in the process graph.
///
/// `incoming` and `outgoing` hold the IDs of sequence flows targeting and
/// leaving this element; the owning [`Process`](crate::Process) keeps them
/// in sync with the flow collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    pub name: Option<String>,
    pub documentation: Option<String>,
    pub properties: Properties,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub execution_listeners: Vec<ExecutionListener>,
    pub input_parameters: Vec<Parameter>,
    pub output_parameters: Vec<Parameter>,
    pub incoming: Vec<String>,
    pub outgoing: Vec<String>,
}

/// Optional fields supplied when adding an element to the graph.
///
/// Anything left unset falls back to the kind's template defaults. Builder
/// methods cover the common fields:
///
/// ```
/// use baton_core::ElementOverrides;
///
/// let overrides = ElementOverrides::named("Review Document")
///     .with_assignee("${initiator}")
///     .with_position(300.0, 200.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementOverrides {
    pub id: Option<String>,
    pub name: Option<String>,
    pub documentation: Option<String>,
    pub properties: Properties,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub execution_listeners: Vec<ExecutionListener>,
    pub input_parameters: Vec<Parameter>,
    pub output_parameters: Vec<Parameter>,
}

impl ElementOverrides {
    /// Overrides carrying only a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.properties.assignee = Some(assignee.into());
        self
    }

    pub fn with_candidate_users(mut self, users: impl Into<String>) -> Self {
        self.properties.candidate_users = Some(users.into());
        self
    }

    pub fn with_candidate_groups(mut self, groups: impl Into<String>) -> Self {
        self.properties.candidate_groups = Some(groups.into());
        self
    }

    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.properties.due_date = Some(due_date.into());
        self
    }

    pub fn with_follow_up_date(mut self, follow_up_date: impl Into<String>) -> Self {
        self.properties.follow_up_date = Some(follow_up_date.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.properties.priority = Some(priority.into());
        self
    }

    pub fn with_form_key(mut self, form_key: impl Into<String>) -> Self {
        self.properties.form_key = Some(form_key.into());
        self
    }

    pub fn with_implementation(mut self, implementation: impl Into<String>) -> Self {
        self.properties.implementation = Some(implementation.into());
        self
    }

    pub fn with_java_class(mut self, java_class: impl Into<String>) -> Self {
        self.properties.java_class = Some(java_class.into());
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.properties.topic = Some(topic.into());
        self
    }

    pub fn with_task_priority(mut self, task_priority: impl Into<String>) -> Self {
        self.properties.task_priority = Some(task_priority.into());
        self
    }

    /// Set a residual property by name.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.extra.insert(name.into(), value.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }
}

/// A partial update applied to an existing element.
///
/// `name` is applied directly when present; `properties` are merged onto
/// the element's properties, last write wins per key.
#[derive(Debug, Clone, Default)]
pub struct ElementPatch {
    pub name: Option<String>,
    pub properties: Properties,
}

impl ElementPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.properties.assignee = Some(assignee.into());
        self
    }

    pub fn with_candidate_groups(mut self, groups: impl Into<String>) -> Self {
        self.properties.candidate_groups = Some(groups.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.extra.insert(name.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name_round_trip() {
        for kind in [
            ElementKind::StartEvent,
            ElementKind::UserTask,
            ElementKind::ExclusiveGateway,
            ElementKind::CallActivity,
        ] {
            let resolved = ElementKind::from_interchange_name(kind.interchange_name());
            assert_eq!(resolved, kind);
        }
    }

    #[test]
    fn test_pascal_case_also_resolves() {
        assert_eq!(
            ElementKind::from_interchange_name("UserTask"),
            ElementKind::UserTask
        );
        assert_eq!(
            ElementKind::from_interchange_name("StartEvent"),
            ElementKind::StartEvent
        );
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let kind = ElementKind::from_interchange_name("adHocSubProcess");
        assert_eq!(kind, ElementKind::Other("adHocSubProcess".to_string()));
        assert_eq!(kind.local_name(), "adHocSubProcess");
        assert_eq!(kind.interchange_name(), "adHocSubProcess");
    }

    #[test]
    fn test_is_event() {
        assert!(ElementKind::StartEvent.is_event());
        assert!(ElementKind::BoundaryEvent.is_event());
        assert!(!ElementKind::UserTask.is_event());
        assert!(ElementKind::Other("weirdEvent".to_string()).is_event());
        assert!(!ElementKind::Other("weirdTask".to_string()).is_event());
    }

    #[test]
    fn test_properties_merge_last_write_wins() {
        let mut base = Properties {
            assignee: Some("alice".to_string()),
            topic: Some("billing".to_string()),
            ..Properties::default()
        };
        base.extra
            .insert("exclusive".to_string(), Value::Bool(true));

        let mut update = Properties {
            assignee: Some("bob".to_string()),
            ..Properties::default()
        };
        update
            .extra
            .insert("exclusive".to_string(), Value::Bool(false));
        update
            .extra
            .insert("jobPriority".to_string(), Value::from("10"));

        base.merge(update);
        assert_eq!(base.assignee.as_deref(), Some("bob"));
        assert_eq!(base.topic.as_deref(), Some("billing"));
        assert_eq!(base.extra["exclusive"], Value::Bool(false));
        assert_eq!(base.extra["jobPriority"], Value::from("10"));
    }

    #[test]
    fn test_listener_payload_attribute_names() {
        let class = ListenerPayload::Class("com.example.Listener".to_string());
        assert_eq!(class.attribute_name(), "class");
        assert_eq!(class.value(), "com.example.Listener");

        let script = ListenerPayload::Script {
            script: "println('hi')".to_string(),
            format: Some("groovy".to_string()),
        };
        assert_eq!(script.attribute_name(), "script");
        assert_eq!(script.value(), "println('hi')");
    }
}
