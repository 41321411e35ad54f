//! The process graph - the aggregate root of the document model.
//!
//! A [`Process`] exclusively owns its elements and sequence flows, keyed by
//! ID in insertion order. All mutation goes through the operations here;
//! external collaborators (canvas, properties panel, deployment) hold the
//! process by value and call in.
//!
//! IDs share one namespace across elements and flows. Generated IDs use the
//! `{LocalName}_{8 alphanumeric}` convention and are regenerated on
//! collision until unique.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::diagnostic::Diagnostic;
use crate::element::{
    Element, ElementKind, ElementOverrides, ElementPatch, ExecutionListener, Parameter,
};
use crate::flow::{FlowOverrides, SequenceFlow};
use crate::id::{IdSource, RandomIds};
use crate::template;
use crate::validate;

/// A node looked up by ID: either an element or a sequence flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraphNode<'a> {
    Element(&'a Element),
    Flow(&'a SequenceFlow),
}

impl GraphNode<'_> {
    /// The node's ID, regardless of which collection it lives in.
    pub fn id(&self) -> &str {
        match self {
            GraphNode::Element(element) => &element.id,
            GraphNode::Flow(flow) => &flow.id,
        }
    }
}

/// A single business process: metadata plus the element/flow graph.
///
/// A fresh process carries one start event and no flows. The process is
/// single-owner and fully synchronous; concurrent mutation of one instance
/// is ruled out by `&mut self` receivers.
#[derive(Debug)]
pub struct Process {
    pub id: String,
    pub name: String,
    pub is_executable: bool,
    pub version_tag: String,
    /// History retention as an ISO-8601 duration string, e.g. `P30D`.
    pub history_time_to_live: String,
    elements: IndexMap<String, Element>,
    flows: IndexMap<String, SequenceFlow>,
    ids: Box<dyn IdSource>,
}

impl Process {
    /// Create a process with a generated `Process_{8 alphanumeric}` ID.
    pub fn new() -> Self {
        Self::build(None, Box::new(RandomIds))
    }

    /// Create a process with an explicit ID.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self::build(Some(id.into()), Box::new(RandomIds))
    }

    /// Create a process with an injected ID suffix source.
    ///
    /// Tests use this to get deterministic IDs and to observe collision
    /// retry behavior.
    pub fn with_id_source(id: Option<String>, ids: Box<dyn IdSource>) -> Self {
        Self::build(id, ids)
    }

    fn build(id: Option<String>, mut ids: Box<dyn IdSource>) -> Self {
        let id = id.unwrap_or_else(|| format!("Process_{}", ids.next_suffix()));
        let mut process = Self {
            id,
            name: "New Process".to_string(),
            is_executable: true,
            version_tag: "1.0.0".to_string(),
            history_time_to_live: "P30D".to_string(),
            elements: IndexMap::new(),
            flows: IndexMap::new(),
            ids,
        };
        process.add_element(ElementKind::StartEvent, ElementOverrides::default());
        process
    }

    fn contains_id(&self, id: &str) -> bool {
        self.elements.contains_key(id) || self.flows.contains_key(id)
    }

    /// Generate a `{local}_{suffix}` ID not yet present in either
    /// collection, retrying the suffix source on collision.
    fn fresh_id(&mut self, local: &str) -> String {
        loop {
            let candidate = format!("{local}_{}", self.ids.next_suffix());
            if !self.contains_id(&candidate) {
                return candidate;
            }
            debug!(candidate = candidate.as_str(); "Generated ID collides, retrying");
        }
    }

    /// Add an element of the given kind.
    ///
    /// The kind's template supplies defaults; `overrides` win wherever both
    /// are set. Without an explicit `overrides.id` an ID is generated and
    /// regenerated until unique. Returns the stored element.
    pub fn add_element(&mut self, kind: ElementKind, overrides: ElementOverrides) -> &Element {
        let id = match overrides.id {
            Some(id) => id,
            None => self.fresh_id(kind.local_name()),
        };

        let tpl = template::template(&kind);
        let mut properties = tpl.properties;
        properties.merge(overrides.properties);

        let element = Element {
            id: id.clone(),
            kind,
            name: overrides.name,
            documentation: overrides.documentation,
            properties,
            position: overrides.position,
            size: overrides.size.or(tpl.size),
            execution_listeners: overrides.execution_listeners,
            input_parameters: overrides.input_parameters,
            output_parameters: overrides.output_parameters,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        };
        debug!(element_id = element.id.as_str(), kind = element.kind.local_name(); "Added element");
        self.elements.insert(id.clone(), element);
        self.elements.get(&id).expect("element was just inserted")
    }

    /// Remove an element and every flow incident to it.
    ///
    /// The removed flows' IDs are also pruned from the surviving endpoints'
    /// `incoming`/`outgoing` lists, so those lists always mirror the flow
    /// collection.
    pub fn remove_element(&mut self, id: &str) {
        self.elements.shift_remove(id);

        let incident: Vec<String> = self
            .flows
            .iter()
            .filter(|(_, flow)| flow.source_ref == id || flow.target_ref == id)
            .map(|(flow_id, _)| flow_id.clone())
            .collect();
        for flow_id in &incident {
            if let Some(flow) = self.flows.shift_remove(flow_id) {
                if let Some(source) = self.elements.get_mut(&flow.source_ref) {
                    source.outgoing.retain(|f| f != flow_id);
                }
                if let Some(target) = self.elements.get_mut(&flow.target_ref) {
                    target.incoming.retain(|f| f != flow_id);
                }
            }
        }
        debug!(element_id = id, flows_removed = incident.len(); "Removed element");
    }

    /// Apply a partial update to an element. No-op when the ID is unknown.
    pub fn update_element(&mut self, id: &str, patch: ElementPatch) {
        let Some(element) = self.elements.get_mut(id) else {
            return;
        };
        if let Some(name) = patch.name {
            element.name = Some(name);
        }
        element.properties.merge(patch.properties);
        debug!(element_id = id; "Updated element");
    }

    /// Look up a node by ID: elements first, then sequence flows.
    pub fn get(&self, id: &str) -> Option<GraphNode<'_>> {
        self.elements
            .get(id)
            .map(GraphNode::Element)
            .or_else(|| self.flows.get(id).map(GraphNode::Flow))
    }

    /// Look up an element by ID.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Mutable element lookup, for collaborators editing fields in place.
    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    /// Look up a sequence flow by ID.
    pub fn flow(&self, id: &str) -> Option<&SequenceFlow> {
        self.flows.get(id)
    }

    /// All elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// All sequence flows in insertion order.
    pub fn flows(&self) -> impl Iterator<Item = &SequenceFlow> {
        self.flows.values()
    }

    /// Connect two elements with a sequence flow.
    ///
    /// The flow is stored even when an endpoint does not exist; endpoint
    /// `incoming`/`outgoing` bookkeeping is only done for elements that are
    /// present. Returns the stored flow.
    pub fn add_sequence_flow(
        &mut self,
        source_id: &str,
        target_id: &str,
        overrides: FlowOverrides,
    ) -> &SequenceFlow {
        let id = match overrides.id {
            Some(id) => id,
            None => self.fresh_id("Flow"),
        };

        let flow = SequenceFlow {
            id: id.clone(),
            source_ref: source_id.to_string(),
            target_ref: target_id.to_string(),
            condition_expression: overrides.condition_expression,
            extra: overrides.extra,
        };

        if let Some(source) = self.elements.get_mut(source_id) {
            source.outgoing.push(id.clone());
        } else {
            warn!(flow_id = id.as_str(), source_ref = source_id; "Sequence flow source does not exist");
        }
        if let Some(target) = self.elements.get_mut(target_id) {
            target.incoming.push(id.clone());
        } else {
            warn!(flow_id = id.as_str(), target_ref = target_id; "Sequence flow target does not exist");
        }

        debug!(flow_id = id.as_str(), source_ref = source_id, target_ref = target_id; "Added sequence flow");
        self.flows.insert(id.clone(), flow);
        self.flows.get(&id).expect("flow was just inserted")
    }

    /// Append an execution listener to an element. No-op when the ID is
    /// unknown.
    pub fn add_execution_listener(&mut self, element_id: &str, listener: ExecutionListener) {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.execution_listeners.push(listener);
        }
    }

    /// Append an input parameter to an element. No-op when the ID is
    /// unknown.
    pub fn add_input_parameter(
        &mut self,
        element_id: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.input_parameters.push(Parameter::new(name, value));
        }
    }

    /// Append an output parameter to an element. No-op when the ID is
    /// unknown.
    pub fn add_output_parameter(
        &mut self,
        element_id: &str,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.output_parameters.push(Parameter::new(name, value));
        }
    }

    /// Validate the current snapshot. See [`crate::validate`].
    pub fn validate(&self) -> Vec<Diagnostic> {
        validate::validate(self)
    }

    /// Deep structural copy with freshly generated IDs.
    ///
    /// Every element and flow gets a new ID; flow references are rewritten
    /// through an old-to-new map and endpoint lists are rebuilt from the
    /// remapped flows. Nothing is shared with the source afterwards.
    pub fn duplicate(&self) -> Process {
        self.duplicate_with_ids(Box::new(RandomIds))
    }

    /// [`Process::duplicate`] with an injected ID suffix source.
    pub fn duplicate_with_ids(&self, ids: Box<dyn IdSource>) -> Process {
        let mut cloned = Process::with_id_source(None, ids);
        cloned.name = self.name.clone();
        cloned.is_executable = self.is_executable;
        cloned.version_tag = self.version_tag.clone();
        cloned.history_time_to_live = self.history_time_to_live.clone();

        // Drop the default start event; the source's elements replace it.
        cloned.elements.clear();

        let mut id_map: HashMap<String, String> = HashMap::new();
        for element in self.elements.values() {
            let new_id = cloned.fresh_id(element.kind.local_name());
            let mut copy = element.clone();
            copy.id = new_id.clone();
            copy.incoming.clear();
            copy.outgoing.clear();
            id_map.insert(element.id.clone(), new_id.clone());
            cloned.elements.insert(new_id, copy);
        }

        for flow in self.flows.values() {
            let new_id = cloned.fresh_id("Flow");
            let mut copy = flow.clone();
            copy.id = new_id.clone();
            copy.source_ref = id_map
                .get(&flow.source_ref)
                .cloned()
                .unwrap_or_else(|| flow.source_ref.clone());
            copy.target_ref = id_map
                .get(&flow.target_ref)
                .cloned()
                .unwrap_or_else(|| flow.target_ref.clone());
            if let Some(source) = cloned.elements.get_mut(&copy.source_ref) {
                source.outgoing.push(new_id.clone());
            }
            if let Some(target) = cloned.elements.get_mut(&copy.target_ref) {
                target.incoming.push(new_id.clone());
            }
            cloned.flows.insert(new_id, copy);
        }

        debug!(
            source_id = self.id.as_str(),
            clone_id = cloned.id.as_str(),
            elements = cloned.elements.len(),
            flows = cloned.flows.len();
            "Duplicated process",
        );
        cloned
    }
}

impl Default for Process {
    fn default() -> Self {
        Self::new()
    }
}
