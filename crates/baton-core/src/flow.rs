//! Sequence flows - the directed edges of the process graph.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A directed edge between two elements, optionally guarded by a condition
/// expression.
///
/// `source_ref`/`target_ref` reference element IDs in the owning process.
/// Dangling references are tolerated at creation time; the graph skips
/// endpoint bookkeeping for elements that do not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceFlow {
    pub id: String,
    pub source_ref: String,
    pub target_ref: String,
    /// Guard expression evaluated by the engine when leaving a gateway.
    pub condition_expression: Option<String>,
    /// Residual open map for attributes without a typed field.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

/// Optional fields supplied when adding a sequence flow.
#[derive(Debug, Clone, Default)]
pub struct FlowOverrides {
    pub id: Option<String>,
    pub condition_expression: Option<String>,
    pub extra: IndexMap<String, Value>,
}

impl FlowOverrides {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_condition(mut self, expression: impl Into<String>) -> Self {
        self.condition_expression = Some(expression.into());
        self
    }
}
