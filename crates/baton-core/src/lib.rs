//! Baton core - process document model for BPMN 2.0 workflows.
//!
//! This crate holds the in-memory representation of a business process: a
//! graph of typed elements connected by sequence flows, owned by a
//! [`Process`]. On top of the graph it provides default element templates,
//! rule-based validation producing ordered [`Diagnostic`]s, and an
//! injectable ID generation strategy.
//!
//! The interchange XML codec lives in the companion `baton-xml` crate;
//! rendering, properties panels, and deployment are external collaborators
//! that drive this model through the operations on [`Process`].

pub mod diagnostic;
pub mod element;
pub mod flow;
pub mod geometry;
pub mod id;
pub mod process;
pub mod template;
pub mod validate;

pub use diagnostic::{Diagnostic, Severity};
pub use element::{
    Element, ElementKind, ElementOverrides, ElementPatch, ExecutionListener, ListenerPayload,
    Parameter, Properties,
};
pub use flow::{FlowOverrides, SequenceFlow};
pub use geometry::{Point, Size};
pub use id::{IdSource, RandomIds};
pub use process::{GraphNode, Process};
