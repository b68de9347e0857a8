//! Error types for evonet_core.
//!
//! Every failure maps onto one of four kinds: construction of a graph or
//! solver, propagation of signals, post-reset consistency, and the wire or
//! genome text encodings.

use evonet_data::{ActivationType, NeuronType};
use thiserror::Error;

/// Coarse classification of a [`NetError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Construction,
    Activation,
    Consistency,
    Serialization,
}

/// Main error type for evonet_core operations.
#[derive(Error, Debug)]
pub enum NetError {
    /// A link or module references a node that cannot be resolved.
    #[error("failed to lookup for {role} neuron with id: {id}")]
    MissingNode { role: &'static str, id: usize },

    /// A link endpoint is not a valid index into the node table.
    #[error("link endpoint {index} is outside the node table of size {len}")]
    LinkOutOfRange { index: usize, len: usize },

    /// A node id appears twice while building a network.
    #[error("duplicate node id: {0}")]
    DuplicateNode(usize),

    /// A node is used in a role its category does not allow.
    #[error("node {id} of type {actual} cannot be used as {expected}")]
    WrongNodeCategory {
        id: usize,
        expected: &'static str,
        actual: NeuronType,
    },

    /// Outputs did not settle within the step budget.
    #[error("exceeded max activation attempts: {0}")]
    ExceededMaxActivationAttempts(usize),

    #[error("{0} is unsupported for modular networks")]
    UnsupportedForModular(&'static str),

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    #[error("unsupported sensors array size: {got}, expected {expected}")]
    UnsupportedSensorsArraySize { got: usize, expected: usize },

    /// A module function was applied to a neuron, or the other way around.
    #[error("activation function {activation} is not applicable to {target}")]
    UnsupportedActivation {
        activation: ActivationType,
        target: &'static str,
    },

    #[error("module {activation} received no inputs")]
    EmptyModuleInput { activation: ActivationType },

    #[error("module {id} produced {got} outputs for {expected} outgoing links")]
    ModuleArity {
        id: usize,
        got: usize,
        expected: usize,
    },

    #[error("depth search from node {id} exceeded limit {limit}")]
    MaxDepthExceeded { id: usize, limit: usize },

    /// A node kept state after being flushed.
    #[error("node {id} failed flush check: {reason}")]
    FlushCheck { id: usize, reason: String },

    /// Malformed wire or genome record.
    #[error("Malformed record: {0}")]
    Malformed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<NetError>,
    },
}

/// Result type alias for evonet_core operations.
pub type Result<T> = std::result::Result<T, NetError>;

impl NetError {
    /// Creates a new malformed-record error.
    #[must_use]
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::Malformed(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingNode { .. }
            | Self::LinkOutOfRange { .. }
            | Self::DuplicateNode(_)
            | Self::WrongNodeCategory { .. } => ErrorKind::Construction,
            Self::ExceededMaxActivationAttempts(_)
            | Self::UnsupportedForModular(_)
            | Self::NotImplemented(_)
            | Self::UnsupportedSensorsArraySize { .. }
            | Self::UnsupportedActivation { .. }
            | Self::EmptyModuleInput { .. }
            | Self::ModuleArity { .. }
            | Self::MaxDepthExceeded { .. } => ErrorKind::Activation,
            Self::FlushCheck { .. } => ErrorKind::Consistency,
            Self::Malformed(_) | Self::Io(_) => ErrorKind::Serialization,
            Self::Context { source, .. } => source.kind(),
        }
    }
}
