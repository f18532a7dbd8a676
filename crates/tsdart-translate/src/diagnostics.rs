//! Location-qualified translation errors.

use tsdart_syntax::{Location, NodeId, SyntaxTree};

/// What went wrong while translating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The construct has no Dart rendering.
    UnsupportedConstruct,
    /// The tree does not have a shape the translator relies on.
    StructuralInvariantViolation,
}

/// A fatal translation error. Displays as `file:line:column: message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{location}: {message}")]
pub struct TranslateError {
    pub kind: ErrorKind,
    pub location: Location,
    pub message: String,
}

impl TranslateError {
    pub fn new(
        kind: ErrorKind,
        tree: &SyntaxTree,
        node: NodeId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            location: tree.location(node),
            message: message.into(),
        }
    }

    pub fn unsupported(tree: &SyntaxTree, node: NodeId, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedConstruct, tree, node, message)
    }

    pub fn invariant(tree: &SyntaxTree, node: NodeId, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StructuralInvariantViolation, tree, node, message)
    }
}
