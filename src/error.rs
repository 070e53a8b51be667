use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the room finish pipeline.
#[derive(Debug, Error)]
pub enum FinishError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl FinishError {
    /// Returns `true` when the error should be recorded against the smallest
    /// unit (segment, element, room) and the batch continued.
    ///
    /// Transaction and external resource failures are terminal for the
    /// current pipeline invocation.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Transaction(_) | Self::Resource(_))
    }
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate loop: {0}")]
    DegenerateLoop(String),

    #[error("degenerate curve: {0}")]
    DegenerateCurve(String),

    #[error("loop is not closed: gap of {gap} between segment {index} and its successor")]
    OpenLoop { index: usize, gap: f64 },

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to lookups in the host document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("room {room} has no enclosing boundary")]
    NoBoundaryFound { room: String },

    #[error("parameter '{parameter}' is not bound to {category}")]
    MissingParameterBinding {
        parameter: &'static str,
        category: &'static str,
    },

    #[error("type '{name}' is a {actual} type, expected {expected}")]
    WrongTypeKind {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Data-quality problems in type metadata used for reporting.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("type '{type_name}' has no type mark")]
    MissingTypeMark { type_name: String },

    #[error("type '{type_name}' has no composition")]
    MissingComposition { type_name: String },
}

/// Errors raised by the host transaction model.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("document is read-only, cannot start '{0}'")]
    ReadOnlyDocument(String),

    #[error("commit of '{name}' rejected: {reason}")]
    CommitRejected { name: String, reason: String },
}

/// Errors related to external resources the pipeline depends on.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("{resource} is unreachable (waited {waited:?}); connect to it and retry")]
    Unreachable {
        resource: String,
        waited: Duration,
    },
}

/// Errors related to operation inputs.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`FinishError`].
pub type Result<T> = std::result::Result<T, FinishError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_errors_are_recoverable() {
        let err: FinishError = GeometryError::DegenerateLoop("2 segments".into()).into();
        assert!(err.is_recoverable());
    }

    #[test]
    fn transaction_and_resource_errors_are_terminal() {
        let txn: FinishError = TransactionError::ReadOnlyDocument("Generate Floors".into()).into();
        let res: FinishError = ResourceError::Unreachable {
            resource: "shared parameters".into(),
            waited: Duration::from_secs(2),
        }
        .into();
        assert!(!txn.is_recoverable());
        assert!(!res.is_recoverable());
    }

    #[test]
    fn unreachable_message_is_actionable() {
        let err = ResourceError::Unreachable {
            resource: "shared parameter file".into(),
            waited: Duration::from_secs(2),
        };
        assert!(err.to_string().contains("retry"));
    }
}
