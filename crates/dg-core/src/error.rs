//! Framework error type.
//!
//! Every fallible call in the `dg-*` crates returns `DgResult<T>`.  Errors are
//! local to one call: nothing is retried and nothing is partially applied,
//! because each operation is a single field update or message.

use thiserror::Error;

/// The error type shared by all `dg-*` crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DgError {
    /// No level of the resolution chain defines the operation.
    #[error("operation `{operation}` not found on kind `{kind}` or its ancestors")]
    MissingOperation { operation: String, kind: String },

    /// Building the behavior set would make a kind extend itself.
    /// `path` lists the kinds in the cycle, starting and ending with the
    /// same name.
    #[error("kind `{kind}` would extend itself: {}", .path.join(" -> "))]
    CyclicExtension { kind: String, path: Vec<String> },

    /// A factory rejected an initial field value.
    #[error("invalid initial state: {0}")]
    InvalidInitialState(String),

    #[error("kind `{0}` is not declared")]
    UnknownKind(String),

    #[error("kind `{0}` is declared more than once")]
    DuplicateKind(String),

    #[error("receiver has no field `{0}`")]
    MissingField(String),

    #[error("field `{field}` holds a {found}, expected {expected}")]
    FieldType {
        field:    String,
        expected: &'static str,
        found:    &'static str,
    },

    #[error("field `{0}` would overflow")]
    Overflow(String),

    #[error("operation `{operation}` takes {expected} argument(s), got {got}")]
    Arity {
        operation: String,
        expected:  usize,
        got:       usize,
    },
}

/// Shorthand result type for all `dg-*` crates.
pub type DgResult<T> = Result<T, DgError>;
