//! The `Operation` type — one named behavior shared by every entity of a kind.

use std::fmt;
use std::sync::Arc;

use dg_core::{DgError, DgResult, Value};

use crate::Receiver;

/// Signature of an operation body.
///
/// The receiver is passed explicitly.  Bodies may read and write its fields
/// and call further operations through [`Receiver::invoke`], which keeps the
/// same receiver.
pub type OperationFn = dyn Fn(&mut Receiver<'_>, &[Value]) -> DgResult<Value> + Send + Sync;

/// A cheaply clonable handle to an operation body.
///
/// Cloning bumps a reference count; the body itself is never copied, so a
/// behavior set can hand out the same operation to any number of entities.
#[derive(Clone)]
pub struct Operation(Arc<OperationFn>);

impl Operation {
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Receiver<'_>, &[Value]) -> DgResult<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(body))
    }

    /// Run the body against `receiver`.
    #[inline]
    pub fn call(&self, receiver: &mut Receiver<'_>, args: &[Value]) -> DgResult<Value> {
        (self.0)(receiver, args)
    }

    /// `true` if both handles point at the same body.
    pub fn ptr_eq(&self, other: &Operation) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Operation(..)")
    }
}

/// Fail with [`DgError::Arity`] unless exactly `expected` arguments were passed.
pub fn expect_arity(operation: &str, args: &[Value], expected: usize) -> DgResult<()> {
    if args.len() != expected {
        return Err(DgError::Arity {
            operation: operation.to_owned(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}
