//! Operation resolution and invocation.
//!
//! # Resolution order
//!
//! For [`invoke`]:
//!
//! 1. the entity's own operations ([`Entity::define_own`]),
//! 2. the entity's kind,
//! 3. each ancestor of the kind, nearest first,
//! 4. otherwise [`DgError::MissingOperation`].
//!
//! [`invoke_with`] skips steps 1–2 and starts at the given set instead, so a
//! shared operation can be applied to a receiver of any kind.  In both cases
//! the body runs with the receiver the caller passed in, never with the set
//! that supplied the implementation.
//!
//! # Nested calls
//!
//! A body calling [`Receiver::invoke`] resolves from the same starting point
//! as the call it is running in and keeps the same receiver.  Inside an
//! `invoke_with` call that means the borrowed set's chain, not the receiver's
//! own kind.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use dg_core::{DgError, DgResult, Value};

use crate::{BehaviorSet, Entity, Operation};

/// Where a resolved operation was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Stored on the entity itself.
    Own,
    /// Defined by `kind`, `depth` levels above the set resolution started at.
    Kind { kind: String, depth: usize },
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Own => f.write_str("own"),
            Source::Kind { kind, depth } => write!(f, "{kind}@{depth}"),
        }
    }
}

/// Result of a successful lookup.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub operation: Operation,
    pub source:    Source,
}

/// Set resolution starts from.
#[derive(Clone)]
enum Root {
    /// Own operations, then the receiver's kind chain.
    Receiver,
    /// A borrowed set's chain only.
    Kind(Arc<BehaviorSet>),
}

// ── Receiver ──────────────────────────────────────────────────────────────────

/// The entity an operation body acts on.
///
/// Derefs to [`Entity`] for field access.  [`invoke`](Self::invoke) calls
/// another operation on the same receiver.
pub struct Receiver<'a> {
    entity: &'a mut Entity,
    root:   Root,
}

impl Receiver<'_> {
    /// Call `name` on this receiver, resolving from the same starting set as
    /// the running call.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> DgResult<Value> {
        let root = self.root.clone();
        run(&mut *self.entity, root, name, args)
    }

    /// Name of the borrowed set when running under [`invoke_with`].
    pub fn borrowed_from(&self) -> Option<&str> {
        match &self.root {
            Root::Receiver => None,
            Root::Kind(set) => Some(set.name()),
        }
    }
}

impl Deref for Receiver<'_> {
    type Target = Entity;

    fn deref(&self) -> &Entity {
        &*self.entity
    }
}

impl DerefMut for Receiver<'_> {
    fn deref_mut(&mut self) -> &mut Entity {
        &mut *self.entity
    }
}

// ── Lookup ────────────────────────────────────────────────────────────────────

fn resolve_on(set: &BehaviorSet, name: &str) -> DgResult<Resolved> {
    set.lookup(name)
        .map(|(op, owner, depth)| Resolved {
            operation: op.clone(),
            source:    Source::Kind { kind: owner.name().to_owned(), depth },
        })
        .ok_or_else(|| DgError::MissingOperation {
            operation: name.to_owned(),
            kind:      set.name().to_owned(),
        })
}

/// Find the operation `entity.invoke(name, ..)` would run.  Read-only.
pub fn resolve(entity: &Entity, name: &str) -> DgResult<Resolved> {
    if let Some(op) = entity.own_operation(name) {
        return Ok(Resolved { operation: op.clone(), source: Source::Own });
    }
    resolve_on(entity.kind(), name)
}

fn run(entity: &mut Entity, root: Root, name: &str, args: &[Value]) -> DgResult<Value> {
    let resolved = match &root {
        Root::Receiver => resolve(entity, name)?,
        Root::Kind(set) => resolve_on(set, name)?,
    };
    tracing::debug!(
        operation = name,
        source = %resolved.source,
        receiver = entity.kind_name(),
        "invoke"
    );
    let mut receiver = Receiver { entity, root };
    resolved.operation.call(&mut receiver, args)
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Resolve `name` on `entity` and run it with `entity` as receiver.
pub fn invoke(entity: &mut Entity, name: &str, args: &[Value]) -> DgResult<Value> {
    run(entity, Root::Receiver, name, args)
}

/// Resolve `name` on `behaviors` (and its ancestors) and run it with
/// `receiver`, whatever the receiver's own kind is.
///
/// The receiver's kind and own operations are neither consulted nor changed.
pub fn invoke_with(
    behaviors: &Arc<BehaviorSet>,
    name:      &str,
    receiver:  &mut Entity,
    args:      &[Value],
) -> DgResult<Value> {
    run(receiver, Root::Kind(Arc::clone(behaviors)), name, args)
}
