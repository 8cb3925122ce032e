//! `BehaviorSet` — an immutable, named bundle of operations.
//!
//! # Usage
//!
//! ```rust
//! use dg_behavior::{BehaviorSetBuilder, Entity, expect_arity};
//! use dg_core::Value;
//!
//! let counter = BehaviorSetBuilder::new("counter")
//!     .operation("bump", |rx, args| {
//!         expect_arity("bump", args, 0)?;
//!         rx.add_int("count", 1).map(Value::Int)
//!     })
//!     .build()
//!     .unwrap();
//!
//! let mut e = Entity::new(&counter);
//! e.set_field("count", 0);
//! e.invoke("bump", &[]).unwrap();
//! assert_eq!(e.int_field("count").unwrap(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use dg_core::{DgError, DgResult, Value};

use crate::{OpMap, Operation, Receiver};

/// A named mapping from operation name to [`Operation`], optionally extending
/// one parent set.
///
/// Sets are only ever handed out as `Arc<BehaviorSet>` and have no mutating
/// methods, so they can be shared by any number of entities (and threads)
/// without locking.
pub struct BehaviorSet {
    name:   String,
    ops:    OpMap,
    parent: Option<Arc<BehaviorSet>>,
}

impl BehaviorSet {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The set this one extends, if any.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<BehaviorSet>> {
        self.parent.as_ref()
    }

    /// Operation defined directly on this set (ancestors are not consulted).
    pub fn own_operation(&self, name: &str) -> Option<&Operation> {
        self.ops.get(name)
    }

    /// `true` if this set itself defines `name`.
    pub fn defines(&self, name: &str) -> bool {
        self.ops.contains_key(name)
    }

    /// Names of the operations defined directly on this set, sorted.
    pub fn operation_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.ops.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterator over this set followed by each ancestor, root last.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of sets above this one.  A root set has depth 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count() - 1
    }

    /// `true` if `kind` is this set or one of its ancestors.
    pub fn extends(&self, kind: &str) -> bool {
        self.ancestors().any(|s| s.name == kind)
    }

    /// Find `name` on this set or the nearest ancestor defining it.
    ///
    /// Returns the operation, the set that supplied it, and how many levels
    /// above `self` that set sits.
    pub fn lookup(&self, name: &str) -> Option<(&Operation, &BehaviorSet, usize)> {
        self.ancestors()
            .enumerate()
            .find_map(|(depth, set)| set.ops.get(name).map(|op| (op, set, depth)))
    }
}

impl fmt::Debug for BehaviorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorSet")
            .field("name", &self.name)
            .field("operations", &self.operation_names())
            .field("parent", &self.parent.as_ref().map(|p| p.name()))
            .finish()
    }
}

// ── Ancestors ─────────────────────────────────────────────────────────────────

/// Iterator returned by [`BehaviorSet::ancestors`].
pub struct Ancestors<'a> {
    next: Option<&'a BehaviorSet>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a BehaviorSet;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Where a set under construction gets its parent from.
#[derive(Clone)]
pub(crate) enum ParentRef {
    Set(Arc<BehaviorSet>),
    /// Resolved by [`KindCatalogBuilder::finish`][crate::KindCatalogBuilder::finish].
    Named(String),
}

/// Fluent builder for [`BehaviorSet`].
///
/// Operations cannot be added once the set is built.  Registering the same
/// operation name twice keeps the last body.
pub struct BehaviorSetBuilder {
    pub(crate) name:   String,
    pub(crate) ops:    OpMap,
    pub(crate) parent: Option<ParentRef>,
}

impl BehaviorSetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:   name.into(),
            ops:    OpMap::default(),
            parent: None,
        }
    }

    /// Extend an already-built set.
    pub fn extends(mut self, parent: &Arc<BehaviorSet>) -> Self {
        self.parent = Some(ParentRef::Set(Arc::clone(parent)));
        self
    }

    /// Extend a kind by name.  Only meaningful when the builder is handed to
    /// a [`KindCatalogBuilder`][crate::KindCatalogBuilder]; a direct
    /// [`build`](Self::build) reports [`DgError::UnknownKind`].
    pub fn extends_kind(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(ParentRef::Named(parent.into()));
        self
    }

    /// Register an operation body under `name`.
    pub fn operation<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut Receiver<'_>, &[Value]) -> DgResult<Value> + Send + Sync + 'static,
    {
        self.with_operation(name, Operation::new(body))
    }

    /// Register an existing [`Operation`] handle, e.g. one borrowed from
    /// another set.
    pub fn with_operation(mut self, name: impl Into<String>, op: Operation) -> Self {
        self.ops.insert(name.into(), op);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Freeze the set.
    ///
    /// Fails with [`DgError::CyclicExtension`] if the parent chain already
    /// contains a set with this builder's name, since the new set would then
    /// extend itself.
    pub fn build(self) -> DgResult<Arc<BehaviorSet>> {
        let parent = match self.parent {
            None => None,
            Some(ParentRef::Set(p)) => Some(p),
            Some(ParentRef::Named(n)) => return Err(DgError::UnknownKind(n)),
        };

        if let Some(p) = &parent {
            if p.extends(&self.name) {
                let mut path = vec![self.name.clone()];
                for set in p.ancestors() {
                    path.push(set.name.clone());
                    if set.name == self.name {
                        break;
                    }
                }
                return Err(DgError::CyclicExtension { kind: self.name, path });
            }
        }

        tracing::debug!(
            kind = %self.name,
            parent = parent.as_ref().map(|p| p.name()).unwrap_or("-"),
            operations = self.ops.len(),
            "behavior set built"
        );

        Ok(Arc::new(BehaviorSet {
            name: self.name,
            ops: self.ops,
            parent,
        }))
    }
}
