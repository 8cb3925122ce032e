//! `Entity` — a mutable field record attached to one shared behavior set.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use dg_core::{DgError, DgResult, Value};

use crate::{BehaviorSet, OpMap, Operation, dispatch};

/// A record of named fields plus a shared reference to its kind.
///
/// The entity never copies its kind's operations: it holds one
/// `Arc<BehaviorSet>` and resolves operations through it on every call.
/// Operations stored with [`define_own`](Self::define_own) belong to this
/// entity alone and shadow anything its kind defines.
///
/// The kind is fixed at construction.  Mutation goes through `&mut Entity`,
/// so at most one writer touches an entity's fields at a time.
#[derive(Clone)]
pub struct Entity {
    fields: BTreeMap<String, Value>,
    kind:   Arc<BehaviorSet>,
    own:    OpMap,
}

impl Entity {
    /// Allocate an entity of `kind` with no fields.
    pub fn new(kind: &Arc<BehaviorSet>) -> Self {
        Self {
            fields: BTreeMap::new(),
            kind:   Arc::clone(kind),
            own:    OpMap::default(),
        }
    }

    // ── Kind ──────────────────────────────────────────────────────────────

    #[inline]
    pub fn kind(&self) -> &Arc<BehaviorSet> {
        &self.kind
    }

    #[inline]
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    /// `true` if the entity's kind is `kind` or extends it.
    pub fn is_kind_of(&self, kind: &str) -> bool {
        self.kind.extends(kind)
    }

    // ── Fields ────────────────────────────────────────────────────────────

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Write a field, returning the previous value if there was one.
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Field names in ascending order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    fn require(&self, name: &str) -> DgResult<&Value> {
        self.fields
            .get(name)
            .ok_or_else(|| DgError::MissingField(name.to_owned()))
    }

    /// Read an integer field.
    pub fn int_field(&self, name: &str) -> DgResult<i64> {
        let value = self.require(name)?;
        value.as_int().ok_or_else(|| DgError::FieldType {
            field:    name.to_owned(),
            expected: "int",
            found:    value.type_name(),
        })
    }

    /// Read a text field.
    pub fn text_field(&self, name: &str) -> DgResult<&str> {
        let value = self.require(name)?;
        value.as_text().ok_or_else(|| DgError::FieldType {
            field:    name.to_owned(),
            expected: "text",
            found:    value.type_name(),
        })
    }

    /// Add `delta` to an existing integer field and return the new value.
    ///
    /// The field is left untouched on error.
    pub fn add_int(&mut self, name: &str, delta: i64) -> DgResult<i64> {
        let next = self
            .int_field(name)?
            .checked_add(delta)
            .ok_or_else(|| DgError::Overflow(name.to_owned()))?;
        self.fields.insert(name.to_owned(), Value::Int(next));
        Ok(next)
    }

    // ── Entity-level operations ───────────────────────────────────────────

    /// Attach an operation to this entity only.  It takes precedence over
    /// every operation of the same name on the kind chain.
    pub fn define_own(&mut self, name: impl Into<String>, op: Operation) -> Option<Operation> {
        self.own.insert(name.into(), op)
    }

    pub fn remove_own(&mut self, name: &str) -> Option<Operation> {
        self.own.remove(name)
    }

    pub fn own_operation(&self, name: &str) -> Option<&Operation> {
        self.own.get(name)
    }

    // ── Dispatch shortcuts ────────────────────────────────────────────────

    /// Shorthand for [`dispatch::invoke`].
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> DgResult<Value> {
        dispatch::invoke(self, name, args)
    }

    /// `true` if `name` resolves on this entity.
    pub fn responds_to(&self, name: &str) -> bool {
        self.own.contains_key(name) || self.kind.lookup(name).is_some()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut own: Vec<&str> = self.own.keys().map(String::as_str).collect();
        own.sort_unstable();
        f.debug_struct("Entity")
            .field("kind", &self.kind.name())
            .field("fields", &self.fields)
            .field("own", &own)
            .finish()
    }
}
