//! `dg-behavior` — shared behavior sets and delegation-based dispatch.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                         |
//! |---------------|------------------------------------------------------------------|
//! | [`operation`] | `Operation` — a shareable, receiver-taking function              |
//! | [`set`]       | `BehaviorSet`, `BehaviorSetBuilder`, `Ancestors`                 |
//! | [`catalog`]   | `KindCatalog` — kinds declared by name, cycle-checked on finish  |
//! | [`entity`]    | `Entity` — field record + shared kind reference                  |
//! | [`dispatch`]  | `Receiver`, `resolve`, `invoke`, `invoke_with`                   |
//!
//! # Design notes
//!
//! An entity owns only its field values.  Its behavior lives in one
//! `Arc<BehaviorSet>` shared by every entity of the same kind, and a set may
//! extend exactly one parent set.  Invoking an operation walks:
//!
//! 1. operations stored on the entity itself,
//! 2. the entity's kind,
//! 3. the kind's parent, grandparent, …
//!
//! and runs the first match with the *original* entity as receiver, however
//! far up the chain the implementation was found.  Parents are always built
//! before their children, so the chain cannot loop; builders reject any
//! declaration that would make a kind extend itself.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                               |
//! |-----------|------------------------------------------------------|
//! | `fx-hash` | Operation tables use `FxHashMap` instead of SipHash. |
//! | `serde`   | Propagates serde derives to `dg-core` types.         |

pub mod catalog;
pub mod dispatch;
pub mod entity;
pub mod operation;
pub mod set;

#[cfg(test)]
mod tests;

pub use catalog::{KindCatalog, KindCatalogBuilder};
pub use dispatch::{Receiver, Resolved, Source, invoke, invoke_with, resolve};
pub use entity::Entity;
pub use operation::{Operation, expect_arity};
pub use set::{Ancestors, BehaviorSet, BehaviorSetBuilder};

#[cfg(feature = "fx-hash")]
pub(crate) type OpMap = rustc_hash::FxHashMap<String, Operation>;

#[cfg(not(feature = "fx-hash"))]
pub(crate) type OpMap = std::collections::HashMap<String, Operation>;
