//! `dg-core` — foundational types for the `delegate` entity model.
//!
//! This crate is a dependency of every other `dg-*` crate.  It intentionally
//! has no `dg-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`value`]       | `Value` — field, argument, and return values          |
//! | [`config`]      | `FactoryConfig`                                       |
//! | [`error`]       | `DgError`, `DgResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod value;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::FactoryConfig;
pub use error::{DgError, DgResult};
pub use value::Value;
