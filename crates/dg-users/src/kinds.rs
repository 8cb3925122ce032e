//! The `user` and `paidUser` behavior sets.

use dg_behavior::{BehaviorSetBuilder, KindCatalog, KindCatalogBuilder, expect_arity};
use dg_core::{DgResult, Value};

// ── Names ─────────────────────────────────────────────────────────────────────

pub const USER: &str = "user";
pub const PAID_USER: &str = "paidUser";

pub const NAME: &str = "name";
pub const SCORE: &str = "score";
pub const ACCOUNT_BALANCE: &str = "accountBalance";

pub const INCREMENT: &str = "increment";
pub const LOGIN: &str = "login";
pub const SAY_NAME: &str = "sayName";
pub const INCREASE_BALANCE: &str = "increaseBalance";

// ── Sets ──────────────────────────────────────────────────────────────────────

/// Operations every user has.
///
/// | Operation   | Effect                                   | Returns           |
/// |-------------|------------------------------------------|-------------------|
/// | `increment` | `score += 1`                             | new score         |
/// | `login`     | none                                     | login message     |
/// | `sayName`   | none                                     | greeting with name|
pub fn user_behaviors() -> BehaviorSetBuilder {
    BehaviorSetBuilder::new(USER)
        .operation(INCREMENT, |rx, args| {
            expect_arity(INCREMENT, args, 0)?;
            rx.add_int(SCORE, 1).map(Value::Int)
        })
        .operation(LOGIN, |rx, args| {
            expect_arity(LOGIN, args, 0)?;
            let name = rx.text_field(NAME)?;
            tracing::info!(user = name, "login");
            Ok(Value::Text(format!("{name} logged in")))
        })
        .operation(SAY_NAME, |rx, args| {
            expect_arity(SAY_NAME, args, 0)?;
            let name = rx.text_field(NAME)?;
            tracing::info!(user = name, "sayName");
            Ok(Value::Text(format!("I'm {name}")))
        })
}

/// Operations only paid users add.  Extends [`USER`] by name, so it must be
/// declared in a catalog next to [`user_behaviors`] (or re-pointed with
/// [`BehaviorSetBuilder::extends`]).
pub fn paid_user_behaviors() -> BehaviorSetBuilder {
    BehaviorSetBuilder::new(PAID_USER)
        .extends_kind(USER)
        .operation(INCREASE_BALANCE, |rx, args| {
            expect_arity(INCREASE_BALANCE, args, 0)?;
            rx.add_int(ACCOUNT_BALANCE, 1).map(Value::Int)
        })
}

/// Both quiz kinds, linked.
pub fn quiz_catalog() -> DgResult<KindCatalog> {
    KindCatalogBuilder::new()
        .declare(user_behaviors())
        .declare(paid_user_behaviors())
        .finish()
}
