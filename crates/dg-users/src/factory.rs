//! Factories that build user entities.
//!
//! A factory owns the `Arc<BehaviorSet>` for its kind and attaches it to
//! every entity it builds, so all users of a kind share one behavior set.
//!
//! [`PaidUserFactory`] does not repeat the base field setup: it allocates an
//! entity of the paid kind and runs [`UserFactory::init`] on it before adding
//! its own field.

use std::sync::Arc;

use dg_behavior::{BehaviorSet, Entity, KindCatalog};
use dg_core::{DgError, DgResult, FactoryConfig};

use crate::kinds::{ACCOUNT_BALANCE, NAME, PAID_USER, SCORE, USER, quiz_catalog};

/// Common interface of the user factories.
pub trait EntityFactory {
    /// The behavior set attached to every entity this factory builds.
    fn kind(&self) -> &Arc<BehaviorSet>;

    fn config(&self) -> &FactoryConfig;
}

fn log_rejected(kind: &str, err: &DgError) {
    tracing::warn!(kind, error = %err, "rejected initial state");
}

// ── UserFactory ───────────────────────────────────────────────────────────────

/// Builds `user` entities with `name` and `score` fields.
#[derive(Clone, Debug)]
pub struct UserFactory {
    kind:   Arc<BehaviorSet>,
    config: FactoryConfig,
}

impl UserFactory {
    /// Take the `user` kind from `catalog`.
    pub fn new(catalog: &KindCatalog, config: FactoryConfig) -> DgResult<Self> {
        Ok(Self {
            kind: Arc::clone(catalog.get(USER)?),
            config,
        })
    }

    /// Write the base user fields onto `entity`, whatever its kind.
    ///
    /// This is the constructor body [`create`](Self::create) runs; derived
    /// factories call it on entities of their own kind.
    pub fn init(&self, entity: &mut Entity, name: &str, score: i64) -> DgResult<()> {
        self.config
            .check_score(score)
            .inspect_err(|e| log_rejected(entity.kind_name(), e))?;
        entity.set_field(NAME, name);
        entity.set_field(SCORE, score);
        Ok(())
    }

    /// Build a `user` entity.
    pub fn create(&self, name: &str, score: i64) -> DgResult<Entity> {
        let mut entity = Entity::new(&self.kind);
        self.init(&mut entity, name, score)?;
        Ok(entity)
    }
}

impl EntityFactory for UserFactory {
    fn kind(&self) -> &Arc<BehaviorSet> {
        &self.kind
    }

    fn config(&self) -> &FactoryConfig {
        &self.config
    }
}

// ── PaidUserFactory ───────────────────────────────────────────────────────────

/// Builds `paidUser` entities: a user plus an `accountBalance` field.
#[derive(Clone, Debug)]
pub struct PaidUserFactory {
    base: UserFactory,
    kind: Arc<BehaviorSet>,
}

impl PaidUserFactory {
    /// Take the `paidUser` kind from `catalog` and delegate base setup to
    /// `base`.
    ///
    /// Fails with [`DgError::UnknownKind`] if the paid kind does not extend
    /// `base`'s kind.
    pub fn new(catalog: &KindCatalog, base: UserFactory) -> DgResult<Self> {
        let kind = Arc::clone(catalog.get(PAID_USER)?);
        if !kind.extends(base.kind().name()) {
            return Err(DgError::UnknownKind(base.kind().name().to_owned()));
        }
        Ok(Self { base, kind })
    }

    pub fn base(&self) -> &UserFactory {
        &self.base
    }

    /// Build a `paidUser` entity.
    ///
    /// A negative `balance` is accepted unless the base factory's config sets
    /// [`FactoryConfig::reject_negative_balance`].
    pub fn create(&self, name: &str, score: i64, balance: i64) -> DgResult<Entity> {
        self.config()
            .check_balance(balance)
            .inspect_err(|e| log_rejected(self.kind.name(), e))?;
        let mut entity = Entity::new(&self.kind);
        self.base.init(&mut entity, name, score)?;
        entity.set_field(ACCOUNT_BALANCE, balance);
        Ok(entity)
    }
}

impl EntityFactory for PaidUserFactory {
    fn kind(&self) -> &Arc<BehaviorSet> {
        &self.kind
    }

    fn config(&self) -> &FactoryConfig {
        self.base.config()
    }
}

// ── QuizFactories ─────────────────────────────────────────────────────────────

/// Both factories, sharing kinds from one [`quiz_catalog`].
#[derive(Clone, Debug)]
pub struct QuizFactories {
    pub users: UserFactory,
    pub paid:  PaidUserFactory,
}

impl QuizFactories {
    pub fn new(config: FactoryConfig) -> DgResult<Self> {
        let catalog = quiz_catalog()?;
        let users = UserFactory::new(&catalog, config)?;
        let paid = PaidUserFactory::new(&catalog, users.clone())?;
        Ok(Self { users, paid })
    }
}
