//! Factory configuration.

use crate::{DgError, DgResult};

/// Validation knobs applied by entity factories at construction time.
///
/// Both checks are off by default: a factory accepts any initial score or
/// balance, negative ones included.  Turning a check on makes the factory
/// return [`DgError::InvalidInitialState`] instead of building the entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FactoryConfig {
    /// Reject an initial `score` below zero.
    pub reject_negative_score: bool,

    /// Reject an initial `accountBalance` below zero.
    pub reject_negative_balance: bool,
}

impl FactoryConfig {
    /// A config with every check enabled.
    pub fn strict() -> Self {
        Self {
            reject_negative_score:   true,
            reject_negative_balance: true,
        }
    }

    /// Apply the score check.
    pub fn check_score(&self, score: i64) -> DgResult<()> {
        if self.reject_negative_score && score < 0 {
            return Err(DgError::InvalidInitialState(format!(
                "initial score {score} is negative"
            )));
        }
        Ok(())
    }

    /// Apply the balance check.
    pub fn check_balance(&self, balance: i64) -> DgResult<()> {
        if self.reject_negative_balance && balance < 0 {
            return Err(DgError::InvalidInitialState(format!(
                "initial account balance {balance} is negative"
            )));
        }
        Ok(())
    }
}
