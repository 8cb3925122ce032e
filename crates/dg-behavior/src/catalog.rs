//! `KindCatalog` — behavior sets declared by name, in any order.
//!
//! [`BehaviorSetBuilder::extends`] needs the parent to exist already, which
//! makes a cycle impossible to express.  The catalog instead accepts
//! declarations whose parent is given by *name*
//! ([`BehaviorSetBuilder::extends_kind`]), so declarations can reference
//! kinds declared later.  [`KindCatalogBuilder::finish`] then checks the
//! declarations as a whole and links the sets parent-first.
//!
//! # Usage
//!
//! ```rust
//! use dg_behavior::{BehaviorSetBuilder, KindCatalogBuilder};
//!
//! let catalog = KindCatalogBuilder::new()
//!     .declare(BehaviorSetBuilder::new("paid").extends_kind("user"))
//!     .declare(BehaviorSetBuilder::new("user"))
//!     .finish()
//!     .unwrap();
//!
//! assert!(catalog.get("paid").unwrap().extends("user"));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use dg_core::{DgError, DgResult};

use crate::set::ParentRef;
use crate::{BehaviorSet, BehaviorSetBuilder};

/// Collects [`BehaviorSetBuilder`]s for [`KindCatalog`].
#[derive(Default)]
pub struct KindCatalogBuilder {
    decls: Vec<BehaviorSetBuilder>,
}

impl KindCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration.  Nothing is validated until [`finish`](Self::finish).
    pub fn declare(mut self, decl: BehaviorSetBuilder) -> Self {
        self.decls.push(decl);
        self
    }

    /// Validate and build every declared set.
    ///
    /// # Errors
    ///
    /// - [`DgError::DuplicateKind`]: two declarations share a name.
    /// - [`DgError::UnknownKind`]: a named parent was never declared.
    /// - [`DgError::CyclicExtension`]: following named parents leads back to
    ///   a kind already on the path (including a kind naming itself).
    /// - Any error from [`BehaviorSetBuilder::build`].
    pub fn finish(self) -> DgResult<KindCatalog> {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(self.decls.len());
        for (i, decl) in self.decls.iter().enumerate() {
            if index.insert(decl.name.clone(), i).is_some() {
                return Err(DgError::DuplicateKind(decl.name.clone()));
            }
        }

        // parent[i] = index of the declaration `i` extends by name.
        let mut parent: Vec<Option<usize>> = Vec::with_capacity(self.decls.len());
        for decl in &self.decls {
            parent.push(match &decl.parent {
                Some(ParentRef::Named(p)) => Some(
                    *index.get(p).ok_or_else(|| DgError::UnknownKind(p.clone()))?,
                ),
                _ => None,
            });
        }

        for start in 0..self.decls.len() {
            check_acyclic(start, &parent, &self.decls)?;
        }

        // Build every set after its named parent.  Acyclicity guarantees each
        // chain ends at a declaration with no named parent.
        let mut pending: Vec<Option<BehaviorSetBuilder>> =
            self.decls.into_iter().map(Some).collect();
        let mut built: Vec<Option<Arc<BehaviorSet>>> = vec![None; pending.len()];

        for start in 0..pending.len() {
            let mut chain = Vec::new();
            let mut cursor = Some(start);
            while let Some(i) = cursor {
                if built[i].is_some() {
                    break;
                }
                chain.push(i);
                cursor = parent[i];
            }
            for &i in chain.iter().rev() {
                let Some(mut decl) = pending[i].take() else {
                    continue;
                };
                if let Some(p) = parent[i] {
                    let Some(parent_set) = built[p].as_ref() else {
                        return Err(DgError::UnknownKind(decl.name));
                    };
                    decl.parent = Some(ParentRef::Set(Arc::clone(parent_set)));
                }
                built[i] = Some(decl.build()?);
            }
        }

        let kinds: HashMap<String, Arc<BehaviorSet>> = built
            .into_iter()
            .flatten()
            .map(|set| (set.name().to_owned(), set))
            .collect();

        tracing::debug!(kinds = kinds.len(), "kind catalog linked");
        Ok(KindCatalog { kinds })
    }
}

/// Follow named parents from `start`; fail if a kind repeats.
fn check_acyclic(
    start:  usize,
    parent: &[Option<usize>],
    decls:  &[BehaviorSetBuilder],
) -> DgResult<()> {
    let mut path = vec![start];
    let mut cursor = parent[start];
    while let Some(i) = cursor {
        if let Some(pos) = path.iter().position(|&seen| seen == i) {
            let mut names: Vec<String> =
                path[pos..].iter().map(|&j| decls[j].name.clone()).collect();
            names.push(decls[i].name.clone());
            return Err(DgError::CyclicExtension {
                kind: decls[i].name.clone(),
                path: names,
            });
        }
        path.push(i);
        cursor = parent[i];
    }
    Ok(())
}

// ── KindCatalog ───────────────────────────────────────────────────────────────

/// An immutable name → [`BehaviorSet`] registry produced by
/// [`KindCatalogBuilder::finish`].
#[derive(Debug, Clone, Default)]
pub struct KindCatalog {
    kinds: HashMap<String, Arc<BehaviorSet>>,
}

impl KindCatalog {
    /// Look up a kind by name.
    pub fn get(&self, name: &str) -> DgResult<&Arc<BehaviorSet>> {
        self.kinds
            .get(name)
            .ok_or_else(|| DgError::UnknownKind(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Kind names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
