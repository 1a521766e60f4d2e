//! A read-mostly cache of group descriptors and their expansions.

use std::collections::HashMap;
use std::sync::Arc;

use log;
use parking_lot::RwLock;

use crate::group::descriptor::GroupDescriptor;
use crate::group::expansion::ExpandedGroup;
use crate::group::resolver::{normalise_symbol, SymbolResolver};
use crate::symmetry::SymmetryError;

#[cfg(test)]
#[path = "cache_tests.rs"]
mod cache_tests;

/// A cache of descriptors and expanded groups keyed by normalised symbol.
///
/// Lookups take a read lock; a missing entry is built outside the lock and inserted once under
/// a write lock, so concurrent builders of the same symbol agree on the stored value.
#[derive(Debug, Default)]
pub struct GroupCache {
    descriptors: RwLock<HashMap<String, Arc<GroupDescriptor>>>,
    expansions: RwLock<HashMap<String, Arc<ExpandedGroup>>>,
}

impl GroupCache {
    /// Constructs an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor for a symbol, resolving and building it on first use.
    pub fn descriptor<R: SymbolResolver + ?Sized>(
        &self,
        symbol: &str,
        resolver: &R,
    ) -> Result<Arc<GroupDescriptor>, SymmetryError> {
        let key = normalise_symbol(symbol).cache_key();
        if let Some(descriptor) = self.descriptors.read().get(&key) {
            return Ok(Arc::clone(descriptor));
        }
        let built = Arc::new(GroupDescriptor::resolve(symbol, resolver)?);
        let mut descriptors = self.descriptors.write();
        let entry = descriptors.entry(key).or_insert_with(|| {
            log::debug!("Caching descriptor for `{}`.", built.symbol);
            Arc::clone(&built)
        });
        Ok(Arc::clone(entry))
    }

    /// Returns the expanded group for a descriptor, expanding it on first use.
    pub fn expansion(&self, descriptor: &GroupDescriptor) -> Arc<ExpandedGroup> {
        let key = descriptor.key();
        if let Some(expanded) = self.expansions.read().get(&key) {
            return Arc::clone(expanded);
        }
        let built = Arc::new(ExpandedGroup::from_descriptor(descriptor));
        let mut expansions = self.expansions.write();
        Arc::clone(expansions.entry(key).or_insert(built))
    }

    /// Returns the expanded group for a symbol, resolving and expanding it on first use.
    pub fn expanded<R: SymbolResolver + ?Sized>(
        &self,
        symbol: &str,
        resolver: &R,
    ) -> Result<Arc<ExpandedGroup>, SymmetryError> {
        let descriptor = self.descriptor(symbol, resolver)?;
        Ok(self.expansion(&descriptor))
    }

    /// Returns the number of cached descriptors.
    pub fn n_descriptors(&self) -> usize {
        self.descriptors.read().len()
    }

    /// Returns the number of cached expansions.
    pub fn n_expansions(&self) -> usize {
        self.expansions.read().len()
    }
}
