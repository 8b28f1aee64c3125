//! Batch resolution of searched facts.

use std::sync::Arc;

use tracing::error;

use crate::facts::{FactError, FactKind, ResolvedFact, SearchedFact};
use crate::resolver::{ResolveOptions, ResolverRegistry};

/// Options shared by every resolution in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerOptions {
    /// Log the captured call stack along with resolver errors.
    pub trace: bool,
    pub resolve: ResolveOptions,
}

/// Resolves built-in facts, isolating each fact's failure from the rest of
/// the batch.
pub struct InternalFactManager {
    registry: Arc<ResolverRegistry>,
    options: ManagerOptions,
}

impl InternalFactManager {
    pub fn new(registry: Arc<ResolverRegistry>, options: ManagerOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &ResolverRegistry {
        &self.registry
    }

    /// Resolves every searched fact in order.
    ///
    /// Each fact invokes its resolver on its own, even when several facts
    /// share one; the resolver cache is what avoids repeated reads. A fact
    /// whose resolver fails is logged and left out of the result.
    pub fn resolve_facts(&self, searched_facts: &[SearchedFact]) -> Vec<ResolvedFact> {
        searched_facts
            .iter()
            .filter_map(|searched| self.resolve_fact(searched))
            .collect()
    }

    fn resolve_fact(&self, searched: &SearchedFact) -> Option<ResolvedFact> {
        let binding = match (searched.kind(), searched.binding()) {
            (FactKind::Unknown, _) | (_, None) => {
                return Some(ResolvedFact::new(searched.name(), None, FactKind::Unknown));
            }
            (_, Some(binding)) => binding,
        };

        match binding.call_the_resolver(&self.registry, searched, &self.options.resolve) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                self.log_failure(searched, &e);
                None
            }
        }
    }

    fn log_failure(&self, searched: &SearchedFact, e: &FactError) {
        if self.options.trace {
            error!(
                fact = searched.name(),
                "InternalFactManager - {}\n{}",
                e.chain(),
                e.backtrace()
            );
        } else {
            error!(fact = searched.name(), "InternalFactManager - {}", e);
        }
    }
}
