use std::collections::HashMap;
use std::sync::Arc;

use remedian_domain::ResourceKind;

use crate::ports::ResourceControlPlane;
use crate::strategies::{
    ComputeInstanceStrategy, RemediationStrategy, SecurityGroupStrategy, StorageBucketStrategy,
};

/// Lookup table from resource kind to its remediation strategy.
///
/// Built once at startup and read-only afterwards. Kinds without an entry
/// (notably [`ResourceKind::Other`]) signal the executor to skip.
#[derive(Clone, Default)]
pub struct RemediationRegistry {
    strategies: HashMap<ResourceKind, Arc<dyn RemediationStrategy>>,
}

impl RemediationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Creates a registry with the three built-in strategies, each wired
    /// to the given control plane.
    #[must_use]
    pub fn with_default_strategies(control_plane: Arc<dyn ResourceControlPlane>) -> Self {
        Self::new()
            .with_strategy(Arc::new(SecurityGroupStrategy::new(control_plane.clone())))
            .with_strategy(Arc::new(StorageBucketStrategy::new(control_plane.clone())))
            .with_strategy(Arc::new(ComputeInstanceStrategy::new(control_plane)))
    }

    /// Registers one strategy under the kind it reports.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Arc<dyn RemediationStrategy>) -> Self {
        self.strategies.insert(strategy.kind(), strategy);
        self
    }

    /// Returns the strategy for a kind, when one is registered.
    #[must_use]
    pub fn lookup(&self, kind: ResourceKind) -> Option<Arc<dyn RemediationStrategy>> {
        self.strategies.get(&kind).cloned()
    }
}
