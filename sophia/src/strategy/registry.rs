//! Strategy registry: strategies by ID, plus the one to fall back on.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use perseus_score::{PerseusRenderer, ScoreContext, UserInputMap};

use super::{DiscoveryStrategy, MasteryStrategy, NoOpStrategy, ReflectionStrategy, ScoringStrategy};
use crate::config::SophiaConfig;
use crate::error::{Result, SophiaError};
use crate::types::{AssessmentPurpose, Moment, Recognition};

/// Registry of scoring strategies keyed by ID.
///
/// Built once at startup and passed to whatever recognizes moments.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: IndexMap<String, Arc<dyn ScoringStrategy>>,
    default_id: String,
}

impl StrategyRegistry {
    /// Create a new registry holding only the no-op strategy, which is the default
    pub fn new() -> Self {
        let mut registry = Self {
            strategies: IndexMap::new(),
            default_id: NoOpStrategy::ID.to_string(),
        };
        registry.register(Arc::new(NoOpStrategy));
        registry
    }

    /// Registry with mastery, discovery and reflection registered.
    pub fn with_builtin_strategies() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(MasteryStrategy));
        registry.register(Arc::new(DiscoveryStrategy));
        registry.register(Arc::new(ReflectionStrategy));
        registry
    }

    /// Built-in strategies with the configured default applied.
    pub fn from_config(config: &SophiaConfig) -> Result<Self> {
        config.validate()?;
        let mut registry = Self::with_builtin_strategies();
        registry.set_default(&config.default_strategy)?;
        Ok(registry)
    }

    /// Register a strategy. Registering an ID again replaces it.
    pub fn register(&mut self, strategy: Arc<dyn ScoringStrategy>) {
        let id = strategy.id().to_string();
        if self.strategies.contains_key(&id) {
            warn!(
                strategy_id = %id,
                "ScoringStrategy \"{}\" is already registered. Overwriting with new registration.",
                id
            );
        }
        self.strategies.insert(id, strategy);
    }

    /// Get a strategy by ID.
    pub fn get(&self, id: &str) -> Option<Arc<dyn ScoringStrategy>> {
        self.strategies.get(id).cloned()
    }

    /// The default strategy, or no-op if the default is not registered.
    pub fn default_strategy(&self) -> Arc<dyn ScoringStrategy> {
        self.get(&self.default_id)
            .unwrap_or_else(|| Arc::new(NoOpStrategy))
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Change the default strategy. The ID must already be registered.
    pub fn set_default(&mut self, id: &str) -> Result<()> {
        if !self.has(id) {
            return Err(SophiaError::StrategyNotFound {
                id: id.to_string(),
                available: self.ids(),
            });
        }
        info!(strategy_id = %id, previous = %self.default_id, "Default scoring strategy changed");
        self.default_id = id.to_string();
        Ok(())
    }

    /// Reset to a freshly created registry.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Registered IDs, in registration order.
    pub fn ids(&self) -> Vec<String> {
        self.strategies.keys().cloned().collect()
    }

    pub fn has(&self, id: &str) -> bool {
        self.strategies.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy registered for a purpose, or the default.
    ///
    /// Invitation has no dedicated strategy and always uses the default.
    pub fn for_purpose(&self, purpose: AssessmentPurpose) -> Arc<dyn ScoringStrategy> {
        let id = match purpose {
            AssessmentPurpose::Mastery => MasteryStrategy::ID,
            AssessmentPurpose::Discovery => DiscoveryStrategy::ID,
            AssessmentPurpose::Reflection => ReflectionStrategy::ID,
            AssessmentPurpose::Invitation => return self.default_strategy(),
        };
        self.get(id).unwrap_or_else(|| self.default_strategy())
    }

    /// Widgets of a moment that still need an answer under its purpose.
    pub fn empty_widget_ids(
        &self,
        moment: &Moment,
        inputs: &UserInputMap,
        ctx: &ScoreContext<'_>,
    ) -> Vec<String> {
        self.empty_widget_ids_for(moment.purpose, &moment.content, inputs, ctx)
    }

    /// Same as [`Self::empty_widget_ids`] for bare content.
    pub fn empty_widget_ids_for(
        &self,
        purpose: AssessmentPurpose,
        content: &PerseusRenderer,
        inputs: &UserInputMap,
        ctx: &ScoreContext<'_>,
    ) -> Vec<String> {
        self.for_purpose(purpose).empty_widget_ids(content, inputs, ctx)
    }

    /// Recognize a moment with the strategy for its purpose.
    pub fn recognize(
        &self,
        moment: &Moment,
        inputs: &UserInputMap,
        ctx: &ScoreContext<'_>,
    ) -> Result<Recognition> {
        let strategy = self.for_purpose(moment.purpose);
        debug!(
            moment_id = %moment.id,
            purpose = %moment.purpose,
            strategy_id = strategy.id(),
            "Recognizing moment"
        );
        strategy.recognize(moment, inputs, ctx)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.strategies.keys().collect::<Vec<_>>())
            .field("default_id", &self.default_id)
            .finish()
    }
}
