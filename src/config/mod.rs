//! Configuration
//!
//! One explicit record with enumerated fields. The serde form rejects
//! unknown fields, so a misspelled option fails at construction instead of
//! being silently ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which concept the memory evicts when full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForgetPolicy {
    /// Minimum aggregate task priority.
    Priority,
    /// Oldest last access.
    Lru,
    /// Insertion order.
    Fifo,
}

/// Knobs for the premise-formation strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase", default)]
pub struct StrategyConfig {
    pub subject_priority: f32,
    pub predicate_priority: f32,
    pub component_priority: f32,
    pub max_links: usize,
    pub min_link_priority: f32,
    pub max_tasks: usize,
    pub high_compatibility_score: f32,
    pub medium_compatibility_score: f32,
    pub low_compatibility_score: f32,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            subject_priority: 0.85,
            predicate_priority: 0.85,
            component_priority: 0.7,
            max_links: 8,
            min_link_priority: 0.1,
            max_tasks: 32,
            high_compatibility_score: 0.95,
            medium_compatibility_score: 0.7,
            low_compatibility_score: 0.3,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase", default)]
pub struct ReasonerConfig {
    /// Cap on the concept count.
    pub max_concepts: usize,
    /// Per-concept task cap, split 0.6/0.3/0.1 over belief/goal/question.
    pub max_tasks_per_concept: usize,
    /// Task priority admitting a concept into the focus set.
    pub priority_threshold: f32,
    /// Per-consolidation bag priority decay.
    pub priority_decay_rate: f32,
    /// Per-consolidation concept activation decay.
    pub activation_decay_rate: f32,
    /// Cycles between consolidations.
    pub consolidation_interval: u64,
    pub forget_policy: ForgetPolicy,
    /// Concept-table fill ratio that triggers adaptive forgetting.
    pub memory_pressure_threshold: f32,
    pub enable_adaptive_forgetting: bool,
    /// How many secondary premises a cycle tries.
    pub max_premises_per_step: usize,
    /// Subgoal chain depth bound for backward chaining.
    pub max_plan_depth: usize,
    /// Entries in the backward-chaining plan cache.
    pub plan_cache_size: usize,
    /// Seed for the concept-sampling rng, fixed for reproducibility.
    pub rng_seed: u64,
    pub strategy: StrategyConfig,
}

impl Default for ReasonerConfig {
    fn default() -> Self {
        ReasonerConfig {
            max_concepts: 1000,
            max_tasks_per_concept: 100,
            priority_threshold: 0.5,
            priority_decay_rate: 0.01,
            activation_decay_rate: 0.005,
            consolidation_interval: 10,
            forget_policy: ForgetPolicy::Priority,
            memory_pressure_threshold: 0.8,
            enable_adaptive_forgetting: true,
            max_premises_per_step: 4,
            max_plan_depth: 3,
            plan_cache_size: 64,
            rng_seed: 0x5EED,
            strategy: StrategyConfig::default(),
        }
    }
}

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    NotPositive(&'static str),
    #[error("{0} must lie in [0, 1]")]
    OutOfRange(&'static str),
}

impl ReasonerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concepts == 0 {
            return Err(ConfigError::NotPositive("maxConcepts"));
        }
        if self.max_tasks_per_concept == 0 {
            return Err(ConfigError::NotPositive("maxTasksPerConcept"));
        }
        if self.consolidation_interval == 0 {
            return Err(ConfigError::NotPositive("consolidationInterval"));
        }
        if self.max_premises_per_step == 0 {
            return Err(ConfigError::NotPositive("maxPremisesPerStep"));
        }
        if self.plan_cache_size == 0 {
            return Err(ConfigError::NotPositive("planCacheSize"));
        }
        for (name, value) in [
            ("priorityThreshold", self.priority_threshold),
            ("priorityDecayRate", self.priority_decay_rate),
            ("activationDecayRate", self.activation_decay_rate),
            ("memoryPressureThreshold", self.memory_pressure_threshold),
            ("subjectPriority", self.strategy.subject_priority),
            ("predicatePriority", self.strategy.predicate_priority),
            ("componentPriority", self.strategy.component_priority),
            ("minLinkPriority", self.strategy.min_link_priority),
            (
                "highCompatibilityScore",
                self.strategy.high_compatibility_score,
            ),
            (
                "mediumCompatibilityScore",
                self.strategy.medium_compatibility_score,
            ),
            (
                "lowCompatibilityScore",
                self.strategy.low_compatibility_score,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange(name));
            }
        }
        Ok(())
    }
}
