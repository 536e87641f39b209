//! Budget values
//!
//! A budget is the resource allotment of a task: priority drives selection,
//! durability resists decay, quality reflects informational value. All three
//! components stay in `[0, 1]`.

use std::fmt;

/// Durability multiplier applied on every derivation.
pub const DERIVATION_DURABILITY_DECAY: f32 = 0.95;

/// Budget triple (priority, durability, quality).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Budget {
    priority: f32,
    durability: f32,
    quality: f32,
}

impl Budget {
    pub fn new(priority: f32, durability: f32, quality: f32) -> Self {
        Budget {
            priority: priority.clamp(0.0, 1.0),
            durability: durability.clamp(0.0, 1.0),
            quality: quality.clamp(0.0, 1.0),
        }
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn durability(&self) -> f32 {
        self.durability
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Default budget for input tasks.
    pub fn default_input() -> Self {
        Budget::new(0.8, 0.8, 0.5)
    }

    /// Budget of a conclusion derived from two premises.
    ///
    /// `conclusion_expectation` is the truth expectation of the conclusion
    /// (0.5 for questions and other truthless results).
    pub fn derived(task: &Budget, belief: &Budget, conclusion_expectation: f32) -> Self {
        let e = conclusion_expectation.clamp(0.0, 1.0);
        Budget::new(
            (task.priority * belief.priority * e).cbrt(),
            task.durability.max(belief.durability) * DERIVATION_DURABILITY_DECAY,
            e,
        )
    }

    /// Budget of a conclusion derived from a single premise.
    pub fn derived_single(task: &Budget, conclusion_expectation: f32) -> Self {
        let e = conclusion_expectation.clamp(0.0, 1.0);
        Budget::new(
            (task.priority * e).sqrt(),
            task.durability * DERIVATION_DURABILITY_DECAY,
            e,
        )
    }

    /// Component-wise max, used when a revision absorbs both parents.
    pub fn merged(a: &Budget, b: &Budget) -> Self {
        Budget::new(
            a.priority.max(b.priority),
            a.durability.max(b.durability),
            a.quality.max(b.quality),
        )
    }

    /// A copy with priority scaled by `factor`.
    pub fn scaled(&self, factor: f32) -> Self {
        Budget::new(self.priority * factor, self.durability, self.quality)
    }
}

impl Default for Budget {
    fn default() -> Self {
        Budget::new(0.5, 0.5, 0.5)
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${:.2};{:.2};{:.2}$",
            self.priority, self.durability, self.quality
        )
    }
}
