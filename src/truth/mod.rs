//! Truth values in NARS
//!
//! Truth values pair a frequency (the estimated rate at which the statement
//! holds) with a confidence (the weight of evidence behind that estimate).
//! Frequency stays in `[0, 1]`; confidence stays strictly below 1, since no
//! finite evidence yields certainty. All inference functions here are pure
//! and clamp their results.

use ordered_float::OrderedFloat;
use std::fmt;

/// Evidential horizon: the `k` in `c = w / (w + k)`.
pub const EVIDENTIAL_HORIZON: f32 = 1.0;

/// Confidence ceiling keeping `c` inside `[0, 1)`.
pub const MAX_CONFIDENCE: f32 = 0.9999;

/// Truth value: (frequency, confidence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Truth {
    frequency: OrderedFloat<f32>,
    confidence: OrderedFloat<f32>,
}

impl Truth {
    /// Create a truth value, clamping into range.
    pub fn new(frequency: f32, confidence: f32) -> Self {
        Truth {
            frequency: OrderedFloat(frequency.clamp(0.0, 1.0)),
            confidence: OrderedFloat(confidence.clamp(0.0, MAX_CONFIDENCE)),
        }
    }

    pub fn frequency(&self) -> f32 {
        self.frequency.0
    }

    pub fn confidence(&self) -> f32 {
        self.confidence.0
    }

    /// Evidence weight `w = c / (1 - c)`.
    pub fn weight(&self) -> f64 {
        let c = self.confidence.0 as f64;
        c / (1.0 - c)
    }

    /// Recover a truth from a frequency and an evidence weight.
    pub fn from_weight(frequency: f32, weight: f64) -> Self {
        let c = weight / (weight + EVIDENTIAL_HORIZON as f64);
        Truth::new(frequency, c as f32)
    }

    /// Expectation `c * (f - 0.5) + 0.5`, the value budget arithmetic keys on.
    pub fn expectation(&self) -> f32 {
        self.confidence.0 * (self.frequency.0 - 0.5) + 0.5
    }

    /// Default truth for input beliefs and goals.
    pub fn default_judgment() -> Self {
        Truth::new(1.0, 0.9)
    }

    /// Negation: flips frequency, keeps confidence.
    pub fn negation(&self) -> Self {
        Truth::new(1.0 - self.frequency.0, self.confidence.0)
    }

    /// Revision of two truths about the same statement with disjoint
    /// evidence. The result's confidence exceeds either input's.
    pub fn revision(a: &Truth, b: &Truth) -> Self {
        let w1 = a.weight();
        let w2 = b.weight();
        let w = w1 + w2;
        let f = (w1 * a.frequency() as f64 + w2 * b.frequency() as f64) / w;
        Truth::from_weight(f as f32, w)
    }

    /// Deduction: `{<M --> P>, <S --> M>} |- <S --> P>`.
    pub fn deduction(a: &Truth, b: &Truth) -> Self {
        let f = a.frequency() * b.frequency();
        let c = a.confidence() * b.confidence() * f;
        Truth::new(f, c)
    }

    /// Induction: `{<M --> P>, <M --> S>} |- <S --> P>`.
    pub fn induction(a: &Truth, b: &Truth) -> Self {
        let w = a.confidence() * b.confidence() * b.frequency();
        Truth::new(a.frequency(), w / (w + EVIDENTIAL_HORIZON))
    }

    /// Abduction: induction with the premise roles swapped.
    pub fn abduction(a: &Truth, b: &Truth) -> Self {
        Truth::induction(b, a)
    }

    /// Exemplification: `{<P --> M>, <M --> S>} |- <S --> P>`.
    pub fn exemplification(a: &Truth, b: &Truth) -> Self {
        let w = a.frequency() * b.frequency() * a.confidence() * b.confidence();
        Truth::new(1.0, w / (w + EVIDENTIAL_HORIZON))
    }

    /// Comparison: `{<M --> P>, <M --> S>} |- <S <-> P>`.
    pub fn comparison(a: &Truth, b: &Truth) -> Self {
        let f1 = a.frequency();
        let f2 = b.frequency();
        let f0 = f1 + f2 - f1 * f2;
        let f = if f0 == 0.0 { 0.0 } else { (f1 * f2) / f0 };
        let w = f0 * a.confidence() * b.confidence();
        Truth::new(f, w / (w + EVIDENTIAL_HORIZON))
    }

    /// Analogy: `{<S --> M>, <M <-> P>} |- <S --> P>`.
    pub fn analogy(a: &Truth, b: &Truth) -> Self {
        let f = a.frequency() * b.frequency();
        let c = a.confidence() * b.confidence() * b.frequency();
        Truth::new(f, c)
    }

    /// Intersection: `f1 * f2`, `c1 * c2`.
    pub fn intersection(a: &Truth, b: &Truth) -> Self {
        Truth::new(
            a.frequency() * b.frequency(),
            a.confidence() * b.confidence(),
        )
    }

    /// Union: `1 - (1 - f1)(1 - f2)`, `c1 * c2`.
    pub fn union(a: &Truth, b: &Truth) -> Self {
        let f = a.frequency() + b.frequency() - a.frequency() * b.frequency();
        Truth::new(f, a.confidence() * b.confidence())
    }

    /// Structural single-premise derivation: deduction against an analytic
    /// truth of confidence 0.9.
    pub fn structural_deduction(a: &Truth) -> Self {
        Truth::deduction(a, &Truth::new(1.0, 0.9))
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{:.2};{:.2}%", self.frequency.0, self.confidence.0)
    }
}
