//! Main injection filter.
//!
//! Walks the signature registry over an input, derives a confidence score
//! and risk level, and attaches a sanitized rendition when anything matched.

use serde::{Deserialize, Serialize};

use crate::models::{DetectionResult, RiskLevel};
use crate::patterns::{default_categories, PatternCategory};
use crate::sanitize::Sanitizer;

/// Tunable scoring policy for the filter.
///
/// The thresholds map final confidence to a risk level; the bonuses refine
/// the base category weight. Defaults match the calibrated production
/// values; they are data, not business rules baked into detection code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Confidence at or above this is Critical.
    pub critical_threshold: f64,
    /// Confidence at or above this is High.
    pub high_threshold: f64,
    /// Confidence at or above this is Medium.
    pub medium_threshold: f64,
    /// Confidence at or above this is Low; below is Safe.
    pub low_threshold: f64,
    /// Added per extra matched category beyond the first.
    pub multi_category_bonus: f64,
    /// Added when the whole input is upper-case shouting.
    pub shouting_bonus: f64,
    /// Minimum input length, in characters, for the shouting bonus.
    pub shouting_min_len: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            critical_threshold: 0.9,
            high_threshold: 0.7,
            medium_threshold: 0.5,
            low_threshold: 0.3,
            multi_category_bonus: 0.05,
            shouting_bonus: 0.10,
            shouting_min_len: 20,
        }
    }
}

impl FilterConfig {
    /// Map a final confidence score to a risk level.
    pub fn risk_for(&self, confidence: f64) -> RiskLevel {
        if confidence >= self.critical_threshold {
            RiskLevel::Critical
        } else if confidence >= self.high_threshold {
            RiskLevel::High
        } else if confidence >= self.medium_threshold {
            RiskLevel::Medium
        } else if confidence >= self.low_threshold {
            RiskLevel::Low
        } else {
            RiskLevel::Safe
        }
    }
}

/// The injection filter - pattern classifier plus sanitizer.
///
/// Pure with respect to callers: [`InjectionFilter::detect`] takes `&self`,
/// performs no I/O, and touches no shared state.
pub struct InjectionFilter {
    config: FilterConfig,
    categories: Vec<PatternCategory>,
    sanitizer: Sanitizer,
}

impl InjectionFilter {
    /// Filter with the seeded signature table and default scoring policy.
    pub fn new() -> Self {
        Self::with_config(FilterConfig::default())
    }

    /// Filter with the seeded signature table and a custom scoring policy.
    pub fn with_config(config: FilterConfig) -> Self {
        Self::with_categories(config, default_categories())
    }

    /// Filter over a caller-supplied signature registry.
    ///
    /// Use this to extend the seeded table with new attack classes, or to
    /// run a trimmed table in latency-sensitive deployments.
    pub fn with_categories(config: FilterConfig, categories: Vec<PatternCategory>) -> Self {
        Self {
            config,
            categories,
            sanitizer: Sanitizer::new(),
        }
    }

    /// Analyze one input string for injection attempts.
    ///
    /// Total over arbitrary input: unmatched input yields a
    /// [`RiskLevel::Safe`] result, never an error.
    pub fn detect(&self, input: &str) -> DetectionResult {
        let matched: Vec<&PatternCategory> = self
            .categories
            .iter()
            .filter(|c| c.matches(input))
            .collect();

        if matched.is_empty() {
            return DetectionResult::safe();
        }

        let confidence = self.score(input, &matched);
        let risk_level = self.config.risk_for(confidence);

        DetectionResult {
            detected: true,
            risk_level,
            categories: matched.iter().map(|c| c.name().to_string()).collect(),
            confidence,
            requires_human_review: risk_level.requires_review(),
            sanitized_input: Some(self.sanitizer.sanitize(input)),
        }
    }

    /// Sanitize an input without scoring it.
    pub fn sanitize(&self, input: &str) -> String {
        self.sanitizer.sanitize(input)
    }

    /// Final confidence: max category weight plus refinement bonuses.
    ///
    /// Combining matches can only raise the score - the result is always at
    /// least the strongest single category's weight, capped at 1.0.
    fn score(&self, input: &str, matched: &[&PatternCategory]) -> f64 {
        let mut confidence = matched.iter().map(|c| c.weight()).fold(0.0, f64::max);

        if matched.len() > 1 {
            let bonus = self.config.multi_category_bonus * (matched.len() - 1) as f64;
            confidence = (confidence + bonus).min(1.0);
        }

        if input.chars().count() > self.config.shouting_min_len && input == input.to_uppercase() {
            confidence = (confidence + self.config.shouting_bonus).min(1.0);
        }

        confidence
    }
}

impl Default for InjectionFilter {
    fn default() -> Self {
        Self::new()
    }
}
