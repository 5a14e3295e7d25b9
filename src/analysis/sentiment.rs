//! Sentiment classification
//!
//! Maps the API's bias score onto one of four ordered buckets used by the
//! bias gauge. Thresholds are applied literally; scores outside [0, 1] are
//! accepted without validation.

use serde::Serialize;

/// Upper bound (exclusive) of the "Factual & Neutral" bucket
pub const NEUTRAL_BELOW: f64 = 0.15;
/// Upper bound (exclusive) of the "Balanced Reporting" bucket
pub const BALANCED_BELOW: f64 = 0.35;
/// Upper bound (exclusive) of the "Mildly Opinionated" bucket
pub const OPINIONATED_BELOW: f64 = 0.65;

/// Discrete sentiment bucket, ordered from least to most biased
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    FactualNeutral,
    BalancedReporting,
    MildlyOpinionated,
    HighlyBiased,
}

impl SentimentCategory {
    /// Get all categories in ascending order of bias
    pub fn all() -> &'static [SentimentCategory] {
        &[
            SentimentCategory::FactualNeutral,
            SentimentCategory::BalancedReporting,
            SentimentCategory::MildlyOpinionated,
            SentimentCategory::HighlyBiased,
        ]
    }

    /// Select the bucket for a score
    pub fn for_score(score: f64) -> Self {
        if score < NEUTRAL_BELOW {
            SentimentCategory::FactualNeutral
        } else if score < BALANCED_BELOW {
            SentimentCategory::BalancedReporting
        } else if score < OPINIONATED_BELOW {
            SentimentCategory::MildlyOpinionated
        } else {
            // NaN fails every comparison above and lands here.
            SentimentCategory::HighlyBiased
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentCategory::FactualNeutral => "Factual & Neutral",
            SentimentCategory::BalancedReporting => "Balanced Reporting",
            SentimentCategory::MildlyOpinionated => "Mildly Opinionated",
            SentimentCategory::HighlyBiased => "Highly Biased / Loaded",
        }
    }

    /// Display tone used by the gauge label
    pub fn tone(&self) -> Tone {
        match self {
            SentimentCategory::FactualNeutral => Tone::Emerald,
            SentimentCategory::BalancedReporting => Tone::Blue,
            SentimentCategory::MildlyOpinionated => Tone::Amber,
            SentimentCategory::HighlyBiased => Tone::Rose,
        }
    }
}

impl std::fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Color family of a widget element
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Emerald,
    Blue,
    Amber,
    Rose,
}

/// Classified sentiment for one bias score
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Sentiment {
    pub score: f64,
    pub category: SentimentCategory,
    pub label: &'static str,
    pub tone: Tone,
}

impl Sentiment {
    /// Gauge needle angle in degrees, 0 = far left
    pub fn needle_degrees(&self) -> f64 {
        self.score * 180.0
    }

    /// "Bias Intensity Index" as shown under the gauge, e.g. "21.0%"
    pub fn intensity_index(&self) -> String {
        format!("{:.1}%", self.score * 100.0)
    }
}

/// Classify a bias score
pub fn classify(score: f64) -> Sentiment {
    let category = SentimentCategory::for_score(score);
    Sentiment {
        score,
        category,
        label: category.label(),
        tone: category.tone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_labels() {
        assert_eq!(classify(0.0).label, "Factual & Neutral");
        assert_eq!(classify(0.1499).label, "Factual & Neutral");
        assert_eq!(classify(0.2).label, "Balanced Reporting");
        assert_eq!(classify(0.5).label, "Mildly Opinionated");
        assert_eq!(classify(0.9).label, "Highly Biased / Loaded");
    }

    #[test]
    fn test_boundaries_belong_to_higher_bucket() {
        assert_eq!(classify(0.15).category, SentimentCategory::BalancedReporting);
        assert_eq!(classify(0.35).category, SentimentCategory::MildlyOpinionated);
        assert_eq!(classify(0.65).category, SentimentCategory::HighlyBiased);
    }

    #[test]
    fn test_out_of_range_scores() {
        assert_eq!(classify(-3.0).category, SentimentCategory::FactualNeutral);
        assert_eq!(classify(7.5).category, SentimentCategory::HighlyBiased);
        assert_eq!(classify(f64::NAN).category, SentimentCategory::HighlyBiased);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = SentimentCategory::FactualNeutral;
        for step in 0..=200 {
            let category = classify(step as f64 / 200.0).category;
            assert!(category >= previous);
            previous = category;
        }
        assert_eq!(previous, SentimentCategory::HighlyBiased);
    }

    #[test]
    fn test_gauge_values() {
        let sentiment = classify(0.21);
        assert_eq!(sentiment.tone, Tone::Blue);
        assert!((sentiment.needle_degrees() - 37.8).abs() < 1e-9);
        assert_eq!(sentiment.intensity_index(), "21.0%");
    }
}
