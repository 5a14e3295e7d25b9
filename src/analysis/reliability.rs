//! Source reliability scoring
//!
//! Turns the per-tier source counts from `verification_audit` into a
//! weighted 0-100 score plus a fixed-order breakdown for the integrity
//! bar chart.

use serde::Serialize;

use super::types::VerificationAudit;

/// Smallest denominator used when normalizing the weighted sum
pub const MIN_DENOMINATOR: f64 = 5.0;

/// Scores above this are shown as strong
pub const STRONG_SCORE_ABOVE: u8 = 70;

/// Trust tier of a cited source
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceTier {
    /// Golden-list outlets
    TopTier,
    /// Consensus / major media
    MajorMedia,
    /// Everything else found on the web
    OtherWeb,
}

impl SourceTier {
    /// Tiers in display order, most trusted first
    pub fn all() -> &'static [SourceTier] {
        &[SourceTier::TopTier, SourceTier::MajorMedia, SourceTier::OtherWeb]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceTier::TopTier => "Top Tier",
            SourceTier::MajorMedia => "Major Media",
            SourceTier::OtherWeb => "Other Web",
        }
    }

    /// Contribution of one source of this tier to the weighted sum
    pub fn weight(&self) -> f64 {
        match self {
            SourceTier::TopTier => 1.0,
            SourceTier::MajorMedia => 0.55,
            SourceTier::OtherWeb => 0.1,
        }
    }
}

/// One bar of the breakdown
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TierCount {
    pub tier: SourceTier,
    pub label: &'static str,
    pub count: u32,
}

/// Weighted reliability of a verdict's sources
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ReliabilitySummary {
    /// 0-100
    pub score: u8,
    pub weighted_sum: f64,
    /// Always [TopTier, MajorMedia, OtherWeb]
    pub breakdown: [TierCount; 3],
}

impl ReliabilitySummary {
    pub fn from_audit(audit: &VerificationAudit) -> Self {
        score(audit.golden_count, audit.consensus_count, audit.raw_count)
    }

    pub fn is_strong(&self) -> bool {
        self.score > STRONG_SCORE_ABOVE
    }

    pub fn total_sources(&self) -> u64 {
        self.breakdown.iter().map(|row| row.count as u64).sum()
    }

    /// Largest single tier count, for scaling bars
    pub fn max_count(&self) -> u32 {
        self.breakdown.iter().map(|row| row.count).max().unwrap_or(0)
    }
}

/// Score tiered source counts
pub fn score(golden: u32, consensus: u32, raw: u32) -> ReliabilitySummary {
    let counts = [golden, consensus, raw];
    let tiers = SourceTier::all();

    let weighted_sum: f64 = tiers
        .iter()
        .zip(counts)
        .map(|(tier, count)| count as f64 * tier.weight())
        .sum();

    let max_possible = weighted_sum.max(MIN_DENOMINATOR);
    let percent = (weighted_sum / max_possible * 100.0).round().min(100.0);

    let row = |i: usize| TierCount {
        tier: tiers[i],
        label: tiers[i].label(),
        count: counts[i],
    };

    ReliabilitySummary {
        score: percent.max(0.0) as u8,
        weighted_sum,
        breakdown: [row(0), row(1), row(2)],
    }
}
