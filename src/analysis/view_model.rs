//! Result view model
//!
//! Assembles a raw [`VerificationResult`] into the normalized values the
//! report widgets render. Every absent field is replaced by a defined
//! default here, so nothing downstream has to deal with missing data.

use serde::Serialize;
use std::str::FromStr;

use super::reliability::ReliabilitySummary;
use super::sentiment::{classify, Sentiment};
use super::types::{SourceRef, TrendPoint, VerificationResult};

pub const DEFAULT_SOURCE_NAME: &str = "Verified Source";
pub const DEFAULT_SOURCE_KIND: &str = "Standard Source";
pub const DEFAULT_SOURCE_RELIABILITY: &str = "Verified";
pub const DEFAULT_LOGIC_AUDIT: &str = "Audit performed.";

/// Which narrative framing of a verdict to display
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Consensus,
    Alternative,
}

impl ViewMode {
    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Consensus, ViewMode::Alternative]
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Consensus => ViewMode::Alternative,
            ViewMode::Alternative => ViewMode::Consensus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Consensus => "Consensus",
            ViewMode::Alternative => "Alternative",
        }
    }

    /// Pick this mode's narrative from a result
    fn narrative<'a>(&self, raw: &'a VerificationResult) -> Option<&'a str> {
        match self {
            ViewMode::Consensus => raw.summary.as_deref(),
            ViewMode::Alternative => raw.counter_summary.as_deref(),
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewMode::Consensus => write!(f, "consensus"),
            ViewMode::Alternative => write!(f, "alternative"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "consensus" => Ok(ViewMode::Consensus),
            "alternative" | "alt" => Ok(ViewMode::Alternative),
            other => Err(format!(
                "Unknown view mode: {}. Use: consensus, alternative",
                other
            )),
        }
    }
}

/// A source chip with its hover-card details
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SourceView {
    pub url: Option<String>,
    /// Host name without a leading `www.`
    pub host: Option<String>,
    pub name: String,
    pub kind: String,
    pub badge: Option<String>,
    pub certified: bool,
    pub focus: Option<String>,
    pub reliability: String,
    /// False when the API sent no metadata for this source
    pub has_meta: bool,
}

impl SourceView {
    pub fn from_ref(source: &SourceRef) -> Self {
        let meta = source.meta.as_ref();
        let non_blank = |value: Option<&String>| {
            value
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            url: source.url.clone(),
            host: source.url.as_deref().and_then(host_of),
            name: non_blank(meta.and_then(|m| m.name.as_ref()))
                .unwrap_or_else(|| DEFAULT_SOURCE_NAME.to_string()),
            kind: non_blank(meta.and_then(|m| m.kind.as_ref()))
                .unwrap_or_else(|| DEFAULT_SOURCE_KIND.to_string()),
            badge: non_blank(meta.and_then(|m| m.badge.as_ref())),
            certified: meta.and_then(|m| m.certified).unwrap_or(false),
            focus: non_blank(meta.and_then(|m| m.focus.as_ref())),
            reliability: non_blank(meta.and_then(|m| m.reliability.as_ref()))
                .unwrap_or_else(|| DEFAULT_SOURCE_RELIABILITY.to_string()),
            has_meta: meta.is_some(),
        }
    }
}

fn host_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Everything the report widgets need for one verdict
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ViewModel {
    pub view_mode: ViewMode,
    /// Narrative for the selected mode, empty when absent
    pub verdict: String,
    pub verdict_missing: bool,
    /// 0-100
    pub certainty: u8,
    pub clarifications: Vec<String>,
    pub audit_trail: Vec<String>,
    pub sources: Vec<SourceView>,
    pub sentiment: Sentiment,
    pub reliability: ReliabilitySummary,
    pub trend: Vec<TrendPoint>,
    pub logic_audit: String,
}

impl ViewModel {
    /// Build the view model for a result in the given mode
    pub fn build(raw: &VerificationResult, view_mode: ViewMode) -> Self {
        let narrative = view_mode.narrative(raw).filter(|s| !s.trim().is_empty());

        Self {
            view_mode,
            verdict: narrative.unwrap_or_default().to_string(),
            verdict_missing: narrative.is_none(),
            certainty: certainty_percent(raw.certainty),
            clarifications: raw.clarifications.clone().unwrap_or_default(),
            audit_trail: raw.audit_history.clone().unwrap_or_default(),
            sources: raw
                .sources
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(SourceView::from_ref)
                .collect(),
            sentiment: classify(raw.bias_score.unwrap_or(0.0)),
            reliability: ReliabilitySummary::from_audit(
                &raw.verification_audit.unwrap_or_default(),
            ),
            trend: raw.trend_history.clone().unwrap_or_default(),
            logic_audit: raw
                .logic_audit
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_LOGIC_AUDIT)
                .to_string(),
        }
    }

    /// Stroke offset of the certainty ring (circumference 100)
    pub fn certainty_ring_offset(&self) -> u8 {
        100 - self.certainty
    }

    /// Clarifications with their two-digit display index ("01", "02", ...)
    pub fn numbered_clarifications(&self) -> impl Iterator<Item = (String, &str)> {
        self.clarifications
            .iter()
            .enumerate()
            .map(|(i, text)| (format!("{:02}", i + 1), text.as_str()))
    }

    pub fn certified_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.certified).count()
    }
}

fn certainty_percent(certainty: Option<f64>) -> u8 {
    match certainty {
        Some(value) if value.is_finite() => value.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}
