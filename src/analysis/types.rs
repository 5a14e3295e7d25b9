//! Wire types for the verification API
//!
//! These mirror the JSON body returned by `/api/search` and
//! `/api/verify-media`. The producer may omit or null any field, so every
//! top-level field is optional here; defaults are applied when the view
//! model is built, never at decode time.

use serde::{Deserialize, Deserializer, Serialize};

/// Raw verdict returned by the verification API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VerificationResult {
    /// Consensus framing of the verdict
    #[serde(default)]
    pub summary: Option<String>,
    /// Alternative framing of the same verdict
    #[serde(default)]
    pub counter_summary: Option<String>,
    /// Confidence percentage, 0-100
    #[serde(default)]
    pub certainty: Option<f64>,
    /// Editorial slant intensity, 0.0 (neutral) to 1.0
    #[serde(default)]
    pub bias_score: Option<f64>,
    #[serde(default)]
    pub clarifications: Option<Vec<String>>,
    #[serde(default)]
    pub audit_history: Option<Vec<String>>,
    #[serde(default)]
    pub sources: Option<Vec<SourceRef>>,
    #[serde(default)]
    pub verification_audit: Option<VerificationAudit>,
    /// Chronologically ordered by the producer
    #[serde(default)]
    pub trend_history: Option<Vec<TrendPoint>>,
    #[serde(default)]
    pub logic_audit: Option<String>,
}

impl VerificationResult {
    /// Decode a response body
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        // A bare `null` body is treated as an empty verdict.
        let parsed: Option<Self> = serde_json::from_slice(body)?;
        Ok(parsed.unwrap_or_default())
    }
}

/// A cited source, optionally carrying display metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawSource")]
pub struct SourceRef {
    pub url: Option<String>,
    pub meta: Option<SourceMeta>,
}

impl SourceRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            meta: None,
        }
    }

    /// Builder method: attach metadata
    pub fn meta(mut self, meta: SourceMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

/// Accepted encodings of a source entry.
///
/// Older API revisions sent plain URL strings instead of objects.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSource {
    Url(String),
    Entry {
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        meta: Option<SourceMeta>,
    },
    Missing,
}

impl From<RawSource> for SourceRef {
    fn from(raw: RawSource) -> Self {
        match raw {
            RawSource::Url(url) => SourceRef {
                url: Some(url),
                meta: None,
            },
            RawSource::Entry { url, meta } => SourceRef { url, meta },
            RawSource::Missing => SourceRef::default(),
        }
    }
}

/// Display metadata for a source
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceMeta {
    #[serde(default)]
    pub name: Option<String>,
    /// Outlet type, e.g. "Public Broadcaster"
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub certified: Option<bool>,
    #[serde(default)]
    pub focus: Option<String>,
    #[serde(default)]
    pub reliability: Option<String>,
}

/// Source counts by trust tier
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationAudit {
    #[serde(default, rename = "goldenCount", deserialize_with = "lenient_count")]
    pub golden_count: u32,
    #[serde(default, rename = "consensusCount", deserialize_with = "lenient_count")]
    pub consensus_count: u32,
    #[serde(default, rename = "rawCount", deserialize_with = "lenient_count")]
    pub raw_count: u32,
}

impl VerificationAudit {
    pub fn new(golden_count: u32, consensus_count: u32, raw_count: u32) -> Self {
        Self {
            golden_count,
            consensus_count,
            raw_count,
        }
    }
}

/// One sample of the claim's coverage volume over time
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume: f64,
}

impl TrendPoint {
    pub fn new(date: impl Into<String>, volume: f64) -> Self {
        Self {
            date: date.into(),
            volume,
        }
    }

    /// Parse the date label as an ISO calendar date, if it is one
    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Counts arrive as JSON numbers that are not always integers (`3.0`),
/// and may be null. Negative values are floored at zero.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if !value.is_finite() || value <= 0.0 {
        return Ok(0);
    }
    Ok(value.round().min(u32::MAX as f64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_payload() {
        let body = r#"{
            "summary": "The scheme was announced but not enacted.",
            "counter_summary": "Some outlets report it as already in force.",
            "certainty": 82,
            "bias_score": 0.21,
            "clarifications": ["Announced in cabinet", "No gazette notification"],
            "audit_history": ["Searched golden list", "Cross-checked wire services"],
            "sources": [
                {"url": "https://www.pib.gov.in/x", "meta": {"name": "PIB", "type": "Government", "certified": true}},
                {"url": "https://example.org/y"}
            ],
            "verification_audit": {"goldenCount": 3, "consensusCount": 4, "rawCount": 10},
            "trend_history": [{"date": "2026-01-01", "volume": 12}, {"date": "2026-01-02", "volume": 30}],
            "logic_audit": "No circular citations."
        }"#;

        let result = VerificationResult::from_json(body.as_bytes()).unwrap();
        assert_eq!(result.certainty, Some(82.0));
        assert_eq!(result.sources.as_ref().unwrap().len(), 2);
        let meta = result.sources.as_ref().unwrap()[0].meta.as_ref().unwrap();
        assert_eq!(meta.kind.as_deref(), Some("Government"));
        assert_eq!(meta.certified, Some(true));
        assert_eq!(
            result.verification_audit,
            Some(VerificationAudit::new(3, 4, 10))
        );
        assert_eq!(result.trend_history.unwrap()[1].volume, 30.0);
    }

    #[test]
    fn test_nulls_and_missing_fields() {
        let body = r#"{"summary": null, "sources": null, "verification_audit": {"goldenCount": null}}"#;
        let result = VerificationResult::from_json(body.as_bytes()).unwrap();

        assert!(result.summary.is_none());
        assert!(result.sources.is_none());
        assert_eq!(result.verification_audit, Some(VerificationAudit::default()));
        assert!(result.trend_history.is_none());
    }

    #[test]
    fn test_null_body() {
        let result = VerificationResult::from_json(b"null").unwrap();
        assert_eq!(result, VerificationResult::default());
    }

    #[test]
    fn test_legacy_string_sources() {
        let body = r#"{"sources": ["https://www.reuters.com/a", null, {"meta": {"name": "Wire"}}]}"#;
        let result = VerificationResult::from_json(body.as_bytes()).unwrap();
        let sources = result.sources.unwrap();

        assert_eq!(sources[0], SourceRef::new("https://www.reuters.com/a"));
        assert_eq!(sources[1], SourceRef::default());
        assert!(sources[2].url.is_none());
        assert_eq!(
            sources[2].meta.as_ref().and_then(|m| m.name.as_deref()),
            Some("Wire")
        );
    }

    #[test]
    fn test_lenient_counts() {
        let body = r#"{"goldenCount": 2.0, "consensusCount": -4, "rawCount": 7.6}"#;
        let audit: VerificationAudit = serde_json::from_str(body).unwrap();
        assert_eq!(audit, VerificationAudit::new(2, 0, 8));
    }

    #[test]
    fn test_trend_point_dates() {
        let point: TrendPoint = serde_json::from_str(r#"{"date": "2026-03-04", "volume": null}"#).unwrap();
        assert_eq!(point.volume, 0.0);
        assert_eq!(
            point.parsed_date(),
            chrono::NaiveDate::from_ymd_opt(2026, 3, 4)
        );
        assert!(TrendPoint::new("Mar 4", 1.0).parsed_date().is_none());
    }
}
