//! Terminal Report
//!
//! Renders a [`ViewModel`] as the dashboard's widgets in plain text:
//! verdict card with certainty ring, clarifications, audit trail, sources,
//! bias gauge, source integrity bars, trend sparkline and logic health.

use std::fmt::Write;

use crate::analysis::{TrendPoint, ViewModel};

const BAR_WIDTH: usize = 20;
const GAUGE_WIDTH: usize = 21;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the full report
pub fn render_text(vm: &ViewModel) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, vm);
    out
}

/// Render the view model as pretty JSON
pub fn render_json(vm: &ViewModel) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(vm)
}

fn write_report(out: &mut String, vm: &ViewModel) -> std::fmt::Result {
    writeln!(
        out,
        "VERIFIED VERDICT  [{}]    AI Certainty {}% {}",
        vm.view_mode.label(),
        vm.certainty,
        meter(vm.certainty as f64, 100.0, 10)
    )?;
    writeln!(out, "{}", "=".repeat(60))?;
    if vm.verdict_missing {
        writeln!(out, "(no {} narrative returned)", vm.view_mode)?;
    } else {
        writeln!(out, "{}", vm.verdict)?;
    }

    if !vm.clarifications.is_empty() {
        writeln!(out)?;
        writeln!(out, "Key Clarifications")?;
        for (number, text) in vm.numbered_clarifications() {
            writeln!(out, "  {}  {}", number, text)?;
        }
    }

    if !vm.audit_trail.is_empty() {
        writeln!(out)?;
        writeln!(out, "Audit Trail")?;
        for step in &vm.audit_trail {
            writeln!(out, "  ✓ {}", step)?;
        }
    }

    if !vm.sources.is_empty() {
        writeln!(out)?;
        writeln!(out, "Ground Truth Sources")?;
        for source in &vm.sources {
            let tick = if source.certified { " ✓" } else { "" };
            let host = source.host.as_deref().unwrap_or("-");
            write!(out, "  • {}{}  {}  [{}]", source.name, tick, host, source.kind)?;
            if let Some(badge) = &source.badge {
                write!(out, " {}", badge)?;
            }
            writeln!(out)?;
            if let Some(focus) = &source.focus {
                writeln!(out, "      {}", focus)?;
            }
            writeln!(out, "      Reliability: {}", source.reliability)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Sentiment Bias")?;
    writeln!(out, "  {}", gauge(vm.sentiment.score))?;
    writeln!(out, "  ● {}", vm.sentiment.label)?;
    writeln!(out, "  Bias Intensity Index: {}", vm.sentiment.intensity_index())?;

    writeln!(out)?;
    let strength = if vm.reliability.is_strong() { "strong" } else { "weak" };
    writeln!(
        out,
        "Source Integrity    Source Score: {}% ({})",
        vm.reliability.score, strength
    )?;
    let max = vm.reliability.max_count().max(1) as f64;
    for row in &vm.reliability.breakdown {
        writeln!(
            out,
            "  {:<12} {} {}",
            row.label,
            meter(row.count as f64, max, BAR_WIDTH),
            row.count
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Temporal Trend")?;
    match (vm.trend.first(), vm.trend.last()) {
        (Some(first), Some(last)) => {
            let peak = vm
                .trend
                .iter()
                .map(|p| p.volume)
                .fold(f64::NEG_INFINITY, f64::max);
            writeln!(
                out,
                "  {}  {} -> {} (peak {})",
                sparkline(&vm.trend),
                date_label(first),
                date_label(last),
                peak
            )?;
            if !is_chronological(&vm.trend) {
                tracing::warn!(points = vm.trend.len(), "Trend history is not in date order");
                writeln!(out, "  (dates out of order)")?;
            }
        }
        _ => writeln!(out, "  No trend data")?,
    }

    writeln!(out)?;
    writeln!(out, "Logic Health")?;
    writeln!(out, "  \"{}\"", vm.logic_audit)?;
    writeln!(out, "  Analysis Complete")?;

    Ok(())
}

/// `Feb 1, 2026` for ISO dates, the raw label otherwise
fn date_label(point: &TrendPoint) -> String {
    point
        .parsed_date()
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| point.date.clone())
}

/// True unless two parseable dates appear in decreasing order
pub fn is_chronological(points: &[TrendPoint]) -> bool {
    let dates: Vec<_> = points.iter().filter_map(TrendPoint::parsed_date).collect();
    dates.windows(2).all(|w| w[0] <= w[1])
}

/// Horizontal bar of `width` cells filled in proportion to `value / max`
pub fn meter(value: f64, max: f64, width: usize) -> String {
    let ratio = if max > 0.0 && value.is_finite() {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Semicircle gauge flattened to a line; the needle sits at `score` of the width
pub fn gauge(score: f64) -> String {
    let position = if score.is_finite() {
        (score.clamp(0.0, 1.0) * (GAUGE_WIDTH - 1) as f64).round() as usize
    } else {
        GAUGE_WIDTH - 1
    };
    let mut line = String::with_capacity(GAUGE_WIDTH + 2);
    line.push('[');
    for i in 0..GAUGE_WIDTH {
        line.push(if i == position { '●' } else { '─' });
    }
    line.push(']');
    line
}

/// One block character per point, scaled between the series min and max
pub fn sparkline(points: &[TrendPoint]) -> String {
    let volumes: Vec<f64> = points
        .iter()
        .map(|p| if p.volume.is_finite() { p.volume } else { 0.0 })
        .collect();
    let min = volumes.iter().copied().fold(f64::INFINITY, f64::min);
    let max = volumes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let top = SPARK_LEVELS.len() - 1;

    volumes
        .iter()
        .map(|v| {
            if range <= 0.0 {
                SPARK_LEVELS[top / 2]
            } else {
                SPARK_LEVELS[((v - min) / range * top as f64).round() as usize]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        SourceMeta, SourceRef, VerificationAudit, VerificationResult, ViewMode,
    };

    #[test]
    fn test_meter() {
        assert_eq!(meter(0.0, 100.0, 4), "░░░░");
        assert_eq!(meter(50.0, 100.0, 4), "██░░");
        assert_eq!(meter(500.0, 100.0, 4), "████");
        assert_eq!(meter(3.0, 0.0, 2), "░░");
    }

    #[test]
    fn test_gauge_needle() {
        assert!(gauge(0.0).starts_with("[●"));
        assert!(gauge(1.0).ends_with("●]"));
        assert_eq!(gauge(0.5).chars().position(|c| c == '●'), Some(11));
        assert_eq!(gauge(-4.0), gauge(0.0));
    }

    #[test]
    fn test_sparkline() {
        let points = vec![
            TrendPoint::new("d1", 0.0),
            TrendPoint::new("d2", 7.0),
            TrendPoint::new("d3", 14.0),
        ];
        assert_eq!(sparkline(&points), "▁▅█");

        let flat = vec![TrendPoint::new("d1", 3.0), TrendPoint::new("d2", 3.0)];
        assert_eq!(sparkline(&flat), "▄▄");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_chronological_order() {
        let ordered = vec![
            TrendPoint::new("2026-01-30", 1.0),
            TrendPoint::new("week 5", 2.0),
            TrendPoint::new("2026-02-01", 3.0),
        ];
        assert!(is_chronological(&ordered));
        assert!(is_chronological(&[]));

        let shuffled = vec![
            TrendPoint::new("2026-02-01", 1.0),
            TrendPoint::new("2026-01-30", 2.0),
        ];
        assert!(!is_chronological(&shuffled));
    }

    #[test]
    fn test_trend_labels() {
        let raw = VerificationResult {
            trend_history: Some(vec![
                TrendPoint::new("2026-03-04", 5.0),
                TrendPoint::new("Day 2", 1.0),
                TrendPoint::new("2026-03-01", 2.0),
            ]),
            ..VerificationResult::default()
        };
        let text = render_text(&ViewModel::build(&raw, ViewMode::Consensus));

        assert!(text.contains("Mar 4, 2026 -> Mar 1, 2026 (peak 5)"));
        assert!(text.contains("(dates out of order)"));

        let labels = VerificationResult {
            trend_history: Some(vec![TrendPoint::new("Day 1", 1.0), TrendPoint::new("Day 2", 1.0)]),
            ..VerificationResult::default()
        };
        let text = render_text(&ViewModel::build(&labels, ViewMode::Consensus));
        assert!(text.contains("Day 1 -> Day 2 (peak 1)"));
    }

    #[test]
    fn test_render_full_report() {
        let raw = VerificationResult {
            summary: Some("The claim is false.".to_string()),
            certainty: Some(88.0),
            bias_score: Some(0.7),
            clarifications: Some(vec!["No such circular exists".to_string()]),
            audit_history: Some(vec!["Checked gazette".to_string()]),
            sources: Some(vec![SourceRef::new("https://www.thehindu.com/a").meta(
                SourceMeta {
                    name: Some("The Hindu".to_string()),
                    certified: Some(true),
                    ..SourceMeta::default()
                },
            )]),
            verification_audit: Some(VerificationAudit::new(4, 2, 1)),
            trend_history: Some(vec![
                TrendPoint::new("2026-02-01", 1.0),
                TrendPoint::new("2026-02-02", 9.0),
            ]),
            ..VerificationResult::default()
        };
        let text = render_text(&ViewModel::build(&raw, ViewMode::Consensus));

        assert!(text.contains("AI Certainty 88%"));
        assert!(text.contains("The claim is false."));
        assert!(text.contains("  01  No such circular exists"));
        assert!(text.contains("✓ Checked gazette"));
        assert!(text.contains("The Hindu ✓  thehindu.com  [Standard Source]"));
        assert!(text.contains("Highly Biased / Loaded"));
        assert!(text.contains("Bias Intensity Index: 70.0%"));
        // 4 + 1.1 + 0.1 = 5.2 -> 100%
        assert!(text.contains("Source Score: 100% (strong)"));
        assert!(text.contains("Feb 1, 2026 -> Feb 2, 2026 (peak 9)"));
        assert!(!text.contains("out of order"));
        assert!(text.contains("\"Audit performed.\""));
    }

    #[test]
    fn test_render_empty_result() {
        let vm = ViewModel::build(&VerificationResult::default(), ViewMode::Alternative);
        let text = render_text(&vm);

        assert!(text.contains("(no alternative narrative returned)"));
        assert!(text.contains("No trend data"));
        assert!(text.contains("Source Score: 0% (weak)"));
        assert!(!text.contains("Key Clarifications"));
    }

    #[test]
    fn test_render_json() {
        let vm = ViewModel::build(&VerificationResult::default(), ViewMode::Consensus);
        let json: serde_json::Value = serde_json::from_str(&render_json(&vm).unwrap()).unwrap();
        assert_eq!(json["view_mode"], "consensus");
        assert_eq!(json["reliability"]["breakdown"][0]["tier"], "top_tier");
        assert_eq!(json["sentiment"]["category"], "factual_neutral");
    }
}
