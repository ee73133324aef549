//! Unit tests for KPI performance labels.

use super::*;

#[test]
fn label_boundaries() {
    let cases = [
        (1.00, PerformanceLabel::Exceeding),
        (0.999, PerformanceLabel::OnTrack),
        (0.80, PerformanceLabel::OnTrack),
        (0.799, PerformanceLabel::NeedsAttention),
        (0.60, PerformanceLabel::NeedsAttention),
        (0.599, PerformanceLabel::BelowTarget),
        (1.5, PerformanceLabel::Exceeding),
        (0.0, PerformanceLabel::BelowTarget),
        (f64::NAN, PerformanceLabel::BelowTarget),
    ];
    for (ratio, expected) in cases {
        assert_eq!(PerformanceLabel::from_ratio(ratio), expected, "ratio {ratio}");
    }
}

#[test]
fn record_ratio_uses_score_over_target() {
    let mut kpi = KpiRecord {
        id: "k1".to_string(),
        employee_id: "e1".to_string(),
        employee_name: "Ada".to_string(),
        score: 80.0,
        target: 100.0,
        period: "2024-Q2".to_string(),
        last_updated: "2024-06-30".to_string(),
    };
    assert_eq!(kpi.performance(), PerformanceLabel::OnTrack);
    assert_eq!(kpi.percentage(), 80.0);

    kpi.score = 59.9;
    assert_eq!(kpi.performance(), PerformanceLabel::BelowTarget);

    kpi.score = 0.0;
    kpi.target = 0.0;
    assert_eq!(kpi.performance(), PerformanceLabel::BelowTarget);

    kpi.score = 5.0;
    assert_eq!(kpi.performance(), PerformanceLabel::Exceeding);
    assert_eq!(kpi.performance().to_string(), "Exceeding");
}

#[test]
fn progress_is_capped_at_full() {
    let mut kpi = KpiRecord {
        id: "k1".to_string(),
        employee_id: "e1".to_string(),
        employee_name: "Ada".to_string(),
        score: 130.0,
        target: 100.0,
        period: "2024-Q2".to_string(),
        last_updated: "2024-06-30".to_string(),
    };
    assert_eq!(kpi.percentage(), 130.0);
    assert_eq!(kpi.progress(), 100.0);

    kpi.score = 72.4;
    assert_eq!(kpi.progress(), 72.0);

    kpi.score = 5.0;
    kpi.target = 0.0;
    assert_eq!(kpi.progress(), 100.0);

    kpi.score = 0.0;
    assert_eq!(kpi.progress(), 0.0);
}

#[test]
fn score_input_must_be_numeric() {
    assert_eq!(parse_score("87.5"), Ok(87.5));
    assert_eq!(parse_score(""), Err(ValidationError::Required));
    assert!(matches!(parse_score("great"), Err(ValidationError::InvalidFormat(_))));
}
