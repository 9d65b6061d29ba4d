use super::*;

#[test]
fn phases_chain_in_total_order() {
    let mut seen = vec![Phase::Initial];
    let mut p = Phase::Initial;
    while let Some(n) = p.next() {
        assert!(n > p);
        seen.push(n);
        p = n;
    }
    assert_eq!(seen, Phase::ALL.to_vec());
    assert!(Phase::Merged.is_terminal());
    assert!(!Phase::Approach.is_terminal());
}

#[test]
fn stock_schedules_validate_and_reduced_is_shorter() {
    PhaseSchedule::NORMAL.validate().unwrap();
    PhaseSchedule::REDUCED.validate().unwrap();
    assert!(PhaseSchedule::REDUCED.total_ms() <= PhaseSchedule::NORMAL.total_ms());
}

#[test]
fn non_increasing_schedule_is_rejected() {
    let s = PhaseSchedule {
        primary_ms: 800,
        secondary_ms: 800,
        approach_ms: 900,
        merged_ms: 1000,
    };
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("secondary"));
}

#[test]
fn thresholds_quantize_progress() {
    let t = PhaseThresholds::default();
    assert_eq!(t.phase_for(0.0), Phase::Initial);
    assert_eq!(t.phase_for(0.19), Phase::Initial);
    assert_eq!(t.phase_for(0.2), Phase::Primary);
    assert_eq!(t.phase_for(0.45), Phase::Secondary);
    assert_eq!(t.phase_for(0.6), Phase::Approach);
    assert_eq!(t.phase_for(0.95), Phase::Merged);
    assert_eq!(t.phase_for(7.0), Phase::Merged);
    assert_eq!(t.phase_for(-1.0), Phase::Initial);
}

#[test]
fn invalid_thresholds_are_rejected() {
    let mut t = PhaseThresholds::default();
    t.approach = 0.3;
    assert!(t.validate().is_err());
    let mut t = PhaseThresholds::default();
    t.merged = f64::NAN;
    assert!(t.validate().is_err());
}

#[test]
fn scroll_progress_handles_short_documents() {
    assert_eq!(scroll_progress(100.0, 800.0, 800.0), 0.0);
    assert_eq!(scroll_progress(100.0, 600.0, 800.0), 0.0);
    assert_eq!(scroll_progress(200.0, 1200.0, 800.0), 0.5);
    assert_eq!(scroll_progress(900.0, 1200.0, 800.0), 1.0);
}

#[test]
fn phase_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&Phase::Merged).unwrap(), r#""merged""#);
    assert_eq!(Phase::Approach.to_string(), "approach");
}
