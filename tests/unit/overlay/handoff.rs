use super::*;

#[test]
fn shown_only_inside_its_window() {
    let cfg = HandoffConfig::default();
    let mut h = HandoffIndicator::new(false);
    h.start(Millis(1_000), &cfg);
    assert_eq!(h.pending_timers(), 2);

    h.advance_to(Millis(5_499));
    assert!(!h.is_visible());
    h.advance_to(Millis(5_500));
    assert!(h.is_visible());
    h.advance_to(Millis(5_999));
    assert!(h.is_visible());
    h.advance_to(Millis(6_000));
    assert!(!h.is_visible());
    assert_eq!(h.pending_timers(), 0);
}

#[test]
fn a_late_frame_that_skips_the_window_never_shows() {
    let cfg = HandoffConfig::default();
    let mut h = HandoffIndicator::new(false);
    h.start(Millis::ZERO, &cfg);
    h.advance_to(Millis(10_000));
    assert!(!h.is_visible());
    assert_eq!(h.sample(Millis(10_000), &cfg), None);
}

#[test]
fn reduced_motion_window_and_no_pulse() {
    let cfg = HandoffConfig::default();
    let mut h = HandoffIndicator::new(true);
    h.start(Millis::ZERO, &cfg);
    h.advance_to(Millis(2_000));
    let s = h.sample(Millis(2_100), &cfg).unwrap();
    assert_eq!(s.ring_radius_px, 0.0);
    assert_eq!(s.ring_opacity, 0.0);
    h.advance_to(Millis(2_200));
    assert!(!h.is_visible());
}

#[test]
fn pulse_grows_and_fades() {
    let cfg = HandoffConfig::default();
    let mut h = HandoffIndicator::new(false);
    h.start(Millis::ZERO, &cfg);
    h.advance_to(Millis(4_500));
    let early = h.sample(Millis(4_500), &cfg).unwrap();
    let late = h.sample(Millis(4_900), &cfg).unwrap();
    assert_eq!(early.ring_radius_px, cfg.core_radius_px);
    assert_eq!(early.ring_opacity, 0.5);
    assert!(late.ring_radius_px > early.ring_radius_px);
    assert!(late.ring_opacity < early.ring_opacity);
}

#[test]
fn pulse_is_timed_from_the_show_deadline() {
    let cfg = HandoffConfig::default();
    let mut h = HandoffIndicator::new(false);
    h.start(Millis::ZERO, &cfg);
    h.advance_to(Millis(4_800));
    let s = h.sample(Millis(4_800), &cfg).unwrap();
    assert!(s.ring_radius_px > cfg.core_radius_px);
    assert!(s.ring_opacity < 0.5);
}

#[test]
fn cancel_drops_timers() {
    let cfg = HandoffConfig::default();
    let mut h = HandoffIndicator::new(false);
    h.start(Millis::ZERO, &cfg);
    h.cancel();
    assert_eq!(h.pending_timers(), 0);
    h.advance_to(Millis(4_600));
    assert!(!h.is_visible());

    // A cancelled indicator cannot be restarted.
    h.start(Millis(5_000), &cfg);
    assert_eq!(h.pending_timers(), 0);
}

#[test]
fn config_validation() {
    HandoffConfig::default().validate().unwrap();
    let bad = HandoffConfig {
        transition_ms: 6_000,
        ..HandoffConfig::default()
    };
    assert!(bad.validate().is_err());
}
