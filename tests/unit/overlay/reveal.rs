use super::*;

fn at(ms: u64) -> Millis {
    Millis(ms)
}

#[test]
fn stays_hidden_until_armed() {
    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, false);
    for ms in [0, 5_000, 60_000] {
        assert!(!o.update(at(ms), &cfg));
    }
    assert_eq!(o.state(), OverlayState::Hidden);
    assert!(!o.is_armed());
}

#[test]
fn shows_after_the_reveal_delay() {
    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, false);
    o.notify_terminal(at(5_200));
    assert!(!o.update(at(6_599), &cfg));
    assert_eq!(o.state(), OverlayState::Hidden);
    assert!(o.update(at(6_600), &cfg));
    assert_eq!(o.state(), OverlayState::Shown);
    assert_eq!(o.shown_at(), Some(at(6_600)));

    // Only the first transition reports.
    assert!(!o.update(at(7_000), &cfg));
}

#[test]
fn reduced_motion_uses_short_delay_and_jumps_to_end() {
    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, true);
    o.notify_terminal(at(1_400));
    assert!(!o.update(at(1_699), &cfg));
    assert!(o.update(at(1_700), &cfg));

    let s = o.sample();
    assert_eq!(s.container.opacity, 1.0);
    assert_eq!(s.container.scale, 1.0);
    assert_eq!(s.subtitle.opacity, 1.0);
    assert!(s.letters.iter().all(|l| l.opacity == 1.0 && l.y_px == 0.0));
}

#[test]
fn rearming_does_not_move_the_reveal() {
    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, false);
    o.notify_terminal(at(1_000));
    o.notify_terminal(at(9_000));
    assert!(o.update(at(2_400), &cfg));
}

#[test]
fn container_starts_from_tilted_and_settles() {
    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, false);
    o.notify_terminal(at(0));
    o.update(at(1_400), &cfg);
    let c = o.sample().container;
    assert_eq!(c.opacity, 0.0);
    assert_eq!(c.y_px, 80.0);
    assert_eq!(c.scale, 0.5);
    assert_eq!(c.rotate_x_deg, 90.0);

    o.update(at(3_200), &cfg);
    let c = o.sample().container;
    assert_eq!(c.y_px, 0.0);
    assert_eq!(c.scale, 1.0);
    assert_eq!(c.rotate_x_deg, 0.0);

    // Four seconds after mount the breathing loop is back at full opacity.
    o.update(at(5_400), &cfg);
    assert!((o.sample().container.opacity - 1.0).abs() < 1e-12);
}

#[test]
fn letters_stagger_in_order() {
    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, false);
    o.notify_terminal(at(0));
    o.update(at(1_600), &cfg);
    o.update(at(1_600), &cfg);
    let letters = &o.sample().letters;
    assert_eq!(letters.len(), cfg.wordmark.chars().count());
    // All letters have finished by 1.6 s (last starts at 0.45 s, lasts 0.8 s).
    assert!(letters.iter().all(|l| l.opacity == 1.0));

    let mut o = RevealOverlay::new(&cfg, false);
    o.notify_terminal(at(0));
    o.update(at(1_400), &cfg);
    let letters = &o.sample().letters;
    for pair in letters.windows(2) {
        assert!(pair[0].opacity >= pair[1].opacity);
    }
}

#[test]
fn subtitle_waits_for_its_delay() {
    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, false);
    o.notify_terminal(at(0));
    o.update(at(2_800), &cfg);
    assert_eq!(o.sample().subtitle.opacity, 0.0);
    o.update(at(4_000), &cfg);
    assert_eq!(o.sample().subtitle.opacity, 1.0);
    assert_eq!(o.sample().subtitle.y_px, 0.0);
}

#[test]
fn breathing_dips_to_floor_mid_period() {
    assert_eq!(breathing(0.0, 4.0, 0.85), 1.0);
    assert!((breathing(2.0, 4.0, 0.85) - 0.85).abs() < 1e-12);
    assert!((breathing(4.0, 4.0, 0.85) - 1.0).abs() < 1e-12);

    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, false);
    o.notify_terminal(at(0));
    o.update(at(1_400 + 2_000), &cfg);
    assert!((o.sample().container.opacity - 0.85).abs() < 1e-9);
}

#[test]
fn breathing_runs_during_the_entrance() {
    let cfg = OverlayConfig::default();
    let mut o = RevealOverlay::new(&cfg, false);
    o.notify_terminal(at(0));
    o.update(at(2_400), &cfg);
    let k = tween(Ease::InOutCubic, 2.4, 1.4, cfg.container_s);
    let expected = k * breathing(1.0, cfg.breathe_period_s, cfg.breathe_floor);
    assert!(k > 0.0 && k < 1.0);
    assert!((o.sample().container.opacity - expected).abs() < 1e-12);
    assert!(o.sample().container.opacity < k);
}

#[test]
fn config_validation() {
    let cfg = OverlayConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.href, "/contact");

    let mut bad = cfg.clone();
    bad.breathe_period_s = 0.0;
    assert!(bad.validate().is_err());

    let mut bad = cfg.clone();
    bad.color = HexColor::from("blue");
    assert!(bad.validate().is_err());
}
