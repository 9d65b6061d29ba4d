use super::*;

fn input(time_s: f64, phase: Phase, reduced: bool) -> FrameInput {
    FrameInput {
        time_s,
        dt_s: 1.0 / 60.0,
        phase,
        reduced_motion: reduced,
    }
}

fn run(a: &mut LogoAnimator, cfg: &LogoConfig, phase: Phase, reduced: bool, frames: u32) {
    for f in 0..frames {
        a.update(&input(f64::from(f) / 60.0, phase, reduced), cfg, 0.0);
    }
}

#[test]
fn halves_mirror_each_other() {
    let cfg = LogoConfig::default();
    for phase in Phase::ALL {
        let (tp, tr) = cfg.target(LogoHalf::Top, phase, 120.0);
        let (bp, br) = cfg.target(LogoHalf::Bottom, phase, 120.0);
        assert_eq!(tp.y, -bp.y);
        if phase == Phase::Secondary {
            continue;
        }
        assert_eq!(tr.x, -br.x);
        assert_eq!(tr.z, -br.z);
    }
}

#[test]
fn bottom_secondary_tilts_further_than_the_mirror() {
    let cfg = LogoConfig::default();
    let (_, top) = cfg.target(LogoHalf::Top, Phase::Secondary, 0.0);
    let (_, bottom) = cfg.target(LogoHalf::Bottom, Phase::Secondary, 0.0);
    assert_eq!(top.x, -PI / 10.0);
    assert_eq!(bottom.x, PI / 9.0);
    assert_eq!(bottom.y, -top.y);

    let mut mirrored = cfg.clone();
    mirrored.targets.secondary.bottom_rotation = None;
    let (_, bottom) = mirrored.target(LogoHalf::Bottom, Phase::Secondary, 0.0);
    assert_eq!(bottom.x, PI / 10.0);
}

#[test]
fn gap_widens_the_initial_offset() {
    let cfg = LogoConfig::default();
    let (narrow, _) = cfg.target(LogoHalf::Top, Phase::Initial, 0.0);
    let (wide, _) = cfg.target(LogoHalf::Top, Phase::Initial, 400.0);
    assert!(wide.y > narrow.y);
    let (merged_narrow, _) = cfg.target(LogoHalf::Top, Phase::Merged, 0.0);
    let (merged_wide, _) = cfg.target(LogoHalf::Top, Phase::Merged, 400.0);
    assert_eq!(merged_narrow, merged_wide);
}

#[test]
fn hidden_until_primary_then_fades_in() {
    let cfg = LogoConfig::default();
    let mut a = LogoAnimator::new(LogoHalf::Top, &cfg, 0.0);
    run(&mut a, &cfg, Phase::Initial, false, 30);
    assert!(!a.state().visible);
    assert_eq!(a.state().opacity, 0.0);

    run(&mut a, &cfg, Phase::Primary, false, 240);
    assert!(a.state().visible);
    assert!(a.state().opacity > 0.99);
}

#[test]
fn converges_on_the_merged_target() {
    let cfg = LogoConfig::default();
    let mut a = LogoAnimator::new(LogoHalf::Bottom, &cfg, 0.0);
    run(&mut a, &cfg, Phase::Merged, false, 600);
    let (target, rot) = cfg.target(LogoHalf::Bottom, Phase::Merged, 0.0);
    assert!((a.state().position.y - target.y).abs() < 1e-6);
    assert!(a.state().rotation.x.abs() < 1e-6);
    assert!(rot.x.abs() < 1e-12);
    assert_eq!(a.state().scale, cfg.scale);
}

#[test]
fn reduced_motion_damps_faster_and_never_breathes() {
    let cfg = LogoConfig::default();
    let mut calm = LogoAnimator::new(LogoHalf::Top, &cfg, 0.0);
    let mut full = LogoAnimator::new(LogoHalf::Top, &cfg, 0.0);
    run(&mut calm, &cfg, Phase::Approach, true, 10);
    run(&mut full, &cfg, Phase::Approach, false, 10);

    let (target, _) = cfg.target(LogoHalf::Top, Phase::Approach, 0.0);
    let calm_err = (calm.state().position.y - target.y).abs();
    let full_err = (full.state().position.y - target.y).abs();
    assert!(calm_err < full_err);
    assert_eq!(calm.state().scale, cfg.scale);

    full.update(&input(0.5, Phase::Approach, false), &cfg, 0.0);
    assert_ne!(full.state().scale, cfg.scale);
}

#[test]
fn zero_dt_leaves_pose_unchanged() {
    let cfg = LogoConfig::default();
    let mut a = LogoAnimator::new(LogoHalf::Top, &cfg, 0.0);
    let before = a.state().position;
    a.update(
        &FrameInput {
            time_s: 0.0,
            dt_s: 0.0,
            phase: Phase::Merged,
            reduced_motion: false,
        },
        &cfg,
        0.0,
    );
    assert_eq!(a.state().position, before);
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = LogoConfig::default();
    cfg.validate().unwrap();
    cfg.damp = 0.0;
    assert!(cfg.validate().is_err());
}
