use std::collections::BTreeSet;

use super::*;
use crate::foundation::core::Canvas;

fn small_config() -> SequencerConfig {
    SequencerConfig {
        canvas: Canvas {
            width: 160,
            height: 90,
        },
        sprite_px: 16,
        assets_root: std::env::temp_dir().join("hero-sequencer-session-assets"),
        ..SequencerConfig::default()
    }
}

fn session(opts: HeroOptions) -> HeroSession {
    HeroSession::new(small_config(), opts).unwrap()
}

fn run(s: &mut HeroSession, until_ms: u64, step_ms: u64) {
    let mut t = 0;
    while t <= until_ms {
        s.frame(Millis(t)).unwrap();
        t += step_ms;
    }
}

fn distinct_assets(s: &HeroSession) -> usize {
    s.particles()
        .iter()
        .map(|p| p.spec().asset.clone())
        .collect::<BTreeSet<_>>()
        .len()
}

#[test]
fn unmount_right_after_mount_mutates_nothing() {
    let mut s = session(HeroOptions::default());
    let token = s.liveness();
    s.start(Millis(0));
    let before = s.snapshot();
    s.stop();
    assert!(!token.is_alive());

    for t in (0..=20_000).step_by(250) {
        assert!(s.frame(Millis(t)).unwrap().is_none());
        s.set_progress(1.0, Millis(t));
        s.set_visible(t % 500 == 0);
        s.notify_context_lost();
    }

    assert_eq!(s.phase(), Phase::Initial);
    assert_eq!(s.overlay_state(), OverlayState::Hidden);
    assert_eq!(s.clock().pending_timers(), 0);
    assert_eq!(s.handoff().pending_timers(), 0);
    assert!(s.particles().iter().all(|p| p.updates() == 0));

    let after = s.snapshot();
    assert_eq!(after.elements, before.elements);
    assert_eq!(after.logos, before.logos);
    assert_eq!(after.cache.created, 0);
    assert_eq!(after.render.frames, 0);
}

#[test]
fn normal_run_reaches_terminal_phase_and_reveals_overlay() {
    let mut s = session(HeroOptions::default());
    s.start(Millis(0));
    run(&mut s, 7_000, 100);

    assert_eq!(s.phase(), Phase::Merged);
    assert_eq!(s.overlay_state(), OverlayState::Shown);
    assert_eq!(s.overlay().shown_at(), Some(Millis(6_600)));

    let visited: Vec<Phase> = s.clock().history().iter().map(|t| t.to).collect();
    assert_eq!(
        visited,
        vec![
            Phase::Primary,
            Phase::Secondary,
            Phase::Approach,
            Phase::Merged
        ]
    );
    assert!(s.logos().iter().all(|l| l.state().visible));
}

#[test]
fn a_paused_host_reveals_the_overlay_on_its_first_late_frame() {
    let mut s = session(HeroOptions::default());
    s.start(Millis(0));
    s.frame(Millis(0)).unwrap();
    s.frame(Millis(7_000)).unwrap();

    assert_eq!(s.phase(), Phase::Merged);
    assert_eq!(s.clock().terminal_at(), Some(Millis(5_200)));
    assert_eq!(s.overlay_state(), OverlayState::Shown);
    assert_eq!(s.overlay().shown_at(), Some(Millis(6_600)));
}

#[test]
fn reduced_run_reaches_the_same_terminal_state_without_jitter() {
    let mut s = session(HeroOptions {
        reduced_motion: true,
        ..HeroOptions::default()
    });
    s.start(Millis(0));

    let mut t = 0;
    while t <= 1_700 {
        s.frame(Millis(t)).unwrap();
        for p in s.particles() {
            assert_eq!(p.state().rotation_z, 0.0);
            assert_eq!(p.state().mesh_offset_y, 0.0);
        }
        t += 50;
    }

    assert_eq!(s.phase(), Phase::Merged);
    assert_eq!(s.overlay_state(), OverlayState::Shown);
    assert_eq!(s.clock().history().len(), 4);
}

#[test]
fn resources_are_created_once_per_key_and_disposed_once() {
    let mut s = session(HeroOptions::default());
    s.start(Millis(0));
    run(&mut s, 3_000, 100);

    let keys = distinct_assets(&s);
    let created = s.renderer().cache_stats().created;
    assert_eq!(created, keys as u64);
    assert_eq!(s.renderer().cache().factory().live_textures(), keys);

    s.stop();
    s.stop();
    let stats = s.renderer().cache_stats();
    assert_eq!(stats.created, created);
    assert_eq!(stats.disposed, created);
    assert_eq!(s.renderer().cache().factory().live_textures(), 0);
}

#[test]
fn missing_logo_assets_are_skipped_not_fatal() {
    let mut s = session(HeroOptions::default());
    s.start(Millis(0));
    run(&mut s, 2_000, 100);

    assert_eq!(s.renderer().cache_stats().failed, 2);
    assert!(s.renderer().stats().sprites_skipped > 0);
}

#[test]
fn frames_before_start_render_nothing() {
    let mut s = session(HeroOptions::default());
    assert!(s.frame(Millis(100)).unwrap().is_none());
    assert!(s.particles().iter().all(|p| p.updates() == 0));
}

#[test]
fn hidden_section_skips_work_but_keeps_time() {
    let mut s = session(HeroOptions::default());
    s.set_visible(false);
    s.start(Millis(0));
    assert!(!s.renderer().has_surface());

    run(&mut s, 6_000, 200);
    assert_eq!(s.phase(), Phase::Merged);
    assert!(s.particles().iter().all(|p| p.updates() == 0));
    assert_eq!(s.renderer().stats().frames, 0);

    s.set_visible(true);
    assert!(s.renderer().has_surface());
    let frame = s.frame(Millis(6_200)).unwrap().unwrap();
    assert_eq!((frame.width, frame.height), (160, 90));
    assert!(s.particles().iter().all(|p| p.updates() <= 1));
}

#[test]
fn visibility_toggle_rebuilds_the_surface() {
    let mut s = session(HeroOptions::default());
    s.start(Millis(0));
    s.set_visible(false);
    s.set_visible(true);
    let stats = s.renderer().stats();
    assert_eq!(stats.surfaces_created, 2);
    assert_eq!(stats.surfaces_torn_down, 1);
}

#[test]
fn context_loss_yields_blank_frames_until_reactivation() {
    let mut s = session(HeroOptions::default());
    s.start(Millis(0));
    s.notify_context_lost();
    let frame = s.frame(Millis(100)).unwrap().unwrap();
    assert!(frame.is_blank());

    s.set_visible(false);
    s.set_visible(true);
    assert!(!s.renderer().is_context_lost());
    assert!(s.frame(Millis(200)).unwrap().is_some());
}

#[test]
fn progress_mode_follows_high_water_progress() {
    let mut s = session(HeroOptions {
        progress_driven: true,
        ..HeroOptions::default()
    });
    s.start(Millis(0));
    assert_eq!(s.clock().pending_timers(), 0);

    s.set_progress(0.5, Millis(10));
    s.frame(Millis(10)).unwrap();
    assert_eq!(s.phase(), Phase::Secondary);
    let half = s.timeline_s() * 0.5;
    assert!((s.snapshot().time_s - half).abs() < 1e-9);

    s.set_progress(0.1, Millis(20));
    s.frame(Millis(20)).unwrap();
    assert_eq!(s.phase(), Phase::Secondary);
    assert!((s.snapshot().time_s - half).abs() < 1e-9);

    s.set_progress(1.0, Millis(30));
    s.frame(Millis(30)).unwrap();
    assert_eq!(s.phase(), Phase::Merged);
    s.frame(Millis(30 + 1_400)).unwrap();
    assert_eq!(s.overlay_state(), OverlayState::Shown);
}

#[test]
fn handoff_dot_shows_inside_its_window() {
    let mut s = session(HeroOptions::default());
    s.start(Millis(0));
    s.frame(Millis(4_400)).unwrap();
    assert!(!s.handoff().is_visible());
    s.frame(Millis(4_600)).unwrap();
    assert!(s.handoff().is_visible());
    s.frame(Millis(5_100)).unwrap();
    assert!(!s.handoff().is_visible());
}

#[test]
fn snapshot_serializes_to_json() {
    let mut s = session(HeroOptions::default());
    s.start(Millis(0));
    run(&mut s, 7_000, 500);

    let v = serde_json::to_value(s.snapshot()).unwrap();
    assert_eq!(v["phase"], "merged");
    assert_eq!(v["overlay"], "shown");
    assert_eq!(v["href"], "/contact");
    assert_eq!(v["elements"].as_array().unwrap().len(), 30);
    assert_eq!(v["logos"][1]["half"], "bottom");
    assert!(v["logos"][0]["opacity"].as_f64().unwrap() > 0.9);
}

#[test]
fn drop_clears_liveness() {
    let s = session(HeroOptions::default());
    let token = s.liveness();
    assert!(token.is_alive());
    drop(s);
    assert!(!token.is_alive());
}
