use super::*;

#[test]
fn empty_object_yields_stock_config() {
    let cfg = SequencerConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, SequencerConfig::default());
    cfg.validate().unwrap();
    assert_eq!(cfg.elements().unwrap().len(), 30);
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let json = r##"{
        "canvas": { "width": 640, "height": 360 },
        "phases": { "normal": { "primary_ms": 100, "secondary_ms": 200, "approach_ms": 300, "merged_ms": 400 } },
        "particles": { "ring_radius": 1.5 },
        "overlay": { "href": "/hello" },
        "clear": "#FEFEFE"
    }"##;
    let cfg = SequencerConfig::from_reader(json.as_bytes()).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas.width, 640);
    assert_eq!(cfg.phases.normal.merged_ms, 400);
    assert_eq!(cfg.phases.reduced, PhaseConfig::default().reduced);
    assert_eq!(cfg.particles.ring_radius, 1.5);
    assert_eq!(cfg.particles.fade_rate, 1.4);
    assert_eq!(cfg.overlay.href, "/hello");
    assert_eq!(cfg.overlay.reveal_delay_ms, 1400);
    assert_eq!(
        cfg.clear_color().unwrap(),
        Rgba8Premul::from_straight_rgba(0xFE, 0xFE, 0xFE, 0xFF)
    );
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = SequencerConfig::from_reader("{ nope".as_bytes()).unwrap_err();
    assert!(matches!(err, SequencerError::Serde(_)));
}

#[test]
fn validation_rejects_bad_sections() {
    let mut cfg = SequencerConfig::default();
    cfg.canvas.width = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = SequencerConfig::default();
    cfg.camera.fov_deg = 180.0;
    assert!(cfg.validate().is_err());

    let mut cfg = SequencerConfig::default();
    cfg.catalog.clear();
    assert!(cfg.validate().is_err());

    let mut cfg = SequencerConfig::default();
    cfg.clear = Some(HexColor::from("white"));
    assert!(cfg.validate().is_err());
}

#[test]
fn world_viewport_follows_camera() {
    let cfg = SequencerConfig::default();
    let vp = cfg.world_viewport();
    let expected_h = 2.0 * 8.0 * (30.0f64).to_radians().tan();
    assert!((vp.height - expected_h).abs() < 1e-12);
    assert!((vp.width - expected_h * 1280.0 / 720.0).abs() < 1e-9);
}
