use super::*;

fn projection() -> Projection {
    Projection::new(&CameraConfig::default(), Canvas::default())
}

#[test]
fn origin_maps_to_canvas_center() {
    let p = projection().project(Vec3::ZERO).unwrap();
    assert_eq!((p.x, p.y), (640.0, 360.0));
}

#[test]
fn viewport_edges_map_to_canvas_edges() {
    let proj = projection();
    let vp = proj.world_viewport();
    let right = proj.project(Vec3::new(vp.width / 2.0, 0.0, 0.0)).unwrap();
    let top = proj.project(Vec3::new(0.0, vp.height / 2.0, 0.0)).unwrap();
    assert!((right.x - 1280.0).abs() < 1e-9);
    assert!(top.y.abs() < 1e-9);

    let from_camera = CameraConfig::default().world_viewport(Canvas::default());
    assert!((vp.height - from_camera.height).abs() < 1e-9);
}

#[test]
fn nearer_points_are_larger() {
    let proj = projection();
    let far = proj.project(Vec3::ZERO).unwrap();
    let near = proj.project(Vec3::new(0.0, 0.0, 0.6)).unwrap();
    assert!(near.px_per_unit > far.px_per_unit);
}

#[test]
fn points_behind_the_camera_are_culled() {
    let proj = projection();
    assert!(proj.project(Vec3::new(0.0, 0.0, 8.0)).is_none());
    assert!(proj.project(Vec3::new(0.0, 0.0, 20.0)).is_none());
}
