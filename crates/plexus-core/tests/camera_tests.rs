// Host-side tests for the pointer-driven camera.

use glam::{Vec2, Vec3};
use plexus_core::*;

const DT: f32 = 1.0 / 60.0;

fn ndc(camera: &mut CameraController, aspect: f32, p: Vec3) -> Vec3 {
    camera.transform(aspect).project_point3(p)
}

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < 1e-4
}

#[test]
fn unit_square_fills_the_view_at_rest() {
    let mut cam = CameraController::new(CameraStyle::Parallax, false);
    for aspect in [16.0 / 9.0, 1.0, 0.5] {
        let tl = ndc(&mut cam, aspect, Vec3::new(0.0, 0.0, 0.0));
        let br = ndc(&mut cam, aspect, Vec3::new(1.0, 1.0, 0.0));
        let centre = ndc(&mut cam, aspect, Vec3::new(0.5, 0.5, 0.0));
        assert!(close(tl.truncate().extend(0.0), Vec3::new(-1.0, 1.0, 0.0)), "top-left {tl}");
        assert!(close(br.truncate().extend(0.0), Vec3::new(1.0, -1.0, 0.0)), "bottom-right {br}");
        assert!(close(centre.truncate().extend(0.0), Vec3::ZERO));
    }
}

#[test]
fn offset_eases_toward_the_pointer() {
    let mut cam = CameraController::new(CameraStyle::Parallax, false);
    cam.push_pointer(1.0, 1.0);
    let mut last = 0.0;
    for _ in 0..30 {
        cam.apply(DT);
        let d = cam.offset().length();
        assert!(d > last, "offset should grow monotonically");
        last = d;
    }
    assert_eq!(cam.target(), Vec2::new(1.0, 1.0));
    assert!(cam.offset().x < 1.0, "damped, not snapped");
    for _ in 0..600 {
        cam.apply(DT);
    }
    assert!((cam.offset() - Vec2::ONE).length() < 1e-3);
}

#[test]
fn samples_between_frames_coalesce_to_the_latest() {
    let mut cam = CameraController::new(CameraStyle::Parallax, false);
    cam.push_pointer(0.0, 0.0);
    cam.push_pointer(0.2, 0.9);
    cam.push_pointer(1.0, 0.5);
    cam.apply(DT);
    assert_eq!(cam.target(), Vec2::new(1.0, 0.0));
    assert_eq!(cam.pointer_world(), Some(Vec3::new(1.0, 0.5, 0.0)));
}

#[test]
fn out_of_range_samples_are_clamped() {
    let mut cam = CameraController::new(CameraStyle::Parallax, false);
    cam.push_pointer(-3.0, 7.0);
    cam.apply(DT);
    assert_eq!(cam.pointer_world(), Some(Vec3::new(0.0, 1.0, 0.0)));
    cam.push_pointer(f32::NAN, 0.5);
    cam.apply(DT);
    assert_eq!(cam.pointer_world(), Some(Vec3::new(0.0, 1.0, 0.0)));
}

#[test]
fn zero_step_consumes_the_sample_without_moving() {
    let mut cam = CameraController::new(CameraStyle::Orbit, false);
    cam.push_pointer(0.9, 0.1);
    cam.apply(0.0);
    assert!(cam.pointer_world().is_some());
    assert_eq!(cam.offset(), Vec2::ZERO);
}

#[test]
fn touch_only_camera_ignores_pointer() {
    let mut cam = CameraController::new(CameraStyle::Parallax, true);
    assert!(!cam.accepts_pointer());
    cam.push_pointer(1.0, 1.0);
    cam.apply(DT);
    assert_eq!(cam.pointer_world(), None);
    assert_eq!(cam.target(), Vec2::ZERO);
    assert_eq!(cam.offset(), Vec2::ZERO);
}

#[test]
fn leaving_recentres_and_stops_attraction() {
    let mut cam = CameraController::new(CameraStyle::Parallax, false);
    cam.push_pointer(1.0, 1.0);
    for _ in 0..60 {
        cam.apply(DT);
    }
    cam.clear_pointer();
    assert_eq!(cam.pointer_world(), None);
    assert_eq!(cam.target(), Vec2::ZERO);
    let before = cam.offset().length();
    cam.apply(DT);
    assert!(cam.offset().length() < before);
}

#[test]
fn both_styles_keep_the_centre_fixed_while_moving() {
    for style in [CameraStyle::Parallax, CameraStyle::Orbit] {
        let mut cam = CameraController::new(style, false);
        cam.push_pointer(0.95, 0.05);
        for _ in 0..120 {
            cam.apply(DT);
        }
        let centre = ndc(&mut cam, 1.5, Vec3::new(0.5, 0.5, 0.0));
        assert!(close(centre.truncate().extend(0.0), Vec3::ZERO), "{style:?}: {centre}");
        let corner = ndc(&mut cam, 1.5, Vec3::new(0.0, 0.0, 0.0));
        assert!(!close(corner.truncate().extend(0.0), Vec3::new(-1.0, 1.0, 0.0)));
    }
}

#[test]
fn dispose_stops_accepting_input() {
    let mut cam = CameraController::new(CameraStyle::Parallax, false);
    cam.push_pointer(0.3, 0.3);
    cam.dispose();
    cam.apply(DT);
    assert_eq!(cam.pointer_world(), None);
    cam.push_pointer(0.7, 0.7);
    cam.apply(DT);
    assert_eq!(cam.pointer_world(), None);
}
