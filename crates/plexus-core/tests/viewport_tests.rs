// Host-side tests for viewport sizing shared by the canvas backing store and the surface.

use plexus_core::Viewport;

#[test]
fn fractional_css_sizes_round_to_the_nearest_pixel() {
    let vp = Viewport::new(199.9, 100.6, 2.0);
    assert_eq!(vp.physical_size(), (400, 201));

    let vp = Viewport::new(333.5, 240.25, 1.5);
    assert_eq!(vp.physical_size(), (500, 360));
}

#[test]
fn degenerate_sizes_fall_back_to_one_pixel() {
    assert_eq!(Viewport::new(0.2, 0.2, 1.0).physical_size(), (1, 1));
    assert_eq!(Viewport::new(f32::NAN, -5.0, 0.0).physical_size(), (1, 1));
}
