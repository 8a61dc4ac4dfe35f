use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn frames_for_secs_rounds_up() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frames_for_secs(10.0), 300);
    assert_eq!(fps.frames_for_secs(0.01), 1);
    assert_eq!(fps.frames_for_secs(0.0), 0);
}

#[test]
fn full_hd_frame_is_8294400_bytes() {
    let canvas = Canvas {
        width: 1920,
        height: 1080,
    };
    assert_eq!(canvas.frame_bytes(), 8_294_400);
}

#[test]
fn rgb_arithmetic_is_componentwise() {
    let a = Rgb::new(0.2, 0.4, 0.6);
    let b = Rgb::new(0.1, 0.1, 0.1);
    let c = (a - b) * 2.0 + b;
    assert!((c.r - 0.3).abs() < 1e-12);
    assert!((c.g - 0.7).abs() < 1e-12);
    assert!((c.b - 1.1).abs() < 1e-12);
}

#[test]
fn rgba8_conversion_clamps_and_is_opaque() {
    assert_eq!(Rgb::new(0.25, -1.0, 3.0).to_rgba8(), [64, 0, 255, 255]);
}
