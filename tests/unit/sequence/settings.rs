use super::*;

#[test]
fn defaults_match_a_ten_second_1080p_sweep() {
    let s = VideoSettings::default();
    s.validate().unwrap();
    assert_eq!(s.canvas().frame_bytes(), 8_294_400);
    assert_eq!(s.total_frames(), 300);
    assert_eq!(s.frame_time(0), 0.0);
    assert_eq!(s.frame_time(299), 1.0);
    assert!((s.frame_time(1) - 1.0 / 299.0).abs() < 1e-15);
}

#[test]
fn partial_frames_round_up() {
    let s = VideoSettings {
        fps: Fps { num: 24, den: 1 },
        duration_secs: 1.01,
        ..VideoSettings::default()
    };
    assert_eq!(s.total_frames(), 25);
}

#[test]
fn single_frame_video_samples_t_zero() {
    let s = VideoSettings {
        fps: Fps { num: 1, den: 1 },
        duration_secs: 0.5,
        ..VideoSettings::default()
    };
    assert_eq!(s.total_frames(), 1);
    assert_eq!(s.frame_time(0), 0.0);
}

#[test]
fn sine_easing_keeps_endpoints_and_midpoint() {
    let e = TimeEasing::Sine;
    assert_eq!(e.apply(0.0), 0.0);
    assert!((e.apply(1.0) - 1.0).abs() < 1e-15);
    assert!((e.apply(0.5) - 0.5).abs() < 1e-15);
    assert!(e.apply(0.1) < 0.1);
    assert!(e.apply(0.9) > 0.9);
}

#[test]
fn validate_rejects_degenerate_settings() {
    let bad = [
        VideoSettings {
            width: 0,
            ..VideoSettings::default()
        },
        VideoSettings {
            fps: Fps { num: 30, den: 0 },
            ..VideoSettings::default()
        },
        VideoSettings {
            duration_secs: f64::NAN,
            ..VideoSettings::default()
        },
        VideoSettings {
            steps_per_frame: 0,
            ..VideoSettings::default()
        },
    ];
    for s in bad {
        assert!(s.validate().is_err(), "{s:?}");
    }
}

#[test]
fn settings_round_trip_through_json_with_defaults() {
    let s: VideoSettings =
        serde_json::from_str(r#"{"width": 640, "time_easing": "sine"}"#).unwrap();
    assert_eq!(s.width, 640);
    assert_eq!(s.height, 1080);
    assert_eq!(s.time_easing, TimeEasing::Sine);
}
