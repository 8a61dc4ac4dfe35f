use super::*;

const RADII: [(f64, f64); 5] = [
    (0.0, 1.0),
    (0.33, 0.008057857721976197),
    (0.433, 0.28782969446188766),
    (0.632, 0.006049181474278884),
    (0.795, 1.172453080986668e-05),
];

const CENTERS: [(f64, f64, f64); 5] = [
    (0.0, -0.5, 0.0),
    (0.33, -1.2558024544068163, 0.38112841375594236),
    (0.433, -0.8392324486465885, 0.37356936504006194),
    (0.632, -0.5973014418167584, 0.6631019637438973),
    (0.795, -0.5952023547186579, 0.6680937984694201),
];

fn radius() -> RadiusCurve {
    RadiusCurve::from_keys(RADII.iter().map(|&(t, r)| Keyframe::new(t, r)).collect()).unwrap()
}

fn center(retiming: Retiming) -> CenterCurve {
    let settings = CurveSettings {
        retiming,
        ..CurveSettings::default()
    };
    let keys = CENTERS
        .iter()
        .enumerate()
        .map(|(i, &(t, x, y))| {
            // Give interior keys a handle so segments are genuinely curved.
            let vel = if i % 2 == 1 {
                Vec2::new(0.3, -0.2)
            } else {
                Vec2::ZERO
            };
            Keyframe::new(t, CenterKey { pos: Vec2::new(x, y), vel })
        })
        .collect();
    CenterCurve::from_keys(keys, settings).unwrap()
}

fn close(a: Vec2, b: Vec2, rel: f64) -> bool {
    let scale = b.x.abs().max(b.y.abs()).max(1.0);
    (a.x - b.x).abs() <= rel * scale && (a.y - b.y).abs() <= rel * scale
}

#[test]
fn keys_are_hit_exactly() {
    let r = radius();
    for retiming in [Retiming::ExpRatio, Retiming::ArcLength, Retiming::Linear] {
        let mut c = center(retiming);
        for &(t, x, y) in &CENTERS {
            assert_eq!(c.get_center(t, &r), Vec2::new(x, y), "{retiming:?} t={t}");
            assert_eq!(c.center_at(t, &r), Vec2::new(x, y), "{retiming:?} t={t}");
        }
    }
}

#[test]
fn queries_clamp_to_boundary_keys() {
    let r = radius();
    let mut c = center(Retiming::ExpRatio);
    let last = Vec2::new(CENTERS[4].1, CENTERS[4].2);
    assert_eq!(c.get_center(-0.5, &r), Vec2::new(-0.5, 0.0));
    assert_eq!(c.get_center(0.9, &r), last);
    assert_eq!(c.get_center(1.0, &r), last);
    assert_eq!(c.get_center(f64::NAN, &r), Vec2::new(-0.5, 0.0));
}

#[test]
fn single_key_is_stationary() {
    let r = radius();
    let mut c = CenterCurve::new(Vec2::new(0.25, -0.1), CurveSettings::default()).unwrap();
    for t in [0.0, 0.3, 1.0] {
        assert_eq!(c.get_center(t, &r), Vec2::new(0.25, -0.1));
    }
}

#[test]
fn zero_handles_move_along_the_chord() {
    let r = radius();
    let keys = vec![
        Keyframe::new(0.0, CenterKey::anchor(Vec2::new(0.0, 0.0))),
        Keyframe::new(1.0, CenterKey::anchor(Vec2::new(2.0, 1.0))),
    ];
    for retiming in [Retiming::ExpRatio, Retiming::ArcLength, Retiming::Linear] {
        let settings = CurveSettings {
            retiming,
            ..CurveSettings::default()
        };
        let mut c = CenterCurve::from_keys(keys.clone(), settings).unwrap();
        let mut prev = 0.0;
        for i in 0..=100 {
            let p = c.get_center(f64::from(i) / 100.0, &r);
            let cross = p.x * 1.0 - p.y * 2.0;
            assert!(cross.abs() < 1e-12, "{retiming:?} off chord at {p:?}");
            assert!(p.x >= prev - 1e-12 && p.x <= 2.0 + 1e-12);
            prev = p.x;
        }
    }
}

#[test]
fn equal_radii_leave_exp_ratio_timing_untouched() {
    let r = RadiusCurve::new(0.02).unwrap();
    let mut c = center(Retiming::ExpRatio);
    for i in 1..100 {
        let t = f64::from(i) / 100.0 * 0.795;
        if let Some(rt) = c.retime(t, &r) {
            assert_eq!(rt.retimed, rt.local);
        }
    }
}

#[test]
fn equal_radii_leave_arc_length_fraction_linear() {
    let r = RadiusCurve::new(0.02).unwrap();
    let mut c = center(Retiming::ArcLength);
    let rt = c.retime(0.2, &r).unwrap();
    assert_eq!(rt.segment, 0);
    assert!((rt.retimed - rt.local).abs() < 1e-9);
}

#[test]
fn shrinking_radius_front_loads_exp_ratio_motion() {
    let r = radius();
    let mut c = center(Retiming::ExpRatio);
    // Radius falls by ~124x over the first segment, so most of the travel happens early.
    let rt = c.retime(0.33 * 0.5, &r).unwrap();
    assert!(rt.retimed > 0.8, "retimed {}", rt.retimed);
}

fn assert_cursor_matches_stateless(retiming: Retiming) {
    let r = radius();
    let mut stepped = center(retiming);
    let mut fresh = center(retiming);

    let forward: Vec<f64> = (0..=999).map(|k| f64::from(k) / 999.0).collect();
    for &t in &forward {
        let a = stepped.get_center(t, &r);
        let b = fresh.center_at(t, &r);
        assert!(close(a, b, 1e-6), "{retiming:?} forward t={t}: {a:?} vs {b:?}");
    }
    assert_eq!(stepped.cursor().segment(), 3);

    for &t in forward.iter().rev() {
        let a = stepped.get_center(t, &r);
        let b = fresh.center_at(t, &r);
        assert!(close(a, b, 1e-6), "{retiming:?} backward t={t}: {a:?} vs {b:?}");
    }

    for t in [0.7, 0.05, 0.5, 0.34, 0.9, 0.1] {
        let a = stepped.get_center(t, &r);
        let b = fresh.center_at(t, &r);
        assert!(close(a, b, 1e-6), "{retiming:?} seek t={t}: {a:?} vs {b:?}");
    }
    assert_eq!(stepped.precision_warnings(), 0);
}

#[test]
fn cursor_matches_stateless_exp_ratio() {
    assert_cursor_matches_stateless(Retiming::ExpRatio);
}

#[test]
fn cursor_matches_stateless_arc_length() {
    assert_cursor_matches_stateless(Retiming::ArcLength);
}

#[test]
fn arc_length_motion_is_monotone_along_a_straight_segment() {
    let r = radius();
    let keys = vec![
        Keyframe::new(0.0, CenterKey::anchor(Vec2::new(0.0, 0.0))),
        Keyframe::new(0.33, CenterKey::anchor(Vec2::new(1.0, 0.0))),
    ];
    let settings = CurveSettings {
        retiming: Retiming::ArcLength,
        ..CurveSettings::default()
    };
    let mut c = CenterCurve::from_keys(keys, settings).unwrap();
    let mut prev = 0.0;
    for i in 0..=330 {
        let x = c.get_center(f64::from(i) / 1000.0, &r).x;
        assert!(x >= prev - 1e-12);
        prev = x;
    }
    assert_eq!(prev, 1.0);
}

#[test]
fn coarse_arc_step_reports_precision_warning() {
    let r = RadiusCurve::new(1.0).unwrap();
    let keys = vec![
        Keyframe::new(
            0.0,
            CenterKey {
                pos: Vec2::new(0.0, 0.0),
                vel: Vec2::new(0.0, 1.0),
            },
        ),
        Keyframe::new(
            1.0,
            CenterKey {
                pos: Vec2::new(1.0, 0.0),
                vel: Vec2::new(0.0, -1.0),
            },
        ),
    ];
    let settings = CurveSettings {
        retiming: Retiming::ArcLength,
        arc_step: 0.5,
        ..CurveSettings::default()
    };
    let mut c = CenterCurve::from_keys(keys, settings).unwrap();

    let p = c.get_center(0.999, &r);
    assert!(close(p, Vec2::new(1.0, 0.0), 1e-2), "{p:?}");
    assert_eq!(c.precision_warnings(), 1);
    assert!(c.cursor().local_t() > 0.99);

    let stepped = c.get_center(0.25, &r);
    assert!(close(stepped, c.center_at(0.25, &r), 1e-12));
    assert_eq!(c.precision_warnings(), 1);
}

#[test]
fn zero_length_segment_falls_back_to_exp_ratio() {
    let r = radius();
    let keys = vec![
        Keyframe::new(0.0, CenterKey::anchor(Vec2::new(0.3, 0.3))),
        Keyframe::new(0.5, CenterKey::anchor(Vec2::new(0.3, 0.3))),
    ];
    let settings = CurveSettings {
        retiming: Retiming::ArcLength,
        ..CurveSettings::default()
    };
    let mut c = CenterCurve::from_keys(keys, settings).unwrap();
    assert_eq!(c.segment_lengths(&r), vec![0.0]);
    assert_eq!(c.get_center(0.25, &r), Vec2::new(0.3, 0.3));
    assert_eq!(c.center_at(0.4, &r), Vec2::new(0.3, 0.3));
    assert_eq!(c.precision_warnings(), 0);
}

#[test]
fn arc_length_reaches_each_key_without_a_jump() {
    let r = radius();
    let mut c = center(Retiming::ArcLength);
    for &(t, x, y) in &CENTERS[1..] {
        let key = Vec2::new(x, y);
        let before = c.center_at(t - 1e-12, &r);
        assert!(close(before, key, 1e-9), "t={t}: {before:?} vs {key:?}");
        let stepped = c.get_center(t - 1e-12, &r);
        assert!(close(stepped, key, 1e-9), "t={t}: {stepped:?} vs {key:?}");
    }
    assert_eq!(c.precision_warnings(), 0);
}

#[test]
fn tiny_integral_spacing_is_rejected() {
    let r = radius();
    let mut c = center(Retiming::ArcLength);
    for spacing in [1e-300, 1e-12, 1e-8] {
        assert!(
            matches!(
                c.invalidate_radius(&r, spacing),
                Err(SweepError::Configuration(_))
            ),
            "{spacing}"
        );
    }
    c.invalidate_radius(&r, 1e-6).unwrap();
    assert!(c.get_center(0.5, &r).is_finite());
}

#[test]
fn handles_scale_with_radius_and_tangent_scale() {
    let r = RadiusCurve::from_keys(vec![Keyframe::new(0.0, 0.5), Keyframe::new(1.0, 0.5)]).unwrap();
    let vel = Vec2::new(0.2, 0.1);
    let keys = vec![
        Keyframe::new(0.0, CenterKey { pos: Vec2::ZERO, vel }),
        Keyframe::new(1.0, CenterKey::anchor(Vec2::new(1.0, 0.0))),
    ];
    let settings = CurveSettings {
        retiming: Retiming::Linear,
        ..CurveSettings::default()
    };
    let mut c = CenterCurve::from_keys(keys, settings).unwrap();

    let eps = 1e-7;
    let slope = c.center_at(eps, &r) * (1.0 / eps);
    let expected = vel * (0.5 * 3.0);
    assert!(close(slope, expected, 1e-4), "{slope:?} vs {expected:?}");
}

#[test]
fn segment_lengths_cover_every_segment() {
    let r = radius();
    let mut c = center(Retiming::ExpRatio);
    let lengths = c.segment_lengths(&r);
    assert_eq!(lengths.len(), 4);
    for (i, len) in lengths.iter().enumerate() {
        let a = Vec2::new(CENTERS[i].1, CENTERS[i].2);
        let b = Vec2::new(CENTERS[i + 1].1, CENTERS[i + 1].2);
        let chord = (b - a).x.hypot((b - a).y);
        assert!(*len >= chord - 1e-12, "segment {i}: {len} < chord {chord}");
    }
}

#[test]
fn radius_edits_are_never_served_stale() {
    let mut r = radius();
    let mut c = center(Retiming::ArcLength);
    let _ = c.get_center(0.2, &r);

    r.set_keyframe_value(1, 0.5).unwrap();
    let after_edit = c.get_center(0.2, &r);

    let mut rebuilt = center(Retiming::ArcLength);
    assert_eq!(after_edit, rebuilt.center_at(0.2, &r));
}

#[test]
fn invalidate_radius_validates_spacing() {
    let r = radius();
    let mut c = center(Retiming::ArcLength);
    assert!(c.invalidate_radius(&r, 0.0).is_err());
    c.invalidate_radius(&r, 0.002).unwrap();
    let p = c.get_center(0.5, &r);
    assert!(p.is_finite());
    assert_eq!(c.cursor().segment(), 2);
}

#[test]
fn add_then_remove_restores_curve() {
    let r = radius();
    let mut c = center(Retiming::ArcLength);
    let samples = |c: &mut CenterCurve| -> Vec<Vec2> {
        (0..=200)
            .map(|i| c.center_at(f64::from(i) / 200.0, &r))
            .collect()
    };
    let before = samples(&mut c);

    let idx = c
        .add_keyframe(0.5, Vec2::new(-0.7, 0.5), Vec2::new(0.1, 0.0))
        .unwrap();
    assert_eq!(idx, 3);
    assert_eq!(c.get_center(0.5, &r), Vec2::new(-0.7, 0.5));
    c.remove_keyframe(idx).unwrap();

    assert_eq!(before, samples(&mut c));
}

#[test]
fn edits_reject_bad_input() {
    let mut c = center(Retiming::ExpRatio);
    assert!(matches!(
        c.add_keyframe(0.5, Vec2::new(f64::NAN, 0.0), Vec2::ZERO),
        Err(SweepError::Domain(_))
    ));
    assert!(matches!(
        c.add_keyframe(0.33, Vec2::ZERO, Vec2::ZERO),
        Err(SweepError::Configuration(_))
    ));
    assert!(c.set_keyframe_velocity(17, Vec2::ZERO).is_err());
    assert!(c.set_keyframe_time(0, 1.5).is_err());

    let moved = c.set_keyframe_time(0, 0.9).unwrap();
    assert_eq!(moved, 4);
    assert_eq!(c.timeline().first().t, 0.33);
}

#[test]
fn zero_handles_meet_at_the_midpoint_under_constant_zoom() {
    let r = RadiusCurve::new(0.1).unwrap();
    let a = Vec2::new(-1.25, 0.375);
    let b = Vec2::new(0.5, -0.75);
    let keys = vec![
        Keyframe::new(0.0, CenterKey::anchor(a)),
        Keyframe::new(1.0, CenterKey::anchor(b)),
    ];
    for retiming in [Retiming::ExpRatio, Retiming::Linear] {
        let settings = CurveSettings {
            retiming,
            ..CurveSettings::default()
        };
        let mut c = CenterCurve::from_keys(keys.clone(), settings).unwrap();
        assert!(close(c.get_center(0.5, &r), (a + b) * 0.5, 1e-15));
    }
}

#[test]
fn exp_ratio_front_loads_zero_handle_motion_during_a_zoom() {
    let r = RadiusCurve::from_keys(vec![Keyframe::new(0.0, 1.0), Keyframe::new(1.0, 1e-4)])
        .unwrap();
    let b = Vec2::new(2.0, 2.0);
    let keys = vec![
        Keyframe::new(0.0, CenterKey::anchor(Vec2::ZERO)),
        Keyframe::new(1.0, CenterKey::anchor(b)),
    ];
    let mut exp = CenterCurve::from_keys(keys.clone(), CurveSettings::default()).unwrap();
    let p = exp.get_center(0.5, &r);
    assert!(p.x > 0.99 * b.x && p.x < b.x, "{p:?}");

    let settings = CurveSettings {
        retiming: Retiming::Linear,
        ..CurveSettings::default()
    };
    let mut linear = CenterCurve::from_keys(keys, settings).unwrap();
    assert!(close(linear.get_center(0.5, &r), b * 0.5, 1e-15));
}
