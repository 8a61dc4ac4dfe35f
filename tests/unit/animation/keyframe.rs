use super::*;

fn scalar_timeline(keys: &[(f64, f64)]) -> Timeline<f64> {
    Timeline::from_keys(keys.iter().map(|&(t, v)| Keyframe::new(t, v)).collect()).unwrap()
}

#[test]
fn from_keys_sorts_and_rejects_duplicates() {
    let tl = scalar_timeline(&[(1.0, 3.0), (0.0, 1.0), (0.5, 2.0)]);
    let times: Vec<f64> = tl.keys().iter().map(|k| k.t).collect();
    assert_eq!(times, vec![0.0, 0.5, 1.0]);

    let dup = Timeline::from_keys(vec![Keyframe::new(0.5, 1.0), Keyframe::new(0.5, 2.0)]);
    assert!(matches!(dup, Err(SweepError::Configuration(_))));
}

#[test]
fn empty_and_out_of_range_times_are_rejected() {
    assert!(Timeline::<f64>::from_keys(vec![]).is_err());
    assert!(Timeline::new(1.5, 0.0).is_err());
    assert!(Timeline::new(f64::NAN, 0.0).is_err());

    let mut tl = scalar_timeline(&[(0.0, 1.0)]);
    assert!(tl.add(-0.1, 2.0).is_err());
    assert!(tl.add(0.0, 2.0).is_err());
}

#[test]
fn add_returns_sorted_index_and_bumps_revision() {
    let mut tl = scalar_timeline(&[(0.0, 1.0), (1.0, 2.0)]);
    let rev = tl.revision();
    assert_eq!(tl.add(0.25, 5.0).unwrap(), 1);
    assert_eq!(tl.len(), 3);
    assert!(tl.revision() > rev);
}

#[test]
fn last_keyframe_cannot_be_removed() {
    let mut tl = scalar_timeline(&[(0.3, 1.0)]);
    assert!(matches!(tl.remove(0), Err(SweepError::Configuration(_))));
    assert!(tl.remove(7).is_err());
    assert_eq!(tl.len(), 1);
}

#[test]
fn set_time_resorts_and_reports_new_index() {
    let mut tl = scalar_timeline(&[(0.0, 1.0), (0.5, 2.0), (1.0, 3.0)]);
    assert_eq!(tl.set_time(0, 0.75).unwrap(), 1);
    let values: Vec<f64> = tl.keys().iter().map(|k| k.value).collect();
    assert_eq!(values, vec![2.0, 1.0, 3.0]);
    assert!(tl.set_time(0, 1.0).is_err());
}

#[test]
fn position_clamps_hits_keys_and_locates_segments() {
    let tl = scalar_timeline(&[(0.2, 1.0), (0.6, 2.0), (0.8, 3.0)]);
    assert_eq!(tl.position(0.0), Position::Key(0));
    assert_eq!(tl.position(f64::NAN), Position::Key(0));
    assert_eq!(tl.position(0.95), Position::Key(2));
    assert_eq!(tl.position(0.6), Position::Key(1));
    match tl.position(0.7) {
        Position::Segment { index, u } => {
            assert_eq!(index, 1);
            assert!((u - 0.5).abs() < 1e-12);
        }
        other => panic!("unexpected position {other:?}"),
    }
}

#[test]
fn single_key_timeline_is_degenerate() {
    let tl = scalar_timeline(&[(0.4, 9.0)]);
    for t in [0.0, 0.4, 0.9, 1.0] {
        assert_eq!(tl.position(t), Position::Key(0));
    }
}
