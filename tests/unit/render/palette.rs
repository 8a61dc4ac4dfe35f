use super::*;

#[test]
fn missing_or_mistyped_params_keep_defaults() {
    let mut params = BTreeMap::new();
    params.insert("phase".to_owned(), ParamValue::Bool(true));
    params.insert("frequency".to_owned(), ParamValue::Float(2.0));
    let p = CosinePalette::from_params(&params);
    assert_eq!(p.frequency, 2.0);
    assert_eq!(p.phase, 0.0);
    assert_eq!(p.tint, CosinePalette::default().tint);
}

#[test]
fn colors_stay_in_gamut() {
    let p = CosinePalette::default();
    for i in 0..500 {
        let c = p.color(f64::from(i) * 0.37);
        for ch in [c.r, c.g, c.b] {
            assert!((0.0..=1.0).contains(&ch));
        }
    }
}

#[test]
fn phase_shifts_and_invert_complements() {
    let base = CosinePalette::default();
    let shifted = CosinePalette {
        phase: 1.0,
        ..base
    };
    let a = base.color(10.0);
    let b = shifted.color(10.0);
    assert!((a.r - b.r).abs() < 1e-12);

    let inverted = CosinePalette {
        invert: true,
        ..base
    };
    let c = inverted.color(10.0);
    assert!((a.g + c.g - 1.0).abs() < 1e-12);
}
