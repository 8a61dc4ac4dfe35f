use super::*;

#[test]
fn default_palette_exposes_cosine_uniforms() {
    let cf = ColorFunction::default();
    cf.validate().unwrap();
    let names: Vec<&str> = cf.uniforms.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["frequency", "phase", "tint", "invert"]);
    assert_eq!(cf.uniform("phase").unwrap().display_name, "Phase");
    assert_eq!(cf.uniform("invert").unwrap().value(), ParamValue::Bool(false));
}

#[test]
fn set_value_checks_types_and_clamps_floats() {
    let mut cf = ColorFunction::default();
    cf.set_value("phase", ParamValue::Float(3.0)).unwrap();
    assert_eq!(cf.uniform("phase").unwrap().value(), ParamValue::Float(1.0));

    let err = cf.set_value("phase", ParamValue::Bool(true)).unwrap_err();
    assert!(err.to_string().contains("is a float"));
    assert!(cf.set_value("frequency", ParamValue::Float(f64::NAN)).is_err());
    assert!(cf.set_value("missing", ParamValue::Float(0.0)).is_err());

    cf.reset();
    assert_eq!(cf.uniform("phase").unwrap().value(), ParamValue::Float(0.0));
}

#[test]
fn parses_uniform_directives() {
    let src = "\
        #uniform float colorMult 1.5 0.01 0.0 NULL;\n\
        vec3 color(float i) { return vec3(i); }\n\
        #uniform bool smooth_bands true false;\n\
        #uniform color base 0.1 0.2 0.3;\n";
    let cf = ColorFunction::parse("bands", src).unwrap();
    assert_eq!(cf.uniforms.len(), 3);

    let mult = cf.uniform("colorMult").unwrap();
    assert_eq!(
        mult.kind,
        UniformKind::Float {
            range: [0.0, f64::MAX],
            default: 1.5,
            value: 1.5,
            speed: 0.01,
        }
    );
    assert!(mult.update);

    let smooth = cf.uniform("smooth_bands").unwrap();
    assert_eq!(smooth.value(), ParamValue::Bool(true));
    assert!(!smooth.update);
    assert_eq!(smooth.display_name, "Smooth bands");

    assert_eq!(
        cf.uniform("base").unwrap().value(),
        ParamValue::Color(Rgb::new(0.1, 0.2, 0.3))
    );
}

#[test]
fn malformed_directives_are_configuration_errors() {
    for src in [
        "#uniform float x 1.0 0.1 0.0;",
        "#uniform float x 1.0 0.1 0.0 1.0",
        "#uniform vec2 x 1.0 2.0;",
        "#uniform bool x maybe;",
        "#uniform float x 1.0 0.1 2.0 1.0;",
        "#uniform bool x true; #uniform bool x false;",
    ] {
        assert!(
            matches!(ColorFunction::parse("bad", src), Err(SweepError::Configuration(_))),
            "accepted {src:?}"
        );
    }
}

#[test]
fn uniforms_round_trip_through_json() {
    let cf = ColorFunction::default();
    let json = serde_json::to_string(&cf).unwrap();
    assert!(json.contains("\"kind\":\"float\""));
    let back: ColorFunction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cf);
}

#[test]
fn param_values_deserialize_untagged() {
    let v: Vec<ParamValue> =
        serde_json::from_str(r#"[0.5, true, {"r": 1.0, "g": 0.5, "b": 0.0}]"#).unwrap();
    assert_eq!(
        v,
        vec![
            ParamValue::Float(0.5),
            ParamValue::Bool(true),
            ParamValue::Color(Rgb::new(1.0, 0.5, 0.0)),
        ]
    );
}
