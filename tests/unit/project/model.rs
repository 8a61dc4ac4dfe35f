use super::*;
use crate::{foundation::core::Rgb, sequence::settings::TimeEasing};

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join("fractal_sweep_project")
        .join(format!("{}_{name}", std::process::id()))
}

#[test]
fn default_project_builds_a_sequencer() {
    let project = Project::default();
    project.validate().unwrap();
    let mut seq = project.into_sequencer().unwrap();
    assert_eq!(seq.total_frames(), 300);

    let start = seq.evaluate(0.0);
    assert_eq!(start.center, Vec2::new(-0.5, 0.0));
    assert_eq!(start.radius, 1.0);
    let end = seq.evaluate(1.0);
    assert_eq!(end.center, Vec2::new(-0.5952023547186579, 0.6680937984694201));
    assert_eq!(end.radius, 1.172453080986668e-05);
}

#[test]
fn minimal_json_fills_in_defaults() {
    let json = r#"{
        "radius": [{"t": 0.0, "value": 2.0}],
        "center": [{"t": 0.0, "value": {"pos": {"x": 0.25, "y": 0.0}}}]
    }"#;
    let project = Project::from_reader(json.as_bytes()).unwrap();
    assert_eq!(project.video, VideoSettings::default());
    assert_eq!(project.color_function, ColorFunction::default());
    assert_eq!(project.center[0].value.vel, Vec2::ZERO);

    let mut seq = project.into_sequencer().unwrap();
    let state = seq.evaluate(0.7);
    assert_eq!(state.center, Vec2::new(0.25, 0.0));
    assert_eq!(state.radius, 2.0);
}

#[test]
fn params_and_constants_are_loaded() {
    let mut project = Project::default();
    project.params.insert(
        "tint".to_owned(),
        vec![
            Keyframe::new(0.0, ParamValue::Color(Rgb::new(0.0, 0.0, 0.0))),
            Keyframe::new(1.0, ParamValue::Color(Rgb::new(1.0, 1.0, 1.0))),
        ],
    );
    project.constants.insert(
        "c".to_owned(),
        vec![
            Keyframe::new(0.0, Vec2::new(-0.8, 0.156)),
            Keyframe::new(1.0, Vec2::new(-0.7, 0.27)),
        ],
    );
    let mut seq = project.into_sequencer().unwrap();
    let end = seq.evaluate(1.0);
    assert_eq!(
        end.parameters.get("tint"),
        Some(&ParamValue::Color(Rgb::new(1.0, 1.0, 1.0)))
    );
    assert_eq!(end.constants.get("c"), Some(&Vec2::new(-0.7, 0.27)));
}

#[test]
fn bad_projects_are_rejected() {
    let mut unknown_param = Project::default();
    unknown_param
        .params
        .insert("nope".to_owned(), vec![Keyframe::new(0.0, ParamValue::Float(1.0))]);
    assert!(unknown_param.into_sequencer().is_err());

    let mut bad_radius = Project::default();
    bad_radius.radius[1].value = -1.0;
    assert!(matches!(
        bad_radius.into_sequencer(),
        Err(SweepError::Domain(_))
    ));

    let mut empty_center = Project::default();
    empty_center.center.clear();
    assert!(matches!(
        empty_center.into_sequencer(),
        Err(SweepError::Configuration(_))
    ));

    assert!(matches!(
        Project::from_reader("{".as_bytes()),
        Err(SweepError::Serde(_))
    ));
}

#[test]
fn write_then_read_preserves_structure() {
    let path = temp_path("nested").join("project.json");
    let mut project = Project::default();
    project.video.time_easing = TimeEasing::Sine;
    project.write_path(&path).unwrap();

    let back = Project::from_path(&path).unwrap();
    assert_eq!(back.video, project.video);
    assert_eq!(back.radius.len(), 5);
    assert_eq!(back.center.len(), 5);
    assert_eq!(back.color_function.uniforms.len(), 4);
    let _ = std::fs::remove_dir_all(temp_path("nested"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Project::from_path(temp_path("does_not_exist.json")).unwrap_err();
    assert!(matches!(err, SweepError::Other(_)));
    assert!(err.to_string().contains("open project JSON"));
}
