use super::*;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: 30, den: 1 },
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(validate_config(&cfg(0, 10)).is_err());
    assert!(validate_config(&cfg(11, 10)).is_err());
    assert!(
        validate_config(&SinkConfig {
            fps: Fps { num: 0, den: 1 },
            ..cfg(10, 10)
        })
        .is_err()
    );
    assert!(validate_config(&cfg(1920, 1080)).is_ok());
}

#[test]
fn encoder_args_stream_rgba_into_x264() {
    let opts = FfmpegSinkOpts {
        crf: Some(18),
        ..FfmpegSinkOpts::new("out/sweep.mp4")
    };
    let args = encoder_args(&opts, &cfg(1920, 1080));
    let joined = args.join(" ");

    assert_eq!(args[0], "-y");
    assert!(joined.contains("-f rawvideo -pix_fmt rgba -s 1920x1080 -r 30/1 -i pipe:0"));
    assert!(joined.contains("-c:v libx264 -pix_fmt yuv420p -crf 18"));
    assert_eq!(args.last().map(String::as_str), Some("out/sweep.mp4"));
}

#[test]
fn no_overwrite_uses_dash_n() {
    let opts = FfmpegSinkOpts {
        overwrite: false,
        ..FfmpegSinkOpts::new("a.mp4")
    };
    let args = encoder_args(&opts, &cfg(2, 2));
    assert_eq!(args[0], "-n");
    assert!(!args.iter().any(|a| a == "-crf"));
}

#[test]
fn input_fps_is_rational() {
    assert_eq!(
        input_fps_args(Fps {
            num: 30000,
            den: 1001
        }),
        ["-r".to_string(), "30000/1001".to_string()]
    );
}

#[test]
fn push_before_begin_is_an_error() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("never.mp4"));
    let frame = FrameRGBA::new(2, 2, vec![0; 16]).unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = std::env::temp_dir()
        .join("fractal_sweep_ensure_parent")
        .join(format!("{}", std::process::id()));
    let out = dir.join("nested").join("out.mp4");
    ensure_parent_dir(&out).unwrap();
    assert!(out.parent().unwrap().is_dir());
    let _ = std::fs::remove_dir_all(&dir);
}
