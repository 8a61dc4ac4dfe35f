use super::*;
use crate::foundation::core::Fps;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 2,
        height: 2,
        fps: Fps::new(30, 1).unwrap(),
    }
}

#[test]
fn in_memory_sink_records_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    for i in 0..3u8 {
        let frame = FrameRGBA::new(2, 2, vec![i; 16]).unwrap();
        sink.push_frame(FrameIndex(u64::from(i)), &frame).unwrap();
    }
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(&cfg()));
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, vec![0, 1, 2]);
    assert_eq!(sink.frames()[2].1.data[0], 2);
}

#[test]
fn in_memory_sink_rejects_short_buffers() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let bad = FrameRGBA {
        width: 2,
        height: 2,
        data: vec![0; 15],
    };
    assert!(sink.push_frame(FrameIndex(0), &bad).is_err());
    assert!(sink.frames().is_empty());
}

#[test]
fn begin_clears_previous_recording() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    let frame = FrameRGBA::new(2, 2, vec![0; 16]).unwrap();
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.end().unwrap();

    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}
