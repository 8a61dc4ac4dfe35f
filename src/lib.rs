//! fractal-sweep renders camera sweeps through Mandelbrot and Julia sets.
//!
//! The core is a keyframe curve engine that maps a normalized timeline position `t` to a camera
//! center, a zoom radius and any number of shader parameters:
//!
//! - [`RadiusCurve`] interpolates the zoom in log-space, so geometric zooms over many orders of
//!   magnitude look steady.
//! - [`CenterCurve`] pans along cubic Hermite segments whose handles and timing are scaled by the
//!   radius, with a [`SegmentCursor`] for O(1) sequential playback.
//! - [`LinearCurve`] / [`ScalarCurve`] and [`UniformTrack`] drive the color-function uniforms and
//!   shader constants.
//!
//! A [`Sequencer`] evaluates everything once per frame, pushes the result into a
//! [`FractalRenderer`] (the reference [`CpuRenderer`] ships with the crate) and streams captured
//! frames into a [`FrameSink`] such as [`FfmpegSink`]. A [`Project`] bundles a whole sweep as
//! JSON.
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod encode;
pub(crate) mod project;
pub(crate) mod render;
pub(crate) mod sequence;
pub(crate) mod shader;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgb, Vec2};
pub use crate::foundation::error::{SweepError, SweepResult};
pub use crate::foundation::math::{
    SplineValue, catmull_rom, cubic_hermite, cubic_hermite_derivative, exp_interp, reflect_linear,
};

pub use crate::animation::center::{CenterCurve, Retimed};
pub use crate::animation::cursor::SegmentCursor;
pub use crate::animation::integral::RadiusIntegralTable;
pub use crate::animation::keyframe::{CenterKey, Keyframe, Position, Timeline};
pub use crate::animation::radius::RadiusCurve;
pub use crate::animation::scalar::{CurveValue, LinearCurve, ScalarCurve};
pub use crate::animation::settings::{CurveSettings, Retiming};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};

pub use crate::project::model::Project;

pub use crate::render::backend::{FractalRenderer, FrameRGBA};
pub use crate::render::cpu::{CpuRenderer, JULIA_CONSTANT};
pub use crate::render::fractal::{FractalKind, FractalSettings};
pub use crate::render::palette::CosinePalette;
pub use crate::render::view::{
    ViewRange, pixel_to_plane, plane_to_pixel, view_range, zoom_about_pixel,
};

pub use crate::sequence::sequencer::{
    CameraState, RunStats, Sequencer, StopHandle, TickOutcome, Track,
};
pub use crate::sequence::settings::{TimeEasing, VideoSettings};

pub use crate::shader::tracks::UniformTrack;
pub use crate::shader::uniform::{ColorFunction, ParamValue, Uniform, UniformKind};
