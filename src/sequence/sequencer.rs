use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{
    animation::{
        center::CenterCurve, keyframe::Keyframe, radius::RadiusCurve, scalar::LinearCurve,
    },
    encode::sink::{FrameSink, SinkConfig},
    foundation::{
        core::{FrameIndex, Vec2},
        error::{SweepError, SweepResult},
    },
    render::backend::{FractalRenderer, FrameRGBA},
    sequence::settings::VideoSettings,
    shader::{
        tracks::UniformTrack,
        uniform::{ColorFunction, ParamValue},
    },
};

/// Everything the renderer needs for one timeline position.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraState {
    pub t: f64,
    pub center: Vec2,
    pub radius: f64,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
    #[serde(default)]
    pub constants: BTreeMap<String, Vec2>,
}

/// Names one of the sequencer's timelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Track<'a> {
    Radius,
    Center,
    /// The track of a color-function uniform.
    Param(&'a str),
    /// A named `Vec2` shader constant.
    Constant(&'a str),
}

/// Cloneable cancellation flag, checked once per tick. Once raised it stays raised.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a single [`Sequencer::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The frame was pushed to the renderer (and to the sink, if any).
    Rendered(FrameIndex),
    /// Every frame has already been produced.
    Finished,
    /// The stop handle was raised; no frame was produced.
    Stopped,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub frames_total: u64,
    pub frames_rendered: u64,
    pub stopped: bool,
    /// Precision warnings raised by the center curve during this run.
    pub precision_warnings: u64,
}

/// Drives every curve once per output frame and feeds the renderer and encoder.
///
/// Owns the radius and center curves, one track per uniform of the active color function, and
/// any number of named `Vec2` constant tracks. Evaluation is single threaded; the center curve's
/// cursor assumes frames are requested in order (see [`Self::seek`]).
pub struct Sequencer {
    settings: VideoSettings,
    radius: RadiusCurve,
    center: CenterCurve,
    color: ColorFunction,
    params: BTreeMap<String, UniformTrack>,
    constants: BTreeMap<String, LinearCurve<Vec2>>,
    frame: u64,
    stop: StopHandle,
}

impl Sequencer {
    /// Build a sequencer driving the built-in color function.
    pub fn new(
        settings: VideoSettings,
        radius: RadiusCurve,
        center: CenterCurve,
    ) -> SweepResult<Self> {
        settings.validate()?;
        let mut seq = Self {
            settings,
            radius,
            center,
            color: ColorFunction::default(),
            params: BTreeMap::new(),
            constants: BTreeMap::new(),
            frame: 0,
            stop: StopHandle::default(),
        };
        seq.reseed_params()?;
        Ok(seq)
    }

    pub fn settings(&self) -> &VideoSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: VideoSettings) -> SweepResult<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn radius(&self) -> &RadiusCurve {
        &self.radius
    }

    pub fn radius_mut(&mut self) -> &mut RadiusCurve {
        &mut self.radius
    }

    pub fn center(&self) -> &CenterCurve {
        &self.center
    }

    pub fn center_mut(&mut self) -> &mut CenterCurve {
        &mut self.center
    }

    pub fn color_function(&self) -> &ColorFunction {
        &self.color
    }

    pub fn param_track(&self, name: &str) -> Option<&UniformTrack> {
        self.params.get(name)
    }

    pub fn param_track_mut(&mut self, name: &str) -> Option<&mut UniformTrack> {
        self.params.get_mut(name)
    }

    pub fn constant_track(&self, name: &str) -> Option<&LinearCurve<Vec2>> {
        self.constants.get(name)
    }

    /// Next frame [`Self::tick`] will produce.
    pub fn frame(&self) -> FrameIndex {
        FrameIndex(self.frame)
    }

    pub fn total_frames(&self) -> u64 {
        self.settings.total_frames()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Jump playback to `frame`. The center cursor is parked so the next query starts fresh.
    pub fn seek(&mut self, frame: FrameIndex) {
        self.frame = frame.0.min(self.total_frames());
        self.center.reset_cursor();
    }

    /// Make `color` the active color function.
    ///
    /// The sequencer keeps its own copy; every uniform gets a fresh track holding its current
    /// value at `t = 0`. Existing parameter keyframes are discarded.
    pub fn set_color_function(&mut self, color: &ColorFunction) -> SweepResult<()> {
        color.validate()?;
        self.color = color.clone();
        self.reseed_params()
    }

    fn reseed_params(&mut self) -> SweepResult<()> {
        self.params = self
            .color
            .uniforms
            .iter()
            .map(|u| Ok((u.name.clone(), UniformTrack::seed(u)?)))
            .collect::<SweepResult<_>>()?;
        Ok(())
    }

    /// Replace the keys of uniform `name`'s track.
    pub fn set_param_keys(
        &mut self,
        name: &str,
        keys: Vec<Keyframe<ParamValue>>,
    ) -> SweepResult<()> {
        let uniform = self
            .color
            .uniform(name)
            .ok_or_else(|| unknown_track(Track::Param(name)))?;
        let track = UniformTrack::from_keys(uniform, keys)?;
        self.params.insert(name.to_owned(), track);
        Ok(())
    }

    /// Start a constant track holding `value` at `t = 0`.
    pub fn add_constant_track(&mut self, name: &str, value: Vec2) -> SweepResult<()> {
        if self.constants.contains_key(name) {
            return Err(SweepError::configuration(format!(
                "constant track '{name}' already exists"
            )));
        }
        self.constants
            .insert(name.to_owned(), LinearCurve::new(value)?);
        Ok(())
    }

    /// Replace (or create) constant track `name` from `keys`.
    pub fn set_constant_keys(&mut self, name: &str, keys: Vec<Keyframe<Vec2>>) -> SweepResult<()> {
        let curve = LinearCurve::from_keys(keys)?;
        self.constants.insert(name.to_owned(), curve);
        Ok(())
    }

    pub fn remove_constant_track(&mut self, name: &str) -> SweepResult<()> {
        self.constants
            .remove(name)
            .map(drop)
            .ok_or_else(|| unknown_track(Track::Constant(name)))
    }

    pub fn add_radius_keyframe(&mut self, t: f64, radius: f64) -> SweepResult<usize> {
        self.radius.add_keyframe(t, radius)
    }

    pub fn add_center_keyframe(&mut self, t: f64, pos: Vec2, vel: Vec2) -> SweepResult<usize> {
        self.center.add_keyframe(t, pos, vel)
    }

    pub fn add_param_keyframe(
        &mut self,
        name: &str,
        t: f64,
        value: ParamValue,
    ) -> SweepResult<usize> {
        self.params
            .get_mut(name)
            .ok_or_else(|| unknown_track(Track::Param(name)))?
            .add_keyframe(t, value)
    }

    pub fn add_constant_keyframe(&mut self, name: &str, t: f64, value: Vec2) -> SweepResult<usize> {
        self.constants
            .get_mut(name)
            .ok_or_else(|| unknown_track(Track::Constant(name)))?
            .add_keyframe(t, value)
    }

    /// Remove keyframe `index` from `track`. A track's last keyframe cannot be removed.
    pub fn remove_keyframe(&mut self, track: Track<'_>, index: usize) -> SweepResult<()> {
        match track {
            Track::Radius => self.radius.remove_keyframe(index).map(drop),
            Track::Center => self.center.remove_keyframe(index).map(drop),
            Track::Param(name) => self
                .params
                .get_mut(name)
                .ok_or_else(|| unknown_track(track))?
                .remove_keyframe(index),
            Track::Constant(name) => self
                .constants
                .get_mut(name)
                .ok_or_else(|| unknown_track(track))?
                .remove_keyframe(index)
                .map(drop),
        }
    }

    /// Move keyframe `index` of `track` to `t`. Returns the key's index after re-sorting.
    pub fn set_keyframe_time(
        &mut self,
        track: Track<'_>,
        index: usize,
        t: f64,
    ) -> SweepResult<usize> {
        match track {
            Track::Radius => self.radius.set_keyframe_time(index, t),
            Track::Center => self.center.set_keyframe_time(index, t),
            Track::Param(name) => self
                .params
                .get_mut(name)
                .ok_or_else(|| unknown_track(track))?
                .set_keyframe_time(index, t),
            Track::Constant(name) => self
                .constants
                .get_mut(name)
                .ok_or_else(|| unknown_track(track))?
                .set_keyframe_time(index, t),
        }
    }

    pub fn set_radius_keyframe_value(&mut self, index: usize, radius: f64) -> SweepResult<()> {
        self.radius.set_keyframe_value(index, radius)
    }

    pub fn set_center_keyframe_value(&mut self, index: usize, pos: Vec2) -> SweepResult<()> {
        self.center.set_keyframe_value(index, pos)
    }

    pub fn set_center_keyframe_velocity(&mut self, index: usize, vel: Vec2) -> SweepResult<()> {
        self.center.set_keyframe_velocity(index, vel)
    }

    pub fn set_param_keyframe_value(
        &mut self,
        name: &str,
        index: usize,
        value: ParamValue,
    ) -> SweepResult<()> {
        self.params
            .get_mut(name)
            .ok_or_else(|| unknown_track(Track::Param(name)))?
            .set_keyframe_value(index, value)
    }

    pub fn set_constant_keyframe_value(
        &mut self,
        name: &str,
        index: usize,
        value: Vec2,
    ) -> SweepResult<()> {
        self.constants
            .get_mut(name)
            .ok_or_else(|| unknown_track(Track::Constant(name)))?
            .set_keyframe_value(index, value)
    }

    /// Drop every derived table.
    pub fn invalidate(&mut self) {
        self.center.invalidate();
    }

    /// Rebuild the radius integral with `sample_spacing`.
    pub fn invalidate_radius(&mut self, sample_spacing: f64) -> SweepResult<()> {
        self.center.invalidate_radius(&self.radius, sample_spacing)
    }

    pub fn invalidate_center(&mut self) {
        self.center.invalidate_center();
    }

    /// Evaluate every track at `t` through the center cursor.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn evaluate(&mut self, t: f64) -> CameraState {
        let center = self.center.get_center(t, &self.radius);
        self.state_with_center(t, center)
    }

    /// Like [`Self::evaluate`], but without reading or moving the center cursor.
    pub fn evaluate_at(&mut self, t: f64) -> CameraState {
        let center = self.center.center_at(t, &self.radius);
        self.state_with_center(t, center)
    }

    fn state_with_center(&self, t: f64, center: Vec2) -> CameraState {
        CameraState {
            t,
            center,
            radius: self.radius.get_radius(t),
            parameters: self
                .params
                .iter()
                .map(|(name, track)| (name.clone(), track.sample(t)))
                .collect(),
            constants: self
                .constants
                .iter()
                .map(|(name, curve)| (name.clone(), curve.get_value(t)))
                .collect(),
        }
    }

    /// Push `state` to `renderer`.
    pub fn apply(state: &CameraState, renderer: &mut dyn FractalRenderer) {
        renderer.set_camera_center(state.center);
        renderer.set_camera_radius(state.radius);
        for (name, value) in &state.parameters {
            renderer.set_shader_parameter(name, *value);
        }
        for (name, value) in &state.constants {
            renderer.set_shader_constant(name, *value);
        }
    }

    /// Produce the next frame.
    ///
    /// Evaluates the eased frame time, pushes the state to `renderer`, runs `steps_per_frame`
    /// refinement passes and, when `sink` is given, captures and writes the frame. The frame
    /// counter only advances once the sink has accepted the frame.
    pub fn tick(
        &mut self,
        renderer: &mut dyn FractalRenderer,
        sink: Option<&mut dyn FrameSink>,
    ) -> SweepResult<TickOutcome> {
        if self.stop.is_stopped() {
            return Ok(TickOutcome::Stopped);
        }
        if self.frame >= self.total_frames() {
            return Ok(TickOutcome::Finished);
        }

        let idx = FrameIndex(self.frame);
        let t = self.settings.frame_time(self.frame);
        let state = self.evaluate(t);
        Self::apply(&state, renderer);
        renderer.refine(self.settings.steps_per_frame)?;

        if let Some(sink) = sink {
            let frame = renderer.capture_frame_buffer()?;
            self.check_frame(&frame)?;
            sink.push_frame(idx, &frame)?;
        }

        self.frame += 1;
        Ok(TickOutcome::Rendered(idx))
    }

    fn check_frame(&self, frame: &FrameRGBA) -> SweepResult<()> {
        let canvas = self.settings.canvas();
        if frame.canvas() != canvas {
            return Err(SweepError::evaluation(format!(
                "renderer captured {}x{}, expected {}x{}",
                frame.width, frame.height, canvas.width, canvas.height
            )));
        }
        frame.check_len()
    }

    /// Render the whole sweep from frame 0 into `sink`.
    ///
    /// `end` is called on the sink even when a tick fails or the stop handle is raised, so an
    /// encoder can finalize what it has.
    #[tracing::instrument(skip_all, fields(frames = self.total_frames()))]
    pub fn run(
        &mut self,
        renderer: &mut dyn FractalRenderer,
        sink: &mut dyn FrameSink,
    ) -> SweepResult<RunStats> {
        renderer.set_size(self.settings.canvas())?;
        self.seek(FrameIndex(0));
        let warnings_before = self.center.precision_warnings();

        sink.begin(SinkConfig {
            width: self.settings.width,
            height: self.settings.height,
            fps: self.settings.fps,
        })?;
        tracing::info!(
            width = self.settings.width,
            height = self.settings.height,
            fps = self.settings.fps.as_f64(),
            "render started"
        );

        let mut stats = RunStats {
            frames_total: self.total_frames(),
            ..RunStats::default()
        };
        let result = self.run_frames(renderer, sink, &mut stats);
        let ended = sink.end();
        result?;
        ended?;

        stats.precision_warnings = self
            .center
            .precision_warnings()
            .saturating_sub(warnings_before);
        tracing::info!(
            frames = stats.frames_rendered,
            stopped = stats.stopped,
            precision_warnings = stats.precision_warnings,
            "render finished"
        );
        Ok(stats)
    }

    fn run_frames(
        &mut self,
        renderer: &mut dyn FractalRenderer,
        sink: &mut dyn FrameSink,
        stats: &mut RunStats,
    ) -> SweepResult<()> {
        loop {
            let sink: &mut dyn FrameSink = &mut *sink;
            match self.tick(renderer, Some(sink))? {
                TickOutcome::Rendered(_) => stats.frames_rendered += 1,
                TickOutcome::Finished => return Ok(()),
                TickOutcome::Stopped => {
                    stats.stopped = true;
                    return Ok(());
                }
            }
        }
    }
}

fn unknown_track(track: Track<'_>) -> SweepError {
    SweepError::configuration(format!("no such track: {track:?}"))
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/sequencer.rs"]
mod tests;
