use crate::foundation::{
    core::{Canvas, Fps},
    error::{SweepError, SweepResult},
};

/// Global remap applied to the frame time before any curve is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEasing {
    #[default]
    Linear,
    /// `0.5 - 0.5 cos(pi t)`: the whole sweep eases in and out.
    Sine,
}

impl TimeEasing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::Sine => 0.5 - 0.5 * (std::f64::consts::PI * t).cos(),
        }
    }
}

/// Output video parameters.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub fps: Fps,
    pub duration_secs: f64,
    /// Accumulation passes the renderer runs before each frame is captured.
    pub steps_per_frame: u32,
    pub time_easing: TimeEasing,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: Fps { num: 30, den: 1 },
            duration_secs: 10.0,
            steps_per_frame: 10,
            time_easing: TimeEasing::Linear,
        }
    }
}

impl VideoSettings {
    pub fn validate(&self) -> SweepResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SweepError::configuration(format!(
                "video size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(SweepError::configuration(
                "duration_secs must be finite and > 0",
            ));
        }
        if self.steps_per_frame == 0 {
            return Err(SweepError::configuration("steps_per_frame must be > 0"));
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// `ceil(fps * duration)`, at least one frame.
    pub fn total_frames(&self) -> u64 {
        self.fps.frames_for_secs(self.duration_secs).max(1)
    }

    /// Eased timeline position of `frame`: `frame / (total - 1)`, or `0` for a single frame.
    pub fn frame_time(&self, frame: u64) -> f64 {
        let total = self.total_frames();
        let t = if total <= 1 {
            0.0
        } else {
            (frame.min(total - 1) as f64) / ((total - 1) as f64)
        };
        self.time_easing.apply(t)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/settings.rs"]
mod tests;
