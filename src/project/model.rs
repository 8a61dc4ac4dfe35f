use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use crate::{
    animation::{
        center::CenterCurve,
        keyframe::{CenterKey, Keyframe},
        radius::RadiusCurve,
        settings::CurveSettings,
    },
    encode::ffmpeg::ensure_parent_dir,
    foundation::{
        core::Vec2,
        error::{SweepError, SweepResult},
    },
    render::{cpu::CpuRenderer, fractal::FractalSettings},
    sequence::{sequencer::Sequencer, settings::VideoSettings},
    shader::uniform::{ColorFunction, ParamValue},
};

/// A complete sweep on disk: settings, every keyframe track and the color function.
///
/// This is the JSON boundary object; [`Project::into_sequencer`] turns it into the runtime
/// curves.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Project {
    #[serde(default)]
    pub video: VideoSettings,
    #[serde(default)]
    pub curve: CurveSettings,
    #[serde(default)]
    pub fractal: FractalSettings,
    pub radius: Vec<Keyframe<f64>>,
    pub center: Vec<Keyframe<CenterKey>>,
    #[serde(default)]
    pub color_function: ColorFunction,
    /// Keys per uniform name. Uniforms without an entry hold their current value.
    #[serde(default)]
    pub params: BTreeMap<String, Vec<Keyframe<ParamValue>>>,
    /// Keys per shader constant name.
    #[serde(default)]
    pub constants: BTreeMap<String, Vec<Keyframe<Vec2>>>,
}

const DEFAULT_RADII: [(f64, f64); 5] = [
    (0.0, 1.0),
    (0.33, 0.008057857721976197),
    (0.433, 0.28782969446188766),
    (0.632, 0.006049181474278884),
    (0.795, 1.172453080986668e-05),
];

const DEFAULT_CENTERS: [(f64, f64, f64); 5] = [
    (0.0, -0.5, 0.0),
    (0.33, -1.2558024544068163, 0.38112841375594236),
    (0.433, -0.8392324486465885, 0.37356936504006194),
    (0.632, -0.5973014418167584, 0.6631019637438973),
    (0.795, -0.5952023547186579, 0.6680937984694201),
];

impl Default for Project {
    /// A dive into the period-3 bulb, out again, and down into seahorse valley.
    fn default() -> Self {
        Self {
            video: VideoSettings::default(),
            curve: CurveSettings::default(),
            fractal: FractalSettings::default(),
            radius: DEFAULT_RADII
                .iter()
                .map(|&(t, r)| Keyframe::new(t, r))
                .collect(),
            center: DEFAULT_CENTERS
                .iter()
                .map(|&(t, x, y)| Keyframe::new(t, CenterKey::anchor(Vec2::new(x, y))))
                .collect(),
            color_function: ColorFunction::default(),
            params: BTreeMap::new(),
            constants: BTreeMap::new(),
        }
    }
}

impl Project {
    /// Parse a project from a JSON reader.
    pub fn from_reader<R: Read>(r: R) -> SweepResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| SweepError::serde(format!("parse project JSON: {e}")))
    }

    /// Parse a project from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SweepResult<Self> {
        use anyhow::Context as _;
        let path = path.as_ref();
        let f = File::open(path)
            .with_context(|| format!("open project JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_writer<W: Write>(&self, w: W) -> SweepResult<()> {
        serde_json::to_writer_pretty(w, self)
            .map_err(|e| SweepError::serde(format!("write project JSON: {e}")))
    }

    /// Write the project as pretty JSON, creating parent directories as needed.
    pub fn write_path(&self, path: impl AsRef<Path>) -> SweepResult<()> {
        use anyhow::Context as _;
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        let f = File::create(path)
            .with_context(|| format!("create project JSON '{}'", path.display()))?;
        let mut w = BufWriter::new(f);
        self.to_writer(&mut w)?;
        w.flush()
            .with_context(|| format!("flush project JSON '{}'", path.display()))?;
        Ok(())
    }

    /// Settings-level checks; keyframe checks happen in [`Self::into_sequencer`].
    pub fn validate(&self) -> SweepResult<()> {
        self.video.validate()?;
        self.curve.validate()?;
        self.fractal.validate()?;
        self.color_function.validate()
    }

    /// Build the runtime curves and tracks this project describes.
    pub fn into_sequencer(&self) -> SweepResult<Sequencer> {
        self.validate()?;
        let radius = RadiusCurve::from_keys(self.radius.clone())?;
        let center = CenterCurve::from_keys(self.center.clone(), self.curve.clone())?;
        let mut seq = Sequencer::new(self.video.clone(), radius, center)?;
        seq.set_color_function(&self.color_function)?;
        for (name, keys) in &self.params {
            seq.set_param_keys(name, keys.clone())?;
        }
        for (name, keys) in &self.constants {
            seq.set_constant_keys(name, keys.clone())?;
        }
        Ok(seq)
    }

    /// The reference CPU renderer configured with this project's fractal settings.
    pub fn renderer(&self) -> SweepResult<CpuRenderer> {
        CpuRenderer::new(self.fractal.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/model.rs"]
mod tests;
