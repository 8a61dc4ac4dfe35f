use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::{
    foundation::{
        core::{Canvas, Rgb, Vec2},
        error::{SweepError, SweepResult},
    },
    render::{
        backend::{FractalRenderer, FrameRGBA},
        fractal::FractalSettings,
        palette::CosinePalette,
        view::pixel_to_plane,
    },
    shader::uniform::ParamValue,
};

/// Name of the shader constant holding the Julia `c`.
pub const JULIA_CONSTANT: &str = "c";

/// Reference renderer: escape-time iteration on the CPU with progressive accumulation.
///
/// Every [`FractalRenderer::refine`] pass adds one sample per pixel at a sub-pixel offset taken
/// from an R2 low-discrepancy sequence; the captured frame is the running average. Any change to
/// the view, size or parameters restarts accumulation.
pub struct CpuRenderer {
    settings: FractalSettings,
    canvas: Canvas,
    center: Vec2,
    radius: f64,
    params: BTreeMap<String, ParamValue>,
    constants: BTreeMap<String, Vec2>,
    accum: Vec<Rgb>,
    epochs: u32,
    pool: Option<rayon::ThreadPool>,
}

impl CpuRenderer {
    pub fn new(settings: FractalSettings) -> SweepResult<Self> {
        settings.validate()?;
        let pool = settings.threads.map(build_thread_pool).transpose()?;
        Ok(Self {
            settings,
            canvas: Canvas {
                width: 1,
                height: 1,
            },
            center: Vec2::ZERO,
            radius: 1.0,
            params: BTreeMap::new(),
            constants: BTreeMap::new(),
            accum: vec![Rgb::BLACK],
            epochs: 0,
            pool,
        })
    }

    pub fn settings(&self) -> &FractalSettings {
        &self.settings
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Accumulation passes since the last reset.
    pub fn epochs(&self) -> u32 {
        self.epochs
    }

    pub fn reset_accumulation(&mut self) {
        self.epochs = 0;
        self.accum.fill(Rgb::BLACK);
    }

    fn julia_c(&self) -> Vec2 {
        self.constants
            .get(JULIA_CONSTANT)
            .copied()
            .unwrap_or(self.settings.julia_c)
    }

    fn accumulate_pass(&mut self) {
        let offset = jitter(self.epochs);
        let palette = CosinePalette::from_params(&self.params);
        let julia_c = self.julia_c();
        let (canvas, center, radius) = (self.canvas, self.center, self.radius);
        let settings = &self.settings;
        let width = canvas.width as usize;

        let shade_row = |(row, out): (usize, &mut [Rgb])| {
            for (col, acc) in out.iter_mut().enumerate() {
                let pixel = Vec2::new(col as f64 + offset.x, row as f64 + offset.y);
                let p = pixel_to_plane(pixel, center, radius, canvas);
                let color = match settings.escape_time(p, julia_c) {
                    Some(n) => palette.color(n),
                    None => settings.set_color,
                };
                *acc = *acc + color;
            }
        };

        let accum = &mut self.accum;
        match &self.pool {
            Some(pool) => {
                pool.install(|| accum.par_chunks_mut(width).enumerate().for_each(shade_row))
            }
            None => accum.par_chunks_mut(width).enumerate().for_each(shade_row),
        }
        self.epochs += 1;
    }
}

impl FractalRenderer for CpuRenderer {
    fn set_size(&mut self, canvas: Canvas) -> SweepResult<()> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(SweepError::configuration(format!(
                "render size must be non-zero, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        if canvas != self.canvas {
            self.canvas = canvas;
            self.accum = vec![Rgb::BLACK; canvas.width as usize * canvas.height as usize];
            self.epochs = 0;
        }
        Ok(())
    }

    fn set_camera_center(&mut self, center: Vec2) {
        if center != self.center {
            self.center = center;
            self.reset_accumulation();
        }
    }

    fn set_camera_radius(&mut self, radius: f64) {
        if radius != self.radius {
            self.radius = radius;
            self.reset_accumulation();
        }
    }

    fn set_shader_parameter(&mut self, name: &str, value: ParamValue) {
        if self.params.get(name) != Some(&value) {
            self.params.insert(name.to_owned(), value);
            self.reset_accumulation();
        }
    }

    fn set_shader_constant(&mut self, name: &str, value: Vec2) {
        if self.constants.get(name) != Some(&value) {
            self.constants.insert(name.to_owned(), value);
            self.reset_accumulation();
        }
    }

    fn refine(&mut self, passes: u32) -> SweepResult<()> {
        for _ in 0..passes {
            if self.settings.max_epochs != 0 && self.epochs >= self.settings.max_epochs {
                break;
            }
            self.accumulate_pass();
        }
        Ok(())
    }

    fn capture_frame_buffer(&mut self) -> SweepResult<FrameRGBA> {
        if self.epochs == 0 {
            self.accumulate_pass();
        }
        let inv = 1.0 / f64::from(self.epochs);
        let data = self
            .accum
            .iter()
            .flat_map(|c| (*c * inv).to_rgba8())
            .collect();
        FrameRGBA::new(self.canvas.width, self.canvas.height, data)
    }
}

/// Sub-pixel sample offset for pass `epoch`; the first pass samples pixel centers.
fn jitter(epoch: u32) -> Vec2 {
    // Plastic number; successive offsets form the R2 sequence.
    const G: f64 = 1.324_717_957_244_746;
    let n = f64::from(epoch);
    Vec2::new((0.5 + n / G).fract(), (0.5 + n / (G * G)).fract())
}

fn build_thread_pool(threads: usize) -> SweepResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| SweepError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
