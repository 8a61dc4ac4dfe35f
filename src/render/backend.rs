use crate::{
    foundation::{
        core::{Canvas, Vec2},
        error::{SweepError, SweepResult},
    },
    shader::uniform::ParamValue,
};

/// A captured frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major, row 0 at the top.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> SweepResult<Self> {
        let frame = Self {
            width,
            height,
            data,
        };
        frame.check_len()?;
        Ok(frame)
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Verify `data` holds exactly `width * height * 4` bytes.
    pub fn check_len(&self) -> SweepResult<()> {
        let expected = self.canvas().frame_bytes();
        if self.data.len() != expected {
            return Err(SweepError::evaluation(format!(
                "frame buffer is {} bytes, expected {expected} for {}x{}",
                self.data.len(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

/// The rendering surface the sequencer drives once per frame.
///
/// Implementations own whatever accumulation state they need; any camera or parameter change is
/// expected to restart accumulation.
pub trait FractalRenderer {
    fn set_size(&mut self, canvas: Canvas) -> SweepResult<()>;

    fn set_camera_center(&mut self, center: Vec2);

    fn set_camera_radius(&mut self, radius: f64);

    fn set_shader_parameter(&mut self, name: &str, value: ParamValue);

    fn set_shader_constant(&mut self, name: &str, value: Vec2);

    /// Run `passes` accumulation passes on the current view.
    fn refine(&mut self, passes: u32) -> SweepResult<()>;

    /// Read back the accumulated image.
    fn capture_frame_buffer(&mut self) -> SweepResult<FrameRGBA>;
}
