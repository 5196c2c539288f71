use crate::error::GelSimError;
use std::path::Path;

/// One RGB pixel.
pub type Rgb = [u8; 3];

/// Linear blend from `from` to `to`; `t` is clamped to [0, 1].
pub fn blend(from: Rgb, to: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for (channel, (a, b)) in out.iter_mut().zip(from.iter().zip(to.iter())) {
        *channel = (f32::from(*a) + (f32::from(*b) - f32::from(*a)) * t).round() as u8;
    }
    out
}

/// A coordinate-addressed RGB pixel buffer with a band-drawing primitive.
///
/// All drawing clips silently at the canvas edges, so callers never have to
/// pre-clamp geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&background);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.pixels[idx..idx + 3].copy_from_slice(&color);
    }

    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y.min(self.height)..y_end {
            for col in x.min(self.width)..x_end {
                self.set(col, row, color);
            }
        }
    }

    /// Draws a horizontal band rectangle centered at (`center_x`, `center_y`).
    pub fn draw_band(&mut self, center_x: u32, center_y: u32, width: u32, height: u32, color: Rgb) {
        let x = center_x.saturating_sub(width / 2);
        let y = center_y.saturating_sub(height / 2);
        self.fill_rect(x, y, width, height, color);
    }

    /// Raw RGB8 buffer, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn write_png(&self, path: &Path) -> Result<(), GelSimError> {
        image::save_buffer(
            path,
            &self.pixels,
            self.width,
            self.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|source| GelSimError::RenderIo {
            path: path.to_path_buf(),
            source,
        })
    }
}
