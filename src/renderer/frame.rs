//! Frame view - RGBA8 pixels borrowed from the host

use crate::error::{Result, WandError};

/// RGBA pixel
pub type Pixel = [u8; 4];

/// Mutable view over a `width × height` RGBA8 buffer, row-major
pub struct Frame<'a> {
    pixels: &'a mut [Pixel],
    width: usize,
    height: usize,
}

impl<'a> Frame<'a> {
    /// Wrap a flat byte buffer (e.g. `ImageData.data`) without copying
    pub fn from_rgba(buffer: &'a mut [u8], width: usize, height: usize) -> Result<Self> {
        let expected = width.checked_mul(height).and_then(|n| n.checked_mul(4));
        if expected != Some(buffer.len()) {
            return Err(WandError::FrameSizeMismatch {
                expected: expected.unwrap_or(usize::MAX),
                actual: buffer.len(),
            });
        }
        // [u8; 4] has alignment 1 and the length is a multiple of 4
        let pixels: &mut [Pixel] = bytemuck::cast_slice_mut(buffer);
        Ok(Self { pixels, width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// `result = background·(1 − alpha) + color·alpha` on RGB; alpha channel untouched
    pub fn blend(&mut self, x: usize, y: usize, color: [u8; 3], alpha: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let alpha = alpha.clamp(0.0, 1.0);
        let px = &mut self.pixels[y * self.width + x];
        for (bg, &c) in px.iter_mut().zip(color.iter()) {
            let mixed = *bg as f32 * (1.0 - alpha) + c as f32 * alpha;
            *bg = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    /// Flip horizontally so the user sees a mirror image
    pub fn mirror(&mut self) {
        if self.width == 0 {
            return;
        }
        for row in self.pixels.chunks_exact_mut(self.width) {
            row.reverse();
        }
    }
}
