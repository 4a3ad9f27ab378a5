//! Frame buffers read back from the viewer.

/// Channel order of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelFormat {
    /// Red, green, blue, alpha.
    #[default]
    Rgba8,
    /// Blue, green, red, alpha (common swapchain format).
    Bgra8,
}

/// A rendered frame, 4 bytes per pixel, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl RgbaFrame {
    /// Wraps raw pixel data.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format,
            data,
        }
    }

    /// Creates a frame filled with one RGBA color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = width as usize * height as usize;
        Self::new(width, height, PixelFormat::Rgba8, rgba.repeat(pixels))
    }

    /// Returns whether the buffer length matches the dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == self.width as usize * self.height as usize * 4
    }

    /// Returns the pixels in RGBA order.
    pub fn into_rgba(self) -> Vec<u8> {
        match self.format {
            PixelFormat::Rgba8 => self.data,
            PixelFormat::Bgra8 => {
                let mut data = self.data;
                for chunk in data.chunks_exact_mut(4) {
                    chunk.swap(0, 2); // Swap B and R
                }
                data
            }
        }
    }
}
