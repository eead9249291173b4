//! Output side of the renderer: the sink trait and an in-memory buffer.

/// Receives finished 8-bit RGB pixels, each `(x, y)` exactly once per image.
pub trait ImageSink {
    fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]);
}

impl<F: FnMut(u32, u32, [u8; 3])> ImageSink for F {
    fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self(x, y, rgb)
    }
}

/// Simple RGB8 image buffer in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = self.index(x, y);
        self.pixels[index] = rgb;
    }

    /// Flatten to packed RGB bytes (for display or saving).
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        y as usize * self.width as usize + x as usize
    }
}

impl ImageSink for ImageBuffer {
    fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.set(x, y, rgb);
    }
}
