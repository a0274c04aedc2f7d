use crate::color::Rgba;

/// Errors from pixel buffer construction.
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("pixel count {actual} does not match {width}x{height}")]
    SizeMismatch {
        width: u32,
        height: u32,
        actual: usize,
    },
    #[error("pixel buffer dimensions must be positive, got {width}x{height}")]
    ZeroSized { width: u32, height: u32 },
}

/// Row-major buffer of packed colors.
///
/// Coordinates are signed so callers can pass positions that land left of or
/// above the buffer; every write outside `[0, width) x [0, height)` is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Create a buffer filled with a single color.
    pub fn new(width: u32, height: u32, fill: u32) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroSized { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        })
    }

    /// Wrap an existing pixel vector. Its length must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroSized { width, height });
        }
        if pixels.len() != width as usize * height as usize {
            return Err(BufferError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer whose pixel at `(x, y)` is `f(x, y)`.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> u32,
    ) -> Result<Self, BufferError> {
        let mut buffer = Self::new(width, height, 0)?;
        for y in 0..height {
            for x in 0..width {
                buffer.pixels[(x + y * width) as usize] = f(x, y);
            }
        }
        Ok(buffer)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(x as usize + y as usize * self.width as usize)
    }

    /// Pixel at `(x, y)`, or `None` when outside the buffer.
    pub fn get(&self, x: i64, y: i64) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel. Returns whether the write landed inside the buffer.
    pub fn set(&mut self, x: i64, y: i64, color: u32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    /// Fill the axis-aligned rectangle with top-left `(x, y)`, clipping to the buffer.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: u32) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w as i64).min(self.width as i64);
        let y1 = y.saturating_add(h as i64).min(self.height as i64);
        for cy in y0..y1 {
            let row = cy as usize * self.width as usize;
            for cx in x0..x1 {
                self.pixels[row + cx as usize] = color;
            }
        }
    }

    /// Copy `colors` down column `x`, starting at row `start_y`. Rows outside
    /// the buffer are skipped. Returns the number of pixels written.
    pub fn blit_column(&mut self, x: i64, start_y: i64, colors: &[u32]) -> usize {
        if x < 0 || x >= self.width as i64 {
            return 0;
        }
        // Only the overlap of [start_y, start_y + len) with [0, height) is touched.
        let first = (-start_y).clamp(0, colors.len() as i64) as usize;
        let last = (self.height as i64 - start_y).clamp(0, colors.len() as i64) as usize;
        let mut written = 0;
        for (j, &color) in colors.iter().enumerate().take(last).skip(first) {
            let y = start_y + j as i64;
            self.pixels[x as usize + y as usize * self.width as usize] = color;
            written += 1;
        }
        written
    }

    /// Iterate pixels as `(r, g, b)` triplets in row-major order.
    pub fn rgb_triplets(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.pixels.iter().map(|&p| {
            let c = Rgba::unpack(p);
            [c.r, c.g, c.b]
        })
    }
}
