use super::fill;
use super::pixel::Pixel;
use crate::error::{FramebufferError, Result};

// ============================================================================
// Size helpers
// ============================================================================

/// Bytes per ARGB8888 pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Pixel count and byte length for a `width` x `height` buffer, overflow checked
fn checked_len(width: u32, height: u32) -> Result<(usize, usize)> {
    let overflow = FramebufferError::ArithmeticOverflow {
        what: "pixel buffer size",
    };
    let count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| overflow.clone())?;
    let bytes = count.checked_mul(BYTES_PER_PIXEL).ok_or(overflow)?;
    Ok((count, bytes))
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// ARGB8888 raster, row-major, rows packed with a stride of `width * 4` bytes.
/// Both dimensions are always non-zero.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Allocate a zeroed (transparent black) buffer
    pub fn with_size(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FramebufferError::InvalidDimensions { width, height });
        }
        let (count, bytes) = checked_len(width, height)?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| FramebufferError::ResourceExhausted {
                what: "pixel buffer",
                bytes,
            })?;
        pixels.resize(count, 0);

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Length of the raw pixel data in bytes (`width * height * 4`)
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * BYTES_PER_PIXEL
    }

    /// Bytes per row
    #[inline]
    pub fn pitch(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    #[inline]
    fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(self.pixel_index(x, y))
        } else {
            Err(FramebufferError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Write one pixel
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Pixel) -> Result<()> {
        let idx = self.check_bounds(x, y)?;
        self.pixels[idx] = px;
        Ok(())
    }

    /// Read one pixel
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Pixel> {
        let idx = self.check_bounds(x, y)?;
        Ok(self.pixels[idx])
    }

    /// Write a pixel if it lies inside the buffer; returns whether it did
    #[inline]
    pub(crate) fn put_clipped(&mut self, x: i64, y: i64, px: Pixel) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        let idx = self.pixel_index(x as u32, y as u32);
        self.pixels[idx] = px;
        true
    }

    /// Set every pixel to `px`
    pub fn fill(&mut self, px: Pixel) {
        fill::fill(self, px);
    }

    /// Row `y` as a slice of pixels, `None` past the last row
    #[inline]
    pub fn row(&self, y: u32) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = self.pixel_index(0, y);
        self.pixels.get(start..start + self.width as usize)
    }

    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Copy the contents of a buffer with identical dimensions
    pub(crate) fn copy_from(&mut self, src: &PixelBuffer) {
        debug_assert_eq!(self.size(), src.size());
        self.pixels.copy_from_slice(&src.pixels);
    }

    /// Raw pixel bytes in native-endian ARGB8888, ready for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        // Safety: u32 has no padding or invalid bit patterns, u8 has alignment 1,
        // and the byte length covers exactly the pixel allocation.
        unsafe { std::slice::from_raw_parts(self.pixels.as_ptr() as *const u8, self.byte_len()) }
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("byte_len", &self.byte_len())
            .finish()
    }
}
