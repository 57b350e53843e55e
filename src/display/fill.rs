//! Bulk pixel fill

use super::pixel::Pixel;
use super::PixelBuffer;

/// Pixels written per block
const BLOCK: usize = 32;

/// Write `value` into every slot of `dst`.
/// Whole 32-pixel blocks are copied from a prepared pattern, the tail pixel by pixel.
pub fn fill_words(dst: &mut [Pixel], value: Pixel) {
    let pattern = [value; BLOCK];
    let mut blocks = dst.chunks_exact_mut(BLOCK);
    for block in &mut blocks {
        block.copy_from_slice(&pattern);
    }
    for slot in blocks.into_remainder() {
        *slot = value;
    }
}

/// Fill a whole buffer with one pixel value
#[inline]
pub fn fill(buffer: &mut PixelBuffer, value: Pixel) {
    fill_words(buffer.pixels_mut(), value);
}
