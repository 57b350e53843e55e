//! Nearest-neighbor resampling between pixel buffers
//!
//! For a destination column `dx` the sampled source column is
//! `floor(dx / (dst_w / src_w))`, which equals `floor(dx * src_w / dst_w)`.
//! The integer form is used so the mapping is exact and identical on every
//! platform, and since `dx < dst_w` the result is always `< src_w`.

use super::PixelBuffer;

/// Source coordinate sampled for destination coordinate `d`
#[inline]
pub(crate) fn source_coord(d: u32, src_len: u32, dst_len: u32) -> u32 {
    debug_assert!(d < dst_len);
    ((u64::from(d) * u64::from(src_len)) / u64::from(dst_len)) as u32
}

/// Resample `src` onto `dst`, covering every destination pixel exactly once
pub fn scale(src: &PixelBuffer, dst: &mut PixelBuffer) {
    if src.size() == dst.size() {
        dst.copy_from(src);
        return;
    }

    let (src_w, src_h) = src.size();
    let (dst_w, dst_h) = dst.size();

    // Column lookup is the same for every row
    let x_map: Vec<usize> = (0..dst_w)
        .map(|dx| source_coord(dx, src_w, dst_w) as usize)
        .collect();

    let dst_stride = dst_w as usize;
    let pixels = dst.pixels_mut();
    let mut prev_sy = None;

    for dy in 0..dst_h {
        let sy = source_coord(dy, src_h, dst_h);
        let row_start = dy as usize * dst_stride;

        // Upscaled rows repeat; reuse the row we just produced
        if prev_sy == Some(sy) {
            let (done, rest) = pixels.split_at_mut(row_start);
            rest[..dst_stride].copy_from_slice(&done[row_start - dst_stride..]);
            continue;
        }

        let Some(src_row) = src.row(sy) else {
            continue;
        };
        let dst_row = &mut pixels[row_start..row_start + dst_stride];
        for (out, &sx) in dst_row.iter_mut().zip(&x_map) {
            *out = src_row[sx];
        }
        prev_sy = Some(sy);
    }
}
