//! ARGB8888 pixel packing
//!
//! A pixel is a `u32` with alpha in bits 24-31, red 16-23, green 8-15 and
//! blue 0-7. Stored in native byte order this matches SDL's ARGB8888 texture
//! format, so buffers upload without conversion.

/// Packed ARGB8888 value
pub type Pixel = u32;

pub const WHITE: u32 = 0xFF_FF_FF;
pub const BLACK: u32 = 0x00_00_00;
pub const BLUE: u32 = 0x1E_69_D2;

/// Pack channels into a pixel
#[inline]
pub const fn pack_argb(r: u8, g: u8, b: u8, a: u8) -> Pixel {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Pack an opaque pixel
#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> Pixel {
    pack_argb(r, g, b, 255)
}

/// Split a pixel into (r, g, b, a)
#[inline]
pub const fn unpack_argb(px: Pixel) -> (u8, u8, u8, u8) {
    (red(px), green(px), blue(px), alpha(px))
}

/// Opaque pixel from a 0xRRGGBB value; any bits above 24 are ignored
#[inline]
pub const fn from_rgb(rgb: u32) -> Pixel {
    from_rgb_alpha(rgb, 255)
}

#[inline]
pub const fn from_rgb_alpha(rgb: u32, a: u8) -> Pixel {
    (a as u32) << 24 | (rgb & 0x00FF_FFFF)
}

#[inline]
pub const fn alpha(px: Pixel) -> u8 {
    (px >> 24) as u8
}

#[inline]
pub const fn red(px: Pixel) -> u8 {
    (px >> 16) as u8
}

#[inline]
pub const fn green(px: Pixel) -> u8 {
    (px >> 8) as u8
}

#[inline]
pub const fn blue(px: Pixel) -> u8 {
    px as u8
}

/// Reverse the byte order of a pixel (ARGB <-> BGRA)
#[inline]
pub const fn byte_swap32(px: Pixel) -> Pixel {
    px.swap_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_argb(0x11, 0x22, 0x33, 0x44), 0x4411_2233);
        assert_eq!(pack_rgb(255, 255, 255), 0xFFFF_FFFF);
        assert_eq!(pack_rgb(0, 0, 0), 0xFF00_0000);
    }

    #[test]
    fn test_round_trip_all_channel_values() {
        // Every value on every channel, with the others held at distinct values
        for v in 0..=255u8 {
            let cases = [
                (v, 1, 2, 3),
                (4, v, 5, 6),
                (7, 8, v, 9),
                (10, 11, 12, v),
                (v, v, v, v),
                (v, 255 - v, v / 2, 255 - v / 3),
            ];
            for (r, g, b, a) in cases {
                assert_eq!(unpack_argb(pack_argb(r, g, b, a)), (r, g, b, a));
            }
        }
    }

    #[test]
    fn test_from_rgb_defaults_to_opaque() {
        assert_eq!(from_rgb(BLUE), 0xFF1E_69D2);
        assert_eq!(alpha(from_rgb(BLACK)), 255);
        // stray high bits do not leak into alpha
        assert_eq!(from_rgb(0xAB12_3456), 0xFF12_3456);
        assert_eq!(from_rgb_alpha(WHITE, 0x80), 0x80FF_FFFF);
    }

    #[test]
    fn test_byte_swap() {
        assert_eq!(byte_swap32(0xAABB_CCDD), 0xDDCC_BBAA);
        assert_eq!(byte_swap32(byte_swap32(0x1234_5678)), 0x1234_5678);
    }
}
