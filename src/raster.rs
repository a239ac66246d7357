//! Procedural pixel buffer for the second texture slot.
//!
//! Stands in for an external raster drawing routine: a 256x256 RGBA buffer in
//! row-major order, consumed verbatim as texture data.

/// Edge length of the raster buffer in pixels.
pub const SIZE: usize = 256;

/// Fills the buffer with a deterministic test pattern.
///
/// XOR plasma in red and green with a blue disc in the middle, fully opaque.
pub fn pattern() -> Vec<u8> {
    let mut buffer = vec![0u8; SIZE * SIZE * 4];
    let center = SIZE as i32 / 2;
    let radius = SIZE as i32 / 3;

    for y in 0..SIZE {
        for x in 0..SIZE {
            let i = (y * SIZE + x) * 4;
            let dx = x as i32 - center;
            let dy = y as i32 - center;
            let inside = dx * dx + dy * dy <= radius * radius;

            buffer[i] = (x ^ y) as u8;
            buffer[i + 1] = ((x * 2) ^ y) as u8;
            buffer[i + 2] = if inside { 220 } else { 32 };
            buffer[i + 3] = 255;
        }
    }

    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_exactly_rgba_sized() {
        assert_eq!(pattern().len(), 256 * 256 * 4);
    }

    #[test]
    fn buffer_is_opaque_and_deterministic() {
        let a = pattern();
        let b = pattern();
        assert_eq!(a, b);
        assert!(a.chunks_exact(4).all(|px| px[3] == 255));
    }
}
