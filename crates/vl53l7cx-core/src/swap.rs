//! Buffer endian swapping
//!
//! The sensor firmware packs its result and calibration blocks as 32-bit
//! words in the opposite byte order to the host, so the driver swaps whole
//! buffers in place before interpreting them.

/// Reverse the byte order of every 4-byte group in `buf`
///
/// Groups start at offsets 0, 4, 8, ... Only `buf.len() - buf.len() % 4`
/// bytes are touched: callers are expected to pass whole words, and any
/// trailing partial word is left untouched rather than read past the end.
/// Applying the swap twice restores the original buffer.
pub fn swap_buffer(buf: &mut [u8]) {
    let rem = buf.len() % 4;
    if rem != 0 {
        log::warn!(
            "swap_buffer: length {} is not a multiple of 4, leaving {} trailing byte(s)",
            buf.len(),
            rem
        );
    }
    for word in buf.chunks_exact_mut(4) {
        word.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_word() {
        let mut buf = [1u8, 2, 3, 4];
        swap_buffer(&mut buf);
        assert_eq!(buf, [4, 3, 2, 1]);
    }

    #[test]
    fn test_two_words() {
        let mut buf = [1u8, 2, 3, 4, 5, 6, 7, 8];
        swap_buffer(&mut buf);
        assert_eq!(buf, [4, 3, 2, 1, 8, 7, 6, 5]);
    }

    #[test]
    fn test_involution() {
        let original: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF,
        ];
        let mut buf = original;
        swap_buffer(&mut buf);
        assert_ne!(buf, original);
        swap_buffer(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_matches_u32_conversion() {
        let mut buf = 0x1234_5678u32.to_be_bytes();
        swap_buffer(&mut buf);
        assert_eq!(u32::from_le_bytes(buf), 0x1234_5678);
    }

    #[test]
    fn test_trailing_bytes_untouched() {
        let mut buf = [1u8, 2, 3, 4, 5, 6];
        swap_buffer(&mut buf);
        assert_eq!(buf, [4, 3, 2, 1, 5, 6]);

        let mut short = [9u8, 8, 7];
        swap_buffer(&mut short);
        assert_eq!(short, [9, 8, 7]);

        let mut empty: [u8; 0] = [];
        swap_buffer(&mut empty);
    }
}
