//! compression/shuffle.rs
//! Byte-shuffle filter for fixed-width elements.
//!
//! Reorganizes a row-oriented byte stream into byte planes: all first bytes
//! of every element, then all second bytes, and so on. Bytes that do not
//! fill a whole element are copied through untouched at the end.

/// Shuffle `src` into `dst` (same length) for elements of `typesize` bytes.
pub fn shuffle(typesize: usize, src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    if typesize <= 1 || src.len() < typesize {
        dst.copy_from_slice(src);
        return;
    }

    let elements = src.len() / typesize;
    let body = elements * typesize;

    for (j, element) in src[..body].chunks_exact(typesize).enumerate() {
        for (i, &byte) in element.iter().enumerate() {
            dst[i * elements + j] = byte;
        }
    }
    dst[body..].copy_from_slice(&src[body..]);
}

/// Inverse of [`shuffle`].
pub fn unshuffle(typesize: usize, src: &[u8], dst: &mut [u8]) {
    debug_assert_eq!(src.len(), dst.len());
    if typesize <= 1 || src.len() < typesize {
        dst.copy_from_slice(src);
        return;
    }

    let elements = src.len() / typesize;
    let body = elements * typesize;

    for (j, element) in dst[..body].chunks_exact_mut(typesize).enumerate() {
        for (i, byte) in element.iter_mut().enumerate() {
            *byte = src[i * elements + j];
        }
    }
    dst[body..].copy_from_slice(&src[body..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_groups_byte_planes() {
        let src = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut dst = [0u8; 8];
        shuffle(4, &src, &mut dst);
        assert_eq!(dst, [1, 5, 2, 6, 3, 7, 4, 8]);
    }

    #[test]
    fn leftover_bytes_are_copied() {
        let src = [1u8, 2, 3, 4, 5];
        let mut shuffled = [0u8; 5];
        shuffle(2, &src, &mut shuffled);
        assert_eq!(shuffled, [1, 3, 2, 4, 5]);

        let mut back = [0u8; 5];
        unshuffle(2, &shuffled, &mut back);
        assert_eq!(back, src);
    }

    #[test]
    fn typesize_one_is_identity() {
        let src = b"0123456789";
        let mut dst = [0u8; 10];
        shuffle(1, src, &mut dst);
        assert_eq!(&dst, src);
    }
}
