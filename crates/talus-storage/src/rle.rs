//! Run-length byte compression used to shrink chunk files on disk.

/// Encodes `data` as `(count, byte)` pairs, `count` in `1..=255`; runs
/// longer than 255 bytes split into multiple pairs.
#[must_use]
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut iter = data.iter().copied();
    let Some(mut current) = iter.next() else {
        return out;
    };
    let mut count: u8 = 1;

    for byte in iter {
        if byte == current && count < 255 {
            count += 1;
        } else {
            out.push(count);
            out.push(current);
            current = byte;
            count = 1;
        }
    }
    out.push(count);
    out.push(current);
    out
}

/// Expands a `compress`-produced buffer. Trailing single bytes (a
/// malformed/truncated stream) are discarded.
#[must_use]
pub fn decompress(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut chunks = data.chunks_exact(2);
    for pair in &mut chunks {
        let count = pair[0];
        let byte = pair[1];
        out.resize(out.len() + usize::from(count), byte);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_roundtrips() {
        assert_eq!(compress(&[]), Vec::<u8>::new());
        assert_eq!(decompress(&[]), Vec::<u8>::new());
    }

    #[test]
    fn simple_run_roundtrips() {
        let data = vec![5u8; 10];
        let compressed = compress(&data);
        assert_eq!(compressed, vec![10, 5]);
        assert_eq!(decompress(&compressed), data);
    }

    #[test]
    fn mixed_bytes_roundtrip() {
        let data = vec![1, 1, 1, 2, 3, 3, 3, 3, 3];
        let compressed = compress(&data);
        assert_eq!(decompress(&compressed), data);
    }

    #[test]
    fn runs_longer_than_255_split() {
        let data = vec![9u8; 300];
        let compressed = compress(&data);
        assert_eq!(compressed, vec![255, 9, 45, 9]);
        assert_eq!(decompress(&compressed), data);
    }

    #[test]
    fn is_idempotent_under_compress_then_decompress() {
        let data: Vec<u8> = (0..=255u8).flat_map(|b| vec![b; 3]).collect();
        let once = decompress(&compress(&data));
        let twice = decompress(&compress(&once));
        assert_eq!(once, data);
        assert_eq!(twice, data);
    }
}
