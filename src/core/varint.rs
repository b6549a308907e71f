//! Unsigned LEB128 variable-length integers.
//!
//! Each byte carries seven value bits, least-significant group first. The high
//! bit of a byte is set when more bytes follow.

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u8 = 0x7F;

/// Encode `n` as unsigned LEB128.
///
/// # Examples
///
/// ```
/// use idmask::core::varint;
///
/// assert_eq!(varint::encode(1), vec![0x01]);
/// assert_eq!(varint::encode(300), vec![0xAC, 0x02]);
/// ```
pub fn encode(n: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    encode_into(n, &mut out);
    out
}

/// Append the LEB128 encoding of `n` to `buf`.
pub fn encode_into(mut n: u64, buf: &mut Vec<u8>) {
    while n >= CONTINUATION as u64 {
        buf.push((n as u8 & GROUP_MASK) | CONTINUATION);
        n >>= 7;
    }
    buf.push(n as u8);
}

/// Decode a varint starting at `offset`.
///
/// Returns the value and the offset just past the terminal byte. If the input
/// runs out before a terminal byte is found the value is `None` and the offset
/// points at the end of the input. Overlong encodings are accepted; groups
/// that would land beyond bit 63 are ignored.
pub fn decode(bytes: &[u8], offset: usize) -> (Option<u64>, usize) {
    let mut result = 0u64;
    let mut shift = 0u32;
    let mut i = offset;

    loop {
        let Some(&byte) = bytes.get(i) else {
            return (None, i);
        };
        i += 1;

        if shift < 64 {
            result |= ((byte & GROUP_MASK) as u64) << shift;
        }
        shift = shift.saturating_add(7);

        if byte & CONTINUATION == 0 {
            return (Some(result), i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_byte_values() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(0x7F), vec![0x7F]);
    }

    #[test]
    fn test_multi_byte_values() {
        assert_eq!(encode(0x80), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xAC, 0x02]);
        assert_eq!(encode(16_384), vec![0x80, 0x80, 0x01]);
        assert_eq!(encode(u32::MAX as u64), vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_encode_into_appends() {
        let mut buf = vec![0xAA];
        encode_into(300, &mut buf);
        assert_eq!(buf, vec![0xAA, 0xAC, 0x02]);
    }

    #[test]
    fn test_decode_at_offset() {
        let bytes = [0x05, 0xAC, 0x02, 0x07];
        assert_eq!(decode(&bytes, 0), (Some(5), 1));
        assert_eq!(decode(&bytes, 1), (Some(300), 3));
        assert_eq!(decode(&bytes, 3), (Some(7), 4));
    }

    #[test]
    fn test_decode_u32_max() {
        let bytes = encode(u32::MAX as u64);
        assert_eq!(decode(&bytes, 0), (Some(u32::MAX as u64), 5));
    }

    #[test]
    fn test_decode_truncated() {
        // Continuation bit set on the last byte
        assert_eq!(decode(&[0x80, 0x80], 0), (None, 2));
        // Offset already at end of input
        assert_eq!(decode(&[0x01], 1), (None, 1));
        assert_eq!(decode(&[], 0), (None, 0));
    }

    #[test]
    fn test_decode_overlong() {
        // 1 padded with redundant zero groups
        assert_eq!(decode(&[0x81, 0x80, 0x80, 0x00], 0), (Some(1), 4));
    }

    #[test]
    fn test_decode_ignores_groups_past_64_bits() {
        let mut bytes = vec![0xFF; 12];
        bytes.push(0x01);
        let (value, next) = decode(&bytes, 0);
        assert!(value.is_some());
        assert_eq!(next, 13);
    }
}
