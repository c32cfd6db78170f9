const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// XORs every byte of `data` into a single accumulator.
pub fn xor_fold(data: &[u8]) -> u8 {
    data.iter().fold(0, |sum, byte| sum ^ byte)
}

/// Two uppercase, zero-padded hex digits.
pub fn encode_hex(value: u8) -> [u8; 2] {
    [
        HEX_DIGITS[(value >> 4) as usize],
        HEX_DIGITS[(value & 0x0f) as usize],
    ]
}

/// Inverse of `encode_hex`. Lowercase digits are rejected since the framer
/// never produces them.
pub fn decode_hex(digits: [u8; 2]) -> Option<u8> {
    fn nibble(digit: u8) -> Option<u8> {
        match digit {
            b'0'..=b'9' => Some(digit - b'0'),
            b'A'..=b'F' => Some(digit - b'A' + 10),
            _ => None,
        }
    }
    Some(nibble(digits[0])? << 4 | nibble(digits[1])?)
}
