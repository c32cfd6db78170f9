mod reader;
mod writer;

use std::ops::Range;

pub use reader::{Reader, Reporter};
pub use writer::Writer;

use crate::util::{decode_hex, encode_hex, xor_fold, Error, Result};

/// Every frame starts with this sentence header.
pub const PREFIX: &[u8; PREFIX_SIZE] = b"$TSC,BIN,";
pub const PREFIX_SIZE: usize = 9;

/// One raw sensor record.
pub const RECORD_SIZE: usize = 44;
pub type Record = [u8; RECORD_SIZE];

/// Prefix plus record, the part of the frame the checksum is taken over.
pub const PAYLOAD_SIZE: usize = PREFIX_SIZE + RECORD_SIZE;

/// Trailer is marker (1 byte), checksum digits (2 bytes), CR LF (2 bytes).
pub const TRAILER_SIZE: usize = 1 + 2 + 2;
pub const FRAME_SIZE: usize = PAYLOAD_SIZE + TRAILER_SIZE;

pub const RECORD_RANGE: Range<usize> = PREFIX_SIZE..PAYLOAD_SIZE;

/// Skips the leading `$` and stops one byte short of the end of the
/// payload. Receivers check exactly these positions, so the range is fixed.
pub const CHECKSUM_RANGE: Range<usize> = 1..PAYLOAD_SIZE - 1;

const CHECKSUM_MARKER: usize = PAYLOAD_SIZE;
pub(crate) const CHECKSUM_DIGITS: Range<usize> = PAYLOAD_SIZE + 1..PAYLOAD_SIZE + 3;
const TERMINATOR: Range<usize> = PAYLOAD_SIZE + 3..FRAME_SIZE;

/// Checksum of a frame or of a bare payload.
pub fn frame_checksum(payload: &[u8]) -> u8 {
    xor_fold(&payload[CHECKSUM_RANGE])
}

/// Fills `buf` with the complete frame for `record`.
pub fn build_frame(record: &Record, buf: &mut [u8; FRAME_SIZE]) {
    buf[..PREFIX_SIZE].copy_from_slice(PREFIX);
    buf[RECORD_RANGE].copy_from_slice(record);
    let sum = frame_checksum(&buf[..PAYLOAD_SIZE]);
    buf[CHECKSUM_MARKER] = b'*';
    buf[CHECKSUM_DIGITS].copy_from_slice(&encode_hex(sum));
    buf[TERMINATOR].copy_from_slice(b"\r\n");
}

pub fn encode_frame(record: &Record) -> [u8; FRAME_SIZE] {
    let mut buf = [0; FRAME_SIZE];
    build_frame(record, &mut buf);
    buf
}

/// Checks the literal parts of a frame and, when `checksum` is set, that the
/// transmitted digits match the payload.
pub fn check_frame(frame: &[u8; FRAME_SIZE], checksum: bool) -> Result<()> {
    if &frame[..PREFIX_SIZE] != PREFIX {
        return Err(Error::corruption("bad frame prefix"));
    }
    if frame[CHECKSUM_MARKER] != b'*' {
        return Err(Error::corruption("missing checksum marker"));
    }
    if &frame[TERMINATOR] != b"\r\n" {
        return Err(Error::corruption("bad frame terminator"));
    }
    if checksum {
        let digits = [frame[CHECKSUM_DIGITS.start], frame[CHECKSUM_DIGITS.start + 1]];
        let Some(expected) = decode_hex(digits) else {
            return Err(Error::corruption("bad checksum digits"));
        };
        let actual = frame_checksum(frame);
        if actual != expected {
            return Err(Error::corruption(&format!(
                "checksum mismatch: expected {:02X}, computed {:02X}",
                expected, actual
            )));
        }
    }
    Ok(())
}
