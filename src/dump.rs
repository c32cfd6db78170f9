use std::fmt::Write;

use crate::frame::{FRAME_SIZE, PAYLOAD_SIZE, PREFIX_SIZE, RECORD_SIZE};

/// Byte widths of the record fields as shown in a dump, in record order.
pub const FIELD_WIDTHS: [usize; 10] = [2, 2, 2, 6, 6, 6, 4, 8, 6, 2];

const _: () = {
    let mut total = 0;
    let mut i = 0;
    while i < FIELD_WIDTHS.len() {
        total += FIELD_WIDTHS[i];
        i += 1;
    }
    assert!(total == RECORD_SIZE);
};

/// Renders a frame for a terminal: the sentence header as text, the record
/// as space separated hex fields, then the `*HH` checksum field. Bytes that
/// are not printable ASCII in the text parts are shown as `.`.
pub fn dump_frame(frame: &[u8; FRAME_SIZE]) -> String {
    let mut out = String::with_capacity(2 * FRAME_SIZE);
    push_text(&mut out, &frame[..PREFIX_SIZE]);
    let mut offset = PREFIX_SIZE;
    for (index, width) in FIELD_WIDTHS.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }
        for byte in &frame[offset..offset + width] {
            // Writing to a String cannot fail.
            let _ = write!(out, "{:02X}", byte);
        }
        offset += width;
    }
    push_text(&mut out, &frame[PAYLOAD_SIZE..PAYLOAD_SIZE + 3]);
    out
}

fn push_text(out: &mut String, bytes: &[u8]) {
    out.extend(bytes.iter().map(|&byte| {
        if byte.is_ascii_graphic() {
            byte as char
        } else {
            '.'
        }
    }));
}
