use super::{build_frame, Record, CHECKSUM_DIGITS, FRAME_SIZE};
use crate::{env::WritableFile, util::Result};

/// Appends one TSC BIN frame per record to `dest`.
pub struct Writer {
    dest: Box<dyn WritableFile>,
    /// Reused for every frame; the prefix never changes between records.
    buf: [u8; FRAME_SIZE],
    frames_written: u64,
    checksum_error: bool,
}

impl Writer {
    pub fn new(dest: Box<dyn WritableFile>) -> Self {
        Self {
            dest,
            buf: [0; FRAME_SIZE],
            frames_written: 0,
            checksum_error: false,
        }
    }

    /// Writes `??` in place of the checksum digits so receivers can be
    /// exercised against bad frames.
    pub fn with_checksum_error(mut self, checksum_error: bool) -> Self {
        self.checksum_error = checksum_error;
        self
    }

    pub fn add_record(&mut self, record: &Record) -> Result<()> {
        build_frame(record, &mut self.buf);
        if self.checksum_error {
            self.buf[CHECKSUM_DIGITS].copy_from_slice(b"??");
        }
        self.dest.append(&self.buf)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    pub fn close(&mut self) -> Result<()> {
        self.dest.close()
    }
}
