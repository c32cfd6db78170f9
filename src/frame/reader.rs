use std::{cell::RefCell, rc::Rc};

use super::{check_frame, Record, FRAME_SIZE, RECORD_RANGE, RECORD_SIZE};
use crate::{env::SequentialFile, util::Error};

pub struct Reader {
    file: Box<dyn SequentialFile>,
    reporter: Option<Rc<RefCell<dyn Reporter>>>,
    checksum: bool,
    backing_store: [u8; FRAME_SIZE],
    record: Record,
    eof: bool,
    /// Offset of the last record returned by read_record.
    last_record_offset: u64,
    /// Offset of the first location past the last frame read.
    end_of_buffer_offset: u64,
}

impl Reader {
    /// With `checksum` false the `*HH` digits are not compared, only the
    /// literal parts of each frame are checked.
    pub fn new(
        file: Box<dyn SequentialFile>,
        checksum: bool,
        reporter: Option<Rc<RefCell<dyn Reporter>>>,
    ) -> Self {
        Self {
            file,
            reporter,
            checksum,
            backing_store: [0; FRAME_SIZE],
            record: [0; RECORD_SIZE],
            eof: false,
            last_record_offset: 0,
            end_of_buffer_offset: 0,
        }
    }

    /// Returns the record carried by the next valid frame. Invalid frames are
    /// reported and skipped.
    pub fn read_record(&mut self) -> Option<&Record> {
        loop {
            if self.eof {
                return None;
            }
            let result = self.file.read(&mut self.backing_store);
            let read_size = match result {
                Ok(read_size) => read_size,
                Err(error) => {
                    self.eof = true;
                    self.report_drop(FRAME_SIZE, &error);
                    return None;
                }
            };
            if read_size < FRAME_SIZE {
                // A truncated trailing frame is what a writer stopped mid-frame
                // leaves behind. Treat it as the end of the stream.
                self.eof = true;
                return None;
            }
            let frame_offset = self.end_of_buffer_offset;
            self.end_of_buffer_offset += FRAME_SIZE as u64;

            if let Err(error) = check_frame(&self.backing_store, self.checksum) {
                self.report_drop(FRAME_SIZE, &error);
                continue;
            }
            self.last_record_offset = frame_offset;
            self.record.copy_from_slice(&self.backing_store[RECORD_RANGE]);
            return Some(&self.record);
        }
    }

    pub fn last_record_offset(&self) -> u64 {
        self.last_record_offset
    }

    /// The frame, as read, that carried the last returned record. Only
    /// meaningful until the next call to read_record.
    pub fn last_frame(&self) -> &[u8; FRAME_SIZE] {
        &self.backing_store
    }

    fn report_drop(&mut self, bytes: usize, reason: &Error) {
        if let Some(reporter) = self.reporter.as_ref() {
            reporter.borrow_mut().corruption(bytes, reason)
        }
    }
}

/// Receives notice of every frame the reader drops.
pub trait Reporter {
    fn corruption(&mut self, bytes: usize, error: &Error);
}
