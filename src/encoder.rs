use crate::{
    env::{Env, Logger},
    filename::output_file_name,
    frame::{Record, Writer, RECORD_SIZE},
    util::Result,
};

/// Outcome of one `encode` run.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    /// Path of the framed file, `<input>.out`.
    pub output: String,
    /// Number of complete records framed.
    pub frames: u64,
    /// Length of the trailing partial record left unframed, 0..RECORD_SIZE.
    pub dropped: usize,
}

/// Frames every complete 44-byte record of `input` into `<input>.out`.
///
/// A trailing partial record ends the run without an error and is not
/// written. Any I/O failure is returned as is; whatever was already written
/// to the output stays on disk.
pub fn encode(env: &dyn Env, input: &str, logger: &dyn Logger) -> Result<Encoded> {
    let output = output_file_name(input);
    let mut source = env.new_sequential_file(input)?;
    let mut writer = Writer::new(env.new_writable_file(&output)?);
    logger.log(&format!("framing {} into {}", input, output));

    let mut record: Record = [0; RECORD_SIZE];
    let dropped = loop {
        let read_size = source.read(&mut record)?;
        if read_size < RECORD_SIZE {
            break read_size;
        }
        writer.add_record(&record)?;
    };
    writer.close()?;

    let frames = writer.frames_written();
    if dropped > 0 {
        logger.log(&format!(
            "{}: ignored {} trailing bytes of a partial record",
            input, dropped
        ));
    }
    logger.log(&format!("wrote {} frames to {}", frames, output));
    Ok(Encoded {
        output,
        frames,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    use super::*;
    use crate::{
        env::{Logger, SequentialFile, WritableFile},
        frame::{check_frame, frame_checksum, FRAME_SIZE, PREFIX},
        util::{decode_hex, Error},
    };

    type Files = Rc<RefCell<HashMap<String, Vec<u8>>>>;

    /// Keeps every file in memory. Reads and appends can be made to fail
    /// past a size limit.
    #[derive(Default)]
    struct MemEnv {
        files: Files,
        fail_read_after: Option<usize>,
        fail_write_after: Option<usize>,
    }

    impl MemEnv {
        fn with_file(name: &str, contents: Vec<u8>) -> Self {
            let env = Self::default();
            env.files.borrow_mut().insert(name.to_owned(), contents);
            env
        }

        fn contents(&self, name: &str) -> Option<Vec<u8>> {
            self.files.borrow().get(name).cloned()
        }
    }

    impl Env for MemEnv {
        fn new_sequential_file(&self, fname: &str) -> Result<Box<dyn SequentialFile>> {
            match self.contents(fname) {
                Some(contents) => Ok(Box::new(MemSource {
                    contents,
                    offset: 0,
                    fail_after: self.fail_read_after,
                })),
                None => Err(Error::not_found(fname)),
            }
        }

        fn new_writable_file(&self, fname: &str) -> Result<Box<dyn WritableFile>> {
            self.files.borrow_mut().insert(fname.to_owned(), vec![]);
            Ok(Box::new(MemDest {
                name: fname.to_owned(),
                files: self.files.clone(),
                fail_after: self.fail_write_after,
            }))
        }

        fn get_file_size(&self, fname: &str) -> Result<u64> {
            match self.contents(fname) {
                Some(contents) => Ok(contents.len() as u64),
                None => Err(Error::not_found(fname)),
            }
        }
    }

    struct MemSource {
        contents: Vec<u8>,
        offset: usize,
        fail_after: Option<usize>,
    }

    impl SequentialFile for MemSource {
        fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
            if let Some(limit) = self.fail_after {
                if self.offset + dst.len() > limit {
                    return Err(Error::io_error("input/output error"));
                }
            }
            let read_size = dst.len().min(self.contents.len() - self.offset);
            let end = self.offset + read_size;
            dst[..read_size].copy_from_slice(&self.contents[self.offset..end]);
            self.offset += read_size;
            Ok(read_size)
        }
    }

    struct MemDest {
        name: String,
        files: Files,
        fail_after: Option<usize>,
    }

    impl WritableFile for MemDest {
        fn append(&mut self, data: &[u8]) -> Result<()> {
            let mut files = self.files.borrow_mut();
            let contents = files.entry(self.name.clone()).or_default();
            if let Some(limit) = self.fail_after {
                if contents.len() + data.len() > limit {
                    return Err(Error::io_error("no space left on device"));
                }
            }
            contents.extend_from_slice(data);
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct LineCollector {
        lines: RefCell<Vec<String>>,
    }

    impl Logger for LineCollector {
        fn log(&self, info: &str) {
            self.lines.borrow_mut().push(info.to_owned());
        }
    }

    fn sample_input(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 7 + i / 44) as u8).collect()
    }

    fn run(input: Vec<u8>) -> (Encoded, Vec<u8>) {
        let env = MemEnv::with_file("imu.bin", input);
        let encoded = encode(&env, "imu.bin", &LineCollector::default()).unwrap();
        let output = env.contents("imu.bin.out").unwrap();
        (encoded, output)
    }

    #[test]
    fn test_frame_count_and_length() {
        for len in [0, 1, 43, 44, 45, 87, 88, 89, 44 * 10, 44 * 10 + 43] {
            let (encoded, output) = run(sample_input(len));
            let frames = len / RECORD_SIZE;
            assert_eq!(frames as u64, encoded.frames, "len {len}");
            assert_eq!(len % RECORD_SIZE, encoded.dropped, "len {len}");
            assert_eq!(frames * FRAME_SIZE, output.len(), "len {len}");
        }
    }

    #[test]
    fn test_frames_are_well_formed() {
        let (_, output) = run(sample_input(44 * 25 + 3));
        for chunk in output.chunks(FRAME_SIZE) {
            let frame: &[u8; FRAME_SIZE] = chunk.try_into().unwrap();
            assert_eq!(PREFIX, &frame[..9]);
            assert_eq!(b"\r\n", &frame[56..]);
            assert_eq!(b'*', frame[53]);
            assert_eq!(Some(frame_checksum(frame)), decode_hex([frame[54], frame[55]]));
            check_frame(frame, true).unwrap();
        }
    }

    #[test]
    fn test_order_preserved() {
        let input = sample_input(44 * 12);
        let (_, output) = run(input.clone());
        for (i, chunk) in output.chunks(FRAME_SIZE).enumerate() {
            assert_eq!(&input[44 * i..44 * i + 44], &chunk[9..53]);
        }
    }

    #[test]
    fn test_zero_record() {
        let (encoded, output) = run(vec![0; 44]);
        assert_eq!(1, encoded.frames);
        assert_eq!(b"$TSC,BIN,", &output[..9]);
        assert!(output[9..53].iter().all(|&byte| byte == 0));
        assert_eq!(b"*01\r\n", &output[53..]);
    }

    #[test]
    fn test_empty_input() {
        let (encoded, output) = run(vec![]);
        assert_eq!(
            Encoded {
                output: "imu.bin.out".to_owned(),
                frames: 0,
                dropped: 0,
            },
            encoded
        );
        assert!(output.is_empty());
    }

    #[test]
    fn test_rerun_overwrites() {
        let env = MemEnv::with_file("imu.bin", sample_input(44 * 3 + 5));
        env.files
            .borrow_mut()
            .insert("imu.bin.out".to_owned(), vec![b'x'; 1000]);
        let logger = LineCollector::default();
        encode(&env, "imu.bin", &logger).unwrap();
        let first = env.contents("imu.bin.out").unwrap();
        encode(&env, "imu.bin", &logger).unwrap();
        assert_eq!(first, env.contents("imu.bin.out").unwrap());
        assert_eq!(3 * FRAME_SIZE, first.len());
        assert_eq!(sample_input(44 * 3 + 5), env.contents("imu.bin").unwrap());
    }

    #[test]
    fn test_missing_input() {
        let env = MemEnv::default();
        let error = encode(&env, "nope.bin", &LineCollector::default()).unwrap_err();
        assert!(error.is_not_found());
        assert_eq!(None, env.contents("nope.bin.out"));
    }

    #[test]
    fn test_write_failure_keeps_partial_output() {
        let mut env = MemEnv::with_file("imu.bin", sample_input(44 * 4));
        env.fail_write_after = Some(2 * FRAME_SIZE);
        let error = encode(&env, "imu.bin", &LineCollector::default()).unwrap_err();
        assert!(error.is_io_error());
        assert_eq!(2 * FRAME_SIZE, env.contents("imu.bin.out").unwrap().len());
    }

    #[test]
    fn test_read_failure_keeps_partial_output() {
        let mut env = MemEnv::with_file("imu.bin", sample_input(44 * 5));
        env.fail_read_after = Some(3 * RECORD_SIZE);
        let logger = LineCollector::default();
        let error = encode(&env, "imu.bin", &logger).unwrap_err();
        assert!(error.is_io_error());
        let output = env.contents("imu.bin.out").unwrap();
        assert_eq!(3 * FRAME_SIZE, output.len());
        let last = &output[2 * FRAME_SIZE..];
        assert_eq!(&sample_input(44 * 3)[88..132], &last[9..53]);
        assert_eq!(1, logger.lines.borrow().len());
        assert_eq!(sample_input(44 * 5), env.contents("imu.bin").unwrap());
    }

    #[test]
    fn test_logs_progress() {
        let env = MemEnv::with_file("imu.bin", sample_input(44 * 2 + 7));
        let logger = LineCollector::default();
        encode(&env, "imu.bin", &logger).unwrap();
        let lines = logger.lines.borrow();
        assert_eq!("framing imu.bin into imu.bin.out", lines[0]);
        assert!(lines[1].contains("ignored 7 trailing bytes"));
        assert_eq!("wrote 2 frames to imu.bin.out", lines[2]);
    }
}
