use std::{
    cell::RefCell,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Read, Write},
    thread,
};

use chrono::Local;

use super::{Env, Logger, SequentialFile, WritableFile};
use crate::util::{to_error, Error, Result};

pub struct PosixEnv {}

impl PosixEnv {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for PosixEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Env for PosixEnv {
    fn new_sequential_file(&self, fname: &str) -> Result<Box<dyn SequentialFile>> {
        match File::open(fname) {
            Ok(file) => Ok(Box::new(PosixSequentialFile::new(fname, file))),
            Err(error) => Err(to_error(fname, error)),
        }
    }

    fn new_writable_file(&self, fname: &str) -> Result<Box<dyn WritableFile>> {
        match File::create(fname) {
            Ok(file) => Ok(Box::new(PosixWritableFile::new(fname, file))),
            Err(error) => Err(to_error(fname, error)),
        }
    }

    fn get_file_size(&self, fname: &str) -> Result<u64> {
        match fs::metadata(fname) {
            Ok(data) => Ok(data.len()),
            Err(error) => Err(to_error(fname, error)),
        }
    }
}

struct PosixSequentialFile {
    filename: String,
    file: BufReader<File>,
}

impl PosixSequentialFile {
    fn new(filename: &str, file: File) -> Self {
        Self {
            filename: filename.to_owned(),
            file: BufReader::new(file),
        }
    }
}

impl SequentialFile for PosixSequentialFile {
    fn read(&mut self, dst: &mut [u8]) -> Result<usize> {
        // A single read(2) may come back short well before the end of the file.
        let mut filled = 0;
        while filled < dst.len() {
            match self.file.read(&mut dst[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                Err(error) => return Err(to_error(&self.filename, error)),
            }
        }
        Ok(filled)
    }
}

struct PosixWritableFile {
    filename: String,
    file: Option<BufWriter<File>>,
}

impl PosixWritableFile {
    fn new(filename: &str, file: File) -> Self {
        Self {
            filename: filename.to_owned(),
            file: Some(BufWriter::new(file)),
        }
    }

    fn with_file<T>(
        &mut self,
        op: impl FnOnce(&mut BufWriter<File>) -> io::Result<T>,
    ) -> Result<T> {
        match self.file.as_mut() {
            Some(file) => op(file).map_err(|error| to_error(&self.filename, error)),
            None => Err(Error::io_error(&format!(
                "{}: file already closed",
                self.filename
            ))),
        }
    }
}

impl WritableFile for PosixWritableFile {
    fn append(&mut self, data: &[u8]) -> Result<()> {
        self.with_file(|file| file.write_all(data))
    }

    fn close(&mut self) -> Result<()> {
        let result = self.flush();
        self.file = None;
        result
    }

    fn flush(&mut self) -> Result<()> {
        self.with_file(|file| file.flush())
    }
}

pub struct PosixLogger {
    sink: RefCell<Box<dyn Write>>,
}

impl PosixLogger {
    pub fn new<W: Write + 'static>(sink: W) -> Self {
        Self {
            sink: RefCell::new(Box::new(sink)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl Logger for PosixLogger {
    fn log(&self, info: &str) {
        // Record the time as close to the call as possible.
        let time = Local::now().format("%Y/%m/%d-%H:%M:%S%.6f").to_string();
        let thread_id = thread::current().id();
        let mut info = format!("{} {:?} {}", time, thread_id, info);
        if !info.ends_with('\n') {
            info.push('\n');
        }
        let mut sink = self.sink.borrow_mut();
        // Losing a log line must not fail the conversion.
        let _ = sink.write_all(info.as_bytes());
        let _ = sink.flush();
    }
}
