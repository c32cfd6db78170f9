use crate::util::Result;

mod posix_env;

pub use posix_env::{PosixEnv, PosixLogger};

/// An Env is an interface used by the framer to access operating system
/// functionality like the filesystem. Tests substitute in-memory files
/// through the file traits below.
pub trait Env {
    /// The returned file will only be accessed by one thread at a time.
    fn new_sequential_file(&self, fname: &str) -> Result<Box<dyn SequentialFile>>;

    /// Creates the file, truncating any previous contents.
    fn new_writable_file(&self, fname: &str) -> Result<Box<dyn WritableFile>>;

    fn get_file_size(&self, fname: &str) -> Result<u64>;
}

/// A file abstraction for reading sequentially through a file
pub trait SequentialFile {
    /// Reads up to `dst.len()` bytes. A return value smaller than
    /// `dst.len()` means the end of the file was reached.
    fn read(&mut self, dst: &mut [u8]) -> Result<usize>;
}

/// A file abstraction for sequential writing.  The implementation
/// must provide buffering since callers may append small fragments
/// at a time to the file.
pub trait WritableFile {
    fn append(&mut self, data: &[u8]) -> Result<()>;
    fn close(&mut self) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
}

pub trait Logger {
    fn log(&self, info: &str);
}

/// Discards everything.
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _info: &str) {}
}
