use std::{cell::RefCell, rc::Rc};

use anyhow::{bail, Context};
use clap::Parser;

use tscbin::{
    dump::dump_frame,
    env::{Env, Logger, PosixEnv, PosixLogger},
    filename::parse_output_file_name,
    frame::{Reader, Reporter, FRAME_SIZE},
    Error,
};

#[derive(Debug, Parser)]
#[command(version)]
/// Verifies a framed $TSC,BIN file and prints every frame
struct Opts {
    /// The framed file, usually <logfile>.out
    file: String,
    /// Prefix every frame with its byte offset in the file
    #[arg(long)]
    offsets: bool,
    /// Only check the literal parts of each frame, not the checksum
    #[arg(long)]
    no_verify: bool,
}

struct LogReporter {
    logger: Rc<PosixLogger>,
    frames: usize,
    bytes: usize,
}

impl Reporter for LogReporter {
    fn corruption(&mut self, bytes: usize, error: &Error) {
        self.frames += 1;
        self.bytes += bytes;
        self.logger.log(&format!("dropping {} bytes: {}", bytes, error));
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    let env = PosixEnv::new();
    let logger = Rc::new(PosixLogger::stderr());
    if let Some(source) = parse_output_file_name(&opts.file) {
        logger.log(&format!("{} was framed from {}", opts.file, source));
    }

    let size = env
        .get_file_size(&opts.file)
        .with_context(|| format!("Failed to read file: {}", opts.file))?;
    let tail = size % FRAME_SIZE as u64;
    if tail > 0 {
        logger.log(&format!(
            "{}: ignoring {} bytes of a truncated last frame",
            opts.file, tail
        ));
    }
    let file = env
        .new_sequential_file(&opts.file)
        .with_context(|| format!("Failed to read file: {}", opts.file))?;
    let reporter = Rc::new(RefCell::new(LogReporter {
        logger: logger.clone(),
        frames: 0,
        bytes: 0,
    }));
    let mut reader = Reader::new(file, !opts.no_verify, Some(reporter.clone()));

    let mut frames = 0u64;
    while reader.read_record().is_some() {
        let dump = dump_frame(reader.last_frame());
        if opts.offsets {
            println!("{:08X} {}", reader.last_record_offset(), dump);
        } else {
            println!("{}", dump);
        }
        frames += 1;
    }
    logger.log(&format!("{} valid frames in {}", frames, opts.file));

    let reporter = reporter.borrow();
    if reporter.frames > 0 {
        bail!(
            "{} corrupt frames ({} bytes) in {}",
            reporter.frames,
            reporter.bytes,
            opts.file
        );
    }
    Ok(())
}
