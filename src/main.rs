use anyhow::Context;
use clap::Parser;

use tscbin::{
    encode,
    env::{PosixEnv, PosixLogger},
};

/*
Usage:
  tscbin imu.bin

  Writes imu.bin.out next to the input, one $TSC,BIN sentence per
  44-byte record.

  NOTE: The only argument is the path, even when it starts with '-'.
  Any other argument count prints the usage and exits successfully
  without touching the filesystem.
 */

#[derive(Debug, Parser)]
#[command(disable_help_flag = true, disable_version_flag = true)]
/// Frames a binary IMU log into $TSC,BIN sentences
struct Opts {
    /// The binary log to convert
    #[arg(allow_hyphen_values = true)]
    logfile: String,
}

fn main() -> anyhow::Result<()> {
    let opts = match Opts::try_parse() {
        Ok(opts) => opts,
        Err(error) => {
            error.print()?;
            return Ok(());
        }
    };
    let env = PosixEnv::new();
    let logger = PosixLogger::stderr();
    encode(&env, &opts.logfile, &logger)
        .with_context(|| format!("Failed to frame {}", opts.logfile))?;
    Ok(())
}
