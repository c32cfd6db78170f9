pub mod dump;
pub mod encoder;
pub mod env;
pub mod filename;
pub mod frame;
mod util;

pub use encoder::{encode, Encoded};
pub use util::{Error, Result};
