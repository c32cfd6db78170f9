mod checksum;
mod result;

pub use checksum::{decode_hex, encode_hex, xor_fold};
pub use result::{to_error, Error, Result};
