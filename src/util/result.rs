use std::{fmt::Display, io};

use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Code {
    NotFound = 1,
    Corruption = 2,
    InvalidArgument = 4,
    IOError = 5,
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Code::NotFound => "NotFound",
            Code::Corruption => "Corruption",
            Code::InvalidArgument => "InvalidArgument",
            Code::IOError => "IOError",
        };
        f.write_str(str)
    }
}

#[derive(Debug, Clone, ThisError)]
#[error("{code}: {msg}")]
pub struct Error {
    code: Code,
    msg: String,
}

impl Error {
    fn new(code: Code, msg: &str) -> Self {
        Self {
            code,
            msg: msg.to_owned(),
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self::new(Code::NotFound, msg)
    }

    pub fn corruption(msg: &str) -> Self {
        Self::new(Code::Corruption, msg)
    }

    pub fn invalid_argument(msg: &str) -> Self {
        Self::new(Code::InvalidArgument, msg)
    }

    pub fn io_error(msg: &str) -> Self {
        Self::new(Code::IOError, msg)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == Code::NotFound
    }

    pub fn is_corruption(&self) -> bool {
        self.code == Code::Corruption
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn is_io_error(&self) -> bool {
        self.code == Code::IOError
    }
}

/// Prefixes the message with the file the operation was acting on.
pub fn to_error(target: &str, error: io::Error) -> Error {
    let msg = format!("{}: {}", target, error);
    match error.kind() {
        io::ErrorKind::NotFound => Error::not_found(&msg),
        _ => Error::io_error(&msg),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
