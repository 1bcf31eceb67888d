use std::io;

use thiserror::Error;

use crate::constant_pool::ConstantEntry;

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error(transparent)]
    IOError(io::Error),
    #[error("Invalid magic identifier: 0x{0:08X}")]
    BadMagic(u32),
    #[error("Unexpected end of input")]
    TruncatedInput,
    #[error("Unsupported constant pool tag 0x{tag:02X} at pool position {index}")]
    UnsupportedConstantTag { tag: u8, index: u16 },
    #[error("Constant pool index {index} out of range (pool holds {len} slots)")]
    IndexOutOfRange { index: u16, len: usize },
    #[error("Constant pool index {0} is not usable")]
    UnusableConstant(u16),
    #[error("Expected {0}, found {1:?}")]
    UnexpectedConstantPoolEntry(&'static str, ConstantEntry),
}

impl From<io::Error> for ClassFileError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => ClassFileError::TruncatedInput,
            _ => ClassFileError::IOError(err),
        }
    }
}
