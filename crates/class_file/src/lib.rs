// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html

mod access_flags;
pub mod attributes;
mod class;
mod class_file;
#[macro_use]
pub mod constant_pool;
mod error;
mod parser;
pub mod reader;

use std::io::Read;

pub use self::class_file::{ClassFile, FieldInfo, MethodInfo};
pub use access_flags::{ClassAccessFlags, FieldAccessFlags, MethodAccessFlags};
pub use attributes::{Attribute, AttributeBody, Attributes};
pub use class::{Class, ClassKind};
pub use constant_pool::{ConstantEntry, ConstantPool};
pub use error::ClassFileError;
pub use parser::Parser;
pub use reader::ByteReader;

pub type Result<T, E = ClassFileError> = std::result::Result<T, E>;

/// Decodes one class file from `r`, reading no further than its last byte.
pub fn decode(r: impl Read) -> Result<ClassFile> {
    ClassFile::parse(r)
}
