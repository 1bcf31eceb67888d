use std::{convert::TryFrom, fmt};

use crate::{reader::decode_modified_text, ClassFileError, Result};

pub mod tag {
    pub const UTF8: u8 = 1;
    pub const INTEGER: u8 = 3;
    pub const FLOAT: u8 = 4;
    pub const LONG: u8 = 5;
    pub const DOUBLE: u8 = 6;
    pub const CLASS: u8 = 7;
    pub const STRING: u8 = 8;
    pub const FIELD_REF: u8 = 9;
    pub const METHOD_REF: u8 = 10;
    pub const INTERFACE_METHOD_REF: u8 = 11;
    pub const NAME_AND_TYPE: u8 = 12;
    pub const METHOD_HANDLE: u8 = 15;
    pub const METHOD_TYPE: u8 = 16;
    pub const INVOKE_DYNAMIC: u8 = 18;
    pub const MODULE: u8 = 19;
    pub const PACKAGE: u8 = 20;
}

/// The constant pool of a class file.
///
/// Indices are 1-based. A `Long` or `Double` entry is followed by an
/// [`ConstantEntry::Unusable`] slot, so the next real entry sits two indices
/// further on.
#[derive(Debug, Default)]
pub struct ConstantPool {
    entries: Vec<ConstantEntry>,
}
impl ConstantPool {
    pub fn new(entries: Vec<ConstantEntry>) -> Self {
        Self { entries }
    }

    /// Number of slots, phantom slots included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Strict lookup of the entry at `index`.
    pub fn get(&self, index: u16) -> Result<&ConstantEntry> {
        if index == 0 {
            return Err(ClassFileError::UnusableConstant(index));
        }

        match self.entries.get(index as usize - 1) {
            Some(ConstantEntry::Unusable) => Err(ClassFileError::UnusableConstant(index)),
            Some(entry) => Ok(entry),
            None => Err(ClassFileError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            }),
        }
    }

    /// Entries paired with their 1-based index, phantom slots skipped.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &ConstantEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !matches!(e, ConstantEntry::Unusable))
            .map(|(i, e)| (i as u16 + 1, e))
    }

    /// Text of the UTF8 entry at `index`, or `""` when there is none.
    pub fn text_at(&self, index: u16) -> &str {
        match self.get(index) {
            Ok(ConstantEntry::Utf8(info)) => info.as_str(),
            _ => "",
        }
    }

    /// Name of the class referenced by the Class entry at `index`, or `""`.
    pub fn class_name_at(&self, index: u16) -> &str {
        match self.get(index) {
            Ok(ConstantEntry::Class(ClassInfo { name_index })) => self.text_at(*name_index),
            _ => "",
        }
    }

    /// Literal referenced by the String entry at `index`, or `""`.
    pub fn string_at(&self, index: u16) -> &str {
        match self.get(index) {
            Ok(ConstantEntry::String(StringInfo { string_index })) => self.text_at(*string_index),
            _ => "",
        }
    }
}
impl<'a> IntoIterator for &'a ConstantPool {
    type Item = &'a ConstantEntry;
    type IntoIter = std::slice::Iter<'a, ConstantEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[macro_export]
macro_rules! matches_cp_info {
    ($cp:expr, $index:expr, $i:ident) => {
        match $cp.get($index)? {
            $crate::constant_pool::ConstantEntry::$i(n) => Ok(n),
            c => Err($crate::ClassFileError::UnexpectedConstantPoolEntry(
                stringify!($i),
                c.clone(),
            )),
        }
    };
}

#[derive(Debug, PartialEq, Clone)]
pub enum ConstantEntry {
    Utf8(Utf8Info),
    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),
    Class(ClassInfo),
    String(StringInfo),
    FieldRef(RefInfo),
    MethodRef(RefInfo),
    InterfaceMethodRef(RefInfo),
    NameAndType(NameAndTypeInfo),
    MethodHandle(MethodHandleInfo),
    MethodType(MethodTypeInfo),
    InvokeDynamic(InvokeDynamicInfo),
    Module(ModuleInfo),
    Package(PackageInfo),
    /// The phantom slot after a `Long` or `Double`.
    Unusable,
}
impl ConstantEntry {
    pub fn tag(&self) -> Option<u8> {
        Some(match self {
            ConstantEntry::Utf8(_) => tag::UTF8,
            ConstantEntry::Integer(_) => tag::INTEGER,
            ConstantEntry::Float(_) => tag::FLOAT,
            ConstantEntry::Long(_) => tag::LONG,
            ConstantEntry::Double(_) => tag::DOUBLE,
            ConstantEntry::Class(_) => tag::CLASS,
            ConstantEntry::String(_) => tag::STRING,
            ConstantEntry::FieldRef(_) => tag::FIELD_REF,
            ConstantEntry::MethodRef(_) => tag::METHOD_REF,
            ConstantEntry::InterfaceMethodRef(_) => tag::INTERFACE_METHOD_REF,
            ConstantEntry::NameAndType(_) => tag::NAME_AND_TYPE,
            ConstantEntry::MethodHandle(_) => tag::METHOD_HANDLE,
            ConstantEntry::MethodType(_) => tag::METHOD_TYPE,
            ConstantEntry::InvokeDynamic(_) => tag::INVOKE_DYNAMIC,
            ConstantEntry::Module(_) => tag::MODULE,
            ConstantEntry::Package(_) => tag::PACKAGE,
            ConstantEntry::Unusable => return None,
        })
    }

    /// Name of the entry kind, as the class file format spells it.
    pub fn name(&self) -> &'static str {
        match self {
            ConstantEntry::Utf8(_) => "Utf8",
            ConstantEntry::Integer(_) => "Integer",
            ConstantEntry::Float(_) => "Float",
            ConstantEntry::Long(_) => "Long",
            ConstantEntry::Double(_) => "Double",
            ConstantEntry::Class(_) => "Class",
            ConstantEntry::String(_) => "String",
            ConstantEntry::FieldRef(_) => "Fieldref",
            ConstantEntry::MethodRef(_) => "Methodref",
            ConstantEntry::InterfaceMethodRef(_) => "InterfaceMethodref",
            ConstantEntry::NameAndType(_) => "NameAndType",
            ConstantEntry::MethodHandle(_) => "MethodHandle",
            ConstantEntry::MethodType(_) => "MethodType",
            ConstantEntry::InvokeDynamic(_) => "InvokeDynamic",
            ConstantEntry::Module(_) => "Module",
            ConstantEntry::Package(_) => "Package",
            ConstantEntry::Unusable => "Unusable",
        }
    }

    /// Whether the entry takes two pool slots.
    pub fn is_wide(&self) -> bool {
        matches!(self, ConstantEntry::Long(_) | ConstantEntry::Double(_))
    }
}

/// A UTF8 constant.
///
/// The payload is kept exactly as stored. `as_str` is a display form in
/// which sequences that are not valid modified UTF-8 show up as U+FFFD.
#[derive(Debug, PartialEq, Clone)]
pub struct Utf8Info {
    bytes: Vec<u8>,
    text: String,
}
impl Utf8Info {
    pub fn new(bytes: Vec<u8>) -> Self {
        let text = decode_modified_text(&bytes);
        Self { bytes, text }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
impl From<&str> for Utf8Info {
    /// Plain ASCII text is stored unchanged by modified UTF-8.
    fn from(text: &str) -> Self {
        Self::new(text.as_bytes().to_vec())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassInfo {
    pub name_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct StringInfo {
    pub string_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct RefInfo {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct NameAndTypeInfo {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodHandleInfo {
    pub reference_kind: u8,
    pub reference_index: u16,
}
impl MethodHandleInfo {
    pub fn kind(&self) -> Option<ReferenceKind> {
        ReferenceKind::try_from(self.reference_kind).ok()
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodTypeInfo {
    pub descriptor_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct InvokeDynamicInfo {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ModuleInfo {
    pub name_index: u16,
}

#[derive(Debug, PartialEq, Clone)]
pub struct PackageInfo {
    pub name_index: u16,
}

/// Behaviour of a method handle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ReferenceKind {
    GetField = 1,
    GetStatic = 2,
    PutField = 3,
    PutStatic = 4,
    InvokeVirtual = 5,
    InvokeStatic = 6,
    InvokeSpecial = 7,
    NewInvokeSpecial = 8,
    InvokeInterface = 9,
}

impl TryFrom<u8> for ReferenceKind {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(ReferenceKind::GetField),
            2 => Ok(ReferenceKind::GetStatic),
            3 => Ok(ReferenceKind::PutField),
            4 => Ok(ReferenceKind::PutStatic),
            5 => Ok(ReferenceKind::InvokeVirtual),
            6 => Ok(ReferenceKind::InvokeStatic),
            7 => Ok(ReferenceKind::InvokeSpecial),
            8 => Ok(ReferenceKind::NewInvokeSpecial),
            9 => Ok(ReferenceKind::InvokeInterface),
            _ => Err(value),
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReferenceKind::GetField => "getField",
            ReferenceKind::GetStatic => "getStatic",
            ReferenceKind::PutField => "putField",
            ReferenceKind::PutStatic => "putStatic",
            ReferenceKind::InvokeVirtual => "invokeVirtual",
            ReferenceKind::InvokeStatic => "invokeStatic",
            ReferenceKind::InvokeSpecial => "invokeSpecial",
            ReferenceKind::NewInvokeSpecial => "newInvokeSpecial",
            ReferenceKind::InvokeInterface => "invokeInterface",
        })
    }
}

// https://docs.oracle.com/javase/specs/jvms/se19/html/jvms-4.html#jvms-4.4.4
//
// Values are rebuilt as s * m * 2^(e - bias) with exact power-of-two scale
// factors, so every finite bit pattern maps to the same value as a native
// reinterpretation would.

pub(crate) fn float_from_bits(bits: u32) -> f32 {
    match bits {
        0x7f80_0000 => return f32::INFINITY,
        0xff80_0000 => return f32::NEG_INFINITY,
        _ if bits & 0x7f80_0000 == 0x7f80_0000 => return f32::NAN,
        _ => {}
    }

    let s = if bits >> 31 == 0 { 1.0 } else { -1.0 };
    let e = ((bits >> 23) & 0xff) as i32;
    let m = if e == 0 {
        (bits & 0x7f_ffff) << 1
    } else {
        (bits & 0x7f_ffff) | 0x80_0000
    };

    // Both factors and the product are exact in f64, and the product is
    // representable as f32.
    (s * m as f64 * pow2(e - 150)) as f32
}

pub(crate) fn double_from_bits(bits: u64) -> f64 {
    match bits {
        0x7ff0_0000_0000_0000 => return f64::INFINITY,
        0xfff0_0000_0000_0000 => return f64::NEG_INFINITY,
        _ if bits & 0x7ff0_0000_0000_0000 == 0x7ff0_0000_0000_0000 => return f64::NAN,
        _ => {}
    }

    let s = if bits >> 63 == 0 { 1.0 } else { -1.0 };
    let e = ((bits >> 52) & 0x7ff) as i32;
    let m = if e == 0 {
        (bits & 0xf_ffff_ffff_ffff) << 1
    } else {
        (bits & 0xf_ffff_ffff_ffff) | 0x10_0000_0000_0000
    };

    s * scale(m as f64, e - 1075)
}

/// `2^exp` for exponents in the normal f64 range.
fn pow2(exp: i32) -> f64 {
    debug_assert!((-1022..=1023).contains(&exp));
    f64::from_bits(((exp + 1023) as u64) << 52)
}

/// `value * 2^exp`, split so no intermediate step rounds.
fn scale(value: f64, exp: i32) -> f64 {
    if exp < -1022 {
        value * pow2(-1022) * pow2(exp + 1022)
    } else {
        value * pow2(exp)
    }
}
