use std::fmt;

use crate::{parser::Parser, ConstantPool, Result};

/// A named attribute with its body kept as raw bytes.
#[derive(Clone, PartialEq)]
pub struct Attribute {
    pub attribute_name_index: u16,
    pub info: Vec<u8>,
}
impl Attribute {
    pub fn name<'a>(&self, constant_pool: &'a ConstantPool) -> &'a str {
        constant_pool.text_at(self.attribute_name_index)
    }

    /// Interprets the body as `T`, whatever this attribute is named.
    pub fn decode<T: AttributeBody>(&self) -> Result<T> {
        T::decode(&mut Parser::new(&self.info[..]))
    }

    /// The record as it appears in a class file: name index, length, body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(6 + self.info.len());
        bytes.extend_from_slice(&self.attribute_name_index.to_be_bytes());
        bytes.extend_from_slice(&(self.info.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&self.info);
        bytes
    }
}
impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("attribute_name_index", &self.attribute_name_index)
            .field("info", &format!("({} bytes)", self.info.len()))
            .finish()
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Attributes(pub Vec<Attribute>);
impl Attributes {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn find_by_name(&self, name: &str, constant_pool: &ConstantPool) -> Option<&Attribute> {
        self.0.iter().find(|a| a.name(constant_pool) == name)
    }

    /// Finds the attribute named `T::NAME` and decodes its body.
    pub fn decode<T: AttributeBody>(&self, constant_pool: &ConstantPool) -> Option<Result<T>> {
        Some(self.find_by_name(T::NAME, constant_pool)?.decode())
    }

    pub fn code_attribute(&self, constant_pool: &ConstantPool) -> Option<Result<CodeAttribute>> {
        self.decode(constant_pool)
    }
}
impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Layout of a specific attribute's body.
///
/// Implement this to teach the crate a new attribute; it is looked up by
/// `NAME` through [`Attributes::decode`].
pub trait AttributeBody: Sized {
    const NAME: &'static str;

    fn decode(parser: &mut Parser<&[u8]>) -> Result<Self>;
}

#[derive(Debug, PartialEq)]
pub struct ConstantValueAttribute {
    pub constant_value_index: u16,
}
impl AttributeBody for ConstantValueAttribute {
    const NAME: &'static str = "ConstantValue";

    fn decode(parser: &mut Parser<&[u8]>) -> Result<Self> {
        Ok(Self {
            constant_value_index: parser.read_u16()?,
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct SourceFileAttribute {
    pub sourcefile_index: u16,
}
impl AttributeBody for SourceFileAttribute {
    const NAME: &'static str = "SourceFile";

    fn decode(parser: &mut Parser<&[u8]>) -> Result<Self> {
        Ok(Self {
            sourcefile_index: parser.read_u16()?,
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct SignatureAttribute {
    pub signature_index: u16,
}
impl AttributeBody for SignatureAttribute {
    const NAME: &'static str = "Signature";

    fn decode(parser: &mut Parser<&[u8]>) -> Result<Self> {
        Ok(Self {
            signature_index: parser.read_u16()?,
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct ExceptionsAttribute {
    pub exception_index_table: Vec<u16>,
}
impl AttributeBody for ExceptionsAttribute {
    const NAME: &'static str = "Exceptions";

    fn decode(parser: &mut Parser<&[u8]>) -> Result<Self> {
        let number_of_exceptions = parser.read_u16()?;

        Ok(Self {
            exception_index_table: parser.read_u16_array(number_of_exceptions as usize)?,
        })
    }
}

#[derive(Debug, PartialEq)]
pub struct ExceptionTableEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    pub catch_type: u16,
}

/// A method body. The instructions stay undecoded in `code`.
#[derive(Debug, PartialEq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
    pub exception_table: Vec<ExceptionTableEntry>,
    pub attributes: Attributes,
}
impl AttributeBody for CodeAttribute {
    const NAME: &'static str = "Code";

    fn decode(parser: &mut Parser<&[u8]>) -> Result<Self> {
        let max_stack = parser.read_u16()?;
        let max_locals = parser.read_u16()?;
        let code_length = parser.read_u32()?;
        let code = parser.read_bytes(code_length as usize)?;
        let exception_table_length = parser.read_u16()?;
        let exception_table = (0..exception_table_length)
            .map(|_| -> Result<ExceptionTableEntry> {
                Ok(ExceptionTableEntry {
                    start_pc: parser.read_u16()?,
                    end_pc: parser.read_u16()?,
                    handler_pc: parser.read_u16()?,
                    catch_type: parser.read_u16()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let attributes = parser.parse_attributes()?;

        Ok(Self {
            max_stack,
            max_locals,
            code,
            exception_table,
            attributes,
        })
    }
}
