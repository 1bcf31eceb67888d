use std::io::Read;

use crate::{
    attributes::{Attribute, Attributes},
    class_file::{FieldInfo, MethodInfo},
    constant_pool::{
        self, double_from_bits, float_from_bits, tag, ConstantEntry, ConstantPool,
    },
    reader::ByteReader,
    ClassAccessFlags, ClassFile, ClassFileError, FieldAccessFlags, MethodAccessFlags, Result,
};

const MAGIC: u32 = 0xCAFEBABE;

/// Sequential class file decoder.
///
/// Nothing is read beyond the last byte of the structure being decoded, and
/// the first error aborts the whole decode.
pub struct Parser<R> {
    r: ByteReader<R>,
}
impl<R: Read> Parser<R> {
    pub fn new(r: R) -> Self {
        Self {
            r: ByteReader::new(r),
        }
    }

    pub fn parse(&mut self) -> Result<ClassFile> {
        self.parse_magic_identifier()?;
        let (minor_version, major_version) = self.parse_version()?;
        log::debug!("class file version {major_version}.{minor_version}");

        let constant_pool = self.parse_constant_pool()?;
        let access_flags = ClassAccessFlags::from_bits_truncate(self.read_u16()?);
        let this_class = self.read_u16()?;
        let super_class = self.read_u16()?;

        let interfaces_count = self.read_u16()?;
        let interfaces = self.read_u16_array(interfaces_count as usize)?;

        let fields_count = self.read_u16()?;
        let fields = (0..fields_count)
            .map(|_| self.parse_field_info())
            .collect::<Result<Vec<_>>>()?;

        let methods_count = self.read_u16()?;
        let methods = (0..methods_count)
            .map(|_| self.parse_method_info())
            .collect::<Result<Vec<_>>>()?;

        let attributes = self.parse_attributes()?;

        log::debug!(
            "decoded class file: {} constant pool slots, {} interfaces, {} fields, {} methods, {} attributes",
            constant_pool.len(),
            interfaces.len(),
            fields.len(),
            methods.len(),
            attributes.len()
        );

        Ok(ClassFile {
            minor_version,
            major_version,
            constant_pool,
            access_flags,
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }

    fn parse_field_info(&mut self) -> Result<FieldInfo> {
        let access_flags = FieldAccessFlags::from_bits_truncate(self.read_u16()?);
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        let attributes = self.parse_attributes()?;

        Ok(FieldInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_method_info(&mut self) -> Result<MethodInfo> {
        let access_flags = MethodAccessFlags::from_bits_truncate(self.read_u16()?);
        let name_index = self.read_u16()?;
        let descriptor_index = self.read_u16()?;
        let attributes = self.parse_attributes()?;

        Ok(MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes,
        })
    }

    fn parse_magic_identifier(&mut self) -> Result<()> {
        match self.read_u32()? {
            MAGIC => Ok(()),
            magic_identifier => Err(ClassFileError::BadMagic(magic_identifier)),
        }
    }

    fn parse_version(&mut self) -> Result<(u16, u16)> {
        let minor = self.read_u16()?;
        let major = self.read_u16()?;
        Ok((minor, major))
    }

    /// Decodes `constant_pool_count - 1` slots. A count of zero is treated
    /// like one: an empty pool.
    fn parse_constant_pool(&mut self) -> Result<ConstantPool> {
        let constant_pool_count = self.read_u16()?;
        let count = constant_pool_count.saturating_sub(1) as usize;

        let mut entries = Vec::with_capacity(count + 1);
        while entries.len() < count {
            // position in the pool table, phantom slots counted
            let index = entries.len() as u16;
            let entry = self.parse_constant_entry(index)?;
            log::trace!("constant pool #{}: {entry:?}", index + 1);

            let wide = entry.is_wide();
            entries.push(entry);
            if wide {
                entries.push(ConstantEntry::Unusable);
            }
        }

        Ok(ConstantPool::new(entries))
    }

    fn parse_constant_entry(&mut self, index: u16) -> Result<ConstantEntry> {
        let tag = self.read_u8()?;
        let entry = match tag {
            tag::UTF8 => self.parse_utf8()?,
            tag::INTEGER => ConstantEntry::Integer(self.r.read_i32()?),
            tag::FLOAT => ConstantEntry::Float(float_from_bits(self.read_u32()?)),
            tag::LONG => ConstantEntry::Long(self.r.read_i64()?),
            tag::DOUBLE => ConstantEntry::Double(double_from_bits(self.r.read_u64()?)),
            tag::CLASS => ConstantEntry::Class(constant_pool::ClassInfo {
                name_index: self.read_u16()?,
            }),
            tag::STRING => ConstantEntry::String(constant_pool::StringInfo {
                string_index: self.read_u16()?,
            }),
            tag::FIELD_REF => ConstantEntry::FieldRef(self.parse_ref_info()?),
            tag::METHOD_REF => ConstantEntry::MethodRef(self.parse_ref_info()?),
            tag::INTERFACE_METHOD_REF => {
                ConstantEntry::InterfaceMethodRef(self.parse_ref_info()?)
            }
            tag::NAME_AND_TYPE => ConstantEntry::NameAndType(constant_pool::NameAndTypeInfo {
                name_index: self.read_u16()?,
                descriptor_index: self.read_u16()?,
            }),
            tag::METHOD_HANDLE => ConstantEntry::MethodHandle(constant_pool::MethodHandleInfo {
                reference_kind: self.read_u8()?,
                reference_index: self.read_u16()?,
            }),
            tag::METHOD_TYPE => ConstantEntry::MethodType(constant_pool::MethodTypeInfo {
                descriptor_index: self.read_u16()?,
            }),
            tag::INVOKE_DYNAMIC => {
                ConstantEntry::InvokeDynamic(constant_pool::InvokeDynamicInfo {
                    bootstrap_method_attr_index: self.read_u16()?,
                    name_and_type_index: self.read_u16()?,
                })
            }
            tag::MODULE => ConstantEntry::Module(constant_pool::ModuleInfo {
                name_index: self.read_u16()?,
            }),
            tag::PACKAGE => ConstantEntry::Package(constant_pool::PackageInfo {
                name_index: self.read_u16()?,
            }),
            _ => return Err(ClassFileError::UnsupportedConstantTag { tag, index }),
        };

        Ok(entry)
    }

    // The length prefix counts bytes, not characters.
    fn parse_utf8(&mut self) -> Result<ConstantEntry> {
        let length = self.read_u16()?;
        let bytes = self.read_bytes(length as usize)?;

        Ok(ConstantEntry::Utf8(constant_pool::Utf8Info::new(bytes)))
    }

    fn parse_ref_info(&mut self) -> Result<constant_pool::RefInfo> {
        let class_index = self.read_u16()?;
        let name_and_type_index = self.read_u16()?;

        Ok(constant_pool::RefInfo {
            class_index,
            name_and_type_index,
        })
    }

    fn parse_attribute(&mut self) -> Result<Attribute> {
        let attribute_name_index = self.read_u16()?;
        let attribute_length = self.read_u32()?;
        let info = self.read_bytes(attribute_length as usize)?;
        log::trace!("attribute #{attribute_name_index}: {attribute_length} bytes");

        Ok(Attribute {
            attribute_name_index,
            info,
        })
    }

    /// Reads an attribute count followed by that many attributes.
    pub fn parse_attributes(&mut self) -> Result<Attributes> {
        let attributes_count = self.read_u16()?;
        (0..attributes_count)
            .map(|_| self.parse_attribute())
            .collect::<Result<Vec<_>>>()
            .map(Attributes)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.r.position()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.r.read_u8()
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.r.read_u16()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.r.read_u32()
    }

    pub fn read_u16_array(&mut self, count: usize) -> Result<Vec<u16>> {
        self.r.read_u16_array(count)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        self.r.read_bytes(n)
    }
}
