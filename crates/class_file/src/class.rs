use std::{fmt, io::Read};

use crate::{ClassAccessFlags, ClassFile, Result};

/// What kind of type a class file declares.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ClassKind {
    Interface,
    Annotation,
    Enum,
    Abstract,
    Class,
}
impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Interface => "interface",
            ClassKind::Annotation => "annotation",
            ClassKind::Enum => "enum",
            ClassKind::Abstract => "abstract",
            ClassKind::Class => "class",
        }
    }
}
impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of a decoded class with its indices resolved to names.
///
/// Unresolvable indices show up as empty names.
#[derive(Debug)]
pub struct Class {
    class_file: ClassFile,
}
impl Class {
    pub fn new(class_file: ClassFile) -> Self {
        Self { class_file }
    }

    pub fn read(r: impl Read) -> Result<Self> {
        ClassFile::parse(r).map(Self::new)
    }

    pub fn class_file(&self) -> &ClassFile {
        &self.class_file
    }

    pub fn into_inner(self) -> ClassFile {
        self.class_file
    }

    pub fn name(&self) -> &str {
        self.class_file
            .constant_pool
            .class_name_at(self.class_file.this_class)
    }

    pub fn super_name(&self) -> &str {
        self.class_file
            .constant_pool
            .class_name_at(self.class_file.super_class)
    }

    /// Interface names in declaration order.
    pub fn interface_names(&self) -> Vec<&str> {
        self.class_file
            .interfaces
            .iter()
            .map(|&index| self.class_file.constant_pool.class_name_at(index))
            .collect()
    }

    /// First match wins: interface, annotation, enum, abstract, else class.
    /// An annotation type also carries the interface flag, so it reports as
    /// an interface.
    pub fn classify(&self) -> ClassKind {
        let flags = self.access_flags();
        if flags.is_interface() {
            ClassKind::Interface
        } else if flags.is_annotation() {
            ClassKind::Annotation
        } else if flags.is_enum() {
            ClassKind::Enum
        } else if flags.is_abstract() {
            ClassKind::Abstract
        } else {
            ClassKind::Class
        }
    }

    pub fn access_flags(&self) -> ClassAccessFlags {
        self.class_file.access_flags
    }
}
impl From<ClassFile> for Class {
    fn from(class_file: ClassFile) -> Self {
        Self::new(class_file)
    }
}
impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} extends {} implements [{}] ({})",
            self.classify(),
            self.name(),
            self.super_name(),
            self.interface_names().join(", "),
            self.access_flags()
        )
    }
}
