use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifiers of a class or interface.
    pub struct ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

bitflags! {
    /// Modifiers of a field.
    pub struct FieldAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
        const ENUM = 0x4000;
    }
}

bitflags! {
    /// Modifiers of a method.
    pub struct MethodAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
    }
}

// Named predicates plus a `Display` listing the set flags in declaration order.
macro_rules! access_flag_names {
    ($flags:ident { $($predicate:ident => $flag:ident: $name:literal,)* }) => {
        impl $flags {
            $(
                pub fn $predicate(&self) -> bool {
                    self.contains(Self::$flag)
                }
            )*
        }

        impl Default for $flags {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl fmt::Display for $flags {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let names = [$((Self::$flag, $name)),*];
                let mut first = true;
                for (flag, name) in names {
                    if !self.contains(flag) {
                        continue;
                    }
                    if !first {
                        f.write_str(", ")?;
                    }
                    f.write_str(name)?;
                    first = false;
                }
                Ok(())
            }
        }
    };
}

access_flag_names!(ClassAccessFlags {
    is_public => PUBLIC: "public",
    is_final => FINAL: "final",
    is_super => SUPER: "super",
    is_interface => INTERFACE: "interface",
    is_abstract => ABSTRACT: "abstract",
    is_synthetic => SYNTHETIC: "synthetic",
    is_annotation => ANNOTATION: "annotation",
    is_enum => ENUM: "enum",
    is_module => MODULE: "module",
});

access_flag_names!(FieldAccessFlags {
    is_public => PUBLIC: "public",
    is_private => PRIVATE: "private",
    is_protected => PROTECTED: "protected",
    is_static => STATIC: "static",
    is_final => FINAL: "final",
    is_volatile => VOLATILE: "volatile",
    is_transient => TRANSIENT: "transient",
    is_synthetic => SYNTHETIC: "synthetic",
    is_enum => ENUM: "enum",
});

access_flag_names!(MethodAccessFlags {
    is_public => PUBLIC: "public",
    is_private => PRIVATE: "private",
    is_protected => PROTECTED: "protected",
    is_static => STATIC: "static",
    is_final => FINAL: "final",
    is_synchronized => SYNCHRONIZED: "synchronized",
    is_bridge => BRIDGE: "bridge",
    is_varargs => VARARGS: "varargs",
    is_native => NATIVE: "native",
    is_abstract => ABSTRACT: "abstract",
    is_strict => STRICT: "strict",
    is_synthetic => SYNTHETIC: "synthetic",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_and_annotation_are_distinct_bits() {
        let annotation = ClassAccessFlags::from_bits_truncate(0x2000);
        assert!(annotation.is_annotation());
        assert!(!annotation.is_enum());

        let enumeration = ClassAccessFlags::from_bits_truncate(0x4000);
        assert!(enumeration.is_enum());
        assert!(!enumeration.is_annotation());
    }

    #[test]
    fn unknown_bits_are_dropped() {
        let flags = FieldAccessFlags::from_bits_truncate(0x0020 | 0x0001);
        assert_eq!(FieldAccessFlags::PUBLIC, flags);
    }

    #[test]
    fn display_lists_set_flags() {
        assert_eq!(
            "public, super",
            ClassAccessFlags::from_bits_truncate(0x0021).to_string()
        );
        assert_eq!(
            "public, static, varargs",
            MethodAccessFlags::from_bits_truncate(0x0089).to_string()
        );
        assert_eq!("", FieldAccessFlags::default().to_string());
    }
}
