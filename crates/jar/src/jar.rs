use std::{
    fs::File,
    io::{BufReader, Read, Seek},
    path::Path,
};

use jlist_class_file::{Class, ClassKind, Result as ClassResult};
use zip::ZipArchive;

use crate::JarError;

const CLASS_SUFFIX: &str = ".class";

/// One decoded class, with its names resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub archive: String,
    pub entry: String,
    pub kind: ClassKind,
    pub name: String,
    pub super_name: String,
    pub interfaces: Vec<String>,
}
impl ClassSummary {
    pub fn new(archive: &str, entry: &str, class: &Class) -> Self {
        Self {
            archive: archive.to_owned(),
            entry: entry.to_owned(),
            kind: class.classify(),
            name: class.name().to_owned(),
            super_name: class.super_name().to_owned(),
            interfaces: class
                .interface_names()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

/// A zip container of class files.
pub struct Jar<R> {
    archive: ZipArchive<R>,
    label: String,
}
impl Jar<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JarError> {
        let path = path.as_ref();
        let file = File::open(path)?;

        Self::new(BufReader::new(file), path.display().to_string())
    }
}
impl<R: Read + Seek> Jar<R> {
    /// `label` names the container in summaries and diagnostics.
    pub fn new(r: R, label: impl Into<String>) -> Result<Self, JarError> {
        Ok(Self {
            archive: ZipArchive::new(r)?,
            label: label.into(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Names of the class file members, in archive order.
    pub fn class_names(&self) -> Vec<&str> {
        self.archive
            .file_names()
            .filter(|name| is_class_file(name))
            .collect()
    }

    /// Decodes every class file member in archive order and hands each
    /// outcome to `f`. Only failures to read the container itself stop the
    /// walk.
    pub fn for_each_class(
        &mut self,
        mut f: impl FnMut(&str, ClassResult<Class>),
    ) -> Result<(), JarError> {
        for i in 0..self.archive.len() {
            let entry = self.archive.by_index(i)?;
            if entry.is_dir() || !is_class_file(entry.name()) {
                continue;
            }

            let name = entry.name().to_owned();
            log::debug!("decoding {name} within {}", self.label);
            f(&name, Class::read(BufReader::new(entry)));
        }

        Ok(())
    }

    /// Summaries of every class that decodes. Members that fail to decode
    /// are logged and skipped.
    pub fn list(&mut self) -> Result<Vec<ClassSummary>, JarError> {
        let label = self.label.clone();
        let mut summaries = Vec::new();

        self.for_each_class(|entry, class| match class {
            Ok(class) => summaries.push(ClassSummary::new(&label, entry, &class)),
            Err(err) => log::warn!("failed to parse {entry} within {label}: {err}"),
        })?;

        Ok(summaries)
    }
}

fn is_class_file(name: &str) -> bool {
    name.ends_with(CLASS_SUFFIX)
}
