//! Class-path entries: a directory of loose `.class` files or a ZIP/JAR archive. Adapted from
//! the teacher's `class_path_entry::{Directory, Jar}` with the async runtime and `DashMap`
//! caching dropped — this compiler runs single-threaded and synchronously end to end (§5).

use crate::error::Result;
use javac_classfile::ClassFile;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use zip::ZipArchive;

#[derive(Debug)]
pub enum ClassPathEntry {
    Directory(PathBuf),
    Archive(PathBuf),
}

impl ClassPathEntry {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> ClassPathEntry {
        let path = path.into();
        if path.is_file() {
            ClassPathEntry::Archive(path)
        } else {
            ClassPathEntry::Directory(path)
        }
    }

    /// Reads the named class (internal name, `/`-separated) from this entry, if present.
    pub fn read_class(&self, internal_name: &str) -> Result<Option<ClassFile>> {
        match self {
            ClassPathEntry::Directory(root) => {
                let path = root.join(format!("{internal_name}.class"));
                if !path.is_file() {
                    return Ok(None);
                }
                let bytes = fs::read(path)?;
                let class_file = ClassFile::from_bytes(&mut Cursor::new(bytes))?;
                Ok(Some(class_file))
            }
            ClassPathEntry::Archive(path) => {
                let bytes = fs::read(path)?;
                let mut archive = ZipArchive::new(Cursor::new(bytes))?;
                let entry_name = format!("{internal_name}.class");
                let Ok(mut file) = archive.by_name(&entry_name) else {
                    return Ok(None);
                };
                let mut buffer = Vec::new();
                std::io::Read::read_to_end(&mut file, &mut buffer)?;
                let class_file = ClassFile::from_bytes(&mut Cursor::new(buffer))?;
                Ok(Some(class_file))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_entry_reports_missing_class() -> Result<()> {
        let entry = ClassPathEntry::new("/nonexistent-javac-rs-classpath-root");
        assert!(entry.read_class("java/lang/Object")?.is_none());
        Ok(())
    }
}
