//! Zip package container for .docx files.
//!
//! A package is kept as an ordered list of raw parts. XML parts that the
//! engine edits are parsed on demand by the document model and written back
//! with [`Package::set_part`] before saving.

use std::fs::{self, File};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};

/// Upper bound on the buffer reserved from a part's declared size.
const MAX_PREALLOC: u64 = 1 << 20;

/// Path of the main document part.
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Path of the style definitions part.
pub const STYLES_PART: &str = "word/styles.xml";

/// Path of the content types part.
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Path of the main document's relationships part.
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

/// A single named part.
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// An opened .docx package.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a package from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(data))
    }

    /// Read a package from a seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut data = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
            file.read_to_end(&mut data)?;
            parts.push(Part { name, data });
        }

        log::debug!("Read package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Check if a part exists.
    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name)
    }

    /// Get the raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Get a part as UTF-8 text.
    pub fn part_str(&self, name: &str) -> Result<Option<&str>> {
        match self.part(name) {
            Some(data) => {
                let text = std::str::from_utf8(data)
                    .map_err(|e| Error::Xml(format!("{} is not UTF-8: {}", name, e)))?;
                // Some producers emit a byte order mark.
                Ok(Some(text.trim_start_matches('\u{feff}')))
            }
            None => Ok(None),
        }
    }

    /// Replace a part, or add it at the end if absent.
    pub fn set_part(&mut self, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(Part { name, data }),
        }
    }

    /// Names of all parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Write the package to a seekable writer.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for part in &self.parts {
            zip.start_file(part.name.as_str(), options)?;
            zip.write_all(&part.data)?;
        }

        Ok(zip.finish()?)
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let cursor = self.write_to(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Save the package to a file.
    ///
    /// The archive is written to a sibling temporary file first and then
    /// renamed over the target. An existing target's permissions carry over
    /// to the new file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let temp_path = path.with_extension("docx.tmp");
        let permissions = fs::metadata(path).ok().map(|m| m.permissions());

        let file = File::create(&temp_path)?;
        let written = self.write_to(file).and_then(|_| match permissions {
            Some(permissions) => Ok(fs::set_permissions(&temp_path, permissions)?),
            None => Ok(()),
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        fs::rename(&temp_path, path)?;

        log::info!("Saved package to {}", path.display());
        Ok(())
    }
}
