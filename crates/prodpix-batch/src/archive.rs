use std::io::{Seek, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::RowError;

/// Zip archive of downloaded images.
pub struct ImageArchive<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: FileOptions,
    entries: usize,
}

impl<W: Write + Seek> ImageArchive<W> {
    pub fn new(writer: W) -> Self {
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);
        Self {
            zip: ZipWriter::new(writer),
            options,
            entries: 0,
        }
    }

    /// Writes one entry.
    ///
    /// # Errors
    ///
    /// Returns [`RowError::Archive`] or [`RowError::Io`] if the entry cannot
    /// be written.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<(), RowError> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(bytes)?;
        self.entries += 1;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Writes the central directory, flushes, and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns the zip error if the archive cannot be finalized.
    pub fn finish(mut self) -> Result<W, zip::result::ZipError> {
        let mut writer = self.zip.finish()?;
        writer.flush()?;
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use super::*;

    #[test]
    fn writes_readable_entries() {
        let mut buf = Cursor::new(Vec::new());
        let mut archive = ImageArchive::new(&mut buf);
        archive.add("a.jpg", b"first").expect("add a");
        archive.add("b.jpg", b"second").expect("add b");
        assert_eq!(archive.len(), 2);
        archive.finish().expect("finish");

        let mut zip = zip::ZipArchive::new(Cursor::new(buf.into_inner())).expect("open zip");
        assert_eq!(zip.len(), 2);
        let mut contents = String::new();
        zip.by_name("b.jpg")
            .expect("entry b")
            .read_to_string(&mut contents)
            .expect("read b");
        assert_eq!(contents, "second");
    }

    #[test]
    fn empty_archive_is_still_valid() {
        let mut buf = Cursor::new(Vec::new());
        let archive = ImageArchive::new(&mut buf);
        assert!(archive.is_empty());
        archive.finish().expect("finish");
        let zip = zip::ZipArchive::new(Cursor::new(buf.into_inner())).expect("open zip");
        assert_eq!(zip.len(), 0);
    }
}
