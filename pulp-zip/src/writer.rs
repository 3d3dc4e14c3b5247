//! Store-only ZIP writer.
//!
//! Exists solely to synthesize minimal word packages from salvaged text.
//! Entries are written verbatim with their CRC32; the correctness-critical
//! part is the cumulative offset bookkeeping in the central directory and
//! EOCD trailer, not compression, so no compression is ever performed.

use crate::{crc32, Error, Result};

const LOCAL_SIG: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const CENTRAL_SIG: [u8; 4] = [0x50, 0x4B, 0x01, 0x02];
const EOCD_SIG: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];

/// Version needed to extract: 2.0 covers Store entries.
const VERSION: u16 = 20;

struct CentralRecord {
    name: Vec<u8>,
    crc: u32,
    size: u32,
    local_offset: u32,
}

/// In-memory Store-only archive writer.
///
/// ```rust
/// use pulp_zip::ZipWriter;
///
/// let mut writer = ZipWriter::new();
/// writer.add("word/document.xml", b"<w:document/>")?;
/// let bytes = writer.finish();
/// # Ok::<(), pulp_zip::Error>(())
/// ```
#[derive(Default)]
pub struct ZipWriter {
    buf: Vec<u8>,
    records: Vec<CentralRecord>,
}

impl ZipWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one stored (uncompressed) entry.
    ///
    /// Fails with [`Error::EntryTooLarge`] when the name or payload does
    /// not fit the 32-bit fields of a classic (non-Zip64) archive.
    pub fn add(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if name.len() > u16::MAX as usize || data.len() > u32::MAX as usize {
            return Err(Error::EntryTooLarge(name.to_string()));
        }
        let local_offset = self.buf.len() as u32;
        let crc = crc32(data);
        let size = data.len() as u32;

        self.buf.extend_from_slice(&LOCAL_SIG);
        self.buf.extend_from_slice(&VERSION.to_le_bytes());
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // flags
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // method: Store
        self.buf.extend_from_slice(&[0; 4]); // mod time/date
        self.buf.extend_from_slice(&crc.to_le_bytes());
        self.buf.extend_from_slice(&size.to_le_bytes()); // compressed
        self.buf.extend_from_slice(&size.to_le_bytes()); // uncompressed
        self.buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // extra len
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(data);

        self.records.push(CentralRecord {
            name: name.as_bytes().to_vec(),
            crc,
            size,
            local_offset,
        });
        Ok(())
    }

    /// Emit the central directory and EOCD trailer, returning the archive.
    pub fn finish(mut self) -> Vec<u8> {
        let cd_offset = self.buf.len() as u32;
        for rec in &self.records {
            self.buf.extend_from_slice(&CENTRAL_SIG);
            self.buf.extend_from_slice(&VERSION.to_le_bytes()); // made by
            self.buf.extend_from_slice(&VERSION.to_le_bytes()); // needed
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // flags
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // method: Store
            self.buf.extend_from_slice(&[0; 4]); // mod time/date
            self.buf.extend_from_slice(&rec.crc.to_le_bytes());
            self.buf.extend_from_slice(&rec.size.to_le_bytes());
            self.buf.extend_from_slice(&rec.size.to_le_bytes());
            self.buf.extend_from_slice(&(rec.name.len() as u16).to_le_bytes());
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // extra len
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // comment len
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // disk start
            self.buf.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
            self.buf.extend_from_slice(&0u32.to_le_bytes()); // external attrs
            self.buf.extend_from_slice(&rec.local_offset.to_le_bytes());
            self.buf.extend_from_slice(&rec.name);
        }
        let cd_size = self.buf.len() as u32 - cd_offset;
        let count = self.records.len().min(u16::MAX as usize) as u16;

        self.buf.extend_from_slice(&EOCD_SIG);
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // this disk
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // cd start disk
        self.buf.extend_from_slice(&count.to_le_bytes());
        self.buf.extend_from_slice(&count.to_le_bytes());
        self.buf.extend_from_slice(&cd_size.to_le_bytes());
        self.buf.extend_from_slice(&cd_offset.to_le_bytes());
        self.buf.extend_from_slice(&0u16.to_le_bytes()); // comment len
        self.buf
    }

    /// Number of entries written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no entries have been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_verbatim_at_computed_offset() {
        let mut writer = ZipWriter::new();
        writer.add("x", b"payload-bytes").unwrap();
        let bytes = writer.finish();
        // Local header (30) + name (1), then the stored payload.
        assert_eq!(&bytes[31..31 + 13], b"payload-bytes");
    }

    #[test]
    fn oversized_name_is_rejected() {
        let name = "n".repeat(u16::MAX as usize + 1);
        let mut writer = ZipWriter::new();
        assert!(matches!(
            writer.add(&name, b"").unwrap_err(),
            Error::EntryTooLarge(_)
        ));
    }
}
