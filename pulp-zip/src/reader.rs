//! Trailer-anchored ZIP reader.
//!
//! The reader locates the End-Of-Central-Directory record by scanning
//! backward from the end of the buffer, then walks the central directory
//! for entry metadata. Sizes from the central directory are authoritative;
//! the local file header is only consulted to validate its signature and
//! to find where the payload starts (its variable-length name and extra
//! fields). Archives relying on the data-descriptor convention therefore
//! parse correctly even when local header sizes are zero.

use crate::{Error, Result};
use flate2::read::DeflateDecoder;
use indexmap::IndexMap;
use std::io::Read;

const EOCD_SIG: [u8; 4] = [0x50, 0x4B, 0x05, 0x06];
const CENTRAL_SIG: [u8; 4] = [0x50, 0x4B, 0x01, 0x02];
const LOCAL_SIG: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

const EOCD_LEN: usize = 22;
const CENTRAL_LEN: usize = 46;
const LOCAL_LEN: usize = 30;

/// Compression method identifier for stored (uncompressed) entries.
const METHOD_STORE: u16 = 0;
/// Compression method identifier for raw Deflate.
const METHOD_DEFLATE: u16 = 8;

/// A fully parsed archive: entry names mapped to decompressed bytes.
///
/// Entries iterate in central-directory order. Duplicate names keep the
/// last payload parsed. Directory entries (trailing `/`) are skipped, as
/// are entries whose local header signature does not match the central
/// directory record - some generators leave stale records behind.
#[derive(Debug, Default)]
pub struct ZipReader {
    entries: IndexMap<String, Vec<u8>>,
}

impl ZipReader {
    /// Parse an archive from a byte buffer, decompressing every entry.
    ///
    /// Fails with [`Error::MissingEndOfCentralDirectory`] when no EOCD
    /// signature exists in the trailing region, and with
    /// [`Error::UnsupportedCompression`] for methods other than Store (0)
    /// and Deflate (8).
    pub fn parse(data: &[u8]) -> Result<Self> {
        let eocd = find_eocd(data)?;
        let entry_count = read_u16(data, eocd + 10)?;
        let mut pos = read_u32(data, eocd + 16)? as usize;

        let mut entries = IndexMap::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            if data.len() < pos + CENTRAL_LEN || data[pos..pos + 4] != CENTRAL_SIG {
                return Err(Error::Truncated("central directory record"));
            }
            let method = read_u16(data, pos + 10)?;
            let compressed_size = read_u32(data, pos + 20)? as usize;
            let uncompressed_size = read_u32(data, pos + 24)? as usize;
            let name_len = read_u16(data, pos + 28)? as usize;
            let extra_len = read_u16(data, pos + 30)? as usize;
            let comment_len = read_u16(data, pos + 32)? as usize;
            let local_offset = read_u32(data, pos + 42)? as usize;

            let name_end = pos + CENTRAL_LEN + name_len;
            let name_bytes = data
                .get(pos + CENTRAL_LEN..name_end)
                .ok_or(Error::Truncated("entry name"))?;
            let name = String::from_utf8_lossy(name_bytes).into_owned();
            pos = name_end + extra_len + comment_len;

            // Directory placeholders carry no payload.
            if name.ends_with('/') {
                continue;
            }

            // Stale central records point at garbage; skip, never fail.
            match data.get(local_offset..local_offset + 4) {
                Some(sig) if sig == LOCAL_SIG => {},
                _ => continue,
            }

            let local_name_len = read_u16(data, local_offset + 26)? as usize;
            let local_extra_len = read_u16(data, local_offset + 28)? as usize;
            let payload_start = local_offset + LOCAL_LEN + local_name_len + local_extra_len;
            let payload = data
                .get(payload_start..payload_start + compressed_size)
                .ok_or(Error::Truncated("entry payload"))?;

            let bytes = match method {
                METHOD_STORE => payload.to_vec(),
                METHOD_DEFLATE => inflate(payload, uncompressed_size)?,
                other => return Err(Error::UnsupportedCompression(other)),
            };
            entries.insert(name, bytes);
        }

        Ok(Self { entries })
    }

    /// Get the decompressed bytes of an entry by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Get an entry decoded as UTF-8 text (lossy).
    pub fn get_str(&self, name: &str) -> Option<std::borrow::Cow<'_, str>> {
        self.get(name).map(String::from_utf8_lossy)
    }

    /// Check whether an entry exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate entry names in central-directory order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate `(name, bytes)` pairs in central-directory order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of parsed entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan backward from the buffer's end for the EOCD signature.
fn find_eocd(data: &[u8]) -> Result<usize> {
    if data.len() < EOCD_LEN {
        return Err(Error::MissingEndOfCentralDirectory);
    }
    // The comment field caps the scan window at 64 KiB past the fixed record.
    let lower = data.len().saturating_sub(EOCD_LEN + u16::MAX as usize);
    let mut pos = data.len() - EOCD_LEN;
    loop {
        if data[pos..pos + 4] == EOCD_SIG {
            return Ok(pos);
        }
        if pos == lower {
            return Err(Error::MissingEndOfCentralDirectory);
        }
        pos -= 1;
    }
}

/// Raw-inflate a Deflate payload, sized by the central directory.
fn inflate(payload: &[u8], expected_size: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_size);
    DeflateDecoder::new(payload).read_to_end(&mut out)?;
    Ok(out)
}

fn read_u16(data: &[u8], pos: usize) -> Result<u16> {
    data.get(pos..pos + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(Error::Truncated("u16 field"))
}

fn read_u32(data: &[u8], pos: usize) -> Result<u32> {
    data.get(pos..pos + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(Error::Truncated("u32 field"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    struct RawEntry {
        name: &'static str,
        method: u16,
        raw: &'static [u8],
        stored: Vec<u8>,
        corrupt_local: bool,
    }

    impl RawEntry {
        fn stored(name: &'static str, raw: &'static [u8]) -> Self {
            Self { name, method: METHOD_STORE, raw, stored: raw.to_vec(), corrupt_local: false }
        }

        fn deflated(name: &'static str, raw: &'static [u8]) -> Self {
            let mut enc = DeflateEncoder::new(Vec::new(), Compression::default());
            enc.write_all(raw).unwrap();
            Self { name, method: METHOD_DEFLATE, raw, stored: enc.finish().unwrap(), corrupt_local: false }
        }
    }

    /// Assemble a raw archive byte-by-byte so malformed layouts can be staged.
    fn build(entries: &[RawEntry]) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut offsets = Vec::new();
        for e in entries {
            offsets.push(buf.len() as u32);
            if e.corrupt_local {
                buf.extend_from_slice(b"XXXX");
            } else {
                buf.extend_from_slice(&LOCAL_SIG);
            }
            buf.extend_from_slice(&20u16.to_le_bytes()); // version needed
            buf.extend_from_slice(&0u16.to_le_bytes()); // flags
            buf.extend_from_slice(&e.method.to_le_bytes());
            buf.extend_from_slice(&[0; 4]); // mod time/date
            buf.extend_from_slice(&crate::crc32(e.raw).to_le_bytes());
            buf.extend_from_slice(&(e.stored.len() as u32).to_le_bytes());
            buf.extend_from_slice(&(e.raw.len() as u32).to_le_bytes());
            buf.extend_from_slice(&(e.name.len() as u16).to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes()); // extra len
            buf.extend_from_slice(e.name.as_bytes());
            buf.extend_from_slice(&e.stored);
        }
        let cd_offset = buf.len() as u32;
        for (e, off) in entries.iter().zip(&offsets) {
            buf.extend_from_slice(&CENTRAL_SIG);
            buf.extend_from_slice(&20u16.to_le_bytes()); // version made by
            buf.extend_from_slice(&20u16.to_le_bytes()); // version needed
            buf.extend_from_slice(&0u16.to_le_bytes()); // flags
            buf.extend_from_slice(&e.method.to_le_bytes());
            buf.extend_from_slice(&[0; 4]); // mod time/date
            buf.extend_from_slice(&crate::crc32(e.raw).to_le_bytes());
            buf.extend_from_slice(&(e.stored.len() as u32).to_le_bytes());
            buf.extend_from_slice(&(e.raw.len() as u32).to_le_bytes());
            buf.extend_from_slice(&(e.name.len() as u16).to_le_bytes());
            buf.extend_from_slice(&0u16.to_le_bytes()); // extra len
            buf.extend_from_slice(&0u16.to_le_bytes()); // comment len
            buf.extend_from_slice(&0u16.to_le_bytes()); // disk start
            buf.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
            buf.extend_from_slice(&0u32.to_le_bytes()); // external attrs
            buf.extend_from_slice(&off.to_le_bytes());
            buf.extend_from_slice(e.name.as_bytes());
        }
        let cd_size = buf.len() as u32 - cd_offset;
        buf.extend_from_slice(&EOCD_SIG);
        buf.extend_from_slice(&[0; 4]); // disk numbers
        buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
        buf.extend_from_slice(&(entries.len() as u16).to_le_bytes());
        buf.extend_from_slice(&cd_size.to_le_bytes());
        buf.extend_from_slice(&cd_offset.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes()); // comment len
        buf
    }

    #[test]
    fn reads_stored_and_deflated_entries() {
        let archive = build(&[
            RawEntry::stored("a.txt", b"alpha"),
            RawEntry::deflated("b.xml", b"<beta>text</beta>"),
        ]);
        let reader = ZipReader::parse(&archive).unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.get("a.txt").unwrap(), b"alpha");
        assert_eq!(reader.get("b.xml").unwrap(), b"<beta>text</beta>");
    }

    #[test]
    fn missing_eocd_is_malformed() {
        let err = ZipReader::parse(&[0u8; 128]).unwrap_err();
        assert!(matches!(err, Error::MissingEndOfCentralDirectory));
        let err = ZipReader::parse(b"PK").unwrap_err();
        assert!(matches!(err, Error::MissingEndOfCentralDirectory));
    }

    #[test]
    fn stale_local_header_skips_entry_without_failing() {
        let mut entries = vec![
            RawEntry::stored("good.txt", b"kept"),
            RawEntry::stored("stale.txt", b"dropped"),
        ];
        entries[1].corrupt_local = true;
        let archive = build(&entries);

        let reader = ZipReader::parse(&archive).unwrap();
        assert_eq!(reader.len(), 1);
        assert_eq!(reader.get("good.txt").unwrap(), b"kept");
        assert!(!reader.contains("stale.txt"));
    }

    #[test]
    fn unsupported_method_is_an_error() {
        let mut entry = RawEntry::stored("odd.bin", b"1234");
        entry.method = 12; // bzip2
        let archive = build(&[entry]);
        let err = ZipReader::parse(&archive).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCompression(12)));
    }

    #[test]
    fn duplicate_names_keep_last_payload_at_first_position() {
        let archive = build(&[
            RawEntry::stored("dup.txt", b"first"),
            RawEntry::stored("other.txt", b"x"),
            RawEntry::stored("dup.txt", b"second"),
        ]);
        let reader = ZipReader::parse(&archive).unwrap();
        assert_eq!(reader.len(), 2);
        assert_eq!(reader.get("dup.txt").unwrap(), b"second");
        // The name stays where it first appeared in the central directory.
        assert_eq!(reader.names().collect::<Vec<_>>(), ["dup.txt", "other.txt"]);
    }

    #[test]
    fn directory_entries_are_skipped() {
        let archive = build(&[
            RawEntry::stored("word/", b""),
            RawEntry::stored("word/document.xml", b"<w:document/>"),
        ]);
        let reader = ZipReader::parse(&archive).unwrap();
        assert_eq!(reader.names().collect::<Vec<_>>(), ["word/document.xml"]);
    }

    #[test]
    fn eocd_found_despite_trailing_comment() {
        let mut archive = build(&[RawEntry::stored("a", b"x")]);
        // Patch the comment length and append a comment body.
        let n = archive.len();
        archive[n - 2..n].copy_from_slice(&9u16.to_le_bytes());
        archive.extend_from_slice(b"trailing!");
        let reader = ZipReader::parse(&archive).unwrap();
        assert_eq!(reader.get("a").unwrap(), b"x");
    }
}
