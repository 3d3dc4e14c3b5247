/// Compute the CRC32 (IEEE, reflected `0xEDB88320` polynomial) of a byte slice.
///
/// Uses `crc32fast`, which picks a hardware-accelerated implementation
/// (SIMD/PCLMULQDQ) when available and a fast table-driven one otherwise.
#[inline]
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}
