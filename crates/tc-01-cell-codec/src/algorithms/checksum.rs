//! Checksums used by the exchange formats.
//!
//! - CRC16/XMODEM guards the 34-byte body of a friendly address.
//! - CRC32C (Castagnoli) trails a bag of cells, stored little-endian.

use crc::{Crc, CRC_16_XMODEM, CRC_32_ISCSI};

const CRC16_XMODEM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);
const CRC32_CASTAGNOLI: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);

/// CRC16/XMODEM.
pub fn crc16(data: &[u8]) -> u16 {
    CRC16_XMODEM.checksum(data)
}

/// CRC32C (Castagnoli).
pub fn crc32c(data: &[u8]) -> u32 {
    CRC32_CASTAGNOLI.checksum(data)
}
