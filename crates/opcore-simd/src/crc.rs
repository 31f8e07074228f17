//! CRC32 accumulation steps with the CRC-32C (Castagnoli) polynomial,
//! bit-reflected as 0x82F63B78. Each step folds one source operand into
//! the running 32-bit remainder; the instruction applies no initial or
//! final complement, that is the caller's protocol.

const POLY: u32 = 0x82F6_3B78;

const TABLE: [u32; 256] = {
    let mut t = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 1 != 0 { crc >> 1 ^ POLY } else { crc >> 1 };
            bit += 1;
        }
        t[i] = crc;
        i += 1;
    }
    t
};

pub fn crc32_u8(crc: u32, v: u8) -> u32 {
    TABLE[((crc ^ v as u32) & 0xFF) as usize] ^ crc >> 8
}

pub fn crc32_u16(crc: u32, v: u16) -> u32 {
    v.to_le_bytes().into_iter().fold(crc, crc32_u8)
}

pub fn crc32_u32(crc: u32, v: u32) -> u32 {
    v.to_le_bytes().into_iter().fold(crc, crc32_u8)
}

pub fn crc32_u64(crc: u32, v: u64) -> u32 {
    v.to_le_bytes().into_iter().fold(crc, crc32_u8)
}
