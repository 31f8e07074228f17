//! Packed-integer and packed-float operation semantics for the 64-bit
//! (MMX) and 128-bit (XMM) register formats, plus the AES round
//! primitives and CRC-32C accumulation.
//!
//! Vectors are plain `u64`/`u128` bit images interpreted little-endian;
//! 256-bit forms are `[u128; 2]` pairs handled lane-half by lane-half.
//! Floating-point control and exception state lives in an architectural
//! MXCSR image; an operation that raises an exception unmasked there
//! reports it as an [`XmmFault`] and leaves its destination untouched
//! (the sticky flag bits are still recorded).

use thiserror::Error;

pub use opcore_flags::Eflags;

pub mod aes;
pub mod crc;
pub mod fp;
pub mod int;
pub mod shuffle;
pub mod wide256;

/// #XM: an SIMD floating-point exception was raised while unmasked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unmasked SIMD floating-point exception")]
pub struct XmmFault;

pub const MXCSR_IE: u32 = 1 << 0;
pub const MXCSR_DE: u32 = 1 << 1;
pub const MXCSR_ZE: u32 = 1 << 2;
pub const MXCSR_OE: u32 = 1 << 3;
pub const MXCSR_UE: u32 = 1 << 4;
pub const MXCSR_PE: u32 = 1 << 5;
pub const MXCSR_DAZ: u32 = 1 << 6;
pub const MXCSR_IM: u32 = 1 << 7;
pub const MXCSR_DM: u32 = 1 << 8;
pub const MXCSR_ZM: u32 = 1 << 9;
pub const MXCSR_OM: u32 = 1 << 10;
pub const MXCSR_UM: u32 = 1 << 11;
pub const MXCSR_PM: u32 = 1 << 12;
pub const MXCSR_RC_MASK: u32 = 0b11 << 13;
pub const MXCSR_FTZ: u32 = 1 << 15;
pub const MXCSR_DEFAULT: u32 = 0x1F80;

pub(crate) fn u128_to_bytes(v: u128) -> [u8; 16] {
    v.to_le_bytes()
}

pub(crate) fn bytes_to_u128(v: [u8; 16]) -> u128 {
    u128::from_le_bytes(v)
}

macro_rules! lane_helpers {
    ($to:ident, $from:ident, $lane:ty, $n:expr, $w:expr) => {
        pub(crate) fn $to(v: u128) -> [$lane; $n] {
            let bytes = u128_to_bytes(v);
            let mut out = [0; $n];
            for (i, chunk) in bytes.chunks_exact($w).enumerate() {
                let mut lane = [0u8; $w];
                lane.copy_from_slice(chunk);
                out[i] = <$lane>::from_le_bytes(lane);
            }
            out
        }

        pub(crate) fn $from(v: [$lane; $n]) -> u128 {
            let mut bytes = [0u8; 16];
            for (i, lane) in v.iter().copied().enumerate() {
                bytes[i * $w..(i + 1) * $w].copy_from_slice(&lane.to_le_bytes());
            }
            bytes_to_u128(bytes)
        }
    };
}

lane_helpers!(u128_to_u16x8, u16x8_to_u128, u16, 8, 2);
lane_helpers!(u128_to_u32x4, u32x4_to_u128, u32, 4, 4);
lane_helpers!(u128_to_u64x2, u64x2_to_u128, u64, 2, 8);

pub(crate) fn u64_to_bytes(v: u64) -> [u8; 8] {
    v.to_le_bytes()
}

pub(crate) fn bytes_to_u64(v: [u8; 8]) -> u64 {
    u64::from_le_bytes(v)
}

pub(crate) fn u64_to_u16x4(v: u64) -> [u16; 4] {
    let bytes = v.to_le_bytes();
    let mut out = [0u16; 4];
    for (i, chunk) in bytes.chunks_exact(2).enumerate() {
        out[i] = u16::from_le_bytes([chunk[0], chunk[1]]);
    }
    out
}

pub(crate) fn u16x4_to_u64(v: [u16; 4]) -> u64 {
    let mut bytes = [0u8; 8];
    for (i, lane) in v.iter().copied().enumerate() {
        bytes[i * 2..i * 2 + 2].copy_from_slice(&lane.to_le_bytes());
    }
    u64::from_le_bytes(bytes)
}

pub(crate) fn u64_to_u32x2(v: u64) -> [u32; 2] {
    [v as u32, (v >> 32) as u32]
}

pub(crate) fn u32x2_to_u64(v: [u32; 2]) -> u64 {
    v[0] as u64 | (v[1] as u64) << 32
}
