//! Byte and lane rearrangement: shuffles, unpacks, packs with
//! saturation, and the concatenated-shift PALIGNR. Sources are
//! snapshotted before any lane is written, so `op(x, x)` forms behave.

use crate::{
    bytes_to_u128, bytes_to_u64, u128_to_bytes, u128_to_u16x8, u128_to_u32x4, u128_to_u64x2,
    u16x4_to_u64, u16x8_to_u128, u32x4_to_u128, u64_to_bytes, u64_to_u16x4, u64x2_to_u128,
};

use crate::int::{sat_i16, sat_i8, sat_u16, sat_u8};

/// PSHUFB: per-byte table lookup; a set high bit in the selector zeroes
/// the lane.
pub fn pshufb(dst: &mut u128, src: u128) {
    let table = u128_to_bytes(*dst);
    let sel = u128_to_bytes(src);
    let mut out = [0u8; 16];
    for (o, s) in out.iter_mut().zip(sel) {
        if s & 0x80 == 0 {
            *o = table[(s & 0x0F) as usize];
        }
    }
    *dst = bytes_to_u128(out);
}

pub fn pshufb_mmx(dst: &mut u64, src: u64) {
    let table = u64_to_bytes(*dst);
    let sel = u64_to_bytes(src);
    let mut out = [0u8; 8];
    for (o, s) in out.iter_mut().zip(sel) {
        if s & 0x80 == 0 {
            *o = table[(s & 0x07) as usize];
        }
    }
    *dst = bytes_to_u64(out);
}

/// PSHUFW (MMX): 16-bit lanes selected by immediate pairs.
pub fn pshufw(dst: &mut u64, src: u64, imm: u8) {
    let lanes = u64_to_u16x4(src);
    let mut out = [0u16; 4];
    for (i, o) in out.iter_mut().enumerate() {
        *o = lanes[(imm as usize >> (2 * i)) & 3];
    }
    *dst = u16x4_to_u64(out);
}

/// PSHUFD: 32-bit lanes selected by immediate pairs.
pub fn pshufd(dst: &mut u128, src: u128, imm: u8) {
    let lanes = u128_to_u32x4(src);
    let mut out = [0u32; 4];
    for (i, o) in out.iter_mut().enumerate() {
        *o = lanes[(imm as usize >> (2 * i)) & 3];
    }
    *dst = u32x4_to_u128(out);
}

/// PSHUFLW: shuffles the low four 16-bit lanes, upper half copied.
pub fn pshuflw(dst: &mut u128, src: u128, imm: u8) {
    let lanes = u128_to_u16x8(src);
    let mut out = lanes;
    for i in 0..4 {
        out[i] = lanes[(imm as usize >> (2 * i)) & 3];
    }
    *dst = u16x8_to_u128(out);
}

/// PSHUFHW: shuffles the high four 16-bit lanes, lower half copied.
pub fn pshufhw(dst: &mut u128, src: u128, imm: u8) {
    let lanes = u128_to_u16x8(src);
    let mut out = lanes;
    for i in 0..4 {
        out[4 + i] = lanes[4 + ((imm as usize >> (2 * i)) & 3)];
    }
    *dst = u16x8_to_u128(out);
}

macro_rules! unpack {
    ($($(#[$m:meta])* $name:ident, $lane:ty, $w:expr, $half:expr;)*) => {
        $(
            $(#[$m])*
            pub fn $name(dst: &mut u128, src: u128) {
                let a = u128_to_bytes(*dst);
                let b = u128_to_bytes(src);
                let mut out = [0u8; 16];
                let base = $half * 8;
                for i in 0..(8 / $w) {
                    let from = base + i * $w;
                    let to = i * 2 * $w;
                    out[to..to + $w].copy_from_slice(&a[from..from + $w]);
                    out[to + $w..to + 2 * $w].copy_from_slice(&b[from..from + $w]);
                }
                *dst = bytes_to_u128(out);
            }
        )*
    };
}

unpack! {
    /// Interleave the low halves byte by byte.
    punpcklbw, u8, 1, 0;
    punpcklwd, u16, 2, 0;
    punpckldq, u32, 4, 0;
    punpcklqdq, u64, 8, 0;
    punpckhbw, u8, 1, 1;
    punpckhwd, u16, 2, 1;
    punpckhdq, u32, 4, 1;
    punpckhqdq, u64, 8, 1;
}

macro_rules! unpack_mmx {
    ($($name:ident, $w:expr, $half:expr;)*) => {
        $(
            pub fn $name(dst: &mut u64, src: u64) {
                let a = u64_to_bytes(*dst);
                let b = u64_to_bytes(src);
                let mut out = [0u8; 8];
                let base = $half * 4;
                for i in 0..(4 / $w) {
                    let from = base + i * $w;
                    let to = i * 2 * $w;
                    out[to..to + $w].copy_from_slice(&a[from..from + $w]);
                    out[to + $w..to + 2 * $w].copy_from_slice(&b[from..from + $w]);
                }
                *dst = bytes_to_u64(out);
            }
        )*
    };
}

unpack_mmx! {
    punpcklbw_mmx, 1, 0;
    punpcklwd_mmx, 2, 0;
    punpckldq_mmx, 4, 0;
    punpckhbw_mmx, 1, 1;
    punpckhwd_mmx, 2, 1;
    punpckhdq_mmx, 4, 1;
}

/// PACKSSWB: 16-bit lanes narrowed to bytes with signed saturation;
/// destination lanes first, then source lanes.
pub fn packsswb(dst: &mut u128, src: u128) {
    let a = u128_to_u16x8(*dst);
    let b = u128_to_u16x8(src);
    let mut out = [0u8; 16];
    for i in 0..8 {
        out[i] = sat_i8(a[i] as i16 as i32);
        out[8 + i] = sat_i8(b[i] as i16 as i32);
    }
    *dst = bytes_to_u128(out);
}

/// PACKUSWB: narrowed with unsigned saturation.
pub fn packuswb(dst: &mut u128, src: u128) {
    let a = u128_to_u16x8(*dst);
    let b = u128_to_u16x8(src);
    let mut out = [0u8; 16];
    for i in 0..8 {
        out[i] = sat_u8(a[i] as i16 as i32);
        out[8 + i] = sat_u8(b[i] as i16 as i32);
    }
    *dst = bytes_to_u128(out);
}

/// PACKSSDW: 32-bit lanes narrowed to 16 bits with signed saturation.
pub fn packssdw(dst: &mut u128, src: u128) {
    let a = u128_to_u32x4(*dst);
    let b = u128_to_u32x4(src);
    let mut out = [0u16; 8];
    for i in 0..4 {
        out[i] = sat_i16(a[i] as i32);
        out[4 + i] = sat_i16(b[i] as i32);
    }
    *dst = u16x8_to_u128(out);
}

/// PACKUSDW: 32-bit lanes narrowed to 16 bits with unsigned saturation.
pub fn packusdw(dst: &mut u128, src: u128) {
    let a = u128_to_u32x4(*dst);
    let b = u128_to_u32x4(src);
    let mut out = [0u16; 8];
    for i in 0..4 {
        out[i] = sat_u16(a[i] as i32);
        out[4 + i] = sat_u16(b[i] as i32);
    }
    *dst = u16x8_to_u128(out);
}

pub fn packsswb_mmx(dst: &mut u64, src: u64) {
    let a = u64_to_u16x4(*dst);
    let b = u64_to_u16x4(src);
    let mut out = [0u8; 8];
    for i in 0..4 {
        out[i] = sat_i8(a[i] as i16 as i32);
        out[4 + i] = sat_i8(b[i] as i16 as i32);
    }
    *dst = bytes_to_u64(out);
}

pub fn packuswb_mmx(dst: &mut u64, src: u64) {
    let a = u64_to_u16x4(*dst);
    let b = u64_to_u16x4(src);
    let mut out = [0u8; 8];
    for i in 0..4 {
        out[i] = sat_u8(a[i] as i16 as i32);
        out[4 + i] = sat_u8(b[i] as i16 as i32);
    }
    *dst = bytes_to_u64(out);
}

/// PALIGNR: right-shift the src:dst concatenation by `imm` bytes and
/// keep the low 16.
pub fn palignr(dst: &mut u128, src: u128, imm: u8) {
    if imm >= 32 {
        *dst = 0;
        return;
    }
    let a = u128_to_bytes(src);
    let b = u128_to_bytes(*dst);
    let mut out = [0u8; 16];
    for (i, o) in out.iter_mut().enumerate() {
        let idx = i + imm as usize;
        *o = if idx < 16 {
            a[idx]
        } else if idx < 32 {
            b[idx - 16]
        } else {
            0
        };
    }
    *dst = bytes_to_u128(out);
}

pub fn palignr_mmx(dst: &mut u64, src: u64, imm: u8) {
    if imm >= 16 {
        *dst = 0;
        return;
    }
    let wide = (*dst as u128) << 64 | src as u128;
    *dst = (wide >> (imm as u32 * 8)) as u64;
}

/// SHUFPS: two lanes picked from the destination, two from the source.
pub fn shufps(dst: &mut u128, src: u128, imm: u8) {
    let a = u128_to_u32x4(*dst);
    let b = u128_to_u32x4(src);
    *dst = u32x4_to_u128([
        a[(imm as usize) & 3],
        a[(imm as usize >> 2) & 3],
        b[(imm as usize >> 4) & 3],
        b[(imm as usize >> 6) & 3],
    ]);
}

/// SHUFPD: one 64-bit lane from each operand.
pub fn shufpd(dst: &mut u128, src: u128, imm: u8) {
    let a = u128_to_u64x2(*dst);
    let b = u128_to_u64x2(src);
    *dst = u64x2_to_u128([a[(imm & 1) as usize], b[((imm >> 1) & 1) as usize]]);
}
