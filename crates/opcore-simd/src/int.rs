//! Packed-integer arithmetic, saturation, comparisons, logic, shifts and
//! the cross-lane multiply/accumulate family. Each operation exists for
//! the 128-bit format and, where the 64-bit register file has it, as the
//! `_mmx` twin.

use crate::{
    bytes_to_u128, bytes_to_u64, u128_to_bytes, u128_to_u16x8, u128_to_u32x4, u128_to_u64x2,
    u16x4_to_u64, u16x8_to_u128, u32x2_to_u64, u32x4_to_u128, u64_to_bytes, u64_to_u16x4,
    u64_to_u32x2, u64x2_to_u128,
};

pub(crate) fn sat_i8(v: i32) -> u8 {
    v.clamp(i8::MIN as i32, i8::MAX as i32) as i8 as u8
}

pub(crate) fn sat_u8(v: i32) -> u8 {
    v.clamp(0, u8::MAX as i32) as u8
}

pub(crate) fn sat_i16(v: i32) -> u16 {
    v.clamp(i16::MIN as i32, i16::MAX as i32) as i16 as u16
}

pub(crate) fn sat_u16(v: i32) -> u16 {
    v.clamp(0, u16::MAX as i32) as u16
}

macro_rules! binop_u8 {
    ($($(#[$m:meta])* $name:ident, $name_mmx:ident, |$x:ident, $y:ident| $e:expr;)*) => {
        $(
            $(#[$m])*
            pub fn $name(dst: &mut u128, src: u128) {
                let mut a = u128_to_bytes(*dst);
                let b = u128_to_bytes(src);
                for (av, bv) in a.iter_mut().zip(b) {
                    let ($x, $y) = (*av, bv);
                    *av = $e;
                }
                *dst = bytes_to_u128(a);
            }

            pub fn $name_mmx(dst: &mut u64, src: u64) {
                let mut a = u64_to_bytes(*dst);
                let b = u64_to_bytes(src);
                for (av, bv) in a.iter_mut().zip(b) {
                    let ($x, $y) = (*av, bv);
                    *av = $e;
                }
                *dst = bytes_to_u64(a);
            }
        )*
    };
}

macro_rules! binop_u16 {
    ($($(#[$m:meta])* $name:ident, $name_mmx:ident, |$x:ident, $y:ident| $e:expr;)*) => {
        $(
            $(#[$m])*
            pub fn $name(dst: &mut u128, src: u128) {
                let mut a = u128_to_u16x8(*dst);
                let b = u128_to_u16x8(src);
                for (av, bv) in a.iter_mut().zip(b) {
                    let ($x, $y) = (*av, bv);
                    *av = $e;
                }
                *dst = u16x8_to_u128(a);
            }

            pub fn $name_mmx(dst: &mut u64, src: u64) {
                let mut a = u64_to_u16x4(*dst);
                let b = u64_to_u16x4(src);
                for (av, bv) in a.iter_mut().zip(b) {
                    let ($x, $y) = (*av, bv);
                    *av = $e;
                }
                *dst = u16x4_to_u64(a);
            }
        )*
    };
}

macro_rules! binop_u32 {
    ($($(#[$m:meta])* $name:ident, $name_mmx:ident, |$x:ident, $y:ident| $e:expr;)*) => {
        $(
            $(#[$m])*
            pub fn $name(dst: &mut u128, src: u128) {
                let mut a = u128_to_u32x4(*dst);
                let b = u128_to_u32x4(src);
                for (av, bv) in a.iter_mut().zip(b) {
                    let ($x, $y) = (*av, bv);
                    *av = $e;
                }
                *dst = u32x4_to_u128(a);
            }

            pub fn $name_mmx(dst: &mut u64, src: u64) {
                let mut a = u64_to_u32x2(*dst);
                let b = u64_to_u32x2(src);
                for (av, bv) in a.iter_mut().zip(b) {
                    let ($x, $y) = (*av, bv);
                    *av = $e;
                }
                *dst = u32x2_to_u64(a);
            }
        )*
    };
}

binop_u8! {
    paddb, paddb_mmx, |x, y| x.wrapping_add(y);
    psubb, psubb_mmx, |x, y| x.wrapping_sub(y);
    /// Signed saturating add.
    paddsb, paddsb_mmx, |x, y| sat_i8(x as i8 as i32 + y as i8 as i32);
    psubsb, psubsb_mmx, |x, y| sat_i8(x as i8 as i32 - y as i8 as i32);
    /// Unsigned saturating add.
    paddusb, paddusb_mmx, |x, y| sat_u8(x as i32 + y as i32);
    psubusb, psubusb_mmx, |x, y| sat_u8(x as i32 - y as i32);
    /// Rounded unsigned average: `(x + y + 1) >> 1`.
    pavgb, pavgb_mmx, |x, y| ((x as u16 + y as u16 + 1) >> 1) as u8;
    pminub, pminub_mmx, |x, y| x.min(y);
    pmaxub, pmaxub_mmx, |x, y| x.max(y);
    pminsb, pminsb_mmx, |x, y| (x as i8).min(y as i8) as u8;
    pmaxsb, pmaxsb_mmx, |x, y| (x as i8).max(y as i8) as u8;
    pcmpeqb, pcmpeqb_mmx, |x, y| if x == y { 0xFF } else { 0 };
    pcmpgtb, pcmpgtb_mmx, |x, y| if (x as i8) > (y as i8) { 0xFF } else { 0 };
    /// Per-lane sign transfer: negate, keep, or zero.
    psignb, psignb_mmx, |x, y| match (y as i8).signum() {
        -1 => (x as i8).wrapping_neg() as u8,
        0 => 0,
        _ => x,
    };
}

binop_u16! {
    paddw, paddw_mmx, |x, y| x.wrapping_add(y);
    psubw, psubw_mmx, |x, y| x.wrapping_sub(y);
    paddsw, paddsw_mmx, |x, y| sat_i16(x as i16 as i32 + y as i16 as i32);
    psubsw, psubsw_mmx, |x, y| sat_i16(x as i16 as i32 - y as i16 as i32);
    paddusw, paddusw_mmx, |x, y| sat_u16(x as i32 + y as i32);
    psubusw, psubusw_mmx, |x, y| sat_u16(x as i32 - y as i32);
    pavgw, pavgw_mmx, |x, y| ((x as u32 + y as u32 + 1) >> 1) as u16;
    pminsw, pminsw_mmx, |x, y| (x as i16).min(y as i16) as u16;
    pmaxsw, pmaxsw_mmx, |x, y| (x as i16).max(y as i16) as u16;
    pminuw, pminuw_mmx, |x, y| x.min(y);
    pmaxuw, pmaxuw_mmx, |x, y| x.max(y);
    /// Low 16 bits of the product.
    pmullw, pmullw_mmx, |x, y| (x as i16 as i32).wrapping_mul(y as i16 as i32) as u16;
    /// High 16 bits of the signed product.
    pmulhw, pmulhw_mmx, |x, y| ((x as i16 as i32 * y as i16 as i32) >> 16) as u16;
    /// High 16 bits of the unsigned product.
    pmulhuw, pmulhuw_mmx, |x, y| ((x as u32 * y as u32) >> 16) as u16;
    /// Rounded scaled signed multiply: bits 30..15 of the product plus
    /// the rounding constant.
    pmulhrsw, pmulhrsw_mmx, |x, y| {
        (((x as i16 as i32 * y as i16 as i32 >> 14) + 1) >> 1) as u16
    };
    pcmpeqw, pcmpeqw_mmx, |x, y| if x == y { 0xFFFF } else { 0 };
    pcmpgtw, pcmpgtw_mmx, |x, y| if (x as i16) > (y as i16) { 0xFFFF } else { 0 };
    psignw, psignw_mmx, |x, y| match (y as i16).signum() {
        -1 => (x as i16).wrapping_neg() as u16,
        0 => 0,
        _ => x,
    };
}

binop_u32! {
    paddd, paddd_mmx, |x, y| x.wrapping_add(y);
    psubd, psubd_mmx, |x, y| x.wrapping_sub(y);
    pminsd, pminsd_mmx, |x, y| (x as i32).min(y as i32) as u32;
    pmaxsd, pmaxsd_mmx, |x, y| (x as i32).max(y as i32) as u32;
    pminud, pminud_mmx, |x, y| x.min(y);
    pmaxud, pmaxud_mmx, |x, y| x.max(y);
    pmulld, pmulld_mmx, |x, y| x.wrapping_mul(y);
    pcmpeqd, pcmpeqd_mmx, |x, y| if x == y { 0xFFFF_FFFF } else { 0 };
    pcmpgtd, pcmpgtd_mmx, |x, y| if (x as i32) > (y as i32) { 0xFFFF_FFFF } else { 0 };
    psignd, psignd_mmx, |x, y| match (y as i32).signum() {
        -1 => (x as i32).wrapping_neg() as u32,
        0 => 0,
        _ => x,
    };
}

pub fn paddq(dst: &mut u128, src: u128) {
    let mut a = u128_to_u64x2(*dst);
    let b = u128_to_u64x2(src);
    for (av, bv) in a.iter_mut().zip(b) {
        *av = av.wrapping_add(bv);
    }
    *dst = u64x2_to_u128(a);
}

pub fn paddq_mmx(dst: &mut u64, src: u64) {
    *dst = dst.wrapping_add(src);
}

pub fn psubq(dst: &mut u128, src: u128) {
    let mut a = u128_to_u64x2(*dst);
    let b = u128_to_u64x2(src);
    for (av, bv) in a.iter_mut().zip(b) {
        *av = av.wrapping_sub(bv);
    }
    *dst = u64x2_to_u128(a);
}

pub fn psubq_mmx(dst: &mut u64, src: u64) {
    *dst = dst.wrapping_sub(src);
}

pub fn pcmpeqq(dst: &mut u128, src: u128) {
    let mut a = u128_to_u64x2(*dst);
    let b = u128_to_u64x2(src);
    for (av, bv) in a.iter_mut().zip(b) {
        *av = if *av == bv { u64::MAX } else { 0 };
    }
    *dst = u64x2_to_u128(a);
}

pub fn pcmpgtq(dst: &mut u128, src: u128) {
    let mut a = u128_to_u64x2(*dst);
    let b = u128_to_u64x2(src);
    for (av, bv) in a.iter_mut().zip(b) {
        *av = if (*av as i64) > (bv as i64) { u64::MAX } else { 0 };
    }
    *dst = u64x2_to_u128(a);
}

macro_rules! unop_lanes {
    ($($(#[$m:meta])* $name:ident, $name_mmx:ident, $to:ident, $from:ident,
       $to64:ident, $from64:ident, |$x:ident| $e:expr;)*) => {
        $(
            $(#[$m])*
            pub fn $name(dst: &mut u128, src: u128) {
                let mut a = $to(src);
                for $x in a.iter_mut() {
                    *$x = { let $x = *$x; $e };
                }
                *dst = $from(a);
            }

            pub fn $name_mmx(dst: &mut u64, src: u64) {
                let mut a = $to64(src);
                for $x in a.iter_mut() {
                    *$x = { let $x = *$x; $e };
                }
                *dst = $from64(a);
            }
        )*
    };
}

unop_lanes! {
    /// Absolute value; the most negative lane wraps to itself.
    pabsb, pabsb_mmx, u128_to_bytes, bytes_to_u128, u64_to_bytes, bytes_to_u64,
        |x| (x as i8).wrapping_abs() as u8;
    pabsw, pabsw_mmx, u128_to_u16x8, u16x8_to_u128, u64_to_u16x4, u16x4_to_u64,
        |x| (x as i16).wrapping_abs() as u16;
    pabsd, pabsd_mmx, u128_to_u32x4, u32x4_to_u128, u64_to_u32x2, u32x2_to_u64,
        |x| (x as i32).wrapping_abs() as u32;
}

// --- cross-lane multiply/accumulate -----------------------------------------

/// PMADDWD: dot product of signed 16-bit pairs into 32-bit lanes.
pub fn pmaddwd(dst: &mut u128, src: u128) {
    let a = u128_to_u16x8(*dst);
    let b = u128_to_u16x8(src);
    let mut out = [0u32; 4];
    for i in 0..4 {
        let lo = a[2 * i] as i16 as i32 * b[2 * i] as i16 as i32;
        let hi = a[2 * i + 1] as i16 as i32 * b[2 * i + 1] as i16 as i32;
        out[i] = lo.wrapping_add(hi) as u32;
    }
    *dst = u32x4_to_u128(out);
}

pub fn pmaddwd_mmx(dst: &mut u64, src: u64) {
    let a = u64_to_u16x4(*dst);
    let b = u64_to_u16x4(src);
    let mut out = [0u32; 2];
    for i in 0..2 {
        let lo = a[2 * i] as i16 as i32 * b[2 * i] as i16 as i32;
        let hi = a[2 * i + 1] as i16 as i32 * b[2 * i + 1] as i16 as i32;
        out[i] = lo.wrapping_add(hi) as u32;
    }
    *dst = u32x2_to_u64(out);
}

/// PMADDUBSW: unsigned-by-signed byte products, pairwise added with
/// signed saturation.
pub fn pmaddubsw(dst: &mut u128, src: u128) {
    let a = u128_to_bytes(*dst);
    let b = u128_to_bytes(src);
    let mut out = [0u16; 8];
    for i in 0..8 {
        let lo = a[2 * i] as i32 * (b[2 * i] as i8 as i32);
        let hi = a[2 * i + 1] as i32 * (b[2 * i + 1] as i8 as i32);
        out[i] = sat_i16(lo + hi);
    }
    *dst = u16x8_to_u128(out);
}

pub fn pmaddubsw_mmx(dst: &mut u64, src: u64) {
    let a = u64_to_bytes(*dst);
    let b = u64_to_bytes(src);
    let mut out = [0u16; 4];
    for i in 0..4 {
        let lo = a[2 * i] as i32 * (b[2 * i] as i8 as i32);
        let hi = a[2 * i + 1] as i32 * (b[2 * i + 1] as i8 as i32);
        out[i] = sat_i16(lo + hi);
    }
    *dst = u16x4_to_u64(out);
}

/// PMULUDQ: even 32-bit lanes multiplied into 64-bit products.
pub fn pmuludq(dst: &mut u128, src: u128) {
    let a = u128_to_u32x4(*dst);
    let b = u128_to_u32x4(src);
    *dst = u64x2_to_u128([
        a[0] as u64 * b[0] as u64,
        a[2] as u64 * b[2] as u64,
    ]);
}

pub fn pmuludq_mmx(dst: &mut u64, src: u64) {
    *dst = (*dst as u32) as u64 * (src as u32) as u64;
}

/// PMULDQ: signed variant over even lanes.
pub fn pmuldq(dst: &mut u128, src: u128) {
    let a = u128_to_u32x4(*dst);
    let b = u128_to_u32x4(src);
    *dst = u64x2_to_u128([
        (a[0] as i32 as i64 * b[0] as i32 as i64) as u64,
        (a[2] as i32 as i64 * b[2] as i32 as i64) as u64,
    ]);
}

/// PSADBW: sums of absolute byte differences per 8-byte half, widened
/// into the 64-bit lanes.
pub fn psadbw(dst: &mut u128, src: u128) {
    let a = u128_to_bytes(*dst);
    let b = u128_to_bytes(src);
    let mut out = [0u64; 2];
    for half in 0..2 {
        let mut sum = 0u64;
        for i in 0..8 {
            let idx = half * 8 + i;
            sum += (a[idx] as i16 - b[idx] as i16).unsigned_abs() as u64;
        }
        out[half] = sum;
    }
    *dst = u64x2_to_u128(out);
}

pub fn psadbw_mmx(dst: &mut u64, src: u64) {
    let a = u64_to_bytes(*dst);
    let b = u64_to_bytes(src);
    let mut sum = 0u64;
    for i in 0..8 {
        sum += (a[i] as i16 - b[i] as i16).unsigned_abs() as u64;
    }
    *dst = sum;
}

// --- horizontal adds/subs ----------------------------------------------------

macro_rules! horizontal_u16 {
    ($($(#[$m:meta])* $name:ident, $name_mmx:ident, |$x:ident, $y:ident| $e:expr;)*) => {
        $(
            $(#[$m])*
            pub fn $name(dst: &mut u128, src: u128) {
                let a = u128_to_u16x8(*dst);
                let b = u128_to_u16x8(src);
                let mut out = [0u16; 8];
                for i in 0..4 {
                    let ($x, $y) = (a[2 * i], a[2 * i + 1]);
                    out[i] = $e;
                }
                for i in 0..4 {
                    let ($x, $y) = (b[2 * i], b[2 * i + 1]);
                    out[4 + i] = $e;
                }
                *dst = u16x8_to_u128(out);
            }

            pub fn $name_mmx(dst: &mut u64, src: u64) {
                let a = u64_to_u16x4(*dst);
                let b = u64_to_u16x4(src);
                let mut out = [0u16; 4];
                for i in 0..2 {
                    let ($x, $y) = (a[2 * i], a[2 * i + 1]);
                    out[i] = $e;
                }
                for i in 0..2 {
                    let ($x, $y) = (b[2 * i], b[2 * i + 1]);
                    out[2 + i] = $e;
                }
                *dst = u16x4_to_u64(out);
            }
        )*
    };
}

horizontal_u16! {
    /// PHADDW: adjacent-pair add, destination pairs then source pairs.
    phaddw, phaddw_mmx, |x, y| x.wrapping_add(y);
    phsubw, phsubw_mmx, |x, y| x.wrapping_sub(y);
    phaddsw, phaddsw_mmx, |x, y| sat_i16(x as i16 as i32 + y as i16 as i32);
    phsubsw, phsubsw_mmx, |x, y| sat_i16(x as i16 as i32 - y as i16 as i32);
}

pub fn phaddd(dst: &mut u128, src: u128) {
    let a = u128_to_u32x4(*dst);
    let b = u128_to_u32x4(src);
    *dst = u32x4_to_u128([
        a[0].wrapping_add(a[1]),
        a[2].wrapping_add(a[3]),
        b[0].wrapping_add(b[1]),
        b[2].wrapping_add(b[3]),
    ]);
}

pub fn phsubd(dst: &mut u128, src: u128) {
    let a = u128_to_u32x4(*dst);
    let b = u128_to_u32x4(src);
    *dst = u32x4_to_u128([
        a[0].wrapping_sub(a[1]),
        a[2].wrapping_sub(a[3]),
        b[0].wrapping_sub(b[1]),
        b[2].wrapping_sub(b[3]),
    ]);
}

// --- logic -------------------------------------------------------------------

pub fn pand(dst: &mut u128, src: u128) {
    *dst &= src;
}

pub fn pandn(dst: &mut u128, src: u128) {
    *dst = !*dst & src;
}

pub fn por(dst: &mut u128, src: u128) {
    *dst |= src;
}

pub fn pxor(dst: &mut u128, src: u128) {
    *dst ^= src;
}

pub fn pand_mmx(dst: &mut u64, src: u64) {
    *dst &= src;
}

pub fn pandn_mmx(dst: &mut u64, src: u64) {
    *dst = !*dst & src;
}

pub fn por_mmx(dst: &mut u64, src: u64) {
    *dst |= src;
}

pub fn pxor_mmx(dst: &mut u64, src: u64) {
    *dst ^= src;
}

// --- shifts ------------------------------------------------------------------
// The count is the low 64 bits of the count register; anything at or
// past the lane width empties the lane (sign-fills for the arithmetic
// forms).

macro_rules! shift_lanes {
    ($($(#[$m:meta])* $name:ident, $name_mmx:ident, $to:ident, $from:ident,
       $to64:ident, $from64:ident, $lane:ty, $wide:expr, |$x:ident, $c:ident| $e:expr;)*) => {
        $(
            $(#[$m])*
            pub fn $name(dst: &mut u128, count: u64) {
                let $c = count.min($wide);
                let mut a = $to(*dst);
                for lane in a.iter_mut() {
                    let $x = *lane;
                    *lane = $e;
                }
                *dst = $from(a);
            }

            pub fn $name_mmx(dst: &mut u64, count: u64) {
                let $c = count.min($wide);
                let mut a = $to64(*dst);
                for lane in a.iter_mut() {
                    let $x = *lane;
                    *lane = $e;
                }
                *dst = $from64(a);
            }
        )*
    };
}

shift_lanes! {
    psllw, psllw_mmx, u128_to_u16x8, u16x8_to_u128, u64_to_u16x4, u16x4_to_u64, u16, 16,
        |x, c| if c >= 16 { 0 } else { x << c };
    psrlw, psrlw_mmx, u128_to_u16x8, u16x8_to_u128, u64_to_u16x4, u16x4_to_u64, u16, 16,
        |x, c| if c >= 16 { 0 } else { x >> c };
    /// Arithmetic right shift saturates the count at width-1.
    psraw, psraw_mmx, u128_to_u16x8, u16x8_to_u128, u64_to_u16x4, u16x4_to_u64, u16, 15,
        |x, c| ((x as i16) >> c) as u16;
    pslld, pslld_mmx, u128_to_u32x4, u32x4_to_u128, u64_to_u32x2, u32x2_to_u64, u32, 32,
        |x, c| if c >= 32 { 0 } else { x << c };
    psrld, psrld_mmx, u128_to_u32x4, u32x4_to_u128, u64_to_u32x2, u32x2_to_u64, u32, 32,
        |x, c| if c >= 32 { 0 } else { x >> c };
    psrad, psrad_mmx, u128_to_u32x4, u32x4_to_u128, u64_to_u32x2, u32x2_to_u64, u32, 31,
        |x, c| ((x as i32) >> c) as u32;
}

pub fn psllq(dst: &mut u128, count: u64) {
    let mut a = u128_to_u64x2(*dst);
    for lane in a.iter_mut() {
        *lane = if count >= 64 { 0 } else { *lane << count };
    }
    *dst = u64x2_to_u128(a);
}

pub fn psrlq(dst: &mut u128, count: u64) {
    let mut a = u128_to_u64x2(*dst);
    for lane in a.iter_mut() {
        *lane = if count >= 64 { 0 } else { *lane >> count };
    }
    *dst = u64x2_to_u128(a);
}

pub fn psllq_mmx(dst: &mut u64, count: u64) {
    *dst = if count >= 64 { 0 } else { *dst << count };
}

pub fn psrlq_mmx(dst: &mut u64, count: u64) {
    *dst = if count >= 64 { 0 } else { *dst >> count };
}

/// PSLLDQ: whole-register byte shift, immediate count.
pub fn pslldq(dst: &mut u128, imm: u8) {
    *dst = if imm >= 16 { 0 } else { *dst << (imm as u32 * 8) };
}

/// PSRLDQ: whole-register byte shift right.
pub fn psrldq(dst: &mut u128, imm: u8) {
    *dst = if imm >= 16 { 0 } else { *dst >> (imm as u32 * 8) };
}

/// PMOVMSKB: gather the byte sign bits.
pub fn pmovmskb(src: u128) -> u32 {
    let bytes = u128_to_bytes(src);
    let mut mask = 0u32;
    for (i, b) in bytes.iter().enumerate() {
        mask |= ((b >> 7) as u32) << i;
    }
    mask
}

pub fn pmovmskb_mmx(src: u64) -> u32 {
    let bytes = u64_to_bytes(src);
    let mut mask = 0u32;
    for (i, b) in bytes.iter().enumerate() {
        mask |= ((b >> 7) as u32) << i;
    }
    mask
}
