//! Multiply and divide.
//!
//! The widening forms use the accumulator conventions of the instruction
//! set: the 8-bit multiply widens into a single 16-bit accumulator, wider
//! forms split the product across a low and a high register. CF/OF report
//! whether the high half carries significant bits; the remaining four
//! status flags are implementation-defined and get distinct Intel and AMD
//! bodies. Divides either succeed or report a [`DivideError`] with the
//! destinations and flags untouched.

use opcore_flags::{self as flags, Eflags};
use thiserror::Error;

/// A divide fault. Maps to the #DE exception: raised for a zero divisor
/// and for a quotient that does not fit the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DivideError {
    #[error("division by zero")]
    DivideByZero,
    #[error("quotient overflows destination")]
    Overflow,
}

fn mul_flags_intel(efl: &mut Eflags, lo: u64, high_significant: bool, bits: u32) {
    let mut f = flags::result_flags(lo, bits);
    f.set(Eflags::CF, high_significant);
    f.set(Eflags::OF, high_significant);
    f.remove(Eflags::AF);
    flags::apply(efl, Eflags::STATUS, f);
}

fn mul_flags_amd(efl: &mut Eflags, high_significant: bool) {
    let mut f = Eflags::empty();
    f.set(Eflags::CF, high_significant);
    f.set(Eflags::OF, high_significant);
    flags::apply(efl, Eflags::STATUS, f);
}

// --- widening unsigned multiply ---------------------------------------------

macro_rules! impl_mul_wide {
    ($t:ty, $wide:ty, $bits:expr, $intel:ident, $amd:ident, $alias:ident) => {
        pub fn $intel(lo: &mut $t, hi: &mut $t, src: $t, efl: &mut Eflags) {
            let product = *lo as $wide * src as $wide;
            let plo = product as $t;
            let phi = (product >> $bits) as $t;
            mul_flags_intel(efl, plo as u64, phi != 0, $bits);
            *lo = plo;
            *hi = phi;
        }

        pub fn $amd(lo: &mut $t, hi: &mut $t, src: $t, efl: &mut Eflags) {
            let product = *lo as $wide * src as $wide;
            let plo = product as $t;
            let phi = (product >> $bits) as $t;
            mul_flags_amd(efl, phi != 0);
            *lo = plo;
            *hi = phi;
        }

        pub fn $alias(lo: &mut $t, hi: &mut $t, src: $t, efl: &mut Eflags) {
            $intel(lo, hi, src, efl)
        }
    };
}

/// MUL r/m8: AL * src widens into AX.
pub fn mul_u8_intel(ax: &mut u16, src: u8, efl: &mut Eflags) {
    let product = (*ax as u8 as u16) * src as u16;
    mul_flags_intel(efl, product as u8 as u64, product >> 8 != 0, 8);
    *ax = product;
}

pub fn mul_u8_amd(ax: &mut u16, src: u8, efl: &mut Eflags) {
    let product = (*ax as u8 as u16) * src as u16;
    mul_flags_amd(efl, product >> 8 != 0);
    *ax = product;
}

pub fn mul_u8(ax: &mut u16, src: u8, efl: &mut Eflags) {
    mul_u8_intel(ax, src, efl)
}

impl_mul_wide!(u16, u32, 16, mul_u16_intel, mul_u16_amd, mul_u16);
impl_mul_wide!(u32, u64, 32, mul_u32_intel, mul_u32_amd, mul_u32);
impl_mul_wide!(u64, u128, 64, mul_u64_intel, mul_u64_amd, mul_u64);

// --- widening signed multiply -----------------------------------------------

macro_rules! impl_imul_wide {
    ($t:ty, $s:ty, $swide:ty, $bits:expr, $intel:ident, $amd:ident, $alias:ident) => {
        pub fn $intel(lo: &mut $t, hi: &mut $t, src: $t, efl: &mut Eflags) {
            let product = *lo as $s as $swide * (src as $s as $swide);
            let plo = product as $t;
            let phi = (product >> $bits) as $t;
            // High half significant unless it is pure sign extension.
            let overflow = product != plo as $s as $swide;
            mul_flags_intel(efl, plo as u64, overflow, $bits);
            *lo = plo;
            *hi = phi;
        }

        pub fn $amd(lo: &mut $t, hi: &mut $t, src: $t, efl: &mut Eflags) {
            let product = *lo as $s as $swide * (src as $s as $swide);
            let plo = product as $t;
            let phi = (product >> $bits) as $t;
            let overflow = product != plo as $s as $swide;
            mul_flags_amd(efl, overflow);
            *lo = plo;
            *hi = phi;
        }

        pub fn $alias(lo: &mut $t, hi: &mut $t, src: $t, efl: &mut Eflags) {
            $intel(lo, hi, src, efl)
        }
    };
}

/// IMUL r/m8: AL * src widens into AX.
pub fn imul_u8_intel(ax: &mut u16, src: u8, efl: &mut Eflags) {
    let product = (*ax as u8 as i8 as i16) * (src as i8 as i16);
    let overflow = product != product as i8 as i16;
    mul_flags_intel(efl, product as u8 as u64, overflow, 8);
    *ax = product as u16;
}

pub fn imul_u8_amd(ax: &mut u16, src: u8, efl: &mut Eflags) {
    let product = (*ax as u8 as i8 as i16) * (src as i8 as i16);
    let overflow = product != product as i8 as i16;
    mul_flags_amd(efl, overflow);
    *ax = product as u16;
}

pub fn imul_u8(ax: &mut u16, src: u8, efl: &mut Eflags) {
    imul_u8_intel(ax, src, efl)
}

impl_imul_wide!(u16, i16, i32, 16, imul_u16_intel, imul_u16_amd, imul_u16);
impl_imul_wide!(u32, i32, i64, 32, imul_u32_intel, imul_u32_amd, imul_u32);
impl_imul_wide!(u64, i64, i128, 64, imul_u64_intel, imul_u64_amd, imul_u64);

// --- truncating signed multiply (two- and three-operand IMUL) ---------------

macro_rules! impl_imul_trunc {
    ($t:ty, $s:ty, $swide:ty, $bits:expr, $intel:ident, $amd:ident, $alias:ident) => {
        pub fn $intel(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let product = *dst as $s as $swide * (src as $s as $swide);
            let truncated = product as $t;
            let overflow = product != truncated as $s as $swide;
            mul_flags_intel(efl, truncated as u64, overflow, $bits);
            *dst = truncated;
        }

        pub fn $amd(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let product = *dst as $s as $swide * (src as $s as $swide);
            let truncated = product as $t;
            let overflow = product != truncated as $s as $swide;
            mul_flags_amd(efl, overflow);
            *dst = truncated;
        }

        pub fn $alias(dst: &mut $t, src: $t, efl: &mut Eflags) {
            $intel(dst, src, efl)
        }
    };
}

impl_imul_trunc!(u16, i16, i32, 16, imul_two_u16_intel, imul_two_u16_amd, imul_two_u16);
impl_imul_trunc!(u32, i32, i64, 32, imul_two_u32_intel, imul_two_u32_amd, imul_two_u32);
impl_imul_trunc!(u64, i64, i128, 64, imul_two_u64_intel, imul_two_u64_amd, imul_two_u64);

/// MULX: flagless widening unsigned multiply.
pub fn mulx_u32(lo: &mut u32, hi: &mut u32, a: u32, b: u32) {
    let product = a as u64 * b as u64;
    *lo = product as u32;
    *hi = (product >> 32) as u32;
}

pub fn mulx_u64(lo: &mut u64, hi: &mut u64, a: u64, b: u64) {
    let product = a as u128 * b as u128;
    *lo = product as u64;
    *hi = (product >> 64) as u64;
}

// --- divide ------------------------------------------------------------------

fn div_flags_intel(efl: &mut Eflags) {
    flags::apply(efl, Eflags::STATUS, Eflags::empty());
}

macro_rules! impl_div {
    ($t:ty, $wide:ty, $bits:expr, $intel:ident, $amd:ident, $alias:ident) => {
        /// Unsigned divide of the `hi:lo` double-width value. On success the
        /// quotient lands in `lo` and the remainder in `hi`.
        pub fn $intel(
            lo: &mut $t,
            hi: &mut $t,
            divisor: $t,
            efl: &mut Eflags,
        ) -> Result<(), DivideError> {
            if divisor == 0 {
                return Err(DivideError::DivideByZero);
            }
            let dividend = (*hi as $wide) << $bits | *lo as $wide;
            let quotient = dividend / divisor as $wide;
            if quotient > <$t>::MAX as $wide {
                return Err(DivideError::Overflow);
            }
            *lo = quotient as $t;
            *hi = (dividend % divisor as $wide) as $t;
            div_flags_intel(efl);
            Ok(())
        }

        pub fn $amd(
            lo: &mut $t,
            hi: &mut $t,
            divisor: $t,
            efl: &mut Eflags,
        ) -> Result<(), DivideError> {
            if divisor == 0 {
                return Err(DivideError::DivideByZero);
            }
            let dividend = (*hi as $wide) << $bits | *lo as $wide;
            let quotient = dividend / divisor as $wide;
            if quotient > <$t>::MAX as $wide {
                return Err(DivideError::Overflow);
            }
            *lo = quotient as $t;
            *hi = (dividend % divisor as $wide) as $t;
            let _ = efl; // flags preserved
            Ok(())
        }

        pub fn $alias(
            lo: &mut $t,
            hi: &mut $t,
            divisor: $t,
            efl: &mut Eflags,
        ) -> Result<(), DivideError> {
            $intel(lo, hi, divisor, efl)
        }
    };
}

/// DIV r/m8: AX / src, quotient in AL, remainder in AH.
pub fn div_u8_intel(ax: &mut u16, divisor: u8, efl: &mut Eflags) -> Result<(), DivideError> {
    if divisor == 0 {
        return Err(DivideError::DivideByZero);
    }
    let quotient = *ax / divisor as u16;
    if quotient > u8::MAX as u16 {
        return Err(DivideError::Overflow);
    }
    let remainder = *ax % divisor as u16;
    *ax = remainder << 8 | quotient;
    div_flags_intel(efl);
    Ok(())
}

pub fn div_u8_amd(ax: &mut u16, divisor: u8, efl: &mut Eflags) -> Result<(), DivideError> {
    if divisor == 0 {
        return Err(DivideError::DivideByZero);
    }
    let quotient = *ax / divisor as u16;
    if quotient > u8::MAX as u16 {
        return Err(DivideError::Overflow);
    }
    let remainder = *ax % divisor as u16;
    *ax = remainder << 8 | quotient;
    let _ = efl;
    Ok(())
}

pub fn div_u8(ax: &mut u16, divisor: u8, efl: &mut Eflags) -> Result<(), DivideError> {
    div_u8_intel(ax, divisor, efl)
}

impl_div!(u16, u32, 16, div_u16_intel, div_u16_amd, div_u16);
impl_div!(u32, u64, 32, div_u32_intel, div_u32_amd, div_u32);
impl_div!(u64, u128, 64, div_u64_intel, div_u64_amd, div_u64);

// Signed division works on unsigned magnitudes so the most-negative
// double-width dividend needs no special case. The quotient-range check is
// symmetric: magnitudes above 2^(w-1)-1 fault for either sign, so
// e.g. +0x8000 / -1 faults rather than producing the unrepresentable
// -(-0x8000).
macro_rules! impl_idiv {
    ($t:ty, $s:ty, $wide:ty, $bits:expr, $intel:ident, $amd:ident, $alias:ident) => {
        /// Signed divide of the `hi:lo` double-width value. Quotient
        /// truncates toward zero; the remainder takes the dividend's sign.
        pub fn $intel(
            lo: &mut $t,
            hi: &mut $t,
            divisor: $t,
            efl: &mut Eflags,
        ) -> Result<(), DivideError> {
            let (q, r) = idiv_core::<$bits>(
                (*hi as $wide) << $bits | *lo as $wide,
                divisor as $s as i64,
            )?;
            *lo = q as $t;
            *hi = r as $t;
            div_flags_intel(efl);
            Ok(())
        }

        pub fn $amd(
            lo: &mut $t,
            hi: &mut $t,
            divisor: $t,
            efl: &mut Eflags,
        ) -> Result<(), DivideError> {
            let (q, r) = idiv_core::<$bits>(
                (*hi as $wide) << $bits | *lo as $wide,
                divisor as $s as i64,
            )?;
            *lo = q as $t;
            *hi = r as $t;
            let _ = efl; // flags preserved
            Ok(())
        }

        pub fn $alias(
            lo: &mut $t,
            hi: &mut $t,
            divisor: $t,
            efl: &mut Eflags,
        ) -> Result<(), DivideError> {
            $intel(lo, hi, divisor, efl)
        }
    };
}

/// Shared signed-divide core over a 2*BITS-bit dividend, BITS <= 64.
/// Returns (quotient, remainder) as BITS-bit two's-complement values.
fn idiv_core<const BITS: u32>(dividend: u128, divisor: i64) -> Result<(u64, u64), DivideError> {
    if divisor == 0 {
        return Err(DivideError::DivideByZero);
    }
    let wbits = 2 * BITS;
    let neg_dividend = dividend >> (wbits - 1) & 1 != 0;
    let dividend_mag = if neg_dividend {
        dividend.wrapping_neg() & (if wbits == 128 { u128::MAX } else { (1u128 << wbits) - 1 })
    } else {
        dividend
    };
    let neg_divisor = divisor < 0;
    let divisor_mag = (divisor as u128).wrapping_neg() & u64::MAX as u128;
    let divisor_mag = if neg_divisor { divisor_mag } else { divisor as u128 };

    let q_mag = dividend_mag / divisor_mag;
    let r_mag = dividend_mag % divisor_mag;

    let limit = (1u128 << (BITS - 1)) - 1;
    if q_mag > limit {
        return Err(DivideError::Overflow);
    }
    let mask = flags::mask_for_bits(BITS) as u128;
    let q = if neg_dividend != neg_divisor {
        q_mag.wrapping_neg() & mask
    } else {
        q_mag
    };
    let r = if neg_dividend { r_mag.wrapping_neg() & mask } else { r_mag };
    Ok((q as u64, r as u64))
}

/// IDIV r/m8: AX / src, quotient in AL, remainder in AH.
pub fn idiv_u8_intel(ax: &mut u16, divisor: u8, efl: &mut Eflags) -> Result<(), DivideError> {
    let (q, r) = idiv_core::<8>(*ax as u128, divisor as i8 as i64)?;
    *ax = (r as u16) << 8 | q as u16 & 0xFF;
    div_flags_intel(efl);
    Ok(())
}

pub fn idiv_u8_amd(ax: &mut u16, divisor: u8, efl: &mut Eflags) -> Result<(), DivideError> {
    let (q, r) = idiv_core::<8>(*ax as u128, divisor as i8 as i64)?;
    *ax = (r as u16) << 8 | q as u16 & 0xFF;
    let _ = efl;
    Ok(())
}

pub fn idiv_u8(ax: &mut u16, divisor: u8, efl: &mut Eflags) -> Result<(), DivideError> {
    idiv_u8_intel(ax, divisor, efl)
}

impl_idiv!(u16, i16, u128, 16, idiv_u16_intel, idiv_u16_amd, idiv_u16);
impl_idiv!(u32, i32, u128, 32, idiv_u32_intel, idiv_u32_amd, idiv_u32);
impl_idiv!(u64, i64, u128, 64, idiv_u64_intel, idiv_u64_amd, idiv_u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_sets_carry_when_high_half_used() {
        let mut f = Eflags::empty();
        let mut lo: u32 = 0x1_0000 as u32;
        let mut hi: u32 = 0;
        mul_u32(&mut lo, &mut hi, 0x1_0000, &mut f);
        assert_eq!(lo, 0);
        assert_eq!(hi, 1);
        assert!(f.contains(Eflags::CF) && f.contains(Eflags::OF));

        mul_u32(&mut lo, &mut hi, 5, &mut f);
        assert_eq!((lo, hi), (0, 0));
        assert!(!f.contains(Eflags::CF) && !f.contains(Eflags::OF));
    }

    #[test]
    fn imul_sign_extension_is_not_overflow() {
        // -1 * 1: high half is all ones but only sign extension.
        let mut f = Eflags::empty();
        let mut lo: u32 = 0xFFFF_FFFF;
        let mut hi: u32 = 0;
        imul_u32(&mut lo, &mut hi, 1, &mut f);
        assert_eq!(lo, 0xFFFF_FFFF);
        assert_eq!(hi, 0xFFFF_FFFF);
        assert!(!f.contains(Eflags::CF) && !f.contains(Eflags::OF));
    }

    #[test]
    fn imul_min_times_minus_one_overflows() {
        let mut f = Eflags::empty();
        let mut lo: u32 = 0x8000_0000;
        let mut hi: u32 = 0;
        imul_u32(&mut lo, &mut hi, 0xFFFF_FFFF, &mut f);
        assert_eq!(lo, 0x8000_0000);
        assert_eq!(hi, 0);
        assert!(f.contains(Eflags::CF) && f.contains(Eflags::OF));
    }

    #[test]
    fn vendor_mul_low_flags_differ() {
        let mut fi = Eflags::empty();
        let (mut lo, mut hi) = (3u32, 0u32);
        mul_u32_intel(&mut lo, &mut hi, 5, &mut fi);
        assert!(fi.contains(Eflags::PF)); // 15 has four one bits
        assert!(!fi.contains(Eflags::ZF));

        let mut fa = Eflags::ZF | Eflags::SF | Eflags::PF | Eflags::AF;
        let (mut lo, mut hi) = (3u32, 0u32);
        mul_u32_amd(&mut lo, &mut hi, 5, &mut fa);
        assert!(!fa.contains(Eflags::ZF) && !fa.contains(Eflags::SF));
        assert!(!fa.contains(Eflags::PF) && !fa.contains(Eflags::AF));
    }

    #[test]
    fn imul_two_truncates() {
        let mut f = Eflags::empty();
        let mut v: u16 = 0x1234;
        imul_two_u16(&mut v, 0x1000, &mut f);
        assert_eq!(v, 0x4000); // low 16 bits of 0x123_4000
        assert!(f.contains(Eflags::CF) && f.contains(Eflags::OF));
    }

    #[test]
    fn mulx_leaves_flags_alone() {
        let (mut lo, mut hi) = (0u64, 0u64);
        mulx_u64(&mut lo, &mut hi, u64::MAX, u64::MAX);
        assert_eq!(lo, 1);
        assert_eq!(hi, u64::MAX - 1);
    }

    #[test]
    fn div_u8_packs_quotient_and_remainder() {
        let mut f = Eflags::empty();
        let mut ax: u16 = 203;
        div_u8(&mut ax, 10, &mut f).unwrap();
        assert_eq!(ax & 0xFF, 20);
        assert_eq!(ax >> 8, 3);
    }

    #[test]
    fn div_by_zero_faults_untouched() {
        let mut f = Eflags::CF | Eflags::ZF;
        let (mut lo, mut hi) = (7u32, 0u32);
        let err = div_u32(&mut lo, &mut hi, 0, &mut f).unwrap_err();
        assert_eq!(err, DivideError::DivideByZero);
        assert_eq!((lo, hi), (7, 0));
        assert_eq!(f, Eflags::CF | Eflags::ZF);
    }

    #[test]
    fn div_quotient_overflow_faults() {
        let (mut lo, mut hi) = (0u16, 1u16); // dividend 0x1_0000
        let err = div_u16(&mut lo, &mut hi, 1, &mut Eflags::empty()).unwrap_err();
        assert_eq!(err, DivideError::Overflow);
    }

    #[test]
    fn idiv_truncates_toward_zero() {
        let mut f = Eflags::empty();
        // -7 / 2 = -3 rem -1
        let (mut lo, mut hi) = (0xFFF9u16, 0xFFFFu16);
        idiv_u16(&mut lo, &mut hi, 2, &mut f).unwrap();
        assert_eq!(lo as i16, -3);
        assert_eq!(hi as i16, -1);

        // 7 / -2 = -3 rem 1
        let (mut lo, mut hi) = (7u16, 0u16);
        idiv_u16(&mut lo, &mut hi, 0xFFFE, &mut f).unwrap();
        assert_eq!(lo as i16, -3);
        assert_eq!(hi as i16, 1);
    }

    #[test]
    fn idiv_positive_quotient_out_of_range_faults() {
        // +0x8000 / -1 would be -(-0x8000): magnitude 0x8000 exceeds the
        // 16-bit signed positive range either way.
        let (mut lo, mut hi) = (0x8000u16, 0x0000u16);
        let err = idiv_u16(&mut lo, &mut hi, 0xFFFF, &mut Eflags::empty()).unwrap_err();
        assert_eq!(err, DivideError::Overflow);
        assert_eq!((lo, hi), (0x8000, 0x0000));
    }

    #[test]
    fn idiv_most_negative_dividend() {
        // -0x8000_0000 / 2 = -0x4000_0000 rem 0
        let (mut lo, mut hi) = (0x0000_0000u32, 0xFFFF_FFFFu32);
        let mut f = Eflags::empty();
        idiv_u32(&mut lo, &mut hi, 2, &mut f).unwrap();
        assert_eq!(lo as i32, -0x4000_0000);
        assert_eq!(hi, 0);
    }

    #[test]
    fn idiv_u8_packs_like_div() {
        let mut ax: u16 = (-100i16 as u16) & 0xFFFF; // AX = -100
        idiv_u8(&mut ax, 7, &mut Eflags::empty()).unwrap();
        assert_eq!((ax & 0xFF) as u8 as i8, -14);
        assert_eq!((ax >> 8) as u8 as i8, -2);
    }
}
