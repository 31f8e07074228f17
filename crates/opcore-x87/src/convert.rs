//! Loads and stores between the 80-bit register format and memory
//! formats: f32/f64 scalars and signed integers.
//!
//! The 80-bit forms move raw bits and never fault. The narrower loads are
//! exact except for the NaN/denormal screening; narrower stores round and
//! can raise the full set of exceptions. Integer stores deliver the
//! integer-indefinite pattern (`1 << (w-1)`) for any masked invalid
//! conversion, whichever side the overflow was on.

use rustc_apfloat::ieee::{Double, Single};
use rustc_apfloat::{Float, FloatConvert, Round, Status};

use crate::backend::{fcw_round, from_backend, status_bits, to_backend, X87F};
use crate::classify::{self, Class};
use crate::{raise, Fp80, FSW_C1, FSW_DE, FSW_IE, FSW_PE};

/// FLD m80: raw, every encoding loads unchanged.
pub fn fld_f80(dst: &mut Fp80, src: Fp80) {
    *dst = src;
}

/// FSTP m80: raw.
pub fn fst_f80(dst: &mut Fp80, src: Fp80) {
    *dst = src;
}

macro_rules! impl_fp_load {
    ($name:ident, $bits_ty:ty, $fmt:ty) => {
        /// Widening load; exact apart from SNaN quieting and the denormal
        /// flag.
        pub fn $name(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: $bits_ty) {
            let v = <$fmt>::from_bits(src as u128);
            if v.is_denormal() && raise(fsw, fcw, FSW_DE) {
                return;
            }
            let mut loses_info = false;
            let converted = v.convert_r(Round::NearestTiesToEven, &mut loses_info);
            let bits = status_bits(converted.status);
            if raise(fsw, fcw, bits) {
                return;
            }
            *dst = from_backend(converted.value);
        }
    };
}

impl_fp_load!(fld_f32, u32, Single);
impl_fp_load!(fld_f64, u64, Double);

macro_rules! impl_fp_store {
    ($name:ident, $bits_ty:ty, $fmt:ty, $indefinite:expr) => {
        /// Narrowing store; rounds per the control word.
        pub fn $name(fcw: u16, fsw: &mut u16, dst: &mut $bits_ty, src: Fp80) {
            let class = classify::classify(src);
            if class.is_unsupported() {
                if !raise(fsw, fcw, FSW_IE) {
                    *dst = $indefinite;
                }
                return;
            }
            let src = classify::canonicalize(src);
            if class == Class::PseudoDenormal && raise(fsw, fcw, FSW_DE) {
                return;
            }
            let mut loses_info = false;
            let converted: rustc_apfloat::StatusAnd<$fmt> =
                to_backend(src).convert_r(fcw_round(fcw), &mut loses_info);
            let bits = status_bits(converted.status);
            if raise(fsw, fcw, bits) {
                return;
            }
            *dst = converted.value.to_bits() as $bits_ty;
        }
    };
}

impl_fp_store!(fst_f32, u32, Single, 0xFFC0_0000);
impl_fp_store!(fst_f64, u64, Double, 0xFFF8_0000_0000_0000);

macro_rules! impl_int_load {
    ($name:ident, $int:ty) => {
        /// Integer load; always exact in extended precision.
        pub fn $name(dst: &mut Fp80, src: $int) {
            *dst = from_backend(
                X87F::from_i128_r(src as i128, Round::NearestTiesToEven).value,
            );
        }
    };
}

impl_int_load!(fild_i16, i16);
impl_int_load!(fild_i32, i32);
impl_int_load!(fild_i64, i64);

fn store_int<const WIDTH: usize>(
    fcw: u16,
    fsw: &mut u16,
    dst: &mut i64,
    src: Fp80,
    round: Round,
    track_c1: bool,
) {
    if track_c1 {
        *fsw &= !FSW_C1;
    }
    let class = classify::classify(src);
    if class.is_unsupported() || class.is_nan() {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = i64::MIN >> (64 - WIDTH);
            // sign-extended 1000... pattern == integer indefinite
        }
        return;
    }
    let b = to_backend(classify::canonicalize(src));
    let mut exact = false;
    let converted = b.to_i128_r(WIDTH, round, &mut exact);
    if converted.status.contains(Status::INVALID_OP) {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = (1i64 << (WIDTH - 1)).wrapping_neg(); // -2^(w-1)
        }
        return;
    }
    let mut bits = 0;
    let mut c1 = false;
    if converted.status.contains(Status::INEXACT) {
        bits |= FSW_PE;
        let mut e = false;
        let truncated = b.to_i128_r(WIDTH, Round::TowardZero, &mut e);
        c1 = converted.value > truncated.value;
    }
    if raise(fsw, fcw, bits) {
        return;
    }
    *dst = converted.value as i64;
    if track_c1 && c1 {
        *fsw |= FSW_C1;
    }
}

macro_rules! impl_int_store {
    ($fist:ident, $fisttp:ident, $int:ty, $width:expr) => {
        /// FIST/FISTP: round per the control word; C1 reports round-up.
        pub fn $fist(fcw: u16, fsw: &mut u16, dst: &mut $int, src: Fp80) {
            let mut wide = *dst as i64;
            store_int::<$width>(fcw, fsw, &mut wide, src, fcw_round(fcw), true);
            *dst = wide as $int;
        }

        /// FISTTP: always truncates, regardless of the rounding control.
        pub fn $fisttp(fcw: u16, fsw: &mut u16, dst: &mut $int, src: Fp80) {
            let mut wide = *dst as i64;
            store_int::<$width>(fcw, fsw, &mut wide, src, Round::TowardZero, false);
            *dst = wide as $int;
        }
    };
}

impl_int_store!(fist_i16, fisttp_i16, i16, 16);
impl_int_store!(fist_i32, fisttp_i32, i32, 32);
impl_int_store!(fist_i64, fisttp_i64, i64, 64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FCW_DEFAULT;

    #[test]
    fn f64_load_is_exact() {
        let mut fsw = 0;
        let mut v = Fp80::ZERO;
        fld_f64(FCW_DEFAULT, &mut fsw, &mut v, 1.5f64.to_bits());
        assert_eq!(v, Fp80::new(0x3FFF, 0xC000_0000_0000_0000));
        assert_eq!(fsw, 0);
    }

    #[test]
    fn f32_snan_load_quiets_and_flags() {
        let mut fsw = 0;
        let mut v = Fp80::ZERO;
        fld_f32(FCW_DEFAULT, &mut fsw, &mut v, 0x7F80_0001); // SNaN
        assert_ne!(fsw & FSW_IE, 0);
        assert_eq!(classify::classify(v), Class::QNan);
    }

    #[test]
    fn f32_denormal_load_flags_de() {
        let mut fsw = 0;
        let mut v = Fp80::ZERO;
        fld_f32(FCW_DEFAULT, &mut fsw, &mut v, 0x0000_0001);
        assert_ne!(fsw & FSW_DE, 0);
        // Smallest f32 denormal is 2^-149, a normal value in extended
        // precision.
        assert_eq!(v, Fp80::new(16383 - 149, 1 << 63));
    }

    #[test]
    fn f32_store_rounds_and_overflows() {
        let mut fsw = 0;
        let mut out: u32 = 0;
        // 2^200 overflows f32 to +inf under nearest rounding.
        fst_f32(FCW_DEFAULT, &mut fsw, &mut out, Fp80::new(0x3FFF + 200, 1 << 63));
        assert_eq!(out, 0x7F80_0000);
        assert_ne!(fsw & crate::FSW_OE, 0);
    }

    #[test]
    fn f64_store_inexact_sets_pe() {
        // 1 + 2^-60 does not fit 53 bits.
        let mut fsw = 0;
        let fine = Fp80::new(0x3FFF, (1 << 63) | (1 << 3));
        let mut out: u64 = 0;
        fst_f64(FCW_DEFAULT, &mut fsw, &mut out, fine);
        assert_eq!(out, 1.0f64.to_bits());
        assert_ne!(fsw & FSW_PE, 0);
    }

    #[test]
    fn unmasked_store_exception_leaves_memory() {
        let mut fsw = 0;
        let mut out: u32 = 0xDEAD_BEEF;
        fst_f32(
            FCW_DEFAULT & !crate::FCW_OM,
            &mut fsw,
            &mut out,
            Fp80::new(0x3FFF + 200, 1 << 63),
        );
        assert_eq!(out, 0xDEAD_BEEF);
        assert_ne!(fsw & crate::FSW_ES, 0);
    }

    #[test]
    fn integer_round_trip() {
        let mut v = Fp80::ZERO;
        fild_i64(&mut v, -123456789);
        let mut fsw = 0;
        let mut out: i64 = 0;
        fist_i64(FCW_DEFAULT, &mut fsw, &mut out, v);
        assert_eq!(out, -123456789);
        assert_eq!(fsw & FSW_PE, 0);
    }

    #[test]
    fn fist_rounds_to_nearest_even() {
        let mut fsw = 0;
        let two_and_half = Fp80::new(0x4000, 0xA000_0000_0000_0000);
        let mut out: i32 = 0;
        fist_i32(FCW_DEFAULT, &mut fsw, &mut out, two_and_half);
        assert_eq!(out, 2);
        assert_ne!(fsw & FSW_PE, 0);
        assert_eq!(fsw & FSW_C1, 0);
    }

    #[test]
    fn fisttp_truncates() {
        let mut fsw = 0;
        let minus_two_and_half = Fp80::new(0xC000, 0xA000_0000_0000_0000);
        let mut out: i32 = 0;
        fisttp_i32(FCW_DEFAULT, &mut fsw, &mut out, minus_two_and_half);
        assert_eq!(out, -2);
    }

    #[test]
    fn out_of_range_stores_integer_indefinite() {
        let mut fsw = 0;
        let mut out: i16 = 0;
        fist_i16(FCW_DEFAULT, &mut fsw, &mut out, Fp80::new(0x4010, 1 << 63)); // 2^17
        assert_eq!(out, i16::MIN);
        assert_ne!(fsw & FSW_IE, 0);

        let mut out: i32 = 77;
        fist_i32(FCW_DEFAULT, &mut fsw, &mut out, Fp80::INDEFINITE);
        assert_eq!(out, i32::MIN);
    }
}
