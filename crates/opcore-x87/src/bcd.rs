//! Packed-BCD loads and stores (FBLD/FBSTP): 18 decimal digits plus a
//! sign byte in a 10-byte memory image.

use rustc_apfloat::{Float, Round, Status};

use crate::backend::{fcw_round, from_backend, to_backend, X87F};
use crate::classify::{self, Class};
use crate::{raise, Fp80, FSW_IE, FSW_PE};

/// The packed-BCD indefinite: both high bytes all ones.
pub const BCD_INDEFINITE: [u8; 10] = [0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF];

/// FBLD: digits out of range are not checked, matching the undefined
/// hardware behavior; whatever base-100 value they form is loaded.
pub fn fbld(dst: &mut Fp80, src: [u8; 10]) {
    let mut magnitude: u64 = 0;
    for byte in src[..9].iter().rev() {
        magnitude = magnitude * 100 + (byte >> 4) as u64 * 10 + (byte & 0xF) as u64;
    }
    let loaded = X87F::from_u128_r(magnitude as u128, Round::NearestTiesToEven).value;
    let mut v = from_backend(loaded);
    if src[9] & 0x80 != 0 {
        v.sign_exp |= 0x8000;
    }
    *dst = v;
}

/// FBSTP: rounds per the control word; anything that does not fit 18
/// digits stores the BCD indefinite under a masked IE.
pub fn fbst(fcw: u16, fsw: &mut u16, dst: &mut [u8; 10], src: Fp80) {
    let class = classify::classify(src);
    if class.is_unsupported() || class.is_nan() || class == Class::Infinity {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = BCD_INDEFINITE;
        }
        return;
    }
    let b = to_backend(classify::canonicalize(src));
    let mut exact = false;
    let converted = b.to_i128_r(128, fcw_round(fcw), &mut exact);
    let magnitude = converted.value.unsigned_abs();
    if converted.status.contains(Status::INVALID_OP) || magnitude > 999_999_999_999_999_999 {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = BCD_INDEFINITE;
        }
        return;
    }
    if converted.status.contains(Status::INEXACT) && raise(fsw, fcw, FSW_PE) {
        return;
    }
    let mut out = [0u8; 10];
    let mut rest = magnitude;
    for byte in out[..9].iter_mut() {
        let pair = (rest % 100) as u8;
        *byte = (pair / 10) << 4 | pair % 10;
        rest /= 100;
    }
    if src.sign() {
        out[9] = 0x80;
    }
    *dst = out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::fild_i64;
    use crate::FCW_DEFAULT;

    fn bcd(digits: u64, negative: bool) -> [u8; 10] {
        let mut out = [0u8; 10];
        let mut rest = digits;
        for byte in out[..9].iter_mut() {
            let pair = (rest % 100) as u8;
            *byte = (pair / 10) << 4 | pair % 10;
            rest /= 100;
        }
        if negative {
            out[9] = 0x80;
        }
        out
    }

    #[test]
    fn load_store_round_trip() {
        for (value, negative) in [(0u64, false), (1, false), (987_654_321, true), (999_999_999_999_999_999, false)] {
            let image = bcd(value, negative);
            let mut v = Fp80::ZERO;
            fbld(&mut v, image);

            let mut expected = Fp80::ZERO;
            fild_i64(&mut expected, value as i64);
            if negative {
                expected.sign_exp |= 0x8000;
            }
            assert_eq!(v, expected);

            let mut fsw = 0;
            let mut out = [0u8; 10];
            fbst(FCW_DEFAULT, &mut fsw, &mut out, v);
            assert_eq!(out, image);
            assert_eq!(fsw, 0);
        }
    }

    #[test]
    fn negative_zero_keeps_sign_byte() {
        let mut fsw = 0;
        let mut out = [0u8; 10];
        fbst(FCW_DEFAULT, &mut fsw, &mut out, Fp80::NEG_ZERO);
        assert_eq!(out[9], 0x80);
        assert!(out[..9].iter().all(|b| *b == 0));
    }

    #[test]
    fn overflow_and_nan_store_indefinite() {
        let mut fsw = 0;
        let mut out = [0u8; 10];
        // 10^18 is one past the largest encodable magnitude.
        let mut big = Fp80::ZERO;
        fild_i64(&mut big, 1_000_000_000_000_000_000);
        fbst(FCW_DEFAULT, &mut fsw, &mut out, big);
        assert_eq!(out, BCD_INDEFINITE);
        assert_ne!(fsw & FSW_IE, 0);

        let mut fsw = 0;
        fbst(FCW_DEFAULT, &mut fsw, &mut out, Fp80::INDEFINITE);
        assert_eq!(out, BCD_INDEFINITE);
    }

    #[test]
    fn fractional_store_rounds() {
        let half = Fp80::new(0x3FFE, 1 << 63); // 0.5
        let mut fsw = 0;
        let mut out = [0u8; 10];
        fbst(FCW_DEFAULT, &mut fsw, &mut out, half);
        // Nearest-even rounds 0.5 to 0.
        assert!(out.iter().all(|b| *b == 0));
        assert_ne!(fsw & FSW_PE, 0);
    }
}
