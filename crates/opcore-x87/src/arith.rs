//! Core x87 arithmetic: add/sub/mul/div, square root, remainder,
//! rounding, scaling, and the sign operations.
//!
//! Every operation screens its raw operands first (legacy encodings,
//! NaNs, denormals), then runs the software backend at full 64-bit
//! significand precision and re-rounds per the precision-control field.
//! C1 reports round-up for inexact results; the other condition bits are
//! only written by the operations defined to produce them.

use rustc_apfloat::{Float, Round, Status, StatusAnd};

use crate::backend::{
    commit, commit_full, fcw_round, from_backend, isqrt_u128, screen_operands, status_bits,
    to_backend, Screen, X87F,
};
use crate::classify::{self, Class};
use crate::{
    raise, Fp80, RoundingControl, FSW_C0, FSW_C1, FSW_C2, FSW_C3, FSW_IE, FSW_ZE,
};

fn binop(
    fcw: u16,
    fsw: &mut u16,
    dst: &mut Fp80,
    src: Fp80,
    f: impl Fn(X87F, X87F, Round) -> StatusAnd<X87F>,
) {
    let mut a = *dst;
    let mut b = src;
    match screen_operands(fcw, fsw, &mut [&mut a, &mut b]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    let (ba, bb) = (to_backend(a), to_backend(b));
    let result = f(ba, bb, fcw_round(fcw));
    let mut c1 = false;
    if result.status.contains(Status::INEXACT) {
        let truncated = f(ba, bb, Round::TowardZero);
        c1 = result.value.cmp_abs_normal(truncated.value) == core::cmp::Ordering::Greater;
    }
    *fsw &= !FSW_C1;
    if commit(fcw, fsw, dst, result) && c1 {
        *fsw |= FSW_C1;
    }
}

pub fn fadd(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    binop(fcw, fsw, dst, src, |a, b, r| a.add_r(b, r));
}

pub fn fsub(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    binop(fcw, fsw, dst, src, |a, b, r| a.sub_r(b, r));
}

/// Reversed subtract: `dst = src - dst`.
pub fn fsubr(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    binop(fcw, fsw, dst, src, |a, b, r| b.sub_r(a, r));
}

pub fn fmul(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    binop(fcw, fsw, dst, src, |a, b, r| a.mul_r(b, r));
}

pub fn fdiv(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    binop(fcw, fsw, dst, src, |a, b, r| a.div_r(b, r));
}

/// Reversed divide: `dst = src / dst`.
pub fn fdivr(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    binop(fcw, fsw, dst, src, |a, b, r| b.div_r(a, r));
}

/// FSQRT over the full 64-bit significand, via integer square root of the
/// scaled significand with remainder-directed rounding.
pub fn fsqrt(fcw: u16, fsw: &mut u16, dst: &mut Fp80) {
    let mut a = *dst;
    match screen_operands(fcw, fsw, &mut [&mut a]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    match classify::classify(a) {
        Class::Zero => {
            *dst = a; // sqrt(+-0) is +-0
            return;
        }
        Class::Infinity if !a.sign() => {
            *dst = a;
            return;
        }
        _ => {}
    }
    if a.sign() {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = Fp80::INDEFINITE;
        }
        return;
    }

    // Normalize to m in [2^63, 2^64) with value m * 2^t.
    let mut m = a.frac;
    let mut e = a.exponent().max(1) as i32 - 16383;
    let lz = m.leading_zeros();
    m <<= lz;
    e -= lz as i32;
    let t = e - 63;

    // Pick the scaling that makes the residual exponent even.
    let j = if t % 2 == 0 { 64 } else { 63 };
    let (mut root, rem) = isqrt_u128((m as u128) << j);
    let result_exp = (t - j as i32) / 2 + 63 + 16383;

    let mut status = Status::OK;
    let mut c1 = false;
    if rem != 0 {
        status |= Status::INEXACT;
        let round_up = match RoundingControl::from_fcw(fcw) {
            RoundingControl::NearestEven => rem > root,
            RoundingControl::Up => true,
            RoundingControl::Down | RoundingControl::TowardZero => false,
        };
        if round_up {
            root += 1;
            c1 = true;
        }
    }
    let value = if root == 1u128 << 64 {
        Fp80::new(result_exp as u16 + 1, 1 << 63)
    } else {
        Fp80::new(result_exp as u16, root as u64)
    };
    *fsw &= !FSW_C1;
    if commit(fcw, fsw, dst, status.and(to_backend(value))) && c1 {
        *fsw |= FSW_C1;
    }
}

/// FRNDINT: round to integer per the rounding control.
pub fn frndint(fcw: u16, fsw: &mut u16, dst: &mut Fp80) {
    let mut a = *dst;
    match screen_operands(fcw, fsw, &mut [&mut a]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    let b = to_backend(a);
    let result = b.round_to_integral(fcw_round(fcw));
    let mut c1 = false;
    if result.status.contains(Status::INEXACT) {
        let truncated = b.round_to_integral(Round::TowardZero);
        c1 = result.value.cmp_abs_normal(truncated.value) == core::cmp::Ordering::Greater;
    }
    *fsw &= !FSW_C1;
    let bits = status_bits(result.status);
    if raise(fsw, fcw, bits) {
        return;
    }
    *dst = from_backend(result.value);
    if c1 {
        *fsw |= FSW_C1;
    }
}

/// FSCALE: `dst = dst * 2^trunc(src)`.
pub fn fscale(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    let mut a = *dst;
    let mut b = src;
    match screen_operands(fcw, fsw, &mut [&mut a, &mut b]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    let ca = classify::classify(a);
    let cb = classify::classify(b);
    // Infinite scale factors: +inf blows finite nonzero values up to
    // infinity, -inf squashes them to zero; either is invalid against the
    // operand it cannot move (0 * 2^+inf, inf * 2^-inf).
    if cb == Class::Infinity {
        let invalid = if b.sign() { ca == Class::Infinity } else { ca == Class::Zero };
        if invalid {
            if !raise(fsw, fcw, FSW_IE) {
                *dst = Fp80::INDEFINITE;
            }
        } else if b.sign() {
            if ca != Class::Zero {
                *dst = if a.sign() { Fp80::NEG_ZERO } else { Fp80::ZERO };
            }
        } else if ca != Class::Infinity {
            *dst = if a.sign() { Fp80::NEG_INFINITY } else { Fp80::INFINITY };
        } else {
            *dst = a;
        }
        return;
    }
    if matches!(ca, Class::Zero | Class::Infinity) {
        *dst = a;
        return;
    }

    let bb = to_backend(b);
    let mut exact = false;
    let n = bb.to_i128_r(32, Round::TowardZero, &mut exact).value;
    let n = n.clamp(-(i16::MAX as i128), i16::MAX as i128) as i32;

    let ba = to_backend(a);
    let scaled = ba.scalbn_r(n, fcw_round(fcw));

    // scalbn reports no status; reconstruct it from what moved.
    let mut status = Status::OK;
    if scaled.is_infinite() {
        status |= Status::OVERFLOW | Status::INEXACT;
    } else if scaled.is_zero() || scaled.is_denormal() {
        let back = scaled.scalbn_r(-n, Round::NearestTiesToEven);
        if !back.bitwise_eq(ba) {
            status |= Status::UNDERFLOW | Status::INEXACT;
        }
    }
    commit_full(fcw, fsw, dst, status.and(scaled));
}

/// FXTRACT: split into significand (exponent zero) and unbiased exponent.
pub fn fxtract(fcw: u16, fsw: &mut u16, dst: &mut Fp80, exp_out: &mut Fp80) {
    let mut a = *dst;
    match screen_operands(fcw, fsw, &mut [&mut a]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    match classify::classify(a) {
        Class::Zero => {
            if raise(fsw, fcw, FSW_ZE) {
                return;
            }
            *exp_out = Fp80::NEG_INFINITY;
            *dst = a;
            return;
        }
        Class::Infinity => {
            *exp_out = Fp80::INFINITY;
            *dst = a;
            return;
        }
        _ => {}
    }
    // Normalize so denormals report their true exponent.
    let mut m = a.frac;
    let mut e = a.exponent().max(1) as i32 - 16383;
    let lz = m.leading_zeros();
    m <<= lz;
    e -= lz as i32;

    let sign = if a.sign() { 0x8000 } else { 0 };
    *dst = Fp80::new(0x3FFF | sign, m);
    *exp_out = from_backend(X87F::from_i128_r(e as i128, Round::NearestTiesToEven).value);
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum PremMode {
    Truncate,
    Nearest,
}

fn prem(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80, mode: PremMode) {
    let mut a = *dst;
    let mut b = src;
    match screen_operands(fcw, fsw, &mut [&mut a, &mut b]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            *fsw &= !FSW_C2;
            return;
        }
        Screen::Ok => {}
    }
    let ca = classify::classify(a);
    let cb = classify::classify(b);
    *fsw &= !(FSW_C0 | FSW_C1 | FSW_C2 | FSW_C3);
    if ca == Class::Infinity || cb == Class::Zero {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = Fp80::INDEFINITE;
        }
        return;
    }
    if ca == Class::Zero || cb == Class::Infinity {
        *dst = a; // remainder is the dividend itself
        return;
    }

    let ba = to_backend(a);
    let bb = to_backend(b);
    let diff = ba.ilogb() as i32 - bb.ilogb() as i32;

    if diff < 64 {
        // Complete reduction: the quotient fits 64 bits, the remainder is
        // exact, and its low three bits land in C0/C3/C1.
        let q_round = match mode {
            PremMode::Truncate => Round::TowardZero,
            PremMode::Nearest => Round::NearestTiesToEven,
        };
        let q = ba.div_r(bb, Round::NearestTiesToEven).value.round_to_integral(q_round).value;
        let mut exact = false;
        let q_int = q.to_i128_r(128, Round::TowardZero, &mut exact).value.unsigned_abs();
        let rem = (-q).mul_add_r(bb, ba, Round::NearestTiesToEven);
        let mut value = rem.value;
        if value.is_zero() && a.sign() {
            value = -value; // zero remainder keeps the dividend's sign
        }
        if q_int & 1 != 0 {
            *fsw |= FSW_C1;
        }
        if q_int & 2 != 0 {
            *fsw |= FSW_C3;
        }
        if q_int & 4 != 0 {
            *fsw |= FSW_C0;
        }
        let bits = status_bits(rem.status & !Status::INEXACT);
        if raise(fsw, fcw, bits) {
            return;
        }
        *dst = from_backend(value);
    } else {
        // Partial reduction: pull the exponent down by at least 32 and
        // report the incomplete state through C2.
        let n = diff - 32;
        let scaled = bb.scalbn_r(n, Round::NearestTiesToEven);
        let q = ba.div_r(scaled, Round::NearestTiesToEven).value.round_to_integral(Round::TowardZero).value;
        let rem = (-q).mul_add_r(scaled, ba, Round::NearestTiesToEven);
        *fsw |= FSW_C2;
        let bits = status_bits(rem.status & !Status::INEXACT);
        if raise(fsw, fcw, bits) {
            return;
        }
        *dst = from_backend(rem.value);
    }
}

/// FPREM: remainder with a truncated quotient.
pub fn fprem(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    prem(fcw, fsw, dst, src, PremMode::Truncate);
}

/// FPREM1: IEEE remainder, nearest quotient.
pub fn fprem1(fcw: u16, fsw: &mut u16, dst: &mut Fp80, src: Fp80) {
    prem(fcw, fsw, dst, src, PremMode::Nearest);
}

/// FABS: clears the sign bit; no exceptions, even for NaNs and legacy
/// encodings.
pub fn fabs(fsw: &mut u16, dst: &mut Fp80) {
    *fsw &= !FSW_C1;
    dst.sign_exp &= 0x7FFF;
}

/// FCHS: flips the sign bit; no exceptions.
pub fn fchs(fsw: &mut u16, dst: &mut Fp80) {
    *fsw &= !FSW_C1;
    dst.sign_exp ^= 0x8000;
}
