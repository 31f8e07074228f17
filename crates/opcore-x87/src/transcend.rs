//! Transcendental operations: trigonometry, logarithms, and 2^x - 1.
//!
//! These are evaluated through host `f64` math. Extended precision is
//! rounded to 53 bits on the way in, so the low significand bits can
//! differ from hardware; functional behavior (flags, condition codes,
//! special cases) follows the architectural definitions.

use rustc_apfloat::ieee::Double;
use rustc_apfloat::{Float, FloatConvert, Round};

use crate::backend::{from_backend, screen_operands, to_backend, Screen, X87F};
use crate::classify::{self, Class};
use crate::{raise, Fp80, FSW_C1, FSW_C2, FSW_IE, FSW_PE, FSW_ZE};

fn to_f64(v: Fp80) -> f64 {
    let mut loses_info = false;
    let d: rustc_apfloat::StatusAnd<Double> =
        to_backend(v).convert_r(Round::NearestTiesToEven, &mut loses_info);
    f64::from_bits(d.value.to_bits() as u64)
}

fn from_f64(v: f64) -> Fp80 {
    let mut loses_info = false;
    let wide: rustc_apfloat::StatusAnd<X87F> =
        Double::from_bits(v.to_bits() as u128).convert_r(Round::NearestTiesToEven, &mut loses_info);
    from_backend(wide.value)
}

/// Argument reduction limit for the trig operations: |x| must be below
/// 2^63 or the operation reports C2 and leaves the operand alone.
fn out_of_trig_range(v: Fp80) -> bool {
    matches!(classify::classify(v), Class::Normal) && v.exponent() >= 16383 + 63
}

fn trig_unop(fcw: u16, fsw: &mut u16, dst: &mut Fp80, f: impl Fn(f64) -> f64) {
    let mut a = *dst;
    match screen_operands(fcw, fsw, &mut [&mut a]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    if classify::classify(a) == Class::Infinity {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = Fp80::INDEFINITE;
        }
        return;
    }
    if out_of_trig_range(a) {
        *fsw |= FSW_C2;
        return;
    }
    *fsw &= !(FSW_C1 | FSW_C2);
    let zero_input = classify::classify(a) == Class::Zero;
    *dst = from_f64(f(to_f64(a)));
    if !zero_input {
        let _ = raise(fsw, fcw, FSW_PE);
    }
}

pub fn fsin(fcw: u16, fsw: &mut u16, dst: &mut Fp80) {
    let sign = dst.sign();
    trig_unop(fcw, fsw, dst, f64::sin);
    // sin(+-0) keeps the operand's zero.
    if classify::classify(*dst) == Class::Zero && sign {
        dst.sign_exp |= 0x8000;
    }
}

pub fn fcos(fcw: u16, fsw: &mut u16, dst: &mut Fp80) {
    trig_unop(fcw, fsw, dst, f64::cos);
}

/// FSINCOS: `dst` becomes sin, `cos_out` cos. With C2 set neither is
/// written.
pub fn fsincos(fcw: u16, fsw: &mut u16, dst: &mut Fp80, cos_out: &mut Fp80) {
    let mut a = *dst;
    match screen_operands(fcw, fsw, &mut [&mut a]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    if classify::classify(a) == Class::Infinity {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = Fp80::INDEFINITE;
        }
        return;
    }
    if out_of_trig_range(a) {
        *fsw |= FSW_C2;
        return;
    }
    *fsw &= !(FSW_C1 | FSW_C2);
    let zero_input = classify::classify(a) == Class::Zero;
    let (s, c) = to_f64(a).sin_cos();
    *dst = from_f64(s);
    if zero_input && a.sign() {
        dst.sign_exp |= 0x8000;
    }
    *cos_out = from_f64(c);
    if !zero_input {
        let _ = raise(fsw, fcw, FSW_PE);
    }
}

/// FPTAN: `dst = tan(dst)`; hardware also pushes 1.0, which the caller
/// models if it keeps a register stack.
pub fn fptan(fcw: u16, fsw: &mut u16, dst: &mut Fp80) {
    let sign = dst.sign();
    trig_unop(fcw, fsw, dst, f64::tan);
    if classify::classify(*dst) == Class::Zero && sign {
        dst.sign_exp |= 0x8000;
    }
}

/// FPATAN: `dst = atan2(dst, x)`, full four-quadrant result.
pub fn fpatan(fcw: u16, fsw: &mut u16, dst: &mut Fp80, x: Fp80) {
    let mut a = *dst;
    let mut b = x;
    match screen_operands(fcw, fsw, &mut [&mut a, &mut b]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    *dst = from_f64(to_f64(a).atan2(to_f64(b)));
    let _ = raise(fsw, fcw, FSW_PE);
}

/// F2XM1: `dst = 2^dst - 1`. Arguments outside [-1, 1] produce an
/// undefined result on hardware; here they get the mathematical value.
pub fn f2xm1(fcw: u16, fsw: &mut u16, dst: &mut Fp80) {
    let mut a = *dst;
    match screen_operands(fcw, fsw, &mut [&mut a]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    let zero_input = classify::classify(a) == Class::Zero;
    if zero_input {
        *dst = a; // 2^+-0 - 1 = +-0
        return;
    }
    *dst = from_f64(to_f64(a).exp2() - 1.0);
    let _ = raise(fsw, fcw, FSW_PE);
}

/// FYL2X: `dst = dst * log2(x)`.
pub fn fyl2x(fcw: u16, fsw: &mut u16, dst: &mut Fp80, x: Fp80) {
    let mut a = *dst;
    let mut b = x;
    match screen_operands(fcw, fsw, &mut [&mut a, &mut b]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    let cb = classify::classify(b);
    if b.sign() && !matches!(cb, Class::Zero) {
        if !raise(fsw, fcw, FSW_IE) {
            *dst = Fp80::INDEFINITE;
        }
        return;
    }
    if matches!(cb, Class::Zero) {
        if classify::classify(a) == Class::Zero {
            // 0 * log2(0) is 0 * -inf
            if !raise(fsw, fcw, FSW_IE) {
                *dst = Fp80::INDEFINITE;
            }
            return;
        }
        if raise(fsw, fcw, FSW_ZE) {
            return;
        }
        *dst = if a.sign() { Fp80::INFINITY } else { Fp80::NEG_INFINITY };
        return;
    }
    *dst = from_f64(to_f64(a) * to_f64(b).log2());
    let _ = raise(fsw, fcw, FSW_PE);
}

/// FYL2XP1: `dst = dst * log2(1 + x)`, accurate near zero.
pub fn fyl2xp1(fcw: u16, fsw: &mut u16, dst: &mut Fp80, x: Fp80) {
    let mut a = *dst;
    let mut b = x;
    match screen_operands(fcw, fsw, &mut [&mut a, &mut b]) {
        Screen::Faulted => return,
        Screen::Resolved(v) => {
            *dst = v;
            return;
        }
        Screen::Ok => {}
    }
    if classify::classify(b) == Class::Zero {
        // y * log2(1) keeps x's signed zero times y's sign.
        let sign = a.sign() ^ b.sign();
        *dst = if sign { Fp80::NEG_ZERO } else { Fp80::ZERO };
        return;
    }
    *dst = from_f64(to_f64(a) * to_f64(b).ln_1p() * core::f64::consts::LOG2_E);
    let _ = raise(fsw, fcw, FSW_PE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::fld_f64;
    use crate::FCW_DEFAULT;

    fn load(v: f64) -> Fp80 {
        let mut out = Fp80::ZERO;
        let mut fsw = 0;
        fld_f64(FCW_DEFAULT, &mut fsw, &mut out, v.to_bits());
        out
    }

    fn approx(v: Fp80) -> f64 {
        to_f64(v)
    }

    #[test]
    fn sin_cos_basics() {
        let mut fsw = 0;
        let mut v = load(core::f64::consts::FRAC_PI_2);
        fsin(FCW_DEFAULT, &mut fsw, &mut v);
        assert!((approx(v) - 1.0).abs() < 1e-15);
        assert_eq!(fsw & FSW_C2, 0);

        let mut v = Fp80::ZERO;
        fcos(FCW_DEFAULT, &mut fsw, &mut v);
        assert_eq!(v, Fp80::ONE);
    }

    #[test]
    fn sin_of_zero_keeps_sign() {
        let mut fsw = 0;
        let mut v = Fp80::NEG_ZERO;
        fsin(FCW_DEFAULT, &mut fsw, &mut v);
        assert_eq!(v, Fp80::NEG_ZERO);
        assert_eq!(fsw & FSW_PE, 0);
    }

    #[test]
    fn huge_argument_sets_c2_and_keeps_operand() {
        let big = Fp80::new(16383 + 70, 1 << 63); // 2^70
        let mut fsw = 0;
        let mut v = big;
        fsin(FCW_DEFAULT, &mut fsw, &mut v);
        assert_ne!(fsw & FSW_C2, 0);
        assert_eq!(v, big);
    }

    #[test]
    fn sin_of_infinity_is_invalid() {
        let mut fsw = 0;
        let mut v = Fp80::INFINITY;
        fsin(FCW_DEFAULT, &mut fsw, &mut v);
        assert_eq!(v, Fp80::INDEFINITE);
        assert_ne!(fsw & FSW_IE, 0);
    }

    #[test]
    fn fsincos_writes_both() {
        let mut fsw = 0;
        let mut s = Fp80::ZERO;
        let mut c = Fp80::ONE;
        fsincos(FCW_DEFAULT, &mut fsw, &mut s, &mut c);
        assert_eq!(s, Fp80::ZERO);
        assert_eq!(c, Fp80::ONE);
    }

    #[test]
    fn fpatan_quadrants() {
        let mut fsw = 0;
        let mut y = load(1.0);
        fpatan(FCW_DEFAULT, &mut fsw, &mut y, load(1.0));
        assert!((approx(y) - core::f64::consts::FRAC_PI_4).abs() < 1e-15);

        let mut y = load(1.0);
        fpatan(FCW_DEFAULT, &mut fsw, &mut y, load(-1.0));
        assert!((approx(y) - 3.0 * core::f64::consts::FRAC_PI_4).abs() < 1e-15);
    }

    #[test]
    fn f2xm1_at_anchor_points() {
        let mut fsw = 0;
        let mut v = Fp80::ZERO;
        f2xm1(FCW_DEFAULT, &mut fsw, &mut v);
        assert_eq!(v, Fp80::ZERO);

        let mut v = Fp80::ONE;
        f2xm1(FCW_DEFAULT, &mut fsw, &mut v);
        assert!((approx(v) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn fyl2x_log_of_eight() {
        let mut fsw = 0;
        let mut y = Fp80::ONE;
        let eight = Fp80::new(0x4002, 1 << 63);
        fyl2x(FCW_DEFAULT, &mut fsw, &mut y, eight);
        assert!((approx(y) - 3.0).abs() < 1e-15);
    }

    #[test]
    fn fyl2x_zero_argument_divides_by_zero() {
        let mut fsw = 0;
        let mut y = Fp80::ONE;
        fyl2x(FCW_DEFAULT, &mut fsw, &mut y, Fp80::ZERO);
        assert_eq!(y, Fp80::NEG_INFINITY);
        assert_ne!(fsw & FSW_ZE, 0);
    }

    #[test]
    fn fyl2x_negative_argument_is_invalid() {
        let mut fsw = 0;
        let mut y = Fp80::ONE;
        let minus_two = Fp80::new(0xC000, 1 << 63);
        fyl2x(FCW_DEFAULT, &mut fsw, &mut y, minus_two);
        assert_eq!(y, Fp80::INDEFINITE);
        assert_ne!(fsw & FSW_IE, 0);
    }

    #[test]
    fn fyl2xp1_near_zero_is_accurate() {
        let mut fsw = 0;
        let mut y = Fp80::ONE;
        let tiny = load(1e-10);
        fyl2xp1(FCW_DEFAULT, &mut fsw, &mut y, tiny);
        let expected = 1e-10f64 * core::f64::consts::LOG2_E;
        assert!((approx(y) / expected - 1.0).abs() < 1e-9);
    }
}
