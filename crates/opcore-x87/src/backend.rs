//! Bridge between raw 80-bit images and the software float backend, plus
//! the shared operand screening every arithmetic operation performs.

use rustc_apfloat::ieee::{Double, Single, X87DoubleExtended};
use rustc_apfloat::{Float, FloatConvert, Round, Status, StatusAnd};

use crate::classify::{self, Class};
use crate::{
    raise, Fp80, PrecisionControl, RoundingControl, FSW_DE, FSW_IE, FSW_OE, FSW_PE, FSW_UE,
    FSW_ZE,
};

pub(crate) type X87F = X87DoubleExtended;

pub(crate) fn to_backend(v: Fp80) -> X87F {
    X87F::from_bits(v.to_bits())
}

pub(crate) fn from_backend(v: X87F) -> Fp80 {
    Fp80::from_bits(v.to_bits())
}

pub(crate) fn round_mode(rc: RoundingControl) -> Round {
    match rc {
        RoundingControl::NearestEven => Round::NearestTiesToEven,
        RoundingControl::Down => Round::TowardNegative,
        RoundingControl::Up => Round::TowardPositive,
        RoundingControl::TowardZero => Round::TowardZero,
    }
}

pub(crate) fn fcw_round(fcw: u16) -> Round {
    round_mode(RoundingControl::from_fcw(fcw))
}

/// Map backend exception status to status-word bits.
pub(crate) fn status_bits(status: Status) -> u16 {
    let mut bits = 0;
    if status.contains(Status::INVALID_OP) {
        bits |= FSW_IE;
    }
    if status.contains(Status::DIV_BY_ZERO) {
        bits |= FSW_ZE;
    }
    if status.contains(Status::OVERFLOW) {
        bits |= FSW_OE;
    }
    if status.contains(Status::UNDERFLOW) {
        bits |= FSW_UE;
    }
    if status.contains(Status::INEXACT) {
        bits |= FSW_PE;
    }
    bits
}

/// Re-round a result to 24- or 53-bit significand when the precision
/// control field asks for it. The exponent keeps the extended range; only
/// significand width narrows, so this goes through the narrower format
/// and back only for finite values it can represent.
pub(crate) fn apply_precision(fcw: u16, result: StatusAnd<X87F>) -> StatusAnd<X87F> {
    let round = fcw_round(fcw);
    match PrecisionControl::from_fcw(fcw) {
        PrecisionControl::Extended => result,
        PrecisionControl::Single => {
            if result.value.is_nan() || result.value.is_infinite() {
                return result;
            }
            let mut loses_info = false;
            let narrowed: StatusAnd<Single> = result.value.convert_r(round, &mut loses_info);
            let widened: StatusAnd<X87F> = narrowed.value.convert_r(round, &mut loses_info);
            (result.status | narrowed.status | widened.status).and(widened.value)
        }
        PrecisionControl::Double => {
            if result.value.is_nan() || result.value.is_infinite() {
                return result;
            }
            let mut loses_info = false;
            let narrowed: StatusAnd<Double> = result.value.convert_r(round, &mut loses_info);
            let widened: StatusAnd<X87F> = narrowed.value.convert_r(round, &mut loses_info);
            (result.status | narrowed.status | widened.status).and(widened.value)
        }
    }
}

/// Outcome of screening raw operands before real arithmetic.
pub(crate) enum Screen {
    /// All operands usable; canonicalized values to feed the backend.
    Ok,
    /// A NaN or unsupported encoding decided the result already.
    Resolved(Fp80),
    /// An unmasked exception fired; destination stays untouched.
    Faulted,
}

/// Common operand screening: unsupported encodings raise IE and yield the
/// indefinite QNaN, NaN operands resolve by the usual selection rule, and
/// denormal or pseudo-denormal operands raise DE. On `Ok` the operands
/// have been canonicalized in place.
pub(crate) fn screen_operands(fcw: u16, fsw: &mut u16, ops: &mut [&mut Fp80]) -> Screen {
    let mut class_buf = [Class::Zero; 2];
    for (slot, v) in class_buf.iter_mut().zip(ops.iter()) {
        *slot = classify::classify(**v);
    }
    let classes = &class_buf[..ops.len()];

    if classes.iter().any(|c| c.is_unsupported()) {
        if raise(fsw, fcw, FSW_IE) {
            return Screen::Faulted;
        }
        return Screen::Resolved(Fp80::INDEFINITE);
    }

    if classes.iter().any(|c| c.is_nan()) {
        let snan = classes.iter().any(|c| *c == Class::SNan);
        if snan && raise(fsw, fcw, FSW_IE) {
            return Screen::Faulted;
        }
        // Larger significand wins; a tie keeps the first (destination)
        // operand. Quiet whichever is chosen.
        let mut best: Option<Fp80> = None;
        for (v, c) in ops.iter().zip(classes.iter()) {
            if c.is_nan() && best.map_or(true, |b| v.frac > b.frac) {
                best = Some(**v);
            }
        }
        // `best` is always set here since some class was a NaN.
        let chosen = best.unwrap_or(Fp80::INDEFINITE);
        return Screen::Resolved(classify::quiet(chosen));
    }

    if classes
        .iter()
        .any(|c| matches!(c, Class::Denormal | Class::PseudoDenormal))
    {
        if raise(fsw, fcw, FSW_DE) {
            return Screen::Faulted;
        }
        for v in ops.iter_mut() {
            **v = classify::canonicalize(**v);
        }
    }

    Screen::Ok
}

/// Commit a backend result: precision control, status capture, masked or
/// unmasked delivery. Returns whether the destination was written.
pub(crate) fn commit(fcw: u16, fsw: &mut u16, dst: &mut Fp80, result: StatusAnd<X87F>) -> bool {
    let result = apply_precision(fcw, result);
    let bits = status_bits(result.status);
    if raise(fsw, fcw, bits) {
        return false;
    }
    *dst = from_backend(result.value);
    true
}

/// Like [`commit`] but without precision-control re-rounding, for the
/// operations precision control does not apply to.
pub(crate) fn commit_full(fcw: u16, fsw: &mut u16, dst: &mut Fp80, result: StatusAnd<X87F>) -> bool {
    let bits = status_bits(result.status);
    if raise(fsw, fcw, bits) {
        return false;
    }
    *dst = from_backend(result.value);
    true
}

/// Integer square root of a 128-bit value, with the remainder.
pub(crate) fn isqrt_u128(n: u128) -> (u128, u128) {
    if n == 0 {
        return (0, 0);
    }
    let mut x = 1u128 << (128 - n.leading_zeros()).div_ceil(2);
    loop {
        let next = (x + n / x) >> 1;
        if next >= x {
            break;
        }
        x = next;
    }
    (x, n - x * x)
}
