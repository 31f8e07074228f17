//! Comparisons and classification: FCOM/FUCOM into the condition codes,
//! FCOMI/FUCOMI into an EFLAGS triple, FTST, FXAM.

use core::cmp::Ordering;

use crate::backend::to_backend;
use crate::classify::{self, Class};
use crate::{raise, Fp80, FSW_C0, FSW_C1, FSW_C2, FSW_C3, FSW_DE, FSW_IE};

/// The three EFLAGS bits the FCOMI family writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompareFlags {
    pub cf: bool,
    pub pf: bool,
    pub zf: bool,
}

impl CompareFlags {
    const UNORDERED: Self = Self { cf: true, pf: true, zf: true };
}

/// Whether quiet NaNs signal (FCOM) or stay silent (FUCOM).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QNanPolicy {
    Signal,
    Silent,
}

fn order(a: Fp80, b: Fp80) -> Option<Ordering> {
    to_backend(a).partial_cmp(&to_backend(b))
}

/// Returns the ordering, or `None` for the unordered case. An unordered
/// result caused by an exception-worthy operand raises IE; unmasked, the
/// caller must leave its result bits alone (signaled by `Err`).
fn compare(fcw: u16, fsw: &mut u16, a: Fp80, b: Fp80, policy: QNanPolicy) -> Result<Option<Ordering>, ()> {
    let ca = classify::classify(a);
    let cb = classify::classify(b);
    let invalid = ca.is_unsupported()
        || cb.is_unsupported()
        || ca == Class::SNan
        || cb == Class::SNan
        || (policy == QNanPolicy::Signal && (ca.is_nan() || cb.is_nan()));
    if invalid {
        if raise(fsw, fcw, FSW_IE) {
            return Err(());
        }
        return Ok(None);
    }
    if ca.is_nan() || cb.is_nan() {
        return Ok(None);
    }
    let denormal = matches!(ca, Class::Denormal | Class::PseudoDenormal)
        || matches!(cb, Class::Denormal | Class::PseudoDenormal);
    if denormal && raise(fsw, fcw, FSW_DE) {
        return Err(());
    }
    Ok(Some(order(classify::canonicalize(a), classify::canonicalize(b)).unwrap_or(Ordering::Equal)))
}

fn set_condition_codes(fsw: &mut u16, ord: Option<Ordering>) {
    *fsw &= !(FSW_C0 | FSW_C1 | FSW_C2 | FSW_C3);
    match ord {
        Some(Ordering::Greater) => {}
        Some(Ordering::Less) => *fsw |= FSW_C0,
        Some(Ordering::Equal) => *fsw |= FSW_C3,
        None => *fsw |= FSW_C0 | FSW_C2 | FSW_C3,
    }
}

/// FCOM: quiet NaNs are invalid operands too.
pub fn fcom(fcw: u16, fsw: &mut u16, a: Fp80, b: Fp80) {
    if let Ok(ord) = compare(fcw, fsw, a, b, QNanPolicy::Signal) {
        set_condition_codes(fsw, ord);
    }
}

/// FUCOM: quiet NaNs compare unordered without raising IE.
pub fn fucom(fcw: u16, fsw: &mut u16, a: Fp80, b: Fp80) {
    if let Ok(ord) = compare(fcw, fsw, a, b, QNanPolicy::Silent) {
        set_condition_codes(fsw, ord);
    }
}

fn to_eflags(ord: Option<Ordering>) -> CompareFlags {
    match ord {
        Some(Ordering::Greater) => CompareFlags::default(),
        Some(Ordering::Less) => CompareFlags { cf: true, ..Default::default() },
        Some(Ordering::Equal) => CompareFlags { zf: true, ..Default::default() },
        None => CompareFlags::UNORDERED,
    }
}

/// FCOMI: result lands in ZF/PF/CF. `None` when an unmasked IE fired and
/// the flags must stay untouched.
pub fn fcomi(fcw: u16, fsw: &mut u16, a: Fp80, b: Fp80) -> Option<CompareFlags> {
    compare(fcw, fsw, a, b, QNanPolicy::Signal).ok().map(to_eflags)
}

/// FUCOMI: like FCOMI but quiet NaNs stay silent.
pub fn fucomi(fcw: u16, fsw: &mut u16, a: Fp80, b: Fp80) -> Option<CompareFlags> {
    compare(fcw, fsw, a, b, QNanPolicy::Silent).ok().map(to_eflags)
}

/// FTST: compare against +0.0.
pub fn ftst(fcw: u16, fsw: &mut u16, a: Fp80) {
    fcom(fcw, fsw, a, Fp80::ZERO);
}

/// FXAM: classify without faulting; C1 is the raw sign bit even for NaNs
/// and legacy encodings.
pub fn fxam(fsw: &mut u16, v: Fp80) {
    *fsw &= !(FSW_C0 | FSW_C1 | FSW_C2 | FSW_C3);
    if v.sign() {
        *fsw |= FSW_C1;
    }
    let code = match classify::classify(v) {
        Class::Unnormal | Class::PseudoNan | Class::PseudoInfinity => 0,
        Class::SNan | Class::QNan => FSW_C0,
        Class::Normal => FSW_C2,
        Class::Infinity => FSW_C2 | FSW_C0,
        Class::Zero => FSW_C3,
        Class::Denormal | Class::PseudoDenormal => FSW_C3 | FSW_C2,
    };
    *fsw |= code;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FCW_DEFAULT, FCW_DM, FCW_IM, FSW_ES};

    const TWO: Fp80 = Fp80::new(0x4000, 1 << 63);

    #[test]
    fn ordered_comparisons() {
        let mut fsw = 0;
        fcom(FCW_DEFAULT, &mut fsw, Fp80::ONE, TWO);
        assert_ne!(fsw & FSW_C0, 0); // less

        fcom(FCW_DEFAULT, &mut fsw, TWO, Fp80::ONE);
        assert_eq!(fsw & (FSW_C0 | FSW_C2 | FSW_C3), 0); // greater

        fcom(FCW_DEFAULT, &mut fsw, TWO, TWO);
        assert_ne!(fsw & FSW_C3, 0); // equal
    }

    #[test]
    fn zeroes_compare_equal_regardless_of_sign() {
        let mut fsw = 0;
        fcom(FCW_DEFAULT, &mut fsw, Fp80::NEG_ZERO, Fp80::ZERO);
        assert_ne!(fsw & FSW_C3, 0);
    }

    #[test]
    fn qnan_signals_for_fcom_but_not_fucom() {
        let mut fsw = 0;
        fcom(FCW_DEFAULT, &mut fsw, Fp80::INDEFINITE, Fp80::ONE);
        assert_ne!(fsw & FSW_IE, 0);
        assert_ne!(fsw & FSW_C2, 0); // unordered

        let mut fsw = 0;
        fucom(FCW_DEFAULT, &mut fsw, Fp80::INDEFINITE, Fp80::ONE);
        assert_eq!(fsw & FSW_IE, 0);
        assert_ne!(fsw & FSW_C2, 0);
    }

    #[test]
    fn unmasked_invalid_leaves_condition_codes() {
        let mut fsw = FSW_C3;
        fcom(FCW_DEFAULT & !FCW_IM, &mut fsw, Fp80::INDEFINITE, Fp80::ONE);
        assert_ne!(fsw & FSW_ES, 0);
        assert_ne!(fsw & FSW_C3, 0); // untouched
    }

    #[test]
    fn denormal_operands_raise_de() {
        let tiny = Fp80::new(0, 1);

        let mut fsw = 0;
        assert_eq!(
            fucomi(FCW_DEFAULT, &mut fsw, tiny, Fp80::ONE),
            Some(CompareFlags { cf: true, pf: false, zf: false })
        );
        assert_ne!(fsw & FSW_DE, 0);

        // Unmasked DE: the exception is pending and the codes stay put.
        let mut fsw = FSW_C3;
        fcom(FCW_DEFAULT & !FCW_DM, &mut fsw, Fp80::ONE, tiny);
        assert_ne!(fsw & FSW_ES, 0);
        assert_ne!(fsw & FSW_C3, 0);
    }

    #[test]
    fn fcomi_returns_eflags_triple() {
        let mut fsw = 0;
        assert_eq!(
            fcomi(FCW_DEFAULT, &mut fsw, Fp80::ONE, TWO),
            Some(CompareFlags { cf: true, pf: false, zf: false })
        );
        assert_eq!(
            fucomi(FCW_DEFAULT, &mut fsw, Fp80::INDEFINITE, TWO),
            Some(CompareFlags::UNORDERED)
        );
    }

    #[test]
    fn ftst_against_zero() {
        let mut fsw = 0;
        ftst(FCW_DEFAULT, &mut fsw, Fp80::NEG_ZERO);
        assert_ne!(fsw & FSW_C3, 0);
    }

    #[test]
    fn fxam_patterns() {
        let mut fsw = 0;
        fxam(&mut fsw, Fp80::ONE);
        assert_eq!(fsw & (FSW_C3 | FSW_C2 | FSW_C1 | FSW_C0), FSW_C2);

        fxam(&mut fsw, Fp80::NEG_INFINITY);
        assert_eq!(fsw & (FSW_C3 | FSW_C2 | FSW_C1 | FSW_C0), FSW_C2 | FSW_C1 | FSW_C0);

        fxam(&mut fsw, Fp80::new(0, 5)); // denormal
        assert_eq!(fsw & (FSW_C3 | FSW_C2 | FSW_C1 | FSW_C0), FSW_C3 | FSW_C2);

        fxam(&mut fsw, Fp80::new(0x1000, 7)); // unnormal
        assert_eq!(fsw & (FSW_C3 | FSW_C2 | FSW_C1 | FSW_C0), 0);
    }
}
