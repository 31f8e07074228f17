//! MXCSR-driven packed and scalar floating-point semantics over the
//! soft-float backend. Every operation folds its per-lane exception
//! status into one set of MXCSR flag bits: the sticky bits are recorded
//! unconditionally, and if any raised bit is unmasked the destination is
//! left untouched and [`XmmFault`] is returned.
//!
//! DAZ squashes denormal inputs to signed zero before the operation;
//! without DAZ a consumed denormal raises DE. FTZ squashes denormal
//! results to signed zero and raises UE|PE.

use core::cmp::Ordering;

use opcore_flags::Eflags;
use rustc_apfloat::ieee::{Double, Single, X87DoubleExtended};
use rustc_apfloat::{Float, FloatConvert, Round, Status, StatusAnd};

use crate::{
    u128_to_u32x4, u128_to_u64x2, u32x4_to_u128, u64x2_to_u128, XmmFault, MXCSR_DAZ, MXCSR_DE,
    MXCSR_FTZ, MXCSR_IE, MXCSR_OE, MXCSR_PE, MXCSR_RC_MASK, MXCSR_UE, MXCSR_ZE,
};

fn round_mode(mxcsr: u32) -> Round {
    match (mxcsr & MXCSR_RC_MASK) >> 13 {
        0 => Round::NearestTiesToEven,
        1 => Round::TowardNegative,
        2 => Round::TowardPositive,
        _ => Round::TowardZero,
    }
}

fn status_flags(status: Status) -> u32 {
    let mut out = 0;
    if status.contains(Status::INVALID_OP) {
        out |= MXCSR_IE;
    }
    if status.contains(Status::DIV_BY_ZERO) {
        out |= MXCSR_ZE;
    }
    if status.contains(Status::OVERFLOW) {
        out |= MXCSR_OE;
    }
    if status.contains(Status::UNDERFLOW) {
        out |= MXCSR_UE;
    }
    if status.contains(Status::INEXACT) {
        out |= MXCSR_PE;
    }
    out
}

/// Records the sticky flag bits, then either faults (leaving `dst`
/// alone) or writes the result.
fn commit<T>(mxcsr: &mut u32, flags: u32, dst: &mut T, value: T) -> Result<(), XmmFault> {
    *mxcsr |= flags & 0x3F;
    if flags & !(*mxcsr >> 7) & 0x3F != 0 {
        return Err(XmmFault);
    }
    *dst = value;
    Ok(())
}

fn record_only(mxcsr: &mut u32, flags: u32) -> Result<(), XmmFault> {
    *mxcsr |= flags & 0x3F;
    if flags & !(*mxcsr >> 7) & 0x3F != 0 {
        return Err(XmmFault);
    }
    Ok(())
}

fn isqrt_u128(n: u128) -> (u128, u128) {
    if n == 0 {
        return (0, 0);
    }
    let mut x = 1u128 << (n.ilog2() / 2 + 1);
    loop {
        let next = (x + n / x) / 2;
        if next >= x {
            break;
        }
        x = next;
    }
    (x, n - x * x)
}

macro_rules! fp_width {
    ($apf:ty, $bits:ty,
     $daz:ident, $ftz:ident, $binop:ident, $minmax:ident, $sqrt:ident, $cmp:ident, $comi:ident,
     $sign:expr, $quiet:expr, $indef:expr) => {
        fn $daz(mxcsr: u32, bits: $bits) -> ($bits, u32) {
            let denormal = <$apf>::from_bits(bits as u128).is_denormal();
            if !denormal {
                (bits, 0)
            } else if mxcsr & MXCSR_DAZ != 0 {
                (bits & $sign, 0)
            } else {
                (bits, MXCSR_DE)
            }
        }

        fn $ftz(mxcsr: u32, bits: $bits, flags: &mut u32) -> $bits {
            if mxcsr & MXCSR_FTZ != 0 && <$apf>::from_bits(bits as u128).is_denormal() {
                *flags |= MXCSR_UE | MXCSR_PE;
                bits & $sign
            } else {
                bits
            }
        }

        fn $binop(
            mxcsr: u32,
            a_bits: $bits,
            b_bits: $bits,
            op: impl Fn($apf, $apf, Round) -> StatusAnd<$apf>,
        ) -> ($bits, u32) {
            let (a_bits, da) = $daz(mxcsr, a_bits);
            let (b_bits, db) = $daz(mxcsr, b_bits);
            let mut flags = da | db;
            let a = <$apf>::from_bits(a_bits as u128);
            let b = <$apf>::from_bits(b_bits as u128);
            let st = op(a, b, round_mode(mxcsr));
            flags |= status_flags(st.status);
            let mut out = st.value.to_bits() as $bits;
            // Invalid with no NaN input produces the real indefinite,
            // not the backend's default NaN.
            if st.status.contains(Status::INVALID_OP) && !a.is_nan() && !b.is_nan() {
                out = $indef;
            }
            out = $ftz(mxcsr, out, &mut flags);
            (out, flags)
        }

        // MIN/MAX select the second operand on NaN or on equality, and
        // forward a NaN source unquieted. Any NaN operand raises IE.
        fn $minmax(mxcsr: u32, a_bits: $bits, b_bits: $bits, want_less: bool) -> ($bits, u32) {
            let (a_bits, da) = $daz(mxcsr, a_bits);
            let (b_bits, db) = $daz(mxcsr, b_bits);
            let flags = da | db;
            let a = <$apf>::from_bits(a_bits as u128);
            let b = <$apf>::from_bits(b_bits as u128);
            if a.is_nan() || b.is_nan() {
                return (b_bits, flags | MXCSR_IE);
            }
            let take_a = match a.partial_cmp(&b) {
                Some(Ordering::Less) => want_less,
                Some(Ordering::Greater) => !want_less,
                _ => false,
            };
            (if take_a { a_bits } else { b_bits }, flags)
        }

        fn $sqrt(mxcsr: u32, bits: $bits) -> ($bits, u32) {
            let (bits, mut flags) = $daz(mxcsr, bits);
            let a = <$apf>::from_bits(bits as u128);
            if a.is_nan() {
                if a.is_signaling() {
                    flags |= MXCSR_IE;
                }
                return (bits | $quiet, flags);
            }
            if a.is_zero() {
                return (bits, flags);
            }
            if a.is_negative() {
                return ($indef, flags | MXCSR_IE);
            }
            if a.is_infinite() {
                return (bits, flags);
            }

            // Exact square root of the significand, widened so the
            // integer root lands on 64 bits; the leftover remainder is
            // folded in by rounding to odd before narrowing.
            let mut loses = false;
            let wide: X87DoubleExtended = a.convert(&mut loses).value;
            let wide_bits = wide.to_bits();
            let e = ((wide_bits >> 64) as u16 & 0x7FFF) as i32 - 16383;
            let m = wide_bits as u64;
            let t = e - 63;
            let j = if t % 2 == 0 { 64 } else { 63 };
            let (root, rem) = isqrt_u128((m as u128) << j);
            let mut root = root as u64;
            if rem != 0 {
                root |= 1;
            }
            let result_exp = ((t - j) / 2 + 63 + 16383) as u128;
            let narrow: StatusAnd<$apf> = X87DoubleExtended::from_bits(result_exp << 64 | root as u128)
                .convert_r(round_mode(mxcsr), &mut loses);
            flags |= status_flags(narrow.status);
            if rem != 0 {
                flags |= MXCSR_PE;
            }
            (narrow.value.to_bits() as $bits, flags)
        }

        fn $cmp(mxcsr: u32, a_bits: $bits, b_bits: $bits, pred: CmpPredicate) -> ($bits, u32) {
            let (a_bits, da) = $daz(mxcsr, a_bits);
            let (b_bits, db) = $daz(mxcsr, b_bits);
            let mut flags = da | db;
            let a = <$apf>::from_bits(a_bits as u128);
            let b = <$apf>::from_bits(b_bits as u128);
            if a.is_signaling()
                || b.is_signaling()
                || (pred.signals_on_qnan() && (a.is_nan() || b.is_nan()))
            {
                flags |= MXCSR_IE;
            }
            let hit = pred.outcome(a.partial_cmp(&b));
            (if hit { <$bits>::MAX } else { 0 }, flags)
        }

        fn $comi(
            mxcsr: &mut u32,
            a_bits: $bits,
            b_bits: $bits,
            quiet: bool,
        ) -> Result<Eflags, XmmFault> {
            let (a_bits, da) = $daz(*mxcsr, a_bits);
            let (b_bits, db) = $daz(*mxcsr, b_bits);
            let mut flags = da | db;
            let a = <$apf>::from_bits(a_bits as u128);
            let b = <$apf>::from_bits(b_bits as u128);
            if a.is_signaling() || b.is_signaling() || (!quiet && (a.is_nan() || b.is_nan())) {
                flags |= MXCSR_IE;
            }
            record_only(mxcsr, flags)?;
            Ok(match a.partial_cmp(&b) {
                None => Eflags::ZF | Eflags::PF | Eflags::CF,
                Some(Ordering::Less) => Eflags::CF,
                Some(Ordering::Equal) => Eflags::ZF,
                Some(Ordering::Greater) => Eflags::empty(),
            })
        }
    };
}

fp_width!(
    Single, u32, daz32, ftz32, binop32, minmax32, sqrt32, cmp32, comi32,
    0x8000_0000, 0x0040_0000, 0xFFC0_0000
);
fp_width!(
    Double, u64, daz64, ftz64, binop64, minmax64, sqrt64, cmp64, comi64,
    1 << 63, 1 << 51, 0xFFF8_0000_0000_0000
);

fn lanes32(
    mxcsr: &mut u32,
    dst: &mut u128,
    src: u128,
    f: impl Fn(u32, u32, u32) -> (u32, u32),
) -> Result<(), XmmFault> {
    let a = u128_to_u32x4(*dst);
    let b = u128_to_u32x4(src);
    let mut out = [0u32; 4];
    let mut flags = 0;
    for i in 0..4 {
        let (v, fl) = f(*mxcsr, a[i], b[i]);
        out[i] = v;
        flags |= fl;
    }
    commit(mxcsr, flags, dst, u32x4_to_u128(out))
}

fn lanes64(
    mxcsr: &mut u32,
    dst: &mut u128,
    src: u128,
    f: impl Fn(u32, u64, u64) -> (u64, u32),
) -> Result<(), XmmFault> {
    let a = u128_to_u64x2(*dst);
    let b = u128_to_u64x2(src);
    let mut out = [0u64; 2];
    let mut flags = 0;
    for i in 0..2 {
        let (v, fl) = f(*mxcsr, a[i], b[i]);
        out[i] = v;
        flags |= fl;
    }
    commit(mxcsr, flags, dst, u64x2_to_u128(out))
}

fn scalar32(
    mxcsr: &mut u32,
    dst: &mut u128,
    src: u32,
    f: impl FnOnce(u32, u32, u32) -> (u32, u32),
) -> Result<(), XmmFault> {
    let (v, flags) = f(*mxcsr, *dst as u32, src);
    let value = *dst & !0xFFFF_FFFF | v as u128;
    commit(mxcsr, flags, dst, value)
}

fn scalar64(
    mxcsr: &mut u32,
    dst: &mut u128,
    src: u64,
    f: impl FnOnce(u32, u64, u64) -> (u64, u32),
) -> Result<(), XmmFault> {
    let (v, flags) = f(*mxcsr, *dst as u64, src);
    let value = *dst >> 64 << 64 | v as u128;
    commit(mxcsr, flags, dst, value)
}

macro_rules! fp_binop {
    ($($ps:ident, $pd:ident, $ss:ident, $sd:ident, $method:ident;)*) => {
        $(
            pub fn $ps(mxcsr: &mut u32, dst: &mut u128, src: u128) -> Result<(), XmmFault> {
                lanes32(mxcsr, dst, src, |m, a, b| binop32(m, a, b, |x, y, r| x.$method(y, r)))
            }

            pub fn $pd(mxcsr: &mut u32, dst: &mut u128, src: u128) -> Result<(), XmmFault> {
                lanes64(mxcsr, dst, src, |m, a, b| binop64(m, a, b, |x, y, r| x.$method(y, r)))
            }

            pub fn $ss(mxcsr: &mut u32, dst: &mut u128, src: u32) -> Result<(), XmmFault> {
                scalar32(mxcsr, dst, src, |m, a, b| binop32(m, a, b, |x, y, r| x.$method(y, r)))
            }

            pub fn $sd(mxcsr: &mut u32, dst: &mut u128, src: u64) -> Result<(), XmmFault> {
                scalar64(mxcsr, dst, src, |m, a, b| binop64(m, a, b, |x, y, r| x.$method(y, r)))
            }
        )*
    };
}

fp_binop! {
    addps, addpd, addss, addsd, add_r;
    subps, subpd, subss, subsd, sub_r;
    mulps, mulpd, mulss, mulsd, mul_r;
    divps, divpd, divss, divsd, div_r;
}

macro_rules! fp_minmax {
    ($($ps:ident, $pd:ident, $ss:ident, $sd:ident, $less:expr;)*) => {
        $(
            pub fn $ps(mxcsr: &mut u32, dst: &mut u128, src: u128) -> Result<(), XmmFault> {
                lanes32(mxcsr, dst, src, |m, a, b| minmax32(m, a, b, $less))
            }

            pub fn $pd(mxcsr: &mut u32, dst: &mut u128, src: u128) -> Result<(), XmmFault> {
                lanes64(mxcsr, dst, src, |m, a, b| minmax64(m, a, b, $less))
            }

            pub fn $ss(mxcsr: &mut u32, dst: &mut u128, src: u32) -> Result<(), XmmFault> {
                scalar32(mxcsr, dst, src, |m, a, b| minmax32(m, a, b, $less))
            }

            pub fn $sd(mxcsr: &mut u32, dst: &mut u128, src: u64) -> Result<(), XmmFault> {
                scalar64(mxcsr, dst, src, |m, a, b| minmax64(m, a, b, $less))
            }
        )*
    };
}

fp_minmax! {
    minps, minpd, minss, minsd, true;
    maxps, maxpd, maxss, maxsd, false;
}

pub fn sqrtps(mxcsr: &mut u32, dst: &mut u128, src: u128) -> Result<(), XmmFault> {
    let b = u128_to_u32x4(src);
    let mut out = [0u32; 4];
    let mut flags = 0;
    for i in 0..4 {
        let (v, fl) = sqrt32(*mxcsr, b[i]);
        out[i] = v;
        flags |= fl;
    }
    commit(mxcsr, flags, dst, u32x4_to_u128(out))
}

pub fn sqrtpd(mxcsr: &mut u32, dst: &mut u128, src: u128) -> Result<(), XmmFault> {
    let b = u128_to_u64x2(src);
    let mut out = [0u64; 2];
    let mut flags = 0;
    for i in 0..2 {
        let (v, fl) = sqrt64(*mxcsr, b[i]);
        out[i] = v;
        flags |= fl;
    }
    commit(mxcsr, flags, dst, u64x2_to_u128(out))
}

pub fn sqrtss(mxcsr: &mut u32, dst: &mut u128, src: u32) -> Result<(), XmmFault> {
    let (v, flags) = sqrt32(*mxcsr, src);
    let value = *dst & !0xFFFF_FFFF | v as u128;
    commit(mxcsr, flags, dst, value)
}

pub fn sqrtsd(mxcsr: &mut u32, dst: &mut u128, src: u64) -> Result<(), XmmFault> {
    let (v, flags) = sqrt64(*mxcsr, src);
    let value = *dst >> 64 << 64 | v as u128;
    commit(mxcsr, flags, dst, value)
}

/// The eight CMPPS/CMPPD predicates. The negated forms match on
/// unordered, the plain forms do not; the ordering predicates signal IE
/// even on quiet NaNs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpPredicate {
    Eq,
    Lt,
    Le,
    Unord,
    Neq,
    Nlt,
    Nle,
    Ord,
}

impl CmpPredicate {
    pub fn from_imm(imm: u8) -> Self {
        match imm & 7 {
            0 => Self::Eq,
            1 => Self::Lt,
            2 => Self::Le,
            3 => Self::Unord,
            4 => Self::Neq,
            5 => Self::Nlt,
            6 => Self::Nle,
            _ => Self::Ord,
        }
    }

    fn outcome(self, ord: Option<Ordering>) -> bool {
        match self {
            Self::Eq => ord == Some(Ordering::Equal),
            Self::Lt => ord == Some(Ordering::Less),
            Self::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            Self::Unord => ord.is_none(),
            Self::Neq => ord != Some(Ordering::Equal),
            Self::Nlt => ord != Some(Ordering::Less),
            Self::Nle => !matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            Self::Ord => ord.is_some(),
        }
    }

    fn signals_on_qnan(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Nlt | Self::Nle)
    }
}

pub fn cmpps(
    mxcsr: &mut u32,
    dst: &mut u128,
    src: u128,
    pred: CmpPredicate,
) -> Result<(), XmmFault> {
    lanes32(mxcsr, dst, src, |m, a, b| cmp32(m, a, b, pred))
}

pub fn cmppd(
    mxcsr: &mut u32,
    dst: &mut u128,
    src: u128,
    pred: CmpPredicate,
) -> Result<(), XmmFault> {
    lanes64(mxcsr, dst, src, |m, a, b| cmp64(m, a, b, pred))
}

pub fn cmpss(
    mxcsr: &mut u32,
    dst: &mut u128,
    src: u32,
    pred: CmpPredicate,
) -> Result<(), XmmFault> {
    scalar32(mxcsr, dst, src, |m, a, b| cmp32(m, a, b, pred))
}

pub fn cmpsd(
    mxcsr: &mut u32,
    dst: &mut u128,
    src: u64,
    pred: CmpPredicate,
) -> Result<(), XmmFault> {
    scalar64(mxcsr, dst, src, |m, a, b| cmp64(m, a, b, pred))
}

/// COMISS: ZF/PF/CF from the comparison (unordered sets all three),
/// OF/AF/SF cleared by way of absence. Signals IE on any NaN.
pub fn comiss(mxcsr: &mut u32, a: u32, b: u32) -> Result<Eflags, XmmFault> {
    comi32(mxcsr, a, b, false)
}

/// UCOMISS: as [`comiss`] but quiet NaNs compare silently.
pub fn ucomiss(mxcsr: &mut u32, a: u32, b: u32) -> Result<Eflags, XmmFault> {
    comi32(mxcsr, a, b, true)
}

pub fn comisd(mxcsr: &mut u32, a: u64, b: u64) -> Result<Eflags, XmmFault> {
    comi64(mxcsr, a, b, false)
}

pub fn ucomisd(mxcsr: &mut u32, a: u64, b: u64) -> Result<Eflags, XmmFault> {
    comi64(mxcsr, a, b, true)
}

// Float to integer narrows below report out-of-range (and NaN) inputs
// as IE plus the integer indefinite.

fn to_int<F: Float>(mxcsr: u32, v: F, width: usize, trunc: bool) -> (i128, u32) {
    let round = if trunc {
        Round::TowardZero
    } else {
        round_mode(mxcsr)
    };
    let mut exact = false;
    let st = v.to_i128_r(width, round, &mut exact);
    if st.status.contains(Status::INVALID_OP) {
        return (-(1i128 << (width - 1)), MXCSR_IE);
    }
    let flags = if exact { 0 } else { MXCSR_PE };
    (st.value, flags)
}

fn f32_to_i32(mxcsr: u32, bits: u32, trunc: bool) -> (i32, u32) {
    let (bits, de) = daz32(mxcsr, bits);
    let (v, fl) = to_int(mxcsr, Single::from_bits(bits as u128), 32, trunc);
    (v as i32, de | fl)
}

fn f64_to_i32(mxcsr: u32, bits: u64, trunc: bool) -> (i32, u32) {
    let (bits, de) = daz64(mxcsr, bits);
    let (v, fl) = to_int(mxcsr, Double::from_bits(bits as u128), 32, trunc);
    (v as i32, de | fl)
}

macro_rules! cvt_float_to_i32x4 {
    ($($name:ident, $lanes:ident, $n:expr, $lane_fn:ident, $trunc:expr;)*) => {
        $(
            pub fn $name(mxcsr: &mut u32, dst: &mut u128, src: u128) -> Result<(), XmmFault> {
                let lanes = $lanes(src);
                let mut out = [0u32; 4];
                let mut flags = 0;
                for i in 0..$n {
                    let (v, fl) = $lane_fn(*mxcsr, lanes[i], $trunc);
                    out[i] = v as u32;
                    flags |= fl;
                }
                commit(mxcsr, flags, dst, u32x4_to_u128(out))
            }
        )*
    };
}

cvt_float_to_i32x4! {
    cvtps2dq, u128_to_u32x4, 4, f32_to_i32, false;
    cvttps2dq, u128_to_u32x4, 4, f32_to_i32, true;
    // Packed double narrows fill the upper half with zeroes.
    cvtpd2dq, u128_to_u64x2, 2, f64_to_i32, false;
    cvttpd2dq, u128_to_u64x2, 2, f64_to_i32, true;
}

pub fn cvtdq2ps(mxcsr: &mut u32, dst: &mut u128, src: u128) -> Result<(), XmmFault> {
    let lanes = u128_to_u32x4(src);
    let mut out = [0u32; 4];
    let mut flags = 0;
    for i in 0..4 {
        let st = Single::from_i128_r(lanes[i] as i32 as i128, round_mode(*mxcsr));
        flags |= status_flags(st.status);
        out[i] = st.value.to_bits() as u32;
    }
    commit(mxcsr, flags, dst, u32x4_to_u128(out))
}

/// CVTDQ2PD: the two low doubleword integers widen exactly.
pub fn cvtdq2pd(dst: &mut u128, src: u128) {
    let lanes = u128_to_u32x4(src);
    let mut out = [0u64; 2];
    for i in 0..2 {
        let v = Double::from_i128_r(lanes[i] as i32 as i128, Round::NearestTiesToEven);
        out[i] = v.value.to_bits() as u64;
    }
    *dst = u64x2_to_u128(out);
}

pub fn cvtss2sd(mxcsr: &mut u32, dst: &mut u128, src: u32) -> Result<(), XmmFault> {
    let (bits, flags) = daz32(*mxcsr, src);
    let mut loses = false;
    let wide: StatusAnd<Double> = Single::from_bits(bits as u128).convert(&mut loses);
    let value = *dst >> 64 << 64 | wide.value.to_bits() & u64::MAX as u128;
    commit(mxcsr, flags | status_flags(wide.status), dst, value)
}

pub fn cvtsd2ss(mxcsr: &mut u32, dst: &mut u128, src: u64) -> Result<(), XmmFault> {
    let (bits, mut flags) = daz64(*mxcsr, src);
    let mut loses = false;
    let narrow: StatusAnd<Single> =
        Double::from_bits(bits as u128).convert_r(round_mode(*mxcsr), &mut loses);
    flags |= status_flags(narrow.status);
    let out = ftz32(*mxcsr, narrow.value.to_bits() as u32, &mut flags);
    let value = *dst & !0xFFFF_FFFF | out as u128;
    commit(mxcsr, flags, dst, value)
}

macro_rules! cvt_int_to_float {
    ($($name:ident, $int:ty, $apf:ty, $write:ident;)*) => {
        $(
            pub fn $name(mxcsr: &mut u32, dst: &mut u128, src: $int) -> Result<(), XmmFault> {
                let st = <$apf>::from_i128_r(src as i128, round_mode(*mxcsr));
                let flags = status_flags(st.status);
                let value = $write(*dst, st.value.to_bits());
                commit(mxcsr, flags, dst, value)
            }
        )*
    };
}

fn write_low32(dst: u128, bits: u128) -> u128 {
    dst & !0xFFFF_FFFF | bits & 0xFFFF_FFFF
}

fn write_low64(dst: u128, bits: u128) -> u128 {
    dst >> 64 << 64 | bits & u64::MAX as u128
}

cvt_int_to_float! {
    cvtsi2ss_i32, i32, Single, write_low32;
    cvtsi2ss_i64, i64, Single, write_low32;
    cvtsi2sd_i32, i32, Double, write_low64;
    cvtsi2sd_i64, i64, Double, write_low64;
}

macro_rules! cvt_float_to_int {
    ($($name:ident, $src:ty, $apf:ty, $daz:ident, $int:ty, $width:expr, $trunc:expr;)*) => {
        $(
            pub fn $name(mxcsr: &mut u32, dst: &mut $int, src: $src) -> Result<(), XmmFault> {
                let (bits, de) = $daz(*mxcsr, src);
                let (v, fl) = to_int(*mxcsr, <$apf>::from_bits(bits as u128), $width, $trunc);
                commit(mxcsr, de | fl, dst, v as $int)
            }
        )*
    };
}

cvt_float_to_int! {
    cvtss2si_i32, u32, Single, daz32, i32, 32, false;
    cvtss2si_i64, u32, Single, daz32, i64, 64, false;
    cvttss2si_i32, u32, Single, daz32, i32, 32, true;
    cvttss2si_i64, u32, Single, daz32, i64, 64, true;
    cvtsd2si_i32, u64, Double, daz64, i32, 32, false;
    cvtsd2si_i64, u64, Double, daz64, i64, 64, false;
    cvttsd2si_i32, u64, Double, daz64, i32, 32, true;
    cvttsd2si_i64, u64, Double, daz64, i64, 64, true;
}
