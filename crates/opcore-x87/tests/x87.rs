use opcore_x87::{
    arith, classify::Class, classify::classify, compare, convert, Fp80, FCW_DEFAULT, FCW_IM,
    FSW_C2, FSW_DE, FSW_ES, FSW_IE, FSW_PE,
};
use proptest::prelude::*;

const TWO: Fp80 = Fp80::new(0x4000, 1 << 63);

fn from_f64(v: f64) -> Fp80 {
    let mut out = Fp80::ZERO;
    let mut fsw = 0;
    convert::fld_f64(FCW_DEFAULT, &mut fsw, &mut out, v.to_bits());
    out
}

fn to_f64(v: Fp80) -> f64 {
    let mut out = 0u64;
    let mut fsw = 0;
    convert::fst_f64(FCW_DEFAULT, &mut fsw, &mut out, v);
    f64::from_bits(out)
}

#[test]
fn double_inputs_round_trip_through_extended_arithmetic() {
    let mut fsw = 0;
    let mut v = from_f64(0.1);
    arith::fadd(FCW_DEFAULT, &mut fsw, &mut v, from_f64(0.2));
    // Extended precision carries more bits than the f64 sum.
    assert_eq!(to_f64(v), 0.1 + 0.2);
}

#[test]
fn infinity_arithmetic_signs() {
    let mut fsw = 0;
    let mut v = Fp80::INFINITY;
    arith::fadd(FCW_DEFAULT, &mut fsw, &mut v, Fp80::INFINITY);
    assert_eq!(v, Fp80::INFINITY);

    let mut v = Fp80::NEG_INFINITY;
    arith::fadd(FCW_DEFAULT, &mut fsw, &mut v, Fp80::INFINITY);
    assert_eq!(v, Fp80::INDEFINITE);
    assert_ne!(fsw & FSW_IE, 0);
}

#[test]
fn unmasked_fault_keeps_register_and_sets_summary() {
    let mut fsw = 0;
    let mut v = Fp80::ONE;
    arith::fdiv(FCW_DEFAULT & !FCW_IM, &mut fsw, &mut v, Fp80::new(0x4000, 1)); // unnormal
    assert_eq!(v, Fp80::ONE);
    assert_ne!(fsw & (FSW_IE | FSW_ES), 0);
}

#[test]
fn pseudo_denormal_loads_and_computes() {
    // A pseudo-denormal f80 equals the corresponding exponent-1 normal.
    let pd = Fp80::new(0, 1 << 63);
    let normal = Fp80::new(1, 1 << 63);
    let mut fsw = 0;
    let mut a = pd;
    arith::fmul(FCW_DEFAULT, &mut fsw, &mut a, TWO);
    let mut b = normal;
    let mut fsw2 = 0;
    arith::fmul(FCW_DEFAULT, &mut fsw2, &mut b, TWO);
    assert_eq!(a, b);
    assert_ne!(fsw & FSW_DE, 0);
    assert_eq!(fsw2 & FSW_DE, 0);
}

#[test]
fn compare_after_arithmetic() {
    let mut fsw = 0;
    let mut v = from_f64(3.0);
    arith::fmul(FCW_DEFAULT, &mut fsw, &mut v, from_f64(4.0));
    let flags = compare::fcomi(FCW_DEFAULT, &mut fsw, v, from_f64(12.0)).unwrap();
    assert!(flags.zf && !flags.cf && !flags.pf);
}

#[test]
fn sqrt_then_square_is_close() {
    let mut fsw = 0;
    let mut v = from_f64(2.0);
    arith::fsqrt(FCW_DEFAULT, &mut fsw, &mut v);
    let mut sq = v;
    arith::fmul(FCW_DEFAULT, &mut fsw, &mut sq, v);
    // One rounding step away from exact.
    assert!((to_f64(sq) - 2.0).abs() < 1e-15);
}

#[test]
fn fprem_reduces_trig_argument() {
    // 10 mod 2pi = 3.716...
    let mut fsw = 0;
    let mut v = from_f64(10.0);
    let two_pi = from_f64(core::f64::consts::TAU);
    arith::fprem(FCW_DEFAULT, &mut fsw, &mut v, two_pi);
    assert_eq!(fsw & FSW_C2, 0);
    assert!((to_f64(v) - (10.0 % core::f64::consts::TAU)).abs() < 1e-14);
}

proptest! {
    #[test]
    fn x_plus_neg_x_is_positive_zero(bits: u64) {
        let x = from_f64(f64::from_bits(bits));
        prop_assume!(matches!(classify(x), Class::Normal | Class::Zero));
        let mut neg = x;
        let mut fsw = 0;
        arith::fchs(&mut fsw, &mut neg);
        let mut sum = x;
        arith::fadd(FCW_DEFAULT, &mut fsw, &mut sum, neg);
        prop_assert_eq!(sum, Fp80::ZERO);
    }

    #[test]
    fn compare_matches_f64_ordering(a: f64, b: f64) {
        prop_assume!(a.is_finite() && b.is_finite());
        let mut fsw = 0;
        let flags = compare::fucomi(FCW_DEFAULT, &mut fsw, from_f64(a), from_f64(b)).unwrap();
        prop_assert_eq!(flags.zf, a == b);
        prop_assert_eq!(flags.cf, a < b);
    }

    #[test]
    fn nan_is_unordered_against_everything(bits: u64) {
        let x = from_f64(f64::from_bits(bits));
        let mut fsw = 0;
        let flags = compare::fucomi(FCW_DEFAULT, &mut fsw, Fp80::INDEFINITE, x).unwrap();
        prop_assert!(flags.zf && flags.pf && flags.cf);
    }

    #[test]
    fn integer_loads_are_exact(v: i64) {
        let mut reg = Fp80::ZERO;
        convert::fild_i64(&mut reg, v);
        let mut out = 0i64;
        let mut fsw = 0;
        convert::fist_i64(FCW_DEFAULT, &mut fsw, &mut out, reg);
        prop_assert_eq!(out, v);
        prop_assert_eq!(fsw & FSW_PE, 0);
    }

    #[test]
    fn f64_load_store_is_identity(bits: u64) {
        let v = f64::from_bits(bits);
        prop_assume!(!v.is_nan());
        let mut reg = Fp80::ZERO;
        let mut fsw = 0;
        convert::fld_f64(FCW_DEFAULT, &mut fsw, &mut reg, bits);
        let mut out = 0u64;
        convert::fst_f64(FCW_DEFAULT, &mut fsw, &mut out, reg);
        prop_assert_eq!(out, bits);
    }
}
