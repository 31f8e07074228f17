use opcore_alu::{arith, bitops, muldiv, shift, Eflags};
use proptest::prelude::*;

proptest! {
    #[test]
    fn add_is_mod_2w(a: u32, b: u32) {
        let mut f = Eflags::empty();
        let mut v = a;
        arith::add_u32(&mut v, b, &mut f);
        prop_assert_eq!(v, a.wrapping_add(b));
        prop_assert_eq!(f.contains(Eflags::CF), a.checked_add(b).is_none());
        prop_assert_eq!(f.contains(Eflags::ZF), v == 0);
        prop_assert_eq!(f.contains(Eflags::SF), (v as i32) < 0);
    }

    #[test]
    fn sub_then_add_round_trips(a: u64, b: u64) {
        let mut f = Eflags::empty();
        let mut v = a;
        arith::sub_u64(&mut v, b, &mut f);
        arith::add_u64(&mut v, b, &mut f);
        prop_assert_eq!(v, a);
    }

    #[test]
    fn signed_overflow_matches_checked(a: i16, b: i16) {
        let mut f = Eflags::empty();
        let mut v = a as u16;
        arith::add_u16(&mut v, b as u16, &mut f);
        prop_assert_eq!(f.contains(Eflags::OF), a.checked_add(b).is_none());
    }

    #[test]
    fn logic_clears_carry_and_overflow(a: u8, b: u8, stale: u32) {
        let mut f = Eflags::from_bits_retain(stale);
        let mut v = a;
        arith::and_u8(&mut v, b, &mut f);
        prop_assert!(!f.contains(Eflags::CF));
        prop_assert!(!f.contains(Eflags::OF));
        prop_assert_eq!(v, a & b);
    }

    #[test]
    fn flags_outside_status_survive(a: u32, b: u32, stale: u32) {
        let before = Eflags::from_bits_retain(stale);
        let mut f = before;
        let mut v = a;
        arith::add_u32(&mut v, b, &mut f);
        let outside = !Eflags::STATUS.bits();
        prop_assert_eq!(f.bits() & outside, before.bits() & outside);
    }

    #[test]
    fn masked_zero_shift_count_is_identity(a: u32, stale: u32) {
        let before = Eflags::from_bits_retain(stale);
        for count in [0u8, 32, 64, 96, 128, 160, 192, 224] {
            let mut f = before;
            let mut v = a;
            shift::shl_u32(&mut v, count, &mut f);
            prop_assert_eq!(v, a);
            prop_assert_eq!(f, before);
        }
    }

    #[test]
    fn shl_matches_native(a: u32, count in 0u8..32) {
        let mut f = Eflags::empty();
        let mut v = a;
        shift::shl_u32(&mut v, count, &mut f);
        prop_assert_eq!(v, if count == 0 { a } else { a << count });
    }

    #[test]
    fn rol_preserves_popcount(a: u64, count: u8) {
        let mut f = Eflags::empty();
        let mut v = a;
        shift::rol_u64(&mut v, count, &mut f);
        prop_assert_eq!(v.count_ones(), a.count_ones());
    }

    #[test]
    fn mul_then_div_round_trips(a: u32, b in 1u32..) {
        let mut f = Eflags::empty();
        let (mut lo, mut hi) = (a, 0u32);
        muldiv::mul_u32(&mut lo, &mut hi, b, &mut f);
        muldiv::div_u32(&mut lo, &mut hi, b, &mut f).unwrap();
        prop_assert_eq!(lo, a);
        prop_assert_eq!(hi, 0);
    }

    #[test]
    fn idiv_identity(n: i32, d in prop::num::i32::ANY.prop_filter("nonzero", |d| *d != 0)) {
        let wide = n as i64;
        let (mut lo, mut hi) = (wide as u32, (wide >> 32) as u32);
        let mut f = Eflags::empty();
        match muldiv::idiv_u32(&mut lo, &mut hi, d as u32, &mut f) {
            Ok(()) => {
                let q = lo as i32 as i64;
                let r = hi as i32 as i64;
                prop_assert_eq!(q * d as i64 + r, wide);
                prop_assert!(r.unsigned_abs() < d.unsigned_abs() as u64);
            }
            Err(_) => {
                // Only the one unrepresentable quotient can fault here.
                prop_assert_eq!((n, d), (i32::MIN, -1));
            }
        }
    }

    #[test]
    fn popcnt_matches_native(a: u64) {
        let mut f = Eflags::empty();
        let mut dst = 0u64;
        bitops::popcnt_u64(&mut dst, a, &mut f);
        prop_assert_eq!(dst as u32, a.count_ones());
        prop_assert_eq!(f.contains(Eflags::ZF), a == 0);
    }

    #[test]
    fn pdep_pext_inverse_on_mask(a: u64, mask: u64) {
        let mut packed = 0u64;
        bitops::pext_u64(&mut packed, a, mask);
        let mut spread = 0u64;
        bitops::pdep_u64(&mut spread, packed, mask);
        prop_assert_eq!(spread, a & mask);
    }
}
