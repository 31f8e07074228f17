//! Two-operand arithmetic/logic and the unary increment/decrement/negate
//! family. Destinations are mutated in place; `cmp`/`test` only read.

use opcore_flags::{self as flags, Eflags};

macro_rules! impl_arith {
    ($t:ty, $bits:expr, $add:ident, $adc:ident, $sub:ident, $sbb:ident,
     $and:ident, $or:ident, $xor:ident, $cmp:ident, $test:ident,
     $inc:ident, $dec:ident, $neg:ident, $not:ident) => {
        pub fn $add(dst: &mut $t, src: $t, efl: &mut Eflags) {
            *dst = flags::update_add(efl, *dst as u64, src as u64, false, $bits) as $t;
        }

        pub fn $adc(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let carry = efl.contains(Eflags::CF);
            *dst = flags::update_add(efl, *dst as u64, src as u64, carry, $bits) as $t;
        }

        pub fn $sub(dst: &mut $t, src: $t, efl: &mut Eflags) {
            *dst = flags::update_sub(efl, *dst as u64, src as u64, false, $bits) as $t;
        }

        pub fn $sbb(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let borrow = efl.contains(Eflags::CF);
            *dst = flags::update_sub(efl, *dst as u64, src as u64, borrow, $bits) as $t;
        }

        pub fn $and(dst: &mut $t, src: $t, efl: &mut Eflags) {
            *dst = flags::update_logic(efl, (*dst & src) as u64, $bits) as $t;
        }

        pub fn $or(dst: &mut $t, src: $t, efl: &mut Eflags) {
            *dst = flags::update_logic(efl, (*dst | src) as u64, $bits) as $t;
        }

        pub fn $xor(dst: &mut $t, src: $t, efl: &mut Eflags) {
            *dst = flags::update_logic(efl, (*dst ^ src) as u64, $bits) as $t;
        }

        pub fn $cmp(dst: $t, src: $t, efl: &mut Eflags) {
            let _ = flags::update_sub(efl, dst as u64, src as u64, false, $bits);
        }

        pub fn $test(a: $t, b: $t, efl: &mut Eflags) {
            let _ = flags::update_logic(efl, (a & b) as u64, $bits);
        }

        /// INC: like `add 1` but CF is preserved.
        pub fn $inc(dst: &mut $t, efl: &mut Eflags) {
            let cf = efl.contains(Eflags::CF);
            *dst = flags::update_add(efl, *dst as u64, 1, false, $bits) as $t;
            efl.set(Eflags::CF, cf);
        }

        /// DEC: like `sub 1` but CF is preserved.
        pub fn $dec(dst: &mut $t, efl: &mut Eflags) {
            let cf = efl.contains(Eflags::CF);
            *dst = flags::update_sub(efl, *dst as u64, 1, false, $bits) as $t;
            efl.set(Eflags::CF, cf);
        }

        /// NEG: flags as for `0 - dst` (CF set iff the operand was nonzero).
        pub fn $neg(dst: &mut $t, efl: &mut Eflags) {
            *dst = flags::update_sub(efl, 0, *dst as u64, false, $bits) as $t;
        }

        /// NOT touches no flags.
        pub fn $not(dst: &mut $t) {
            *dst = !*dst;
        }
    };
}

impl_arith!(u8, 8, add_u8, adc_u8, sub_u8, sbb_u8, and_u8, or_u8, xor_u8, cmp_u8, test_u8, inc_u8, dec_u8, neg_u8, not_u8);
impl_arith!(u16, 16, add_u16, adc_u16, sub_u16, sbb_u16, and_u16, or_u16, xor_u16, cmp_u16, test_u16, inc_u16, dec_u16, neg_u16, not_u16);
impl_arith!(u32, 32, add_u32, adc_u32, sub_u32, sbb_u32, and_u32, or_u32, xor_u32, cmp_u32, test_u32, inc_u32, dec_u32, neg_u32, not_u32);
impl_arith!(u64, 64, add_u64, adc_u64, sub_u64, sbb_u64, and_u64, or_u64, xor_u64, cmp_u64, test_u64, inc_u64, dec_u64, neg_u64, not_u64);
