//! Locked (atomic) forms of the read-modify-write ALU operations.
//!
//! Each operation is a single atomic update of the destination cell driven
//! by a compare-exchange retry loop; flags are derived from the value pair
//! that actually committed, so concurrent writers never produce a flag
//! state inconsistent with the stored result.

use std::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, AtomicU8, Ordering};

use opcore_flags::{self as flags, Eflags};

macro_rules! impl_locked {
    ($t:ty, $atomic:ty, $bits:expr,
     $rmw:ident, $add:ident, $adc:ident, $sub:ident, $sbb:ident,
     $and:ident, $or:ident, $xor:ident, $inc:ident, $dec:ident,
     $neg:ident, $not:ident, $xadd:ident, $xchg:ident, $cmpxchg:ident) => {
        /// Retry loop shared by every locked operation: apply `f` to the
        /// current value until the exchange commits, then return the value
        /// that was replaced.
        fn $rmw(cell: &$atomic, mut f: impl FnMut($t) -> $t) -> $t {
            let mut current = cell.load(Ordering::Relaxed);
            loop {
                match cell.compare_exchange_weak(
                    current,
                    f(current),
                    Ordering::SeqCst,
                    Ordering::Relaxed,
                ) {
                    Ok(prev) => return prev,
                    Err(observed) => current = observed,
                }
            }
        }

        pub fn $add(cell: &$atomic, src: $t, efl: &mut Eflags) {
            let old = $rmw(cell, |v| v.wrapping_add(src));
            let _ = flags::update_add(efl, old as u64, src as u64, false, $bits);
        }

        pub fn $adc(cell: &$atomic, src: $t, efl: &mut Eflags) {
            let carry = efl.contains(Eflags::CF);
            let old = $rmw(cell, |v| v.wrapping_add(src).wrapping_add(carry as $t));
            let _ = flags::update_add(efl, old as u64, src as u64, carry, $bits);
        }

        pub fn $sub(cell: &$atomic, src: $t, efl: &mut Eflags) {
            let old = $rmw(cell, |v| v.wrapping_sub(src));
            let _ = flags::update_sub(efl, old as u64, src as u64, false, $bits);
        }

        pub fn $sbb(cell: &$atomic, src: $t, efl: &mut Eflags) {
            let borrow = efl.contains(Eflags::CF);
            let old = $rmw(cell, |v| v.wrapping_sub(src).wrapping_sub(borrow as $t));
            let _ = flags::update_sub(efl, old as u64, src as u64, borrow, $bits);
        }

        pub fn $and(cell: &$atomic, src: $t, efl: &mut Eflags) {
            let old = $rmw(cell, |v| v & src);
            let _ = flags::update_logic(efl, (old & src) as u64, $bits);
        }

        pub fn $or(cell: &$atomic, src: $t, efl: &mut Eflags) {
            let old = $rmw(cell, |v| v | src);
            let _ = flags::update_logic(efl, (old | src) as u64, $bits);
        }

        pub fn $xor(cell: &$atomic, src: $t, efl: &mut Eflags) {
            let old = $rmw(cell, |v| v ^ src);
            let _ = flags::update_logic(efl, (old ^ src) as u64, $bits);
        }

        pub fn $inc(cell: &$atomic, efl: &mut Eflags) {
            let cf = efl.contains(Eflags::CF);
            let old = $rmw(cell, |v| v.wrapping_add(1));
            let _ = flags::update_add(efl, old as u64, 1, false, $bits);
            efl.set(Eflags::CF, cf);
        }

        pub fn $dec(cell: &$atomic, efl: &mut Eflags) {
            let cf = efl.contains(Eflags::CF);
            let old = $rmw(cell, |v| v.wrapping_sub(1));
            let _ = flags::update_sub(efl, old as u64, 1, false, $bits);
            efl.set(Eflags::CF, cf);
        }

        pub fn $neg(cell: &$atomic, efl: &mut Eflags) {
            let old = $rmw(cell, |v| v.wrapping_neg());
            let _ = flags::update_sub(efl, 0, old as u64, false, $bits);
        }

        pub fn $not(cell: &$atomic) {
            let _ = $rmw(cell, |v| !v);
        }

        /// XADD: store sum, return the prior value through `src`; flags as
        /// for the addition.
        pub fn $xadd(cell: &$atomic, src: &mut $t, efl: &mut Eflags) {
            let old = $rmw(cell, |v| v.wrapping_add(*src));
            let _ = flags::update_add(efl, old as u64, *src as u64, false, $bits);
            *src = old;
        }

        /// XCHG: always locked, never touches flags.
        pub fn $xchg(cell: &$atomic, src: &mut $t) {
            *src = cell.swap(*src, Ordering::SeqCst);
        }

        /// CMPXCHG: compare the accumulator with the cell; equal stores
        /// `src` and sets ZF, unequal loads the cell into the accumulator.
        /// Flags as for `cmp acc, cell` in both cases.
        pub fn $cmpxchg(cell: &$atomic, acc: &mut $t, src: $t, efl: &mut Eflags) {
            let observed = match cell.compare_exchange(
                *acc,
                src,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(prev) => prev,
                Err(prev) => prev,
            };
            let _ = flags::update_sub(efl, *acc as u64, observed as u64, false, $bits);
            if observed != *acc {
                *acc = observed;
            }
        }
    };
}

impl_locked!(u8, AtomicU8, 8, rmw_u8, add_u8, adc_u8, sub_u8, sbb_u8, and_u8,
    or_u8, xor_u8, inc_u8, dec_u8, neg_u8, not_u8, xadd_u8, xchg_u8, cmpxchg_u8);
impl_locked!(u16, AtomicU16, 16, rmw_u16, add_u16, adc_u16, sub_u16, sbb_u16, and_u16,
    or_u16, xor_u16, inc_u16, dec_u16, neg_u16, not_u16, xadd_u16, xchg_u16, cmpxchg_u16);
impl_locked!(u32, AtomicU32, 32, rmw_u32, add_u32, adc_u32, sub_u32, sbb_u32, and_u32,
    or_u32, xor_u32, inc_u32, dec_u32, neg_u32, not_u32, xadd_u32, xchg_u32, cmpxchg_u32);
impl_locked!(u64, AtomicU64, 64, rmw_u64, add_u64, adc_u64, sub_u64, sbb_u64, and_u64,
    or_u64, xor_u64, inc_u64, dec_u64, neg_u64, not_u64, xadd_u64, xchg_u64, cmpxchg_u64);

macro_rules! impl_locked_bt {
    ($t:ty, $atomic:ty, $bits:expr, $rmw:ident, $bts:ident, $btr:ident, $btc:ident) => {
        pub fn $bts(cell: &$atomic, index: $t, efl: &mut Eflags) {
            let bit = (index % $bits) as u32;
            let old = $rmw(cell, |v| v | 1 << bit);
            efl.set(Eflags::CF, old >> bit & 1 != 0);
        }

        pub fn $btr(cell: &$atomic, index: $t, efl: &mut Eflags) {
            let bit = (index % $bits) as u32;
            let old = $rmw(cell, |v| v & !(1 << bit));
            efl.set(Eflags::CF, old >> bit & 1 != 0);
        }

        pub fn $btc(cell: &$atomic, index: $t, efl: &mut Eflags) {
            let bit = (index % $bits) as u32;
            let old = $rmw(cell, |v| v ^ 1 << bit);
            efl.set(Eflags::CF, old >> bit & 1 != 0);
        }
    };
}

impl_locked_bt!(u16, AtomicU16, 16, rmw_u16, bts_u16, btr_u16, btc_u16);
impl_locked_bt!(u32, AtomicU32, 32, rmw_u32, bts_u32, btr_u32, btc_u32);
impl_locked_bt!(u64, AtomicU64, 64, rmw_u64, bts_u64, btr_u64, btc_u64);

/// CMPXCHG8B: compare EDX:EAX against the 64-bit cell; equal stores
/// ECX:EBX and sets ZF, unequal loads the cell into EDX:EAX. Only ZF is
/// written.
pub fn cmpxchg8b(cell: &AtomicU64, acc: &mut u64, replacement: u64, efl: &mut Eflags) {
    let observed = match cell.compare_exchange(*acc, replacement, Ordering::SeqCst, Ordering::SeqCst)
    {
        Ok(prev) => prev,
        Err(prev) => prev,
    };
    efl.set(Eflags::ZF, observed == *acc);
    if observed != *acc {
        *acc = observed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn locked_add_flags_match_plain_add() {
        let cell = AtomicU32::new(0xFFFF_FFFF);
        let mut f = Eflags::empty();
        add_u32(&cell, 1, &mut f);
        assert_eq!(cell.load(Ordering::SeqCst), 0);
        assert!(f.contains(Eflags::CF) && f.contains(Eflags::ZF));

        let mut plain: u32 = 0xFFFF_FFFF;
        let mut pf = Eflags::empty();
        crate::arith::add_u32(&mut plain, 1, &mut pf);
        assert_eq!(f, pf);
    }

    #[test]
    fn xadd_returns_old_value() {
        let cell = AtomicU32::new(10);
        let mut src: u32 = 5;
        let mut f = Eflags::empty();
        xadd_u32(&cell, &mut src, &mut f);
        assert_eq!(cell.load(Ordering::SeqCst), 15);
        assert_eq!(src, 10);
        assert!(!f.contains(Eflags::CF));
    }

    #[test]
    fn cmpxchg_success_and_failure() {
        let cell = AtomicU32::new(42);
        let mut acc: u32 = 42;
        let mut f = Eflags::empty();
        cmpxchg_u32(&cell, &mut acc, 99, &mut f);
        assert!(f.contains(Eflags::ZF));
        assert_eq!(cell.load(Ordering::SeqCst), 99);
        assert_eq!(acc, 42);

        let mut acc: u32 = 1;
        cmpxchg_u32(&cell, &mut acc, 7, &mut f);
        assert!(!f.contains(Eflags::ZF));
        assert_eq!(cell.load(Ordering::SeqCst), 99);
        assert_eq!(acc, 99);
    }

    #[test]
    fn cmpxchg8b_writes_only_zf() {
        let cell = AtomicU64::new(0x1122_3344_5566_7788);
        let stale = Eflags::CF | Eflags::SF;
        let mut f = stale;
        let mut acc: u64 = 0x1122_3344_5566_7788;
        cmpxchg8b(&cell, &mut acc, 1, &mut f);
        assert!(f.contains(Eflags::ZF));
        assert_eq!(f & stale, stale);
        assert_eq!(cell.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn locked_bts_reports_old_bit() {
        let cell = AtomicU32::new(0);
        let mut f = Eflags::empty();
        bts_u32(&cell, 40, &mut f); // bit 8 after masking
        assert!(!f.contains(Eflags::CF));
        assert_eq!(cell.load(Ordering::SeqCst), 0x100);
        bts_u32(&cell, 8, &mut f);
        assert!(f.contains(Eflags::CF));
    }

    #[test]
    fn xchg_swaps_without_flags() {
        let cell = AtomicU16::new(0xAAAA);
        let mut v: u16 = 0x5555;
        xchg_u16(&cell, &mut v);
        assert_eq!(v, 0xAAAA);
        assert_eq!(cell.load(Ordering::SeqCst), 0x5555);
    }

    #[test]
    fn concurrent_increments_never_lose_updates() {
        use std::sync::Arc;
        let cell = Arc::new(AtomicU32::new(0));
        let threads: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || {
                    let mut f = Eflags::empty();
                    for _ in 0..1000 {
                        inc_u32(&cell, &mut f);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(cell.load(Ordering::SeqCst), 4000);
    }
}
