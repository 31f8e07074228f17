//! Bit test/modify, bit scans, counts, and the BMI1/BMI2 extract/deposit
//! family.
//!
//! Implementation-defined flag behavior (bit scans, count instructions)
//! follows the vendor policy recorded in DESIGN.md: the Intel bodies clear
//! the undefined condition bits, the AMD bodies preserve the caller's.

use opcore_flags::{self as flags, Eflags};

/// Set-bit count of every 6-bit value; wider counts are chunked through
/// this table and combined by addition.
pub const POPCNT6: [u8; 64] = build_popcnt6();

const fn build_popcnt6() -> [u8; 64] {
    let mut table = [0u8; 64];
    let mut i = 0;
    while i < 64 {
        table[i] = (i as u64).count_ones() as u8;
        i += 1;
    }
    table
}

fn popcnt_chunked(mut v: u64) -> u32 {
    let mut total = 0u32;
    while v != 0 {
        total += POPCNT6[(v & 0x3F) as usize] as u32;
        v >>= 6;
    }
    total
}

macro_rules! impl_bt {
    ($t:ty, $bits:expr, $bt:ident, $bts:ident, $btr:ident, $btc:ident) => {
        /// BT: CF = selected bit; no other flag is touched.
        pub fn $bt(val: $t, index: $t, efl: &mut Eflags) {
            let bit = (index % $bits) as u32;
            efl.set(Eflags::CF, val >> bit & 1 != 0);
        }

        pub fn $bts(dst: &mut $t, index: $t, efl: &mut Eflags) {
            let bit = (index % $bits) as u32;
            efl.set(Eflags::CF, *dst >> bit & 1 != 0);
            *dst |= 1 << bit;
        }

        pub fn $btr(dst: &mut $t, index: $t, efl: &mut Eflags) {
            let bit = (index % $bits) as u32;
            efl.set(Eflags::CF, *dst >> bit & 1 != 0);
            *dst &= !(1 << bit);
        }

        pub fn $btc(dst: &mut $t, index: $t, efl: &mut Eflags) {
            let bit = (index % $bits) as u32;
            efl.set(Eflags::CF, *dst >> bit & 1 != 0);
            *dst ^= 1 << bit;
        }
    };
}

impl_bt!(u16, 16, bt_u16, bts_u16, btr_u16, btc_u16);
impl_bt!(u32, 32, bt_u32, bts_u32, btr_u32, btc_u32);
impl_bt!(u64, 64, bt_u64, bts_u64, btr_u64, btc_u64);

macro_rules! impl_bitscan {
    ($t:ty, $bits:expr,
     $bsf_intel:ident, $bsf_amd:ident, $bsf:ident,
     $bsr_intel:ident, $bsr_amd:ident, $bsr:ident) => {
        /// BSF, Intel flags: ZF = source zero, CF/OF/SF/AF/PF cleared.
        /// The destination is left unchanged when the source is zero.
        pub fn $bsf_intel(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let mut f = Eflags::empty();
            if src == 0 {
                f.insert(Eflags::ZF);
            } else {
                *dst = src.trailing_zeros() as $t;
            }
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// BSF, AMD flags: ZF = source zero, the rest preserved.
        pub fn $bsf_amd(dst: &mut $t, src: $t, efl: &mut Eflags) {
            if src == 0 {
                efl.insert(Eflags::ZF);
            } else {
                *dst = src.trailing_zeros() as $t;
                efl.remove(Eflags::ZF);
            }
        }

        pub fn $bsf(dst: &mut $t, src: $t, efl: &mut Eflags) {
            $bsf_intel(dst, src, efl)
        }

        /// BSR, Intel flags: see the BSF notes.
        pub fn $bsr_intel(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let mut f = Eflags::empty();
            if src == 0 {
                f.insert(Eflags::ZF);
            } else {
                *dst = ($bits - 1 - src.leading_zeros()) as $t;
            }
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// BSR, AMD flags: see the BSF notes.
        pub fn $bsr_amd(dst: &mut $t, src: $t, efl: &mut Eflags) {
            if src == 0 {
                efl.insert(Eflags::ZF);
            } else {
                *dst = ($bits - 1 - src.leading_zeros()) as $t;
                efl.remove(Eflags::ZF);
            }
        }

        pub fn $bsr(dst: &mut $t, src: $t, efl: &mut Eflags) {
            $bsr_intel(dst, src, efl)
        }
    };
}

impl_bitscan!(u16, 16u32, bsf_u16_intel, bsf_u16_amd, bsf_u16, bsr_u16_intel, bsr_u16_amd, bsr_u16);
impl_bitscan!(u32, 32u32, bsf_u32_intel, bsf_u32_amd, bsf_u32, bsr_u32_intel, bsr_u32_amd, bsr_u32);
impl_bitscan!(u64, 64u32, bsf_u64_intel, bsf_u64_amd, bsf_u64, bsr_u64_intel, bsr_u64_amd, bsr_u64);

macro_rules! impl_counts {
    ($t:ty, $bits:expr,
     $tzcnt_intel:ident, $tzcnt_amd:ident, $tzcnt:ident,
     $lzcnt_intel:ident, $lzcnt_amd:ident, $lzcnt:ident,
     $popcnt:ident) => {
        /// TZCNT: CF = source zero (count saturated at width), ZF = count
        /// zero. Intel body clears OF/SF/AF/PF.
        pub fn $tzcnt_intel(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let count = if src == 0 { $bits } else { src.trailing_zeros() };
            *dst = count as $t;
            let mut f = Eflags::empty();
            f.set(Eflags::CF, src == 0);
            f.set(Eflags::ZF, count == 0);
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// TZCNT, AMD body: only CF/ZF written.
        pub fn $tzcnt_amd(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let count = if src == 0 { $bits } else { src.trailing_zeros() };
            *dst = count as $t;
            efl.set(Eflags::CF, src == 0);
            efl.set(Eflags::ZF, count == 0);
        }

        pub fn $tzcnt(dst: &mut $t, src: $t, efl: &mut Eflags) {
            $tzcnt_intel(dst, src, efl)
        }

        pub fn $lzcnt_intel(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let count = src.leading_zeros();
            *dst = count as $t;
            let mut f = Eflags::empty();
            f.set(Eflags::CF, src == 0);
            f.set(Eflags::ZF, count == 0);
            flags::apply(efl, Eflags::STATUS, f);
        }

        pub fn $lzcnt_amd(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let count = src.leading_zeros();
            *dst = count as $t;
            efl.set(Eflags::CF, src == 0);
            efl.set(Eflags::ZF, count == 0);
        }

        pub fn $lzcnt(dst: &mut $t, src: $t, efl: &mut Eflags) {
            $lzcnt_intel(dst, src, efl)
        }

        /// POPCNT: ZF = source zero, every other condition bit cleared.
        pub fn $popcnt(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let count = popcnt_chunked(src as u64);
            *dst = count as $t;
            let mut f = Eflags::empty();
            f.set(Eflags::ZF, src == 0);
            flags::apply(efl, Eflags::STATUS, f);
        }
    };
}

impl_counts!(u16, 16u32, tzcnt_u16_intel, tzcnt_u16_amd, tzcnt_u16, lzcnt_u16_intel, lzcnt_u16_amd, lzcnt_u16, popcnt_u16);
impl_counts!(u32, 32u32, tzcnt_u32_intel, tzcnt_u32_amd, tzcnt_u32, lzcnt_u32_intel, lzcnt_u32_amd, lzcnt_u32, popcnt_u32);
impl_counts!(u64, 64u32, tzcnt_u64_intel, tzcnt_u64_amd, tzcnt_u64, lzcnt_u64_intel, lzcnt_u64_amd, lzcnt_u64, popcnt_u64);

macro_rules! impl_bmi {
    ($t:ty, $bits:expr, $andn:ident, $bextr:ident, $blsi:ident, $blsmsk:ident,
     $blsr:ident, $bzhi:ident, $pdep:ident, $pext:ident) => {
        /// ANDN: `dst = !src1 & src2`; SF/ZF from the result, the rest
        /// cleared.
        pub fn $andn(dst: &mut $t, src1: $t, src2: $t, efl: &mut Eflags) {
            let res = !src1 & src2;
            *dst = res;
            let f = flags::result_flags(res as u64, $bits) & (Eflags::SF | Eflags::ZF);
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// BEXTR: extract `len` bits starting at `start` (both from the
        /// control operand). A start at or past the operand width yields
        /// zero with ZF set.
        pub fn $bextr(dst: &mut $t, src: $t, control: $t, efl: &mut Eflags) {
            let start = (control & 0xFF) as u32;
            let len = (control >> 8 & 0xFF) as u32;
            let res = if start >= $bits || len == 0 {
                0
            } else {
                let v = src >> start;
                if len >= $bits {
                    v
                } else {
                    v & ((1 << len) - 1)
                }
            };
            *dst = res;
            let mut f = Eflags::empty();
            f.set(Eflags::ZF, res == 0);
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// BLSI: isolate lowest set bit. CF = source nonzero.
        pub fn $blsi(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let res = src & src.wrapping_neg();
            *dst = res;
            let mut f = flags::result_flags(res as u64, $bits) & (Eflags::SF | Eflags::ZF);
            f.set(Eflags::CF, src != 0);
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// BLSMSK: mask up to and including lowest set bit. CF = source zero.
        pub fn $blsmsk(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let res = src ^ src.wrapping_sub(1);
            *dst = res;
            let mut f = flags::result_flags(res as u64, $bits) & (Eflags::SF | Eflags::ZF);
            f.set(Eflags::CF, src == 0);
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// BLSR: clear lowest set bit. CF = source zero.
        pub fn $blsr(dst: &mut $t, src: $t, efl: &mut Eflags) {
            let res = src & src.wrapping_sub(1);
            *dst = res;
            let mut f = flags::result_flags(res as u64, $bits) & (Eflags::SF | Eflags::ZF);
            f.set(Eflags::CF, src == 0);
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// BZHI: zero bits from `index` upward. CF = index saturated.
        pub fn $bzhi(dst: &mut $t, src: $t, index: $t, efl: &mut Eflags) {
            let n = (index & 0xFF) as u32;
            let res = if n >= $bits { src } else { src & ((1 << n) - 1) };
            *dst = res;
            let mut f = flags::result_flags(res as u64, $bits) & (Eflags::SF | Eflags::ZF);
            f.set(Eflags::CF, n > $bits - 1);
            flags::apply(efl, Eflags::STATUS, f);
        }

        /// PDEP: deposit `src` bits into the set positions of `mask`,
        /// one mask bit at a time. No flags.
        pub fn $pdep(dst: &mut $t, src: $t, mask: $t) {
            let mut res: $t = 0;
            let mut k = 0u32;
            for i in 0..$bits {
                if mask >> i & 1 != 0 {
                    if src >> k & 1 != 0 {
                        res |= 1 << i;
                    }
                    k += 1;
                }
            }
            *dst = res;
        }

        /// PEXT: extract the bits of `src` selected by `mask` into the low
        /// end of the destination. No flags.
        pub fn $pext(dst: &mut $t, src: $t, mask: $t) {
            let mut res: $t = 0;
            let mut k = 0u32;
            for i in 0..$bits {
                if mask >> i & 1 != 0 {
                    if src >> i & 1 != 0 {
                        res |= 1 << k;
                    }
                    k += 1;
                }
            }
            *dst = res;
        }
    };
}

impl_bmi!(u32, 32u32, andn_u32, bextr_u32, blsi_u32, blsmsk_u32, blsr_u32, bzhi_u32, pdep_u32, pext_u32);
impl_bmi!(u64, 64u32, andn_u64, bextr_u64, blsi_u64, blsmsk_u64, blsr_u64, bzhi_u64, pdep_u64, pext_u64);
