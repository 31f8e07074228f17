//! EFLAGS condition-bit codec.
//!
//! Every integer operation in the workspace derives its flag results through
//! this crate: carry/overflow come from the width-parameterized two's
//! complement formulas, parity from a 256-entry table over the low result
//! byte, and everything is merged into the caller's 32-bit status word with
//! all non-condition bits preserved byte-for-byte.

use bitflags::bitflags;

bitflags! {
    /// Condition bits of the 32-bit status word.
    ///
    /// Callers wrap their full status word with [`Eflags::from_bits_retain`];
    /// the update helpers below only ever touch the six condition bits, so
    /// reserved and system bits ride through unchanged.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    pub struct Eflags: u32 {
        const CF = 1 << 0;
        const PF = 1 << 2;
        const AF = 1 << 4;
        const ZF = 1 << 6;
        const SF = 1 << 7;
        const OF = 1 << 11;

        /// All condition bits an arithmetic operation may write.
        const STATUS = Self::CF.bits()
            | Self::PF.bits()
            | Self::AF.bits()
            | Self::ZF.bits()
            | Self::SF.bits()
            | Self::OF.bits();
    }
}

/// CPU identity selecting a flag-behavior table where the architecture
/// leaves flags implementation-defined (bit scans, wide multiplies,
/// multi-bit shifts). Each affected operation ships an `_intel` and an
/// `_amd` body; the unsuffixed name aliases the Intel behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Vendor {
    #[default]
    Intel,
    Amd,
}

/// Parity of every byte value, precomputed: `true` means even population
/// (PF set).
pub const PARITY: [bool; 256] = build_parity();

const fn build_parity() -> [bool; 256] {
    let mut table = [false; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).count_ones() % 2 == 0;
        i += 1;
    }
    table
}

#[inline]
pub fn parity(byte: u8) -> bool {
    PARITY[byte as usize]
}

#[inline]
pub fn mask_for_bits(bits: u32) -> u64 {
    if bits == 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

#[inline]
pub fn sign_bit(bits: u32) -> u64 {
    1u64 << (bits - 1)
}

/// ZF/SF/PF for a result, as a flag mask.
pub fn result_flags(result: u64, bits: u32) -> Eflags {
    let result = result & mask_for_bits(bits);
    let mut f = Eflags::empty();
    f.set(Eflags::ZF, result == 0);
    f.set(Eflags::SF, result & sign_bit(bits) != 0);
    f.set(Eflags::PF, parity(result as u8));
    f
}

/// Replace exactly the `touched` bits of `efl` with the corresponding bits
/// of `value`; everything else is preserved.
#[inline]
pub fn apply(efl: &mut Eflags, touched: Eflags, value: Eflags) {
    *efl = Eflags::from_bits_retain((efl.bits() & !touched.bits()) | (value.bits() & touched.bits()));
}

/// Flags for `dst + src + carry_in` at the given width. Returns the masked
/// result and the full six-bit condition mask.
pub fn add_flags(dst: u64, src: u64, carry_in: bool, bits: u32) -> (u64, Eflags) {
    let mask = mask_for_bits(bits);
    let dst = dst & mask;
    let src = src & mask;
    let full = dst as u128 + src as u128 + carry_in as u128;
    let result = full as u64 & mask;

    let sb = sign_bit(bits);
    let mut f = result_flags(result, bits);
    f.set(Eflags::CF, full > mask as u128);
    f.set(Eflags::OF, (dst ^ result) & (src ^ result) & sb != 0);
    f.set(Eflags::AF, (dst ^ src ^ result) & 0x10 != 0);
    (result, f)
}

/// Flags for `dst - (src + borrow_in)` at the given width.
pub fn sub_flags(dst: u64, src: u64, borrow_in: bool, bits: u32) -> (u64, Eflags) {
    let mask = mask_for_bits(bits);
    let dst = dst & mask;
    let src = src & mask;
    let subtrahend = src as u128 + borrow_in as u128;
    let result = (dst as u128).wrapping_sub(subtrahend) as u64 & mask;

    let sb = sign_bit(bits);
    let mut f = result_flags(result, bits);
    f.set(Eflags::CF, (dst as u128) < subtrahend);
    f.set(Eflags::OF, (dst ^ src) & (dst ^ result) & sb != 0);
    f.set(Eflags::AF, (dst ^ src ^ result) & 0x10 != 0);
    (result, f)
}

/// Flags for a logical result: CF/OF/AF cleared, ZF/SF/PF from the bits.
pub fn logic_flags(result: u64, bits: u32) -> Eflags {
    result_flags(result, bits)
}

/// Compute and merge the flags of an addition, returning the result.
pub fn update_add(efl: &mut Eflags, dst: u64, src: u64, carry_in: bool, bits: u32) -> u64 {
    let (result, f) = add_flags(dst, src, carry_in, bits);
    apply(efl, Eflags::STATUS, f);
    result
}

/// Compute and merge the flags of a subtraction, returning the result.
pub fn update_sub(efl: &mut Eflags, dst: u64, src: u64, borrow_in: bool, bits: u32) -> u64 {
    let (result, f) = sub_flags(dst, src, borrow_in, bits);
    apply(efl, Eflags::STATUS, f);
    result
}

/// Merge the flags of a logical result, returning it masked to width.
pub fn update_logic(efl: &mut Eflags, result: u64, bits: u32) -> u64 {
    let result = result & mask_for_bits(bits);
    apply(efl, Eflags::STATUS, logic_flags(result, bits));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parity_table_matches_popcount() {
        for b in 0u16..=255 {
            assert_eq!(PARITY[b as usize], (b as u8).count_ones() % 2 == 0);
        }
    }

    #[test]
    fn add_u8_carry_wrap() {
        let mut efl = Eflags::from_bits_retain(0x0000_0202);
        let res = update_add(&mut efl, 0xFF, 0x01, false, 8);
        assert_eq!(res, 0x00);
        assert!(efl.contains(Eflags::CF));
        assert!(efl.contains(Eflags::ZF));
        assert!(!efl.contains(Eflags::OF));
        // Reserved bit 1 and IF-style bits outside the condition subset survive.
        assert_eq!(efl.bits() & 0x0000_0202, 0x0000_0202);
    }

    #[test]
    fn sub_borrow_and_overflow() {
        let mut efl = Eflags::empty();
        // 0x80 - 1 overflows signed 8-bit.
        let res = update_sub(&mut efl, 0x80, 0x01, false, 8);
        assert_eq!(res, 0x7F);
        assert!(efl.contains(Eflags::OF));
        assert!(!efl.contains(Eflags::CF));

        let res = update_sub(&mut efl, 0x00, 0x01, false, 8);
        assert_eq!(res, 0xFF);
        assert!(efl.contains(Eflags::CF));
        assert!(efl.contains(Eflags::SF));
    }

    #[test]
    fn logic_clears_carry_and_overflow() {
        let mut efl = Eflags::from_bits_retain((Eflags::CF | Eflags::OF).bits());
        let res = update_logic(&mut efl, 0xF0 & 0x0F, 8);
        assert_eq!(res, 0);
        assert!(!efl.contains(Eflags::CF));
        assert!(!efl.contains(Eflags::OF));
        assert!(efl.contains(Eflags::ZF));
        assert!(efl.contains(Eflags::PF));
    }

    #[test]
    fn untouched_word_is_preserved_bytewise() {
        let raw = 0xFFBF_F500u32; // no condition bits set
        let mut efl = Eflags::from_bits_retain(raw);
        update_add(&mut efl, 1, 2, false, 32);
        assert_eq!(efl.bits() & !Eflags::STATUS.bits(), raw & !Eflags::STATUS.bits());
    }
}
