//! x87 FPU operation semantics over full 80-bit extended precision.
//!
//! Register contents are raw 80-bit images ([`Fp80`]), so every legacy
//! encoding the format admits (pseudo-denormals, unnormals, pseudo-NaNs,
//! pseudo-infinities) is representable and classified the way the FPU
//! classifies it. Arithmetic goes through a software float backend at
//! 64-bit-significand precision; control and status words are plain `u16`
//! in their architectural layouts.
//!
//! Operations take the control word by value and the status word by
//! mutable reference. An operation that raises an exception unmasked in
//! the control word sets the exception bit plus `FSW_ES` and leaves the
//! destination untouched; masked exceptions deliver the masked default
//! response.

pub mod arith;
mod backend;
pub mod bcd;
pub mod classify;
pub mod compare;
pub mod convert;
pub mod transcend;

pub use classify::Class;

/// Raw 80-bit extended-precision value: 64-bit significand (explicit
/// integer bit) plus sign and 15-bit biased exponent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fp80 {
    pub frac: u64,
    pub sign_exp: u16,
}

impl Fp80 {
    pub const fn new(sign_exp: u16, frac: u64) -> Self {
        Self { frac, sign_exp }
    }

    pub const fn from_bits(bits: u128) -> Self {
        Self {
            frac: bits as u64,
            sign_exp: (bits >> 64) as u16,
        }
    }

    pub const fn to_bits(self) -> u128 {
        (self.sign_exp as u128) << 64 | self.frac as u128
    }

    pub const fn sign(self) -> bool {
        self.sign_exp & 0x8000 != 0
    }

    pub const fn exponent(self) -> u16 {
        self.sign_exp & 0x7FFF
    }

    pub const ZERO: Self = Self::new(0, 0);
    pub const NEG_ZERO: Self = Self::new(0x8000, 0);
    pub const ONE: Self = Self::new(0x3FFF, 1 << 63);
    /// The QNaN produced for invalid operations.
    pub const INDEFINITE: Self = Self::new(0xFFFF, 0xC000_0000_0000_0000);
    pub const INFINITY: Self = Self::new(0x7FFF, 1 << 63);
    pub const NEG_INFINITY: Self = Self::new(0xFFFF, 1 << 63);
}

pub const FCW_DEFAULT: u16 = 0x037F;

pub const FCW_IM: u16 = 1 << 0;
pub const FCW_DM: u16 = 1 << 1;
pub const FCW_ZM: u16 = 1 << 2;
pub const FCW_OM: u16 = 1 << 3;
pub const FCW_UM: u16 = 1 << 4;
pub const FCW_PM: u16 = 1 << 5;
pub const FCW_EXCEPTION_MASK: u16 = 0b11_1111;

pub const FSW_IE: u16 = 1 << 0;
pub const FSW_DE: u16 = 1 << 1;
pub const FSW_ZE: u16 = 1 << 2;
pub const FSW_OE: u16 = 1 << 3;
pub const FSW_UE: u16 = 1 << 4;
pub const FSW_PE: u16 = 1 << 5;
pub const FSW_SF: u16 = 1 << 6;
pub const FSW_ES: u16 = 1 << 7;
pub const FSW_C0: u16 = 1 << 8;
pub const FSW_C1: u16 = 1 << 9;
pub const FSW_C2: u16 = 1 << 10;
pub const FSW_TOP_MASK: u16 = 0b111 << 11;
pub const FSW_C3: u16 = 1 << 14;
pub const FSW_B: u16 = 1 << 15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundingControl {
    NearestEven,
    Down,
    Up,
    TowardZero,
}

impl RoundingControl {
    pub fn from_fcw(fcw: u16) -> Self {
        match (fcw >> 10) & 0b11 {
            0b00 => RoundingControl::NearestEven,
            0b01 => RoundingControl::Down,
            0b10 => RoundingControl::Up,
            _ => RoundingControl::TowardZero,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrecisionControl {
    Single,
    Double,
    Extended,
}

impl PrecisionControl {
    pub fn from_fcw(fcw: u16) -> Self {
        match (fcw >> 8) & 0b11 {
            0b00 => PrecisionControl::Single,
            0b10 => PrecisionControl::Double,
            _ => PrecisionControl::Extended,
        }
    }
}

/// Record exception bits in the status word. Returns `true` when any of
/// them is unmasked in `fcw`, in which case `FSW_ES` is set too and the
/// caller must leave its destination untouched.
pub(crate) fn raise(fsw: &mut u16, fcw: u16, bits: u16) -> bool {
    *fsw |= bits;
    let unmasked = bits & !(fcw & FCW_EXCEPTION_MASK) & FCW_EXCEPTION_MASK;
    if unmasked != 0 {
        *fsw |= FSW_ES;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fp80_bit_round_trip() {
        let v = Fp80::new(0xC001, 0x8000_0000_0000_0001);
        assert_eq!(Fp80::from_bits(v.to_bits()), v);
        assert!(v.sign());
        assert_eq!(v.exponent(), 0x4001);
    }

    #[test]
    fn rounding_control_decodes_all_modes() {
        assert_eq!(RoundingControl::from_fcw(FCW_DEFAULT), RoundingControl::NearestEven);
        assert_eq!(RoundingControl::from_fcw(0x0400), RoundingControl::Down);
        assert_eq!(RoundingControl::from_fcw(0x0800), RoundingControl::Up);
        assert_eq!(RoundingControl::from_fcw(0x0C00), RoundingControl::TowardZero);
    }

    #[test]
    fn raise_masked_vs_unmasked() {
        let mut fsw = 0u16;
        assert!(!raise(&mut fsw, FCW_DEFAULT, FSW_IE));
        assert_eq!(fsw, FSW_IE);

        let mut fsw = 0u16;
        assert!(raise(&mut fsw, FCW_DEFAULT & !FCW_IM, FSW_IE));
        assert_eq!(fsw, FSW_IE | FSW_ES);
    }
}
