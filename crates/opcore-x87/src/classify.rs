//! Classification of raw 80-bit images, including the legacy encodings
//! that the explicit integer bit makes possible.

use crate::Fp80;

/// Every class an 80-bit image can fall into. The last four only exist in
/// the extended format; modern operations treat them as invalid operands
/// (pseudo-denormals are the exception: they carry a correct value and are
/// accepted after remapping, with `FSW_DE` raised).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Class {
    Zero,
    Normal,
    Denormal,
    Infinity,
    SNan,
    QNan,
    /// Exponent 0 with the integer bit set: value 1.m * 2^-16382.
    PseudoDenormal,
    /// Nonzero exponent with the integer bit clear.
    Unnormal,
    /// Maximum exponent, integer bit clear, nonzero fraction.
    PseudoNan,
    /// Maximum exponent, integer bit clear, zero fraction.
    PseudoInfinity,
}

impl Class {
    /// True for the encodings no current FPU produces; using one as an
    /// operand is an invalid operation.
    pub fn is_unsupported(self) -> bool {
        matches!(self, Class::Unnormal | Class::PseudoNan | Class::PseudoInfinity)
    }

    pub fn is_nan(self) -> bool {
        matches!(self, Class::SNan | Class::QNan)
    }
}

pub fn classify(v: Fp80) -> Class {
    let exp = v.exponent();
    let int_bit = v.frac & (1 << 63) != 0;
    let frac = v.frac & !(1 << 63);
    match exp {
        0 => {
            if int_bit {
                Class::PseudoDenormal
            } else if frac == 0 {
                Class::Zero
            } else {
                Class::Denormal
            }
        }
        0x7FFF => {
            if !int_bit {
                if frac == 0 {
                    Class::PseudoInfinity
                } else {
                    Class::PseudoNan
                }
            } else if frac == 0 {
                Class::Infinity
            } else if frac & (1 << 62) != 0 {
                Class::QNan
            } else {
                Class::SNan
            }
        }
        _ => {
            if int_bit {
                Class::Normal
            } else {
                Class::Unnormal
            }
        }
    }
}

/// Remap a pseudo-denormal to the equivalent supported encoding
/// (exponent 1, same significand). Other values pass through.
pub fn canonicalize(v: Fp80) -> Fp80 {
    if classify(v) == Class::PseudoDenormal {
        Fp80::new(v.sign_exp | 1, v.frac)
    } else {
        v
    }
}

/// Quiet an SNaN in place by setting the top fraction bit.
pub fn quiet(v: Fp80) -> Fp80 {
    Fp80::new(v.sign_exp, v.frac | 1 << 62)
}
