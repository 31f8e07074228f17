//! Runtime vendor selection.
//!
//! Every operation with `_intel`/`_amd` bodies gets a wrapper here that
//! takes a [`Vendor`] tag and forwards to the matching body, for callers
//! that pick the flag personality from guest configuration rather than at
//! compile time.

use opcore_flags::{Eflags, Vendor};

use crate::muldiv::DivideError;
use crate::{bitops, muldiv, shift};

macro_rules! vendored {
    ($($name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)? =>
       $module:ident :: $intel:ident / $amd:ident;)*) => {
        $(
            pub fn $name(vendor: Vendor, $($arg: $ty),*) $(-> $ret)? {
                match vendor {
                    Vendor::Intel => $module::$intel($($arg),*),
                    Vendor::Amd => $module::$amd($($arg),*),
                }
            }
        )*
    };
}

vendored! {
    bsf_u16(dst: &mut u16, src: u16, efl: &mut Eflags) => bitops::bsf_u16_intel / bsf_u16_amd;
    bsf_u32(dst: &mut u32, src: u32, efl: &mut Eflags) => bitops::bsf_u32_intel / bsf_u32_amd;
    bsf_u64(dst: &mut u64, src: u64, efl: &mut Eflags) => bitops::bsf_u64_intel / bsf_u64_amd;
    bsr_u16(dst: &mut u16, src: u16, efl: &mut Eflags) => bitops::bsr_u16_intel / bsr_u16_amd;
    bsr_u32(dst: &mut u32, src: u32, efl: &mut Eflags) => bitops::bsr_u32_intel / bsr_u32_amd;
    bsr_u64(dst: &mut u64, src: u64, efl: &mut Eflags) => bitops::bsr_u64_intel / bsr_u64_amd;
    tzcnt_u16(dst: &mut u16, src: u16, efl: &mut Eflags) => bitops::tzcnt_u16_intel / tzcnt_u16_amd;
    tzcnt_u32(dst: &mut u32, src: u32, efl: &mut Eflags) => bitops::tzcnt_u32_intel / tzcnt_u32_amd;
    tzcnt_u64(dst: &mut u64, src: u64, efl: &mut Eflags) => bitops::tzcnt_u64_intel / tzcnt_u64_amd;
    lzcnt_u16(dst: &mut u16, src: u16, efl: &mut Eflags) => bitops::lzcnt_u16_intel / lzcnt_u16_amd;
    lzcnt_u32(dst: &mut u32, src: u32, efl: &mut Eflags) => bitops::lzcnt_u32_intel / lzcnt_u32_amd;
    lzcnt_u64(dst: &mut u64, src: u64, efl: &mut Eflags) => bitops::lzcnt_u64_intel / lzcnt_u64_amd;

    shl_u8(dst: &mut u8, count: u8, efl: &mut Eflags) => shift::shl_u8_intel / shl_u8_amd;
    shl_u16(dst: &mut u16, count: u8, efl: &mut Eflags) => shift::shl_u16_intel / shl_u16_amd;
    shl_u32(dst: &mut u32, count: u8, efl: &mut Eflags) => shift::shl_u32_intel / shl_u32_amd;
    shl_u64(dst: &mut u64, count: u8, efl: &mut Eflags) => shift::shl_u64_intel / shl_u64_amd;
    shr_u8(dst: &mut u8, count: u8, efl: &mut Eflags) => shift::shr_u8_intel / shr_u8_amd;
    shr_u16(dst: &mut u16, count: u8, efl: &mut Eflags) => shift::shr_u16_intel / shr_u16_amd;
    shr_u32(dst: &mut u32, count: u8, efl: &mut Eflags) => shift::shr_u32_intel / shr_u32_amd;
    shr_u64(dst: &mut u64, count: u8, efl: &mut Eflags) => shift::shr_u64_intel / shr_u64_amd;
    sar_u8(dst: &mut u8, count: u8, efl: &mut Eflags) => shift::sar_u8_intel / sar_u8_amd;
    sar_u16(dst: &mut u16, count: u8, efl: &mut Eflags) => shift::sar_u16_intel / sar_u16_amd;
    sar_u32(dst: &mut u32, count: u8, efl: &mut Eflags) => shift::sar_u32_intel / sar_u32_amd;
    sar_u64(dst: &mut u64, count: u8, efl: &mut Eflags) => shift::sar_u64_intel / sar_u64_amd;
    rol_u8(dst: &mut u8, count: u8, efl: &mut Eflags) => shift::rol_u8_intel / rol_u8_amd;
    rol_u16(dst: &mut u16, count: u8, efl: &mut Eflags) => shift::rol_u16_intel / rol_u16_amd;
    rol_u32(dst: &mut u32, count: u8, efl: &mut Eflags) => shift::rol_u32_intel / rol_u32_amd;
    rol_u64(dst: &mut u64, count: u8, efl: &mut Eflags) => shift::rol_u64_intel / rol_u64_amd;
    ror_u8(dst: &mut u8, count: u8, efl: &mut Eflags) => shift::ror_u8_intel / ror_u8_amd;
    ror_u16(dst: &mut u16, count: u8, efl: &mut Eflags) => shift::ror_u16_intel / ror_u16_amd;
    ror_u32(dst: &mut u32, count: u8, efl: &mut Eflags) => shift::ror_u32_intel / ror_u32_amd;
    ror_u64(dst: &mut u64, count: u8, efl: &mut Eflags) => shift::ror_u64_intel / ror_u64_amd;
    rcl_u8(dst: &mut u8, count: u8, efl: &mut Eflags) => shift::rcl_u8_intel / rcl_u8_amd;
    rcl_u16(dst: &mut u16, count: u8, efl: &mut Eflags) => shift::rcl_u16_intel / rcl_u16_amd;
    rcl_u32(dst: &mut u32, count: u8, efl: &mut Eflags) => shift::rcl_u32_intel / rcl_u32_amd;
    rcl_u64(dst: &mut u64, count: u8, efl: &mut Eflags) => shift::rcl_u64_intel / rcl_u64_amd;
    rcr_u8(dst: &mut u8, count: u8, efl: &mut Eflags) => shift::rcr_u8_intel / rcr_u8_amd;
    rcr_u16(dst: &mut u16, count: u8, efl: &mut Eflags) => shift::rcr_u16_intel / rcr_u16_amd;
    rcr_u32(dst: &mut u32, count: u8, efl: &mut Eflags) => shift::rcr_u32_intel / rcr_u32_amd;
    rcr_u64(dst: &mut u64, count: u8, efl: &mut Eflags) => shift::rcr_u64_intel / rcr_u64_amd;

    shld_u16(dst: &mut u16, fill: u16, count: u8, efl: &mut Eflags) => shift::shld_u16_intel / shld_u16_amd;
    shld_u32(dst: &mut u32, fill: u32, count: u8, efl: &mut Eflags) => shift::shld_u32_intel / shld_u32_amd;
    shld_u64(dst: &mut u64, fill: u64, count: u8, efl: &mut Eflags) => shift::shld_u64_intel / shld_u64_amd;
    shrd_u16(dst: &mut u16, fill: u16, count: u8, efl: &mut Eflags) => shift::shrd_u16_intel / shrd_u16_amd;
    shrd_u32(dst: &mut u32, fill: u32, count: u8, efl: &mut Eflags) => shift::shrd_u32_intel / shrd_u32_amd;
    shrd_u64(dst: &mut u64, fill: u64, count: u8, efl: &mut Eflags) => shift::shrd_u64_intel / shrd_u64_amd;

    mul_u8(ax: &mut u16, src: u8, efl: &mut Eflags) => muldiv::mul_u8_intel / mul_u8_amd;
    mul_u16(lo: &mut u16, hi: &mut u16, src: u16, efl: &mut Eflags) => muldiv::mul_u16_intel / mul_u16_amd;
    mul_u32(lo: &mut u32, hi: &mut u32, src: u32, efl: &mut Eflags) => muldiv::mul_u32_intel / mul_u32_amd;
    mul_u64(lo: &mut u64, hi: &mut u64, src: u64, efl: &mut Eflags) => muldiv::mul_u64_intel / mul_u64_amd;
    imul_u8(ax: &mut u16, src: u8, efl: &mut Eflags) => muldiv::imul_u8_intel / imul_u8_amd;
    imul_u16(lo: &mut u16, hi: &mut u16, src: u16, efl: &mut Eflags) => muldiv::imul_u16_intel / imul_u16_amd;
    imul_u32(lo: &mut u32, hi: &mut u32, src: u32, efl: &mut Eflags) => muldiv::imul_u32_intel / imul_u32_amd;
    imul_u64(lo: &mut u64, hi: &mut u64, src: u64, efl: &mut Eflags) => muldiv::imul_u64_intel / imul_u64_amd;
    imul_two_u16(dst: &mut u16, src: u16, efl: &mut Eflags) => muldiv::imul_two_u16_intel / imul_two_u16_amd;
    imul_two_u32(dst: &mut u32, src: u32, efl: &mut Eflags) => muldiv::imul_two_u32_intel / imul_two_u32_amd;
    imul_two_u64(dst: &mut u64, src: u64, efl: &mut Eflags) => muldiv::imul_two_u64_intel / imul_two_u64_amd;

    div_u8(ax: &mut u16, divisor: u8, efl: &mut Eflags) -> Result<(), DivideError> => muldiv::div_u8_intel / div_u8_amd;
    div_u16(lo: &mut u16, hi: &mut u16, divisor: u16, efl: &mut Eflags) -> Result<(), DivideError> => muldiv::div_u16_intel / div_u16_amd;
    div_u32(lo: &mut u32, hi: &mut u32, divisor: u32, efl: &mut Eflags) -> Result<(), DivideError> => muldiv::div_u32_intel / div_u32_amd;
    div_u64(lo: &mut u64, hi: &mut u64, divisor: u64, efl: &mut Eflags) -> Result<(), DivideError> => muldiv::div_u64_intel / div_u64_amd;
    idiv_u8(ax: &mut u16, divisor: u8, efl: &mut Eflags) -> Result<(), DivideError> => muldiv::idiv_u8_intel / idiv_u8_amd;
    idiv_u16(lo: &mut u16, hi: &mut u16, divisor: u16, efl: &mut Eflags) -> Result<(), DivideError> => muldiv::idiv_u16_intel / idiv_u16_amd;
    idiv_u32(lo: &mut u32, hi: &mut u32, divisor: u32, efl: &mut Eflags) -> Result<(), DivideError> => muldiv::idiv_u32_intel / idiv_u32_amd;
    idiv_u64(lo: &mut u64, hi: &mut u64, divisor: u64, efl: &mut Eflags) -> Result<(), DivideError> => muldiv::idiv_u64_intel / idiv_u64_amd;
}
