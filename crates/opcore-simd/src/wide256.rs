//! 256-bit forms as `[u128; 2]` pairs. The lane-independent operations
//! delegate per 128-bit half; the half boundary is never crossed, so
//! shuffles, packs and the byte-align behave half-by-half the way the
//! wide register file does.

use crate::fp::{self, CmpPredicate};
use crate::{int, shuffle, XmmFault};

macro_rules! wide_binop {
    ($($path:ident :: $name:ident;)*) => {
        $(
            pub fn $name(dst: &mut [u128; 2], src: [u128; 2]) {
                $path::$name(&mut dst[0], src[0]);
                $path::$name(&mut dst[1], src[1]);
            }
        )*
    };
}

wide_binop! {
    int::paddb; int::paddw; int::paddd; int::paddq;
    int::psubb; int::psubw; int::psubd; int::psubq;
    int::paddsb; int::paddsw; int::paddusb; int::paddusw;
    int::psubsb; int::psubsw; int::psubusb; int::psubusw;
    int::pavgb; int::pavgw;
    int::pminub; int::pmaxub; int::pminsb; int::pmaxsb;
    int::pminsw; int::pmaxsw; int::pminuw; int::pmaxuw;
    int::pminsd; int::pmaxsd; int::pminud; int::pmaxud;
    int::pmullw; int::pmulhw; int::pmulhuw; int::pmulhrsw; int::pmulld;
    int::pmuludq; int::pmuldq; int::pmaddwd; int::pmaddubsw;
    int::pcmpeqb; int::pcmpeqw; int::pcmpeqd; int::pcmpeqq;
    int::pcmpgtb; int::pcmpgtw; int::pcmpgtd; int::pcmpgtq;
    int::psignb; int::psignw; int::psignd;
    int::psadbw;
    int::phaddw; int::phsubw; int::phaddsw; int::phsubsw;
    int::phaddd; int::phsubd;
    int::pand; int::pandn; int::por; int::pxor;
    shuffle::pshufb;
    shuffle::punpcklbw; shuffle::punpcklwd; shuffle::punpckldq; shuffle::punpcklqdq;
    shuffle::punpckhbw; shuffle::punpckhwd; shuffle::punpckhdq; shuffle::punpckhqdq;
    shuffle::packsswb; shuffle::packssdw; shuffle::packuswb; shuffle::packusdw;
}

macro_rules! wide_unop {
    ($($path:ident :: $name:ident;)*) => {
        $(
            pub fn $name(dst: &mut [u128; 2], src: [u128; 2]) {
                $path::$name(&mut dst[0], src[0]);
                $path::$name(&mut dst[1], src[1]);
            }
        )*
    };
}

wide_unop! {
    int::pabsb; int::pabsw; int::pabsd;
}

macro_rules! wide_shift {
    ($($name:ident;)*) => {
        $(
            pub fn $name(dst: &mut [u128; 2], count: u64) {
                int::$name(&mut dst[0], count);
                int::$name(&mut dst[1], count);
            }
        )*
    };
}

wide_shift! {
    psllw; psrlw; psraw;
    pslld; psrld; psrad;
    psllq; psrlq;
}

pub fn pslldq(dst: &mut [u128; 2], imm: u8) {
    int::pslldq(&mut dst[0], imm);
    int::pslldq(&mut dst[1], imm);
}

pub fn psrldq(dst: &mut [u128; 2], imm: u8) {
    int::psrldq(&mut dst[0], imm);
    int::psrldq(&mut dst[1], imm);
}

macro_rules! wide_imm {
    ($($path:ident :: $name:ident;)*) => {
        $(
            pub fn $name(dst: &mut [u128; 2], src: [u128; 2], imm: u8) {
                $path::$name(&mut dst[0], src[0], imm);
                $path::$name(&mut dst[1], src[1], imm);
            }
        )*
    };
}

wide_imm! {
    shuffle::pshufd; shuffle::pshuflw; shuffle::pshufhw;
    shuffle::palignr;
    shuffle::shufps; shuffle::shufpd;
}

pub fn pmovmskb(src: [u128; 2]) -> u32 {
    int::pmovmskb(src[0]) | int::pmovmskb(src[1]) << 16
}

/// Runs both halves before deciding the fault, so the sticky bits of
/// the second half are recorded even when the first one traps; the
/// destination is written only if neither half faulted.
fn fp_halves(
    mxcsr: &mut u32,
    dst: &mut [u128; 2],
    src: [u128; 2],
    f: impl Fn(&mut u32, &mut u128, u128) -> Result<(), XmmFault>,
) -> Result<(), XmmFault> {
    let mut out = *dst;
    let mut ok = true;
    for i in 0..2 {
        let mut status = *mxcsr;
        ok &= f(&mut status, &mut out[i], src[i]).is_ok();
        *mxcsr |= status & 0x3F;
    }
    if !ok {
        return Err(XmmFault);
    }
    *dst = out;
    Ok(())
}

macro_rules! wide_fp {
    ($($name:ident;)*) => {
        $(
            pub fn $name(
                mxcsr: &mut u32,
                dst: &mut [u128; 2],
                src: [u128; 2],
            ) -> Result<(), XmmFault> {
                fp_halves(mxcsr, dst, src, fp::$name)
            }
        )*
    };
}

wide_fp! {
    addps; subps; mulps; divps; minps; maxps; sqrtps;
    addpd; subpd; mulpd; divpd; minpd; maxpd; sqrtpd;
    cvtdq2ps; cvtps2dq; cvttps2dq;
}

pub fn cmpps(
    mxcsr: &mut u32,
    dst: &mut [u128; 2],
    src: [u128; 2],
    pred: CmpPredicate,
) -> Result<(), XmmFault> {
    fp_halves(mxcsr, dst, src, |m, d, s| fp::cmpps(m, d, s, pred))
}

pub fn cmppd(
    mxcsr: &mut u32,
    dst: &mut [u128; 2],
    src: [u128; 2],
    pred: CmpPredicate,
) -> Result<(), XmmFault> {
    fp_halves(mxcsr, dst, src, |m, d, s| fp::cmppd(m, d, s, pred))
}
