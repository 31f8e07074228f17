//! Architectural operation library: pure semantic functions for x86
//! instructions, one family per unit.
//!
//! - [`flags`]: the EFLAGS condition-bit codec shared by the integer ops.
//! - [`alu`]: integer arithmetic/logic, bit manipulation, shifts and
//!   rotates, multiply/divide, locked forms, and the vendor dispatch
//!   layer for the operations whose flag behavior differs between Intel
//!   and AMD parts.
//! - [`x87`]: 80-bit extended-precision floating point with the full
//!   legacy encoding space, driven by FCW/FSW images.
//! - [`simd`]: MMX/XMM packed integer and MXCSR-driven packed float
//!   semantics, plus the AES round primitives and CRC-32C.
//!
//! Every function is a deterministic value transform: operands and a
//! status word in, result and updated status word out. Nothing here
//! decodes instructions, touches memory (the locked forms take the cell
//! as an `&Atomic*`), or holds state across calls.

pub use opcore_alu as alu;
pub use opcore_flags as flags;
pub use opcore_simd as simd;
pub use opcore_x87 as x87;

pub use opcore_alu::DivideError;
pub use opcore_flags::{Eflags, Vendor};
pub use opcore_simd::XmmFault;
pub use opcore_x87::{Class, Fp80};
