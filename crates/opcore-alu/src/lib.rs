//! Integer ALU semantics: arithmetic/logic, bit manipulation, shifts and
//! rotates, multiply/divide, and their locked (atomic read-modify-write)
//! forms.
//!
//! Functions come in one flavor per operand width (`_u8`/`_u16`/`_u32`/
//! `_u64`) and mutate the destination in place; flags go through the
//! status-word codec in `opcore-flags`, which preserves every bit outside
//! the condition subset. Operations whose flag behavior the architecture
//! leaves implementation-defined ship `_intel`/`_amd` bodies plus a base
//! alias (Intel); see `dispatch` for the enum-tagged selection layer.

pub mod arith;
pub mod bitops;
pub mod dispatch;
pub mod locked;
pub mod muldiv;
pub mod shift;

pub use muldiv::DivideError;
pub use opcore_flags::{Eflags, Vendor};
