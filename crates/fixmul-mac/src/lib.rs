//! Register-file interface to the multiply-accumulate coprocessor.
//!
//! The unit exposes 64 memory-mapped 32-bit slots. Slots 0..=62 accept one
//! packed operand-pair write each; every write triggers one multiply-
//! accumulate step as a side effect. Slot 63 holds the running 16.16 sum.
//! Reading slot 63 drains it: the value is returned and the accumulator
//! restarts from zero. The hardware also clears the accumulator on its own
//! at each full cycle of 63 operand writes, so software must drain before
//! issuing the 64th write of a cycle or the partial sum is lost.

#![no_std]

mod soft;

#[cfg(target_arch = "riscv32")]
mod mmio;

pub use soft::SoftMac;

#[cfg(target_arch = "riscv32")]
pub use mmio::{MmioMac, MAC_BASE};

/// Total addressable register slots.
pub const NUM_SLOTS: usize = 64;

/// Operand slots: 0..=62 each accept one packed write per MAC step.
pub const OPERAND_SLOTS: usize = 63;

/// The accumulator slot, drained by reading it.
pub const ACCUM_SLOT: usize = 63;

/// The coprocessor register file, as seen by the offload engine.
///
/// Writes trigger computation; reads consume the accumulated result. The
/// implicit accumulator clear after [`OPERAND_SLOTS`] undrained writes is
/// assumed, not re-verified by software.
pub trait MacRegisterFile {
    /// Write one packed operand pair (see [`codec::pack_operands`]) to an
    /// operand slot, triggering one multiply-accumulate step.
    fn write(&mut self, slot: usize, packed: u32);

    /// Drain slot 63: return the running 16.16 sum and restart it at zero.
    fn read_accumulator(&mut self) -> u32;
}
