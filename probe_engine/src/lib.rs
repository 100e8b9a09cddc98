//! Target-resident dump and probe engine.
//!
//! Two independent pipelines live here, both free of any one chip's
//! register layout:
//!
//! - the range dumper walks address ranges and pushes every byte through a
//!   blocking [`ByteSink`](transport::ByteSink), producing a raw stream with
//!   no framing;
//! - the protection probe reads a signature cell and an unlock-key cell at
//!   boot and reports the outcome on a GPIO line, with an entry dispatcher
//!   in front of it deciding whether the probe runs at all.
//!
//! [`image`] strings the probe pieces together in the order the images run
//! them.
//!
//! Chip specifics (register addresses, pins, sentinel values) come from
//! [`profile`] tables. Hardware access goes through [`mmio::Reg`] and the
//! [`mmio::Memory`] trait so everything here can be exercised on a host
//! against simulated peripherals.

#![cfg_attr(not(test), no_std)]

pub mod dispatch;
pub mod dump;
pub mod image;
pub mod mmio;
pub mod probe;
pub mod profile;
pub mod range;
pub mod signal;
pub mod transport;

pub use dispatch::{DirectBranch, EntryState, PatternGate, Route, Trampoline};
pub use dump::{dump, DumpPlan};
pub use image::{ProbeImage, SignalLines};
pub use mmio::{Memory, Reg, SystemBus, Word};
pub use probe::{Probe, ProbeConfig, ProbeState, Verdict};
pub use range::{AddressRange, Bound, RangeError};
pub use signal::{Calibration, GpioLine, Pin, Role, SignalLine, SignalPins, WiringError};
pub use transport::{ByteSink, Polarity, ReadyBit, Transport, TxPeripheral, Uart, UartBlock};

#[cfg(test)]
pub(crate) mod testing;
