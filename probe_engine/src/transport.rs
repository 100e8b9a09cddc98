//! Byte-sink transport: one byte out, blocking until the peripheral takes it.
//!
//! There is no timeout anywhere on this path. A transmitter that never
//! reports ready stalls the image forever, which the host observes as the
//! stream stopping. Giving up instead would silently truncate a dump.

use core::fmt;

use crate::mmio::{Reg, Word};

/// The two operations a transmitter exposes to the engine.
pub trait TxPeripheral {
    /// `true` once the data register can accept another byte.
    fn ready(&self) -> bool;

    /// Hands one byte to the data register. Only called after [`ready`](Self::ready).
    fn write_byte(&self, byte: u8);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// The bit reads 1 when a byte can be written (STM8 `TXE`, 16550 `THRE`).
    SetWhenReady,
    /// The bit reads 1 while the transmitter is full (PL011 `TXFF`).
    ClearWhenReady,
}

/// Location and meaning of the transmit-ready flag in a status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyBit<T> {
    mask: T,
    polarity: Polarity,
}

impl<T: Word> ReadyBit<T> {
    pub const fn set_when_ready(mask: T) -> Self {
        Self {
            mask,
            polarity: Polarity::SetWhenReady,
        }
    }

    pub const fn clear_when_ready(mask: T) -> Self {
        Self {
            mask,
            polarity: Polarity::ClearWhenReady,
        }
    }

    pub fn is_ready(&self, status: T) -> bool {
        let set = status & self.mask != T::ZERO;
        match self.polarity {
            Polarity::SetWhenReady => set,
            Polarity::ClearWhenReady => !set,
        }
    }
}

/// Register layout of one UART instance: a base address and the offsets
/// of its transmit-data and status registers.
///
/// Both registers are derived from the same base so a handle can never pair
/// the data register of one instance with the status of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartBlock {
    pub base: usize,
    pub data: usize,
    pub status: usize,
}

impl UartBlock {
    pub const fn new(base: usize, data: usize, status: usize) -> Self {
        Self { base, data, status }
    }
}

/// Memory-mapped transmitter.
#[derive(Debug, Clone, Copy)]
pub struct Uart<T> {
    data: Reg<T>,
    status: Reg<T>,
    ready: ReadyBit<T>,
}

impl<T: Word> Uart<T> {
    /// # Safety
    ///
    /// `block` must describe a real UART instance on the running target and
    /// no other code may drive its transmitter while this handle is in use.
    pub const unsafe fn new(block: UartBlock, ready: ReadyBit<T>) -> Self {
        Self {
            data: Reg::offset(block.base, block.data),
            status: Reg::offset(block.base, block.status),
            ready,
        }
    }
}

impl<T: Word> TxPeripheral for Uart<T> {
    #[inline(always)]
    fn ready(&self) -> bool {
        self.ready.is_ready(self.status.read())
    }

    #[inline(always)]
    fn write_byte(&self, byte: u8) {
        self.data.write(T::from_byte(byte));
    }
}

/// Anything that accepts a stream of bytes in call order.
pub trait ByteSink {
    fn transmit(&mut self, byte: u8);

    fn transmit_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.transmit(byte);
        }
    }
}

/// Polling transport over a [`TxPeripheral`]: spin on ready, write, return.
#[derive(Debug)]
pub struct Transport<P> {
    peripheral: P,
}

impl<P: TxPeripheral> Transport<P> {
    pub const fn new(peripheral: P) -> Self {
        Self { peripheral }
    }

    pub fn peripheral(&self) -> &P {
        &self.peripheral
    }

    pub fn into_inner(self) -> P {
        self.peripheral
    }
}

impl<P: TxPeripheral> ByteSink for Transport<P> {
    #[inline]
    fn transmit(&mut self, byte: u8) {
        while !self.peripheral.ready() {
            core::hint::spin_loop();
        }
        self.peripheral.write_byte(byte);
    }
}

impl<P: TxPeripheral> fmt::Write for Transport<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.transmit_all(s.as_bytes());
        Ok(())
    }
}
