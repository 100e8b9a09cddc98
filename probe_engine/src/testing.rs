//! Simulated memory, transmitter and signal line for host tests.

use std::cell::{Cell, RefCell};

use crate::mmio::Memory;
use crate::signal::SignalLine;
use crate::transport::{ByteSink, TxPeripheral};

/// A window of target memory that records every read.
pub struct SimMemory {
    base: usize,
    bytes: Vec<u8>,
    reads: RefCell<Vec<usize>>,
}

impl SimMemory {
    pub fn filled(base: usize, len: usize, fill: u8) -> Self {
        Self {
            base,
            bytes: vec![fill; len],
            reads: RefCell::new(Vec::new()),
        }
    }

    /// Contents derived from the address so misplaced bytes show up.
    pub fn patterned(base: usize, len: usize) -> Self {
        let mut memory = Self::filled(base, len, 0);
        for (i, byte) in memory.bytes.iter_mut().enumerate() {
            let addr = base + i;
            *byte = (addr ^ (addr >> 8) ^ 0x5a) as u8;
        }
        memory
    }

    pub fn poke(&mut self, addr: usize, value: u8) {
        self.bytes[addr - self.base] = value;
    }

    pub fn poke_u16(&mut self, addr: usize, value: u16) {
        let offset = addr - self.base;
        self.bytes[offset..offset + 2].copy_from_slice(&value.to_ne_bytes());
    }

    /// Contents without recording a read.
    pub fn byte(&self, addr: usize) -> u8 {
        self.bytes[addr - self.base]
    }

    pub fn reads(&self) -> Vec<usize> {
        self.reads.borrow().clone()
    }
}

impl Memory for SimMemory {
    fn read_u8(&self, addr: usize) -> u8 {
        self.reads.borrow_mut().push(addr);
        self.byte(addr)
    }

    fn read_u16(&self, addr: usize) -> u16 {
        self.reads.borrow_mut().push(addr);
        let offset = addr - self.base;
        u16::from_ne_bytes([self.bytes[offset], self.bytes[offset + 1]])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Poll(bool),
    Write(u8),
}

/// Transmitter that reports busy for `busy_polls` polls after every byte.
pub struct SimUart {
    busy_polls: usize,
    countdown: Cell<usize>,
    events: RefCell<Vec<Event>>,
}

impl SimUart {
    pub fn new(busy_polls: usize) -> Self {
        Self {
            busy_polls,
            countdown: Cell::new(busy_polls),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn written(&self) -> Vec<u8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Write(byte) => Some(*byte),
                Event::Poll(_) => None,
            })
            .collect()
    }
}

impl TxPeripheral for SimUart {
    fn ready(&self) -> bool {
        let left = self.countdown.get();
        let ready = left == 0;
        if !ready {
            self.countdown.set(left - 1);
        }
        self.events.borrow_mut().push(Event::Poll(ready));
        ready
    }

    fn write_byte(&self, byte: u8) {
        let mut events = self.events.borrow_mut();
        assert_eq!(
            events.last(),
            Some(&Event::Poll(true)),
            "byte written without a ready poll"
        );
        events.push(Event::Write(byte));
        self.countdown.set(self.busy_polls);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub bytes: Vec<u8>,
}

impl ByteSink for RecordingSink {
    fn transmit(&mut self, byte: u8) {
        self.bytes.push(byte);
    }
}

#[derive(Default)]
pub struct SimLine {
    raised: bool,
    raises: usize,
}

impl SimLine {
    pub fn raises(&self) -> usize {
        self.raises
    }
}

impl SignalLine for SimLine {
    fn raise(&mut self) {
        self.raised = true;
        self.raises += 1;
    }

    fn is_raised(&self) -> bool {
        self.raised
    }
}
