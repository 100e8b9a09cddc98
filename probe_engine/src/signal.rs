//! GPIO side channel read by the scope or logic analyzer.
//!
//! Three lines take part in a glitch run:
//!
//! - **trigger**: raised once at image start so the glitcher can time its
//!   pulse relative to the boot sequence;
//! - **result**: raised only when the probe concludes protection held;
//! - **calibration**: raised unconditionally in `always-success` builds to
//!   set up the fixture, never to be confused with the result line.
//!
//! A pin shared with a UART receiver cannot be used for any of them: the
//! RX line may float high after reset regardless of what the probe found.

use core::fmt;

use crate::mmio::{Reg, Word};

pub trait SignalLine {
    /// Drives the line high. Idempotent.
    fn raise(&mut self);

    fn is_raised(&self) -> bool;
}

/// One output bit in a port's output data register.
#[derive(Debug, Clone, Copy)]
pub struct GpioLine<T> {
    output: Reg<T>,
    mask: T,
}

impl<T: Word> GpioLine<T> {
    /// `output` is the port's output data register, the pin already
    /// configured as a push-pull output.
    pub const fn new(output: Reg<T>, mask: T) -> Self {
        Self { output, mask }
    }
}

impl<T: Word> SignalLine for GpioLine<T> {
    #[inline(always)]
    fn raise(&mut self) {
        self.output.set_bits(self.mask);
    }

    fn is_raised(&self) -> bool {
        self.output.any_set(self.mask)
    }
}

/// A GPIO pin named by port letter and index, e.g. `PD7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub port: u8,
    pub index: u8,
}

impl Pin {
    pub const fn new(port: u8, index: u8) -> Self {
        Self { port, index }
    }

    /// Bit of this pin within its port registers.
    pub const fn mask(&self) -> u32 {
        1 << self.index
    }

    const fn same_as(&self, other: &Pin) -> bool {
        self.port == other.port && self.index == other.index
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port as char, self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Trigger,
    Result,
    Calibration,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Trigger => "trigger",
            Role::Result => "result",
            Role::Calibration => "calibration",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WiringError {
    #[error("{first} and {second} lines share {pin}")]
    SharedPin { pin: Pin, first: Role, second: Role },
    #[error("{role} line on {pin} is reserved for another function")]
    Reserved { pin: Pin, role: Role },
}

/// Pin assignment of the three signal lines, checked for conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPins {
    trigger: Pin,
    result: Pin,
    calibration: Pin,
}

impl SignalPins {
    /// Every line must be on its own pin and none may be in `reserved`
    /// (UART RX pins and the like).
    pub const fn new(
        trigger: Pin,
        result: Pin,
        calibration: Pin,
        reserved: &[Pin],
    ) -> Result<Self, WiringError> {
        let lines = [
            (Role::Trigger, trigger),
            (Role::Result, result),
            (Role::Calibration, calibration),
        ];

        let mut i = 0;
        while i < lines.len() {
            let (role, pin) = lines[i];

            let mut j = i + 1;
            while j < lines.len() {
                if pin.same_as(&lines[j].1) {
                    return Err(WiringError::SharedPin {
                        pin,
                        first: role,
                        second: lines[j].0,
                    });
                }
                j += 1;
            }

            let mut k = 0;
            while k < reserved.len() {
                if pin.same_as(&reserved[k]) {
                    return Err(WiringError::Reserved { pin, role });
                }
                k += 1;
            }

            i += 1;
        }

        Ok(Self {
            trigger,
            result,
            calibration,
        })
    }

    pub const fn trigger(&self) -> Pin {
        self.trigger
    }

    pub const fn result(&self) -> Pin {
        self.result
    }

    pub const fn calibration(&self) -> Pin {
        self.calibration
    }
}

/// Fixture calibration mode, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calibration {
    Off,
    /// Raise the calibration line after every probe run.
    AlwaysSuccess,
}

impl Calibration {
    pub const fn from_flag(always_success: bool) -> Self {
        if always_success {
            Calibration::AlwaysSuccess
        } else {
            Calibration::Off
        }
    }

    /// Runs after the probe, so it never shadows the probe's own line.
    pub fn apply<L: SignalLine + ?Sized>(self, line: &mut L) {
        if self == Calibration::AlwaysSuccess {
            line.raise();
        }
    }
}
