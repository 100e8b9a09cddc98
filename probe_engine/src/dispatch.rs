//! Entry dispatcher: the first fork after reset, and the glitch target.
//!
//! Two shapes exist. [`PatternGate`] reads one cell and diverts into the
//! probe when it holds an enter pattern. [`DirectBranch`] always branches
//! to the application with a hand-built register state; the probe sits
//! behind that branch and only runs if the branch itself is skipped.
//!
//! Neither shape logs or does any other work between the read and the
//! branch.

use crate::mmio::Memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Probe,
    Application,
}

/// Pattern-gated dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternGate {
    cell: usize,
    patterns: &'static [u8],
}

impl PatternGate {
    pub const fn new(cell: usize, patterns: &'static [u8]) -> Self {
        Self { cell, patterns }
    }

    pub const fn cell(&self) -> usize {
        self.cell
    }

    pub const fn patterns(&self) -> &'static [u8] {
        self.patterns
    }

    /// Reads the gating cell exactly once.
    #[inline(always)]
    pub fn route<M: Memory + ?Sized>(&self, memory: &M) -> Route {
        let value = memory.read_u8(self.cell);
        if self.patterns.contains(&value) {
            Route::Probe
        } else {
            Route::Application
        }
    }
}

/// Register state in place at the moment control reaches the application.
///
/// The working registers are zeroed in addition to what is listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryState {
    /// Condition flags (`N Z C V Q`) as written to `APSR`.
    pub apsr: u32,
    /// Interrupt mask, 1 = masked.
    pub primask: u32,
}

/// Target-specific control transfer.
///
/// An implementation zeroes the working registers, loads `state`, then
/// takes an unconditional branch over a fallback body to the application
/// label. It returns [`Route::Application`] when the branch was taken and
/// [`Route::Probe`] only when the fallback body executed, i.e. the branch
/// was skipped. The fallback must stay in the instruction stream: it is
/// never reached in normal operation and that is the point.
pub trait Trampoline {
    fn enter(&mut self, state: &EntryState) -> Route;
}

/// Direct-branch dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectBranch {
    state: EntryState,
}

impl DirectBranch {
    pub const fn new(state: EntryState) -> Self {
        Self { state }
    }

    pub const fn state(&self) -> &EntryState {
        &self.state
    }

    #[inline(always)]
    pub fn dispatch<T: Trampoline + ?Sized>(&self, trampoline: &mut T) -> Route {
        trampoline.enter(&self.state)
    }
}
