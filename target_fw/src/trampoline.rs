//! Thumb-2 implementation of the direct-branch hand-off.
//!
//! The whole transfer is one `asm!` block: interrupt mask, zeroed `r0`/`r1`,
//! flags, the unconditional branch and the fallback body it jumps over.
//! Keeping the fallback inside the block stops the compiler from proving
//! it dead and dropping it.

use core::arch::asm;

use probe_engine::{EntryState, Route, Trampoline};

pub struct Thumb {
    _private: (),
}

impl Thumb {
    /// # Safety
    ///
    /// Writes `PRIMASK` and `APSR` directly. Only for the reset path, before
    /// anything depends on interrupts.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Trampoline for Thumb {
    #[inline(always)]
    fn enter(&mut self, state: &EntryState) -> Route {
        let diverted: u32;

        // SAFETY: see `Thumb::new`. r0 and r1 are declared clobbered; the
        // flags are not preserved.
        unsafe {
            asm!(
                "msr PRIMASK, {primask}",
                "movs r0, #0",
                "movs r1, #0",
                "msr APSR_nzcvq, {apsr}",
                "b 2f",
                // Fallback: only runs when the branch above is skipped.
                "mov {diverted}, #1",
                "2:",
                "nop",
                primask = in(reg) state.primask,
                apsr = in(reg) state.apsr,
                diverted = inout(reg) 0u32 => diverted,
                out("r0") _,
                out("r1") _,
                options(nostack),
            );
        }

        if diverted == 0 {
            Route::Application
        } else {
            Route::Probe
        }
    }
}
