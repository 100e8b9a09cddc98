//! Board support shared by the LM3S6965 images.
//!
//! The images themselves are `dumper` (`src/main.rs`), `rdp_probe` and
//! `rdp_entry` (`src/bin/`). `handoff_check` exercises the `Thumb`
//! trampoline on the core and prints the outcome. They run on QEMU's lm3s6965evb machine as
//! well as on silicon.

#![no_std]

pub mod board;
pub mod config;
pub mod diag;
pub mod trampoline;

use cortex_m::asm;

/// Parks the core. Images end here and wait for the next power cycle.
pub fn idle() -> ! {
    loop {
        asm::nop();
    }
}

/// What follows the dispatcher: the application with `boot-app`, otherwise
/// [`idle`].
pub fn continue_boot() -> ! {
    #[cfg(feature = "boot-app")]
    {
        use probe_engine::profile::lm3s6965::APP_BASE;

        // SAFETY: APP_BASE holds a vector table (initial SP, reset vector)
        // written by whoever flashed the application.
        unsafe {
            let core = cortex_m::Peripherals::steal();
            core.SCB.vtor.write(APP_BASE as u32);
            asm::dsb();
            asm::isb();
            asm::bootload(APP_BASE as *const u32)
        }
    }

    #[cfg(not(feature = "boot-app"))]
    idle()
}
