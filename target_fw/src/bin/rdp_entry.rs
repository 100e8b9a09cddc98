//! Readout-protection probe behind a direct-branch dispatcher.
//!
//! Control always branches straight to the application label with flags
//! cleared and interrupts masked. The probe sits behind that branch and
//! only runs when a glitch skips it.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;
use target_fw::board::Board;
use target_fw::trampoline::Thumb;
use target_fw::{config, diag};

#[entry]
fn main() -> ! {
    let Some(mut board) = Board::take() else {
        target_fw::idle()
    };
    diag::init(&mut board);

    let mut lines = board.signal_lines();
    let memory = board.memory();

    // SAFETY: nothing has enabled interrupts yet.
    let mut trampoline = unsafe { Thumb::new() };
    config::IMAGE.run_direct(&config::DIRECT_BRANCH, &mut trampoline, &memory, &mut lines);

    target_fw::continue_boot()
}
