//! Readout-protection probe behind a pattern-gated dispatcher.
//!
//! The trigger line goes high first; the glitch window is the boot-mode
//! read and the branch on it. When the boot-mode cell holds an enter
//! pattern the probe runs and raises the result line if protection held.

#![no_std]
#![no_main]

use cortex_m_rt::entry;
use panic_halt as _;
use target_fw::board::Board;
use target_fw::{config, diag};

#[entry]
fn main() -> ! {
    let Some(mut board) = Board::take() else {
        target_fw::idle()
    };
    diag::init(&mut board);

    let mut lines = board.signal_lines();
    let memory = board.memory();

    config::IMAGE.run_gated(&config::GATE, &memory, &mut lines);

    target_fw::continue_boot()
}
