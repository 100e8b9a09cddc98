//! Smoke check for the `Thumb` hand-off on the real core.
//!
//! Runs the trampoline once with the board's hand-off state and reports on
//! UART0 (QEMU's stdio). The branch must be taken and `PRIMASK` must be
//! left set:
//!
//! ```text
//! cargo run --bin handoff_check
//! handoff ok
//! ```

#![no_std]
#![no_main]

use core::fmt::Write;

use cortex_m::register::primask;
use cortex_m_rt::entry;
use panic_halt as _;
use probe_engine::profile::lm3s6965 as chip;
use probe_engine::{Route, Trampoline};
use target_fw::board::Board;
use target_fw::trampoline::Thumb;

#[entry]
fn main() -> ! {
    let Some(mut board) = Board::take() else {
        target_fw::idle()
    };
    let mut out = board.dump_uart();

    // SAFETY: nothing has enabled interrupts yet.
    let mut trampoline = unsafe { Thumb::new() };
    let route = trampoline.enter(&chip::HANDOFF);
    let masked = primask::read().is_inactive();

    let _ = if route == Route::Application && masked {
        write!(out, "handoff ok\r\n")
    } else {
        write!(out, "handoff FAILED: route {:?}, primask masked {}\r\n", route, masked)
    };

    target_fw::idle()
}
