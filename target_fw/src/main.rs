//! Memory-to-serial dumper for the LM3S6965.
//!
//! Streams `config::DUMP_RANGES` out of UART0 as raw bytes, in address
//! order, then idles. The host has to read exactly the sum of the range
//! lengths; nothing on the wire marks the end.

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

    let mut uart = board.dump_uart();
    let memory = board.memory();
    probe_engine::dump(config::DUMP_RANGES, &memory, &mut uart);

    target_fw::idle()
}
