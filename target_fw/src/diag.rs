//! `log` backend on UART1.
//!
//! UART0 carries the raw dump, so diagnostics never go there.

#[cfg(feature = "diag-log")]
mod imp {
    use core::fmt::Write;

    use log::{Level, LevelFilter, Log, Metadata, Record};
    use probe_engine::profile::lm3s6965 as chip;
    use probe_engine::{Transport, Uart};

    use crate::board::Board;

    struct UartLogger {
        uart: Uart<u32>,
    }

    impl Log for UartLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= Level::Info
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let mut out = Transport::new(self.uart);
            let _ = write!(
                out,
                "[{} {}] {}\r\n",
                record.level(),
                record.target(),
                record.args()
            );
        }

        fn flush(&self) {}
    }

    static LOGGER: UartLogger = UartLogger {
        // SAFETY: UART1 is only driven through this logger once `init` ran.
        uart: unsafe { Uart::new(chip::UART1, chip::UART_READY) },
    };

    pub fn init(board: &mut Board) {
        board.diag_uart();
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Info);
        }
    }
}

#[cfg(not(feature = "diag-log"))]
mod imp {
    use crate::board::Board;

    pub fn init(_board: &mut Board) {}
}

/// Brings up UART1 and installs the logger. Without `diag-log` the UART
/// stays off and log records are discarded.
pub use imp::init;
