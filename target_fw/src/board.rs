//! LM3S6965 bring-up: clock gating, pin muxing and the UART line settings.
//!
//! None of this is part of the dump or probe logic. It only gets the
//! peripherals into the state the engine expects and hands out typed
//! handles.

use core::sync::atomic::{AtomicBool, Ordering};

use probe_engine::profile::lm3s6965 as chip;
use probe_engine::{GpioLine, Reg, SignalLines, SystemBus, Transport, Uart, UartBlock};

static TAKEN: AtomicBool = AtomicBool::new(false);

pub type Line = GpioLine<u32>;

// All three side-channel lines share port B's data register.
const _: () = {
    let pins = chip::SIGNAL_PINS;
    assert!(pins.trigger().port == b'B');
    assert!(pins.result().port == b'B');
    assert!(pins.calibration().port == b'B');
};

/// Exclusive access to the peripherals the images use.
pub struct Board {
    _private: (),
}

impl Board {
    /// Returns the board once; later calls get `None`.
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self { _private: () })
        }
    }

    /// Read-only view of flash and SRAM for the dumper and the probe.
    pub fn memory(&self) -> SystemBus {
        // SAFETY: the images only read the flash and SRAM ranges from
        // `chip`, which are always mapped.
        unsafe { SystemBus::new() }
    }

    /// UART0 on PA0/PA1, 8N1 at 115200 baud: the dump output.
    pub fn dump_uart(&mut self) -> Transport<Uart<u32>> {
        // SAFETY: UART0 and port A belong to this board handle only.
        unsafe {
            enable_clocks(chip::RCGC1_UART0, chip::RCGC2_GPIOA);
            mux_uart_pins(
                chip::GPIOA,
                chip::UART0_RX.mask() | chip::UART0_TX.mask(),
            );
            Transport::new(uart(chip::UART0))
        }
    }

    /// UART1 on PD2/PD3, 8N1 at 115200 baud: diagnostics only.
    pub fn diag_uart(&mut self) -> Uart<u32> {
        // SAFETY: UART1 and port D belong to this board handle only.
        unsafe {
            enable_clocks(chip::RCGC1_UART1, chip::RCGC2_GPIOD);
            mux_uart_pins(
                chip::GPIOD,
                chip::UART1_RX.mask() | chip::UART1_TX.mask(),
            );
            uart(chip::UART1)
        }
    }

    /// Port B pins as push-pull outputs, driven low.
    pub fn signal_lines(&mut self) -> SignalLines<Line> {
        let pins = chip::SIGNAL_PINS;
        let mask = pins.trigger().mask() | pins.result().mask() | pins.calibration().mask();

        // SAFETY: port B belongs to this board handle only.
        unsafe {
            enable_clocks(0, chip::RCGC2_GPIOB);
            let data = Reg::<u32>::offset(chip::GPIOB, chip::GPIO_DATA_ALL);
            data.clear_bits(mask);
            Reg::<u32>::offset(chip::GPIOB, chip::GPIO_DIR).set_bits(mask);
            Reg::<u32>::offset(chip::GPIOB, chip::GPIO_DEN).set_bits(mask);

            SignalLines {
                trigger: GpioLine::new(data, pins.trigger().mask()),
                result: GpioLine::new(data, pins.result().mask()),
                calibration: GpioLine::new(data, pins.calibration().mask()),
            }
        }
    }
}

unsafe fn enable_clocks(rcgc1: u32, rcgc2: u32) {
    let gate1 = Reg::<u32>::at(chip::SYSCTL_RCGC1);
    let gate2 = Reg::<u32>::at(chip::SYSCTL_RCGC2);
    gate1.set_bits(rcgc1);
    gate2.set_bits(rcgc2);
    // Gated peripherals need a few cycles before their registers respond.
    let _ = gate2.read();
    cortex_m::asm::nop();
    cortex_m::asm::nop();
}

unsafe fn mux_uart_pins(port: usize, mask: u32) {
    Reg::<u32>::offset(port, chip::GPIO_AFSEL).set_bits(mask);
    Reg::<u32>::offset(port, chip::GPIO_DEN).set_bits(mask);
}

unsafe fn uart(block: UartBlock) -> Uart<u32> {
    let ctl = Reg::<u32>::offset(block.base, chip::UART_CTL);
    ctl.write(0);
    Reg::<u32>::offset(block.base, chip::UART_IBRD).write(chip::BAUD_115200_IBRD);
    Reg::<u32>::offset(block.base, chip::UART_FBRD).write(chip::BAUD_115200_FBRD);
    // LCRH latches the divisors; 8 data bits, no parity, one stop bit, no FIFO.
    Reg::<u32>::offset(block.base, chip::UART_LCRH).write(chip::UART_LCRH_WLEN_8);
    ctl.write(chip::UART_CTL_UARTEN | chip::UART_CTL_TXE);

    Uart::new(block, chip::UART_READY)
}
