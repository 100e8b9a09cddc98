//! Per-chip constant tables.
//!
//! Nothing here is algorithmic: addresses, bit positions and sentinel
//! values that the engine is parameterised with. Bring-up sequences that
//! use the clock and pin-mux registers belong to the firmware image.

/// TI Stellaris LM3S6965, the `lm3s6965evb` board under QEMU.
pub mod lm3s6965 {
    use crate::dispatch::{EntryState, PatternGate};
    use crate::probe::ProbeConfig;
    use crate::range::AddressRange;
    use crate::signal::{Pin, SignalPins};
    use crate::transport::{ReadyBit, UartBlock};

    pub const SYSCTL_RCGC1: usize = 0x400f_e104;
    pub const SYSCTL_RCGC2: usize = 0x400f_e108;
    pub const RCGC1_UART0: u32 = 1 << 0;
    pub const RCGC1_UART1: u32 = 1 << 1;
    pub const RCGC2_GPIOA: u32 = 1 << 0;
    pub const RCGC2_GPIOB: u32 = 1 << 1;
    pub const RCGC2_GPIOD: u32 = 1 << 3;

    // PL011 register offsets.
    pub const UART_DR: usize = 0x000;
    pub const UART_FR: usize = 0x018;
    pub const UART_IBRD: usize = 0x024;
    pub const UART_FBRD: usize = 0x028;
    pub const UART_LCRH: usize = 0x02c;
    pub const UART_CTL: usize = 0x030;

    pub const UART_FR_TXFF: u32 = 1 << 5;
    pub const UART_LCRH_WLEN_8: u32 = 0b11 << 5;
    pub const UART_CTL_UARTEN: u32 = 1 << 0;
    pub const UART_CTL_TXE: u32 = 1 << 8;

    /// 12 MHz / (16 * 115200) = 6 + 33/64.
    pub const BAUD_115200_IBRD: u32 = 6;
    pub const BAUD_115200_FBRD: u32 = 33;

    /// Dump output.
    pub const UART0: UartBlock = UartBlock::new(0x4000_c000, UART_DR, UART_FR);
    /// Diagnostic log output.
    pub const UART1: UartBlock = UartBlock::new(0x4000_d000, UART_DR, UART_FR);
    pub const UART_READY: ReadyBit<u32> = ReadyBit::clear_when_ready(UART_FR_TXFF);

    pub const GPIOA: usize = 0x4000_4000;
    pub const GPIOB: usize = 0x4000_5000;
    pub const GPIOD: usize = 0x4000_7000;

    /// `GPIODATA` with every address-mask bit set, i.e. plain read/write of all eight pins.
    pub const GPIO_DATA_ALL: usize = 0x3fc;
    pub const GPIO_DIR: usize = 0x400;
    pub const GPIO_AFSEL: usize = 0x420;
    pub const GPIO_DEN: usize = 0x51c;

    pub const UART0_RX: Pin = Pin::new(b'A', 0);
    pub const UART0_TX: Pin = Pin::new(b'A', 1);
    pub const UART1_RX: Pin = Pin::new(b'D', 2);
    pub const UART1_TX: Pin = Pin::new(b'D', 3);

    pub const TRIGGER: Pin = Pin::new(b'B', 0);
    pub const RESULT: Pin = Pin::new(b'B', 1);
    pub const CALIBRATION: Pin = Pin::new(b'B', 2);

    pub const RESERVED: &[Pin] = &[UART0_RX, UART0_TX, UART1_RX, UART1_TX];

    pub const SIGNAL_PINS: SignalPins =
        match SignalPins::new(TRIGGER, RESULT, CALIBRATION, RESERVED) {
            Ok(pins) => pins,
            Err(_) => panic!("conflicting signal pin assignment"),
        };

    pub const FLASH: AddressRange = AddressRange::exclusive(0x0000_0000, 0x0004_0000);
    pub const SRAM: AddressRange = AddressRange::exclusive(0x2000_0000, 0x2001_0000);

    /// Vector table of the application the probe images hand over to.
    pub const APP_BASE: usize = 0x0001_0000;

    /// Last 2 KiB flash page, laid out like the STM8 option area.
    pub const OPTION_PAGE: usize = 0x0003_f800;
    pub const SIGNATURE: usize = OPTION_PAGE;
    pub const BOOT_MODE: usize = OPTION_PAGE + 0x04;
    pub const UNLOCK_KEY: usize = OPTION_PAGE + 0x7e;

    pub const PROBE: ProbeConfig = ProbeConfig {
        signature: SIGNATURE,
        sentinels: &[0x82, 0xac],
        unlock_key: UNLOCK_KEY,
        magic: 0x55aa,
    };

    /// Erased page or an explicit request diverts into the probe.
    ///
    /// Board-specific: this chip has no option bytes, so the boot-mode cell
    /// and both patterns were picked for this board. They do not come from
    /// the STM8 images, which branch on the signature cell instead.
    pub const GATE: PatternGate = PatternGate::new(BOOT_MODE, &[0xff, 0xb0]);

    /// Flags clear, interrupts masked.
    pub const HANDOFF: EntryState = EntryState {
        apsr: 0,
        primask: 1,
    };
}

/// NXP LPC13xx, 32 KiB flash in 4 KiB sectors.
pub mod lpc13xx {
    use crate::range::AddressRange;
    use crate::transport::{ReadyBit, UartBlock};

    pub const UART_THR: usize = 0x00;
    pub const UART_LSR: usize = 0x14;
    pub const LSR_THRE: u32 = 1 << 5;

    pub const UART: UartBlock = UartBlock::new(0x4000_8000, UART_THR, UART_LSR);
    pub const UART_READY: ReadyBit<u32> = ReadyBit::set_when_ready(LSR_THRE);

    pub const SECTOR_0: AddressRange = AddressRange::inclusive(0x0000_0000, 0x0000_0fff);
    pub const SECTORS_2_TO_7: AddressRange = AddressRange::inclusive(0x0000_2000, 0x0000_7fff);

    /// Sector 1 holds the dumper itself and is left out.
    pub const DUMP: &[AddressRange] = &[SECTOR_0, SECTORS_2_TO_7];
}

/// ST STM8S/STM8AF, reference values from the 8-bit parts.
///
/// The STM8 core is big endian, so on silicon the unlock key reads as
/// `0x55aa` when `0x487e` holds `0x55` and `0x487f` holds `0xaa`.
pub mod stm8s {
    use crate::probe::ProbeConfig;
    use crate::range::AddressRange;
    use crate::signal::{Pin, SignalPins};
    use crate::transport::{ReadyBit, UartBlock};

    pub const CLK_CKDIVR: usize = 0x50c6;
    pub const CLK_PCKENR1: usize = 0x50c7;

    pub const UART2_SR: usize = 0x00;
    pub const UART2_DR: usize = 0x01;
    pub const UART2_BRR1: usize = 0x02;
    pub const UART2_BRR2: usize = 0x03;
    pub const UART2_CR2: usize = 0x05;
    pub const UART2_CR3: usize = 0x06;

    pub const UART_SR_TXE: u8 = 1 << 7;
    pub const UART_CR2_TEN: u8 = 1 << 3;
    pub const UART_CR3_STOP1: u8 = 1 << 4;
    pub const UART_CR3_STOP2: u8 = 1 << 5;

    /// 9600 baud at 16 MHz; BRR2 must be written before BRR1.
    pub const BAUD_9600_BRR2: u8 = 0x03;
    pub const BAUD_9600_BRR1: u8 = 0x68;

    pub const UART2: UartBlock = UartBlock::new(0x5240, UART2_DR, UART2_SR);
    pub const UART_READY: ReadyBit<u8> = ReadyBit::set_when_ready(UART_SR_TXE);

    pub const PD_ODR: usize = 0x500f;
    pub const PD_DDR: usize = 0x5011;
    pub const PD_CR1: usize = 0x5012;

    pub const UART_TX: Pin = Pin::new(b'D', 5);
    pub const UART_RX: Pin = Pin::new(b'D', 6);

    /// The trigger doubles as UART TX; the probe images never enable the UART.
    pub const TRIGGER: Pin = UART_TX;
    pub const RESULT: Pin = Pin::new(b'D', 7);
    pub const CALIBRATION: Pin = Pin::new(b'D', 4);

    pub const SIGNAL_PINS: SignalPins =
        match SignalPins::new(TRIGGER, RESULT, CALIBRATION, &[UART_RX]) {
            Ok(pins) => pins,
            Err(_) => panic!("conflicting signal pin assignment"),
        };

    pub const BOOT_ROM: AddressRange = AddressRange::exclusive(0x6000, 0x8000);

    pub const PROBE: ProbeConfig = ProbeConfig {
        signature: 0x8000,
        sentinels: &[0x82, 0xac],
        unlock_key: 0x487e,
        magic: 0x55aa,
    };

    /// `CC` at the hand-off: interrupt mask bits I1 and I0 set.
    pub const ENTRY_CC: u8 = 0x28;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::DumpPlan;

    #[test]
    fn lpc_dump_skips_sector_one() {
        let plan = DumpPlan::new(lpc13xx::DUMP);

        assert_eq!(plan.total_len(), 0x7000);
        assert_eq!(plan.locate(0x1000), Some(0x2000));
    }

    #[test]
    fn stm8_boot_rom_is_eight_kib() {
        assert_eq!(stm8s::BOOT_ROM.byte_len(), 0x2000);
        assert!(!stm8s::BOOT_ROM.contains(stm8s::PROBE.signature));
    }

    #[test]
    fn probe_cells_sit_in_the_option_page() {
        let page = crate::range::AddressRange::exclusive(
            lm3s6965::OPTION_PAGE,
            lm3s6965::OPTION_PAGE + 0x800,
        );

        assert!(page.contains(lm3s6965::PROBE.signature));
        assert!(page.contains(lm3s6965::PROBE.unlock_key + 1));
        assert!(page.contains(lm3s6965::GATE.cell()));
        assert_eq!(lm3s6965::PROBE.unlock_key % 2, 0);
        assert!(!page.contains(lm3s6965::APP_BASE));
    }

    #[test]
    fn result_and_calibration_lines_differ() {
        for pins in [lm3s6965::SIGNAL_PINS, stm8s::SIGNAL_PINS] {
            assert_ne!(pins.result(), pins.calibration());
            assert_ne!(pins.result(), pins.trigger());
        }
    }
}
