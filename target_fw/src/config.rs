//! What the images do, fixed at build time.

use probe_engine::profile::lm3s6965 as chip;
use probe_engine::{AddressRange, Calibration, DirectBranch, PatternGate, Probe, ProbeImage};

/// The probe image in the first 64 KiB of flash, then the option page.
/// The application area in between is skipped.
pub const DUMP_RANGES: &[AddressRange] = &[
    AddressRange::exclusive(0x0000_0000, chip::APP_BASE),
    AddressRange::inclusive(chip::OPTION_PAGE, chip::OPTION_PAGE + 0x7ff),
];

pub const PROBE: Probe = Probe::new(chip::PROBE);

pub const GATE: PatternGate = chip::GATE;

pub const DIRECT_BRANCH: DirectBranch = DirectBranch::new(chip::HANDOFF);

pub const CALIBRATION: Calibration = Calibration::from_flag(cfg!(feature = "always-success"));

pub const IMAGE: ProbeImage = ProbeImage::new(PROBE, CALIBRATION);
