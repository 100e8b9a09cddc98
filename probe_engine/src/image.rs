//! Boot sequence of the protection-probe images.
//!
//! Trigger, dispatcher, probe on the probe route, calibration. The images
//! call into here and only add bring-up before and the hand-off after.

use crate::dispatch::{DirectBranch, PatternGate, Route, Trampoline};
use crate::mmio::Memory;
use crate::probe::{Probe, Verdict};
use crate::signal::{Calibration, SignalLine};

/// The three side-channel lines of a probe image.
#[derive(Debug)]
pub struct SignalLines<L> {
    pub trigger: L,
    pub result: L,
    pub calibration: L,
}

#[derive(Debug, Clone, Copy)]
pub struct ProbeImage {
    probe: Probe,
    calibration: Calibration,
}

impl ProbeImage {
    pub const fn new(probe: Probe, calibration: Calibration) -> Self {
        Self { probe, calibration }
    }

    /// Pattern-gated image. Returns the verdict when the probe ran.
    pub fn run_gated<M, L>(
        &self,
        gate: &PatternGate,
        memory: &M,
        lines: &mut SignalLines<L>,
    ) -> Option<Verdict>
    where
        M: Memory + ?Sized,
        L: SignalLine,
    {
        lines.trigger.raise();

        let route = gate.route(memory);
        let verdict = self.follow(route, memory, lines);
        if route == Route::Application {
            log::info!("boot mode not requested, skipping probe");
        }
        verdict
    }

    /// Direct-branch image. The probe only runs when `trampoline` reports
    /// that its branch was skipped.
    pub fn run_direct<M, L, T>(
        &self,
        branch: &DirectBranch,
        trampoline: &mut T,
        memory: &M,
        lines: &mut SignalLines<L>,
    ) -> Option<Verdict>
    where
        M: Memory + ?Sized,
        L: SignalLine,
        T: Trampoline + ?Sized,
    {
        lines.trigger.raise();

        let route = branch.dispatch(trampoline);
        if route == Route::Probe {
            log::info!("hand-off branch skipped");
        }
        self.follow(route, memory, lines)
    }

    fn follow<M, L>(&self, route: Route, memory: &M, lines: &mut SignalLines<L>) -> Option<Verdict>
    where
        M: Memory + ?Sized,
        L: SignalLine,
    {
        let verdict = match route {
            Route::Probe => Some(self.probe.run(memory, &mut lines.result)),
            Route::Application => None,
        };
        self.calibration.apply(&mut lines.calibration);
        verdict
    }
}
