//! Boot-time readout-protection probe.
//!
//! Mirrors the decision the boot ROM takes before it lets a host near the
//! flash: a signature cell must hold one of the override sentinels and the
//! unlock-key cell must hold the magic halfword. Anything else means the
//! protection stands. The verdict goes out on the result line: raised for
//! [`Verdict::Enforced`], left low otherwise, so a missing edge after a
//! glitch is the interesting event.

use crate::mmio::Memory;
use crate::signal::SignalLine;

/// Where the override request lives and what it must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Byte cell holding the override signature.
    pub signature: usize,
    /// Values of the signature cell that count as an override request.
    pub sentinels: &'static [u8],
    /// Halfword cell holding the unlock key, read in native byte order.
    pub unlock_key: usize,
    pub magic: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Enforced,
    BypassCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Start,
    CheckingOverride,
    Enforced,
    Bypassed,
}

impl ProbeState {
    /// One transition. Terminal states map to themselves.
    pub fn advance<M: Memory + ?Sized>(self, config: &ProbeConfig, memory: &M) -> Self {
        match self {
            ProbeState::Start => ProbeState::CheckingOverride,
            ProbeState::CheckingOverride => {
                let signature = memory.read_u8(config.signature);
                if !config.sentinels.contains(&signature) {
                    // No override request: the key is never looked at.
                    return ProbeState::Enforced;
                }
                if memory.read_u16(config.unlock_key) == config.magic {
                    ProbeState::Bypassed
                } else {
                    ProbeState::Enforced
                }
            }
            terminal => terminal,
        }
    }

    pub const fn verdict(self) -> Option<Verdict> {
        match self {
            ProbeState::Enforced => Some(Verdict::Enforced),
            ProbeState::Bypassed => Some(Verdict::BypassCandidate),
            ProbeState::Start | ProbeState::CheckingOverride => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Probe {
    config: ProbeConfig,
}

impl Probe {
    pub const fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Runs the state machine from [`ProbeState::Start`] to a verdict.
    pub fn evaluate<M: Memory + ?Sized>(&self, memory: &M) -> Verdict {
        let mut state = ProbeState::Start;
        loop {
            if let Some(verdict) = state.verdict() {
                return verdict;
            }
            state = state.advance(&self.config, memory);
        }
    }

    /// Evaluates and reports on `result`, then returns so the caller can
    /// fall through to whatever follows the probe.
    pub fn run<M, L>(&self, memory: &M, result: &mut L) -> Verdict
    where
        M: Memory + ?Sized,
        L: SignalLine + ?Sized,
    {
        let verdict = self.evaluate(memory);
        if verdict == Verdict::Enforced {
            result.raise();
        }
        log::info!("readout protection: {:?}", verdict);
        verdict
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::testing::{SimLine, SimMemory};

    const SIGNATURE: usize = 0x8000;
    const UNLOCK_KEY: usize = 0x487e;

    const CONFIG: ProbeConfig = ProbeConfig {
        signature: SIGNATURE,
        sentinels: &[0x82, 0xac],
        unlock_key: UNLOCK_KEY,
        magic: 0x55aa,
    };

    fn memory(signature: u8, key: u16) -> SimMemory {
        let mut memory = SimMemory::filled(0x4000, 0x4100, 0x00);
        memory.poke(SIGNATURE, signature);
        memory.poke_u16(UNLOCK_KEY, key);
        memory
    }

    #[test_case(0x82, 0x55aa => Verdict::BypassCandidate; "sentinel a with magic")]
    #[test_case(0xac, 0x55aa => Verdict::BypassCandidate; "sentinel b with magic")]
    #[test_case(0x82, 0xaa55 => Verdict::Enforced; "sentinel a with swapped key")]
    #[test_case(0xac, 0x0000 => Verdict::Enforced; "sentinel b with blank key")]
    #[test_case(0x00, 0x55aa => Verdict::Enforced; "no sentinel")]
    #[test_case(0xff, 0x55aa => Verdict::Enforced; "erased signature")]
    fn decision_table(signature: u8, key: u16) -> Verdict {
        Probe::new(CONFIG).evaluate(&memory(signature, key))
    }

    #[test_case(0x82, 0x55aa, false; "bypass leaves line low")]
    #[test_case(0x82, 0x1234, true; "wrong key raises line")]
    #[test_case(0x00, 0x55aa, true; "no request raises line")]
    fn result_line_reports_enforcement(signature: u8, key: u16, raised: bool) {
        let mut line = SimLine::default();
        Probe::new(CONFIG).run(&memory(signature, key), &mut line);

        assert_eq!(line.is_raised(), raised);
        assert!(line.raises() <= 1);
    }

    #[test]
    fn key_is_not_read_without_a_sentinel() {
        let memory = memory(0x00, 0x55aa);
        Probe::new(CONFIG).evaluate(&memory);

        assert_eq!(memory.reads(), vec![SIGNATURE]);
    }

    #[test]
    fn key_is_read_after_a_sentinel() {
        let memory = memory(0xac, 0x0000);
        Probe::new(CONFIG).evaluate(&memory);

        assert_eq!(memory.reads(), vec![SIGNATURE, UNLOCK_KEY]);
    }

    #[test]
    fn states_advance_in_order() {
        let memory = memory(0x82, 0x55aa);

        let checking = ProbeState::Start.advance(&CONFIG, &memory);
        assert_eq!(checking, ProbeState::CheckingOverride);
        assert!(memory.reads().is_empty());

        let done = checking.advance(&CONFIG, &memory);
        assert_eq!(done, ProbeState::Bypassed);
        assert_eq!(done.advance(&CONFIG, &memory), ProbeState::Bypassed);
        assert_eq!(done.verdict(), Some(Verdict::BypassCandidate));
    }
}
