//! Range dumper: memory out of a byte sink, in address order.
//!
//! The output is a raw stream. There is no header, length, checksum or
//! acknowledgement, so the receiving side has to know how many bytes to
//! expect; [`DumpPlan`] answers that and maps stream offsets back to
//! addresses.

use crate::mmio::Memory;
use crate::range::AddressRange;
use crate::transport::ByteSink;

/// Sends every byte of every range, ranges in slice order and addresses in
/// increasing order within each range.
///
/// Returns once the last byte has been handed to the sink. Images stop
/// there; nothing is retried and nothing is skipped.
pub fn dump<M, S>(ranges: &[AddressRange], memory: &M, sink: &mut S)
where
    M: Memory + ?Sized,
    S: ByteSink + ?Sized,
{
    log::info!(
        "dumping {} bytes from {} ranges",
        DumpPlan::new(ranges).total_len(),
        ranges.len()
    );

    for range in ranges {
        log::debug!(
            "range {:#010x}..{:#010x} ({:?}), {} bytes",
            range.start(),
            range.end(),
            range.bound(),
            range.byte_len()
        );
        for addr in range.addresses() {
            sink.transmit(memory.read_u8(addr));
        }
    }

    log::info!("dump complete");
}

/// Host-side view of what a dump with a given range list produces.
#[derive(Debug, Clone, Copy)]
pub struct DumpPlan<'a> {
    ranges: &'a [AddressRange],
}

impl<'a> DumpPlan<'a> {
    pub const fn new(ranges: &'a [AddressRange]) -> Self {
        Self { ranges }
    }

    pub const fn ranges(&self) -> &'a [AddressRange] {
        self.ranges
    }

    /// Bytes on the wire for a full pass: the sum of all range lengths.
    /// Summed in `u128` so a list covering the whole address space fits.
    pub const fn total_len(&self) -> u128 {
        let mut total = 0;
        let mut i = 0;
        while i < self.ranges.len() {
            total += self.ranges[i].byte_len();
            i += 1;
        }
        total
    }

    /// The address that produced the byte at `offset` in the stream.
    pub fn locate(&self, offset: u128) -> Option<usize> {
        let mut remaining = offset;
        for range in self.ranges {
            let len = range.byte_len();
            if remaining < len {
                return Some(range.start() + remaining as usize);
            }
            remaining -= len;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::{RecordingSink, SimMemory, SimUart};
    use crate::transport::Transport;

    #[test]
    fn ranges_are_concatenated_in_list_order() {
        let memory = SimMemory::patterned(0x0000, 0x100);
        let ranges = [
            AddressRange::inclusive(0x80, 0x83),
            AddressRange::exclusive(0x10, 0x12),
        ];
        let mut sink = RecordingSink::default();

        dump(&ranges, &memory, &mut sink);

        let expected: Vec<u8> = [0x80, 0x81, 0x82, 0x83, 0x10, 0x11]
            .iter()
            .map(|&addr| memory.byte(addr))
            .collect();
        assert_eq!(sink.bytes, expected);
    }

    #[test]
    fn every_address_is_read_once_in_order() {
        let memory = SimMemory::patterned(0x2000, 0x40);
        let ranges = [
            AddressRange::exclusive(0x2000, 0x2004),
            AddressRange::inclusive(0x2020, 0x2021),
        ];

        dump(&ranges, &memory, &mut RecordingSink::default());

        assert_eq!(
            memory.reads(),
            vec![0x2000, 0x2001, 0x2002, 0x2003, 0x2020, 0x2021]
        );
    }

    #[test]
    fn empty_range_contributes_nothing() {
        let memory = SimMemory::patterned(0, 0x10);
        let ranges = [
            AddressRange::exclusive(0x4, 0x4),
            AddressRange::inclusive(0x4, 0x4),
        ];
        let mut sink = RecordingSink::default();

        dump(&ranges, &memory, &mut sink);

        assert_eq!(sink.bytes, vec![memory.byte(0x4)]);
    }

    #[test]
    fn two_passes_are_identical() {
        let memory = SimMemory::patterned(0, 0x200);
        let ranges = [
            AddressRange::inclusive(0x000, 0x0ff),
            AddressRange::inclusive(0x180, 0x1ff),
        ];

        let mut first = RecordingSink::default();
        let mut second = RecordingSink::default();
        dump(&ranges, &memory, &mut first);
        dump(&ranges, &memory, &mut second);

        assert_eq!(first.bytes, second.bytes);
        assert_eq!(first.bytes.len() as u128, DumpPlan::new(&ranges).total_len());
    }

    #[test]
    fn slow_transmitter_still_gets_every_byte() {
        let memory = SimMemory::patterned(0x100, 0x20);
        let ranges = [AddressRange::exclusive(0x100, 0x120)];
        let mut transport = Transport::new(SimUart::new(3));

        dump(&ranges, &memory, &mut transport);

        let expected: Vec<u8> = (0x100..0x120).map(|addr| memory.byte(addr)).collect();
        assert_eq!(transport.into_inner().written(), expected);
    }

    #[test]
    fn plan_length_covers_the_whole_address_space() {
        let half = usize::MAX / 2;
        let ranges = [
            AddressRange::inclusive(0, half),
            AddressRange::inclusive(half + 1, usize::MAX),
        ];
        let plan = DumpPlan::new(&ranges);

        assert_eq!(plan.total_len(), usize::MAX as u128 + 1);
        assert_eq!(plan.locate(half as u128 + 1), Some(half + 1));
        assert_eq!(plan.locate(usize::MAX as u128), Some(usize::MAX));
        assert_eq!(plan.locate(usize::MAX as u128 + 1), None);
    }

    #[test]
    fn plan_locates_offsets_across_gaps() {
        let ranges = [
            AddressRange::inclusive(0x0000, 0x0fff),
            AddressRange::inclusive(0x2000, 0x7fff),
        ];
        let plan = DumpPlan::new(&ranges);

        assert_eq!(plan.total_len(), 0x7000);
        assert_eq!(plan.locate(0), Some(0x0000));
        assert_eq!(plan.locate(0x0fff), Some(0x0fff));
        assert_eq!(plan.locate(0x1000), Some(0x2000));
        assert_eq!(plan.locate(0x6fff), Some(0x7fff));
        assert_eq!(plan.locate(0x7000), None);
    }
}
