//! Address ranges selected for a dump pass.

use core::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("range start {start:#x} is above its end {end:#x}")]
    Inverted { start: usize, end: usize },
}

/// Whether `end` itself belongs to the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Inclusive,
    Exclusive,
}

/// A contiguous span of the target's address space, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    start: usize,
    end: usize,
    bound: Bound,
}

impl AddressRange {
    pub const fn new(start: usize, end: usize, bound: Bound) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end, bound })
    }

    /// `start..=end`. Panics at compile time when used in a `const` with
    /// `start > end`.
    pub const fn inclusive(start: usize, end: usize) -> Self {
        match Self::new(start, end, Bound::Inclusive) {
            Ok(range) => range,
            Err(_) => panic!("inverted address range"),
        }
    }

    /// `start..end`.
    pub const fn exclusive(start: usize, end: usize) -> Self {
        match Self::new(start, end, Bound::Exclusive) {
            Ok(range) => range,
            Err(_) => panic!("inverted address range"),
        }
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    pub const fn bound(&self) -> Bound {
        self.bound
    }

    /// Number of bytes covered. `u128` so `0..=usize::MAX` fits on any host.
    pub const fn byte_len(&self) -> u128 {
        let span = (self.end - self.start) as u128;
        match self.bound {
            Bound::Inclusive => span + 1,
            Bound::Exclusive => span,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self.bound, Bound::Exclusive) && self.start == self.end
    }

    pub const fn contains(&self, addr: usize) -> bool {
        match self.bound {
            Bound::Inclusive => self.start <= addr && addr <= self.end,
            Bound::Exclusive => self.start <= addr && addr < self.end,
        }
    }

    /// The covered addresses as an inclusive range, `None` when empty.
    pub const fn span(&self) -> Option<RangeInclusive<usize>> {
        match self.bound {
            Bound::Inclusive => Some(self.start..=self.end),
            Bound::Exclusive if self.start == self.end => None,
            Bound::Exclusive => Some(self.start..=self.end - 1),
        }
    }

    /// Every covered address, strictly increasing.
    pub fn addresses(&self) -> impl Iterator<Item = usize> {
        self.span().into_iter().flatten()
    }
}
