//! Typed access to fixed-address hardware.
//!
//! Peripherals are described as [`Reg`] handles built once from an address
//! table, and the firmware image's address space is read through the
//! [`Memory`] trait. Nothing else in the engine touches raw pointers.

use core::marker::PhantomData;
use core::ops::{BitAnd, BitOr, Not};
use core::ptr::{read_volatile, write_volatile};

/// Register widths the engine knows how to access.
pub trait Word:
    Copy + PartialEq + BitAnd<Output = Self> + BitOr<Output = Self> + Not<Output = Self>
{
    const ZERO: Self;

    /// Widens a byte into the low bits of a register value.
    fn from_byte(byte: u8) -> Self;
}

macro_rules! impl_word {
    ($($ty:ty),*) => {
        $(
            impl Word for $ty {
                const ZERO: Self = 0;

                #[inline(always)]
                fn from_byte(byte: u8) -> Self {
                    byte as $ty
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32);

/// One memory-mapped register of width `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg<T> {
    addr: usize,
    _width: PhantomData<T>,
}

impl<T: Word> Reg<T> {
    /// Creates a handle for the register at `addr`.
    ///
    /// # Safety
    ///
    /// `addr` must be aligned for `T` and valid for volatile reads and writes
    /// for as long as the handle (or any copy of it) is used.
    pub const unsafe fn at(addr: usize) -> Self {
        Self {
            addr,
            _width: PhantomData,
        }
    }

    /// Creates a handle `offset` bytes above `base`.
    ///
    /// # Safety
    ///
    /// Same contract as [`Reg::at`] for `base + offset`.
    pub const unsafe fn offset(base: usize, offset: usize) -> Self {
        Self::at(base + offset)
    }

    pub const fn addr(&self) -> usize {
        self.addr
    }

    #[inline(always)]
    pub fn read(&self) -> T {
        // SAFETY: validity of `addr` is the constructor's contract.
        unsafe { read_volatile(self.addr as *const T) }
    }

    #[inline(always)]
    pub fn write(&self, value: T) {
        // SAFETY: validity of `addr` is the constructor's contract.
        unsafe { write_volatile(self.addr as *mut T, value) }
    }

    /// Read-modify-write. Not atomic; callers are the only owner.
    #[inline(always)]
    pub fn modify(&self, f: impl FnOnce(T) -> T) {
        self.write(f(self.read()));
    }

    #[inline(always)]
    pub fn set_bits(&self, mask: T) {
        self.modify(|value| value | mask);
    }

    #[inline(always)]
    pub fn clear_bits(&self, mask: T) {
        self.modify(|value| value & !mask);
    }

    /// `true` if any bit of `mask` reads as set.
    #[inline(always)]
    pub fn any_set(&self, mask: T) -> bool {
        self.read() & mask != T::ZERO
    }
}

/// Read-only view of the target's address space.
///
/// Reads are plain loads and are assumed never to fault: the targets this
/// runs on have no MPU guarding the configured ranges.
pub trait Memory {
    fn read_u8(&self, addr: usize) -> u8;

    /// Reads a halfword in the target's native byte order. `addr` must be
    /// halfword aligned.
    fn read_u16(&self, addr: usize) -> u16;
}

impl<M: Memory + ?Sized> Memory for &M {
    fn read_u8(&self, addr: usize) -> u8 {
        (**self).read_u8(addr)
    }

    fn read_u16(&self, addr: usize) -> u16 {
        (**self).read_u16(addr)
    }
}

/// The live address space of the running core, read with volatile loads.
#[derive(Debug)]
pub struct SystemBus {
    _private: (),
}

impl SystemBus {
    /// # Safety
    ///
    /// Every address later passed to [`Memory`] methods must be mapped and
    /// readable on the running target.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Memory for SystemBus {
    #[inline(always)]
    fn read_u8(&self, addr: usize) -> u8 {
        // SAFETY: mapped per `SystemBus::new` contract.
        unsafe { read_volatile(addr as *const u8) }
    }

    #[inline(always)]
    fn read_u16(&self, addr: usize) -> u16 {
        // SAFETY: mapped per `SystemBus::new` contract; alignment is the caller's.
        unsafe { read_volatile(addr as *const u16) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reg_modify_touches_only_requested_bits() {
        let mut cells = [0u32; 4];
        cells[2] = 0x0000_00f0;
        let reg = unsafe { Reg::<u32>::at(core::ptr::addr_of_mut!(cells[2]) as usize) };

        reg.set_bits(0x0000_0001);
        reg.clear_bits(0x0000_0010);

        assert_eq!(reg.read(), 0x0000_00e1);
        assert!(reg.any_set(0x80));
        assert!(!reg.any_set(0x02));
        assert_eq!(cells, [0, 0, 0x0000_00e1, 0]);
    }

    #[test]
    fn offset_is_relative_to_base() {
        let reg = unsafe { Reg::<u8>::offset(0x5240, 0x01) };
        assert_eq!(reg.addr(), 0x5241);
    }

    #[test]
    fn system_bus_reads_live_memory() {
        let image: [u8; 4] = [0x82, 0x00, 0xaa, 0x55];
        let bus = unsafe { SystemBus::new() };
        let base = image.as_ptr() as usize;

        assert_eq!(bus.read_u8(base), 0x82);
        assert_eq!(bus.read_u8(base + 3), 0x55);
    }
}
