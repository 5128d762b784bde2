use std::mem::{size_of, MaybeUninit};
use std::slice;

use crate::error::Result;

/// Marker for types that can be copied byte-for-byte in and out of another
/// process's address space.
///
/// # Safety
///
/// Implementors must be fixed-size value types for which *every* bit pattern
/// is a valid instance: no references, no padding-dependent invariants, no
/// niche-restricted fields (`bool`, `char`, enums). User aggregates should be
/// `#[repr(C)]`. Whether the bytes at a given address in the *target* process
/// actually hold a `T` is external knowledge; a mismatched layout assumption
/// is a caller error this crate cannot detect.
pub unsafe trait Pod: Copy + 'static {}

macro_rules! impl_pod {
    ($($ty:ty),* $(,)?) => {
        $(unsafe impl Pod for $ty {})*
    };
}

impl_pod!(u8, i8, u16, i16, u32, i32, u64, i64, u128, i128, usize, isize, f32, f64);

unsafe impl<T: Pod, const N: usize> Pod for [T; N] {}

/// Byte-level access to a target address space, with a typed layer on top.
///
/// The byte-level methods are the only ones an implementor provides; the
/// typed methods are derived from them, so a test double gets the full
/// surface for free.
pub trait MemoryAccessor {
    /// Reads exactly `buffer.len()` bytes at `addr`. A short read is an
    /// error, never a partially filled buffer handed back as success.
    fn read(&self, addr: usize, buffer: &mut [u8]) -> Result<()>;

    /// Writes all of `buffer` at `addr`.
    fn write(&self, addr: usize, buffer: &[u8]) -> Result<()>;

    /// Reads a `T` from `addr`. On failure no value is produced at all.
    fn read_value<T: Pod>(&self, addr: usize) -> Result<T> {
        let mut value = MaybeUninit::<T>::zeroed();
        // SAFETY: the slice covers exactly the `size_of::<T>()` bytes of
        // `value`, which is initialized to zero and fully overwritten before
        // `assume_init` on the success path.
        let buffer =
            unsafe { slice::from_raw_parts_mut(value.as_mut_ptr() as *mut u8, size_of::<T>()) };
        self.read(addr, buffer)?;
        Ok(unsafe { value.assume_init() })
    }

    /// Writes the `size_of::<T>()` bytes of `value` at `addr`.
    fn write_value<T: Pod>(&self, addr: usize, value: &T) -> Result<()> {
        // SAFETY: `T: Pod` guarantees a fixed layout with no uninitialized
        // niches, so viewing it as raw bytes is sound.
        let buffer =
            unsafe { slice::from_raw_parts(value as *const T as *const u8, size_of::<T>()) };
        self.write(addr, buffer)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::{Error, MemoryOp};

    const ERROR_NOACCESS: i32 = 998;

    /// In-crate stand-in for a target process's address space.
    struct FakeMemory {
        base: usize,
        bytes: RefCell<Vec<u8>>,
    }

    impl FakeMemory {
        fn new(base: usize, len: usize) -> Self {
            Self {
                base,
                bytes: RefCell::new(vec![0; len]),
            }
        }

        fn range(&self, addr: usize, len: usize) -> Option<std::ops::Range<usize>> {
            let start = addr.checked_sub(self.base)?;
            let end = start.checked_add(len)?;
            (end <= self.bytes.borrow().len()).then(|| start..end)
        }
    }

    impl MemoryAccessor for FakeMemory {
        fn read(&self, addr: usize, buffer: &mut [u8]) -> Result<()> {
            let range = self.range(addr, buffer.len()).ok_or(Error::MemoryIo {
                op: MemoryOp::Read,
                address: addr,
                len: buffer.len(),
                code: ERROR_NOACCESS,
            })?;
            buffer.copy_from_slice(&self.bytes.borrow()[range]);
            Ok(())
        }

        fn write(&self, addr: usize, buffer: &[u8]) -> Result<()> {
            let range = self.range(addr, buffer.len()).ok_or(Error::MemoryIo {
                op: MemoryOp::Write,
                address: addr,
                len: buffer.len(),
                code: ERROR_NOACCESS,
            })?;
            self.bytes.borrow_mut()[range].copy_from_slice(buffer);
            Ok(())
        }
    }

    #[test]
    fn read_write_read_round_trips() {
        let memory = FakeMemory::new(0x1000, 64);
        memory.write_value(0x1010, &0xdead_beef_u32).unwrap();

        let first: u32 = memory.read_value(0x1010).unwrap();
        memory.write_value(0x1010, &first).unwrap();
        let second: u32 = memory.read_value(0x1010).unwrap();

        assert_eq!(first, 0xdead_beef);
        assert_eq!(second, first);
    }

    #[test]
    fn typed_read_sees_typed_write() {
        let memory = FakeMemory::new(0x4000, 128);
        memory.write_value(0x4020, &-12345_i64).unwrap();
        assert_eq!(memory.read_value::<i64>(0x4020).unwrap(), -12345);

        memory.write_value(0x4040, &3.5_f64).unwrap();
        assert_eq!(memory.read_value::<f64>(0x4040).unwrap(), 3.5);
    }

    #[test]
    fn repr_c_aggregates_round_trip() {
        #[repr(C)]
        #[derive(Clone, Copy, Debug, PartialEq)]
        struct Vec3 {
            x: f32,
            y: f32,
            z: f32,
        }
        unsafe impl Pod for Vec3 {}

        let memory = FakeMemory::new(0, 64);
        let position = Vec3 {
            x: 1.0,
            y: -2.0,
            z: 0.5,
        };
        memory.write_value(16, &position).unwrap();
        assert_eq!(memory.read_value::<Vec3>(16).unwrap(), position);
    }

    #[test]
    fn arrays_round_trip() {
        let memory = FakeMemory::new(0x100, 32);
        memory.write_value(0x108, &[1_u16, 2, 3, 4]).unwrap();
        assert_eq!(memory.read_value::<[u16; 4]>(0x108).unwrap(), [1, 2, 3, 4]);
    }

    #[test]
    fn out_of_range_read_yields_io_error_and_no_value() {
        let memory = FakeMemory::new(0x1000, 16);
        let err = memory.read_value::<u64>(0x100c).unwrap_err();
        assert!(matches!(
            err,
            Error::MemoryIo {
                op: MemoryOp::Read,
                address: 0x100c,
                len: 8,
                ..
            }
        ));
    }

    #[test]
    fn read_below_the_mapped_base_fails() {
        let memory = FakeMemory::new(0x1000, 16);
        assert!(memory.read_value::<u32>(0xff0).is_err());
    }

    #[test]
    fn out_of_range_write_leaves_memory_untouched() {
        let memory = FakeMemory::new(0x2000, 8);
        memory.write_value(0x2000, &0x1111_1111_u32).unwrap();
        assert!(memory.write_value(0x2006, &0x2222_2222_u32).is_err());
        assert_eq!(memory.read_value::<u32>(0x2000).unwrap(), 0x1111_1111);
    }
}
