use std::fmt;

/// Raw OS handle value, matching the representation of a Win32 `HANDLE`.
pub type RawHandle = isize;

/// The "no resource" value an OS call reports for its handle category.
///
/// Win32 is inconsistent here: object-open calls such as `OpenProcess` report
/// failure as a null handle, while snapshot calls such as
/// `CreateToolhelp32Snapshot` report `INVALID_HANDLE_VALUE` (-1). A wrapped
/// handle records which category it came from so that release is skipped only
/// for that category's own sentinel. A value equal to the *other* category's
/// sentinel is a real handle and must still be released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// Failure is reported as a null handle.
    Null,
    /// Failure is reported as `INVALID_HANDLE_VALUE`.
    Invalid,
}

impl Sentinel {
    pub(crate) fn value(self) -> RawHandle {
        match self {
            Sentinel::Null => 0,
            Sentinel::Invalid => -1,
        }
    }
}

/// Release hook for an owned handle. The OS-backed implementation calls
/// `CloseHandle`; tests substitute a counting double.
pub trait HandleClose {
    fn close(&self, raw: RawHandle);
}

/// Owns a raw OS handle and releases it exactly once when dropped, on every
/// exit path of the owning scope. Move-only: there is no way to end up with
/// two owners of one handle.
pub struct ScopedHandle<C: HandleClose> {
    raw: RawHandle,
    sentinel: Sentinel,
    close: C,
}

impl<C: HandleClose> ScopedHandle<C> {
    /// Takes ownership of `raw`. `sentinel` names the failure value of the
    /// call that produced the handle.
    pub fn acquire(raw: RawHandle, sentinel: Sentinel, close: C) -> Self {
        Self {
            raw,
            sentinel,
            close,
        }
    }

    /// The underlying raw handle, for passing to OS calls. Ownership stays
    /// with this wrapper.
    pub fn get(&self) -> RawHandle {
        self.raw
    }

    /// False only when the wrapped value is this category's sentinel.
    pub fn is_valid(&self) -> bool {
        self.raw != self.sentinel.value()
    }
}

impl<C: HandleClose> Drop for ScopedHandle<C> {
    fn drop(&mut self) {
        if self.is_valid() {
            self.close.close(self.raw);
        }
    }
}

impl<C: HandleClose> fmt::Debug for ScopedHandle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedHandle")
            .field("raw", &self.raw)
            .field("sentinel", &self.sentinel)
            .finish()
    }
}
