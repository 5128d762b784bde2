use windows::Win32::Foundation::{CloseHandle, HANDLE};

use crate::scoped_handle::{HandleClose, RawHandle, ScopedHandle, Sentinel};

/// `CloseHandle`-backed release. Close failure on drop is ignored; there is
/// no caller left to report it to.
pub(crate) struct SystemClose;

impl HandleClose for SystemClose {
    fn close(&self, raw: RawHandle) {
        let _ = unsafe { CloseHandle(HANDLE(raw)) };
    }
}

/// A process or snapshot handle owned by this crate.
pub(crate) type OwnedHandle = ScopedHandle<SystemClose>;

pub(crate) fn own_handle(handle: HANDLE, sentinel: Sentinel) -> OwnedHandle {
    ScopedHandle::acquire(handle.0, sentinel, SystemClose)
}

pub(crate) fn as_handle(owned: &OwnedHandle) -> HANDLE {
    HANDLE(owned.get())
}
