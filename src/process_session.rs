use std::ffi::c_void;

use tracing::debug;
use windows::Win32::{
    Foundation::{FALSE, HANDLE},
    System::{
        Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory},
        Threading::{OpenProcess, PROCESS_ACCESS_RIGHTS},
    },
};

use crate::access_rights::AccessRights;
use crate::error::{Error, MemoryOp, Result};
use crate::find_module_base::find_module_base;
use crate::find_process_id::{find_process_id, find_process_id_by_window_title};
use crate::memory_accessor::{MemoryAccessor, Pod};
use crate::scoped_handle::Sentinel;
use crate::win_api_wrappers::{as_handle, own_handle, OwnedHandle};

/// An open view onto one running process.
///
/// Construction resolves the target and opens a process handle restricted to
/// the requested [`AccessRights`]; if either step fails, no session comes
/// into existence. The handle is held for the session's whole lifetime and
/// released exactly once when the session is dropped.
///
/// A session owns its handle exclusively and is deliberately neither `Clone`
/// nor `Copy`; pass it by reference. It is also not meant for concurrent use
/// from several threads, treat it as a single mutable resource.
pub struct ProcessSession {
    process_id: u32,
    handle: OwnedHandle,
}

impl ProcessSession {
    /// Opens a session on the first process whose executable file name
    /// exactly equals `exe_file`.
    pub fn from_exe_file(exe_file: &str, rights: impl Into<AccessRights>) -> Result<Self> {
        Self::from_process_id(find_process_id(exe_file)?, rights)
    }

    /// Opens a session on the process owning the top-level window titled
    /// exactly `title`.
    pub fn from_window_title(title: &str, rights: impl Into<AccessRights>) -> Result<Self> {
        Self::from_process_id(find_process_id_by_window_title(title)?, rights)
    }

    /// Opens a session on a known process id. This is the sole point where
    /// access rights are requested; every later read and write relies on
    /// what was granted here.
    pub fn from_process_id(process_id: u32, rights: impl Into<AccessRights>) -> Result<Self> {
        let rights = rights.into();
        let handle = unsafe { OpenProcess(PROCESS_ACCESS_RIGHTS(rights.bits()), FALSE, process_id) }
            .map_err(|err| Error::OpenFailed {
                pid: process_id,
                code: err.code().0,
            })?;

        debug!(process_id, rights = rights.bits(), "opened process handle");
        Ok(Self {
            process_id,
            handle: own_handle(handle, Sentinel::Null),
        })
    }

    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Load base of `module_name` in the target process. Re-snapshots the
    /// module list on every call.
    pub fn module_base_address(&self, module_name: &str) -> Result<usize> {
        find_module_base(self.process_id, module_name)
    }

    /// Reads a `T` at `offset` bytes past `module_name`'s load base.
    pub fn read_value_in_module<T: Pod>(&self, module_name: &str, offset: usize) -> Result<T> {
        let base = self.module_base_address(module_name)?;
        self.read_value(base + offset)
    }

    /// Writes a `T` at `offset` bytes past `module_name`'s load base.
    pub fn write_value_in_module<T: Pod>(
        &self,
        module_name: &str,
        offset: usize,
        value: &T,
    ) -> Result<()> {
        let base = self.module_base_address(module_name)?;
        self.write_value(base + offset, value)
    }

    fn valid_handle(&self) -> Result<HANDLE> {
        if !self.handle.is_valid() {
            return Err(Error::NoHandle);
        }
        Ok(as_handle(&self.handle))
    }
}

impl MemoryAccessor for ProcessSession {
    fn read(&self, addr: usize, buffer: &mut [u8]) -> Result<()> {
        let handle = self.valid_handle()?;
        let mut bytes_read = 0usize;
        unsafe {
            ReadProcessMemory(
                handle,
                addr as *const c_void,
                buffer.as_mut_ptr() as *mut c_void,
                buffer.len(),
                Some(&mut bytes_read),
            )
        }
        .map_err(|err| Error::MemoryIo {
            op: MemoryOp::Read,
            address: addr,
            len: buffer.len(),
            code: err.code().0,
        })?;
        if bytes_read != buffer.len() {
            return Err(Error::ShortTransfer {
                op: MemoryOp::Read,
                address: addr,
                len: buffer.len(),
                transferred: bytes_read,
            });
        }
        Ok(())
    }

    fn write(&self, addr: usize, buffer: &[u8]) -> Result<()> {
        let handle = self.valid_handle()?;
        let mut bytes_written = 0usize;
        unsafe {
            WriteProcessMemory(
                handle,
                addr as *const c_void,
                buffer.as_ptr() as *const c_void,
                buffer.len(),
                Some(&mut bytes_written),
            )
        }
        .map_err(|err| Error::MemoryIo {
            op: MemoryOp::Write,
            address: addr,
            len: buffer.len(),
            code: err.code().0,
        })?;
        if bytes_written != buffer.len() {
            return Err(Error::ShortTransfer {
                op: MemoryOp::Write,
                address: addr,
                len: buffer.len(),
                transferred: bytes_written,
            });
        }
        Ok(())
    }
}
