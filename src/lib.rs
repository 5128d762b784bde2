//! Ownership-checked access to another running process's address space on
//! Windows: resolve a target by executable name, window title, or process id;
//! open a handle bounded by an access-rights mask; look up module base
//! addresses; and read or write typed values at arbitrary virtual addresses.
//!
//! The handle-lifetime and access-mediation logic is the point of this crate:
//! an opened handle is released exactly once, no memory operation runs
//! without a valid handle, and every resolution failure is an explicit error
//! value. Reads and writes against a process that has exited fail, they do
//! not crash.
//!
//! ```no_run
//! # #[cfg(windows)]
//! # fn demo() -> procscope::Result<()> {
//! use procscope::{AccessRight, MemoryAccessor, ProcessSession};
//!
//! let session = ProcessSession::from_exe_file(
//!     "target.exe",
//!     AccessRight::VmRead | AccessRight::VmWrite | AccessRight::VmOperation,
//! )?;
//! let base = session.module_base_address("target.exe")?;
//! let health: u32 = session.read_value(base + 0x1a8c)?;
//! session.write_value(base + 0x1a8c, &(health + 10))?;
//! # Ok(())
//! # }
//! # fn main() {}
//! ```

pub mod access_rights;
pub mod error;
#[cfg(target_os = "windows")]
mod find_module_base;
#[cfg(target_os = "windows")]
mod find_process_id;
pub mod memory_accessor;
pub mod scoped_handle;
#[cfg(target_os = "windows")]
mod process_session;
#[cfg(target_os = "windows")]
mod win_api_wrappers;

pub use access_rights::{AccessRight, AccessRights};
pub use error::{Error, MemoryOp, Result};
pub use memory_accessor::{MemoryAccessor, Pod};
pub use scoped_handle::{HandleClose, RawHandle, ScopedHandle, Sentinel};

#[cfg(target_os = "windows")]
pub use find_module_base::find_module_base;
#[cfg(target_os = "windows")]
pub use find_process_id::{find_process_id, find_process_id_by_window_title};
#[cfg(target_os = "windows")]
pub use process_session::ProcessSession;
