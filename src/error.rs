use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Direction of a failed memory transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryOp {
    Read,
    Write,
}

impl fmt::Display for MemoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryOp::Read => write!(f, "read"),
            MemoryOp::Write => write!(f, "write"),
        }
    }
}

/// Everything that can go wrong while resolving a target process or touching
/// its memory. "Not found" outcomes are ordinary recoverable errors, never
/// panics. `code` fields carry the raw HRESULT reported by the OS call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no running process has the executable file name {name:?}")]
    ProcessNotFound { name: String },

    #[error("no top-level window is titled {title:?}")]
    WindowNotFound { title: String },

    #[error("module {name:?} is not loaded in process {pid}")]
    ModuleNotFound { name: String, pid: u32 },

    #[error("snapshot could not be taken (os error {code:#010x})")]
    SnapshotFailed { code: i32 },

    #[error("could not open process {pid} (os error {code:#010x})")]
    OpenFailed { pid: u32, code: i32 },

    #[error("session holds no process handle")]
    NoHandle,

    #[error("{op} of {len} bytes at {address:#x} failed (os error {code:#010x})")]
    MemoryIo {
        op: MemoryOp,
        address: usize,
        len: usize,
        code: i32,
    },

    #[error("{op} at {address:#x} transferred {transferred} of {len} bytes")]
    ShortTransfer {
        op: MemoryOp,
        address: usize,
        len: usize,
        transferred: usize,
    },
}
