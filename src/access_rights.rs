use flagset::{flags, FlagSet};

flags! {
    /// Process access rights requested when a session's handle is opened.
    ///
    /// The values mirror the Win32 `PROCESS_*` access masks. Every later
    /// memory operation relies on the rights granted here; the session does
    /// not re-check rights per call, the OS rejects operations the handle was
    /// not opened for.
    pub enum AccessRight: u32 {
        /// `PROCESS_VM_READ`
        VmRead = 0x0010,
        /// `PROCESS_VM_WRITE`; `WriteProcessMemory` also needs [`VmOperation`].
        ///
        /// [`VmOperation`]: AccessRight::VmOperation
        VmWrite = 0x0020,
        /// `PROCESS_VM_OPERATION`
        VmOperation = 0x0008,
        /// `PROCESS_QUERY_INFORMATION`
        QueryInformation = 0x0400,
        /// `PROCESS_ALL_ACCESS`
        AllAccess = 0x001f_ffff,
    }
}

/// A combination of [`AccessRight`]s, e.g.
/// `AccessRight::VmRead | AccessRight::VmWrite | AccessRight::VmOperation`.
pub type AccessRights = FlagSet<AccessRight>;
