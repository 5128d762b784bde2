use std::mem::size_of;

use windows::{
    core::PCWSTR,
    Win32::System::Diagnostics::ToolHelp::{
        CreateToolhelp32Snapshot, Module32FirstW, Module32NextW, MODULEENTRY32W,
        TH32CS_SNAPMODULE, TH32CS_SNAPMODULE32,
    },
};

use crate::error::{Error, Result};
use crate::scoped_handle::Sentinel;
use crate::win_api_wrappers::{as_handle, own_handle, OwnedHandle};

fn find_module_in_snapshot(snapshot: &OwnedHandle, module_name: &str) -> Option<usize> {
    let mut me = MODULEENTRY32W {
        dwSize: size_of::<MODULEENTRY32W>() as u32,
        ..Default::default()
    };
    if unsafe { Module32FirstW(as_handle(snapshot), &mut me) }.is_err() {
        return None;
    }
    loop {
        if let Ok(name) = unsafe { PCWSTR::from_raw(me.szModule.as_ptr()).to_string() } {
            if name == module_name {
                return Some(me.modBaseAddr as usize);
            }
        }

        if unsafe { Module32NextW(as_handle(snapshot), &mut me) }.is_err() {
            return None;
        }
    }
}

/// Resolves the load base address of `module_name` (an exact match against
/// the module file name, e.g. `"kernel32.dll"`) inside the process
/// `process_id`. Each call takes a fresh module snapshot, so the result
/// reflects the target's module list at this instant; nothing is memoized.
pub fn find_module_base(process_id: u32, module_name: &str) -> Result<usize> {
    let snapshot = own_handle(
        unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPMODULE | TH32CS_SNAPMODULE32, process_id) }
            .map_err(|err| Error::SnapshotFailed {
                code: err.code().0,
            })?,
        Sentinel::Invalid,
    );

    find_module_in_snapshot(&snapshot, module_name).ok_or_else(|| Error::ModuleNotFound {
        name: module_name.to_owned(),
        pid: process_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_executable_module_has_a_base_address() {
        let exe_file = std::env::current_exe()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        let base = find_module_base(std::process::id(), &exe_file).unwrap();
        assert_ne!(base, 0);
    }

    #[test]
    fn absent_module_is_not_found() {
        let err = find_module_base(std::process::id(), "procscope-no-such-module.dll").unwrap_err();
        assert_eq!(
            err,
            Error::ModuleNotFound {
                name: "procscope-no-such-module.dll".to_owned(),
                pid: std::process::id(),
            }
        );
    }
}
