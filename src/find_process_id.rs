use std::mem::size_of;

use tracing::debug;
use windows::{
    core::{HSTRING, PCWSTR},
    Win32::{
        System::Diagnostics::ToolHelp::{
            CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
            TH32CS_SNAPPROCESS,
        },
        UI::WindowsAndMessaging::{FindWindowW, GetWindowThreadProcessId},
    },
};

use crate::error::{Error, Result};
use crate::scoped_handle::Sentinel;
use crate::win_api_wrappers::{as_handle, own_handle, OwnedHandle};

fn find_process_id_in_snapshot(snapshot: &OwnedHandle, exe_file: &str) -> Option<u32> {
    let mut pe = PROCESSENTRY32W {
        dwSize: size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };
    if unsafe { Process32FirstW(as_handle(snapshot), &mut pe) }.is_err() {
        return None;
    }
    loop {
        // szExeFile is NUL-terminated within its fixed buffer.
        if let Ok(name) = unsafe { PCWSTR::from_raw(pe.szExeFile.as_ptr()).to_string() } {
            if name == exe_file {
                return Some(pe.th32ProcessID);
            }
        }

        if unsafe { Process32NextW(as_handle(snapshot), &mut pe) }.is_err() {
            return None;
        }
    }
}

/// Resolves a process id from an exact executable file name
/// (e.g. `"notepad.exe"`). When several processes share the name, the first
/// one in snapshot order wins; that order is not deterministic across runs.
pub fn find_process_id(exe_file: &str) -> Result<u32> {
    let snapshot = own_handle(
        unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }.map_err(|err| {
            Error::SnapshotFailed {
                code: err.code().0,
            }
        })?,
        Sentinel::Invalid,
    );

    let process_id =
        find_process_id_in_snapshot(&snapshot, exe_file).ok_or_else(|| Error::ProcessNotFound {
            name: exe_file.to_owned(),
        })?;

    debug!(exe_file, process_id, "resolved process by executable name");
    Ok(process_id)
}

/// Resolves the id of the process owning the top-level window with an exact
/// title. Window handles are not owned by the caller and are never closed.
pub fn find_process_id_by_window_title(title: &str) -> Result<u32> {
    let not_found = || Error::WindowNotFound {
        title: title.to_owned(),
    };

    let window = unsafe { FindWindowW(PCWSTR::null(), &HSTRING::from(title)) };
    if window.0 == 0 {
        return Err(not_found());
    }

    let mut process_id = 0u32;
    if unsafe { GetWindowThreadProcessId(window, Some(&mut process_id)) } == 0 {
        return Err(not_found());
    }

    debug!(title, process_id, "resolved process by window title");
    Ok(process_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_test_executable_resolves_to_our_own_pid() {
        let exe_file = std::env::current_exe()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert_eq!(find_process_id(&exe_file).unwrap(), std::process::id());
    }

    #[test]
    fn unmatched_executable_name_is_not_found() {
        let err = find_process_id("procscope-no-such-process.exe").unwrap_err();
        assert_eq!(
            err,
            Error::ProcessNotFound {
                name: "procscope-no-such-process.exe".to_owned()
            }
        );
    }

    #[test]
    fn name_matching_is_exact_not_prefix() {
        let exe_file = std::env::current_exe()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        let truncated = &exe_file[..exe_file.len() - 1];
        assert!(matches!(
            find_process_id(truncated),
            Err(Error::ProcessNotFound { .. })
        ));
    }

    #[test]
    fn unmatched_window_title_is_not_found() {
        let err = find_process_id_by_window_title("procscope window that cannot exist").unwrap_err();
        assert!(matches!(err, Error::WindowNotFound { .. }));
    }
}
