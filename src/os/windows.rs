use crate::{
    Result,
    config::LibraryPath,
    error::{invalid_path_error, load_error},
    os::{DynamicLoader, Handle},
};
use core::ptr::NonNull;
use std::{ffi::OsStr, os::windows::ffi::OsStrExt};
use windows_sys::Win32::{Foundation::GetLastError, System::LibraryLoader::LoadLibraryW};

/// An implementation of DynamicLoader trait backed by `LoadLibraryW`
///
/// The Windows loader always resolves imports eagerly; there is no lazy mode
/// to ask for.
pub struct DefaultLoader;

impl DynamicLoader for DefaultLoader {
    unsafe fn load(path: &LibraryPath) -> Result<Handle> {
        let path = to_wide(path.as_os_str())?;
        let module = unsafe { LoadLibraryW(path.as_ptr()) };
        match NonNull::new(module) {
            Some(ptr) => Ok(Handle::from_raw(ptr)),
            None => {
                let err_code = unsafe { GetLastError() };
                Err(load_error(format!(
                    "LoadLibraryW failed with error: {}",
                    err_code
                )))
            }
        }
    }
}

/// Encodes `path` as the NUL-terminated UTF-16 string `LoadLibraryW` takes.
fn to_wide(path: &OsStr) -> Result<Vec<u16>> {
    let mut wide: Vec<u16> = path.encode_wide().collect();
    if let Some(pos) = wide.iter().position(|&unit| unit == 0) {
        return Err(invalid_path_error(format!(
            "interior nul byte at position {pos}"
        )));
    }
    wide.push(0);
    Ok(wide)
}
