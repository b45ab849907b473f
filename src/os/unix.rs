use crate::{
    Result,
    config::LibraryPath,
    error::{invalid_path_error, load_error},
    os::{DynamicLoader, Handle},
};
use core::ptr::NonNull;
use libc::{RTLD_LAZY, dlerror, dlopen};
use std::{
    ffi::{CStr, CString, OsStr},
    os::unix::ffi::OsStrExt,
};

/// An implementation of DynamicLoader trait backed by `dlopen(path, RTLD_LAZY)`
pub struct DefaultLoader;

impl DynamicLoader for DefaultLoader {
    unsafe fn load(path: &LibraryPath) -> Result<Handle> {
        let path = to_cstring(path.as_os_str())?;
        let ptr = unsafe { dlopen(path.as_ptr(), RTLD_LAZY) };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(Handle::from_raw(ptr)),
            None => Err(last_error()),
        }
    }
}

fn to_cstring(path: &OsStr) -> Result<CString> {
    CString::new(path.as_bytes()).map_err(|err| {
        invalid_path_error(format!(
            "interior nul byte at position {}",
            err.nul_position()
        ))
    })
}

// dlerror clears the pending message, so this must run right after the
// failing dlopen.
#[cold]
#[inline(never)]
fn last_error() -> crate::Error {
    let msg = unsafe { dlerror() };
    if msg.is_null() {
        return load_error("dlopen failed");
    }
    load_error(unsafe { CStr::from_ptr(msg) }.to_string_lossy().into_owned())
}
