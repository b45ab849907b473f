#![allow(dead_code)]

use preload_bridge::config::ENV_VAR;
use std::{
    ffi::{OsStr, OsString},
    path::PathBuf,
};

/// Path of the variant fixture built by `build.rs`, if the host could build it.
pub fn variant_path() -> Option<&'static str> {
    option_env!("PRELOAD_BRIDGE_TEST_ARTIFACTS")
}

/// The injectable `cdylib` cargo built next to this test binary.
pub fn bridge_cdylib() -> Option<PathBuf> {
    let name = format!(
        "{}preload_bridge{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    );
    let exe = std::env::current_exe().ok()?;
    let deps = exe.parent()?;
    [deps.join(&name), deps.parent()?.join(&name)]
        .into_iter()
        .find(|path| path.exists())
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// An environment holding only the library variable.
pub fn env(value: Option<&'static str>) -> impl FnMut(&OsStr) -> Option<OsString> {
    move |name: &OsStr| {
        if name == ENV_VAR {
            value.map(OsString::from)
        } else {
            None
        }
    }
}
