use crate::{
    Result,
    config::LibraryPath,
    error::unsupported_error,
    os::{DynamicLoader, Handle},
};

/// A DynamicLoader for targets without a dynamic loader. Every load fails.
pub struct DefaultLoader;

impl DynamicLoader for DefaultLoader {
    unsafe fn load(_path: &LibraryPath) -> Result<Handle> {
        Err(unsupported_error("no dynamic loader on this target"))
    }
}
