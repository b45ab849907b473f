use core::{ffi::c_void, ptr::NonNull};

use crate::{Result, config::LibraryPath};

/// An opaque reference to a library mapped by the OS loader.
///
/// The handle is never closed by this crate. Once the loader hands it out the
/// library stays mapped for the rest of the process lifetime, so the handle is
/// a plain `Copy` token with no `Drop`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Handle {
    ptr: NonNull<c_void>,
}

unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}

impl Handle {
    /// Wraps a raw handle returned by the platform loader.
    #[inline]
    pub const fn from_raw(ptr: NonNull<c_void>) -> Self {
        Self { ptr }
    }

    /// Gets the raw handle, for passing back to platform APIs such as `dlsym`.
    #[inline]
    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr.as_ptr()
    }
}

/// A trait for asking the host's dynamic loader to map a library.
///
/// This is the only capability the bridge needs from the OS. It abstracts the
/// platform loader API so the bridge logic can be driven by a mock in tests.
///
/// # Example
/// ```rust,ignore
/// struct MyLoader;
///
/// impl DynamicLoader for MyLoader {
///     unsafe fn load(path: &LibraryPath) -> Result<Handle> {
///         // Platform-specific implementation
///         todo!()
///     }
/// }
/// ```
pub trait DynamicLoader {
    /// Maps the library at `path` into the current process.
    ///
    /// Loaders that support it bind the library's external symbols lazily, on
    /// first use, rather than before returning.
    ///
    /// # Arguments
    /// * `path` - Absolute or relative path handed to the loader as-is. Backends
    ///   reject a path they cannot encode (for example one with an interior NUL)
    ///   with `Error::InvalidPath` instead of calling the loader.
    ///
    /// # Returns
    /// A handle to the mapped library on success. The library's own load-time
    /// initializers have run by the time this returns.
    ///
    /// # Safety
    /// Mapping a library runs arbitrary initialization code from that library
    /// inside the current process and may change the global symbol table.
    unsafe fn load(path: &LibraryPath) -> Result<Handle>;
}
