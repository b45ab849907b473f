use std::borrow::Cow;
use core::fmt::Display;

/// Error types used throughout the `preload_bridge` library.
///
/// None of these ever reach the host process: the load-time hook discards
/// them. They are returned to Rust callers of [`Bridge`](crate::Bridge) and
/// reported through `log` when the `log` feature is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The library path cannot be passed to the OS loader.
    ///
    /// This happens when the value of the environment variable contains an
    /// interior NUL byte.
    InvalidPath {
        /// A descriptive message about the rejected path.
        msg: Cow<'static, str>,
    },

    /// The OS dynamic loader refused to map the library.
    ///
    /// This covers every failure the loader can report, for example:
    /// * File not found or unreadable
    /// * Architecture mismatch
    /// * Unresolved dependencies
    Load {
        /// The message reported by the loader (`dlerror` on unix).
        msg: Cow<'static, str>,
    },

    /// The target has no dynamic loader the bridge knows how to drive.
    Unsupported {
        /// A descriptive message about the missing capability.
        msg: Cow<'static, str>,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidPath { msg } => write!(f, "Invalid library path: {msg}"),
            Error::Load { msg } => write!(f, "Load error: {msg}"),
            Error::Unsupported { msg } => write!(f, "Unsupported: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

/// Creates an invalid path error with the specified message.
#[cold]
#[inline(never)]
#[allow(unused)]
pub(crate) fn invalid_path_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::InvalidPath { msg: msg.into() }
}

/// Creates a load error with the specified message.
///
/// This is a convenience function for creating `Error::Load` variants.
///
/// # Arguments
/// * `msg` - The error message.
///
/// # Returns
/// An `Error::Load` variant with the specified message.
#[cold]
#[inline(never)]
pub fn load_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::Load { msg: msg.into() }
}

#[cold]
#[inline(never)]
#[allow(unused)]
pub(crate) fn unsupported_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::Unsupported { msg: msg.into() }
}
