//! Environment-driven configuration
//!
//! The bridge takes its only input from one environment variable, [`ENV_VAR`],
//! read once when the module is mapped. It names the library to load; unset
//! or empty means do nothing.
//!
//! The name is fixed at build time. An injector that sets a different
//! variable builds the crate with `PRELOAD_BRIDGE_ENV` set to that name. For
//! example, mirrord's macOS layer exports `MIRRORD_MACOS_ARM64_LIBRARY`, so a
//! bridge for it is built with
//! `PRELOAD_BRIDGE_ENV=MIRRORD_MACOS_ARM64_LIBRARY cargo build --release`.

use std::{
    ffi::{OsStr, OsString},
    fmt::{self, Display},
};

/// The variable name used when the build does not override it.
pub const DEFAULT_ENV_VAR: &str = "PRELOAD_BRIDGE_LIBRARY";

/// The variable holding the path of the library to load.
pub const ENV_VAR: &str = match option_env!("PRELOAD_BRIDGE_ENV") {
    Some(name) if !name.is_empty() => name,
    _ => DEFAULT_ENV_VAR,
};

/// A non-empty library path taken from the environment.
///
/// No validation happens beyond the emptiness check; whether the path exists
/// or is loadable is for the OS loader to decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPath(OsString);

impl LibraryPath {
    /// Returns `None` for an empty value.
    pub fn new(value: impl Into<OsString>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            return None;
        }
        Some(Self(value))
    }

    #[inline]
    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }
}

impl Display for LibraryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

/// Everything the bridge reads from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// The library to load, if any.
    pub library: Option<LibraryPath>,
}

impl BridgeConfig {
    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&OsStr) -> Option<OsString>,
    {
        Self {
            library: lookup(OsStr::new(ENV_VAR)).and_then(LibraryPath::new),
        }
    }

    /// Builds the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }
}
