//! # preload_bridge
//! A tiny injectable module that loads one more library into the process it is mapped into.
//! ## Usage
//! Inject the `cdylib` built from this crate (for example with `LD_PRELOAD` or
//! `DYLD_INSERT_LIBRARIES`) and point [`config::ENV_VAR`] at the library that should follow it in:
//! ```text
//! PRELOAD_BRIDGE_LIBRARY=/opt/lib/variant.so LD_PRELOAD=libpreload_bridge.so ./target-process
//! ```
//! When the module is mapped, a load-time constructor reads the variable once and, if it names
//! a non-empty path, `dlopen`s it with lazy binding. Every failure is swallowed: the host
//! process never sees an error, a message or an abort from this module.
//!
//! On Windows the constructor would run inside `DllMain` under the loader lock, where calling
//! `LoadLibrary` is not allowed, so it is never compiled there. Windows injectors, and builds
//! without the `ctor` feature, must call [`preload_bridge_initialize`] (or [`initialize`] from
//! Rust) right after mapping the module instead.
//! ## Features
//! - `ctor` (default): run the bridge automatically at load time. Ignored on Windows.
//! - `log`: report what the bridge did through the `log` facade. Nothing is printed unless the
//!   host has installed a logger.

mod bridge;
pub mod config;
mod error;
pub mod os;

pub use bridge::{Bridge, Outcome};
pub use config::{BridgeConfig, LibraryPath};
pub use error::{Error, load_error};
pub use os::{DefaultLoader, DynamicLoader, Handle};

static BRIDGE: Bridge = Bridge::new();

/// Runs the process-wide bridge against the process environment.
///
/// Only the first call, from the load-time constructor or from here, does anything.
/// Later calls return [`Outcome::AlreadyAttempted`].
pub fn initialize() -> Outcome {
    BRIDGE.attempt()
}

/// C entry point for injectors that cannot rely on load-time constructors.
#[unsafe(no_mangle)]
pub extern "C" fn preload_bridge_initialize() {
    on_load();
}

// Unwinding into the OS loader is undefined behavior.
fn on_load() {
    let _ = std::panic::catch_unwind(|| {
        let _ = initialize();
    });
}

#[cfg(all(feature = "ctor", not(windows)))]
#[ctor::ctor]
unsafe fn run_on_load() {
    on_load();
}

pub type Result<T> = core::result::Result<T, Error>;
