use crate::{
    Error,
    config::BridgeConfig,
    os::{DefaultLoader, DynamicLoader, Handle},
};
use core::{
    marker::PhantomData,
    sync::atomic::{AtomicBool, Ordering},
};
use std::ffi::{OsStr, OsString};

/// What a single call into the bridge did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The variable was unset or empty; nothing was loaded.
    Skipped,
    /// The library was mapped into the process.
    Loaded(Handle),
    /// The loader refused the library. The process is otherwise unaffected.
    Failed(Error),
    /// This bridge already made its attempt; the call did nothing.
    AlreadyAttempted,
}

impl Outcome {
    #[inline]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Outcome::Loaded(_))
    }
}

/// The one-shot bridge.
///
/// A bridge starts out unloaded. The first call to [`Bridge::attempt`] or
/// [`Bridge::attempt_with`] moves it to attempted, reads the environment and,
/// if a library path is present, asks `L` to load it. Every later call returns
/// [`Outcome::AlreadyAttempted`] without touching the environment or the loader.
pub struct Bridge<L: DynamicLoader = DefaultLoader> {
    attempted: AtomicBool,
    _marker: PhantomData<fn() -> L>,
}

impl<L: DynamicLoader> Default for Bridge<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DynamicLoader> Bridge<L> {
    /// Creates a bridge in the unloaded state.
    #[inline]
    pub const fn new() -> Self {
        Self {
            attempted: AtomicBool::new(false),
            _marker: PhantomData,
        }
    }

    /// Whether this bridge has already made its attempt.
    #[inline]
    pub fn is_attempted(&self) -> bool {
        self.attempted.load(Ordering::Acquire)
    }

    /// Runs the bridge against the process environment.
    pub fn attempt(&self) -> Outcome {
        self.run(BridgeConfig::from_env)
    }

    /// Runs the bridge against an arbitrary variable lookup.
    ///
    /// `lookup` is only called if this is the first attempt.
    pub fn attempt_with<F>(&self, lookup: F) -> Outcome
    where
        F: FnMut(&OsStr) -> Option<OsString>,
    {
        self.run(|| BridgeConfig::from_lookup(lookup))
    }

    fn run(&self, config: impl FnOnce() -> BridgeConfig) -> Outcome {
        if self
            .attempted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            #[cfg(feature = "log")]
            log::trace!("[Bridge] already attempted, ignoring");
            return Outcome::AlreadyAttempted;
        }
        load::<L>(&config())
    }
}

fn load<L: DynamicLoader>(config: &BridgeConfig) -> Outcome {
    let Some(library) = &config.library else {
        #[cfg(feature = "log")]
        log::debug!(
            "[Bridge] {} is unset or empty, nothing to load",
            crate::config::ENV_VAR
        );
        return Outcome::Skipped;
    };
    match unsafe { L::load(library) } {
        Ok(handle) => {
            #[cfg(feature = "log")]
            log::debug!("[Bridge] loaded {} at {:p}", library, handle.as_ptr());
            Outcome::Loaded(handle)
        }
        Err(err) => {
            #[cfg(feature = "log")]
            log::warn!("[Bridge] failed to load {}: {}", library, err);
            Outcome::Failed(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Result,
        config::{ENV_VAR, LibraryPath},
        error::load_error,
    };
    use core::{ptr::NonNull, sync::atomic::AtomicUsize};

    const SLOTS: usize = 8;
    static CALLS: [AtomicUsize; SLOTS] = [const { AtomicUsize::new(0) }; SLOTS];

    // Each test uses its own slot so parallel tests don't share counters.
    struct Succeeds<const SLOT: usize>;

    impl<const SLOT: usize> DynamicLoader for Succeeds<SLOT> {
        unsafe fn load(path: &LibraryPath) -> Result<Handle> {
            CALLS[SLOT].fetch_add(1, Ordering::SeqCst);
            if path.as_os_str() != "/opt/lib/variant.so" {
                return Err(load_error(format!("unexpected path {path}")));
            }
            Ok(Handle::from_raw(NonNull::dangling()))
        }
    }

    struct Fails<const SLOT: usize>;

    impl<const SLOT: usize> DynamicLoader for Fails<SLOT> {
        unsafe fn load(_path: &LibraryPath) -> Result<Handle> {
            CALLS[SLOT].fetch_add(1, Ordering::SeqCst);
            Err(load_error("mock loader refused"))
        }
    }

    fn calls(slot: usize) -> usize {
        CALLS[slot].load(Ordering::SeqCst)
    }

    fn env(value: Option<&'static str>) -> impl FnMut(&OsStr) -> Option<OsString> {
        move |name: &OsStr| {
            if name == ENV_VAR {
                value.map(OsString::from)
            } else {
                None
            }
        }
    }

    #[test]
    fn unset_does_not_load() {
        let bridge = Bridge::<Succeeds<0>>::new();
        assert_eq!(bridge.attempt_with(env(None)), Outcome::Skipped);
        assert!(bridge.is_attempted());
        assert_eq!(calls(0), 0);
    }

    #[test]
    fn empty_is_same_as_unset() {
        let bridge = Bridge::<Succeeds<1>>::new();
        assert_eq!(bridge.attempt_with(env(Some(""))), Outcome::Skipped);
        assert_eq!(calls(1), 0);
    }

    #[test]
    fn loads_once() {
        let bridge = Bridge::<Succeeds<2>>::new();
        assert!(!bridge.is_attempted());
        let outcome = bridge.attempt_with(env(Some("/opt/lib/variant.so")));
        assert!(outcome.is_loaded(), "{outcome:?}");

        assert_eq!(
            bridge.attempt_with(env(Some("/opt/lib/variant.so"))),
            Outcome::AlreadyAttempted
        );
        assert_eq!(calls(2), 1);
    }

    #[test]
    fn failure_is_reported_not_raised() {
        let bridge = Bridge::<Fails<3>>::new();
        let outcome = bridge.attempt_with(env(Some("/no/such/file")));
        assert_eq!(outcome, Outcome::Failed(load_error("mock loader refused")));
        assert_eq!(
            bridge.attempt_with(env(Some("/no/such/file"))),
            Outcome::AlreadyAttempted
        );
        assert_eq!(calls(3), 1);
    }

    #[test]
    fn process_environment_goes_through_from_env() {
        // Whatever the test environment holds, the first attempt consults it
        // and the second does not.
        let bridge = Bridge::<Fails<4>>::new();
        let first = bridge.attempt();
        let expected_calls = match first {
            Outcome::Skipped => 0,
            Outcome::Failed(_) => 1,
            other => panic!("unexpected outcome {other:?}"),
        };
        assert_eq!(bridge.attempt(), Outcome::AlreadyAttempted);
        assert_eq!(calls(4), expected_calls);
    }

    #[test]
    fn environment_read_only_on_first_attempt() {
        let bridge = Bridge::<Succeeds<5>>::new();
        let mut reads = 0;
        bridge.attempt_with(|_: &OsStr| {
            reads += 1;
            None
        });
        bridge.attempt_with(|_: &OsStr| {
            reads += 1;
            None
        });
        assert_eq!(reads, 1);
    }

    #[test]
    fn concurrent_attempts_load_once() {
        let bridge = Bridge::<Succeeds<6>>::new();
        let loaded = AtomicUsize::new(0);
        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    if bridge
                        .attempt_with(env(Some("/opt/lib/variant.so")))
                        .is_loaded()
                    {
                        loaded.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });
        assert_eq!(loaded.load(Ordering::SeqCst), 1);
        assert_eq!(calls(6), 1);
    }
}
