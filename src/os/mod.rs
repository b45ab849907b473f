cfg_if::cfg_if! {
    if #[cfg(windows)]{
        pub(crate) mod windows;
        pub use windows::*;
    }else if #[cfg(unix)]{
        pub(crate) mod unix;
        pub use unix::*;
    }else {
        pub(crate) mod unsupported;
        pub use unsupported::*;
    }
}

mod traits;

pub use traits::{DynamicLoader, Handle};
