#![no_std]
#![crate_type = "cdylib"]
#![crate_name = "variant"]

use core::ffi::c_char;
use core::panic::PanicInfo;
use core::sync::atomic::{AtomicU32, Ordering};

#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {}
}

#[link(name = "c")]
unsafe extern "C" {
    fn getenv(name: *const c_char) -> *const c_char;
    fn write(fd: i32, buf: *const u8, count: usize) -> isize;
}

const ANNOUNCE_ENV: &[u8] = b"VARIANT_ANNOUNCE\0";
const ANNOUNCEMENT: &[u8] = b"variant loaded\n";

static INIT_COUNT: AtomicU32 = AtomicU32::new(0);

extern "C" fn on_load() {
    INIT_COUNT.fetch_add(1, Ordering::SeqCst);
    unsafe {
        if !getenv(ANNOUNCE_ENV.as_ptr().cast()).is_null() {
            write(1, ANNOUNCEMENT.as_ptr(), ANNOUNCEMENT.len());
        }
    }
}

#[used]
#[cfg_attr(
    any(target_os = "macos", target_os = "ios"),
    unsafe(link_section = "__DATA,__mod_init_func")
)]
#[cfg_attr(
    not(any(target_os = "macos", target_os = "ios")),
    unsafe(link_section = ".init_array")
)]
static ON_LOAD: extern "C" fn() = on_load;

/// How many times the loader ran this library's initializer.
#[unsafe(no_mangle)]
pub extern "C" fn variant_init_count() -> u32 {
    INIT_COUNT.load(Ordering::SeqCst)
}

#[unsafe(no_mangle)]
pub extern "C" fn variant_answer() -> i32 {
    42
}
