//! Stack traces taken where a panic is raised
//!
//! By the time the middleware catches a panic the stack has already
//! unwound, so a backtrace captured there only shows the middleware's own
//! poll path. [`install_panic_hook`] chains a hook in front of the existing
//! one that records the panicking thread's backtrace; the middleware picks
//! it up with [`take_panic_backtrace`] after catching the panic.

use std::backtrace::Backtrace;
use std::cell::RefCell;
use std::fmt::Display;
use std::panic;
use std::sync::Once;

thread_local! {
    static LAST_PANIC: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// Install the backtrace-recording panic hook, once per process
///
/// The previous hook still runs after ours, so the usual panic message is
/// printed as before.
pub fn install_panic_hook() {
    INSTALL.call_once(|| {
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let backtrace = Backtrace::force_capture();
            let _ = LAST_PANIC.try_with(|slot| {
                if let Ok(mut slot) = slot.try_borrow_mut() {
                    *slot = Some(backtrace);
                }
            });
            prev_hook(info);
        }));
    });
}

/// Backtrace of the latest panic on this thread, if the hook recorded one
pub fn take_panic_backtrace() -> Option<Backtrace> {
    LAST_PANIC
        .try_with(|slot| slot.borrow_mut().take())
        .ok()
        .flatten()
}

/// Text written to stderr for a caught panic
pub(crate) fn describe_panic(
    endpoint: &str,
    error: &dyn Display,
    backtrace: Option<&Backtrace>,
) -> String {
    match backtrace {
        Some(backtrace) => format!("panic while handling {endpoint}: {error}\n{backtrace}"),
        None => format!("panic while handling {endpoint}: {error}\n<no backtrace recorded>"),
    }
}
