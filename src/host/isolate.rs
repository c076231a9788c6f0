//! Per-component fault isolation.
//!
//! Component code runs inside [`isolate`], which turns a panic into an error
//! string instead of unwinding through the host loop. The panic hook installed
//! by [`install_panic_hook`] restores the terminal only for panics on the host
//! thread outside an isolated call. Isolated panics are recorded for the
//! session fault; panics on any other thread (bridged programs and their
//! helpers) are logged and leave the screen alone.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe, PanicHookInfo};
use std::thread;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_PANIC: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Whether the current thread is inside an [`isolate`] call.
pub fn in_isolation() -> bool {
    DEPTH.with(Cell::get) > 0
}

/// Run `f`, converting a panic into `Err(message)`.
pub fn isolate<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));

    result.map_err(|payload| {
        LAST_PANIC
            .with(|last| last.borrow_mut().take())
            .unwrap_or_else(|| panic_message(&*payload))
    })
}

/// Install a hook that calls `restore` and then the previous hook for panics
/// on the calling (host) thread outside [`isolate`]. Panics inside `isolate`
/// are recorded silently; panics on other threads are only logged.
pub fn install_panic_hook(restore: impl Fn() + Send + Sync + 'static) {
    let host = thread::current().id();
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if in_isolation() {
            let message = describe(panic_info);
            tracing::warn!(%message, "component panicked");
            LAST_PANIC.with(|last| *last.borrow_mut() = Some(message));
            return;
        }

        let current = thread::current();
        if current.id() != host {
            let message = describe(panic_info);
            let name = current.name().unwrap_or("unnamed");
            tracing::warn!(thread = name, %message, "panic off the host thread");
            return;
        }

        restore();
        original_hook(panic_info);
    }));
}

fn describe(panic_info: &PanicHookInfo<'_>) -> String {
    let mut message = panic_message(panic_info.payload());
    if let Some(location) = panic_info.location() {
        message.push_str(&format!(" ({}:{})", location.file(), location.line()));
    }
    message
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "component panicked".to_string()
    }
}
