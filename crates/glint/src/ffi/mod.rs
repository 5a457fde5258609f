//! C ABI facade
//!
//! Flat `extern "C"` entry points exposing the context, its input block,
//! the background draw list and the compiled-in backends to C callers.
//! Every function takes the [`Context`](crate::context::Context) it
//! operates on as an explicit parameter; there is no implicit current
//! context. Backend instances created through the facade are parked on
//! the context in its type-erased slots and fetched back on each call,
//! so callers only ever hold the one context pointer.
//!
//! # Pointer contract
//!
//! Context pointers must come from `glint_context_create` and not yet
//! have been passed to `glint_context_destroy`; string pointers must
//! be NUL-terminated; out-pointers must be writable. The required call
//! order (init, then new-frame through render-draw-data once per frame,
//! then shutdown) is the caller's responsibility. Violating either is
//! undefined behavior. Panics never unwind into the caller: the facade
//! catches them and aborts the process.

// All entry points share the pointer contract above.
#![allow(clippy::missing_safety_doc)]

mod context_api;
#[cfg(feature = "docking")]
mod docking_api;
mod draw_api;
mod io_api;
#[cfg(feature = "latest")]
mod latest_api;
#[cfg(feature = "backend-glfw")]
mod platform_api;
#[cfg(feature = "renderer-opengl")]
mod renderer_api;
mod symbols;

#[cfg(feature = "renderer-opengl")]
pub use renderer_api::GlLoaderFn;
pub use symbols::exported_symbols;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::process;

/// Runs an entry point's body, aborting instead of unwinding across the
/// C boundary.
fn abort_on_panic<T>(entry_point: &str, body: impl FnOnce() -> T) -> T {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(value) => value,
        Err(_) => {
            eprintln!("{entry_point} panicked; aborting");
            process::abort();
        }
    }
}
