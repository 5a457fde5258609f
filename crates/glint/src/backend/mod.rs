//! Platform backend contract and implementations
//!
//! Each windowing system gets one concrete backend type, selected at
//! compile time through cargo features; there is no runtime dispatch on
//! the frame path. All backends speak to the engine exclusively through
//! [`Io`](crate::io::Io) and [`Context`](crate::context::Context)
//! borrows passed into each call, never through stored context pointers.

#[cfg(feature = "backend-glfw")]
pub mod glfw;
#[cfg(feature = "backend-winit")]
pub mod winit;

use crate::context::Context;

/// Result type for platform backend setup.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Recoverable platform backend failures; everything else is a
/// call-order precondition.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Monitor introspection is unavailable on this system.
    #[error("Monitor introspection unavailable")]
    MonitorUnavailable,

    /// The window handle passed to init was null.
    #[error("Window handle is null")]
    NullWindow,

    /// A backend already installed callbacks on this window.
    #[error("Callbacks already installed on this window")]
    AlreadyInstalled,
}

/// Per-frame contract every platform backend fulfills.
///
/// `new_frame` runs exactly once per rendered frame, before
/// [`Context::new_frame`]: it refreshes display geometry and timing and
/// feeds buffered platform events into the input queue.
pub trait PlatformBackend {
    /// Prepares [`Io`](crate::io::Io) for the frame about to begin.
    fn new_frame(&mut self, ctx: &mut Context);

    /// Reverses init: detaches from the window and clears the backend
    /// identity. The backend must not be used afterwards.
    fn shutdown(&mut self, ctx: &mut Context);
}
