//! # Glint
//!
//! Backend layer for an immediate-mode GUI engine: platform backends that
//! feed window input into the engine, renderer backends that draw its
//! output, and a C ABI facade so non-Rust hosts can drive the whole
//! thing through a shared library.
//!
//! ## Features
//!
//! - **Platform Backends**: GLFW (raw window pointers, C-friendly) and winit
//! - **Renderer Backend**: OpenGL 2.1 through 4.x and GLES 2/3 via glow
//! - **C ABI Facade**: Flat `glint_*` entry points over every backend
//! - **Build Variants**: `docking`, `hinting` and `latest` feature gates
//! - **Font Atlas**: fontdue rasterization, FreeType hinting when enabled
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use glint::context::Context;
//!
//! let mut ctx = Context::create();
//! let io = ctx.io_mut();
//! io.display_size = [1280.0, 720.0];
//! io.delta_time = 1.0 / 60.0;
//!
//! ctx.new_frame();
//! let list = ctx.background_draw_list();
//! list.add_rect_filled([40.0, 40.0], [240.0, 120.0], 0xFF33_CC33);
//! let draw_data = ctx.render();
//! // hand draw_data to a renderer backend
//! ```
//!
//! C hosts link the cdylib and call the same sequence through the
//! [`ffi`] entry points; [`ffi::exported_symbols`] lists what a build
//! exports.

// Engine-facing state
pub mod context;
pub mod draw;
pub mod io;
pub mod keys;
pub mod textures;

// Backends
pub mod backend;
pub mod clipboard;
pub mod fonts;
pub mod render;

// C surface and build identity
pub mod ffi;
pub mod variant;

#[cfg(feature = "docking")]
pub mod docking;

pub use context::Context;

/// Common imports for embedding the engine from Rust.
pub mod prelude {
    pub use crate::context::Context;
    pub use crate::draw::{DrawCmd, DrawData, DrawList};
    pub use crate::io::{BackendFlags, ConfigFlags, Io};
    pub use crate::keys::{Key, MouseButton, MouseCursor};
    pub use crate::textures::TextureId;
    pub use crate::variant::BuildVariant;

    #[cfg(feature = "backend-glfw")]
    pub use crate::backend::glfw::GlfwPlatform;
    #[cfg(feature = "backend-winit")]
    pub use crate::backend::winit::WinitPlatform;
    #[cfg(feature = "renderer-opengl")]
    pub use crate::render::opengl::GlowRenderer;
}
