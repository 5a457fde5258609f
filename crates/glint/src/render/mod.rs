//! Renderer backend contract and implementations
//!
//! A renderer backend owns the GPU-side half of the engine: device
//! objects (shaders, buffers, the font atlas texture) and the submission
//! path that turns a sealed [`DrawData`](crate::draw::DrawData) into API
//! calls. Like platform backends, concrete renderers are selected at
//! compile time through cargo features and speak to the engine only
//! through borrows passed into each call.

#[cfg(feature = "renderer-opengl")]
pub mod opengl;

use crate::context::Context;
use crate::draw::DrawData;

/// Result type for renderer backend operations.
pub type RendererResult<T> = Result<T, RendererError>;

/// Recoverable renderer failures.
///
/// Draw submission against invalidated draw data is a call-order
/// violation and panics instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    /// The graphics API version reported by the driver is below what the
    /// backend supports.
    #[error("Unsupported graphics API version: {0}")]
    UnsupportedVersion(String),

    /// Allocating a GPU object failed.
    #[error("Failed to create {what}: {detail}")]
    CreateObject {
        /// Kind of object being created, e.g. `"vertex buffer"`.
        what: &'static str,
        /// Driver-reported detail.
        detail: String,
    },

    /// A shader stage failed to compile; the payload is the driver's
    /// info log.
    #[error("Shader compilation failed: {0}")]
    CompileShader(String),

    /// Program linking failed; the payload is the driver's info log.
    #[error("Program link failed: {0}")]
    LinkProgram(String),

    /// A uniform or attribute the backend requires was optimized out or
    /// missing from the linked program.
    #[error("Shader symbol not found: {0}")]
    MissingShaderSymbol(&'static str),

    /// Rasterizing the font atlas failed while uploading the font texture.
    #[error("Font atlas build failed: {0}")]
    BuildAtlas(#[from] crate::fonts::FontError),

    /// The font atlas has no pixel data to upload.
    #[error("Font atlas is not built")]
    AtlasNotBuilt,
}

/// Per-frame contract every renderer backend fulfills.
///
/// `new_frame` runs once per frame before [`Context::new_frame`] and
/// lazily (re)creates device objects, so a caller that destroyed them
/// mid-session gets working state back on the next frame.
pub trait RendererBackend {
    /// Ensures device objects exist and the font atlas texture matches
    /// the atlas contents.
    fn new_frame(&mut self, ctx: &mut Context) -> RendererResult<()>;

    /// Replays `draw_data` into the graphics API. The caller's API state
    /// is saved up front and restored afterwards.
    fn render_draw_data(&mut self, draw_data: &DrawData) -> RendererResult<()>;

    /// Reverses init: destroys device objects and clears the backend
    /// identity. The backend must not be used afterwards.
    fn shutdown(&mut self, ctx: &mut Context);
}
