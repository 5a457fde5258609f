//! The GUI session context
//!
//! [`Context`] is the arena every other part of the crate works against:
//! it owns the [`Io`] block, the font atlas, the frame's draw lists and the
//! sealed [`DrawData`]. Platform and renderer backends never store a
//! pointer to it; each of their operations borrows the context (or just its
//! `Io`) explicitly for the duration of the call. For the C facade the
//! context additionally carries type-erased slots in which the flat API
//! parks backend instances between calls.
//!
//! Call order per frame is `new_frame` → draw-list access → `render`.
//! Breaking it is a programming error and panics; see the crate-level
//! error-handling notes.

use std::any::Any;
use std::ffi::CString;

use crate::clipboard::ClipboardBackend;
use crate::draw::{DrawData, DrawList, DrawListData};
use crate::fonts::FontAtlas;
use crate::io::Io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramePhase {
    Idle,
    InFrame,
    Rendered,
}

/// One GUI session.
///
/// Contains raw pointers to its own buffers inside the sealed [`DrawData`],
/// so it is neither `Send` nor `Sync`; a context stays on the thread that
/// uses it, and cross-thread use requires external mutual exclusion.
pub struct Context {
    io: Io,
    fonts: FontAtlas,
    background: DrawList,
    list_views: Vec<DrawListData>,
    draw_data: DrawData,
    frame_count: u64,
    phase: FramePhase,
    clipboard: Option<Box<dyn ClipboardBackend>>,
    pub(crate) clipboard_cache: Option<CString>,
    platform_slot: Option<Box<dyn Any>>,
    renderer_slot: Option<Box<dyn Any>>,
    #[cfg(feature = "docking")]
    dock: crate::docking::DockSpace,
}

impl Default for Context {
    fn default() -> Self {
        Self::create()
    }
}

impl Context {
    /// Creates a fresh session with nothing attached.
    #[must_use]
    pub fn create() -> Self {
        log::info!("Context created ({})", crate::variant::version_string());
        Self {
            io: Io::new(),
            fonts: FontAtlas::new(),
            background: DrawList::default(),
            list_views: Vec::new(),
            draw_data: DrawData::invalid(),
            frame_count: 0,
            phase: FramePhase::Idle,
            clipboard: None,
            clipboard_cache: None,
            platform_slot: None,
            renderer_slot: None,
            #[cfg(feature = "docking")]
            dock: crate::docking::DockSpace::new(),
        }
    }

    /// Input/output block.
    #[must_use]
    pub fn io(&self) -> &Io {
        &self.io
    }

    /// Mutable input/output block.
    pub fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    /// Font atlas.
    #[must_use]
    pub fn fonts(&self) -> &FontAtlas {
        &self.fonts
    }

    /// Mutable font atlas.
    pub fn fonts_mut(&mut self) -> &mut FontAtlas {
        &mut self.fonts
    }

    /// Frames begun since creation.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Begins a frame: invalidates the previous frame's [`DrawData`],
    /// drains the input queue into [`Io`], and resets the draw lists.
    ///
    /// Calling it again without an intervening [`Context::render`] is
    /// allowed; the skipped frame's geometry is discarded.
    ///
    /// # Panics
    /// Panics when `io.delta_time` is not positive, when the display size
    /// is negative or not finite, or when the font atlas fails to build.
    /// All three are setup errors in the embedding application.
    pub fn new_frame(&mut self) {
        let [w, h] = self.io.display_size;
        assert!(
            w.is_finite() && h.is_finite() && w >= 0.0 && h >= 0.0,
            "new_frame requires a valid display size, got {w}x{h}"
        );
        assert!(
            self.io.delta_time > 0.0,
            "new_frame requires a positive delta_time"
        );
        if let Err(e) = self.fonts.ensure_built() {
            panic!("font atlas build failed: {e}");
        }

        // Invalidate before touching the buffers the old views point into.
        self.draw_data = DrawData::invalid();
        self.list_views.clear();

        self.io.drain_events();
        self.frame_count += 1;

        self.background
            .reset([0.0, 0.0, w, h], self.fonts.texture_id(), self.fonts.white_uv());

        #[cfg(feature = "docking")]
        if self
            .io
            .config_flags
            .contains(crate::io::ConfigFlags::DOCKING_ENABLE)
        {
            self.dock.update([w, h]);
        }

        self.phase = FramePhase::InFrame;
    }

    /// Seals the frame into [`DrawData`] and returns it. The result stays
    /// readable through [`Context::draw_data`] until the next
    /// [`Context::new_frame`].
    ///
    /// # Panics
    /// Panics when no frame is open.
    pub fn render(&mut self) -> &DrawData {
        assert!(
            self.phase == FramePhase::InFrame,
            "render called without a matching new_frame"
        );

        self.list_views.clear();
        if self.background.idx_count() > 0 {
            self.list_views.push(DrawListData::from_list(&self.background));
        }

        let total_vtx: usize = self.list_views.iter().map(|l| l.vtx_len as usize).sum();
        let total_idx: usize = self.list_views.iter().map(|l| l.idx_len as usize).sum();

        self.draw_data = DrawData {
            valid: true,
            cmd_lists: self.list_views.as_ptr(),
            cmd_lists_count: self.list_views.len() as i32,
            total_idx_count: total_idx as i32,
            total_vtx_count: total_vtx as i32,
            display_pos: [0.0, 0.0],
            display_size: self.io.display_size,
            framebuffer_scale: self.io.display_framebuffer_scale,
        };
        self.phase = FramePhase::Rendered;
        &self.draw_data
    }

    /// The most recently sealed frame; `valid` is false between
    /// `new_frame` and `render`.
    #[must_use]
    pub fn draw_data(&self) -> &DrawData {
        &self.draw_data
    }

    /// Draw list rendered beneath everything else this frame.
    ///
    /// # Panics
    /// Panics when no frame is open.
    pub fn background_draw_list(&mut self) -> &mut DrawList {
        assert!(
            self.phase == FramePhase::InFrame,
            "draw lists are only accessible between new_frame and render"
        );
        &mut self.background
    }

    /// Background draw list together with the atlas, for text primitives.
    ///
    /// # Panics
    /// Panics when no frame is open.
    pub fn draw(&mut self) -> (&mut DrawList, &FontAtlas) {
        assert!(
            self.phase == FramePhase::InFrame,
            "draw lists are only accessible between new_frame and render"
        );
        (&mut self.background, &self.fonts)
    }

    /// Installs a clipboard implementation; platform backends call this
    /// during init.
    pub fn set_clipboard_backend(&mut self, backend: Box<dyn ClipboardBackend>) {
        self.clipboard = Some(backend);
    }

    /// Drops the installed clipboard implementation. Platform backends
    /// call this on shutdown because their clipboard may borrow window
    /// resources that die with the backend.
    pub fn clear_clipboard_backend(&mut self) {
        self.clipboard = None;
    }

    /// Current clipboard text, when a backend is installed.
    pub fn clipboard_text(&mut self) -> Option<String> {
        self.clipboard.as_mut().and_then(|c| c.get())
    }

    /// Writes the clipboard, when a backend is installed.
    pub fn set_clipboard_text(&mut self, text: &str) {
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard.set(text);
        }
    }

    /// Parks a platform backend instance on the context. Used by the C
    /// facade, which has no other place to keep the instance between
    /// calls.
    pub fn set_platform_backend<T: Any>(&mut self, backend: T) {
        self.platform_slot = Some(Box::new(backend));
    }

    /// Parked platform backend, when it is a `T`.
    #[must_use]
    pub fn platform_backend<T: Any>(&self) -> Option<&T> {
        self.platform_slot.as_deref().and_then(<dyn Any>::downcast_ref)
    }

    /// Parked platform backend, mutable.
    pub fn platform_backend_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.platform_slot.as_deref_mut().and_then(<dyn Any>::downcast_mut)
    }

    /// Removes and returns the parked platform backend.
    pub fn take_platform_backend(&mut self) -> Option<Box<dyn Any>> {
        self.platform_slot.take()
    }

    /// Puts a previously taken platform backend back without re-boxing.
    pub(crate) fn park_platform_boxed(&mut self, backend: Box<dyn Any>) {
        self.platform_slot = Some(backend);
    }

    /// Parked platform backend and [`Io`] in one borrow, for calls that
    /// feed events to the backend. The two live in disjoint fields, so
    /// handing both out at once is sound.
    pub fn platform_backend_with_io<T: Any>(&mut self) -> (Option<&mut T>, &mut Io) {
        (
            self.platform_slot.as_deref_mut().and_then(<dyn Any>::downcast_mut),
            &mut self.io,
        )
    }

    /// Parks a renderer backend instance on the context.
    pub fn set_renderer_backend<T: Any>(&mut self, backend: T) {
        self.renderer_slot = Some(Box::new(backend));
    }

    /// Parked renderer backend, when it is a `T`.
    #[must_use]
    pub fn renderer_backend<T: Any>(&self) -> Option<&T> {
        self.renderer_slot.as_deref().and_then(<dyn Any>::downcast_ref)
    }

    /// Parked renderer backend, mutable.
    pub fn renderer_backend_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.renderer_slot.as_deref_mut().and_then(<dyn Any>::downcast_mut)
    }

    /// Removes and returns the parked renderer backend.
    pub fn take_renderer_backend(&mut self) -> Option<Box<dyn Any>> {
        self.renderer_slot.take()
    }

    /// Puts a previously taken renderer backend back without re-boxing.
    pub(crate) fn park_renderer_boxed(&mut self, backend: Box<dyn Any>) {
        self.renderer_slot = Some(backend);
    }

    /// Parked renderer backend and the font atlas in one borrow, for
    /// font-texture lifecycle calls.
    pub fn renderer_backend_with_fonts<T: Any>(&mut self) -> (Option<&mut T>, &mut FontAtlas) {
        (
            self.renderer_slot.as_deref_mut().and_then(<dyn Any>::downcast_mut),
            &mut self.fonts,
        )
    }

    /// Dock-node registry.
    #[cfg(feature = "docking")]
    #[must_use]
    pub fn docking(&self) -> &crate::docking::DockSpace {
        &self.dock
    }

    /// Mutable dock-node registry.
    #[cfg(feature = "docking")]
    pub fn docking_mut(&mut self) -> &mut crate::docking::DockSpace {
        &mut self.dock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::col32;

    fn frame_ready_context() -> Context {
        let mut ctx = Context::create();
        ctx.io_mut().display_size = [800.0, 600.0];
        ctx
    }

    #[test]
    fn test_fresh_context_has_invalid_draw_data() {
        let ctx = Context::create();
        assert!(!ctx.draw_data().valid);
        assert_eq!(ctx.frame_count(), 0);
    }

    #[test]
    fn test_frame_seals_draw_data() {
        let mut ctx = frame_ready_context();
        ctx.new_frame();
        ctx.background_draw_list()
            .add_rect_filled([0.0, 0.0], [10.0, 10.0], col32(255, 0, 0, 255));
        let data = ctx.render();
        assert!(data.valid);
        assert_eq!(data.cmd_lists_count, 1);
        assert_eq!(data.total_vtx_count, 4);
        assert_eq!(data.total_idx_count, 6);
        assert_eq!(data.display_size, [800.0, 600.0]);

        let lists = data.draw_lists();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].vertices().len(), 4);
        assert_eq!(lists[0].indices().len(), 6);
        assert_eq!(lists[0].commands().len(), 1);
    }

    #[test]
    fn test_empty_frame_seals_with_no_lists() {
        let mut ctx = frame_ready_context();
        ctx.new_frame();
        let data = ctx.render();
        assert!(data.valid);
        assert_eq!(data.cmd_lists_count, 0);
        assert!(data.draw_lists().is_empty());
    }

    #[test]
    fn test_new_frame_invalidates_previous_output() {
        let mut ctx = frame_ready_context();
        ctx.new_frame();
        ctx.background_draw_list()
            .add_rect_filled([0.0, 0.0], [10.0, 10.0], col32(255, 0, 0, 255));
        ctx.render();
        assert!(ctx.draw_data().valid);

        ctx.new_frame();
        assert!(!ctx.draw_data().valid);
        assert_eq!(ctx.draw_data().cmd_lists_count, 0);
        assert!(ctx.draw_data().cmd_lists.is_null());
    }

    #[test]
    fn test_new_frame_twice_without_render_is_allowed() {
        let mut ctx = frame_ready_context();
        ctx.new_frame();
        ctx.background_draw_list()
            .add_rect_filled([0.0, 0.0], [10.0, 10.0], col32(255, 0, 0, 255));
        ctx.new_frame();
        let data = ctx.render();
        assert!(data.valid);
        assert_eq!(data.total_vtx_count, 0);
        assert_eq!(ctx.frame_count(), 2);
    }

    #[test]
    #[should_panic(expected = "render called without a matching new_frame")]
    fn test_render_before_new_frame_panics() {
        let mut ctx = frame_ready_context();
        let _ = ctx.render();
    }

    #[test]
    #[should_panic(expected = "draw lists are only accessible")]
    fn test_draw_list_access_outside_frame_panics() {
        let mut ctx = frame_ready_context();
        let _ = ctx.background_draw_list();
    }

    #[test]
    #[should_panic(expected = "positive delta_time")]
    fn test_nonpositive_delta_time_panics() {
        let mut ctx = frame_ready_context();
        ctx.io_mut().delta_time = 0.0;
        ctx.new_frame();
    }

    #[test]
    fn test_queued_events_visible_after_new_frame() {
        let mut ctx = frame_ready_context();
        ctx.io_mut().add_mouse_pos_event(42.0, 24.0);
        ctx.new_frame();
        assert_eq!(ctx.io().mouse_pos(), [42.0, 24.0]);
    }

    #[test]
    fn test_clipboard_backend_round_trip() {
        let mut ctx = Context::create();
        assert_eq!(ctx.clipboard_text(), None);
        ctx.set_clipboard_backend(Box::new(crate::clipboard::LocalClipboard::default()));
        ctx.set_clipboard_text("hello");
        assert_eq!(ctx.clipboard_text(), Some("hello".to_owned()));
    }

    #[test]
    fn test_backend_slots_downcast() {
        struct FakeBackend {
            value: u32,
        }

        let mut ctx = Context::create();
        assert!(ctx.platform_backend::<FakeBackend>().is_none());
        ctx.set_platform_backend(FakeBackend { value: 7 });
        assert_eq!(ctx.platform_backend::<FakeBackend>().map(|b| b.value), Some(7));
        ctx.platform_backend_mut::<FakeBackend>().unwrap().value = 9;
        assert_eq!(ctx.platform_backend::<FakeBackend>().map(|b| b.value), Some(9));
        assert!(ctx.take_platform_backend().is_some());
        assert!(ctx.platform_backend::<FakeBackend>().is_none());
    }

    #[test]
    fn test_backend_slot_splits_from_io_and_fonts() {
        struct FakeBackend;

        let mut ctx = Context::create();
        let (platform, io) = ctx.platform_backend_with_io::<FakeBackend>();
        assert!(platform.is_none());
        io.add_focus_event(true);

        ctx.set_platform_backend(FakeBackend);
        let (platform, _) = ctx.platform_backend_with_io::<FakeBackend>();
        assert!(platform.is_some());

        ctx.set_renderer_backend(FakeBackend);
        let (renderer, fonts) = ctx.renderer_backend_with_fonts::<FakeBackend>();
        assert!(renderer.is_some());
        assert_eq!(fonts.font_count(), 0);
    }

    #[test]
    fn test_text_draws_through_split_borrow() {
        let mut ctx = frame_ready_context();
        ctx.new_frame();
        let (list, fonts) = ctx.draw();
        // No font registered: a text call is a quiet no-op.
        list.add_text(fonts, [5.0, 5.0], col32(255, 255, 255, 255), "hi");
        assert_eq!(list.vtx_count(), 0);
    }
}
