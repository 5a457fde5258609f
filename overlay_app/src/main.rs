//! Overlay demo application
//!
//! Drives glint end to end from Rust: a GLFW window, the GLFW platform
//! backend fed through polled window events, the glow renderer, and a
//! small animated overlay built from the background draw list.

mod config;

use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use glfw::Context as _;
use glow::HasContext as _;

use glint::backend::glfw::GlfwPlatform;
use glint::draw::col32;
use glint::fonts::FontConfig;
use glint::render::opengl::GlowRenderer;
use glint::variant;
use glint::Context;

use crate::config::AppConfig;

struct OverlayApp {
    glfw: glfw::Glfw,
    window: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
    gl: Rc<glow::Context>,
    ctx: Context,
    platform: GlfwPlatform,
    renderer: GlowRenderer,
    clear_color: [f32; 3],
    start: Instant,
}

impl OverlayApp {
    fn new(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        log::info!("Creating window...");
        let mut glfw = glfw::init(glfw::fail_on_errors)?;
        glfw.window_hint(glfw::WindowHint::ContextVersion(3, 3));
        glfw.window_hint(glfw::WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
        glfw.window_hint(glfw::WindowHint::OpenGlForwardCompat(true));
        glfw.window_hint(glfw::WindowHint::Resizable(true));

        let (mut window, events) = glfw
            .create_window(
                config.window.width,
                config.window.height,
                &config.window.title,
                glfw::WindowMode::Windowed,
            )
            .ok_or("Failed to create GLFW window")?;
        window.make_current();
        window.set_all_polling(true);
        glfw.set_swap_interval(if config.window.vsync {
            glfw::SwapInterval::Sync(1)
        } else {
            glfw::SwapInterval::None
        });

        let mut ctx = Context::create();
        if let Some(path) = &config.overlay.font_path {
            load_font(&mut ctx, path, config.overlay.font_size);
        } else {
            log::info!("No overlay font configured, text will be skipped");
        }

        log::info!("Attaching platform backend...");
        let platform = GlfwPlatform::init_for_opengl(&mut window, false, &mut ctx)?;

        log::info!("Attaching renderer backend...");
        let gl = unsafe {
            glow::Context::from_loader_function(|s| window.get_proc_address(s) as *const _)
        };
        let gl = Rc::new(gl);
        let renderer = GlowRenderer::from_shared_context(Rc::clone(&gl), &mut ctx)?;

        Ok(Self {
            glfw,
            window,
            events,
            gl,
            ctx,
            platform,
            renderer,
            clear_color: config.overlay.clear_color,
            start: Instant::now(),
        })
    }

    fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("Entering frame loop");
        while !self.window.should_close() {
            self.glfw.poll_events();
            for (_, event) in glfw::flush_messages(&self.events) {
                if let glfw::WindowEvent::Key(glfw::Key::Escape, _, glfw::Action::Press, _) = event
                {
                    self.window.set_should_close(true);
                }
                self.platform.handle_window_event(self.ctx.io_mut(), &event);
            }

            self.platform.new_frame(&mut self.ctx);
            self.renderer.new_frame(&mut self.ctx)?;
            self.ctx.new_frame();

            self.draw_overlay();
            self.ctx.render();

            let [r, g, b] = self.clear_color;
            unsafe {
                self.gl.clear_color(r, g, b, 1.0);
                self.gl.clear(glow::COLOR_BUFFER_BIT);
            }
            self.renderer.render_draw_data(self.ctx.draw_data())?;
            self.window.swap_buffers();
        }

        log::info!("Shutting down backends");
        self.renderer.shutdown(&mut self.ctx);
        self.platform.shutdown(&mut self.ctx);
        Ok(())
    }

    fn draw_overlay(&mut self) {
        let elapsed = self.start.elapsed().as_secs_f32();
        let [w, h] = self.ctx.io().display_size;
        let fps = 1.0 / self.ctx.io().delta_time.max(1e-6);
        let frame = self.ctx.frame_count();
        let atlas_tex = self.ctx.fonts().texture_id();
        let (list, fonts) = self.ctx.draw();

        // Status panel, top-left.
        list.add_rect_filled([16.0, 16.0], [380.0, 92.0], col32(20, 24, 34, 208));
        list.add_rect([16.0, 16.0], [380.0, 92.0], col32(90, 160, 255, 255), 1.0);
        list.add_text(
            fonts,
            [28.0, 26.0],
            col32(235, 235, 240, 255),
            &variant::version_string(),
        );
        let stats = format!("frame {frame}  {fps:.0} fps");
        list.add_text(fonts, [28.0, 52.0], col32(160, 200, 160, 255), &stats);

        // Pulsing marker, top-right.
        let pulse = (elapsed * 2.0).sin() * 0.5 + 0.5;
        let radius = 8.0 + pulse * 6.0;
        let cx = w - 48.0;
        list.add_rect_filled(
            [cx - radius, 48.0 - radius],
            [cx + radius, 48.0 + radius],
            col32(255, 120, 60, 230),
        );

        // Font atlas preview, bottom-right. Only valid once the renderer has
        // uploaded the texture, so the first frame skips it.
        if !atlas_tex.is_null() {
            let preview = 128.0;
            let min = [w - preview - 16.0, h - preview - 160.0];
            let max = [w - 16.0, h - 160.0];
            list.add_rect_filled(min, max, col32(20, 24, 34, 208));
            list.add_image(atlas_tex, min, max, [0.0, 0.0], [1.0, 1.0], col32(255, 255, 255, 255));
            list.add_rect(min, max, col32(90, 160, 255, 255), 1.0);
        }

        // Scrolling sine ribbon, clipped to a band above the bottom edge.
        let band_top = h - 140.0;
        let band_bottom = h - 40.0;
        list.push_clip_rect([0.0, band_top], [w, band_bottom], false);
        let segments = 120;
        let mut prev = [0.0, band_top + 50.0];
        for i in 1..=segments {
            let x = w * i as f32 / segments as f32;
            let y = band_top + 50.0 + (x * 0.02 + elapsed * 3.0).sin() * 32.0;
            list.add_line(prev, [x, y], col32(90, 200, 255, 255), 2.0);
            prev = [x, y];
        }
        list.pop_clip_rect();
    }
}

fn load_font(ctx: &mut Context, path: &Path, size_px: f32) {
    match std::fs::read(path) {
        Ok(bytes) => {
            let font_config = FontConfig {
                size_px,
                ..FontConfig::default()
            };
            match ctx.fonts_mut().add_font_from_bytes(&bytes, font_config) {
                Ok(_) => log::info!("Loaded overlay font from {}", path.display()),
                Err(e) => log::warn!("Failed to load overlay font: {e}"),
            }
        }
        Err(e) => log::warn!("Failed to read font file {}: {e}", path.display()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting glint overlay demo");
    let app_config = AppConfig::load_or_default(Path::new("overlay_app.toml"))?;

    let mut app = OverlayApp::new(&app_config)?;
    match app.run() {
        Ok(()) => {
            log::info!("Overlay demo finished");
            Ok(())
        }
        Err(e) => {
            log::error!("Overlay demo failed: {e}");
            Err(e)
        }
    }
}
