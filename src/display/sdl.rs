//! SDL2 window presentation
//!
//! Built on the `unsafe_textures` flavour of sdl2 so the streaming texture can
//! live next to the canvas that created it. The texture is destroyed by hand
//! whenever it is replaced and on drop.

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::sys::{SDL_SetWindowResizable, SDL_bool};
use sdl2::video::{FullscreenType, Window, WindowContext, WindowPos};
use sdl2::{EventPump, VideoSubsystem};

use super::{Key, PixelBuffer, PortEvent, PortInfo, PresentationPort};
use crate::config::WindowConfig;
use crate::error::{FramebufferError, Result};
use crate::growable::GrowableBuffer;

/// Setter argument for boolean window properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Yes,
    No,
    Flip,
}

impl Toggle {
    fn apply(self, current: bool) -> bool {
        match self {
            Self::Yes => true,
            Self::No => false,
            Self::Flip => !current,
        }
    }
}

pub struct SdlPort {
    video: VideoSubsystem,
    canvas: Canvas<Window>,
    texture_creator: TextureCreator<WindowContext>,
    texture: Option<Texture>,
    event_pump: EventPump,
    bordered: bool,
    resizable: bool,
    fullscreen: bool,
}

fn sdl_err(e: impl ToString) -> FramebufferError {
    FramebufferError::Presentation(e.to_string())
}

impl SdlPort {
    /// Create a hidden, centered window of `width` x `height`
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let config = WindowConfig {
            title: title.to_string(),
            width,
            height,
            ..WindowConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &WindowConfig) -> Result<Self> {
        let sdl_context = sdl2::init().map_err(sdl_err)?;
        let video = sdl_context.video().map_err(sdl_err)?;

        let mut builder = video.window(&config.title, config.width, config.height);
        builder.position_centered().hidden();
        if config.resizable {
            builder.resizable();
        }
        if config.borderless {
            builder.borderless();
        }
        let window = builder.build().map_err(sdl_err)?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if config.vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(sdl_err)?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump().map_err(sdl_err)?;

        let mut port = Self {
            video,
            canvas,
            texture_creator,
            texture: None,
            event_pump,
            bordered: !config.borderless,
            resizable: config.resizable,
            fullscreen: false,
        };
        port.replace_texture(config.width, config.height)?;
        Ok(port)
    }

    fn replace_texture(&mut self, width: u32, height: u32) -> Result<()> {
        if let Some(old) = self.texture.take() {
            // Safety: the renderer that owns it is still alive
            unsafe { old.destroy() };
        }
        let mut texture = self
            .texture_creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(sdl_err)?;
        texture.set_blend_mode(BlendMode::Blend);
        self.texture = Some(texture);
        Ok(())
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.canvas.window_mut().set_title(title).map_err(sdl_err)
    }

    pub fn set_opacity(&mut self, opacity: f32) -> Result<()> {
        self.canvas.window_mut().set_opacity(opacity).map_err(sdl_err)
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.canvas
            .window_mut()
            .set_position(WindowPos::Positioned(x), WindowPos::Positioned(y));
    }

    pub fn center(&mut self) {
        self.canvas
            .window_mut()
            .set_position(WindowPos::Centered, WindowPos::Centered);
    }

    pub fn set_border(&mut self, toggle: Toggle) {
        self.bordered = toggle.apply(self.bordered);
        self.canvas.window_mut().set_bordered(self.bordered);
    }

    pub fn set_resizable(&mut self, toggle: Toggle) {
        self.resizable = toggle.apply(self.resizable);
        let flag = if self.resizable {
            SDL_bool::SDL_TRUE
        } else {
            SDL_bool::SDL_FALSE
        };
        // Safety: the window pointer is owned by the live canvas
        unsafe { SDL_SetWindowResizable(self.canvas.window().raw(), flag) };
    }

    /// Switch between a desktop-sized fullscreen window and a normal one.
    /// The size change arrives later as a `Resized` event.
    pub fn set_fullscreen(&mut self, toggle: Toggle) -> Result<()> {
        let fullscreen = toggle.apply(self.fullscreen);
        let mode = if fullscreen {
            FullscreenType::Desktop
        } else {
            FullscreenType::Off
        };
        self.canvas.window_mut().set_fullscreen(mode).map_err(sdl_err)?;
        self.fullscreen = fullscreen;
        Ok(())
    }
}

impl PresentationPort for SdlPort {
    fn display_bounds(&self) -> Result<(u32, u32)> {
        let mode = self.video.current_display_mode(0).map_err(sdl_err)?;
        Ok((mode.w.max(0) as u32, mode.h.max(0) as u32))
    }

    fn recreate_surface(&mut self, width: u32, height: u32) -> Result<()> {
        let (current_w, current_h) = self.canvas.window().size();
        if (current_w, current_h) != (width, height) {
            self.canvas
                .window_mut()
                .set_size(width, height)
                .map_err(sdl_err)?;
        }
        self.replace_texture(width, height)?;
        tracing::debug!(width, height, "sdl surface recreated");
        Ok(())
    }

    fn upload(&mut self, buffer: &PixelBuffer) -> Result<()> {
        let texture = self
            .texture
            .as_mut()
            .ok_or_else(|| sdl_err("no streaming texture"))?;
        texture
            .update(None, buffer.as_bytes(), buffer.pitch())
            .map_err(sdl_err)?;
        self.canvas.copy(texture, None, None).map_err(sdl_err)?;
        self.canvas.present();
        Ok(())
    }

    fn show(&mut self) {
        self.canvas.window_mut().show();
    }

    fn hide(&mut self) {
        self.canvas.window_mut().hide();
    }

    fn minimize(&mut self) {
        self.canvas.window_mut().minimize();
    }

    fn restore(&mut self) {
        self.canvas.window_mut().restore();
    }

    fn poll_events(&mut self) -> Vec<PortEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(PortEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(PortEvent::KeyDown(map_key(k))),
                Event::Window {
                    win_event: WindowEvent::Resized(w, h),
                    ..
                } => {
                    if w > 0 && h > 0 {
                        events.push(PortEvent::Resized {
                            width: w as u32,
                            height: h as u32,
                        });
                    }
                },
                _ => {},
            }
        }

        events
    }

    fn info(&self) -> PortInfo {
        let renderer = self.canvas.info();
        let mut texture_formats = GrowableBuffer::new();
        for format in &renderer.texture_formats {
            texture_formats.push(format!("{:?}", format));
        }
        PortInfo {
            driver: self.video.current_video_driver().to_string(),
            renderer: renderer.name.to_string(),
            texture_formats,
        }
    }
}

impl Drop for SdlPort {
    fn drop(&mut self) {
        if let Some(texture) = self.texture.take() {
            // Safety: the canvas (and its renderer) is dropped after this runs
            unsafe { texture.destroy() };
        }
    }
}

fn map_key(key: Keycode) -> Key {
    match key {
        Keycode::Return | Keycode::KpEnter => Key::Enter,
        Keycode::Right => Key::Right,
        Keycode::Left => Key::Left,
        Keycode::Escape => Key::Escape,
        _ => Key::Other,
    }
}
