mod fill;
mod headless;
pub mod pixel;
mod pixel_buffer;
mod scale;
#[cfg(feature = "sdl")]
mod sdl;
mod text;

pub use fill::{fill, fill_words};
pub use headless::HeadlessPort;
pub use pixel::Pixel;
pub use pixel_buffer::{PixelBuffer, BYTES_PER_PIXEL};
pub use scale::scale;
#[cfg(feature = "sdl")]
pub use sdl::{SdlPort, Toggle};
pub use text::{layout_text, print, GlyphPlacement, GLYPH_HEIGHT, GLYPH_WIDTH};

use crate::error::Result;
use crate::growable::GrowableBuffer;

/// Keys the framebuffer cares about when waiting for input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Right,
    Left,
    Escape,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortEvent {
    /// Window close button or OS quit request
    Quit,
    KeyDown(Key),
    /// The host wants the window's pixel size changed
    Resized { width: u32, height: u32 },
}

/// Description of the host renderer, for diagnostics
#[derive(Debug, Clone, Default)]
pub struct PortInfo {
    pub driver: String,
    pub renderer: String,
    pub texture_formats: GrowableBuffer<String>,
}

/// Host window and renderer the physical buffer is shown on
pub trait PresentationPort {
    /// Resolution of the display the window lives on
    fn display_bounds(&self) -> Result<(u32, u32)>;

    /// Rebuild the window surface and texture at a new pixel size
    fn recreate_surface(&mut self, width: u32, height: u32) -> Result<()>;

    /// Upload the physical buffer and show it
    fn upload(&mut self, buffer: &PixelBuffer) -> Result<()>;

    fn show(&mut self);

    fn hide(&mut self);

    /// Iconify the window
    fn minimize(&mut self);

    /// Undo [`minimize`](Self::minimize)
    fn restore(&mut self);

    /// Drain pending events without blocking
    fn poll_events(&mut self) -> Vec<PortEvent>;

    fn info(&self) -> PortInfo;
}
