//! Minimal 2D pixel framebuffer
//!
//! Draw pixels and text into a logical surface of any resolution and present
//! it, nearest-neighbor scaled, on a window whose size can change at runtime.
//!
//! ```
//! use pixport::{Framebuffer, HeadlessPort};
//!
//! let mut fb = Framebuffer::new(HeadlessPort::new(1920, 1080), 128, 128)?;
//! fb.set_logical_size(16, 16)?;
//! fb.set_clear_color(pixport::pixel::BLUE);
//! fb.clear();
//! fb.set_pixel(8, 4, pixport::pixel::pack_rgb(255, 255, 255))?;
//! fb.present()?;
//! assert_eq!(fb.physical().get_pixel(128 / 2, 4 * 8)?, 0xFFFF_FFFF);
//! # Ok::<(), pixport::FramebufferError>(())
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod growable;
pub mod logging;
pub mod measure;

pub use config::WindowConfig;
pub use display::{
    pixel, HeadlessPort, Key, Pixel, PixelBuffer, PortEvent, PortInfo, PresentationPort,
};
#[cfg(feature = "sdl")]
pub use display::{SdlPort, Toggle};
pub use error::{ErrorKind, FramebufferError, Result};
pub use framebuffer::{Framebuffer, WaitFilter};
pub use growable::GrowableBuffer;
pub use measure::{FpsCounter, Measure, MeasureReport};
