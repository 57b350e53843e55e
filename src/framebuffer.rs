//! Logical/physical framebuffer pair
//!
//! The application draws into the logical buffer. `present` scales it onto
//! the physical buffer, which always matches the window's pixel size, and
//! hands that to the presentation port. Without a logical size the two are
//! the same buffer and nothing is scaled.

use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

use crate::config::WindowConfig;
use crate::display::pixel::{self, Pixel};
use crate::display::{
    self, Key, PixelBuffer, PortEvent, PresentationPort, GLYPH_HEIGHT, GLYPH_WIDTH,
};
use crate::error::{fatal, FramebufferError, Result};

/// How often the blocking waits poll the port
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The surface the application draws into
enum Logical {
    /// No logical size configured: draws go to the physical buffer
    Aliased,
    Distinct(PixelBuffer),
}

/// Events that end a `wait_for`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitFilter {
    pub any_key: bool,
    pub enter: bool,
    pub right: bool,
    pub close: bool,
}

impl WaitFilter {
    pub const ANY: Self = Self {
        any_key: true,
        enter: false,
        right: false,
        close: true,
    };

    fn matches(&self, event: &PortEvent) -> bool {
        match event {
            PortEvent::Quit => self.close,
            PortEvent::KeyDown(key) => {
                self.any_key
                    || (self.enter && *key == Key::Enter)
                    || (self.right && *key == Key::Right)
            },
            PortEvent::Resized { .. } => false,
        }
    }
}

pub struct Framebuffer<P: PresentationPort> {
    port: P,
    physical: PixelBuffer,
    logical: Logical,
    draw_color: Pixel,
    clear_color: Pixel,
    print_color: Pixel,
    print_scale: NonZeroU32,
    open: bool,
}

/// Allocate a buffer whose size has already been validated.
/// What can still fail is allocation itself, which is fatal.
#[track_caller]
fn alloc_buffer(width: u32, height: u32) -> PixelBuffer {
    match PixelBuffer::with_size(width, height) {
        Ok(buffer) => buffer,
        Err(err) => fatal(&err),
    }
}

fn check_non_zero(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FramebufferError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn check_fits_display<P: PresentationPort>(port: &P, width: u32, height: u32) -> Result<()> {
    check_non_zero(width, height)?;
    let (max_width, max_height) = port.display_bounds()?;
    if width > max_width || height > max_height {
        return Err(FramebufferError::ExceedsDisplay {
            width,
            height,
            max_width,
            max_height,
        });
    }
    Ok(())
}

impl<P: PresentationPort> Framebuffer<P> {
    /// Create a hidden framebuffer whose physical buffer matches a `width` x `height` window
    pub fn new(mut port: P, width: u32, height: u32) -> Result<Self> {
        check_fits_display(&port, width, height)?;
        if let Err(err) = port.recreate_surface(width, height) {
            fatal(&err);
        }

        tracing::info!(width, height, "framebuffer created");
        Ok(Self {
            port,
            physical: alloc_buffer(width, height),
            logical: Logical::Aliased,
            draw_color: pixel::from_rgb(pixel::WHITE),
            clear_color: pixel::from_rgb(pixel::BLACK),
            print_color: pixel::from_rgb(pixel::WHITE),
            print_scale: NonZeroU32::MIN,
            open: false,
        })
    }

    /// Create a framebuffer and apply the colors and logical size from `config`
    pub fn with_config(port: P, config: &WindowConfig) -> Result<Self> {
        config.validate()?;
        let mut fb = Self::new(port, config.width, config.height)?;
        fb.set_clear_color(config.clear_color);
        fb.set_draw_color(config.draw_color, config.draw_alpha);
        if let Some((w, h)) = config.logical_size {
            fb.set_logical_size(w, h)?;
        }
        Ok(fb)
    }

    // ========================================================================
    // Buffers
    // ========================================================================

    /// The buffer draws go into
    pub fn logical(&self) -> &PixelBuffer {
        match &self.logical {
            Logical::Aliased => &self.physical,
            Logical::Distinct(buffer) => buffer,
        }
    }

    pub fn logical_mut(&mut self) -> &mut PixelBuffer {
        match &mut self.logical {
            Logical::Aliased => &mut self.physical,
            Logical::Distinct(buffer) => buffer,
        }
    }

    /// The window-sized buffer handed to the port
    pub fn physical(&self) -> &PixelBuffer {
        &self.physical
    }

    pub fn logical_size(&self) -> (u32, u32) {
        self.logical().size()
    }

    pub fn physical_size(&self) -> (u32, u32) {
        self.physical.size()
    }

    /// True while no logical size is configured
    pub fn is_aliased(&self) -> bool {
        matches!(self.logical, Logical::Aliased)
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    // ========================================================================
    // Logical size
    // ========================================================================

    /// Draw at `width` x `height` and scale up to the window on present.
    /// The new surface starts zeroed; any previous logical content is dropped.
    pub fn set_logical_size(&mut self, width: u32, height: u32) -> Result<()> {
        check_non_zero(width, height)?;
        let (max_width, max_height) = self.physical.size();
        if width > max_width || height > max_height {
            return Err(FramebufferError::LogicalExceedsPhysical {
                width,
                height,
                max_width,
                max_height,
            });
        }

        self.logical = Logical::Distinct(alloc_buffer(width, height));
        tracing::debug!(width, height, "logical size set");
        Ok(())
    }

    /// Draw straight into the physical buffer again. Its current content stays visible.
    pub fn unset_logical_size(&mut self) {
        if self.is_aliased() {
            return;
        }
        self.logical = Logical::Aliased;
        tracing::debug!("logical size unset");
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Set the clear color from 0xRRGGBB; always opaque
    pub fn set_clear_color(&mut self, rgb: u32) {
        self.clear_color = pixel::from_rgb(rgb);
    }

    pub fn clear_color(&self) -> Pixel {
        self.clear_color
    }

    /// Set the draw color from 0xRRGGBB and an alpha
    pub fn set_draw_color(&mut self, rgb: u32, alpha: u8) {
        self.draw_color = pixel::from_rgb_alpha(rgb, alpha);
    }

    pub fn draw_color(&self) -> Pixel {
        self.draw_color
    }

    /// Fill the logical buffer with the clear color
    pub fn clear(&mut self) {
        let color = self.clear_color;
        display::fill(self.logical_mut(), color);
    }

    /// Write a pixel into the logical buffer without presenting
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Pixel) -> Result<()> {
        self.logical_mut().set_pixel(x, y, px)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Result<Pixel> {
        self.logical().get_pixel(x, y)
    }

    /// Plot the draw color and present
    pub fn draw_px(&mut self, x: u32, y: u32) -> Result<()> {
        let color = self.draw_color;
        self.draw_px_raw(x, y, color)
    }

    /// Plot a raw pixel value and present
    pub fn draw_px_raw(&mut self, x: u32, y: u32, px: Pixel) -> Result<()> {
        self.set_pixel(x, y, px)?;
        self.present()
    }

    // ========================================================================
    // Printing
    // ========================================================================

    pub fn set_print_color(&mut self, rgb: u32, alpha: u8) {
        self.print_color = pixel::from_rgb_alpha(rgb, alpha);
    }

    /// Glyph scale; 1 draws 8x8 glyphs. A scale of zero, or one whose scaled
    /// glyph does not fit a `u32`, is rejected.
    pub fn set_print_size(&mut self, scale: u32) -> Result<()> {
        let glyph = GLYPH_WIDTH.max(GLYPH_HEIGHT);
        self.print_scale = NonZeroU32::new(scale)
            .filter(|s| s.get().checked_mul(glyph).is_some())
            .ok_or(FramebufferError::InvalidPrintScale {
                scale,
                max: u32::MAX / glyph,
            })?;
        Ok(())
    }

    /// Draw text into the logical buffer; returns the number of pixels set
    pub fn print(&mut self, text: &str, x: i32, y: i32) -> usize {
        let (color, scale) = (self.print_color, self.print_scale);
        display::print(self.logical_mut(), text, x, y, color, scale)
    }

    // ========================================================================
    // Presentation
    // ========================================================================

    /// Scale the logical buffer onto the physical one (if distinct) and show it
    pub fn present(&mut self) -> Result<()> {
        if let Logical::Distinct(logical) = &self.logical {
            display::scale(logical, &mut self.physical);
        }
        self.port.upload(&self.physical)
    }

    /// Change the window's pixel size, carrying the current picture over.
    ///
    /// Fails without changing anything if the size is zero, larger than the
    /// display, or smaller than a configured logical size.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_fits_display(&self.port, width, height)?;
        if let Logical::Distinct(logical) = &self.logical {
            let (logical_width, logical_height) = logical.size();
            if width < logical_width || height < logical_height {
                return Err(FramebufferError::BelowLogicalSize {
                    width,
                    height,
                    logical_width,
                    logical_height,
                });
            }
        }

        if let Err(err) = self.port.recreate_surface(width, height) {
            fatal(&err);
        }

        let mut resized = alloc_buffer(width, height);
        display::scale(&self.physical, &mut resized);
        let old = std::mem::replace(&mut self.physical, resized);
        tracing::debug!(
            from_width = old.width(),
            from_height = old.height(),
            width,
            height,
            "physical buffer resized"
        );
        drop(old);

        if self.open {
            self.present()?;
        }
        Ok(())
    }

    // ========================================================================
    // Window state
    // ========================================================================

    pub fn open(&mut self) {
        self.port.show();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.port.hide();
        self.open = false;
    }

    /// Iconify the window; presenting on resize stops until [`restore`](Self::restore)
    pub fn minimize(&mut self) {
        self.port.minimize();
        self.open = false;
    }

    pub fn restore(&mut self) {
        self.port.restore();
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Log a description of the host renderer
    pub fn info(&self) {
        let info = self.port.info();
        tracing::info!(driver = %info.driver, renderer = %info.renderer, "presentation port");
        for format in &info.texture_formats {
            tracing::info!(format = %format, "supported texture format");
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Drain port events. Resize requests are applied, a quit request marks
    /// the window closed; every event is returned to the caller.
    pub fn pump_events(&mut self) -> Vec<PortEvent> {
        let events = self.port.poll_events();
        for event in &events {
            match *event {
                PortEvent::Resized { width, height } => {
                    if let Err(err) = self.resize(width, height) {
                        tracing::warn!(%err, width, height, "ignoring resize request");
                    }
                },
                PortEvent::Quit => self.open = false,
                PortEvent::KeyDown(_) => {},
            }
        }
        events
    }

    /// Block until an event matching `filter` arrives; returns that event
    pub fn wait_for(&mut self, filter: WaitFilter) -> PortEvent {
        loop {
            if let Some(event) = self.pump_events().into_iter().find(|e| filter.matches(e)) {
                return event;
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
    }

    /// Wait for any key or a close request, then close the window
    pub fn wait_for_close(&mut self) {
        self.wait_for(WaitFilter::ANY);
        self.close();
    }

    pub fn wait(&self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::HeadlessPort;
    use crate::error::ErrorKind;

    const WHITE_PX: Pixel = 0xFFFF_FFFF;

    fn framebuffer(width: u32, height: u32) -> Framebuffer<HeadlessPort> {
        Framebuffer::new(HeadlessPort::new(1920, 1080), width, height).unwrap()
    }

    #[test]
    fn test_new_starts_aliased_and_hidden() {
        let fb = framebuffer(32, 16);
        assert!(fb.is_aliased());
        assert!(!fb.is_open());
        assert_eq!(fb.logical_size(), (32, 16));
        assert_eq!(fb.port().surface_size(), (32, 16));
    }

    #[test]
    fn test_new_rejects_sizes_outside_display() {
        let port = HeadlessPort::new(100, 100);
        let err = Framebuffer::new(port, 101, 50).err().unwrap();
        assert!(matches!(err, FramebufferError::ExceedsDisplay { .. }));
        let err = Framebuffer::new(HeadlessPort::new(100, 100), 0, 50).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_logical_size_constraints() {
        let mut fb = framebuffer(100, 100);
        let err = fb.set_logical_size(150, 50).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(fb.is_aliased());
        assert!(fb.set_logical_size(0, 50).is_err());
        fb.set_logical_size(100, 100).unwrap();
        assert!(!fb.is_aliased());
    }

    #[test]
    fn test_set_logical_size_starts_fresh_surface() {
        let mut fb = framebuffer(8, 8);
        fb.set_logical_size(4, 4).unwrap();
        fb.set_pixel(1, 1, WHITE_PX).unwrap();
        fb.set_logical_size(2, 2).unwrap();
        assert!(fb.logical().pixels().iter().all(|&px| px == 0));
    }

    #[test]
    fn test_clear_touches_only_logical() {
        let mut fb = framebuffer(8, 8);
        fb.set_logical_size(2, 2).unwrap();
        fb.set_clear_color(0x102030);
        fb.clear();
        assert!(fb.logical().pixels().iter().all(|&px| px == 0xFF10_2030));
        assert!(fb.physical().pixels().iter().all(|&px| px == 0));
    }

    #[test]
    fn test_aliased_draw_hits_physical() {
        let mut fb = framebuffer(4, 4);
        fb.set_pixel(2, 3, 0xFF00_FF00).unwrap();
        assert_eq!(fb.physical().get_pixel(2, 3).unwrap(), 0xFF00_FF00);
    }

    #[test]
    fn test_out_of_range_draw_rejected() {
        let mut fb = framebuffer(16, 16);
        fb.set_logical_size(4, 4).unwrap();
        let err = fb.set_pixel(4, 0, WHITE_PX).unwrap_err();
        assert!(matches!(err, FramebufferError::OutOfBounds { .. }));
        assert!(fb.draw_px(0, 9).is_err());
        assert_eq!(fb.port().upload_count(), 0);
    }

    #[test]
    fn test_present_scales_logical_onto_physical() {
        let mut fb = framebuffer(16, 16);
        fb.set_logical_size(2, 2).unwrap();
        fb.set_clear_color(pixel::BLUE);
        fb.clear();
        fb.set_draw_color(0xFFFFFF, 255);
        fb.set_pixel(0, 0, fb.draw_color()).unwrap();
        fb.present().unwrap();

        let frame = fb.port().last_frame().unwrap();
        assert_eq!(frame.size(), (16, 16));
        for y in 0..16 {
            for x in 0..16 {
                let expected = if x < 8 && y < 8 {
                    WHITE_PX
                } else {
                    pixel::from_rgb(pixel::BLUE)
                };
                assert_eq!(frame.get_pixel(x, y).unwrap(), expected, "({x}, {y})");
            }
        }
        assert_eq!(frame.pixels(), fb.physical().pixels());
    }

    #[test]
    fn test_draw_px_presents() {
        let mut fb = framebuffer(4, 4);
        fb.draw_px(1, 1).unwrap();
        assert_eq!(fb.port().upload_count(), 1);
        assert_eq!(fb.port().last_frame().unwrap().get_pixel(1, 1).unwrap(), WHITE_PX);
    }

    #[test]
    fn test_unset_logical_size_realiases() {
        let mut fb = framebuffer(8, 8);
        fb.unset_logical_size();
        assert!(fb.is_aliased());

        fb.set_logical_size(2, 2).unwrap();
        fb.set_pixel(0, 0, WHITE_PX).unwrap();
        fb.present().unwrap();
        fb.unset_logical_size();
        assert!(fb.is_aliased());
        assert_eq!(fb.logical_size(), (8, 8));
        // what was presented is still there to draw over
        assert_eq!(fb.pixel(3, 3).unwrap(), WHITE_PX);
        assert_eq!(fb.pixel(4, 4).unwrap(), 0);
    }

    #[test]
    fn test_resize_preserves_content() {
        let mut fb = framebuffer(4, 4);
        fb.logical_mut().fill(WHITE_PX);
        fb.resize(8, 8).unwrap();
        assert_eq!(fb.physical_size(), (8, 8));
        assert_eq!(fb.port().surface_size(), (8, 8));
        for sy in 0..4 {
            for sx in 0..4 {
                for (x, y) in [
                    (sx * 2, sy * 2),
                    (sx * 2 + 1, sy * 2),
                    (sx * 2, sy * 2 + 1),
                    (sx * 2 + 1, sy * 2 + 1),
                ] {
                    assert_eq!(fb.physical().get_pixel(x, y).unwrap(), WHITE_PX);
                }
            }
        }
    }

    #[test]
    fn test_resize_scales_picture() {
        let mut fb = framebuffer(2, 2);
        fb.set_pixel(1, 0, 0xFFAA_0000).unwrap();
        fb.resize(6, 4).unwrap();
        for y in 0..4 {
            for x in 0..6 {
                let expected = if x >= 3 && y < 2 { 0xFFAA_0000 } else { 0 };
                assert_eq!(fb.physical().get_pixel(x, y).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_resize_rejections_leave_state_untouched() {
        let mut fb = Framebuffer::new(HeadlessPort::new(64, 64), 32, 32).unwrap();
        fb.set_logical_size(16, 16).unwrap();

        let err = fb.resize(65, 10).unwrap_err();
        assert!(matches!(err, FramebufferError::ExceedsDisplay { .. }));
        assert!(fb.resize(0, 20).is_err());
        let err = fb.resize(15, 40).unwrap_err();
        assert!(matches!(err, FramebufferError::BelowLogicalSize { .. }));

        assert_eq!(fb.physical_size(), (32, 32));
        assert_eq!(fb.port().surface_size(), (32, 32));

        fb.unset_logical_size();
        fb.resize(15, 40).unwrap();
        assert_eq!(fb.logical_size(), (15, 40));
    }

    #[test]
    fn test_resize_presents_only_when_open() {
        let mut fb = framebuffer(4, 4);
        fb.resize(8, 8).unwrap();
        assert_eq!(fb.port().upload_count(), 0);

        fb.open();
        assert!(fb.port().is_visible());
        fb.resize(12, 12).unwrap();
        assert_eq!(fb.port().upload_count(), 1);
        assert_eq!(fb.port().last_frame().unwrap().size(), (12, 12));
    }

    #[test]
    fn test_minimize_and_restore_track_open_state() {
        let mut fb = framebuffer(4, 4);
        fb.open();
        fb.minimize();
        assert!(!fb.is_open());
        assert!(fb.port().is_minimized());
        fb.resize(8, 8).unwrap();
        assert_eq!(fb.port().upload_count(), 0);

        fb.restore();
        assert!(fb.is_open());
        assert!(!fb.port().is_minimized());
        fb.resize(12, 12).unwrap();
        assert_eq!(fb.port().upload_count(), 1);
    }

    #[test]
    fn test_resize_keeps_logical_buffer() {
        let mut fb = framebuffer(8, 8);
        fb.set_logical_size(4, 4).unwrap();
        fb.set_pixel(3, 3, WHITE_PX).unwrap();
        fb.resize(16, 12).unwrap();
        assert_eq!(fb.logical_size(), (4, 4));
        assert_eq!(fb.pixel(3, 3).unwrap(), WHITE_PX);
        fb.present().unwrap();
        assert_eq!(fb.physical().get_pixel(15, 11).unwrap(), WHITE_PX);
        assert_eq!(fb.physical().get_pixel(11, 8).unwrap(), 0);
    }

    #[test]
    fn test_pump_events_applies_resize_and_quit() {
        let mut fb = framebuffer(4, 4);
        fb.open();
        fb.port_mut().push_event(PortEvent::Resized {
            width: 10,
            height: 6,
        });
        fb.port_mut().push_event(PortEvent::KeyDown(Key::Left));
        fb.port_mut().push_event(PortEvent::Quit);
        let events = fb.pump_events();
        assert_eq!(events.len(), 3);
        assert_eq!(fb.physical_size(), (10, 6));
        assert!(!fb.is_open());
    }

    #[test]
    fn test_pump_events_ignores_invalid_resize() {
        let mut fb = Framebuffer::new(HeadlessPort::new(20, 20), 4, 4).unwrap();
        fb.port_mut().push_event(PortEvent::Resized {
            width: 40,
            height: 4,
        });
        fb.pump_events();
        assert_eq!(fb.physical_size(), (4, 4));
    }

    #[test]
    fn test_wait_for_matches_filter() {
        let mut fb = framebuffer(4, 4);
        fb.port_mut().push_event(PortEvent::KeyDown(Key::Left));
        fb.port_mut().push_event(PortEvent::KeyDown(Key::Enter));
        let filter = WaitFilter {
            enter: true,
            ..WaitFilter::default()
        };
        assert_eq!(fb.wait_for(filter), PortEvent::KeyDown(Key::Enter));
    }

    #[test]
    fn test_wait_for_close_closes() {
        let mut fb = framebuffer(4, 4);
        fb.open();
        fb.port_mut().push_event(PortEvent::KeyDown(Key::Other));
        fb.wait_for_close();
        assert!(!fb.is_open());
        assert!(!fb.port().is_visible());
    }

    #[test]
    fn test_print_draws_into_logical() {
        let mut fb = framebuffer(32, 32);
        fb.set_logical_size(16, 16).unwrap();
        fb.set_print_color(0x00FF00, 255);
        let written = fb.print("Hi", 0, 0);
        assert!(written > 0);
        let lit = fb
            .logical()
            .pixels()
            .iter()
            .filter(|&&px| px == 0xFF00_FF00)
            .count();
        assert_eq!(lit, written);
        assert!(fb.set_print_size(0).is_err());
        fb.set_print_size(2).unwrap();
        assert!(fb.print("Hi", 0, 0) > written);
    }

    #[test]
    fn test_print_size_rejects_zero_and_overflowing_scales() {
        let mut fb = framebuffer(16, 16);
        let err = fb.set_print_size(0).unwrap_err();
        assert_eq!(
            err,
            FramebufferError::InvalidPrintScale {
                scale: 0,
                max: u32::MAX / 8
            }
        );
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = fb.set_print_size(1 << 29).unwrap_err();
        assert!(matches!(
            err,
            FramebufferError::InvalidPrintScale { scale, .. } if scale == 1 << 29
        ));

        // the largest accepted scale still prints, clipped to the buffer
        fb.set_print_size(u32::MAX / 8).unwrap();
        let written = fb.print("A", 0, 0);
        assert!(written <= 16 * 16);
        assert_eq!(fb.print("A", 100, 100), 0);
    }

    #[test]
    fn test_with_config() {
        let config = WindowConfig {
            width: 128,
            height: 128,
            logical_size: Some((16, 16)),
            clear_color: pixel::BLUE,
            draw_color: 0x123456,
            draw_alpha: 0x80,
            ..WindowConfig::default()
        };
        let fb = Framebuffer::with_config(HeadlessPort::new(640, 480), &config).unwrap();
        assert_eq!(fb.physical_size(), (128, 128));
        assert_eq!(fb.logical_size(), (16, 16));
        assert_eq!(fb.clear_color(), 0xFF1E_69D2);
        assert_eq!(fb.draw_color(), 0x8012_3456);
    }
}
