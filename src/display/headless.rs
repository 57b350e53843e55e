//! In-memory presentation port
//!
//! Keeps the last uploaded frame and serves scripted events. Used for
//! off-screen rendering and for exercising the framebuffer in tests.

use std::collections::VecDeque;

use super::{PixelBuffer, PortEvent, PortInfo, PresentationPort};
use crate::error::{FramebufferError, Result};
use crate::growable::GrowableBuffer;

pub struct HeadlessPort {
    display: (u32, u32),
    surface: (u32, u32),
    visible: bool,
    minimized: bool,
    frame: Option<PixelBuffer>,
    uploads: usize,
    events: VecDeque<PortEvent>,
}

impl HeadlessPort {
    /// Port attached to a virtual display of the given resolution
    pub fn new(display_width: u32, display_height: u32) -> Self {
        Self {
            display: (display_width, display_height),
            surface: (0, 0),
            visible: false,
            minimized: false,
            frame: None,
            uploads: 0,
            events: VecDeque::new(),
        }
    }

    /// Queue an event for the next `poll_events`
    pub fn push_event(&mut self, event: PortEvent) {
        self.events.push_back(event);
    }

    /// Copy of the most recently uploaded physical buffer
    pub fn last_frame(&self) -> Option<&PixelBuffer> {
        self.frame.as_ref()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.surface
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }
}

impl PresentationPort for HeadlessPort {
    fn display_bounds(&self) -> Result<(u32, u32)> {
        Ok(self.display)
    }

    fn recreate_surface(&mut self, width: u32, height: u32) -> Result<()> {
        tracing::debug!(width, height, "headless surface recreated");
        self.surface = (width, height);
        Ok(())
    }

    fn upload(&mut self, buffer: &PixelBuffer) -> Result<()> {
        if buffer.size() != self.surface {
            return Err(FramebufferError::Presentation(format!(
                "buffer {}x{} does not match surface {}x{}",
                buffer.width(),
                buffer.height(),
                self.surface.0,
                self.surface.1
            )));
        }
        self.frame = Some(buffer.clone());
        self.uploads += 1;
        Ok(())
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn minimize(&mut self) {
        self.minimized = true;
    }

    fn restore(&mut self) {
        self.minimized = false;
        self.visible = true;
    }

    fn poll_events(&mut self) -> Vec<PortEvent> {
        self.events.drain(..).collect()
    }

    fn info(&self) -> PortInfo {
        let mut texture_formats = GrowableBuffer::new();
        texture_formats.push("ARGB8888".to_string());
        PortInfo {
            driver: "headless".to_string(),
            renderer: "memory".to_string(),
            texture_formats,
        }
    }
}
