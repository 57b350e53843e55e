//! Window and framebuffer settings, persisted as JSON

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::display::pixel::{BLACK, WHITE};
use crate::error::{FramebufferError, Result};

pub const DEFAULT_WIDTH: u32 = 640;
pub const DEFAULT_HEIGHT: u32 = 480;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Logical drawing resolution; `None` draws straight into the window buffer
    pub logical_size: Option<(u32, u32)>,
    /// 0xRRGGBB, always opaque
    pub clear_color: u32,
    /// 0xRRGGBB
    pub draw_color: u32,
    pub draw_alpha: u8,
    pub vsync: bool,
    pub resizable: bool,
    pub borderless: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            logical_size: None,
            clear_color: BLACK,
            draw_color: WHITE,
            draw_alpha: 255,
            vsync: true,
            resizable: false,
            borderless: false,
        }
    }
}

impl WindowConfig {
    /// Check sizes without touching any window
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(FramebufferError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if let Some((w, h)) = self.logical_size {
            if w == 0 || h == 0 {
                return Err(FramebufferError::InvalidDimensions {
                    width: w,
                    height: h,
                });
            }
            if w > self.width || h > self.height {
                return Err(FramebufferError::LogicalExceedsPhysical {
                    width: w,
                    height: h,
                    max_width: self.width,
                    max_height: self.height,
                });
            }
        }
        Ok(())
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| FramebufferError::Config(e.to_string()))?;
        fs::write(path, json).map_err(|e| FramebufferError::Config(e.to_string()))
    }

    /// Load config from a JSON file; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| FramebufferError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| FramebufferError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }
}
