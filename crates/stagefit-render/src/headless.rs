// crates/stagefit-render/src/headless.rs
use crate::{RenderError, RenderResult, Surface};
use glam::Vec2;
use tracing::debug;

/// Surface with no backing window. Remembers its size and how often it was resized.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    size: Vec2,
    resize_count: u32,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resize_count(&self) -> u32 {
        self.resize_count
    }
}

impl Surface for HeadlessSurface {
    fn resize(&mut self, new_size: Vec2) -> RenderResult<()> {
        if !new_size.is_finite() || new_size.x < 0.0 || new_size.y < 0.0 {
            return Err(RenderError::ResizeFailed(format!("invalid size {:?}", new_size)));
        }
        debug!("Headless surface resized to {}x{}", new_size.x, new_size.y);
        self.size = new_size;
        self.resize_count += 1;
        Ok(())
    }

    fn size(&self) -> Vec2 {
        self.size
    }
}
