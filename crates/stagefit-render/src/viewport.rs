// crates/stagefit-render/src/viewport.rs
use glam::Vec2;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    Resized { size: Vec2 },
}

/// Where the layout engine reads the viewport size from.
pub trait ViewportSource {
    fn size(&self) -> Vec2;

    /// Hand over the change notifications gathered since the last call.
    fn drain_events(&mut self) -> Vec<ViewportEvent> {
        Vec::new()
    }
}

/// A viewport whose size is set programmatically. Every `resize` queues a
/// `ViewportEvent::Resized` for the engine to pick up.
#[derive(Debug, Clone)]
pub struct FixedViewport {
    size: Vec2,
    pending: VecDeque<ViewportEvent>,
}

impl FixedViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            pending: VecDeque::new(),
        }
    }

    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
        self.pending.push_back(ViewportEvent::Resized { size });
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl ViewportSource for FixedViewport {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn drain_events(&mut self) -> Vec<ViewportEvent> {
        self.pending.drain(..).collect()
    }
}
