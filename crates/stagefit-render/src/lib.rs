// crates/stagefit-render/src/lib.rs

use glam::{Vec2, Vec4};

pub mod headless;
pub mod overlay;
pub mod tree;
pub mod viewport;

pub use headless::*;
pub use overlay::*;
pub use tree::*;
pub use viewport::*;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("Surface resize failed: {0}")]
    ResizeFailed(String),
}

pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// The drawing surface the scene is overlaid on. Layout only needs to keep it sized to
/// the viewport.
pub trait Surface {
    /// Handle viewport resize
    fn resize(&mut self, new_size: Vec2) -> RenderResult<()>;

    /// Current surface size
    fn size(&self) -> Vec2;
}

/// Drawing commands produced for debugging output.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    DrawRect {
        label: String,
        position: Vec2,
        size: Vec2,
        color: Vec4,
    },
}
