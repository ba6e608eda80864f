// crates/stagefit-layout/src/lib.rs

use stagefit_core::{CoreError, ResizeError};
use stagefit_render::RenderError;

pub mod engine;
pub mod position;
pub mod scale;

pub use engine::*;
pub use position::*;
pub use scale::*;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Surface error: {0}")]
    Surface(#[from] RenderError),

    #[error("Custom resize of node '{label}' failed: {source}")]
    ResizeFailed {
        label: String,
        #[source]
        source: ResizeError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
