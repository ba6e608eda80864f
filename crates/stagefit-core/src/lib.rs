// crates/stagefit-core/src/lib.rs
pub mod rules;
pub mod scene;
pub mod scene_file;

pub use rules::*;
pub use scene::*;
pub use scene_file::*;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
