// crates/stagefit-core/src/scene_file.rs
use crate::{CoreError, LayoutRule, Node, NodeId, Result, SceneGraph};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Colors used when drawing node bounds for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub enabled: bool,
    /// Start of the gradient, `0xRRGGBB`.
    pub color1: u32,
    /// End of the gradient, `0xRRGGBB`.
    pub color2: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            color1: 0x92b7d1,
            color2: 0x2d86c4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescription {
    pub label: String,
    #[serde(default)]
    pub base_size: Option<Vec2>,
    #[serde(default)]
    pub rule: Option<LayoutRule>,
    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

/// On-disk form of a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "default_viewport")]
    pub viewport: Vec2,
    #[serde(default)]
    pub overlay: OverlayConfig,
    pub root: NodeDescription,
}

fn default_viewport() -> Vec2 {
    Vec2::new(800.0, 600.0)
}

/// A loaded scene together with the settings that came with it.
#[derive(Debug)]
pub struct SceneFile {
    pub viewport: Vec2,
    pub overlay: OverlayConfig,
    pub scene: SceneGraph,
}

impl SceneDescription {
    pub fn build(&self) -> Result<SceneFile> {
        if self.viewport.x < 0.0 || self.viewport.y < 0.0 || !self.viewport.is_finite() {
            return Err(CoreError::InvalidScene(format!("invalid viewport {:?}", self.viewport)));
        }

        let mut scene = SceneGraph::new(self.root.label.clone());
        let root = scene.root();
        if let Some(base_size) = self.root.base_size {
            scene.node_mut(root)?.transform.base_size = checked_base_size(&self.root.label, base_size)?;
        }
        if self.root.rule.is_some() {
            warn!("Rule on root node '{}' is ignored; the root is sized to the viewport", self.root.label);
        }

        for child in &self.root.children {
            add_description(&mut scene, root, child)?;
        }

        debug!("Built scene '{}' with {} nodes", self.root.label, scene.len());
        Ok(SceneFile {
            viewport: self.viewport,
            overlay: self.overlay,
            scene,
        })
    }
}

fn add_description(scene: &mut SceneGraph, parent: NodeId, description: &NodeDescription) -> Result<()> {
    let mut node = Node::new(description.label.clone());
    if let Some(base_size) = description.base_size {
        node.transform.base_size = checked_base_size(&description.label, base_size)?;
    }
    if let Some(rule) = &description.rule {
        node = node.with_rule(rule.clone());
    }

    let id = scene.add_child(parent, node)?;
    for child in &description.children {
        add_description(scene, id, child)?;
    }
    Ok(())
}

fn checked_base_size(label: &str, size: Vec2) -> Result<Vec2> {
    if size.x < 0.0 || size.y < 0.0 || !size.is_finite() {
        return Err(CoreError::InvalidScene(format!(
            "node '{}' has invalid base size {:?}",
            label, size
        )));
    }
    Ok(size)
}

pub fn parse_scene(json: &str) -> Result<SceneFile> {
    let description: SceneDescription = serde_json::from_str(json)?;
    description.build()
}

pub fn load_scene_file(path: impl AsRef<Path>) -> Result<SceneFile> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    debug!("Loaded scene file {}", path.display());
    parse_scene(&json)
}
