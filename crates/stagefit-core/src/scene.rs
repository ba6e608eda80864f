// crates/stagefit-core/src/scene.rs
use crate::{CoreError, LayoutRule, Result};
use glam::Vec2;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

pub type NodeId = u32;

/// Geometry of a node. `base_size` is the unscaled content size; `scale` and `position`
/// are written by the layout engine on every pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub base_size: Vec2,
    pub scale: Vec2,
    pub position: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            base_size: Vec2::ZERO,
            scale: Vec2::ONE,
            position: Vec2::ZERO,
        }
    }
}

impl Transform {
    /// Footprint of the node after scaling.
    pub fn scaled_size(&self) -> Vec2 {
        self.base_size * self.scale
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ResizeError {
    message: String,
}

impl ResizeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Node-supplied resize routine, run instead of the declarative rules.
pub trait ResizeHandler {
    fn resize(&mut self, transform: &mut Transform, parent_size: Vec2) -> std::result::Result<(), ResizeError>;
}

impl<F> ResizeHandler for F
where
    F: FnMut(&mut Transform, Vec2) -> std::result::Result<(), ResizeError>,
{
    fn resize(&mut self, transform: &mut Transform, parent_size: Vec2) -> std::result::Result<(), ResizeError> {
        self(transform, parent_size)
    }
}

/// How a node takes part in layout.
pub enum LayoutBehavior {
    /// Left untouched by the engine.
    None,
    Rule(LayoutRule),
    Custom(Box<dyn ResizeHandler>),
}

impl LayoutBehavior {
    pub fn rule(&self) -> Option<&LayoutRule> {
        match self {
            LayoutBehavior::Rule(rule) => Some(rule),
            _ => None,
        }
    }
}

impl Default for LayoutBehavior {
    fn default() -> Self {
        LayoutBehavior::None
    }
}

impl fmt::Debug for LayoutBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutBehavior::None => f.write_str("None"),
            LayoutBehavior::Rule(rule) => f.debug_tuple("Rule").field(rule).finish(),
            LayoutBehavior::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Node {
    pub label: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Transform,
    pub behavior: LayoutBehavior,
}

impl Node {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_base_size(mut self, width: f32, height: f32) -> Self {
        self.transform.base_size = Vec2::new(width, height);
        self
    }

    pub fn with_rule(mut self, rule: LayoutRule) -> Self {
        self.behavior = LayoutBehavior::Rule(rule);
        self
    }

    pub fn with_handler<H>(mut self, handler: H) -> Self
    where
        H: ResizeHandler + 'static,
    {
        self.behavior = LayoutBehavior::Custom(Box::new(handler));
        self
    }

    pub fn with_resize<F>(self, resize: F) -> Self
    where
        F: FnMut(&mut Transform, Vec2) -> std::result::Result<(), ResizeError> + 'static,
    {
        self.with_handler(resize)
    }

    pub fn base_size(&self) -> Vec2 {
        self.transform.base_size
    }

    pub fn scale(&self) -> Vec2 {
        self.transform.scale
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }
}

/// Arena-backed tree of nodes. The graph owns every node; links are ids.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: NodeId,
}

impl SceneGraph {
    pub fn new(root_label: impl Into<String>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(0, Node::new(root_label));
        Self {
            nodes,
            root: 0,
            next_id: 1,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(CoreError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(CoreError::NodeNotFound(id))
    }

    /// Append `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId> {
        if !self.nodes.contains_key(&parent) {
            return Err(CoreError::NodeNotFound(parent));
        }

        let id = self.next_id;
        self.next_id += 1;

        node.parent = Some(parent);
        node.children.clear();
        self.nodes.insert(id, node);
        self.node_mut(parent)?.children.push(id);

        trace!("Added node {} under {}", id, parent);
        Ok(id)
    }

    /// Remove a node together with its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: NodeId) -> Result<Node> {
        if id == self.root {
            return Err(CoreError::InvalidScene("cannot remove the root node".to_string()));
        }
        self.detach(id)?;

        let mut doomed = self.subtree(id);
        doomed.retain(|&d| d != id);
        for descendant in doomed {
            self.nodes.remove(&descendant);
        }

        self.nodes.remove(&id).ok_or(CoreError::NodeNotFound(id))
    }

    /// Unlink a node from its parent. The node and its subtree stay in the graph but are
    /// no longer reachable from the root, so layout passes skip them.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node_mut(id)?.parent.take();
        if let Some(parent_id) = parent {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|&child| child != id);
            }
        }
        Ok(())
    }

    /// Move a node (and its subtree) under a new parent, appending it to the child list.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<()> {
        if !self.nodes.contains_key(&new_parent) {
            return Err(CoreError::NodeNotFound(new_parent));
        }
        if self.subtree(id).contains(&new_parent) {
            return Err(CoreError::InvalidScene(format!(
                "node {} cannot become a child of its own descendant {}",
                id, new_parent
            )));
        }

        self.detach(id)?;
        self.node_mut(id)?.parent = Some(new_parent);
        self.node_mut(new_parent)?.children.push(id);
        Ok(())
    }

    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.preorder().into_iter().find(|id| {
            self.nodes
                .get(id)
                .map(|node| node.label == label)
                .unwrap_or(false)
        })
    }

    /// Every node reachable from the root, parents strictly before their descendants and
    /// siblings in child-list order.
    pub fn preorder(&self) -> Vec<NodeId> {
        self.subtree(self.root)
    }

    /// Pre-order listing of `id` and its descendants.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            order.push(current);
            stack.extend(node.children.iter().rev().copied());
        }

        order
    }

    /// Depth of a node below the root, or `None` if it is not reachable from it.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut depth = 0;
        let mut current = id;
        while current != self.root {
            current = self.nodes.get(&current)?.parent?;
            depth += 1;
            if depth > self.nodes.len() {
                return None;
            }
        }
        Some(depth)
    }
}
