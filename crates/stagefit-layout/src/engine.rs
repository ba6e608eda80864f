// crates/stagefit-layout/src/engine.rs

use crate::{resolve_position, resolve_scale, LayoutError, Result};
use glam::Vec2;
use stagefit_core::{LayoutBehavior, Node, Orientation, SceneGraph};
use stagefit_render::{Surface, ViewportEvent, ViewportSource};
use tracing::{debug, trace, warn};

/// What a single layout pass touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSummary {
    pub viewport: Vec2,
    pub orientation: Orientation,
    /// Non-root nodes reached from the root.
    pub visited: usize,
    /// Nodes laid out from declarative rules.
    pub ruled: usize,
    /// Nodes that ran their own resize routine.
    pub custom: usize,
    /// Nodes skipped because their parent was missing.
    pub skipped: usize,
}

/// Keeps a scene graph laid out against a viewport.
///
/// The viewport source and the surface are injected; the scene itself stays owned by the
/// caller and is borrowed for each pass.
pub struct ResponsiveLayout<V: ViewportSource, S: Surface> {
    viewport: V,
    surface: S,
    orientation: Orientation,
    pass_count: u64,
    last_pass: Option<PassSummary>,
}

impl<V: ViewportSource, S: Surface> ResponsiveLayout<V, S> {
    /// Take ownership of the viewport source and surface and lay the scene out once.
    pub fn attach(viewport: V, surface: S, scene: &mut SceneGraph) -> Result<Self> {
        let orientation = Orientation::from_viewport(viewport.size());
        let mut layout = Self {
            viewport,
            surface,
            orientation,
            pass_count: 0,
            last_pass: None,
        };
        layout.relayout(scene)?;
        Ok(layout)
    }

    /// Recompute scale and position of every node from the current viewport size.
    ///
    /// Nodes are visited in pre-order, so a parent's base size is final before any of its
    /// children read it. A failing custom resize aborts the rest of the pass.
    pub fn relayout(&mut self, scene: &mut SceneGraph) -> Result<PassSummary> {
        let viewport = self.viewport.size();
        let orientation = Orientation::from_viewport(viewport);

        self.surface.resize(viewport)?;

        let root = scene.root();
        scene.node_mut(root)?.transform.base_size = viewport;

        let order = scene.preorder();
        trace!("Layout order: {:?}", order);

        let mut summary = PassSummary {
            viewport,
            orientation,
            visited: 0,
            ruled: 0,
            custom: 0,
            skipped: 0,
        };

        for id in order {
            if id == root {
                continue;
            }
            summary.visited += 1;

            let parent_size = scene
                .get(id)
                .and_then(|node| node.parent)
                .and_then(|parent| scene.get(parent))
                .map(|parent| parent.transform.base_size);
            let Some(parent_size) = parent_size else {
                warn!("Skipping node {}: parent is gone", id);
                summary.skipped += 1;
                continue;
            };

            let node = scene.node_mut(id)?;
            match &node.behavior {
                LayoutBehavior::Rule(_) => summary.ruled += 1,
                LayoutBehavior::Custom(_) => summary.custom += 1,
                LayoutBehavior::None => {}
            }
            layout_node(node, parent_size, orientation)?;
        }

        if orientation != self.orientation {
            debug!("Orientation changed: {:?} -> {:?}", self.orientation, orientation);
        }
        self.orientation = orientation;
        self.pass_count += 1;
        self.last_pass = Some(summary);

        debug!(
            "Layout pass {} at {}x{} ({:?}): {} nodes, {} ruled, {} custom, {} skipped",
            self.pass_count,
            viewport.x,
            viewport.y,
            orientation,
            summary.visited,
            summary.ruled,
            summary.custom,
            summary.skipped
        );
        Ok(summary)
    }

    /// Run a pass in response to a viewport event. Returns whether a pass ran.
    ///
    /// The event's `size` is informational only: the pass always reads the viewport
    /// source, so a stale event still lays out against the current size.
    pub fn handle_event(&mut self, scene: &mut SceneGraph, event: &ViewportEvent) -> Result<bool> {
        match event {
            ViewportEvent::Resized { size } => {
                if *size != self.viewport.size() {
                    trace!("Resize event {:?} superseded by current size {:?}", size, self.viewport.size());
                }
                self.relayout(scene)?;
                Ok(true)
            }
        }
    }

    /// Drain pending viewport events and run at most one pass for them.
    /// Returns how many events were drained.
    pub fn pump(&mut self, scene: &mut SceneGraph) -> Result<usize> {
        let events = self.viewport.drain_events();
        if let Some(last) = events.last() {
            self.handle_event(scene, last)?;
        }
        Ok(events.len())
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn pass_count(&self) -> u64 {
        self.pass_count
    }

    pub fn last_pass(&self) -> Option<&PassSummary> {
        self.last_pass.as_ref()
    }
}

fn layout_node(node: &mut Node, parent_size: Vec2, orientation: Orientation) -> Result<()> {
    let Node {
        label,
        transform,
        behavior,
        ..
    } = node;

    match behavior {
        LayoutBehavior::None => {}
        LayoutBehavior::Rule(rule) => {
            let rules = rule.select(orientation);

            let scale = resolve_scale(rules, parent_size, transform.base_size, transform.scale);
            if !scale.is_finite() {
                warn!(
                    "Node '{}' resolved to non-finite scale {:?} (base size {:?})",
                    label, scale, transform.base_size
                );
            }
            transform.scale = scale;
            transform.position = resolve_position(rules, parent_size, transform);

            debug!(
                "Layout node '{}': scale={:?}, position={:?}",
                label, transform.scale, transform.position
            );
        }
        LayoutBehavior::Custom(handler) => {
            handler
                .resize(transform, parent_size)
                .map_err(|source| LayoutError::ResizeFailed {
                    label: label.clone(),
                    source,
                })?;
            debug!("Custom resize of node '{}' against {:?}", label, parent_size);
        }
    }

    Ok(())
}
