// crates/stagefit-render/src/overlay.rs
use crate::RenderCommand;
use glam::{Vec2, Vec4};
use stagefit_core::{NodeId, OverlayConfig, SceneGraph};
use std::collections::HashMap;

/// Linear RGB gradient of `count` colors from `start` to `end` (both `0xRRGGBB`).
pub fn generate_colors(count: usize, start: u32, end: u32) -> Vec<u32> {
    let channel = |color: u32, shift: u32| ((color >> shift) & 0xff) as f32;

    (0..count)
        .map(|i| {
            let t = if count > 1 { i as f32 / (count - 1) as f32 } else { 0.0 };
            [16, 8, 0].iter().fold(0u32, |color, &shift| {
                let from = channel(start, shift);
                let to = channel(end, shift);
                let value = (from + t * (to - from)).round() as u32;
                color | (value.min(0xff) << shift)
            })
        })
        .collect()
}

/// `0xRRGGBB` to an opaque RGBA vector in 0..1.
pub fn color_to_vec4(color: u32) -> Vec4 {
    Vec4::new(
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
        1.0,
    )
}

/// One outline per non-root node, in pre-order, in world space.
pub fn debug_overlay(scene: &SceneGraph, config: &OverlayConfig) -> Vec<RenderCommand> {
    if !config.enabled {
        return Vec::new();
    }

    let order = scene.preorder();
    let mut world: HashMap<NodeId, (Vec2, Vec2)> = HashMap::with_capacity(order.len());
    let mut rects = Vec::with_capacity(order.len().saturating_sub(1));

    for &id in &order {
        let Some(node) = scene.get(id) else { continue };
        let local = node.transform;

        let (position, scale) = match node.parent.and_then(|parent| world.get(&parent)) {
            Some(&(parent_position, parent_scale)) => (
                parent_position + parent_scale * local.position,
                parent_scale * local.scale,
            ),
            None => (local.position, local.scale),
        };
        world.insert(id, (position, scale));

        if id != scene.root() {
            rects.push((node.label.clone(), position, local.base_size * scale));
        }
    }

    let colors = generate_colors(rects.len(), config.color1, config.color2);
    rects
        .into_iter()
        .zip(colors)
        .map(|((label, position, size), color)| RenderCommand::DrawRect {
            label,
            position,
            size,
            color: color_to_vec4(color),
        })
        .collect()
}
