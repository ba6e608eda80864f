// crates/stagefit-layout/src/scale.rs
use glam::Vec2;
use stagefit_core::{Fit, RuleSet, ScaleKind, ScaleRule};

/// Scale for a node under `rules`, or `current` when the set has no scale rule.
///
/// Relative scaling divides by `base_size`; a zero base dimension yields a non-finite
/// factor and is the caller's responsibility.
pub fn resolve_scale(rules: &RuleSet, parent_size: Vec2, base_size: Vec2, current: Vec2) -> Vec2 {
    match &rules.scale {
        Some(scale) => compute_scale(scale, parent_size, base_size),
        None => current,
    }
}

pub fn compute_scale(scale: &ScaleRule, parent_size: Vec2, base_size: Vec2) -> Vec2 {
    match scale.kind {
        ScaleKind::Absolute => Vec2::new(scale.x, scale.y),
        ScaleKind::Relative => {
            let width_ratio = parent_size.x * scale.x / base_size.x;
            let height_ratio = parent_size.y * scale.y / base_size.y;

            match scale.fit {
                Fit::Min => Vec2::splat(width_ratio.min(height_ratio)),
                Fit::Max => Vec2::splat(width_ratio.max(height_ratio)),
                Fit::Stretch => Vec2::new(width_ratio, height_ratio),
            }
        }
    }
}
