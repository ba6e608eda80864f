// crates/stagefit-layout/src/position.rs
use glam::Vec2;
use stagefit_core::{Offset, OffsetUnit, RuleSet, Transform};

/// Position for a node under `rules`, relative to its parent's origin.
///
/// `transform.scale` must already be the resolved scale for this pass: the `self` offset
/// unit is measured against the scaled footprint. The result never depends on the node's
/// previous position; with no `align` the anchor is the parent's origin.
pub fn resolve_position(rules: &RuleSet, parent_size: Vec2, transform: &Transform) -> Vec2 {
    let mut position = match rules.align {
        Some(align) => Vec2::new(align.x.resolve(parent_size.x), align.y.resolve(parent_size.y)),
        None => Vec2::ZERO,
    };

    if let Some(offset) = &rules.offset {
        position += offset_amount(offset, parent_size, transform.scaled_size());
    }

    position
}

fn offset_amount(offset: &Offset, parent_size: Vec2, scaled_size: Vec2) -> Vec2 {
    let amount = Vec2::new(offset.x, offset.y);
    match offset.unit {
        OffsetUnit::Pixels => amount,
        OffsetUnit::Percent => parent_size * amount,
        OffsetUnit::SelfRelative => scaled_size * amount,
    }
}
