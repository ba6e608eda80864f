use glam::Vec2;
use stagefit_core::{
    Fit, HorizontalAnchor, LayoutRule, Node, NodeId, OffsetUnit, Orientation, ResizeError, RuleSet, ScaleRule,
    SceneGraph, VerticalAnchor,
};
use stagefit_layout::{LayoutError, ResponsiveLayout};
use stagefit_render::{
    FixedViewport, HeadlessSurface, RenderError, RenderResult, Surface, ViewportEvent, ViewportSource,
};
use std::cell::RefCell;
use std::rc::Rc;

fn attach(scene: &mut SceneGraph, width: f32, height: f32) -> ResponsiveLayout<FixedViewport, HeadlessSurface> {
    ResponsiveLayout::attach(FixedViewport::new(width, height), HeadlessSurface::new(), scene)
        .expect("initial layout pass failed")
}

fn resize(layout: &mut ResponsiveLayout<FixedViewport, HeadlessSurface>, scene: &mut SceneGraph, width: f32, height: f32) {
    layout.viewport_mut().resize(Vec2::new(width, height));
    layout.pump(scene).expect("layout pass failed");
}

#[test]
fn test_attach_sizes_root_and_surface() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let layout = attach(&mut scene, 1280.0, 720.0);

    assert_eq!(scene.node(scene.root())?.base_size(), Vec2::new(1280.0, 720.0));
    assert_eq!(layout.surface().size(), Vec2::new(1280.0, 720.0));
    assert_eq!(layout.surface().resize_count(), 1);
    assert_eq!(layout.pass_count(), 1);
    assert_eq!(layout.orientation(), Orientation::Landscape);
    Ok(())
}

#[test]
fn test_absolute_scale_independent_of_parent() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let rule = LayoutRule::new(RuleSet::new().with_scale(ScaleRule::absolute(0.5, 2.0)));
    let logo = scene.add_child(root, Node::new("logo").with_base_size(100.0, 100.0).with_rule(rule))?;

    let mut layout = attach(&mut scene, 800.0, 600.0);
    assert_eq!(scene.node(logo)?.scale(), Vec2::new(0.5, 2.0));

    resize(&mut layout, &mut scene, 300.0, 900.0);
    assert_eq!(scene.node(logo)?.scale(), Vec2::new(0.5, 2.0));
    Ok(())
}

#[test]
fn test_relative_stretch_and_alignment() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let rule = LayoutRule::new(
        RuleSet::new()
            .with_align(HorizontalAnchor::Center, VerticalAnchor::Bottom)
            .with_scale(ScaleRule::relative(Fit::Stretch, 0.5, 0.25)),
    );
    let banner = scene.add_child(root, Node::new("banner").with_base_size(200.0, 50.0).with_rule(rule))?;

    attach(&mut scene, 800.0, 600.0);

    let banner = scene.node(banner)?;
    // 800 * 0.5 / 200 and 600 * 0.25 / 50
    assert_eq!(banner.scale(), Vec2::new(2.0, 3.0));
    assert_eq!(banner.position(), Vec2::new(400.0, 600.0));
    Ok(())
}

#[test]
fn test_percent_offset_from_top_left() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let rule = LayoutRule::new(
        RuleSet::new()
            .with_align(HorizontalAnchor::Left, VerticalAnchor::Top)
            .with_offset(OffsetUnit::Percent, 0.1, 0.1),
    );
    let hud = scene.add_child(root, Node::new("hud").with_base_size(10.0, 10.0).with_rule(rule))?;

    attach(&mut scene, 800.0, 600.0);
    assert_eq!(scene.node(hud)?.position(), Vec2::new(80.0, 60.0));
    Ok(())
}

#[test]
fn test_orientation_selects_rule_set() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let rule = LayoutRule::new(
        RuleSet::new()
            .with_align(HorizontalAnchor::Center, VerticalAnchor::Top)
            .with_scale(ScaleRule::absolute(1.0, 1.0)),
    )
    .with_landscape(
        RuleSet::new()
            .with_align(HorizontalAnchor::Right, VerticalAnchor::Center)
            .with_scale(ScaleRule::absolute(2.0, 2.0)),
    );
    let menu = scene.add_child(root, Node::new("menu").with_base_size(50.0, 50.0).with_rule(rule))?;

    let mut layout = attach(&mut scene, 1000.0, 500.0);
    assert_eq!(layout.orientation(), Orientation::Landscape);
    assert_eq!(scene.node(menu)?.scale(), Vec2::splat(2.0));
    assert_eq!(scene.node(menu)?.position(), Vec2::new(1000.0, 250.0));

    resize(&mut layout, &mut scene, 500.0, 1000.0);
    assert_eq!(layout.orientation(), Orientation::Portrait);
    assert_eq!(scene.node(menu)?.scale(), Vec2::ONE);
    assert_eq!(scene.node(menu)?.position(), Vec2::new(250.0, 0.0));
    Ok(())
}

fn scale_only_landscape_scene() -> anyhow::Result<(SceneGraph, NodeId)> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let rule = LayoutRule::new(
        RuleSet::new()
            .with_align(HorizontalAnchor::Center, VerticalAnchor::Top)
            .with_scale(ScaleRule::absolute(1.0, 1.0)),
    )
    .with_landscape(RuleSet::new().with_scale(ScaleRule::absolute(2.0, 2.0)));
    let badge = scene.add_child(root, Node::new("badge").with_base_size(40.0, 40.0).with_rule(rule))?;
    Ok((scene, badge))
}

#[test]
fn test_layout_does_not_depend_on_previous_passes() -> anyhow::Result<()> {
    let (mut resized, badge) = scale_only_landscape_scene()?;
    let mut layout = attach(&mut resized, 500.0, 1000.0);
    assert_eq!(resized.node(badge)?.position(), Vec2::new(250.0, 0.0));
    resize(&mut layout, &mut resized, 1000.0, 500.0);

    let (mut fresh, fresh_badge) = scale_only_landscape_scene()?;
    attach(&mut fresh, 1000.0, 500.0);

    assert_eq!(resized.node(badge)?.transform, fresh.node(fresh_badge)?.transform);
    assert_eq!(resized.node(badge)?.position(), Vec2::ZERO);
    assert_eq!(resized.node(badge)?.scale(), Vec2::splat(2.0));
    Ok(())
}

#[test]
fn test_relayout_is_idempotent() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let rule = LayoutRule::new(
        RuleSet::new()
            .with_align(HorizontalAnchor::Center, VerticalAnchor::Center)
            .with_offset(OffsetUnit::SelfRelative, -0.5, -0.5)
            .with_scale(ScaleRule::relative(Fit::Min, 0.3, 0.7)),
    );
    let card = scene.add_child(root, Node::new("card").with_base_size(333.0, 177.0).with_rule(rule))?;

    let mut layout = attach(&mut scene, 1366.0, 768.0);
    let first = scene.node(card)?.transform;

    layout.relayout(&mut scene)?;
    let second = scene.node(card)?.transform;

    assert_eq!(first.scale.x.to_bits(), second.scale.x.to_bits());
    assert_eq!(first.scale.y.to_bits(), second.scale.y.to_bits());
    assert_eq!(first.position.x.to_bits(), second.position.x.to_bits());
    assert_eq!(first.position.y.to_bits(), second.position.y.to_bits());
    Ok(())
}

#[test]
fn test_grandchild_sees_parent_size_from_same_pass() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();

    // The panel measures itself as half the viewport on every pass.
    let panel = scene.add_child(
        root,
        Node::new("panel").with_resize(|transform, parent_size| {
            transform.base_size = parent_size * 0.5;
            Ok(())
        }),
    )?;
    let rule = LayoutRule::new(RuleSet::new().with_scale(ScaleRule::relative(Fit::Stretch, 1.0, 1.0)));
    let icon = scene.add_child(panel, Node::new("icon").with_base_size(100.0, 100.0).with_rule(rule))?;

    let mut layout = attach(&mut scene, 800.0, 600.0);
    assert_eq!(scene.node(panel)?.base_size(), Vec2::new(400.0, 300.0));
    assert_eq!(scene.node(icon)?.scale(), Vec2::new(4.0, 3.0));

    resize(&mut layout, &mut scene, 400.0, 1000.0);
    assert_eq!(scene.node(panel)?.base_size(), Vec2::new(200.0, 500.0));
    assert_eq!(scene.node(icon)?.scale(), Vec2::new(2.0, 5.0));
    Ok(())
}

#[test]
fn test_custom_resize_receives_parent_size() -> anyhow::Result<()> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let record = Rc::clone(&seen);

    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let content = scene.add_child(
        root,
        Node::new("content").with_resize(move |transform, parent_size| {
            record.borrow_mut().push(parent_size);
            transform.position = Vec2::new(10.0, 20.0);
            Ok(())
        }),
    )?;

    let mut layout = attach(&mut scene, 640.0, 480.0);
    resize(&mut layout, &mut scene, 320.0, 240.0);

    assert_eq!(*seen.borrow(), vec![Vec2::new(640.0, 480.0), Vec2::new(320.0, 240.0)]);
    assert_eq!(scene.node(content)?.position(), Vec2::new(10.0, 20.0));
    Ok(())
}

#[test]
fn test_failing_custom_resize_aborts_pass() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    scene.add_child(
        root,
        Node::new("broken").with_resize(|_, _| Err(ResizeError::new("content not measured"))),
    )?;
    let rule = LayoutRule::new(RuleSet::new().with_scale(ScaleRule::absolute(3.0, 3.0)));
    let later = scene.add_child(root, Node::new("later").with_base_size(10.0, 10.0).with_rule(rule))?;

    let result = ResponsiveLayout::attach(FixedViewport::new(800.0, 600.0), HeadlessSurface::new(), &mut scene);
    match result {
        Err(LayoutError::ResizeFailed { label, source }) => {
            assert_eq!(label, "broken");
            assert_eq!(source.to_string(), "content not measured");
        }
        other => panic!("expected ResizeFailed, got {:?}", other.err()),
    }

    // The sibling after the failing node was never reached.
    assert_eq!(scene.node(later)?.scale(), Vec2::ONE);
    Ok(())
}

#[test]
fn test_detached_nodes_are_skipped() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let rule = LayoutRule::new(RuleSet::new().with_scale(ScaleRule::absolute(5.0, 5.0)));
    let floating = scene.add_child(root, Node::new("floating").with_base_size(10.0, 10.0).with_rule(rule))?;
    scene.detach(floating)?;

    let layout = attach(&mut scene, 800.0, 600.0);
    assert_eq!(scene.node(floating)?.scale(), Vec2::ONE);
    assert_eq!(layout.last_pass().map(|pass| pass.visited), Some(0));
    Ok(())
}

#[test]
fn test_nodes_without_behavior_are_untouched() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let root = scene.root();
    let plain = scene.add_child(root, Node::new("plain").with_base_size(64.0, 64.0))?;
    scene.node_mut(plain)?.transform.position = Vec2::new(7.0, 9.0);

    let layout = attach(&mut scene, 800.0, 600.0);
    let plain = scene.node(plain)?;
    assert_eq!(plain.position(), Vec2::new(7.0, 9.0));
    assert_eq!(plain.scale(), Vec2::ONE);

    let pass = layout.last_pass().copied().expect("pass summary");
    assert_eq!((pass.visited, pass.ruled, pass.custom, pass.skipped), (1, 0, 0, 0));
    Ok(())
}

#[test]
fn test_stale_resize_event_uses_current_viewport() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let mut layout = attach(&mut scene, 800.0, 600.0);

    let stale = ViewportEvent::Resized {
        size: Vec2::new(320.0, 240.0),
    };
    assert!(layout.handle_event(&mut scene, &stale)?);
    assert_eq!(layout.pass_count(), 2);
    assert_eq!(scene.node(scene.root())?.base_size(), Vec2::new(800.0, 600.0));
    assert_eq!(layout.surface().size(), Vec2::new(800.0, 600.0));
    Ok(())
}

#[test]
fn test_pump_coalesces_resize_events() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let mut layout = attach(&mut scene, 800.0, 600.0);

    layout.viewport_mut().resize(Vec2::new(1024.0, 768.0));
    layout.viewport_mut().resize(Vec2::new(768.0, 1024.0));

    assert_eq!(layout.pump(&mut scene)?, 2);
    assert_eq!(layout.pass_count(), 2);
    assert_eq!(scene.node(scene.root())?.base_size(), Vec2::new(768.0, 1024.0));

    assert_eq!(layout.pump(&mut scene)?, 0);
    assert_eq!(layout.pass_count(), 2);
    assert!(!layout.viewport().has_pending());
    Ok(())
}

#[test]
fn test_nodes_added_after_attach_need_relayout() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let mut layout = attach(&mut scene, 800.0, 600.0);

    let root = scene.root();
    let rule = LayoutRule::new(RuleSet::new().with_align(HorizontalAnchor::Right, VerticalAnchor::Bottom));
    let late = scene.add_child(root, Node::new("late").with_rule(rule))?;
    assert_eq!(scene.node(late)?.position(), Vec2::ZERO);

    layout.relayout(&mut scene)?;
    assert_eq!(scene.node(late)?.position(), Vec2::new(800.0, 600.0));
    Ok(())
}

struct BrokenSurface;

impl Surface for BrokenSurface {
    fn resize(&mut self, _new_size: Vec2) -> RenderResult<()> {
        Err(RenderError::SurfaceUnavailable("context lost".to_string()))
    }

    fn size(&self) -> Vec2 {
        Vec2::ZERO
    }
}

#[test]
fn test_surface_failure_stops_before_nodes() -> anyhow::Result<()> {
    let mut scene = SceneGraph::new("stage");
    let viewport = FixedViewport::new(800.0, 600.0);
    assert_eq!(viewport.size(), Vec2::new(800.0, 600.0));

    let result = ResponsiveLayout::attach(viewport, BrokenSurface, &mut scene);
    assert!(matches!(result, Err(LayoutError::Surface(RenderError::SurfaceUnavailable(_)))));
    assert_eq!(scene.node(scene.root())?.base_size(), Vec2::ZERO);
    Ok(())
}
