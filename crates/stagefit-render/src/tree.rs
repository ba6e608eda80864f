// crates/stagefit-render/src/tree.rs
use stagefit_core::{
    HorizontalAnchor, LayoutBehavior, LayoutRule, NodeId, OffsetUnit, RuleSet, ScaleKind, SceneGraph,
    VerticalAnchor,
};
use std::fmt::Write;

/// Text dump of the scene with each node's geometry.
pub fn format_tree(scene: &SceneGraph, show_rules: bool) -> String {
    let mut output = String::new();
    write_node(&mut output, scene, scene.root(), "", None, show_rules);
    output
}

fn write_node(
    output: &mut String,
    scene: &SceneGraph,
    id: NodeId,
    prefix: &str,
    is_last: Option<bool>,
    show_rules: bool,
) {
    let Some(node) = scene.get(id) else { return };
    let transform = node.transform;

    let branch = match is_last {
        None => "",
        Some(true) => "└── ",
        Some(false) => "├── ",
    };
    let _ = write!(
        output,
        "{}{}{} base:({:.1},{:.1}) pos:({:.1},{:.1}) scale:({:.2},{:.2})",
        prefix,
        branch,
        node.label,
        transform.base_size.x,
        transform.base_size.y,
        transform.position.x,
        transform.position.y,
        transform.scale.x,
        transform.scale.y,
    );

    match &node.behavior {
        LayoutBehavior::None => {}
        LayoutBehavior::Rule(rule) if show_rules => {
            let _ = write!(output, " [{}]", describe_rule(rule));
        }
        LayoutBehavior::Rule(_) => output.push_str(" [rule]"),
        LayoutBehavior::Custom(_) => output.push_str(" [custom]"),
    }
    output.push('\n');

    let child_prefix = match is_last {
        None => prefix.to_string(),
        Some(true) => format!("{}    ", prefix),
        Some(false) => format!("{}│   ", prefix),
    };
    let count = node.children.len();
    for (i, &child) in node.children.iter().enumerate() {
        write_node(output, scene, child, &child_prefix, Some(i + 1 == count), show_rules);
    }
}

fn describe_rule(rule: &LayoutRule) -> String {
    match &rule.landscape {
        Some(landscape) => format!(
            "portrait: {}; landscape: {}",
            describe_rule_set(&rule.portrait),
            describe_rule_set(landscape)
        ),
        None => format!("portrait: {}", describe_rule_set(&rule.portrait)),
    }
}

fn describe_rule_set(set: &RuleSet) -> String {
    let mut parts = Vec::new();

    if let Some(align) = set.align {
        let x = match align.x {
            HorizontalAnchor::Left => "left",
            HorizontalAnchor::Center => "center",
            HorizontalAnchor::Right => "right",
        };
        let y = match align.y {
            VerticalAnchor::Top => "top",
            VerticalAnchor::Center => "center",
            VerticalAnchor::Bottom => "bottom",
        };
        parts.push(format!("align={}/{}", x, y));
    }

    if let Some(offset) = set.offset {
        let unit = match offset.unit {
            OffsetUnit::Pixels => "px",
            OffsetUnit::Percent => "pct",
            OffsetUnit::SelfRelative => "self",
        };
        parts.push(format!("offset={}({},{})", unit, offset.x, offset.y));
    }

    if let Some(scale) = set.scale {
        match scale.kind {
            ScaleKind::Absolute => parts.push(format!("scale=absolute({},{})", scale.x, scale.y)),
            ScaleKind::Relative => parts.push(format!(
                "scale=relative/{:?}({},{})",
                scale.fit, scale.x, scale.y
            )),
        }
    }

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagefit_core::{Fit, Node, ScaleRule};

    fn sample_scene() -> SceneGraph {
        let mut scene = SceneGraph::new("stage");
        let root = scene.root();
        scene.node_mut(root).unwrap().transform.base_size = glam::Vec2::new(800.0, 600.0);

        let rule = LayoutRule::new(
            RuleSet::new()
                .with_align(HorizontalAnchor::Center, VerticalAnchor::Bottom)
                .with_offset(OffsetUnit::SelfRelative, -0.5, -1.0)
                .with_scale(ScaleRule::relative(Fit::Min, 0.5, 0.5)),
        );
        let panel = scene
            .add_child(root, Node::new("panel").with_base_size(400.0, 300.0).with_rule(rule))
            .unwrap();
        scene.add_child(panel, Node::new("badge").with_base_size(32.0, 32.0)).unwrap();
        scene
            .add_child(root, Node::new("content").with_resize(|_, _| Ok(())))
            .unwrap();
        scene
    }

    #[test]
    fn test_format_tree() {
        insta::assert_snapshot!(format_tree(&sample_scene(), false), @r###"
        stage base:(800.0,600.0) pos:(0.0,0.0) scale:(1.00,1.00)
        ├── panel base:(400.0,300.0) pos:(0.0,0.0) scale:(1.00,1.00) [rule]
        │   └── badge base:(32.0,32.0) pos:(0.0,0.0) scale:(1.00,1.00)
        └── content base:(0.0,0.0) pos:(0.0,0.0) scale:(1.00,1.00) [custom]
        "###);
    }

    #[test]
    fn test_format_tree_with_rules() {
        let output = format_tree(&sample_scene(), true);
        assert!(output.contains(
            "[portrait: align=center/bottom offset=self(-0.5,-1) scale=relative/Min(0.5,0.5)]"
        ));
    }
}
