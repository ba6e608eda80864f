// crates/stagefit-core/src/rules.rs
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Viewport orientation. Selection is global: one orientation per layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// Landscape only when the viewport is strictly wider than it is tall.
    pub fn from_viewport(size: Vec2) -> Self {
        if size.x > size.y {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Declarative layout rule attached to a node.
///
/// `portrait` is mandatory and doubles as the fallback whenever the viewport is not
/// landscape or no landscape set was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRule {
    pub portrait: RuleSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landscape: Option<RuleSet>,
}

impl LayoutRule {
    pub fn new(portrait: RuleSet) -> Self {
        Self {
            portrait,
            landscape: None,
        }
    }

    pub fn with_landscape(mut self, landscape: RuleSet) -> Self {
        self.landscape = Some(landscape);
        self
    }

    /// Pick the rule set in force for the given orientation.
    pub fn select(&self, orientation: Orientation) -> &RuleSet {
        match (&self.landscape, orientation) {
            (Some(landscape), Orientation::Landscape) => landscape,
            _ => &self.portrait,
        }
    }
}

/// One orientation's worth of rules. Every part is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, alias = "location", skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_align(mut self, x: HorizontalAnchor, y: VerticalAnchor) -> Self {
        self.align = Some(Align { x, y });
        self
    }

    pub fn with_offset(mut self, unit: OffsetUnit, x: f32, y: f32) -> Self {
        self.offset = Some(Offset { unit, x, y });
        self
    }

    pub fn with_scale(mut self, scale: ScaleRule) -> Self {
        self.scale = Some(scale);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Align {
    pub x: HorizontalAnchor,
    pub y: VerticalAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

impl HorizontalAnchor {
    /// Anchor x coordinate inside a parent of the given width.
    pub fn resolve(&self, parent_width: f32) -> f32 {
        match self {
            HorizontalAnchor::Left => 0.0,
            HorizontalAnchor::Center => parent_width * 0.5,
            HorizontalAnchor::Right => parent_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAnchor {
    Top,
    Center,
    Bottom,
}

impl VerticalAnchor {
    pub fn resolve(&self, parent_height: f32) -> f32 {
        match self {
            VerticalAnchor::Top => 0.0,
            VerticalAnchor::Center => parent_height * 0.5,
            VerticalAnchor::Bottom => parent_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub unit: OffsetUnit,
    pub x: f32,
    pub y: f32,
}

/// Unit an offset is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OffsetUnit {
    /// Raw pixels.
    #[serde(rename = "px")]
    Pixels,
    /// Fraction of the parent's base size.
    #[serde(rename = "pct")]
    Percent,
    /// Fraction of the node's own scaled footprint.
    #[serde(rename = "self")]
    SelfRelative,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleRule {
    #[serde(rename = "type")]
    pub kind: ScaleKind,
    #[serde(default)]
    pub fit: Fit,
    pub x: f32,
    pub y: f32,
}

impl ScaleRule {
    pub fn absolute(x: f32, y: f32) -> Self {
        Self {
            kind: ScaleKind::Absolute,
            fit: Fit::default(),
            x,
            y,
        }
    }

    pub fn relative(fit: Fit, x: f32, y: f32) -> Self {
        Self {
            kind: ScaleKind::Relative,
            fit,
            x,
            y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    /// Scale factors taken verbatim from the rule.
    Absolute,
    /// Scale derived from the parent's base size relative to the node's own.
    Relative,
}

/// How a relative scale reconciles its width and height ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Contain: the smaller ratio on both axes.
    Min,
    /// Cover: the larger ratio on both axes.
    Max,
    #[default]
    Stretch,
}
