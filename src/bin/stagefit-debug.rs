use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stagefit_core::{load_scene_file, OverlayConfig, SceneGraph};
use stagefit_layout::{PassSummary, ResponsiveLayout};
use stagefit_render::{debug_overlay, format_tree, FixedViewport, HeadlessSurface, RenderCommand};

#[derive(Parser)]
#[command(name = "stagefit-debug")]
#[command(about = "Lays out a scene description and prints the resulting geometry")]
struct Args {
    /// Path to the scene description (.json)
    scene_file: String,

    /// Viewport width. Overrides the value in the scene file.
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height. Overrides the value in the scene file.
    #[arg(long)]
    height: Option<f32>,

    /// Replay a viewport resize after the initial pass, e.g. `--resize 1000x500`.
    /// May be given several times.
    #[arg(long, value_parser = parse_size)]
    resize: Vec<Vec2>,

    /// Output format (tree, json, overlay)
    #[arg(long, default_value = "tree")]
    format: String,

    /// Save output to file instead of stdout
    #[arg(long)]
    output: Option<String>,

    /// Enable the debug overlay even if the scene file disables it
    #[arg(long)]
    overlay: bool,

    /// Show layout rules next to each node
    #[arg(long)]
    show_rules: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn parse_size(value: &str) -> std::result::Result<Vec2, String> {
    let (width, height) = value
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: f32 = width.trim().parse().map_err(|e| format!("bad width '{}': {}", width, e))?;
    let height: f32 = height.trim().parse().map_err(|e| format!("bad height '{}': {}", height, e))?;
    if width < 0.0 || height < 0.0 {
        return Err(format!("size must not be negative, got '{}'", value));
    }
    Ok(Vec2::new(width, height))
}

/// The scene file's overlay settings, with `--overlay` able to switch it on.
fn overlay_config(file: &OverlayConfig, force: bool) -> OverlayConfig {
    OverlayConfig {
        enabled: file.enabled || force,
        ..*file
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.debug { "debug" } else { "info" }));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    if !Path::new(&args.scene_file).exists() {
        anyhow::bail!("Scene file not found: {}", args.scene_file);
    }
    if !matches!(args.format.as_str(), "tree" | "json" | "overlay") {
        anyhow::bail!("Unknown format: {}. Use 'tree', 'json', or 'overlay'", args.format);
    }

    info!("Loading scene file: {}", args.scene_file);
    let scene_file = load_scene_file(&args.scene_file)
        .with_context(|| format!("Failed to load scene file {}", args.scene_file))?;

    let mut scene = scene_file.scene;
    let overlay = overlay_config(&scene_file.overlay, args.overlay);
    if args.format == "overlay" && !overlay.enabled {
        warn!("Overlay is disabled in {}; pass --overlay to draw it", args.scene_file);
    }

    // Allow CLI arguments to override the scene file's viewport
    let width = args.width.unwrap_or(scene_file.viewport.x);
    let height = args.height.unwrap_or(scene_file.viewport.y);

    let mut layout = ResponsiveLayout::attach(FixedViewport::new(width, height), HeadlessSurface::new(), &mut scene)
        .context("Initial layout pass failed")?;

    let mut output_text = String::new();
    let first_pass = layout.last_pass().copied().context("Layout pass did not run")?;
    append_pass(&mut output_text, &args, &scene, &overlay, &first_pass)?;

    for size in &args.resize {
        layout.viewport_mut().resize(*size);
        layout
            .pump(&mut scene)
            .with_context(|| format!("Layout pass at {}x{} failed", size.x, size.y))?;
        let pass = layout.last_pass().copied().context("Layout pass did not run")?;
        append_pass(&mut output_text, &args, &scene, &overlay, &pass)?;
    }

    info!(
        "Ran {} layout passes over {} nodes",
        layout.pass_count(),
        scene.len()
    );

    // Output to file or stdout
    if let Some(output_file) = &args.output {
        fs::write(output_file, &output_text)
            .with_context(|| format!("Failed to write to file: {}", output_file))?;
        info!("Output written to: {}", output_file);
    } else {
        print!("{}", output_text);
    }

    Ok(())
}

fn append_pass(
    output: &mut String,
    args: &Args,
    scene: &SceneGraph,
    overlay: &OverlayConfig,
    pass: &PassSummary,
) -> Result<()> {
    info!(
        "Viewport {}x{} ({:?}): {} nodes, {} ruled, {} custom",
        pass.viewport.x, pass.viewport.y, pass.orientation, pass.visited, pass.ruled, pass.custom
    );

    match args.format.as_str() {
        "tree" => {
            output.push_str(&format!(
                "== {}x{} ({:?}) ==\n",
                pass.viewport.x, pass.viewport.y, pass.orientation
            ));
            output.push_str(&format_tree(scene, args.show_rules));
        }
        "json" => {
            let nodes: Vec<serde_json::Value> = scene
                .preorder()
                .into_iter()
                .filter_map(|id| scene.get(id))
                .map(|node| {
                    serde_json::json!({
                        "label": node.label,
                        "base_size": [node.transform.base_size.x, node.transform.base_size.y],
                        "position": [node.transform.position.x, node.transform.position.y],
                        "scale": [node.transform.scale.x, node.transform.scale.y],
                    })
                })
                .collect();
            let value = serde_json::json!({
                "viewport": [pass.viewport.x, pass.viewport.y],
                "orientation": format!("{:?}", pass.orientation),
                "nodes": nodes,
            });
            output.push_str(&serde_json::to_string_pretty(&value)?);
            output.push('\n');
        }
        _ => {
            output.push_str(&format!("== {}x{} overlay ==\n", pass.viewport.x, pass.viewport.y));
            for command in debug_overlay(scene, overlay) {
                let RenderCommand::DrawRect {
                    label,
                    position,
                    size,
                    color,
                } = command;
                output.push_str(&format!(
                    "{} pos:({:.1},{:.1}) size:({:.1},{:.1}) color:#{:02X}{:02X}{:02X}\n",
                    label,
                    position.x,
                    position.y,
                    size.x,
                    size.y,
                    (color.x * 255.0).round() as u8,
                    (color.y * 255.0).round() as u8,
                    (color.z * 255.0).round() as u8,
                ));
            }
        }
    }

    Ok(())
}
