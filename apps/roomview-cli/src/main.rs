use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use roomview_control::{ControlConfig, ModelBindings, SceneContext, bind_model};
use roomview_render::{DebugTextRenderer, RenderView, Renderer};
use roomview_scene::SceneGraph;
use roomview_tools::SceneInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "roomview-cli", about = "CLI tool for room models")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print a model's node tree and what it binds to
    Inspect {
        /// glTF/GLB file
        model: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Show only the named node
        #[arg(long)]
        node: Option<String>,
    },
    /// Run the character control loop without a window
    Simulate {
        /// glTF/GLB file
        model: PathBuf,
        /// Number of frames to run
        #[arg(short, long, default_value = "60")]
        frames: u32,
        /// Movement keys held for the whole run, e.g. "wd"
        #[arg(short, long, default_value = "w")]
        keys: String,
    },
}

/// Load a model and place it in a fresh scene.
fn load_scene(path: &Path) -> anyhow::Result<(SceneGraph, ModelBindings)> {
    let model = roomview_assets::load_model(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let mut scene = SceneGraph::new();
    let bindings = bind_model(&mut scene, &model.into_template())?;
    Ok((scene, bindings))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("roomview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("scene: nodes={}", SceneGraph::new().len());
            println!("assets: {}", roomview_assets::crate_info());
            println!("audio: {}", roomview_audio::crate_info());
            println!("render: {}", roomview_render::crate_info());
            let config = ControlConfig::default();
            println!(
                "control: move={} rot={} step={} swing={}",
                config.move_speed, config.rot_speed, config.walk_step, config.swing_amplitude
            );
        }
        Commands::Inspect { model, json, node } => {
            let (scene, bindings) = load_scene(&model)?;
            if let Some(name) = node {
                let info = scene
                    .find_by_name(&name)
                    .and_then(|id| SceneInspector::inspect_node(&scene, id))
                    .with_context(|| format!("no node named {name:?} in {}", model.display()))?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!("{info}");
                }
                return Ok(());
            }

            let summary = SceneInspector::summary(&scene);
            let nodes = SceneInspector::node_tree(&scene);
            let report = SceneInspector::binding_report(&scene, &bindings);

            if json {
                let doc = serde_json::json!({
                    "model": model.display().to_string(),
                    "summary": summary,
                    "nodes": nodes,
                    "bindings": report,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
            } else {
                println!("{summary}");
                for node in &nodes {
                    println!("{node}");
                }
                println!("{report}");
            }
        }
        Commands::Simulate {
            model,
            frames,
            keys,
        } => {
            let (mut scene, bindings) = load_scene(&model)?;
            let Some(rig) = bindings.rig else {
                anyhow::bail!("{} has no character to drive", model.display());
            };

            let mut ctx = SceneContext::new(ControlConfig::default());
            ctx.bind(rig);
            for c in keys.chars() {
                if !ctx.keys.handle_key_text(&c.to_string(), true) {
                    tracing::warn!("ignoring non-movement key {c:?}");
                }
            }

            println!("Simulating {frames} frames with keys {keys:?}");
            for _ in 0..frames {
                ctx.update(&mut scene);
            }

            let root = scene
                .get(rig.root)
                .context("character root vanished from the scene")?;
            let p = root.local.position;
            println!(
                "Character: pos=({:.3}, {:.3}, {:.3}) walk_time={:.2}",
                p.x,
                p.y,
                p.z,
                ctx.walk_time()
            );
            let tree = DebugTextRenderer::new().render(&scene, &RenderView::default());
            print!("{tree}");
        }
    }

    Ok(())
}
