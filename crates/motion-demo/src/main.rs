//! Motion demo
//!
//! Builds a small card tree, attaches the motion engine, and drives it with a
//! simulated frame clock, logging every element's transform as it settles.
//!
//! Run with: cargo run -p motion-demo -- --variant open
//! Set RUST_LOG=rune_motion=trace to see retarget and settle events.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rune_motion::state::PartialState;
use rune_motion::tree::geometry_marker;
use rune_motion::{
    attach, Element, EngineOptions, FrameScheduler, MotionProps, PropagationDepth, UpdateOutcome,
    VariantTable,
};
use rune_motion_config::MotionConfig;

const VARIANTS: &str = r#"{
    "closed": { "scale": 1, "rotate": 0, "opacity": 1 },
    "open": {
        "scale": 1.25,
        "rotate": 8,
        "transition": { "stiffness": 0.2, "damping": 0.7 }
    },
    "peek": {
        "y": -12,
        "scale": 1.1,
        "transition": { "type": "tween", "duration_ms": 250, "easing": { "type": "ease_out" } }
    },
    "badge": { "x": 6, "rotate": 12, "scale": 1.5 }
}"#;

#[derive(Parser)]
#[command(name = "motion-demo")]
#[command(about = "Drive rune-motion over an in-memory element tree", long_about = None)]
struct Cli {
    /// Variant to switch to after the initial attach settles
    #[arg(short, long, default_value = "open")]
    variant: String,

    /// Maximum frames to simulate per phase
    #[arg(short, long, default_value = "600")]
    frames: usize,

    /// Path to a motion.toml (defaults to ./motion.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Propagation depth override; 0 searches the whole subtree
    #[arg(short, long)]
    depth: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            let mut config = MotionConfig::load_from_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            config.merge_with_env();
            config
        }
        None => MotionConfig::load(),
    };

    let mut options = EngineOptions::from_config(&config)?;
    if let Some(depth) = cli.depth {
        options.depth = match depth {
            0 => PropagationDepth::UNBOUNDED,
            n => PropagationDepth::new(n)?,
        };
    }

    let variants: VariantTable = serde_json::from_str(VARIANTS).context("parsing variants")?;
    let tree = build_tree();
    let watched = ["card", "header", "icon", "badge", "deep"];

    let scheduler = FrameScheduler::new();
    let props = MotionProps::variant("closed", variants);
    let mut handle = attach(&tree, &props, &scheduler, &options)?;
    info!(nodes = handle.node_count(), depth = options.depth.levels(), "attached");

    let dt = Duration::from_secs_f64(config.frame_seconds());
    let frames = scheduler.run_until_idle(dt, cli.frames);
    info!(frames, "initial variant settled");
    report(&tree, &watched);

    match handle.update(&props.retarget(cli.variant.as_str()))? {
        UpdateOutcome::Retargeted => info!(variant = %cli.variant, "retargeted root"),
        UpdateOutcome::LiteralIgnored => info!("literal update ignored"),
    }

    let mut frame = 0;
    while frame < cli.frames && scheduler.tick(dt) {
        frame += 1;
        if frame % 10 == 0 {
            if let Some(style) = tree.style() {
                info!(frame, transform = %style, opacity = style.opacity, "card");
            }
        }
    }
    info!(frames = frame, "update settled");
    report(&tree, &watched);

    handle.detach();
    info!(active = scheduler.active_count(), "detached");
    Ok(())
}

/// ```text
/// card
/// ├── header   [open]
/// │   └── icon [literal x=4 rotate=-8]
/// └── body
///     └── badge [badge]
///         └── deep [badge]   (three levels down)
/// ```
fn build_tree() -> Element {
    let deep = Element::new("deep").with_marker("badge");
    let badge = Element::new("badge").with_marker("badge").with_child(deep);
    let body = Element::new("body").with_child(badge);

    let icon = Element::new("icon").with_marker(geometry_marker(
        PartialState::new().with_x(4.0).with_rotate(-8.0),
    ));
    let header = Element::new("header").with_marker("open").with_child(icon);

    Element::new("card").with_child(header).with_child(body)
}

fn report(tree: &Element, ids: &[&str]) {
    for id in ids {
        match tree.find(id).and_then(|el| el.style().map(|s| (el.style_writes(), s))) {
            Some((writes, style)) => {
                info!(element = *id, writes, transform = %style, opacity = style.opacity, "style")
            }
            None => info!(element = *id, "not animated"),
        }
    }
}
