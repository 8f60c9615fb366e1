#![forbid(unsafe_code)]
//! Shared helpers for the executable examples.
use terrain_graph::prelude::{GraphEvent, Terrain};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install a `fmt` subscriber. `RUST_LOG` overrides [`DEFAULT_FILTER`].
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt().with_env_filter(filter).with_target(false).init();
}

/// Log size and value range of every layer of `terrain`.
pub fn log_terrain_summary(label: &str, terrain: &Terrain) {
    let (w, h) = terrain.size();
    info!("{label}: {w}x{h}, {} layer(s)", terrain.layer_count());
    for (name, layer) in terrain.layers() {
        let (lo, hi) = layer.min_max();
        info!("  {name}: min {lo:.4}, max {hi:.4}");
    }
}

/// Log one graph event at a level matching its severity.
pub fn log_event(event: &GraphEvent) {
    match event {
        GraphEvent::NodeFailed { name, message, .. } => warn!("node '{name}' failed: {message}"),
        GraphEvent::LayerReplaced { name, .. } => warn!("layer '{name}' was replaced"),
        GraphEvent::Warning { context, message } => warn!("{context}: {message}"),
        other => info!("{other:?}"),
    }
}
