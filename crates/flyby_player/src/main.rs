// SPDX-License-Identifier: MIT OR Apache-2.0
//! `Flyby` Player - headless fly-through camera playback
//!
//! Plays a camera path file in a fixed-step frame loop, standing in for the
//! per-frame update of a real engine:
//! - Loops the path's clips and logs every transition
//! - Optionally orients the camera towards a look-at target
//! - Optionally hot-reloads the path file while it plays
//!
//! Set `RUST_LOG=flyby_player=debug` to log the camera position each frame.

mod cli;
mod file_watcher;
mod player;

use clap::Parser;
use cli::Cli;
use player::{Player, PlayerOptions};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("flyby_player=info,flyby_sequencer=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Flyby Player v{}", env!("CARGO_PKG_VERSION"));

    let frames = cli.frames.or_else(|| {
        cli.seconds
            .map(|seconds| (seconds.max(0.0) * cli.fps).ceil() as u64)
    });
    let options = PlayerOptions {
        path: cli.path,
        fps: cli.fps,
        frames,
        speed: cli.speed,
        watch: cli.watch,
        look_at: cli.look_at,
    };

    let mut player = match Player::new(options) {
        Ok(player) => player,
        Err(e) => {
            tracing::error!("Failed to load camera path: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = player.run() {
        tracing::error!("Playback failed: {e}");
        std::process::exit(1);
    }

    tracing::info!(
        "Camera stopped at {:?} on clip {} ({} reloads)",
        player.camera().position,
        player.sequencer().active_index(),
        player.stats().reloads
    );
}
