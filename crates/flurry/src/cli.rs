//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use flurry_config::Config;
use flurry_core::{AnimationSpeed, Palette, SceneKind};

/// Animated terminal backdrops.
#[derive(Parser, Debug)]
#[command(name = "flurry")]
#[command(about = "Animated terminal backdrops: drifting blobs, growing fractals and a sled ride")]
#[command(version)]
pub struct Cli {
    /// Scene to start with: blobs, tree, spiral or sled
    #[arg(long)]
    pub scene: Option<SceneKind>,

    /// Playback speed: slow, medium or fast
    #[arg(long)]
    pub speed: Option<AnimationSpeed>,

    /// Colour palette: emerald, ocean, ember or dusk
    #[arg(long)]
    pub palette: Option<Palette>,

    /// Fixed random seed for reproducible scenes
    #[arg(long)]
    pub seed: Option<u64>,

    /// Simulation steps per second at medium speed
    #[arg(long)]
    pub fps: Option<u32>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Run N steps without a terminal, report timing and exit
    #[arg(long, value_name = "N")]
    pub frames: Option<u64>,
}

impl Cli {
    /// Layer command line overrides on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(scene) = self.scene {
            config.scene = scene;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        if let Some(palette) = self.palette {
            config.palette = palette;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        config.validated()
    }
}
