//! Core types for the flurry animated backdrops.
//!
//! The drawing-surface abstraction, colours and palettes, the seedable random
//! source, scene selection enums and the per-scene tuning parameters.

mod color;
mod input;
mod palette;
mod recorder;
mod rng;
mod scene;
mod surface;
mod tuning;

pub use color::{Rgba, hsl_to_rgb};
pub use input::SceneEvent;
pub use palette::Palette;
pub use recorder::{DrawCommand, Recorder};
pub use rng::SceneRng;
pub use scene::{AnimationSpeed, SceneKind};
pub use surface::{Blend, ColorStop, DrawState, Paint, StateStack, Surface, sample_stops};
pub use tuning::{
    BlobTuning, MAX_FRACTAL_DEPTH, MAX_PARTICLES, SledTuning, SpiralTuning, TreeTuning, Tuning,
};

/// Re-exported so dependents share one vector and transform type.
pub use glam::{Affine2, Vec2};
