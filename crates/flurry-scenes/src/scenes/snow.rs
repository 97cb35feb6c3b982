//! Ambient snowfall (stateful).

use flurry_core::{Paint, Rgba, SceneRng, Surface, Vec2};

const FLAKE_COLOR: Rgba = Rgba::rgb(241, 245, 249);

/// State for a single snowflake.
#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radius in pixels.
    pub size: f32,
    pub opacity: f32,
    /// Horizontal sway phase offset.
    pub sway_phase: f32,
}

fn spawn(width: f32, height: f32, rng: &mut SceneRng) -> Snowflake {
    Snowflake {
        pos: Vec2::new(rng.range(0.0, width), rng.range(0.0, height)),
        vel: Vec2::new(rng.range(-0.25, 0.05), rng.range(0.15, 0.6)),
        size: rng.range(0.4, 1.2),
        opacity: rng.range(0.4, 0.9),
        sway_phase: rng.range(0.0, std::f32::consts::TAU),
    }
}

/// Scatter `count` flakes over the canvas.
pub fn init_flakes(count: usize, width: f32, height: f32, rng: &mut SceneRng) -> Vec<Snowflake> {
    (0..count).map(|_| spawn(width, height, rng)).collect()
}

/// Move a flake that left the canvas to a random point on the opposite edge.
///
/// Returns true when the flake was recycled.
pub fn recycle(flake: &mut Snowflake, width: f32, height: f32, rng: &mut SceneRng) -> bool {
    let pos = &mut flake.pos;
    if pos.y > height {
        pos.y = 0.0;
        pos.x = rng.range(0.0, width);
    } else if pos.y < 0.0 {
        pos.y = height;
        pos.x = rng.range(0.0, width);
    } else if pos.x < 0.0 {
        pos.x = width;
        pos.y = rng.range(0.0, height);
    } else if pos.x > width {
        pos.x = 0.0;
        pos.y = rng.range(0.0, height);
    } else {
        return false;
    }
    true
}

/// Advance every flake one frame.
pub fn update(flakes: &mut [Snowflake], frame: u64, width: f32, height: f32, rng: &mut SceneRng) {
    let t = frame as f32 * 0.03;
    for flake in flakes {
        let sway = (t + flake.sway_phase).sin() * 0.12;
        flake.pos += flake.vel + Vec2::new(sway, 0.0);
        recycle(flake, width, height, rng);
    }
}

pub fn draw(flakes: &[Snowflake], surface: &mut dyn Surface) {
    for flake in flakes {
        let paint = Paint::Solid(FLAKE_COLOR.with_alpha(flake.opacity));
        surface.fill_circle(flake.pos, flake.size, &paint);
    }
}
