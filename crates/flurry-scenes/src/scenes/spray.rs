//! Short-lived snow spray kicked up by the sled.

use flurry_core::{MAX_PARTICLES, Paint, Rgba, SceneRng, Surface, Vec2};

/// Downward acceleration applied to spray each frame.
pub const SPRAY_GRAVITY: f32 = 0.06;

const SPRAY_COLOR: Rgba = Rgba::rgb(226, 240, 255);

/// One spray fleck; removed once `life` reaches zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SprayParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in 0.0-1.0; also the drawn opacity.
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}

/// Spawn up to `count` particles at `at`, drifting back by `drift`.
///
/// The total is capped at [`MAX_PARTICLES`]; returns how many were added.
pub fn burst(
    particles: &mut Vec<SprayParticle>,
    at: Vec2,
    count: usize,
    drift: f32,
    rng: &mut SceneRng,
) -> usize {
    let count = count.min(MAX_PARTICLES.saturating_sub(particles.len()));
    particles.extend((0..count).map(|_| SprayParticle {
        pos: at,
        vel: Vec2::new(rng.range(-1.2, 0.4) - drift, rng.range(-1.5, -0.3)),
        life: 1.0,
        decay: rng.range(0.02, 0.05),
        size: rng.range(0.5, 1.3),
    }));
    count
}

/// Integrate, age and drop dead particles.
pub fn update(particles: &mut Vec<SprayParticle>) {
    for p in particles.iter_mut() {
        p.vel.y += SPRAY_GRAVITY;
        p.pos += p.vel;
        p.life = (p.life - p.decay).max(0.0);
    }
    particles.retain(|p| p.life > 0.0);
}

pub fn draw(particles: &[SprayParticle], surface: &mut dyn Surface) {
    for p in particles {
        surface.fill_circle(p.pos, p.size, &Paint::Solid(SPRAY_COLOR.with_alpha(p.life)));
    }
}
