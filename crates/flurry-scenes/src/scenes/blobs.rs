//! Gradient blob field (stateful).
//!
//! Blobs live in normalized 0.0-1.0 space, drift on slow sine paths, lean
//! toward the pointer and scatter away from clicks. Each frame the canvas is
//! washed with a translucent backdrop so old positions fade into trails.

use std::f32::consts::TAU;

use flurry_core::{Blend, BlobTuning, ColorStop, Paint, Palette, SceneRng, Surface, Vec2};

/// Blobs whose base position leaves this band are wrapped by `WRAP_SPAN`.
const WRAP_MIN: f32 = -0.3;
const WRAP_MAX: f32 = 1.3;
const WRAP_SPAN: f32 = 1.6;

/// Gust falloff distance in normalized units.
const GUST_REACH: f32 = 1.2;

/// State for a single blob.
#[derive(Debug, Clone)]
pub struct Blob {
    /// Drawn position.
    pub pos: Vec2,
    /// Position before the drift offset is added.
    pub base: Vec2,
    pub vel: Vec2,
    /// Radius as a fraction of the shorter canvas side.
    pub radius: f32,
    pub speed: f32,
    pub drift: f32,
    pub phase: Vec2,
    pub mass: f32,
    /// Index into the active palette.
    pub color_index: usize,
}

impl Blob {
    fn new(index: usize, rng: &mut SceneRng) -> Self {
        let pos = Vec2::new(rng.unit(), rng.unit());
        Self {
            pos,
            base: pos,
            vel: Vec2::ZERO,
            radius: rng.range(0.25, 0.45),
            speed: rng.range(0.0005, 0.0008),
            drift: rng.range(0.08, 0.14),
            phase: Vec2::new(rng.range(0.0, TAU), rng.range(0.0, TAU)),
            mass: rng.range(0.5, 1.0),
            color_index: index,
        }
    }

    fn apply_force(&mut self, force: Vec2) {
        self.vel += force / self.mass;
    }

    fn update(&mut self, time: f32, target: Vec2, tuning: &BlobTuning) {
        self.vel *= tuning.friction;
        self.base += self.vel;

        let drift = Vec2::new(
            (time * self.speed + self.phase.x).sin() * self.drift,
            (time * self.speed * 0.6 + self.phase.y).cos() * self.drift,
        );
        self.pos = self.base + drift;

        // Gentle pull toward the pointer
        let delta = target - self.pos;
        let dist = delta.length();
        if dist < tuning.attraction_radius && dist > 0.01 {
            let force = (tuning.attraction_radius - dist) * 0.02;
            self.base += delta * force;
        }

        self.base.x = wrap_band(self.base.x);
        self.base.y = wrap_band(self.base.y);
    }
}

fn wrap_band(v: f32) -> f32 {
    if v < WRAP_MIN {
        v + WRAP_SPAN
    } else if v > WRAP_MAX {
        v - WRAP_SPAN
    } else {
        v
    }
}

/// All blobs plus the pointer they are attracted to.
#[derive(Debug, Clone)]
pub struct BlobField {
    blobs: Vec<Blob>,
    pointer: Vec2,
    time: u64,
    tuning: BlobTuning,
}

impl BlobField {
    pub fn new(tuning: &BlobTuning, rng: &mut SceneRng) -> Self {
        Self {
            blobs: (0..tuning.count).map(|i| Blob::new(i, rng)).collect(),
            pointer: Vec2::splat(0.5),
            time: 0,
            tuning: tuning.clone(),
        }
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, y);
    }

    /// Push every blob away from a click, strongest nearby.
    pub fn wind_gust(&mut self, x: f32, y: f32) {
        let click = Vec2::new(x, y);
        for blob in &mut self.blobs {
            let away = blob.pos - click;
            let dist = away.length();
            if dist < 0.001 {
                continue;
            }
            let falloff = dist.min(GUST_REACH) / GUST_REACH;
            let magnitude = (1.0 - falloff) * self.tuning.gust_strength;
            blob.apply_force(away / dist * magnitude);
        }
        log::debug!("Wind gust at ({x:.2}, {y:.2})");
    }

    pub fn update(&mut self) {
        self.time += 1;
        let time = self.time as f32;
        for blob in &mut self.blobs {
            blob.update(time, self.pointer, &self.tuning);
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, palette: Palette) {
        let width = surface.width();
        let height = surface.height();
        let unit = width.min(height);

        let wash = palette.background().with_alpha(self.tuning.fade_alpha);
        surface.fill_rect(0.0, 0.0, width, height, &Paint::Solid(wash));

        surface.set_blend(Blend::Screen);
        for blob in &self.blobs {
            let center = Vec2::new(blob.pos.x * width, blob.pos.y * height);
            let radius = blob.radius * unit;
            let color = palette.color(blob.color_index);
            let paint = Paint::Radial {
                center,
                radius,
                stops: vec![
                    ColorStop::new(0.0, color.with_alpha(0.4)),
                    ColorStop::new(0.5, color.with_alpha(0.15)),
                    ColorStop::new(1.0, color.with_alpha(0.0)),
                ],
            };
            surface.fill_circle(center, radius, &paint);
        }
        surface.set_blend(Blend::SourceOver);
    }
}

#[cfg(test)]
mod tests {
    use flurry_core::Recorder;

    use super::*;

    fn field(seed: u64) -> BlobField {
        BlobField::new(&BlobTuning::default(), &mut SceneRng::new(seed))
    }

    #[test]
    fn test_blob_count_and_colors() {
        let field = field(1);
        assert_eq!(field.blobs().len(), 6);
        for (i, blob) in field.blobs().iter().enumerate() {
            assert_eq!(blob.color_index, i);
            assert!((0.25..0.45).contains(&blob.radius));
        }
    }

    #[test]
    fn test_wind_gust_pushes_away() {
        let mut field = field(2);
        let click = Vec2::new(0.5, 0.5);
        field.wind_gust(click.x, click.y);
        for blob in field.blobs() {
            let away = blob.pos - click;
            if away.length() > 0.001 {
                assert!(blob.vel.dot(away) > 0.0, "gust should point away from the click");
            }
        }
    }

    #[test]
    fn test_far_gust_has_no_effect() {
        let mut field = field(3);
        for blob in &mut field.blobs {
            blob.pos = Vec2::new(0.0, 0.0);
        }
        field.wind_gust(2.0, 2.0);
        assert!(field.blobs().iter().all(|b| b.vel == Vec2::ZERO));
    }

    #[test]
    fn test_base_stays_in_wrap_band() {
        let mut field = field(4);
        for (i, blob) in field.blobs.iter_mut().enumerate() {
            blob.vel = Vec2::new(0.05 * (i as f32 - 2.5), 0.04);
        }
        for _ in 0..2000 {
            field.update();
            for blob in field.blobs() {
                assert!(blob.base.x >= WRAP_MIN - 0.1 && blob.base.x <= WRAP_MAX + 0.1);
                assert!(blob.base.y >= WRAP_MIN - 0.1 && blob.base.y <= WRAP_MAX + 0.1);
            }
        }
    }

    /// A blob at `at` with no drift, so `pos == base` after an update.
    fn still_blob(at: Vec2) -> Blob {
        Blob {
            pos: at,
            base: at,
            vel: Vec2::ZERO,
            radius: 0.3,
            speed: 0.0006,
            drift: 0.0,
            phase: Vec2::ZERO,
            mass: 1.0,
            color_index: 0,
        }
    }

    #[test]
    fn test_pointer_attracts_within_radius() {
        let tuning = BlobTuning::default();
        let pointer = Vec2::new(0.7, 0.5);

        let mut near = still_blob(Vec2::new(0.5, 0.5));
        near.update(1.0, pointer, &tuning);
        let pull = (tuning.attraction_radius - 0.2) * 0.02;
        assert!((near.base.x - (0.5 + 0.2 * pull)).abs() < 1e-6);
        assert_eq!(near.base.y, 0.5);
        assert!(near.base.distance(pointer) < 0.2);

        let mut far = still_blob(Vec2::new(0.2, 0.5));
        far.update(1.0, pointer, &tuning);
        assert_eq!(far.base, Vec2::new(0.2, 0.5));

        let mut on_top = still_blob(Vec2::new(0.695, 0.5));
        on_top.update(1.0, pointer, &tuning);
        assert_eq!(on_top.base, Vec2::new(0.695, 0.5));
    }

    #[test]
    fn test_friction_decays_velocity() {
        let tuning = BlobTuning::default();
        let mut blob = still_blob(Vec2::new(0.5, 0.5));
        blob.vel = Vec2::new(0.01, -0.02);
        blob.update(1.0, Vec2::new(5.0, 5.0), &tuning);

        let expected = Vec2::new(0.01, -0.02) * tuning.friction;
        assert!((blob.vel - expected).length() < 1e-7);
        assert!((blob.base - (Vec2::new(0.5, 0.5) + expected)).length() < 1e-6);
    }

    #[test]
    fn test_drift_offsets_from_base() {
        let tuning = BlobTuning::default();
        let mut blob = Blob {
            drift: 0.1,
            speed: 0.5,
            phase: Vec2::new(0.3, 1.1),
            ..still_blob(Vec2::new(0.5, 0.5))
        };
        let time = 2.0;
        blob.update(time, Vec2::new(5.0, 5.0), &tuning);

        let offset = Vec2::new(
            (time * 0.5 + 0.3_f32).sin() * 0.1,
            (time * 0.5 * 0.6 + 1.1_f32).cos() * 0.1,
        );
        assert_eq!(blob.base, Vec2::new(0.5, 0.5));
        assert!((blob.pos - (blob.base + offset)).length() < 1e-6);
    }

    #[test]
    fn test_draw_fades_then_screens_blobs() {
        let field = field(5);
        let mut recorder = Recorder::new(160.0, 90.0);
        field.draw(&mut recorder, Palette::Emerald);
        let circles: Vec<_> = recorder.circles().collect();
        assert_eq!(circles.len(), 6);
        assert!(circles.iter().all(|(_, _, blend)| *blend == Blend::Screen));
        assert!(matches!(
            recorder.commands().first(),
            Some(flurry_core::DrawCommand::Polygon { blend: Blend::SourceOver, .. })
        ));
    }
}
