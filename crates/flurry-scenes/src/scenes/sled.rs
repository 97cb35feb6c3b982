//! Side-scrolling sled ride (stateful).
//!
//! Layers, back to front: sky, far and near mountains, pine trees, the snow
//! surface, the sled, spray, falling snow and the jump meter.

use flurry_core::{ColorStop, Paint, Rgba, SceneRng, SledTuning, Surface, Vec2};

use super::snow::{self, Snowflake};
use super::spray::{self, SprayParticle};
use super::terrain::{Backdrop, TerrainSample, sample_terrain, terrain_height, terrain_slope};

/// Sled position as a fraction of canvas width.
const SLED_X: f32 = 0.3;
/// Trailing spray is emitted every this many grounded frames.
const TRAIL_EVERY: u64 = 4;

/// Whether the sled rides the surface or is in the air.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SledState {
    Grounded,
    Airborne,
}

/// The player-controlled sled.
#[derive(Debug, Clone, PartialEq)]
pub struct Sled {
    /// Screen x; the world scrolls underneath.
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub rotation: f32,
    pub charge: f32,
    pub charging: bool,
    pub state: SledState,
}

impl Sled {
    fn new(x: f32) -> Self {
        Self {
            x,
            y: 0.0,
            vy: 0.0,
            rotation: 0.0,
            charge: 0.0,
            charging: false,
            state: SledState::Grounded,
        }
    }

    pub fn begin_charge(&mut self) {
        self.charging = true;
    }

    /// Grow the charge while the input is held, capped at `max_charge`.
    pub fn charge_step(&mut self, tuning: &SledTuning) {
        if self.charging {
            self.charge = (self.charge + tuning.charge_rate).min(tuning.max_charge);
        }
    }

    /// Release the charge. Launches only from the ground with a positive
    /// charge; the charge is spent either way.
    pub fn release(&mut self) -> bool {
        self.charging = false;
        let charge = std::mem::take(&mut self.charge);
        if self.state == SledState::Grounded && charge > 0.0 {
            self.vy = -charge;
            self.state = SledState::Airborne;
            true
        } else {
            false
        }
    }

    /// One physics step against the surface at `ground` with angle `slope`.
    ///
    /// Returns the landing point on the frame the sled touches down.
    pub fn step(&mut self, ground: f32, slope: f32, tuning: &SledTuning) -> Option<Vec2> {
        let rest = ground - tuning.rider_offset;
        match self.state {
            SledState::Grounded => {
                self.y = rest;
                self.vy = 0.0;
                self.rotation = ease(self.rotation, slope, tuning.slope_easing);
                None
            }
            SledState::Airborne => {
                self.vy += tuning.gravity;
                self.y += self.vy;
                // Nose follows the flight arc
                let pitch = (self.vy * 0.25).atan() * 0.5;
                self.rotation = ease(self.rotation, pitch, tuning.slope_easing * 0.5);
                if self.y >= rest {
                    self.y = rest;
                    self.vy = 0.0;
                    self.state = SledState::Grounded;
                    Some(Vec2::new(self.x, ground))
                } else {
                    None
                }
            }
        }
    }
}

fn ease(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}

/// Full sled scene state.
#[derive(Debug, Clone)]
pub struct SledScene {
    tuning: SledTuning,
    width: f32,
    height: f32,
    scroll: f32,
    frame: u64,
    sled: Sled,
    backdrop: Backdrop,
    terrain: Vec<TerrainSample>,
    snow: Vec<Snowflake>,
    spray: Vec<SprayParticle>,
}

impl SledScene {
    pub fn new(tuning: &SledTuning) -> Self {
        Self {
            tuning: tuning.clone(),
            width: 0.0,
            height: 0.0,
            scroll: 0.0,
            frame: 0,
            sled: Sled::new(0.0),
            backdrop: Backdrop::default(),
            terrain: Vec::new(),
            snow: Vec::new(),
            spray: Vec::new(),
        }
    }

    pub fn sled(&self) -> &Sled {
        &self.sled
    }

    pub fn terrain(&self) -> &[TerrainSample] {
        &self.terrain
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn snow(&self) -> &[Snowflake] {
        &self.snow
    }

    pub fn spray(&self) -> &[SprayParticle] {
        &self.spray
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Surface height under the sled.
    fn ground_under_sled(&self) -> f32 {
        terrain_height(self.scroll + self.sled.x, self.height)
    }

    /// Regenerate everything that depends on the canvas size.
    pub fn resize(&mut self, width: f32, height: f32, rng: &mut SceneRng) {
        self.width = width;
        self.height = height;
        self.backdrop = Backdrop::generate(width, height, rng);
        self.snow = snow::init_flakes(self.tuning.snow_count, width, height, rng);
        self.spray.clear();
        self.terrain = sample_terrain(self.scroll, width, height, self.tuning.terrain_step);

        self.sled.x = (width * SLED_X).round();
        self.sled.state = SledState::Grounded;
        self.sled.vy = 0.0;
        self.sled.y = self.ground_under_sled() - self.tuning.rider_offset;
        self.sled.rotation = terrain_slope(self.scroll + self.sled.x, height);
    }

    /// Press: start charging a jump.
    pub fn press(&mut self) {
        self.sled.begin_charge();
    }

    /// Release: launch if grounded and charged.
    pub fn release(&mut self, rng: &mut SceneRng) {
        let launch_speed = self.sled.charge;
        if self.sled.release() {
            let at = Vec2::new(self.sled.x, self.sled.y + self.tuning.rider_offset);
            spray::burst(
                &mut self.spray,
                at,
                self.tuning.spray_burst / 3,
                self.tuning.scroll_speed * 0.5,
                rng,
            );
            log::debug!("Sled launched at {launch_speed:.2}");
        }
    }

    /// Advance one frame; returns the landing point on touchdown frames.
    pub fn update(&mut self, rng: &mut SceneRng) -> Option<Vec2> {
        self.frame += 1;
        self.scroll += self.tuning.scroll_speed;

        spray::update(&mut self.spray);

        self.sled.charge_step(&self.tuning);
        let ground = self.ground_under_sled();
        let slope = terrain_slope(self.scroll + self.sled.x, self.height);
        let was_grounded = self.sled.state == SledState::Grounded;
        let landing = self.sled.step(ground, slope, &self.tuning);

        let drift = self.tuning.scroll_speed * 0.5;
        if let Some(at) = landing {
            let spawned = spray::burst(&mut self.spray, at, self.tuning.spray_burst, drift, rng);
            log::debug!("Sled landed at ({:.1}, {:.1}), {spawned} spray", at.x, at.y);
        } else if was_grounded && self.frame % TRAIL_EVERY == 0 {
            let at = Vec2::new(self.sled.x - 3.0, ground);
            spray::burst(&mut self.spray, at, 1, drift, rng);
        }

        snow::update(&mut self.snow, self.frame, self.width, self.height, rng);
        self.terrain = sample_terrain(self.scroll, self.width, self.height, self.tuning.terrain_step);
        landing
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        let (width, height) = (self.width, self.height);

        let sky = Paint::Linear {
            from: Vec2::ZERO,
            to: Vec2::new(0.0, height * 0.7),
            stops: vec![
                ColorStop::new(0.0, Rgba::rgb(15, 23, 42)),
                ColorStop::new(0.6, Rgba::rgb(49, 74, 120)),
                ColorStop::new(1.0, Rgba::rgb(148, 178, 214)),
            ],
        };
        surface.fill_rect(0.0, 0.0, width, height, &sky);

        self.backdrop.draw(surface, self.scroll);
        self.draw_terrain(surface);
        self.draw_sled(surface);
        spray::draw(&self.spray, surface);
        snow::draw(&self.snow, surface);

        if self.sled.charging && self.sled.charge > 0.0 {
            let fill = self.sled.charge / self.tuning.max_charge;
            let track = (width * 0.2).max(8.0);
            surface.fill_rect(2.0, height - 4.0, track, 2.0, &Paint::Solid(Rgba::rgba(15, 23, 42, 0.6)));
            surface.fill_rect(
                2.0,
                height - 4.0,
                track * fill,
                2.0,
                &Paint::Solid(Rgba::rgb(250, 204, 21).lerp(Rgba::rgb(239, 68, 68), fill)),
            );
        }
    }

    fn draw_terrain(&self, surface: &mut dyn Surface) {
        let (Some(first), Some(last)) = (self.terrain.first(), self.terrain.last()) else {
            return;
        };
        let mut outline: Vec<Vec2> = self.terrain.iter().map(|s| Vec2::new(s.x, s.y)).collect();
        outline.push(Vec2::new(last.x, self.height));
        outline.push(Vec2::new(first.x, self.height));

        let snowpack = Paint::Linear {
            from: Vec2::new(0.0, self.height * 0.5),
            to: Vec2::new(0.0, self.height),
            stops: vec![
                ColorStop::new(0.0, Rgba::rgb(248, 250, 252)),
                ColorStop::new(1.0, Rgba::rgb(186, 210, 235)),
            ],
        };
        surface.fill_polygon(&outline, &snowpack);
    }

    fn draw_sled(&self, surface: &mut dyn Surface) {
        let base = self.tuning.rider_offset;
        surface.save();
        surface.translate(self.sled.x, self.sled.y);
        surface.rotate(self.sled.rotation);

        let runner = Rgba::rgb(203, 213, 225);
        surface.stroke_line(Vec2::new(-5.0, base), Vec2::new(5.0, base), 1.0, runner);
        surface.stroke_line(Vec2::new(5.0, base), Vec2::new(6.5, base - 1.5), 1.0, runner);
        surface.fill_rect(-4.5, base - 2.0, 9.0, 1.5, &Paint::Solid(Rgba::rgb(220, 38, 38)));

        // Rider
        surface.fill_rect(-1.0, base - 5.0, 2.5, 3.0, &Paint::Solid(Rgba::rgb(37, 99, 235)));
        surface.fill_circle(Vec2::new(0.25, base - 6.2), 1.2, &Paint::Solid(Rgba::rgb(253, 224, 200)));

        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use flurry_core::{DrawCommand, Recorder};

    use super::*;

    fn scene(seed: u64) -> (SledScene, SceneRng) {
        let mut rng = SceneRng::new(seed);
        let mut scene = SledScene::new(&SledTuning::default());
        scene.resize(160.0, 90.0, &mut rng);
        (scene, rng)
    }

    fn rest_height(scene: &SledScene) -> f32 {
        scene.ground_under_sled() - scene.tuning.rider_offset
    }

    #[test]
    fn test_grounded_sled_follows_terrain() {
        let (mut scene, mut rng) = scene(1);
        for _ in 0..200 {
            scene.update(&mut rng);
            assert_eq!(scene.sled().state, SledState::Grounded);
            assert_eq!(scene.sled().y, rest_height(&scene));
        }
    }

    #[test]
    fn test_rotation_eases_toward_slope() {
        let tuning = SledTuning::default();
        let mut sled = Sled::new(10.0);
        let before = (0.5 - sled.rotation).abs();
        sled.step(50.0, 0.5, &tuning);
        let after = (0.5 - sled.rotation).abs();
        assert!(after < before);
        assert!((sled.rotation - 0.5 * tuning.slope_easing).abs() < 1e-6);
    }

    #[test]
    fn test_charge_caps_and_releases_at_max() {
        let (mut scene, mut rng) = scene(2);
        let max = scene.tuning.max_charge;
        scene.press();
        for _ in 0..500 {
            scene.update(&mut rng);
            assert!(scene.sled().charge <= max);
        }
        assert_eq!(scene.sled().charge, max);

        scene.release(&mut rng);
        assert_eq!(scene.sled().state, SledState::Airborne);
        assert_eq!(scene.sled().vy, -max);
        assert_eq!(scene.sled().charge, 0.0);
        assert!(!scene.sled().charging);
    }

    #[test]
    fn test_release_without_charge_stays_grounded() {
        let (mut scene, mut rng) = scene(3);
        scene.release(&mut rng);
        assert_eq!(scene.sled().state, SledState::Grounded);
        assert_eq!(scene.sled().vy, 0.0);
    }

    #[test]
    fn test_airborne_release_does_not_relaunch() {
        let mut sled = Sled::new(0.0);
        sled.charge = 2.0;
        assert!(sled.release());
        sled.begin_charge();
        sled.charge = 1.0;
        let vy = sled.vy;
        assert!(!sled.release());
        assert_eq!(sled.vy, vy);
        assert_eq!(sled.charge, 0.0);
    }

    #[test]
    fn test_landing_snaps_and_bursts() {
        let (mut scene, mut rng) = scene(4);
        scene.press();
        for _ in 0..10 {
            scene.update(&mut rng);
        }
        scene.release(&mut rng);
        assert_eq!(scene.sled().state, SledState::Airborne);

        let mut landed = None;
        for _ in 0..1000 {
            landed = scene.update(&mut rng);
            if landed.is_some() {
                break;
            }
            // Still in the air means still above the surface
            assert!(scene.sled().y < rest_height(&scene));
        }
        let at = landed.expect("sled should land");

        assert_eq!(scene.sled().state, SledState::Grounded);
        assert_eq!(scene.sled().y, rest_height(&scene));
        assert_eq!(scene.sled().vy, 0.0);

        let fresh: Vec<_> = scene.spray().iter().filter(|p| p.life == 1.0).collect();
        assert_eq!(fresh.len(), scene.tuning.spray_burst);
        assert!(fresh.iter().all(|p| p.pos == at));
    }

    #[test]
    fn test_launch_kicks_up_a_puff() {
        let (mut scene, mut rng) = scene(8);
        scene.press();
        for _ in 0..10 {
            scene.update(&mut rng);
        }
        let before = scene.spray().len();
        let at = Vec2::new(scene.sled().x, scene.sled().y + scene.tuning.rider_offset);
        scene.release(&mut rng);

        let puff = scene.tuning.spray_burst / 3;
        assert_eq!(scene.spray().len(), before + puff);
        let fresh: Vec<_> = scene.spray().iter().filter(|p| p.life == 1.0 && p.pos == at).collect();
        assert_eq!(fresh.len(), puff);
    }

    #[test]
    fn test_grounded_trail_every_few_frames() {
        let (mut scene, mut rng) = scene(9);
        for _ in 0..TRAIL_EVERY - 1 {
            scene.update(&mut rng);
        }
        assert!(scene.spray().is_empty());

        scene.update(&mut rng);
        assert_eq!(scene.spray().len(), 1);
        let fleck = &scene.spray()[0];
        assert_eq!(fleck.pos, Vec2::new(scene.sled().x - 3.0, scene.ground_under_sled()));

        for _ in 0..TRAIL_EVERY {
            scene.update(&mut rng);
        }
        assert_eq!(scene.spray().len(), 2);
    }

    #[test]
    fn test_no_trail_while_airborne() {
        let (mut scene, mut rng) = scene(10);
        scene.press();
        for _ in 0..40 {
            scene.update(&mut rng);
        }
        scene.release(&mut rng);

        let mut count = scene.spray().len();
        for _ in 0..1000 {
            if scene.update(&mut rng).is_some() {
                return;
            }
            assert!(scene.spray().len() <= count, "spray grew in the air");
            count = scene.spray().len();
        }
        panic!("sled should land");
    }

    #[test]
    fn test_resize_is_idempotent() {
        let (mut scene, mut rng) = scene(5);
        let first = (
            scene.terrain().len(),
            scene.backdrop().far.items.len(),
            scene.backdrop().near.items.len(),
            scene.backdrop().trees.items.len(),
            scene.snow().len(),
        );
        scene.resize(160.0, 90.0, &mut rng);
        let second = (
            scene.terrain().len(),
            scene.backdrop().far.items.len(),
            scene.backdrop().near.items.len(),
            scene.backdrop().trees.items.len(),
            scene.snow().len(),
        );
        assert_eq!(first, second);
        assert_eq!(first.0, 81);
    }

    #[test]
    fn test_scroll_regenerates_terrain() {
        let (mut scene, mut rng) = scene(6);
        let before = scene.terrain()[0];
        scene.update(&mut rng);
        let after = scene.terrain()[0];
        assert_eq!(after.x, before.x);
        assert_eq!(after.y, terrain_height(scene.scroll(), 90.0));
        assert_eq!(scene.terrain().len(), 81);
    }

    #[test]
    fn test_draw_layers_back_to_front() {
        let (mut scene, mut rng) = scene(7);
        scene.update(&mut rng);
        let mut recorder = Recorder::new(160.0, 90.0);
        scene.draw(&mut recorder);

        assert!(recorder.is_balanced());
        match recorder.commands().first() {
            Some(DrawCommand::Polygon { paint: Paint::Linear { .. }, points, .. }) => {
                assert_eq!(points[0], Vec2::ZERO);
            }
            other => panic!("sky should be drawn first, got {other:?}"),
        }
        // Snow is drawn last, one circle per flake
        let circles: Vec<_> = recorder.circles().collect();
        assert!(circles.len() >= scene.snow().len());
        let tail = &circles[circles.len() - scene.snow().len()..];
        for ((center, _, _), flake) in tail.iter().zip(scene.snow()) {
            assert_eq!(*center, flake.pos);
        }
    }
}
