//! The animated scenes and their shared building blocks.

pub mod blobs;
pub mod fractal;
pub mod sled;
pub mod snow;
pub mod spray;
pub mod terrain;

use flurry_core::{Palette, SceneEvent, SceneKind, SceneRng, Surface, Tuning};

use blobs::BlobField;
use fractal::FractalScene;
use sled::SledScene;

/// The active scene and its state.
#[derive(Debug, Clone)]
pub enum Scene {
    Blobs(BlobField),
    Tree(FractalScene),
    Spiral(FractalScene),
    Sled(SledScene),
}

impl Scene {
    /// Build a scene; size-dependent layout waits for the first [`Scene::resize`].
    pub fn new(kind: SceneKind, tuning: &Tuning, rng: &mut SceneRng) -> Self {
        match kind {
            SceneKind::Blobs => Scene::Blobs(BlobField::new(&tuning.blobs, rng)),
            SceneKind::Tree => Scene::Tree(FractalScene::tree(&tuning.tree)),
            SceneKind::Spiral => Scene::Spiral(FractalScene::spiral(&tuning.spiral)),
            SceneKind::Sled => Scene::Sled(SledScene::new(&tuning.sled)),
        }
    }

    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Blobs(_) => SceneKind::Blobs,
            Scene::Tree(_) => SceneKind::Tree,
            Scene::Spiral(_) => SceneKind::Spiral,
            Scene::Sled(_) => SceneKind::Sled,
        }
    }

    /// Regenerate layout for a canvas of `width` x `height` pixels.
    pub fn resize(&mut self, width: f32, height: f32, rng: &mut SceneRng) {
        match self {
            // Blob positions are normalized to the canvas
            Scene::Blobs(_) => {}
            Scene::Tree(fractal) | Scene::Spiral(fractal) => fractal.resize(width, height, rng),
            Scene::Sled(sled) => sled.resize(width, height, rng),
        }
    }

    /// Advance one fixed simulation step.
    pub fn update(&mut self, rng: &mut SceneRng) {
        match self {
            Scene::Blobs(field) => field.update(),
            Scene::Tree(fractal) | Scene::Spiral(fractal) => fractal.update(rng),
            Scene::Sled(sled) => {
                sled.update(rng);
            }
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, palette: Palette) {
        match self {
            Scene::Blobs(field) => field.draw(surface, palette),
            Scene::Tree(fractal) | Scene::Spiral(fractal) => fractal.draw(surface, palette),
            Scene::Sled(sled) => sled.draw(surface),
        }
    }

    pub fn handle_event(&mut self, event: SceneEvent, rng: &mut SceneRng) {
        match (self, event) {
            (Scene::Blobs(field), SceneEvent::PointerMoved { x, y }) => field.set_pointer(x, y),
            (Scene::Blobs(field), SceneEvent::PointerDown { x, y }) => field.wind_gust(x, y),
            (
                Scene::Sled(sled),
                SceneEvent::JumpPressed | SceneEvent::PointerDown { .. },
            ) => sled.press(),
            (Scene::Sled(sled), SceneEvent::JumpReleased | SceneEvent::PointerUp) => {
                sled.release(rng)
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_matches_kind() {
        let mut rng = SceneRng::new(1);
        for kind in SceneKind::ALL {
            assert_eq!(Scene::new(kind, &Tuning::default(), &mut rng).kind(), kind);
        }
    }

    #[test]
    fn test_jump_events_reach_sled() {
        let mut rng = SceneRng::new(2);
        let mut scene = Scene::new(SceneKind::Sled, &Tuning::default(), &mut rng);
        scene.resize(120.0, 60.0, &mut rng);
        scene.handle_event(SceneEvent::JumpPressed, &mut rng);
        for _ in 0..5 {
            scene.update(&mut rng);
        }
        scene.handle_event(SceneEvent::JumpReleased, &mut rng);
        let Scene::Sled(ride) = &scene else {
            panic!("expected the sled scene");
        };
        assert_eq!(ride.sled().state, sled::SledState::Airborne);
    }

    #[test]
    fn test_click_gusts_blobs() {
        let mut rng = SceneRng::new(3);
        let mut scene = Scene::new(SceneKind::Blobs, &Tuning::default(), &mut rng);
        let before = scene.clone();
        scene.handle_event(SceneEvent::PointerDown { x: 0.5, y: 0.5 }, &mut rng);
        let (Scene::Blobs(after), Scene::Blobs(before)) = (&scene, &before) else {
            panic!("expected the blob scene");
        };
        let moved = after
            .blobs()
            .iter()
            .zip(before.blobs())
            .any(|(a, b)| a.vel != b.vel);
        assert!(moved);
    }
}
