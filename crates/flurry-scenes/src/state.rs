//! Per-frame animation driver.

use flurry_core::{AnimationSpeed, Palette, SceneEvent, SceneKind, SceneRng, Surface, Tuning};
use ratatui::{Frame, widgets::Paragraph};

use crate::raster::Raster;
use crate::scenes::Scene;

/// Most simulation steps run for one rendered frame; older backlog is dropped.
pub const MAX_CATCHUP_STEPS: u32 = 4;

/// Animation state owned by the host loop.
#[derive(Debug)]
pub struct SceneState {
    scene: Scene,
    raster: Raster,
    tuning: Tuning,
    palette: Palette,
    speed: AnimationSpeed,
    rng: SceneRng,
    fps: u32,
    /// Last known terminal width in cells.
    last_width: u16,
    /// Last known terminal height in cells.
    last_height: u16,
    /// Last update time in milliseconds.
    last_update_ms: u64,
    /// Wall-clock time not yet consumed by a whole step.
    pending_ms: f32,
    frame_count: u64,
}

impl SceneState {
    pub fn new(
        kind: SceneKind,
        tuning: Tuning,
        palette: Palette,
        speed: AnimationSpeed,
        fps: u32,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = SceneRng::from_seed_or_clock(seed);
        log::info!("Starting {kind} scene with seed {}", rng.seed());
        let scene = Scene::new(kind, &tuning, &mut rng);
        Self {
            scene,
            raster: Raster::new(0, 0),
            tuning,
            palette,
            speed,
            rng,
            fps: fps.max(1),
            last_width: 0,
            last_height: 0,
            last_update_ms: 0,
            pending_ms: 0.0,
            frame_count: 0,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.scene.kind()
    }

    /// Switch to another scene, keeping the seed stream and canvas.
    pub fn set_kind(&mut self, kind: SceneKind) {
        self.scene = Scene::new(kind, &self.tuning, &mut self.rng);
        self.relayout();
        log::info!("Switched to {kind} scene");
    }

    pub fn next_scene(&mut self) {
        self.set_kind(self.kind().next());
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
        log::debug!("Palette set to {palette}");
    }

    pub fn speed(&self) -> AnimationSpeed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: AnimationSpeed) {
        self.speed = speed;
        log::debug!("Speed set to {speed}");
    }

    /// Restart the current scene from a new seed; returns the seed used.
    pub fn reseed(&mut self, seed: Option<u64>) -> u64 {
        self.rng = SceneRng::from_seed_or_clock(seed);
        self.scene = Scene::new(self.kind(), &self.tuning, &mut self.rng);
        self.relayout();
        log::info!("Reseeded {} scene with {}", self.kind(), self.rng.seed());
        self.rng.seed()
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Simulation steps run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn handle_event(&mut self, event: SceneEvent) {
        self.scene.handle_event(event, &mut self.rng);
    }

    /// Milliseconds of wall-clock time per simulation step.
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.fps as f32 / self.speed.time_scale()
    }

    /// Resize the canvas to `width` x `height` pixels and regenerate layout.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.raster.resize(width, height);
        self.relayout();
        log::debug!("Canvas resized to {width}x{height} px");
    }

    fn has_canvas(&self) -> bool {
        self.raster.pixel_width() > 0 && self.raster.pixel_height() > 0
    }

    fn relayout(&mut self) {
        if !self.has_canvas() {
            return;
        }
        let width = self.raster.pixel_width() as f32;
        let height = self.raster.pixel_height() as f32;
        self.scene.resize(width, height, &mut self.rng);
        self.raster.clear(self.palette.background());
    }

    /// Run exactly one update and draw.
    pub fn step(&mut self) {
        if !self.has_canvas() {
            return;
        }
        self.scene.update(&mut self.rng);
        self.frame_count += 1;
        self.scene.draw(&mut self.raster, self.palette);
    }

    /// Run the updates owed for the clock reaching `elapsed_ms`.
    ///
    /// Returns how many steps ran; at most [`MAX_CATCHUP_STEPS`].
    pub fn advance(&mut self, elapsed_ms: u64) -> u32 {
        let delta_ms = elapsed_ms.saturating_sub(self.last_update_ms);
        self.last_update_ms = elapsed_ms;
        if !self.has_canvas() {
            return 0;
        }

        let frame_ms = self.frame_ms();
        self.pending_ms += delta_ms as f32;
        let mut steps = (self.pending_ms / frame_ms).floor() as u32;
        self.pending_ms -= steps as f32 * frame_ms;
        if steps > MAX_CATCHUP_STEPS {
            log::trace!("Dropping {} late steps", steps - MAX_CATCHUP_STEPS);
            steps = MAX_CATCHUP_STEPS;
            self.pending_ms = 0.0;
        }

        for _ in 0..steps {
            self.scene.update(&mut self.rng);
        }
        self.frame_count += u64::from(steps);
        steps
    }

    /// Render the scene to the frame.
    pub fn render(&mut self, frame: &mut Frame, elapsed_ms: u64) {
        let area = frame.area();

        // Reinitialize if dimensions changed
        let dimensions_changed = area.width != self.last_width || area.height != self.last_height;
        if dimensions_changed {
            self.last_width = area.width;
            self.last_height = area.height;
            self.resize(usize::from(area.width), usize::from(area.height) * 2);
        }

        let steps = self.advance(elapsed_ms);
        if (steps > 0 || dimensions_changed) && self.has_canvas() {
            self.scene.draw(&mut self.raster, self.palette);
        }

        frame.render_widget(Paragraph::new(self.raster.to_lines()), area);
    }
}
