//! Growing fractal tree and spiral (stateful).
//!
//! A skeleton of fully grown branches is generated breadth-first, so the
//! branch list is ordered by depth. Drawing then scales each branch by the
//! eased growth of its depth, which makes the structure grow smoothly from
//! the root outward instead of popping in one level at a time.

use std::collections::VecDeque;
use std::f32::consts::{FRAC_PI_2, TAU};

use flurry_core::{
    MAX_FRACTAL_DEPTH, Paint, Palette, Rgba, SceneRng, SpiralTuning, Surface, TreeTuning, Vec2,
    hsl_to_rgb,
};

/// Side shoots of a spiral arm are this much shorter than the arm itself.
const SIDE_SHOOT_RATIO: f32 = 0.55;
/// Width lost per level.
const WIDTH_DECAY: f32 = 0.72;
const MIN_WIDTH: f32 = 0.5;

const BARK: Rgba = Rgba::rgb(92, 64, 51);

/// Where roots start and how children are produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FractalLayout {
    /// One trunk from the bottom centre, two children per branch.
    Tree,
    /// `arms` roots from the centre; each level turns by `twist` radians and
    /// sprouts one side shoot.
    Spiral { arms: u32, twist: f32 },
}

/// Generator parameters with angles in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalParams {
    pub layout: FractalLayout,
    pub max_depth: u32,
    pub spread: f32,
    pub jitter: f32,
    pub decay: f32,
    pub min_length: f32,
    /// Root length relative to the canvas.
    pub root_fraction: f32,
}

impl FractalParams {
    pub fn tree(tuning: &TreeTuning) -> Self {
        Self {
            layout: FractalLayout::Tree,
            max_depth: tuning.max_depth,
            spread: tuning.spread_deg.to_radians(),
            jitter: tuning.jitter_deg.to_radians(),
            decay: tuning.decay,
            min_length: tuning.min_length,
            root_fraction: tuning.trunk_fraction,
        }
    }

    pub fn spiral(tuning: &SpiralTuning) -> Self {
        Self {
            layout: FractalLayout::Spiral {
                arms: tuning.arms,
                twist: tuning.twist_deg.to_radians(),
            },
            max_depth: tuning.max_depth,
            spread: tuning.spread_deg.to_radians(),
            jitter: tuning.jitter_deg.to_radians(),
            decay: tuning.decay,
            min_length: tuning.min_length,
            root_fraction: tuning.arm_fraction,
        }
    }
}

/// A fully grown branch.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub depth: u32,
    pub start: Vec2,
    pub end: Vec2,
    pub width: f32,
    /// No children were generated from this branch.
    pub leaf: bool,
}

impl Branch {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// A branch waiting to be expanded.
#[derive(Debug, Clone, Copy)]
struct Bud {
    start: Vec2,
    angle: f32,
    length: f32,
    width: f32,
    depth: u32,
    side: bool,
}

impl Bud {
    fn child(&self, start: Vec2, angle: f32, length: f32, side: bool) -> Self {
        Self {
            start,
            angle,
            length,
            width: (self.width * WIDTH_DECAY).max(MIN_WIDTH),
            depth: self.depth + 1,
            side,
        }
    }
}

/// Ease-out cubic on 0.0-1.0.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Eased growth (0.0-1.0) of branches at `depth` for overall `progress`.
///
/// Depth `d` of `depth_count` levels grows during the progress window
/// `[d / n, (d + 1) / n]`.
pub fn depth_growth(depth: u32, depth_count: u32, progress: f32) -> f32 {
    if depth_count == 0 {
        return 0.0;
    }
    let local = progress.clamp(0.0, 1.0) * depth_count as f32 - depth as f32;
    ease_out_cubic(local)
}

/// Depth-ordered branch list of one fully grown structure.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    branches: Vec<Branch>,
    depth_count: u32,
}

impl Skeleton {
    /// Generate the structure for a canvas of `width` x `height` pixels.
    pub fn build(params: &FractalParams, width: f32, height: f32, rng: &mut SceneRng) -> Self {
        let max_depth = params.max_depth.clamp(1, MAX_FRACTAL_DEPTH);
        let mut queue: VecDeque<Bud> = roots(params, width, height, rng).into();
        let mut branches = Vec::new();

        while let Some(bud) = queue.pop_front() {
            let end = bud.start + Vec2::from_angle(bud.angle) * bud.length;
            let before = queue.len();
            if bud.depth + 1 < max_depth {
                sprout(params, &bud, end, rng, &mut queue);
            }
            branches.push(Branch {
                depth: bud.depth,
                start: bud.start,
                end,
                width: bud.width,
                leaf: queue.len() == before,
            });
        }

        let depth_count = branches.iter().map(|b| b.depth + 1).max().unwrap_or(0);
        Self {
            branches,
            depth_count,
        }
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Number of distinct depths present.
    pub fn depth_count(&self) -> u32 {
        self.depth_count
    }

    /// Rendered length of branch `index` at `progress`.
    pub fn grown_length(&self, index: usize, progress: f32) -> f32 {
        let branch = &self.branches[index];
        branch.length() * depth_growth(branch.depth, self.depth_count, progress)
    }

    /// Visible branches at `progress` as `(branch, drawn end, growth)`.
    pub fn grown(&self, progress: f32) -> impl Iterator<Item = (&Branch, Vec2, f32)> + '_ {
        self.branches.iter().filter_map(move |branch| {
            let growth = depth_growth(branch.depth, self.depth_count, progress);
            (growth > 0.0).then(|| {
                let end = branch.start + (branch.end - branch.start) * growth;
                (branch, end, growth)
            })
        })
    }
}

fn roots(params: &FractalParams, width: f32, height: f32, rng: &mut SceneRng) -> Vec<Bud> {
    match params.layout {
        FractalLayout::Tree => {
            let length = height * params.root_fraction;
            vec![Bud {
                start: Vec2::new(width / 2.0, height),
                angle: -FRAC_PI_2,
                length,
                width: (length * 0.12).max(1.0),
                depth: 0,
                side: false,
            }]
        }
        FractalLayout::Spiral { arms, .. } => {
            let length = width.min(height) * params.root_fraction;
            let center = Vec2::new(width / 2.0, height / 2.0);
            let offset = rng.range(0.0, TAU);
            (0..arms)
                .map(|arm| Bud {
                    start: center,
                    angle: offset + arm as f32 * TAU / arms as f32,
                    length,
                    width: (length * 0.15).max(1.0),
                    depth: 0,
                    side: false,
                })
                .collect()
        }
    }
}

fn sprout(
    params: &FractalParams,
    bud: &Bud,
    end: Vec2,
    rng: &mut SceneRng,
    queue: &mut VecDeque<Bud>,
) {
    let length = bud.length * params.decay;
    match params.layout {
        FractalLayout::Tree => {
            if length < params.min_length {
                return;
            }
            for side in [-1.0, 1.0] {
                let angle =
                    bud.angle + side * params.spread + rng.range(-params.jitter, params.jitter);
                queue.push_back(bud.child(end, angle, length, false));
            }
        }
        FractalLayout::Spiral { twist, .. } => {
            if length >= params.min_length {
                let angle = bud.angle + twist + rng.range(-params.jitter, params.jitter);
                queue.push_back(bud.child(end, angle, length, bud.side));
            }
            let shoot = length * SIDE_SHOOT_RATIO;
            if !bud.side && shoot >= params.min_length {
                let angle = bud.angle + twist + params.spread;
                queue.push_back(bud.child(end, angle, shoot, true));
            }
        }
    }
}

/// Grow, hold, regrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthPhase {
    Growing,
    Holding { frames_left: u32 },
}

/// A fractal that grows over `growth_frames`, holds, then regrows.
///
/// The full structure stays up for `hold_frames` updates, counting the one
/// that finishes growth; a hold of zero still shows it for that one update.
#[derive(Debug, Clone)]
pub struct FractalScene {
    params: FractalParams,
    growth_frames: u32,
    hold_frames: u32,
    skeleton: Skeleton,
    grown_frames: u32,
    phase: GrowthPhase,
    generation: u32,
    width: f32,
    height: f32,
}

impl FractalScene {
    pub fn new(params: FractalParams, growth_frames: u32, hold_frames: u32) -> Self {
        Self {
            params,
            growth_frames: growth_frames.max(1),
            hold_frames,
            skeleton: Skeleton::default(),
            grown_frames: 0,
            phase: GrowthPhase::Growing,
            generation: 0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn tree(tuning: &TreeTuning) -> Self {
        Self::new(
            FractalParams::tree(tuning),
            tuning.growth_frames,
            tuning.hold_frames,
        )
    }

    pub fn spiral(tuning: &SpiralTuning) -> Self {
        Self::new(
            FractalParams::spiral(tuning),
            tuning.growth_frames,
            tuning.hold_frames,
        )
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn phase(&self) -> GrowthPhase {
        self.phase
    }

    /// Completed regrowth cycles.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Branch-growth progress in 0.0-1.0.
    pub fn progress(&self) -> f32 {
        self.grown_frames as f32 / self.growth_frames as f32
    }

    /// Rebuild the skeleton for new canvas dimensions, keeping progress.
    pub fn resize(&mut self, width: f32, height: f32, rng: &mut SceneRng) {
        self.width = width;
        self.height = height;
        self.skeleton = Skeleton::build(&self.params, width, height, rng);
        log::debug!(
            "Fractal skeleton rebuilt: {} branches over {} levels",
            self.skeleton.branches().len(),
            self.skeleton.depth_count()
        );
    }

    pub fn update(&mut self, rng: &mut SceneRng) {
        match self.phase {
            GrowthPhase::Growing => {
                self.grown_frames = (self.grown_frames + 1).min(self.growth_frames);
                if self.grown_frames == self.growth_frames {
                    self.phase = GrowthPhase::Holding {
                        frames_left: self.hold_frames,
                    };
                }
            }
            GrowthPhase::Holding { frames_left } => match frames_left.saturating_sub(1) {
                0 => {
                    self.generation += 1;
                    self.grown_frames = 0;
                    self.phase = GrowthPhase::Growing;
                    self.skeleton = Skeleton::build(&self.params, self.width, self.height, rng);
                }
                frames_left => self.phase = GrowthPhase::Holding { frames_left },
            },
        }
    }

    pub fn draw(&self, surface: &mut dyn Surface, palette: Palette) {
        surface.clear(palette.background());
        let progress = self.progress();
        let levels = self.skeleton.depth_count().max(1) as f32;

        if self.params.layout == FractalLayout::Tree {
            let ground = palette.background().lerp(BARK, 0.35);
            surface.stroke_line(
                Vec2::new(0.0, self.height - 0.5),
                Vec2::new(self.width, self.height - 0.5),
                1.0,
                ground,
            );
        }

        for (index, (branch, end, growth)) in self.skeleton.grown(progress).enumerate() {
            let level = branch.depth as f32 / levels;
            let color = match self.params.layout {
                FractalLayout::Tree => BARK.lerp(palette.color(branch.depth as usize), level),
                FractalLayout::Spiral { .. } => {
                    let hue = self.generation as f32 * 47.0 + branch.depth as f32 * 22.0;
                    hsl_to_rgb(hue, 0.7, 0.45 + level * 0.2)
                }
            };
            surface.stroke_line(branch.start, end, branch.width, color);

            if branch.leaf && growth >= 1.0 {
                let leaf = palette.color(index).with_alpha(0.7);
                surface.fill_circle(end, 1.2, &Paint::Solid(leaf));
            }
        }
    }
}
