//! Procedural hills and parallax decorations for the sled scene.

use flurry_core::{Paint, Rgba, SceneRng, Surface, Vec2};

/// Snow surface line as a fraction of canvas height.
const BASE_LINE: f32 = 0.65;

/// Height of the snow surface at `world_x`, for a canvas `height` pixels tall.
///
/// A pure sum of sines, so it is continuous and the same `world_x` always
/// yields the same height.
pub fn terrain_height(world_x: f32, height: f32) -> f32 {
    height * BASE_LINE
        + (world_x * 0.012).sin() * height * 0.08
        + (world_x * 0.031 + 1.3).sin() * height * 0.03
        + (world_x * 0.004).cos() * height * 0.05
}

/// Angle of the surface at `world_x` in radians; positive means downhill.
pub fn terrain_slope(world_x: f32, height: f32) -> f32 {
    let dy = terrain_height(world_x + 1.0, height) - terrain_height(world_x - 1.0, height);
    (dy / 2.0).atan()
}

/// One terrain point in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSample {
    pub x: f32,
    pub y: f32,
}

/// Sample the visible terrain every `step` pixels.
///
/// Always returns `ceil(width / step) + 1` samples so the last one reaches
/// the right edge.
pub fn sample_terrain(scroll: f32, width: f32, height: f32, step: f32) -> Vec<TerrainSample> {
    let count = (width / step).ceil().max(0.0) as usize + 1;
    (0..count)
        .map(|i| {
            let x = i as f32 * step;
            TerrainSample {
                x,
                y: terrain_height(scroll + x, height),
            }
        })
        .collect()
}

/// Wrap `x` into `[-margin, span - margin)`.
fn parallax_x(x: f32, scroll: f32, factor: f32, span: f32, margin: f32) -> f32 {
    (x - scroll * factor).rem_euclid(span) - margin
}

/// A triangular mountain in one parallax layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mountain {
    pub x: f32,
    pub base_width: f32,
    pub peak: f32,
}

/// A pine tree standing on the far slope.
#[derive(Debug, Clone, PartialEq)]
pub struct PineTree {
    pub x: f32,
    pub height: f32,
}

/// A set of decorations scrolling at a fraction of the foreground speed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxLayer<T> {
    pub items: Vec<T>,
    /// Scroll multiplier (0 = static, 1 = moves with the terrain).
    pub factor: f32,
    /// Wrap period in pixels.
    pub span: f32,
    pub margin: f32,
}

impl<T> Default for ParallaxLayer<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            factor: 0.0,
            span: 0.0,
            margin: 0.0,
        }
    }
}

impl<T> ParallaxLayer<T> {
    /// Screen x of an item at the given scroll offset.
    pub fn screen_x(&self, x: f32, scroll: f32) -> f32 {
        parallax_x(x, scroll, self.factor, self.span, self.margin)
    }
}

/// Static background layout regenerated on resize.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Backdrop {
    pub far: ParallaxLayer<Mountain>,
    pub near: ParallaxLayer<Mountain>,
    pub trees: ParallaxLayer<PineTree>,
}

impl Backdrop {
    pub fn generate(width: f32, height: f32, rng: &mut SceneRng) -> Self {
        let margin = (width * 0.25).max(8.0);
        let span = width + margin * 2.0;
        let mountains = |spacing: f32, peak: (f32, f32), rng: &mut SceneRng| {
            let count = (span / spacing).ceil() as usize;
            (0..count)
                .map(|i| Mountain {
                    x: i as f32 * spacing + rng.range(0.0, spacing * 0.5),
                    base_width: spacing * rng.range(1.4, 2.2),
                    peak: height * rng.range(peak.0, peak.1),
                })
                .collect::<Vec<_>>()
        };

        let far = ParallaxLayer {
            items: mountains(width / 5.0 + 4.0, (0.25, 0.4), rng),
            factor: 0.15,
            span,
            margin,
        };
        let near = ParallaxLayer {
            items: mountains(width / 7.0 + 3.0, (0.15, 0.28), rng),
            factor: 0.35,
            span,
            margin,
        };
        let tree_spacing = width / 14.0 + 2.0;
        let tree_count = (span / tree_spacing).ceil() as usize;
        let trees = ParallaxLayer {
            items: (0..tree_count)
                .map(|i| PineTree {
                    x: i as f32 * tree_spacing + rng.range(0.0, tree_spacing * 0.6),
                    height: height * rng.range(0.06, 0.12),
                })
                .collect(),
            factor: 0.6,
            span,
            margin,
        };

        Self { far, near, trees }
    }

    pub fn draw(&self, surface: &mut dyn Surface, scroll: f32) {
        let height = surface.height();
        let horizon = height * 0.62;

        draw_mountains(surface, &self.far, scroll, horizon, Rgba::rgb(58, 74, 110));
        draw_mountains(
            surface,
            &self.near,
            scroll,
            horizon + height * 0.04,
            Rgba::rgb(78, 98, 138),
        );

        let trunk = Rgba::rgb(40, 52, 48);
        let needles = Paint::Solid(Rgba::rgb(30, 84, 68));
        let ground = horizon + height * 0.05;
        for tree in &self.trees.items {
            let x = self.trees.screen_x(tree.x, scroll);
            let top = Vec2::new(x, ground - tree.height);
            let half = tree.height * 0.35;
            let skirt = ground - tree.height * 0.2;
            surface.stroke_line(Vec2::new(x, ground), Vec2::new(x, skirt), 1.0, trunk);
            surface.fill_polygon(
                &[
                    top,
                    Vec2::new(x + half, skirt),
                    Vec2::new(x - half, skirt),
                ],
                &needles,
            );
        }
    }
}

fn draw_mountains(
    surface: &mut dyn Surface,
    layer: &ParallaxLayer<Mountain>,
    scroll: f32,
    base: f32,
    color: Rgba,
) {
    let rock = Paint::Solid(color);
    let cap = Paint::Solid(Rgba::rgb(226, 232, 240));
    for mountain in &layer.items {
        let x = layer.screen_x(mountain.x, scroll);
        let half = mountain.base_width / 2.0;
        let peak = Vec2::new(x, base - mountain.peak);
        surface.fill_polygon(
            &[peak, Vec2::new(x + half, base), Vec2::new(x - half, base)],
            &rock,
        );
        // Snow cap covers the top fifth
        let t = 0.2;
        surface.fill_polygon(
            &[
                peak,
                peak.lerp(Vec2::new(x + half, base), t),
                peak.lerp(Vec2::new(x - half, base), t),
            ],
            &cap,
        );
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_terrain_is_deterministic() {
        for x in [0.0, 12.5, 1000.0, -333.3] {
            assert_eq!(terrain_height(x, 90.0), terrain_height(x, 90.0));
        }
    }

    #[test]
    fn test_terrain_stays_on_canvas() {
        let h = 90.0;
        for i in 0..10_000 {
            let y = terrain_height(i as f32 * 0.7, h);
            assert!(y > h * 0.4 && y < h * 0.9, "terrain at {y} leaves the band");
        }
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(sample_terrain(0.0, 160.0, 90.0, 2.0).len(), 81);
        assert_eq!(sample_terrain(37.0, 161.0, 90.0, 2.0).len(), 82);
        let samples = sample_terrain(50.0, 10.0, 90.0, 5.0);
        assert_eq!(samples[1].x, 5.0);
        assert_eq!(samples[1].y, terrain_height(55.0, 90.0));
    }

    #[test]
    fn test_slope_sign_matches_height_change() {
        let h = 90.0;
        for i in 0..500 {
            let x = i as f32 * 3.0;
            let rising = terrain_height(x + 1.0, h) > terrain_height(x - 1.0, h);
            let slope = terrain_slope(x, h);
            if slope.abs() > 1e-3 {
                assert_eq!(slope > 0.0, rising);
            }
        }
    }

    #[test]
    fn test_parallax_wraps_into_span() {
        let mut rng = SceneRng::new(9);
        let backdrop = Backdrop::generate(160.0, 90.0, &mut rng);
        for scroll in [0.0, 55.0, 10_000.0] {
            for m in &backdrop.far.items {
                let x = backdrop.far.screen_x(m.x, scroll);
                assert!(x >= -backdrop.far.margin && x <= backdrop.far.span - backdrop.far.margin);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_terrain_is_continuous(x in -10_000.0f32..10_000.0, h in 20.0f32..400.0) {
            let eps = 1e-3;
            // Derivative is bounded by the sum of amplitude * frequency terms
            let bound = h * (0.08 * 0.012 + 0.03 * 0.031 + 0.05 * 0.004) * eps * 2.0 + 1e-3;
            prop_assert!((terrain_height(x + eps, h) - terrain_height(x, h)).abs() <= bound);
        }
    }
}
