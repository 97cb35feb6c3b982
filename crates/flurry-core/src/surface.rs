//! Immediate-mode 2D drawing surface consumed by the scenes.

use glam::{Affine2, Vec2};

use crate::color::Rgba;

/// How a source colour is combined with what is already on the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Blend {
    /// Plain alpha compositing.
    #[default]
    SourceOver,
    /// Lightening blend: `1 - (1 - src) * (1 - dst)`.
    Screen,
}

/// One colour stop of a gradient; `offset` is in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Rgba,
}

impl ColorStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Fill style. Gradient geometry is in the same local coordinates as the
/// shape being filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Linear {
        from: Vec2,
        to: Vec2,
        stops: Vec<ColorStop>,
    },
    Radial {
        center: Vec2,
        radius: f32,
        stops: Vec<ColorStop>,
    },
}

impl Paint {
    /// Colour of this paint at a point in local coordinates.
    pub fn color_at(&self, point: Vec2) -> Rgba {
        match self {
            Paint::Solid(color) => *color,
            Paint::Linear { from, to, stops } => {
                let axis = *to - *from;
                let len_sq = axis.length_squared();
                let t = if len_sq <= f32::EPSILON {
                    0.0
                } else {
                    (point - *from).dot(axis) / len_sq
                };
                sample_stops(stops, t)
            }
            Paint::Radial {
                center,
                radius,
                stops,
            } => {
                let t = if *radius <= f32::EPSILON {
                    1.0
                } else {
                    point.distance(*center) / radius
                };
                sample_stops(stops, t)
            }
        }
    }

    /// True when every point yields the same colour.
    pub fn is_solid(&self) -> bool {
        matches!(self, Paint::Solid(_))
    }
}

/// Interpolate a colour from sorted gradient stops; `t` is clamped.
pub fn sample_stops(stops: &[ColorStop], t: f32) -> Rgba {
    let Some(first) = stops.first() else {
        return Rgba::rgba(0, 0, 0, 0.0);
    };
    let t = t.clamp(0.0, 1.0);
    if t <= first.offset {
        return first.color;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            let local = if span <= f32::EPSILON {
                1.0
            } else {
                (t - a.offset) / span
            };
            return a.color.lerp(b.color, local);
        }
    }
    stops[stops.len() - 1].color
}

/// Transform and compositing state saved by [`Surface::save`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub transform: Affine2,
    pub blend: Blend,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            blend: Blend::SourceOver,
        }
    }
}

/// Save/restore stack shared by surface implementations.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Pop the last saved state. An unbalanced restore is ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn translate(&mut self, offset: Vec2) {
        self.current.transform = self.current.transform * Affine2::from_translation(offset);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.current.transform = self.current.transform * Affine2::from_angle(radians);
    }

    pub fn set_blend(&mut self, blend: Blend) {
        self.current.blend = blend;
    }

    /// Map a local point to device space.
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.current.transform.transform_point2(point)
    }

    /// Uniform scale of the current transform, used for radii and widths.
    pub fn scale(&self) -> f32 {
        self.current.transform.matrix2.x_axis.length()
    }

    /// Number of outstanding saves.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Drop all saved states and return to identity.
    pub fn reset(&mut self) {
        self.current = DrawState::default();
        self.saved.clear();
    }
}

/// 2D immediate-mode drawing context.
///
/// Coordinates are pixels with the origin at the top-left corner. Every
/// shape is affected by the current transform and blend mode.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Overwrite every pixel with an opaque colour, ignoring transform and blend.
    fn clear(&mut self, color: Rgba);

    fn set_blend(&mut self, blend: Blend);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint);
    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint);
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        let corners = [
            Vec2::new(x, y),
            Vec2::new(x + w, y),
            Vec2::new(x + w, y + h),
            Vec2::new(x, y + h),
        ];
        self.fill_polygon(&corners, paint);
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_sample_stops_clamps_and_interpolates() {
        let stops = [
            ColorStop::new(0.0, Rgba::rgba(0, 0, 0, 1.0)),
            ColorStop::new(0.5, Rgba::rgba(100, 100, 100, 0.5)),
            ColorStop::new(1.0, Rgba::rgba(200, 200, 200, 0.0)),
        ];
        assert_eq!(sample_stops(&stops, -1.0), stops[0].color);
        assert_eq!(sample_stops(&stops, 2.0), stops[2].color);
        assert_eq!(sample_stops(&stops, 0.5), stops[1].color);
        let quarter = sample_stops(&stops, 0.25);
        assert_eq!(quarter.r, 50);
        assert!((quarter.a - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_radial_paint_fades_outward() {
        let paint = Paint::Radial {
            center: Vec2::ZERO,
            radius: 10.0,
            stops: vec![
                ColorStop::new(0.0, Rgba::rgba(255, 255, 255, 0.4)),
                ColorStop::new(1.0, Rgba::rgba(255, 255, 255, 0.0)),
            ],
        };
        let inner = paint.color_at(Vec2::new(1.0, 0.0)).a;
        let outer = paint.color_at(Vec2::new(9.0, 0.0)).a;
        assert!(inner > outer);
        assert_eq!(paint.color_at(Vec2::new(20.0, 0.0)).a, 0.0);
    }

    #[test]
    fn test_state_stack_save_restore() {
        let mut stack = StateStack::default();
        stack.save();
        stack.translate(Vec2::new(10.0, 5.0));
        stack.rotate(FRAC_PI_2);
        stack.set_blend(Blend::Screen);
        let p = stack.apply(Vec2::new(1.0, 0.0));
        assert!((p - Vec2::new(10.0, 6.0)).length() < 1e-5);
        stack.restore();
        assert_eq!(stack.current(), &DrawState::default());
        // Extra restore is harmless
        stack.restore();
        assert_eq!(stack.current(), &DrawState::default());
    }
}
