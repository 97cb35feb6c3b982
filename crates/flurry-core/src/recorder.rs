//! A surface that records draw calls instead of rasterizing them.

use glam::Vec2;

use crate::color::Rgba;
use crate::surface::{Blend, Paint, StateStack, Surface};

/// One recorded drawing operation, with geometry already in device space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rgba),
    Polygon {
        points: Vec<Vec2>,
        paint: Paint,
        blend: Blend,
    },
    Circle {
        center: Vec2,
        radius: f32,
        paint: Paint,
        blend: Blend,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
        blend: Blend,
    },
}

/// Surface that keeps a log of [`DrawCommand`]s.
#[derive(Debug, Clone)]
pub struct Recorder {
    width: f32,
    height: f32,
    state: StateStack,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            state: StateStack::default(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded line segments as `(from, to)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    /// Recorded circles as `(center, radius, blend)`.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Blend)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle {
                center,
                radius,
                blend,
                ..
            } => Some((*center, *radius, *blend)),
            _ => None,
        })
    }

    /// True once every `save` has been matched by a `restore`.
    pub fn is_balanced(&self) -> bool {
        self.state.depth() == 0
    }
}

impl Surface for Recorder {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self, color: Rgba) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn set_blend(&mut self, blend: Blend) {
        self.state.set_blend(blend);
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.state.translate(Vec2::new(dx, dy));
    }

    fn rotate(&mut self, radians: f32) {
        self.state.rotate(radians);
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        let points = points.iter().map(|p| self.state.apply(*p)).collect();
        self.commands.push(DrawCommand::Polygon {
            points,
            paint: paint.clone(),
            blend: self.state.current().blend,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Circle {
            center: self.state.apply(center),
            radius: radius * self.state.scale(),
            paint: paint.clone(),
            blend: self.state.current().blend,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::Line {
            from: self.state.apply(from),
            to: self.state.apply(to),
            width: width * self.state.scale(),
            color,
            blend: self.state.current().blend,
        });
    }
}
