//! Software raster surface presented as half-block terminal cells.

use flurry_core::{Affine2, Blend, Paint, Rgba, StateStack, Surface, Vec2};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: &str = "▀";

/// Minimum radius a stroke or circle covers, so thin features stay visible.
const MIN_COVER_RADIUS: f32 = 0.5;

/// Pixel buffer implementing [`Surface`].
///
/// Channels are stored as `f32` in 0.0-1.0 so repeated translucent fades
/// converge to the backdrop instead of stalling on 8-bit rounding.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
    state: StateStack,
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 3]; width * height],
            state: StateStack::default(),
        }
    }

    /// Reallocate for new dimensions; contents become black.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![[0.0; 3]; width * height];
        self.state.reset();
    }

    pub fn pixel_width(&self) -> usize {
        self.width
    }

    pub fn pixel_height(&self) -> usize {
        self.height
    }

    /// Colour of one pixel, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[y * self.width + x];
        Some(Rgba::rgb(to_byte(r), to_byte(g), to_byte(b)))
    }

    /// Convert to terminal lines, two pixel rows per line.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        (0..self.height.div_ceil(2))
            .map(|row| {
                let top = row * 2;
                let bottom = (top + 1).min(self.height - 1);
                let spans: Vec<Span> = (0..self.width)
                    .map(|x| {
                        let fg = self.cell_color(x, top);
                        let bg = self.cell_color(x, bottom);
                        Span::styled(HALF_BLOCK, Style::new().fg(fg).bg(bg))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    fn cell_color(&self, x: usize, y: usize) -> Color {
        self.pixel(x, y)
            .map(Rgba::to_color)
            .unwrap_or(Color::Reset)
    }

    /// Composite `color` onto the pixel at `(x, y)` with the current blend.
    fn blend_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if color.a <= 0.0 {
            return;
        }
        let blend = self.state.current().blend;
        let dst = &mut self.pixels[y * self.width + x];
        let src = [
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
        ];
        let alpha = color.a.min(1.0);
        for channel in 0..3 {
            let d = dst[channel];
            let s = match blend {
                Blend::SourceOver => src[channel],
                Blend::Screen => 1.0 - (1.0 - src[channel]) * (1.0 - d),
            };
            dst[channel] = d + (s - d) * alpha;
        }
    }

    /// Pixel bounds of a device-space box, clipped to the buffer.
    fn clip(&self, min: Vec2, max: Vec2) -> Option<(usize, usize, usize, usize)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(self.width as f32 - 1.0);
        let y1 = max.y.ceil().min(self.height as f32 - 1.0);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    /// Inverse of the current transform, needed only to sample gradients.
    fn paint_space(&self, paint: &Paint) -> Option<Affine2> {
        (!paint.is_solid()).then(|| self.state.current().transform.inverse())
    }
}

/// Paint colour for a device pixel centre.
fn paint_at(paint: &Paint, inverse: Option<Affine2>, device: Vec2) -> Rgba {
    match inverse {
        Some(inverse) => paint.color_at(inverse.transform_point2(device)),
        None => paint.color_at(device),
    }
}

fn to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Distance from `p` to the segment `a..b`.
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl Surface for Raster {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn clear(&mut self, color: Rgba) {
        let fill = [
            color.r as f32 / 255.0,
            color.g as f32 / 255.0,
            color.b as f32 / 255.0,
        ];
        self.pixels.fill(fill);
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

    /// Even-odd scanline fill sampled at pixel centres.
    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let device: Vec<Vec2> = points.iter().map(|p| self.state.apply(*p)).collect();
        let (min, max) = device
            .iter()
            .fold((device[0], device[0]), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let Some((x0, y0, x1, y1)) = self.clip(min, max) else {
            return;
        };

        let inverse = self.paint_space(paint);
        let mut crossings: Vec<f32> = Vec::with_capacity(device.len());
        for y in y0..=y1 {
            let cy = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in device.iter().enumerate() {
                let b = device[(i + 1) % device.len()];
                if (a.y <= cy && b.y > cy) || (b.y <= cy && a.y > cy) {
                    let t = (cy - a.y) / (b.y - a.y);
                    crossings.push(a.x + (b.x - a.x) * t);
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                for x in x0..=x1 {
                    let cx = x as f32 + 0.5;
                    if cx >= span[0] && cx < span[1] {
                        let color = paint_at(paint, inverse, Vec2::new(cx, cy));
                        self.blend_pixel(x, y, color);
                    }
                }
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, paint: &Paint) {
        let center = self.state.apply(center);
        let radius = (radius * self.state.scale()).max(MIN_COVER_RADIUS);
        let reach = Vec2::splat(radius);
        let Some((x0, y0, x1, y1)) = self.clip(center - reach, center + reach) else {
            return;
        };
        let inverse = self.paint_space(paint);
        let mut hit = false;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.distance(center) <= radius {
                    let color = paint_at(paint, inverse, p);
                    self.blend_pixel(x, y, color);
                    hit = true;
                }
            }
        }
        // Sub-pixel dots land on the pixel that contains their centre.
        if !hit && center.x >= 0.0 && center.y >= 0.0 {
            let (x, y) = (center.x as usize, center.y as usize);
            if x < self.width && y < self.height {
                let color = paint_at(paint, inverse, center);
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let a = self.state.apply(from);
        let b = self.state.apply(to);
        let half = (width * self.state.scale() / 2.0).max(MIN_COVER_RADIUS);
        let reach = Vec2::splat(half);
        let Some((x0, y0, x1, y1)) = self.clip(a.min(b) - reach, a.max(b) + reach) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if segment_distance(p, a, b) <= half {
                    self.blend_pixel(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use flurry_core::ColorStop;

    use super::*;

    #[test]
    fn test_clear_and_fill_rect() {
        let mut raster = Raster::new(8, 6);
        raster.clear(Rgba::rgb(10, 20, 30));
        raster.fill_rect(2.0, 2.0, 3.0, 2.0, &Paint::Solid(Rgba::rgb(255, 0, 0)));
        assert_eq!(raster.pixel(3, 3), Some(Rgba::rgb(255, 0, 0)));
        assert_eq!(raster.pixel(0, 0), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(raster.pixel(5, 3), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(raster.pixel(8, 0), None);
    }

    #[test]
    fn test_translucent_fade_converges_to_backdrop() {
        let mut raster = Raster::new(2, 2);
        raster.clear(Rgba::rgb(255, 255, 255));
        let wash = Paint::Solid(Rgba::rgba(13, 17, 23, 0.08));
        for _ in 0..400 {
            raster.fill_rect(0.0, 0.0, 2.0, 2.0, &wash);
        }
        assert_eq!(raster.pixel(1, 1), Some(Rgba::rgb(13, 17, 23)));
    }

    #[test]
    fn test_screen_blend_only_lightens() {
        let mut raster = Raster::new(4, 4);
        raster.clear(Rgba::rgb(100, 100, 100));
        raster.set_blend(Blend::Screen);
        raster.fill_rect(0.0, 0.0, 4.0, 4.0, &Paint::Solid(Rgba::rgb(0, 50, 200)));
        let px = raster.pixel(1, 1).unwrap();
        assert_eq!(px.r, 100);
        assert!(px.g > 100 && px.b > 200);
    }

    #[test]
    fn test_rotated_rect_follows_transform() {
        let mut raster = Raster::new(20, 20);
        raster.save();
        raster.translate(10.0, 10.0);
        raster.rotate(std::f32::consts::FRAC_PI_2);
        // Local +x now points down the screen
        raster.fill_rect(0.0, -1.0, 6.0, 2.0, &Paint::Solid(Rgba::rgb(255, 255, 255)));
        raster.restore();
        assert_eq!(raster.pixel(10, 14), Some(Rgba::rgb(255, 255, 255)));
        assert_eq!(raster.pixel(14, 10), Some(Rgba::rgb(0, 0, 0)));
    }

    #[test]
    fn test_radial_circle_is_brightest_at_centre() {
        let mut raster = Raster::new(21, 21);
        let center = Vec2::new(10.5, 10.5);
        let paint = Paint::Radial {
            center,
            radius: 10.0,
            stops: vec![
                ColorStop::new(0.0, Rgba::rgba(0, 255, 0, 1.0)),
                ColorStop::new(1.0, Rgba::rgba(0, 255, 0, 0.0)),
            ],
        };
        raster.fill_circle(center, 10.0, &paint);
        let middle = raster.pixel(10, 10).unwrap().g;
        let edge = raster.pixel(10, 2).unwrap().g;
        assert!(middle > edge);
        assert_eq!(raster.pixel(0, 0).unwrap().g, 0);
    }

    #[test]
    fn test_lines_use_half_blocks() {
        let mut raster = Raster::new(3, 3);
        raster.clear(Rgba::rgb(1, 2, 3));
        let lines = raster.to_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[0].spans[0].content, HALF_BLOCK);
        assert_eq!(lines[1].spans[0].style.bg, Some(Color::Rgb(1, 2, 3)));
    }
}
