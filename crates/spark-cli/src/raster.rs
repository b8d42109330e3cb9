//! Software rasterizer implementing [`Surface`] over an RGBA image

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use spark_core::{Color, Vec2};
use spark_particles::{ColorStop, StopColor, Surface};
use std::path::Path;

/// Fallback when a color string is not a hex color
const FALLBACK_RGB: [u8; 3] = [255, 255, 255];

/// Parse `#RGB` or `#RRGGBB` (leading `#` optional)
pub fn parse_hex(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    let channel = |i: usize, width: usize| u8::from_str_radix(hex.get(i..i + width)?, 16).ok();
    match hex.len() {
        6 => Some([channel(0, 2)?, channel(2, 2)?, channel(4, 2)?]),
        3 => {
            let expand = |v: u8| v * 17;
            Some([
                expand(channel(0, 1)?),
                expand(channel(1, 1)?),
                expand(channel(2, 1)?),
            ])
        }
        _ => None,
    }
}

fn rgb_of(color: &Color) -> [u8; 3] {
    parse_hex(color.as_str()).unwrap_or_else(|| {
        tracing::debug!("unparseable color '{}', drawing white", color);
        FALLBACK_RGB
    })
}

/// Antialiasing coverage from signed distance to an edge (positive inside)
fn coverage(inside_by: f32) -> f32 {
    (inside_by + 0.5).clamp(0.0, 1.0)
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Premultiplied RGBA in [0, 1]
fn stop_rgba(stop: &ColorStop) -> [f32; 4] {
    match &stop.color {
        StopColor::Solid(color) => {
            let [r, g, b] = rgb_of(color);
            [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
        }
        StopColor::Transparent => [0.0; 4],
    }
}

/// Sample a gradient at `t`, interpolating in premultiplied space
fn sample_gradient(stops: &[ColorStop], t: f32) -> [f32; 4] {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0.0; 4];
    };
    if t <= first.offset {
        return stop_rgba(first);
    }
    if t >= last.offset {
        return stop_rgba(last);
    }
    for pair in stops.windows(2) {
        let (lo, hi) = (&pair[0], &pair[1]);
        if t >= lo.offset && t <= hi.offset {
            let span = hi.offset - lo.offset;
            let f = if span > 0.0 { (t - lo.offset) / span } else { 0.0 };
            let (a, b) = (stop_rgba(lo), stop_rgba(hi));
            return [
                lerp(a[0], b[0], f),
                lerp(a[1], b[1], f),
                lerp(a[2], b[2], f),
                lerp(a[3], b[3], f),
            ];
        }
    }
    stop_rgba(last)
}

/// RGBA image target; each frame's `clear` repaints the background
pub struct ImageSurface {
    image: RgbaImage,
    background: Rgba<u8>,
}

impl ImageSurface {
    /// Opaque black background, which suits additive-looking particle colors
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_background(width, height, Rgba([0, 0, 0, 255]))
    }

    pub fn with_background(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    #[cfg(test)]
    fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.image
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Pixel rows/columns overlapping `[min, max]`, clipped to the image
    fn pixel_span(&self, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 || max.x < 0.0 || max.y < 0.0 {
            return None;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil() as u32).min(w - 1);
        let y1 = (max.y.ceil() as u32).min(h - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    /// Source-over composite of `rgb` at opacity `alpha`
    fn blend(&mut self, x: u32, y: u32, rgb: [u8; 3], alpha: f32) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x, y);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = alpha + dst_a * (1.0 - alpha);
        if out_a <= 0.0 {
            *dst = Rgba([0, 0, 0, 0]);
            return;
        }
        for i in 0..3 {
            let s = rgb[i] as f32;
            let d = dst[i] as f32;
            let c = (s * alpha + d * dst_a * (1.0 - alpha)) / out_a;
            dst[i] = c.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round() as u8;
    }

    /// Visit pixel centers inside a bounding box
    fn for_each_pixel(&mut self, min: Vec2, max: Vec2, mut shade: impl FnMut(&mut Self, u32, u32, Vec2)) {
        let Some((x0, y0, x1, y1)) = self.pixel_span(min, max) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                shade(self, x, y, center);
            }
        }
    }
}

impl Surface for ImageSurface {
    fn size(&self) -> Vec2 {
        let (w, h) = self.image.dimensions();
        Vec2::new(w as f32, h as f32)
    }

    fn clear(&mut self) {
        let background = self.background;
        for pixel in self.image.pixels_mut() {
            *pixel = background;
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &Color, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let rgb = rgb_of(color);
        let reach = Vec2::new(radius + 1.0, radius + 1.0);
        self.for_each_pixel(center - reach, center + reach, |s, x, y, p| {
            let cov = coverage(radius - (p - center).length());
            s.blend(x, y, rgb, alpha * cov);
        });
    }

    fn fill_rect_rotated(
        &mut self,
        center: Vec2,
        width: f32,
        height: f32,
        angle: f32,
        color: &Color,
        alpha: f32,
    ) {
        let rgb = rgb_of(color);
        let (half_w, half_h) = (width / 2.0, height / 2.0);
        let reach = (half_w * half_w + half_h * half_h).sqrt() + 1.0;
        let (sin, cos) = (-angle).sin_cos();
        self.for_each_pixel(
            center - Vec2::new(reach, reach),
            center + Vec2::new(reach, reach),
            |s, x, y, p| {
                let d = p - center;
                let local = Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos);
                let inside = (half_w - local.x.abs()).min(half_h - local.y.abs());
                s.blend(x, y, rgb, alpha * coverage(inside));
            },
        );
    }

    fn stroke_path(&mut self, points: &[Vec2], color: &Color, alpha: f32, width: f32) {
        if points.len() < 2 || width <= 0.0 {
            return;
        }
        let rgb = rgb_of(color);
        let half = width / 2.0;
        let mut min = points[0];
        let mut max = points[0];
        for p in points {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        let pad = Vec2::new(half + 1.0, half + 1.0);
        // Nearest segment per pixel, so joints are not composited twice
        self.for_each_pixel(min - pad, max + pad, |s, x, y, p| {
            let nearest = points
                .windows(2)
                .map(|seg| distance_to_segment(p, seg[0], seg[1]))
                .fold(f32::INFINITY, f32::min);
            s.blend(x, y, rgb, alpha * coverage(half - nearest));
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop], alpha: f32) {
        if radius <= 0.0 || stops.is_empty() {
            return;
        }
        let reach = Vec2::new(radius + 1.0, radius + 1.0);
        self.for_each_pixel(center - reach, center + reach, |s, x, y, p| {
            let distance = (p - center).length();
            let [r, g, b, a] = sample_gradient(stops, distance / radius);
            if a <= 0.0 {
                return;
            }
            let rgb = [
                ((r / a) * 255.0).round() as u8,
                ((g / a) * 255.0).round() as u8,
                ((b / a) * 255.0).round() as u8,
            ];
            s.blend(x, y, rgb, alpha * a * coverage(radius - distance));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold() -> Color {
        Color::new("#FFD700")
    }

    #[test]
    fn parse_hex_colors() {
        assert_eq!(parse_hex("#FFD700"), Some([255, 215, 0]));
        assert_eq!(parse_hex("00ff88"), Some([0, 255, 136]));
        assert_eq!(parse_hex("#F0A"), Some([255, 0, 170]));
        assert_eq!(parse_hex("gold"), None);
        assert_eq!(parse_hex("#GG0000"), None);
    }

    #[test]
    fn circle_covers_center_only() {
        let mut surface = ImageSurface::new(20, 20);
        surface.fill_circle(Vec2::new(10.0, 10.0), 3.0, &gold(), 1.0);
        assert_eq!(surface.image().get_pixel(10, 10), &Rgba([255, 215, 0, 255]));
        assert_eq!(surface.image().get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
        assert_eq!(surface.image().get_pixel(10, 16), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn alpha_blends_over_background() {
        let mut surface = ImageSurface::new(10, 10);
        surface.fill_circle(Vec2::new(5.0, 5.0), 3.0, &Color::new("#FFFFFF"), 0.5);
        let px = surface.image().get_pixel(5, 5);
        assert!((126..=129).contains(&px[0]), "got {px:?}");
        assert_eq!(px[3], 255);
    }

    #[test]
    fn rotated_square_reaches_diagonal() {
        let center = Vec2::new(20.5, 20.5);
        let mut upright = ImageSurface::new(40, 40);
        upright.fill_rect_rotated(center, 10.0, 10.0, 0.0, &gold(), 1.0);
        // Just outside the upright square's right edge
        assert_eq!(upright.image().get_pixel(26, 20)[0], 0);

        let mut turned = ImageSurface::new(40, 40);
        turned.fill_rect_rotated(center, 10.0, 10.0, std::f32::consts::FRAC_PI_4, &gold(), 1.0);
        // A diamond's right tip sits 5·√2 ≈ 7.07 from the center
        assert_eq!(turned.image().get_pixel(26, 20)[0], 255);
        assert_eq!(turned.image().get_pixel(25, 25)[0], 0);
    }

    #[test]
    fn stroke_follows_path() {
        let mut surface = ImageSurface::new(30, 30);
        let points = [Vec2::new(2.0, 15.0), Vec2::new(28.0, 15.0)];
        surface.stroke_path(&points, &gold(), 1.0, 2.0);
        assert_eq!(surface.image().get_pixel(15, 14)[0], 255);
        assert_eq!(surface.image().get_pixel(15, 5)[0], 0);

        let mut untouched = ImageSurface::new(30, 30);
        untouched.stroke_path(&points[..1], &gold(), 1.0, 2.0);
        assert!(untouched.image().pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn glow_fades_toward_edge() {
        let mut surface = ImageSurface::new(40, 40);
        let stops = [
            ColorStop {
                offset: 0.0,
                color: StopColor::Solid(Color::new("#FFFFFF")),
            },
            ColorStop {
                offset: 1.0,
                color: StopColor::Transparent,
            },
        ];
        surface.fill_radial_gradient(Vec2::new(20.0, 20.0), 12.0, &stops, 1.0);
        let center = surface.image().get_pixel(20, 20)[0];
        let near_edge = surface.image().get_pixel(29, 20)[0];
        assert!(center > near_edge, "{center} <= {near_edge}");
        assert_eq!(surface.image().get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn clear_restores_background() {
        let mut surface = ImageSurface::with_background(8, 8, Rgba([0, 0, 0, 0]));
        surface.fill_circle(Vec2::new(4.0, 4.0), 3.0, &gold(), 1.0);
        surface.clear();
        assert!(surface.image().pixels().all(|p| *p == Rgba([0, 0, 0, 0])));
    }

    #[test]
    fn shapes_off_canvas_are_clipped() {
        let mut surface = ImageSurface::new(8, 8);
        surface.fill_circle(Vec2::new(-50.0, -50.0), 3.0, &gold(), 1.0);
        surface.fill_circle(Vec2::new(7.5, 7.5), 4.0, &gold(), 1.0);
        assert_eq!(surface.image().get_pixel(7, 7)[0], 255);
    }

    #[test]
    fn save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let surface = ImageSurface::new(4, 4);
        surface.save(&path).unwrap();
        assert!(path.exists());
    }
}
