//! The 2D drawing target the renderer paints onto

use spark_core::{Color, Vec2};

/// Color at one gradient stop
#[derive(Debug, Clone, PartialEq)]
pub enum StopColor {
    Solid(Color),
    Transparent,
}

/// One stop of a radial gradient; `offset` runs 0 (center) → 1 (edge)
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    pub offset: f32,
    pub color: StopColor,
}

/// Drawing operations a host surface provides.
///
/// All `alpha` arguments are global opacity in [0, 1] applied on top of the
/// color. Coordinates are in surface pixels.
pub trait Surface {
    /// Current pixel dimensions
    fn size(&self) -> Vec2;

    /// Erase the whole surface
    fn clear(&mut self);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &Color, alpha: f32);

    /// Filled `width × height` rectangle centered on `center`, rotated by `angle` radians
    fn fill_rect_rotated(
        &mut self,
        center: Vec2,
        width: f32,
        height: f32,
        angle: f32,
        color: &Color,
        alpha: f32,
    );

    /// Stroke a connected polyline through `points`
    fn stroke_path(&mut self, points: &[Vec2], color: &Color, alpha: f32, width: f32);

    /// Fill a disc of `radius` with a radial gradient
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop], alpha: f32);
}

/// A captured draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    RotatedRect {
        center: Vec2,
        width: f32,
        height: f32,
        angle: f32,
        color: Color,
        alpha: f32,
    },
    Path {
        points: Vec<Vec2>,
        color: Color,
        alpha: f32,
        width: f32,
    },
    RadialGradient {
        center: Vec2,
        radius: f32,
        stops: Vec<ColorStop>,
        alpha: f32,
    },
}

/// Surface that records draw calls instead of rasterizing them.
///
/// `clear` drops the commands of the previous frame, so after a frame the
/// recording holds exactly what that frame drew.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: f32,
    pub height: f32,
    pub commands: Vec<DrawCommand>,
    /// Number of `clear` calls so far
    pub clears: usize,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &Color, alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color: color.clone(),
            alpha,
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
        self.commands.push(DrawCommand::RotatedRect {
            center,
            width,
            height,
            angle,
            color: color.clone(),
            alpha,
        });
    }

    fn stroke_path(&mut self, points: &[Vec2], color: &Color, alpha: f32, width: f32) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            color: color.clone(),
            alpha,
            width,
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[ColorStop], alpha: f32) {
        self.commands.push(DrawCommand::RadialGradient {
            center,
            radius,
            stops: stops.to_vec(),
            alpha,
        });
    }
}
