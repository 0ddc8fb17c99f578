//! Backend-agnostic draw list
//!
//! Scenes and the effect layer push primitives here in pixel coordinates
//! (origin top-left, y down). The wgpu backend tessellates the list; text
//! runs are handed to the host page.

use glam::Vec2;

use super::color::Rgba;

/// Maximum screen shake displacement in pixels
pub const SHAKE_PIXELS: f32 = 8.0;

/// How a shape is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    /// Linear gradient between two points
    Linear {
        from: Vec2,
        to: Vec2,
        start: Rgba,
        end: Rgba,
    },
    /// Radial gradient from `center` out to `radius`
    Radial {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
}

impl Paint {
    /// Evaluate the paint at a point
    pub fn at(&self, p: Vec2) -> Rgba {
        match *self {
            Paint::Solid(c) => c,
            Paint::Linear {
                from,
                to,
                start,
                end,
            } => {
                let axis = to - from;
                let len_sq = axis.length_squared();
                if len_sq < f32::EPSILON {
                    return start;
                }
                let t = (p - from).dot(axis) / len_sq;
                start.lerp(end, t)
            }
            Paint::Radial {
                center,
                radius,
                inner,
                outer,
            } => {
                if radius <= 0.0 {
                    return outer;
                }
                inner.lerp(outer, (p - center).length() / radius)
            }
        }
    }

    fn translated(self, offset: Vec2) -> Self {
        match self {
            Paint::Solid(c) => Paint::Solid(c),
            Paint::Linear {
                from,
                to,
                start,
                end,
            } => Paint::Linear {
                from: from + offset,
                to: to + offset,
                start,
                end,
            },
            Paint::Radial {
                center,
                radius,
                inner,
                outer,
            } => Paint::Radial {
                center: center + offset,
                radius,
                inner,
                outer,
            },
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

/// Drawable primitives
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { min: Vec2, size: Vec2 },
    RectOutline { min: Vec2, size: Vec2, width: f32 },
    Circle { center: Vec2, radius: f32 },
    /// Convex polygon, vertices in order
    Polygon(Vec<Vec2>),
    Line { from: Vec2, to: Vec2, width: f32 },
    /// Stroked circular arc from `start` to `end` radians
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
    },
}

impl Shape {
    fn translated(self, o: Vec2) -> Self {
        match self {
            Shape::Rect { min, size } => Shape::Rect { min: min + o, size },
            Shape::RectOutline { min, size, width } => Shape::RectOutline {
                min: min + o,
                size,
                width,
            },
            Shape::Circle { center, radius } => Shape::Circle {
                center: center + o,
                radius,
            },
            Shape::Polygon(points) => Shape::Polygon(points.into_iter().map(|p| p + o).collect()),
            Shape::Line { from, to, width } => Shape::Line {
                from: from + o,
                to: to + o,
                width,
            },
            Shape::Arc {
                center,
                radius,
                start,
                end,
                width,
            } => Shape::Arc {
                center: center + o,
                radius,
                start,
                end,
                width,
            },
        }
    }
}

/// One draw command: shape + paint + opacity
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCmd {
    pub shape: Shape,
    pub paint: Paint,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// A run of text (rendered by the host page, not the GPU pipeline)
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub pos: Vec2,
    pub text: String,
    pub size: f32,
    pub color: Rgba,
    pub align: TextAlign,
}

/// Per-frame list of draw commands for one canvas
#[derive(Debug, Clone)]
pub struct DrawList {
    size: Vec2,
    background: Vec<DrawCmd>,
    commands: Vec<DrawCmd>,
    texts: Vec<TextRun>,
    offset: Vec2,
    alpha: f32,
    /// Survives `reset`; cleared when the player turns shake off
    allow_shake: bool,
}

impl DrawList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            background: Vec::new(),
            commands: Vec::new(),
            texts: Vec::new(),
            offset: Vec2::ZERO,
            alpha: 1.0,
            allow_shake: true,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Reset for a new frame, optionally resizing
    pub fn reset(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width, height);
        self.background.clear();
        self.commands.clear();
        self.texts.clear();
        self.offset = Vec2::ZERO;
        self.alpha = 1.0;
    }

    /// Translate subsequent commands (screen shake)
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    pub fn set_allow_shake(&mut self, allow: bool) {
        self.allow_shake = allow;
    }

    /// Offset subsequent commands by a jitter of up to `magnitude` (0..=1)
    /// times `SHAKE_PIXELS`. `phase` is any monotonically advancing clock.
    pub fn shake(&mut self, magnitude: f32, phase: f32) {
        if !self.allow_shake || magnitude <= 0.0 {
            self.offset = Vec2::ZERO;
            return;
        }
        let amount = magnitude.min(1.0) * SHAKE_PIXELS;
        self.offset = Vec2::new((phase * 50.0).sin(), (phase * 43.0).cos()) * amount;
    }

    /// Global alpha for subsequent commands
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn push(&mut self, shape: Shape, paint: impl Into<Paint>) {
        let cmd = self.make_cmd(shape, paint.into());
        self.commands.push(cmd);
    }

    /// Push into the background layer, drawn before every foreground command
    pub fn push_background(&mut self, shape: Shape, paint: impl Into<Paint>) {
        let cmd = self.make_cmd(shape, paint.into());
        self.background.push(cmd);
    }

    fn make_cmd(&self, shape: Shape, paint: Paint) -> DrawCmd {
        DrawCmd {
            shape: shape.translated(self.offset),
            paint: paint.translated(self.offset),
            alpha: self.alpha,
        }
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: impl Into<Paint>) {
        self.push(
            Shape::Rect {
                min: Vec2::new(x, y),
                size: Vec2::new(w, h),
            },
            paint,
        );
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, width: f32, color: Rgba) {
        self.push(
            Shape::RectOutline {
                min: Vec2::new(x, y),
                size: Vec2::new(w, h),
                width,
            },
            color,
        );
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, paint: impl Into<Paint>) {
        self.push(Shape::Circle { center, radius }, paint);
    }

    pub fn fill_polygon(&mut self, points: Vec<Vec2>, paint: impl Into<Paint>) {
        if points.len() >= 3 {
            self.push(Shape::Polygon(points), paint);
        }
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.push(Shape::Line { from, to, width }, color);
    }

    /// Dashed line (on/off lengths in pixels)
    pub fn dashed_line(&mut self, from: Vec2, to: Vec2, width: f32, dash: f32, color: Rgba) {
        let len = (to - from).length();
        if len < f32::EPSILON || dash <= 0.0 {
            return;
        }
        let dir = (to - from) / len;
        let mut t = 0.0;
        while t < len {
            let end = (t + dash).min(len);
            self.line(from + dir * t, from + dir * end, width, color);
            t += dash * 2.0;
        }
    }

    pub fn stroke_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: Rgba,
    ) {
        self.push(
            Shape::Arc {
                center,
                radius,
                start,
                end,
                width,
            },
            color,
        );
    }

    pub fn text(&mut self, x: f32, y: f32, text: impl Into<String>, size: f32, color: Rgba) {
        self.push_text(x, y, text, size, color, TextAlign::Left);
    }

    pub fn text_centered(&mut self, x: f32, y: f32, text: impl Into<String>, size: f32, color: Rgba) {
        self.push_text(x, y, text, size, color, TextAlign::Center);
    }

    fn push_text(
        &mut self,
        x: f32,
        y: f32,
        text: impl Into<String>,
        size: f32,
        color: Rgba,
        align: TextAlign,
    ) {
        self.texts.push(TextRun {
            pos: Vec2::new(x, y) + self.offset,
            text: text.into(),
            size,
            color: color.fade(self.alpha),
            align,
        });
    }

    /// All commands in paint order (background first)
    pub fn commands(&self) -> impl Iterator<Item = &DrawCmd> {
        self.background.iter().chain(self.commands.iter())
    }

    pub fn background(&self) -> &[DrawCmd] {
        &self.background
    }

    pub fn foreground(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_empty() && self.commands.is_empty() && self.texts.is_empty()
    }
}
