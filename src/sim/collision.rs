//! Axis-aligned overlap tests
//!
//! Every game in the arcade resolves contacts with boxes: circles are tested
//! through their bounding square, racing cars through a lateral overlap plus
//! a depth window.

use glam::Vec2;

/// Axis-aligned box, `min` is the top-left corner (y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Box centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    /// Bounding square of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::centered(center, Vec2::splat(radius * 2.0))
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }

    /// Strict containment of a point
    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x > self.min.x && p.x < max.x && p.y > self.min.y && p.y < max.y
    }
}

/// Ball (circle) against a box, tested through the ball's bounding square
#[inline]
pub fn circle_hits_rect(center: Vec2, radius: f32, rect: &Aabb) -> bool {
    Aabb::around_circle(center, radius).overlaps(rect)
}

/// Ball against a paddle: the centre must lie inside the paddle's horizontal
/// span and the ball's vertical extent must overlap the paddle
pub fn ball_over_paddle(center: Vec2, radius: f32, paddle: &Aabb) -> bool {
    let max = paddle.max();
    center.x > paddle.min.x
        && center.x < max.x
        && center.y + radius > paddle.min.y
        && center.y - radius < max.y
}

/// Horizontal offset of a hit from the paddle centre, normalized to -1..=1
#[inline]
pub fn paddle_hit_offset(ball_x: f32, paddle_center_x: f32, paddle_width: f32) -> f32 {
    if paddle_width <= 0.0 {
        return 0.0;
    }
    ((ball_x - paddle_center_x) / (paddle_width / 2.0)).clamp(-1.0, 1.0)
}

/// Lateral overlap of two bodies of the given widths centred at `a` and `b`
#[inline]
pub fn lateral_overlap(a: f32, a_width: f32, b: f32, b_width: f32) -> bool {
    (a - b).abs() < (a_width + b_width) / 2.0
}

/// True when two depths are closer than `window`
#[inline]
pub fn within_depth(a: f32, b: f32, window: f32) -> bool {
    (a - b).abs() < window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Aabb::new(Vec2::new(9.0, 9.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_circle_vs_brick() {
        let brick = Aabb::new(Vec2::new(35.0, 80.0), Vec2::new(60.0, 25.0));
        // Ball just below the brick, within one radius
        assert!(circle_hits_rect(Vec2::new(60.0, 110.0), 8.0, &brick));
        assert!(!circle_hits_rect(Vec2::new(60.0, 114.0), 8.0, &brick));
    }

    #[test]
    fn test_ball_over_paddle_needs_center_inside_span() {
        let paddle = Aabb::new(Vec2::new(340.0, 560.0), Vec2::new(120.0, 15.0));
        assert!(ball_over_paddle(Vec2::new(400.0, 555.0), 8.0, &paddle));
        // Edge of the ball overlaps but centre is outside
        assert!(!ball_over_paddle(Vec2::new(336.0, 560.0), 8.0, &paddle));
        // Above the paddle
        assert!(!ball_over_paddle(Vec2::new(400.0, 540.0), 8.0, &paddle));
    }

    #[test]
    fn test_paddle_hit_offset_clamps() {
        assert_eq!(paddle_hit_offset(400.0, 400.0, 120.0), 0.0);
        assert_eq!(paddle_hit_offset(460.0, 400.0, 120.0), 1.0);
        assert_eq!(paddle_hit_offset(300.0, 400.0, 120.0), -1.0);
        assert!((paddle_hit_offset(430.0, 400.0, 120.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_lateral_and_depth() {
        assert!(lateral_overlap(0.0, 0.8, 0.5, 0.8));
        assert!(!lateral_overlap(0.0, 0.8, 0.8, 0.8));
        assert!(within_depth(1000.0, 1199.0, 200.0));
        assert!(!within_depth(1000.0, 1200.0, 200.0));
    }
}
