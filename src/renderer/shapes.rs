//! Shape tessellation for 2D primitives
//!
//! Every command becomes a triangle list in pixel space. Paint is evaluated
//! per vertex, so linear gradients are exact and radial gradients are exact
//! on circles (centre vertex + rim vertices).

use glam::Vec2;
use std::f32::consts::TAU;

use super::draw::{DrawCmd, DrawList, Paint, Shape};
use super::vertex::Vertex;

/// Tessellate a whole list in paint order
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(list.foreground().len() * 6);
    for cmd in list.commands() {
        tessellate_cmd(cmd, &mut vertices);
    }
    vertices
}

/// Tessellate a single command, appending to `out`
pub fn tessellate_cmd(cmd: &DrawCmd, out: &mut Vec<Vertex>) {
    if cmd.alpha <= 0.0 {
        return;
    }
    let paint = &cmd.paint;
    let alpha = cmd.alpha;
    match &cmd.shape {
        Shape::Rect { min, size } => rect(*min, *size, paint, alpha, out),
        Shape::RectOutline { min, size, width } => rect_outline(*min, *size, *width, paint, alpha, out),
        Shape::Circle { center, radius } => circle(*center, *radius, paint, alpha, out),
        Shape::Polygon(points) => polygon(points, paint, alpha, out),
        Shape::Line { from, to, width } => line(*from, *to, *width, paint, alpha, out),
        Shape::Arc {
            center,
            radius,
            start,
            end,
            width,
        } => arc(*center, *radius, *start, *end, *width, paint, alpha, out),
    }
}

#[inline]
fn vert(p: Vec2, paint: &Paint, alpha: f32) -> Vertex {
    Vertex::at(p, paint.at(p).fade(alpha))
}

fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, paint: &Paint, alpha: f32, out: &mut Vec<Vertex>) {
    // a-b-c-d in order around the quad
    out.push(vert(a, paint, alpha));
    out.push(vert(b, paint, alpha));
    out.push(vert(c, paint, alpha));

    out.push(vert(a, paint, alpha));
    out.push(vert(c, paint, alpha));
    out.push(vert(d, paint, alpha));
}

fn rect(min: Vec2, size: Vec2, paint: &Paint, alpha: f32, out: &mut Vec<Vertex>) {
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }
    let max = min + size;
    quad(
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
        paint,
        alpha,
        out,
    );
}

fn rect_outline(min: Vec2, size: Vec2, width: f32, paint: &Paint, alpha: f32, out: &mut Vec<Vertex>) {
    let half = width / 2.0;
    let max = min + size;
    // Top, bottom, left, right bands centred on the edges
    rect(Vec2::new(min.x - half, min.y - half), Vec2::new(size.x + width, width), paint, alpha, out);
    rect(Vec2::new(min.x - half, max.y - half), Vec2::new(size.x + width, width), paint, alpha, out);
    rect(Vec2::new(min.x - half, min.y + half), Vec2::new(width, size.y - width), paint, alpha, out);
    rect(Vec2::new(max.x - half, min.y + half), Vec2::new(width, size.y - width), paint, alpha, out);
}

/// Segment count scaled with radius
fn segments_for(radius: f32) -> u32 {
    ((radius * 0.75) as u32).clamp(12, 64)
}

fn circle(center: Vec2, radius: f32, paint: &Paint, alpha: f32, out: &mut Vec<Vertex>) {
    if radius <= 0.0 {
        return;
    }
    let segments = segments_for(radius);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * TAU;
        let theta2 = ((i + 1) as f32 / segments as f32) * TAU;

        // Triangle from center to edge
        out.push(vert(center, paint, alpha));
        out.push(vert(center + Vec2::from_angle(theta1) * radius, paint, alpha));
        out.push(vert(center + Vec2::from_angle(theta2) * radius, paint, alpha));
    }
}

fn polygon(points: &[Vec2], paint: &Paint, alpha: f32, out: &mut Vec<Vertex>) {
    if points.len() < 3 {
        return;
    }
    // Fan from the first vertex (convex polygons only)
    for i in 1..points.len() - 1 {
        out.push(vert(points[0], paint, alpha));
        out.push(vert(points[i], paint, alpha));
        out.push(vert(points[i + 1], paint, alpha));
    }
}

fn line(from: Vec2, to: Vec2, width: f32, paint: &Paint, alpha: f32, out: &mut Vec<Vertex>) {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    // Perpendicular for width
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(from + perp, to + perp, to - perp, from - perp, paint, alpha, out);
}

#[allow(clippy::too_many_arguments)]
fn arc(
    center: Vec2,
    radius: f32,
    start: f32,
    end: f32,
    width: f32,
    paint: &Paint,
    alpha: f32,
    out: &mut Vec<Vertex>,
) {
    let span = end - start;
    if span.abs() < f32::EPSILON || radius <= 0.0 {
        return;
    }
    let num_segments = ((span.abs() / TAU) * segments_for(radius) as f32).ceil().max(4.0) as u32;
    let inner_r = (radius - width / 2.0).max(0.0);
    let outer_r = radius + width / 2.0;

    for i in 0..num_segments {
        let t1 = i as f32 / num_segments as f32;
        let t2 = (i + 1) as f32 / num_segments as f32;

        let d1 = Vec2::from_angle(start + t1 * span);
        let d2 = Vec2::from_angle(start + t2 * span);

        // Two triangles per segment
        quad(
            center + d1 * inner_r,
            center + d1 * outer_r,
            center + d2 * outer_r,
            center + d2 * inner_r,
            paint,
            alpha,
            out,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::color::Rgba;

    #[test]
    fn test_rect_is_two_triangles() {
        let mut list = DrawList::new(100.0, 100.0);
        list.fill_rect(10.0, 10.0, 20.0, 5.0, Rgba::WHITE);
        let verts = tessellate(&list);
        assert_eq!(verts.len(), 6);
        assert!(verts.iter().all(|v| v.position[0] >= 10.0 && v.position[0] <= 30.0));
    }

    #[test]
    fn test_degenerate_shapes_emit_nothing() {
        let mut list = DrawList::new(100.0, 100.0);
        list.fill_rect(0.0, 0.0, 0.0, 10.0, Rgba::WHITE);
        list.fill_circle(Vec2::ZERO, 0.0, Rgba::WHITE);
        list.line(Vec2::ONE, Vec2::ONE, 2.0, Rgba::WHITE);
        assert!(tessellate(&list).is_empty());
    }

    #[test]
    fn test_alpha_applied_per_vertex() {
        let mut list = DrawList::new(100.0, 100.0);
        list.set_alpha(0.5);
        list.fill_circle(Vec2::new(50.0, 50.0), 10.0, Rgba::WHITE);
        let verts = tessellate(&list);
        assert!(!verts.is_empty());
        assert!(verts.iter().all(|v| (v.color[3] - 0.5).abs() < 1e-6));
    }

    #[test]
    fn test_radial_circle_center_uses_inner_color() {
        let mut list = DrawList::new(100.0, 100.0);
        let c = Vec2::new(50.0, 50.0);
        list.fill_circle(
            c,
            20.0,
            Paint::Radial {
                center: c,
                radius: 20.0,
                inner: Rgba::WHITE,
                outer: Rgba::TRANSPARENT,
            },
        );
        let verts = tessellate(&list);
        assert_eq!(verts[0].color, Rgba::WHITE.0);
        assert!(verts[1].color[3] < 0.01);
    }
}
