//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::Vertex;

/// Multiply a color's alpha
pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * alpha.clamp(0.0, 1.0)]
}

/// Append an axis-aligned filled rectangle (two triangles)
pub fn rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, color: [f32; 4]) {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);

    out.push(Vertex::new(x0, y0, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x0, y1, color));

    out.push(Vertex::new(x0, y1, color));
    out.push(Vertex::new(x1, y0, color));
    out.push(Vertex::new(x1, y1, color));
}

/// Append a square centered on `center`
pub fn centered_square(out: &mut Vec<Vertex>, center: Vec2, edge: f32, color: [f32; 4]) {
    let half = Vec2::splat(edge * 0.5);
    rect(out, center - half, half * 2.0, color);
}

/// Append a hollow rectangle of the given border thickness
pub fn rect_outline(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) {
    let t = thickness.min(size.x * 0.5).min(size.y * 0.5);
    // Top, bottom, left, right
    rect(out, pos, Vec2::new(size.x, t), color);
    rect(out, Vec2::new(pos.x, pos.y + size.y - t), Vec2::new(size.x, t), color);
    rect(out, Vec2::new(pos.x, pos.y + t), Vec2::new(t, size.y - 2.0 * t), color);
    rect(
        out,
        Vec2::new(pos.x + size.x - t, pos.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    );
}
