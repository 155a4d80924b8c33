use super::LeaderCurve;
use crate::geometry::Point;

/// Patent-style S-curve: control points at 1/3 and 2/3 of the chord, pushed
/// `offset` to opposite sides of it.
pub fn s_curve(start: Point, end: Point, offset: f32) -> LeaderCurve {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let mut c1 = Point::new(start.x + dx / 3.0, start.y + dy / 3.0);
    let mut c2 = Point::new(start.x + 2.0 * dx / 3.0, start.y + 2.0 * dy / 3.0);

    let len = dx.hypot(dy);
    if len > 0.0 {
        let perp_x = -dy / len;
        let perp_y = dx / len;
        c1.x += perp_x * offset;
        c1.y += perp_y * offset;
        c2.x -= perp_x * offset;
        c2.y -= perp_y * offset;
    }

    LeaderCurve { start, c1, c2, end }
}
