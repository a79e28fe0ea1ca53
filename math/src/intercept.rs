use glam::Vec2;

/// A partition line: origin plus direction. Same layout as a divline.
#[derive(Debug, Clone, Copy)]
pub struct Trace {
    pub xy: Vec2,
    pub dxy: Vec2,
}

impl Trace {
    #[inline]
    pub const fn new(xy: Vec2, dxy: Vec2) -> Self {
        Self { xy, dxy }
    }
}

/// Determine which side of the trace the vector point is on
#[inline]
pub fn point_on_side(trace: Trace, v2: Vec2) -> usize {
    let dx = v2.x - trace.xy.x;
    let dy = v2.y - trace.xy.y;

    if (dy * trace.dxy.x) <= (trace.dxy.y * dx) {
        // Front side
        return 0;
    }
    // Backside
    1
}

/// Which side of `trace` the box `min..max` is on. `Some(0)` front,
/// `Some(1)` back, `None` if the line crosses the box.
pub fn box_on_line_side(min: Vec2, max: Vec2, trace: Trace) -> Option<usize> {
    let corners = [
        Vec2::new(min.x, min.y),
        Vec2::new(max.x, min.y),
        Vec2::new(max.x, max.y),
        Vec2::new(min.x, max.y),
    ];
    let first = point_on_side(trace, corners[0]);
    if corners[1..]
        .iter()
        .all(|c| point_on_side(trace, *c) == first)
    {
        return Some(first);
    }
    None
}

/// True if the segment `start..end` touches the box `min..max`
pub fn seg_touches_box(start: Vec2, end: Vec2, min: Vec2, max: Vec2) -> bool {
    let seg_min = start.min(end);
    let seg_max = start.max(end);
    if seg_max.x < min.x || seg_min.x > max.x || seg_max.y < min.y || seg_min.y > max.y {
        return false;
    }
    box_on_line_side(min, max, Trace::new(start, end - start)).is_none()
}
