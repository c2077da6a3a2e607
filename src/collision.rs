/// Axis-aligned bounding boxes and the overlap test used for both
/// obstacles and collectibles.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect { x, y, width, height }
    }
}

/// True when `a` and `b` overlap by more than `margin` on both axes.
///
/// The margin is taken off `a`'s edges, so boxes that only graze each other
/// (including boxes whose edges touch exactly) do not count as a hit.
pub fn overlaps(a: &Rect, b: &Rect, margin: f32) -> bool {
    a.x + margin < b.x + b.width
        && a.x + a.width - margin > b.x
        && a.y + margin < b.y + b.height
        && a.y + a.height - margin > b.y
}
