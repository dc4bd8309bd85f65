#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T> Rect<T> {
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl Rect<i32> {
    /// A zero-size rectangle anchored at a point.
    pub const fn at(x: i32, y: i32) -> Self {
        Rect::new(x, y, 0, 0)
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Smallest rectangle covering both, including degenerate ones.
    pub fn union(&self, other: &Rect<i32>) -> Rect<i32> {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Rect::new(x, y, (x2 - x).max(0), (y2 - y).max(0))
    }

    /// Overlap of both rectangles; zero-sized when they are disjoint.
    pub fn intersect(&self, other: &Rect<i32>) -> Rect<i32> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());
        Rect::new(x, y, (x2 - x).max(0), (y2 - y).max(0))
    }

    /// Point test with inclusive edges on all four sides.
    pub const fn contains_point(&self, px: i32, py: i32) -> bool {
        self.x <= px && px <= self.right() && self.y <= py && py <= self.bottom()
    }

    /// True when `inner` lies inside `self` shrunk by `margin` on every side.
    pub const fn contains_with_margin(&self, inner: &Rect<i32>, margin: i32) -> bool {
        inner.x >= self.x + margin
            && inner.y >= self.y + margin
            && inner.right() <= self.right() - margin
            && inner.bottom() <= self.bottom() - margin
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_covers_both() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 20, 10, 5);
        assert_eq!(a.union(&b), Rect::new(0, 0, 15, 25));
    }

    #[test]
    fn test_union_with_point_extends_to_point() {
        let a = Rect::new(10, 10, 5, 5);
        assert_eq!(a.union(&Rect::at(0, 0)), Rect::new(0, 0, 15, 15));
    }

    #[test]
    fn test_intersect_disjoint_is_empty() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(20, 20, 5, 5);
        assert!(a.intersect(&b).is_empty());
    }

    #[test]
    fn test_intersect_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Rect::new(5, 5, 5, 5));
    }

    #[test]
    fn test_contains_point_is_inclusive() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains_point(10, 10));
        assert!(!r.contains_point(11, 0));
    }

    #[test]
    fn test_contains_with_margin() {
        let atlas = Rect::new(0, 0, 100, 100);
        assert!(atlas.contains_with_margin(&Rect::new(1, 1, 98, 98), 1));
        assert!(!atlas.contains_with_margin(&Rect::new(0, 1, 10, 10), 1));
    }
}
