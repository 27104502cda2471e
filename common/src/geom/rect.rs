use super::point::Point;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub min: Point<f64>,
    pub max: Point<f64>,
}

impl Rect {
    pub fn new(min: Point<f64>, max: Point<f64>) -> Self {
        Self { min, max }
    }

    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Negative extents count as empty.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::from_coords(
            self.min.x + dx,
            self.min.y + dy,
            self.max.x + dx,
            self.max.y + dy,
        )
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Rect::from_coords(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.max.x.min(other.max.x),
            self.max.y.min(other.max.y),
        ))
    }

    /// Area shared with `other`, zero when disjoint or merely touching.
    pub fn intersection_area(&self, other: &Rect) -> f64 {
        self.intersection(other).map_or(0.0, |r| r.area())
    }

    pub fn bounding_box(&self, other: &Rect) -> Rect {
        Rect::from_coords(
            self.min.x.min(other.min.x),
            self.min.y.min(other.min.y),
            self.max.x.max(other.max.x),
            self.max.y.max(other.max.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_partial() {
        let a = Rect::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_coords(5.0, 8.0, 20.0, 20.0);

        let i = a.intersection(&b).unwrap();
        assert_eq!(i, Rect::from_coords(5.0, 8.0, 10.0, 10.0));
        assert!((a.intersection_area(&b) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::from_coords(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_coords(10.0, 0.0, 20.0, 10.0);

        assert!(a.intersection(&b).is_none());
        assert_eq!(a.intersection_area(&b), 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let a = Rect::from_coords(1.0, 2.0, 3.0, 4.0);
        let b = Rect::from_coords(-1.0, 3.0, 2.0, 9.0);

        assert_eq!(a.bounding_box(&b), Rect::from_coords(-1.0, 2.0, 3.0, 9.0));
    }
}
