use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box represented by minimum and maximum points.
///
/// Coordinates follow image conventions: `min` is the top-left corner
/// `(x1, y1)` and `max` the bottom-right corner `(x2, y2)`, with `y` growing
/// downwards the page. On the wire a box is the array `[x1, y1, x2, y2]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Bbox {
    /// The minimum point of the bounding box (top-left corner).
    pub min: glam::Vec2,
    /// The maximum point of the bounding box (bottom-right corner).
    pub max: glam::Vec2,
}

impl Bbox {
    /// Creates a new bounding box from minimum and maximum points.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use reflow_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0));
    /// assert_eq!(bbox.width(), 10.0);
    /// ```
    pub fn new(min: glam::Vec2, max: glam::Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a new bounding box from a minimum point and size vector.
    ///
    /// This is the shape of legacy OCR records carrying `x, y, w, h`.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use reflow_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new_from_min_size(Vec2::new(1.0, 2.0), Vec2::new(5.0, 3.0));
    /// // Creates a bbox from (1,2) to (6,5)
    /// assert_eq!(bbox.max, Vec2::new(6.0, 5.0));
    /// ```
    pub fn new_from_min_size(min: glam::Vec2, size: glam::Vec2) -> Self {
        Self {
            min,
            max: min + size,
        }
    }

    /// Creates a bounding box from `[x1, y1, x2, y2]` corner coordinates.
    ///
    /// No ordering check is made here; see [`Bbox::is_well_formed`].
    ///
    /// # Example
    /// ```
    /// use reflow_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::from_corners([0.0, 10.0, 100.0, 22.0]);
    /// assert_eq!(bbox.height(), 12.0);
    /// ```
    pub fn from_corners([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self::new(glam::Vec2::new(x1, y1), glam::Vec2::new(x2, y2))
    }

    /// Returns the `[x1, y1, x2, y2]` corner coordinates.
    pub fn to_corners(&self) -> [f32; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Returns `true` if every coordinate is finite and `min` does not exceed
    /// `max` on either axis.
    ///
    /// # Example
    /// ```
    /// use reflow_core::analysis::bbox::Bbox;
    /// assert!(Bbox::from_corners([0.0, 0.0, 0.0, 0.0]).is_well_formed());
    /// assert!(!Bbox::from_corners([5.0, 0.0, 1.0, 10.0]).is_well_formed());
    /// assert!(!Bbox::from_corners([0.0, f32::NAN, 1.0, 10.0]).is_well_formed());
    /// ```
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    /// Creates a union bounding box that encompasses both this bounding box and another.
    ///
    /// The union bounding box is the smallest axis-aligned rectangle that completely
    /// contains both input bounding boxes.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use reflow_core::analysis::bbox::Bbox;
    ///
    /// let bbox1 = Bbox::new(Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0));
    /// let bbox2 = Bbox::new(Vec2::new(3.0, 3.0), Vec2::new(8.0, 8.0));
    /// let union = bbox1.union(&bbox2);
    ///
    /// assert_eq!(union.min, Vec2::new(0.0, 0.0));
    /// assert_eq!(union.max, Vec2::new(8.0, 8.0));
    /// ```
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grows this bounding box in place to cover `other`.
    pub fn extend(&mut self, other: &Self) {
        *self = self.union(other);
    }

    /// Union of every box yielded by `boxes`, or `None` if it yields nothing.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a Bbox>) -> Option<Self> {
        boxes
            .into_iter()
            .copied()
            .reduce(|acc, bbox| acc.union(&bbox))
    }
}

impl From<[f32; 4]> for Bbox {
    fn from(corners: [f32; 4]) -> Self {
        Self::from_corners(corners)
    }
}

impl From<Bbox> for [f32; 4] {
    fn from(bbox: Bbox) -> Self {
        bbox.to_corners()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_size() {
        let bbox = Bbox::from_corners([10.0, 20.0, 110.0, 32.0]);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 12.0);

        // Legacy x/y/w/h form lands on the same corners
        let legacy = Bbox::new_from_min_size(glam::Vec2::new(10.0, 20.0), glam::Vec2::new(100.0, 12.0));
        assert_eq!(legacy, bbox);

        // Zero height (degenerate OCR box)
        let flat = Bbox::from_corners([0.0, 5.0, 40.0, 5.0]);
        assert_eq!(flat.height(), 0.0);
        assert!(flat.is_well_formed());
    }

    #[test]
    fn test_bbox_well_formed() {
        assert!(Bbox::from_corners([0.0, 0.0, 100.0, 10.0]).is_well_formed());
        assert!(Bbox::from_corners([-5.0, -5.0, 0.0, 0.0]).is_well_formed());

        // Inverted on x, on y
        assert!(!Bbox::from_corners([100.0, 0.0, 0.0, 10.0]).is_well_formed());
        assert!(!Bbox::from_corners([0.0, 10.0, 100.0, 0.0]).is_well_formed());

        // Non-finite coordinates
        assert!(!Bbox::from_corners([0.0, 0.0, f32::INFINITY, 10.0]).is_well_formed());
        assert!(!Bbox::from_corners([f32::NAN, 0.0, 1.0, 10.0]).is_well_formed());
    }

    #[test]
    fn test_bbox_union() {
        // Stacked lines of a paragraph
        let first = Bbox::from_corners([50.0, 100.0, 500.0, 112.0]);
        let second = Bbox::from_corners([30.0, 116.0, 520.0, 128.0]);
        let union = first.union(&second);
        assert_eq!(union.to_corners(), [30.0, 100.0, 520.0, 128.0]);

        // Symmetry
        assert_eq!(second.union(&first), union);

        // One box contains the other
        let inner = Bbox::from_corners([60.0, 104.0, 70.0, 110.0]);
        assert_eq!(first.union(&inner), first);

        // In-place extension matches union
        let mut grown = first;
        grown.extend(&second);
        assert_eq!(grown, union);
    }

    #[test]
    fn test_bbox_union_all() {
        assert_eq!(Bbox::union_all(std::iter::empty()), None);

        let boxes = [
            Bbox::from_corners([0.0, 0.0, 10.0, 10.0]),
            Bbox::from_corners([5.0, 20.0, 30.0, 25.0]),
            Bbox::from_corners([-2.0, 8.0, 4.0, 9.0]),
        ];
        let union = Bbox::union_all(boxes.iter()).unwrap();
        assert_eq!(union.to_corners(), [-2.0, 0.0, 30.0, 25.0]);
    }

    #[test]
    fn test_bbox_serde_array() {
        let bbox = Bbox::from_corners([1.0, 2.0, 3.5, 4.0]);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[1.0,2.0,3.5,4.0]");

        let parsed: Bbox = serde_json::from_str("[10, 20, 30, 40]").unwrap();
        assert_eq!(parsed.to_corners(), [10.0, 20.0, 30.0, 40.0]);
    }
}
