use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box in image pixel space.
///
/// The origin is the top-left corner of the image with Y increasing downward,
/// which is the coordinate system the layout engine reports in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    /// The top-left corner.
    pub min: Vec2,
    /// The bottom-right corner.
    pub max: Vec2,
}

impl Bbox {
    /// Creates a new bounding box from minimum and maximum points.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use doclayout_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0));
    /// assert_eq!(bbox.width(), 10.0);
    /// ```
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates the envelope of a polygon given as `[x, y]` points.
    ///
    /// The layout engine reports a region as its corner points, usually four of
    /// them in the order top-left, bottom-left, bottom-right, top-right. Any
    /// order and any count of at least two points is accepted. Returns `None`
    /// for fewer than two points or non-finite coordinates.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use doclayout_core::analysis::bbox::Bbox;
    /// let points = [[10.0, 20.0], [10.0, 80.0], [50.0, 80.0], [50.0, 20.0]];
    /// let bbox = Bbox::from_points(&points).unwrap();
    /// assert_eq!(bbox.min, Vec2::new(10.0, 20.0));
    /// assert_eq!(bbox.max, Vec2::new(50.0, 80.0));
    /// ```
    pub fn from_points(points: &[[f32; 2]]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for point in points {
            let point = Vec2::from_array(*point);
            if !point.is_finite() {
                return None;
            }
            min = min.min(point);
            max = max.max(point);
        }

        Some(Self { min, max })
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Calculates the area of the bounding box.
    ///
    /// # Example
    /// ```
    /// use glam::Vec2;
    /// use doclayout_core::analysis::bbox::Bbox;
    /// let bbox = Bbox::new(Vec2::ZERO, Vec2::new(4.0, 3.0));
    /// assert_eq!(bbox.area(), 12.0);
    /// ```
    pub fn area(&self) -> f32 {
        let length = self.max - self.min;

        length.x * length.y
    }

    /// True when the box has no positive width or height.
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// True when any part of the box lies inside the given bounds, edges included.
    pub fn intersects(&self, min_bounds: Vec2, max_bounds: Vec2) -> bool {
        self.min.cmple(max_bounds).all() && self.max.cmpge(min_bounds).all()
    }

    /// Clamps the bounding box to the specified bounds.
    ///
    /// Used to keep overlay drawing inside the image without changing the
    /// coordinates stored in the result.
    pub fn clamp(&self, min_bounds: Vec2, max_bounds: Vec2) -> Self {
        Self {
            min: self.min.clamp(min_bounds, max_bounds),
            max: self.max.clamp(min_bounds, max_bounds),
        }
    }
}
