use crate::wheel::model::span;
use crate::wheel::{
    FULL_TURN, HUB_RADIUS, LABEL_RADIUS_FACTOR, POINTER_HALF_WIDTH, POINTER_LENGTH,
    RIM_RADIUS_FACTOR,
};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Layout of the wheel face for one frame.
///
/// Screen angles are in degrees, clockwise from the top, so the pointer
/// sits at screen angle 0. Face angles are measured on the wheel itself:
/// segment `i` covers `[i * span, (i + 1) * span)`. A face angle `a` is
/// drawn at screen angle `rotation - a + span / 2`, which turns the face
/// clockwise as rotation grows and centres segment 0 under the pointer at
/// rotation 0.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelGeometry {
    pub center: Point,
    pub radius: f64,
    pub rotation: f64,
    pub count: usize,
}

impl WheelGeometry {
    pub fn new(side: f64, rotation: f64, count: usize) -> Self {
        let half = side / 2.0;
        Self {
            center: Point::new(half, half),
            radius: side * RIM_RADIUS_FACTOR,
            rotation,
            count,
        }
    }

    pub fn span(&self) -> f64 {
        span(self.count)
    }

    pub fn label_radius(&self) -> f64 {
        self.radius * LABEL_RADIUS_FACTOR
    }

    pub fn screen_angle(&self, face_angle: f64) -> f64 {
        self.rotation - face_angle + self.span() / 2.0
    }

    pub fn face_angle(&self, screen_angle: f64) -> f64 {
        (self.rotation + self.span() / 2.0 - screen_angle).rem_euclid(FULL_TURN)
    }

    pub fn polar(&self, screen_angle: f64, distance: f64) -> Point {
        let rad = screen_angle.to_radians();
        Point::new(
            self.center.x + distance * rad.sin(),
            self.center.y - distance * rad.cos(),
        )
    }

    /// Radial lines on segment boundaries, from the centre to the rim.
    pub fn dividers(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let span = self.span();
        (0..self.count).map(move |i| {
            let edge = self.polar(self.screen_angle(i as f64 * span), self.radius);
            (self.center, edge)
        })
    }

    /// Screen angles bounding segment `index`, clockwise from `start` to
    /// `end`. The leading divider is at `end`.
    pub fn segment_screen_range(&self, index: usize) -> (f64, f64) {
        let end = self.screen_angle(index as f64 * self.span());
        (end - self.span(), end)
    }

    /// Where a label is centred: the middle of its span, at the label radius.
    pub fn label_anchor(&self, index: usize) -> Point {
        let mid = (index as f64 + 0.5) * self.span();
        self.polar(self.screen_angle(mid), self.label_radius())
    }

    /// Pointer triangle just above the hub: tip, left base, right base.
    pub fn pointer(&self) -> [Point; 3] {
        let Point { x, y } = self.center;
        let base = y - HUB_RADIUS;
        [
            Point::new(x, base - POINTER_LENGTH),
            Point::new(x - POINTER_HALF_WIDTH, base),
            Point::new(x + POINTER_HALF_WIDTH, base),
        ]
    }

    pub fn hub_radius(&self) -> f64 {
        HUB_RADIUS
    }

    /// Segment under `point`, ignoring the hub and anything outside the rim.
    pub fn segment_at(&self, point: Point) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let dist = self.center.distance_to(point);
        if dist <= HUB_RADIUS || dist > self.radius {
            return None;
        }

        let (dx, dy) = (point.x - self.center.x, point.y - self.center.y);
        let screen = dx.atan2(-dy).to_degrees();
        let face = self.face_angle(screen);
        Some(((face / self.span()) as usize).min(self.count - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::index_at_pointer;

    fn close(a: Point, b: Point) -> bool {
        a.distance_to(b) < 1e-9
    }

    #[test]
    fn test_layout_scales_with_side() {
        let geo = WheelGeometry::new(300.0, 0.0, 4);
        assert_eq!(geo.center, Point::new(150.0, 150.0));
        assert_eq!(geo.radius, 120.0);
        assert_eq!(geo.label_radius(), 78.0);
    }

    #[test]
    fn test_rest_position_centres_segment_zero_on_pointer() {
        let geo = WheelGeometry::new(300.0, 0.0, 4);
        let anchor = geo.label_anchor(0);
        assert!(close(anchor, Point::new(150.0, 150.0 - 78.0)));

        // segment 1 sits counter-clockwise of the pointer, on the left
        let next = geo.label_anchor(1);
        assert!(close(next, Point::new(150.0 - 78.0, 150.0)));
    }

    #[test]
    fn test_rotation_turns_face_clockwise() {
        let geo = WheelGeometry::new(300.0, 90.0, 4);
        // after a quarter turn clockwise segment 0 is on the right
        assert!(close(geo.label_anchor(0), Point::new(150.0 + 78.0, 150.0)));
        assert!(close(geo.label_anchor(1), Point::new(150.0, 150.0 - 78.0)));
    }

    #[test]
    fn test_dividers_bound_each_segment() {
        let geo = WheelGeometry::new(200.0, 30.0, 3);
        let dividers: Vec<_> = geo.dividers().collect();
        assert_eq!(dividers.len(), 3);

        for (start, end) in &dividers {
            assert_eq!(*start, geo.center);
            assert!((geo.center.distance_to(*end) - geo.radius).abs() < 1e-9);
        }
        // first divider is half a span clockwise of segment 0's centre
        let expected = geo.polar(30.0 + 60.0, geo.radius);
        assert!(close(dividers[0].1, expected));
    }

    #[test]
    fn test_segment_range_contains_its_label() {
        for count in 1..=8 {
            for rotation in [0.0, 22.5, 145.0, 359.0] {
                let geo = WheelGeometry::new(300.0, rotation, count);
                for i in 0..count {
                    let (start, end) = geo.segment_screen_range(i);
                    assert!((end - start - geo.span()).abs() < 1e-9);

                    let (dx, dy) = {
                        let a = geo.label_anchor(i);
                        (a.x - geo.center.x, a.y - geo.center.y)
                    };
                    let anchor = dx.atan2(-dy).to_degrees();
                    let offset = (anchor - start).rem_euclid(FULL_TURN);
                    assert!(
                        (offset - geo.span() / 2.0).abs() < 1e-6,
                        "count {count}, rotation {rotation}, segment {i}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_pointer_is_fixed_at_top() {
        let spun = WheelGeometry::new(300.0, 217.0, 5);
        let rest = WheelGeometry::new(300.0, 0.0, 5);
        assert_eq!(spun.pointer(), rest.pointer());

        let [tip, left, right] = rest.pointer();
        assert_eq!(tip, Point::new(150.0, 115.0));
        assert_eq!(left, Point::new(142.0, 130.0));
        assert_eq!(right, Point::new(158.0, 130.0));
    }

    #[test]
    fn test_segment_at_agrees_with_pointer() {
        for count in 1..=9 {
            for rotation in [0.0, 13.0, 45.0, 91.5, 200.0, 359.0, 1234.5] {
                let geo = WheelGeometry::new(300.0, rotation, count);
                let straight_up = Point::new(150.0, 60.0);
                assert_eq!(
                    geo.segment_at(straight_up),
                    index_at_pointer(rotation, count),
                    "count {count}, rotation {rotation}"
                );
            }
        }
    }

    #[test]
    fn test_segment_at_label_anchor() {
        let geo = WheelGeometry::new(400.0, 77.0, 6);
        for i in 0..6 {
            assert_eq!(geo.segment_at(geo.label_anchor(i)), Some(i));
        }
    }

    #[test]
    fn test_segment_at_ignores_hub_and_outside() {
        let geo = WheelGeometry::new(300.0, 0.0, 3);
        assert_eq!(geo.segment_at(geo.center), None);
        assert_eq!(geo.segment_at(Point::new(150.0, 140.0)), None);
        assert_eq!(geo.segment_at(Point::new(150.0, 10.0)), None);
        assert_eq!(WheelGeometry::new(300.0, 0.0, 0).segment_at(Point::new(150.0, 60.0)), None);
    }
}
